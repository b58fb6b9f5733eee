//! Scheduler location lookup.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use crate::errors::{LocateError, SourceError};
use crate::types::{CoordinatorLocation, ProcessId, SchedulerHint};
use crate::validate::parse_coordinator_location;

pub type DynLocator = Arc<dyn SchedulerLocator>;

/// External locator for the scheduler serving a process.
///
/// With a hint, implementations may skip a full directory scan; without one,
/// or when the hint does not check out, they must resolve fully.
#[async_trait]
pub trait SchedulerLocator: Send + Sync {
    async fn locate_process(
        &self,
        process_id: &ProcessId,
        scheduler_hint: Option<&SchedulerHint>,
    ) -> Result<Value, SourceError>;
}

#[derive(Clone)]
pub struct CoordinatorLocator {
    locator: DynLocator,
}

impl CoordinatorLocator {
    pub fn new(locator: DynLocator) -> Self {
        Self { locator }
    }

    pub async fn locate_coordinator(
        &self,
        process_id: &ProcessId,
        scheduler_hint: Option<&SchedulerHint>,
    ) -> Result<CoordinatorLocation, LocateError> {
        let raw = self
            .locator
            .locate_process(process_id, scheduler_hint)
            .await
            .map_err(|err| LocateError::NotLocated {
                process_id: process_id.clone(),
                reason: err.to_string(),
            })?;
        let location = parse_coordinator_location(raw)?;
        debug!(
            %process_id,
            hinted = scheduler_hint.is_some(),
            url = %location.url,
            "located scheduler"
        );
        Ok(location)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct Echo;

    #[async_trait]
    impl SchedulerLocator for Echo {
        async fn locate_process(
            &self,
            _process_id: &ProcessId,
            scheduler_hint: Option<&SchedulerHint>,
        ) -> Result<Value, SourceError> {
            match scheduler_hint {
                Some(hint) => Ok(json!({ "url": hint.as_str(), "address": "addr-1" })),
                None => Err(SourceError::NotFound("no scheduler".into())),
            }
        }
    }

    #[tokio::test]
    async fn returns_validated_location() {
        let locator = CoordinatorLocator::new(Arc::new(Echo));
        let hint = SchedulerHint::new("https://sched-a");
        let location = locator
            .locate_coordinator(&ProcessId::new("P1").unwrap(), Some(&hint))
            .await
            .unwrap();
        assert_eq!(location.url, "https://sched-a");
        assert_eq!(location.address.as_deref(), Some("addr-1"));
    }

    #[tokio::test]
    async fn source_failure_is_a_location_error() {
        let locator = CoordinatorLocator::new(Arc::new(Echo));
        let err = locator
            .locate_coordinator(&ProcessId::new("P1").unwrap(), None)
            .await
            .unwrap_err();
        assert!(matches!(err, LocateError::NotLocated { .. }), "{err:?}");
    }

    #[tokio::test]
    async fn invalid_url_is_a_validation_error() {
        let locator = CoordinatorLocator::new(Arc::new(Echo));
        let hint = SchedulerHint::new("sched-a");
        let err = locator
            .locate_coordinator(&ProcessId::new("P1").unwrap(), Some(&hint))
            .await
            .unwrap_err();
        assert!(matches!(err, LocateError::Validation(_)), "{err:?}");
    }
}
