//! Process directory lookup.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use crate::errors::{DirectoryError, SourceError};
use crate::types::{ProcessId, ProcessRecord};
use crate::validate::parse_process_record;

pub type DynDirectory = Arc<dyn ProcessDirectory>;

/// External source of process records. May be cache-backed or network-backed.
#[async_trait]
pub trait ProcessDirectory: Send + Sync {
    async fn find_process(&self, process_id: &ProcessId) -> Result<Value, SourceError>;
}

/// Looks up a process and validates the record before handing it out.
#[derive(Clone)]
pub struct DirectoryResolver {
    directory: DynDirectory,
}

impl DirectoryResolver {
    pub fn new(directory: DynDirectory) -> Self {
        Self { directory }
    }

    pub async fn resolve_process(&self, process_id: &ProcessId) -> Result<ProcessRecord, DirectoryError> {
        let raw = self
            .directory
            .find_process(process_id)
            .await
            .map_err(|err| match err {
                SourceError::NotFound(_) => DirectoryError::NotFound(process_id.clone()),
                SourceError::Transport(reason) => DirectoryError::Unavailable(reason),
            })?;
        let record = parse_process_record(raw)?;
        debug!(%process_id, tags = record.tags.len(), "resolved process record");
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct Fixed(Result<Value, SourceError>);

    #[async_trait]
    impl ProcessDirectory for Fixed {
        async fn find_process(&self, _process_id: &ProcessId) -> Result<Value, SourceError> {
            self.0.clone()
        }
    }

    fn resolver(answer: Result<Value, SourceError>) -> DirectoryResolver {
        DirectoryResolver::new(Arc::new(Fixed(answer)))
    }

    fn pid() -> ProcessId {
        ProcessId::new("P1").unwrap()
    }

    #[tokio::test]
    async fn returns_validated_record() {
        let record = resolver(Ok(json!({
            "id": "P1",
            "tags": [{ "name": "Scheduler", "value": "https://sched-a" }]
        })))
        .resolve_process(&pid())
        .await
        .unwrap();
        assert_eq!(record.scheduler_hint().unwrap().as_str(), "https://sched-a");
    }

    #[tokio::test]
    async fn maps_not_found_to_lookup_miss() {
        let err = resolver(Err(SourceError::NotFound("gone".into())))
            .resolve_process(&pid())
            .await
            .unwrap_err();
        assert_eq!(err, DirectoryError::NotFound(pid()));
    }

    #[tokio::test]
    async fn malformed_record_is_a_validation_error() {
        let err = resolver(Ok(json!({ "tags": "Scheduler" })))
            .resolve_process(&pid())
            .await
            .unwrap_err();
        assert!(matches!(err, DirectoryError::Validation(_)), "{err:?}");
    }
}
