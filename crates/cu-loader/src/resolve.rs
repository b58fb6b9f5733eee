//! Cache-first scheduler location resolution.
//!
//! The directory lookup only supplies an optional scheduler hint. Its failure
//! degrades resolution to the unhinted locate; only the locate itself can fail
//! the resolution (plus a definitive not-found under
//! [`DirectoryFailurePolicy::FailFastOnNotFound`]).

use tracing::{debug, warn};

use crate::config::DirectoryFailurePolicy;
use crate::directory::DirectoryResolver;
use crate::errors::{DirectoryError, ResolveError};
use crate::locator::CoordinatorLocator;
use crate::types::{CoordinatorLocation, ProcessId, SchedulerHint};

#[derive(Clone)]
pub struct LocationResolver {
    directory: DirectoryResolver,
    locator: CoordinatorLocator,
    policy: DirectoryFailurePolicy,
}

impl LocationResolver {
    pub fn new(directory: DirectoryResolver, locator: CoordinatorLocator) -> Self {
        Self {
            directory,
            locator,
            policy: DirectoryFailurePolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: DirectoryFailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub async fn resolve_location(&self, process_id: &ProcessId) -> Result<CoordinatorLocation, ResolveError> {
        let hint = self.scheduler_hint(process_id).await?;
        let location = self
            .locator
            .locate_coordinator(process_id, hint.as_ref())
            .await?;
        Ok(location)
    }

    async fn scheduler_hint(&self, process_id: &ProcessId) -> Result<Option<SchedulerHint>, ResolveError> {
        match self.directory.resolve_process(process_id).await {
            Ok(record) => {
                let hint = record.scheduler_hint();
                debug!(%process_id, hint = ?hint.as_ref().map(SchedulerHint::as_str), "derived scheduler hint");
                Ok(hint)
            }
            Err(err @ DirectoryError::NotFound(_))
                if self.policy == DirectoryFailurePolicy::FailFastOnNotFound =>
            {
                Err(ResolveError::Lookup(err))
            }
            Err(err) => {
                warn!(%process_id, error = %err, "directory lookup failed; locating without scheduler hint");
                Ok(None)
            }
        }
    }
}
