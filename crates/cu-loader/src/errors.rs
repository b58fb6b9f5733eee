//! Error taxonomy for the message-meta loading pipeline.
//!
//! Collaborators report [`SourceError`]; each component lifts it into its own
//! error type, and the pipeline wraps the first unrecovered failure in a
//! [`LoadError`] tagged with the failing [`Stage`].

use std::fmt;

use thiserror::Error;

use crate::types::{MessageId, ProcessId};

/// Failure reported by an external collaborator (directory, locator, scheduler).
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SourceError {
    /// The collaborator answered definitively that the entity does not exist.
    #[error("not found: {0}")]
    NotFound(String),
    /// Network, protocol or availability failure.
    #[error("transport error: {0}")]
    Transport(String),
}

/// A value violated one of the shape contracts.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{contract} contract violated: {}", .issues.join("; "))]
pub struct ValidationError {
    pub contract: &'static str,
    pub issues: Vec<String>,
}

impl ValidationError {
    pub fn new(contract: &'static str, issue: impl Into<String>) -> Self {
        Self {
            contract,
            issues: vec![issue.into()],
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum DirectoryError {
    #[error("process {0} not found in directory")]
    NotFound(ProcessId),
    #[error("directory unavailable: {0}")]
    Unavailable(String),
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum LocateError {
    #[error("no scheduler located for process {process_id}: {reason}")]
    NotLocated {
        process_id: ProcessId,
        reason: String,
    },
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("scheduler {su_url} has no message {message_tx_id} for process {process_id}")]
    NotFound {
        su_url: String,
        process_id: ProcessId,
        message_tx_id: MessageId,
    },
    #[error("fetching message meta from {su_url} failed: {reason}")]
    Transport { su_url: String, reason: String },
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Terminal failure of cached location resolution.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// Only produced under `DirectoryFailurePolicy::FailFastOnNotFound`.
    #[error(transparent)]
    Lookup(DirectoryError),
    #[error(transparent)]
    Location(#[from] LocateError),
}

/// Pipeline stage at which a run failed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Stage {
    Directory,
    Locate,
    Fetch,
    Validate,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Directory => "directory",
            Stage::Locate => "locate",
            Stage::Fetch => "fetch",
            Stage::Validate => "validate",
        };
        f.write_str(name)
    }
}

/// Classification of a pipeline failure.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Validation,
    Lookup,
    Location,
    Fetch,
    NotFound,
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum LoadFailure {
    #[error(transparent)]
    Lookup(DirectoryError),
    #[error(transparent)]
    Location(LocateError),
    #[error(transparent)]
    Fetch(FetchError),
    #[error(transparent)]
    Validation(ValidationError),
}

impl From<ResolveError> for LoadFailure {
    fn from(err: ResolveError) -> Self {
        match err {
            ResolveError::Lookup(err) => LoadFailure::Lookup(err),
            ResolveError::Location(err) => LoadFailure::Location(err),
        }
    }
}

/// Failure of one `load_message_meta` run, with enough context to diagnose it.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("loading meta for message {message_tx_id} of process {process_id} failed at {stage}: {source}")]
pub struct LoadError {
    pub stage: Stage,
    pub process_id: ProcessId,
    pub message_tx_id: MessageId,
    #[source]
    pub source: LoadFailure,
}

impl LoadError {
    pub fn kind(&self) -> ErrorKind {
        match &self.source {
            LoadFailure::Validation(_)
            | LoadFailure::Lookup(DirectoryError::Validation(_))
            | LoadFailure::Location(LocateError::Validation(_))
            | LoadFailure::Fetch(FetchError::Validation(_)) => ErrorKind::Validation,
            LoadFailure::Lookup(_) => ErrorKind::Lookup,
            LoadFailure::Location(_) => ErrorKind::Location,
            LoadFailure::Fetch(FetchError::NotFound { .. }) => ErrorKind::NotFound,
            LoadFailure::Fetch(_) => ErrorKind::Fetch,
        }
    }

    pub fn message(&self) -> String {
        self.source.to_string()
    }
}
