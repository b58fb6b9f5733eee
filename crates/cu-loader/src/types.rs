//! Identifiers and records flowing through the pipeline.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

use crate::errors::ValidationError;
use crate::util::first_tag_named;

/// Tag naming the scheduler a process was spawned against.
pub const SCHEDULER_TAG: &str = "Scheduler";

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
                let value = value.into();
                if value.is_empty() {
                    return Err(ValidationError::new($label, "must not be empty"));
                }
                Ok(Self(value))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = ValidationError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> String {
                id.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

string_id!(
    /// Identifier of a process (a unit of work with an append-only message log).
    ProcessId,
    "ProcessId"
);
string_id!(
    /// Identifier of one message within a process's log.
    MessageId,
    "MessageId"
);

/// Scheduler hint taken from a process's `Scheduler` tag. Never authoritative.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SchedulerHint(String);

impl SchedulerHint {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SchedulerHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub name: String,
    pub value: String,
}

impl Tag {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Process attributes as known to the directory. Tag order is preserved and
/// names may repeat.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProcessRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    pub tags: Vec<Tag>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ProcessRecord {
    /// Value of the first `Scheduler` tag, if any.
    pub fn scheduler_hint(&self) -> Option<SchedulerHint> {
        first_tag_named(SCHEDULER_TAG, &self.tags).map(|tag| SchedulerHint::new(tag.value.clone()))
    }
}

/// Network location of the scheduler responsible for a process.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoordinatorLocation {
    pub url: String,
    /// Wallet address of the scheduler, when the locator reports it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

/// Message metadata as returned by a scheduler, after the raw contract check.
pub type RawMetaResult = Map<String, Value>;

/// Validated position of a message within its process's log.
///
/// Both positions are JSON numbers kept exactly as the scheduler sent them.
/// `timestamp` is never zero; `sequence_number` may be zero. Fields the
/// scheduler returned beyond these three are kept in `extra`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageMetaResult {
    pub process_id: ProcessId,
    pub timestamp: Number,
    pub sequence_number: Number,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Input of one pipeline run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadRequest {
    pub process_id: ProcessId,
    pub message_tx_id: MessageId,
}

impl LoadRequest {
    pub fn new(process_id: ProcessId, message_tx_id: MessageId) -> Self {
        Self {
            process_id,
            message_tx_id,
        }
    }
}
