//! Scripted collaborators for exercising the message-meta pipeline.
//!
//! Each mock answers from a table configured up front and appends every call
//! to a shared [`Journal`], so tests can assert both what was asked and in
//! which order. Unscripted calls answer `SourceError::NotFound`.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use cu_loader::{
    LoaderConfig, MessageId, MessageMetaLoader, MessageMetaSource, ProcessDirectory, ProcessId,
    SchedulerHint, SchedulerLocator, SourceError,
};
use serde_json::{Value, json};

/// One collaborator call, as observed by the mocks.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Call {
    FindProcess {
        process_id: String,
    },
    LocateProcess {
        process_id: String,
        scheduler_hint: Option<String>,
    },
    LoadMessageMeta {
        su_url: String,
        process_id: String,
        message_tx_id: String,
    },
}

/// Ordered log of collaborator calls shared between mocks.
#[derive(Clone, Debug, Default)]
pub struct Journal {
    calls: Arc<Mutex<Vec<Call>>>,
}

impl Journal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, call: Call) {
        lock(&self.calls).push(call);
    }

    pub fn calls(&self) -> Vec<Call> {
        lock(&self.calls).clone()
    }

    pub fn locate_calls(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|call| matches!(call, Call::LocateProcess { .. }))
            .collect()
    }

    pub fn fetch_calls(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|call| matches!(call, Call::LoadMessageMeta { .. }))
            .collect()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn not_found(what: impl Into<String>) -> Result<Value, SourceError> {
    Err(SourceError::NotFound(what.into()))
}

// ---------------------------------------------------------------------------
// Directory
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct MockDirectory {
    journal: Journal,
    answers: Mutex<HashMap<String, Result<Value, SourceError>>>,
}

impl MockDirectory {
    pub fn new(journal: Journal) -> Self {
        Self {
            journal,
            answers: Mutex::default(),
        }
    }

    pub fn record(&self, process_id: &str, record: Value) -> &Self {
        lock(&self.answers).insert(process_id.to_string(), Ok(record));
        self
    }

    pub fn fail(&self, process_id: &str, error: SourceError) -> &Self {
        lock(&self.answers).insert(process_id.to_string(), Err(error));
        self
    }
}

#[async_trait]
impl ProcessDirectory for MockDirectory {
    async fn find_process(&self, process_id: &ProcessId) -> Result<Value, SourceError> {
        self.journal.record(Call::FindProcess {
            process_id: process_id.to_string(),
        });
        lock(&self.answers)
            .get(process_id.as_str())
            .cloned()
            .unwrap_or_else(|| not_found(format!("process {process_id}")))
    }
}

// ---------------------------------------------------------------------------
// Locator
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct MockLocator {
    journal: Journal,
    hinted: Mutex<HashMap<String, Result<Value, SourceError>>>,
    unhinted: Mutex<HashMap<String, Result<Value, SourceError>>>,
}

impl MockLocator {
    pub fn new(journal: Journal) -> Self {
        Self {
            journal,
            hinted: Mutex::default(),
            unhinted: Mutex::default(),
        }
    }

    /// Answer locates carrying `hint` (for any process).
    pub fn hinted(&self, hint: &str, answer: Result<Value, SourceError>) -> &Self {
        lock(&self.hinted).insert(hint.to_string(), answer);
        self
    }

    /// Answer hint-less locates for `process_id`.
    pub fn unhinted(&self, process_id: &str, answer: Result<Value, SourceError>) -> &Self {
        lock(&self.unhinted).insert(process_id.to_string(), answer);
        self
    }
}

#[async_trait]
impl SchedulerLocator for MockLocator {
    async fn locate_process(
        &self,
        process_id: &ProcessId,
        scheduler_hint: Option<&SchedulerHint>,
    ) -> Result<Value, SourceError> {
        self.journal.record(Call::LocateProcess {
            process_id: process_id.to_string(),
            scheduler_hint: scheduler_hint.map(|hint| hint.to_string()),
        });
        let answer = match scheduler_hint {
            Some(hint) => lock(&self.hinted).get(hint.as_str()).cloned(),
            None => lock(&self.unhinted).get(process_id.as_str()).cloned(),
        };
        answer.unwrap_or_else(|| not_found(format!("scheduler for {process_id}")))
    }
}

// ---------------------------------------------------------------------------
// Scheduler client
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct MockMetaSource {
    journal: Journal,
    answers: Mutex<HashMap<(String, String, String), Result<Value, SourceError>>>,
}

impl MockMetaSource {
    pub fn new(journal: Journal) -> Self {
        Self {
            journal,
            answers: Mutex::default(),
        }
    }

    pub fn respond(
        &self,
        su_url: &str,
        process_id: &str,
        message_tx_id: &str,
        answer: Result<Value, SourceError>,
    ) -> &Self {
        lock(&self.answers).insert(
            (
                su_url.to_string(),
                process_id.to_string(),
                message_tx_id.to_string(),
            ),
            answer,
        );
        self
    }
}

#[async_trait]
impl MessageMetaSource for MockMetaSource {
    async fn load_message_meta(
        &self,
        su_url: &str,
        process_id: &ProcessId,
        message_tx_id: &MessageId,
    ) -> Result<Value, SourceError> {
        self.journal.record(Call::LoadMessageMeta {
            su_url: su_url.to_string(),
            process_id: process_id.to_string(),
            message_tx_id: message_tx_id.to_string(),
        });
        let key = (
            su_url.to_string(),
            process_id.to_string(),
            message_tx_id.to_string(),
        );
        lock(&self.answers)
            .get(&key)
            .cloned()
            .unwrap_or_else(|| not_found(format!("message {message_tx_id} at {su_url}")))
    }
}

// ---------------------------------------------------------------------------
// Harness
// ---------------------------------------------------------------------------

/// The three mocks wired to one journal.
pub struct MockHarness {
    pub journal: Journal,
    pub directory: Arc<MockDirectory>,
    pub locator: Arc<MockLocator>,
    pub source: Arc<MockMetaSource>,
}

impl MockHarness {
    pub fn new() -> Self {
        let journal = Journal::new();
        Self {
            directory: Arc::new(MockDirectory::new(journal.clone())),
            locator: Arc::new(MockLocator::new(journal.clone())),
            source: Arc::new(MockMetaSource::new(journal.clone())),
            journal,
        }
    }

    pub fn loader(&self, config: LoaderConfig) -> MessageMetaLoader {
        MessageMetaLoader::new(
            self.directory.clone(),
            self.locator.clone(),
            self.source.clone(),
            config,
        )
    }

    pub fn cached_loader(&self, config: LoaderConfig) -> MessageMetaLoader {
        MessageMetaLoader::with_cached_directory(
            self.directory.clone(),
            self.locator.clone(),
            self.source.clone(),
            config,
        )
    }
}

impl Default for MockHarness {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

pub fn pid(id: &str) -> ProcessId {
    ProcessId::new(id).expect("non-empty process id")
}

pub fn mid(id: &str) -> MessageId {
    MessageId::new(id).expect("non-empty message id")
}

pub fn process_record(process_id: &str, tags: &[(&str, &str)]) -> Value {
    let tags: Vec<Value> = tags
        .iter()
        .map(|(name, value)| json!({ "name": name, "value": value }))
        .collect();
    json!({ "id": process_id, "owner": "owner-addr", "tags": tags })
}

pub fn location(url: &str) -> Result<Value, SourceError> {
    Ok(json!({ "url": url, "address": "scheduler-addr" }))
}

pub fn message_meta(process_id: &str, timestamp: i64, sequence_number: u64) -> Result<Value, SourceError> {
    Ok(json!({
        "processId": process_id,
        "timestamp": timestamp,
        "sequenceNumber": sequence_number
    }))
}
