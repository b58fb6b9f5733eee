//! In-memory process directory cache.

use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use indexmap::IndexMap;
use serde_json::Value;
use tracing::debug;

use crate::directory::{DynDirectory, ProcessDirectory};
use crate::errors::SourceError;
use crate::types::ProcessId;
use crate::validate::PROCESS_RECORD;

/// Remembers successful directory answers, oldest evicted first.
///
/// Only answers that satisfy the process record contract are kept; failures
/// and malformed records always reach the inner directory again.
pub struct CachedDirectory {
    inner: DynDirectory,
    capacity: usize,
    entries: Mutex<IndexMap<ProcessId, Value>>,
}

impl std::fmt::Debug for CachedDirectory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CachedDirectory")
            .field("capacity", &self.capacity)
            .field("entries", &self.len())
            .finish()
    }
}

impl CachedDirectory {
    pub fn new(inner: DynDirectory, capacity: usize) -> Self {
        Self {
            inner,
            capacity: capacity.max(1),
            entries: Mutex::new(IndexMap::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, process_id: &ProcessId) -> bool {
        self.entries().contains_key(process_id)
    }

    pub fn invalidate(&self, process_id: &ProcessId) -> bool {
        self.entries().shift_remove(process_id).is_some()
    }

    fn entries(&self) -> MutexGuard<'_, IndexMap<ProcessId, Value>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn remember(&self, process_id: &ProcessId, record: &Value) {
        let mut entries = self.entries();
        if !entries.contains_key(process_id) && entries.len() >= self.capacity {
            entries.shift_remove_index(0);
        }
        entries.insert(process_id.clone(), record.clone());
    }
}

#[async_trait]
impl ProcessDirectory for CachedDirectory {
    async fn find_process(&self, process_id: &ProcessId) -> Result<Value, SourceError> {
        let cached = self.entries().get(process_id).cloned();
        if let Some(hit) = cached {
            debug!(%process_id, "process cache hit");
            return Ok(hit);
        }
        let record = self.inner.find_process(process_id).await?;
        match PROCESS_RECORD.check(&record) {
            Ok(()) => self.remember(process_id, &record),
            Err(err) => debug!(%process_id, error = %err, "not caching malformed process record"),
        }
        Ok(record)
    }
}
