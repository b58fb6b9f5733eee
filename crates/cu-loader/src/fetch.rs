//! Message metadata retrieval from a scheduler.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use crate::errors::{FetchError, SourceError};
use crate::types::{MessageId, ProcessId, RawMetaResult};
use crate::validate::parse_raw_message_meta;

pub type DynMetaSource = Arc<dyn MessageMetaSource>;

/// External scheduler client returning a message's position in the log.
#[async_trait]
pub trait MessageMetaSource: Send + Sync {
    async fn load_message_meta(
        &self,
        su_url: &str,
        process_id: &ProcessId,
        message_tx_id: &MessageId,
    ) -> Result<Value, SourceError>;
}

#[derive(Clone)]
pub struct MetaFetcher {
    source: DynMetaSource,
}

impl MetaFetcher {
    pub fn new(source: DynMetaSource) -> Self {
        Self { source }
    }

    /// `su_url` is used as given; callers strip trailing separators first.
    pub async fn fetch_message_meta(
        &self,
        su_url: &str,
        process_id: &ProcessId,
        message_tx_id: &MessageId,
    ) -> Result<RawMetaResult, FetchError> {
        let raw = self
            .source
            .load_message_meta(su_url, process_id, message_tx_id)
            .await
            .map_err(|err| match err {
                SourceError::NotFound(_) => FetchError::NotFound {
                    su_url: su_url.to_string(),
                    process_id: process_id.clone(),
                    message_tx_id: message_tx_id.clone(),
                },
                SourceError::Transport(reason) => FetchError::Transport {
                    su_url: su_url.to_string(),
                    reason,
                },
            })?;
        let meta = parse_raw_message_meta(raw)?;
        debug!(%process_id, %message_tx_id, su_url, "fetched message meta");
        Ok(meta)
    }
}
