//! End-to-end message metadata loading.

use std::sync::Arc;

use futures::StreamExt;
use futures::stream;
use tracing::{debug, instrument};

use crate::cache::CachedDirectory;
use crate::config::LoaderConfig;
use crate::directory::{DirectoryResolver, DynDirectory};
use crate::errors::{LoadError, LoadFailure, ResolveError, Stage};
use crate::fetch::{DynMetaSource, MetaFetcher};
use crate::locator::{CoordinatorLocator, DynLocator};
use crate::resolve::LocationResolver;
use crate::types::{LoadRequest, MessageMetaResult};
use crate::util::trim_trailing_slash;
use crate::validate::parse_message_meta;

/// Resolves a message's scheduler and loads its validated position metadata.
///
/// Stages run strictly in order: directory lookup, scheduler locate, metadata
/// fetch, validation. Nothing is retried here.
#[derive(Clone)]
pub struct MessageMetaLoader {
    resolver: LocationResolver,
    fetcher: MetaFetcher,
    config: LoaderConfig,
}

impl MessageMetaLoader {
    pub fn new(directory: DynDirectory, locator: DynLocator, source: DynMetaSource, config: LoaderConfig) -> Self {
        let resolver = LocationResolver::new(DirectoryResolver::new(directory), CoordinatorLocator::new(locator))
            .with_policy(config.directory_failure);
        Self {
            resolver,
            fetcher: MetaFetcher::new(source),
            config,
        }
    }

    /// Like [`MessageMetaLoader::new`], with the directory behind a
    /// [`CachedDirectory`] sized by the config.
    pub fn with_cached_directory(
        directory: DynDirectory,
        locator: DynLocator,
        source: DynMetaSource,
        config: LoaderConfig,
    ) -> Self {
        let cached: DynDirectory = Arc::new(CachedDirectory::new(directory, config.directory_cache_capacity));
        Self::new(cached, locator, source, config)
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    #[instrument(skip_all, fields(process_id = %request.process_id, message_tx_id = %request.message_tx_id))]
    pub async fn load_message_meta(&self, request: &LoadRequest) -> Result<MessageMetaResult, LoadError> {
        let LoadRequest {
            process_id,
            message_tx_id,
        } = request;
        let fail = |stage: Stage, source: LoadFailure| LoadError {
            stage,
            process_id: process_id.clone(),
            message_tx_id: message_tx_id.clone(),
            source,
        };

        let location = self.resolver.resolve_location(process_id).await.map_err(|err| {
            let stage = match err {
                ResolveError::Lookup(_) => Stage::Directory,
                ResolveError::Location(_) => Stage::Locate,
            };
            fail(stage, err.into())
        })?;

        let su_url = trim_trailing_slash(&location.url);
        let raw = self
            .fetcher
            .fetch_message_meta(su_url, process_id, message_tx_id)
            .await
            .map_err(|err| fail(Stage::Fetch, LoadFailure::Fetch(err)))?;

        let meta = parse_message_meta(raw).map_err(|err| fail(Stage::Validate, LoadFailure::Validation(err)))?;
        debug!(
            timestamp = %meta.timestamp,
            sequence_number = %meta.sequence_number,
            su_url,
            "loaded message meta"
        );
        Ok(meta)
    }

    /// Run independent loads concurrently, bounded by `max_concurrency`.
    /// Results come back in request order.
    pub async fn load_many(&self, requests: &[LoadRequest]) -> Vec<Result<MessageMetaResult, LoadError>> {
        stream::iter(requests)
            .map(|request| self.load_message_meta(request))
            .buffered(self.config.max_concurrency.max(1))
            .collect()
            .await
    }
}
