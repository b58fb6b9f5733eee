//! Message metadata loading for a compute unit.
//!
//! Given a process id and a message id, resolve which scheduler holds the
//! process's message log and load that message's position in it
//! (timestamp, sequence number). The process directory only supplies an
//! optional scheduler hint; when it fails, resolution falls back to an
//! unhinted locate. Every collaborator answer is validated before it moves
//! downstream.
//!
//! Collaborators (directory, locator, scheduler client) are injected as
//! [`ProcessDirectory`], [`SchedulerLocator`] and [`MessageMetaSource`].

pub mod cache;
pub mod config;
pub mod directory;
pub mod errors;
pub mod fetch;
pub mod locator;
pub mod pipeline;
pub mod resolve;
pub mod schemas;
pub mod types;
pub mod util;
pub mod validate;

pub use cache::CachedDirectory;
pub use config::{ConfigError, DirectoryFailurePolicy, LoaderConfig};
pub use directory::{DirectoryResolver, DynDirectory, ProcessDirectory};
pub use errors::{
    DirectoryError, ErrorKind, FetchError, LoadError, LoadFailure, LocateError, ResolveError,
    SourceError, Stage, ValidationError,
};
pub use fetch::{DynMetaSource, MessageMetaSource, MetaFetcher};
pub use locator::{CoordinatorLocator, DynLocator, SchedulerLocator};
pub use pipeline::MessageMetaLoader;
pub use resolve::LocationResolver;
pub use types::{
    CoordinatorLocation, LoadRequest, MessageId, MessageMetaResult, ProcessId, ProcessRecord,
    RawMetaResult, SCHEDULER_TAG, SchedulerHint, Tag,
};
pub use util::{first_tag_named, trim_trailing_slash};
