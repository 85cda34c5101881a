//! Crawl definitions and user progress on the local filesystem.
//!
//! The engine only consumes these collaborators:
//! - [`CrawlSource`] supplies crawl records
//! - [`ProgressSink`] accepts stop completion events
//!
//! [`JsonlStore`] implements both over JSONL files in the data directory.

use std::path::PathBuf;
use thiserror::Error;

pub mod jsonl;
mod store;

pub use jsonl::{EntityType, JsonlReader, JsonlWriter};
pub use store::JsonlStore;

use crate::models::{CrawlRecord, StopCompletion};

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),
}

/// Configuration for storage paths.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
}

impl StorageConfig {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    pub fn entity_path(&self, entity: EntityType) -> PathBuf {
        self.data_dir.join(entity.filename())
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::new(PathBuf::from("./data"))
    }
}

/// Supplies crawl definitions.
pub trait CrawlSource: Send + Sync {
    /// All crawls, one record per id.
    fn crawls(&self) -> Result<Vec<CrawlRecord>, StorageError>;

    /// A single crawl by id.
    fn crawl(&self, id: &str) -> Result<Option<CrawlRecord>, StorageError> {
        Ok(self.crawls()?.into_iter().find(|c| c.id.as_str() == id))
    }
}

/// Accepts stop completion events.
pub trait ProgressSink: Send + Sync {
    /// Record a completion. Returns false if this user already completed the stop.
    fn record_completion(&self, completion: &StopCompletion) -> Result<bool, StorageError>;

    /// A user's completions for one crawl, in the order recorded.
    fn completions_for(
        &self,
        crawl_id: &str,
        user_id: &str,
    ) -> Result<Vec<StopCompletion>, StorageError>;
}
