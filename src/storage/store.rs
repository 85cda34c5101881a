use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::{Arc, Mutex};

use tracing::{info, warn};

use super::{
    CrawlSource, EntityType, JsonlReader, JsonlWriter, ProgressSink, StorageConfig, StorageError,
};
use crate::models::{CrawlRecord, StopCompletion};

/// Crawls and progress as JSONL files under one data directory.
///
/// Clones share one progress lock, so a completion is checked and appended
/// atomically across handler threads.
#[derive(Debug, Clone)]
pub struct JsonlStore {
    config: StorageConfig,
    progress_lock: Arc<Mutex<()>>,
}

impl JsonlStore {
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            progress_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Append crawl records. Later records replace earlier ones with the same id.
    pub fn save_crawls(&self, crawls: &[CrawlRecord]) -> Result<usize, StorageError> {
        for crawl in crawls {
            if let Err(e) = crawl.schedule.validate() {
                warn!(crawl = %crawl.id, error = %e, "Saving crawl with inconsistent stops");
            }
        }
        JsonlWriter::for_entity(&self.config, EntityType::Crawl).append_batch(crawls)
    }

    /// Load a JSON array of crawl records from `path` and save them.
    pub fn import_file(&self, path: &Path) -> Result<usize, StorageError> {
        if !path.exists() {
            return Err(StorageError::PathNotFound(path.to_path_buf()));
        }
        let contents = std::fs::read_to_string(path)?;
        let crawls: Vec<CrawlRecord> = serde_json::from_str(&contents)?;
        let count = self.save_crawls(&crawls)?;
        info!("Imported {} crawls from {:?}", count, path);
        Ok(count)
    }
}

/// Keep the last record for each id, in order of first appearance.
fn latest_by_id(records: Vec<CrawlRecord>) -> Vec<CrawlRecord> {
    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut latest: Vec<CrawlRecord> = Vec::new();

    for record in records {
        match positions.get(record.id.as_str()) {
            Some(&i) => latest[i] = record,
            None => {
                positions.insert(record.id.as_str().to_string(), latest.len());
                latest.push(record);
            }
        }
    }

    latest
}

impl CrawlSource for JsonlStore {
    fn crawls(&self) -> Result<Vec<CrawlRecord>, StorageError> {
        let records = JsonlReader::<CrawlRecord>::for_entity(&self.config, EntityType::Crawl)
            .read_all()?;
        let crawls = latest_by_id(records);

        for crawl in &crawls {
            if let Err(e) = crawl.schedule.validate() {
                warn!(crawl = %crawl.id, error = %e, "Crawl has inconsistent stops");
            }
        }

        Ok(crawls)
    }
}

impl ProgressSink for JsonlStore {
    fn record_completion(&self, completion: &StopCompletion) -> Result<bool, StorageError> {
        // A poisoned lock guards no data, so keep going.
        let _guard = self
            .progress_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let existing = self.completions_for(completion.crawl_id.as_str(), &completion.user_id)?;
        if existing.iter().any(|c| c.id == completion.id) {
            return Ok(false);
        }

        JsonlWriter::for_entity(&self.config, EntityType::StopCompletion).append(completion)?;
        info!(
            crawl = %completion.crawl_id,
            user = %completion.user_id,
            stop = completion.stop_number,
            "Recorded stop completion"
        );
        Ok(true)
    }

    fn completions_for(
        &self,
        crawl_id: &str,
        user_id: &str,
    ) -> Result<Vec<StopCompletion>, StorageError> {
        let reader = JsonlReader::<StopCompletion>::for_entity(&self.config, EntityType::StopCompletion);
        let matching =
            reader.read_where(|c| c.crawl_id.as_str() == crawl_id && c.user_id == user_id)?;

        // First completion of a stop wins.
        let mut seen = HashSet::new();
        Ok(matching
            .into_iter()
            .filter(|c| seen.insert(c.id.clone()))
            .collect())
    }
}
