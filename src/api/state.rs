use std::sync::Arc;

use crate::answer::SynonymTable;
use crate::storage::{CrawlSource, ProgressSink};
use crate::timing::Clock;

#[derive(Clone)]
pub struct AppState {
    pub crawls: Arc<dyn CrawlSource>,
    pub progress: Arc<dyn ProgressSink>,
    pub synonyms: Arc<SynonymTable>,
    pub clock: Arc<dyn Clock>,
}
