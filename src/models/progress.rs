//! User progress events written to the progress store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{CompletionId, CrawlId, EntityId};

/// A user finished a stop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StopCompletion {
    /// Deterministic from (crawl, user, stop) so repeats collapse
    pub id: CompletionId,
    pub crawl_id: CrawlId,
    pub user_id: String,
    pub stop_number: u32,
    pub user_answer: String,
    pub completed_at: DateTime<Utc>,
}

impl StopCompletion {
    pub fn new(
        crawl_id: CrawlId,
        user_id: String,
        stop_number: u32,
        user_answer: String,
        completed_at: DateTime<Utc>,
    ) -> Self {
        let id = EntityId::generate(&[crawl_id.as_str(), &user_id, &stop_number.to_string()]);
        Self {
            id,
            crawl_id,
            user_id,
            stop_number,
            user_answer,
            completed_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_completion_id_ignores_answer_and_time() {
        let at = Utc.with_ymd_and_hms(2025, 6, 15, 18, 0, 0).unwrap();
        let a = StopCompletion::new("c1".into(), "u1".into(), 2, "ESB".into(), at);
        let b = StopCompletion::new(
            "c1".into(),
            "u1".into(),
            2,
            "empire state".into(),
            at + chrono::Duration::minutes(3),
        );
        assert_eq!(a.id, b.id);

        let other_stop = StopCompletion::new("c1".into(), "u1".into(), 3, "ESB".into(), at);
        assert_ne!(a.id, other_stop.id);
    }
}
