use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;

use crate::api::state::AppState;
use crate::api::ApiError;
use crate::models::CrawlStatus;
use crate::timing::{calculate_crawl_status, CrawlSnapshot};

#[derive(Debug, Serialize)]
pub struct CrawlSummary {
    pub id: String,
    pub name: String,
    pub city: Option<String>,
    pub stop_count: usize,
    pub status: CrawlStatus,
}

#[derive(Debug, Serialize)]
pub struct CrawlListResponse {
    pub crawls: Vec<CrawlSummary>,
}

pub async fn list_crawls(State(state): State<AppState>) -> Result<Json<CrawlListResponse>, ApiError> {
    let now = state.clock.now();
    let crawls = state
        .crawls
        .crawls()?
        .into_iter()
        .map(|crawl| CrawlSummary {
            status: calculate_crawl_status(
                crawl.schedule.start_time.as_deref(),
                &crawl.schedule.duration,
                &crawl.schedule.stops,
                &now,
            ),
            id: crawl.id.as_str().to_string(),
            stop_count: crawl.schedule.stops.len(),
            name: crawl.name,
            city: crawl.city,
        })
        .collect();

    Ok(Json(CrawlListResponse { crawls }))
}

pub async fn get_crawl(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<CrawlSnapshot>, ApiError> {
    let crawl = state
        .crawls
        .crawl(&id)?
        .ok_or_else(|| ApiError::NotFound(format!("Crawl not found: {}", id)))?;

    Ok(Json(CrawlSnapshot::evaluate(&crawl, &state.clock.now())))
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{get_json, setup_state};
    use crate::api::build_router;
    use crate::models::{CrawlRecord, CrawlScheduleInput, StopDefinition};
    use axum::http::StatusCode;

    fn crawl(id: &str, start: Option<&str>) -> CrawlRecord {
        CrawlRecord::new(
            id,
            format!("Crawl {}", id),
            CrawlScheduleInput::new(start.map(String::from), "2 hours").with_stops(
                (1..=4)
                    .map(|n| StopDefinition::new(n).with_answer("secret"))
                    .collect(),
            ),
        )
        .with_city("New York")
    }

    #[tokio::test]
    async fn test_list_crawls_with_status() {
        let tmp = tempfile::tempdir().unwrap();
        let (state, _) = setup_state(
            tmp.path(),
            &[
                crawl("ongoing", Some("2025-06-15 18:00")),
                crawl("later", Some("2025-06-16 10:00")),
                crawl("done", Some("2025-06-14 10:00")),
                crawl("unscheduled", None),
            ],
        );

        let (status, json) = get_json(build_router(state), "/api/crawls").await;
        assert_eq!(status, StatusCode::OK);

        let states: Vec<&str> = json["crawls"]
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c["status"]["state"].as_str().unwrap())
            .collect();
        assert_eq!(states, vec!["ongoing", "upcoming", "completed", "unknown"]);
        assert_eq!(json["crawls"][0]["stop_count"], 4);
        assert_eq!(json["crawls"][0]["status"]["current_stop_index"], 2);
    }

    #[tokio::test]
    async fn test_get_crawl_snapshot() {
        let tmp = tempfile::tempdir().unwrap();
        let (state, _) = setup_state(tmp.path(), &[crawl("c1", Some("2025-06-15 18:00"))]);

        let (status, json) = get_json(build_router(state), "/api/crawls/c1").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["crawl_id"], "c1");
        assert_eq!(json["status"]["elapsed"], "1h 10m in");
        assert_eq!(json["stops"][2]["timing"]["is_active"], true);
        assert_eq!(json["stops"][0]["timing"]["is_completed"], true);
        assert!(!json.to_string().contains("secret"));
    }

    #[tokio::test]
    async fn test_get_crawl_not_found() {
        let tmp = tempfile::tempdir().unwrap();
        let (state, _) = setup_state(tmp.path(), &[]);

        let (status, json) = get_json(build_router(state), "/api/crawls/missing").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"]["code"], "NOT_FOUND");
    }
}
