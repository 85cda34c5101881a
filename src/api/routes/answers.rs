use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::answer::{match_answer, AnswerMatch};
use crate::api::state::AppState;
use crate::api::ApiError;
use crate::models::StopCompletion;
use crate::timing::CrawlSnapshot;

#[derive(Debug, Deserialize)]
pub struct AnswerRequest {
    pub user_id: String,
    pub answer: String,
}

#[derive(Debug, Serialize)]
pub struct AnswerResponse {
    pub correct: bool,
    /// Which matching stage accepted the answer
    pub matched: Option<AnswerMatch>,
    /// False when the answer was wrong or the stop was already completed
    pub recorded: bool,
}

pub async fn submit_answer(
    State(state): State<AppState>,
    Path((id, stop_number)): Path<(String, u32)>,
    Json(request): Json<AnswerRequest>,
) -> Result<Json<AnswerResponse>, ApiError> {
    if request.user_id.trim().is_empty() {
        return Err(ApiError::BadRequest("user_id is required".to_string()));
    }

    let crawl = state
        .crawls
        .crawl(&id)?
        .ok_or_else(|| ApiError::NotFound(format!("Crawl not found: {}", id)))?;

    let stop = crawl
        .schedule
        .stop(stop_number)
        .ok_or_else(|| ApiError::NotFound(format!("Stop {} not found in crawl {}", stop_number, id)))?;

    let correct_answer = stop.answer.clone().ok_or_else(|| {
        ApiError::BadRequest(format!(
            "Stop {} ({}) has no answer to check",
            stop_number, stop.kind
        ))
    })?;

    let now = state.clock.now();
    let snapshot = CrawlSnapshot::evaluate(&crawl, &now);
    if let Some(gated) = snapshot.stop(stop_number).filter(|s| !s.reveal.available) {
        return Err(ApiError::BadRequest(format!(
            "Stop {} is not revealed yet{}",
            stop_number,
            gated
                .reveal
                .countdown
                .as_deref()
                .map(|c| format!(" ({} remaining)", c))
                .unwrap_or_default()
        )));
    }

    let matched = match_answer(&request.answer, &correct_answer, &state.synonyms);
    let mut recorded = false;

    if matched.is_some() {
        let completion = StopCompletion::new(
            crawl.id.clone(),
            request.user_id.clone(),
            stop_number,
            request.answer.trim().to_string(),
            now.with_timezone(&Utc),
        );
        recorded = state.progress.record_completion(&completion)?;
    }

    info!(
        crawl = %crawl.id,
        stop = stop_number,
        correct = matched.is_some(),
        recorded,
        "Answer submitted"
    );

    Ok(Json(AnswerResponse {
        correct: matched.is_some(),
        matched,
        recorded,
    }))
}

#[derive(Debug, Deserialize)]
pub struct ProgressParams {
    pub user_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ProgressResponse {
    pub crawl_id: String,
    pub user_id: String,
    pub completed_stops: Vec<u32>,
    pub completions: Vec<StopCompletion>,
}

pub async fn get_progress(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<ProgressParams>,
) -> Result<Json<ProgressResponse>, ApiError> {
    let user_id = params
        .user_id
        .filter(|u| !u.trim().is_empty())
        .ok_or_else(|| ApiError::BadRequest("user_id is required".to_string()))?;

    if state.crawls.crawl(&id)?.is_none() {
        return Err(ApiError::NotFound(format!("Crawl not found: {}", id)));
    }

    let completions = state.progress.completions_for(&id, &user_id)?;
    let mut completed_stops: Vec<u32> = completions.iter().map(|c| c.stop_number).collect();
    completed_stops.sort_unstable();

    Ok(Json(ProgressResponse {
        crawl_id: id,
        user_id,
        completed_stops,
        completions,
    }))
}
