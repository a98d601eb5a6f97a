use axum::{
    extract::{Path, Query, State},
    http::header,
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::models::journal::{CreateJournalEntryRequest, JournalEntry, JournalQuery};
use crate::AppState;

/// Classifies the content, then stores it with the resulting label.
pub async fn create_entry(
    State(state): State<AppState>,
    Json(body): Json<CreateJournalEntryRequest>,
) -> AppResult<Json<JournalEntry>> {
    body.validate()?;

    let result = state.analyzer.classify(&body.content).await;
    tracing::info!(
        emotion = %result.emotion,
        method = ?result.method,
        confidence = result.confidence,
        "Journal entry classified"
    );

    let entry = JournalEntry::new(body.content, result.emotion, Some(result.analysis));
    let entry = state.store.append_journal_entry(entry).await?;

    Ok(Json(entry))
}

pub async fn list_entries(
    State(state): State<AppState>,
    Query(query): Query<JournalQuery>,
) -> Json<Vec<JournalEntry>> {
    let entries = state
        .store
        .list_journal_entries()
        .await
        .into_iter()
        .filter(|e| query.matches(e))
        .collect();

    Json(entries)
}

/// Malformed ids are reported as missing entries.
pub async fn get_entry(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<JournalEntry>> {
    let not_found = || AppError::NotFound("Journal entry not found".into());
    let id = Uuid::parse_str(&id).map_err(|_| not_found())?;

    let entry = state
        .store
        .get_journal_entry(id)
        .await
        .ok_or_else(not_found)?;

    Ok(Json(entry))
}

pub async fn export_entries(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let entries = state.store.list_journal_entries().await;
    let body = serde_json::to_string_pretty(&entries).map_err(anyhow::Error::from)?;
    let disposition = format!(
        "attachment; filename=\"journal-entries-{}.json\"",
        Utc::now().date_naive()
    );

    Ok((
        [
            (header::CONTENT_TYPE, "application/json".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    ))
}
