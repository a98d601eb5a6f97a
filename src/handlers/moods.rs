use axum::{
    extract::{Query, State},
    Json,
};
use chrono::Utc;
use validator::Validate;

use crate::error::AppResult;
use crate::models::mood::{MoodEntry, MoodQuery, UpsertMoodEntryRequest};
use crate::AppState;

/// One entry per day: a second save for the same date replaces the first.
pub async fn upsert_mood_entry(
    State(state): State<AppState>,
    Json(body): Json<UpsertMoodEntryRequest>,
) -> AppResult<Json<MoodEntry>> {
    body.validate()?;

    let entry = body.into_entry(Utc::now().date_naive());
    let entry = state.store.upsert_mood_entry(entry).await?;

    tracing::debug!(date = %entry.date, emotion = %entry.emotion, "Mood entry saved");
    Ok(Json(entry))
}

pub async fn list_mood_entries(
    State(state): State<AppState>,
    Query(query): Query<MoodQuery>,
) -> Json<Vec<MoodEntry>> {
    let entries = state
        .store
        .list_mood_entries()
        .await
        .into_iter()
        .filter(|e| query.contains(e.date))
        .collect();

    Json(entries)
}
