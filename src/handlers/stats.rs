use axum::{extract::State, Json};
use chrono::Utc;

use crate::services::stats::{journal_stats, mood_stats, JournalStats, MoodStats};
use crate::AppState;

pub async fn get_journal_stats(State(state): State<AppState>) -> Json<JournalStats> {
    let entries = state.store.list_journal_entries().await;
    Json(journal_stats(&entries, Utc::now()))
}

pub async fn get_mood_stats(State(state): State<AppState>) -> Json<MoodStats> {
    let entries = state.store.list_mood_entries().await;
    Json(mood_stats(&entries))
}
