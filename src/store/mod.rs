//! Persistence for journal entries, mood entries and habits.
//!
//! Reads never fail the caller: an unavailable backend degrades to an empty
//! collection (or an absent entry) and logs a warning. Writes report a
//! `StoreError`.

pub mod local;
pub mod remote;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::config::Config;
use crate::models::habit::{default_habits, Habit, UpdateHabitRequest};
use crate::models::journal::JournalEntry;
use crate::models::mood::MoodEntry;

pub use local::LocalStore;
pub use remote::RemoteStore;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait WellnessStore: Send + Sync {
    fn backend(&self) -> &'static str;

    async fn is_available(&self) -> bool;

    async fn append_journal_entry(&self, entry: JournalEntry) -> StoreResult<JournalEntry>;

    /// Newest first.
    async fn list_journal_entries(&self) -> Vec<JournalEntry>;

    async fn get_journal_entry(&self, id: Uuid) -> Option<JournalEntry>;

    /// Replaces emotion, intensity and notes of an existing entry for the
    /// same day; otherwise inserts.
    async fn upsert_mood_entry(&self, entry: MoodEntry) -> StoreResult<MoodEntry>;

    /// Ascending by date.
    async fn list_mood_entries(&self) -> Vec<MoodEntry>;

    async fn append_habit(&self, habit: Habit) -> StoreResult<Habit>;

    /// Creation order.
    async fn list_habits(&self) -> Vec<Habit>;

    async fn update_habit(&self, id: Uuid, update: UpdateHabitRequest) -> StoreResult<Option<Habit>>;

    async fn delete_habit(&self, id: Uuid) -> StoreResult<bool>;

    async fn toggle_habit_completion(&self, id: Uuid, date: NaiveDate)
        -> StoreResult<Option<Habit>>;
}

/// Remote store when configured and reachable, local store otherwise.
pub async fn open_store(config: &Config) -> StoreResult<Arc<dyn WellnessStore>> {
    if let Some(remote) = &config.remote_store {
        match RemoteStore::connect(remote).await {
            Ok(store) => {
                tracing::info!("Using remote store");
                return Ok(Arc::new(store));
            }
            Err(e) => {
                tracing::warn!(error = %e, "Remote store unavailable, using local store");
            }
        }
    }

    let store = LocalStore::open(&config.data_dir).await?;
    tracing::info!(data_dir = %config.data_dir.display(), "Using local store");
    Ok(Arc::new(store))
}

/// Writes the starter habits when the collection is empty.
pub async fn seed_default_habits(store: &dyn WellnessStore) -> StoreResult<usize> {
    if !store.list_habits().await.is_empty() {
        return Ok(0);
    }

    let habits = default_habits();
    let count = habits.len();
    for habit in habits {
        store.append_habit(habit).await?;
    }
    tracing::info!(count, "Seeded default habits");
    Ok(count)
}
