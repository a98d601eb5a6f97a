//! JSON-document store standing in for browser storage.
//!
//! Each collection lives in its own document under the data directory and
//! is loaded once at open. Every write rewrites the affected document via a
//! temp file and rename.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{StoreResult, WellnessStore};
use crate::models::habit::{Habit, UpdateHabitRequest};
use crate::models::journal::JournalEntry;
use crate::models::mood::MoodEntry;

const JOURNAL_DOC: &str = "journal_entries.json";
const MOOD_DOC: &str = "mood_entries.json";
const HABIT_DOC: &str = "habits.json";

#[derive(Debug, Default)]
struct Collections {
    /// Newest first.
    journal: Vec<JournalEntry>,
    /// Ascending by date, one per day.
    moods: Vec<MoodEntry>,
    habits: Vec<Habit>,
}

#[derive(Debug)]
pub struct LocalStore {
    dir: Option<PathBuf>,
    data: RwLock<Collections>,
}

impl LocalStore {
    /// Nothing touches disk; used by tests and as a last resort.
    pub fn in_memory() -> Self {
        Self {
            dir: None,
            data: RwLock::new(Collections::default()),
        }
    }

    pub async fn open(dir: impl AsRef<Path>) -> StoreResult<Self> {
        let dir = dir.as_ref().to_path_buf();
        tokio::fs::create_dir_all(&dir).await?;

        let mut journal: Vec<JournalEntry> = load_document(&dir, JOURNAL_DOC).await;
        journal.sort_by(|a, b| b.date.cmp(&a.date));
        let mut moods: Vec<MoodEntry> = load_document(&dir, MOOD_DOC).await;
        moods.sort_by_key(|m| m.date);
        moods.dedup_by_key(|m| m.date);
        let habits = load_document(&dir, HABIT_DOC).await;

        Ok(Self {
            dir: Some(dir),
            data: RwLock::new(Collections {
                journal,
                moods,
                habits,
            }),
        })
    }

    async fn persist<T: Serialize>(&self, name: &str, items: &[T]) -> StoreResult<()> {
        let Some(dir) = &self.dir else {
            return Ok(());
        };
        let bytes = serde_json::to_vec_pretty(items)?;
        let tmp = dir.join(format!("{name}.tmp"));
        tokio::fs::write(&tmp, bytes).await?;
        tokio::fs::rename(&tmp, dir.join(name)).await?;
        Ok(())
    }

    /// Edits a copy of the habit list; memory only changes once the copy is on disk.
    async fn modify_habit(
        &self,
        id: Uuid,
        change: impl FnOnce(&mut Habit),
    ) -> StoreResult<Option<Habit>> {
        let mut data = self.data.write().await;
        let mut habits = data.habits.clone();
        let Some(habit) = habits.iter_mut().find(|h| h.id == id) else {
            return Ok(None);
        };
        change(habit);
        let updated = habit.clone();
        self.persist(HABIT_DOC, &habits).await?;
        data.habits = habits;
        Ok(Some(updated))
    }
}

/// Missing or unreadable documents load as empty collections.
async fn load_document<T: DeserializeOwned>(dir: &Path, name: &str) -> Vec<T> {
    let path = dir.join(name);
    let bytes = match tokio::fs::read(&path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Vec::new(),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Failed to read document, starting empty");
            return Vec::new();
        }
    };

    serde_json::from_slice(&bytes).unwrap_or_else(|e| {
        tracing::warn!(path = %path.display(), error = %e, "Corrupt document, starting empty");
        Vec::new()
    })
}

#[async_trait]
impl WellnessStore for LocalStore {
    fn backend(&self) -> &'static str {
        "local"
    }

    async fn is_available(&self) -> bool {
        match &self.dir {
            Some(dir) => tokio::fs::metadata(dir).await.is_ok(),
            None => true,
        }
    }

    async fn append_journal_entry(&self, entry: JournalEntry) -> StoreResult<JournalEntry> {
        let mut data = self.data.write().await;
        let mut journal = data.journal.clone();
        journal.insert(0, entry.clone());
        self.persist(JOURNAL_DOC, &journal).await?;
        data.journal = journal;
        Ok(entry)
    }

    async fn list_journal_entries(&self) -> Vec<JournalEntry> {
        self.data.read().await.journal.clone()
    }

    async fn get_journal_entry(&self, id: Uuid) -> Option<JournalEntry> {
        self.data
            .read()
            .await
            .journal
            .iter()
            .find(|e| e.id == id)
            .cloned()
    }

    async fn upsert_mood_entry(&self, entry: MoodEntry) -> StoreResult<MoodEntry> {
        let mut data = self.data.write().await;
        let mut moods = data.moods.clone();
        let stored = match moods.binary_search_by_key(&entry.date, |m| m.date) {
            Ok(idx) => {
                let existing = &mut moods[idx];
                existing.emotion = entry.emotion;
                existing.intensity = entry.intensity;
                existing.notes = entry.notes;
                existing.clone()
            }
            Err(idx) => {
                moods.insert(idx, entry.clone());
                entry
            }
        };
        self.persist(MOOD_DOC, &moods).await?;
        data.moods = moods;
        Ok(stored)
    }

    async fn list_mood_entries(&self) -> Vec<MoodEntry> {
        self.data.read().await.moods.clone()
    }

    async fn append_habit(&self, habit: Habit) -> StoreResult<Habit> {
        let mut data = self.data.write().await;
        let mut habits = data.habits.clone();
        habits.push(habit.clone());
        self.persist(HABIT_DOC, &habits).await?;
        data.habits = habits;
        Ok(habit)
    }

    async fn list_habits(&self) -> Vec<Habit> {
        self.data.read().await.habits.clone()
    }

    async fn update_habit(&self, id: Uuid, update: UpdateHabitRequest) -> StoreResult<Option<Habit>> {
        self.modify_habit(id, |habit| habit.apply(update)).await
    }

    async fn delete_habit(&self, id: Uuid) -> StoreResult<bool> {
        let mut data = self.data.write().await;
        let mut habits = data.habits.clone();
        habits.retain(|h| h.id != id);
        if habits.len() == data.habits.len() {
            return Ok(false);
        }
        self.persist(HABIT_DOC, &habits).await?;
        data.habits = habits;
        Ok(true)
    }

    async fn toggle_habit_completion(
        &self,
        id: Uuid,
        date: NaiveDate,
    ) -> StoreResult<Option<Habit>> {
        self.modify_habit(id, |habit| habit.toggle_completion(date)).await
    }
}
