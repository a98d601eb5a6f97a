use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use uuid::Uuid;

use super::{StoreResult, WellnessStore};
use crate::config::RemoteStoreConfig;
use crate::models::habit::{Habit, UpdateHabitRequest};
use crate::models::journal::JournalEntry;
use crate::models::mood::MoodEntry;

#[derive(Debug, Clone)]
pub struct RemoteStore {
    db: PgPool,
}

impl RemoteStore {
    /// Connects and applies pending migrations.
    pub async fn connect(config: &RemoteStoreConfig) -> StoreResult<Self> {
        let db = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
            .connect(&config.database_url)
            .await?;

        sqlx::migrate!("./migrations")
            .run(&db)
            .await
            .map_err(sqlx::Error::from)?;
        tracing::info!("Database migrations applied");

        Ok(Self { db })
    }
}

#[async_trait]
impl WellnessStore for RemoteStore {
    fn backend(&self) -> &'static str {
        "remote"
    }

    async fn is_available(&self) -> bool {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.db)
            .await
            .is_ok()
    }

    async fn append_journal_entry(&self, entry: JournalEntry) -> StoreResult<JournalEntry> {
        let entry = sqlx::query_as::<_, JournalEntry>(
            r#"
            INSERT INTO journal_entries (id, date, content, emotion, analysis)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(entry.id)
        .bind(entry.date)
        .bind(&entry.content)
        .bind(entry.emotion)
        .bind(&entry.analysis)
        .fetch_one(&self.db)
        .await?;

        Ok(entry)
    }

    async fn list_journal_entries(&self) -> Vec<JournalEntry> {
        sqlx::query_as::<_, JournalEntry>("SELECT * FROM journal_entries ORDER BY date DESC")
            .fetch_all(&self.db)
            .await
            .unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Failed to fetch journal entries");
                Vec::new()
            })
    }

    async fn get_journal_entry(&self, id: Uuid) -> Option<JournalEntry> {
        sqlx::query_as::<_, JournalEntry>("SELECT * FROM journal_entries WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.db)
            .await
            .unwrap_or_else(|e| {
                tracing::warn!(error = %e, %id, "Failed to fetch journal entry");
                None
            })
    }

    async fn upsert_mood_entry(&self, entry: MoodEntry) -> StoreResult<MoodEntry> {
        let entry = sqlx::query_as::<_, MoodEntry>(
            r#"
            INSERT INTO mood_entries (id, date, emotion, intensity, notes, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (date) DO UPDATE SET
                emotion = EXCLUDED.emotion,
                intensity = EXCLUDED.intensity,
                notes = EXCLUDED.notes
            RETURNING *
            "#,
        )
        .bind(entry.id)
        .bind(entry.date)
        .bind(entry.emotion)
        .bind(entry.intensity)
        .bind(&entry.notes)
        .bind(entry.created_at)
        .fetch_one(&self.db)
        .await?;

        Ok(entry)
    }

    async fn list_mood_entries(&self) -> Vec<MoodEntry> {
        sqlx::query_as::<_, MoodEntry>("SELECT * FROM mood_entries ORDER BY date ASC")
            .fetch_all(&self.db)
            .await
            .unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Failed to fetch mood entries");
                Vec::new()
            })
    }

    async fn append_habit(&self, habit: Habit) -> StoreResult<Habit> {
        let habit = sqlx::query_as::<_, Habit>(
            r#"
            INSERT INTO habits (id, name, description, category, created_at, completed_dates)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(habit.id)
        .bind(&habit.name)
        .bind(&habit.description)
        .bind(habit.category)
        .bind(habit.created_at)
        .bind(&habit.completed_dates)
        .fetch_one(&self.db)
        .await?;

        Ok(habit)
    }

    async fn list_habits(&self) -> Vec<Habit> {
        sqlx::query_as::<_, Habit>("SELECT * FROM habits ORDER BY created_at ASC")
            .fetch_all(&self.db)
            .await
            .unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Failed to fetch habits");
                Vec::new()
            })
    }

    async fn update_habit(&self, id: Uuid, update: UpdateHabitRequest) -> StoreResult<Option<Habit>> {
        let habit = sqlx::query_as::<_, Habit>(
            r#"
            UPDATE habits SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                category = COALESCE($4, category)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&update.name)
        .bind(&update.description)
        .bind(update.category)
        .fetch_optional(&self.db)
        .await?;

        Ok(habit)
    }

    async fn delete_habit(&self, id: Uuid) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM habits WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn toggle_habit_completion(
        &self,
        id: Uuid,
        date: NaiveDate,
    ) -> StoreResult<Option<Habit>> {
        let habit = sqlx::query_as::<_, Habit>(
            r#"
            UPDATE habits SET completed_dates = CASE
                WHEN $2::date = ANY(completed_dates) THEN array_remove(completed_dates, $2::date)
                ELSE ARRAY(
                    SELECT d FROM unnest(array_append(completed_dates, $2::date)) AS d ORDER BY d
                )
            END
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(date)
        .fetch_optional(&self.db)
        .await?;

        Ok(habit)
    }
}
