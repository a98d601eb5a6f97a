use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::models::emotion::Emotion;

/// One mood sample per calendar day; `date` is the natural key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct MoodEntry {
    pub id: Uuid,
    pub date: NaiveDate,
    pub emotion: Emotion,
    pub intensity: i32,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpsertMoodEntryRequest {
    pub date: Option<NaiveDate>,
    pub emotion: Emotion,
    #[validate(range(min = 1, max = 10, message = "Intensity must be between 1 and 10"))]
    pub intensity: i32,
    #[validate(length(max = 2000, message = "Notes must be at most 2000 characters"))]
    pub notes: Option<String>,
}

impl UpsertMoodEntryRequest {
    pub fn into_entry(self, today: NaiveDate) -> MoodEntry {
        MoodEntry {
            id: Uuid::new_v4(),
            date: self.date.unwrap_or(today),
            emotion: self.emotion,
            intensity: self.intensity,
            notes: self.notes.filter(|n| !n.trim().is_empty()),
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct MoodQuery {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl MoodQuery {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start_date.map_or(true, |start| date >= start)
            && self.end_date.map_or(true, |end| date <= end)
    }
}
