use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::models::emotion::Emotion;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct JournalEntry {
    pub id: Uuid,
    pub date: DateTime<Utc>,
    pub content: String,
    pub emotion: Emotion,
    pub analysis: Option<String>,
}

impl JournalEntry {
    pub fn new(content: String, emotion: Emotion, analysis: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            date: Utc::now(),
            content,
            emotion,
            analysis,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateJournalEntryRequest {
    #[validate(custom = "crate::models::not_blank")]
    pub content: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct JournalQuery {
    pub search: Option<String>,
    pub emotion: Option<Emotion>,
}

impl JournalQuery {
    /// Case-insensitive content search combined with an exact emotion match.
    pub fn matches(&self, entry: &JournalEntry) -> bool {
        let matches_search = match self.search.as_deref() {
            Some(term) if !term.is_empty() => entry
                .content
                .to_lowercase()
                .contains(&term.to_lowercase()),
            _ => true,
        };
        let matches_emotion = self.emotion.map_or(true, |e| entry.emotion == e);
        matches_search && matches_emotion
    }
}
