use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Habit {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub category: HabitCategory,
    pub created_at: DateTime<Utc>,
    /// Sorted ascending, no duplicates.
    pub completed_dates: Vec<NaiveDate>,
}

#[derive(Debug, Default, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "habit_category", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum HabitCategory {
    Mindfulness,
    Physical,
    Social,
    #[sqlx(rename = "self-care")]
    #[serde(rename = "self-care")]
    #[default]
    SelfCare,
}

impl Habit {
    pub fn new(name: String, description: Option<String>, category: HabitCategory) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            description,
            category,
            created_at: Utc::now(),
            completed_dates: Vec::new(),
        }
    }

    /// Adds `date` if absent, removes it if present.
    pub fn toggle_completion(&mut self, date: NaiveDate) {
        match self.completed_dates.binary_search(&date) {
            Ok(idx) => {
                self.completed_dates.remove(idx);
            }
            Err(idx) => self.completed_dates.insert(idx, date),
        }
    }

    pub fn is_completed_on(&self, date: NaiveDate) -> bool {
        self.completed_dates.binary_search(&date).is_ok()
    }

    pub fn apply(&mut self, update: UpdateHabitRequest) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(description) = update.description {
            self.description = Some(description);
        }
        if let Some(category) = update.category {
            self.category = category;
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateHabitRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,
    pub description: Option<String>,
    pub category: Option<HabitCategory>,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateHabitRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<HabitCategory>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ToggleCompletionRequest {
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
pub struct HabitWithStatus {
    #[serde(flatten)]
    pub habit: Habit,
    pub completed_today: bool,
}

/// Starter habits written when the collection is empty.
pub fn default_habits() -> Vec<Habit> {
    vec![
        Habit::new(
            "Drink Water".into(),
            Some("Drink at least 8 glasses of water throughout the day".into()),
            HabitCategory::SelfCare,
        ),
        Habit::new(
            "5-Minute Meditation".into(),
            Some("Take 5 minutes to meditate and center yourself".into()),
            HabitCategory::Mindfulness,
        ),
        Habit::new(
            "Stretching".into(),
            Some("Do some gentle stretching to release tension".into()),
            HabitCategory::Physical,
        ),
    ]
}
