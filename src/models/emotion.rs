use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
    sqlx::Type,
)]
#[sqlx(type_name = "emotion", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Emotion {
    Happy,
    Calm,
    Sad,
    Anxious,
    Angry,
    #[default]
    Neutral,
}

impl Emotion {
    /// Every label, in the order used for tie-breaking and reporting.
    pub const ALL: [Emotion; 6] = [
        Emotion::Happy,
        Emotion::Calm,
        Emotion::Sad,
        Emotion::Anxious,
        Emotion::Angry,
        Emotion::Neutral,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Emotion::Happy => "happy",
            Emotion::Calm => "calm",
            Emotion::Sad => "sad",
            Emotion::Anxious => "anxious",
            Emotion::Angry => "angry",
            Emotion::Neutral => "neutral",
        }
    }
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown emotion label: {0:?}")]
pub struct UnknownEmotion(pub String);

impl FromStr for Emotion {
    type Err = UnknownEmotion;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let label = s.trim().to_lowercase();
        Emotion::ALL
            .into_iter()
            .find(|e| e.as_str() == label)
            .ok_or_else(|| UnknownEmotion(s.to_string()))
    }
}

/// Provenance of a classification result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Method {
    Ai,
    Keywords,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub emotion: Emotion,
    pub confidence: f64,
    pub method: Method,
    pub analysis: String,
}
