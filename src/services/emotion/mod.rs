//! Emotion classification pipeline: keyword scorer, hosted-model classifier,
//! and the analyzer that falls back from the latter to the former.

pub mod ai;
pub mod analyzer;
pub mod keywords;
pub mod model;

pub use analyzer::{AiOutcome, AnalysisFailure, EmotionAnalyzer, PreviewError};
pub use keywords::classify_by_keywords;

/// Why the AI tier could not produce a result.
#[derive(Debug, thiserror::Error)]
pub enum AiError {
    #[error("language model API key not configured")]
    MissingCredential,

    #[error("language model request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("language model returned {status}: {body}")]
    Upstream { status: u16, body: String },

    #[error("malformed language model reply: {0}")]
    MalformedReply(String),

    #[error("language model chose an unsupported emotion: {0:?}")]
    UnknownEmotion(String),
}
