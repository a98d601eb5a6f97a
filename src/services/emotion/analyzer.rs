//! Two-tier classification policy.
//!
//! ```text
//! START -> TRY_AI -> SUCCESS
//!                 -> FAIL -> TRY_KEYWORDS -> SUCCESS
//!                                         -> FAIL -> ERROR_RESULT (preview only)
//! ```
//!
//! The AI tier is attempted exactly once per call. `classify` never fails;
//! `preview` surfaces a `PreviewError` only when every keyword attempt fails.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use serde::Serialize;

use crate::config::AiConfig;
use crate::models::emotion::ClassificationResult;
use crate::services::emotion::ai::AiClassifier;
use crate::services::emotion::keywords::classify_by_keywords;
use crate::services::emotion::model::{HostedModelClient, LanguageModel};
use crate::services::emotion::AiError;

pub const AI_UNAVAILABLE_SUFFIX: &str = " (AI analysis temporarily unavailable)";

/// Result of the AI tier. The fallback decision branches on this.
#[derive(Debug)]
pub enum AiOutcome {
    Classified(ClassificationResult),
    Unavailable(AiError),
}

#[derive(Debug, thiserror::Error)]
pub enum AnalysisFailure {
    #[error(transparent)]
    Ai(#[from] AiError),

    #[error("keyword analysis panicked: {0}")]
    KeywordPanic(String),
}

/// Both keyword attempts of a preview failed.
#[derive(Debug, thiserror::Error, Serialize)]
#[error("Analysis failed: {primary}; fallback failed: {fallback}")]
pub struct PreviewError {
    #[serde(rename = "error")]
    pub primary: String,
    #[serde(rename = "fallback_error")]
    pub fallback: String,
}

type KeywordTier = fn(&str) -> ClassificationResult;

#[derive(Clone)]
pub struct EmotionAnalyzer {
    ai: AiClassifier,
    keywords: KeywordTier,
}

impl EmotionAnalyzer {
    pub fn new(model: Option<Arc<dyn LanguageModel>>) -> Self {
        Self {
            ai: AiClassifier::new(model),
            keywords: classify_by_keywords,
        }
    }

    /// Builds the shared model client once; no API key leaves the AI tier
    /// unconfigured so every call goes straight to keywords.
    pub fn from_config(config: &AiConfig) -> Result<Self, AiError> {
        let model = HostedModelClient::from_config(config)?
            .map(|client| Arc::new(client) as Arc<dyn LanguageModel>);
        if model.is_none() {
            tracing::info!("No language model API key configured, using keyword analysis only");
        }
        Ok(Self::new(model))
    }

    #[cfg(test)]
    fn with_keyword_tier(mut self, keywords: KeywordTier) -> Self {
        self.keywords = keywords;
        self
    }

    pub fn ai_configured(&self) -> bool {
        self.ai.is_configured()
    }

    pub async fn attempt_ai(&self, text: &str) -> AiOutcome {
        match self.ai.classify(text).await {
            Ok(result) => AiOutcome::Classified(result),
            Err(e) => AiOutcome::Unavailable(e),
        }
    }

    pub async fn classify(&self, text: &str) -> ClassificationResult {
        match self.attempt_ai(text).await {
            AiOutcome::Classified(result) => result,
            AiOutcome::Unavailable(reason) => {
                tracing::warn!(error = %reason, "AI emotion analysis failed, using keyword fallback");
                annotate((self.keywords)(text))
            }
        }
    }

    pub async fn preview(&self, text: &str) -> Result<ClassificationResult, PreviewError> {
        let reason = match self.attempt_ai(text).await {
            AiOutcome::Classified(result) => return Ok(result),
            AiOutcome::Unavailable(reason) => reason,
        };
        tracing::warn!(error = %reason, "AI emotion analysis failed, using keyword fallback");

        let primary = match self.guarded_keywords(text) {
            Ok(result) => return Ok(annotate(result)),
            Err(e) => e,
        };
        tracing::error!(error = %primary, ai_error = %reason, "Keyword fallback failed, retrying");

        self.guarded_keywords(text).map_err(|fallback| PreviewError {
            primary: primary.to_string(),
            fallback: fallback.to_string(),
        })
    }

    fn guarded_keywords(&self, text: &str) -> Result<ClassificationResult, AnalysisFailure> {
        let keywords = self.keywords;
        panic::catch_unwind(AssertUnwindSafe(|| keywords(text)))
            .map_err(|payload| AnalysisFailure::KeywordPanic(panic_message(payload)))
    }
}

fn annotate(mut result: ClassificationResult) -> ClassificationResult {
    result.analysis.push_str(AI_UNAVAILABLE_SUFFIX);
    result
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
