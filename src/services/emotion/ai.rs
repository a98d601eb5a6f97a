use std::sync::Arc;

use serde::Deserialize;

use crate::models::emotion::{ClassificationResult, Emotion, Method};
use crate::services::emotion::model::LanguageModel;
use crate::services::emotion::AiError;

const DEFAULT_CONFIDENCE: f64 = 0.7;
const GENERIC_REASONING: &str = "The text was analyzed using advanced language understanding \
                                 to detect emotional patterns and context.";

/// Shape the model is asked to return.
#[derive(Debug, Deserialize)]
struct ModelVerdict {
    emotion: Option<String>,
    confidence: Option<f64>,
    reasoning: Option<String>,
}

#[derive(Clone, Default)]
pub struct AiClassifier {
    model: Option<Arc<dyn LanguageModel>>,
}

impl AiClassifier {
    pub fn new(model: Option<Arc<dyn LanguageModel>>) -> Self {
        Self { model }
    }

    pub fn is_configured(&self) -> bool {
        self.model.is_some()
    }

    /// Single round trip to the hosted model; no retry.
    pub async fn classify(&self, text: &str) -> Result<ClassificationResult, AiError> {
        let model = self.model.as_ref().ok_or(AiError::MissingCredential)?;
        let reply = model.complete(&build_prompt(text)).await?;
        parse_reply(&reply)
    }
}

pub fn build_prompt(text: &str) -> String {
    format!(
        r#"Analyze the emotional content of this text and determine the primary emotion.
Choose exactly one emotion from: happy, calm, sad, anxious, angry, neutral

Text: "{text}"

Respond with a JSON object containing:
- emotion: the primary emotion (one word from the list above)
- confidence: a number between 0 and 1 indicating confidence
- reasoning: brief explanation of why you chose this emotion

Example: {{"emotion": "happy", "confidence": 0.8, "reasoning": "The text contains positive language and expressions of joy"}}

Return ONLY the JSON object, no other text."#
    )
}

/// Returns the body of the first fenced code block, or the trimmed input
/// when there is none. An optional `json` info string is skipped.
pub fn strip_code_fence(reply: &str) -> &str {
    let trimmed = reply.trim();
    let Some(open) = trimmed.find("```") else {
        return trimmed;
    };
    let after_open = &trimmed[open + 3..];
    let body = after_open.strip_prefix("json").unwrap_or(after_open);
    match body.find("```") {
        Some(close) => body[..close].trim(),
        None => trimmed,
    }
}

pub fn parse_reply(reply: &str) -> Result<ClassificationResult, AiError> {
    let verdict: ModelVerdict = serde_json::from_str(strip_code_fence(reply))
        .map_err(|e| AiError::MalformedReply(e.to_string()))?;

    let label = verdict
        .emotion
        .ok_or_else(|| AiError::UnknownEmotion("<missing>".into()))?;
    let emotion: Emotion = label
        .parse()
        .map_err(|_| AiError::UnknownEmotion(label.clone()))?;

    let confidence = verdict.confidence.unwrap_or(DEFAULT_CONFIDENCE).clamp(0.0, 1.0);

    let reasoning = verdict
        .reasoning
        .filter(|r| !r.trim().is_empty())
        .unwrap_or_else(|| GENERIC_REASONING.to_string());

    Ok(ClassificationResult {
        emotion,
        confidence,
        method: Method::Ai,
        analysis: format!("AI analysis: {reasoning}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fenced_json_reply_is_unwrapped() {
        let reply = "```json\n{\"emotion\":\"sad\",\"confidence\":0.9,\"reasoning\":\"Mentions loss\"}\n```";
        let result = parse_reply(reply).unwrap();
        assert_eq!(result.emotion, Emotion::Sad);
        assert_eq!(result.confidence, 0.9);
        assert_eq!(result.method, Method::Ai);
        assert_eq!(result.analysis, "AI analysis: Mentions loss");
    }

    #[test]
    fn untagged_fence_and_surrounding_prose() {
        let reply = "Here you go:\n```\n{\"emotion\":\"calm\"}\n```\nThanks";
        assert_eq!(strip_code_fence(reply), "{\"emotion\":\"calm\"}");
        assert_eq!(strip_code_fence("  {\"a\":1}  "), "{\"a\":1}");
    }

    #[test]
    fn missing_confidence_defaults_and_out_of_range_is_clamped() {
        let result = parse_reply(r#"{"emotion":"happy"}"#).unwrap();
        assert_eq!(result.confidence, 0.7);
        assert!(result.analysis.starts_with("AI analysis: The text was analyzed"));

        let high = parse_reply(r#"{"emotion":"angry","confidence":3.5}"#).unwrap();
        assert_eq!(high.confidence, 1.0);

        let low = parse_reply(r#"{"emotion":"angry","confidence":-2}"#).unwrap();
        assert_eq!(low.confidence, 0.0);
    }

    #[test]
    fn invalid_json_is_a_parse_error() {
        assert!(matches!(
            parse_reply("I think the user is sad."),
            Err(AiError::MalformedReply(_))
        ));
        assert!(matches!(
            parse_reply("```json\nnot json\n```"),
            Err(AiError::MalformedReply(_))
        ));
    }

    #[test]
    fn label_outside_enumeration_is_rejected() {
        assert!(matches!(
            parse_reply(r#"{"emotion":"melancholy","confidence":0.8}"#),
            Err(AiError::UnknownEmotion(label)) if label == "melancholy"
        ));
        assert!(matches!(
            parse_reply(r#"{"confidence":0.8}"#),
            Err(AiError::UnknownEmotion(_))
        ));
    }

    #[test]
    fn prompt_embeds_text_verbatim() {
        let prompt = build_prompt("I said \"enough\" today");
        assert!(prompt.contains("Text: \"I said \"enough\" today\""));
        assert!(prompt.contains("happy, calm, sad, anxious, angry, neutral"));
    }

    #[tokio::test]
    async fn unconfigured_classifier_reports_missing_credential() {
        let classifier = AiClassifier::default();
        assert!(!classifier.is_configured());
        assert!(matches!(
            classifier.classify("anything").await,
            Err(AiError::MissingCredential)
        ));
    }
}
