//! Deterministic lexical emotion scorer.
//!
//! Each keyword contributes at most one hit to its category, matched by
//! substring containment against the lower-cased text ("sadness" counts
//! for "sad"). The category with the strictly highest hit count wins; ties
//! keep the earlier category in lexicon order. No hits means `neutral`.

use crate::models::emotion::{ClassificationResult, Emotion, Method};

const LEXICON: [(Emotion, &[&str]); 5] = [
    (
        Emotion::Happy,
        &[
            "happy", "joy", "excited", "great", "wonderful", "fantastic", "pleased", "delighted",
            "cheerful", "elated", "thrilled", "amazing", "awesome", "brilliant", "excellent",
            "love", "beautiful", "perfect", "smile", "laugh",
        ],
    ),
    (
        Emotion::Calm,
        &[
            "calm", "peaceful", "relaxed", "serene", "tranquil", "content", "centered",
            "balanced", "quiet", "still", "gentle", "soothing", "comfortable", "at ease",
            "restful",
        ],
    ),
    (
        Emotion::Sad,
        &[
            "sad", "unhappy", "depressed", "down", "blue", "gloomy", "miserable", "upset",
            "disappointed", "heartbroken", "lonely", "empty", "hopeless", "crying", "tears",
            "grief", "sorrow",
        ],
    ),
    (
        Emotion::Anxious,
        &[
            "anxious", "worried", "nervous", "stressed", "tense", "uneasy", "afraid", "fearful",
            "panic", "overwhelmed", "restless", "agitated", "concerned", "apprehensive",
            "racing heart", "can't stop",
        ],
    ),
    (
        Emotion::Angry,
        &[
            "angry", "frustrated", "annoyed", "irritated", "mad", "furious", "rage", "outraged",
            "livid", "infuriated", "pissed", "hate", "disgusted", "fed up", "screaming",
        ],
    ),
];

const NO_SIGNAL_CONFIDENCE: f64 = 0.5;
const BASE_CONFIDENCE: f64 = 0.3;
const PER_MATCH_CONFIDENCE: f64 = 0.1;
const MAX_CONFIDENCE: f64 = 0.8;

/// Number of entries in `keywords` found in `text`.
/// `text` must already be lower-cased.
fn count_matches(text: &str, keywords: &[&str]) -> usize {
    keywords.iter().filter(|kw| text.contains(*kw)).count()
}

pub fn keyword_confidence(matches: usize) -> f64 {
    if matches == 0 {
        NO_SIGNAL_CONFIDENCE
    } else {
        (BASE_CONFIDENCE + PER_MATCH_CONFIDENCE * matches as f64).min(MAX_CONFIDENCE)
    }
}

pub fn classify_by_keywords(text: &str) -> ClassificationResult {
    let lowered = text.to_lowercase();

    let mut best = Emotion::Neutral;
    let mut best_count = 0;
    for (emotion, keywords) in LEXICON {
        let count = count_matches(&lowered, keywords);
        if count > best_count {
            best = emotion;
            best_count = count;
        }
    }

    ClassificationResult {
        emotion: best,
        confidence: keyword_confidence(best_count),
        method: Method::Keywords,
        analysis: format!(
            "Based on keyword analysis, found {} emotion-related terms suggesting \"{}\" feelings. \
             This analysis uses pattern matching to identify emotional indicators in your text.",
            best_count, best
        ),
    }
}
