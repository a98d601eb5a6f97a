//! Aggregate statistics over journal and mood collections.

use chrono::{DateTime, Duration, Months, Utc};
use serde::Serialize;

use crate::models::emotion::Emotion;
use crate::models::journal::JournalEntry;
use crate::models::mood::MoodEntry;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmotionShare {
    pub emotion: Emotion,
    pub count: usize,
    pub percentage: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct JournalStats {
    pub total_entries: usize,
    pub most_common_emotion: Option<Emotion>,
    pub distribution: Vec<EmotionShare>,
    pub average_length: usize,
    pub last_entry_at: Option<DateTime<Utc>>,
    pub entries_this_week: usize,
    pub entries_this_month: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct MoodStats {
    pub total_entries: usize,
    pub average_intensity: Option<f64>,
    pub most_frequent_emotion: Option<Emotion>,
    pub distribution: Vec<EmotionShare>,
    pub latest: Option<MoodEntry>,
}

/// Per-emotion counts in `Emotion::ALL` order, zero counts omitted.
pub fn distribution(emotions: impl IntoIterator<Item = Emotion>) -> Vec<EmotionShare> {
    let mut counts = [0usize; Emotion::ALL.len()];
    let mut total = 0usize;
    for emotion in emotions {
        if let Some(idx) = Emotion::ALL.iter().position(|e| *e == emotion) {
            counts[idx] += 1;
            total += 1;
        }
    }

    Emotion::ALL
        .iter()
        .zip(counts)
        .filter(|(_, count)| *count > 0)
        .map(|(emotion, count)| EmotionShare {
            emotion: *emotion,
            count,
            percentage: ((count as f64 / total as f64) * 100.0).round() as u32,
        })
        .collect()
}

/// Highest count wins; ties go to the earlier emotion.
fn most_common(shares: &[EmotionShare]) -> Option<Emotion> {
    shares
        .iter()
        .fold(None::<&EmotionShare>, |best, share| match best {
            Some(b) if b.count >= share.count => Some(b),
            _ => Some(share),
        })
        .map(|s| s.emotion)
}

pub fn journal_stats(entries: &[JournalEntry], now: DateTime<Utc>) -> JournalStats {
    let total_entries = entries.len();
    let distribution = distribution(entries.iter().map(|e| e.emotion));

    let average_length = if total_entries == 0 {
        0
    } else {
        let chars: usize = entries.iter().map(|e| e.content.chars().count()).sum();
        (chars as f64 / total_entries as f64).round() as usize
    };

    let week_ago = now - Duration::days(7);
    let month_ago = now.checked_sub_months(Months::new(1)).unwrap_or(week_ago);

    JournalStats {
        total_entries,
        most_common_emotion: most_common(&distribution),
        distribution,
        average_length,
        last_entry_at: entries.iter().map(|e| e.date).max(),
        entries_this_week: entries.iter().filter(|e| e.date > week_ago).count(),
        entries_this_month: entries.iter().filter(|e| e.date > month_ago).count(),
    }
}

pub fn mood_stats(entries: &[MoodEntry]) -> MoodStats {
    let distribution = distribution(entries.iter().map(|e| e.emotion));

    let average_intensity = if entries.is_empty() {
        None
    } else {
        let sum: i64 = entries.iter().map(|e| i64::from(e.intensity)).sum();
        let avg = sum as f64 / entries.len() as f64;
        Some((avg * 10.0).round() / 10.0)
    };

    MoodStats {
        total_entries: entries.len(),
        average_intensity,
        most_frequent_emotion: most_common(&distribution),
        distribution,
        latest: entries.iter().max_by_key(|e| e.date).cloned(),
    }
}
