//! Scoring for a finished session.
//!
//! Everything here is pure. Rounding is half away from zero (`f64::round`)
//! for both wpm and accuracy, so 12.5% accuracy reports as 13.

use serde::{Deserialize, Serialize};

/// Characters that make up one "word" for wpm purposes.
pub const CHARS_PER_WORD: f64 = 5.0;

/// Below this wpm every session is [`Tier::Bad`], regardless of accuracy.
pub const TIER_WPM_FLOOR: u32 = 40;
/// Speed stops contributing to the tier score above this wpm.
pub const TIER_WPM_CAP: u32 = 80;

const SPEED_WEIGHT: f64 = 0.6;
const ACCURACY_WEIGHT: f64 = 0.4;

/// Snapshot of a finished session, produced exactly once per session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestResult {
    pub wpm: u32,
    pub accuracy: u32,
    pub total_chars: usize,
    pub error_count: usize,
}

impl TestResult {
    pub fn tier(&self) -> Tier {
        classify_performance(self.wpm, self.accuracy)
    }
}

/// Performance classification used to pick a reward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum_macros::Display)]
#[strum(serialize_all = "lowercase")]
pub enum Tier {
    Bad,
    Alright,
    Nice,
    Wooo,
    Goat,
    Perfect,
}

impl Tier {
    /// Name of the reward clip for this tier.
    pub fn reward_asset(&self) -> String {
        format!("{self}.mp4")
    }
}

/// Words per minute from correctly typed characters.
///
/// Zero elapsed seconds always yields 0.
pub fn compute_wpm(correct_chars: usize, elapsed_secs: u64) -> u32 {
    if elapsed_secs == 0 {
        return 0;
    }

    let words = correct_chars as f64 / CHARS_PER_WORD;
    let minutes = elapsed_secs as f64 / 60.0;

    (words / minutes).round() as u32
}

/// Percentage of typed characters that matched, 0..=100.
///
/// An empty attempt counts as 100.
pub fn compute_accuracy(correct_chars: usize, total_chars: usize) -> u32 {
    if total_chars == 0 {
        return 100;
    }

    let pct = (correct_chars as f64 / total_chars as f64) * 100.0;
    (pct.round() as u32).min(100)
}

pub fn classify_performance(wpm: u32, accuracy: u32) -> Tier {
    if wpm < TIER_WPM_FLOOR {
        return Tier::Bad;
    }

    let capped_wpm = wpm.min(TIER_WPM_CAP);
    let speed_score =
        f64::from(capped_wpm - TIER_WPM_FLOOR) / f64::from(TIER_WPM_CAP - TIER_WPM_FLOOR);
    let accuracy_score = f64::from(accuracy) / 100.0;
    let final_score = SPEED_WEIGHT * speed_score + ACCURACY_WEIGHT * accuracy_score;

    match final_score {
        s if s < 0.25 => Tier::Bad,
        s if s < 0.45 => Tier::Alright,
        s if s < 0.65 => Tier::Nice,
        s if s < 0.75 => Tier::Wooo,
        s if s < 0.85 => Tier::Goat,
        _ => Tier::Perfect,
    }
}

pub fn evaluate(
    correct_chars: usize,
    elapsed_secs: u64,
    total_chars: usize,
    error_count: usize,
) -> TestResult {
    TestResult {
        wpm: compute_wpm(correct_chars, elapsed_secs),
        accuracy: compute_accuracy(correct_chars, total_chars),
        total_chars,
        error_count,
    }
}

/// Emoji shown in place of the reward clip, picked by speed alone.
pub fn fallback_badge(wpm: u32) -> &'static str {
    match wpm {
        0..=20 => "😅",
        21..=30 => "👍",
        31..=45 => "😊",
        46..=60 => "🎉",
        61..=80 => "🔥",
        _ => "⭐",
    }
}

/// `M:SS`
pub fn format_time(secs: u64) -> String {
    format!("{}:{:02}", secs / 60, secs % 60)
}
