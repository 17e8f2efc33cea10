//! Mood classification: three continuous axes to one discrete label.
//!
//! Each axis is first reduced to a [`Band`] using strict thresholds:
//!
//! | axis    | low       | high     |
//! |---------|-----------|----------|
//! | valence | `< -0.2`  | `> 0.2`  |
//! | arousal | `< 0.4`   | `> 0.6`  |
//! | energy  | `< 0.4`   | `> 0.6`  |
//!
//! Values sitting exactly on a threshold belong to the middle band. The
//! valence and arousal bands pick one of nine cells, and energy picks
//! between the two labels in that cell.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Valence above this is positive.
pub const VALENCE_POSITIVE: f64 = 0.2;
/// Valence below this is negative.
pub const VALENCE_NEGATIVE: f64 = -0.2;
/// Arousal above this is activated.
pub const AROUSAL_ACTIVATED: f64 = 0.6;
/// Arousal below this is calm.
pub const AROUSAL_CALM: f64 = 0.4;
/// Energy above this is high.
pub const ENERGY_HIGH: f64 = 0.6;
/// Energy below this is low.
pub const ENERGY_LOW: f64 = 0.4;

/// Which side of an axis' thresholds a value falls on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Band {
    /// Below the lower threshold.
    Low,
    /// Between the thresholds, inclusive of both.
    Mid,
    /// Above the upper threshold.
    High,
}

impl Band {
    fn split(value: f64, low: f64, high: f64) -> Self {
        if value > high {
            Self::High
        } else if value < low {
            Self::Low
        } else {
            Self::Mid
        }
    }

    /// Band of a valence value (`Low` = negative, `High` = positive).
    #[must_use]
    pub fn of_valence(valence: f64) -> Self {
        Self::split(valence, VALENCE_NEGATIVE, VALENCE_POSITIVE)
    }

    /// Band of an arousal value (`Low` = calm, `High` = activated).
    #[must_use]
    pub fn of_arousal(arousal: f64) -> Self {
        Self::split(arousal, AROUSAL_CALM, AROUSAL_ACTIVATED)
    }

    /// Band of an energy value.
    #[must_use]
    pub fn of_energy(energy: f64) -> Self {
        Self::split(energy, ENERGY_LOW, ENERGY_HIGH)
    }
}

/// Discrete mood label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    /// Positive, activated, high energy.
    Excited,
    /// Positive, activated.
    Enthusiastic,
    /// Positive, calm, high energy.
    Content,
    /// Positive, calm.
    Peaceful,
    /// Positive, high energy.
    Happy,
    /// Positive.
    Pleased,
    /// Negative, activated, high energy.
    Frustrated,
    /// Negative, activated.
    Anxious,
    /// Negative, calm, low energy.
    Depleted,
    /// Negative, calm.
    Sad,
    /// Negative, high energy.
    Upset,
    /// Negative.
    Down,
    /// Neutral, activated, high energy.
    Alert,
    /// Neutral, activated.
    Tense,
    /// Neutral, calm, high energy.
    Relaxed,
    /// Neutral, calm.
    Tired,
    /// Neutral, high energy.
    Neutral,
    /// Neutral.
    Low,
}

impl Mood {
    /// Every label the classifier can produce.
    pub const ALL: [Self; 18] = [
        Self::Excited,
        Self::Enthusiastic,
        Self::Content,
        Self::Peaceful,
        Self::Happy,
        Self::Pleased,
        Self::Frustrated,
        Self::Anxious,
        Self::Depleted,
        Self::Sad,
        Self::Upset,
        Self::Down,
        Self::Alert,
        Self::Tense,
        Self::Relaxed,
        Self::Tired,
        Self::Neutral,
        Self::Low,
    ];

    /// Lowercase label as stored on disk.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Excited => "excited",
            Self::Enthusiastic => "enthusiastic",
            Self::Content => "content",
            Self::Peaceful => "peaceful",
            Self::Happy => "happy",
            Self::Pleased => "pleased",
            Self::Frustrated => "frustrated",
            Self::Anxious => "anxious",
            Self::Depleted => "depleted",
            Self::Sad => "sad",
            Self::Upset => "upset",
            Self::Down => "down",
            Self::Alert => "alert",
            Self::Tense => "tense",
            Self::Relaxed => "relaxed",
            Self::Tired => "tired",
            Self::Neutral => "neutral",
            Self::Low => "low",
        }
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Map (valence, arousal, energy) to a mood label.
///
/// Pure and total: NaN compares false against every threshold and lands in
/// the middle bands.
#[must_use]
pub fn classify(valence: f64, arousal: f64, energy: f64) -> Mood {
    let energy = Band::of_energy(energy);
    let high = energy == Band::High;

    match (Band::of_valence(valence), Band::of_arousal(arousal)) {
        (Band::High, Band::High) => pick(high, Mood::Excited, Mood::Enthusiastic),
        (Band::High, Band::Low) => pick(high, Mood::Content, Mood::Peaceful),
        (Band::High, Band::Mid) => pick(high, Mood::Happy, Mood::Pleased),
        (Band::Low, Band::High) => pick(high, Mood::Frustrated, Mood::Anxious),
        // The only cell keyed on *low* energy.
        (Band::Low, Band::Low) => pick(energy == Band::Low, Mood::Depleted, Mood::Sad),
        (Band::Low, Band::Mid) => pick(high, Mood::Upset, Mood::Down),
        (Band::Mid, Band::High) => pick(high, Mood::Alert, Mood::Tense),
        (Band::Mid, Band::Low) => pick(high, Mood::Relaxed, Mood::Tired),
        (Band::Mid, Band::Mid) => pick(high, Mood::Neutral, Mood::Low),
    }
}

fn pick(condition: bool, yes: Mood, no: Mood) -> Mood {
    if condition { yes } else { no }
}
