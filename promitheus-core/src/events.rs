//! Event processing: discrete occurrences that nudge the state.
//!
//! Each event type maps to an [`ImpactPreset`]. The preset's direction is
//! scaled by the event's significance and applied to the state:
//!
//!   valence_impact = preset.valence × significance × 0.5
//!   arousal_impact = preset.arousal × significance × 0.3
//!   energy_impact  = −|arousal_impact| × 0.1
//!
//! Any arousal change, up or down, costs energy. Unknown event types are
//! not an error; they get a mild positive default.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::EventConfig;
use crate::types::{EmotionalState, Event, EventId};

/// Direction and default weight of an event type.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImpactPreset {
    /// Valence direction, roughly in [-1, 1].
    pub valence: f64,
    /// Arousal direction, roughly in [-1, 1].
    pub arousal: f64,
    /// Significance used when the caller gives none.
    pub significance: f64,
}

impl ImpactPreset {
    const fn new(valence: f64, arousal: f64, significance: f64) -> Self {
        Self {
            valence,
            arousal,
            significance,
        }
    }

    /// Preset for event types not found in any table.
    pub const DEFAULT: Self = Self::new(0.1, 0.1, 0.5);
}

/// Built-in event types.
pub const PRESETS: &[(&str, ImpactPreset)] = &[
    ("milestone", ImpactPreset::new(0.6, 0.4, 0.8)),
    ("achievement", ImpactPreset::new(0.7, 0.5, 0.7)),
    ("success", ImpactPreset::new(0.5, 0.3, 0.6)),
    ("praise", ImpactPreset::new(0.5, 0.2, 0.6)),
    ("gratitude", ImpactPreset::new(0.4, 0.1, 0.5)),
    ("connection", ImpactPreset::new(0.5, 0.2, 0.6)),
    ("discovery", ImpactPreset::new(0.4, 0.6, 0.6)),
    ("learning", ImpactPreset::new(0.3, 0.4, 0.5)),
    ("creative", ImpactPreset::new(0.4, 0.5, 0.6)),
    ("humor", ImpactPreset::new(0.4, 0.3, 0.4)),
    ("challenge", ImpactPreset::new(-0.1, 0.6, 0.6)),
    ("error", ImpactPreset::new(-0.3, 0.4, 0.5)),
    ("failure", ImpactPreset::new(-0.5, 0.3, 0.7)),
    ("frustration", ImpactPreset::new(-0.5, 0.6, 0.6)),
    ("criticism", ImpactPreset::new(-0.4, 0.3, 0.6)),
    ("conflict", ImpactPreset::new(-0.6, 0.7, 0.7)),
    ("loss", ImpactPreset::new(-0.7, 0.2, 0.8)),
    ("boredom", ImpactPreset::new(-0.2, -0.4, 0.3)),
    ("rest", ImpactPreset::new(0.2, -0.5, 0.4)),
    ("idle", ImpactPreset::new(0.0, -0.3, 0.3)),
];

/// Resolve the preset for `event_type`.
///
/// Configured presets win over built-in ones; matching ignores case and
/// surrounding whitespace.
#[must_use]
pub fn preset_for(event_type: &str, config: &EventConfig) -> ImpactPreset {
    let key = event_type.trim().to_ascii_lowercase();

    config
        .presets
        .iter()
        .find(|(name, _)| name.trim().eq_ignore_ascii_case(&key))
        .map(|(_, preset)| *preset)
        .or_else(|| {
            PRESETS
                .iter()
                .find(|(name, _)| *name == key)
                .map(|(_, preset)| *preset)
        })
        .unwrap_or(ImpactPreset::DEFAULT)
}

/// The deltas an event applied, before clamping.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Impact {
    /// Change to valence.
    pub valence: f64,
    /// Change to arousal.
    pub arousal: f64,
    /// Change to energy (never positive).
    pub energy: f64,
}

/// Compute the impact of an event with the given preset and significance.
#[must_use]
pub fn compute_impact(preset: ImpactPreset, significance: f64, config: &EventConfig) -> Impact {
    let valence = preset.valence * significance * config.valence_scale;
    let arousal = preset.arousal * significance * config.arousal_scale;
    Impact {
        valence,
        arousal,
        energy: -(arousal.abs() * config.energy_cost),
    }
}

/// Effective significance: the explicit value if it is a number, otherwise
/// the preset's default; always clamped to [0, 1].
#[must_use]
pub fn effective_significance(explicit: Option<f64>, preset: ImpactPreset) -> f64 {
    explicit
        .filter(|s| s.is_finite())
        .unwrap_or(preset.significance)
        .clamp(0.0, 1.0)
}

/// Apply an event to `state`, record it at the front of `history`, and
/// return the impact together with the recorded event.
///
/// `history` is truncated to `config.history_limit`, dropping the oldest.
pub fn log_event(
    state: &mut EmotionalState,
    history: &mut Vec<Event>,
    event_type: &str,
    summary: &str,
    significance: Option<f64>,
    now: DateTime<Utc>,
    config: &EventConfig,
) -> (Impact, Event) {
    let preset = preset_for(event_type, config);
    let significance = effective_significance(significance, preset);
    let impact = compute_impact(preset, significance, config);

    state.valence = (state.valence + impact.valence).clamp(-1.0, 1.0);
    state.arousal = (state.arousal + impact.arousal).clamp(0.0, 1.0);
    state.energy = (state.energy + impact.energy).clamp(0.0, 1.0);
    state.refresh_mood();
    state.last_updated = now;
    state.last_interaction = Some(now);
    state.total_events += 1;

    let event = Event {
        id: EventId::new(),
        timestamp: now,
        event_type: event_type.trim().to_string(),
        summary: summary.to_string(),
        significance,
        valence_impact: impact.valence,
        arousal_impact: impact.arousal,
    };
    history.insert(0, event.clone());
    history.truncate(config.history_limit);

    tracing::debug!(
        event_type = event_type.trim(),
        significance,
        valence_impact = impact.valence,
        arousal_impact = impact.arousal,
        mood = %state.mood,
        "Logged event"
    );

    (impact, event)
}
