//! Decay toward baseline.
//!
//! Between interactions the state relaxes toward its fixed baseline:
//!
//!   factor = min(1, rate × hours_elapsed)
//!   x ← x + (baseline.x − x) × factor
//!
//! With the default rate of 0.1/h the state is fully back at baseline after
//! ten hours. Gaps under half an hour are ignored so that a burst of calls
//! does not nudge the state on every one of them.

use chrono::{DateTime, Utc};

use crate::config::DecayConfig;
use crate::types::EmotionalState;

const MS_PER_HOUR: f64 = 3_600_000.0;

/// Hours between `since` and `now`; negative if `now` is earlier.
#[must_use]
pub fn hours_between(since: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    let ms = (now - since).num_milliseconds() as f64;
    ms / MS_PER_HOUR
}

/// Fraction of the remaining gap to close after `hours_elapsed`.
///
/// Zero when the gap is below the configured minimum (including negative
/// gaps from a clock that went backwards).
#[must_use]
pub fn decay_factor(hours_elapsed: f64, config: &DecayConfig) -> f64 {
    if hours_elapsed.is_nan() || hours_elapsed < config.min_elapsed_hours {
        return 0.0;
    }
    (config.rate_per_hour * hours_elapsed).min(1.0)
}

/// Relax `state` toward its baseline for the time elapsed since
/// `state.last_updated`.
///
/// Returns `true` if the state was touched (and therefore needs to be
/// persisted). A second call within the minimum gap is a no-op because
/// `last_updated` has moved to `now`.
pub fn apply_decay(state: &mut EmotionalState, now: DateTime<Utc>, config: &DecayConfig) -> bool {
    let hours = hours_between(state.last_updated, now);
    let factor = decay_factor(hours, config);
    if factor <= 0.0 {
        return false;
    }

    let baseline = state.baseline;
    state.valence = relax(state.valence, baseline.valence, factor);
    state.arousal = relax(state.arousal, baseline.arousal, factor);
    state.energy = relax(state.energy, baseline.energy, factor);
    state.refresh_mood();
    state.last_updated = now;

    tracing::debug!(
        hours_elapsed = hours,
        factor,
        valence = state.valence,
        arousal = state.arousal,
        energy = state.energy,
        "Applied decay toward baseline"
    );
    true
}

fn relax(current: f64, target: f64, factor: f64) -> f64 {
    // A full factor lands exactly on target instead of accumulating rounding error.
    if factor >= 1.0 {
        target
    } else {
        current + (target - current) * factor
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mood::Mood;
    use crate::types::Axes;
    use chrono::Duration;

    fn excited_state(at: DateTime<Utc>) -> EmotionalState {
        let mut state = EmotionalState::new(Axes::DEFAULT, at);
        state.valence = 0.9;
        state.arousal = 0.9;
        state.energy = 0.2;
        state.refresh_mood();
        state
    }

    #[test]
    fn short_gaps_are_ignored() {
        let t0 = Utc::now();
        let mut state = excited_state(t0);
        let before = state.clone();

        assert!(!apply_decay(&mut state, t0 + Duration::minutes(29), &DecayConfig::default()));
        assert_eq!(state, before);
    }

    #[test]
    fn negative_gap_is_ignored() {
        let t0 = Utc::now();
        let mut state = excited_state(t0);
        assert!(!apply_decay(&mut state, t0 - Duration::hours(5), &DecayConfig::default()));
    }

    #[test]
    fn partial_decay_moves_toward_baseline() {
        let t0 = Utc::now();
        let mut state = excited_state(t0);
        let now = t0 + Duration::hours(2);

        assert!(apply_decay(&mut state, now, &DecayConfig::default()));
        // factor = 0.2
        assert!((state.valence - (0.9 + (0.5 - 0.9) * 0.2)).abs() < 1e-12);
        assert!((state.arousal - (0.9 + (0.5 - 0.9) * 0.2)).abs() < 1e-12);
        assert!((state.energy - (0.2 + (0.7 - 0.2) * 0.2)).abs() < 1e-12);
        assert_eq!(state.last_updated, now);
    }

    #[test]
    fn ten_hours_reaches_baseline_exactly() {
        let t0 = Utc::now();
        let mut state = excited_state(t0);

        assert!(apply_decay(&mut state, t0 + Duration::hours(10), &DecayConfig::default()));
        assert_eq!(state.axes(), Axes::DEFAULT);
        assert_eq!(state.mood, Mood::Happy);
    }

    #[test]
    fn idempotent_within_window() {
        let t0 = Utc::now();
        let mut state = excited_state(t0);
        let now = t0 + Duration::hours(3);

        assert!(apply_decay(&mut state, now, &DecayConfig::default()));
        let once = state.clone();
        assert!(!apply_decay(&mut state, now + Duration::minutes(10), &DecayConfig::default()));
        assert_eq!(state, once);
    }

    #[test]
    fn factor_is_capped() {
        let config = DecayConfig::default();
        assert!((decay_factor(50.0, &config) - 1.0).abs() < f64::EPSILON);
        assert!((decay_factor(0.5, &config) - 0.05).abs() < 1e-12);
        assert!(decay_factor(0.49, &config).abs() < f64::EPSILON);
        assert!(decay_factor(f64::NAN, &config).abs() < f64::EPSILON);
    }
}
