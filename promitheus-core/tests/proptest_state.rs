//! Property-Based Tests for Promitheus Core
//!
//! Uses `proptest` to check the state invariants under random inputs:
//! axes stay in range, mood is a pure function of the axes, decay never
//! overshoots the baseline, and history never exceeds its cap.

use chrono::{Duration, TimeZone, Utc};
use proptest::prelude::*;

use promitheus_core::config::{DecayConfig, EventConfig};
use promitheus_core::decay;
use promitheus_core::events;
use promitheus_core::mood::{self, Mood};
use promitheus_core::types::{Axes, EmotionalState};

fn start() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).single().expect("valid date")
}

// ---------------------------------------------------------------------------
// Strategy helpers
// ---------------------------------------------------------------------------

fn arb_state() -> impl Strategy<Value = EmotionalState> {
    (-1.0..=1.0f64, 0.0..=1.0f64, 0.0..=1.0f64).prop_map(|(v, a, e)| {
        let mut state = EmotionalState::new(Axes::DEFAULT, start());
        state.valence = v;
        state.arousal = a;
        state.energy = e;
        state.refresh_mood();
        state
    })
}

fn arb_event_type() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("milestone".to_string()),
        Just("loss".to_string()),
        Just("conflict".to_string()),
        Just("rest".to_string()),
        Just("boredom".to_string()),
        "[a-z]{1,12}",
    ]
}

fn in_range(state: &EmotionalState) -> bool {
    (-1.0..=1.0).contains(&state.valence)
        && (0.0..=1.0).contains(&state.arousal)
        && (0.0..=1.0).contains(&state.energy)
}

// ---------------------------------------------------------------------------
// Mood classification
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn classify_is_deterministic(v in -1.0..=1.0f64, a in 0.0..=1.0f64, e in 0.0..=1.0f64) {
        let first = mood::classify(v, a, e);
        prop_assert_eq!(first, mood::classify(v, a, e));
        prop_assert!(Mood::ALL.contains(&first));
    }

    #[test]
    fn classify_is_total_outside_range(v in any::<f64>(), a in any::<f64>(), e in any::<f64>()) {
        let label = mood::classify(v, a, e);
        prop_assert!(Mood::ALL.contains(&label));
    }
}

// ---------------------------------------------------------------------------
// Events keep the axes in range
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn events_keep_axes_in_range(
        initial in arb_state(),
        batch in prop::collection::vec((arb_event_type(), prop::option::of(-5.0..5.0f64)), 1..40),
    ) {
        let mut state = initial;
        let mut history = Vec::new();
        let config = EventConfig::default();

        for (event_type, significance) in &batch {
            let (_, event) = events::log_event(
                &mut state, &mut history, event_type, "s", *significance, start(), &config,
            );
            prop_assert!(in_range(&state));
            prop_assert!((0.0..=1.0).contains(&event.significance));
            prop_assert_eq!(state.mood, mood::classify(state.valence, state.arousal, state.energy));
        }
        prop_assert!(history.len() <= config.history_limit);
        prop_assert_eq!(history.len(), batch.len().min(config.history_limit));
    }

    #[test]
    fn energy_never_rises_from_events(initial in arb_state(), event_type in arb_event_type()) {
        let mut state = initial;
        let before = state.energy;
        events::log_event(&mut state, &mut Vec::new(), &event_type, "s", None, start(), &EventConfig::default());
        prop_assert!(state.energy <= before);
    }
}

// ---------------------------------------------------------------------------
// Decay approaches the baseline without overshooting
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn decay_never_overshoots(initial in arb_state(), minutes in 0i64..2_000) {
        let mut state = initial.clone();
        let baseline = state.baseline;
        decay::apply_decay(&mut state, start() + Duration::minutes(minutes), &DecayConfig::default());

        for (before, after, target) in [
            (initial.valence, state.valence, baseline.valence),
            (initial.arousal, state.arousal, baseline.arousal),
            (initial.energy, state.energy, baseline.energy),
        ] {
            prop_assert!((after - target).abs() <= (before - target).abs() + 1e-12);
        }
        prop_assert!(in_range(&state));
    }

    #[test]
    fn decay_is_idempotent_at_same_instant(initial in arb_state(), minutes in 30i64..2_000) {
        let now = start() + Duration::minutes(minutes);
        let mut state = initial;
        decay::apply_decay(&mut state, now, &DecayConfig::default());
        let once = state.clone();
        prop_assert!(!decay::apply_decay(&mut state, now, &DecayConfig::default()));
        prop_assert_eq!(state, once);
    }
}
