//! Core type definitions for the Promitheus state model.
//!
//! Everything here is serializable; field names are camelCase on disk so the
//! state file stays readable next to other agent-workspace JSON.
//!
//! The on-disk form is canonical so that loading and re-saving a document
//! reproduces it byte for byte:
//! - timestamps are RFC 3339 UTC with millisecond precision (`...T12:00:00.000Z`)
//! - integral numbers are written without a fraction (`1`, not `1.0`)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::error::{PromitheusError, Result};
use crate::mood::{self, Mood};

// ---------------------------------------------------------------------------
// Identity Types
// ---------------------------------------------------------------------------

/// Identity of the agent whose state is tracked.
///
/// Used as a directory name, so it is restricted to a filesystem-safe
/// alphabet: ASCII alphanumerics plus `-`, `_` and `.`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AgentId(String);

impl AgentId {
    /// Maximum length of an agent id.
    pub const MAX_LEN: usize = 128;

    /// Validate and wrap an agent identifier.
    ///
    /// # Errors
    ///
    /// Returns [`PromitheusError::InvalidAgentId`] if the id is empty, too
    /// long, contains characters outside the allowed set, or is `.`/`..`.
    pub fn new(id: impl Into<String>) -> Result<Self> {
        let id = id.into();
        let reason = if id.is_empty() {
            Some("must not be empty")
        } else if id.len() > Self::MAX_LEN {
            Some("longer than 128 characters")
        } else if id == "." || id == ".." {
            Some("reserved path component")
        } else if !id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
        {
            Some("only ASCII letters, digits, '-', '_' and '.' are allowed")
        } else {
            None
        };

        match reason {
            Some(reason) => Err(PromitheusError::InvalidAgentId { id, reason }),
            None => Ok(Self(id)),
        }
    }

    /// Borrow the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for AgentId {
    type Error = PromitheusError;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl From<AgentId> for String {
    fn from(id: AgentId) -> Self {
        id.0
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Unique identifier for a logged event.
///
/// New ids are UUIDv7 strings (creation time in the leading bits, the rest
/// random). Stored ids are opaque: any string is accepted on load.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(String);

impl EventId {
    /// Create a new time-ordered event ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    /// Borrow the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for EventId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// Canonical JSON encoding
// ---------------------------------------------------------------------------

/// Timestamps as `YYYY-MM-DDTHH:MM:SS.mmmZ`.
pub(crate) mod timestamp {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::Serializer;

    pub(crate) fn serialize<S: Serializer>(at: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&at.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    #[allow(clippy::ref_option)]
    pub(crate) fn serialize_option<S: Serializer>(
        at: &Option<DateTime<Utc>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match at {
            Some(at) => serialize(at, serializer),
            None => serializer.serialize_none(),
        }
    }
}

/// Numbers with no fractional part are written as integers.
pub(crate) mod number {
    use serde::Serializer;

    /// Largest integer an `f64` represents exactly (2^53 - 1).
    const MAX_EXACT: f64 = 9_007_199_254_740_991.0;

    #[allow(clippy::trivially_copy_pass_by_ref, clippy::float_cmp, clippy::cast_possible_truncation)]
    pub(crate) fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if value.trunc() == *value && value.abs() <= MAX_EXACT {
            serializer.serialize_i64(*value as i64)
        } else {
            serializer.serialize_f64(*value)
        }
    }
}

// ---------------------------------------------------------------------------
// Emotional Model
// ---------------------------------------------------------------------------

/// A point in (valence, arousal, energy) space.
///
/// Used for the decay baseline and for the initial state of new agents.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Axes {
    /// Unpleasant (-1.0) to pleasant (+1.0).
    #[serde(serialize_with = "number::serialize")]
    pub valence: f64,
    /// Calm (0.0) to activated (1.0).
    #[serde(serialize_with = "number::serialize")]
    pub arousal: f64,
    /// Depleted (0.0) to fully rested (1.0).
    #[serde(serialize_with = "number::serialize")]
    pub energy: f64,
}

impl Axes {
    /// Starting point for every new agent.
    pub const DEFAULT: Self = Self {
        valence: 0.5,
        arousal: 0.5,
        energy: 0.7,
    };

    /// Create a point, clamping each axis to its legal range.
    #[must_use]
    pub fn new(valence: f64, arousal: f64, energy: f64) -> Self {
        Self {
            valence: valence.clamp(-1.0, 1.0),
            arousal: arousal.clamp(0.0, 1.0),
            energy: energy.clamp(0.0, 1.0),
        }
    }
}

impl Default for Axes {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// The live emotional state of one agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmotionalState {
    /// Pleasantness, in [-1, 1].
    #[serde(serialize_with = "number::serialize")]
    pub valence: f64,
    /// Activation, in [0, 1].
    #[serde(serialize_with = "number::serialize")]
    pub arousal: f64,
    /// Capacity, in [0, 1].
    #[serde(serialize_with = "number::serialize")]
    pub energy: f64,
    /// Derived label, recomputed on every mutation.
    pub mood: Mood,
    /// Last decay or mutation.
    #[serde(serialize_with = "timestamp::serialize")]
    pub last_updated: DateTime<Utc>,
    /// Last logged event, if any.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "timestamp::serialize_option"
    )]
    pub last_interaction: Option<DateTime<Utc>>,
    /// Number of events ever logged.
    pub total_events: u64,
    /// Fixed decay target, set at creation.
    pub baseline: Axes,
}

impl EmotionalState {
    /// Create a fresh state resting at `baseline`.
    #[must_use]
    pub fn new(baseline: Axes, now: DateTime<Utc>) -> Self {
        Self {
            valence: baseline.valence,
            arousal: baseline.arousal,
            energy: baseline.energy,
            mood: mood::classify(baseline.valence, baseline.arousal, baseline.energy),
            last_updated: now,
            last_interaction: None,
            total_events: 0,
            baseline,
        }
    }

    /// Current position as an [`Axes`] triple.
    #[must_use]
    pub fn axes(&self) -> Axes {
        Axes {
            valence: self.valence,
            arousal: self.arousal,
            energy: self.energy,
        }
    }

    /// Recompute [`Self::mood`] from the current axes.
    pub fn refresh_mood(&mut self) {
        self.mood = mood::classify(self.valence, self.arousal, self.energy);
    }
}

/// One entry of the event history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    /// Unique identifier.
    pub id: EventId,
    /// When the event was logged.
    #[serde(serialize_with = "timestamp::serialize")]
    pub timestamp: DateTime<Utc>,
    /// Free-form type key, e.g. `milestone` or `error`.
    pub event_type: String,
    /// Free-text description.
    pub summary: String,
    /// Weight of the event, in [0, 1].
    #[serde(serialize_with = "number::serialize")]
    pub significance: f64,
    /// Signed change applied to valence.
    #[serde(serialize_with = "number::serialize")]
    pub valence_impact: f64,
    /// Signed change applied to arousal.
    #[serde(serialize_with = "number::serialize")]
    pub arousal_impact: f64,
}

/// Everything persisted for one agent, written as a single JSON object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedDocument {
    /// Owner of this document.
    pub agent_id: AgentId,
    /// Current emotional state.
    pub emotional: EmotionalState,
    /// Event history, newest first.
    #[serde(default)]
    pub events: Vec<Event>,
    /// Most recent thought sample.
    #[serde(default)]
    pub thoughts: Vec<String>,
}

impl PersistedDocument {
    /// Create a fresh document for `agent_id` resting at `baseline`.
    #[must_use]
    pub fn new(agent_id: AgentId, baseline: Axes, now: DateTime<Utc>) -> Self {
        Self {
            agent_id,
            emotional: EmotionalState::new(baseline, now),
            events: Vec::new(),
            thoughts: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn agent_id_accepts_safe_names() {
        for id in ["main", "agent-7", "ops_bot", "v1.2"] {
            assert!(AgentId::new(id).is_ok(), "{id} should be accepted");
        }
    }

    #[test]
    fn agent_id_rejects_path_escapes() {
        for id in ["", ".", "..", "a/b", "../etc", "a\\b", "spaced name"] {
            assert!(
                matches!(AgentId::new(id), Err(PromitheusError::InvalidAgentId { .. })),
                "{id:?} should be rejected"
            );
        }
        assert!(AgentId::new("x".repeat(AgentId::MAX_LEN + 1)).is_err());
    }

    #[test]
    fn fresh_state_rests_at_baseline() {
        let state = EmotionalState::new(Axes::DEFAULT, Utc::now());
        assert_eq!(state.axes(), Axes::DEFAULT);
        assert_eq!(state.baseline, Axes::DEFAULT);
        assert_eq!(state.total_events, 0);
        assert!(state.last_interaction.is_none());
        // 0.5 valence is positive, 0.5 arousal is mid, 0.7 energy is high.
        assert_eq!(state.mood, Mood::Happy);
    }

    #[test]
    fn axes_new_clamps() {
        let axes = Axes::new(-3.0, 2.0, -0.5);
        assert_eq!(axes, Axes { valence: -1.0, arousal: 1.0, energy: 0.0 });
    }

    #[test]
    fn document_uses_camel_case_keys() {
        let doc = PersistedDocument::new(
            AgentId::new("main").expect("valid id"),
            Axes::DEFAULT,
            Utc::now(),
        );
        let json = serde_json::to_string(&doc).expect("serialize");
        assert!(json.contains("\"agentId\":\"main\""));
        assert!(json.contains("\"lastUpdated\""));
        assert!(json.contains("\"totalEvents\":0"));
        assert!(json.contains("\"mood\":\"happy\""));
        assert!(!json.contains("lastInteraction"), "absent interaction is omitted");
    }

    #[test]
    fn timestamps_are_written_with_milliseconds() {
        let at = DateTime::parse_from_rfc3339("2026-10-16T12:00:00Z")
            .expect("parse")
            .with_timezone(&Utc);
        let json = serde_json::to_value(EmotionalState::new(Axes::DEFAULT, at)).expect("serialize");
        assert_eq!(json["lastUpdated"], "2026-10-16T12:00:00.000Z");
    }

    #[test]
    fn integral_numbers_have_no_fraction() {
        let json = serde_json::to_string(&Axes::new(1.0, 0.0, 0.25)).expect("serialize");
        assert_eq!(json, r#"{"valence":1,"arousal":0,"energy":0.25}"#);

        let back: Axes = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, Axes::new(1.0, 0.0, 0.25));
    }

    #[test]
    fn event_ids_are_opaque_strings() {
        let id: EventId = serde_json::from_str("\"1760616000000-k3j9x2\"").expect("any string");
        assert_eq!(id.as_str(), "1760616000000-k3j9x2");
        assert_eq!(serde_json::to_string(&id).expect("serialize"), "\"1760616000000-k3j9x2\"");

        let fresh = EventId::new();
        assert!(Uuid::parse_str(fresh.as_str()).is_ok());
        assert_ne!(fresh, EventId::new());
    }

    #[test]
    fn invalid_agent_id_in_json_is_rejected() {
        let result: std::result::Result<AgentId, _> = serde_json::from_str("\"../x\"");
        assert!(result.is_err());
    }
}
