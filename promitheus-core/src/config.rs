//! Configuration for the Promitheus engine.
//!
//! Maps directly to `promitheus.toml`. Every section and every field is
//! optional; missing values fall back to the defaults documented on each
//! field.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{PromitheusError, Result};
use crate::events::ImpactPreset;
use crate::thoughts::ThoughtPool;
use crate::types::Axes;

/// Top-level configuration, loadable from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PromitheusConfig {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,
    /// Where state files live.
    #[serde(default)]
    pub storage: StorageConfig,
    /// Initial state (and decay baseline) of new agents.
    #[serde(default)]
    pub state: StateConfig,
    /// Relaxation toward the baseline.
    #[serde(default)]
    pub decay: DecayConfig,
    /// Event impact scaling and history.
    #[serde(default)]
    pub events: EventConfig,
    /// Thought sampling.
    #[serde(default)]
    pub thoughts: ThoughtConfig,
    /// Markdown report injection.
    #[serde(default)]
    pub inject: InjectConfig,
}

impl PromitheusConfig {
    /// Load configuration from a TOML string.
    ///
    /// # Errors
    /// Returns `PromitheusError::Config` if the TOML is invalid or a value is
    /// out of range.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(toml_str).map_err(|e| PromitheusError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Reject values the engine cannot work with.
    ///
    /// # Errors
    /// Returns `PromitheusError::Config` naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        let s = &self.state;
        if !(-1.0..=1.0).contains(&s.valence) {
            return Err(invalid("state.valence", "must be within [-1, 1]"));
        }
        if !(0.0..=1.0).contains(&s.arousal) {
            return Err(invalid("state.arousal", "must be within [0, 1]"));
        }
        if !(0.0..=1.0).contains(&s.energy) {
            return Err(invalid("state.energy", "must be within [0, 1]"));
        }
        if !(self.decay.rate_per_hour.is_finite() && self.decay.rate_per_hour > 0.0) {
            return Err(invalid("decay.rate_per_hour", "must be a positive number"));
        }
        if !(self.decay.min_elapsed_hours.is_finite() && self.decay.min_elapsed_hours >= 0.0) {
            return Err(invalid("decay.min_elapsed_hours", "must be zero or positive"));
        }
        if self.events.history_limit == 0 {
            return Err(invalid("events.history_limit", "must be at least 1"));
        }
        for (field, value) in [
            ("events.valence_scale", self.events.valence_scale),
            ("events.arousal_scale", self.events.arousal_scale),
            ("events.energy_cost", self.events.energy_cost),
        ] {
            if !value.is_finite() {
                return Err(invalid(field, "must be finite"));
            }
        }
        for (name, preset) in &self.events.presets {
            if !(preset.valence.is_finite()
                && preset.arousal.is_finite()
                && preset.significance.is_finite())
            {
                return Err(PromitheusError::Config(format!(
                    "events.presets.{name}: values must be finite"
                )));
            }
        }
        Ok(())
    }
}

fn invalid(field: &str, why: &str) -> PromitheusError {
    PromitheusError::Config(format!("{field}: {why}"))
}

// ---------------------------------------------------------------------------
// Sub-configs
// ---------------------------------------------------------------------------

/// General settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Log level used when `RUST_LOG` is unset: trace, debug, info, warn, error.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// State file location.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Root directory; one sub-directory per agent. Defaults to the
    /// per-user data directory (`~/.local/share/promitheus` on Linux).
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
    /// File name inside the agent directory.
    #[serde(default = "default_state_file")]
    pub file_name: String,
}

impl StorageConfig {
    /// The configured data directory, or the platform default.
    #[must_use]
    pub fn resolved_data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("promitheus")
        })
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            file_name: default_state_file(),
        }
    }
}

/// Initial state for new agents; also becomes their permanent baseline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateConfig {
    /// Starting valence.
    #[serde(default = "default_valence")]
    pub valence: f64,
    /// Starting arousal.
    #[serde(default = "default_arousal")]
    pub arousal: f64,
    /// Starting energy.
    #[serde(default = "default_energy")]
    pub energy: f64,
}

impl StateConfig {
    /// The configured triple.
    #[must_use]
    pub fn baseline(&self) -> Axes {
        Axes::new(self.valence, self.arousal, self.energy)
    }
}

impl Default for StateConfig {
    fn default() -> Self {
        Self {
            valence: Axes::DEFAULT.valence,
            arousal: Axes::DEFAULT.arousal,
            energy: Axes::DEFAULT.energy,
        }
    }
}

/// Linear relaxation toward the baseline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecayConfig {
    /// Fraction of the remaining gap closed per hour (0.1 = fully rested after 10h).
    #[serde(default = "default_decay_rate")]
    pub rate_per_hour: f64,
    /// Gaps shorter than this are ignored.
    #[serde(default = "default_min_elapsed")]
    pub min_elapsed_hours: f64,
}

impl Default for DecayConfig {
    fn default() -> Self {
        Self {
            rate_per_hour: default_decay_rate(),
            min_elapsed_hours: default_min_elapsed(),
        }
    }
}

/// Event impact and history settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventConfig {
    /// Maximum number of events kept, newest first.
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
    /// valence impact = preset valence × significance × this.
    #[serde(default = "default_valence_scale")]
    pub valence_scale: f64,
    /// arousal impact = preset arousal × significance × this.
    #[serde(default = "default_arousal_scale")]
    pub arousal_scale: f64,
    /// Energy lost per unit of |arousal impact|.
    #[serde(default = "default_energy_cost")]
    pub energy_cost: f64,
    /// Additional or overriding presets, keyed by event type.
    #[serde(default)]
    pub presets: BTreeMap<String, ImpactPreset>,
}

impl Default for EventConfig {
    fn default() -> Self {
        Self {
            history_limit: default_history_limit(),
            valence_scale: default_valence_scale(),
            arousal_scale: default_arousal_scale(),
            energy_cost: default_energy_cost(),
            presets: BTreeMap::new(),
        }
    }
}

/// Thought sampling settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThoughtConfig {
    /// Thoughts returned when no count is given.
    #[serde(default = "default_thought_count")]
    pub default_count: usize,
    /// Phrase pool; any set left out keeps its built-in phrases.
    #[serde(flatten)]
    pub pool: ThoughtPool,
}

impl Default for ThoughtConfig {
    fn default() -> Self {
        Self {
            default_count: default_thought_count(),
            pool: ThoughtPool::default(),
        }
    }
}

/// Markdown report settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InjectConfig {
    /// Name of the written report.
    #[serde(default = "default_inject_file")]
    pub file_name: String,
    /// Workspace used when the caller names none. Defaults to the current directory.
    #[serde(default)]
    pub default_workspace: Option<PathBuf>,
    /// Events listed in the report.
    #[serde(default = "default_recent_events")]
    pub recent_events: usize,
    /// Event summaries longer than this are truncated.
    #[serde(default = "default_summary_chars")]
    pub summary_chars: usize,
    /// Events returned by `recent_events` when no limit is given.
    #[serde(default = "default_event_limit")]
    pub default_event_limit: usize,
}

impl Default for InjectConfig {
    fn default() -> Self {
        Self {
            file_name: default_inject_file(),
            default_workspace: None,
            recent_events: default_recent_events(),
            summary_chars: default_summary_chars(),
            default_event_limit: default_event_limit(),
        }
    }
}

// ---------------------------------------------------------------------------
// Serde default helpers
// ---------------------------------------------------------------------------

fn default_log_level() -> String { "info".to_string() }
fn default_state_file() -> String { "state.json".to_string() }
fn default_inject_file() -> String { "EMOTIONAL_STATE.md".to_string() }
fn default_valence() -> f64 { Axes::DEFAULT.valence }
fn default_arousal() -> f64 { Axes::DEFAULT.arousal }
fn default_energy() -> f64 { Axes::DEFAULT.energy }
fn default_decay_rate() -> f64 { 0.1 }
fn default_min_elapsed() -> f64 { 0.5 }
fn default_history_limit() -> usize { 100 }
fn default_valence_scale() -> f64 { 0.5 }
fn default_arousal_scale() -> f64 { 0.3 }
fn default_energy_cost() -> f64 { 0.1 }
fn default_thought_count() -> usize { 3 }
fn default_recent_events() -> usize { 5 }
fn default_summary_chars() -> usize { 80 }
fn default_event_limit() -> usize { 10 }
