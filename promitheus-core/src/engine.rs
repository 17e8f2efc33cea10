//! The emotional state engine: one agent's state plus everything that acts on it.
//!
//! Every public operation follows the same cycle:
//!
//! 1. load the document (from the store, unless already resident)
//! 2. relax the state toward its baseline for the elapsed time
//! 3. apply the read or mutation
//! 4. persist if anything changed
//!
//! The engine is an explicit context object: agent id, store, config, clock
//! and random source are all constructor inputs.

use std::path::{Path, PathBuf};

use chrono::{DateTime, SubsecRound, Utc};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::clock::{Clock, SystemClock};
use crate::config::PromitheusConfig;
use crate::decay;
use crate::error::Result;
use crate::events::{self, Impact};
use crate::persistence::{JsonFileStore, StateStore};
use crate::render;
use crate::types::{AgentId, EmotionalState, Event, PersistedDocument};

/// Current state plus a fresh thought sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusReport {
    /// State after decay.
    pub state: EmotionalState,
    /// Freshly sampled thoughts.
    pub thoughts: Vec<String>,
}

/// Result of logging an event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventOutcome {
    /// State after the event.
    pub state: EmotionalState,
    /// Deltas the event applied.
    pub impact: Impact,
    /// The recorded event.
    pub event: Event,
}

/// Emotional state engine for a single agent.
pub struct Engine {
    agent: AgentId,
    store: Box<dyn StateStore>,
    config: PromitheusConfig,
    clock: Box<dyn Clock>,
    rng: Box<dyn RngCore + Send>,
    resident: Option<PersistedDocument>,
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("agent", &self.agent)
            .field("resident", &self.resident.is_some())
            .finish_non_exhaustive()
    }
}

impl Engine {
    /// Create an engine over an arbitrary store, using the system clock and
    /// an entropy-seeded RNG.
    pub fn new(agent: AgentId, store: impl StateStore + 'static, config: PromitheusConfig) -> Self {
        Self {
            agent,
            store: Box::new(store),
            config,
            clock: Box::new(SystemClock),
            rng: Box::new(StdRng::from_entropy()),
            resident: None,
        }
    }

    /// Create an engine backed by the JSON file store described in
    /// `config.storage`.
    #[must_use]
    pub fn open(agent: AgentId, config: PromitheusConfig) -> Self {
        let store = JsonFileStore::from_config(&config.storage);
        Self::new(agent, store, config)
    }

    /// Replace the time source.
    #[must_use]
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Replace the random source used for thought selection.
    #[must_use]
    pub fn with_rng(mut self, rng: impl RngCore + Send + 'static) -> Self {
        self.rng = Box::new(rng);
        self
    }

    /// The agent this engine serves.
    #[must_use]
    pub fn agent(&self) -> &AgentId {
        &self.agent
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &PromitheusConfig {
        &self.config
    }

    // ------------------------------------------------------------------
    // Operations
    // ------------------------------------------------------------------

    /// Current state and a fresh thought sample.
    ///
    /// Persists only if decay changed the state.
    ///
    /// # Errors
    ///
    /// Returns an error if loading or saving the document fails.
    pub fn status(&mut self) -> Result<StatusReport> {
        let (document, dirty) = self.checkout()?;
        let thoughts = self.sample_thoughts(&document.emotional, None);
        let state = document.emotional.clone();
        self.commit(document, dirty)?;
        Ok(StatusReport { state, thoughts })
    }

    /// Like [`Self::status`], but stores the thought sample and always
    /// writes the document.
    ///
    /// # Errors
    ///
    /// Returns an error if loading or saving the document fails.
    pub fn sync(&mut self) -> Result<StatusReport> {
        let (mut document, _) = self.checkout()?;
        let thoughts = self.sample_thoughts(&document.emotional, None);
        document.thoughts.clone_from(&thoughts);
        let state = document.emotional.clone();
        self.commit(document, true)?;
        Ok(StatusReport { state, thoughts })
    }

    /// Log an event and apply its impact.
    ///
    /// Unknown event types use the default preset.
    ///
    /// # Errors
    ///
    /// Returns an error if loading or saving the document fails.
    pub fn log_event(
        &mut self,
        event_type: &str,
        summary: &str,
        significance: Option<f64>,
    ) -> Result<EventOutcome> {
        let (mut document, _) = self.checkout()?;
        let now = self.now();
        let (impact, event) = events::log_event(
            &mut document.emotional,
            &mut document.events,
            event_type,
            summary,
            significance,
            now,
            &self.config.events,
        );
        let state = document.emotional.clone();
        self.commit(document, true)?;
        Ok(EventOutcome {
            state,
            impact,
            event,
        })
    }

    /// Sample `count` thoughts (config default when `None`) and store them
    /// as the latest sample.
    ///
    /// # Errors
    ///
    /// Returns an error if loading or saving the document fails.
    pub fn think(&mut self, count: Option<usize>) -> Result<Vec<String>> {
        let (mut document, _) = self.checkout()?;
        let thoughts = self.sample_thoughts(&document.emotional, count);
        document.thoughts.clone_from(&thoughts);
        self.commit(document, true)?;
        Ok(thoughts)
    }

    /// Render the state report without writing it anywhere.
    ///
    /// # Errors
    ///
    /// Returns an error if loading or saving the document fails.
    pub fn render(&mut self) -> Result<String> {
        let (mut document, mut dirty) = self.checkout()?;
        dirty |= self.ensure_thoughts(&mut document);
        let markdown = render::render_markdown(
            &document.emotional,
            &document.thoughts,
            &document.events,
            self.now(),
            &self.config.inject,
        );
        self.commit(document, dirty)?;
        Ok(markdown)
    }

    /// Render the state report into `workspace` (or the configured default,
    /// or the current directory) and return the written path.
    ///
    /// The report file is fully replaced on every call.
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be loaded or saved, or the
    /// report cannot be written.
    pub fn inject(&mut self, workspace: Option<&Path>) -> Result<PathBuf> {
        let markdown = self.render()?;
        let workspace = match workspace {
            Some(dir) => dir.to_path_buf(),
            None => match &self.config.inject.default_workspace {
                Some(dir) => dir.clone(),
                None => std::env::current_dir()?,
            },
        };
        let path = workspace.join(&self.config.inject.file_name);
        render::write_markdown(&path, &markdown)?;
        info!(agent = %self.agent, path = %path.display(), "Injected state report");
        Ok(path)
    }

    /// The `limit` most recent events, newest first (config default when `None`).
    ///
    /// # Errors
    ///
    /// Returns an error if loading or saving the document fails.
    pub fn recent_events(&mut self, limit: Option<usize>) -> Result<Vec<Event>> {
        let (document, dirty) = self.checkout()?;
        let limit = limit.unwrap_or(self.config.inject.default_event_limit);
        let events = document.events.iter().take(limit).cloned().collect();
        self.commit(document, dirty)?;
        Ok(events)
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    /// Take the document out of residence (loading or creating it) and
    /// apply decay. The flag is `true` when the document must be persisted.
    fn checkout(&mut self) -> Result<(PersistedDocument, bool)> {
        let now = self.now();
        let (mut document, mut dirty) = match self.resident.take() {
            Some(document) => (document, false),
            None => match self.store.load(&self.agent)? {
                Some(document) => (document, false),
                None => {
                    info!(agent = %self.agent, "Initializing fresh emotional state");
                    let baseline = self.config.state.baseline();
                    (PersistedDocument::new(self.agent.clone(), baseline, now), true)
                }
            },
        };

        dirty |= decay::apply_decay(&mut document.emotional, now, &self.config.decay);
        Ok((document, dirty))
    }

    /// Clock reading at the precision the document stores.
    fn now(&self) -> DateTime<Utc> {
        self.clock.now().trunc_subsecs(3)
    }

    /// Persist (if dirty) and put the document back into residence.
    ///
    /// On a failed save the document is dropped so the next call reloads
    /// what is actually on disk.
    fn commit(&mut self, document: PersistedDocument, dirty: bool) -> Result<()> {
        if dirty {
            self.store.save(&document)?;
        } else {
            debug!(agent = %self.agent, "State unchanged, skipping save");
        }
        self.resident = Some(document);
        Ok(())
    }

    fn sample_thoughts(&mut self, state: &EmotionalState, count: Option<usize>) -> Vec<String> {
        let count = count.unwrap_or(self.config.thoughts.default_count);
        self.config.thoughts.pool.generate(state, count, &mut *self.rng)
    }

    /// Fill in a thought sample if the document has none. Returns `true` if
    /// the document changed.
    fn ensure_thoughts(&mut self, document: &mut PersistedDocument) -> bool {
        if !document.thoughts.is_empty() {
            return false;
        }
        document.thoughts = self.sample_thoughts(&document.emotional, None);
        !document.thoughts.is_empty()
    }
}
