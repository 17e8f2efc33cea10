//! # Promitheus Core Library
//!
//! Host-agnostic emotional state engine for AI agents.
//!
//! Every agent identity gets one [`PersistedDocument`] holding a small
//! affective state and its recent history:
//!
//! - **Valence**: how pleasant things feel (-1.0 to 1.0)
//! - **Arousal**: how activated the agent is (0.0 to 1.0)
//! - **Energy**: remaining capacity for effortful work (0.0 to 1.0)
//! - **Mood**: a discrete label derived from the three axes
//! - **Events**: the last 100 things that nudged the state
//! - **Thoughts**: the most recent sample from the phrase pool
//!
//! Each operation on the [`Engine`] is a self-contained read-modify-write:
//! load the document, relax the state toward its baseline for the elapsed
//! time, apply the request, persist, return plain data.

#![deny(clippy::unwrap_used)]
#![deny(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod clock;
pub mod config;
pub mod decay;
pub mod engine;
pub mod error;
pub mod events;
pub mod mood;
pub mod persistence;
pub mod render;
pub mod thoughts;
pub mod types;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::PromitheusConfig;
pub use engine::{Engine, EventOutcome, StatusReport};
pub use error::PromitheusError;
pub use events::Impact;
pub use mood::Mood;
pub use persistence::{JsonFileStore, MemoryStore, StateStore};
pub use types::*;
