//! # promitheus-host: Agent-Host Integration for Promitheus
//!
//! This crate connects the host-agnostic `promitheus-core` engine to an
//! agent host runtime (the thing that owns tools, slash commands and
//! lifecycle hooks).
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────┐
//! │               agent host                   │
//! │   tools · /mood · before_agent_start       │
//! │  ┌─────────────────────────────────────┐   │
//! │  │         promitheus-host             │   │
//! │  │  Host trait ── plugin::register     │   │
//! │  │        │                             │   │
//! │  │        ▼                             │   │
//! │  │   Request ──► Transport ──► Response │   │
//! │  │                 │                    │   │
//! │  │       ┌─────────┴──────────┐         │   │
//! │  │       ▼                    ▼         │   │
//! │  │  InProcess (Engine)   Command (CLI)  │   │
//! │  └─────────────────────────────────────┘   │
//! └───────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - `host`: the narrow capability interface a host runtime implements
//! - `operations`: typed requests and responses, parameter parsing
//! - `transport`: in-process and command-line execution of requests
//! - `plugin`: registers every operation with a host

#![deny(clippy::unwrap_used)]
#![deny(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod host;
pub mod operations;
pub mod plugin;
pub mod transport;

pub use error::{HostError, Result};
pub use host::{Handler, Host, LogLevel, OperationKind, OperationSpec};
pub use operations::{Request, Response, dispatch};
pub use plugin::register;
pub use transport::{CommandTransport, InProcessTransport, Transport};
