//! The capability interface a host runtime exposes to the plugin.
//!
//! A host only has to do two things: accept operation registrations and
//! accept log lines. Everything else (how tools are surfaced to the model,
//! how commands are typed, when hooks fire) stays on the host's side.

use std::fmt;

use serde_json::Value;

use crate::error::Result;

/// How the host surfaces an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    /// Callable by the model.
    Tool,
    /// Typed by the user (e.g. `/mood`).
    Command,
    /// Fired by the host at a lifecycle point.
    Hook,
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Tool => "tool",
            Self::Command => "command",
            Self::Hook => "hook",
        })
    }
}

/// Static description of a registered operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationSpec {
    /// Registered name (`promitheus_status`, `mood`, `before_agent_start`).
    pub name: &'static str,
    /// One-line description shown by the host.
    pub description: &'static str,
    /// Tool, command or hook.
    pub kind: OperationKind,
}

/// Severity of a host log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    /// Diagnostic detail.
    Debug,
    /// Normal notices.
    Info,
    /// Something went wrong but the plugin continues.
    Warn,
    /// An operation failed.
    Error,
}

/// Handler invoked by the host with the operation's JSON parameters.
pub type Handler = Box<dyn Fn(&Value) -> Result<Value> + Send + Sync>;

/// What the plugin needs from a host runtime.
pub trait Host {
    /// Make an operation available.
    fn register_operation(&mut self, spec: OperationSpec, handler: Handler);

    /// Forward a human-facing notice to the host's log.
    fn log(&self, level: LogLevel, message: &str);
}
