//! Transports: how a [`Request`] reaches an engine.
//!
//! [`InProcessTransport`] drives a shared engine directly.
//! [`CommandTransport`] runs the `promitheus` CLI once per request and reads
//! the JSON [`Response`] it prints; it carries no logic of its own.

use std::path::PathBuf;
use std::process::Command;
use std::sync::Arc;
use std::time::Instant;

use parking_lot::Mutex;
use promitheus_core::engine::Engine;
use promitheus_core::types::AgentId;
use tracing::debug;

use crate::error::{HostError, Result};
use crate::operations::{Request, Response, dispatch};

/// Executes requests.
pub trait Transport: Send + Sync {
    /// Perform `request` and return its response.
    ///
    /// # Errors
    ///
    /// Engine failures, or failures delivering the request.
    fn execute(&self, request: Request) -> Result<Response>;
}

// ---------------------------------------------------------------------------
// InProcessTransport
// ---------------------------------------------------------------------------

/// Runs requests on an engine in this process.
///
/// Handlers may be called from any host thread; the mutex serializes them.
#[derive(Debug, Clone)]
pub struct InProcessTransport {
    engine: Arc<Mutex<Engine>>,
}

impl InProcessTransport {
    /// Take ownership of `engine`.
    #[must_use]
    pub fn new(engine: Engine) -> Self {
        Self::shared(Arc::new(Mutex::new(engine)))
    }

    /// Share an engine that the caller also holds.
    #[must_use]
    pub fn shared(engine: Arc<Mutex<Engine>>) -> Self {
        Self { engine }
    }

    /// Handle to the underlying engine.
    #[must_use]
    pub fn engine(&self) -> Arc<Mutex<Engine>> {
        Arc::clone(&self.engine)
    }
}

impl Transport for InProcessTransport {
    fn execute(&self, request: Request) -> Result<Response> {
        let mut engine = self.engine.lock();
        dispatch(&mut engine, request)
    }
}

// ---------------------------------------------------------------------------
// CommandTransport
// ---------------------------------------------------------------------------

/// Runs `promitheus --json --agent <id> <subcommand>` per request.
#[derive(Debug, Clone)]
pub struct CommandTransport {
    program: PathBuf,
    agent: AgentId,
    data_dir: Option<PathBuf>,
    config: Option<PathBuf>,
}

impl CommandTransport {
    /// Use the `promitheus` binary found on `PATH`.
    #[must_use]
    pub fn new(agent: AgentId) -> Self {
        Self::with_program("promitheus", agent)
    }

    /// Use a specific executable.
    pub fn with_program(program: impl Into<PathBuf>, agent: AgentId) -> Self {
        Self {
            program: program.into(),
            agent,
            data_dir: None,
            config: None,
        }
    }

    /// Pass `--data-dir` to every invocation.
    #[must_use]
    pub fn data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = Some(dir.into());
        self
    }

    /// Pass `--config` to every invocation.
    #[must_use]
    pub fn config_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config = Some(path.into());
        self
    }

    /// Full argument list for `request`.
    #[must_use]
    pub fn args_for(&self, request: &Request) -> Vec<String> {
        let mut args = vec![
            "--json".to_string(),
            "--agent".to_string(),
            self.agent.to_string(),
        ];
        if let Some(dir) = &self.data_dir {
            args.push(format!("--data-dir={}", dir.display()));
        }
        if let Some(path) = &self.config {
            args.push(format!("--config={}", path.display()));
        }
        args.extend(request.to_cli_args());
        args
    }
}

impl Transport for CommandTransport {
    fn execute(&self, request: Request) -> Result<Response> {
        let start = Instant::now();
        let args = self.args_for(&request);
        let subcommand = request.to_cli_args().into_iter().next().unwrap_or_default();
        let output = Command::new(&self.program)
            .args(&args)
            .output()
            .map_err(|e| HostError::Transport(format!("failed to run {}: {e}", self.program.display())))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(HostError::Transport(format!(
                "{} exited with {}: {}",
                self.program.display(),
                output.status,
                stderr.trim()
            )));
        }

        let response = serde_json::from_slice(&output.stdout)
            .map_err(|e| HostError::Transport(format!("unreadable response: {e}")))?;

        debug!(
            program = %self.program.display(),
            subcommand = %subcommand,
            bytes = output.stdout.len(),
            elapsed_us = start.elapsed().as_micros(),
            "Command transport round trip"
        );
        Ok(response)
    }
}
