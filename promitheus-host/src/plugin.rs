//! Plugin entry point: registers every Promitheus operation with a host.
//!
//! | name                   | kind    | request           |
//! |------------------------|---------|-------------------|
//! | `promitheus_status`    | tool    | `Status`          |
//! | `promitheus_sync`      | tool    | `Sync`            |
//! | `promitheus_log_event` | tool    | `LogEvent`        |
//! | `promitheus_think`     | tool    | `Think`           |
//! | `promitheus_inject`    | tool    | `Inject`          |
//! | `promitheus_events`    | tool    | `Events`          |
//! | `mood`                 | command | `Status` as text  |
//! | `before_agent_start`   | hook    | `Render`          |

use std::sync::Arc;

use serde_json::{Value, json};
use tracing::{info, warn};

use crate::error::Result;
use crate::host::{Handler, Host, LogLevel, OperationKind, OperationSpec};
use crate::operations::{self, Request, Response};
use crate::transport::Transport;

/// Name of the slash command.
pub const MOOD_COMMAND: &str = "mood";
/// Name of the prompt-injection hook.
pub const BEFORE_AGENT_START: &str = "before_agent_start";

const TOOLS: &[(&str, &str)] = &[
    (operations::STATUS, "Current emotional state and a few passing thoughts"),
    (
        operations::SYNC,
        "Apply elapsed-time decay, sample thoughts and persist the state",
    ),
    (
        operations::LOG_EVENT,
        "Record something that happened (eventType, summary, optional significance 0-1)",
    ),
    (operations::THINK, "Sample thoughts that fit the current state (optional count)"),
    (
        operations::INJECT,
        "Write EMOTIONAL_STATE.md into the workspace (optional workspace path)",
    ),
    (operations::EVENTS, "Most recent events, newest first (optional limit)"),
];

fn run(transport: &dyn Transport, name: &str, request: Request) -> Result<Response> {
    transport.execute(request).inspect_err(|e| {
        warn!(operation = name, error = %e, "Operation failed");
    })
}

/// Register all tools, the `/mood` command and the `before_agent_start`
/// hook with `host`, each backed by `transport`.
pub fn register<H: Host + ?Sized>(host: &mut H, transport: Arc<dyn Transport>) {
    for &(name, description) in TOOLS {
        let transport = Arc::clone(&transport);
        let handler: Handler = Box::new(move |params: &Value| -> Result<Value> {
            let request = Request::from_tool(name, params)?;
            let response = run(transport.as_ref(), name, request)?;
            Ok(serde_json::to_value(response)?)
        });
        host.register_operation(
            OperationSpec {
                name,
                description,
                kind: OperationKind::Tool,
            },
            handler,
        );
    }

    let mood_transport = Arc::clone(&transport);
    host.register_operation(
        OperationSpec {
            name: MOOD_COMMAND,
            description: "Show the agent's current mood",
            kind: OperationKind::Command,
        },
        Box::new(move |_params: &Value| -> Result<Value> {
            let response = run(mood_transport.as_ref(), MOOD_COMMAND, Request::Status)?;
            Ok(json!({ "text": response.summary() }))
        }),
    );

    host.register_operation(
        OperationSpec {
            name: BEFORE_AGENT_START,
            description: "Prepend the emotional state report to the agent's context",
            kind: OperationKind::Hook,
        },
        Box::new(move |_params: &Value| -> Result<Value> {
            match run(transport.as_ref(), BEFORE_AGENT_START, Request::Render)? {
                Response::Rendered { markdown } => Ok(json!({ "prependContext": markdown })),
                other => Ok(serde_json::to_value(other)?),
            }
        }),
    );

    info!(tools = TOOLS.len(), "Promitheus operations registered");
    host.log(LogLevel::Info, "Promitheus plugin loaded");
}
