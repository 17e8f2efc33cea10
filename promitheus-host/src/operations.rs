//! Typed requests and responses for every engine operation.
//!
//! Hosts hand over parameters as loosely shaped JSON. They are parsed once,
//! here, into a [`Request`]; every transport consumes requests and produces
//! a [`Response`]. Parameter names accept both `camelCase` and `snake_case`.

use std::fmt::Write as _;
use std::path::PathBuf;

use promitheus_core::engine::{Engine, EventOutcome, StatusReport};
use promitheus_core::types::{EmotionalState, Event};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{HostError, Result};

/// Tool name: current state and thoughts.
pub const STATUS: &str = "promitheus_status";
/// Tool name: current state, thoughts stored and persisted.
pub const SYNC: &str = "promitheus_sync";
/// Tool name: log an event.
pub const LOG_EVENT: &str = "promitheus_log_event";
/// Tool name: sample thoughts.
pub const THINK: &str = "promitheus_think";
/// Tool name: write the state report into a workspace.
pub const INJECT: &str = "promitheus_inject";
/// Tool name: recent events.
pub const EVENTS: &str = "promitheus_events";

/// One engine operation with its arguments.
#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    /// See [`Engine::status`].
    Status,
    /// See [`Engine::sync`].
    Sync,
    /// See [`Engine::log_event`].
    LogEvent {
        /// Event type (preset key).
        event_type: String,
        /// Free-text description.
        summary: String,
        /// Explicit significance; preset default when absent.
        significance: Option<f64>,
    },
    /// See [`Engine::think`].
    Think {
        /// Number of thoughts; config default when absent.
        count: Option<usize>,
    },
    /// See [`Engine::inject`].
    Inject {
        /// Target directory; config default when absent.
        workspace: Option<PathBuf>,
    },
    /// See [`Engine::recent_events`].
    Events {
        /// Maximum number of events; config default when absent.
        limit: Option<usize>,
    },
    /// See [`Engine::render`].
    Render,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LogEventParams {
    #[serde(alias = "event_type", alias = "type")]
    event_type: String,
    #[serde(default)]
    summary: String,
    #[serde(default)]
    significance: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
struct ThinkParams {
    #[serde(default)]
    count: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InjectParams {
    #[serde(default, alias = "workspacePath", alias = "workspace_path")]
    workspace: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
struct EventsParams {
    #[serde(default)]
    limit: Option<usize>,
}

fn parse<T: serde::de::DeserializeOwned>(operation: &str, params: &Value) -> Result<T> {
    // Hosts send `null` or nothing for parameterless calls.
    let params = if params.is_null() {
        Value::Object(serde_json::Map::new())
    } else {
        params.clone()
    };
    serde_json::from_value(params).map_err(|e| HostError::InvalidParams {
        operation: operation.to_string(),
        reason: e.to_string(),
    })
}

impl Request {
    /// Build a request from a registered tool name and its JSON parameters.
    ///
    /// # Errors
    ///
    /// [`HostError::UnknownOperation`] for names that are not tools,
    /// [`HostError::InvalidParams`] for parameters of the wrong shape.
    pub fn from_tool(operation: &str, params: &Value) -> Result<Self> {
        match operation {
            STATUS => Ok(Self::Status),
            SYNC => Ok(Self::Sync),
            LOG_EVENT => {
                let p: LogEventParams = parse(operation, params)?;
                if p.event_type.trim().is_empty() {
                    return Err(HostError::InvalidParams {
                        operation: operation.to_string(),
                        reason: "eventType must not be empty".to_string(),
                    });
                }
                Ok(Self::LogEvent {
                    event_type: p.event_type,
                    summary: p.summary,
                    significance: p.significance,
                })
            }
            THINK => parse::<ThinkParams>(operation, params).map(|p| Self::Think { count: p.count }),
            INJECT => {
                parse::<InjectParams>(operation, params).map(|p| Self::Inject { workspace: p.workspace })
            }
            EVENTS => parse::<EventsParams>(operation, params).map(|p| Self::Events { limit: p.limit }),
            other => Err(HostError::UnknownOperation(other.to_string())),
        }
    }

    /// Arguments for the `promitheus` CLI subcommand that performs this
    /// request (global flags not included).
    ///
    /// Free text goes after `--` and option values are attached with `=`,
    /// so leading dashes are never read as flags.
    #[must_use]
    pub fn to_cli_args(&self) -> Vec<String> {
        let mut args = Vec::new();
        match self {
            Self::Status => args.push("status".to_string()),
            Self::Sync => args.push("sync".to_string()),
            Self::LogEvent {
                event_type,
                summary,
                significance,
            } => {
                args.push("log".to_string());
                if let Some(s) = significance {
                    args.push(format!("--significance={s}"));
                }
                args.extend(["--".to_string(), event_type.clone(), summary.clone()]);
            }
            Self::Think { count } => {
                args.push("think".to_string());
                if let Some(n) = count {
                    args.extend(["--count".to_string(), n.to_string()]);
                }
            }
            Self::Inject { workspace } => {
                args.push("inject".to_string());
                if let Some(dir) = workspace {
                    args.push(format!("--workspace={}", dir.display()));
                }
            }
            Self::Events { limit } => {
                args.push("events".to_string());
                if let Some(n) = limit {
                    args.extend(["--limit".to_string(), n.to_string()]);
                }
            }
            Self::Render => args.push("render".to_string()),
        }
        args
    }
}

/// Result of a [`Request`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Response {
    /// From `Status` and `Sync`.
    Status(StatusReport),
    /// From `LogEvent`.
    Event(EventOutcome),
    /// From `Think`.
    Thoughts {
        /// The sampled thoughts.
        thoughts: Vec<String>,
    },
    /// From `Inject`.
    Injected {
        /// Path of the written report.
        path: PathBuf,
    },
    /// From `Events`.
    Events {
        /// Newest first.
        events: Vec<Event>,
    },
    /// From `Render`.
    Rendered {
        /// The rendered report.
        markdown: String,
    },
}

fn state_line(state: &EmotionalState) -> String {
    format!(
        "Mood: {} (valence {:.2}, energy {:.2}, arousal {:.2})",
        state.mood, state.valence, state.energy, state.arousal
    )
}

impl Response {
    /// Human-readable rendering, used by the `/mood` command and the CLI's
    /// plain output.
    #[must_use]
    pub fn summary(&self) -> String {
        let mut out = String::new();
        match self {
            Self::Status(report) => {
                out.push_str(&state_line(&report.state));
                for thought in &report.thoughts {
                    let _ = write!(out, "\n  - {thought}");
                }
            }
            Self::Event(outcome) => {
                let _ = write!(
                    out,
                    "Logged {}: valence {:+.3}, arousal {:+.3}, energy {:+.3}\n{}",
                    outcome.event.event_type,
                    outcome.impact.valence,
                    outcome.impact.arousal,
                    outcome.impact.energy,
                    state_line(&outcome.state)
                );
            }
            Self::Thoughts { thoughts } => out.push_str(&thoughts.join("\n")),
            Self::Injected { path } => {
                let _ = write!(out, "Wrote {}", path.display());
            }
            Self::Events { events } => {
                if events.is_empty() {
                    out.push_str("No events recorded.");
                }
                let lines: Vec<String> = events
                    .iter()
                    .map(|e| {
                        format!(
                            "{}  {:<12} {:+.3}  {}",
                            e.timestamp.format("%Y-%m-%d %H:%M"),
                            e.event_type,
                            e.valence_impact,
                            e.summary
                        )
                    })
                    .collect();
                out.push_str(&lines.join("\n"));
            }
            Self::Rendered { markdown } => out.push_str(markdown.trim_end()),
        }
        out
    }
}

/// Execute `request` against `engine`.
///
/// # Errors
///
/// Propagates engine failures as [`HostError::Engine`].
pub fn dispatch(engine: &mut Engine, request: Request) -> Result<Response> {
    let response = match request {
        Request::Status => Response::Status(engine.status()?),
        Request::Sync => Response::Status(engine.sync()?),
        Request::LogEvent {
            event_type,
            summary,
            significance,
        } => Response::Event(engine.log_event(&event_type, &summary, significance)?),
        Request::Think { count } => Response::Thoughts {
            thoughts: engine.think(count)?,
        },
        Request::Inject { workspace } => Response::Injected {
            path: engine.inject(workspace.as_deref())?,
        },
        Request::Events { limit } => Response::Events {
            events: engine.recent_events(limit)?,
        },
        Request::Render => Response::Rendered {
            markdown: engine.render()?,
        },
    };
    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_log_event_in_both_cases() {
        let camel = Request::from_tool(LOG_EVENT, &json!({"eventType": "praise", "summary": "hi"})).expect("camel");
        let snake = Request::from_tool(
            LOG_EVENT,
            &json!({"event_type": "praise", "summary": "hi", "significance": 0.4}),
        )
        .expect("snake");

        assert_eq!(
            camel,
            Request::LogEvent {
                event_type: "praise".into(),
                summary: "hi".into(),
                significance: None
            }
        );
        assert!(matches!(snake, Request::LogEvent { significance: Some(s), .. } if (s - 0.4).abs() < f64::EPSILON));
    }

    #[test]
    fn missing_event_type_is_invalid() {
        let err = Request::from_tool(LOG_EVENT, &json!({"summary": "x"})).expect_err("invalid");
        assert!(matches!(err, HostError::InvalidParams { .. }));

        let err = Request::from_tool(LOG_EVENT, &json!({"eventType": "  "})).expect_err("blank");
        assert!(matches!(err, HostError::InvalidParams { .. }));
    }

    #[test]
    fn optional_params_default_to_none() {
        assert_eq!(Request::from_tool(THINK, &Value::Null).expect("think"), Request::Think { count: None });
        assert_eq!(Request::from_tool(EVENTS, &json!({})).expect("events"), Request::Events { limit: None });
        assert_eq!(
            Request::from_tool(INJECT, &json!({"workspacePath": "/tmp/ws"})).expect("inject"),
            Request::Inject {
                workspace: Some(PathBuf::from("/tmp/ws"))
            }
        );
    }

    #[test]
    fn negative_count_is_invalid() {
        let err = Request::from_tool(THINK, &json!({"count": -1})).expect_err("invalid");
        assert!(matches!(err, HostError::InvalidParams { .. }));
    }

    #[test]
    fn unknown_tool_is_rejected() {
        let err = Request::from_tool("promitheus_dance", &Value::Null).expect_err("unknown");
        assert!(matches!(err, HostError::UnknownOperation(name) if name == "promitheus_dance"));
    }

    #[test]
    fn cli_args_match_subcommands() {
        let log = Request::LogEvent {
            event_type: "error".into(),
            summary: "build failed".into(),
            significance: Some(0.7),
        };
        assert_eq!(log.to_cli_args(), ["log", "--significance=0.7", "--", "error", "build failed"]);
        assert_eq!(Request::Think { count: Some(2) }.to_cli_args(), ["think", "--count", "2"]);
        assert_eq!(Request::Events { limit: None }.to_cli_args(), ["events"]);
        assert_eq!(Request::Render.to_cli_args(), ["render"]);
    }

    #[test]
    fn cli_args_keep_dashed_text_positional() {
        let log = Request::LogEvent {
            event_type: "-x".into(),
            summary: "-3 tests failing".into(),
            significance: Some(-0.5),
        };
        assert_eq!(log.to_cli_args(), ["log", "--significance=-0.5", "--", "-x", "-3 tests failing"]);

        let log = Request::LogEvent {
            event_type: "error".into(),
            summary: "--help".into(),
            significance: None,
        };
        assert_eq!(log.to_cli_args(), ["log", "--", "error", "--help"]);

        let inject = Request::Inject {
            workspace: Some("-ws".into()),
        };
        assert_eq!(inject.to_cli_args(), ["inject", "--workspace=-ws"]);
    }

    #[test]
    fn response_is_tagged_json() {
        let response = Response::Thoughts {
            thoughts: vec!["one".into()],
        };
        let value = serde_json::to_value(&response).expect("json");
        assert_eq!(value, json!({"kind": "thoughts", "thoughts": ["one"]}));
        let back: Response = serde_json::from_value(value).expect("decode");
        assert_eq!(back, response);
    }
}
