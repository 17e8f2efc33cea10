//! End-to-end tests: the real `promitheus` binary, driven directly and
//! through the host's command transport.

use std::process::Command;

use promitheus_core::types::AgentId;
use promitheus_host::{CommandTransport, Request, Response, Transport};

const BIN: &str = env!("CARGO_BIN_EXE_promitheus");

fn run(data_dir: &std::path::Path, args: &[&str]) -> std::process::Output {
    Command::new(BIN)
        .arg("--data-dir")
        .arg(data_dir)
        .args(args)
        .env_remove("PROMITHEUS_AGENT")
        .env_remove("PROMITHEUS_CONFIG")
        .env("RUST_LOG", "warn")
        .output()
        .expect("spawn promitheus")
}

#[test]
fn status_json_is_a_response() {
    let dir = tempfile::tempdir().expect("tempdir");
    let output = run(dir.path(), &["--json", "status"]);
    assert!(output.status.success());

    let response: Response = serde_json::from_slice(&output.stdout).expect("response json");
    let Response::Status(report) = response else {
        panic!("expected status response");
    };
    assert_eq!(report.thoughts.len(), 3);
    assert!(dir.path().join("main").join("state.json").exists());
}

#[test]
fn log_then_events_in_plain_text() {
    let dir = tempfile::tempdir().expect("tempdir");
    let logged = run(dir.path(), &["--agent", "scribe", "log", "milestone", "Tagged the release"]);
    assert!(logged.status.success());
    let text = String::from_utf8_lossy(&logged.stdout);
    assert!(text.starts_with("Logged milestone: valence +0.240"));

    let events = run(dir.path(), &["--agent", "scribe", "events", "-n", "5"]);
    let text = String::from_utf8_lossy(&events.stdout);
    assert!(text.contains("Tagged the release"));
}

#[test]
fn classify_needs_no_state() {
    let dir = tempfile::tempdir().expect("tempdir");
    let output = run(dir.path(), &["classify", "-0.5", "0.2", "0.3"]);
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "depleted");
    assert!(!dir.path().join("main").exists());
}

#[test]
fn invalid_agent_fails_with_stderr() {
    let dir = tempfile::tempdir().expect("tempdir");
    let output = run(dir.path(), &["--agent", "../escape", "status"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Invalid agent id"));
}

#[test]
fn command_transport_round_trip() {
    let dir = tempfile::tempdir().expect("tempdir");
    let workspace = tempfile::tempdir().expect("workspace");
    let transport =
        CommandTransport::with_program(BIN, AgentId::new("main").expect("id")).data_dir(dir.path());

    let response = transport
        .execute(Request::LogEvent {
            event_type: "discovery".into(),
            summary: "Found it".into(),
            significance: Some(0.5),
        })
        .expect("log");
    assert!(matches!(response, Response::Event(ref o) if o.event.event_type == "discovery"));

    let response = transport
        .execute(Request::Inject {
            workspace: Some(workspace.path().to_path_buf()),
        })
        .expect("inject");
    assert_eq!(
        response,
        Response::Injected {
            path: workspace.path().join("EMOTIONAL_STATE.md")
        }
    );
    let report = std::fs::read_to_string(workspace.path().join("EMOTIONAL_STATE.md")).expect("read");
    assert!(report.contains("- **discovery**: Found it"));
}

#[test]
fn command_transport_passes_dashed_text_verbatim() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = dir.path().join("promitheus.toml");
    std::fs::write(&config, "[inject]\nfile_name = \"MOOD.md\"\n").expect("write config");
    let workspace = tempfile::tempdir().expect("workspace");
    let transport = CommandTransport::with_program(BIN, AgentId::new("main").expect("id"))
        .data_dir(dir.path())
        .config_file(&config);

    let response = transport
        .execute(Request::LogEvent {
            event_type: "failure".into(),
            summary: "-3 tests failing".into(),
            significance: Some(0.4),
        })
        .expect("log");
    let Response::Event(outcome) = response else {
        panic!("expected event response");
    };
    assert_eq!(outcome.event.event_type, "failure");
    assert_eq!(outcome.event.summary, "-3 tests failing");
    assert!((outcome.event.significance - 0.4).abs() < f64::EPSILON);

    let response = transport
        .execute(Request::Inject {
            workspace: Some(workspace.path().to_path_buf()),
        })
        .expect("inject");
    assert_eq!(
        response,
        Response::Injected {
            path: workspace.path().join("MOOD.md")
        }
    );
    let report = std::fs::read_to_string(workspace.path().join("MOOD.md")).expect("read");
    assert!(report.contains("- **failure**: -3 tests failing"));
}
