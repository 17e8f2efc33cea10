//! Markdown rendering of the current state for prompt injection.
//!
//! Rendering is pure; [`write_markdown`] is the only function here that
//! touches the filesystem.

use std::fmt::Write as _;
use std::path::Path;

use chrono::{DateTime, SecondsFormat, Utc};

use crate::config::InjectConfig;
use crate::error::Result;
use crate::mood::Band;
use crate::types::{EmotionalState, Event};

/// Guidance line for the valence band.
fn valence_guidance(band: Band) -> &'static str {
    match band {
        Band::High => "You're feeling good: let warmth and optimism come through naturally.",
        Band::Low => "You're in a low place: be honest about it, but stay constructive and kind.",
        Band::Mid => "Your mood is even: respond with calm, balanced engagement.",
    }
}

/// Guidance line for the arousal band.
fn arousal_guidance(band: Band) -> &'static str {
    match band {
        Band::High => "You're highly activated: channel the energy, but slow down before acting.",
        Band::Low => "You're calm: take time to be thoughtful and thorough.",
        Band::Mid => "Your focus is steady: keep a measured pace.",
    }
}

/// Guidance line for the energy band.
fn energy_guidance(band: Band) -> &'static str {
    match band {
        Band::High => "Energy is high: this is a good moment for ambitious or exploratory work.",
        Band::Low => "Energy is low: prefer short, focused answers and simple next steps.",
        Band::Mid => "Energy is moderate: pace yourself across longer tasks.",
    }
}

/// Shorten `text` to at most `max_chars` characters, ending in `…` when cut.
#[must_use]
pub fn truncate_summary(text: &str, max_chars: usize) -> String {
    let text = text.trim();
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let kept: String = text.chars().take(max_chars.saturating_sub(1)).collect();
    format!("{}…", kept.trim_end())
}

/// Render the state report.
///
/// `recent_events` is listed in the order given (newest first, as stored)
/// and cut to `config.recent_events`.
#[must_use]
pub fn render_markdown(
    state: &EmotionalState,
    thoughts: &[String],
    recent_events: &[Event],
    now: DateTime<Utc>,
    config: &InjectConfig,
) -> String {
    let mut out = String::new();

    // Writing into a String cannot fail.
    let _ = writeln!(out, "# Emotional State");
    let _ = writeln!(out);
    let _ = writeln!(out, "**Mood:** {}", state.mood);
    let _ = writeln!(
        out,
        "**Valence:** {:.2} · **Energy:** {:.2} · **Arousal:** {:.2}",
        state.valence, state.energy, state.arousal
    );
    let _ = writeln!(out);

    let _ = writeln!(out, "## Guidance");
    let _ = writeln!(out, "- {}", valence_guidance(Band::of_valence(state.valence)));
    let _ = writeln!(out, "- {}", arousal_guidance(Band::of_arousal(state.arousal)));
    let _ = writeln!(out, "- {}", energy_guidance(Band::of_energy(state.energy)));
    let _ = writeln!(out);

    if !thoughts.is_empty() {
        let _ = writeln!(out, "## Current Thoughts");
        for thought in thoughts {
            let _ = writeln!(out, "- {thought}");
        }
        let _ = writeln!(out);
    }

    let events: Vec<&Event> = recent_events.iter().take(config.recent_events).collect();
    if !events.is_empty() {
        let _ = writeln!(out, "## Recent Events");
        for event in events {
            let _ = writeln!(
                out,
                "- **{}**: {}",
                event.event_type,
                truncate_summary(&event.summary, config.summary_chars)
            );
        }
        let _ = writeln!(out);
    }

    let _ = writeln!(out, "---");
    let _ = writeln!(
        out,
        "_Last updated: {}_",
        now.to_rfc3339_opts(SecondsFormat::Secs, true)
    );
    out
}

/// Write a rendered report to `path`, replacing any existing file.
///
/// # Errors
///
/// Returns [`crate::PromitheusError::Io`] if the directory cannot be created
/// or the file cannot be written.
pub fn write_markdown(path: &Path, markdown: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(path, markdown)?;
    tracing::debug!(path = %path.display(), bytes = markdown.len(), "Wrote state report");
    Ok(())
}
