//! `promitheus`: inspect and drive an agent's emotional state from a shell.
//!
//! Logs go to stderr; stdout carries only the result, as plain text or (with
//! `--json`) as the tagged `Response` JSON the command transport reads.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use promitheus_core::config::PromitheusConfig;
use promitheus_core::engine::Engine;
use promitheus_core::mood;
use promitheus_core::types::AgentId;
use promitheus_host::{Request, dispatch};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Agent identity whose state to use
    #[arg(short, long, env = "PROMITHEUS_AGENT", default_value = "main", global = true)]
    agent: String,

    /// Directory holding per-agent state (overrides the config file)
    #[arg(long, env = "PROMITHEUS_DATA_DIR", global = true)]
    data_dir: Option<PathBuf>,

    /// TOML configuration file
    #[arg(short, long, env = "PROMITHEUS_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Show the current state and a few thoughts
    Status,
    /// Like status, but store the thoughts and always save
    Sync,
    /// Record an event
    Log {
        /// Event type, e.g. milestone, error, praise
        event_type: String,
        /// What happened
        summary: String,
        /// Weight between 0 and 1 (defaults per event type)
        #[arg(short, long, allow_negative_numbers = true)]
        significance: Option<f64>,
    },
    /// Sample thoughts for the current state
    Think {
        /// How many thoughts
        #[arg(short = 'n', long)]
        count: Option<usize>,
    },
    /// Write EMOTIONAL_STATE.md into a workspace
    Inject {
        /// Target directory (defaults to the configured workspace or the current directory)
        #[arg(short, long)]
        workspace: Option<PathBuf>,
    },
    /// List recent events, newest first
    Events {
        /// How many events
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },
    /// Print the state report without writing it
    Render,
    /// Classify a point in (valence, arousal, energy) space
    Classify {
        /// -1.0 to 1.0
        #[arg(allow_negative_numbers = true)]
        valence: f64,
        /// 0.0 to 1.0
        arousal: f64,
        /// 0.0 to 1.0
        energy: f64,
    },
}

impl Cmd {
    /// The engine request for this command, or `None` for commands that do
    /// not touch state.
    fn request(&self) -> Option<Request> {
        let request = match self {
            Self::Status => Request::Status,
            Self::Sync => Request::Sync,
            Self::Log {
                event_type,
                summary,
                significance,
            } => Request::LogEvent {
                event_type: event_type.clone(),
                summary: summary.clone(),
                significance: *significance,
            },
            Self::Think { count } => Request::Think { count: *count },
            Self::Inject { workspace } => Request::Inject {
                workspace: workspace.clone(),
            },
            Self::Events { limit } => Request::Events { limit: *limit },
            Self::Render => Request::Render,
            Self::Classify { .. } => return None,
        };
        Some(request)
    }
}

fn load_config(args: &Args) -> anyhow::Result<PromitheusConfig> {
    let mut config = match &args.config {
        Some(path) => PromitheusConfig::from_file(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => PromitheusConfig::default(),
    };
    if let Some(dir) = &args.data_dir {
        config.storage.data_dir = Some(dir.clone());
    }
    Ok(config)
}

fn init_tracing(config: &PromitheusConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.general.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = load_config(&args)?;
    init_tracing(&config);

    let Some(request) = args.command.request() else {
        if let Cmd::Classify {
            valence,
            arousal,
            energy,
        } = args.command
        {
            let label = mood::classify(valence, arousal, energy);
            if args.json {
                println!("{}", serde_json::json!({ "mood": label }));
            } else {
                println!("{label}");
            }
        }
        return Ok(());
    };

    let agent = AgentId::new(&args.agent)?;
    debug!(agent = %agent, ?request, "Running command");
    let mut engine = Engine::open(agent, config);
    let response = dispatch(&mut engine, request)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&response)?);
    } else {
        println!("{}", response.summary());
    }
    Ok(())
}
