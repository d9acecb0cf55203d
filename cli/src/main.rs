//! laurel — entry point for the badge awarding and acceptance flows.

mod flows;
mod prompt;
mod report;

use clap::Parser;
use std::path::PathBuf;

use laurel_engine::Config;

#[derive(Parser)]
#[command(name = "laurel", about = "Issue, award, and accept badges over relay networks")]
struct Cli {
    /// Path to a TOML configuration file. If provided, file settings are
    /// used as the base; CLI flags and env vars override them.
    #[arg(long, env = "LAUREL_CONFIG")]
    config: Option<PathBuf>,

    /// Relay URLs (comma-separated), overriding the configured list.
    #[arg(long, env = "LAUREL_RELAYS", value_delimiter = ',')]
    relays: Vec<String>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "LAUREL_LOG_LEVEL")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Award a badge: pick a definition, name recipients, publish.
    Award {
        /// Directory of badge definition JSON files (defaults to the
        /// configured directory).
        #[arg(long)]
        definitions: Option<PathBuf>,
    },
    /// Accept an awarded badge into your profile.
    Accept {
        /// Your private key (nsec). Prompted for when omitted.
        #[arg(long)]
        nsec: Option<String>,
        /// The badge definition coordinate (30009:<pubkey>:<identifier>).
        #[arg(long)]
        badge: Option<String>,
        /// The award event id (64-char hex).
        #[arg(long)]
        award: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::from_toml_file(path)?,
        None => Config::default(),
    };
    if !cli.relays.is_empty() {
        config.relays = cli.relays.clone();
    }
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }

    init_tracing(&config.log_level);
    tracing::debug!(relays = config.relays.len(), "configuration loaded");

    match cli.command {
        Command::Award { definitions } => flows::award(config, definitions).await,
        Command::Accept { nsec, badge, award } => flows::accept(config, nsec, badge, award).await,
    }
}

/// Initialize the tracing subscriber. `RUST_LOG` overrides the configured
/// level when set.
fn init_tracing(level: &str) {
    use tracing_subscriber::EnvFilter;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
