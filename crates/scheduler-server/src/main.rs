use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use scheduler_server::{config::Config, AppState};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

/// Personal task planner with recurring tasks, served over HTTP
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Configuration file to read before the environment
    #[arg(long, default_value = scheduler_server::config::DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Port to listen on (overrides TODO_PORT)
    #[arg(long)]
    port: Option<u16>,

    /// SQLite database file (overrides TODO_DBFILE)
    #[arg(long)]
    dbfile: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let mut config = Config::load(&cli.config)
        .with_context(|| format!("failed to load configuration from {}", cli.config.display()))?;
    if let Some(port) = cli.port {
        config.port = port;
    }
    if let Some(dbfile) = cli.dbfile {
        config.dbfile = dbfile;
    }

    let state = AppState::from_config(&config)
        .await
        .with_context(|| format!("failed to open database {}", config.dbfile))?;

    if state.secret().is_none() {
        tracing::warn!("no password configured, task endpoints are unauthenticated");
    }

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    tracing::info!(
        %addr,
        dbfile = %config.dbfile,
        web_dir = %config.web_dir.display(),
        "scheduler listening"
    );

    scheduler_server::run(listener, state, &config.web_dir)
        .await
        .context("server terminated")
}
