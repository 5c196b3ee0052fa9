//! caa-redirect - Cover Art Archive redirect daemon

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use caa_redirect::{Config, Server};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Cover Art Archive redirect daemon
#[derive(Parser, Debug)]
#[command(name = "caa-redirect", version, about = "Redirect cover art requests to the archive")]
struct Args {
    /// TOML config file (CAA_* environment variables override it)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Address to listen on
    #[arg(short, long)]
    bind: Option<SocketAddr>,

    /// Path to the SQLite catalog database
    #[arg(short, long)]
    database: Option<String>,

    /// Base URL redirect targets are built under
    #[arg(long)]
    download_prefix: Option<String>,

    /// Emit logs as JSON lines
    #[arg(long)]
    log_json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "caa_redirect=info,tower_http=debug".into());
    let registry = tracing_subscriber::registry().with(filter);
    if args.log_json {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    let config = apply_args(Config::load(args.config.as_deref())?, &args);
    info!("Loaded config: {:?}", config);

    let server = Arc::new(Server::new(config).await?);

    let signal_server = server.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Received Ctrl-C, shutting down");
            signal_server.shutdown();
        }
    });

    server.run().await?;

    Ok(())
}

/// CLI flags take precedence over file and environment
fn apply_args(mut config: Config, args: &Args) -> Config {
    if let Some(bind) = args.bind {
        config = config.with_bind_addr(bind);
    }
    if let Some(database) = &args.database {
        config = config.with_db_path(database.clone());
    }
    if let Some(prefix) = &args.download_prefix {
        config = config.with_download_prefix(prefix.clone());
    }
    config
}
