use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use liked_songs_playlist_sync as lib;
use lib::api::spotify::SpotifyClient;
use lib::config::Config;
use lib::credentials::{CredentialProvider, EnvCredentialProvider};
use std::path::{Path, PathBuf};
use tracing::subscriber as tracing_subscriber_global;
use tracing_appender::rolling::RollingFileAppender;
use tracing_log::LogTracer;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "liked-songs-playlist-sync", version)]
struct Cli {
    /// Path to config TOML
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one synchronization pass (one-shot)
    Sync,
    /// Validate config file and exit
    ConfigValidate,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Resolve config: explicit --config overrides; otherwise prefer the
    // system-wide file and fall back to built-in defaults for local usage.
    let cfg = match &cli.config {
        Some(p) => Config::from_path(p)
            .with_context(|| format!("loading config from {}", p.display()))?,
        None => {
            let etc_path = Path::new("/etc/liked-songs-sync/config.toml");
            if etc_path.exists() {
                Config::from_path(etc_path)
                    .with_context(|| format!("loading config from {}", etc_path.display()))?
            } else {
                Config::default()
            }
        }
    };

    // Initialize log->tracing bridge and structured logging.
    // Logs go to both stdout and a daily-rotated file in cfg.log_dir.
    let _ = LogTracer::init();
    let file_appender: RollingFileAppender =
        tracing_appender::rolling::daily(&cfg.log_dir, "liked-songs-sync.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    // Honor RUST_LOG if set, otherwise default to info.
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let file_layer = fmt::layer().with_writer(non_blocking);
    let stdout_layer = fmt::layer().with_writer(std::io::stdout);

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(stdout_layer);
    let _ = tracing_subscriber_global::set_global_default(subscriber);

    match cli.command {
        Commands::ConfigValidate => {
            println!("config OK: syncing playlist {:?}", cfg.playlist_name);
            Ok(())
        }
        Commands::Sync => {
            let token = EnvCredentialProvider::new()
                .bearer_token()
                .context("resolving bearer token")?;
            let client = SpotifyClient::new(token);
            let report = lib::sync::sync_liked_playlist(&client, &cfg)
                .await
                .context("sync failed")?;
            println!(
                "Playlist updated! {} songs added, {} songs removed.",
                report.added, report.removed
            );
            println!(
                "https://open.spotify.com/playlist/{}",
                report.playlist_id
            );
            Ok(())
        }
    }
}
