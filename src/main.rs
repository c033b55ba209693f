// geopin - terminal map target acquisition
//
// Interactive map in the terminal: acquire your position via a one-shot
// geolocation lookup (or place it by hand), see it pinned with an accuracy
// radius, and copy the coordinates to the clipboard.
//
// Architecture:
// - Session: the LocationSession state machine owning position/status state
// - Geo: async IP geolocation provider (reqwest)
// - TUI (ratatui): world map canvas, readout, status feed, log tail
// - Logging: tracing captured to an in-memory buffer for the TUI

mod cli;
mod clipboard;
mod config;
mod effects;
mod geo;
mod logging;
mod session;
mod tui;

use anyhow::Result;
use config::Config;
use logging::{LogBuffer, TuiLogLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // Handle CLI subcommands first (config --show, --reset, --edit, --path)
    let Some(cli) = cli::handle_cli() else {
        return Ok(());
    };

    // Ensure config template exists (helps users discover options)
    Config::ensure_config_exists();

    let mut config = Config::from_env();
    if cli.offline {
        config.provider.enabled = false;
    }

    // Logs go to an in-memory buffer the TUI renders; printing to stdout
    // would garble the alternate screen. File logging is optional on top.
    //
    // Precedence: RUST_LOG env var > config file > default "info"
    let log_buffer = LogBuffer::new();
    let default_filter = format!("geopin={}", config.logging.level);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into());

    // The guard must stay alive for the duration of the program so file
    // logs flush on exit
    let _file_guard: Option<tracing_appender::non_blocking::WorkerGuard> =
        if config.logging.file_enabled {
            match std::fs::create_dir_all(&config.logging.file_dir) {
                Ok(()) => {
                    let appender = tracing_appender::rolling::daily(
                        &config.logging.file_dir,
                        &config.logging.file_prefix,
                    );
                    let (non_blocking, guard) = tracing_appender::non_blocking(appender);
                    tracing_subscriber::registry()
                        .with(filter)
                        .with(TuiLogLayer::new(log_buffer.clone()))
                        .with(
                            tracing_subscriber::fmt::layer()
                                .json()
                                .with_writer(non_blocking)
                                .with_ansi(false),
                        )
                        .init();
                    Some(guard)
                }
                Err(e) => {
                    eprintln!(
                        "Warning: Could not create log directory {:?}: {}",
                        config.logging.file_dir, e
                    );
                    tracing_subscriber::registry()
                        .with(filter)
                        .with(TuiLogLayer::new(log_buffer.clone()))
                        .init();
                    None
                }
            }
        } else {
            tracing_subscriber::registry()
                .with(filter)
                .with(TuiLogLayer::new(log_buffer.clone()))
                .init();
            None
        };

    tracing::info!("geopin v{} starting", config::VERSION);
    if !config.provider.enabled {
        tracing::warn!("Geolocation provider disabled; manual placement only");
    }

    if let Err(e) = tui::run_tui(config, log_buffer).await {
        tracing::error!("TUI error: {:?}", e);
        return Err(e);
    }

    tracing::info!("Shutdown complete");
    Ok(())
}
