//! Scout CLI entry point.

use anyhow::Result;
use clap::Parser;
use scout::cli::{commands, Cli, Commands};
use scout::config::Settings;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration. The token estimate runs even with a broken config.
    let loaded = match &cli.config {
        Some(path) => Settings::load_from(Some(&Settings::expand_path(path))),
        None => Settings::load(),
    };
    let settings = match &cli.command {
        Commands::Tokens { .. } => commands::tokens_settings(loaded),
        _ => loaded?,
    };

    // Initialize logging
    let log_level = match cli.debug {
        0 => settings.general.log_level.as_str(),
        1 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("scout={}", log_level)),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    // Execute command
    match &cli.command {
        Commands::Serve { host, port } => {
            commands::run_serve(host.clone(), *port, settings).await?;
        }

        Commands::Ask { query } => {
            commands::run_ask(query, settings).await?;
        }

        Commands::Tokens { dir, types, verbose } => {
            commands::run_tokens(dir, types, *verbose, &settings)?;
        }

        Commands::Config { action } => {
            commands::run_config(action, settings, cli.config.as_deref())?;
        }
    }

    Ok(())
}
