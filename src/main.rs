//! receiver-config - Decode and validate alert notification receivers.

use anyhow::Result;
use clap::Parser;
use tracing::{error, info};

use receiver_config::cli::{Cli, LogFormat};
use receiver_config::config::{Config, Receiver, ReceiverKind};

/// Initialize the tracing subscriber with the specified log format.
fn init_logging(format: LogFormat) {
    let filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing::Level::INFO.into());

    match format {
        LogFormat::Text => {
            tracing_subscriber::fmt()
                .with_writer(std::io::stderr)
                .with_env_filter(filter)
                .init();
        }
        LogFormat::Json => {
            tracing_subscriber::fmt()
                .with_writer(std::io::stderr)
                .json()
                .with_current_span(true)
                .with_span_list(false)
                .flatten_event(true)
                .with_env_filter(filter)
                .init();
        }
    }
}

/// One-line summary of a receiver's integrations, e.g. `email x2, webhook x1`.
fn integrations(receiver: &Receiver) -> String {
    let parts: Vec<String> = ReceiverKind::ALL
        .into_iter()
        .filter_map(|kind| match receiver.configs_of(kind).count() {
            0 => None,
            n => Some(format!("{} x{}", kind, n)),
        })
        .collect();

    if parts.is_empty() {
        "no integrations".to_string()
    } else {
        parts.join(", ")
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.log_format);

    info!(config_path = %cli.config.display(), "Loading configuration");

    // Fail-fast: the first invalid block rejects the whole file
    let config = match Config::load(&cli.config) {
        Ok(c) => c,
        Err(e) => {
            error!(error = %e, path = %cli.config.display(), "Failed to load configuration");
            std::process::exit(1);
        }
    };

    if cli.dump {
        print!("{}", serde_yaml::to_string(&config)?);
        return Ok(());
    }

    println!("Configuration is valid: {}", cli.config.display());
    println!("  Receivers: {}", config.receivers.len());
    for receiver in &config.receivers {
        println!("    {}: {}", receiver.name, integrations(receiver));
    }

    Ok(())
}
