// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use extratos::config::{CliOverrides, build_config};

/// Submit client account statements to the processing webhook.
#[derive(Parser, Debug)]
#[command(name = "extratos")]
#[command(version, about, long_about = None)]
struct Args {
    /// Configuration file path (TOML format)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "EXTRATOS_LOG_LEVEL")]
    log_level: Option<String>,
}

impl From<Args> for CliOverrides {
    fn from(args: Args) -> Self {
        CliOverrides {
            config_file: args.config,
            log_level: args.log_level,
        }
    }
}

fn init_tracing(log_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn main() -> anyhow::Result<()> {
    let overrides: CliOverrides = Args::parse().into();
    let config = build_config(&overrides).context("Invalid configuration")?;

    init_tracing(&config.log_level);
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        webhook = %config.webhook_url,
        "Starting extratos"
    );

    extratos::app::run(&config).map_err(|e| anyhow::anyhow!("UI failed: {e}"))
}
