// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! vigild — the autonomous agent's background process.
//!
//! Loads `config.yaml`, builds the collaborator set, and drives the
//! Agent Loop until SIGINT/SIGTERM arrives at a cycle boundary.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

use std::path::PathBuf;
use std::time::Duration;

use tracing::info;
use vigil_daemon::{agent_loop, Config, Services};

const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(500);

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    if let Some(arg) = std::env::args().nth(1) {
        match arg.as_str() {
            "--version" | "-V" | "-v" => {
                println!("vigild {}", env!("CARGO_PKG_VERSION"));
                return Ok(());
            }
            "--help" | "-h" | "help" => {
                println!("vigild {}", env!("CARGO_PKG_VERSION"));
                println!("The autonomous agent's background process.");
                println!();
                println!("USAGE:");
                println!("    vigild");
                println!();
                println!("Reads its configuration from $VIGIL_CONFIG, defaulting to");
                println!("./config.yaml. Typically started by the `vigil` CLI's `run`");
                println!("subcommand rather than invoked directly.");
                return Ok(());
            }
            _ => {
                eprintln!("error: unexpected argument '{arg}'");
                eprintln!("Usage: vigild [--help | --version]");
                std::process::exit(1);
            }
        }
    }

    let config_path = std::env::var("VIGIL_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.yaml"));
    let config = Config::load(&config_path)?;

    let _log_guard = vigil_daemon::logging::init(&config.logging, &config.agent_home.join("logs"))?;
    info!(config = %config_path.display(), "starting vigild");

    let services = Services::from_config(&config);
    let shutdown = agent_loop::install_shutdown_handler();

    println!("READY");
    agent_loop::run(&services, DEFAULT_TICK_INTERVAL, &shutdown).await;

    info!("vigild stopped");
    Ok(())
}
