// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! vigil — the control surface for the autonomous agent runtime. Drives
//! `vigil-daemon` directly in-process for `tick`/`run`/`health`/`init`;
//! the remaining subcommands are deliberate stubs for collaborator
//! surfaces this core does not implement (spec.md §1, §6).

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod commands;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "vigil", version, about = "Control surface for the autonomous agent runtime")]
struct Cli {
    /// Path to the daemon's YAML config file
    #[arg(short = 'c', long = "config", global = true, default_value = "config.yaml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run a single PLAN->ACT->OBSERVE->REFLECT->DECIDE pass and exit
    Tick,
    /// Tick continuously on an interval until interrupted
    Run {
        #[arg(long, default_value_t = 30)]
        interval: u64,
    },
    /// Report whether the LM provider and agent home are reachable
    Health,
    /// Create the agent-home directory skeleton
    Init,
    /// Write a daily activity summary
    Summarize {
        #[arg(long)]
        date: Option<String>,
    },
    /// Snapshot the agent home via the maintenance collaborator
    Snapshot {
        #[arg(long)]
        reason: Option<String>,
    },
    /// Restore the agent home from a prior snapshot
    Restore { reference: String },
    /// Run the full daily maintenance routine
    Maintain,
    /// Search memory and task history for a query
    Recall {
        query: String,
        #[arg(long)]
        days: Option<u32>,
    },
    /// List known skills
    SkillList,
    /// Show skill usage statistics
    SkillStats,
    /// Promote a candidate skill to core
    SkillPromote { name: String },
    /// Draft a new skill from recent history
    SkillDraft { name: String },
    /// List recorded beliefs
    BeliefList,
    /// Record a new belief
    BeliefAdd { statement: String },
    /// Contest an existing belief
    BeliefContest { id: String },
    /// Purge low-confidence or stale beliefs
    BeliefPurge {
        #[arg(long)]
        dry_run: bool,
    },
    /// Check the belief set for internal contradictions
    CoherenceCheck,
    /// Serve the web dashboard
    Web {
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
        #[arg(long, default_value_t = 8787)]
        port: u16,
    },
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Tick => commands::core::tick(&cli.config).await,
        Commands::Run { interval } => commands::core::run(&cli.config, Duration::from_secs(interval)).await,
        Commands::Health => commands::core::health(&cli.config).await,
        Commands::Init => commands::core::init(&cli.config),
        Commands::Summarize { date } => commands::maintenance::summarize(&cli.config, date.as_deref()).await,
        Commands::Snapshot { reason } => commands::maintenance::snapshot(&cli.config, reason.as_deref()).await,
        Commands::Restore { reference } => commands::maintenance::restore(&cli.config, &reference).await,
        Commands::Maintain => commands::maintenance::maintain(&cli.config).await,
        Commands::Recall { query, days } => {
            commands::stub::not_implemented(&format!("recall '{query}' (days={days:?})"))
        }
        Commands::SkillList => commands::stub::not_implemented("skill-list"),
        Commands::SkillStats => commands::stub::not_implemented("skill-stats"),
        Commands::SkillPromote { name } => commands::stub::not_implemented(&format!("skill-promote '{name}'")),
        Commands::SkillDraft { name } => commands::stub::not_implemented(&format!("skill-draft '{name}'")),
        Commands::BeliefList => commands::stub::not_implemented("belief-list"),
        Commands::BeliefAdd { statement } => commands::stub::not_implemented(&format!("belief-add '{statement}'")),
        Commands::BeliefContest { id } => commands::stub::not_implemented(&format!("belief-contest '{id}'")),
        Commands::BeliefPurge { dry_run } => {
            commands::stub::not_implemented(&format!("belief-purge (dry_run={dry_run})"))
        }
        Commands::CoherenceCheck => commands::stub::not_implemented("coherence-check"),
        Commands::Web { host, port } => commands::stub::not_implemented(&format!("web {host}:{port}")),
    }
}

#[cfg(test)]
#[path = "main_tests.rs"]
mod tests;
