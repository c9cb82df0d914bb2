// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # memsim
//!
//! Command-line interface for the memory allocation engine.
//!
//! ## Usage
//! ```bash
//! # Generate processes for 30 ticks with first-fit segmentation
//! memsim simulate --method segmentation --ticks 30 --interval-ms 200
//!
//! # Apply a scripted sequence of allocations and releases
//! memsim replay ./scenario.toml
//!
//! # Print the effective configuration
//! memsim --config ./memsim.toml config
//! ```

mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "memsim",
    about = "Paging and segmentation memory allocation simulator",
    version,
    author
)]
struct Cli {
    /// Path to a TOML configuration file. Command-line flags override it.
    #[arg(short, long, global = true)]
    config: Option<std::path::PathBuf>,

    /// Enable verbose logging (repeat for more: -v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate random processes and let them expire after their lifetime.
    Simulate {
        /// Size of the simulated memory.
        #[arg(short, long)]
        memory_size: Option<usize>,

        /// Frame size; must divide the memory size.
        #[arg(short, long)]
        page_size: Option<usize>,

        /// Allocation method: paging or segmentation.
        #[arg(long)]
        method: Option<String>,

        /// Number of processes to generate.
        #[arg(short, long, default_value_t = 20)]
        ticks: usize,

        /// Delay between generated processes, in milliseconds.
        #[arg(long)]
        interval_ms: Option<u64>,

        /// Process lifetime, in seconds.
        #[arg(long)]
        lifetime_secs: Option<f64>,

        /// Seed for a reproducible run.
        #[arg(long)]
        seed: Option<u64>,

        /// Wait for every generated process to expire before exiting.
        #[arg(long)]
        drain: bool,
    },

    /// Apply the allocate/deallocate steps of a TOML script to a fresh engine.
    Replay {
        /// Path to the script.
        script: std::path::PathBuf,
    },

    /// Print the effective configuration as TOML.
    Config,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    commands::init_tracing(cli.verbose);
    let config = commands::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Simulate {
            memory_size,
            page_size,
            method,
            ticks,
            interval_ms,
            lifetime_secs,
            seed,
            drain,
        } => {
            let overrides = commands::simulate::Overrides {
                memory_size,
                page_size,
                method,
                interval_ms,
                lifetime_secs,
                seed,
            };
            commands::simulate::execute(config, overrides, ticks, drain).await
        }
        Commands::Replay { script } => commands::replay::execute(config, script),
        Commands::Config => commands::config::execute(&config),
    }
}
