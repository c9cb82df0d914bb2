// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

pub mod config;
pub mod replay;
pub mod simulate;

use memory_manager::{MemoryManager, SimConfig};
use std::path::Path;
use tracing_subscriber::EnvFilter;

/// Installs the global subscriber. `RUST_LOG` wins over `-v`.
pub fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

/// Reads `path` if given, otherwise returns the defaults.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<SimConfig> {
    let config = match path {
        Some(path) => {
            tracing::info!("loading configuration from {}", path.display());
            SimConfig::from_file(path)?
        }
        None => SimConfig::default(),
    };
    Ok(config)
}

/// Prints blocks, frames, stats and recent events.
pub fn print_engine(mm: &MemoryManager) {
    println!("  Blocks:");
    for block in mm.blocks() {
        let owner = block
            .owner
            .map_or_else(|| "free".to_string(), |p| p.to_string());
        println!(
            "   [{:>6} - {:>6}] {:>6}  {owner}",
            block.start, block.end, block.size
        );
    }
    println!();

    println!("  Frames:");
    let row: Vec<String> = mm
        .frames()
        .iter()
        .map(|f| f.owner.map_or_else(|| ".".to_string(), |p| p.to_string()))
        .collect();
    for chunk in row.chunks(16) {
        println!("   {}", chunk.join(" "));
    }
    println!();

    println!("  {}", mm.stats().summary());
    println!();

    println!("  Recent events:");
    for event in mm.recent_events() {
        let marker = if event.kind.is_failure() { "!" } else { " " };
        println!("  {marker}{event}");
    }
}
