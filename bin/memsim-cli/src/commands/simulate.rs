// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `memsim simulate` command: drive the engine with generated processes.

use allocation_strategy::AllocationMethod;
use memory_manager::{MemoryManager, SimConfig, Simulation};
use std::sync::Arc;

/// Command-line values that replace configuration keys when present.
#[derive(Debug, Default)]
pub struct Overrides {
    pub memory_size: Option<usize>,
    pub page_size: Option<usize>,
    pub method: Option<String>,
    pub interval_ms: Option<u64>,
    pub lifetime_secs: Option<f64>,
    pub seed: Option<u64>,
}

impl Overrides {
    fn apply(self, mut config: SimConfig) -> anyhow::Result<SimConfig> {
        if let Some(v) = self.memory_size {
            config.memory_size = v;
        }
        if let Some(v) = self.page_size {
            config.page_size = v;
        }
        if let Some(v) = self.method {
            config.method = v.parse::<AllocationMethod>()?;
        }
        if let Some(v) = self.interval_ms {
            config.generate_interval_ms = v;
        }
        if let Some(v) = self.lifetime_secs {
            config.process_lifetime_secs = v;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        config.validate()?;
        Ok(config)
    }
}

pub async fn execute(
    config: SimConfig,
    overrides: Overrides,
    ticks: usize,
    drain: bool,
) -> anyhow::Result<()> {
    let config = overrides.apply(config)?;

    println!("  memsim · simulate");
    println!("   Memory:   {} (page size {})", config.memory_size, config.page_size);
    println!("   Method:   {}", config.method);
    println!(
        "   Sizes:    {}..={}",
        config.min_process_size, config.max_process_size
    );
    println!("   Lifetime: {:?}", config.lifetime());
    println!("   Interval: {:?}", config.interval());
    println!("   Ticks:    {ticks}");
    println!();

    let mm = Arc::new(MemoryManager::from_config(&config)?);
    let mut sim = Simulation::from_config(Arc::clone(&mm), &config)?;

    let report = sim.run(ticks).await;
    println!("  {}", report.summary().replace('\n', "\n  "));
    println!();
    super::print_engine(&mm);

    if drain {
        tracing::info!("waiting for {} scheduled releases", sim.pending());
        sim.drain().await;
        println!();
        println!("  After all lifetimes expired:");
        println!("  {}", mm.stats().summary());
    }

    Ok(())
}
