// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Auto-generating simulation loop.
//!
//! Each tick generates one process, tries to allocate it, and schedules its
//! release after the configured lifetime. The loop is just another caller of
//! [`MemoryManager`]; it holds no engine state of its own.

use crate::lifetime::{schedule_release, ReleaseOutcome};
use crate::{ConfigError, MemoryManager, ProcessGenerator, SimConfig, Stats};
use crate::events::Event;
use address_space::ProcessId;
use allocation_strategy::AllocationMethod;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// Counts gathered over a simulation run.
#[derive(Debug, Clone, serde::Serialize)]
pub struct SimulationReport {
    /// Processes generated.
    pub attempted: usize,
    /// Processes that were allocated.
    pub allocated: usize,
    /// Processes the engine rejected.
    pub failed: usize,
    /// Engine statistics when the run ended.
    pub stats: Stats,
    /// Most recent engine events when the run ended.
    pub recent_events: Vec<Event>,
}

impl SimulationReport {
    /// Returns a human-readable summary.
    pub fn summary(&self) -> String {
        format!(
            "Simulation: {} generated, {} allocated, {} failed\n{}",
            self.attempted,
            self.allocated,
            self.failed,
            self.stats.summary(),
        )
    }
}

/// Drives an engine with generated processes.
#[derive(Debug)]
pub struct Simulation {
    manager: Arc<MemoryManager>,
    generator: ProcessGenerator,
    method: AllocationMethod,
    lifetime: Duration,
    interval: Duration,
    pending_releases: Vec<JoinHandle<ReleaseOutcome>>,
}

impl Simulation {
    /// Creates a simulation with a 10 s lifetime and a 1 s interval.
    pub fn new(
        manager: Arc<MemoryManager>,
        generator: ProcessGenerator,
        method: AllocationMethod,
    ) -> Self {
        let (min_size, max_size) = generator.size_range();
        tracing::info!("simulation: {method} processes of size {min_size}..={max_size}");
        Self {
            manager,
            generator,
            method,
            lifetime: Duration::from_secs(10),
            interval: Duration::from_secs(1),
            pending_releases: Vec::new(),
        }
    }

    /// Creates a simulation from a validated configuration.
    pub fn from_config(manager: Arc<MemoryManager>, config: &SimConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let generator = ProcessGenerator::from_config(config)?;
        Ok(Self::new(manager, generator, config.method)
            .with_lifetime(config.lifetime())
            .with_interval(config.interval()))
    }

    pub fn with_lifetime(mut self, lifetime: Duration) -> Self {
        self.lifetime = lifetime;
        self
    }

    /// Sets the delay between generated processes (at least 1 ms).
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval.max(MIN_INTERVAL);
        self
    }

    pub fn manager(&self) -> &Arc<MemoryManager> {
        &self.manager
    }

    /// Generates and allocates one process, scheduling its release on
    /// success. Returns the id and whether it was allocated.
    pub fn step(&mut self) -> (ProcessId, bool) {
        let (pid, size) = self.generator.generate();
        match self.manager.allocate(pid, size, self.method) {
            Ok(()) => {
                let handle = schedule_release(Arc::clone(&self.manager), pid, self.lifetime);
                self.pending_releases.push(handle);
                (pid, true)
            }
            Err(e) => {
                tracing::warn!("generated process {pid} (size {size}) not allocated: {e}");
                (pid, false)
            }
        }
    }

    /// Runs `ticks` steps, one per interval.
    pub async fn run(&mut self, ticks: usize) -> SimulationReport {
        let mut allocated = 0;
        let mut interval = tokio::time::interval(self.interval);

        for _ in 0..ticks {
            interval.tick().await;
            if self.step().1 {
                allocated += 1;
            }
            self.pending_releases.retain(|h| !h.is_finished());
        }

        SimulationReport {
            attempted: ticks,
            allocated,
            failed: ticks - allocated,
            stats: self.manager.stats(),
            recent_events: self.manager.recent_events(),
        }
    }

    /// Waits for every scheduled release to fire.
    pub async fn drain(&mut self) {
        for handle in self.pending_releases.drain(..) {
            if let Err(e) = handle.await {
                tracing::error!("release task failed: {e}");
            }
        }
    }

    /// Aborts every scheduled release, resets the engine to `config`'s
    /// geometry and restarts generated ids at 1.
    pub fn reset(&mut self, config: &SimConfig) -> Result<(), ConfigError> {
        self.manager.reset(config.memory_size, config.page_size)?;
        for handle in self.pending_releases.drain(..) {
            handle.abort();
        }
        self.generator.reset();
        Ok(())
    }

    /// Number of releases not yet fired.
    pub fn pending(&self) -> usize {
        self.pending_releases.iter().filter(|h| !h.is_finished()).count()
    }
}
