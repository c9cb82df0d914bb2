// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # memory-manager
//!
//! A thread-safe memory allocation engine that places processes into a
//! simulated address space by paging or first-fit segmentation, and keeps
//! fragmentation statistics and a bounded event log up to date.
//!
//! # Key Components
//!
//! - [`MemoryManager`]: the orchestrator. Every command and query goes
//!   through one lock, so callers always observe a consistent snapshot.
//! - [`Stats`]: utilisation and fragmentation, recomputed after each change.
//! - [`EventLog`]: the last ten command outcomes; five are exposed.
//! - [`ProcessGenerator`] and [`Simulation`]: synthetic workload with
//!   lifetime-based release via [`schedule_release`].
//! - [`SimConfig`]: TOML-backed configuration for all of the above.
//!
//! # Command Flow
//!
//! ```text
//! allocate(pid, size, method)
//!       │  validate (size, duplicate id)
//!       ▼
//!   method.strategy().allocate(space)  ──► ProcessAllocation
//!       │                                      │
//!       ▼                                      ▼
//!   event log  ◄── outcome              registry[pid]
//!       │
//!       ▼
//!   Stats::compute(space, registry)
//! ```
//!
//! # Example
//! ```
//! use address_space::ProcessId;
//! use allocation_strategy::AllocationMethod;
//! use memory_manager::{EventKind, MemoryManager};
//!
//! let mm = MemoryManager::new(256, 16).unwrap();
//! mm.allocate(ProcessId(1), 32, AllocationMethod::Paging).unwrap();
//! mm.allocate(ProcessId(2), 20, AllocationMethod::Segmentation).unwrap();
//!
//! let stats = mm.stats();
//! assert_eq!(stats.process_count, 2);
//! assert_eq!(stats.used_memory, 52);
//!
//! mm.deallocate(ProcessId(1)).unwrap();
//! let last = mm.recent_events().pop().unwrap();
//! assert_eq!(last.kind, EventKind::Deallocation);
//! ```

mod config;
mod error;
pub mod events;
mod generator;
mod lifetime;
mod manager;
mod simulation;
mod stats;

pub use config::SimConfig;
pub use error::{AllocationError, ConfigError, DeallocationError};
pub use events::{Event, EventKind, EventLog};
pub use generator::ProcessGenerator;
pub use lifetime::{schedule_release, ReleaseOutcome};
pub use manager::MemoryManager;
pub use simulation::{Simulation, SimulationReport};
pub use stats::Stats;
