// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The allocation engine's public command/query surface.
//!
//! ```text
//!  allocate / deallocate          blocks / frames / stats / recent_events
//!          │                                      ▲
//!          ▼                                      │ copies
//!  ┌────────────────── Mutex<EngineState> ───────────────────┐
//!  │ validate → AllocationStrategy → AddressSpace            │
//!  │          → registry → Stats::compute → EventLog         │
//!  └─────────────────────────────────────────────────────────┘
//! ```
//!
//! # Thread Safety
//! All engine state sits behind one mutex. Every command and every query
//! takes it, so callers never observe a half-applied mutation. No
//! operation waits on another or performs I/O while holding the lock.
//!
//! # Atomicity
//! Commands validate first and only then mutate. Strategies are
//! all-or-nothing, so a failed command leaves blocks, frames and the
//! registry exactly as they were, and still appends one event.

use crate::events::{Event, EventKind, EventLog, RECENT_EVENT_LIMIT};
use crate::{AllocationError, ConfigError, DeallocationError, SimConfig, Stats};
use address_space::{AddressSpace, Block, Frame, ProcessId};
use allocation_strategy::{AllocationMethod, Placement, ProcessAllocation};
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Everything the engine owns, guarded as one unit.
#[derive(Debug)]
struct EngineState {
    space: AddressSpace,
    registry: BTreeMap<ProcessId, ProcessAllocation>,
    events: EventLog,
    stats: Stats,
    /// Incremented on every reset.
    epoch: u64,
}

impl EngineState {
    fn new(space: AddressSpace, epoch: u64) -> Self {
        let stats = Stats::compute(&space, []);
        Self {
            space,
            registry: BTreeMap::new(),
            events: EventLog::new(),
            stats,
            epoch,
        }
    }

    fn recompute_stats(&mut self) {
        self.stats = Stats::compute(&self.space, self.registry.values());
        debug_assert!(
            self.space.check_invariants().is_ok(),
            "{:?}",
            self.space.check_invariants()
        );
    }

    fn allocate(
        &mut self,
        pid: ProcessId,
        size: usize,
        method: AllocationMethod,
    ) -> Result<(), AllocationError> {
        if size == 0 {
            return self.reject_allocation(pid, AllocationError::InvalidSize { size });
        }
        if self.registry.contains_key(&pid) {
            return self.reject_allocation(pid, AllocationError::DuplicateProcessId(pid));
        }

        let strategy = method.strategy();
        let allocation = match strategy.allocate(&mut self.space, pid, size) {
            Ok(allocation) => allocation,
            Err(e) => {
                return self.reject_allocation(pid, AllocationError::from_strategy(pid, e));
            }
        };

        let detail = match &allocation.placement {
            Placement::Frames { frame_ids } => {
                format!("Allocated {} pages for size {size}", frame_ids.len())
            }
            Placement::Range { start, .. } => {
                format!("Allocated segment of size {size} at address {start}")
            }
        };

        self.registry.insert(pid, allocation);
        self.recompute_stats();
        tracing::info!("{pid}: {detail} ({})", strategy.name());
        self.events.record(pid, EventKind::Allocation, detail);
        Ok(())
    }

    fn reject_allocation(
        &mut self,
        pid: ProcessId,
        err: AllocationError,
    ) -> Result<(), AllocationError> {
        let detail = match &err {
            AllocationError::InsufficientFrames {
                needed, available, ..
            } => format!("Not enough free frames. Needed {needed}, available {available}"),
            AllocationError::NoSuitableBlock { requested, .. } => {
                format!("No suitable free block found for size {requested}")
            }
            other => other.to_string(),
        };
        tracing::warn!("{pid}: allocation failed: {err}");
        self.events.record(pid, EventKind::AllocationFailed, detail);
        Err(err)
    }

    fn deallocate(&mut self, pid: ProcessId) -> Result<(), DeallocationError> {
        let Some(allocation) = self.registry.get(&pid) else {
            let err = DeallocationError::ProcessNotFound(pid);
            tracing::warn!("{pid}: deallocation failed: {err}");
            self.events
                .record(pid, EventKind::DeallocationFailed, err.to_string());
            return Err(err);
        };

        let strategy = allocation.method.strategy();
        if let Err(e) = strategy.release(&mut self.space, pid, allocation) {
            let err = DeallocationError::Internal(e);
            tracing::error!("{pid}: deallocation failed: {err}");
            self.events
                .record(pid, EventKind::DeallocationFailed, err.to_string());
            return Err(err);
        }

        self.registry.remove(&pid);
        self.recompute_stats();
        tracing::info!("{pid}: removed from memory ({})", strategy.name());
        self.events
            .record(pid, EventKind::Deallocation, "Process removed from memory");
        Ok(())
    }
}

/// The memory allocation engine.
///
/// Share it across threads or tasks with `Arc<MemoryManager>`.
///
/// # Example
/// ```
/// use address_space::ProcessId;
/// use allocation_strategy::AllocationMethod;
/// use memory_manager::MemoryManager;
///
/// let mm = MemoryManager::new(256, 16).unwrap();
/// mm.allocate(ProcessId(1), 40, AllocationMethod::Paging).unwrap();
/// assert_eq!(mm.stats().internal_fragmentation, 8);
///
/// mm.deallocate(ProcessId(1)).unwrap();
/// assert_eq!(mm.blocks().len(), 1);
/// ```
#[derive(Debug)]
pub struct MemoryManager {
    state: Mutex<EngineState>,
}

impl MemoryManager {
    /// Creates an engine with one free block and `memory_size / page_size`
    /// free frames.
    ///
    /// Fails with [`ConfigError::InvalidConfiguration`] if either size is
    /// zero or `page_size` does not divide `memory_size`.
    pub fn new(memory_size: usize, page_size: usize) -> Result<Self, ConfigError> {
        let space = AddressSpace::new(memory_size, page_size)?;
        tracing::info!(
            "memory manager created: {memory_size} units, {} frames of {page_size}",
            space.num_frames()
        );
        Ok(Self {
            state: Mutex::new(EngineState::new(space, 0)),
        })
    }

    /// Creates an engine with the geometry of `config`.
    pub fn from_config(config: &SimConfig) -> Result<Self, ConfigError> {
        Self::new(config.memory_size, config.page_size)
    }

    // ── Commands ───────────────────────────────────────────────────

    /// Places `size` units for `pid` using `method`.
    ///
    /// Fails with [`AllocationError::InvalidSize`] for a zero size and
    /// [`AllocationError::DuplicateProcessId`] if `pid` is already
    /// allocated; otherwise with the strategy's failure. Appends exactly
    /// one event either way.
    pub fn allocate(
        &self,
        pid: ProcessId,
        size: usize,
        method: AllocationMethod,
    ) -> Result<(), AllocationError> {
        self.lock().allocate(pid, size, method)
    }

    /// Releases everything `pid` holds, using the strategy that placed it.
    pub fn deallocate(&self, pid: ProcessId) -> Result<(), DeallocationError> {
        self.lock().deallocate(pid)
    }

    /// Releases `pid` only if the engine has not been reset since `epoch`.
    ///
    /// Returns `None` when the release was skipped.
    pub fn deallocate_in_epoch(
        &self,
        pid: ProcessId,
        epoch: u64,
    ) -> Option<Result<(), DeallocationError>> {
        let mut state = self.lock();
        if state.epoch != epoch {
            tracing::debug!(
                "{pid}: skipping release scheduled in epoch {epoch} (now {})",
                state.epoch
            );
            return None;
        }
        Some(state.deallocate(pid))
    }

    /// Replaces the whole engine with a fresh one of the given geometry.
    ///
    /// On invalid geometry the current engine is left untouched.
    pub fn reset(&self, memory_size: usize, page_size: usize) -> Result<(), ConfigError> {
        let space = AddressSpace::new(memory_size, page_size)?;
        let mut state = self.lock();
        let epoch = state.epoch + 1;
        *state = EngineState::new(space, epoch);
        tracing::info!("memory manager reset: {memory_size} units, page size {page_size}");
        Ok(())
    }

    // ── Queries ────────────────────────────────────────────────────

    /// The block sequence in address order.
    pub fn blocks(&self) -> Vec<Block> {
        self.lock().space.blocks().to_vec()
    }

    /// The frame table in frame-id order.
    pub fn frames(&self) -> Vec<Frame> {
        self.lock().space.frames().to_vec()
    }

    /// Current usage and fragmentation statistics.
    pub fn stats(&self) -> Stats {
        self.lock().stats.clone()
    }

    /// Up to five most recent events, oldest first.
    pub fn recent_events(&self) -> Vec<Event> {
        self.lock().events.recent(RECENT_EVENT_LIMIT)
    }

    /// Allocated processes in id order.
    pub fn processes(&self) -> Vec<(ProcessId, ProcessAllocation)> {
        self.lock()
            .registry
            .iter()
            .map(|(pid, a)| (*pid, a.clone()))
            .collect()
    }

    /// The allocation record of `pid`, if allocated.
    pub fn process(&self, pid: ProcessId) -> Option<ProcessAllocation> {
        self.lock().registry.get(&pid).cloned()
    }

    pub fn memory_size(&self) -> usize {
        self.lock().space.memory_size()
    }

    pub fn page_size(&self) -> usize {
        self.lock().space.page_size()
    }

    /// Number of resets since creation.
    pub fn epoch(&self) -> u64 {
        self.lock().epoch
    }

    /// Runs the address-space invariant checks.
    pub fn check_invariants(&self) -> Result<(), address_space::SpaceError> {
        self.lock().space.check_invariants()
    }

    /// Commands validate before mutating, so a panic elsewhere never leaves
    /// state half-written and a poisoned lock is safe to reuse.
    fn lock(&self) -> MutexGuard<'_, EngineState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
