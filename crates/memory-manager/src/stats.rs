// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Utilisation and fragmentation accounting.
//!
//! [`Stats`] is a pure function of the address space and the allocation
//! registry. The manager recomputes it after every state change and hands
//! out copies; nothing ever edits a `Stats` in place.
//!
//! # Formulas
//! - `used_memory` = sum of owned block sizes.
//! - `external_fragmentation` = `1 - largest_free_block / free_memory`,
//!   or 0 when memory is full. 0 means all free memory is one block.
//! - `internal_fragmentation` = sum over paging processes of
//!   `frames * page_size - requested_size`. Segments contribute 0.

use address_space::AddressSpace;
use allocation_strategy::ProcessAllocation;

/// Snapshot of memory usage.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Stats {
    /// Size of the whole address space.
    pub total_memory: usize,
    /// Units held by processes (whole frames for paging).
    pub used_memory: usize,
    /// `total_memory - used_memory`.
    pub free_memory: usize,
    /// `used_memory / total_memory * 100`.
    pub utilization_percentage: f64,
    /// Number of allocated processes.
    pub process_count: usize,
    /// Size of the largest free block.
    pub largest_free_block: usize,
    /// Share of free memory outside the largest free block, in `[0, 1)`.
    pub external_fragmentation: f64,
    /// Units reserved by paging but not requested.
    pub internal_fragmentation: usize,
    /// Always 0: page faults are not simulated.
    pub page_faults: u64,
}

impl Stats {
    /// Derives the statistics for `space` and its allocated processes.
    pub fn compute<'a, I>(space: &AddressSpace, allocations: I) -> Self
    where
        I: IntoIterator<Item = &'a ProcessAllocation>,
    {
        let total_memory = space.memory_size();
        let used_memory = space.used_memory();
        let free_memory = total_memory - used_memory;
        let largest_free_block = space.largest_free_block();

        let external_fragmentation = if free_memory > 0 {
            1.0 - largest_free_block as f64 / free_memory as f64
        } else {
            0.0
        };

        let mut process_count = 0;
        let mut internal_fragmentation = 0;
        for allocation in allocations {
            process_count += 1;
            internal_fragmentation += allocation.internal_fragmentation(space.page_size());
        }

        Self {
            total_memory,
            used_memory,
            free_memory,
            utilization_percentage: used_memory as f64 / total_memory as f64 * 100.0,
            process_count,
            largest_free_block,
            external_fragmentation,
            internal_fragmentation,
            page_faults: 0,
        }
    }

    /// Returns a human-readable summary.
    pub fn summary(&self) -> String {
        format!(
            "Memory: {}/{} used ({:.1}%), {} free (largest block {}), \
             {} processes, external fragmentation {:.2}, internal fragmentation {}, \
             {} page faults",
            self.used_memory,
            self.total_memory,
            self.utilization_percentage,
            self.free_memory,
            self.largest_free_block,
            self.process_count,
            self.external_fragmentation,
            self.internal_fragmentation,
            self.page_faults,
        )
    }
}
