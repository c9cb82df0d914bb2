// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Per-process allocation records.
//!
//! A [`ProcessAllocation`] is what a strategy hands back on success and what
//! the orchestrator keeps in its registry until the process is released.

use crate::AllocationMethod;

/// Where a process lives in the address space.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Placement {
    /// Frame ids in increasing order (paging).
    Frames { frame_ids: Vec<usize> },
    /// Inclusive address range (segmentation).
    Range { start: usize, end: usize },
}

/// The allocation record of one process.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ProcessAllocation {
    /// Size the process asked for.
    pub requested_size: usize,
    /// Strategy that placed it.
    pub method: AllocationMethod,
    /// Frames or address range it occupies.
    pub placement: Placement,
}

impl ProcessAllocation {
    /// Number of frames held; 0 for a segment.
    pub fn frame_count(&self) -> usize {
        match &self.placement {
            Placement::Frames { frame_ids } => frame_ids.len(),
            Placement::Range { .. } => 0,
        }
    }

    /// Units actually reserved for the process.
    pub fn allocated_size(&self, page_size: usize) -> usize {
        match &self.placement {
            Placement::Frames { frame_ids } => frame_ids.len() * page_size,
            Placement::Range { start, end } => end - start + 1,
        }
    }

    /// Units reserved but not requested. Always 0 for a segment.
    pub fn internal_fragmentation(&self, page_size: usize) -> usize {
        match self.placement {
            Placement::Frames { .. } => self
                .allocated_size(page_size)
                .saturating_sub(self.requested_size),
            Placement::Range { .. } => 0,
        }
    }
}
