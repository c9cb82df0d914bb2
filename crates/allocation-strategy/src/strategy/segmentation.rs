// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! First-fit segmentation strategy.
//!
//! Blocks are scanned in address order and the first free block holding at
//! least `size` units is used. A larger block is split into the claimed
//! prefix and a free remainder. On release the segment is freed and merged
//! with free neighbours.
//!
//! # Behaviour under fragmentation
//! First fit never looks for a better hole. Small free blocks above the one
//! it picks can stay stranded; a request larger than every hole fails even
//! when total free memory would suffice.

use crate::strategy::AllocationStrategy;
use crate::{AllocationMethod, Placement, ProcessAllocation, StrategyError};
use address_space::{AddressSpace, ProcessId};

/// One contiguous exact-size block, lowest address first.
#[derive(Debug, Clone, Default)]
pub struct Segmentation;

impl Segmentation {
    pub fn new() -> Self {
        Self
    }
}

impl AllocationStrategy for Segmentation {
    fn name(&self) -> &str {
        "segmentation"
    }

    fn method(&self) -> AllocationMethod {
        AllocationMethod::Segmentation
    }

    fn allocate(
        &self,
        space: &mut AddressSpace,
        pid: ProcessId,
        size: usize,
    ) -> Result<ProcessAllocation, StrategyError> {
        let Some(index) = space.first_fit(size) else {
            return Err(StrategyError::NoSuitableBlock {
                requested: size,
                largest_free: space.largest_free_block(),
            });
        };

        let block = space.claim_segment(index, size, pid)?;
        tracing::debug!("{pid}: claimed segment {}..={}", block.start, block.end);

        Ok(ProcessAllocation {
            requested_size: size,
            method: self.method(),
            placement: Placement::Range {
                start: block.start,
                end: block.end,
            },
        })
    }

    fn release(
        &self,
        space: &mut AddressSpace,
        pid: ProcessId,
        allocation: &ProcessAllocation,
    ) -> Result<(), StrategyError> {
        let Placement::Range { start, end } = allocation.placement else {
            return Err(StrategyError::PlacementMismatch {
                pid,
                detail: "segmentation cannot release frames".into(),
            });
        };

        match space.segment(pid) {
            Some(block) if block.start == start && block.end == end => {}
            Some(block) => {
                return Err(StrategyError::PlacementMismatch {
                    pid,
                    detail: format!(
                        "recorded {start}..={end}, space holds {}..={}",
                        block.start, block.end
                    ),
                })
            }
            None => {
                return Err(StrategyError::PlacementMismatch {
                    pid,
                    detail: "no segment owned by process".into(),
                })
            }
        }

        space.release_segment(pid);
        tracing::debug!("{pid}: released segment {start}..={end}");
        Ok(())
    }
}
