// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Paging strategy.
//!
//! A process of `size` units needs `ceil(size / page_size)` frames. Any free
//! frames will do: they are taken in increasing frame-id order and need not
//! be contiguous. The unused tail of the last frame is internal
//! fragmentation.
//!
//! Paging never defragments or reorders frames.

use crate::strategy::AllocationStrategy;
use crate::{AllocationMethod, Placement, ProcessAllocation, StrategyError};
use address_space::{AddressSpace, ProcessId};

/// Fixed-size frames in frame-id order.
#[derive(Debug, Clone, Default)]
pub struct Paging;

impl Paging {
    pub fn new() -> Self {
        Self
    }

    /// Frames needed to hold `size` units.
    pub fn pages_needed(size: usize, page_size: usize) -> usize {
        size.div_ceil(page_size)
    }
}

impl AllocationStrategy for Paging {
    fn name(&self) -> &str {
        "paging"
    }

    fn method(&self) -> AllocationMethod {
        AllocationMethod::Paging
    }

    fn allocate(
        &self,
        space: &mut AddressSpace,
        pid: ProcessId,
        size: usize,
    ) -> Result<ProcessAllocation, StrategyError> {
        let needed = Self::pages_needed(size, space.page_size());
        let free = space.free_frame_ids();

        if free.len() < needed {
            return Err(StrategyError::InsufficientFrames {
                needed,
                available: free.len(),
            });
        }

        let frame_ids = free[..needed].to_vec();
        space.assign_frames(&frame_ids, Some(pid));
        space.rebuild_blocks_from_frames();

        tracing::debug!("{pid}: claimed frames {frame_ids:?} for size {size}");

        Ok(ProcessAllocation {
            requested_size: size,
            method: self.method(),
            placement: Placement::Frames { frame_ids },
        })
    }

    fn release(
        &self,
        space: &mut AddressSpace,
        pid: ProcessId,
        allocation: &ProcessAllocation,
    ) -> Result<(), StrategyError> {
        let Placement::Frames { frame_ids } = &allocation.placement else {
            return Err(StrategyError::PlacementMismatch {
                pid,
                detail: "paging cannot release a segment".into(),
            });
        };

        let owned = space.frames_owned_by(pid);
        if &owned != frame_ids {
            return Err(StrategyError::PlacementMismatch {
                pid,
                detail: format!("recorded frames {frame_ids:?}, table shows {owned:?}"),
            });
        }

        space.release_frames(pid);
        space.rebuild_blocks_from_frames();

        tracing::debug!("{pid}: released frames {frame_ids:?}");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use address_space::Block;

    const P1: ProcessId = ProcessId(1);
    const P2: ProcessId = ProcessId(2);

    #[test]
    fn test_pages_needed() {
        assert_eq!(Paging::pages_needed(32, 16), 2);
        assert_eq!(Paging::pages_needed(40, 16), 3);
        assert_eq!(Paging::pages_needed(1, 16), 1);
    }

    #[test]
    fn test_allocate_exact_multiple() {
        let mut space = AddressSpace::new(256, 16).unwrap();
        let a = Paging::new().allocate(&mut space, P1, 32).unwrap();

        assert_eq!(a.placement, Placement::Frames { frame_ids: vec![0, 1] });
        assert_eq!(a.internal_fragmentation(16), 0);
        assert_eq!(space.blocks()[0], Block::new(0, 32, Some(P1)));
        space.check_invariants().unwrap();
    }

    #[test]
    fn test_allocate_rounds_up() {
        let mut space = AddressSpace::new(256, 16).unwrap();
        let paging = Paging::new();
        paging.allocate(&mut space, P1, 32).unwrap();
        let a = paging.allocate(&mut space, P2, 40).unwrap();

        assert_eq!(a.placement, Placement::Frames { frame_ids: vec![2, 3, 4] });
        assert_eq!(a.internal_fragmentation(16), 8);
    }

    #[test]
    fn test_allocate_uses_non_contiguous_frames() {
        let mut space = AddressSpace::new(64, 16).unwrap();
        space.assign_frames(&[1], Some(ProcessId(9)));
        space.rebuild_blocks_from_frames();

        let a = Paging::new().allocate(&mut space, P1, 48).unwrap();
        assert_eq!(a.placement, Placement::Frames { frame_ids: vec![0, 2, 3] });
        space.check_invariants().unwrap();
    }

    #[test]
    fn test_insufficient_frames_leaves_space_untouched() {
        let mut space = AddressSpace::new(64, 16).unwrap();
        let paging = Paging::new();
        paging.allocate(&mut space, P1, 48).unwrap();
        let before = space.blocks().to_vec();

        let err = paging.allocate(&mut space, P2, 17).unwrap_err();
        assert_eq!(
            err,
            StrategyError::InsufficientFrames {
                needed: 2,
                available: 1
            }
        );
        assert_eq!(space.blocks(), before.as_slice());
    }

    #[test]
    fn test_release_restores_free_space() {
        let mut space = AddressSpace::new(256, 16).unwrap();
        let paging = Paging::new();
        let a = paging.allocate(&mut space, P1, 50).unwrap();
        paging.release(&mut space, P1, &a).unwrap();

        assert_eq!(space.blocks(), &[Block::free(0, 256)]);
        assert!(space.frames().iter().all(|f| f.is_free()));
    }

    #[test]
    fn test_release_rejects_stale_record() {
        let mut space = AddressSpace::new(64, 16).unwrap();
        let paging = Paging::new();
        let a = paging.allocate(&mut space, P1, 16).unwrap();
        let stale = ProcessAllocation {
            placement: Placement::Frames { frame_ids: vec![3] },
            ..a
        };
        assert!(matches!(
            paging.release(&mut space, P1, &stale),
            Err(StrategyError::PlacementMismatch { .. })
        ));
        assert_eq!(space.frames_owned_by(P1), vec![0]);
    }
}
