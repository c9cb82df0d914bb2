// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The address-space model: block sequence plus frame table.
//!
//! [`AddressSpace`] owns two views of the same memory:
//!
//! 1. An ordered, gapless, non-overlapping sequence of [`Block`]s covering
//!    `[0, memory_size)`. No two consecutive blocks share an owner.
//! 2. A table of `memory_size / page_size` [`Frame`]s.
//!
//! Paging mutates frames and then calls [`AddressSpace::rebuild_blocks_from_frames`].
//! Segmentation mutates blocks through [`AddressSpace::claim_segment`] and
//! [`AddressSpace::release_segment`], which keep the frame overlay in step.
//!
//! # Segments and the frame overlay
//!
//! Segment ranges are not frame aligned, so the space remembers each
//! segment's exact range. A frame that is not held by paging shows the owner
//! of the lowest-address segment overlapping it. Rebuilding blocks from
//! frames reads overlay owners as free and then carves the exact segment
//! ranges back in, so mixing strategies never rounds a segment to frame
//! boundaries.

use crate::{Block, Frame, ProcessId, SpaceError};
use std::collections::{BTreeMap, HashSet};

/// A simulated physical address space.
#[derive(Debug, Clone)]
pub struct AddressSpace {
    memory_size: usize,
    page_size: usize,
    blocks: Vec<Block>,
    frames: Vec<Frame>,
    /// Segment-owned blocks keyed by start address.
    segments: BTreeMap<usize, Block>,
}

impl AddressSpace {
    /// Creates a fully free address space.
    ///
    /// Fails with [`SpaceError::InvalidConfiguration`] if either size is zero
    /// or `memory_size` is not a multiple of `page_size`.
    pub fn new(memory_size: usize, page_size: usize) -> Result<Self, SpaceError> {
        let invalid = |reason| SpaceError::InvalidConfiguration {
            memory_size,
            page_size,
            reason,
        };
        if memory_size == 0 {
            return Err(invalid("memory size must be positive"));
        }
        if page_size == 0 {
            return Err(invalid("page size must be positive"));
        }
        if memory_size % page_size != 0 {
            return Err(invalid("memory size must be a multiple of page size"));
        }

        let frames = (0..memory_size / page_size)
            .map(|id| Frame::new(id, page_size))
            .collect();

        Ok(Self {
            memory_size,
            page_size,
            blocks: vec![Block::free(0, memory_size)],
            frames,
            segments: BTreeMap::new(),
        })
    }

    // ── Accessors ──────────────────────────────────────────────────

    pub fn memory_size(&self) -> usize {
        self.memory_size
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn num_frames(&self) -> usize {
        self.frames.len()
    }

    /// The block sequence in address order.
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// The frame table in frame-id order.
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    /// Returns the exact range held by segment owner `pid`, if any.
    pub fn segment(&self, pid: ProcessId) -> Option<&Block> {
        self.segments.values().find(|b| b.owner == Some(pid))
    }

    /// Sum of the sizes of all owned blocks.
    pub fn used_memory(&self) -> usize {
        self.blocks
            .iter()
            .filter(|b| !b.is_free())
            .map(|b| b.size)
            .sum()
    }

    /// Size of the largest free block, or 0 if memory is full.
    pub fn largest_free_block(&self) -> usize {
        self.blocks
            .iter()
            .filter(|b| b.is_free())
            .map(|b| b.size)
            .max()
            .unwrap_or(0)
    }

    // ── Frame-level operations (paging) ────────────────────────────

    /// Ids of all frames with no owner, in increasing order.
    pub fn free_frame_ids(&self) -> Vec<usize> {
        self.frames
            .iter()
            .filter(|f| f.is_free())
            .map(|f| f.frame_id)
            .collect()
    }

    /// Ids of all frames currently showing `pid` as owner.
    pub fn frames_owned_by(&self, pid: ProcessId) -> Vec<usize> {
        self.frames
            .iter()
            .filter(|f| f.owner == Some(pid))
            .map(|f| f.frame_id)
            .collect()
    }

    /// Sets the owner of every listed frame. Unknown ids are ignored.
    ///
    /// The block view is stale until [`Self::rebuild_blocks_from_frames`]
    /// is called.
    pub fn assign_frames(&mut self, frame_ids: &[usize], owner: Option<ProcessId>) {
        for &id in frame_ids {
            if let Some(frame) = self.frames.get_mut(id) {
                frame.owner = owner;
            }
        }
    }

    /// Frees every frame owned by `pid` and returns their ids.
    pub fn release_frames(&mut self, pid: ProcessId) -> Vec<usize> {
        let mut released = Vec::new();
        for frame in self.frames.iter_mut().filter(|f| f.owner == Some(pid)) {
            frame.owner = None;
            released.push(frame.frame_id);
        }
        released
    }

    /// Regenerates the block sequence from the frame table.
    ///
    /// Frames are scanned in id order and consecutive frames with the same
    /// owner become one block. Overlay owners read as free; segment ranges
    /// are then carved back in at their exact addresses.
    pub fn rebuild_blocks_from_frames(&mut self) {
        let segment_owners = self.segment_owners();
        let mut blocks: Vec<Block> = Vec::with_capacity(self.frames.len());

        for frame in &self.frames {
            let owner = frame.owner.filter(|pid| !segment_owners.contains(pid));
            match blocks.last_mut() {
                Some(last) if last.owner == owner => {
                    last.end = frame.end_address;
                    last.size = last.end - last.start + 1;
                }
                _ => blocks.push(Block::new(frame.start_address, self.page_size, owner)),
            }
        }
        self.blocks = blocks;

        let segments: Vec<Block> = self.segments.values().cloned().collect();
        for segment in &segments {
            self.carve(segment);
        }
        self.merge_adjacent_free_blocks();

        tracing::debug!(
            "rebuilt {} blocks from {} frames ({} segments)",
            self.blocks.len(),
            self.frames.len(),
            segments.len(),
        );
    }

    // ── Block-level operations (segmentation) ──────────────────────

    /// Merges every run of consecutive free blocks into one block.
    pub fn merge_adjacent_free_blocks(&mut self) {
        let mut merged: Vec<Block> = Vec::with_capacity(self.blocks.len());
        for block in self.blocks.drain(..) {
            match merged.last_mut() {
                Some(prev) if prev.is_free() && block.is_free() => {
                    prev.end = block.end;
                    prev.size += block.size;
                }
                _ => merged.push(block),
            }
        }
        self.blocks = merged;
    }

    /// Index of the lowest-address free block holding at least `size` units.
    pub fn first_fit(&self, size: usize) -> Option<usize> {
        self.blocks
            .iter()
            .position(|b| b.is_free() && b.size >= size)
    }

    /// Splits free block `index` into a prefix of exactly `size` units and a
    /// free suffix holding the remainder. No split happens when `size`
    /// equals the block size.
    pub fn split_block(&mut self, index: usize, size: usize) -> Result<(), SpaceError> {
        let len = self.blocks.len();
        let block = self
            .blocks
            .get_mut(index)
            .ok_or(SpaceError::BlockIndexOutOfRange { index, len })?;

        if !block.is_free() {
            return Err(SpaceError::BlockNotFree { start: block.start });
        }
        if size == 0 || size > block.size {
            return Err(SpaceError::InvalidSplit {
                requested: size,
                available: block.size,
            });
        }
        if size == block.size {
            return Ok(());
        }

        let suffix = Block::free(block.start + size, block.size - size);
        block.end = block.start + size - 1;
        block.size = size;
        self.blocks.insert(index + 1, suffix);
        Ok(())
    }

    /// Claims the first `size` units of free block `index` for `pid` and
    /// marks the overlapping frames. Returns the claimed block.
    pub fn claim_segment(
        &mut self,
        index: usize,
        size: usize,
        pid: ProcessId,
    ) -> Result<Block, SpaceError> {
        self.split_block(index, size)?;

        let claimed = &mut self.blocks[index];
        claimed.owner = Some(pid);
        let claimed = claimed.clone();

        self.segments.insert(claimed.start, claimed.clone());
        self.refresh_frame_overlay();
        Ok(claimed)
    }

    /// Frees the segment owned by `pid`, clears its frame overlay and
    /// coalesces the freed range with free neighbours.
    ///
    /// Returns the released range, or `None` if `pid` holds no segment.
    pub fn release_segment(&mut self, pid: ProcessId) -> Option<Block> {
        let start = self
            .segments
            .iter()
            .find(|(_, b)| b.owner == Some(pid))
            .map(|(start, _)| *start)?;
        let segment = self.segments.remove(&start)?;

        if let Some(block) = self.blocks.iter_mut().find(|b| b.owner == Some(pid)) {
            block.owner = None;
        }
        for frame in self.frames.iter_mut().filter(|f| f.owner == Some(pid)) {
            frame.owner = None;
        }
        self.refresh_frame_overlay();
        self.merge_adjacent_free_blocks();
        Some(segment)
    }

    // ── Invariants ─────────────────────────────────────────────────

    /// Checks every structural invariant of the model.
    ///
    /// # Checks
    /// - Blocks start at 0, end at `memory_size - 1`, and are gapless.
    /// - Every block's size matches its address range.
    /// - No two consecutive blocks share an owner.
    /// - Block sizes sum to `memory_size`.
    /// - Frame `i` covers `[i * page_size, (i + 1) * page_size)`.
    /// - Every registered segment appears verbatim in the block sequence.
    pub fn check_invariants(&self) -> Result<(), SpaceError> {
        let violation = |msg: String| Err(SpaceError::InvariantViolation(msg));

        let (Some(first), Some(last)) = (self.blocks.first(), self.blocks.last()) else {
            return violation("block sequence is empty".into());
        };
        if first.start != 0 {
            return violation(format!("first block starts at {}", first.start));
        }
        if last.end != self.memory_size - 1 {
            return violation(format!(
                "last block ends at {}, expected {}",
                last.end,
                self.memory_size - 1
            ));
        }

        for block in &self.blocks {
            if block.size == 0 || block.end - block.start + 1 != block.size {
                return violation(format!(
                    "block {}..={} has inconsistent size {}",
                    block.start, block.end, block.size
                ));
            }
        }

        for pair in self.blocks.windows(2) {
            if pair[0].end + 1 != pair[1].start {
                return violation(format!(
                    "gap or overlap between {} and {}",
                    pair[0].end, pair[1].start
                ));
            }
            if pair[0].owner == pair[1].owner {
                return violation(format!(
                    "consecutive blocks at {} and {} share owner {:?}",
                    pair[0].start, pair[1].start, pair[0].owner
                ));
            }
        }

        let total: usize = self.blocks.iter().map(|b| b.size).sum();
        if total != self.memory_size {
            return violation(format!(
                "blocks cover {total} units, memory size is {}",
                self.memory_size
            ));
        }

        if self.frames.len() * self.page_size != self.memory_size {
            return violation(format!("frame table has {} frames", self.frames.len()));
        }
        for (i, frame) in self.frames.iter().enumerate() {
            if frame.frame_id != i
                || frame.start_address != i * self.page_size
                || frame.end_address != (i + 1) * self.page_size - 1
            {
                return violation(format!("frame {i} has wrong geometry"));
            }
        }

        for segment in self.segments.values() {
            if !self.blocks.contains(segment) {
                return violation(format!(
                    "segment {}..={} is missing from the block sequence",
                    segment.start, segment.end
                ));
            }
        }

        Ok(())
    }

    // ── Internals ──────────────────────────────────────────────────

    fn segment_owners(&self) -> HashSet<ProcessId> {
        self.segments.values().filter_map(|b| b.owner).collect()
    }

    /// Recomputes the owner of every frame not held by paging from the
    /// current segment ranges.
    fn refresh_frame_overlay(&mut self) {
        let segment_owners = self.segment_owners();
        for frame in &mut self.frames {
            if matches!(frame.owner, Some(pid) if !segment_owners.contains(&pid)) {
                continue;
            }
            frame.owner = self
                .segments
                .values()
                .find(|s| frame.overlaps(s.start, s.end))
                .and_then(|s| s.owner);
        }
    }

    /// Replaces the free block containing `segment` with up to three pieces:
    /// free prefix, the segment, free suffix.
    fn carve(&mut self, segment: &Block) {
        let Some(index) = self
            .blocks
            .iter()
            .position(|b| b.is_free() && b.contains_range(segment.start, segment.end))
        else {
            tracing::warn!(
                "segment {}..={} does not fit a free block during rebuild",
                segment.start,
                segment.end,
            );
            return;
        };

        let host = self.blocks[index].clone();
        let mut pieces = Vec::with_capacity(3);
        if host.start < segment.start {
            pieces.push(Block::free(host.start, segment.start - host.start));
        }
        pieces.push(segment.clone());
        if segment.end < host.end {
            pieces.push(Block::free(segment.end + 1, host.end - segment.end));
        }
        self.blocks.splice(index..=index, pieces);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const P1: ProcessId = ProcessId(1);
    const P2: ProcessId = ProcessId(2);
    const P3: ProcessId = ProcessId(3);

    #[test]
    fn test_new_single_free_block() {
        let space = AddressSpace::new(256, 16).unwrap();
        assert_eq!(space.blocks(), &[Block::free(0, 256)]);
        assert_eq!(space.num_frames(), 16);
        assert_eq!(space.frames()[15].end_address, 255);
        space.check_invariants().unwrap();
    }

    #[test]
    fn test_new_rejects_bad_geometry() {
        assert!(matches!(
            AddressSpace::new(0, 16),
            Err(SpaceError::InvalidConfiguration { .. })
        ));
        assert!(matches!(
            AddressSpace::new(256, 0),
            Err(SpaceError::InvalidConfiguration { .. })
        ));
        assert!(matches!(
            AddressSpace::new(100, 16),
            Err(SpaceError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn test_rebuild_merges_equal_owners() {
        let mut space = AddressSpace::new(128, 16).unwrap();
        space.assign_frames(&[0, 1], Some(P1));
        space.assign_frames(&[4], Some(P2));
        space.rebuild_blocks_from_frames();

        let blocks = space.blocks();
        assert_eq!(blocks.len(), 4);
        assert_eq!(blocks[0], Block::new(0, 32, Some(P1)));
        assert_eq!(blocks[1], Block::free(32, 32));
        assert_eq!(blocks[2], Block::new(64, 16, Some(P2)));
        assert_eq!(blocks[3], Block::free(80, 48));
        space.check_invariants().unwrap();
    }

    #[test]
    fn test_release_frames() {
        let mut space = AddressSpace::new(64, 16).unwrap();
        space.assign_frames(&[1, 3], Some(P1));
        assert_eq!(space.frames_owned_by(P1), vec![1, 3]);
        assert_eq!(space.release_frames(P1), vec![1, 3]);
        space.rebuild_blocks_from_frames();
        assert_eq!(space.blocks(), &[Block::free(0, 64)]);
    }

    #[test]
    fn test_split_exact_size_is_noop() {
        let mut space = AddressSpace::new(100, 10).unwrap();
        space.split_block(0, 100).unwrap();
        assert_eq!(space.blocks().len(), 1);
    }

    #[test]
    fn test_split_produces_prefix_and_free_suffix() {
        let mut space = AddressSpace::new(100, 10).unwrap();
        space.split_block(0, 30).unwrap();
        assert_eq!(space.blocks(), &[Block::free(0, 30), Block::free(30, 70)]);
    }

    #[test]
    fn test_split_rejects_oversize_and_zero() {
        let mut space = AddressSpace::new(100, 10).unwrap();
        assert!(matches!(
            space.split_block(0, 101),
            Err(SpaceError::InvalidSplit { .. })
        ));
        assert!(matches!(
            space.split_block(0, 0),
            Err(SpaceError::InvalidSplit { .. })
        ));
        assert!(matches!(
            space.split_block(5, 10),
            Err(SpaceError::BlockIndexOutOfRange { .. })
        ));
    }

    #[test]
    fn test_first_fit_takes_lowest_address() {
        let mut space = AddressSpace::new(100, 10).unwrap();
        space.claim_segment(0, 10, P1).unwrap(); // 0..=9
        space.claim_segment(1, 20, P2).unwrap(); // 10..=29
        space.claim_segment(2, 10, P3).unwrap(); // 30..=39
        space.release_segment(P2);
        // Free: 10..=29 (20), 40..=99 (60).
        assert_eq!(space.first_fit(15), Some(1));
        assert_eq!(space.first_fit(25), Some(3));
        assert_eq!(space.first_fit(61), None);
    }

    #[test]
    fn test_claim_segment_overlays_partial_frames() {
        let mut space = AddressSpace::new(100, 10).unwrap();
        let block = space.claim_segment(0, 25, P1).unwrap();
        assert_eq!(block, Block::new(0, 25, Some(P1)));
        // 0..=24 overlaps frames 0, 1, 2.
        assert_eq!(space.frames_owned_by(P1), vec![0, 1, 2]);
        assert_eq!(space.free_frame_ids().len(), 7);
        space.check_invariants().unwrap();
    }

    #[test]
    fn test_overlay_stops_at_frame_boundary() {
        let mut space = AddressSpace::new(100, 10).unwrap();
        space.claim_segment(0, 20, P1).unwrap(); // 0..=19
        assert_eq!(space.frames_owned_by(P1), vec![0, 1]);
        assert!(space.frames()[2].is_free());
    }

    #[test]
    fn test_claim_owned_block_fails() {
        let mut space = AddressSpace::new(100, 10).unwrap();
        space.claim_segment(0, 100, P1).unwrap();
        assert!(matches!(
            space.claim_segment(0, 10, P2),
            Err(SpaceError::BlockNotFree { start: 0 })
        ));
    }

    #[test]
    fn test_release_segment_restores_single_block() {
        let mut space = AddressSpace::new(100, 10).unwrap();
        space.claim_segment(0, 42, P1).unwrap();
        let released = space.release_segment(P1).unwrap();
        assert_eq!(released.size, 42);
        assert_eq!(space.blocks(), &[Block::free(0, 100)]);
        assert!(space.frames().iter().all(|f| f.is_free()));
        assert!(space.release_segment(P1).is_none());
    }

    #[test]
    fn test_shared_frame_keeps_remaining_owner() {
        let mut space = AddressSpace::new(100, 10).unwrap();
        space.claim_segment(0, 15, P1).unwrap(); // 0..=14, frames 0-1
        space.claim_segment(1, 10, P2).unwrap(); // 15..=24, frames 1-2
        assert_eq!(space.frames()[1].owner, Some(P1));

        space.release_segment(P1);
        assert_eq!(space.frames()[0].owner, None);
        assert_eq!(space.frames()[1].owner, Some(P2));
        assert_eq!(space.frames()[2].owner, Some(P2));
    }

    #[test]
    fn test_rebuild_preserves_exact_segments() {
        let mut space = AddressSpace::new(100, 10).unwrap();
        space.claim_segment(0, 15, P1).unwrap(); // 0..=14

        // Paging claims the first fully free frames: 2 and 3.
        let free = space.free_frame_ids();
        assert_eq!(&free[..2], &[2, 3]);
        space.assign_frames(&free[..2], Some(P2));
        space.rebuild_blocks_from_frames();

        let blocks = space.blocks();
        assert_eq!(blocks[0], Block::new(0, 15, Some(P1)));
        assert_eq!(blocks[1], Block::free(15, 5));
        assert_eq!(blocks[2], Block::new(20, 20, Some(P2)));
        assert_eq!(blocks[3], Block::free(40, 60));
        space.check_invariants().unwrap();
    }

    #[test]
    fn test_merge_adjacent_free_blocks() {
        let mut space = AddressSpace::new(100, 10).unwrap();
        space.split_block(0, 30).unwrap();
        space.split_block(1, 30).unwrap();
        assert_eq!(space.blocks().len(), 3);
        space.merge_adjacent_free_blocks();
        assert_eq!(space.blocks(), &[Block::free(0, 100)]);
    }

    #[test]
    fn test_used_and_largest_free() {
        let mut space = AddressSpace::new(100, 10).unwrap();
        space.claim_segment(0, 30, P1).unwrap();
        assert_eq!(space.used_memory(), 30);
        assert_eq!(space.largest_free_block(), 70);
        space.claim_segment(1, 70, P2).unwrap();
        assert_eq!(space.largest_free_block(), 0);
    }

    #[test]
    fn test_segment_lookup() {
        let mut space = AddressSpace::new(100, 10).unwrap();
        space.claim_segment(0, 30, P1).unwrap();
        assert_eq!(space.segment(P1).map(|b| b.end), Some(29));
        assert!(space.segment(P2).is_none());
    }
}
