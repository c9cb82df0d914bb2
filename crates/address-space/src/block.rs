// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Ownership ranges of the block sequence.

use crate::ProcessId;

/// A maximal contiguous address range with a single owner, or free.
///
/// Addresses are inclusive: a block covers `start..=end` and
/// `size == end - start + 1`.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Block {
    /// First address covered by the block.
    pub start: usize,
    /// Last address covered by the block (inclusive).
    pub end: usize,
    /// Number of addressable units in the block.
    pub size: usize,
    /// Owning process, or `None` when free.
    pub owner: Option<ProcessId>,
}

impl Block {
    /// Creates a block covering `start..start + size`.
    ///
    /// `size` must be non-zero.
    pub fn new(start: usize, size: usize, owner: Option<ProcessId>) -> Self {
        debug_assert!(size > 0, "blocks are never empty");
        Self {
            start,
            end: start + size - 1,
            size,
            owner,
        }
    }

    /// Creates a free block covering `start..start + size`.
    pub fn free(start: usize, size: usize) -> Self {
        Self::new(start, size, None)
    }

    /// Returns `true` if no process owns this block.
    pub fn is_free(&self) -> bool {
        self.owner.is_none()
    }

    /// Returns `true` if `[start, end]` lies entirely inside this block.
    pub fn contains_range(&self, start: usize, end: usize) -> bool {
        self.start <= start && end <= self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_inclusive_end() {
        let b = Block::new(16, 32, Some(ProcessId(1)));
        assert_eq!(b.end, 47);
        assert_eq!(b.size, 32);
        assert!(!b.is_free());
    }

    #[test]
    fn test_contains_range() {
        let b = Block::free(0, 100);
        assert!(b.contains_range(0, 99));
        assert!(b.contains_range(30, 40));
        assert!(!b.contains_range(90, 100));
    }
}
