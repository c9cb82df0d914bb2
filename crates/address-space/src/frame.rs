// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Fixed-size frames of the paging table.

use crate::ProcessId;

/// One fixed-size partition of the address space.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Frame {
    /// Position of the frame in the table, starting at 0.
    pub frame_id: usize,
    /// Owning process, or `None` when free.
    pub owner: Option<ProcessId>,
    /// First address covered by the frame.
    pub start_address: usize,
    /// Last address covered by the frame (inclusive).
    pub end_address: usize,
}

impl Frame {
    /// Creates free frame `frame_id` for the given page size.
    pub fn new(frame_id: usize, page_size: usize) -> Self {
        Self {
            frame_id,
            owner: None,
            start_address: frame_id * page_size,
            end_address: (frame_id + 1) * page_size - 1,
        }
    }

    /// Returns `true` if no process owns this frame.
    pub fn is_free(&self) -> bool {
        self.owner.is_none()
    }

    /// Returns `true` if `[start, end]` intersects this frame.
    pub fn overlaps(&self, start: usize, end: usize) -> bool {
        self.start_address <= end && start <= self.end_address
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_addresses() {
        let f = Frame::new(3, 16);
        assert_eq!(f.start_address, 48);
        assert_eq!(f.end_address, 63);
        assert!(f.is_free());
    }

    #[test]
    fn test_overlaps_partial() {
        let f = Frame::new(1, 10); // 10..=19
        assert!(f.overlaps(15, 40));
        assert!(f.overlaps(0, 10));
        assert!(!f.overlaps(20, 29));
    }
}
