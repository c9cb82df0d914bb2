// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # address-space
//!
//! The primitive model of a simulated physical address space.
//!
//! # Key Components
//!
//! - [`Block`]: a maximal contiguous address range with a single owner
//!   (or free).
//! - [`Frame`]: a fixed-size partition of the space used for paging
//!   bookkeeping.
//! - [`AddressSpace`]: keeps the ordered, gapless block sequence and the
//!   frame table consistent with each other.
//! - [`ProcessId`]: the owner tag carried by blocks and frames.
//!
//! # Two Views, One Space
//!
//! ```text
//!   frames   │ 0 │ 1 │ 2 │ 3 │ 4 │ 5 │ 6 │ 7 │
//!   owner    │ 1 │ 1 │ - │ 2 │ 2 │ 2 │ - │ - │
//!            └───────┴───┴───────────┴───────┘
//!   blocks     P1     free    P2        free
//! ```
//!
//! Under paging the frame table is authoritative and the block sequence is
//! regenerated from it. Under segmentation the block sequence is
//! authoritative and every frame a segment overlaps shows that segment's
//! owner, so both views stay meaningful whichever strategy is in use.
//!
//! # Example
//! ```
//! use address_space::{AddressSpace, ProcessId};
//!
//! let mut space = AddressSpace::new(256, 16).unwrap();
//! assert_eq!(space.blocks().len(), 1);
//! assert_eq!(space.frames().len(), 16);
//!
//! space.assign_frames(&[0, 1], Some(ProcessId(1)));
//! space.rebuild_blocks_from_frames();
//! assert_eq!(space.blocks().len(), 2);
//! assert_eq!(space.blocks()[0].size, 32);
//! ```

mod block;
mod error;
mod frame;
mod process;
pub mod space;

pub use block::Block;
pub use error::SpaceError;
pub use frame::Frame;
pub use process::ProcessId;
pub use space::AddressSpace;
