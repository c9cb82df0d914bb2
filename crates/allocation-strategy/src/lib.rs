// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # allocation-strategy
//!
//! Decides which frames or blocks of an [`address_space::AddressSpace`] a
//! process receives, and how they are reclaimed.
//!
//! # Strategies
//!
//! | Strategy | Unit | Contiguous | Internal fragmentation | External fragmentation |
//! |---|---|---|---|---|
//! | [`Paging`] | fixed-size frame | No | Up to `page_size - 1` per process | None at frame level |
//! | [`Segmentation`] | exact-size block (first fit) | Yes | None | Strands small holes |
//!
//! # Trait-Based Extensibility
//!
//! Both strategies implement [`AllocationStrategy`], so the orchestrator
//! dispatches on [`AllocationMethod`] without knowing the algorithm:
//!
//! ```ignore
//! struct BestFit;
//! impl AllocationStrategy for BestFit {
//!     fn name(&self) -> &str { "best-fit" }
//!     fn method(&self) -> AllocationMethod { AllocationMethod::Segmentation }
//!     fn allocate(&self, space: &mut AddressSpace, pid: ProcessId, size: usize)
//!         -> Result<ProcessAllocation, StrategyError> { /* ... */ }
//!     fn release(&self, space: &mut AddressSpace, pid: ProcessId, allocation: &ProcessAllocation)
//!         -> Result<(), StrategyError> { /* ... */ }
//! }
//! ```
//!
//! # Example
//! ```
//! use address_space::{AddressSpace, ProcessId};
//! use allocation_strategy::{AllocationStrategy, Paging};
//!
//! let mut space = AddressSpace::new(256, 16).unwrap();
//! let allocation = Paging::new().allocate(&mut space, ProcessId(1), 40).unwrap();
//! assert_eq!(allocation.frame_count(), 3);
//! assert_eq!(allocation.internal_fragmentation(16), 8);
//! ```

mod allocation;
mod error;
mod method;
pub mod strategy;

pub use allocation::{Placement, ProcessAllocation};
pub use error::StrategyError;
pub use method::AllocationMethod;
pub use strategy::paging::Paging;
pub use strategy::segmentation::Segmentation;
pub use strategy::AllocationStrategy;
