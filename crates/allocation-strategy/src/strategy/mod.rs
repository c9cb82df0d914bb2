// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The [`AllocationStrategy`] trait and strategy implementations.

pub mod paging;
pub mod segmentation;

use crate::{AllocationMethod, ProcessAllocation, StrategyError};
use address_space::{AddressSpace, ProcessId};

/// Trait for allocation strategies.
///
/// A strategy mutates the address space to place or reclaim one process.
/// Both operations are all-or-nothing: on `Err` the space is unchanged.
///
/// Strategies hold no state and perform no I/O, so they are plain unit
/// structs and trivially unit-testable.
pub trait AllocationStrategy: Send + Sync {
    /// Human-readable name of this strategy.
    fn name(&self) -> &str;

    /// The method tag recorded in each [`ProcessAllocation`].
    fn method(&self) -> AllocationMethod;

    /// Places `size` units for `pid`.
    fn allocate(
        &self,
        space: &mut AddressSpace,
        pid: ProcessId,
        size: usize,
    ) -> Result<ProcessAllocation, StrategyError>;

    /// Reclaims everything `allocation` recorded for `pid`.
    fn release(
        &self,
        space: &mut AddressSpace,
        pid: ProcessId,
        allocation: &ProcessAllocation,
    ) -> Result<(), StrategyError>;
}
