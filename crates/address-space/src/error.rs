// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for the address-space model.

/// Errors raised while building or mutating an [`crate::AddressSpace`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SpaceError {
    /// The requested geometry cannot be partitioned into frames.
    #[error("invalid configuration: memory size {memory_size}, page size {page_size} ({reason})")]
    InvalidConfiguration {
        memory_size: usize,
        page_size: usize,
        reason: &'static str,
    },

    /// A block index does not exist in the current sequence.
    #[error("block index {index} out of range (sequence has {len} blocks)")]
    BlockIndexOutOfRange { index: usize, len: usize },

    /// Tried to claim a block that already has an owner.
    #[error("block at address {start} is not free")]
    BlockNotFree { start: usize },

    /// A split asked for zero units or more than the block holds.
    #[error("cannot take {requested} units from a block of size {available}")]
    InvalidSplit { requested: usize, available: usize },

    /// The block sequence or frame table broke one of its invariants.
    #[error("address-space invariant violated: {0}")]
    InvariantViolation(String),
}
