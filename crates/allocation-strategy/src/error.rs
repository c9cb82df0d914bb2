// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for the allocation strategies.

use address_space::{ProcessId, SpaceError};

/// Errors that can occur while placing or reclaiming a process.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StrategyError {
    /// Paging could not find enough free frames.
    #[error("not enough free frames: needed {needed}, available {available}")]
    InsufficientFrames { needed: usize, available: usize },

    /// Segmentation found no free block large enough.
    #[error("no free block of size {requested} (largest free block is {largest_free})")]
    NoSuitableBlock { requested: usize, largest_free: usize },

    /// The recorded placement no longer matches the address space.
    #[error("placement of process {pid} does not match the address space: {detail}")]
    PlacementMismatch { pid: ProcessId, detail: String },

    /// An allocation method name could not be parsed.
    #[error("unknown allocation method '{0}'; expected 'paging' or 'segmentation'")]
    UnknownMethod(String),

    /// The address-space model rejected a mutation.
    #[error("address space error: {0}")]
    Space(#[from] SpaceError),
}
