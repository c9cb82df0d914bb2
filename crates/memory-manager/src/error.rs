// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for the memory manager.
//!
//! Every error here is recoverable by the caller. A failed command never
//! leaves a partial mutation behind.

use address_space::{ProcessId, SpaceError};
use allocation_strategy::StrategyError;
use std::path::PathBuf;

/// Errors returned by [`crate::MemoryManager::allocate`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AllocationError {
    /// The requested size is not positive.
    #[error("invalid size {size}: allocation size must be positive")]
    InvalidSize { size: usize },

    /// The process already holds an allocation.
    #[error("process {0} is already allocated")]
    DuplicateProcessId(ProcessId),

    /// Paging could not find enough free frames.
    #[error("not enough free frames for {pid}: needed {needed}, available {available}")]
    InsufficientFrames {
        pid: ProcessId,
        needed: usize,
        available: usize,
    },

    /// Segmentation found no free block large enough.
    #[error("no free block of size {requested} for {pid} (largest free block is {largest_free})")]
    NoSuitableBlock {
        pid: ProcessId,
        requested: usize,
        largest_free: usize,
    },

    /// The strategy rejected the request for a structural reason.
    #[error("allocation engine error: {0}")]
    Internal(StrategyError),
}

impl AllocationError {
    pub(crate) fn from_strategy(pid: ProcessId, err: StrategyError) -> Self {
        match err {
            StrategyError::InsufficientFrames { needed, available } => Self::InsufficientFrames {
                pid,
                needed,
                available,
            },
            StrategyError::NoSuitableBlock {
                requested,
                largest_free,
            } => Self::NoSuitableBlock {
                pid,
                requested,
                largest_free,
            },
            other => Self::Internal(other),
        }
    }
}

/// Errors returned by [`crate::MemoryManager::deallocate`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DeallocationError {
    /// The process holds no allocation.
    #[error("process {0} is not allocated")]
    ProcessNotFound(ProcessId),

    /// The strategy could not reconcile its record with the address space.
    #[error("deallocation engine error: {0}")]
    Internal(StrategyError),
}

/// Errors raised while building an engine or loading its configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Memory size / page size geometry is unusable.
    #[error(transparent)]
    InvalidConfiguration(#[from] SpaceError),

    /// The configuration file could not be read.
    #[error("cannot read config '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration text is not valid TOML for [`crate::SimConfig`].
    #[error("TOML parse error: {0}")]
    Parse(String),

    /// The configuration could not be written back out.
    #[error("TOML serialise error: {0}")]
    Serialise(String),

    /// Generator bounds are empty or start at zero.
    #[error("invalid process size range {min}..={max}: need 0 < min <= max")]
    InvalidGenerator { min: usize, max: usize },

    /// A timing parameter is negative or not finite.
    #[error("invalid {field}: {detail}")]
    InvalidTiming { field: &'static str, detail: String },
}
