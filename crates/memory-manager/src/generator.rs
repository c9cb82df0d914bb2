// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Synthetic process source for simulations and tests.

use crate::{ConfigError, SimConfig};
use address_space::ProcessId;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Produces `(id, size)` pairs with sequential ids and uniformly random
/// sizes in `min_size..=max_size`.
#[derive(Debug, Clone)]
pub struct ProcessGenerator {
    min_size: usize,
    max_size: usize,
    next_pid: u32,
    rng: StdRng,
}

impl ProcessGenerator {
    /// Creates a generator seeded from system entropy.
    pub fn new(min_size: usize, max_size: usize) -> Result<Self, ConfigError> {
        Self::with_rng(min_size, max_size, StdRng::from_entropy())
    }

    /// Creates a reproducible generator.
    pub fn with_seed(min_size: usize, max_size: usize, seed: u64) -> Result<Self, ConfigError> {
        Self::with_rng(min_size, max_size, StdRng::seed_from_u64(seed))
    }

    /// Creates a generator from the size bounds and seed of `config`.
    pub fn from_config(config: &SimConfig) -> Result<Self, ConfigError> {
        match config.seed {
            Some(seed) => Self::with_seed(config.min_process_size, config.max_process_size, seed),
            None => Self::new(config.min_process_size, config.max_process_size),
        }
    }

    fn with_rng(min_size: usize, max_size: usize, rng: StdRng) -> Result<Self, ConfigError> {
        if min_size == 0 || min_size > max_size {
            return Err(ConfigError::InvalidGenerator {
                min: min_size,
                max: max_size,
            });
        }
        Ok(Self {
            min_size,
            max_size,
            next_pid: 1,
            rng,
        })
    }

    /// Returns the next id and a random size, advancing the id counter.
    pub fn generate(&mut self) -> (ProcessId, usize) {
        let pid = ProcessId(self.next_pid);
        self.next_pid = self.next_pid.wrapping_add(1).max(1);
        let size = self.rng.gen_range(self.min_size..=self.max_size);
        (pid, size)
    }

    /// The id the next call to [`Self::generate`] will return.
    pub fn peek_pid(&self) -> ProcessId {
        ProcessId(self.next_pid)
    }

    /// Restarts ids at 1.
    pub fn reset(&mut self) {
        self.next_pid = 1;
    }

    pub fn size_range(&self) -> (usize, usize) {
        (self.min_size, self.max_size)
    }
}
