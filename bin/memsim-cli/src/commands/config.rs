// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `memsim config` command: print the effective configuration.

use memory_manager::SimConfig;

pub fn execute(config: &SimConfig) -> anyhow::Result<()> {
    config.validate()?;
    print!("{}", config.to_toml()?);
    Ok(())
}
