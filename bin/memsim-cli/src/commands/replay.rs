// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `memsim replay` command: apply a scripted command sequence.
//!
//! # Script Format
//! ```toml
//! memory_size = 100     # optional, defaults to the configuration
//! page_size = 10
//!
//! [[steps]]
//! action = "allocate"
//! pid = 1
//! size = 30
//! method = "segmentation"   # optional, defaults to paging
//!
//! [[steps]]
//! action = "deallocate"
//! pid = 1
//! ```
//!
//! Failed steps are reported and the replay continues, the same way the
//! engine logs a failure event and keeps running.

use address_space::ProcessId;
use allocation_strategy::AllocationMethod;
use anyhow::Context;
use memory_manager::{MemoryManager, SimConfig};
use std::path::PathBuf;

#[derive(Debug, serde::Deserialize)]
struct Script {
    memory_size: Option<usize>,
    page_size: Option<usize>,
    #[serde(default)]
    steps: Vec<Step>,
}

#[derive(Debug, PartialEq, serde::Deserialize)]
#[serde(tag = "action", rename_all = "lowercase")]
enum Step {
    Allocate {
        pid: u32,
        size: usize,
        #[serde(default)]
        method: AllocationMethod,
    },
    Deallocate {
        pid: u32,
    },
}

/// Outcome counts of a replay.
#[derive(Debug, Default, PartialEq)]
struct Tally {
    succeeded: usize,
    failed: usize,
}

fn parse_script(content: &str) -> anyhow::Result<Script> {
    toml::from_str(content).context("invalid replay script")
}

fn apply(mm: &MemoryManager, steps: &[Step]) -> Tally {
    let mut tally = Tally::default();
    for (n, step) in steps.iter().enumerate() {
        let outcome = match step {
            Step::Allocate { pid, size, method } => mm
                .allocate(ProcessId(*pid), *size, *method)
                .map_err(|e| e.to_string()),
            Step::Deallocate { pid } => mm.deallocate(ProcessId(*pid)).map_err(|e| e.to_string()),
        };
        match outcome {
            Ok(()) => tally.succeeded += 1,
            Err(e) => {
                println!("   step {}: {e}", n + 1);
                tally.failed += 1;
            }
        }
    }
    tally
}

pub fn execute(config: SimConfig, script: PathBuf) -> anyhow::Result<()> {
    let content = std::fs::read_to_string(&script)
        .with_context(|| format!("failed to read {}", script.display()))?;
    let parsed = parse_script(&content)?;

    let memory_size = parsed.memory_size.unwrap_or(config.memory_size);
    let page_size = parsed.page_size.unwrap_or(config.page_size);
    let mm = MemoryManager::new(memory_size, page_size)?;

    println!("  memsim · replay {}", script.display());
    println!("   Memory: {memory_size} (page size {page_size})");
    println!("   Steps:  {}", parsed.steps.len());
    println!();

    let tally = apply(&mm, &parsed.steps);
    println!(
        "   {} steps succeeded, {} failed",
        tally.succeeded, tally.failed
    );
    println!();
    super::print_engine(&mm);

    mm.check_invariants()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCRIPT: &str = r#"
memory_size = 100
page_size = 10

[[steps]]
action = "allocate"
pid = 1
size = 30
method = "segmentation"

[[steps]]
action = "allocate"
pid = 2
size = 80
method = "segmentation"

[[steps]]
action = "allocate"
pid = 3
size = 25

[[steps]]
action = "deallocate"
pid = 1
"#;

    #[test]
    fn test_parse_script() {
        let script = parse_script(SCRIPT).unwrap();
        assert_eq!(script.memory_size, Some(100));
        assert_eq!(script.steps.len(), 4);
        assert_eq!(
            script.steps[2],
            Step::Allocate {
                pid: 3,
                size: 25,
                method: AllocationMethod::Paging,
            }
        );
        assert_eq!(script.steps[3], Step::Deallocate { pid: 1 });
    }

    #[test]
    fn test_apply_counts_failures() {
        let script = parse_script(SCRIPT).unwrap();
        let mm = MemoryManager::new(100, 10).unwrap();
        let tally = apply(&mm, &script.steps);

        assert_eq!(tally, Tally { succeeded: 3, failed: 1 });
        assert_eq!(mm.stats().process_count, 1);
        mm.check_invariants().unwrap();
    }

    #[test]
    fn test_unknown_action_rejected() {
        let bad = "[[steps]]\naction = \"compact\"\npid = 1\n";
        assert!(parse_script(bad).is_err());
    }
}
