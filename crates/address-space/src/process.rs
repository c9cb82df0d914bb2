// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

use std::fmt;

/// Identifier of a simulated process owning memory.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
pub struct ProcessId(pub u32);

impl ProcessId {
    /// Returns the raw numeric id.
    pub fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for ProcessId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(ProcessId(7).to_string(), "P7");
    }

    #[test]
    fn test_serde_transparent() {
        let json = serde_json::to_string(&ProcessId(42)).unwrap();
        assert_eq!(json, "42");
        let back: ProcessId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ProcessId(42));
    }
}
