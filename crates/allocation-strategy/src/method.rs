// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

use crate::{AllocationStrategy, Paging, Segmentation, StrategyError};
use std::fmt;
use std::str::FromStr;

/// Which algorithm places a process.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum AllocationMethod {
    /// Fixed-size frames, not necessarily contiguous.
    #[default]
    Paging,
    /// One contiguous block chosen by first fit.
    Segmentation,
}

impl AllocationMethod {
    /// Creates the strategy implementing this method.
    pub fn strategy(self) -> Box<dyn AllocationStrategy> {
        match self {
            Self::Paging => Box::new(Paging::new()),
            Self::Segmentation => Box::new(Segmentation::new()),
        }
    }
}

impl fmt::Display for AllocationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Paging => write!(f, "paging"),
            Self::Segmentation => write!(f, "segmentation"),
        }
    }
}

impl FromStr for AllocationMethod {
    type Err = StrategyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "paging" | "pages" => Ok(Self::Paging),
            "segmentation" | "segments" | "first-fit" => Ok(Self::Segmentation),
            other => Err(StrategyError::UnknownMethod(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        assert_eq!("paging".parse::<AllocationMethod>().unwrap(), AllocationMethod::Paging);
        assert_eq!(
            " Segmentation ".parse::<AllocationMethod>().unwrap(),
            AllocationMethod::Segmentation
        );
        assert!(matches!(
            "buddy".parse::<AllocationMethod>(),
            Err(StrategyError::UnknownMethod(_))
        ));
    }

    #[test]
    fn test_display_matches_serde() {
        let json = serde_json::to_string(&AllocationMethod::Segmentation).unwrap();
        assert_eq!(json, format!("\"{}\"", AllocationMethod::Segmentation));
    }

    #[test]
    fn test_strategy_dispatch() {
        assert_eq!(AllocationMethod::Paging.strategy().name(), "paging");
        assert_eq!(
            AllocationMethod::Segmentation.strategy().method(),
            AllocationMethod::Segmentation
        );
    }
}
