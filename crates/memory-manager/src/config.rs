// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Simulation configuration loaded from TOML files or constructed programmatically.
//!
//! # TOML Format
//! ```toml
//! memory_size = 256
//! page_size = 16
//! method = "paging"
//! min_process_size = 4
//! max_process_size = 64
//! process_lifetime_secs = 10.0
//! generate_interval_ms = 1000
//! seed = 42
//! ```
//!
//! Every key is optional; missing keys take the [`Default`] values.

use crate::ConfigError;
use address_space::AddressSpace;
use allocation_strategy::AllocationMethod;
use std::path::Path;
use std::time::Duration;

/// Configuration for an engine and its process generator.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Size of the simulated address space.
    pub memory_size: usize,
    /// Frame size; must divide `memory_size`.
    pub page_size: usize,
    /// Strategy used for generated processes.
    pub method: AllocationMethod,
    /// Smallest generated process size (inclusive).
    pub min_process_size: usize,
    /// Largest generated process size (inclusive).
    pub max_process_size: usize,
    /// How long a generated process stays allocated.
    pub process_lifetime_secs: f64,
    /// Delay between generated processes.
    pub generate_interval_ms: u64,
    /// Seed for a reproducible generator.
    pub seed: Option<u64>,
}

impl SimConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml_str).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Serialises configuration to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Serialise(e.to_string()))
    }

    /// Checks geometry, generator bounds and timings.
    pub fn validate(&self) -> Result<(), ConfigError> {
        AddressSpace::new(self.memory_size, self.page_size)?;

        if self.min_process_size == 0 || self.min_process_size > self.max_process_size {
            return Err(ConfigError::InvalidGenerator {
                min: self.min_process_size,
                max: self.max_process_size,
            });
        }

        if !self.process_lifetime_secs.is_finite() || self.process_lifetime_secs < 0.0 {
            return Err(ConfigError::InvalidTiming {
                field: "process_lifetime_secs",
                detail: format!("{} is not a non-negative number", self.process_lifetime_secs),
            });
        }

        if self.generate_interval_ms == 0 {
            return Err(ConfigError::InvalidTiming {
                field: "generate_interval_ms",
                detail: "interval must be at least 1 ms".into(),
            });
        }

        Ok(())
    }

    /// Process lifetime as a [`Duration`]. Call [`Self::validate`] first.
    pub fn lifetime(&self) -> Duration {
        Duration::try_from_secs_f64(self.process_lifetime_secs).unwrap_or(Duration::ZERO)
    }

    /// Generation interval as a [`Duration`].
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.generate_interval_ms)
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            memory_size: 256,
            page_size: 16,
            method: AllocationMethod::Paging,
            min_process_size: 4,
            max_process_size: 64,
            process_lifetime_secs: 10.0,
            generate_interval_ms: 1000,
            seed: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let c = SimConfig::default();
        assert_eq!(c.memory_size, 256);
        assert_eq!(c.page_size, 16);
        assert_eq!(c.method, AllocationMethod::Paging);
        c.validate().unwrap();
    }

    #[test]
    fn test_from_toml() {
        let toml = r#"
memory_size = 100
page_size = 10
method = "segmentation"
seed = 7
"#;
        let c = SimConfig::from_toml(toml).unwrap();
        assert_eq!(c.memory_size, 100);
        assert_eq!(c.page_size, 10);
        assert_eq!(c.method, AllocationMethod::Segmentation);
        assert_eq!(c.seed, Some(7));
        // Unspecified keys fall back to defaults.
        assert_eq!(c.max_process_size, 64);
    }

    #[test]
    fn test_to_toml_roundtrip() {
        let c = SimConfig {
            method: AllocationMethod::Segmentation,
            ..Default::default()
        };
        let toml = c.to_toml().unwrap();
        let back = SimConfig::from_toml(&toml).unwrap();
        assert_eq!(back, c);
    }

    #[test]
    fn test_parse_error() {
        assert!(matches!(
            SimConfig::from_toml("memory_size = \"lots\""),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            SimConfig::from_toml("method = \"buddy\""),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_validate_geometry() {
        let c = SimConfig {
            memory_size: 100,
            page_size: 16,
            ..Default::default()
        };
        assert!(matches!(
            c.validate(),
            Err(ConfigError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_validate_generator_bounds() {
        let c = SimConfig {
            min_process_size: 10,
            max_process_size: 5,
            ..Default::default()
        };
        assert!(matches!(
            c.validate(),
            Err(ConfigError::InvalidGenerator { min: 10, max: 5 })
        ));
    }

    #[test]
    fn test_validate_lifetime() {
        let c = SimConfig {
            process_lifetime_secs: -1.0,
            ..Default::default()
        };
        assert!(matches!(c.validate(), Err(ConfigError::InvalidTiming { .. })));
    }

    #[test]
    fn test_validate_zero_interval() {
        let c = SimConfig {
            generate_interval_ms: 0,
            ..Default::default()
        };
        assert!(matches!(
            c.validate(),
            Err(ConfigError::InvalidTiming {
                field: "generate_interval_ms",
                ..
            })
        ));
    }

    #[test]
    fn test_durations() {
        let c = SimConfig {
            process_lifetime_secs: 1.5,
            generate_interval_ms: 250,
            ..Default::default()
        };
        assert_eq!(c.lifetime(), Duration::from_millis(1500));
        assert_eq!(c.interval(), Duration::from_millis(250));
    }

    #[test]
    fn test_from_file_missing() {
        let err = SimConfig::from_file(Path::new("/nonexistent/memsim.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
