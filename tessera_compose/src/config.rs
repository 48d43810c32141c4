// Copyright 2025 the Tessera Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Aggregated configuration and string overrides.

use alloc::format;
use alloc::string::{String, ToString};
use core::fmt;
use core::str::FromStr;

use tessera_index::IndexConfig;
use tessera_pool::PoolConfig;
use tessera_region::RegionConfig;

/// Limits for every component of a [`Session`](crate::Session).
///
/// Individual settings can be overridden by dotted key, which is how hosts
/// feed command-line or environment settings in:
///
/// ```
/// use tessera_compose::Config;
///
/// let mut config = Config::default();
/// config.apply_override("region.dirty_threshold", "0.25").unwrap();
/// config.apply_override("pool.max_pool_size", "8").unwrap();
/// assert_eq!(config.region.dirty_threshold, 0.25);
/// assert_eq!(config.pool.max_pool_size, 8);
///
/// assert!(config.apply_override("region.dirty_threshold", "2").is_err());
/// assert!(config.apply_override("region.colour", "red").is_err());
/// ```
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Config {
    /// Spatial index subdivision.
    pub index: IndexConfig,
    /// Dirty-region tracking.
    pub region: RegionConfig,
    /// Object pooling.
    pub pool: PoolConfig,
}

impl Config {
    /// Every key accepted by [`apply_override`](Self::apply_override).
    pub const KEYS: &'static [&'static str] = &[
        "index.max_objects_per_node",
        "index.max_depth",
        "index.min_node_size",
        "region.max_dirty_regions",
        "region.min_region_size",
        "region.dirty_threshold",
        "pool.max_pool_size",
        "pool.cleanup_interval_ms",
    ];

    /// Checks the cross-field limits.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.index.max_objects_per_node == 0 {
            return Err(invalid(
                "index.max_objects_per_node",
                self.index.max_objects_per_node,
                "must be at least 1",
            ));
        }
        if self.index.min_node_size < 1 {
            return Err(invalid(
                "index.min_node_size",
                self.index.min_node_size,
                "must be at least 1",
            ));
        }
        if self.region.max_dirty_regions == 0 {
            return Err(invalid(
                "region.max_dirty_regions",
                self.region.max_dirty_regions,
                "must be at least 1",
            ));
        }
        if self.region.min_region_size < 0 {
            return Err(invalid(
                "region.min_region_size",
                self.region.min_region_size,
                "must not be negative",
            ));
        }
        if !(0.0..=1.0).contains(&self.region.dirty_threshold) {
            return Err(invalid(
                "region.dirty_threshold",
                self.region.dirty_threshold,
                "must be between 0 and 1",
            ));
        }
        Ok(())
    }

    /// Sets one value by dotted key.
    ///
    /// The value is parsed for the key's type and the whole configuration is
    /// [validated](Self::validate) before anything changes; on error `self`
    /// is left as it was.
    pub fn apply_override(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut next = *self;
        match key {
            "index.max_objects_per_node" => next.index.max_objects_per_node = parse(key, value)?,
            "index.max_depth" => next.index.max_depth = parse(key, value)?,
            "index.min_node_size" => next.index.min_node_size = parse(key, value)?,
            "region.max_dirty_regions" => next.region.max_dirty_regions = parse(key, value)?,
            "region.min_region_size" => next.region.min_region_size = parse(key, value)?,
            "region.dirty_threshold" => next.region.dirty_threshold = parse(key, value)?,
            "pool.max_pool_size" => next.pool.max_pool_size = parse(key, value)?,
            "pool.cleanup_interval_ms" => next.pool.cleanup_interval_ms = parse(key, value)?,
            _ => return Err(ConfigError::UnknownKey(key.to_string())),
        }
        next.validate()?;
        tracing::debug!(key, value, "config override applied");
        *self = next;
        Ok(())
    }
}

fn parse<T: FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
        reason: "could not be parsed",
    })
}

fn invalid(key: &str, value: impl fmt::Display, reason: &'static str) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        value: format!("{value}"),
        reason,
    }
}

/// A rejected configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// The override key names no setting.
    UnknownKey(String),
    /// The value does not parse or violates a limit.
    InvalidValue {
        /// Dotted key of the setting.
        key: String,
        /// The offending value as given.
        value: String,
        /// What is wrong with it.
        reason: &'static str,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownKey(key) => write!(f, "unknown configuration key `{key}`"),
            Self::InvalidValue { key, value, reason } => {
                write!(f, "invalid value `{value}` for `{key}`: {reason}")
            }
        }
    }
}

impl core::error::Error for ConfigError {}
