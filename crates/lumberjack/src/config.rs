// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use serde::Deserialize;
use std::env;
use std::time::Duration;
use zstd::zstd_safe::CompressionLevel;

use crate::constants::{
    DEFAULT_COMPRESSION_LEVEL, DEFAULT_MAX_CONSECUTIVE_TIMEOUTS, DEFAULT_MAX_WINDOW_SIZE,
    DEFAULT_START_WINDOW_SIZE, DEFAULT_TIMEOUT,
};
use crate::errors::ConfigError;

/// Configuration for a lumberjack publishing client
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Window used for the first round after the client is created
    pub start_window_size: usize,
    /// Upper bound on the number of events in flight per round
    pub max_window_size: usize,
    /// Connection and acknowledgement timeout, in seconds
    pub timeout_secs: u64,
    /// Compression level for the protocol endpoint. 0 selects the zstd default.
    /// The client does not compress; callers pass this to the `Protocol` they build.
    pub compression_level: CompressionLevel,
    /// Consecutive timeouts after which the connection is closed
    pub max_consecutive_timeouts: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            start_window_size: DEFAULT_START_WINDOW_SIZE,
            max_window_size: DEFAULT_MAX_WINDOW_SIZE,
            timeout_secs: DEFAULT_TIMEOUT.as_secs(),
            compression_level: DEFAULT_COMPRESSION_LEVEL,
            max_consecutive_timeouts: DEFAULT_MAX_CONSECUTIVE_TIMEOUTS,
        }
    }
}

fn parse_env<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|val| val.trim().parse::<T>().ok())
}

impl ClientConfig {
    /// Create configuration from environment variables, falling back to defaults
    /// for anything unset or unparsable
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let config = Self {
            start_window_size: parse_env("DD_LUMBERJACK_START_WINDOW_SIZE")
                .unwrap_or(defaults.start_window_size),
            max_window_size: parse_env("DD_LUMBERJACK_BULK_MAX_SIZE")
                .unwrap_or(defaults.max_window_size),
            timeout_secs: parse_env("DD_LUMBERJACK_TIMEOUT").unwrap_or(defaults.timeout_secs),
            compression_level: parse_env("DD_LUMBERJACK_COMPRESSION_LEVEL")
                .unwrap_or(defaults.compression_level),
            max_consecutive_timeouts: parse_env("DD_LUMBERJACK_MAX_CONSECUTIVE_TIMEOUTS")
                .unwrap_or(defaults.max_consecutive_timeouts),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_window_size == 0 {
            return Err(ConfigError::Invalid(
                "max window size must be greater than 0".to_string(),
            ));
        }

        if self.start_window_size == 0 {
            return Err(ConfigError::Invalid(
                "start window size must be greater than 0".to_string(),
            ));
        }

        if self.timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "timeout must be greater than 0".to_string(),
            ));
        }

        if self.max_consecutive_timeouts == 0 {
            return Err(ConfigError::Invalid(
                "max consecutive timeouts must be greater than 0".to_string(),
            ));
        }

        let levels = zstd::compression_level_range();
        if self.compression_level != 0 && !levels.contains(&self.compression_level) {
            return Err(ConfigError::Invalid(format!(
                "Invalid compression level {}. Must be 0 or between {} and {}",
                self.compression_level,
                levels.start(),
                levels.end()
            )));
        }

        Ok(())
    }
}
