// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use std::time::Duration;
use zstd::zstd_safe::CompressionLevel;

/// Smallest window the client ever shrinks to.
pub const MIN_WINDOW_SIZE: usize = 1;
/// Window used for the first round of a fresh client.
pub const DEFAULT_START_WINDOW_SIZE: usize = 10;
pub const DEFAULT_MAX_WINDOW_SIZE: usize = 1024;
/// Consecutive timeouts tolerated before the connection is closed.
pub const DEFAULT_MAX_CONSECUTIVE_TIMEOUTS: u32 = 3;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_COMPRESSION_LEVEL: CompressionLevel = 3;
