// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Windowed, acknowledgement-driven publishing client for lumberjack intakes.
//!
//! [`LumberjackClient`] sends events in rounds bounded by an adaptive
//! [`Window`], waits for each round to be acknowledged, and returns whatever
//! was not acknowledged to the caller for redispatch.

#![cfg_attr(not(test), deny(clippy::panic))]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::todo))]
#![cfg_attr(not(test), deny(clippy::unimplemented))]

pub mod backoff;
pub mod client;
pub mod config;
pub mod constants;
pub mod errors;
pub mod telemetry;
pub mod transport;
pub mod window;

pub use backoff::{TimeoutBackoff, Verdict};
pub use client::LumberjackClient;
pub use config::ClientConfig;
pub use errors::{AckError, ClientError, ConfigError, ErrorKind, ProtocolError, PublishError};
pub use telemetry::{
    CountingTelemetry, NoopTelemetry, PublishCounters, PublishSnapshot, PublishTelemetry,
};
pub use transport::{Protocol, Transport};
pub use window::Window;

/// Structured record shipped to the intake. The client never looks inside it.
pub type Event = serde_json::Map<String, serde_json::Value>;
