// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Capabilities the publishing client needs from the connection it runs on.
//!
//! Connection management and the lumberjack framing live outside this crate.
//! The client only sees these two narrow traits and holds one of each.

use async_trait::async_trait;
use std::time::Duration;

use crate::errors::{AckError, ProtocolError};

#[async_trait]
pub trait Transport: Send {
    /// Opens the connection, failing if it cannot be established within `timeout`.
    async fn connect(&mut self, timeout: Duration) -> Result<(), ProtocolError>;
    /// Closes the connection. Closing an already closed connection must not fail
    /// in a way that matters to the caller.
    async fn close(&mut self) -> Result<(), ProtocolError>;
    fn is_connected(&self) -> bool;
}

#[async_trait]
pub trait Protocol<E: Send + Sync>: Send {
    /// Encodes and writes `events`, returning how many were actually transmitted.
    /// Events that fail to encode are dropped, so the count may be lower than
    /// `events.len()`. Returns [`ProtocolError::AllEventsEncoding`] when nothing
    /// could be encoded.
    async fn send_events(&mut self, events: &[E]) -> Result<usize, ProtocolError>;
    /// Waits until `expected` events have been acknowledged. On failure the
    /// returned [`AckError`] carries how many were acknowledged before it.
    async fn await_ack(&mut self, expected: u32) -> Result<u32, AckError>;
}
