// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Scripted transport and protocol doubles sharing one fake connection

use async_trait::async_trait;
use lumberjack::{AckError, Event, Protocol, ProtocolError, Transport};
use serde_json::json;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

/// How the fake intake answers one round. Rounds past the end of the script
/// are fully acknowledged.
#[allow(dead_code)]
pub enum Round {
    Ack,
    /// The last `n` events of the batch fail to encode; the rest are acknowledged.
    DropUnencodable(usize),
    EncodingFailure,
    SendError(ProtocolError),
    AckFailure { acked: u32, error: ProtocolError },
    /// The intake reports success but confirms only `acked` events.
    ShortAck(u32),
}

#[derive(Default)]
pub struct Connection {
    pub connected: bool,
    pub connects: usize,
    pub closes: usize,
    pub script: VecDeque<Round>,
    /// Size of every batch handed to `send_events`
    pub batches: Vec<usize>,
    /// Count passed to every `await_ack`
    pub expected_acks: Vec<u32>,
    /// Total events the fake intake acknowledged
    pub acked_total: usize,
    pending_ack: Option<Result<Option<u32>, AckError>>,
}

#[derive(Clone, Default)]
pub struct SharedConnection(Arc<Mutex<Connection>>);

impl SharedConnection {
    pub fn state(&self) -> MutexGuard<'_, Connection> {
        #[allow(clippy::expect_used)]
        self.0.lock().expect("lock poisoned")
    }
}

pub struct MockTransport(SharedConnection);

#[async_trait]
impl Transport for MockTransport {
    async fn connect(&mut self, _timeout: Duration) -> Result<(), ProtocolError> {
        let mut state = self.0.state();
        state.connected = true;
        state.connects += 1;
        Ok(())
    }

    async fn close(&mut self) -> Result<(), ProtocolError> {
        let mut state = self.0.state();
        state.connected = false;
        state.closes += 1;
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.0.state().connected
    }
}

pub struct MockProtocol(SharedConnection);

#[async_trait]
impl Protocol<Event> for MockProtocol {
    async fn send_events(&mut self, events: &[Event]) -> Result<usize, ProtocolError> {
        let mut state = self.0.state();
        if !state.connected {
            return Err(ProtocolError::NotConnected);
        }
        state.batches.push(events.len());
        match state.script.pop_front().unwrap_or(Round::Ack) {
            Round::Ack => {
                state.pending_ack = Some(Ok(None));
                Ok(events.len())
            }
            Round::DropUnencodable(n) => {
                state.pending_ack = Some(Ok(None));
                Ok(events.len().saturating_sub(n))
            }
            Round::EncodingFailure => Err(ProtocolError::AllEventsEncoding),
            Round::SendError(error) => Err(error),
            Round::ShortAck(acked) => {
                state.pending_ack = Some(Ok(Some(acked)));
                Ok(events.len())
            }
            Round::AckFailure { acked, error } => {
                state.pending_ack = Some(Err(AckError::new(acked, error)));
                Ok(events.len())
            }
        }
    }

    async fn await_ack(&mut self, expected: u32) -> Result<u32, AckError> {
        let mut state = self.0.state();
        state.expected_acks.push(expected);
        match state.pending_ack.take() {
            Some(Err(err)) => {
                state.acked_total += err.acked.min(expected) as usize;
                Err(err)
            }
            Some(Ok(Some(acked))) => {
                let acked = acked.min(expected);
                state.acked_total += acked as usize;
                Ok(acked)
            }
            _ => {
                state.acked_total += expected as usize;
                Ok(expected)
            }
        }
    }
}

pub fn mock_connection(script: Vec<Round>) -> (MockTransport, MockProtocol, SharedConnection) {
    let shared = SharedConnection::default();
    shared.state().script = script.into();
    (
        MockTransport(shared.clone()),
        MockProtocol(shared.clone()),
        shared,
    )
}

pub fn timeout() -> ProtocolError {
    ProtocolError::Timeout("ack".to_string())
}

/// Events tagged with their position so ordering can be checked
pub fn events(n: usize) -> Vec<Event> {
    (0..n)
        .map(|seq| {
            let mut event = Event::new();
            event.insert("seq".to_string(), json!(seq));
            event.insert("message".to_string(), json!(format!("line {seq}")));
            event
        })
        .collect()
}

pub fn seqs(events: &[Event]) -> Vec<u64> {
    events
        .iter()
        .filter_map(|event| event.get("seq").and_then(|seq| seq.as_u64()))
        .collect()
}
