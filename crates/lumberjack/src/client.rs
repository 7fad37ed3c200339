// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Windowed publishing client.
//!
//! Events are sent in rounds of at most [`Window::get`] events. Each round waits
//! for the intake to acknowledge it before the next one starts. Fully
//! acknowledged rounds that saturated the window grow it, and failed rounds
//! shrink it. A failed round aborts the publish call and hands every event that
//! was not acknowledged back to the caller, in order. Repeated timeouts and any
//! other transport error close the connection.
//!
//! The client is single-writer: every operation takes `&mut self`, so a publish
//! call always completes before the next one starts. Use one client per
//! connection for concurrent throughput.

use std::fmt::Debug;
use std::time::Duration;
use tracing::{debug, error, warn};

use crate::backoff::{TimeoutBackoff, Verdict};
use crate::config::ClientConfig;
use crate::errors::{ClientError, ProtocolError, PublishError};
use crate::telemetry::{NoopTelemetry, PublishTelemetry};
use crate::transport::{Protocol, Transport};
use crate::window::Window;

pub struct LumberjackClient<T, P, M = NoopTelemetry> {
    transport: T,
    protocol: P,
    telemetry: M,
    window: Window,
    backoff: TimeoutBackoff,
    timeout: Duration,
}

impl<T, P> LumberjackClient<T, P, NoopTelemetry>
where
    T: Transport,
{
    pub fn new(transport: T, protocol: P, config: &ClientConfig) -> Self {
        Self::with_telemetry(transport, protocol, config, NoopTelemetry)
    }
}

impl<T, P, M> LumberjackClient<T, P, M>
where
    T: Transport,
    M: PublishTelemetry,
{
    pub fn with_telemetry(transport: T, protocol: P, config: &ClientConfig, telemetry: M) -> Self {
        LumberjackClient {
            transport,
            protocol,
            telemetry,
            window: Window::new(config.start_window_size, config.max_window_size),
            backoff: TimeoutBackoff::new(config.max_consecutive_timeouts),
            timeout: config.timeout(),
        }
    }

    pub async fn connect(&mut self) -> Result<(), ClientError> {
        debug!("connect");
        self.transport.connect(self.timeout).await?;
        Ok(())
    }

    pub async fn close(&mut self) -> Result<(), ClientError> {
        debug!("close connection");
        self.transport.close().await?;
        Ok(())
    }

    pub fn is_connected(&self) -> bool {
        self.transport.is_connected()
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn window_size(&self) -> usize {
        self.window.get()
    }

    pub fn consecutive_timeouts(&self) -> u32 {
        self.backoff.consecutive_timeouts()
    }

    pub fn telemetry(&self) -> &M {
        &self.telemetry
    }

    pub async fn publish_event<E>(&mut self, event: E) -> Result<(), ClientError>
    where
        E: Send + Sync + Debug,
        P: Protocol<E>,
    {
        self.publish_events(vec![event])
            .await
            .map_err(|e| e.source)
    }

    /// Sends all events to the intake. On error the events that were not
    /// confirmed to be processed are returned, in their original order.
    pub async fn publish_events<E>(&mut self, mut events: Vec<E>) -> Result<(), PublishError<E>>
    where
        E: Send + Sync + Debug,
        P: Protocol<E>,
    {
        self.telemetry.on_publish_call();
        let total = events.len();

        if total > 0 && !self.transport.is_connected() {
            error!("Failed to publish {total} events: client is not connected");
            self.record(total, total);
            return Err(PublishError {
                unacked: events,
                source: ClientError::NotConnected,
            });
        }

        let mut offset = 0;
        while offset < total {
            match self.publish_windowed(&events[offset..]).await {
                Ok(n) => {
                    offset += n;
                    debug!(
                        "{n} events out of {} events sent to lumberjack. Continue sending ...",
                        total - offset + n
                    );
                }
                Err((n, err)) => {
                    offset += n;
                    error!("Failed to publish events caused by: {err}");
                    let unacked = events.split_off(offset);
                    self.record(total, unacked.len());
                    return Err(PublishError {
                        unacked,
                        source: err.into(),
                    });
                }
            }
        }

        self.record(total, 0);
        Ok(())
    }

    fn record(&self, total: usize, not_acked: usize) {
        self.telemetry.on_acked((total - not_acked) as u64);
        self.telemetry.on_not_acked(not_acked as u64);
    }

    /// Publishes one round of at most the current window size. Returns the
    /// number of events handled, or on failure the number acknowledged before
    /// the failure together with the error.
    async fn publish_windowed<E>(&mut self, events: &[E]) -> Result<usize, (usize, ProtocolError)>
    where
        E: Send + Sync,
        P: Protocol<E>,
    {
        if events.is_empty() {
            return Ok(0);
        }

        let window_size = self.window.get();
        let batch_size = events.len().min(window_size);
        debug!(
            "Try to publish {} events to lumberjack with window size {window_size}",
            events.len()
        );
        let batch = &events[..batch_size];

        let sent = match self.protocol.send_events(batch).await {
            Ok(sent) => sent,
            // Nothing reached the intake, so the timeout streak is left as is.
            Err(ProtocolError::AllEventsEncoding) => {
                warn!("Dropping {batch_size} events that failed to encode");
                return Ok(batch_size);
            }
            Err(err) => return Err(self.on_fail(0, err).await),
        };

        let expected = u32::try_from(sent.min(batch_size)).unwrap_or(u32::MAX);
        match self.protocol.await_ack(expected).await {
            Ok(acked) if acked < expected => {
                let err = ProtocolError::Protocol(format!(
                    "acknowledged {acked} of {expected} events"
                ));
                return Err(self.on_fail(acked as usize, err).await);
            }
            Ok(_) => {}
            Err(ack_err) => {
                let acked = (ack_err.acked as usize).min(batch_size);
                return Err(self.on_fail(acked, ack_err.error).await);
            }
        }

        self.backoff.reset();
        self.window.try_grow(batch_size);
        Ok(batch_size)
    }

    async fn on_fail(&mut self, acked: usize, err: ProtocolError) -> (usize, ProtocolError) {
        debug!("handle error: {err}");
        self.window.shrink();

        if self.backoff.classify(&err) == Verdict::Hard {
            if let Err(close_err) = self.close().await {
                warn!("Failed to close connection after error: {close_err}");
            }
        }
        (acked, err)
    }
}
