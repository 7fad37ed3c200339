//! Publish telemetry hooks.
//!
//! The client reports how many events were acknowledged, how many were handed
//! back to the caller unacknowledged, and how many publish calls were made.
//! [`CountingTelemetry`] keeps those totals in atomic counters that can be
//! shared by every client of a process and exported through any metric backend.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Telemetry hook invoked by the publishing client.
pub trait PublishTelemetry: Send + Sync {
    /// Called once at the start of every publish call.
    fn on_publish_call(&self) {}
    /// Called at the end of a publish call with the number of acknowledged events.
    fn on_acked(&self, _count: u64) {}
    /// Called at the end of a publish call with the number of events returned
    /// to the caller unacknowledged.
    fn on_not_acked(&self, _count: u64) {}
}

/// Telemetry implementation that performs no-ops.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopTelemetry;

impl PublishTelemetry for NoopTelemetry {}

/// Running publish totals (all values use relaxed atomics).
#[derive(Debug, Default)]
pub struct PublishCounters {
    acked_events: AtomicU64,
    not_acked_events: AtomicU64,
    publish_calls: AtomicU64,
}

impl PublishCounters {
    /// Captures a point-in-time snapshot of the counters.
    pub fn snapshot(&self) -> PublishSnapshot {
        PublishSnapshot {
            acked_events: self.acked_events.load(Ordering::Relaxed),
            not_acked_events: self.not_acked_events.load(Ordering::Relaxed),
            publish_calls: self.publish_calls.load(Ordering::Relaxed),
        }
    }
}

/// Plain data representation of [`PublishCounters`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PublishSnapshot {
    /// Events published and acknowledged by the intake.
    pub acked_events: u64,
    /// Events published but handed back unacknowledged.
    pub not_acked_events: u64,
    /// Number of publish calls.
    pub publish_calls: u64,
}

impl PublishSnapshot {
    /// Renders the counters under the names exposed on the agent status endpoint.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "lumberjackPublishedAndAckedEvents": self.acked_events,
            "lumberjackPublishedButNotAckedEvents": self.not_acked_events,
            "lumberjackPublishEventsCallCount": self.publish_calls,
        })
    }
}

impl fmt::Display for PublishSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "acked_events={}, not_acked_events={}, publish_calls={}",
            self.acked_events, self.not_acked_events, self.publish_calls
        )
    }
}

/// Telemetry implementation backed by [`PublishCounters`].
#[derive(Debug, Clone)]
pub struct CountingTelemetry {
    counters: Arc<PublishCounters>,
}

impl CountingTelemetry {
    pub fn new(counters: Arc<PublishCounters>) -> Self {
        Self { counters }
    }

    pub fn counters(&self) -> Arc<PublishCounters> {
        self.counters.clone()
    }

    pub fn snapshot(&self) -> PublishSnapshot {
        self.counters.snapshot()
    }
}

impl Default for CountingTelemetry {
    fn default() -> Self {
        Self::new(Arc::new(PublishCounters::default()))
    }
}

impl PublishTelemetry for CountingTelemetry {
    fn on_publish_call(&self) {
        self.counters.publish_calls.fetch_add(1, Ordering::Relaxed);
    }

    fn on_acked(&self, count: u64) {
        self.counters
            .acked_events
            .fetch_add(count, Ordering::Relaxed);
    }

    fn on_not_acked(&self, count: u64) {
        self.counters
            .not_acked_events
            .fetch_add(count, Ordering::Relaxed);
    }
}

impl<T: PublishTelemetry + ?Sized> PublishTelemetry for Arc<T> {
    fn on_publish_call(&self) {
        (**self).on_publish_call();
    }

    fn on_acked(&self, count: u64) {
        (**self).on_acked(count);
    }

    fn on_not_acked(&self, count: u64) {
        (**self).on_not_acked(count);
    }
}
