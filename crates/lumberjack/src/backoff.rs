// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use crate::errors::ProtocolError;
use derive_more::Display;
use tracing::debug;

/// Outcome of classifying a failed round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Verdict {
    /// The connection stays open; only the current publish call is aborted.
    #[display("soft")]
    Soft,
    /// The connection must be closed before the error is returned.
    #[display("hard")]
    Hard,
}

/// Tracks consecutive timeouts and decides whether a failure is survivable.
///
/// Timeouts are tolerated up to `max_timeouts - 1` times in a row. Any other
/// error, or the `max_timeouts`-th timeout, is a hard failure.
#[derive(Debug, Clone)]
pub struct TimeoutBackoff {
    consecutive_timeouts: u32,
    max_timeouts: u32,
}

impl TimeoutBackoff {
    pub fn new(max_timeouts: u32) -> Self {
        TimeoutBackoff {
            consecutive_timeouts: 0,
            max_timeouts: max_timeouts.max(1),
        }
    }

    pub fn consecutive_timeouts(&self) -> u32 {
        self.consecutive_timeouts
    }

    /// Called after any round that did not time out.
    pub fn reset(&mut self) {
        self.consecutive_timeouts = 0;
    }

    pub fn classify(&mut self, err: &ProtocolError) -> Verdict {
        if !err.is_timeout() {
            debug!("no timeout error: {err}");
            self.reset();
            return Verdict::Hard;
        }

        self.consecutive_timeouts += 1;
        if self.consecutive_timeouts >= self.max_timeouts {
            debug!(
                "max timeout errors reached ({}), close connection",
                self.max_timeouts
            );
            self.reset();
            return Verdict::Hard;
        }

        debug!(
            "timeout error {} of {}, keep connection alive for retrying",
            self.consecutive_timeouts, self.max_timeouts
        );
        Verdict::Soft
    }
}
