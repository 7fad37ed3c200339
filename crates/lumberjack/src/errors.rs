// Copyright 2023-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use derive_more::Display;
use std::io;

/// Coarse classification of a [`ProtocolError`], used by the backoff policy to
/// decide whether a connection survives a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum ErrorKind {
    #[display("encoding")]
    Encoding,
    #[display("timeout")]
    Timeout,
    #[display("not_connected")]
    NotConnected,
    #[display("transport")]
    Transport,
}

/// Errors reported by the protocol endpoint and transport.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Every event offered in a batch failed local encoding. The batch is dropped.
    #[error("all events failed to encode")]
    AllEventsEncoding,

    #[error("timed out waiting for {0}")]
    Timeout(String),

    #[error("lumberjack client is not connected")]
    NotConnected,

    #[error("transport error: {0}")]
    Io(#[from] io::Error),

    #[error("protocol error: {0}")]
    Protocol(String),
}

impl ProtocolError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ProtocolError::AllEventsEncoding => ErrorKind::Encoding,
            ProtocolError::Timeout(_) => ErrorKind::Timeout,
            ProtocolError::NotConnected => ErrorKind::NotConnected,
            ProtocolError::Io(e) => match e.kind() {
                io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => ErrorKind::Timeout,
                io::ErrorKind::NotConnected => ErrorKind::NotConnected,
                _ => ErrorKind::Transport,
            },
            ProtocolError::Protocol(_) => ErrorKind::Transport,
        }
    }

    pub fn is_timeout(&self) -> bool {
        self.kind() == ErrorKind::Timeout
    }
}

/// Failure while waiting for an acknowledgement. `acked` is the number of
/// events of the batch confirmed before the failure.
#[derive(Debug, thiserror::Error)]
#[error("{error} ({acked} events acknowledged)")]
pub struct AckError {
    pub acked: u32,
    #[source]
    pub error: ProtocolError,
}

impl AckError {
    pub fn new(acked: u32, error: ProtocolError) -> Self {
        Self { acked, error }
    }
}

/// Errors returned by the publishing client.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("lumberjack client is not connected")]
    NotConnected,

    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}

impl ClientError {
    pub fn is_timeout(&self) -> bool {
        match self {
            ClientError::NotConnected => false,
            ClientError::Protocol(e) => e.is_timeout(),
        }
    }
}

/// A publish call that stopped before every event was acknowledged.
///
/// `unacked` holds the suffix of the input that was not confirmed, in order, so
/// the caller can redispatch it without loss.
#[derive(Debug, thiserror::Error)]
#[error("failed to publish {} events: {source}", .unacked.len())]
pub struct PublishError<E: std::fmt::Debug> {
    pub unacked: Vec<E>,
    #[source]
    pub source: ClientError,
}

impl<E: std::fmt::Debug> PublishError<E> {
    pub fn into_parts(self) -> (Vec<E>, ClientError) {
        (self.unacked, self.source)
    }
}

/// Invalid client configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_kinds() {
        assert!(ProtocolError::Timeout("ack".to_string()).is_timeout());
        assert!(ProtocolError::Io(io::Error::from(io::ErrorKind::TimedOut)).is_timeout());
        assert!(ProtocolError::Io(io::Error::from(io::ErrorKind::WouldBlock)).is_timeout());
        assert!(!ProtocolError::Io(io::Error::from(io::ErrorKind::ConnectionReset)).is_timeout());
        assert!(!ProtocolError::AllEventsEncoding.is_timeout());
        assert!(!ProtocolError::Protocol("bad frame".to_string()).is_timeout());
    }

    #[test]
    fn test_not_connected_kind() {
        assert_eq!(ProtocolError::NotConnected.kind(), ErrorKind::NotConnected);
        assert_eq!(
            ProtocolError::Io(io::Error::from(io::ErrorKind::NotConnected)).kind(),
            ErrorKind::NotConnected
        );
    }

    #[test]
    fn test_error_display() {
        let error = AckError::new(3, ProtocolError::Timeout("ack".to_string()));
        assert_eq!(
            error.to_string(),
            "timed out waiting for ack (3 events acknowledged)"
        );

        let error = PublishError {
            unacked: vec![1, 2],
            source: ClientError::NotConnected,
        };
        assert_eq!(
            error.to_string(),
            "failed to publish 2 events: lumberjack client is not connected"
        );
        assert_eq!(ErrorKind::Timeout.to_string(), "timeout");
    }

    #[test]
    fn test_client_error_from_protocol() {
        let error: ClientError = ProtocolError::Timeout("ack".to_string()).into();
        assert!(error.is_timeout());
        assert!(!ClientError::NotConnected.is_timeout());
    }
}
