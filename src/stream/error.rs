//! Error types for stream transport operations.

use thiserror::Error;

/// Errors raised by the transport layer.
///
/// All variants are transport-level failures and therefore recoverable
/// through the reconnection policy; server-reported analysis errors travel
/// in-band as `error` events instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StreamError {
    /// Network connectivity error (DNS, connection refused, reset, etc.).
    #[error("network error: {0}")]
    Network(String),

    /// Stream establishment was rejected with a non-success status.
    #[error("stream endpoint returned HTTP {status}")]
    Upstream { status: u16 },

    /// Connection attempt exceeded the configured deadline.
    #[error("connection timed out after {0}s")]
    Timeout(u64),

    /// The server closed the stream without an explicit terminator event.
    #[error("stream closed by server")]
    Disconnected,
}
