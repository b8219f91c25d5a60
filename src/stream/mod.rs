//! Stream subscription layer
//!
//! [`StreamConnection`] owns one transport-level subscription: it spawns a
//! reader task over the transport's frame stream and forwards lifecycle
//! signals to the monitor, each tagged with the session that opened it. It
//! never retries on its own; recovery is decided by [`reconnect`] and driven
//! by the monitor.

pub mod error;
pub mod reconnect;
pub mod transport;

pub use error::StreamError;
pub use reconnect::{ReconnectConfig, ReconnectState};
pub use transport::{FrameStream, SseDecoder, SseTransport, StreamTransport};

use std::sync::Arc;

use futures_util::StreamExt;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Low-level lifecycle signals raised toward the monitor.
///
/// For every `open`, the reader emits exactly one `Opened` or one `Closed`,
/// with any number of `Message` signals in between, in wire order.
#[derive(Debug, Clone, PartialEq)]
pub enum ConnectionSignal {
    Opened,
    Message(String),
    Closed(StreamError),
}

/// A signal tagged with the session that produced it.
///
/// The monitor compares the tag against its current session counter and
/// discards anything stale, so a superseded connection can never write into
/// the feeds.
#[derive(Debug, Clone, PartialEq)]
pub struct SignalEnvelope {
    pub session: u64,
    pub signal: ConnectionSignal,
}

/// Owns the lifecycle of one subscription to the stream endpoint.
pub struct StreamConnection {
    transport: Arc<dyn StreamTransport>,
    signals: mpsc::UnboundedSender<SignalEnvelope>,
    reader: Option<JoinHandle<()>>,
}

impl StreamConnection {
    pub fn new(
        transport: Arc<dyn StreamTransport>,
        signals: mpsc::UnboundedSender<SignalEnvelope>,
    ) -> Self {
        Self {
            transport,
            signals,
            reader: None,
        }
    }

    /// Establishes the subscription if none is active.
    ///
    /// Idempotent: a second call while a reader is live is a no-op.
    pub fn open(&mut self, session: u64, url: String) {
        if self.is_active() {
            return;
        }
        let transport = Arc::clone(&self.transport);
        let signals = self.signals.clone();
        self.reader = Some(tokio::spawn(read_stream(transport, signals, session, url)));
    }

    /// Terminates the active subscription immediately and unconditionally.
    ///
    /// Safe to call at any time, including when already closed.
    pub fn close(&mut self) {
        if let Some(reader) = self.reader.take() {
            reader.abort();
        }
    }

    /// True while a reader task is live.
    pub fn is_active(&self) -> bool {
        self.reader.as_ref().is_some_and(|r| !r.is_finished())
    }
}

impl Drop for StreamConnection {
    fn drop(&mut self) {
        self.close();
    }
}

async fn read_stream(
    transport: Arc<dyn StreamTransport>,
    signals: mpsc::UnboundedSender<SignalEnvelope>,
    session: u64,
    url: String,
) {
    let send = |signal: ConnectionSignal| signals.send(SignalEnvelope { session, signal });

    let mut frames = match transport.connect(&url).await {
        Ok(frames) => frames,
        Err(err) => {
            let _ = send(ConnectionSignal::Closed(err));
            return;
        }
    };

    if send(ConnectionSignal::Opened).is_err() {
        return;
    }

    while let Some(item) = frames.next().await {
        let result = match item {
            Ok(raw) => send(ConnectionSignal::Message(raw)),
            Err(err) => {
                let _ = send(ConnectionSignal::Closed(err));
                return;
            }
        };
        if result.is_err() {
            // Monitor gone; nothing left to deliver to.
            return;
        }
    }

    let _ = send(ConnectionSignal::Closed(StreamError::Disconnected));
}
