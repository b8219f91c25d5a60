//! Stream transport
//!
//! The [`StreamTransport`] trait is the seam between the monitor and the
//! wire; [`SseTransport`] is the production implementation, a reqwest
//! streaming GET whose body chunks are reassembled into Server-Sent Event
//! data frames by [`SseDecoder`].

use std::time::Duration;

use async_stream::stream;
use async_trait::async_trait;
use futures::stream::BoxStream;
use futures_util::StreamExt;

use super::error::StreamError;

/// One subscription's frames: each Ok item is the decoded text of a single
/// SSE `data:` frame, in wire order. The stream always ends with exactly one
/// Err item.
pub type FrameStream = BoxStream<'static, Result<String, StreamError>>;

/// Transport-level subscription factory.
#[async_trait]
pub trait StreamTransport: Send + Sync {
    /// Establishes a subscription to `url`.
    ///
    /// An Err return means establishment itself failed (refused, timeout,
    /// non-success status); failures after establishment are delivered as the
    /// final Err item of the returned stream.
    async fn connect(&self, url: &str) -> Result<FrameStream, StreamError>;
}

/// Production SSE transport over reqwest.
pub struct SseTransport {
    client: reqwest::Client,
    connect_timeout: Duration,
}

impl SseTransport {
    pub fn new(connect_timeout: Duration) -> Result<Self, StreamError> {
        let client = reqwest::Client::builder()
            .connect_timeout(connect_timeout)
            .build()
            .map_err(|e| StreamError::Network(e.to_string()))?;
        Ok(Self {
            client,
            connect_timeout,
        })
    }
}

#[async_trait]
impl StreamTransport for SseTransport {
    async fn connect(&self, url: &str) -> Result<FrameStream, StreamError> {
        let timeout_secs = self.connect_timeout.as_secs();
        let response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "text/event-stream")
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    StreamError::Timeout(timeout_secs)
                } else {
                    StreamError::Network(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(StreamError::Upstream {
                status: status.as_u16(),
            });
        }

        tracing::debug!(url, "Stream subscription established");

        let frames = stream! {
            let mut decoder = SseDecoder::new();
            let mut body = response.bytes_stream();
            while let Some(chunk) = body.next().await {
                match chunk {
                    Ok(bytes) => {
                        for frame in decoder.feed(&bytes) {
                            yield Ok(frame);
                        }
                    }
                    Err(e) => {
                        yield Err(StreamError::Network(e.to_string()));
                        return;
                    }
                }
            }
            // Body ended without a transport error: the server hung up.
            yield Err(StreamError::Disconnected);
        };

        Ok(Box::pin(frames))
    }
}

/// Incremental SSE frame decoder.
///
/// Frames may arrive split across body chunks; the decoder buffers partial
/// lines and emits one string per complete event, joining multiple `data:`
/// lines with newlines. Comment lines and non-data fields are skipped.
#[derive(Debug, Default)]
pub struct SseDecoder {
    buffer: String,
    data_lines: Vec<String>,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds one body chunk, returning every frame completed by it.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<String> {
        self.buffer.push_str(&String::from_utf8_lossy(chunk));

        let mut frames = Vec::new();
        while let Some(newline) = self.buffer.find('\n') {
            let line: String = self.buffer.drain(..=newline).collect();
            let line = line.trim_end_matches(['\n', '\r']);

            if line.is_empty() {
                // Blank line terminates the current event.
                if !self.data_lines.is_empty() {
                    frames.push(self.data_lines.join("\n"));
                    self.data_lines.clear();
                }
            } else if line.starts_with(':') {
                // Comment / keep-alive.
            } else if let Some(value) = line.strip_prefix("data:") {
                self.data_lines
                    .push(value.strip_prefix(' ').unwrap_or(value).to_string());
            }
            // Other fields (event:, id:, retry:) are not used by this feed.
        }
        frames
    }
}
