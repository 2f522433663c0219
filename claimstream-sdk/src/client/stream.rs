//! Live notification stream consumer.
//!
//! Connects to `GET /notifications/stream`, decodes SSE frames into
//! [`StreamMessage`]s, and reconnects after a fixed backoff whenever the
//! connection errors or ends. The background task stops when the owning
//! [`NotificationStream`] (and its receiver) is dropped.

use std::time::Duration;

use futures_util::StreamExt;
use reqwest::Client;
use tokio::sync::mpsc;
use url::Url;

use super::ClientError;
use crate::objects::stream::StreamMessage;

/// Fixed wait between reconnect attempts.
pub const RECONNECT_DELAY: Duration = Duration::from_secs(3);

/// Buffer between the connection task and the consumer.
const MESSAGE_BUFFER: usize = 64;

/// A resilient subscription to the server's live notification stream.
///
/// ```no_run
/// # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
/// use claimstream_sdk::client::NotificationStream;
///
/// let mut stream = NotificationStream::connect("https://example.com".parse()?);
/// while let Some(message) = stream.next().await {
///     println!("{message:?}");
/// }
/// # Ok(())
/// # }
/// ```
pub struct NotificationStream {
    rx: mpsc::Receiver<StreamMessage>,
}

impl NotificationStream {
    /// Start consuming the stream at `{base_url}/notifications/stream`.
    pub fn connect(base_url: Url) -> Self {
        Self::with_http_client(base_url, Client::new())
    }

    /// Like [`connect`](Self::connect) with a custom `reqwest::Client`.
    pub fn with_http_client(base_url: Url, http: Client) -> Self {
        let (tx, rx) = mpsc::channel(MESSAGE_BUFFER);
        tokio::spawn(run_connection_loop(http, base_url, tx));
        Self { rx }
    }

    /// Receive the next message.
    ///
    /// `None` is never returned while the consumer holds the stream; the
    /// background task outlives every reconnect cycle.
    pub async fn next(&mut self) -> Option<StreamMessage> {
        self.rx.recv().await
    }
}

/// Reconnect loop: open, drain, back off, repeat until the consumer goes.
async fn run_connection_loop(http: Client, base_url: Url, tx: mpsc::Sender<StreamMessage>) {
    let url = match base_url.join("/notifications/stream") {
        Ok(url) => url,
        Err(e) => {
            tracing::error!(error = %e, "invalid notification stream URL");
            return;
        }
    };

    loop {
        match drain_stream(&http, &url, &tx).await {
            Ok(()) => tracing::debug!("notification stream ended, reconnecting"),
            Err(e) => tracing::warn!(error = %e, "notification stream error, reconnecting"),
        }

        if tx.is_closed() {
            return;
        }

        tokio::select! {
            _ = tx.closed() => return,
            _ = tokio::time::sleep(RECONNECT_DELAY) => {}
        }
    }
}

/// Read one connection's worth of frames, forwarding decoded messages.
///
/// Returns `Ok(())` on orderly stream end or consumer drop.
async fn drain_stream(
    http: &Client,
    url: &Url,
    tx: &mpsc::Sender<StreamMessage>,
) -> Result<(), ClientError> {
    let resp = http
        .get(url.clone())
        .header("Accept", "text/event-stream")
        .send()
        .await?
        .error_for_status()?;

    let mut bytes = resp.bytes_stream();
    let mut decoder = SseDecoder::new();

    while let Some(chunk) = bytes.next().await {
        let chunk = chunk?;
        for payload in decoder.push(&chunk) {
            let message: StreamMessage = match serde_json::from_str(&payload) {
                Ok(m) => m,
                Err(e) => {
                    tracing::debug!(error = %e, "skipping undecodable stream payload");
                    continue;
                }
            };
            if tx.send(message).await.is_err() {
                return Ok(());
            }
        }
    }

    Ok(())
}

/// Incremental decoder for `text/event-stream` bodies.
///
/// Events are separated by a blank line; only `data:` lines matter here.
/// Comment lines (leading `:`) and other fields (`event:`, `id:`,
/// `retry:`) are ignored, and multi-line data is joined with `\n` per the
/// SSE spec. CRLF line endings are normalized to LF before the boundary
/// scan, so fully CRLF-framed streams decode the same as LF ones.
#[derive(Debug, Default)]
pub struct SseDecoder {
    buffer: String,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a chunk of the response body; returns every complete event's
    /// data payload, in order. Incomplete trailing data stays buffered.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.buffer.push_str(&String::from_utf8_lossy(chunk));
        // A trailing lone `\r` (a CRLF split across chunks) is left in
        // place and picked up once its `\n` arrives.
        if self.buffer.contains("\r\n") {
            self.buffer = self.buffer.replace("\r\n", "\n");
        }

        let mut payloads = Vec::new();
        while let Some(boundary) = self.buffer.find("\n\n") {
            let block: String = self.buffer.drain(..boundary + 2).collect();
            if let Some(data) = decode_event_block(&block) {
                payloads.push(data);
            }
        }
        payloads
    }
}

/// Extract the joined `data:` payload from one event block, if any.
fn decode_event_block(block: &str) -> Option<String> {
    let mut data_lines = Vec::new();
    for line in block.lines() {
        let line = line.strip_suffix('\r').unwrap_or(line);
        if let Some(rest) = line.strip_prefix("data:") {
            data_lines.push(rest.strip_prefix(' ').unwrap_or(rest));
        }
    }
    if data_lines.is_empty() {
        None
    } else {
        Some(data_lines.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objects::stream::ControlMessage;

    #[test]
    fn decodes_a_single_event() {
        let mut decoder = SseDecoder::new();
        let payloads = decoder.push(b"data: {\"type\":\"connected\"}\n\n");
        assert_eq!(payloads, vec!["{\"type\":\"connected\"}"]);
    }

    #[test]
    fn buffers_frames_split_across_chunks() {
        let mut decoder = SseDecoder::new();
        assert!(decoder.push(b"data: {\"type\":").is_empty());
        let payloads = decoder.push(b"\"heartbeat\"}\n\n");
        assert_eq!(payloads, vec!["{\"type\":\"heartbeat\"}"]);

        let msg: StreamMessage = serde_json::from_str(&payloads[0]).unwrap();
        assert_eq!(msg, StreamMessage::Control(ControlMessage::Heartbeat));
    }

    #[test]
    fn decodes_multiple_events_per_chunk() {
        let mut decoder = SseDecoder::new();
        let payloads = decoder.push(b"data: 1\n\ndata: 2\n\ndata: 3\n\n");
        assert_eq!(payloads, vec!["1", "2", "3"]);
    }

    #[test]
    fn ignores_comments_and_non_data_fields() {
        let mut decoder = SseDecoder::new();
        let payloads = decoder.push(b": keep-alive\n\nevent: ping\nid: 7\ndata: x\n\n");
        assert_eq!(payloads, vec!["x"]);
    }

    #[test]
    fn joins_multi_line_data() {
        let mut decoder = SseDecoder::new();
        let payloads = decoder.push(b"data: a\ndata: b\n\n");
        assert_eq!(payloads, vec!["a\nb"]);
    }

    #[test]
    fn decodes_fully_crlf_framed_streams() {
        let mut decoder = SseDecoder::new();
        let payloads = decoder.push(b"data: {\"type\":\"connected\"}\r\n\r\n");
        assert_eq!(payloads, vec!["{\"type\":\"connected\"}"]);
    }

    #[test]
    fn buffers_a_crlf_pair_split_across_chunks() {
        let mut decoder = SseDecoder::new();
        assert!(decoder.push(b"data: ok\r\n\r").is_empty());
        assert_eq!(decoder.push(b"\n"), vec!["ok"]);
    }

    #[test]
    fn tolerates_mixed_line_endings() {
        let mut decoder = SseDecoder::new();
        let payloads = decoder.push(b"data: ok\r\n\n");
        assert_eq!(payloads, vec!["ok"]);
    }
}
