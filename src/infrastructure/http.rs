use crate::types::constants::SSE_MAX_LINE_BYTES;
use crate::types::{RealtimeError, Result};
use futures::stream::{self, BoxStream, StreamExt};
use url::Url;

/// Opens the server-sent events fallback stream
pub struct EventStreamFactory {
    http_client: reqwest::Client,
}

impl EventStreamFactory {
    pub fn new(http_client: reqwest::Client) -> Self {
        Self { http_client }
    }

    /// Sends the stream request and returns the `data` payloads as they arrive.
    ///
    /// Errors never carry the request URL, which holds the token.
    pub async fn create(&self, url: Url) -> Result<BoxStream<'static, Result<String>>> {
        tracing::debug!("Opening event stream to: {}", url.path());

        let response = self
            .http_client
            .get(url)
            .header("Accept", "text/event-stream")
            .header("Cache-Control", "no-cache")
            .send()
            .await
            .map_err(|e| RealtimeError::Http(e.without_url()))?;

        if !response.status().is_success() {
            return Err(RealtimeError::Connection(format!(
                "Event stream rejected with status: {}",
                response.status()
            )));
        }

        let mut decoder = SseDecoder::default();
        let frames = response
            .bytes_stream()
            .map(move |chunk| {
                let decoded = match chunk {
                    Ok(bytes) => decoder.feed(&bytes),
                    Err(e) => Err(RealtimeError::Http(e.without_url())),
                };
                match decoded {
                    Ok(events) => events.into_iter().map(Ok).collect::<Vec<_>>(),
                    Err(e) => vec![Err(e)],
                }
            })
            .flat_map(stream::iter)
            .boxed();

        Ok(frames)
    }
}

impl Default for EventStreamFactory {
    fn default() -> Self {
        Self::new(reqwest::Client::new())
    }
}

/// Incremental parser for the `text/event-stream` format.
///
/// Chunks may split lines (and UTF-8 sequences) anywhere; only complete
/// lines are decoded. Lines end with LF, CRLF or a lone CR. Only `data`
/// fields are kept.
#[derive(Debug)]
pub struct SseDecoder {
    buffer: Vec<u8>,
    /// Bytes at the start of `buffer` already known to hold no line ending
    scanned: usize,
    /// Last line ended with CR; an LF opening the next chunk belongs to it
    after_cr: bool,
    max_line: usize,
    data: Vec<String>,
}

impl SseDecoder {
    pub fn new(max_line: usize) -> Self {
        Self {
            buffer: Vec::new(),
            scanned: 0,
            after_cr: false,
            max_line,
            data: Vec::new(),
        }
    }

    /// Feeds a chunk and returns the payloads of every event it completed.
    ///
    /// Fails once an unterminated line grows past the line limit.
    pub fn feed(&mut self, chunk: &[u8]) -> Result<Vec<String>> {
        self.buffer.extend_from_slice(chunk);

        let mut events = Vec::new();
        let mut start = 0;
        loop {
            if self.after_cr && start < self.buffer.len() {
                if self.buffer[start] == b'\n' {
                    start += 1;
                }
                self.after_cr = false;
            }

            let from = start.max(self.scanned);
            let Some(offset) = self.buffer[from..]
                .iter()
                .position(|b| matches!(b, b'\n' | b'\r'))
            else {
                break;
            };
            let end = from + offset;
            self.after_cr = self.buffer[end] == b'\r';

            let line = String::from_utf8_lossy(&self.buffer[start..end]).into_owned();
            start = end + 1;
            self.scanned = start;

            if let Some(event) = self.process_line(&line) {
                events.push(event);
            }
        }

        self.buffer.drain(..start);
        self.scanned = self.buffer.len();

        if self.buffer.len() > self.max_line {
            return Err(RealtimeError::Connection(format!(
                "Event stream line exceeds {} bytes",
                self.max_line
            )));
        }
        Ok(events)
    }

    fn process_line(&mut self, line: &str) -> Option<String> {
        if line.is_empty() {
            if self.data.is_empty() {
                return None;
            }
            let payload = self.data.join("\n");
            self.data.clear();
            return Some(payload);
        }

        // Comment line (keep-alive)
        if line.starts_with(':') {
            return None;
        }

        let (field, value) = match line.split_once(':') {
            Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
            None => (line, ""),
        };

        if field == "data" {
            self.data.push(value.to_string());
        }
        None
    }
}

impl Default for SseDecoder {
    fn default() -> Self {
        Self::new(SSE_MAX_LINE_BYTES)
    }
}
