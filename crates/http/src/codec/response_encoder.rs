//! HTTP response encoder
//!
//! Encodes a response part by part and refuses parts that arrive out of
//! order. A response is always:
//!
//! ```text
//! status line, headers, then one of
//!     fixed body
//!     chunk* (chunked terminator | trailers)
//! ```
//!
//! so a fixed body and chunked segments never end up in the same response.

use crate::codec::body::{ChunkedEncoder, ChunkedItem, LengthEncoder};
use crate::codec::header::HeaderEncoder;
use crate::protocol::{ResponsePart, SendError};
use bytes::{Buf, BytesMut};
use tokio_util::codec::Encoder;
use tracing::error;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Phase {
    StatusLine,
    Headers,
    /// Headers are out, the body framing is not decided yet.
    Body { content_length: Option<u64> },
    Chunked(ChunkedEncoder),
    Finished,
}

impl Phase {
    fn expected(&self) -> &'static str {
        match self {
            Phase::StatusLine => "status line",
            Phase::Headers => "headers",
            Phase::Body { .. } => "body or chunk",
            Phase::Chunked(_) => "chunk, chunked terminator or trailers",
            Phase::Finished => "nothing",
        }
    }
}

/// Encoder for the parts of a single response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseEncoder {
    phase: Phase,
}

impl ResponseEncoder {
    pub fn new() -> Self {
        Default::default()
    }

    /// Whether the response is complete and nothing more may be written.
    pub fn is_finish(&self) -> bool {
        self.phase == Phase::Finished
    }

    pub fn is_chunked(&self) -> bool {
        matches!(self.phase, Phase::Chunked(_))
    }
}

impl Default for ResponseEncoder {
    fn default() -> Self {
        Self { phase: Phase::StatusLine }
    }
}

impl<D: Buf> Encoder<ResponsePart<'_, D>> for ResponseEncoder {
    type Error = SendError;

    fn encode(&mut self, item: ResponsePart<'_, D>, dst: &mut BytesMut) -> Result<(), Self::Error> {
        let actual = item.name();

        let next = match (&mut self.phase, item) {
            (Phase::StatusLine, ResponsePart::StatusLine(status_line)) => {
                HeaderEncoder.encode(status_line, dst)?;
                Phase::Headers
            }

            (Phase::Headers, ResponsePart::Headers(headers)) => {
                let content_length = headers.get("content-length").and_then(|value| value.parse().ok());
                HeaderEncoder.encode(headers, dst)?;
                Phase::Body { content_length }
            }

            (Phase::Body { content_length }, ResponsePart::Body(body)) => {
                LengthEncoder::new(*content_length).encode(body, dst)?;
                Phase::Finished
            }

            (Phase::Body { .. }, item @ (ResponsePart::Chunk(_) | ResponsePart::ChunkedDone | ResponsePart::Trailers(_))) => {
                let mut encoder = ChunkedEncoder::new();
                encode_chunked(&mut encoder, item, dst)?;
                if encoder.is_finish() { Phase::Finished } else { Phase::Chunked(encoder) }
            }

            (Phase::Chunked(encoder), item @ (ResponsePart::Chunk(_) | ResponsePart::ChunkedDone | ResponsePart::Trailers(_))) => {
                encode_chunked(encoder, item, dst)?;
                if encoder.is_finish() {
                    Phase::Finished
                } else {
                    return Ok(());
                }
            }

            (phase, _) => {
                let expected = phase.expected();
                error!(expected, actual, "response part written out of order");
                return Err(SendError::out_of_order(expected, actual));
            }
        };

        self.phase = next;
        Ok(())
    }
}

fn encode_chunked<D: Buf>(encoder: &mut ChunkedEncoder, item: ResponsePart<'_, D>, dst: &mut BytesMut) -> Result<(), SendError> {
    let item = match item {
        ResponsePart::Chunk(bytes) => ChunkedItem::Chunk(bytes),
        ResponsePart::ChunkedDone => ChunkedItem::Eof,
        ResponsePart::Trailers(trailers) => ChunkedItem::Trailers(trailers),
        other => unreachable!("{} is not part of a chunked body", other.name()),
    };
    encoder.encode(item, dst)
}
