//! HTTP response types.
//!
//! A response goes out as a sequence of [`ResponsePart`]s, each of which is
//! encoded and flushed on its own. Which parts may follow which is checked by
//! the encoder, not by this type.

use bytes::Buf;
use http::StatusCode;

use crate::protocol::HeaderMap;

/// The status line of a response: a code plus a free-text phrase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    pub status: StatusCode,
    pub phrase: String,
}

impl StatusLine {
    pub fn new(status: StatusCode, phrase: impl Into<String>) -> Self {
        Self { status, phrase: phrase.into() }
    }

    /// A status line using the registered reason phrase of `status`.
    pub fn canonical(status: StatusCode) -> Self {
        Self::new(status, status.canonical_reason().unwrap_or("Unknown"))
    }
}

impl From<StatusCode> for StatusLine {
    fn from(status: StatusCode) -> Self {
        Self::canonical(status)
    }
}

/// One step of writing a response.
#[derive(Debug)]
pub enum ResponsePart<'a, D: Buf = &'a [u8]> {
    StatusLine(&'a StatusLine),
    Headers(&'a HeaderMap),
    /// The whole fixed-length body.
    Body(D),
    /// One segment of a chunked body.
    Chunk(D),
    /// The zero-size chunk that ends a chunked body without trailers.
    ChunkedDone,
    /// The zero-size chunk followed by trailer fields.
    Trailers(&'a HeaderMap),
}

impl<D: Buf> ResponsePart<'_, D> {
    pub fn name(&self) -> &'static str {
        match self {
            ResponsePart::StatusLine(_) => "status line",
            ResponsePart::Headers(_) => "headers",
            ResponsePart::Body(_) => "body",
            ResponsePart::Chunk(_) => "chunk",
            ResponsePart::ChunkedDone => "chunked terminator",
            ResponsePart::Trailers(_) => "trailers",
        }
    }
}
