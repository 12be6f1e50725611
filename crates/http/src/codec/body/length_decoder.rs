//! Decoder for request bodies framed by a Content-Length header.
//!
//! The body is only taken once every declared byte is buffered; until then the
//! caller keeps accumulating reads. Bytes beyond the declared length are never
//! touched.

use crate::ensure;
use crate::protocol::{HeaderMap, ParseError};

const CONTENT_LENGTH: &str = "content-length";

/// A decoder for a body of known length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LengthDecoder {
    /// The declared body length
    length: usize,
}

impl LengthDecoder {
    /// Creates a decoder for a body of exactly `length` bytes.
    pub fn new(length: usize) -> Self {
        Self { length }
    }

    /// Builds a decoder from the request headers.
    ///
    /// Returns `Ok(None)` when there is no Content-Length header, meaning the
    /// request has no body.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::BodyLengthMismatch`] when the header is not a
    /// plain run of decimal digits, which includes signed values such as
    /// `"+5"` and folded values such as `"5, 5"`.
    pub fn from_headers(headers: &HeaderMap) -> Result<Option<Self>, ParseError> {
        let Some(value) = headers.get(CONTENT_LENGTH) else {
            return Ok(None);
        };

        ensure!(
            !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit()),
            ParseError::body_length_mismatch(format!("value {value:?} is not a decimal length"))
        );
        let length = value
            .parse::<usize>()
            .map_err(|e| ParseError::body_length_mismatch(format!("value {value:?} is not a length: {e}")))?;

        Ok(Some(Self::new(length)))
    }

    pub fn length(&self) -> usize {
        self.length
    }

    /// Returns the body once `src` holds all of it.
    pub fn decode<'a>(&self, src: &'a [u8]) -> Option<&'a [u8]> {
        src.get(..self.length)
    }
}
