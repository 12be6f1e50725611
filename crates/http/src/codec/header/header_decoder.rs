//! HTTP header line decoder.
//!
//! Parses one `Key: Value\r\n` field line at a time into a [`HeaderMap`],
//! so the request decoder can stop between any two lines and pick up where it
//! left off once more bytes arrive.
//!
//! # Rules
//!
//! - the line is split once, on the first colon
//! - whitespace between the name and the colon is rejected, it makes the
//!   framing ambiguous for intermediaries; leading whitespace is dropped
//! - the name must be non-empty and consist of token characters only; it is
//!   stored lower-cased
//! - the value is trimmed of surrounding whitespace
//! - a repeated name folds its values as `"first, second"`

use tracing::trace;

use crate::ensure;
use crate::protocol::{is_token_byte, HeaderMap, ParseError};
use crate::utils::find_crlf;

/// Outcome of decoding a single header line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderLine {
    /// No complete line buffered yet.
    Partial,
    /// A field line of this many bytes (CRLF included) was added to the map.
    Field(usize),
    /// The blank line ending the header section was consumed (always 2 bytes).
    End(usize),
}

/// Decoder for header field lines.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeaderDecoder;

impl HeaderDecoder {
    /// Decodes the header line at the start of `src` into `headers`.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::MalformedHeader`] if:
    /// - the line has no colon
    /// - the name is empty or ends in whitespace
    /// - the name contains a non-token character
    /// - the line is not valid UTF-8
    pub fn decode_line(&self, src: &[u8], headers: &mut HeaderMap) -> Result<HeaderLine, ParseError> {
        let Some(end) = find_crlf(src) else {
            return Ok(HeaderLine::Partial);
        };

        if end == 0 {
            return Ok(HeaderLine::End(2));
        }

        let line = &src[..end];
        let colon = line.iter().position(|b| *b == b':').ok_or_else(|| ParseError::malformed_header("no colon found"))?;
        let (name, value) = (&line[..colon], &line[colon + 1..]);

        ensure!(
            !name.last().is_some_and(u8::is_ascii_whitespace),
            ParseError::malformed_header("whitespace between header name and colon")
        );
        let name = name.trim_ascii_start();
        ensure!(!name.is_empty(), ParseError::malformed_header("empty header name"));

        let name = name.to_ascii_lowercase();
        if let Some(b) = name.iter().find(|b| !is_token_byte(**b)) {
            return Err(ParseError::malformed_header(format!("invalid character {:?} in header name", char::from(*b))));
        }

        // token bytes are ascii, so this cannot fail
        let name = String::from_utf8(name).map_err(ParseError::malformed_header)?;
        let value = std::str::from_utf8(value).map_err(ParseError::malformed_header)?.trim();

        trace!(name = %name, value, "parsed header");
        headers.append(name, value);
        Ok(HeaderLine::Field(end + 2))
    }
}
