//! HTTP header encoder implementation for serializing response heads
//!
//! Serializes the status line and header field lines exactly as given. No
//! framing header is added or rewritten here: a handler that sends a fixed body
//! sets `Content-Length` itself, one that streams sets `Transfer-Encoding`.

use crate::protocol::{HeaderMap, SendError, StatusLine};

use bytes::{BufMut, BytesMut};

use std::io;
use std::io::Write;
use tokio_util::codec::Encoder;

/// Initial buffer size allocated for header serialization
const INIT_HEADER_SIZE: usize = 1024;

/// Encoder for the status line and header block of a response.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeaderEncoder;

impl Encoder<&StatusLine> for HeaderEncoder {
    type Error = SendError;

    /// Writes `HTTP/1.1 {code} {phrase}\r\n`.
    fn encode(&mut self, item: &StatusLine, dst: &mut BytesMut) -> Result<(), Self::Error> {
        dst.reserve(INIT_HEADER_SIZE);
        write!(FastWrite(dst), "HTTP/1.1 {} {}\r\n", item.status.as_str(), item.phrase)?;
        Ok(())
    }
}

impl Encoder<&HeaderMap> for HeaderEncoder {
    type Error = SendError;

    /// Writes every field followed by the blank line that ends the header section.
    fn encode(&mut self, item: &HeaderMap, dst: &mut BytesMut) -> Result<(), Self::Error> {
        encode_fields(item, dst);
        dst.put_slice(b"\r\n");
        Ok(())
    }
}

/// Writes `{name}: {value}\r\n` for every field, without the terminating blank line.
pub(crate) fn encode_fields(headers: &HeaderMap, dst: &mut BytesMut) {
    for (name, value) in headers.iter() {
        dst.reserve(name.len() + value.len() + 4);
        dst.put_slice(name.as_bytes());
        dst.put_slice(b": ");
        dst.put_slice(value.as_bytes());
        dst.put_slice(b"\r\n");
    }
}

/// Fast writer implementation for writing to BytesMut.
///
/// Lets `write!` format straight into the buffer without an intermediate `String`.
pub(crate) struct FastWrite<'a>(pub(crate) &'a mut BytesMut);

impl Write for FastWrite<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.put_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::StatusCode;

    #[test]
    fn status_line() {
        let mut dst = BytesMut::new();
        HeaderEncoder.encode(&StatusLine::canonical(StatusCode::OK), &mut dst).unwrap();
        assert_eq!(&dst[..], b"HTTP/1.1 200 OK\r\n");

        let mut dst = BytesMut::new();
        HeaderEncoder.encode(&StatusLine::new(StatusCode::BAD_REQUEST, "Your problem"), &mut dst).unwrap();
        assert_eq!(&dst[..], b"HTTP/1.1 400 Your problem\r\n");
    }

    #[test]
    fn headers_keep_spelling_and_order() {
        let headers: HeaderMap = [("Content-Length", "13"), ("Connection", "close"), ("Content-Type", "text/plain")]
            .into_iter()
            .collect();

        let mut dst = BytesMut::new();
        HeaderEncoder.encode(&headers, &mut dst).unwrap();
        assert_eq!(&dst[..], b"Content-Length: 13\r\nConnection: close\r\nContent-Type: text/plain\r\n\r\n");
    }

    #[test]
    fn empty_headers() {
        let mut dst = BytesMut::new();
        HeaderEncoder.encode(&HeaderMap::new(), &mut dst).unwrap();
        assert_eq!(&dst[..], b"\r\n");
    }
}
