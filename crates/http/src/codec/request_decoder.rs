//! HTTP request decoder module
//!
//! This module provides an incremental request parser that can be fed a
//! request in arbitrarily small pieces.
//!
//! # Components
//!
//! - [`RequestDecoder`]: the state machine driving the sub-parsers below
//! - Request line parsing: [`parse_request_line`]
//! - Header parsing: [`HeaderDecoder`], one field line at a time
//! - Body handling: [`LengthDecoder`] for Content-Length framed bodies
//!
//! # Example
//!
//! ```
//! use nano_http::codec::RequestDecoder;
//! use nano_http::protocol::{Method, ParseState};
//!
//! let mut decoder = RequestDecoder::new();
//!
//! // not a full line yet
//! assert_eq!(decoder.parse(b"GET /a HT").unwrap(), 0);
//!
//! let data = b"GET /a HTTP/1.1\r\nHost: x\r\n\r\n";
//! assert_eq!(decoder.parse(data).unwrap(), data.len());
//! assert_eq!(decoder.state(), ParseState::Done);
//!
//! let request = decoder.take_request().unwrap();
//! assert_eq!(request.method(), Method::Get);
//! assert_eq!(request.headers().get("host"), Some("x"));
//! ```

use bytes::{Buf, Bytes, BytesMut};
use tokio_util::codec::Decoder;
use tracing::trace;

use crate::codec::body::LengthDecoder;
use crate::codec::header::{HeaderDecoder, HeaderLine};
use crate::codec::request_line::parse_request_line;
use crate::ensure;
use crate::protocol::{HeaderMap, ParseError, ParseState, Request, RequestLine};

/// An incremental decoder for a single HTTP request.
///
/// # State Machine
///
/// ```text
/// Initialized -> ParsingHeaders -> ParsingBody -> Done
/// ```
///
/// Each state has its own step function. [`parse`](RequestDecoder::parse) runs
/// them in sequence over one buffer, so a single read holding the request line,
/// all headers and the body completes in one call, while a read holding half a
/// line leaves everything untouched.
#[derive(Debug, Default)]
pub struct RequestDecoder {
    state: ParseState,
    header_decoder: HeaderDecoder,
    request_line: Option<RequestLine>,
    headers: HeaderMap,
    body: Bytes,
}

impl RequestDecoder {
    /// Creates a new `RequestDecoder` instance
    pub fn new() -> Self {
        Default::default()
    }

    pub fn state(&self) -> ParseState {
        self.state
    }

    /// Parses as much of `src` as possible and returns the number of bytes consumed.
    ///
    /// `Ok(0)` means more data is needed. Unconsumed bytes must be passed again,
    /// followed by whatever is read next.
    ///
    /// # Errors
    ///
    /// Any malformed input is fatal for the request. Calling `parse` after the
    /// decoder reached [`ParseState::Done`] returns [`ParseError::AlreadyDone`].
    pub fn parse(&mut self, src: &[u8]) -> Result<usize, ParseError> {
        ensure!(self.state != ParseState::Done, ParseError::AlreadyDone);

        let mut consumed = 0;
        while self.state != ParseState::Done {
            let state = self.state;
            let n = self.step(&src[consumed..])?;
            consumed += n;

            if n == 0 && self.state == state {
                break;
            }
        }

        Ok(consumed)
    }

    fn step(&mut self, src: &[u8]) -> Result<usize, ParseError> {
        match self.state {
            ParseState::Initialized => self.step_request_line(src),
            ParseState::ParsingHeaders => self.step_headers(src),
            ParseState::ParsingBody => self.step_body(src),
            ParseState::Done => Err(ParseError::AlreadyDone),
        }
    }

    fn step_request_line(&mut self, src: &[u8]) -> Result<usize, ParseError> {
        let Some((request_line, consumed)) = parse_request_line(src)? else {
            return Ok(0);
        };

        trace!(method = %request_line.method, target = %request_line.target, "parsed request line");
        self.request_line = Some(request_line);
        self.transition(ParseState::ParsingHeaders);
        Ok(consumed)
    }

    fn step_headers(&mut self, src: &[u8]) -> Result<usize, ParseError> {
        let mut consumed = 0;
        loop {
            match self.header_decoder.decode_line(&src[consumed..], &mut self.headers)? {
                HeaderLine::Partial => return Ok(consumed),
                HeaderLine::Field(n) => consumed += n,
                HeaderLine::End(n) => {
                    self.transition(ParseState::ParsingBody);
                    return Ok(consumed + n);
                }
            }
        }
    }

    fn step_body(&mut self, src: &[u8]) -> Result<usize, ParseError> {
        // without Content-Length the body is empty and the request ends here
        let Some(length_decoder) = LengthDecoder::from_headers(&self.headers)? else {
            self.transition(ParseState::Done);
            return Ok(src.len());
        };

        match length_decoder.decode(src) {
            Some(body) => {
                trace!(body_size = body.len(), "parsed body");
                self.body = Bytes::copy_from_slice(body);
                self.transition(ParseState::Done);
                Ok(body.len())
            }
            None => Ok(0),
        }
    }

    fn transition(&mut self, state: ParseState) {
        debug_assert!(state > self.state, "parse state must move forward");
        trace!(from = ?self.state, to = ?state, "parse state transition");
        self.state = state;
    }

    /// Applies the end-of-stream rule.
    ///
    /// A request without Content-Length is already `Done` once its header
    /// section ends, so only a finished request survives the end of the
    /// stream. In any other state the request was cut short.
    pub fn finish_eof(&mut self) -> Result<(), ParseError> {
        match self.state {
            ParseState::Done => Ok(()),
            state => Err(ParseError::unexpected_eof(state)),
        }
    }

    /// Hands out the finished request, once.
    pub fn take_request(&mut self) -> Option<Request> {
        if self.state != ParseState::Done {
            return None;
        }

        let request_line = self.request_line.take()?;
        Some(Request::new(request_line, std::mem::take(&mut self.headers), std::mem::take(&mut self.body)))
    }
}

impl Decoder for RequestDecoder {
    type Item = Request;
    type Error = ParseError;

    /// Attempts to decode a request from the provided buffer
    ///
    /// Consumed bytes are split off the front of `src`, the rest stays for the
    /// next call.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(request))`: the request is complete
    /// - `Ok(None)`: need more data to proceed
    /// - `Err(_)`: encountered a parsing error
    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if self.state == ParseState::Done {
            return self.take_request().map(Some).ok_or(ParseError::AlreadyDone);
        }

        let consumed = self.parse(src)?;
        src.advance(consumed);

        Ok(self.take_request())
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        if let Some(request) = self.decode(src)? {
            return Ok(Some(request));
        }

        self.finish_eof()?;
        Ok(self.take_request())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::Method;
    use indoc::indoc;

    /// Feeds `data` to a fresh decoder `chunk_size` bytes at a time, the way a
    /// socket returning short reads would, then signals end of stream.
    fn decode_in_chunks(data: &[u8], chunk_size: usize) -> Result<(Request, BytesMut), ParseError> {
        let mut decoder = RequestDecoder::new();
        let mut buf = BytesMut::new();

        for piece in data.chunks(chunk_size) {
            buf.extend_from_slice(piece);
            if let Some(request) = decoder.decode(&mut buf)? {
                return Ok((request, buf));
            }
        }

        let request = decoder.decode_eof(&mut buf)?.expect("decode_eof yields the request once done");
        Ok((request, buf))
    }

    #[test]
    fn simple_get() {
        let data = b"GET /a HTTP/1.1\r\nHost: x\r\n\r\n";
        let mut decoder = RequestDecoder::new();

        assert_eq!(decoder.parse(data).unwrap(), data.len());
        assert_eq!(decoder.state(), ParseState::Done);

        let request = decoder.take_request().unwrap();
        assert_eq!(request.method(), Method::Get);
        assert_eq!(request.target(), "/a");
        assert_eq!(request.version(), "1.1");
        assert_eq!(request.headers().len(), 1);
        assert_eq!(request.headers().get("host"), Some("x"));
        assert!(request.body().is_empty());
    }

    #[test]
    fn from_curl() {
        let str = indoc! {r##"
        GET /coffee HTTP/1.1
        Host: localhost:42069
        User-Agent: curl/7.81.0
        Accept: */*

        "##}
        .replace('\n', "\r\n");

        for chunk_size in 1..=str.len() {
            let (request, rest) = decode_in_chunks(str.as_bytes(), chunk_size).unwrap();

            assert_eq!(request.method(), Method::Get);
            assert_eq!(request.target(), "/coffee");
            assert_eq!(request.headers().len(), 3);
            assert_eq!(request.headers().get("host"), Some("localhost:42069"));
            assert_eq!(request.headers().get("user-agent"), Some("curl/7.81.0"));
            assert_eq!(request.headers().get("accept"), Some("*/*"));
            assert!(rest.is_empty());
        }
    }

    #[test]
    fn chunk_size_independence() {
        let data = b"POST /submit HTTP/1.1\r\nHost: localhost:42069\r\nX-Multi: a\r\nx-multi: b\r\nContent-Length: 13\r\n\r\nhello world!\n";

        let (expected, _) = decode_in_chunks(data, data.len()).unwrap();
        assert_eq!(&expected.body()[..], b"hello world!\n");
        assert_eq!(expected.headers().get("x-multi"), Some("a, b"));

        for chunk_size in 1..data.len() {
            let (request, rest) = decode_in_chunks(data, chunk_size).unwrap();
            assert_eq!(request, expected, "chunk size {chunk_size}");
            assert!(rest.is_empty());
        }
    }

    #[test]
    fn single_read_spanning_line_headers_and_partial_body() {
        let mut decoder = RequestDecoder::new();
        let head = b"PUT /item HTTP/1.1\r\nContent-Length: 6\r\n\r\n";
        let mut data = head.to_vec();
        data.extend_from_slice(b"abc");

        assert_eq!(decoder.parse(&data).unwrap(), head.len());
        assert_eq!(decoder.state(), ParseState::ParsingBody);

        // caller resupplies the unconsumed body bytes plus the new read
        assert_eq!(decoder.parse(b"abcde").unwrap(), 0);
        assert_eq!(decoder.parse(b"abcdef").unwrap(), 6);
        assert_eq!(decoder.state(), ParseState::Done);
        assert_eq!(&decoder.take_request().unwrap().body()[..], b"abcdef");
    }

    #[test]
    fn repeated_headers_fold() {
        let data = b"GET / HTTP/1.1\r\nSet-Person: lane-loves-go\r\nSet-Person: prime-loves-zig\r\nset-person: tj-loves-ocaml\r\n\r\n";
        let (request, _) = decode_in_chunks(data, 3).unwrap();

        assert_eq!(request.headers().len(), 1);
        assert_eq!(request.headers().get("set-person"), Some("lane-loves-go, prime-loves-zig, tj-loves-ocaml"));
        assert_eq!(request.headers().iter().next().map(|(name, _)| name), Some("set-person"));
    }

    #[test]
    fn empty_headers() {
        let (request, _) = decode_in_chunks(b"DELETE /item/1 HTTP/1.1\r\n\r\n", 2).unwrap();
        assert_eq!(request.method(), Method::Delete);
        assert!(request.headers().is_empty());
    }

    #[test]
    fn body_shorter_than_content_length() {
        let data = b"POST /submit HTTP/1.1\r\nHost: localhost:42069\r\nContent-Length: 20\r\n\r\npartial content";

        for chunk_size in [1, 7, data.len()] {
            let result = decode_in_chunks(data, chunk_size);
            assert!(
                matches!(result, Err(ParseError::UnexpectedEof { state: ParseState::ParsingBody })),
                "got {result:?}"
            );
        }
    }

    #[test]
    fn zero_content_length() {
        let (request, _) = decode_in_chunks(b"POST / HTTP/1.1\r\nContent-Length: 0\r\n\r\n", 4).unwrap();
        assert!(request.body().is_empty());
    }

    #[test]
    fn request_without_length_consumes_everything() {
        let data = b"GET /a HTTP/1.1\r\nHost: x\r\n\r\nxyz";
        let mut decoder = RequestDecoder::new();

        assert_eq!(decoder.parse(data).unwrap(), data.len());
        assert_eq!(decoder.state(), ParseState::Done);
        assert!(decoder.take_request().unwrap().body().is_empty());

        let (request, rest) = decode_in_chunks(b"GET / HTTP/1.1\r\nHost: x\r\n\r\nextra", 64).unwrap();
        assert!(request.body().is_empty());
        assert!(rest.is_empty());
    }

    #[test]
    fn bytes_past_the_body_stay_buffered() {
        let (request, rest) = decode_in_chunks(b"POST / HTTP/1.1\r\nContent-Length: 2\r\n\r\nhiextra", 64).unwrap();
        assert_eq!(&request.body()[..], b"hi");
        assert_eq!(&rest[..], b"extra");
    }

    #[test]
    fn header_end_finishes_request_without_length() {
        let mut decoder = RequestDecoder::new();
        let mut buf = BytesMut::from(&b"POST / HTTP/1.1\r\nHost: x\r\n"[..]);
        assert!(decoder.decode(&mut buf).unwrap().is_none());
        assert_eq!(decoder.state(), ParseState::ParsingHeaders);

        // the blank line alone completes it, no end of stream needed
        buf.extend_from_slice(b"\r\n");
        let request = decoder.decode(&mut buf).unwrap().unwrap();
        assert_eq!(request.method(), Method::Post);
        assert!(request.body().is_empty());
        assert_eq!(decoder.state(), ParseState::Done);
    }

    #[test]
    fn eof_inside_declared_body() {
        let mut decoder = RequestDecoder::new();
        let mut buf = BytesMut::from(&b"POST / HTTP/1.1\r\nContent-Length: 4\r\n\r\nab"[..]);

        assert!(decoder.decode(&mut buf).unwrap().is_none());
        assert_eq!(&buf[..], b"ab");
        assert!(matches!(decoder.decode_eof(&mut buf), Err(ParseError::UnexpectedEof { state: ParseState::ParsingBody })));
    }

    #[test]
    fn eof_before_headers_end() {
        for data in [&b""[..], &b"GET / HTTP/1.1"[..], &b"GET / HTTP/1.1\r\nHost: x\r\n"[..]] {
            let mut decoder = RequestDecoder::new();
            let mut buf = BytesMut::from(data);
            assert!(decoder.decode(&mut buf).unwrap().is_none());
            assert!(matches!(decoder.decode_eof(&mut buf), Err(ParseError::UnexpectedEof { .. })));
        }
    }

    #[test]
    fn lowercase_method() {
        let result = RequestDecoder::new().parse(b"get /a HTTP/1.1\r\n\r\n");
        assert!(matches!(result, Err(ParseError::MalformedRequestLine { .. })));
    }

    #[test]
    fn space_before_colon() {
        let result = decode_in_chunks(b"GET / HTTP/1.1\r\nX-Test : 1\r\n\r\n", 5);
        assert!(matches!(result, Err(ParseError::MalformedHeader { .. })));
    }

    #[test]
    fn non_numeric_content_length() {
        let result = RequestDecoder::new().parse(b"POST / HTTP/1.1\r\nContent-Length: ten\r\n\r\n0123456789");
        assert!(matches!(result, Err(ParseError::BodyLengthMismatch { .. })));

        let result = RequestDecoder::new().parse(b"POST / HTTP/1.1\r\nContent-Length: +5\r\n\r\nhello");
        assert!(matches!(result, Err(ParseError::BodyLengthMismatch { .. })));
    }

    #[test]
    fn parse_after_done() {
        let mut decoder = RequestDecoder::new();
        decoder.parse(b"GET / HTTP/1.1\r\n\r\n").unwrap();
        assert!(matches!(decoder.parse(b"GET / HTTP/1.1\r\n\r\n"), Err(ParseError::AlreadyDone)));

        assert!(decoder.take_request().is_some());
        assert!(decoder.take_request().is_none());
        assert!(matches!(decoder.decode(&mut BytesMut::new()), Err(ParseError::AlreadyDone)));
    }
}
