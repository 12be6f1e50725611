//! HTTP request types.
//!
//! A [`Request`] is only ever handed out complete: the decoder keeps the
//! partially parsed pieces to itself and tracks its progress as a
//! [`ParseState`].

use std::fmt;
use std::str::FromStr;

use bytes::Bytes;

use crate::protocol::{HeaderMap, ParseError};

/// The request methods this server understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

impl FromStr for Method {
    type Err = ParseError;

    /// Matching is exact: `get` is rejected rather than normalized.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_uppercase()) {
            return Err(ParseError::malformed_request_line(format!("method {s:?} is not uppercase letters")));
        }

        match s {
            "GET" => Ok(Method::Get),
            "POST" => Ok(Method::Post),
            "PUT" => Ok(Method::Put),
            "DELETE" => Ok(Method::Delete),
            _ => Err(ParseError::malformed_request_line(format!("unsupported method {s}"))),
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestLine {
    pub method: Method,
    pub target: String,
    /// Always `"1.1"`, the only version the parser accepts.
    pub version: String,
}

/// Progress of a request through the parser. States only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum ParseState {
    #[default]
    Initialized,
    ParsingHeaders,
    ParsingBody,
    Done,
}

impl fmt::Display for ParseState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ParseState::Initialized => "reading request line",
            ParseState::ParsingHeaders => "reading headers",
            ParseState::ParsingBody => "reading body",
            ParseState::Done => "done",
        };
        f.write_str(s)
    }
}

/// A fully parsed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    request_line: RequestLine,
    headers: HeaderMap,
    body: Bytes,
}

impl Request {
    pub(crate) fn new(request_line: RequestLine, headers: HeaderMap, body: Bytes) -> Self {
        Self { request_line, headers, body }
    }

    pub fn request_line(&self) -> &RequestLine {
        &self.request_line
    }

    pub fn method(&self) -> Method {
        self.request_line.method
    }

    pub fn target(&self) -> &str {
        &self.request_line.target
    }

    pub fn version(&self) -> &str {
        &self.request_line.version
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    pub fn into_parts(self) -> (RequestLine, HeaderMap, Bytes) {
        (self.request_line, self.headers, self.body)
    }
}
