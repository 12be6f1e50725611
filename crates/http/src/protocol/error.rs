use std::io;
use thiserror::Error;

use crate::protocol::ParseState;

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("request error: {source}")]
    RequestError {
        #[from]
        source: ParseError,
    },

    #[error("response error: {source}")]
    ResponseError {
        #[from]
        source: SendError,
    },
}

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("malformed request line: {reason}")]
    MalformedRequestLine { reason: String },

    #[error("malformed header: {reason}")]
    MalformedHeader { reason: String },

    #[error("invalid content-length header: {reason}")]
    BodyLengthMismatch { reason: String },

    #[error("unexpected end of stream while {state}")]
    UnexpectedEof { state: ParseState },

    #[error("request already parsed, no more data expected")]
    AlreadyDone,

    #[error("io error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },
}

impl ParseError {
    pub fn malformed_request_line<S: ToString>(str: S) -> Self {
        Self::MalformedRequestLine { reason: str.to_string() }
    }

    pub fn malformed_header<S: ToString>(str: S) -> Self {
        Self::MalformedHeader { reason: str.to_string() }
    }

    pub fn body_length_mismatch<S: ToString>(str: S) -> Self {
        Self::BodyLengthMismatch { reason: str.to_string() }
    }

    pub fn unexpected_eof(state: ParseState) -> Self {
        Self::UnexpectedEof { state }
    }

    pub fn io<E: Into<io::Error>>(e: E) -> Self {
        Self::Io { source: e.into() }
    }

    /// Whether the peer sent something we refuse to understand, as opposed to
    /// the stream failing underneath us.
    pub fn is_malformed(&self) -> bool {
        matches!(
            self,
            Self::MalformedRequestLine { .. } | Self::MalformedHeader { .. } | Self::BodyLengthMismatch { .. }
        )
    }
}

#[derive(Error, Debug)]
pub enum SendError {
    #[error("response written out of order: expected {expected}, got {actual}")]
    OutOfOrder { expected: &'static str, actual: &'static str },

    #[error("response aborted by an earlier write failure")]
    Aborted,

    #[error("io error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },
}

impl SendError {
    pub fn out_of_order(expected: &'static str, actual: &'static str) -> Self {
        Self::OutOfOrder { expected, actual }
    }

    pub fn io<E: Into<io::Error>>(e: E) -> Self {
        Self::Io { source: e.into() }
    }
}
