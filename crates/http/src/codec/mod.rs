//! HTTP codec module for encoding and decoding HTTP messages
//!
//! This module turns bytes into requests and responses into bytes. It does no
//! I/O itself; [`crate::connection`] moves the bytes.
//!
//! # Architecture
//!
//! - Request handling:
//!   - [`RequestDecoder`]: incremental request parser, also usable as a
//!     `tokio_util` [`Decoder`](tokio_util::codec::Decoder)
//!   - request line parsing via `request_line`
//!   - header line parsing via [`header`]
//!   - Content-Length bodies via [`body`]
//!
//! - Response handling:
//!   - [`ResponseEncoder`]: encodes response parts and enforces their order
//!   - status line and header encoding via [`header`]
//!   - fixed and chunked bodies via [`body`]
//!
//! # Example
//!
//! ```
//! use nano_http::codec::{RequestDecoder, ResponseEncoder};
//! use nano_http::protocol::{HeaderMap, ResponsePart, StatusLine};
//! use tokio_util::codec::{Decoder, Encoder};
//! use bytes::BytesMut;
//! use http::StatusCode;
//!
//! // Decode incoming request
//! let mut decoder = RequestDecoder::new();
//! let mut request_buffer = BytesMut::from(&b"GET / HTTP/1.1\r\nHost: x\r\n\r\n"[..]);
//! let request = decoder.decode(&mut request_buffer).unwrap().unwrap();
//! assert_eq!(request.target(), "/");
//!
//! // Encode outgoing response
//! let mut encoder = ResponseEncoder::new();
//! let mut response_buffer = BytesMut::new();
//! let status_line = StatusLine::canonical(StatusCode::OK);
//! encoder.encode(ResponsePart::<&[u8]>::StatusLine(&status_line), &mut response_buffer).unwrap();
//! encoder.encode(ResponsePart::<&[u8]>::Headers(&HeaderMap::default_response(0)), &mut response_buffer).unwrap();
//! assert!(response_buffer.starts_with(b"HTTP/1.1 200 OK\r\n"));
//! ```

pub mod body;
pub mod header;
mod request_decoder;
mod request_line;
mod response_encoder;

pub use request_decoder::RequestDecoder;
pub use response_encoder::ResponseEncoder;
