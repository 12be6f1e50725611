//! HTTP body handling module for processing request and response payloads
//!
//! # Components
//!
//! ## Decoders
//! - [`LengthDecoder`]: takes a Content-Length framed request body once it is
//!   fully buffered
//!
//! ## Encoders
//! - [`LengthEncoder`]: writes a fixed response body
//! - [`ChunkedEncoder`]: writes chunked segments and the terminating chunk,
//!   with or without trailers

mod chunked_encoder;
mod length_decoder;
mod length_encoder;

pub use chunked_encoder::{ChunkedEncoder, ChunkedItem};
pub use length_decoder::LengthDecoder;
pub use length_encoder::LengthEncoder;
