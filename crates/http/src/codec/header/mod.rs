//! HTTP header processing module for encoding and decoding headers
//!
//! # Components
//!
//! - [`HeaderDecoder`]: decodes request header lines one at a time
//!   - validates field names against the token character class
//!   - lower-cases names and folds repeated fields
//!
//! - [`HeaderEncoder`]: encodes the status line and header block of a response
//!   - writes names with the spelling the handler used
//!   - shares its field writer with trailer encoding

mod header_decoder;
mod header_encoder;

pub use header_decoder::HeaderDecoder;
pub use header_decoder::HeaderLine;
pub use header_encoder::HeaderEncoder;
pub(crate) use header_encoder::{FastWrite, encode_fields};
