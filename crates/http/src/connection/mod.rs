//! HTTP connection handling module
//!
//! Moves bytes between a stream and the codecs. One connection carries one
//! request and one response.
//!
//! # Components
//!
//! - [`RequestReader`]: reads from an `AsyncRead` into a growing buffer until
//!   the decoder produces a complete request
//! - [`ResponseWriter`]: writes response parts onto an `AsyncWrite`, flushing
//!   each one as it is written
//! - [`HttpConnection`]: ties the two together around a
//!   [`Handler`](crate::handler::Handler) and closes the stream afterwards

mod http_connection;
mod request_reader;
mod response_writer;

pub use http_connection::HttpConnection;
pub use request_reader::{DEFAULT_BUFFER_CAPACITY, RequestReader};
pub use response_writer::ResponseWriter;
