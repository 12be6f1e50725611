//! Core HTTP protocol types.
//!
//! - **Requests** (`request`): [`Request`], [`RequestLine`], [`Method`] and the
//!   parser progress marker [`ParseState`]
//! - **Responses** (`response`): [`StatusLine`] and the [`ResponsePart`]s a
//!   response is written as
//! - **Headers** (`header`): [`HeaderMap`], shared by requests, responses and
//!   trailers
//! - **Errors** (`error`): [`HttpError`], [`ParseError`], [`SendError`]
//!
//! These types carry no I/O. Parsing lives in [`crate::codec`], driving the
//! socket lives in [`crate::connection`].

mod header;
pub use header::HeaderMap;
pub(crate) use header::is_token_byte;

mod request;
pub use request::Method;
pub use request::ParseState;
pub use request::Request;
pub use request::RequestLine;

mod response;
pub use response::ResponsePart;
pub use response::StatusLine;

mod error;
pub use error::HttpError;
pub use error::ParseError;
pub use error::SendError;
