//! The boundary between the connection and application code.

use async_trait::async_trait;
use tokio::io::AsyncWrite;

use crate::connection::ResponseWriter;
use crate::protocol::Request;

/// Answers one parsed request.
///
/// The handler gets the request and a [`ResponseWriter`] for the same
/// connection. It writes the response itself, in order; there is no return
/// value. Whatever the handler leaves unwritten, the connection is closed once
/// `call` returns.
///
/// # Example
///
/// ```
/// use async_trait::async_trait;
/// use http::StatusCode;
/// use nano_http::connection::ResponseWriter;
/// use nano_http::handler::Handler;
/// use nano_http::protocol::{HeaderMap, Request};
/// use tokio::io::AsyncWrite;
///
/// struct Hello;
///
/// #[async_trait]
/// impl<W: AsyncWrite + Unpin + Send> Handler<W> for Hello {
///     async fn call(&self, writer: &mut ResponseWriter<W>, _request: Request) {
///         let body = b"hello\n";
///         if writer.write_status(StatusCode::OK).await.is_err() {
///             return;
///         }
///         if writer.write_headers(&HeaderMap::default_response(body.len())).await.is_err() {
///             return;
///         }
///         let _ = writer.write_body(body).await;
///     }
/// }
/// ```
#[async_trait]
pub trait Handler<W>: Send + Sync
where
    W: AsyncWrite + Unpin + Send,
{
    async fn call(&self, writer: &mut ResponseWriter<W>, request: Request);
}

