//! A small HTTP/1.1 server built directly on tokio TCP streams
//!
//! This crate parses requests incrementally from whatever bytes have arrived
//! so far and writes responses part by part, with fixed or chunked bodies and
//! optional trailers. Each connection carries exactly one request and one
//! response, then it is closed.
//!
//! # Example
//!
//! ```no_run
//! use async_trait::async_trait;
//! use http::StatusCode;
//! use nano_http::connection::ResponseWriter;
//! use nano_http::handler::Handler;
//! use nano_http::protocol::{HeaderMap, Request, SendError};
//! use nano_http::server::Server;
//! use tokio::io::AsyncWrite;
//! use tracing::{error, info, Level};
//! use tracing_subscriber::FmtSubscriber;
//!
//! struct HelloWorld;
//!
//! impl HelloWorld {
//!     async fn respond<W: AsyncWrite + Unpin + Send>(&self, writer: &mut ResponseWriter<W>) -> Result<(), SendError> {
//!         let body = b"Hello World!\r\n";
//!         writer.write_status(StatusCode::OK).await?;
//!         writer.write_headers(&HeaderMap::default_response(body.len())).await?;
//!         writer.write_body(body).await
//!     }
//! }
//!
//! #[async_trait]
//! impl<W: AsyncWrite + Unpin + Send> Handler<W> for HelloWorld {
//!     async fn call(&self, writer: &mut ResponseWriter<W>, request: Request) {
//!         info!(path = request.target(), "request path");
//!         if let Err(e) = self.respond(writer).await {
//!             error!(cause = %e, "failed to send response");
//!         }
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let subscriber = FmtSubscriber::builder().with_max_level(Level::INFO).finish();
//!     tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");
//!
//!     let server = match Server::builder().address("127.0.0.1:8080").handler(HelloWorld).start().await {
//!         Ok(server) => server,
//!         Err(e) => {
//!             error!(cause = %e, "bind server error");
//!             return;
//!         }
//!     };
//!
//!     let _ = tokio::signal::ctrl_c().await;
//!     server.close().await;
//! }
//! ```
//!
//! # Architecture
//!
//! - [`protocol`]: request, header and response types plus the error enums
//! - [`codec`]: the request parser and the response encoder, no I/O
//! - [`connection`]: the read loop, the response writer and the per connection driver
//! - [`handler`]: the trait application code implements
//! - [`server`]: listener, accept loop and shutdown
//!
//! # Limitations
//!
//! - HTTP/1.1 only, and only `GET`, `POST`, `PUT` and `DELETE`
//! - no keep-alive: one request per connection
//! - request bodies need `Content-Length`; chunked requests are not decoded
//! - no timeouts and no limits on header or body size
//! - no TLS

pub mod codec;
pub mod connection;
pub mod handler;
pub mod protocol;
pub mod server;

mod utils;
pub(crate) use utils::ensure;
