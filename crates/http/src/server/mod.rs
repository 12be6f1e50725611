//! TCP server module
//!
//! [`Server`] owns a listener and an accept loop. Every accepted stream gets
//! its own task running an [`HttpConnection`](crate::connection::HttpConnection)
//! around the configured [`Handler`](crate::handler::Handler).
//!
//! # Example
//!
//! ```no_run
//! # use async_trait::async_trait;
//! # use nano_http::connection::ResponseWriter;
//! # use nano_http::handler::Handler;
//! # use nano_http::protocol::Request;
//! # use tokio::io::AsyncWrite;
//! use nano_http::server::Server;
//!
//! # struct Noop;
//! # #[async_trait]
//! # impl<W: AsyncWrite + Unpin + Send> Handler<W> for Noop {
//! #     async fn call(&self, _writer: &mut ResponseWriter<W>, _request: Request) {}
//! # }
//! # async fn run() -> Result<(), nano_http::server::ServerError> {
//! let server = Server::builder().address("127.0.0.1:42069").handler(Noop).start().await?;
//! println!("listening on {}", server.local_addr());
//!
//! tokio::signal::ctrl_c().await.ok();
//! server.close().await;
//! # Ok(())
//! # }
//! ```

mod builder;
mod http_server;

pub use builder::{ServerBuilder, ServerError};
pub use http_server::Server;
