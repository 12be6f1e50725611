use std::io;
use std::net::{SocketAddr, ToSocketAddrs};
use std::sync::Arc;

use thiserror::Error;
use tokio::net::tcp::OwnedWriteHalf;

use crate::connection::DEFAULT_BUFFER_CAPACITY;
use crate::handler::Handler;
use crate::server::Server;

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("address must be set")]
    MissingAddress,

    #[error("handler must be set")]
    MissingHandler,

    #[error("invalid address: {source}")]
    InvalidAddress { source: io::Error },

    #[error("bind server error: {source}")]
    Bind { source: io::Error },
}

impl ServerError {
    pub fn invalid_address<E: Into<io::Error>>(e: E) -> Self {
        Self::InvalidAddress { source: e.into() }
    }

    pub fn bind<E: Into<io::Error>>(e: E) -> Self {
        Self::Bind { source: e.into() }
    }
}

/// Configures and starts a [`Server`].
#[derive(Debug)]
pub struct ServerBuilder<H> {
    address: Option<Result<Vec<SocketAddr>, ServerError>>,
    buffer_capacity: usize,
    handler: Option<Arc<H>>,
}

impl<H> ServerBuilder<H>
where
    H: Handler<OwnedWriteHalf> + 'static,
{
    pub(crate) fn new() -> Self {
        Self { address: None, buffer_capacity: DEFAULT_BUFFER_CAPACITY, handler: None }
    }

    /// Address to listen on. Port 0 picks a free port, see [`Server::local_addr`].
    pub fn address<A: ToSocketAddrs>(mut self, address: A) -> Self {
        let resolved = address.to_socket_addrs().map(|addrs| addrs.collect::<Vec<_>>()).map_err(ServerError::invalid_address);
        self.address = Some(resolved);
        self
    }

    /// Initial read buffer capacity of every connection.
    pub fn buffer_capacity(mut self, capacity: usize) -> Self {
        self.buffer_capacity = capacity;
        self
    }

    pub fn handler(mut self, handler: H) -> Self {
        self.handler = Some(Arc::new(handler));
        self
    }

    /// Shares an already reference counted handler.
    pub fn shared_handler(mut self, handler: Arc<H>) -> Self {
        self.handler = Some(handler);
        self
    }

    /// Binds the listener and spawns the accept loop.
    ///
    /// # Errors
    ///
    /// Fails if the address or handler is missing, the address does not
    /// resolve, or binding fails.
    pub async fn start(self) -> Result<Server, ServerError> {
        let address = self.address.ok_or(ServerError::MissingAddress)??;
        let handler = self.handler.ok_or(ServerError::MissingHandler)?;
        Server::bind(&address, handler, self.buffer_capacity).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::ResponseWriter;
    use crate::protocol::Request;
    use async_trait::async_trait;

    struct Noop;

    #[async_trait]
    impl Handler<OwnedWriteHalf> for Noop {
        async fn call(&self, _writer: &mut ResponseWriter<OwnedWriteHalf>, _request: Request) {}
    }

    #[tokio::test]
    async fn missing_address() {
        let result = Server::builder().handler(Noop).start().await;
        assert!(matches!(result, Err(ServerError::MissingAddress)));
    }

    #[tokio::test]
    async fn missing_handler() {
        let result = Server::builder::<Noop>().address("127.0.0.1:0").start().await;
        assert!(matches!(result, Err(ServerError::MissingHandler)));
    }

    #[tokio::test]
    async fn unresolvable_address() {
        let result = Server::builder().address("not an address").handler(Noop).start().await;
        assert!(matches!(result, Err(ServerError::InvalidAddress { .. })));
    }

    #[tokio::test]
    async fn address_in_use() {
        let first = Server::builder().address("127.0.0.1:0").handler(Noop).start().await.unwrap();

        let result = Server::builder().address(first.local_addr()).handler(Noop).start().await;
        assert!(matches!(result, Err(ServerError::Bind { .. })));

        first.close().await;
    }
}
