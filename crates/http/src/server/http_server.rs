use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::net::TcpListener;
use tokio::net::tcp::OwnedWriteHalf;
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::connection::HttpConnection;
use crate::handler::Handler;
use crate::server::{ServerBuilder, ServerError};

/// A running server.
///
/// Open from the moment it is started until [`close`](Server::close). Closing
/// only stops accepting: connections already accepted keep running until they
/// finish on their own. Dropping a `Server` without closing it leaves the
/// accept loop running in the background.
#[derive(Debug)]
pub struct Server {
    local_addr: SocketAddr,
    open: Arc<AtomicBool>,
    shutdown: Arc<Notify>,
    accept_task: JoinHandle<()>,
}

impl Server {
    pub fn builder<H>() -> ServerBuilder<H>
    where
        H: Handler<OwnedWriteHalf> + 'static,
    {
        ServerBuilder::new()
    }

    pub(crate) async fn bind<H>(address: &[SocketAddr], handler: Arc<H>, buffer_capacity: usize) -> Result<Self, ServerError>
    where
        H: Handler<OwnedWriteHalf> + 'static,
    {
        let listener = TcpListener::bind(address).await.map_err(|e| {
            error!(cause = %e, ?address, "bind server error");
            ServerError::bind(e)
        })?;
        let local_addr = listener.local_addr().map_err(ServerError::bind)?;
        info!(%local_addr, "start listening");

        let open = Arc::new(AtomicBool::new(true));
        let shutdown = Arc::new(Notify::new());
        let accept_task = tokio::spawn(accept_loop(listener, handler, Arc::clone(&open), Arc::clone(&shutdown), buffer_capacity));

        Ok(Self { local_addr, open, shutdown, accept_task })
    }

    /// The address actually bound, useful after binding port 0.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn is_open(&self) -> bool {
        self.open.load(Ordering::Acquire)
    }

    /// Stops accepting and waits for the listener to be dropped.
    ///
    /// New connections are refused once this returns.
    pub async fn close(self) {
        self.open.store(false, Ordering::Release);
        self.shutdown.notify_one();

        if let Err(e) = self.accept_task.await {
            error!(cause = %e, "accept loop failed");
        }
        info!(local_addr = %self.local_addr, "server closed");
    }
}

async fn accept_loop<H>(listener: TcpListener, handler: Arc<H>, open: Arc<AtomicBool>, shutdown: Arc<Notify>, buffer_capacity: usize)
where
    H: Handler<OwnedWriteHalf> + 'static,
{
    loop {
        let accepted = tokio::select! {
            _ = shutdown.notified() => break,
            accepted = listener.accept() => accepted,
        };

        if !open.load(Ordering::Acquire) {
            break;
        }

        let (tcp_stream, remote_addr) = match accepted {
            Ok(stream_and_addr) => stream_and_addr,
            Err(e) => {
                warn!(cause = %e, "failed to accept");
                continue;
            }
        };

        debug!(%remote_addr, "accepted connection");
        let handler = Arc::clone(&handler);

        tokio::spawn(async move {
            let (reader, writer) = tcp_stream.into_split();
            let connection = HttpConnection::with_capacity(reader, writer, buffer_capacity);
            match connection.process(handler).await {
                Ok(()) => {
                    info!(%remote_addr, "finished process, connection shutdown");
                }
                Err(e) => {
                    error!(%remote_addr, cause = %e, "service has error, connection shutdown");
                }
            }
        });
    }

    debug!("accept loop stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::ResponseWriter;
    use crate::protocol::{HeaderMap, Request};
    use async_trait::async_trait;
    use http::StatusCode;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpStream;

    struct Target;

    #[async_trait]
    impl Handler<OwnedWriteHalf> for Target {
        async fn call(&self, writer: &mut ResponseWriter<OwnedWriteHalf>, request: Request) {
            let body = request.target().to_string();
            writer.write_status(StatusCode::OK).await.unwrap();
            writer.write_headers(&HeaderMap::default_response(body.len())).await.unwrap();
            writer.write_body(body.as_bytes()).await.unwrap();
        }
    }

    async fn get(addr: SocketAddr, target: &str) -> String {
        let mut stream = TcpStream::connect(addr).await.unwrap();
        stream.write_all(format!("GET {target} HTTP/1.1\r\nHost: x\r\n\r\n").as_bytes()).await.unwrap();
        let mut response = String::new();
        stream.read_to_string(&mut response).await.unwrap();
        response
    }

    #[tokio::test]
    async fn serves_connections_concurrently() {
        let server = Server::builder().address("127.0.0.1:0").handler(Target).start().await.unwrap();
        let addr = server.local_addr();
        assert!(server.is_open());

        let responses = tokio::join!(get(addr, "/a"), get(addr, "/b"), get(addr, "/c"));

        assert!(responses.0.ends_with("\r\n\r\n/a"));
        assert!(responses.1.ends_with("\r\n\r\n/b"));
        assert!(responses.2.ends_with("\r\n\r\n/c"));

        server.close().await;
    }

    #[tokio::test]
    async fn close_refuses_new_connections() {
        let server = Server::builder().address("127.0.0.1:0").handler(Target).start().await.unwrap();
        let addr = server.local_addr();

        server.close().await;

        assert!(TcpStream::connect(addr).await.is_err());
    }
}
