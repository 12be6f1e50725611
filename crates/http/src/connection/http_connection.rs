use std::sync::Arc;

use http::StatusCode;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tracing::{debug, error, info, warn};

use crate::connection::{DEFAULT_BUFFER_CAPACITY, RequestReader, ResponseWriter};
use crate::handler::Handler;
use crate::protocol::{HeaderMap, HttpError, ParseError, ParseState, SendError};

/// One accepted connection: a single request, a single response, then close.
///
/// # Type Parameters
///
/// * `R`: The async readable stream type
/// * `W`: The async writable stream type
///
#[derive(Debug)]
pub struct HttpConnection<R, W> {
    reader: RequestReader<R>,
    writer: ResponseWriter<W>,
}

impl<R, W> HttpConnection<R, W>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin + Send,
{
    pub fn new(reader: R, writer: W) -> Self {
        Self::with_capacity(reader, writer, DEFAULT_BUFFER_CAPACITY)
    }

    /// `capacity` is the initial size of the read buffer.
    pub fn with_capacity(reader: R, writer: W, capacity: usize) -> Self {
        Self { reader: RequestReader::with_capacity(reader, capacity), writer: ResponseWriter::new(writer) }
    }

    /// Reads one request, hands it to `handler`, then shuts the write side down.
    ///
    /// A malformed request is answered with `400 Bad Request` instead of
    /// reaching the handler. The write side is shut down on every path.
    pub async fn process<H>(mut self, handler: Arc<H>) -> Result<(), HttpError>
    where
        H: Handler<W> + ?Sized,
    {
        let result = self.do_process(&*handler).await;

        if let Err(e) = self.writer.get_mut().shutdown().await {
            debug!(cause = %e, "failed to shut down connection");
        }

        result
    }

    async fn do_process<H>(&mut self, handler: &H) -> Result<(), HttpError>
    where
        H: Handler<W> + ?Sized,
    {
        let request = match self.reader.read_request().await {
            Ok(request) => request,

            Err(e) if e.is_malformed() => {
                warn!(cause = %e, "malformed request, responding 400");
                if let Err(send_error) = self.send_bad_request().await {
                    warn!(cause = %send_error, "failed to send 400 response");
                }
                return Err(e.into());
            }

            Err(ParseError::UnexpectedEof { state: ParseState::Initialized }) if self.reader.buffered().is_empty() => {
                info!("peer closed before sending a request");
                return Ok(());
            }

            Err(e) => {
                error!(cause = %e, "can't receive request");
                return Err(e.into());
            }
        };

        info!(method = %request.method(), target = request.target(), body_len = request.body().len(), "received request");

        handler.call(&mut self.writer, request).await;

        if !self.writer.is_finish() {
            debug!("handler returned without finishing the response");
        }

        Ok(())
    }

    async fn send_bad_request(&mut self) -> Result<(), SendError> {
        let mut headers = HeaderMap::with_capacity(2);
        headers.insert("Content-Length", "0");
        headers.insert("Connection", "close");

        self.writer.write_status(StatusCode::BAD_REQUEST).await?;
        self.writer.write_headers(&headers).await?;
        Ok(())
    }
}
