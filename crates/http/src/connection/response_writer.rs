use bytes::{Buf, BytesMut};
use http::StatusCode;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio_util::codec::Encoder;
use tracing::{debug, trace};

use crate::codec::ResponseEncoder;
use crate::ensure;
use crate::protocol::{HeaderMap, ResponsePart, SendError, StatusLine};

const DEFAULT_WRITE_CAPACITY: usize = 1024;

/// Writes one response onto a sink, part by part.
///
/// Every call encodes its part and flushes it straight to the writer, nothing
/// is held back between calls. The order of calls is checked: a call that
/// does not fit the response so far fails with [`SendError::OutOfOrder`] and
/// writes nothing. Once a write to the sink fails the response is abandoned:
/// every later call fails with [`SendError::Aborted`] and writes nothing.
///
/// ```text
/// write_status_line, write_headers, then either
///     write_body
///     write_chunked_body* then write_chunked_body_done or write_trailers
/// ```
///
/// The sink itself stays private to the crate, so a handler can only reach
/// the wire through the calls above:
///
/// ```compile_fail
/// use nano_http::connection::ResponseWriter;
///
/// let mut writer = ResponseWriter::new(Vec::<u8>::new());
/// let _sink: &mut Vec<u8> = writer.get_mut();
/// ```
#[derive(Debug)]
pub struct ResponseWriter<W> {
    writer: W,
    buffer: BytesMut,
    encoder: ResponseEncoder,
    aborted: bool,
}

impl<W> ResponseWriter<W>
where
    W: AsyncWrite + Unpin,
{
    pub fn new(writer: W) -> Self {
        Self::with_capacity(writer, DEFAULT_WRITE_CAPACITY)
    }

    pub fn with_capacity(writer: W, buffer_size: usize) -> Self {
        Self { writer, buffer: BytesMut::with_capacity(buffer_size), encoder: ResponseEncoder::new(), aborted: false }
    }

    #[cfg(test)]
    pub(crate) fn get_ref(&self) -> &W {
        &self.writer
    }

    #[inline]
    pub(crate) fn get_mut(&mut self) -> &mut W {
        &mut self.writer
    }

    #[cfg(test)]
    pub(crate) fn into_inner(self) -> W {
        self.writer
    }

    /// Whether a complete response has been written.
    pub fn is_finish(&self) -> bool {
        self.encoder.is_finish()
    }

    /// Writes `HTTP/1.1 {code} {phrase}`.
    pub async fn write_status_line(&mut self, status: StatusCode, phrase: &str) -> Result<(), SendError> {
        let status_line = StatusLine::new(status, phrase);
        self.write_part(ResponsePart::<&[u8]>::StatusLine(&status_line)).await
    }

    /// Writes the status line with the registered reason phrase of `status`.
    pub async fn write_status(&mut self, status: StatusCode) -> Result<(), SendError> {
        let status_line = StatusLine::canonical(status);
        self.write_part(ResponsePart::<&[u8]>::StatusLine(&status_line)).await
    }

    pub async fn write_headers(&mut self, headers: &HeaderMap) -> Result<(), SendError> {
        self.write_part(ResponsePart::<&[u8]>::Headers(headers)).await
    }

    /// Writes a fixed body. Nothing may follow it.
    pub async fn write_body(&mut self, body: &[u8]) -> Result<(), SendError> {
        self.write_part(ResponsePart::Body(body)).await
    }

    /// Writes one chunk and returns how many payload bytes it carried.
    ///
    /// An empty chunk writes nothing, since on the wire it would end the body.
    pub async fn write_chunked_body(&mut self, chunk: &[u8]) -> Result<usize, SendError> {
        self.write_part(ResponsePart::Chunk(chunk)).await?;
        Ok(chunk.len())
    }

    /// Ends a chunked body that has no trailers.
    pub async fn write_chunked_body_done(&mut self) -> Result<(), SendError> {
        self.write_part(ResponsePart::<&[u8]>::ChunkedDone).await
    }

    /// Ends a chunked body with the given trailer fields.
    pub async fn write_trailers(&mut self, trailers: &HeaderMap) -> Result<(), SendError> {
        self.write_part(ResponsePart::<&[u8]>::Trailers(trailers)).await
    }

    async fn write_part<D: Buf>(&mut self, part: ResponsePart<'_, D>) -> Result<(), SendError> {
        ensure!(!self.aborted, SendError::Aborted);

        self.buffer.clear();
        let name = part.name();
        self.encoder.encode(part, &mut self.buffer)?;
        self.flush(name).await
    }

    async fn flush(&mut self, part: &'static str) -> Result<(), SendError> {
        if self.buffer.is_empty() {
            return Ok(());
        }

        let written = self.buffer.len();
        let result = match self.writer.write_all(&self.buffer).await {
            Ok(()) => self.writer.flush().await,
            Err(e) => Err(e),
        };
        self.buffer.clear();

        if let Err(e) = result {
            self.aborted = true;
            debug!(part, cause = %e, "write failed, abandoning response");
            return Err(e.into());
        }

        trace!(part, written, "flushed response part");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::pin::Pin;
    use std::task::{Context, Poll};

    /// Fails the first write, then accepts everything into `wire`.
    #[derive(Default)]
    struct FailOnce {
        failed: bool,
        wire: Vec<u8>,
    }

    impl AsyncWrite for FailOnce {
        fn poll_write(mut self: Pin<&mut Self>, _cx: &mut Context<'_>, buf: &[u8]) -> Poll<io::Result<usize>> {
            if !self.failed {
                self.failed = true;
                return Poll::Ready(Err(io::ErrorKind::BrokenPipe.into()));
            }
            self.wire.extend_from_slice(buf);
            Poll::Ready(Ok(buf.len()))
        }

        fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
            Poll::Ready(Ok(()))
        }

        fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
            Poll::Ready(Ok(()))
        }
    }

    fn written(writer: ResponseWriter<Vec<u8>>) -> String {
        String::from_utf8(writer.into_inner()).unwrap()
    }

    #[tokio::test]
    async fn fixed_response() {
        let body = b"Your problem is not my problem\n";
        let mut writer = ResponseWriter::new(Vec::new());

        writer.write_status_line(StatusCode::BAD_REQUEST, "Bad Request").await.unwrap();
        writer.write_headers(&HeaderMap::default_response(body.len())).await.unwrap();
        writer.write_body(body).await.unwrap();

        assert!(writer.is_finish());
        assert_eq!(
            written(writer),
            "HTTP/1.1 400 Bad Request\r\n\
             Content-Length: 31\r\n\
             Connection: close\r\n\
             Content-Type: text/plain\r\n\
             \r\n\
             Your problem is not my problem\n"
        );
    }

    #[tokio::test]
    async fn every_part_is_flushed_immediately() {
        let mut writer = ResponseWriter::new(Vec::new());

        writer.write_status(StatusCode::OK).await.unwrap();
        assert_eq!(writer.get_ref().as_slice(), b"HTTP/1.1 200 OK\r\n");

        writer.write_headers(&HeaderMap::new()).await.unwrap();
        assert_eq!(writer.get_ref().as_slice(), b"HTTP/1.1 200 OK\r\n\r\n");
    }

    #[tokio::test]
    async fn custom_phrase_and_unknown_code() {
        let mut writer = ResponseWriter::new(Vec::new());
        writer.write_status_line(StatusCode::OK, "Fine").await.unwrap();
        assert_eq!(writer.get_ref().as_slice(), b"HTTP/1.1 200 Fine\r\n");

        let mut writer = ResponseWriter::new(Vec::new());
        writer.write_status(StatusCode::from_u16(599).unwrap()).await.unwrap();
        assert_eq!(writer.get_ref().as_slice(), b"HTTP/1.1 599 Unknown\r\n");
    }

    #[tokio::test]
    async fn chunked_body() {
        let mut headers = HeaderMap::new();
        headers.insert("Transfer-Encoding", "chunked");

        let mut writer = ResponseWriter::new(Vec::new());
        writer.write_status(StatusCode::OK).await.unwrap();
        writer.write_headers(&headers).await.unwrap();
        let start = writer.get_ref().len();

        assert_eq!(writer.write_chunked_body(b"abc").await.unwrap(), 3);
        assert_eq!(writer.write_chunked_body(b"").await.unwrap(), 0);
        assert_eq!(writer.write_chunked_body(b"de").await.unwrap(), 2);
        writer.write_chunked_body_done().await.unwrap();

        assert_eq!(&writer.get_ref()[start..], b"3\r\nabc\r\n2\r\nde\r\n0\r\n\r\n");
    }

    #[tokio::test]
    async fn chunked_body_with_trailers() {
        let mut writer = ResponseWriter::new(Vec::new());
        writer.write_status(StatusCode::OK).await.unwrap();
        writer.write_headers(&HeaderMap::new()).await.unwrap();
        let start = writer.get_ref().len();

        let mut trailers = HeaderMap::new();
        trailers.insert("X-Sum", "abc");
        writer.write_trailers(&trailers).await.unwrap();

        assert_eq!(&writer.get_ref()[start..], b"0\r\nX-Sum: abc\r\n\r\n");
        assert!(writer.is_finish());
    }

    #[tokio::test]
    async fn out_of_order_writes_nothing() {
        let mut writer = ResponseWriter::new(Vec::new());

        let result = writer.write_body(b"early").await;
        assert!(matches!(result, Err(SendError::OutOfOrder { expected: "status line", actual: "body" })));
        assert!(writer.get_ref().is_empty());

        writer.write_status(StatusCode::OK).await.unwrap();
        writer.write_headers(&HeaderMap::new()).await.unwrap();
        writer.write_chunked_body(b"abc").await.unwrap();
        let before = writer.get_ref().len();

        let result = writer.write_body(b"late").await;
        assert!(matches!(result, Err(SendError::OutOfOrder { .. })));
        assert_eq!(writer.get_ref().len(), before);
    }

    #[tokio::test]
    async fn write_failure_is_reported() {
        let (client, server) = tokio::io::duplex(16);
        drop(client);

        let mut writer = ResponseWriter::new(server);
        let result = writer.write_status(StatusCode::OK).await;
        assert!(matches!(result, Err(SendError::Io { .. })));
    }

    #[tokio::test]
    async fn failed_write_abandons_the_response() {
        let mut writer = ResponseWriter::new(FailOnce::default());

        let result = writer.write_status(StatusCode::OK).await;
        assert!(matches!(result, Err(SendError::Io { ref source }) if source.kind() == io::ErrorKind::BrokenPipe));

        let result = writer.write_headers(&HeaderMap::default_response(2)).await;
        assert!(matches!(result, Err(SendError::Aborted)));
        let result = writer.write_body(b"hi").await;
        assert!(matches!(result, Err(SendError::Aborted)));
        let result = writer.write_chunked_body(b"hi").await;
        assert!(matches!(result, Err(SendError::Aborted)));

        assert!(writer.get_ref().wire.is_empty());
        assert!(!writer.is_finish());
    }
}
