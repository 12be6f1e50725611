use bytes::BytesMut;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio_util::codec::Decoder;
use tracing::{debug, trace};

use crate::codec::RequestDecoder;
use crate::protocol::{ParseError, Request};

/// Default initial capacity of the read buffer.
pub const DEFAULT_BUFFER_CAPACITY: usize = 8 * 1024;

/// Below this much spare room the buffer is doubled before the next read.
const LOW_WATER_MARK: usize = 64;

/// Reads one request off a byte stream.
///
/// Bytes are read into the tail of a single `BytesMut`. After every read the
/// whole buffered prefix is offered to the [`RequestDecoder`]; whatever it
/// consumes is dropped from the front, so unconsumed bytes always start at
/// offset 0 for the next round. The buffer only grows, by doubling, when it is
/// nearly full.
///
/// There is no read timeout: a peer that stops sending mid-request parks this
/// reader until the peer goes away.
#[derive(Debug)]
pub struct RequestReader<R> {
    reader: R,
    buffer: BytesMut,
    decoder: RequestDecoder,
}

impl<R> RequestReader<R>
where
    R: AsyncRead + Unpin,
{
    pub fn new(reader: R) -> Self {
        Self::with_capacity(reader, DEFAULT_BUFFER_CAPACITY)
    }

    pub fn with_capacity(reader: R, capacity: usize) -> Self {
        Self { reader, buffer: BytesMut::with_capacity(capacity.max(1)), decoder: RequestDecoder::new() }
    }

    /// Bytes read but not consumed by the decoder.
    pub fn buffered(&self) -> &[u8] {
        &self.buffer
    }

    /// Reads until a full request is parsed.
    ///
    /// # Errors
    ///
    /// - any fatal parse error from the decoder
    /// - [`ParseError::UnexpectedEof`] if the stream ends before the request does
    /// - [`ParseError::Io`] if reading fails
    pub async fn read_request(&mut self) -> Result<Request, ParseError> {
        loop {
            if let Some(request) = self.decoder.decode(&mut self.buffer)? {
                return Ok(request);
            }

            self.reserve();

            let read = self.reader.read_buf(&mut self.buffer).await.map_err(ParseError::io)?;
            trace!(read, buffered = self.buffer.len(), capacity = self.buffer.capacity(), "read from stream");

            if read == 0 {
                debug!(state = %self.decoder.state(), "reached end of stream");
                return self.decoder.decode_eof(&mut self.buffer)?.ok_or(ParseError::AlreadyDone);
            }
        }
    }

    /// Doubles the buffer when less than [`LOW_WATER_MARK`] bytes of room are left.
    fn reserve(&mut self) {
        let capacity = self.buffer.capacity();
        if capacity - self.buffer.len() < LOW_WATER_MARK.min(capacity) {
            self.buffer.reserve(capacity);
            trace!(from = capacity, to = self.buffer.capacity(), "grew read buffer");
        }
    }
}
