//! Encoder for chunked transfer encoding.
//!
//! Each chunk goes out as `{SIZE:X}\r\n{bytes}\r\n`. The body ends either with
//! `0\r\n\r\n`, or with `0\r\n` followed by trailer fields and a blank line.

use crate::codec::header::{encode_fields, FastWrite};
use crate::protocol::{HeaderMap, SendError};
use bytes::{Buf, BytesMut};
use std::io::Write;

use tokio_util::codec::Encoder;
use tracing::trace;

/// The pieces a chunked body is written as.
#[derive(Debug)]
pub enum ChunkedItem<'a, D: Buf> {
    Chunk(D),
    Eof,
    Trailers(&'a HeaderMap),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChunkedEncoder {
    eof: bool,
    send_size: usize,
}

impl ChunkedEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_finish(&self) -> bool {
        self.eof
    }

    /// Total payload bytes written so far, chunk framing excluded.
    pub fn send_size(&self) -> usize {
        self.send_size
    }
}

impl<D: Buf> Encoder<ChunkedItem<'_, D>> for ChunkedEncoder {
    type Error = SendError;

    fn encode(&mut self, item: ChunkedItem<'_, D>, dst: &mut BytesMut) -> Result<(), Self::Error> {
        if self.eof {
            return Ok(());
        }

        match item {
            ChunkedItem::Chunk(mut bytes) => {
                let size = bytes.remaining();
                // a zero-size chunk would read as the terminator
                if size == 0 {
                    return Ok(());
                }

                write!(FastWrite(dst), "{size:X}\r\n")?;
                dst.reserve(size + 2);
                while bytes.has_remaining() {
                    let chunk = bytes.chunk();
                    let len = chunk.len();
                    dst.extend_from_slice(chunk);
                    bytes.advance(len);
                }
                dst.extend_from_slice(b"\r\n");
                self.send_size += size;
                Ok(())
            }
            ChunkedItem::Eof => {
                self.eof = true;
                trace!(send_size = self.send_size, "finished chunked body");
                dst.extend_from_slice(b"0\r\n\r\n");
                Ok(())
            }
            ChunkedItem::Trailers(trailers) => {
                self.eof = true;
                trace!(send_size = self.send_size, trailers = trailers.len(), "finished chunked body with trailers");
                dst.extend_from_slice(b"0\r\n");
                encode_fields(trailers, dst);
                dst.extend_from_slice(b"\r\n");
                Ok(())
            }
        }
    }
}
