use crate::protocol::SendError;
use bytes::{Buf, BytesMut};
use tokio_util::codec::Encoder;
use tracing::warn;

/// Writes a fixed body verbatim.
///
/// The declared length comes from the `Content-Length` header the handler
/// sent, if any. A body of a different size is still written as-is, the
/// mismatch is only logged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LengthEncoder {
    length: Option<u64>,
}

impl LengthEncoder {
    pub fn new(length: Option<u64>) -> Self {
        Self { length }
    }
}

impl<D: Buf> Encoder<D> for LengthEncoder {
    type Error = SendError;

    fn encode(&mut self, mut item: D, dst: &mut BytesMut) -> Result<(), Self::Error> {
        let size = item.remaining() as u64;
        match self.length {
            Some(length) if length != size => {
                warn!(declared = length, actual = size, "body size differs from content-length header");
            }
            None => warn!(actual = size, "fixed body written without content-length header"),
            _ => {}
        }

        dst.reserve(item.remaining());
        while item.has_remaining() {
            let chunk = item.chunk();
            let len = chunk.len();
            dst.extend_from_slice(chunk);
            item.advance(len);
        }
        Ok(())
    }
}
