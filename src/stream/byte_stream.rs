//! Byte stream handed to callers.

use std::io::{self, Read, Seek, SeekFrom};
use std::marker::PhantomData;

use bytes::{Bytes, BytesMut};

use crate::engine::NativeByteStream;
use crate::error::Result;

use super::bridge::StreamBridge;
use super::pool::BYTE_POOL;

/// Caller-owned byte stream over a column value.
///
/// The lifetime ties the stream to the reader borrow it came from, so the
/// row cannot advance while the stream is alive.
pub struct ByteStream<'r> {
    bridge: StreamBridge<u8>,
    _row: PhantomData<&'r mut ()>,
}

impl<'r> ByteStream<'r> {
    pub fn new(inner: NativeByteStream) -> Self {
        Self {
            bridge: StreamBridge::new(inner),
            _row: PhantomData,
        }
    }

    /// Stream for a single front-to-back pass; the origin is not marked.
    pub(crate) fn one_shot(inner: NativeByteStream) -> Self {
        Self {
            bridge: StreamBridge::one_shot(inner),
            _row: PhantomData,
        }
    }

    /// Bytes consumed so far.
    pub fn position(&self) -> u64 {
        self.bridge.position()
    }

    pub fn can_seek(&self) -> bool {
        self.bridge.can_seek()
    }

    pub fn mark(&mut self) {
        self.bridge.mark();
    }

    pub fn reset(&mut self) -> Result<()> {
        self.bridge.reset()
    }

    /// Skip up to `n` bytes, looping over short skips.
    pub fn skip(&mut self, n: u64) -> Result<u64> {
        self.bridge.skip_fully(n)
    }

    /// Seek without going through `std::io`. Backward seeks need mark
    /// support.
    pub fn seek_units(&mut self, pos: SeekFrom) -> Result<u64> {
        self.bridge.seek(pos)
    }

    /// Read up to `buf.len()` bytes; 0 only at end of data.
    pub fn read_bytes(&mut self, buf: &mut [u8]) -> Result<usize> {
        self.bridge.read(buf)
    }

    /// Read until `buf` is full or the value ends.
    pub fn read_fully(&mut self, buf: &mut [u8]) -> Result<usize> {
        self.bridge.read_fully(buf)
    }

    /// Drain the rest of the stream.
    pub fn read_remaining(&mut self, chunk_size: usize) -> Result<Bytes> {
        let mut chunk = BYTE_POOL.rent(chunk_size.max(1));
        let mut out = BytesMut::new();
        loop {
            let n = self.bridge.read(&mut chunk)?;
            if n == 0 {
                break;
            }
            out.extend_from_slice(&chunk[..n]);
        }
        Ok(out.freeze())
    }

    /// Release the engine stream now rather than on drop.
    pub fn close(mut self) -> Result<()> {
        self.bridge.close()
    }
}

impl Read for ByteStream<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        Ok(self.bridge.read(buf)?)
    }
}

impl Seek for ByteStream<'_> {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        Ok(self.bridge.seek(pos)?)
    }

    fn stream_position(&mut self) -> io::Result<u64> {
        Ok(self.bridge.position())
    }
}
