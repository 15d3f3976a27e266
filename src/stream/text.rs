//! Character reader handed to callers.
//!
//! Adds a pushback buffer on top of the position-tracked bridge so a unit can
//! be peeked and observed again by the next read.

use std::io::SeekFrom;
use std::marker::PhantomData;

use crate::engine::NativeCharStream;
use crate::error::{Error, Result};

use super::bridge::StreamBridge;
use super::pool::CHAR_POOL;

/// Caller-owned character reader over a column value.
pub struct TextReader<'r> {
    bridge: StreamBridge<char>,
    /// Units pushed back, last pushed on top.
    pushback: Vec<char>,
    capacity: usize,
    /// Pushback contents at the time of the last mark.
    marked_pushback: Vec<char>,
    _row: PhantomData<&'r mut ()>,
}

impl<'r> TextReader<'r> {
    /// Wrap an engine character stream.
    ///
    /// # Errors
    /// `Error::InvalidArgument` if `pushback_capacity` is zero.
    pub fn new(inner: NativeCharStream, pushback_capacity: usize) -> Result<Self> {
        Self::with_bridge(StreamBridge::new(inner), pushback_capacity)
    }

    /// Reader for a single front-to-back pass; the origin is not marked.
    pub(crate) fn one_shot(inner: NativeCharStream, pushback_capacity: usize) -> Result<Self> {
        Self::with_bridge(StreamBridge::one_shot(inner), pushback_capacity)
    }

    fn with_bridge(bridge: StreamBridge<char>, pushback_capacity: usize) -> Result<Self> {
        if pushback_capacity == 0 {
            return Err(Error::invalid_argument(
                "pushback capacity must be at least 1",
            ));
        }
        Ok(Self {
            bridge,
            pushback: Vec::with_capacity(pushback_capacity),
            capacity: pushback_capacity,
            marked_pushback: Vec::new(),
            _row: PhantomData,
        })
    }

    /// Characters consumed by the caller. Pushed-back units do not count.
    ///
    /// `unread` never pushes back more than was consumed, so this cannot go
    /// below zero.
    pub fn position(&self) -> u64 {
        self.bridge
            .position()
            .saturating_sub(self.pushback.len() as u64)
    }

    pub fn can_seek(&self) -> bool {
        self.bridge.can_seek()
    }

    /// Read one character. `None` at end of data.
    pub fn read_char(&mut self) -> Result<Option<char>> {
        if let Some(c) = self.pushback.pop() {
            return Ok(Some(c));
        }
        self.bridge.read_unit()
    }

    /// Look at the next character without consuming it.
    pub fn peek(&mut self) -> Result<Option<char>> {
        let next = self.read_char()?;
        if let Some(c) = next {
            self.unread(c)?;
        }
        Ok(next)
    }

    /// Push a character back so the next read returns it.
    ///
    /// # Errors
    /// - `Error::Unsupported` when the pushback buffer is full
    /// - `Error::InvalidArgument` when nothing is left to push back over,
    ///   i.e. at position 0
    pub fn unread(&mut self, c: char) -> Result<()> {
        if self.pushback.len() >= self.capacity {
            return Err(Error::unsupported(format!(
                "pushback buffer full (capacity {})",
                self.capacity
            )));
        }
        if self.position() == 0 {
            return Err(Error::invalid_argument(
                "cannot push back before the start of the stream",
            ));
        }
        self.pushback.push(c);
        Ok(())
    }

    /// Read up to `buf.len()` characters; 0 only at end of data.
    pub fn read(&mut self, buf: &mut [char]) -> Result<usize> {
        let mut filled = 0;
        while filled < buf.len() {
            match self.pushback.pop() {
                Some(c) => {
                    buf[filled] = c;
                    filled += 1;
                }
                None => break,
            }
        }
        if filled < buf.len() && (filled == 0 || !self.bridge.is_eof()) {
            filled += self.bridge.read(&mut buf[filled..])?;
        }
        Ok(filled)
    }

    /// Read until `buf` is full or the value ends.
    pub fn read_fully(&mut self, buf: &mut [char]) -> Result<usize> {
        let mut filled = 0;
        while filled < buf.len() {
            let n = self.read(&mut buf[filled..])?;
            if n == 0 {
                break;
            }
            filled += n;
        }
        Ok(filled)
    }

    /// Skip up to `n` characters, looping over short skips.
    pub fn skip(&mut self, n: u64) -> Result<u64> {
        let mut skipped = 0;
        while skipped < n && self.pushback.pop().is_some() {
            skipped += 1;
        }
        Ok(skipped + self.bridge.skip_fully(n - skipped)?)
    }

    /// Read a line without its terminator (`\n`, `\r\n` or `\r`).
    /// `None` at end of data.
    pub fn read_line(&mut self) -> Result<Option<String>> {
        let mut line = String::new();
        loop {
            match self.read_char()? {
                None if line.is_empty() => return Ok(None),
                None => return Ok(Some(line)),
                Some('\n') => return Ok(Some(line)),
                Some('\r') => {
                    if self.peek()? == Some('\n') {
                        self.read_char()?;
                    }
                    return Ok(Some(line));
                }
                Some(c) => line.push(c),
            }
        }
    }

    /// Drain the rest of the reader into a string.
    pub fn read_to_string(&mut self, chunk_size: usize) -> Result<String> {
        let mut chunk = CHAR_POOL.rent(chunk_size.max(1));
        let mut out = String::new();
        loop {
            let n = self.read(&mut chunk)?;
            if n == 0 {
                break;
            }
            out.extend(&chunk[..n]);
        }
        Ok(out)
    }

    /// Move to a character position.
    ///
    /// Forward seeks consume pending pushback first, then skip. Backward and
    /// from-end seeks drop the pushback and need mark support, as for
    /// [`ByteStream`](super::ByteStream).
    pub fn seek(&mut self, pos: SeekFrom) -> Result<u64> {
        let current = self.position();
        let target = match pos {
            SeekFrom::Start(p) => p,
            SeekFrom::Current(off) if off >= 0 => current.saturating_add(off as u64),
            SeekFrom::Current(off) => current
                .checked_sub(off.unsigned_abs())
                .ok_or_else(|| Error::invalid_argument("seek before start of stream"))?,
            SeekFrom::End(_) => {
                self.pushback.clear();
                return self.bridge.seek(pos);
            }
        };
        if target >= current {
            self.skip(target - current)?;
            return Ok(self.position());
        }
        self.pushback.clear();
        self.bridge.seek(SeekFrom::Start(target))
    }

    /// Capture the current position (including pending pushback).
    pub fn mark(&mut self) {
        self.bridge.mark();
        self.marked_pushback = self.pushback.clone();
    }

    /// Return to the last mark.
    pub fn reset(&mut self) -> Result<()> {
        self.bridge.reset()?;
        self.pushback = self.marked_pushback.clone();
        Ok(())
    }

    /// Release the engine stream now rather than on drop.
    pub fn close(mut self) -> Result<()> {
        self.pushback.clear();
        self.bridge.close()
    }
}
