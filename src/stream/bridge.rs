//! Position and mark bookkeeping over an engine pull stream.
//!
//! The engine stream has no notion of position, may skip fewer units than
//! asked and can only be rewound through mark/reset. [`StreamBridge`] tracks
//! the absolute position itself:
//!
//! - every unit a read or skip reports advances the position by exactly that
//!   many units; a read or skip that reports nothing never advances it
//! - reads return 0 only at end of data
//! - `reset` restores the position to the last mark
//!
//! Positions are `u64` and advance with `wrapping_add`. A single value would
//! have to exceed 2^64 units to wrap; that is accepted and not detected.

use std::io::SeekFrom;

use crate::engine::constants::MARK_READ_LIMIT;
use crate::engine::NativeStream;
use crate::error::{Error, Result};

/// Position-tracked wrapper over a one-shot engine stream.
pub struct StreamBridge<U: Copy + Default> {
    inner: Box<dyn NativeStream<Unit = U>>,
    position: u64,
    mark: Option<u64>,
    eof: bool,
    closed: bool,
}

impl<U: Copy + Default> StreamBridge<U> {
    /// Wrap an engine stream positioned at the start of a value.
    ///
    /// When the stream supports mark/reset the origin is marked right away so
    /// that seeking back to the start works until the caller sets a new mark.
    pub fn new(inner: Box<dyn NativeStream<Unit = U>>) -> Self {
        let mut bridge = Self::one_shot(inner);
        if bridge.inner.mark_supported() {
            bridge.inner.mark(MARK_READ_LIMIT);
            bridge.mark = Some(0);
        }
        bridge
    }

    /// Wrap a stream that is read once, front to back.
    ///
    /// The origin is not marked, so an engine that buffers for mark/reset
    /// never holds the value. Backward seeks fail until [`mark`](Self::mark)
    /// is called.
    pub fn one_shot(inner: Box<dyn NativeStream<Unit = U>>) -> Self {
        Self {
            inner,
            position: 0,
            mark: None,
            eof: false,
            closed: false,
        }
    }

    /// Units consumed since creation or the last reset.
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Position of the current mark, if any.
    pub fn mark_position(&self) -> Option<u64> {
        self.mark
    }

    /// Whether end of data has been observed.
    pub fn is_eof(&self) -> bool {
        self.eof
    }

    /// Backward and from-end seeks need mark support.
    pub fn can_seek(&self) -> bool {
        self.inner.mark_supported()
    }

    fn advance(&mut self, units: u64) {
        self.position = self.position.wrapping_add(units);
    }

    fn ensure_open(&self) -> Result<()> {
        if self.closed {
            return Err(Error::unsupported("stream is closed"));
        }
        Ok(())
    }

    /// Read one unit. `None` at end of data.
    pub fn read_unit(&mut self) -> Result<Option<U>> {
        self.ensure_open()?;
        if self.eof {
            return Ok(None);
        }
        match self.inner.read_unit()? {
            Some(unit) => {
                self.advance(1);
                Ok(Some(unit))
            }
            None => {
                self.eof = true;
                Ok(None)
            }
        }
    }

    /// Read up to `buf.len()` units. Returns 0 only at end of data (or for an
    /// empty buffer).
    pub fn read(&mut self, buf: &mut [U]) -> Result<usize> {
        self.ensure_open()?;
        if buf.is_empty() || self.eof {
            return Ok(0);
        }
        match self.inner.read(buf)? {
            Some(0) => {
                // The engine transferred nothing without signalling the end;
                // block on a single unit so 0 keeps meaning end of data.
                match self.read_unit()? {
                    Some(unit) => {
                        buf[0] = unit;
                        Ok(1)
                    }
                    None => Ok(0),
                }
            }
            Some(n) => {
                let n = n.min(buf.len());
                self.advance(n as u64);
                Ok(n)
            }
            None => {
                self.eof = true;
                Ok(0)
            }
        }
    }

    /// Read until `buf` is full or the data ends. Returns units read.
    pub fn read_fully(&mut self, buf: &mut [U]) -> Result<usize> {
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

    /// Single skip call; may skip fewer than `n` units.
    pub fn skip(&mut self, n: u64) -> Result<u64> {
        self.ensure_open()?;
        if n == 0 || self.eof {
            return Ok(0);
        }
        let skipped = self.inner.skip(n)?.min(n);
        if skipped > 0 {
            self.advance(skipped);
            return Ok(skipped);
        }
        // A zero skip does not distinguish "nothing yet" from end of data.
        match self.read_unit()? {
            Some(_) => Ok(1),
            None => Ok(0),
        }
    }

    /// Skip until `n` units are consumed or the data ends.
    pub fn skip_fully(&mut self, n: u64) -> Result<u64> {
        let mut remaining = n;
        while remaining > 0 {
            let skipped = self.skip(remaining)?;
            if skipped == 0 {
                break;
            }
            remaining -= skipped;
        }
        Ok(n - remaining)
    }

    /// Capture the current position as the mark.
    pub fn mark(&mut self) {
        if self.inner.mark_supported() {
            self.inner.mark(MARK_READ_LIMIT);
        }
        tracing::debug!(position = self.position, "stream.mark");
        self.mark = Some(self.position);
    }

    /// Restore the position to the mark.
    ///
    /// # Errors
    /// `Error::Unsupported` when the engine stream has no mark support or no
    /// mark was captured.
    pub fn reset(&mut self) -> Result<()> {
        self.ensure_open()?;
        if !self.inner.mark_supported() {
            return Err(Error::unsupported("stream does not support mark/reset"));
        }
        let mark = self
            .mark
            .ok_or_else(|| Error::unsupported("reset without a mark"))?;
        self.inner.reset()?;
        tracing::debug!(from = self.position, to = mark, "stream.reset");
        self.position = mark;
        self.eof = false;
        Ok(())
    }

    /// Seek to a new position. Forward seeks skip; backward and from-end
    /// seeks need mark support and cannot go before the current mark.
    pub fn seek(&mut self, pos: SeekFrom) -> Result<u64> {
        let target = match pos {
            SeekFrom::Start(p) => p,
            SeekFrom::Current(off) if off >= 0 => self.position.saturating_add(off as u64),
            SeekFrom::Current(off) => self
                .position
                .checked_sub(off.unsigned_abs())
                .ok_or_else(|| Error::invalid_argument("seek before start of stream"))?,
            SeekFrom::End(off) => {
                if !self.can_seek() {
                    return Err(Error::unsupported(
                        "seek from end requires mark/reset support",
                    ));
                }
                self.skip_fully(u64::MAX)?;
                let length = self.position;
                if off >= 0 {
                    length.saturating_add(off as u64)
                } else {
                    length
                        .checked_sub(off.unsigned_abs())
                        .ok_or_else(|| Error::invalid_argument("seek before start of stream"))?
                }
            }
        };

        if target >= self.position {
            self.skip_fully(target - self.position)?;
        } else {
            self.rewind_to(target)?;
        }
        Ok(self.position)
    }

    fn rewind_to(&mut self, target: u64) -> Result<()> {
        if !self.can_seek() {
            return Err(Error::unsupported(
                "backward seek requires mark/reset support",
            ));
        }
        match self.mark {
            Some(mark) if mark <= target => {
                self.reset()?;
                self.skip_fully(target - mark)?;
                Ok(())
            }
            _ => Err(Error::unsupported(format!(
                "cannot seek to {} before the current mark",
                target
            ))),
        }
    }

    /// Release the engine stream. Idempotent.
    pub fn close(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        self.inner.close()?;
        Ok(())
    }
}

impl<U: Copy + Default> Drop for StreamBridge<U> {
    fn drop(&mut self) {
        if !self.closed {
            self.closed = true;
            if let Err(e) = self.inner.close() {
                tracing::debug!(error = %e, "stream.close failed on drop");
            }
        }
    }
}
