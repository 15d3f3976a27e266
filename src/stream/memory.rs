//! In-memory stream source.
//!
//! Used when a stream is requested over a value that the engine does not
//! stream: the value is materialized once and served through the same
//! [`NativeStream`] interface as engine streams.

use crate::engine::{NativeResult, NativeStream};

/// Stream over an owned buffer.
#[derive(Debug, Clone)]
pub struct MemorySource<U> {
    data: Vec<U>,
    pos: usize,
    mark: usize,
    mark_supported: bool,
}

impl<U: Copy + Default> MemorySource<U> {
    /// Create a source with mark/reset support.
    pub fn new(data: Vec<U>) -> Self {
        Self {
            data,
            pos: 0,
            mark: 0,
            mark_supported: true,
        }
    }

    /// Toggle mark/reset support.
    pub fn with_mark_support(mut self, supported: bool) -> Self {
        self.mark_supported = supported;
        self
    }

    fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }
}

impl MemorySource<char> {
    pub fn from_text(text: &str) -> Self {
        Self::new(text.chars().collect())
    }
}

impl<U: Copy + Default> NativeStream for MemorySource<U> {
    type Unit = U;

    fn read_unit(&mut self) -> NativeResult<Option<U>> {
        let unit = self.data.get(self.pos).copied();
        if unit.is_some() {
            self.pos += 1;
        }
        Ok(unit)
    }

    fn read(&mut self, buf: &mut [U]) -> NativeResult<Option<usize>> {
        if self.remaining() == 0 {
            return Ok(None);
        }
        let n = buf.len().min(self.remaining());
        buf[..n].copy_from_slice(&self.data[self.pos..self.pos + n]);
        self.pos += n;
        Ok(Some(n))
    }

    fn skip(&mut self, n: u64) -> NativeResult<u64> {
        let n = usize::try_from(n).unwrap_or(usize::MAX).min(self.remaining());
        self.pos += n;
        Ok(n as u64)
    }

    fn mark_supported(&self) -> bool {
        self.mark_supported
    }

    fn mark(&mut self, _read_limit: usize) {
        self.mark = self.pos;
    }

    fn reset(&mut self) -> NativeResult<()> {
        self.pos = self.mark;
        Ok(())
    }

    fn close(&mut self) -> NativeResult<()> {
        self.data = Vec::new();
        self.pos = 0;
        self.mark = 0;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_to_end() {
        let mut src = MemorySource::new(vec![1u8, 2, 3]);
        let mut buf = [0u8; 2];
        assert_eq!(src.read(&mut buf).unwrap(), Some(2));
        assert_eq!(src.read(&mut buf).unwrap(), Some(1));
        assert_eq!(buf[0], 3);
        assert_eq!(src.read(&mut buf).unwrap(), None);
        assert_eq!(src.read_unit().unwrap(), None);
    }

    #[test]
    fn test_skip_is_bounded() {
        let mut src = MemorySource::from_text("abcdef");
        assert_eq!(src.skip(4).unwrap(), 4);
        assert_eq!(src.skip(10).unwrap(), 2);
        assert_eq!(src.skip(1).unwrap(), 0);
    }

    #[test]
    fn test_mark_reset() {
        let mut src = MemorySource::from_text("abc");
        src.read_unit().unwrap();
        src.mark(0);
        assert_eq!(src.read_unit().unwrap(), Some('b'));
        src.reset().unwrap();
        assert_eq!(src.read_unit().unwrap(), Some('b'));
    }
}
