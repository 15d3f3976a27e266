//! Lazy LOB handles for BLOB and CLOB style columns.
//!
//! A handle holds the reader borrow and opens its source on first use.
//! Categories the engine streams are read through the engine stream; any
//! other category is materialized and served from memory. Whatever stream is
//! open is closed when the handle is closed or dropped.

use std::io::SeekFrom;

use bytes::Bytes;

use crate::engine::{NativeByteStream, NativeCharStream, NativeResultSet};
use crate::error::{Error, Result};
use crate::types::SqlTypeCode;

use super::byte_stream::ByteStream;
use super::memory::MemorySource;
use super::text::TextReader;

/// Fresh byte source over a cell, or `None` for NULL.
///
/// The fetch comes first and `was_null` decides; a stream the engine handed
/// out for a NULL cell is closed.
pub(crate) fn byte_source(
    rs: &mut dyn NativeResultSet,
    sql_type: SqlTypeCode,
    column: usize,
) -> Result<Option<NativeByteStream>> {
    if sql_type.is_byte_streamed() {
        let stream = rs.get_binary_stream(column)?;
        if rs.was_null()? {
            if let Some(mut s) = stream {
                s.close()?;
            }
            return Ok(None);
        }
        return Ok(stream);
    }
    let value = rs.get_bytes(column)?;
    if rs.was_null()? {
        return Ok(None);
    }
    Ok(value.map(|b| Box::new(MemorySource::new(b)) as NativeByteStream))
}

/// Character counterpart of [`byte_source`].
pub(crate) fn char_source(
    rs: &mut dyn NativeResultSet,
    sql_type: SqlTypeCode,
    column: usize,
) -> Result<Option<NativeCharStream>> {
    if sql_type.is_char_streamed() {
        let stream = rs.get_character_stream(column)?;
        if rs.was_null()? {
            if let Some(mut s) = stream {
                s.close()?;
            }
            return Ok(None);
        }
        return Ok(stream);
    }
    let value = rs.get_string(column)?;
    if rs.was_null()? {
        return Ok(None);
    }
    Ok(value.map(|s| Box::new(MemorySource::from_text(&s)) as NativeCharStream))
}

/// Binary large object in the current row.
pub struct Blob<'r> {
    rs: &'r mut dyn NativeResultSet,
    /// Engine (1-based) column.
    column: usize,
    sql_type: SqlTypeCode,
    name: String,
    chunk_size: usize,
    stream: Option<ByteStream<'r>>,
}

impl<'r> Blob<'r> {
    pub(crate) fn new(
        rs: &'r mut dyn NativeResultSet,
        column: usize,
        sql_type: SqlTypeCode,
        name: impl Into<String>,
        chunk_size: usize,
    ) -> Self {
        Self {
            rs,
            column,
            sql_type,
            name: name.into(),
            chunk_size,
            stream: None,
        }
    }

    fn source(&mut self) -> Result<NativeByteStream> {
        let source = byte_source(&mut *self.rs, self.sql_type, self.column)?;
        tracing::debug!(column = self.column, sql_type = %self.sql_type, "blob.open");
        source.ok_or_else(|| Error::NullValue {
            column: self.name.clone(),
        })
    }

    fn release(&mut self) -> Result<()> {
        match self.stream.take() {
            Some(s) => s.close(),
            None => Ok(()),
        }
    }

    fn reopen(&mut self) -> Result<&mut ByteStream<'r>> {
        self.release()?;
        let fresh = ByteStream::new(self.source()?);
        Ok(self.stream.insert(fresh))
    }

    /// Stream over the value, opened on first call.
    pub fn stream(&mut self) -> Result<&mut ByteStream<'r>> {
        let stream = match self.stream.take() {
            Some(s) => s,
            None => ByteStream::new(self.source()?),
        };
        Ok(self.stream.insert(stream))
    }

    /// Whole value, read in one pass.
    pub fn read_all(&mut self) -> Result<Bytes> {
        self.release()?;
        let mut once = ByteStream::one_shot(self.source()?);
        let all = once.read_remaining(self.chunk_size)?;
        once.close()?;
        Ok(all)
    }

    /// Read into `buf` starting at byte `offset` of the value. Short at the
    /// end of the value.
    pub fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> Result<usize> {
        let rewindable = match self.stream.as_ref() {
            Some(s) => s.position() <= offset || s.can_seek(),
            None => false,
        };
        let stream = if rewindable {
            self.stream()?
        } else {
            self.reopen()?
        };
        if stream.position() != offset {
            let target = SeekFrom::Start(offset);
            let landed = match stream.seek_units(target) {
                Ok(p) => p,
                Err(Error::Unsupported { .. }) => self.reopen()?.seek_units(target)?,
                Err(e) => return Err(e),
            };
            if landed < offset {
                return Ok(0);
            }
        }
        self.stream()?.read_fully(buf)
    }

    /// Length in bytes, found by draining a fresh stream.
    pub fn length(&mut self) -> Result<u64> {
        self.release()?;
        let mut once = ByteStream::one_shot(self.source()?);
        let length = once.skip(u64::MAX)?;
        once.close()?;
        Ok(length)
    }

    /// Close the open stream, if any.
    pub fn close(mut self) -> Result<()> {
        self.release()
    }
}

/// Character large object in the current row.
pub struct Clob<'r> {
    rs: &'r mut dyn NativeResultSet,
    /// Engine (1-based) column.
    column: usize,
    sql_type: SqlTypeCode,
    name: String,
    chunk_size: usize,
    pushback_capacity: usize,
    reader: Option<TextReader<'r>>,
}

impl<'r> Clob<'r> {
    pub(crate) fn new(
        rs: &'r mut dyn NativeResultSet,
        column: usize,
        sql_type: SqlTypeCode,
        name: impl Into<String>,
        chunk_size: usize,
        pushback_capacity: usize,
    ) -> Self {
        Self {
            rs,
            column,
            sql_type,
            name: name.into(),
            chunk_size,
            pushback_capacity,
            reader: None,
        }
    }

    fn source(&mut self) -> Result<NativeCharStream> {
        let source = char_source(&mut *self.rs, self.sql_type, self.column)?;
        tracing::debug!(column = self.column, sql_type = %self.sql_type, "clob.open");
        source.ok_or_else(|| Error::NullValue {
            column: self.name.clone(),
        })
    }

    fn release(&mut self) -> Result<()> {
        match self.reader.take() {
            Some(r) => r.close(),
            None => Ok(()),
        }
    }

    /// Fresh single-pass reader; any open reader is closed first.
    fn one_pass(&mut self) -> Result<TextReader<'r>> {
        self.release()?;
        let source = self.source()?;
        TextReader::one_shot(source, self.pushback_capacity)
    }

    /// Reader over the value, opened on first call.
    pub fn reader(&mut self) -> Result<&mut TextReader<'r>> {
        let reader = match self.reader.take() {
            Some(r) => r,
            None => TextReader::new(self.source()?, self.pushback_capacity)?,
        };
        Ok(self.reader.insert(reader))
    }

    /// Whole value, read in one pass.
    pub fn read_to_string(&mut self) -> Result<String> {
        let mut once = self.one_pass()?;
        let text = once.read_to_string(self.chunk_size)?;
        once.close()?;
        Ok(text)
    }

    /// Up to `len` characters starting at character `offset`.
    pub fn substring(&mut self, offset: u64, len: usize) -> Result<String> {
        let mut once = self.one_pass()?;
        let mut out = String::with_capacity(len);
        if once.skip(offset)? == offset {
            for _ in 0..len {
                match once.read_char()? {
                    Some(c) => out.push(c),
                    None => break,
                }
            }
        }
        once.close()?;
        Ok(out)
    }

    /// Length in characters, found by draining a fresh reader.
    pub fn length(&mut self) -> Result<u64> {
        let mut once = self.one_pass()?;
        let length = once.skip(u64::MAX)?;
        once.close()?;
        Ok(length)
    }

    /// Close the open reader, if any.
    pub fn close(mut self) -> Result<()> {
        self.release()
    }
}
