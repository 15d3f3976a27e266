//! Typed, row-at-a-time access over an engine result cursor.
//!
//! [`DataReader`] wraps a [`NativeResultSet`] and exposes 0-based, statically
//! typed accessors. Column categories are derived once, on first metadata
//! access. Every read follows the same order: the native fetch is issued
//! first, then the engine's `was_null` side channel is consulted, and only
//! then is the value classified.
//!
//! # Example
//!
//! ```no_run
//! use sql_bridge::engine::NativeResultSet;
//! use sql_bridge::{DataReader, Result, TypedValue};
//!
//! fn dump<R: NativeResultSet>(rs: R) -> Result<()> {
//!     let mut reader = DataReader::new(rs);
//!     let count = reader.field_count()?;
//!     while reader.read()? {
//!         for ordinal in 0..count {
//!             match reader.get_value(ordinal)? {
//!                 TypedValue::Null => println!("NULL"),
//!                 value => println!("{}", value),
//!             }
//!         }
//!     }
//!     reader.close()
//! }
//! ```

mod dispatch;

use std::cell::OnceCell;
use std::io::Write;
use std::sync::Arc;

use bytes::Bytes;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::config::ReaderConfig;
use crate::engine::constants::ENGINE_ERROR_INVALID_COLUMN_NAME;
use crate::engine::{NativeByteStream, NativeCharStream, NativeResultSet, ENGINE_ORDINAL_BASE};
use crate::error::{Error, Result};
use crate::stream::{
    byte_source, char_source, Blob, ByteStream, Clob, StreamBridge, TextReader, BYTE_POOL,
    CHAR_POOL,
};
use crate::types::{
    check_representation, ColumnDescriptor, ColumnInfo, OffsetTime, Representation, SqlTypeCode,
    TypedValue,
};

use dispatch::{native_reader, read_text, ReadFn};

/// Typed reader over an engine result cursor.
///
/// Streams, readers and LOB handles obtained from it borrow the reader
/// mutably, so the cursor cannot advance while any of them is alive.
pub struct DataReader<R: NativeResultSet> {
    rs: R,
    config: ReaderConfig,
    /// Column descriptors, computed on first access.
    columns: OnceCell<Arc<ColumnInfo>>,
    /// Whether the cursor is positioned on a row.
    on_row: bool,
    closed: bool,
    rows_read: u64,
}

impl<R: NativeResultSet> DataReader<R> {
    /// Create a reader with the default configuration.
    pub fn new(rs: R) -> Self {
        Self::with_config(rs, ReaderConfig::default())
    }

    /// Create a reader with an explicit configuration.
    pub fn with_config(rs: R, config: ReaderConfig) -> Self {
        tracing::debug!(zone = ?config.zone_policy, "reader.open");
        Self {
            rs,
            config,
            columns: OnceCell::new(),
            on_row: false,
            closed: false,
            rows_read: 0,
        }
    }

    /// Reader configuration.
    pub fn config(&self) -> &ReaderConfig {
        &self.config
    }

    // ==================== Cursor ====================

    /// Advance to the next row. Returns `false` once the rows are exhausted.
    pub fn read(&mut self) -> Result<bool> {
        self.ensure_open()?;
        self.on_row = self.rs.next()?;
        if self.on_row {
            self.rows_read += 1;
            tracing::trace!(row = self.rows_read, "reader.next");
        }
        Ok(self.on_row)
    }

    /// The engine produces a single result per cursor: closes the reader and
    /// returns `false`.
    pub fn next_result(&mut self) -> Result<bool> {
        self.close()?;
        Ok(false)
    }

    /// Close the reader and the engine cursor. Idempotent.
    pub fn close(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        self.on_row = false;
        tracing::debug!(rows = self.rows_read, "reader.close");
        if !self.rs.is_closed() {
            self.rs.close()?;
        }
        Ok(())
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Number of rows advanced over so far.
    pub fn rows_read(&self) -> u64 {
        self.rows_read
    }

    /// Whether at least one row has been produced.
    pub fn has_rows(&self) -> bool {
        self.rows_read > 0
    }

    fn ensure_open(&self) -> Result<()> {
        if self.closed {
            return Err(Error::ReaderClosed);
        }
        Ok(())
    }

    fn ensure_row(&self) -> Result<()> {
        self.ensure_open()?;
        if !self.on_row {
            return Err(Error::NoCurrentRow);
        }
        Ok(())
    }

    // ==================== Metadata ====================

    fn info(&self) -> Result<&Arc<ColumnInfo>> {
        self.ensure_open()?;
        if let Some(info) = self.columns.get() {
            return Ok(info);
        }
        let info = Arc::new(ColumnInfo::from_engine(&self.rs)?);
        tracing::debug!(columns = info.len(), "reader.metadata");
        Ok(self.columns.get_or_init(|| info))
    }

    /// All column descriptors.
    pub fn columns(&self) -> Result<&ColumnInfo> {
        Ok(self.info()?.as_ref())
    }

    pub fn field_count(&self) -> Result<usize> {
        Ok(self.info()?.len())
    }

    /// Display name of a column.
    pub fn get_name(&self, ordinal: usize) -> Result<&str> {
        Ok(self.info()?.get(ordinal)?.name.as_str())
    }

    /// Ordinal of a named column: exact match, then case-insensitive, then
    /// the engine's own lookup.
    pub fn get_ordinal(&self, name: &str) -> Result<usize> {
        let info = self.info()?;
        if let Some(ordinal) = info.find_by_name(name) {
            return Ok(ordinal);
        }
        let not_found = || Error::ColumnNotFound {
            name: name.to_string(),
        };
        let engine_col = self.rs.find_column(name).map_err(|e| {
            if e.code == ENGINE_ERROR_INVALID_COLUMN_NAME {
                not_found()
            } else {
                Error::from(e)
            }
        })?;
        engine_col
            .checked_sub(ENGINE_ORDINAL_BASE)
            .filter(|ordinal| *ordinal < info.len())
            .ok_or_else(not_found)
    }

    /// Category of a column.
    pub fn get_sql_type(&self, ordinal: usize) -> Result<SqlTypeCode> {
        Ok(self.info()?.get(ordinal)?.sql_type)
    }

    /// Category name of a column, e.g. `TIMESTAMP WITH TIME ZONE`.
    pub fn get_data_type_name(&self, ordinal: usize) -> Result<&'static str> {
        Ok(self.get_sql_type(ordinal)?.name())
    }

    /// Representation [`get_value`](Self::get_value) produces for a column.
    pub fn get_field_type(&self, ordinal: usize) -> Result<Representation> {
        let column = self.info()?.get(ordinal)?;
        column.field_type().ok_or_else(|| unmapped(column))
    }

    // ==================== Untyped access ====================

    /// Value of a column in its canonical representation, or
    /// [`TypedValue::Null`].
    pub fn get_value(&mut self, ordinal: usize) -> Result<TypedValue> {
        self.ensure_row()?;
        let info = Arc::clone(self.info()?);
        let column = info.get(ordinal)?;
        let read = native_reader(column.sql_type).ok_or_else(|| unmapped(column))?;
        let value = read(&mut self.rs, engine_column(ordinal))?;
        if self.rs.was_null()? {
            return Ok(TypedValue::Null);
        }
        Ok(match value {
            TypedValue::Float32(v) => TypedValue::Float64(f64::from(v)),
            other => other,
        })
    }

    /// Fill `values` with the current row. Returns the number of slots
    /// written: the smaller of the slice length and the column count.
    pub fn get_values(&mut self, values: &mut [TypedValue]) -> Result<usize> {
        let count = values.len().min(self.field_count()?);
        for (ordinal, slot) in values.iter_mut().enumerate().take(count) {
            *slot = self.get_value(ordinal)?;
        }
        Ok(count)
    }

    /// Whether the cell is NULL.
    ///
    /// Streamed categories are checked by opening a stream rather than
    /// materializing the value.
    pub fn is_db_null(&mut self, ordinal: usize) -> Result<bool> {
        self.ensure_row()?;
        let sql_type = self.info()?.get(ordinal)?.sql_type;
        let col = engine_column(ordinal);
        if sql_type.is_byte_streamed() {
            let stream = self.rs.get_binary_stream(col)?;
            let null = self.rs.was_null()?;
            if let Some(mut s) = stream {
                s.close()?;
                return Ok(null);
            }
            return Ok(true);
        }
        if sql_type.is_char_streamed() {
            let stream = self.rs.get_character_stream(col)?;
            let null = self.rs.was_null()?;
            if let Some(mut s) = stream {
                s.close()?;
                return Ok(null);
            }
            return Ok(true);
        }
        match native_reader(sql_type) {
            Some(read) => {
                read(&mut self.rs, col)?;
            }
            None => {
                self.rs.get_object(col)?;
            }
        }
        Ok(self.rs.was_null()?)
    }

    // ==================== Strict accessors ====================

    /// Check the requested representation, fetch, and reject NULL.
    fn fetch_strict(
        &mut self,
        ordinal: usize,
        requested: Representation,
    ) -> Result<(SqlTypeCode, TypedValue)> {
        self.ensure_row()?;
        let info = Arc::clone(self.info()?);
        let column = info.get(ordinal)?;
        if let Err(e) = check_representation(column.sql_type, requested) {
            tracing::debug!(ordinal, sql_type = %column.sql_type, %requested, "reader.reject");
            return Err(e);
        }
        let read: ReadFn = if requested == Representation::Text {
            read_text
        } else {
            native_reader(column.sql_type).ok_or_else(|| unmapped(column))?
        };
        let value = read(&mut self.rs, engine_column(ordinal))?;
        if self.rs.was_null()? {
            return Err(Error::NullValue {
                column: column.name.clone(),
            });
        }
        Ok((column.sql_type, value))
    }

    fn strict<T>(
        &mut self,
        ordinal: usize,
        requested: Representation,
        convert: impl FnOnce(TypedValue) -> Option<T>,
    ) -> Result<T> {
        let (declared, value) = self.fetch_strict(ordinal, requested)?;
        convert(value).ok_or_else(|| Error::type_mismatch(declared, requested))
    }

    /// BOOLEAN, BIT or an integer column; nonzero integers are true.
    pub fn get_bool(&mut self, ordinal: usize) -> Result<bool> {
        self.strict(ordinal, Representation::Bool, |v| v.to_bool())
    }

    pub fn get_i8(&mut self, ordinal: usize) -> Result<i8> {
        let (declared, value) = self.fetch_strict(ordinal, Representation::Int8)?;
        value
            .to_i8()?
            .ok_or_else(|| Error::type_mismatch(declared, Representation::Int8))
    }

    pub fn get_i16(&mut self, ordinal: usize) -> Result<i16> {
        let (declared, value) = self.fetch_strict(ordinal, Representation::Int16)?;
        value
            .to_i16()?
            .ok_or_else(|| Error::type_mismatch(declared, Representation::Int16))
    }

    pub fn get_i32(&mut self, ordinal: usize) -> Result<i32> {
        let (declared, value) = self.fetch_strict(ordinal, Representation::Int32)?;
        value
            .to_i32()?
            .ok_or_else(|| Error::type_mismatch(declared, Representation::Int32))
    }

    /// Any integer column, widened.
    pub fn get_i64(&mut self, ordinal: usize) -> Result<i64> {
        self.strict(ordinal, Representation::Int64, |v| v.to_i64())
    }

    pub fn get_f32(&mut self, ordinal: usize) -> Result<f32> {
        self.strict(ordinal, Representation::Float32, |v| match v {
            TypedValue::Float32(f) => Some(f),
            TypedValue::Int8(i) => Some(f32::from(i)),
            TypedValue::Int16(i) => Some(f32::from(i)),
            _ => None,
        })
    }

    pub fn get_f64(&mut self, ordinal: usize) -> Result<f64> {
        self.strict(ordinal, Representation::Float64, |v| v.to_f64())
    }

    /// Fixed decimal. Engine decimals beyond 96 bits or scale 28 raise
    /// `Error::Overflow`.
    pub fn get_decimal(&mut self, ordinal: usize) -> Result<Decimal> {
        self.strict(ordinal, Representation::Decimal, |v| match v {
            TypedValue::Decimal(d) => Some(d),
            other => other.to_i64().map(Decimal::from),
        })
    }

    /// Text rendering of the value, as produced by the engine.
    pub fn get_string(&mut self, ordinal: usize) -> Result<String> {
        self.strict(ordinal, Representation::Text, |v| match v {
            TypedValue::Text(s) => Some(s),
            _ => None,
        })
    }

    /// Single-character text value.
    pub fn get_char(&mut self, ordinal: usize) -> Result<char> {
        let (declared, value) = self.fetch_strict(ordinal, Representation::Char)?;
        let text = match value {
            TypedValue::Text(s) => s,
            _ => return Err(Error::type_mismatch(declared, Representation::Char)),
        };
        let mut chars = text.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(c),
            _ => Err(Error::overflow(format!(
                "value of {} characters does not fit in a char",
                text.chars().count()
            ))),
        }
    }

    pub fn get_date(&mut self, ordinal: usize) -> Result<NaiveDate> {
        self.strict(ordinal, Representation::Date, |v| match v {
            TypedValue::Date(d) => Some(d),
            TypedValue::Timestamp(ts) => Some(ts.date()),
            _ => None,
        })
    }

    /// Time of day. An explicit offset on the value is dropped.
    pub fn get_time(&mut self, ordinal: usize) -> Result<NaiveTime> {
        self.strict(ordinal, Representation::Time, |v| match v {
            TypedValue::Time(t) => Some(t),
            TypedValue::Timestamp(ts) => Some(ts.time()),
            TypedValue::TimeWithOffset(ot) => {
                tracing::debug!(ordinal, offset = %ot.offset, "reader.offset_dropped");
                Some(ot.time)
            }
            _ => None,
        })
    }

    /// Local date and time. An explicit offset on the value is dropped.
    pub fn get_date_time(&mut self, ordinal: usize) -> Result<NaiveDateTime> {
        self.strict(ordinal, Representation::Timestamp, |v| match v {
            TypedValue::Timestamp(ts) => Some(ts),
            TypedValue::Date(d) => Some(d.and_time(NaiveTime::MIN)),
            TypedValue::TimestampWithOffset(dt) => {
                tracing::debug!(ordinal, offset = %dt.offset(), "reader.offset_dropped");
                Some(dt.naive_local())
            }
            _ => None,
        })
    }

    /// Time of day with offset. Zoneless values take the configured zone.
    pub fn get_time_offset(&mut self, ordinal: usize) -> Result<OffsetTime> {
        let zone = self.config.zone_policy;
        self.strict(ordinal, Representation::TimeWithOffset, |v| match v {
            TypedValue::TimeWithOffset(ot) => Some(ot),
            TypedValue::Time(t) => Some(zone.attach_time(t)),
            _ => None,
        })
    }

    /// Timestamp with offset. Zoneless values take the configured zone.
    pub fn get_date_time_offset(&mut self, ordinal: usize) -> Result<DateTime<FixedOffset>> {
        let zone = self.config.zone_policy;
        let (declared, value) = self.fetch_strict(ordinal, Representation::TimestampWithOffset)?;
        match value {
            TypedValue::TimestampWithOffset(dt) => Ok(dt),
            TypedValue::Timestamp(ts) => zone.attach(ts),
            TypedValue::Date(d) => zone.attach(d.and_time(NaiveTime::MIN)),
            _ => Err(Error::type_mismatch(
                declared,
                Representation::TimestampWithOffset,
            )),
        }
    }

    /// GUID parsed from text, or taken from a 16-byte binary or object value.
    pub fn get_guid(&mut self, ordinal: usize) -> Result<Uuid> {
        self.strict(ordinal, Representation::Guid, |v| match v {
            TypedValue::Text(s) => Uuid::parse_str(s.trim()).ok(),
            TypedValue::Bytes(b) | TypedValue::Object(b) => Uuid::from_slice(&b).ok(),
            _ => None,
        })
    }

    pub fn get_xml(&mut self, ordinal: usize) -> Result<String> {
        self.strict(ordinal, Representation::Xml, |v| match v {
            TypedValue::Xml(s) => Some(s),
            _ => None,
        })
    }

    pub fn get_array(&mut self, ordinal: usize) -> Result<Vec<TypedValue>> {
        self.strict(ordinal, Representation::Array, |v| match v {
            TypedValue::Array(items) => Some(items),
            _ => None,
        })
    }

    /// Whole binary value.
    pub fn get_byte_array(&mut self, ordinal: usize) -> Result<Bytes> {
        self.strict(ordinal, Representation::Bytes, |v| match v {
            TypedValue::Bytes(b) => Some(b),
            _ => None,
        })
    }

    /// Serialized engine object.
    pub fn get_object(&mut self, ordinal: usize) -> Result<Bytes> {
        self.strict(ordinal, Representation::Object, |v| match v {
            TypedValue::Object(b) => Some(b),
            _ => None,
        })
    }

    // ==================== Range reads ====================

    /// Fresh byte source over the value, or `None` for NULL.
    fn open_bytes(&mut self, ordinal: usize) -> Result<Option<NativeByteStream>> {
        self.ensure_row()?;
        let sql_type = self.info()?.get(ordinal)?.sql_type;
        check_representation(sql_type, Representation::Bytes)?;
        byte_source(&mut self.rs, sql_type, engine_column(ordinal))
    }

    /// Fresh character source over the value, or `None` for NULL.
    fn open_chars(&mut self, ordinal: usize) -> Result<Option<NativeCharStream>> {
        self.ensure_row()?;
        let sql_type = self.info()?.get(ordinal)?.sql_type;
        check_representation(sql_type, Representation::Text)?;
        char_source(&mut self.rs, sql_type, engine_column(ordinal))
    }

    /// Copy up to `length` bytes of the value, starting at `data_offset`,
    /// into `buffer[buffer_offset..]`.
    ///
    /// Every call opens a fresh stream at the start of the value. Returns the
    /// number of bytes copied: 0 for NULL or an offset past the end, short at
    /// the end of the value. `length` is clamped to the room left in
    /// `buffer`.
    pub fn get_bytes(
        &mut self,
        ordinal: usize,
        data_offset: u64,
        buffer: &mut [u8],
        buffer_offset: usize,
        length: usize,
    ) -> Result<usize> {
        let window = window(buffer.len(), buffer_offset, length)?;
        let Some(source) = self.open_bytes(ordinal)? else {
            return Ok(0);
        };
        copy_range(StreamBridge::one_shot(source), data_offset, &mut buffer[window])
    }

    /// Character counterpart of [`get_bytes`](Self::get_bytes).
    pub fn get_chars(
        &mut self,
        ordinal: usize,
        data_offset: u64,
        buffer: &mut [char],
        buffer_offset: usize,
        length: usize,
    ) -> Result<usize> {
        let window = window(buffer.len(), buffer_offset, length)?;
        let Some(source) = self.open_chars(ordinal)? else {
            return Ok(0);
        };
        copy_range(StreamBridge::one_shot(source), data_offset, &mut buffer[window])
    }

    /// Copy up to `length` bytes of the value, starting at `data_offset`,
    /// into `out` through a pooled buffer. Returns the bytes written.
    pub fn copy_bytes<W: Write>(
        &mut self,
        ordinal: usize,
        data_offset: u64,
        out: &mut W,
        length: u64,
    ) -> Result<u64> {
        let Some(source) = self.open_bytes(ordinal)? else {
            return Ok(0);
        };
        let mut stream = StreamBridge::one_shot(source);
        if stream.skip_fully(data_offset)? < data_offset {
            return Ok(0);
        }
        let mut chunk = BYTE_POOL.rent(self.config.buffer_size);
        let mut copied = 0u64;
        while copied < length {
            let want = usize::try_from(length - copied)
                .unwrap_or(usize::MAX)
                .min(chunk.len());
            let n = stream.read(&mut chunk[..want])?;
            if n == 0 {
                break;
            }
            out.write_all(&chunk[..n])?;
            copied += n as u64;
        }
        tracing::trace!(ordinal, units = copied, "reader.copy_bytes");
        Ok(copied)
    }

    /// Append up to `length` characters of the value, starting at
    /// `data_offset`, to `out`. Returns the characters appended.
    pub fn copy_chars(
        &mut self,
        ordinal: usize,
        data_offset: u64,
        out: &mut String,
        length: u64,
    ) -> Result<u64> {
        let Some(source) = self.open_chars(ordinal)? else {
            return Ok(0);
        };
        let mut stream = StreamBridge::one_shot(source);
        if stream.skip_fully(data_offset)? < data_offset {
            return Ok(0);
        }
        let mut chunk = CHAR_POOL.rent(self.config.buffer_size);
        let mut copied = 0u64;
        while copied < length {
            let want = usize::try_from(length - copied)
                .unwrap_or(usize::MAX)
                .min(chunk.len());
            let n = stream.read(&mut chunk[..want])?;
            if n == 0 {
                break;
            }
            out.extend(&chunk[..n]);
            copied += n as u64;
        }
        Ok(copied)
    }

    // ==================== Streams ====================

    /// Caller-owned byte stream over the value.
    ///
    /// Non-streamed binary categories are materialized and served from
    /// memory.
    pub fn get_stream(&mut self, ordinal: usize) -> Result<ByteStream<'_>> {
        let source = self.open_bytes(ordinal)?;
        let column = self.info()?.get(ordinal)?;
        let source = source.ok_or_else(|| null_value(column))?;
        tracing::debug!(ordinal, sql_type = %column.sql_type, "reader.stream");
        Ok(ByteStream::new(source))
    }

    /// Caller-owned character reader over the value.
    ///
    /// Non-streamed categories are read as text and served from memory.
    pub fn get_text_reader(&mut self, ordinal: usize) -> Result<TextReader<'_>> {
        let source = self.open_chars(ordinal)?;
        let column = self.info()?.get(ordinal)?;
        let source = source.ok_or_else(|| null_value(column))?;
        tracing::debug!(ordinal, sql_type = %column.sql_type, "reader.text_reader");
        TextReader::new(source, self.config.pushback_capacity)
    }

    /// Lazy handle over a binary value. The stream opens on first use.
    pub fn get_blob(&mut self, ordinal: usize) -> Result<Blob<'_>> {
        self.ensure_row()?;
        let column = self.info()?.get(ordinal)?;
        check_representation(column.sql_type, Representation::Bytes)?;
        let (sql_type, name) = (column.sql_type, column.name.clone());
        let chunk = self.config.buffer_size;
        Ok(Blob::new(
            &mut self.rs,
            engine_column(ordinal),
            sql_type,
            name,
            chunk,
        ))
    }

    /// Lazy handle over a character value. The reader opens on first use.
    pub fn get_clob(&mut self, ordinal: usize) -> Result<Clob<'_>> {
        self.ensure_row()?;
        let column = self.info()?.get(ordinal)?;
        check_representation(column.sql_type, Representation::Text)?;
        let (sql_type, name) = (column.sql_type, column.name.clone());
        let chunk = self.config.buffer_size;
        let pushback = self.config.pushback_capacity;
        Ok(Clob::new(
            &mut self.rs,
            engine_column(ordinal),
            sql_type,
            name,
            chunk,
            pushback,
        ))
    }
}

impl<R: NativeResultSet> Drop for DataReader<R> {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            tracing::debug!(error = %e, "reader.close failed on drop");
        }
    }
}

fn engine_column(ordinal: usize) -> usize {
    ordinal + ENGINE_ORDINAL_BASE
}

fn unmapped(column: &ColumnDescriptor) -> Error {
    Error::unsupported(format!(
        "no value mapping for column {} of type {}",
        column.name, column.sql_type
    ))
}

fn null_value(column: &ColumnDescriptor) -> Error {
    Error::NullValue {
        column: column.name.clone(),
    }
}

/// Destination range of a bulk read, with `length` clamped to the room left.
fn window(
    buffer_len: usize,
    buffer_offset: usize,
    length: usize,
) -> Result<std::ops::Range<usize>> {
    if buffer_offset > buffer_len {
        return Err(Error::invalid_argument(format!(
            "buffer offset {} beyond buffer of length {}",
            buffer_offset, buffer_len
        )));
    }
    let end = buffer_offset + length.min(buffer_len - buffer_offset);
    Ok(buffer_offset..end)
}

fn copy_range<U: Copy + Default>(
    mut stream: StreamBridge<U>,
    data_offset: u64,
    dest: &mut [U],
) -> Result<usize> {
    if stream.skip_fully(data_offset)? < data_offset {
        return Ok(0);
    }
    stream.read_fully(dest)
}
