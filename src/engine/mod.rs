//! Interfaces consumed from the execution engine.
//!
//! The engine is synchronous and blocking. Column and parameter ordinals on
//! this side are 1-based ([`ENGINE_ORDINAL_BASE`]); everything the crate
//! exposes is 0-based.
//!
//! Primitive fetches (`get_int`, `get_double`, ...) return a placeholder when
//! the cell is NULL and callers must consult [`NativeResultSet::was_null`]
//! afterwards. Object fetches return `None` for NULL but the reader still
//! performs the same fetch-then-check sequence for them.

pub mod constants;

use std::io::Read;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};
use thiserror::Error;
use uuid::Uuid;

use crate::decode::NativeDecimal;
use crate::types::{OffsetTime, TypedValue};

pub use constants::ENGINE_ORDINAL_BASE;

/// Result type alias for engine calls.
pub type NativeResult<T> = std::result::Result<T, NativeError>;

/// Error raised by the engine.
///
/// Never escapes the crate: every public entry point converts it into
/// [`crate::Error::Native`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message} [{code}]")]
pub struct NativeError {
    /// Engine error code.
    pub code: i32,
    /// Engine error message.
    pub message: String,
}

impl NativeError {
    /// Create a new engine error.
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

/// One-shot, pull-style stream of units (`u8` or `char`).
///
/// Mirrors the engine's stream primitive: it has no notion of position and
/// can only be rewound through mark/reset when [`mark_supported`] is true.
///
/// [`mark_supported`]: NativeStream::mark_supported
pub trait NativeStream {
    /// Unit carried by the stream.
    type Unit: Copy + Default;

    /// Read a single unit. `None` at end of data.
    fn read_unit(&mut self) -> NativeResult<Option<Self::Unit>>;

    /// Read up to `buf.len()` units. `None` at end of data; `Some(0)` is
    /// possible and means nothing was transferred.
    fn read(&mut self, buf: &mut [Self::Unit]) -> NativeResult<Option<usize>>;

    /// Skip up to `n` units, returning how many were actually skipped.
    /// May skip fewer than requested even before end of data.
    fn skip(&mut self, n: u64) -> NativeResult<u64>;

    /// Whether mark/reset are available.
    fn mark_supported(&self) -> bool;

    /// Mark the current position.
    fn mark(&mut self, read_limit: usize);

    /// Rewind to the last mark.
    fn reset(&mut self) -> NativeResult<()>;

    /// Release the stream.
    fn close(&mut self) -> NativeResult<()>;
}

/// Engine byte stream.
pub type NativeByteStream = Box<dyn NativeStream<Unit = u8>>;

/// Engine character stream.
pub type NativeCharStream = Box<dyn NativeStream<Unit = char>>;

/// Engine result cursor (one row at a time).
pub trait NativeResultSet {
    /// Number of columns.
    fn column_count(&self) -> NativeResult<usize>;

    /// Engine type code of a column.
    fn column_type(&self, column: usize) -> NativeResult<i32>;

    /// Display name of a column.
    fn column_name(&self, column: usize) -> NativeResult<String>;

    /// Find a column by name. Errors when no such column exists.
    fn find_column(&self, name: &str) -> NativeResult<usize>;

    /// Advance to the next row. `false` when exhausted.
    fn next(&mut self) -> NativeResult<bool>;

    /// Whether the last fetch observed a NULL.
    fn was_null(&self) -> NativeResult<bool>;

    fn get_boolean(&mut self, column: usize) -> NativeResult<bool>;
    fn get_byte(&mut self, column: usize) -> NativeResult<i8>;
    fn get_short(&mut self, column: usize) -> NativeResult<i16>;
    fn get_int(&mut self, column: usize) -> NativeResult<i32>;
    fn get_long(&mut self, column: usize) -> NativeResult<i64>;
    fn get_float(&mut self, column: usize) -> NativeResult<f32>;
    fn get_double(&mut self, column: usize) -> NativeResult<f64>;
    fn get_decimal(&mut self, column: usize) -> NativeResult<Option<NativeDecimal>>;
    fn get_string(&mut self, column: usize) -> NativeResult<Option<String>>;
    fn get_bytes(&mut self, column: usize) -> NativeResult<Option<Vec<u8>>>;
    fn get_date(&mut self, column: usize) -> NativeResult<Option<NaiveDate>>;
    fn get_time(&mut self, column: usize) -> NativeResult<Option<NaiveTime>>;
    fn get_timestamp(&mut self, column: usize) -> NativeResult<Option<NaiveDateTime>>;
    fn get_time_tz(&mut self, column: usize) -> NativeResult<Option<OffsetTime>>;
    fn get_timestamp_tz(&mut self, column: usize)
        -> NativeResult<Option<DateTime<FixedOffset>>>;
    fn get_array(&mut self, column: usize) -> NativeResult<Option<Vec<TypedValue>>>;

    /// Serialized form of an opaque engine object.
    fn get_object(&mut self, column: usize) -> NativeResult<Option<Vec<u8>>>;

    fn get_xml(&mut self, column: usize) -> NativeResult<Option<String>>;

    /// Fresh byte stream over the column value, positioned at its start.
    fn get_binary_stream(&mut self, column: usize) -> NativeResult<Option<NativeByteStream>>;

    /// Fresh character stream over the column value, positioned at its start.
    fn get_character_stream(&mut self, column: usize) -> NativeResult<Option<NativeCharStream>>;

    fn is_closed(&self) -> bool;

    fn close(&mut self) -> NativeResult<()>;
}

/// Engine prepared statement (parameter side).
pub trait NativeStatement {
    /// Bind NULL with the given engine type code.
    fn set_null(&mut self, index: usize, engine_type: i32) -> NativeResult<()>;

    fn set_boolean(&mut self, index: usize, value: bool) -> NativeResult<()>;
    fn set_byte(&mut self, index: usize, value: i8) -> NativeResult<()>;
    fn set_short(&mut self, index: usize, value: i16) -> NativeResult<()>;
    fn set_int(&mut self, index: usize, value: i32) -> NativeResult<()>;
    fn set_long(&mut self, index: usize, value: i64) -> NativeResult<()>;
    fn set_float(&mut self, index: usize, value: f32) -> NativeResult<()>;
    fn set_double(&mut self, index: usize, value: f64) -> NativeResult<()>;
    fn set_decimal(&mut self, index: usize, value: &NativeDecimal) -> NativeResult<()>;
    fn set_string(&mut self, index: usize, value: &str) -> NativeResult<()>;
    fn set_bytes(&mut self, index: usize, value: &[u8]) -> NativeResult<()>;
    fn set_date(&mut self, index: usize, value: NaiveDate) -> NativeResult<()>;
    fn set_time(&mut self, index: usize, value: NaiveTime) -> NativeResult<()>;
    fn set_timestamp(&mut self, index: usize, value: NaiveDateTime) -> NativeResult<()>;
    fn set_time_tz(&mut self, index: usize, value: OffsetTime) -> NativeResult<()>;
    fn set_timestamp_tz(&mut self, index: usize, value: DateTime<FixedOffset>)
        -> NativeResult<()>;
    fn set_uuid(&mut self, index: usize, value: Uuid) -> NativeResult<()>;
    fn set_xml(&mut self, index: usize, value: &str) -> NativeResult<()>;
    fn set_array(&mut self, index: usize, value: &[TypedValue]) -> NativeResult<()>;

    /// Bind a byte stream; `length` is the number of bytes when known.
    fn set_binary_stream(
        &mut self,
        index: usize,
        value: Box<dyn Read>,
        length: Option<u64>,
    ) -> NativeResult<()>;

    /// Bind a character stream given as UTF-8 bytes; `length` is the number
    /// of characters when known.
    fn set_character_stream(
        &mut self,
        index: usize,
        value: Box<dyn Read>,
        length: Option<u64>,
    ) -> NativeResult<()>;

    /// Whether output parameters can be registered on this statement.
    fn supports_output_parameters(&self) -> bool {
        false
    }

    /// Register an output parameter. `scale` is only given for decimals.
    fn register_output_parameter(
        &mut self,
        index: usize,
        engine_type: i32,
        scale: Option<u32>,
    ) -> NativeResult<()>;
}
