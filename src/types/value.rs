//! Typed values produced by column reads.

use std::fmt;

use bytes::Bytes;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::error::{Error, Result};

use super::representation::Representation;

/// Time of day with an explicit UTC offset (TIME WITH TIME ZONE).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OffsetTime {
    pub time: NaiveTime,
    pub offset: FixedOffset,
}

impl OffsetTime {
    pub fn new(time: NaiveTime, offset: FixedOffset) -> Self {
        Self { time, offset }
    }
}

impl fmt::Display for OffsetTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.time, self.offset)
    }
}

/// A single column value.
///
/// Produced fresh on every read and never cached by the reader.
#[derive(Debug, Clone, PartialEq)]
pub enum TypedValue {
    /// NULL value.
    Null,
    Bool(bool),
    Int8(i8),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    Float32(f32),
    Float64(f64),
    /// Fixed 96-bit decimal with scale in [0, 28].
    Decimal(Decimal),
    Text(String),
    Bytes(Bytes),
    Date(NaiveDate),
    Time(NaiveTime),
    Timestamp(NaiveDateTime),
    TimeWithOffset(OffsetTime),
    TimestampWithOffset(DateTime<FixedOffset>),
    Guid(Uuid),
    /// XML document text.
    Xml(String),
    Array(Vec<TypedValue>),
    /// Serialized engine object.
    Object(Bytes),
}

impl TypedValue {
    /// Check if the value is NULL.
    pub fn is_null(&self) -> bool {
        matches!(self, TypedValue::Null)
    }

    /// Representation tag of this value. `None` for NULL.
    pub fn representation(&self) -> Option<Representation> {
        let rep = match self {
            TypedValue::Null => return None,
            TypedValue::Bool(_) => Representation::Bool,
            TypedValue::Int8(_) => Representation::Int8,
            TypedValue::Int16(_) => Representation::Int16,
            TypedValue::Int32(_) => Representation::Int32,
            TypedValue::Int64(_) => Representation::Int64,
            TypedValue::Float32(_) => Representation::Float32,
            TypedValue::Float64(_) => Representation::Float64,
            TypedValue::Decimal(_) => Representation::Decimal,
            TypedValue::Text(_) => Representation::Text,
            TypedValue::Bytes(_) => Representation::Bytes,
            TypedValue::Date(_) => Representation::Date,
            TypedValue::Time(_) => Representation::Time,
            TypedValue::Timestamp(_) => Representation::Timestamp,
            TypedValue::TimeWithOffset(_) => Representation::TimeWithOffset,
            TypedValue::TimestampWithOffset(_) => Representation::TimestampWithOffset,
            TypedValue::Guid(_) => Representation::Guid,
            TypedValue::Xml(_) => Representation::Xml,
            TypedValue::Array(_) => Representation::Array,
            TypedValue::Object(_) => Representation::Object,
        };
        Some(rep)
    }

    /// Try to get the value as a string reference.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            TypedValue::Text(s) | TypedValue::Xml(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get the value as raw bytes.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            TypedValue::Bytes(b) | TypedValue::Object(b) => Some(b),
            _ => None,
        }
    }

    /// Widen an integer value to i64. `None` for non-integers.
    pub fn to_i64(&self) -> Option<i64> {
        match *self {
            TypedValue::Int8(v) => Some(v.into()),
            TypedValue::Int16(v) => Some(v.into()),
            TypedValue::Int32(v) => Some(v.into()),
            TypedValue::Int64(v) => Some(v),
            _ => None,
        }
    }

    /// Narrow an integer value to i32, raising Overflow when out of range.
    pub fn to_i32(&self) -> Result<Option<i32>> {
        self.narrow("INTEGER")
    }

    /// Narrow an integer value to i16, raising Overflow when out of range.
    pub fn to_i16(&self) -> Result<Option<i16>> {
        self.narrow("SMALLINT")
    }

    /// Narrow an integer value to i8, raising Overflow when out of range.
    pub fn to_i8(&self) -> Result<Option<i8>> {
        self.narrow("TINYINT")
    }

    fn narrow<T: TryFrom<i64>>(&self, target: &str) -> Result<Option<T>> {
        match self.to_i64() {
            Some(v) => T::try_from(v)
                .map(Some)
                .map_err(|_| Error::overflow(format!("{} does not fit in {}", v, target))),
            None => Ok(None),
        }
    }

    /// Convert a numeric value to f64. `None` for non-numerics.
    pub fn to_f64(&self) -> Option<f64> {
        match *self {
            TypedValue::Float32(v) => Some(v.into()),
            TypedValue::Float64(v) => Some(v),
            TypedValue::Int8(v) => Some(v.into()),
            TypedValue::Int16(v) => Some(v.into()),
            TypedValue::Int32(v) => Some(v.into()),
            _ => None,
        }
    }

    /// Truth value of a boolean or integer value (nonzero is true).
    pub fn to_bool(&self) -> Option<bool> {
        match self {
            TypedValue::Bool(b) => Some(*b),
            other => other.to_i64().map(|v| v != 0),
        }
    }
}

impl fmt::Display for TypedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypedValue::Null => write!(f, "NULL"),
            TypedValue::Bool(b) => write!(f, "{}", b),
            TypedValue::Int8(v) => write!(f, "{}", v),
            TypedValue::Int16(v) => write!(f, "{}", v),
            TypedValue::Int32(v) => write!(f, "{}", v),
            TypedValue::Int64(v) => write!(f, "{}", v),
            TypedValue::Float32(v) => write!(f, "{}", v),
            TypedValue::Float64(v) => write!(f, "{}", v),
            TypedValue::Decimal(d) => write!(f, "{}", d),
            TypedValue::Text(s) | TypedValue::Xml(s) => write!(f, "{}", s),
            TypedValue::Bytes(b) => write!(f, "<BINARY: {} bytes>", b.len()),
            TypedValue::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            TypedValue::Time(t) => write!(f, "{}", t.format("%H:%M:%S%.f")),
            TypedValue::Timestamp(ts) => write!(f, "{}", ts.format("%Y-%m-%d %H:%M:%S%.f")),
            TypedValue::TimeWithOffset(t) => write!(f, "{}", t),
            TypedValue::TimestampWithOffset(ts) => write!(f, "{}", ts.to_rfc3339()),
            TypedValue::Guid(u) => write!(f, "{}", u),
            TypedValue::Array(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            TypedValue::Object(b) => write!(f, "<OBJECT: {} bytes>", b.len()),
        }
    }
}
