//! Parameter descriptions: abstract type, runtime value and direction.

use std::fmt;
use std::io::Read;

use bytes::Bytes;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::types::{OffsetTime, Representation, SqlTypeCode, TypedValue};

/// Abstract parameter type chosen by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DbType {
    Boolean,
    /// Signed 8-bit integer.
    Byte,
    Int16,
    Int32,
    Int64,
    /// Unsigned types bind as the next larger signed engine type.
    UInt8,
    UInt16,
    UInt32,
    UInt64,
    Single,
    Double,
    Decimal,
    String,
    /// Fixed-length string.
    Char,
    Clob,
    Binary,
    Blob,
    Date,
    Time,
    DateTime,
    DateTimeOffset,
    TimeOffset,
    Guid,
    Xml,
    Array,
    /// Type inferred from the value at bind time.
    Object,
}

impl DbType {
    /// Engine category the type binds as.
    pub fn sql_type(&self) -> SqlTypeCode {
        match self {
            DbType::Boolean => SqlTypeCode::Boolean,
            DbType::Byte => SqlTypeCode::TinyInt,
            DbType::Int16 | DbType::UInt8 => SqlTypeCode::SmallInt,
            DbType::Int32 | DbType::UInt16 => SqlTypeCode::Integer,
            DbType::Int64 | DbType::UInt32 | DbType::UInt64 => SqlTypeCode::BigInt,
            DbType::Single => SqlTypeCode::Real,
            DbType::Double => SqlTypeCode::Double,
            DbType::Decimal => SqlTypeCode::Decimal,
            DbType::String => SqlTypeCode::VarChar,
            DbType::Char => SqlTypeCode::Char,
            DbType::Clob => SqlTypeCode::Clob,
            DbType::Binary => SqlTypeCode::VarBinary,
            DbType::Blob => SqlTypeCode::Blob,
            DbType::Date => SqlTypeCode::Date,
            DbType::Time => SqlTypeCode::Time,
            DbType::DateTime => SqlTypeCode::Timestamp,
            DbType::DateTimeOffset => SqlTypeCode::TimestampWithTimeZone,
            DbType::TimeOffset => SqlTypeCode::TimeWithTimeZone,
            DbType::Guid => SqlTypeCode::Other,
            DbType::Xml => SqlTypeCode::SqlXml,
            DbType::Array => SqlTypeCode::Array,
            DbType::Object => SqlTypeCode::JavaObject,
        }
    }

    /// Engine type code used for NULL binds and output registration.
    pub fn engine_code(&self) -> i32 {
        self.sql_type().engine_code()
    }
}

/// Runtime value of a parameter.
pub enum ParamValue {
    Null,
    Bool(bool),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    F32(f32),
    F64(f64),
    Decimal(Decimal),
    Text(String),
    Char(char),
    Bytes(Bytes),
    /// Caller-owned reader, handed to the engine as is. `length` in units
    /// (bytes for binary, characters for text) when known.
    Stream {
        reader: Box<dyn Read>,
        length: Option<u64>,
    },
    Date(NaiveDate),
    Time(NaiveTime),
    Timestamp(NaiveDateTime),
    TimeOffset(OffsetTime),
    TimestampOffset(DateTime<FixedOffset>),
    Guid(Uuid),
    Xml(String),
    Array(Vec<TypedValue>),
}

impl ParamValue {
    /// Stream value over a reader.
    pub fn stream(reader: impl Read + 'static, length: Option<u64>) -> Self {
        ParamValue::Stream {
            reader: Box::new(reader),
            length,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, ParamValue::Null)
    }

    /// Representation of the value's shape. `None` for NULL.
    pub fn representation(&self) -> Option<Representation> {
        let rep = match self {
            ParamValue::Null => return None,
            ParamValue::Bool(_) => Representation::Bool,
            ParamValue::I8(_) => Representation::Int8,
            ParamValue::I16(_) | ParamValue::U8(_) => Representation::Int16,
            ParamValue::I32(_) | ParamValue::U16(_) => Representation::Int32,
            ParamValue::I64(_) | ParamValue::U32(_) | ParamValue::U64(_) => Representation::Int64,
            ParamValue::F32(_) => Representation::Float32,
            ParamValue::F64(_) => Representation::Float64,
            ParamValue::Decimal(_) => Representation::Decimal,
            ParamValue::Text(_) => Representation::Text,
            ParamValue::Char(_) => Representation::Char,
            ParamValue::Bytes(_) | ParamValue::Stream { .. } => Representation::Bytes,
            ParamValue::Date(_) => Representation::Date,
            ParamValue::Time(_) => Representation::Time,
            ParamValue::Timestamp(_) => Representation::Timestamp,
            ParamValue::TimeOffset(_) => Representation::TimeWithOffset,
            ParamValue::TimestampOffset(_) => Representation::TimestampWithOffset,
            ParamValue::Guid(_) => Representation::Guid,
            ParamValue::Xml(_) => Representation::Xml,
            ParamValue::Array(_) => Representation::Array,
        };
        Some(rep)
    }

    /// Natural parameter type of the value's shape. `None` for NULL.
    pub fn infer_db_type(&self) -> Option<DbType> {
        let db_type = match self {
            ParamValue::Null => return None,
            ParamValue::Bool(_) => DbType::Boolean,
            ParamValue::I8(_) => DbType::Byte,
            ParamValue::I16(_) => DbType::Int16,
            ParamValue::I32(_) => DbType::Int32,
            ParamValue::I64(_) => DbType::Int64,
            ParamValue::U8(_) => DbType::UInt8,
            ParamValue::U16(_) => DbType::UInt16,
            ParamValue::U32(_) => DbType::UInt32,
            ParamValue::U64(_) => DbType::UInt64,
            ParamValue::F32(_) => DbType::Single,
            ParamValue::F64(_) => DbType::Double,
            ParamValue::Decimal(_) => DbType::Decimal,
            ParamValue::Text(_) => DbType::String,
            ParamValue::Char(_) => DbType::Char,
            ParamValue::Bytes(_) => DbType::Binary,
            ParamValue::Stream { .. } => DbType::Blob,
            ParamValue::Date(_) => DbType::Date,
            ParamValue::Time(_) => DbType::Time,
            ParamValue::Timestamp(_) => DbType::DateTime,
            ParamValue::TimeOffset(_) => DbType::TimeOffset,
            ParamValue::TimestampOffset(_) => DbType::DateTimeOffset,
            ParamValue::Guid(_) => DbType::Guid,
            ParamValue::Xml(_) => DbType::Xml,
            ParamValue::Array(_) => DbType::Array,
        };
        Some(db_type)
    }
}

impl fmt::Debug for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Null => write!(f, "Null"),
            ParamValue::Bool(v) => write!(f, "Bool({})", v),
            ParamValue::I8(v) => write!(f, "I8({})", v),
            ParamValue::I16(v) => write!(f, "I16({})", v),
            ParamValue::I32(v) => write!(f, "I32({})", v),
            ParamValue::I64(v) => write!(f, "I64({})", v),
            ParamValue::U8(v) => write!(f, "U8({})", v),
            ParamValue::U16(v) => write!(f, "U16({})", v),
            ParamValue::U32(v) => write!(f, "U32({})", v),
            ParamValue::U64(v) => write!(f, "U64({})", v),
            ParamValue::F32(v) => write!(f, "F32({})", v),
            ParamValue::F64(v) => write!(f, "F64({})", v),
            ParamValue::Decimal(v) => write!(f, "Decimal({})", v),
            ParamValue::Text(v) => write!(f, "Text({:?})", v),
            ParamValue::Char(v) => write!(f, "Char({:?})", v),
            ParamValue::Bytes(v) => write!(f, "Bytes(<{} bytes>)", v.len()),
            ParamValue::Stream { length, .. } => write!(f, "Stream(length: {:?})", length),
            ParamValue::Date(v) => write!(f, "Date({})", v),
            ParamValue::Time(v) => write!(f, "Time({})", v),
            ParamValue::Timestamp(v) => write!(f, "Timestamp({})", v),
            ParamValue::TimeOffset(v) => write!(f, "TimeOffset({})", v),
            ParamValue::TimestampOffset(v) => write!(f, "TimestampOffset({})", v),
            ParamValue::Guid(v) => write!(f, "Guid({})", v),
            ParamValue::Xml(v) => write!(f, "Xml({:?})", v),
            ParamValue::Array(v) => write!(f, "Array(<{} items>)", v.len()),
        }
    }
}

macro_rules! impl_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for ParamValue {
                fn from(v: $ty) -> Self {
                    ParamValue::$variant(v)
                }
            }
        )*
    };
}

impl_from! {
    bool => Bool,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    f32 => F32,
    f64 => F64,
    Decimal => Decimal,
    String => Text,
    char => Char,
    Bytes => Bytes,
    NaiveDate => Date,
    NaiveTime => Time,
    NaiveDateTime => Timestamp,
    OffsetTime => TimeOffset,
    DateTime<FixedOffset> => TimestampOffset,
    Uuid => Guid,
    Vec<TypedValue> => Array,
}

impl From<&str> for ParamValue {
    fn from(v: &str) -> Self {
        ParamValue::Text(v.to_string())
    }
}

impl From<Vec<u8>> for ParamValue {
    fn from(v: Vec<u8>) -> Self {
        ParamValue::Bytes(v.into())
    }
}

impl<T: Into<ParamValue>> From<Option<T>> for ParamValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(ParamValue::Null, Into::into)
    }
}

/// Data flow direction of a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Input,
    Output,
    InputOutput,
    ReturnValue,
}

impl Direction {
    /// Whether the engine must register the parameter as an output.
    pub fn is_output(&self) -> bool {
        !matches!(self, Direction::Input)
    }

    /// Whether a value is sent to the engine.
    pub fn is_input(&self) -> bool {
        matches!(self, Direction::Input | Direction::InputOutput)
    }
}

/// A statement parameter.
#[derive(Debug)]
pub struct Parameter {
    pub db_type: DbType,
    pub value: ParamValue,
    pub direction: Direction,
    /// Decimal scale for output registration.
    pub scale: Option<u32>,
}

impl Parameter {
    /// Input parameter.
    pub fn new(db_type: DbType, value: impl Into<ParamValue>) -> Self {
        Self {
            db_type,
            value: value.into(),
            direction: Direction::Input,
            scale: None,
        }
    }

    /// Input parameter bound as NULL of the given type.
    pub fn null(db_type: DbType) -> Self {
        Self::new(db_type, ParamValue::Null)
    }

    /// Output parameter with no input value.
    pub fn output(db_type: DbType) -> Self {
        Self::null(db_type).with_direction(Direction::Output)
    }

    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    pub fn with_scale(mut self, scale: u32) -> Self {
        self.scale = Some(scale);
        self
    }
}
