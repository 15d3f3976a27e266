//! Representations a column value may be read or bound as.
//!
//! Each [`SqlTypeCode`] carries a fixed set of allowed representations.
//! Integer families only widen; anything outside the set is a type
//! mismatch, and categories without any mapping are unsupported.

use std::fmt;

use crate::error::{Error, Result};

use super::sql_type::SqlTypeCode;

/// Target kind of a read or bind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Representation {
    Bool,
    Int8,
    Int16,
    Int32,
    Int64,
    Float32,
    Float64,
    Decimal,
    Text,
    Char,
    Bytes,
    Date,
    Time,
    Timestamp,
    TimeWithOffset,
    TimestampWithOffset,
    Guid,
    Xml,
    Array,
    Object,
}

impl fmt::Display for Representation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

use Representation::*;

const ALL: &[Representation] = &[
    Bool,
    Int8,
    Int16,
    Int32,
    Int64,
    Float32,
    Float64,
    Decimal,
    Text,
    Char,
    Bytes,
    Date,
    Time,
    Timestamp,
    TimeWithOffset,
    TimestampWithOffset,
    Guid,
    Xml,
    Array,
    Object,
];

const BOOLEAN: &[Representation] = &[Bool, Text];
const TINYINT: &[Representation] = &[Int8, Int16, Int32, Int64, Bool, Float32, Float64, Decimal, Text];
const SMALLINT: &[Representation] = &[Int16, Int32, Int64, Bool, Float32, Float64, Decimal, Text];
const INTEGER: &[Representation] = &[Int32, Int64, Bool, Float64, Decimal, Text];
const BIGINT: &[Representation] = &[Int64, Bool, Decimal, Text];
const REAL: &[Representation] = &[Float32, Float64, Text];
const DOUBLE: &[Representation] = &[Float64, Text];
const DECIMAL: &[Representation] = &[Decimal, Text];
const SHORT_TEXT: &[Representation] = &[Text, Char, Guid];
const LONG_TEXT: &[Representation] = &[Text];
const SHORT_BINARY: &[Representation] = &[Bytes, Guid];
const LONG_BINARY: &[Representation] = &[Bytes];
const DATE: &[Representation] = &[Date, Timestamp, TimestampWithOffset, Text];
const TIME: &[Representation] = &[Time, TimeWithOffset, Text];
const TIMESTAMP: &[Representation] = &[Timestamp, Date, Time, TimestampWithOffset, Text];
const TIME_TZ: &[Representation] = &[TimeWithOffset, Time, Text];
const TIMESTAMP_TZ: &[Representation] = &[TimestampWithOffset, Timestamp, Text];
const ARRAY: &[Representation] = &[Array];
const OBJECT: &[Representation] = &[Object, Guid];
const XML: &[Representation] = &[Xml, Text];
const NONE: &[Representation] = &[];

/// Representations a column of the given category may be read as.
///
/// NULL-typed columns accept every representation; they can only ever hold
/// NULL, so strict reads end in a null-value error rather than a mismatch.
pub fn allowed_representations(code: SqlTypeCode) -> &'static [Representation] {
    match code {
        SqlTypeCode::Boolean | SqlTypeCode::Bit => BOOLEAN,
        SqlTypeCode::TinyInt => TINYINT,
        SqlTypeCode::SmallInt => SMALLINT,
        SqlTypeCode::Integer => INTEGER,
        SqlTypeCode::BigInt => BIGINT,
        SqlTypeCode::Real => REAL,
        SqlTypeCode::Float | SqlTypeCode::Double => DOUBLE,
        SqlTypeCode::Decimal | SqlTypeCode::Numeric => DECIMAL,
        SqlTypeCode::Char | SqlTypeCode::VarChar | SqlTypeCode::NChar | SqlTypeCode::NVarChar => {
            SHORT_TEXT
        }
        SqlTypeCode::LongVarChar
        | SqlTypeCode::LongNVarChar
        | SqlTypeCode::Clob
        | SqlTypeCode::NClob => LONG_TEXT,
        SqlTypeCode::Binary | SqlTypeCode::VarBinary => SHORT_BINARY,
        SqlTypeCode::LongVarBinary | SqlTypeCode::Blob => LONG_BINARY,
        SqlTypeCode::Date => DATE,
        SqlTypeCode::Time => TIME,
        SqlTypeCode::Timestamp => TIMESTAMP,
        SqlTypeCode::TimeWithTimeZone => TIME_TZ,
        SqlTypeCode::TimestampWithTimeZone => TIMESTAMP_TZ,
        SqlTypeCode::Array => ARRAY,
        SqlTypeCode::JavaObject | SqlTypeCode::Other => OBJECT,
        SqlTypeCode::SqlXml => XML,
        SqlTypeCode::Null => ALL,
        SqlTypeCode::Struct
        | SqlTypeCode::Ref
        | SqlTypeCode::RowId
        | SqlTypeCode::DataLink
        | SqlTypeCode::Distinct
        | SqlTypeCode::RefCursor => NONE,
    }
}

/// Representation produced when a column is read without a target type.
///
/// `None` for categories the bridge cannot marshal.
pub fn canonical_representation(code: SqlTypeCode) -> Option<Representation> {
    let rep = match code {
        SqlTypeCode::Boolean | SqlTypeCode::Bit => Bool,
        SqlTypeCode::TinyInt => Int8,
        SqlTypeCode::SmallInt => Int16,
        SqlTypeCode::Integer => Int32,
        SqlTypeCode::BigInt => Int64,
        // REAL widens to double when read without a target type
        SqlTypeCode::Real | SqlTypeCode::Float | SqlTypeCode::Double => Float64,
        SqlTypeCode::Decimal | SqlTypeCode::Numeric => Decimal,
        c if c.is_character() => Text,
        c if c.is_binary() => Bytes,
        SqlTypeCode::Date => Date,
        SqlTypeCode::Time => Time,
        SqlTypeCode::Timestamp => Timestamp,
        SqlTypeCode::TimeWithTimeZone => TimeWithOffset,
        SqlTypeCode::TimestampWithTimeZone => TimestampWithOffset,
        SqlTypeCode::Array => Array,
        SqlTypeCode::JavaObject | SqlTypeCode::Other | SqlTypeCode::Null => Object,
        SqlTypeCode::SqlXml => Xml,
        _ => return None,
    };
    Some(rep)
}

/// Check that `requested` is readable from a column declared as `declared`.
pub fn check_representation(declared: SqlTypeCode, requested: Representation) -> Result<()> {
    let allowed = allowed_representations(declared);
    if allowed.is_empty() {
        return Err(Error::unsupported(format!(
            "no value mapping for {} columns",
            declared
        )));
    }
    if allowed.contains(&requested) {
        Ok(())
    } else {
        Err(Error::type_mismatch(declared, requested))
    }
}
