//! Canonical SQL type codes.
//!
//! The engine reports an integer type code per column. [`SqlTypeCode`] is
//! the closed set those codes collapse into; it is derived once per column
//! and stays fixed for the lifetime of a result cursor.

use std::fmt;

use crate::engine::constants::*;

/// Canonical column storage category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SqlTypeCode {
    Boolean,
    Bit,
    TinyInt,
    SmallInt,
    Integer,
    BigInt,
    Real,
    Float,
    Double,
    Decimal,
    Numeric,
    Char,
    VarChar,
    LongVarChar,
    NChar,
    NVarChar,
    LongNVarChar,
    Clob,
    NClob,
    Binary,
    VarBinary,
    LongVarBinary,
    Blob,
    Date,
    Time,
    Timestamp,
    TimeWithTimeZone,
    TimestampWithTimeZone,
    Array,
    JavaObject,
    Other,
    Struct,
    Ref,
    RowId,
    DataLink,
    SqlXml,
    Distinct,
    RefCursor,
    Null,
}

impl SqlTypeCode {
    /// Map an engine type code to its canonical category.
    ///
    /// Total: codes the bridge does not know collapse into [`SqlTypeCode::Other`].
    pub fn from_engine_code(code: i32) -> Self {
        match code {
            ENGINE_TYPE_BOOLEAN => SqlTypeCode::Boolean,
            ENGINE_TYPE_BIT => SqlTypeCode::Bit,
            ENGINE_TYPE_TINYINT => SqlTypeCode::TinyInt,
            ENGINE_TYPE_SMALLINT => SqlTypeCode::SmallInt,
            ENGINE_TYPE_INTEGER => SqlTypeCode::Integer,
            ENGINE_TYPE_BIGINT => SqlTypeCode::BigInt,
            ENGINE_TYPE_REAL => SqlTypeCode::Real,
            ENGINE_TYPE_FLOAT => SqlTypeCode::Float,
            ENGINE_TYPE_DOUBLE => SqlTypeCode::Double,
            ENGINE_TYPE_DECIMAL => SqlTypeCode::Decimal,
            ENGINE_TYPE_NUMERIC => SqlTypeCode::Numeric,
            ENGINE_TYPE_CHAR => SqlTypeCode::Char,
            ENGINE_TYPE_VARCHAR => SqlTypeCode::VarChar,
            ENGINE_TYPE_LONGVARCHAR => SqlTypeCode::LongVarChar,
            ENGINE_TYPE_NCHAR => SqlTypeCode::NChar,
            ENGINE_TYPE_NVARCHAR => SqlTypeCode::NVarChar,
            ENGINE_TYPE_LONGNVARCHAR => SqlTypeCode::LongNVarChar,
            ENGINE_TYPE_CLOB => SqlTypeCode::Clob,
            ENGINE_TYPE_NCLOB => SqlTypeCode::NClob,
            ENGINE_TYPE_BINARY => SqlTypeCode::Binary,
            ENGINE_TYPE_VARBINARY => SqlTypeCode::VarBinary,
            ENGINE_TYPE_LONGVARBINARY => SqlTypeCode::LongVarBinary,
            ENGINE_TYPE_BLOB => SqlTypeCode::Blob,
            ENGINE_TYPE_DATE => SqlTypeCode::Date,
            ENGINE_TYPE_TIME => SqlTypeCode::Time,
            ENGINE_TYPE_TIMESTAMP => SqlTypeCode::Timestamp,
            ENGINE_TYPE_TIME_WITH_TIMEZONE => SqlTypeCode::TimeWithTimeZone,
            ENGINE_TYPE_TIMESTAMP_WITH_TIMEZONE => SqlTypeCode::TimestampWithTimeZone,
            ENGINE_TYPE_ARRAY => SqlTypeCode::Array,
            ENGINE_TYPE_JAVA_OBJECT => SqlTypeCode::JavaObject,
            ENGINE_TYPE_STRUCT => SqlTypeCode::Struct,
            ENGINE_TYPE_REF => SqlTypeCode::Ref,
            ENGINE_TYPE_ROWID => SqlTypeCode::RowId,
            ENGINE_TYPE_DATALINK => SqlTypeCode::DataLink,
            ENGINE_TYPE_SQLXML => SqlTypeCode::SqlXml,
            ENGINE_TYPE_DISTINCT => SqlTypeCode::Distinct,
            ENGINE_TYPE_REF_CURSOR => SqlTypeCode::RefCursor,
            ENGINE_TYPE_NULL => SqlTypeCode::Null,
            _ => SqlTypeCode::Other,
        }
    }

    /// Engine type code for this category (used for NULL binds).
    pub fn engine_code(&self) -> i32 {
        match self {
            SqlTypeCode::Boolean => ENGINE_TYPE_BOOLEAN,
            SqlTypeCode::Bit => ENGINE_TYPE_BIT,
            SqlTypeCode::TinyInt => ENGINE_TYPE_TINYINT,
            SqlTypeCode::SmallInt => ENGINE_TYPE_SMALLINT,
            SqlTypeCode::Integer => ENGINE_TYPE_INTEGER,
            SqlTypeCode::BigInt => ENGINE_TYPE_BIGINT,
            SqlTypeCode::Real => ENGINE_TYPE_REAL,
            SqlTypeCode::Float => ENGINE_TYPE_FLOAT,
            SqlTypeCode::Double => ENGINE_TYPE_DOUBLE,
            SqlTypeCode::Decimal => ENGINE_TYPE_DECIMAL,
            SqlTypeCode::Numeric => ENGINE_TYPE_NUMERIC,
            SqlTypeCode::Char => ENGINE_TYPE_CHAR,
            SqlTypeCode::VarChar => ENGINE_TYPE_VARCHAR,
            SqlTypeCode::LongVarChar => ENGINE_TYPE_LONGVARCHAR,
            SqlTypeCode::NChar => ENGINE_TYPE_NCHAR,
            SqlTypeCode::NVarChar => ENGINE_TYPE_NVARCHAR,
            SqlTypeCode::LongNVarChar => ENGINE_TYPE_LONGNVARCHAR,
            SqlTypeCode::Clob => ENGINE_TYPE_CLOB,
            SqlTypeCode::NClob => ENGINE_TYPE_NCLOB,
            SqlTypeCode::Binary => ENGINE_TYPE_BINARY,
            SqlTypeCode::VarBinary => ENGINE_TYPE_VARBINARY,
            SqlTypeCode::LongVarBinary => ENGINE_TYPE_LONGVARBINARY,
            SqlTypeCode::Blob => ENGINE_TYPE_BLOB,
            SqlTypeCode::Date => ENGINE_TYPE_DATE,
            SqlTypeCode::Time => ENGINE_TYPE_TIME,
            SqlTypeCode::Timestamp => ENGINE_TYPE_TIMESTAMP,
            SqlTypeCode::TimeWithTimeZone => ENGINE_TYPE_TIME_WITH_TIMEZONE,
            SqlTypeCode::TimestampWithTimeZone => ENGINE_TYPE_TIMESTAMP_WITH_TIMEZONE,
            SqlTypeCode::Array => ENGINE_TYPE_ARRAY,
            SqlTypeCode::JavaObject => ENGINE_TYPE_JAVA_OBJECT,
            SqlTypeCode::Other => ENGINE_TYPE_OTHER,
            SqlTypeCode::Struct => ENGINE_TYPE_STRUCT,
            SqlTypeCode::Ref => ENGINE_TYPE_REF,
            SqlTypeCode::RowId => ENGINE_TYPE_ROWID,
            SqlTypeCode::DataLink => ENGINE_TYPE_DATALINK,
            SqlTypeCode::SqlXml => ENGINE_TYPE_SQLXML,
            SqlTypeCode::Distinct => ENGINE_TYPE_DISTINCT,
            SqlTypeCode::RefCursor => ENGINE_TYPE_REF_CURSOR,
            SqlTypeCode::Null => ENGINE_TYPE_NULL,
        }
    }

    /// SQL name of the category.
    pub fn name(&self) -> &'static str {
        match self {
            SqlTypeCode::Boolean => "BOOLEAN",
            SqlTypeCode::Bit => "BIT",
            SqlTypeCode::TinyInt => "TINYINT",
            SqlTypeCode::SmallInt => "SMALLINT",
            SqlTypeCode::Integer => "INTEGER",
            SqlTypeCode::BigInt => "BIGINT",
            SqlTypeCode::Real => "REAL",
            SqlTypeCode::Float => "FLOAT",
            SqlTypeCode::Double => "DOUBLE",
            SqlTypeCode::Decimal => "DECIMAL",
            SqlTypeCode::Numeric => "NUMERIC",
            SqlTypeCode::Char => "CHAR",
            SqlTypeCode::VarChar => "VARCHAR",
            SqlTypeCode::LongVarChar => "LONGVARCHAR",
            SqlTypeCode::NChar => "NCHAR",
            SqlTypeCode::NVarChar => "NVARCHAR",
            SqlTypeCode::LongNVarChar => "LONGNVARCHAR",
            SqlTypeCode::Clob => "CLOB",
            SqlTypeCode::NClob => "NCLOB",
            SqlTypeCode::Binary => "BINARY",
            SqlTypeCode::VarBinary => "VARBINARY",
            SqlTypeCode::LongVarBinary => "LONGVARBINARY",
            SqlTypeCode::Blob => "BLOB",
            SqlTypeCode::Date => "DATE",
            SqlTypeCode::Time => "TIME",
            SqlTypeCode::Timestamp => "TIMESTAMP",
            SqlTypeCode::TimeWithTimeZone => "TIME WITH TIME ZONE",
            SqlTypeCode::TimestampWithTimeZone => "TIMESTAMP WITH TIME ZONE",
            SqlTypeCode::Array => "ARRAY",
            SqlTypeCode::JavaObject => "JAVA_OBJECT",
            SqlTypeCode::Other => "OTHER",
            SqlTypeCode::Struct => "STRUCT",
            SqlTypeCode::Ref => "REF",
            SqlTypeCode::RowId => "ROWID",
            SqlTypeCode::DataLink => "DATALINK",
            SqlTypeCode::SqlXml => "SQLXML",
            SqlTypeCode::Distinct => "DISTINCT",
            SqlTypeCode::RefCursor => "REF_CURSOR",
            SqlTypeCode::Null => "NULL",
        }
    }

    /// TINYINT through BIGINT.
    pub fn is_integer(&self) -> bool {
        matches!(
            self,
            SqlTypeCode::TinyInt | SqlTypeCode::SmallInt | SqlTypeCode::Integer | SqlTypeCode::BigInt
        )
    }

    /// Character categories, large or not.
    pub fn is_character(&self) -> bool {
        matches!(
            self,
            SqlTypeCode::Char
                | SqlTypeCode::VarChar
                | SqlTypeCode::LongVarChar
                | SqlTypeCode::NChar
                | SqlTypeCode::NVarChar
                | SqlTypeCode::LongNVarChar
                | SqlTypeCode::Clob
                | SqlTypeCode::NClob
        )
    }

    /// Binary categories, large or not.
    pub fn is_binary(&self) -> bool {
        matches!(
            self,
            SqlTypeCode::Binary
                | SqlTypeCode::VarBinary
                | SqlTypeCode::LongVarBinary
                | SqlTypeCode::Blob
        )
    }

    /// Categories whose values are read through the engine's byte stream.
    pub fn is_byte_streamed(&self) -> bool {
        matches!(self, SqlTypeCode::LongVarBinary | SqlTypeCode::Blob)
    }

    /// Categories whose values are read through the engine's character stream.
    pub fn is_char_streamed(&self) -> bool {
        matches!(
            self,
            SqlTypeCode::LongVarChar
                | SqlTypeCode::LongNVarChar
                | SqlTypeCode::Clob
                | SqlTypeCode::NClob
        )
    }
}

impl fmt::Display for SqlTypeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
