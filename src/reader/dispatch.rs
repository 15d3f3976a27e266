//! Native fetch table keyed by column category.
//!
//! Each entry issues the one engine fetch call that matches the category and
//! wraps the result in its natural width (REAL stays `Float32` here; widening
//! to the canonical representation happens in the reader). A fetch never
//! decides NULL on its own for primitive categories: the caller consults
//! `was_null` afterwards.

use crate::decode::to_fixed;
use crate::engine::NativeResultSet;
use crate::error::Result;
use crate::types::{SqlTypeCode, TypedValue};

/// Fetch a single cell from the engine.
pub(crate) type ReadFn = fn(&mut dyn NativeResultSet, usize) -> Result<TypedValue>;

/// Fetch function for a column category. `None` for categories without a
/// value mapping.
pub(crate) fn native_reader(code: SqlTypeCode) -> Option<ReadFn> {
    let read: ReadFn = match code {
        SqlTypeCode::Boolean | SqlTypeCode::Bit => read_bool,
        SqlTypeCode::TinyInt => read_i8,
        SqlTypeCode::SmallInt => read_i16,
        SqlTypeCode::Integer => read_i32,
        SqlTypeCode::BigInt => read_i64,
        SqlTypeCode::Real => read_f32,
        SqlTypeCode::Float | SqlTypeCode::Double => read_f64,
        SqlTypeCode::Decimal | SqlTypeCode::Numeric => read_decimal,
        c if c.is_character() => read_text,
        c if c.is_binary() => read_bytes,
        SqlTypeCode::Date => read_date,
        SqlTypeCode::Time => read_time,
        SqlTypeCode::Timestamp => read_timestamp,
        SqlTypeCode::TimeWithTimeZone => read_time_tz,
        SqlTypeCode::TimestampWithTimeZone => read_timestamp_tz,
        SqlTypeCode::Array => read_array,
        SqlTypeCode::JavaObject | SqlTypeCode::Other | SqlTypeCode::Null => read_object,
        SqlTypeCode::SqlXml => read_xml,
        _ => return None,
    };
    Some(read)
}

fn or_null<T>(value: Option<T>, wrap: impl FnOnce(T) -> TypedValue) -> TypedValue {
    value.map_or(TypedValue::Null, wrap)
}

fn read_bool(rs: &mut dyn NativeResultSet, col: usize) -> Result<TypedValue> {
    Ok(TypedValue::Bool(rs.get_boolean(col)?))
}

fn read_i8(rs: &mut dyn NativeResultSet, col: usize) -> Result<TypedValue> {
    Ok(TypedValue::Int8(rs.get_byte(col)?))
}

fn read_i16(rs: &mut dyn NativeResultSet, col: usize) -> Result<TypedValue> {
    Ok(TypedValue::Int16(rs.get_short(col)?))
}

fn read_i32(rs: &mut dyn NativeResultSet, col: usize) -> Result<TypedValue> {
    Ok(TypedValue::Int32(rs.get_int(col)?))
}

fn read_i64(rs: &mut dyn NativeResultSet, col: usize) -> Result<TypedValue> {
    Ok(TypedValue::Int64(rs.get_long(col)?))
}

fn read_f32(rs: &mut dyn NativeResultSet, col: usize) -> Result<TypedValue> {
    Ok(TypedValue::Float32(rs.get_float(col)?))
}

fn read_f64(rs: &mut dyn NativeResultSet, col: usize) -> Result<TypedValue> {
    Ok(TypedValue::Float64(rs.get_double(col)?))
}

fn read_decimal(rs: &mut dyn NativeResultSet, col: usize) -> Result<TypedValue> {
    match rs.get_decimal(col)? {
        Some(d) => Ok(TypedValue::Decimal(to_fixed(&d)?)),
        None => Ok(TypedValue::Null),
    }
}

/// Text fetch, valid for every category that allows a text read.
pub(crate) fn read_text(rs: &mut dyn NativeResultSet, col: usize) -> Result<TypedValue> {
    Ok(or_null(rs.get_string(col)?, TypedValue::Text))
}

fn read_bytes(rs: &mut dyn NativeResultSet, col: usize) -> Result<TypedValue> {
    Ok(or_null(rs.get_bytes(col)?, |b| TypedValue::Bytes(b.into())))
}

fn read_date(rs: &mut dyn NativeResultSet, col: usize) -> Result<TypedValue> {
    Ok(or_null(rs.get_date(col)?, TypedValue::Date))
}

fn read_time(rs: &mut dyn NativeResultSet, col: usize) -> Result<TypedValue> {
    Ok(or_null(rs.get_time(col)?, TypedValue::Time))
}

fn read_timestamp(rs: &mut dyn NativeResultSet, col: usize) -> Result<TypedValue> {
    Ok(or_null(rs.get_timestamp(col)?, TypedValue::Timestamp))
}

fn read_time_tz(rs: &mut dyn NativeResultSet, col: usize) -> Result<TypedValue> {
    Ok(or_null(rs.get_time_tz(col)?, TypedValue::TimeWithOffset))
}

fn read_timestamp_tz(rs: &mut dyn NativeResultSet, col: usize) -> Result<TypedValue> {
    Ok(or_null(
        rs.get_timestamp_tz(col)?,
        TypedValue::TimestampWithOffset,
    ))
}

fn read_array(rs: &mut dyn NativeResultSet, col: usize) -> Result<TypedValue> {
    Ok(or_null(rs.get_array(col)?, TypedValue::Array))
}

fn read_object(rs: &mut dyn NativeResultSet, col: usize) -> Result<TypedValue> {
    Ok(or_null(rs.get_object(col)?, |b| TypedValue::Object(b.into())))
}

fn read_xml(rs: &mut dyn NativeResultSet, col: usize) -> Result<TypedValue> {
    Ok(or_null(rs.get_xml(col)?, TypedValue::Xml))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_mapped_category_has_a_reader() {
        for code in [
            SqlTypeCode::Boolean,
            SqlTypeCode::BigInt,
            SqlTypeCode::Real,
            SqlTypeCode::NClob,
            SqlTypeCode::Blob,
            SqlTypeCode::TimestampWithTimeZone,
            SqlTypeCode::Null,
            SqlTypeCode::SqlXml,
        ] {
            assert!(native_reader(code).is_some(), "{code}");
        }
    }

    #[test]
    fn test_unmapped_categories_have_no_reader() {
        for code in [
            SqlTypeCode::Struct,
            SqlTypeCode::Ref,
            SqlTypeCode::RowId,
            SqlTypeCode::DataLink,
            SqlTypeCode::Distinct,
            SqlTypeCode::RefCursor,
        ] {
            assert!(native_reader(code).is_none(), "{code}");
        }
    }
}
