//! Parameter binding onto an engine statement.
//!
//! A parameter's [`DbType`] selects a bind function from a lookup table; the
//! function accepts a closed set of [`ParamValue`] shapes and issues exactly
//! one native bind call. Shapes outside the set are rejected with a type
//! mismatch. NULL values bind as native NULL of the type's engine code
//! whatever the type.
//!
//! Unsigned values bind as the next larger signed engine type (`u8` as
//! SMALLINT, `u16` as INTEGER, `u32` as BIGINT). `u64` also binds as BIGINT
//! and is range checked; it never passes through a narrower type.

mod params;

pub use params::{DbType, Direction, ParamValue, Parameter};

use num_bigint::BigInt;

use crate::decode::{from_fixed, NativeDecimal};
use crate::engine::{NativeStatement, ENGINE_ORDINAL_BASE};
use crate::error::{Error, Result};

/// Bind one value onto an engine parameter.
type BindFn = fn(&mut dyn NativeStatement, usize, DbType, ParamValue) -> Result<()>;

/// Bind function for a parameter type.
fn binder_for(db_type: DbType) -> BindFn {
    match db_type {
        DbType::Boolean => bind_bool,
        DbType::Byte => bind_byte,
        DbType::Int16 => bind_i16,
        DbType::Int32 => bind_i32,
        DbType::Int64 => bind_i64,
        DbType::UInt8 => bind_u8,
        DbType::UInt16 => bind_u16,
        DbType::UInt32 => bind_u32,
        DbType::UInt64 => bind_u64,
        DbType::Single => bind_f32,
        DbType::Double => bind_f64,
        DbType::Decimal => bind_decimal,
        DbType::String | DbType::Char => bind_text,
        DbType::Clob => bind_clob,
        DbType::Binary | DbType::Blob => bind_binary,
        DbType::Date => bind_date,
        DbType::Time => bind_time,
        DbType::DateTime => bind_timestamp,
        DbType::DateTimeOffset => bind_timestamp_tz,
        DbType::TimeOffset => bind_time_tz,
        DbType::Guid => bind_guid,
        DbType::Xml => bind_xml,
        DbType::Array => bind_array,
        DbType::Object => bind_inferred,
    }
}

/// Bind a parameter at a 0-based `index`.
///
/// Output, input/output and return-value parameters are registered first and
/// need a statement that supports output parameters.
///
/// # Errors
/// - `Error::TypeMismatch` if the value shape does not fit the type
/// - `Error::Overflow` if an unsigned value does not fit its engine type
/// - `Error::Unsupported` for output parameters on a statement without
///   output support
pub fn bind_parameter(
    stmt: &mut dyn NativeStatement,
    index: usize,
    param: Parameter,
) -> Result<()> {
    let col = index + ENGINE_ORDINAL_BASE;
    let Parameter {
        db_type,
        value,
        direction,
        scale,
    } = param;

    tracing::trace!(index, ?db_type, ?direction, value = ?value, "bind");

    if direction.is_output() {
        if !stmt.supports_output_parameters() {
            return Err(Error::unsupported(format!(
                "{:?} parameter at index {} requires output parameter support",
                direction, index
            )));
        }
        let scale = match (db_type, &value) {
            (DbType::Decimal, ParamValue::Decimal(d)) => Some(scale.unwrap_or(d.scale())),
            (DbType::Decimal, _) => Some(scale.unwrap_or(0)),
            _ => None,
        };
        stmt.register_output_parameter(col, db_type.engine_code(), scale)?;
    }
    if !direction.is_input() {
        return Ok(());
    }

    if value.is_null() {
        stmt.set_null(col, db_type.engine_code())?;
        return Ok(());
    }
    binder_for(db_type)(stmt, col, db_type, value)
}

/// Bind parameters in order, starting at index 0.
pub fn bind_all(
    stmt: &mut dyn NativeStatement,
    params: impl IntoIterator<Item = Parameter>,
) -> Result<usize> {
    let mut count = 0;
    for (index, param) in params.into_iter().enumerate() {
        bind_parameter(stmt, index, param)?;
        count += 1;
    }
    Ok(count)
}

fn mismatch(db_type: DbType, value: &ParamValue) -> Error {
    match value.representation() {
        Some(rep) => Error::type_mismatch(db_type.sql_type(), rep),
        None => Error::invalid_argument("NULL reached a value bind"),
    }
}

fn overflow(value: u64, db_type: DbType) -> Error {
    Error::overflow(format!(
        "parameter value {} out of range for {}",
        value,
        db_type.sql_type()
    ))
}

fn bind_bool(stmt: &mut dyn NativeStatement, col: usize, db: DbType, v: ParamValue) -> Result<()> {
    match v {
        ParamValue::Bool(b) => Ok(stmt.set_boolean(col, b)?),
        other => Err(mismatch(db, &other)),
    }
}

fn bind_byte(stmt: &mut dyn NativeStatement, col: usize, db: DbType, v: ParamValue) -> Result<()> {
    match v {
        ParamValue::I8(i) => Ok(stmt.set_byte(col, i)?),
        other => Err(mismatch(db, &other)),
    }
}

fn bind_i16(stmt: &mut dyn NativeStatement, col: usize, db: DbType, v: ParamValue) -> Result<()> {
    let i = match v {
        ParamValue::I8(i) => i16::from(i),
        ParamValue::I16(i) => i,
        ParamValue::U8(u) => i16::from(u),
        other => return Err(mismatch(db, &other)),
    };
    Ok(stmt.set_short(col, i)?)
}

fn bind_i32(stmt: &mut dyn NativeStatement, col: usize, db: DbType, v: ParamValue) -> Result<()> {
    let i = match v {
        ParamValue::I8(i) => i32::from(i),
        ParamValue::I16(i) => i32::from(i),
        ParamValue::I32(i) => i,
        ParamValue::U8(u) => i32::from(u),
        ParamValue::U16(u) => i32::from(u),
        other => return Err(mismatch(db, &other)),
    };
    Ok(stmt.set_int(col, i)?)
}

fn bind_i64(stmt: &mut dyn NativeStatement, col: usize, db: DbType, v: ParamValue) -> Result<()> {
    let i = match v {
        ParamValue::I8(i) => i64::from(i),
        ParamValue::I16(i) => i64::from(i),
        ParamValue::I32(i) => i64::from(i),
        ParamValue::I64(i) => i,
        ParamValue::U8(u) => i64::from(u),
        ParamValue::U16(u) => i64::from(u),
        ParamValue::U32(u) => i64::from(u),
        ParamValue::U64(u) => cast_u64_to_i64(u, db)?,
        other => return Err(mismatch(db, &other)),
    };
    Ok(stmt.set_long(col, i)?)
}

fn bind_u8(stmt: &mut dyn NativeStatement, col: usize, db: DbType, v: ParamValue) -> Result<()> {
    match v {
        ParamValue::U8(u) => Ok(stmt.set_short(col, i16::from(u))?),
        other => Err(mismatch(db, &other)),
    }
}

fn bind_u16(stmt: &mut dyn NativeStatement, col: usize, db: DbType, v: ParamValue) -> Result<()> {
    let i = match v {
        ParamValue::U8(u) => i32::from(u),
        ParamValue::U16(u) => i32::from(u),
        other => return Err(mismatch(db, &other)),
    };
    Ok(stmt.set_int(col, i)?)
}

fn bind_u32(stmt: &mut dyn NativeStatement, col: usize, db: DbType, v: ParamValue) -> Result<()> {
    let i = match v {
        ParamValue::U8(u) => i64::from(u),
        ParamValue::U16(u) => i64::from(u),
        ParamValue::U32(u) => i64::from(u),
        other => return Err(mismatch(db, &other)),
    };
    Ok(stmt.set_long(col, i)?)
}

fn bind_u64(stmt: &mut dyn NativeStatement, col: usize, db: DbType, v: ParamValue) -> Result<()> {
    let i = match v {
        ParamValue::U8(u) => i64::from(u),
        ParamValue::U16(u) => i64::from(u),
        ParamValue::U32(u) => i64::from(u),
        ParamValue::U64(u) => cast_u64_to_i64(u, db)?,
        other => return Err(mismatch(db, &other)),
    };
    Ok(stmt.set_long(col, i)?)
}

fn cast_u64_to_i64(value: u64, db: DbType) -> Result<i64> {
    i64::try_from(value).map_err(|_| overflow(value, db))
}

fn bind_f32(stmt: &mut dyn NativeStatement, col: usize, db: DbType, v: ParamValue) -> Result<()> {
    match v {
        ParamValue::F32(f) => Ok(stmt.set_float(col, f)?),
        other => Err(mismatch(db, &other)),
    }
}

fn bind_f64(stmt: &mut dyn NativeStatement, col: usize, db: DbType, v: ParamValue) -> Result<()> {
    let f = match v {
        ParamValue::F32(f) => f64::from(f),
        ParamValue::F64(f) => f,
        other => return Err(mismatch(db, &other)),
    };
    Ok(stmt.set_double(col, f)?)
}

/// Exact decimal bind; integers are scaled by zero, never routed through
/// floating point.
fn bind_decimal(
    stmt: &mut dyn NativeStatement,
    col: usize,
    db: DbType,
    v: ParamValue,
) -> Result<()> {
    let d = match v {
        ParamValue::Decimal(d) => from_fixed(d),
        ParamValue::I8(i) => NativeDecimal::new(i, 0),
        ParamValue::I16(i) => NativeDecimal::new(i, 0),
        ParamValue::I32(i) => NativeDecimal::new(i, 0),
        ParamValue::I64(i) => NativeDecimal::new(i, 0),
        ParamValue::U8(u) => NativeDecimal::new(u, 0),
        ParamValue::U16(u) => NativeDecimal::new(u, 0),
        ParamValue::U32(u) => NativeDecimal::new(u, 0),
        ParamValue::U64(u) => NativeDecimal::new(BigInt::from(u), 0),
        other => return Err(mismatch(db, &other)),
    };
    Ok(stmt.set_decimal(col, &d)?)
}

fn bind_text(stmt: &mut dyn NativeStatement, col: usize, db: DbType, v: ParamValue) -> Result<()> {
    match v {
        ParamValue::Text(s) => Ok(stmt.set_string(col, &s)?),
        ParamValue::Char(c) => Ok(stmt.set_string(col, c.encode_utf8(&mut [0u8; 4]))?),
        other => Err(mismatch(db, &other)),
    }
}

fn bind_clob(stmt: &mut dyn NativeStatement, col: usize, db: DbType, v: ParamValue) -> Result<()> {
    match v {
        ParamValue::Stream { reader, length } => {
            Ok(stmt.set_character_stream(col, reader, length)?)
        }
        other => bind_text(stmt, col, db, other),
    }
}

fn bind_binary(
    stmt: &mut dyn NativeStatement,
    col: usize,
    db: DbType,
    v: ParamValue,
) -> Result<()> {
    match v {
        ParamValue::Bytes(b) => Ok(stmt.set_bytes(col, &b)?),
        ParamValue::Stream { reader, length } => Ok(stmt.set_binary_stream(col, reader, length)?),
        other => Err(mismatch(db, &other)),
    }
}

fn bind_date(stmt: &mut dyn NativeStatement, col: usize, db: DbType, v: ParamValue) -> Result<()> {
    match v {
        ParamValue::Date(d) => Ok(stmt.set_date(col, d)?),
        other => Err(mismatch(db, &other)),
    }
}

fn bind_time(stmt: &mut dyn NativeStatement, col: usize, db: DbType, v: ParamValue) -> Result<()> {
    match v {
        ParamValue::Time(t) => Ok(stmt.set_time(col, t)?),
        other => Err(mismatch(db, &other)),
    }
}

fn bind_timestamp(
    stmt: &mut dyn NativeStatement,
    col: usize,
    db: DbType,
    v: ParamValue,
) -> Result<()> {
    let ts = match v {
        ParamValue::Timestamp(ts) => ts,
        ParamValue::Date(d) => d.and_time(chrono::NaiveTime::MIN),
        other => return Err(mismatch(db, &other)),
    };
    Ok(stmt.set_timestamp(col, ts)?)
}

fn bind_timestamp_tz(
    stmt: &mut dyn NativeStatement,
    col: usize,
    db: DbType,
    v: ParamValue,
) -> Result<()> {
    match v {
        ParamValue::TimestampOffset(dt) => Ok(stmt.set_timestamp_tz(col, dt)?),
        other => Err(mismatch(db, &other)),
    }
}

fn bind_time_tz(
    stmt: &mut dyn NativeStatement,
    col: usize,
    db: DbType,
    v: ParamValue,
) -> Result<()> {
    match v {
        ParamValue::TimeOffset(t) => Ok(stmt.set_time_tz(col, t)?),
        other => Err(mismatch(db, &other)),
    }
}

fn bind_guid(stmt: &mut dyn NativeStatement, col: usize, db: DbType, v: ParamValue) -> Result<()> {
    match v {
        ParamValue::Guid(u) => Ok(stmt.set_uuid(col, u)?),
        other => Err(mismatch(db, &other)),
    }
}

fn bind_xml(stmt: &mut dyn NativeStatement, col: usize, db: DbType, v: ParamValue) -> Result<()> {
    match v {
        ParamValue::Xml(s) | ParamValue::Text(s) => Ok(stmt.set_xml(col, &s)?),
        other => Err(mismatch(db, &other)),
    }
}

fn bind_array(stmt: &mut dyn NativeStatement, col: usize, db: DbType, v: ParamValue) -> Result<()> {
    match v {
        ParamValue::Array(items) => Ok(stmt.set_array(col, &items)?),
        other => Err(mismatch(db, &other)),
    }
}

/// Bind with the value's natural type.
fn bind_inferred(
    stmt: &mut dyn NativeStatement,
    col: usize,
    db: DbType,
    v: ParamValue,
) -> Result<()> {
    match v.infer_db_type() {
        Some(inferred) => binder_for(inferred)(stmt, col, inferred, v),
        None => Ok(stmt.set_null(col, db.engine_code())?),
    }
}
