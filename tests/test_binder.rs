//! Integration tests for parameter binding.

mod common;

use std::io::Cursor;

use chrono::{FixedOffset, NaiveDate, TimeZone};
use rust_decimal::Decimal;
use uuid::Uuid;

use common::{init_tracing, MockStatement};
use sql_bridge::{
    bind_all, bind_parameter, DbType, Direction, Error, ParamValue, Parameter, Representation,
    SqlTypeCode, TypedValue,
};

fn bind(param: Parameter) -> (MockStatement, sql_bridge::Result<()>) {
    init_tracing();
    let mut stmt = MockStatement::new();
    let result = bind_parameter(&mut stmt, 0, param);
    (stmt, result)
}

fn bound(param: Parameter) -> Vec<String> {
    let (stmt, result) = bind(param);
    result.unwrap();
    stmt.calls
}

#[test]
fn test_unsigned_binds_widen() {
    assert_eq!(bound(Parameter::new(DbType::UInt8, 255u8)), ["set_short(1, 255)"]);
    assert_eq!(
        bound(Parameter::new(DbType::UInt16, 65535u16)),
        ["set_int(1, 65535)"]
    );
    assert_eq!(
        bound(Parameter::new(DbType::UInt32, u32::MAX)),
        ["set_long(1, 4294967295)"]
    );
    assert_eq!(
        bound(Parameter::new(DbType::UInt64, i64::MAX as u64)),
        [format!("set_long(1, {})", i64::MAX)]
    );
}

#[test]
fn test_u64_out_of_range_overflows() {
    for db_type in [DbType::UInt64, DbType::Int64] {
        let (stmt, result) = bind(Parameter::new(db_type, u64::MAX));
        assert!(
            matches!(result, Err(Error::Overflow { .. })),
            "{db_type:?}: {result:?}"
        );
        assert!(stmt.calls.is_empty());
    }
}

#[test]
fn test_u64_binds_exactly_as_decimal() {
    assert_eq!(
        bound(Parameter::new(DbType::Decimal, u64::MAX)),
        ["set_decimal(1, 18446744073709551615)"]
    );
}

#[test]
fn test_signed_binds_widen_but_never_narrow() {
    assert_eq!(bound(Parameter::new(DbType::Int64, -7i8)), ["set_long(1, -7)"]);
    assert_eq!(bound(Parameter::new(DbType::Int32, 200u8)), ["set_int(1, 200)"]);

    let (_, result) = bind(Parameter::new(DbType::Int16, 70000i32));
    match result {
        Err(Error::TypeMismatch {
            declared,
            requested,
        }) => {
            assert_eq!(declared, SqlTypeCode::SmallInt);
            assert_eq!(requested, Representation::Int32);
        }
        other => panic!("Expected TypeMismatch, got {other:?}"),
    }

    let (_, result) = bind(Parameter::new(DbType::UInt8, -1i8));
    assert!(matches!(result, Err(Error::TypeMismatch { .. })));
}

#[test]
fn test_decimal_binds_are_exact() {
    assert_eq!(
        bound(Parameter::new(DbType::Decimal, -65535i64)),
        ["set_decimal(1, -65535)"]
    );
    assert_eq!(
        bound(Parameter::new(DbType::Decimal, Decimal::new(12345, 2))),
        ["set_decimal(1, 123.45)"]
    );
    let (_, result) = bind(Parameter::new(DbType::Decimal, 1.5f64));
    assert!(matches!(result, Err(Error::TypeMismatch { .. })));
}

#[test]
fn test_null_binds_use_engine_code() {
    assert_eq!(bound(Parameter::null(DbType::Int32)), ["set_null(1, 4)"]);
    assert_eq!(bound(Parameter::null(DbType::Blob)), ["set_null(1, 2004)"]);
    assert_eq!(
        bound(Parameter::new(DbType::String, None::<String>)),
        ["set_null(1, 12)"]
    );
}

#[test]
fn test_text_binds() {
    assert_eq!(bound(Parameter::new(DbType::Char, 'x')), [r#"set_string(1, "x")"#]);
    assert_eq!(
        bound(Parameter::new(DbType::String, "héllo")),
        [r#"set_string(1, "héllo")"#]
    );
    assert_eq!(
        bound(Parameter::new(DbType::Clob, "short")),
        [r#"set_string(1, "short")"#]
    );
    assert_eq!(
        bound(Parameter::new(DbType::Xml, ParamValue::Xml("<a/>".into()))),
        [r#"set_xml(1, "<a/>")"#]
    );
}

#[test]
fn test_stream_binds() {
    let blob = ParamValue::stream(Cursor::new(vec![1u8, 2, 3]), Some(3));
    assert_eq!(
        bound(Parameter::new(DbType::Blob, blob)),
        ["set_binary_stream(1, [1, 2, 3], Some(3))"]
    );

    let clob = ParamValue::stream(Cursor::new(b"text".to_vec()), None);
    assert_eq!(
        bound(Parameter::new(DbType::Clob, clob)),
        [r#"set_character_stream(1, "text", None)"#]
    );

    assert_eq!(
        bound(Parameter::new(DbType::Binary, vec![1u8, 2])),
        ["set_bytes(1, [1, 2])"]
    );

    let stream = ParamValue::stream(Cursor::new(vec![0u8]), None);
    let (_, result) = bind(Parameter::new(DbType::String, stream));
    assert!(matches!(result, Err(Error::TypeMismatch { .. })));
}

#[test]
fn test_temporal_binds() {
    let date = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    assert_eq!(
        bound(Parameter::new(DbType::DateTime, date)),
        ["set_timestamp(1, 2024-01-02 00:00:00)"]
    );
    assert_eq!(
        bound(Parameter::new(DbType::Date, date)),
        ["set_date(1, 2024-01-02)"]
    );

    let offset = FixedOffset::east_opt(2 * 3600).unwrap();
    let dt = offset.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
    assert_eq!(
        bound(Parameter::new(DbType::DateTimeOffset, dt)),
        ["set_timestamp_tz(1, 2024-01-02T03:04:05+02:00)"]
    );

    let (_, result) = bind(Parameter::new(DbType::Date, dt));
    assert!(matches!(result, Err(Error::TypeMismatch { .. })));
}

#[test]
fn test_object_binds_by_value_shape() {
    assert_eq!(bound(Parameter::new(DbType::Object, 7i64)), ["set_long(1, 7)"]);
    assert_eq!(bound(Parameter::new(DbType::Object, true)), ["set_boolean(1, true)"]);

    let id = Uuid::from_u128(0x0123_4567_89ab_cdef_0123_4567_89ab_cdef);
    assert_eq!(
        bound(Parameter::new(DbType::Object, id)),
        [format!("set_uuid(1, {})", id)]
    );

    let items = vec![TypedValue::Int32(1), TypedValue::Int32(2)];
    assert_eq!(
        bound(Parameter::new(DbType::Object, items)),
        ["set_array(1, 2 items)"]
    );
    assert_eq!(bound(Parameter::null(DbType::Object)), ["set_null(1, 2000)"]);
}

#[test]
fn test_output_needs_statement_support() {
    let (stmt, result) = bind(Parameter::output(DbType::Int32));
    assert!(matches!(result, Err(Error::Unsupported { .. })));
    assert!(stmt.calls.is_empty());

    let param = Parameter::new(DbType::Int32, 1).with_direction(Direction::ReturnValue);
    let (_, result) = bind(param);
    assert!(matches!(result, Err(Error::Unsupported { .. })));
}

#[test]
fn test_output_registration() {
    init_tracing();
    let mut stmt = MockStatement::with_output_support();
    bind_parameter(&mut stmt, 0, Parameter::output(DbType::Decimal).with_scale(2)).unwrap();
    bind_parameter(
        &mut stmt,
        1,
        Parameter::new(DbType::Int32, 5).with_direction(Direction::InputOutput),
    )
    .unwrap();
    bind_parameter(
        &mut stmt,
        2,
        Parameter::new(DbType::Decimal, Decimal::new(100, 3)).with_direction(Direction::InputOutput),
    )
    .unwrap();
    assert_eq!(
        stmt.calls,
        [
            "register_output_parameter(1, 3, Some(2))",
            "register_output_parameter(2, 4, None)",
            "set_int(2, 5)",
            "register_output_parameter(3, 3, Some(3))",
            "set_decimal(3, 0.100)",
        ]
    );
}

#[test]
fn test_bind_all_uses_engine_indices() {
    init_tracing();
    let mut stmt = MockStatement::new();
    let params = vec![
        Parameter::new(DbType::Int32, 1),
        Parameter::new(DbType::String, "two"),
        Parameter::null(DbType::Double),
    ];
    assert_eq!(bind_all(&mut stmt, params).unwrap(), 3);
    assert_eq!(
        stmt.calls,
        [
            "set_int(1, 1)",
            r#"set_string(2, "two")"#,
            "set_null(3, 8)",
        ]
    );
}

#[test]
fn test_bind_all_stops_at_first_error() {
    init_tracing();
    let mut stmt = MockStatement::new();
    let params = vec![
        Parameter::new(DbType::Int32, 1),
        Parameter::new(DbType::Int32, "not a number"),
        Parameter::new(DbType::Int32, 3),
    ];
    assert!(matches!(
        bind_all(&mut stmt, params),
        Err(Error::TypeMismatch { .. })
    ));
    assert_eq!(stmt.calls, ["set_int(1, 1)"]);
}
