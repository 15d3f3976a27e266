//! In-memory engine used by the integration tests.
//!
//! Cells are stored as `TypedValue`s. Fetch calls behave like a blocking
//! engine: primitive fetches return a placeholder for NULL and set the
//! `was_null` flag, object fetches return `None`. Every call is appended to a
//! shared log so tests can check call order after the reader took ownership.

#![allow(dead_code)]

use std::cell::RefCell;
use std::io::Read;
use std::rc::Rc;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};
use uuid::Uuid;

use sql_bridge::decode::{from_fixed, NativeDecimal};
use sql_bridge::engine::{
    NativeByteStream, NativeCharStream, NativeError, NativeResult, NativeResultSet,
    NativeStatement, NativeStream,
};
use sql_bridge::{OffsetTime, TypedValue};

/// Engine error code for a fetch that does not fit the cell.
pub const INVALID_COLUMN_TYPE: i32 = 17004;

pub fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}

/// State shared between a mock and the test that built it.
#[derive(Debug, Default)]
pub struct MockState {
    pub log: Vec<String>,
    pub streams_opened: usize,
    pub streams_closed: usize,
    /// Number of `mark` calls across all streams.
    pub marks: usize,
    pub closed: bool,
}

pub type SharedState = Rc<RefCell<MockState>>;

// ==================== Streams ====================

/// Engine stream with configurable quirks.
pub struct MockStream<U> {
    data: Vec<U>,
    pos: usize,
    mark: usize,
    mark_supported: bool,
    /// Largest number of units a single skip consumes.
    max_skip: u64,
    /// Largest number of units a single read transfers.
    max_read: usize,
    /// Report `Some(0)` on the next bulk read.
    zero_read_pending: bool,
    state: SharedState,
}

impl<U: Copy + Default> MockStream<U> {
    fn new(data: Vec<U>, config: &StreamQuirks, state: SharedState) -> Self {
        state.borrow_mut().streams_opened += 1;
        Self {
            data,
            pos: 0,
            mark: 0,
            mark_supported: config.mark_supported,
            max_skip: config.max_skip,
            max_read: config.max_read,
            zero_read_pending: config.zero_read_first,
            state,
        }
    }
}

impl<U: Copy + Default> NativeStream for MockStream<U> {
    type Unit = U;

    fn read_unit(&mut self) -> NativeResult<Option<U>> {
        let unit = self.data.get(self.pos).copied();
        if unit.is_some() {
            self.pos += 1;
        }
        Ok(unit)
    }

    fn read(&mut self, buf: &mut [U]) -> NativeResult<Option<usize>> {
        if self.zero_read_pending {
            self.zero_read_pending = false;
            return Ok(Some(0));
        }
        let remaining = self.data.len() - self.pos;
        if remaining == 0 {
            return Ok(None);
        }
        let n = buf.len().min(remaining).min(self.max_read);
        buf[..n].copy_from_slice(&self.data[self.pos..self.pos + n]);
        self.pos += n;
        Ok(Some(n))
    }

    fn skip(&mut self, n: u64) -> NativeResult<u64> {
        let remaining = (self.data.len() - self.pos) as u64;
        let n = n.min(remaining).min(self.max_skip);
        self.pos += n as usize;
        Ok(n)
    }

    fn mark_supported(&self) -> bool {
        self.mark_supported
    }

    fn mark(&mut self, _read_limit: usize) {
        self.state.borrow_mut().marks += 1;
        self.mark = self.pos;
    }

    fn reset(&mut self) -> NativeResult<()> {
        if !self.mark_supported {
            return Err(NativeError::new(17002, "reset not supported"));
        }
        self.pos = self.mark;
        Ok(())
    }

    fn close(&mut self) -> NativeResult<()> {
        self.state.borrow_mut().streams_closed += 1;
        Ok(())
    }
}

/// Stream behavior applied to every stream a mock result set hands out.
#[derive(Debug, Clone)]
pub struct StreamQuirks {
    pub mark_supported: bool,
    pub max_skip: u64,
    pub max_read: usize,
    pub zero_read_first: bool,
    /// Hand out an empty stream for NULL cells instead of `None`.
    pub stream_for_null: bool,
}

impl Default for StreamQuirks {
    fn default() -> Self {
        Self {
            mark_supported: true,
            max_skip: u64::MAX,
            max_read: usize::MAX,
            zero_read_first: false,
            stream_for_null: false,
        }
    }
}

// ==================== Result set ====================

pub struct MockResultSet {
    columns: Vec<(String, i32)>,
    rows: Vec<Vec<TypedValue>>,
    /// Index of the current row, once `next` was called.
    current: Option<usize>,
    last_null: RefCell<bool>,
    quirks: StreamQuirks,
    /// Error code `find_column` fails with for every name.
    lookup_error: Option<i32>,
    state: SharedState,
}

impl MockResultSet {
    pub fn new(columns: &[(&str, i32)]) -> Self {
        Self {
            columns: columns
                .iter()
                .map(|(name, code)| (name.to_string(), *code))
                .collect(),
            rows: Vec::new(),
            current: None,
            last_null: RefCell::new(false),
            quirks: StreamQuirks::default(),
            lookup_error: None,
            state: SharedState::default(),
        }
    }

    /// Single-column result with one row.
    pub fn single(name: &str, engine_type: i32, value: TypedValue) -> Self {
        Self::new(&[(name, engine_type)]).row(vec![value])
    }

    pub fn row(mut self, cells: Vec<TypedValue>) -> Self {
        assert_eq!(cells.len(), self.columns.len(), "row width");
        self.rows.push(cells);
        self
    }

    pub fn with_quirks(mut self, quirks: StreamQuirks) -> Self {
        self.quirks = quirks;
        self
    }

    pub fn failing_lookup(mut self, code: i32) -> Self {
        self.lookup_error = Some(code);
        self
    }

    pub fn state(&self) -> SharedState {
        Rc::clone(&self.state)
    }

    fn log(&self, call: impl Into<String>) {
        self.state.borrow_mut().log.push(call.into());
    }

    fn cell(&self, column: usize) -> NativeResult<TypedValue> {
        let row = self
            .current
            .and_then(|r| self.rows.get(r))
            .ok_or_else(|| NativeError::new(17011, "exhausted result set"))?;
        let value = column
            .checked_sub(1)
            .and_then(|c| row.get(c))
            .cloned()
            .ok_or_else(|| NativeError::new(17003, "invalid column index"))?;
        *self.last_null.borrow_mut() = value.is_null();
        Ok(value)
    }

    fn fetch(&self, call: &str, column: usize) -> NativeResult<TypedValue> {
        self.log(format!("{}({})", call, column));
        self.cell(column)
    }
}

fn invalid(call: &str, value: &TypedValue) -> NativeError {
    NativeError::new(
        INVALID_COLUMN_TYPE,
        format!("{} cannot read {:?}", call, value),
    )
}

fn integer(call: &str, value: &TypedValue) -> NativeResult<i64> {
    match value {
        TypedValue::Null => Ok(0),
        TypedValue::Bool(b) => Ok(i64::from(*b)),
        other => other.to_i64().ok_or_else(|| invalid(call, other)),
    }
}

fn narrow<T: TryFrom<i64>>(call: &str, value: &TypedValue) -> NativeResult<T> {
    let wide = integer(call, value)?;
    T::try_from(wide).map_err(|_| NativeError::new(17026, format!("{} overflow", call)))
}

impl NativeResultSet for MockResultSet {
    fn column_count(&self) -> NativeResult<usize> {
        self.log("column_count");
        Ok(self.columns.len())
    }

    fn column_type(&self, column: usize) -> NativeResult<i32> {
        self.columns
            .get(column - 1)
            .map(|(_, code)| *code)
            .ok_or_else(|| NativeError::new(17003, "invalid column index"))
    }

    fn column_name(&self, column: usize) -> NativeResult<String> {
        self.columns
            .get(column - 1)
            .map(|(name, _)| name.clone())
            .ok_or_else(|| NativeError::new(17003, "invalid column index"))
    }

    fn find_column(&self, name: &str) -> NativeResult<usize> {
        if let Some(code) = self.lookup_error {
            return Err(NativeError::new(code, "lookup failed"));
        }
        self.columns
            .iter()
            .position(|(n, _)| n == name)
            .map(|i| i + 1)
            .ok_or_else(|| NativeError::new(17006, format!("invalid column name {}", name)))
    }

    fn next(&mut self) -> NativeResult<bool> {
        let next = self.current.map_or(0, |r| r + 1);
        self.current = Some(next);
        Ok(next < self.rows.len())
    }

    fn was_null(&self) -> NativeResult<bool> {
        self.log("was_null");
        Ok(*self.last_null.borrow())
    }

    fn get_boolean(&mut self, column: usize) -> NativeResult<bool> {
        let v = self.fetch("get_boolean", column)?;
        Ok(integer("get_boolean", &v)? != 0)
    }

    fn get_byte(&mut self, column: usize) -> NativeResult<i8> {
        let v = self.fetch("get_byte", column)?;
        narrow("get_byte", &v)
    }

    fn get_short(&mut self, column: usize) -> NativeResult<i16> {
        let v = self.fetch("get_short", column)?;
        narrow("get_short", &v)
    }

    fn get_int(&mut self, column: usize) -> NativeResult<i32> {
        let v = self.fetch("get_int", column)?;
        narrow("get_int", &v)
    }

    fn get_long(&mut self, column: usize) -> NativeResult<i64> {
        let v = self.fetch("get_long", column)?;
        integer("get_long", &v)
    }

    fn get_float(&mut self, column: usize) -> NativeResult<f32> {
        match self.fetch("get_float", column)? {
            TypedValue::Null => Ok(0.0),
            TypedValue::Float32(f) => Ok(f),
            other => Err(invalid("get_float", &other)),
        }
    }

    fn get_double(&mut self, column: usize) -> NativeResult<f64> {
        match self.fetch("get_double", column)? {
            TypedValue::Null => Ok(0.0),
            other => other.to_f64().ok_or_else(|| invalid("get_double", &other)),
        }
    }

    /// Decimal cells may also be given as text, for values wider than a
    /// fixed decimal.
    fn get_decimal(&mut self, column: usize) -> NativeResult<Option<NativeDecimal>> {
        match self.fetch("get_decimal", column)? {
            TypedValue::Null => Ok(None),
            TypedValue::Decimal(d) => Ok(Some(from_fixed(d))),
            TypedValue::Text(s) => s
                .parse::<NativeDecimal>()
                .map(Some)
                .map_err(|e| NativeError::new(INVALID_COLUMN_TYPE, e.to_string())),
            other => other
                .to_i64()
                .map(|i| Some(NativeDecimal::new(i, 0)))
                .ok_or_else(|| invalid("get_decimal", &other)),
        }
    }

    fn get_string(&mut self, column: usize) -> NativeResult<Option<String>> {
        match self.fetch("get_string", column)? {
            TypedValue::Null => Ok(None),
            TypedValue::Text(s) | TypedValue::Xml(s) => Ok(Some(s)),
            other => Ok(Some(other.to_string())),
        }
    }

    fn get_bytes(&mut self, column: usize) -> NativeResult<Option<Vec<u8>>> {
        match self.fetch("get_bytes", column)? {
            TypedValue::Null => Ok(None),
            TypedValue::Bytes(b) | TypedValue::Object(b) => Ok(Some(b.to_vec())),
            other => Err(invalid("get_bytes", &other)),
        }
    }

    fn get_date(&mut self, column: usize) -> NativeResult<Option<NaiveDate>> {
        match self.fetch("get_date", column)? {
            TypedValue::Null => Ok(None),
            TypedValue::Date(d) => Ok(Some(d)),
            other => Err(invalid("get_date", &other)),
        }
    }

    fn get_time(&mut self, column: usize) -> NativeResult<Option<NaiveTime>> {
        match self.fetch("get_time", column)? {
            TypedValue::Null => Ok(None),
            TypedValue::Time(t) => Ok(Some(t)),
            other => Err(invalid("get_time", &other)),
        }
    }

    fn get_timestamp(&mut self, column: usize) -> NativeResult<Option<NaiveDateTime>> {
        match self.fetch("get_timestamp", column)? {
            TypedValue::Null => Ok(None),
            TypedValue::Timestamp(ts) => Ok(Some(ts)),
            other => Err(invalid("get_timestamp", &other)),
        }
    }

    fn get_time_tz(&mut self, column: usize) -> NativeResult<Option<OffsetTime>> {
        match self.fetch("get_time_tz", column)? {
            TypedValue::Null => Ok(None),
            TypedValue::TimeWithOffset(t) => Ok(Some(t)),
            other => Err(invalid("get_time_tz", &other)),
        }
    }

    fn get_timestamp_tz(&mut self, column: usize) -> NativeResult<Option<DateTime<FixedOffset>>> {
        match self.fetch("get_timestamp_tz", column)? {
            TypedValue::Null => Ok(None),
            TypedValue::TimestampWithOffset(dt) => Ok(Some(dt)),
            other => Err(invalid("get_timestamp_tz", &other)),
        }
    }

    fn get_array(&mut self, column: usize) -> NativeResult<Option<Vec<TypedValue>>> {
        match self.fetch("get_array", column)? {
            TypedValue::Null => Ok(None),
            TypedValue::Array(items) => Ok(Some(items)),
            other => Err(invalid("get_array", &other)),
        }
    }

    fn get_object(&mut self, column: usize) -> NativeResult<Option<Vec<u8>>> {
        match self.fetch("get_object", column)? {
            TypedValue::Null => Ok(None),
            TypedValue::Object(b) | TypedValue::Bytes(b) => Ok(Some(b.to_vec())),
            other => Ok(Some(other.to_string().into_bytes())),
        }
    }

    fn get_xml(&mut self, column: usize) -> NativeResult<Option<String>> {
        match self.fetch("get_xml", column)? {
            TypedValue::Null => Ok(None),
            TypedValue::Xml(s) | TypedValue::Text(s) => Ok(Some(s)),
            other => Err(invalid("get_xml", &other)),
        }
    }

    fn get_binary_stream(&mut self, column: usize) -> NativeResult<Option<NativeByteStream>> {
        match self.fetch("get_binary_stream", column)? {
            TypedValue::Null if self.quirks.stream_for_null => {
                let stream: NativeByteStream =
                    Box::new(MockStream::new(Vec::new(), &self.quirks, self.state()));
                Ok(Some(stream))
            }
            TypedValue::Null => Ok(None),
            TypedValue::Bytes(b) => {
                let stream: NativeByteStream =
                    Box::new(MockStream::new(b.to_vec(), &self.quirks, self.state()));
                Ok(Some(stream))
            }
            other => Err(invalid("get_binary_stream", &other)),
        }
    }

    fn get_character_stream(&mut self, column: usize) -> NativeResult<Option<NativeCharStream>> {
        match self.fetch("get_character_stream", column)? {
            TypedValue::Null if self.quirks.stream_for_null => {
                let stream: NativeCharStream =
                    Box::new(MockStream::new(Vec::new(), &self.quirks, self.state()));
                Ok(Some(stream))
            }
            TypedValue::Null => Ok(None),
            TypedValue::Text(s) | TypedValue::Xml(s) => {
                let stream: NativeCharStream =
                    Box::new(MockStream::new(s.chars().collect(), &self.quirks, self.state()));
                Ok(Some(stream))
            }
            other => Err(invalid("get_character_stream", &other)),
        }
    }

    fn is_closed(&self) -> bool {
        self.state.borrow().closed
    }

    fn close(&mut self) -> NativeResult<()> {
        self.state.borrow_mut().closed = true;
        Ok(())
    }
}

// ==================== Statement ====================

/// Statement that records every bind call as text.
#[derive(Default)]
pub struct MockStatement {
    pub calls: Vec<String>,
    pub output_support: bool,
}

impl MockStatement {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_output_support() -> Self {
        Self {
            calls: Vec::new(),
            output_support: true,
        }
    }

    fn record(&mut self, call: String) -> NativeResult<()> {
        self.calls.push(call);
        Ok(())
    }
}

fn drain(mut reader: Box<dyn Read>) -> NativeResult<Vec<u8>> {
    let mut out = Vec::new();
    reader
        .read_to_end(&mut out)
        .map_err(|e| NativeError::new(17002, e.to_string()))?;
    Ok(out)
}

impl NativeStatement for MockStatement {
    fn set_null(&mut self, index: usize, engine_type: i32) -> NativeResult<()> {
        self.record(format!("set_null({}, {})", index, engine_type))
    }

    fn set_boolean(&mut self, index: usize, value: bool) -> NativeResult<()> {
        self.record(format!("set_boolean({}, {})", index, value))
    }

    fn set_byte(&mut self, index: usize, value: i8) -> NativeResult<()> {
        self.record(format!("set_byte({}, {})", index, value))
    }

    fn set_short(&mut self, index: usize, value: i16) -> NativeResult<()> {
        self.record(format!("set_short({}, {})", index, value))
    }

    fn set_int(&mut self, index: usize, value: i32) -> NativeResult<()> {
        self.record(format!("set_int({}, {})", index, value))
    }

    fn set_long(&mut self, index: usize, value: i64) -> NativeResult<()> {
        self.record(format!("set_long({}, {})", index, value))
    }

    fn set_float(&mut self, index: usize, value: f32) -> NativeResult<()> {
        self.record(format!("set_float({}, {})", index, value))
    }

    fn set_double(&mut self, index: usize, value: f64) -> NativeResult<()> {
        self.record(format!("set_double({}, {})", index, value))
    }

    fn set_decimal(&mut self, index: usize, value: &NativeDecimal) -> NativeResult<()> {
        self.record(format!("set_decimal({}, {})", index, value))
    }

    fn set_string(&mut self, index: usize, value: &str) -> NativeResult<()> {
        self.record(format!("set_string({}, {:?})", index, value))
    }

    fn set_bytes(&mut self, index: usize, value: &[u8]) -> NativeResult<()> {
        self.record(format!("set_bytes({}, {:?})", index, value))
    }

    fn set_date(&mut self, index: usize, value: NaiveDate) -> NativeResult<()> {
        self.record(format!("set_date({}, {})", index, value))
    }

    fn set_time(&mut self, index: usize, value: NaiveTime) -> NativeResult<()> {
        self.record(format!("set_time({}, {})", index, value))
    }

    fn set_timestamp(&mut self, index: usize, value: NaiveDateTime) -> NativeResult<()> {
        self.record(format!("set_timestamp({}, {})", index, value))
    }

    fn set_time_tz(&mut self, index: usize, value: OffsetTime) -> NativeResult<()> {
        self.record(format!("set_time_tz({}, {})", index, value))
    }

    fn set_timestamp_tz(&mut self, index: usize, value: DateTime<FixedOffset>) -> NativeResult<()> {
        self.record(format!("set_timestamp_tz({}, {})", index, value.to_rfc3339()))
    }

    fn set_uuid(&mut self, index: usize, value: Uuid) -> NativeResult<()> {
        self.record(format!("set_uuid({}, {})", index, value))
    }

    fn set_xml(&mut self, index: usize, value: &str) -> NativeResult<()> {
        self.record(format!("set_xml({}, {:?})", index, value))
    }

    fn set_array(&mut self, index: usize, value: &[TypedValue]) -> NativeResult<()> {
        self.record(format!("set_array({}, {} items)", index, value.len()))
    }

    fn set_binary_stream(
        &mut self,
        index: usize,
        value: Box<dyn Read>,
        length: Option<u64>,
    ) -> NativeResult<()> {
        let data = drain(value)?;
        self.record(format!(
            "set_binary_stream({}, {:?}, {:?})",
            index, data, length
        ))
    }

    fn set_character_stream(
        &mut self,
        index: usize,
        value: Box<dyn Read>,
        length: Option<u64>,
    ) -> NativeResult<()> {
        let data = drain(value)?;
        let text = String::from_utf8(data).map_err(|e| NativeError::new(17002, e.to_string()))?;
        self.record(format!(
            "set_character_stream({}, {:?}, {:?})",
            index, text, length
        ))
    }

    fn supports_output_parameters(&self) -> bool {
        self.output_support
    }

    fn register_output_parameter(
        &mut self,
        index: usize,
        engine_type: i32,
        scale: Option<u32>,
    ) -> NativeResult<()> {
        self.record(format!(
            "register_output_parameter({}, {}, {:?})",
            index, engine_type, scale
        ))
    }
}
