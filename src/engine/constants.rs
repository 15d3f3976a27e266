//! Engine column type codes.
//!
//! These are the integer codes the execution engine reports for column
//! types and expects for `set_null` / output parameter registration.

pub const ENGINE_TYPE_BIT: i32 = -7;
pub const ENGINE_TYPE_TINYINT: i32 = -6;
pub const ENGINE_TYPE_SMALLINT: i32 = 5;
pub const ENGINE_TYPE_INTEGER: i32 = 4;
pub const ENGINE_TYPE_BIGINT: i32 = -5;
pub const ENGINE_TYPE_FLOAT: i32 = 6;
pub const ENGINE_TYPE_REAL: i32 = 7;
pub const ENGINE_TYPE_DOUBLE: i32 = 8;
pub const ENGINE_TYPE_NUMERIC: i32 = 2;
pub const ENGINE_TYPE_DECIMAL: i32 = 3;
pub const ENGINE_TYPE_CHAR: i32 = 1;
pub const ENGINE_TYPE_VARCHAR: i32 = 12;
pub const ENGINE_TYPE_LONGVARCHAR: i32 = -1;
pub const ENGINE_TYPE_DATE: i32 = 91;
pub const ENGINE_TYPE_TIME: i32 = 92;
pub const ENGINE_TYPE_TIMESTAMP: i32 = 93;
pub const ENGINE_TYPE_BINARY: i32 = -2;
pub const ENGINE_TYPE_VARBINARY: i32 = -3;
pub const ENGINE_TYPE_LONGVARBINARY: i32 = -4;
pub const ENGINE_TYPE_NULL: i32 = 0;
pub const ENGINE_TYPE_OTHER: i32 = 1111;
pub const ENGINE_TYPE_JAVA_OBJECT: i32 = 2000;
pub const ENGINE_TYPE_DISTINCT: i32 = 2001;
pub const ENGINE_TYPE_STRUCT: i32 = 2002;
pub const ENGINE_TYPE_ARRAY: i32 = 2003;
pub const ENGINE_TYPE_BLOB: i32 = 2004;
pub const ENGINE_TYPE_CLOB: i32 = 2005;
pub const ENGINE_TYPE_REF: i32 = 2006;
pub const ENGINE_TYPE_DATALINK: i32 = 70;
pub const ENGINE_TYPE_BOOLEAN: i32 = 16;
pub const ENGINE_TYPE_ROWID: i32 = -8;
pub const ENGINE_TYPE_NCHAR: i32 = -15;
pub const ENGINE_TYPE_NVARCHAR: i32 = -9;
pub const ENGINE_TYPE_LONGNVARCHAR: i32 = -16;
pub const ENGINE_TYPE_NCLOB: i32 = 2011;
pub const ENGINE_TYPE_SQLXML: i32 = 2009;
pub const ENGINE_TYPE_REF_CURSOR: i32 = 2012;
pub const ENGINE_TYPE_TIME_WITH_TIMEZONE: i32 = 2013;
pub const ENGINE_TYPE_TIMESTAMP_WITH_TIMEZONE: i32 = 2014;

/// Engine error code for a column name the cursor does not know.
pub const ENGINE_ERROR_INVALID_COLUMN_NAME: i32 = 17006;

/// Ordinal of the first column/parameter on the engine side.
pub const ENGINE_ORDINAL_BASE: usize = 1;

/// Largest scale a fixed decimal can carry.
pub const FIXED_DECIMAL_MAX_SCALE: u32 = 28;

/// Largest magnitude, in bits, a fixed decimal can carry.
pub const FIXED_DECIMAL_MAX_BITS: u64 = 96;

/// Default size of pooled transfer buffers.
pub const DEFAULT_BUFFER_SIZE: usize = 8192;

/// Default pushback capacity for character readers.
pub const DEFAULT_PUSHBACK_CAPACITY: usize = 1;

/// Read limit passed to the engine when the bridge marks a stream origin.
pub const MARK_READ_LIMIT: usize = i32::MAX as usize;
