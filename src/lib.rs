//! SQL value bridge
//!
//! Marshals values between a dynamically typed, blocking SQL execution engine
//! and a statically typed, row-at-a-time reader API. Engine column type codes
//! collapse into a fixed set of categories; each category admits a fixed set
//! of representations on read. Large binary and character values are exposed
//! as seek-aware streams over the engine's one-shot pull streams.
//!
//! The engine itself is supplied by the caller through the traits in
//! [`engine`].
//!
//! # Example
//!
//! ```no_run
//! use sql_bridge::engine::NativeResultSet;
//! use sql_bridge::{DataReader, ReaderConfig, Result, ZonePolicy};
//!
//! fn total_size<R: NativeResultSet>(rs: R) -> Result<u64> {
//!     let config = ReaderConfig::parse("zone=+02:00;buffer_size=4096")?;
//!     assert!(matches!(config.zone_policy, ZonePolicy::Fixed(_)));
//!     let mut reader = DataReader::with_config(rs, config);
//!
//!     let mut total = 0;
//!     while reader.read()? {
//!         let id = reader.get_i64(0)?;
//!         if reader.is_db_null(1)? {
//!             continue;
//!         }
//!         let mut blob = reader.get_blob(1)?;
//!         let size = blob.length()?;
//!         println!("{} -> {} bytes", id, size);
//!         total += size;
//!     }
//!     reader.close()?;
//!     Ok(total)
//! }
//! ```

pub mod binder;
pub mod config;
pub mod decode;
pub mod engine;
pub mod error;
pub mod reader;
pub mod stream;
pub mod types;

// Re-export main types
pub use binder::{bind_all, bind_parameter, DbType, Direction, ParamValue, Parameter};
pub use config::{ReaderConfig, ZonePolicy};
pub use decode::{from_fixed, to_fixed, NativeDecimal};
pub use error::{Error, Result};
pub use reader::DataReader;
pub use stream::{Blob, ByteStream, Clob, TextReader};
pub use types::{
    ColumnDescriptor, ColumnInfo, OffsetTime, Representation, SqlTypeCode, TypedValue,
};
