//! Canonical type model: type codes, representations, values and columns.

mod column;
mod representation;
mod sql_type;
mod value;

pub use column::{ColumnDescriptor, ColumnInfo};
pub use representation::{
    allowed_representations, canonical_representation, check_representation, Representation,
};
pub use sql_type::SqlTypeCode;
pub use value::{OffsetTime, TypedValue};
