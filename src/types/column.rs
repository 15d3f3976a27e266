//! Column descriptors for a result cursor.
//!
//! Descriptors are computed once from the engine metadata, on first access,
//! and are immutable afterwards.

use crate::engine::{NativeResultSet, ENGINE_ORDINAL_BASE};
use crate::error::{Error, Result};

use super::representation::{canonical_representation, Representation};
use super::sql_type::SqlTypeCode;

/// A column in a result cursor.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDescriptor {
    /// 0-based ordinal.
    pub ordinal: usize,
    /// Canonical type category.
    pub sql_type: SqlTypeCode,
    /// Raw engine type code.
    pub engine_type: i32,
    /// Display name.
    pub name: String,
}

impl ColumnDescriptor {
    pub fn new(ordinal: usize, engine_type: i32, name: impl Into<String>) -> Self {
        Self {
            ordinal,
            sql_type: SqlTypeCode::from_engine_code(engine_type),
            engine_type,
            name: name.into(),
        }
    }

    /// Representation produced when the column is read without a target type.
    pub fn field_type(&self) -> Option<Representation> {
        canonical_representation(self.sql_type)
    }
}

/// Column information shared by every row of a cursor.
#[derive(Debug, Clone, Default)]
pub struct ColumnInfo {
    /// Column definitions.
    pub columns: Vec<ColumnDescriptor>,
}

impl ColumnInfo {
    /// Create new column info from descriptors.
    pub fn new(columns: Vec<ColumnDescriptor>) -> Self {
        Self { columns }
    }

    /// Query the engine for every column's type code and name.
    pub fn from_engine(rs: &dyn NativeResultSet) -> Result<Self> {
        let count = rs.column_count()?;
        let mut columns = Vec::with_capacity(count);
        for ordinal in 0..count {
            let engine_col = ordinal + ENGINE_ORDINAL_BASE;
            let engine_type = rs.column_type(engine_col)?;
            let name = rs.column_name(engine_col)?;
            columns.push(ColumnDescriptor::new(ordinal, engine_type, name));
        }
        Ok(Self { columns })
    }

    /// Get column names.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Get the number of columns.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Check if there are no columns.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Get column by ordinal.
    pub fn get(&self, ordinal: usize) -> Result<&ColumnDescriptor> {
        self.columns
            .get(ordinal)
            .ok_or(Error::ColumnIndexOutOfBounds {
                index: ordinal,
                count: self.columns.len(),
            })
    }

    /// Find column ordinal by name: exact match first, then case-insensitive.
    pub fn find_by_name(&self, name: &str) -> Option<usize> {
        self.columns
            .iter()
            .position(|c| c.name == name)
            .or_else(|| {
                self.columns
                    .iter()
                    .position(|c| c.name.eq_ignore_ascii_case(name))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::constants::{ENGINE_TYPE_BIGINT, ENGINE_TYPE_VARCHAR};

    fn make_test_info() -> ColumnInfo {
        ColumnInfo::new(vec![
            ColumnDescriptor::new(0, ENGINE_TYPE_BIGINT, "ID"),
            ColumnDescriptor::new(1, ENGINE_TYPE_VARCHAR, "NAME"),
            ColumnDescriptor::new(2, ENGINE_TYPE_VARCHAR, "name"),
        ])
    }

    #[test]
    fn test_descriptor_from_engine_code() {
        let col = ColumnDescriptor::new(0, ENGINE_TYPE_BIGINT, "ID");
        assert_eq!(col.sql_type, SqlTypeCode::BigInt);
        assert_eq!(col.field_type(), Some(Representation::Int64));
    }

    #[test]
    fn test_find_by_name_prefers_exact_match() {
        let info = make_test_info();
        assert_eq!(info.find_by_name("name"), Some(2));
        assert_eq!(info.find_by_name("NAME"), Some(1));
        assert_eq!(info.find_by_name("id"), Some(0));
        assert_eq!(info.find_by_name("UNKNOWN"), None);
    }

    #[test]
    fn test_get_out_of_bounds() {
        let info = make_test_info();
        assert!(matches!(
            info.get(3),
            Err(Error::ColumnIndexOutOfBounds { index: 3, count: 3 })
        ));
    }
}
