//! Logical and persistence schema views of a prepared statement
//!
//! A [`LogicalSchema`] is the key/value column view of a source's declared
//! column list. A [`PersistenceSchema`] is the physical serialization view
//! of its value side: the value columns plus the serde feature flags that
//! control how they are laid out on the wire.

use crate::rillsql::serialization::SerdeFeatures;
use crate::rillsql::sql::ast::{ColumnDef, DataType};

/// One resolved column of a source.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    /// Column name
    pub name: String,
    /// Resolved SQL type (no remaining aliases)
    pub data_type: DataType,
    /// Whether the column belongs to the message key
    pub key: bool,
    /// Whether the column admits NULL values
    pub nullable: bool,
}

/// Key/value column view over a source's declared column list.
#[derive(Debug, Clone, PartialEq)]
pub struct LogicalSchema {
    columns: Vec<Column>,
}

impl LogicalSchema {
    /// Build the logical schema from a prepared statement's column list.
    pub fn from_columns(columns: &[ColumnDef]) -> Self {
        Self {
            columns: columns
                .iter()
                .map(|c| Column {
                    name: c.name.clone(),
                    data_type: c.data_type.clone(),
                    key: c.key,
                    nullable: c.nullable,
                })
                .collect(),
        }
    }

    /// All columns in declaration order.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// The key columns, in declaration order.
    pub fn key(&self) -> Vec<Column> {
        self.columns.iter().filter(|c| c.key).cloned().collect()
    }

    /// The value columns, in declaration order.
    pub fn value(&self) -> Vec<Column> {
        self.columns.iter().filter(|c| !c.key).cloned().collect()
    }

    /// Whether the value side has no columns at all.
    pub fn value_is_empty(&self) -> bool {
        self.columns.iter().all(|c| c.key)
    }
}

/// Physical serialization view of a value schema: the value columns plus
/// the feature flags controlling their wire layout.
#[derive(Debug, Clone, PartialEq)]
pub struct PersistenceSchema {
    columns: Vec<Column>,
    features: SerdeFeatures,
}

impl PersistenceSchema {
    /// Combine value columns with serde feature flags.
    pub fn from(columns: Vec<Column>, features: SerdeFeatures) -> Self {
        Self { columns, features }
    }

    /// The value columns.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// The serde feature flags.
    pub fn features(&self) -> SerdeFeatures {
        self.features
    }
}
