//! Write-Path Data Types
//!
//! The column-store data model as the bridge sees it: the composite input
//! key, individual columns, and the per-row column family buffer.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Composite key for one incoming triple.
///
/// The upstream batch framework delivers triples sorted by this key's
/// derived ordering: row key first, then super column, then column name.
/// All triples for one row key must arrive contiguously; the accumulator
/// relies on that contract and cannot detect a violation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub struct RowColumn {
    pub row_key: String,
    pub super_column: Option<Vec<u8>>,
    pub column_name: Vec<u8>,
}

impl RowColumn {
    pub fn new(row_key: impl Into<String>, column_name: impl Into<Vec<u8>>) -> Self {
        Self {
            row_key: row_key.into(),
            super_column: None,
            column_name: column_name.into(),
        }
    }

    pub fn with_super(
        row_key: impl Into<String>,
        super_column: impl Into<Vec<u8>>,
        column_name: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            row_key: row_key.into(),
            super_column: Some(super_column.into()),
            column_name: column_name.into(),
        }
    }
}

/// Position of a column inside its family.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub struct ColumnKey {
    pub super_column: Option<Vec<u8>>,
    pub name: Vec<u8>,
}

/// A single column value. Tombstone is always false on the import path;
/// the field exists because the receiving mutation format carries it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Column {
    pub name: Vec<u8>,
    pub value: Vec<u8>,
    pub timestamp: i64,
    pub tombstone: bool,
}

/// The per-row buffer: a named, ordered collection of columns.
///
/// Created empty when a new row key is first seen, appended to while the
/// row's triples stream in, then handed off whole to the message builder
/// and never touched again.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ColumnFamily {
    pub name: String,
    pub columns: BTreeMap<ColumnKey, Column>,
}

impl ColumnFamily {
    pub fn create(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: BTreeMap::new(),
        }
    }

    /// Append one column. A repeated (super column, name) pair overwrites
    /// the earlier value, matching the store's own column semantics.
    pub fn add_column(
        &mut self,
        super_column: Option<Vec<u8>>,
        name: Vec<u8>,
        value: Vec<u8>,
        timestamp: i64,
    ) {
        let key = ColumnKey {
            super_column,
            name: name.clone(),
        };
        self.columns.insert(
            key,
            Column {
                name,
                value,
                timestamp,
                tombstone: false,
            },
        );
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }
}
