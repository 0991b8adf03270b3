//! In-memory tables of named, row-aligned columns.
//!
//! A [`Table`] is the unit every generator consumes and produces. Columns are
//! kept in insertion order and looked up by name; all columns share the
//! table's row index.
//!
//! # Example
//! ```
//! use category_gen::table::{Column, Table};
//!
//! let table = Table::new(vec![
//!     ("city", Column::from_strs(["Oslo", "Lima", "Oslo"])),
//!     ("age", Column::Int(vec![Some(31), None, Some(45)])),
//! ])
//! .unwrap();
//!
//! assert_eq!(table.n_rows(), 3);
//! assert!(table.column("city").is_ok());
//! assert!(table.column("zip").is_err());
//! ```

mod column;
mod metadata;

pub use column::{Categorical, Column, Vocabulary, MISSING_CODE};
pub use metadata::{
    FeatureMetadata, R_CATEGORY, R_FLOAT, R_INT, R_OBJECT, S_DATETIME_AS_OBJECT, S_TEXT,
    S_TEXT_AS_CATEGORY,
};

use crate::preprocessing::error::{PreprocessingError, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Ordered collection of named columns over a shared row index.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    index: Vec<i64>,
    columns: IndexMap<String, Column>,
}

impl Table {
    /// Build a table with a default `0..n` row index.
    ///
    /// # Errors
    /// Returns [`PreprocessingError::LengthMismatch`] if columns differ in
    /// length, or [`PreprocessingError::DuplicateColumn`] on a repeated name.
    pub fn new<S: Into<String>>(columns: Vec<(S, Column)>) -> Result<Self> {
        let n_rows = columns.first().map(|(_, c)| c.len()).unwrap_or(0);
        Self::with_index((0..n_rows as i64).collect(), columns)
    }

    /// Build a table with an explicit row index.
    pub fn with_index<S: Into<String>>(index: Vec<i64>, columns: Vec<(S, Column)>) -> Result<Self> {
        let mut table = Self::empty(index);
        for (name, column) in columns {
            let name = name.into();
            if table.columns.contains_key(&name) {
                return Err(PreprocessingError::DuplicateColumn(name));
            }
            table.insert(name, column)?;
        }
        Ok(table)
    }

    /// Table with the given row index and no columns.
    pub fn empty(index: Vec<i64>) -> Self {
        Self {
            index,
            columns: IndexMap::new(),
        }
    }

    pub fn index(&self) -> &[i64] {
        &self.index
    }

    pub fn n_rows(&self) -> usize {
        self.index.len()
    }

    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    pub fn columns(&self) -> impl Iterator<Item = (&str, &Column)> {
        self.columns.iter().map(|(name, col)| (name.as_str(), col))
    }

    pub fn columns_mut(&mut self) -> impl Iterator<Item = (&str, &mut Column)> {
        self.columns.iter_mut().map(|(name, col)| (name.as_str(), col))
    }

    pub fn get(&self, name: &str) -> Option<&Column> {
        self.columns.get(name)
    }

    /// Look up a column by name.
    ///
    /// # Errors
    /// Returns [`PreprocessingError::MissingColumn`] if no column has that name.
    pub fn column(&self, name: &str) -> Result<&Column> {
        self.columns
            .get(name)
            .ok_or_else(|| PreprocessingError::MissingColumn(name.to_string()))
    }

    /// Insert or replace a column, keeping its position if it already exists.
    pub fn insert(&mut self, name: impl Into<String>, column: Column) -> Result<()> {
        let name = name.into();
        if column.len() != self.index.len() {
            return Err(PreprocessingError::LengthMismatch {
                column: name,
                expected: self.index.len(),
                got: column.len(),
            });
        }
        self.columns.insert(name, column);
        Ok(())
    }
}
