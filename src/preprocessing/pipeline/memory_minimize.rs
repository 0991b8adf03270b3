//! Category label compaction.

use crate::preprocessing::error::Result;
use crate::preprocessing::pipeline::TableStep;
use crate::table::{Column, Table, Vocabulary};
use std::collections::HashMap;

/// Replaces every categorical column's labels with their positional index
/// (`"0"`, `"1"`, ...). Codes are unchanged, so the encoding stays identical
/// while the original label strings are dropped from the output.
///
/// Non-categorical columns pass through. Operates in place on the table it
/// is handed; columns with the same number of categories share one positional
/// vocabulary.
#[derive(Clone, Copy, Debug, Default)]
pub struct CategoryMemoryMinimize;

impl CategoryMemoryMinimize {
    pub fn new() -> Self {
        Self
    }
}

impl TableStep for CategoryMemoryMinimize {
    fn transform(&self, mut data: Table) -> Result<Table> {
        let mut positional: HashMap<usize, Vocabulary> = HashMap::new();
        for (_, column) in data.columns_mut() {
            if let Column::Category(categorical) = column {
                let n_categories = categorical.categories().len();
                let positions = positional
                    .entry(n_categories)
                    .or_insert_with(|| (0..n_categories).map(|i| i.to_string()).collect())
                    .clone();
                *categorical = std::mem::take(categorical).rename_categories(positions)?;
            }
        }
        Ok(data)
    }

    fn step_name(&self) -> &'static str {
        "CategoryMemoryMinimize"
    }
}
