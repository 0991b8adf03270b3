//! Categorical encoding of object and category columns.
//!
//! # Available Generators
//!
//! ## CategoryGenerator
//! Fits a per-column vocabulary (the [`CategoryMap`]) on training data and
//! recodes every later table against that frozen vocabulary.
//!
//! ```ignore
//! // Training column: ["a", "a", "b", "c", "c", "c"], cat_order = count
//! // Vocabulary:      ["b", "a", "c"]   (ascending frequency)
//! // Test column:     ["c", "z"]  ->  codes [2, -1]
//! ```
//!
//! # Design Notes
//!
//! Vocabularies are built once by [`build_category_map`] and only read by
//! [`apply_category_map`]. Values outside a vocabulary are never an error;
//! they receive the missing code.

mod category;
mod category_map;

pub use category::{
    CategoryGenerator, CategoryGeneratorConfig, CategoryGeneratorParams, FittedCategoryGenerator,
};
pub use category_map::{apply_category_map, build_category_map, fit_column, CategoryMap};

use crate::preprocessing::error::PreprocessingError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Ordering policy for a fitted vocabulary.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CatOrder {
    /// Order of first appearance in the training data.
    #[default]
    Original,
    /// Lexicographic order of the labels.
    Alphanumeric,
    /// Ascending frequency in the training data.
    Count,
}

impl CatOrder {
    pub const ALL: [CatOrder; 3] = [CatOrder::Original, CatOrder::Alphanumeric, CatOrder::Count];

    pub fn as_str(&self) -> &'static str {
        match self {
            CatOrder::Original => "original",
            CatOrder::Alphanumeric => "alphanumeric",
            CatOrder::Count => "count",
        }
    }
}

impl fmt::Display for CatOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CatOrder {
    type Err = PreprocessingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CatOrder::ALL
            .into_iter()
            .find(|order| order.as_str() == s)
            .ok_or_else(|| {
                let allowed: Vec<&str> = CatOrder::ALL.iter().map(CatOrder::as_str).collect();
                PreprocessingError::InvalidParameter(format!(
                    "cat_order must be one of [{}], but was: {}",
                    allowed.join(", "),
                    s
                ))
            })
    }
}
