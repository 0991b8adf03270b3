//! # category-gen
//!
//! Categorical encoding for tabular machine learning: fit a per-column
//! vocabulary on training data, then recode every later table against that
//! frozen vocabulary so category indices stay consistent across calls.
//!
//! ## Core Design Principles
//!
//! - **Frozen Vocabularies**: The category map is built once by `fit` and only
//!   read afterwards; values outside it become the missing code, never an error.
//! - **Training/Inference Separation**: `CategoryGenerator` holds configuration,
//!   `FittedCategoryGenerator` holds the learned state.
//! - **Explicit Coercion**: Every column reaches the categorical form through a
//!   single conversion, [`table::Column::to_categorical`].
//!
//! ## Quick Start
//!
//! ```rust
//! use category_gen::preprocessing::{CategoryGenerator, FittedGenerator, Generator};
//! use category_gen::table::{Column, FeatureMetadata, Table};
//!
//! let train = Table::new(vec![("city", Column::from_strs(["Oslo", "Lima", "Oslo"]))]).unwrap();
//! let metadata = FeatureMetadata::from_table(&train);
//!
//! let (fitted, train_out) = CategoryGenerator::new()
//!     .with_minimum_cat_count(2)
//!     .fit_transform(&train, &metadata)
//!     .unwrap();
//! assert_eq!(train_out.n_columns(), 1);
//!
//! let test = Table::new(vec![("city", Column::from_strs(["Lima"]))]).unwrap();
//! let test_out = fitted.transform(&test).unwrap();
//! assert_eq!(test_out.n_rows(), 1);
//! ```
//!
//! ## Module Structure
//!
//! - `table`: Tables, columns, categorical codes and column-type metadata
//! - `preprocessing`: Generators, category maps, post-processing steps, errors
//! - `serialization`: Byte-level (de)serialization of fitted parameters

/// Feature generators and their post-processing steps.
pub mod preprocessing;

/// Parameter persistence formats.
pub mod serialization;

/// In-memory tables and column metadata.
pub mod table;

pub use preprocessing::{
    CatOrder, CategoryGenerator, CategoryMap, FittedCategoryGenerator, FittedGenerator, Generator,
    PreprocessingError,
};
pub use table::{Categorical, Column, FeatureMetadata, Table, Vocabulary, MISSING_CODE};
