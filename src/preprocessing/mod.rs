//! Feature generators for tabular machine learning pipelines.
//!
//! Generators follow a fitted/unfitted split: an unfitted generator holds
//! configuration, fitting it on a training table yields a fitted generator
//! that recodes any later table the same way.
//!
//! # Design Philosophy
//!
//! - **Build once, read many**: fitted state is built during `fit` and never
//!   mutated by `transform`
//! - **Serializable**: fitted generators can be saved and loaded
//! - **Composable**: post-processing steps are chained as trait objects
//!
//! # Core Traits
//!
//! - [`Generator`]: Unfitted generator with configuration
//! - [`FittedGenerator`]: Fitted generator ready for inference
//! - [`TableStep`]: Post-processing step run on generator output
//!
//! # Available Generators
//!
//! ## Encoding
//! - [`CategoryGenerator`]: Frozen per-column vocabularies for object and
//!   category columns
//!
//! ## Post-processing
//! - [`CategoryMemoryMinimize`]: Replace category labels with positional indices
//!
//! # Example
//!
//! ```
//! use category_gen::preprocessing::{CatOrder, CategoryGenerator, FittedGenerator, Generator};
//! use category_gen::table::{Column, FeatureMetadata, Table, MISSING_CODE};
//!
//! let train = Table::new(vec![("color", Column::from_strs(["a", "a", "b", "c", "c", "c"]))])?;
//! let metadata = FeatureMetadata::from_table(&train);
//!
//! let generator = CategoryGenerator::new()
//!     .with_cat_order(CatOrder::Count)
//!     .with_minimize_memory(false);
//! let (fitted, _) = generator.fit_transform(&train, &metadata)?;
//!
//! let vocabulary = fitted.category_map().and_then(|m| m.get("color")).unwrap();
//! assert_eq!(vocabulary.as_slice(), &["b", "a", "c"]);
//!
//! let test = Table::new(vec![("color", Column::from_strs(["c", "unseen"]))])?;
//! let out = fitted.transform(&test)?;
//! let codes = out.column("color")?.as_categorical().unwrap().codes();
//! assert_eq!(codes, &[2, MISSING_CODE]);
//! # Ok::<(), category_gen::preprocessing::PreprocessingError>(())
//! ```

pub mod encoding;
pub mod error;
pub mod pipeline;
pub mod traits;

// Re-export main types
pub use encoding::{
    apply_category_map, build_category_map, fit_column, CatOrder, CategoryGenerator,
    CategoryGeneratorConfig, CategoryGeneratorParams, CategoryMap, FittedCategoryGenerator,
};
pub use error::{PreprocessingError, Result};
pub use pipeline::{CategoryMemoryMinimize, PostChain, TableStep};
pub use traits::{FittedGenerator, Generator};
