//! Category generator: stateful categorical encoding of object/category columns.
//!
//! # Example
//! ```ignore
//! use category_gen::preprocessing::{CatOrder, CategoryGenerator, FittedGenerator, Generator};
//!
//! let generator = CategoryGenerator::new()
//!     .with_cat_order(CatOrder::Count)
//!     .with_minimum_cat_count(2);
//!
//! let (fitted, train_out) = generator.fit_transform(&train, &metadata)?;
//!
//! // Later tables are recoded against the frozen vocabularies.
//! let test_out = fitted.transform(&test)?;
//! fitted.save_to_file("categories.bin")?;
//! ```

use crate::preprocessing::encoding::category_map::{
    apply_category_map, build_category_map, CategoryMap,
};
use crate::preprocessing::encoding::CatOrder;
use crate::preprocessing::error::{PreprocessingError, Result};
use crate::preprocessing::pipeline::{CategoryMemoryMinimize, PostChain, TableStep};
use crate::preprocessing::traits::{FittedGenerator, Generator};
use crate::table::{FeatureMetadata, Table, R_CATEGORY};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

/// Configuration for CategoryGenerator.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryGeneratorConfig {
    /// If true, the vocabulary fitted on training data is frozen and reused.
    pub stateful_categories: bool,
    /// If true, category labels are compacted after every transform.
    pub minimize_memory: bool,
    /// Ordering of each fitted vocabulary.
    pub cat_order: CatOrder,
    /// Drop categories seen fewer times than this. Always `None` or `> 1`.
    pub minimum_cat_count: Option<usize>,
    /// Keep at most this many of the most frequent categories. Never `Some(0)`.
    pub maximum_num_cat: Option<usize>,
}

impl Default for CategoryGeneratorConfig {
    fn default() -> Self {
        Self {
            stateful_categories: true,
            minimize_memory: true,
            cat_order: CatOrder::Original,
            minimum_cat_count: None,
            maximum_num_cat: None,
        }
    }
}

/// Configuration as written by users; `cat_order` is validated on conversion.
#[derive(Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    stateful_categories: bool,
    minimize_memory: bool,
    cat_order: String,
    minimum_cat_count: Option<i64>,
    maximum_num_cat: Option<i64>,
}

impl Default for ConfigFile {
    fn default() -> Self {
        let defaults = CategoryGeneratorConfig::default();
        Self {
            stateful_categories: defaults.stateful_categories,
            minimize_memory: defaults.minimize_memory,
            cat_order: defaults.cat_order.to_string(),
            minimum_cat_count: None,
            maximum_num_cat: None,
        }
    }
}

impl CategoryGeneratorConfig {
    /// Parse a JSON configuration. Missing keys take their defaults.
    ///
    /// # Errors
    /// Returns [`PreprocessingError::InvalidParameter`] for an unknown
    /// `cat_order` or a negative `maximum_num_cat`, and
    /// [`PreprocessingError::SerializationError`] for malformed JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        let file: ConfigFile = serde_json::from_str(json)?;
        let maximum_num_cat = match file.maximum_num_cat {
            Some(n) if n < 0 => {
                return Err(PreprocessingError::InvalidParameter(format!(
                    "maximum_num_cat must be non-negative, but was: {}",
                    n
                )))
            }
            other => other.map(|n| n as usize),
        };
        let config = Self {
            stateful_categories: file.stateful_categories,
            minimize_memory: file.minimize_memory,
            cat_order: file.cat_order.parse()?,
            // Counts of one or less filter nothing.
            minimum_cat_count: file
                .minimum_cat_count
                .filter(|&n| n > 1)
                .map(|n| n as usize),
            maximum_num_cat,
        };
        Ok(config.normalized())
    }

    /// Disable thresholds that cannot filter anything.
    pub fn normalized(mut self) -> Self {
        self.minimum_cat_count = self.minimum_cat_count.filter(|&n| n > 1);
        self.maximum_num_cat = self.maximum_num_cat.filter(|&n| n > 0);
        self
    }

    /// Whether fitting ranks categories by frequency.
    pub fn requires_ranking(&self) -> bool {
        self.cat_order == CatOrder::Count
            || self.minimum_cat_count.is_some()
            || self.maximum_num_cat.is_some()
    }
}

/// CategoryGenerator (unfitted).
///
/// Selects object and category columns, fits a frozen vocabulary per column
/// and recodes tables against it.
#[derive(Clone, Debug)]
pub struct CategoryGenerator {
    config: CategoryGeneratorConfig,
    post_steps: Vec<Arc<dyn TableStep>>,
}

impl Default for CategoryGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl CategoryGenerator {
    /// Create a new CategoryGenerator with default configuration.
    pub fn new() -> Self {
        Self::from_config(CategoryGeneratorConfig::default())
    }

    /// Create a CategoryGenerator from an explicit configuration.
    pub fn from_config(config: CategoryGeneratorConfig) -> Self {
        Self {
            config: config.normalized(),
            post_steps: Vec::new(),
        }
    }

    /// Create a CategoryGenerator from a JSON configuration.
    pub fn from_json(json: &str) -> Result<Self> {
        CategoryGeneratorConfig::from_json(json).map(Self::from_config)
    }

    pub fn config(&self) -> &CategoryGeneratorConfig {
        &self.config
    }

    /// Set whether the fitted vocabulary is kept and reused.
    pub fn with_stateful_categories(mut self, stateful: bool) -> Self {
        self.config.stateful_categories = stateful;
        self
    }

    /// Set whether category labels are compacted after each transform.
    pub fn with_minimize_memory(mut self, minimize: bool) -> Self {
        self.config.minimize_memory = minimize;
        self
    }

    pub fn with_cat_order(mut self, order: CatOrder) -> Self {
        self.config.cat_order = order;
        self
    }

    /// Drop categories seen fewer than `count` times. `count <= 1` disables the filter.
    pub fn with_minimum_cat_count(mut self, count: usize) -> Self {
        self.config.minimum_cat_count = Some(count).filter(|&n| n > 1);
        self
    }

    /// Keep only the `count` most frequent categories. `0` disables the cap.
    pub fn with_maximum_num_cat(mut self, count: usize) -> Self {
        self.config.maximum_num_cat = Some(count).filter(|&n| n > 0);
        self
    }

    /// Append a post-processing step run on every output table.
    pub fn with_post_step(mut self, step: Arc<dyn TableStep>) -> Self {
        self.post_steps.push(step);
        self
    }
}

fn post_chain(config: &CategoryGeneratorConfig, steps: &[Arc<dyn TableStep>]) -> PostChain {
    let mut chain: PostChain = steps.iter().cloned().collect();
    if config.minimize_memory {
        chain.prepend(Arc::new(CategoryMemoryMinimize::new()));
    }
    chain
}

/// Output metadata: every feature is categorical, `text` becomes `text_as_category`.
fn metadata_out(features_in: &[String], metadata_in: &FeatureMetadata) -> FeatureMetadata {
    let mut type_group_map_raw = IndexMap::new();
    if !features_in.is_empty() {
        type_group_map_raw.insert(R_CATEGORY.to_string(), features_in.to_vec());
    }
    FeatureMetadata {
        type_group_map_raw,
        type_group_map_special: metadata_in.text_as_category_special_map(),
    }
}

impl Generator for CategoryGenerator {
    type Params = CategoryGeneratorParams;
    type Fitted = FittedCategoryGenerator;

    fn fit_transform(
        &self,
        data: &Table,
        metadata: &FeatureMetadata,
    ) -> Result<(Self::Fitted, Table)> {
        let features_in = metadata.select_category_features();

        let (output, category_map) = if self.config.stateful_categories {
            build_category_map(data, &features_in, &self.config)?
        } else {
            debug!(
                columns = features_in.len(),
                "stateless categories; coercing without a category map"
            );
            (apply_category_map(data, &features_in, None)?, None)
        };

        let fitted = FittedCategoryGenerator {
            config: self.config.clone(),
            metadata_out: metadata_out(&features_in, metadata),
            features_in,
            category_map,
            post_chain: post_chain(&self.config, &self.post_steps),
        };
        let output = fitted.post_chain.run(output)?;

        Ok((fitted, output))
    }
}

/// Serializable parameters for a fitted CategoryGenerator.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CategoryGeneratorParams {
    /// Configuration options.
    pub config: CategoryGeneratorConfig,
    /// Input features selected during fit.
    pub features_in: Vec<String>,
    /// Frozen vocabularies (`None` when stateless or no feature qualified).
    pub category_map: Option<CategoryMap>,
    /// Metadata describing the output features.
    pub metadata_out: FeatureMetadata,
}

/// Fitted CategoryGenerator ready for inference.
#[derive(Clone, Debug)]
pub struct FittedCategoryGenerator {
    config: CategoryGeneratorConfig,
    features_in: Vec<String>,
    category_map: Option<CategoryMap>,
    metadata_out: FeatureMetadata,
    post_chain: PostChain,
}

impl FittedCategoryGenerator {
    pub fn config(&self) -> &CategoryGeneratorConfig {
        &self.config
    }

    /// The frozen vocabularies, if any were built.
    pub fn category_map(&self) -> Option<&CategoryMap> {
        self.category_map.as_ref()
    }

    /// Metadata describing the output features.
    pub fn metadata_out(&self) -> &FeatureMetadata {
        &self.metadata_out
    }

    /// Names of the post steps, in the order they run.
    pub fn post_step_names(&self) -> Vec<&'static str> {
        self.post_chain.step_names()
    }

    /// Append a post-processing step, e.g. after loading from params.
    pub fn with_post_step(mut self, step: Arc<dyn TableStep>) -> Self {
        self.post_chain.push(step);
        self
    }
}

impl FittedGenerator for FittedCategoryGenerator {
    type Params = CategoryGeneratorParams;

    fn transform(&self, data: &Table) -> Result<Table> {
        let output = apply_category_map(data, &self.features_in, self.category_map.as_ref())?;
        self.post_chain.run(output)
    }

    fn features_in(&self) -> &[String] {
        &self.features_in
    }

    fn extract_params(&self) -> Self::Params {
        CategoryGeneratorParams {
            config: self.config.clone(),
            features_in: self.features_in.clone(),
            category_map: self.category_map.clone(),
            metadata_out: self.metadata_out.clone(),
        }
    }

    fn from_params(params: Self::Params) -> Result<Self> {
        if let Some(map) = &params.category_map {
            let is_input = |column: &str| params.features_in.iter().any(|f| f == column);
            if let Some(unknown) = map.columns().find(|&c| !is_input(c)) {
                return Err(PreprocessingError::InvalidParameter(format!(
                    "category map column '{}' is not an input feature",
                    unknown
                )));
            }
        }
        let config = params.config.normalized();
        Ok(Self {
            post_chain: post_chain(&config, &[]),
            config,
            features_in: params.features_in,
            category_map: params.category_map,
            metadata_out: params.metadata_out,
        })
    }
}
