//! Core traits for feature generators.
//!
//! This module defines the two central traits:
//! - [`Generator`]: Used during fitting; holds configuration and learns from data.
//! - [`FittedGenerator`]: After fitting; transforms new tables and can be serialized.

use crate::preprocessing::error::{PreprocessingError, Result};
use crate::serialization::SerializableParams;
use crate::table::{FeatureMetadata, Table};

/// Trait for unfitted generators with configuration.
///
/// # Example
/// ```ignore
/// use category_gen::preprocessing::{CategoryGenerator, Generator, FittedGenerator};
///
/// let generator = CategoryGenerator::new();
/// let (fitted, train_out) = generator.fit_transform(&train, &metadata)?;
/// let test_out = fitted.transform(&test)?;
/// ```
pub trait Generator: Clone {
    /// Serializable representation of the fitted state.
    type Params: SerializableParams;
    /// The fitted generator type ready for inference.
    type Fitted: FittedGenerator<Params = Self::Params>;

    /// Fit the generator to a training table.
    ///
    /// `metadata` groups the table's columns by raw dtype and special tag; the
    /// generator selects its input features from it.
    fn fit(&self, data: &Table, metadata: &FeatureMetadata) -> Result<Self::Fitted> {
        self.fit_transform(data, metadata).map(|(fitted, _)| fitted)
    }

    /// Fit the generator and return it together with the transformed training table.
    ///
    /// The training output comes from the fitting pass itself; no second
    /// `transform` is run over `data`.
    fn fit_transform(
        &self,
        data: &Table,
        metadata: &FeatureMetadata,
    ) -> Result<(Self::Fitted, Table)>;
}

/// Trait for fitted generators ready for inference.
///
/// # Guarantees
/// - `extract_params()` + `from_params()` is a round-trip.
/// - `transform` never mutates the fitted state.
pub trait FittedGenerator: Clone {
    /// Serializable representation of the fitted state.
    type Params: SerializableParams;

    /// Transform a table using the fitted state.
    ///
    /// # Errors
    /// Returns [`PreprocessingError::MissingColumn`] if an input feature seen
    /// during fit is absent from `data`.
    fn transform(&self, data: &Table) -> Result<Table>;

    /// Names of the input features selected during fit, in output order.
    fn features_in(&self) -> &[String];

    /// Extract the fitted state as a serializable representation.
    fn extract_params(&self) -> Self::Params;

    /// Reconstruct a fitted generator from parameters.
    fn from_params(params: Self::Params) -> Result<Self>
    where
        Self: Sized;

    /// Save the fitted generator to a file.
    fn save_to_file<P: AsRef<std::path::Path>>(&self, path: P) -> Result<()> {
        let bytes = self
            .extract_params()
            .to_bytes()
            .map_err(|e| PreprocessingError::SerializationError(e.to_string()))?;
        std::fs::write(path, bytes)?;
        Ok(())
    }

    /// Load a fitted generator from a file.
    fn load_from_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self>
    where
        Self: Sized,
    {
        let bytes = std::fs::read(path)?;
        let params = Self::Params::from_bytes(&bytes)
            .map_err(|e| PreprocessingError::SerializationError(e.to_string()))?;
        Self::from_params(params)
    }
}
