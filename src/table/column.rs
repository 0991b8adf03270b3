//! Column storage and the object-to-categorical coercion.
//!
//! [`Column::to_categorical`] is the single place where raw values become
//! `(vocabulary, codes)`. Both fitting and applying a category map go through it.

use crate::preprocessing::error::{PreprocessingError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Code assigned to a cell whose value is missing or absent from the vocabulary.
pub const MISSING_CODE: i32 = -1;

/// Ordered sequence of distinct category labels.
///
/// Backed by `Arc<[String]>`, so cloning shares the labels and there is no way
/// to extend or reorder a vocabulary once it has been built. Deserialization
/// rejects repeated labels.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>")]
pub struct Vocabulary(Arc<[String]>);

impl Vocabulary {
    /// Build a vocabulary from labels, keeping the first occurrence of duplicates.
    pub fn new<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut seen = std::collections::HashSet::new();
        let unique: Vec<String> = labels
            .into_iter()
            .map(Into::into)
            .filter(|label| seen.insert(label.clone()))
            .collect();
        Self(Arc::from(unique))
    }

    /// Vocabulary with no labels.
    pub fn empty() -> Self {
        Self(Arc::from(Vec::<String>::new()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Label at position `idx`.
    pub fn get(&self, idx: usize) -> Option<&str> {
        self.0.get(idx).map(String::as_str)
    }

    /// Position of `label`, if present.
    pub fn position(&self, label: &str) -> Option<usize> {
        self.0.iter().position(|l| l == label)
    }

    pub fn contains(&self, label: &str) -> bool {
        self.position(label).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    /// Copy of the labels sorted lexicographically.
    pub fn sorted(&self) -> Self {
        let mut labels = self.0.to_vec();
        labels.sort();
        Self(Arc::from(labels))
    }

    fn lookup(&self) -> HashMap<&str, i32> {
        self.0
            .iter()
            .enumerate()
            .map(|(idx, label)| (label.as_str(), idx as i32))
            .collect()
    }
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Debug for Vocabulary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.0.iter()).finish()
    }
}

impl TryFrom<Vec<String>> for Vocabulary {
    type Error = PreprocessingError;

    fn try_from(labels: Vec<String>) -> Result<Self> {
        let mut seen = std::collections::HashSet::with_capacity(labels.len());
        if let Some(repeated) = labels.iter().find(|label| !seen.insert(label.as_str())) {
            return Err(PreprocessingError::InvalidParameter(format!(
                "duplicate category label '{}'",
                repeated
            )));
        }
        Ok(Self(Arc::from(labels)))
    }
}

impl<S: Into<String>> FromIterator<S> for Vocabulary {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter)
    }
}

/// A categorical column: a vocabulary plus one code per row.
///
/// Codes index into the vocabulary; [`MISSING_CODE`] marks a missing cell.
/// Deserialized values go through [`Categorical::new`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCategorical")]
pub struct Categorical {
    categories: Vocabulary,
    codes: Vec<i32>,
}

#[derive(Deserialize)]
struct RawCategorical {
    categories: Vocabulary,
    codes: Vec<i32>,
}

impl TryFrom<RawCategorical> for Categorical {
    type Error = PreprocessingError;

    fn try_from(raw: RawCategorical) -> Result<Self> {
        Self::new(raw.categories, raw.codes)
    }
}

impl Categorical {
    /// Create a categorical column from explicit categories and codes.
    ///
    /// # Errors
    /// Returns [`PreprocessingError::InvalidParameter`] if a code is neither
    /// [`MISSING_CODE`] nor a valid position in `categories`.
    pub fn new(categories: Vocabulary, codes: Vec<i32>) -> Result<Self> {
        let n = categories.len() as i32;
        if let Some(bad) = codes.iter().find(|&&c| c != MISSING_CODE && !(0..n).contains(&c)) {
            return Err(PreprocessingError::InvalidParameter(format!(
                "category code {} out of range for {} categories",
                bad, n
            )));
        }
        Ok(Self { categories, codes })
    }

    /// Coerce raw values, taking distinct non-missing values in first-occurrence order.
    pub fn from_values<'a, I>(values: I) -> Self
    where
        I: IntoIterator<Item = Option<&'a str>>,
    {
        let mut positions: HashMap<&'a str, i32> = HashMap::new();
        let mut labels: Vec<String> = Vec::new();
        let codes = values
            .into_iter()
            .map(|value| match value {
                Some(label) => *positions.entry(label).or_insert_with(|| {
                    labels.push(label.to_string());
                    labels.len() as i32 - 1
                }),
                None => MISSING_CODE,
            })
            .collect();

        Self {
            categories: Vocabulary(Arc::from(labels)),
            codes,
        }
    }

    pub fn categories(&self) -> &Vocabulary {
        &self.categories
    }

    pub fn codes(&self) -> &[i32] {
        &self.codes
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Decoded label of a row, `None` for missing cells.
    pub fn label(&self, row: usize) -> Option<&str> {
        self.codes
            .get(row)
            .and_then(|&code| usize::try_from(code).ok())
            .and_then(|code| self.categories.get(code))
    }

    /// Decoded labels for every row.
    pub fn labels(&self) -> impl Iterator<Item = Option<&str>> + '_ {
        (0..self.codes.len()).map(move |row| self.label(row))
    }

    /// Number of rows holding each category, aligned with [`Self::categories`].
    ///
    /// Declared categories with no rows get a count of zero; missing cells are
    /// not counted.
    pub fn value_counts(&self) -> Vec<usize> {
        let mut counts = vec![0usize; self.categories.len()];
        for &code in &self.codes {
            if let Ok(idx) = usize::try_from(code) {
                counts[idx] += 1;
            }
        }
        counts
    }

    /// Recode against a new vocabulary.
    ///
    /// Rows whose label is not in `categories` become [`MISSING_CODE`].
    pub fn set_categories(&self, categories: &Vocabulary) -> Self {
        if &self.categories == categories {
            return self.clone();
        }
        let lookup = categories.lookup();
        let remap: Vec<i32> = self
            .categories
            .iter()
            .map(|label| lookup.get(label).copied().unwrap_or(MISSING_CODE))
            .collect();
        let codes = self
            .codes
            .iter()
            .map(|&code| match usize::try_from(code) {
                Ok(idx) => remap[idx],
                Err(_) => MISSING_CODE,
            })
            .collect();

        Self {
            categories: categories.clone(),
            codes,
        }
    }

    /// Replace the labels one-for-one, keeping every code.
    ///
    /// # Errors
    /// Returns [`PreprocessingError::InvalidParameter`] if the new vocabulary
    /// has a different length.
    pub fn rename_categories(self, categories: Vocabulary) -> Result<Self> {
        if categories.len() != self.categories.len() {
            return Err(PreprocessingError::InvalidParameter(format!(
                "cannot rename {} categories with {} labels",
                self.categories.len(),
                categories.len()
            )));
        }
        Ok(Self {
            categories,
            codes: self.codes,
        })
    }
}

/// Raw column storage, one variant per dtype.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Column {
    /// Free-form values; `None` is a missing cell.
    Object(Vec<Option<String>>),
    /// Already categorical.
    Category(Categorical),
    Int(Vec<Option<i64>>),
    /// `NaN` is a missing cell.
    Float(Vec<f64>),
}

impl Column {
    /// Object column where every cell is present.
    pub fn from_strs<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Column::Object(values.into_iter().map(|v| Some(v.into())).collect())
    }

    pub fn len(&self) -> usize {
        match self {
            Column::Object(values) => values.len(),
            Column::Category(cat) => cat.len(),
            Column::Int(values) => values.len(),
            Column::Float(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Raw dtype group name, as used in [`crate::table::FeatureMetadata`].
    pub fn raw_type(&self) -> &'static str {
        match self {
            Column::Object(_) => super::metadata::R_OBJECT,
            Column::Category(_) => super::metadata::R_CATEGORY,
            Column::Int(_) => super::metadata::R_INT,
            Column::Float(_) => super::metadata::R_FLOAT,
        }
    }

    pub fn as_categorical(&self) -> Option<&Categorical> {
        match self {
            Column::Category(cat) => Some(cat),
            _ => None,
        }
    }

    /// Coerce to a categorical representation.
    ///
    /// Categorical columns keep their declared categories; every other dtype
    /// takes its distinct values in first-occurrence order.
    pub fn to_categorical(&self) -> Categorical {
        match self {
            Column::Object(values) => Categorical::from_values(values.iter().map(Option::as_deref)),
            Column::Category(cat) => cat.clone(),
            Column::Int(values) => {
                let rendered: Vec<Option<String>> =
                    values.iter().map(|v| v.map(|x| x.to_string())).collect();
                Categorical::from_values(rendered.iter().map(Option::as_deref))
            }
            Column::Float(values) => {
                let rendered: Vec<Option<String>> = values
                    .iter()
                    .map(|v| (!v.is_nan()).then(|| v.to_string()))
                    .collect();
                Categorical::from_values(rendered.iter().map(Option::as_deref))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_vocabulary_dedupes_keeping_first() {
        let vocab = Vocabulary::new(["b", "a", "b", "c"]);
        assert_eq!(vocab.as_slice(), &["b", "a", "c"]);
        assert_eq!(vocab.position("c"), Some(2));
        assert!(!vocab.contains("z"));
    }

    #[test]
    fn test_vocabulary_sorted_leaves_original() {
        let vocab = Vocabulary::new(["b", "C", "a"]);
        let sorted = vocab.sorted();
        assert_eq!(sorted.as_slice(), &["C", "a", "b"]);
        assert_eq!(vocab.as_slice(), &["b", "C", "a"]);
    }

    #[test]
    fn test_from_values_first_occurrence() {
        let cat = Categorical::from_values([Some("x"), None, Some("y"), Some("x")]);
        assert_eq!(cat.categories().as_slice(), &["x", "y"]);
        assert_eq!(cat.codes(), &[0, MISSING_CODE, 1, 0]);
        assert_eq!(cat.label(1), None);
        assert_eq!(cat.label(3), Some("x"));
    }

    #[test]
    fn test_value_counts_include_unused_categories() {
        let cat = Categorical::new(Vocabulary::new(["a", "b", "c"]), vec![2, 2, -1, 0]).unwrap();
        assert_eq!(cat.value_counts(), vec![1, 0, 2]);
    }

    #[test]
    fn test_new_rejects_out_of_range_code() {
        let result = Categorical::new(Vocabulary::new(["a"]), vec![0, 1]);
        assert!(matches!(result, Err(PreprocessingError::InvalidParameter(_))));
    }

    #[test]
    fn test_deserialize_rejects_duplicate_labels() {
        let result: std::result::Result<Vocabulary, _> = serde_json::from_str(r#"["a","b","a"]"#);
        assert!(result.is_err());

        let bytes = bincode::serialize(&vec!["a", "b", "a"]).unwrap();
        assert!(bincode::deserialize::<Vocabulary>(&bytes).is_err());

        let vocab: Vocabulary = serde_json::from_str(r#"["a","b"]"#).unwrap();
        assert_eq!(vocab.as_slice(), &["a", "b"]);
    }

    #[test]
    fn test_deserialize_rejects_out_of_range_code() {
        let json = r#"{"Category":{"categories":["a"],"codes":[0,5]}}"#;
        assert!(serde_json::from_str::<Column>(json).is_err());

        let json = r#"{"Category":{"categories":["a"],"codes":[0,-1]}}"#;
        let column: Column = serde_json::from_str(json).unwrap();
        let cat = column.as_categorical().unwrap();
        assert_eq!(cat.value_counts(), vec![1]);
    }

    #[test]
    fn test_serialize_round_trip_through_validation() {
        let cat = Categorical::from_values([Some("x"), None, Some("y")]);
        let bytes = bincode::serialize(&cat).unwrap();
        let restored: Categorical = bincode::deserialize(&bytes).unwrap();
        assert_eq!(restored, cat);
    }

    #[test]
    fn test_set_categories_drops_unknown_labels() {
        let cat = Categorical::from_values([Some("a"), Some("b"), Some("c")]);
        let recoded = cat.set_categories(&Vocabulary::new(["c", "a"]));
        assert_eq!(recoded.codes(), &[1, MISSING_CODE, 0]);
        let labels: Vec<_> = recoded.labels().collect();
        assert_eq!(labels, vec![Some("a"), None, Some("c")]);
    }

    #[test]
    fn test_set_categories_same_vocabulary_is_noop() {
        let cat = Categorical::from_values([Some("a"), Some("b")]);
        let recoded = cat.set_categories(&cat.categories().clone());
        assert_eq!(recoded, cat);
    }

    #[test]
    fn test_rename_categories_length_check() {
        let cat = Categorical::from_values([Some("a"), Some("b")]);
        assert!(cat.clone().rename_categories(Vocabulary::new(["0"])).is_err());
        let renamed = cat.rename_categories(Vocabulary::new(["0", "1"])).unwrap();
        assert_eq!(renamed.label(1), Some("1"));
    }

    #[test]
    fn test_column_coercion_numeric() {
        let ints = Column::Int(vec![Some(3), None, Some(3)]);
        let cat = ints.to_categorical();
        assert_eq!(cat.categories().as_slice(), &["3"]);
        assert_eq!(cat.codes(), &[0, MISSING_CODE, 0]);

        let floats = Column::Float(vec![1.5, f64::NAN]);
        assert_eq!(floats.to_categorical().codes(), &[0, MISSING_CODE]);
    }

    #[test]
    fn test_column_raw_type() {
        assert_eq!(Column::from_strs(["a"]).raw_type(), "object");
        assert_eq!(Column::Float(vec![]).raw_type(), "float");
        let cat = Column::Category(Categorical::from_values([Some("a")]));
        assert_eq!(cat.raw_type(), "category");
        assert!(cat.as_categorical().is_some());
    }
}
