//! Column-type metadata: raw dtype groups and special tags.

use crate::table::Table;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

pub const R_OBJECT: &str = "object";
pub const R_CATEGORY: &str = "category";
pub const R_INT: &str = "int";
pub const R_FLOAT: &str = "float";

pub const S_TEXT: &str = "text";
pub const S_TEXT_AS_CATEGORY: &str = "text_as_category";
pub const S_DATETIME_AS_OBJECT: &str = "datetime_as_object";

/// Column names grouped by raw dtype and by special tag.
///
/// A column belongs to exactly one raw group but may carry any number of
/// special tags.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureMetadata {
    pub type_group_map_raw: IndexMap<String, Vec<String>>,
    pub type_group_map_special: IndexMap<String, Vec<String>>,
}

impl FeatureMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// Infer raw dtype groups from a table's columns. No special tags are set.
    pub fn from_table(table: &Table) -> Self {
        let mut metadata = Self::new();
        for (name, column) in table.columns() {
            metadata
                .type_group_map_raw
                .entry(column.raw_type().to_string())
                .or_default()
                .push(name.to_string());
        }
        metadata
    }

    /// Add features to a raw dtype group.
    pub fn with_raw<I, S>(mut self, raw_type: &str, features: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        extend_unique(
            self.type_group_map_raw.entry(raw_type.to_string()).or_default(),
            features,
        );
        self
    }

    /// Tag features with a special type.
    pub fn with_special<I, S>(mut self, tag: &str, features: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        extend_unique(
            self.type_group_map_special.entry(tag.to_string()).or_default(),
            features,
        );
        self
    }

    pub fn raw_features(&self, raw_type: &str) -> &[String] {
        self.type_group_map_raw
            .get(raw_type)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn special_features(&self, tag: &str) -> &[String] {
        self.type_group_map_special
            .get(tag)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Features eligible for categorical encoding.
    ///
    /// Object and category columns, minus anything tagged `datetime_as_object`.
    pub fn select_category_features(&self) -> Vec<String> {
        let datetime_as_object = self.special_features(S_DATETIME_AS_OBJECT);
        self.raw_features(R_OBJECT)
            .iter()
            .chain(self.raw_features(R_CATEGORY))
            .filter(|feature| !datetime_as_object.contains(*feature))
            .cloned()
            .collect()
    }

    /// Special-tag map with every `text` feature re-tagged `text_as_category`.
    ///
    /// The `text` entry is removed; its features are appended to
    /// `text_as_category` unless already there. Other tags are untouched.
    pub fn text_as_category_special_map(&self) -> IndexMap<String, Vec<String>> {
        let mut special = self.type_group_map_special.clone();
        if let Some(text_features) = special.shift_remove(S_TEXT) {
            extend_unique(
                special.entry(S_TEXT_AS_CATEGORY.to_string()).or_default(),
                text_features,
            );
        }
        special
    }
}

fn extend_unique<I, S>(target: &mut Vec<String>, features: I)
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    for feature in features {
        let feature = feature.into();
        if !target.contains(&feature) {
            target.push(feature);
        }
    }
}
