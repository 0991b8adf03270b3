//! Building and applying per-column category maps.

use crate::preprocessing::encoding::{CatOrder, CategoryGeneratorConfig};
use crate::preprocessing::error::Result;
use crate::table::{Categorical, Column, Table, Vocabulary};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

/// Frozen vocabulary per column, keyed by column name.
///
/// Built once during fitting; applying it never changes it.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryMap(IndexMap<String, Vocabulary>);

impl CategoryMap {
    pub fn get(&self, column: &str) -> Option<&Vocabulary> {
        self.0.get(column)
    }

    pub fn contains(&self, column: &str) -> bool {
        self.0.contains_key(column)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Vocabulary)> {
        self.0.iter().map(|(name, vocab)| (name.as_str(), vocab))
    }
}

impl<S: Into<String>> FromIterator<(S, Vocabulary)> for CategoryMap {
    fn from_iter<I: IntoIterator<Item = (S, Vocabulary)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

/// Fit the vocabulary of one coerced column and recode it against that vocabulary.
///
/// When ranking applies (count order, a minimum count or a maximum size), the
/// categories are stably sorted by ascending frequency, filtered, capped to the
/// most frequent tail and then put in the configured order. Otherwise only
/// alphanumeric order changes the natural first-occurrence vocabulary.
pub fn fit_column(categorical: Categorical, config: &CategoryGeneratorConfig) -> Categorical {
    let natural = categorical.categories();
    let labels = natural.as_slice();

    if config.requires_ranking() {
        let counts = categorical.value_counts();
        let mut rank: Vec<usize> = (0..natural.len()).collect();
        rank.sort_by_key(|&idx| counts[idx]);

        if let Some(min_count) = config.minimum_cat_count {
            rank.retain(|&idx| counts[idx] >= min_count);
        }
        if let Some(max_cat) = config.maximum_num_cat {
            if rank.len() > max_cat {
                rank.drain(..rank.len() - max_cat);
            }
        }

        if rank.len() > 1 {
            match config.cat_order {
                // Natural positions are first-occurrence order.
                CatOrder::Original => rank.sort_unstable(),
                CatOrder::Alphanumeric => rank.sort_by(|&a, &b| labels[a].cmp(&labels[b])),
                CatOrder::Count => {}
            }
        }

        let vocabulary: Vocabulary = rank.iter().map(|&idx| labels[idx].as_str()).collect();
        categorical.set_categories(&vocabulary)
    } else if config.cat_order == CatOrder::Alphanumeric {
        let vocabulary = natural.sorted();
        categorical.set_categories(&vocabulary)
    } else {
        categorical
    }
}

/// Build the category map for `features` and return the recoded columns with it.
///
/// With no features the result is an empty table over the same row index and
/// no map.
///
/// # Errors
/// Returns [`crate::preprocessing::PreprocessingError::MissingColumn`] if a
/// feature is not in `data`.
pub fn build_category_map(
    data: &Table,
    features: &[String],
    config: &CategoryGeneratorConfig,
) -> Result<(Table, Option<CategoryMap>)> {
    if features.is_empty() {
        return Ok((Table::empty(data.index().to_vec()), None));
    }

    let mut output = Table::empty(data.index().to_vec());
    let mut category_map = IndexMap::with_capacity(features.len());

    for feature in features {
        let natural = data.column(feature)?.to_categorical();
        let n_natural = natural.categories().len();
        let fitted = fit_column(natural, config);
        let vocabulary = fitted.categories().clone();

        trace!(
            column = %feature,
            natural = n_natural,
            kept = vocabulary.len(),
            "fitted column vocabulary"
        );
        if vocabulary.is_empty() {
            warn!(column = %feature, "no categories left after filtering; every row is missing");
        }

        category_map.insert(feature.clone(), vocabulary);
        output.insert(feature.clone(), Column::Category(fitted))?;
    }

    debug!(columns = category_map.len(), "built category map");
    Ok((output, Some(CategoryMap(category_map))))
}

/// Recode `features` of `data` against a previously built category map.
///
/// Columns without an entry in the map (or every column when `category_map`
/// is `None`) are plainly coerced. `data` and the map are left untouched.
///
/// # Errors
/// Returns [`crate::preprocessing::PreprocessingError::MissingColumn`] if a
/// feature is not in `data`.
pub fn apply_category_map(
    data: &Table,
    features: &[String],
    category_map: Option<&CategoryMap>,
) -> Result<Table> {
    let mut output = Table::empty(data.index().to_vec());

    for feature in features {
        let categorical = data.column(feature)?.to_categorical();
        let recoded = match category_map.and_then(|map| map.get(feature)) {
            Some(vocabulary) => categorical.set_categories(vocabulary),
            None => categorical,
        };
        output.insert(feature.clone(), Column::Category(recoded))?;
    }

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::MISSING_CODE;
    use pretty_assertions::assert_eq;

    fn abc() -> Categorical {
        Column::from_strs(["a", "a", "b", "c", "c", "c"]).to_categorical()
    }

    fn config(order: CatOrder) -> CategoryGeneratorConfig {
        CategoryGeneratorConfig {
            cat_order: order,
            ..CategoryGeneratorConfig::default()
        }
    }

    fn labels(cat: &Categorical) -> Vec<&str> {
        cat.categories().iter().collect()
    }

    #[test]
    fn test_fit_column_original_keeps_first_occurrence() {
        let fitted = fit_column(
            Column::from_strs(["z", "a", "m", "a"]).to_categorical(),
            &config(CatOrder::Original),
        );
        assert_eq!(labels(&fitted), vec!["z", "a", "m"]);
    }

    #[test]
    fn test_fit_column_count_order() {
        let fitted = fit_column(abc(), &config(CatOrder::Count));
        assert_eq!(labels(&fitted), vec!["b", "a", "c"]);
        assert_eq!(fitted.codes(), &[1, 1, 0, 2, 2, 2]);
    }

    #[test]
    fn test_fit_column_count_ties_keep_first_occurrence() {
        let fitted = fit_column(
            Column::from_strs(["q", "p", "p", "q", "r"]).to_categorical(),
            &config(CatOrder::Count),
        );
        assert_eq!(labels(&fitted), vec!["r", "q", "p"]);
    }

    #[test]
    fn test_fit_column_minimum_count() {
        let cfg = CategoryGeneratorConfig {
            minimum_cat_count: Some(2),
            ..config(CatOrder::Original)
        };
        let fitted = fit_column(abc(), &cfg);
        assert_eq!(labels(&fitted), vec!["a", "c"]);
        assert_eq!(fitted.codes()[2], MISSING_CODE);
    }

    #[test]
    fn test_fit_column_maximum_num_cat() {
        let cfg = CategoryGeneratorConfig {
            maximum_num_cat: Some(1),
            ..config(CatOrder::Original)
        };
        let fitted = fit_column(abc(), &cfg);
        assert_eq!(labels(&fitted), vec!["c"]);
    }

    #[test]
    fn test_fit_column_maximum_keeps_most_frequent_in_original_order() {
        let cfg = CategoryGeneratorConfig {
            maximum_num_cat: Some(2),
            ..config(CatOrder::Original)
        };
        let fitted = fit_column(abc(), &cfg);
        assert_eq!(labels(&fitted), vec!["a", "c"]);
    }

    #[test]
    fn test_fit_column_alphanumeric_with_filter() {
        let cfg = CategoryGeneratorConfig {
            minimum_cat_count: Some(2),
            ..config(CatOrder::Alphanumeric)
        };
        let fitted = fit_column(
            Column::from_strs(["m", "m", "b", "b", "z", "x"]).to_categorical(),
            &cfg,
        );
        assert_eq!(labels(&fitted), vec!["b", "m"]);
    }

    #[test]
    fn test_fit_column_alphanumeric_without_filter() {
        let fitted = fit_column(
            Column::from_strs(["m", "b", "z"]).to_categorical(),
            &config(CatOrder::Alphanumeric),
        );
        assert_eq!(labels(&fitted), vec!["b", "m", "z"]);
        assert_eq!(fitted.codes(), &[1, 0, 2]);
    }

    #[test]
    fn test_fit_column_filter_to_nothing_keeps_column() {
        let cfg = CategoryGeneratorConfig {
            minimum_cat_count: Some(10),
            ..config(CatOrder::Original)
        };
        let fitted = fit_column(abc(), &cfg);
        assert!(fitted.categories().is_empty());
        assert!(fitted.codes().iter().all(|&c| c == MISSING_CODE));
    }

    #[test]
    fn test_fit_column_categorical_counts_unused_categories() {
        let declared =
            Categorical::new(Vocabulary::new(["unused", "a", "b"]), vec![1, 2, 2]).unwrap();
        let fitted = fit_column(declared, &config(CatOrder::Count));
        assert_eq!(labels(&fitted), vec!["unused", "a", "b"]);
    }

    #[test]
    fn test_build_category_map_empty_features() {
        let table = Table::new(vec![("n", Column::Int(vec![Some(1), Some(2)]))]).unwrap();
        let (output, map) = build_category_map(&table, &[], &config(CatOrder::Original)).unwrap();
        assert_eq!(output.n_columns(), 0);
        assert_eq!(output.n_rows(), 2);
        assert!(map.is_none());
    }

    #[test]
    fn test_build_category_map_records_every_feature() {
        let table = Table::new(vec![
            ("x", Column::from_strs(["a", "b"])),
            ("y", Column::from_strs(["q", "q"])),
        ])
        .unwrap();
        let features = vec!["y".to_string(), "x".to_string()];
        let (output, map) =
            build_category_map(&table, &features, &config(CatOrder::Original)).unwrap();
        let map = map.unwrap();

        assert_eq!(map.columns().collect::<Vec<_>>(), vec!["y", "x"]);
        assert_eq!(output.column_names().collect::<Vec<_>>(), vec!["y", "x"]);
        assert_eq!(map.get("x").unwrap().as_slice(), &["a", "b"]);
    }

    #[test]
    fn test_build_category_map_missing_column() {
        let table = Table::new(vec![("x", Column::from_strs(["a"]))]).unwrap();
        let result =
            build_category_map(&table, &["nope".to_string()], &config(CatOrder::Original));
        assert!(result.is_err());
    }

    #[test]
    fn test_apply_category_map_unseen_is_missing() {
        let map: CategoryMap = [("x", Vocabulary::new(["b", "a"]))].into_iter().collect();
        let table = Table::new(vec![("x", Column::from_strs(["a", "z", "b"]))]).unwrap();

        let output = apply_category_map(&table, &["x".to_string()], Some(&map)).unwrap();
        let cat = output.column("x").unwrap().as_categorical().unwrap();
        assert_eq!(cat.codes(), &[1, MISSING_CODE, 0]);
        assert_eq!(map.get("x").unwrap().as_slice(), &["b", "a"]);
    }

    #[test]
    fn test_apply_category_map_without_entry_coerces() {
        let map: CategoryMap = [("x", Vocabulary::new(["a"]))].into_iter().collect();
        let table = Table::new(vec![
            ("x", Column::from_strs(["a"])),
            ("y", Column::from_strs(["k"])),
        ])
        .unwrap();

        let output = apply_category_map(&table, &["y".to_string()], Some(&map)).unwrap();
        let cat = output.column("y").unwrap().as_categorical().unwrap();
        assert_eq!(cat.categories().as_slice(), &["k"]);
    }
}
