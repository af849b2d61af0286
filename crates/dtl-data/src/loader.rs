//! Lenient CSV/UCI-style dataset loading.
//!
//! The loader stops reading at end of file or at `config.num_rows`,
//! whichever comes first, and never reports a row-width mismatch — a
//! short or ragged input file is read as far as it goes. This mirrors
//! the original fixed-table UCI readers this loader was generalized
//! from, which made the same assumption and documented it as a known
//! looseness rather than guarding against it.

use std::collections::BTreeSet;
use std::fs;
use std::sync::Arc;

use dtl_core::{FeatureKind, FeatureSchema, FeatureVector};
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::DataError;

/// A loaded dataset: the schema the rows conform to, and the rows
/// themselves, sharable across abstract states without cloning.
pub struct Dataset {
    pub schema: FeatureSchema,
    pub rows: Arc<[FeatureVector]>,
}

/// Loads `config.dataset_path`, building a [`FeatureSchema`] whose cut
/// points are the midpoints between consecutive distinct sorted values
/// seen in each feature column.
pub fn load(config: &Config) -> Result<Dataset, DataError> {
    config.validate()?;
    let contents = fs::read_to_string(&config.dataset_path)?;

    let feature_indices: Vec<usize> = (0..config.num_cols)
        .filter(|i| *i != config.label_index && !config.indices_to_ignore.contains(i))
        .collect();

    let mut labels: BTreeSet<String> = BTreeSet::new();
    let mut raw_rows: Vec<(Vec<f64>, String)> = Vec::with_capacity(config.num_rows);

    for (row_index, line) in contents.lines().enumerate() {
        if raw_rows.len() >= config.num_rows {
            break;
        }
        let items: Vec<&str> = line.split(',').collect();
        if items.len() <= config.label_index || feature_indices.iter().any(|&i| i >= items.len()) {
            debug!(row_index, "skipping short row");
            continue;
        }
        let label = items[config.label_index].trim().to_string();
        let mut values = Vec::with_capacity(feature_indices.len());
        let mut malformed = false;
        for &col in &feature_indices {
            let raw = items[col].trim();
            match raw.parse::<f64>() {
                Ok(v) => values.push(v),
                Err(_) => {
                    warn!(row_index, col, value = raw, "dropping unparseable row");
                    malformed = true;
                    break;
                }
            }
        }
        if malformed {
            continue;
        }
        labels.insert(label.clone());
        raw_rows.push((values, label));
    }

    let class_of: std::collections::BTreeMap<String, usize> =
        labels.iter().enumerate().map(|(i, l)| (l.clone(), i)).collect();

    let num_features = feature_indices.len();
    let mut columns: Vec<Vec<f64>> = vec![Vec::with_capacity(raw_rows.len()); num_features];
    for (values, _) in &raw_rows {
        for (col, v) in values.iter().enumerate() {
            columns[col].push(*v);
        }
    }

    let kinds = columns
        .iter()
        .map(|column| FeatureKind::Numeric { cut_points: candidate_cut_points(column) })
        .collect();
    let schema = FeatureSchema::new(kinds, class_of.len());

    let rows: Vec<FeatureVector> = raw_rows
        .into_iter()
        .map(|(values, label)| FeatureVector::new(values, class_of[&label]))
        .collect();

    Ok(Dataset { schema, rows: Arc::from(rows) })
}

/// Midpoints between consecutive distinct sorted values in `column`,
/// the standard candidate split-threshold set for a numeric feature.
fn candidate_cut_points(column: &[f64]) -> Vec<f64> {
    let mut sorted: Vec<f64> = column.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).expect("dataset values must not be NaN"));
    sorted.dedup();
    sorted.windows(2).map(|pair| (pair[0] + pair[1]) / 2.0).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use dtl_core::dropout::ClassSensitivity;
    use std::io::Write;

    fn write_temp(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{contents}").unwrap();
        file
    }

    fn config_for(path: &std::path::Path, num_cols: usize, num_rows: usize, label_index: usize) -> Config {
        let num_features = num_cols - 1;
        Config {
            dataset_path: path.to_string_lossy().to_string(),
            num_cols,
            num_rows,
            label_index,
            indices_to_ignore: vec![],
            dropout_budget: 0,
            num_add: 0,
            add_sensitivity: ClassSensitivity::Any,
            num_label_flip: 0,
            flip_sensitivity: ClassSensitivity::Any,
            num_feature_flip: 0,
            feature_flip_index: None,
            feature_flip_amount: 0.0,
            max_depth: 1,
            test_x: vec![0.0; num_features],
        }
    }

    #[test]
    fn loads_well_formed_rows_and_infers_two_classes() {
        let file = write_temp("1.0,2.0,a\n3.0,4.0,b\n1.5,2.5,a\n");
        let config = config_for(file.path(), 3, 10, 2);
        let dataset = load(&config).unwrap();
        assert_eq!(dataset.rows.len(), 3);
        assert_eq!(dataset.schema.num_classes(), 2);
        assert_eq!(dataset.schema.num_features(), 2);
    }

    #[test]
    fn stops_at_num_rows_even_if_file_has_more() {
        let file = write_temp("1.0,a\n2.0,b\n3.0,a\n4.0,b\n");
        let config = config_for(file.path(), 2, 2, 1);
        let dataset = load(&config).unwrap();
        assert_eq!(dataset.rows.len(), 2);
    }

    #[test]
    fn silently_skips_short_rows_without_erroring() {
        let file = write_temp("1.0,2.0,a\nmalformed\n3.0,4.0,b\n");
        let config = config_for(file.path(), 3, 10, 2);
        let dataset = load(&config).unwrap();
        assert_eq!(dataset.rows.len(), 2);
    }

    #[test]
    fn respects_indices_to_ignore() {
        let file = write_temp("id1,1.0,2.0,a\nid2,3.0,4.0,b\n");
        let mut config = config_for(file.path(), 4, 10, 3);
        config.indices_to_ignore = vec![0];
        config.test_x = vec![0.0; 2];
        let dataset = load(&config).unwrap();
        assert_eq!(dataset.schema.num_features(), 2);
    }
}
