//! The loader/builder configuration, one struct a caller fills in (by
//! hand or via the CLI's `--config` flag) to describe a dataset file and
//! how a program should be built against it.

use dtl_core::dropout::{ClassSensitivity, PerturbationBudget};
use serde::{Deserialize, Serialize};

use crate::error::DataError;

fn default_sensitivity() -> ClassSensitivity {
    ClassSensitivity::Any
}

/// Describes one dataset file and the program parameters to run against
/// it. Mirrors the fixed per-dataset detail tables (`UCI_IRIS_DETAILS`
/// and friends) the loader was originally built around, generalized to
/// any CSV-like file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Path to the dataset file, comma-separated, one row per line.
    pub dataset_path: String,
    /// Total column count per row, including the label and ignored
    /// columns.
    pub num_cols: usize,
    /// Number of data rows to read. The loader stops at this count or at
    /// end of file, whichever comes first — it never errors on a short
    /// file.
    pub num_rows: usize,
    /// Index of the column holding the class label.
    pub label_index: usize,
    /// Column indices to skip entirely (identifiers, free text, etc).
    #[serde(default)]
    pub indices_to_ignore: Vec<usize>,
    /// How many rows an adversary may drop from the training set before
    /// the learner sees it.
    #[serde(default)]
    pub dropout_budget: usize,
    /// How many rows an adversary may add.
    #[serde(default)]
    pub num_add: usize,
    #[serde(default = "default_sensitivity")]
    pub add_sensitivity: ClassSensitivity,
    /// How many labels an adversary may flip within the training set.
    #[serde(default)]
    pub num_label_flip: usize,
    #[serde(default = "default_sensitivity")]
    pub flip_sensitivity: ClassSensitivity,
    /// How many rows' numeric features an adversary may perturb.
    #[serde(default)]
    pub num_feature_flip: usize,
    #[serde(default)]
    pub feature_flip_index: Option<usize>,
    #[serde(default)]
    pub feature_flip_amount: f64,
    /// Recursion depth of the canonical split program the builder
    /// constructs.
    pub max_depth: usize,
    /// The query row the built program classifies: one value per feature
    /// column, in column order after dropping the label and ignored
    /// columns. Its length is checked against the schema once the
    /// dataset is loaded, not here.
    #[serde(default)]
    pub test_x: Vec<f64>,
}

impl Config {
    /// Assembles the full perturbation budget this configuration
    /// describes, for use as the evaluator's starting budget.
    #[must_use]
    pub fn perturbation_budget(&self) -> PerturbationBudget {
        PerturbationBudget {
            num_dropout: self.dropout_budget,
            num_add: self.num_add,
            add_sensitivity: self.add_sensitivity,
            num_label_flip: self.num_label_flip,
            flip_sensitivity: self.flip_sensitivity,
            num_feature_flip: self.num_feature_flip,
            feature_flip_index: self.feature_flip_index,
            feature_flip_amount: self.feature_flip_amount,
        }
    }

    /// Checks the configuration is internally consistent: indices in
    /// range, label column not also ignored, at least one feature
    /// column remains.
    pub fn validate(&self) -> Result<(), DataError> {
        if self.label_index >= self.num_cols {
            return Err(DataError::InvalidConfig(format!(
                "label_index {} is out of range for {} columns",
                self.label_index, self.num_cols
            )));
        }
        for &ignored in &self.indices_to_ignore {
            if ignored >= self.num_cols {
                return Err(DataError::InvalidConfig(format!(
                    "ignored index {ignored} is out of range for {} columns",
                    self.num_cols
                )));
            }
        }
        if self.indices_to_ignore.contains(&self.label_index) {
            return Err(DataError::InvalidConfig(
                "label_index must not also appear in indices_to_ignore".to_string(),
            ));
        }
        let feature_cols = self.num_cols - 1 - self.indices_to_ignore.len();
        if feature_cols == 0 {
            return Err(DataError::InvalidConfig(
                "configuration leaves no feature columns after removing the label and ignored columns".to_string(),
            ));
        }
        if self.num_rows == 0 {
            return Err(DataError::InvalidConfig("num_rows must be positive".to_string()));
        }
        if self.max_depth == 0 {
            return Err(DataError::InvalidConfig("max_depth must be at least 1".to_string()));
        }
        if self.feature_flip_amount < 0.0 {
            return Err(DataError::InvalidConfig("feature_flip_amount must be non-negative".to_string()));
        }
        if self.num_feature_flip > 0 && self.feature_flip_index.is_none() {
            return Err(DataError::InvalidConfig(
                "num_feature_flip is positive but no feature_flip_index names the feature".to_string(),
            ));
        }
        if self.test_x.is_empty() {
            return Err(DataError::InvalidConfig(
                "test_x must name a query row for the program to classify".to_string(),
            ));
        }
        Ok(())
    }
}
