//! Result Store - on-disk layout of experiment output
//!
//! ```text
//! <resultsPath>/<model>/
//!   ├── <experimentName>/data.json      one ExperimentRecord per experiment
//!   └── data/dataPoints<N>.dat          training inputs, dim × N
//!       data/dataValues<N>.dat          training responses, N
//! ```
//!
//! The store is read-only from the plotting side; [`save_record`] exists so
//! the layout can be produced by fixtures and other tools.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::debug;

use crate::error::{Error, Result};
use crate::record::ExperimentRecord;

/// File name of the persisted record inside an experiment folder.
pub const RECORD_FILE: &str = "data.json";

/// Directory holding data-driven training sets, next to the experiment folders.
pub const DATA_DIR: &str = "data";

/// Result tree of one model.
#[derive(Debug, Clone)]
pub struct ResultStore {
    root: PathBuf,
}

impl ResultStore {
    /// Store rooted at `<results_path>/<model>`.
    #[must_use]
    pub fn for_model(results_path: impl AsRef<Path>, model: &str) -> Self {
        Self {
            root: results_path.as_ref().join(model),
        }
    }

    /// Get the model folder holding the experiments
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Folder of a named experiment.
    #[must_use]
    pub fn experiment_dir(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    /// Load and validate the record of a named experiment.
    ///
    /// # Errors
    ///
    /// See [`load_record`].
    pub fn load(&self, name: &str) -> Result<ExperimentRecord> {
        load_record(&self.experiment_dir(name))
    }

    /// Persist `record` as a named experiment.
    ///
    /// # Errors
    ///
    /// See [`save_record`].
    pub fn save(&self, name: &str, record: &ExperimentRecord) -> Result<PathBuf> {
        let dir = self.experiment_dir(name);
        save_record(&dir, record)?;
        Ok(dir)
    }
}

/// Load and validate the record stored in an experiment folder.
///
/// # Errors
///
/// Returns `Error::RecordNotFound` if the folder has no record file, `Error::Io`
/// or `Error::Json` if it cannot be read or decoded, and the errors of
/// [`ExperimentRecord::validate`] for a malformed record.
pub fn load_record(experiment_dir: &Path) -> Result<ExperimentRecord> {
    let path = experiment_dir.join(RECORD_FILE);
    if !path.is_file() {
        return Err(Error::RecordNotFound(experiment_dir.to_path_buf()));
    }
    let text = fs::read_to_string(&path)?;
    let record: ExperimentRecord = serde_json::from_str(&text)?;
    record.validate()?;
    debug!(
        path = %path.display(),
        method = %record.method(),
        model = record.model(),
        "loaded record"
    );
    Ok(record)
}

/// Write `record` into an experiment folder, creating it if needed.
///
/// # Errors
///
/// Returns `Error::Io` if the folder or file cannot be written.
pub fn save_record(experiment_dir: &Path, record: &ExperimentRecord) -> Result<()> {
    fs::create_dir_all(experiment_dir)?;
    let text = serde_json::to_string(record)?;
    fs::write(experiment_dir.join(RECORD_FILE), text)?;
    Ok(())
}

/// Training set a data-driven surrogate was fitted to.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingData {
    /// One row per input dimension, one column per sample
    pub points: Vec<Vec<f64>>,
    /// One response per sample
    pub values: Vec<f64>,
}

impl TrainingData {
    /// Number of samples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether there are no training points
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Project every sample onto `direction` (`wᵀX`).
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidInput` if `direction` and the point rows differ in length.
    pub fn project(&self, direction: &[f64]) -> Result<Vec<f64>> {
        if direction.len() != self.points.len() {
            return Err(Error::InvalidInput(format!(
                "direction of length {} for {}-dimensional training points",
                direction.len(),
                self.points.len()
            )));
        }
        let mut projected = vec![0.0; self.len()];
        for (w, row) in direction.iter().zip(&self.points) {
            for (p, x) in projected.iter_mut().zip(row) {
                *p += w * x;
            }
        }
        Ok(projected)
    }
}

/// Paths of the training files for `num_data` samples, next to `experiment_dir`.
#[must_use]
pub fn training_data_paths(experiment_dir: &Path, num_data: usize) -> (PathBuf, PathBuf) {
    let data_dir = experiment_dir
        .parent()
        .unwrap_or_else(|| Path::new("."))
        .join(DATA_DIR);
    (
        data_dir.join(format!("dataPoints{num_data}.dat")),
        data_dir.join(format!("dataValues{num_data}.dat")),
    )
}

/// Load the training set of size `num_data` shared by the experiments of one model.
///
/// # Errors
///
/// Returns `Error::Io` if a file is missing, `Error::Json` if it is not a
/// numeric literal, and `Error::InvalidInput` if points and values disagree.
pub fn load_training_data(experiment_dir: &Path, num_data: usize) -> Result<TrainingData> {
    let (points_path, values_path) = training_data_paths(experiment_dir, num_data);
    let points = parse_matrix(&read_literal(&points_path)?)?;
    let values = parse_flat(&read_literal(&values_path)?)?;

    if let Some(row) = points.iter().find(|row| row.len() != values.len()) {
        return Err(Error::InvalidInput(format!(
            "{} has rows of length {}, {} has {} values",
            points_path.display(),
            row.len(),
            values_path.display(),
            values.len()
        )));
    }
    Ok(TrainingData { points, values })
}

/// Read a file holding one array literal, possibly spread over several lines.
fn read_literal(path: &Path) -> Result<Value> {
    let text = fs::read_to_string(path)?;
    let joined: String = text.lines().collect();
    Ok(serde_json::from_str(&joined)?)
}

/// Nested list of rows; a flat list is a single row.
fn parse_matrix(value: &Value) -> Result<Vec<Vec<f64>>> {
    let Value::Array(items) = value else {
        return Err(Error::InvalidInput("expected an array literal".to_string()));
    };
    if items.iter().all(Value::is_number) {
        return Ok(vec![parse_flat(value)?]);
    }
    items.iter().map(parse_flat).collect()
}

/// All numbers of a (possibly nested) list in order.
fn parse_flat(value: &Value) -> Result<Vec<f64>> {
    let mut out = Vec::new();
    flatten_into(value, &mut out)?;
    Ok(out)
}

fn flatten_into(value: &Value, out: &mut Vec<f64>) -> Result<()> {
    match value {
        Value::Number(n) => {
            let v = n
                .as_f64()
                .ok_or_else(|| Error::InvalidInput(format!("non-numeric entry {n}")))?;
            out.push(v);
        }
        Value::Array(items) => {
            for item in items {
                flatten_into(item, out)?;
            }
        }
        other => {
            return Err(Error::InvalidInput(format!(
                "expected a number, found {other}"
            )))
        }
    }
    Ok(())
}
