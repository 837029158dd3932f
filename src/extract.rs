//! Metric extraction - the arrays each chart needs, sliced out of a record
//!
//! Everything here is indexing and projection on stored results. The only
//! freshly computed data is the shadow background, which samples the true
//! objective function and projects the samples onto the stored eigenvectors.

use std::collections::HashMap;
use std::path::Path;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::catalog::ObjectiveFunction;
use crate::error::{Error, Result};
use crate::record::{resolve_index, ExperimentRecord, Method, Tensor};
use crate::store::{load_training_data, TrainingData};

/// Grid and data index to read from; `None` selects the last entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Selection {
    /// Index along the grid axis
    pub grid: Option<usize>,
    /// Index along the data axis
    pub data: Option<usize>,
}

impl Selection {
    /// The last grid and data entry.
    #[must_use]
    pub const fn last() -> Self {
        Self {
            grid: None,
            data: None,
        }
    }

    /// Concrete `(grid, data)` indices for `record`.
    ///
    /// # Errors
    ///
    /// Returns `Error::MissingArray` if the record has no grid × data arrays,
    /// `Error::IndexOutOfRange` if an explicit index is past the end.
    pub fn resolve(&self, record: &ExperimentRecord) -> Result<(usize, usize)> {
        let (g, d) = record.extents().ok_or(Error::MissingArray("l2Errors"))?;
        Ok((resolve_index(self.grid, g)?, resolve_index(self.data, d)?))
    }
}

/// A single x/y series.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Curve {
    /// Abscissae
    pub x: Vec<f64>,
    /// Ordinates
    pub y: Vec<f64>,
}

impl Curve {
    /// Pair up `x` and `y`, truncating to the shorter one.
    #[must_use]
    pub fn points(&self) -> Vec<(f64, f64)> {
        self.x.iter().copied().zip(self.y.iter().copied()).collect()
    }
}

/// Which stored error array to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorMetric {
    /// `l2Errors`
    L2,
    /// `integralErrors`
    Integral,
}

/// Which problem size the error is plotted against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorAxis {
    /// Number of grid points, at a fixed data index
    GridWise,
    /// Number of data points, at a fixed grid index
    DataWise,
}

fn require<'a>(tensor: Option<&'a Tensor>, name: &'static str) -> Result<&'a Tensor> {
    tensor.ok_or(Error::MissingArray(name))
}

/// Eigenvalues at one grid/data index, largest first as stored.
///
/// # Errors
///
/// Returns an error if the record has no eigenvalues or the selection is out of range.
pub fn eigenvalues(record: &ExperimentRecord, selection: Selection) -> Result<Vec<f64>> {
    let (g, d) = selection.resolve(record)?;
    require(record.eigenvalues(), "eigenvalues")?.lane(0, &[g, d])
}

/// Eigenvector `k` (column `k` of the `dim × rank` block) at one grid/data index.
///
/// # Errors
///
/// Returns an error if the record has no eigenvectors or an index is out of range.
pub fn eigenvector(record: &ExperimentRecord, k: usize, grid: usize, data: usize) -> Result<Vec<f64>> {
    require(record.eigenvectors(), "eigenvectors")?.lane(0, &[k, grid, data])
}

/// Euclidean distance between `|a|` and `|b|` component-wise.
///
/// Eigenvectors are only defined up to sign, so flipping either argument
/// does not change the result.
#[must_use]
pub fn eigenvector_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x.abs() - y.abs()).powi(2))
        .sum::<f64>()
        .sqrt()
}

/// Error of the leading eigenvector against `reference`, one point per grid
/// index, plotted against `sampleRange`.
///
/// # Errors
///
/// Returns an error if `sampleRange` or `eigenvectors` is missing, or if the
/// reference has a different dimension.
pub fn first_eigenvector_error(
    record: &ExperimentRecord,
    reference: &[f64],
    selection: Selection,
) -> Result<Curve> {
    let (_, d) = selection.resolve(record)?;
    let samples = require(record.sample_range(), "sampleRange")?;
    let eivecs = require(record.eigenvectors(), "eigenvectors")?;
    if eivecs.len_of(0) != reference.len() {
        return Err(Error::InvalidInput(format!(
            "reference eigenvector has dimension {}, record has {}",
            reference.len(),
            eivecs.len_of(0)
        )));
    }

    let y = (0..eivecs.len_of(2))
        .map(|g| eigenvector(record, 0, g, d).map(|v| eigenvector_distance(&v, reference)))
        .collect::<Result<Vec<_>>>()?;
    Ok(Curve {
        x: samples.to_vec(),
        y,
    })
}

/// Stored error against problem size.
///
/// # Errors
///
/// Returns an error if the needed arrays are missing or the selection is out of range.
pub fn error_curve(
    record: &ExperimentRecord,
    metric: ErrorMetric,
    axis: ErrorAxis,
    selection: Selection,
) -> Result<Curve> {
    let errors = match metric {
        ErrorMetric::L2 => require(record.l2_errors(), "l2Errors")?,
        ErrorMetric::Integral => require(record.integral_errors(), "integralErrors")?,
    };
    let (g, d) = selection.resolve(record)?;
    match axis {
        ErrorAxis::GridWise => {
            let sizes = require(record.num_grid_points(), "numGridPointsArray")?;
            Ok(Curve {
                x: sizes.lane(0, &[d])?,
                y: errors.lane(0, &[d])?,
            })
        }
        ErrorAxis::DataWise => {
            let sizes = require(record.data_range(), "dataRange")?;
            Ok(Curve {
                x: sizes.to_vec(),
                y: errors.lane(1, &[g])?,
            })
        }
    }
}

/// Normalized interval a method's 1D response curve was evaluated on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UnitInterval {
    /// `[0, 1]`
    ZeroOne,
    /// `[-1, 1]`, re-centred onto `[0, 1]` before mapping
    Symmetric,
}

/// How a method's normalized response-curve abscissae map onto the stored
/// bounds of the projected coordinate `w₁ᵀx`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShadowDomainPolicy {
    /// Interval the curve was evaluated on
    pub unit: UnitInterval,
    /// Replaces the stored lower bound before mapping
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lower_bound_override: Option<f64>,
}

impl ShadowDomainPolicy {
    /// `[0, 1]` onto the stored bounds.
    #[must_use]
    pub const fn unit() -> Self {
        Self {
            unit: UnitInterval::ZeroOne,
            lower_bound_override: None,
        }
    }

    /// `[-1, 1]` onto the stored bounds.
    #[must_use]
    pub const fn symmetric() -> Self {
        Self {
            unit: UnitInterval::Symmetric,
            lower_bound_override: None,
        }
    }

    /// Replace the stored lower bound by `lower` before mapping.
    #[must_use]
    pub const fn with_lower_bound(mut self, lower: f64) -> Self {
        self.lower_bound_override = Some(lower);
        self
    }

    /// Map one normalized value onto `[lower, upper]`.
    #[must_use]
    pub fn map(&self, t: f64, lower: f64, upper: f64) -> f64 {
        let lower = self.lower_bound_override.unwrap_or(lower);
        let s = match self.unit {
            UnitInterval::ZeroOne => t,
            UnitInterval::Symmetric => (t + 1.0) / 2.0,
        };
        lower + s * (upper - lower)
    }

    /// `n` evenly spaced abscissae covering the mapped interval.
    #[must_use]
    pub fn abscissae(&self, n: usize, lower: f64, upper: f64) -> Vec<f64> {
        let (a, b) = match self.unit {
            UnitInterval::ZeroOne => (0.0, 1.0),
            UnitInterval::Symmetric => (-1.0, 1.0),
        };
        linspace(a, b, n)
            .into_iter()
            .map(|t| self.map(t, lower, upper))
            .collect()
    }
}

/// Response-curve policy per method; methods without one get no curve.
#[derive(Debug, Clone, PartialEq)]
pub struct ShadowPolicies(HashMap<Method, ShadowDomainPolicy>);

impl Default for ShadowPolicies {
    /// `asSGpp` curves live on `[0, 1]`. `QPHD` curves live on `[-1, 1]`
    /// and `w₁ᵀx` is taken to start at zero for them.
    fn default() -> Self {
        let mut map = HashMap::new();
        map.insert(Method::AsSgpp, ShadowDomainPolicy::unit());
        map.insert(
            Method::Qphd,
            ShadowDomainPolicy::symmetric().with_lower_bound(0.0),
        );
        Self(map)
    }
}

impl ShadowPolicies {
    /// No policies at all.
    #[must_use]
    pub fn empty() -> Self {
        Self(HashMap::new())
    }

    /// Add or replace the policy of `method`.
    pub fn insert(&mut self, method: Method, policy: ShadowDomainPolicy) {
        self.0.insert(method, policy);
    }

    /// Get the policy of `method`, if any.
    #[must_use]
    pub fn get(&self, method: Method) -> Option<&ShadowDomainPolicy> {
        self.0.get(&method)
    }
}

/// Monte Carlo settings for shadow backgrounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShadowSampling {
    /// Number of domain samples
    pub samples: usize,
    /// RNG seed, fixed so reruns produce identical charts
    pub seed: u64,
}

impl Default for ShadowSampling {
    fn default() -> Self {
        Self {
            samples: 2500,
            seed: 0x00C0_FFEE,
        }
    }
}

/// Data behind a 1D shadow plot.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Shadow1D {
    /// `(w₁ᵀx, f(x))` for uniformly sampled `x`
    pub background: Vec<(f64, f64)>,
    /// Surrogate response along `w₁ᵀx`, if the method has a domain policy
    pub response: Option<Curve>,
    /// `(w₁ᵀx, y)` of the training set, for data-driven surrogates
    pub training: Option<Vec<(f64, f64)>>,
}

/// Data behind a 2D shadow plot: `(w₁ᵀx, w₂ᵀx, f(x))`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Shadow2D {
    /// Projected samples with their true value
    pub points: Vec<(f64, f64, f64)>,
}

/// `n` evenly spaced values from `a` to `b` inclusive.
#[must_use]
pub fn linspace(a: f64, b: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![a],
        _ => {
            let step = (b - a) / (n - 1) as f64;
            (0..n)
                .map(|i| if i == n - 1 { b } else { a + step * i as f64 })
                .collect()
        }
    }
}

/// Uniform samples from the function's box domain, one `Vec` per sample.
#[must_use]
pub fn sample_domain(
    function: &dyn ObjectiveFunction,
    sampling: ShadowSampling,
) -> Vec<Vec<f64>> {
    let (lower, upper) = function.domain();
    let mut rng = StdRng::seed_from_u64(sampling.seed);
    (0..sampling.samples)
        .map(|_| {
            lower
                .iter()
                .zip(&upper)
                .map(|(&lb, &ub)| if ub > lb { rng.gen_range(lb..ub) } else { lb })
                .collect()
        })
        .collect()
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

fn check_dimension(function: &dyn ObjectiveFunction, direction: &[f64]) -> Result<()> {
    if direction.len() == function.dim() {
        Ok(())
    } else {
        Err(Error::InvalidInput(format!(
            "eigenvectors have dimension {}, `{}` has {}",
            direction.len(),
            function.name(),
            function.dim()
        )))
    }
}

/// Samples projected onto `direction` next to their true function value.
///
/// # Errors
///
/// Returns `Error::InvalidInput` if `direction` does not match the function's dimension.
pub fn project_samples(
    function: &dyn ObjectiveFunction,
    direction: &[f64],
    sampling: ShadowSampling,
) -> Result<Vec<(f64, f64)>> {
    check_dimension(function, direction)?;
    Ok(sample_domain(function, sampling)
        .iter()
        .map(|x| (dot(direction, x), function.eval(x)))
        .collect())
}

/// Everything a 1D shadow plot shows for one record.
///
/// `experiment_dir` locates the training files of data-driven records.
///
/// # Errors
///
/// Returns an error if eigenvectors are missing or mis-dimensioned. Training
/// files that cannot be read only drop the overlay, with a warning.
pub fn shadow_1d(
    record: &ExperimentRecord,
    function: &dyn ObjectiveFunction,
    policies: &ShadowPolicies,
    sampling: ShadowSampling,
    experiment_dir: &Path,
    selection: Selection,
) -> Result<Shadow1D> {
    let (g, d) = selection.resolve(record)?;
    let w1 = eigenvector(record, 0, g, d)?;
    let background = project_samples(function, &w1, sampling)?;

    let response = match policies.get(record.method()) {
        Some(policy) => Some(response_curve(record, policy, g, d)?),
        None => {
            warn!(
                method = %record.method(),
                "no response-curve domain for method, drawing the shadow only"
            );
            None
        }
    };

    let training = if record.response_type().is_data_driven() {
        match training_overlay(record, experiment_dir, &w1, d) {
            Ok(points) => Some(points),
            Err(err) if err.is_skippable() => {
                warn!(
                    path = %experiment_dir.display(),
                    error = %err,
                    "training data unavailable, drawing the shadow without it"
                );
                None
            }
            Err(err) => return Err(err),
        }
    } else {
        None
    };

    debug!(
        samples = background.len(),
        has_response = response.is_some(),
        has_training = training.is_some(),
        "extracted 1D shadow"
    );
    Ok(Shadow1D {
        background,
        response,
        training,
    })
}

fn response_curve(
    record: &ExperimentRecord,
    policy: &ShadowDomainPolicy,
    g: usize,
    d: usize,
) -> Result<Curve> {
    let evaluations = require(record.shadow_1d_evaluations(), "shadow1DEvaluationsArray")?;
    let bounds = require(record.bounds(), "boundsArray")?;
    let y = evaluations.lane(0, &[g, d])?;
    let n = record.num_shadow_1d_points().unwrap_or(y.len());
    let x = policy.abscissae(n, bounds.get(&[0, g, d])?, bounds.get(&[1, g, d])?);
    Ok(Curve { x, y })
}

fn training_overlay(
    record: &ExperimentRecord,
    experiment_dir: &Path,
    direction: &[f64],
    d: usize,
) -> Result<Vec<(f64, f64)>> {
    let num_data = require(record.data_range(), "dataRange")?.get(&[d])?;
    if !(num_data.is_finite() && num_data >= 0.0) {
        return Err(Error::InvalidInput(format!(
            "dataRange entry {num_data} is not a sample count"
        )));
    }
    let data = load_training_data(experiment_dir, num_data.round() as usize)?;
    project_training(&data, direction)
}

fn project_training(data: &TrainingData, direction: &[f64]) -> Result<Vec<(f64, f64)>> {
    let projected = data.project(direction)?;
    Ok(projected.into_iter().zip(data.values.iter().copied()).collect())
}

/// Samples projected onto the two leading eigenvectors.
///
/// # Errors
///
/// Returns an error if the record has fewer than two eigenvectors or they do
/// not match the function's dimension.
pub fn shadow_2d(
    record: &ExperimentRecord,
    function: &dyn ObjectiveFunction,
    sampling: ShadowSampling,
    selection: Selection,
) -> Result<Shadow2D> {
    let (g, d) = selection.resolve(record)?;
    let rank = require(record.eigenvectors(), "eigenvectors")?.len_of(1);
    if rank < 2 {
        return Err(Error::InvalidInput(format!(
            "2D shadow needs two eigenvectors, record has {rank}"
        )));
    }
    let w1 = eigenvector(record, 0, g, d)?;
    let w2 = eigenvector(record, 1, g, d)?;
    check_dimension(function, &w1)?;

    let points = sample_domain(function, sampling)
        .iter()
        .map(|x| (dot(&w1, x), dot(&w2, x), function.eval(x)))
        .collect();
    Ok(Shadow2D { points })
}
