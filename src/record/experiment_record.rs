//! Experiment Record - one persisted run of the experiment pipeline

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::Tensor;
use crate::error::{Error, Result};

/// Approximation method that produced a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Method {
    /// Active subspace from exact gradients
    #[serde(rename = "AS")]
    As,
    /// Active subspace from a global linear model
    #[serde(rename = "OLS")]
    Ols,
    /// Active subspace from a global quadratic model
    #[serde(rename = "QPHD")]
    Qphd,
    /// Active subspace from a sparse-grid surrogate
    #[serde(rename = "asSGpp")]
    AsSgpp,
    /// Plain sparse-grid surrogate, no dimension reduction
    #[serde(rename = "SGpp")]
    Sgpp,
}

/// Method families with different record layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodFamily {
    /// Records carry eigenvalues and eigenvectors
    ActiveSubspace,
    /// Records carry error curves only
    SparseGrid,
}

impl Method {
    /// Tag used in persisted records and experiment folder names.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::As => "AS",
            Self::Ols => "OLS",
            Self::Qphd => "QPHD",
            Self::AsSgpp => "asSGpp",
            Self::Sgpp => "SGpp",
        }
    }

    /// Whether the method produces an active subspace or a plain sparse grid.
    #[must_use]
    pub const fn family(self) -> MethodFamily {
        match self {
            Self::Sgpp => MethodFamily::SparseGrid,
            _ => MethodFamily::ActiveSubspace,
        }
    }
}

impl FromStr for Method {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        [Self::As, Self::Ols, Self::Qphd, Self::AsSgpp, Self::Sgpp]
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| Error::InvalidInput(format!("unknown method `{s}`")))
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the surrogate's training responses were obtained.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ResponseType {
    /// Adaptively refined grid on the true function
    Adaptive,
    /// Regular grid on the true function
    Regular,
    /// Fitted to a fixed data set
    Data,
    /// Fitted to a fixed data set with regularization
    DataR,
    /// Data-driven refinement
    Datadriven,
    /// Data-driven refinement with regularization
    DatadrivenR,
    /// Anything else the experiment runner wrote
    Other(String),
}

impl ResponseType {
    /// Whether the surrogate was fitted to sampled data, so data-wise
    /// errors and training-point overlays exist.
    #[must_use]
    pub const fn is_data_driven(&self) -> bool {
        matches!(
            self,
            Self::Data | Self::DataR | Self::Datadriven | Self::DatadrivenR
        )
    }

    /// Tag used in persisted records and experiment folder names.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Adaptive => "adaptive",
            Self::Regular => "regular",
            Self::Data => "data",
            Self::DataR => "dataR",
            Self::Datadriven => "datadriven",
            Self::DatadrivenR => "datadrivenR",
            Self::Other(s) => s,
        }
    }
}

impl From<String> for ResponseType {
    fn from(s: String) -> Self {
        match s.as_str() {
            "adaptive" => Self::Adaptive,
            "regular" => Self::Regular,
            "data" => Self::Data,
            "dataR" => Self::DataR,
            "datadriven" => Self::Datadriven,
            "datadrivenR" => Self::DatadrivenR,
            _ => Self::Other(s),
        }
    }
}

impl From<ResponseType> for String {
    fn from(r: ResponseType) -> Self {
        r.as_str().to_string()
    }
}

impl fmt::Display for ResponseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Experiment Record holds the metadata and result arrays of one experiment.
///
/// All arrays share a positional `grid × data` indexing scheme on their
/// trailing axes. [`ExperimentRecord::validate`] checks that alignment once,
/// at load time, so later slicing can only fail on a bad caller index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperimentRecord {
    method: Method,
    model: String,
    #[serde(default)]
    grid_type: String,
    #[serde(default)]
    degree: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    integral_type: Option<String>,
    response_type: ResponseType,

    /// rank × grid × data
    #[serde(default, skip_serializing_if = "Option::is_none")]
    eigenvalues: Option<Tensor>,
    /// dim × rank × grid × data
    #[serde(default, skip_serializing_if = "Option::is_none")]
    eigenvectors: Option<Tensor>,
    /// grid × data
    #[serde(default, skip_serializing_if = "Option::is_none")]
    l2_errors: Option<Tensor>,
    /// grid × data
    #[serde(default, skip_serializing_if = "Option::is_none")]
    integral_errors: Option<Tensor>,
    /// grid × data
    #[serde(default, skip_serializing_if = "Option::is_none")]
    num_grid_points_array: Option<Tensor>,
    /// data
    #[serde(default, skip_serializing_if = "Option::is_none")]
    data_range: Option<Tensor>,
    /// grid
    #[serde(default, skip_serializing_if = "Option::is_none")]
    sample_range: Option<Tensor>,
    /// points × grid × data
    #[serde(
        rename = "shadow1DEvaluationsArray",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    shadow_1d_evaluations_array: Option<Tensor>,
    #[serde(
        rename = "numShadow1DPoints",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    num_shadow_1d_points: Option<usize>,
    /// 2 × grid × data
    #[serde(default, skip_serializing_if = "Option::is_none")]
    bounds_array: Option<Tensor>,
}

impl ExperimentRecord {
    /// Create a builder for a record of the given method and model.
    #[must_use]
    pub fn builder(
        method: Method,
        model: impl Into<String>,
        response_type: ResponseType,
    ) -> ExperimentRecordBuilder {
        ExperimentRecordBuilder::new(method, model, response_type)
    }

    /// Get the approximation method
    #[must_use]
    pub const fn method(&self) -> Method {
        self.method
    }

    /// Get the objective function name
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Get the sparse grid type
    #[must_use]
    pub fn grid_type(&self) -> &str {
        &self.grid_type
    }

    /// Get the basis degree
    #[must_use]
    pub const fn degree(&self) -> u32 {
        self.degree
    }

    /// Get the integral type, if any
    #[must_use]
    pub fn integral_type(&self) -> Option<&str> {
        self.integral_type.as_deref()
    }

    /// Get the response type
    #[must_use]
    pub const fn response_type(&self) -> &ResponseType {
        &self.response_type
    }

    /// Get the eigenvalues, `rank × grid × data`
    #[must_use]
    pub const fn eigenvalues(&self) -> Option<&Tensor> {
        self.eigenvalues.as_ref()
    }

    /// Get the eigenvectors, `dim × rank × grid × data`
    #[must_use]
    pub const fn eigenvectors(&self) -> Option<&Tensor> {
        self.eigenvectors.as_ref()
    }

    /// Get the L2 errors, `grid × data`
    #[must_use]
    pub const fn l2_errors(&self) -> Option<&Tensor> {
        self.l2_errors.as_ref()
    }

    /// Get the integral errors, `grid × data`
    #[must_use]
    pub const fn integral_errors(&self) -> Option<&Tensor> {
        self.integral_errors.as_ref()
    }

    /// Get the grid point counts, `grid × data`
    #[must_use]
    pub const fn num_grid_points(&self) -> Option<&Tensor> {
        self.num_grid_points_array.as_ref()
    }

    /// Get the data sizes, one per data index
    #[must_use]
    pub const fn data_range(&self) -> Option<&Tensor> {
        self.data_range.as_ref()
    }

    /// Get the sample sizes, one per grid index
    #[must_use]
    pub const fn sample_range(&self) -> Option<&Tensor> {
        self.sample_range.as_ref()
    }

    /// Get the response-curve values, `points × grid × data`
    #[must_use]
    pub const fn shadow_1d_evaluations(&self) -> Option<&Tensor> {
        self.shadow_1d_evaluations_array.as_ref()
    }

    /// Get the number of response-curve points
    #[must_use]
    pub const fn num_shadow_1d_points(&self) -> Option<usize> {
        self.num_shadow_1d_points
    }

    /// Get the active-coordinate bounds, `2 × grid × data`
    #[must_use]
    pub const fn bounds(&self) -> Option<&Tensor> {
        self.bounds_array.as_ref()
    }

    /// Legend label for charts comparing several records.
    #[must_use]
    pub fn label(&self) -> String {
        match self.method {
            Method::As => "exact gradients".to_string(),
            Method::Ols => "linear approximation".to_string(),
            Method::Qphd => "quadratic approximation".to_string(),
            Method::AsSgpp => format!(
                "{}_{}_{}_{}_{}",
                self.method,
                self.grid_type,
                self.degree,
                self.integral_type.as_deref().unwrap_or("none"),
                self.response_type
            ),
            Method::Sgpp => format!("{}_{}_{}", self.method, self.grid_type, self.degree),
        }
    }

    /// Grid and data extents shared by every array of the record.
    #[must_use]
    pub fn extents(&self) -> Option<(usize, usize)> {
        let two_d = [&self.l2_errors, &self.integral_errors, &self.num_grid_points_array]
            .into_iter()
            .flatten()
            .find(|t| t.ndim() == 2)
            .map(|t| (t.len_of(0), t.len_of(1)));
        two_d.or_else(|| {
            self.eigenvalues
                .as_ref()
                .filter(|t| t.ndim() == 3)
                .map(|t| (t.len_of(1), t.len_of(2)))
        })
    }

    /// Check the record layout for its method family and the alignment of
    /// the `grid × data` axes across all arrays.
    ///
    /// # Errors
    ///
    /// Returns `Error::MissingArray` when the method family requires an absent
    /// array and `Error::ShapeMismatch` naming the first misaligned array.
    pub fn validate(&self) -> Result<()> {
        if self.method.family() == MethodFamily::ActiveSubspace {
            if self.eigenvalues.is_none() {
                return Err(Error::MissingArray("eigenvalues"));
            }
            if self.eigenvectors.is_none() {
                return Err(Error::MissingArray("eigenvectors"));
            }
        }

        let Some((g, d)) = self.extents() else {
            return Ok(());
        };

        for (name, tensor) in [
            ("l2Errors", &self.l2_errors),
            ("integralErrors", &self.integral_errors),
            ("numGridPointsArray", &self.num_grid_points_array),
        ] {
            if let Some(t) = tensor {
                check_trailing(name, t, 0, g, d, "grid × data")?;
            }
        }

        let rank = match &self.eigenvalues {
            Some(t) => {
                check_trailing("eigenvalues", t, 1, g, d, "rank × grid × data")?;
                Some(t.len_of(0))
            }
            None => None,
        };
        if let Some(t) = &self.eigenvectors {
            check_trailing("eigenvectors", t, 2, g, d, "dim × rank × grid × data")?;
            if rank.is_some_and(|r| r != t.len_of(1)) {
                return Err(mismatch("eigenvectors", "rank axis matching eigenvalues", t));
            }
        }
        if let Some(t) = &self.bounds_array {
            check_trailing("boundsArray", t, 1, g, d, "2 × grid × data")?;
            if t.len_of(0) < 2 {
                return Err(mismatch("boundsArray", "2 × grid × data", t));
            }
        }
        if let Some(t) = &self.shadow_1d_evaluations_array {
            check_trailing("shadow1DEvaluationsArray", t, 1, g, d, "points × grid × data")?;
            if self.num_shadow_1d_points.is_some_and(|n| n != t.len_of(0)) {
                return Err(mismatch(
                    "shadow1DEvaluationsArray",
                    "numShadow1DPoints × grid × data",
                    t,
                ));
            }
        }
        if let Some(t) = &self.data_range {
            if t.ndim() != 1 || t.len_of(0) != d {
                return Err(mismatch("dataRange", &format!("[{d}]"), t));
            }
        }
        if let Some(t) = &self.sample_range {
            if t.ndim() != 1 || t.len_of(0) != g {
                return Err(mismatch("sampleRange", &format!("[{g}]"), t));
            }
        }
        Ok(())
    }
}

fn check_trailing(
    name: &'static str,
    t: &Tensor,
    leading: usize,
    g: usize,
    d: usize,
    layout: &str,
) -> Result<()> {
    if t.ndim() != leading + 2 || t.len_of(leading) != g || t.len_of(leading + 1) != d {
        return Err(mismatch(name, &format!("{layout} with grid={g}, data={d}"), t));
    }
    Ok(())
}

fn mismatch(array: &'static str, expected: &str, t: &Tensor) -> Error {
    Error::ShapeMismatch {
        array,
        expected: expected.to_string(),
        found: t.shape().to_vec(),
    }
}

/// Builder for `ExperimentRecord`.
#[derive(Debug)]
pub struct ExperimentRecordBuilder {
    record: ExperimentRecord,
}

impl ExperimentRecordBuilder {
    /// Create a new builder with required fields.
    #[must_use]
    pub fn new(method: Method, model: impl Into<String>, response_type: ResponseType) -> Self {
        Self {
            record: ExperimentRecord {
                method,
                model: model.into(),
                grid_type: String::new(),
                degree: 0,
                integral_type: None,
                response_type,
                eigenvalues: None,
                eigenvectors: None,
                l2_errors: None,
                integral_errors: None,
                num_grid_points_array: None,
                data_range: None,
                sample_range: None,
                shadow_1d_evaluations_array: None,
                num_shadow_1d_points: None,
                bounds_array: None,
            },
        }
    }

    /// Set the sparse grid type
    #[must_use]
    pub fn grid_type(mut self, grid_type: impl Into<String>) -> Self {
        self.record.grid_type = grid_type.into();
        self
    }

    /// Set the basis degree
    #[must_use]
    pub const fn degree(mut self, degree: u32) -> Self {
        self.record.degree = degree;
        self
    }

    /// Set the integral type
    #[must_use]
    pub fn integral_type(mut self, integral_type: impl Into<String>) -> Self {
        self.record.integral_type = Some(integral_type.into());
        self
    }

    /// Set the eigenvalues
    #[must_use]
    pub fn eigenvalues(mut self, t: Tensor) -> Self {
        self.record.eigenvalues = Some(t);
        self
    }

    /// Set the eigenvectors
    #[must_use]
    pub fn eigenvectors(mut self, t: Tensor) -> Self {
        self.record.eigenvectors = Some(t);
        self
    }

    /// Set the L2 errors
    #[must_use]
    pub fn l2_errors(mut self, t: Tensor) -> Self {
        self.record.l2_errors = Some(t);
        self
    }

    /// Set the integral errors
    #[must_use]
    pub fn integral_errors(mut self, t: Tensor) -> Self {
        self.record.integral_errors = Some(t);
        self
    }

    /// Set the grid point counts
    #[must_use]
    pub fn num_grid_points(mut self, t: Tensor) -> Self {
        self.record.num_grid_points_array = Some(t);
        self
    }

    /// Set the data sizes
    #[must_use]
    pub fn data_range(mut self, t: Tensor) -> Self {
        self.record.data_range = Some(t);
        self
    }

    /// Set the sample sizes
    #[must_use]
    pub fn sample_range(mut self, t: Tensor) -> Self {
        self.record.sample_range = Some(t);
        self
    }

    /// Set the 1D response curve evaluations and their point count.
    #[must_use]
    pub fn shadow_1d(mut self, evaluations: Tensor) -> Self {
        self.record.num_shadow_1d_points = Some(evaluations.len_of(0));
        self.record.shadow_1d_evaluations_array = Some(evaluations);
        self
    }

    /// Set the active-coordinate bounds
    #[must_use]
    pub fn bounds(mut self, t: Tensor) -> Self {
        self.record.bounds_array = Some(t);
        self
    }

    /// Build and validate the record.
    ///
    /// # Errors
    ///
    /// See [`ExperimentRecord::validate`].
    pub fn build(self) -> Result<ExperimentRecord> {
        self.record.validate()?;
        Ok(self.record)
    }
}
