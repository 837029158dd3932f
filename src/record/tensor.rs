//! Tensor - dense N-d array persisted alongside experiment records

use ndarray::{Array1, ArrayD, ArrayViewD, Axis, Dimension, IxDyn};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Dense N-dimensional `f64` array.
///
/// Persisted as `{"shape": [..], "data": [..]}` with `data` in row-major
/// order. Non-finite entries are written as the strings `"nan"`, `"inf"`
/// and `"-inf"` so every value survives a round trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawTensor", into = "RawTensor")]
pub struct Tensor {
    data: ArrayD<f64>,
}

#[derive(Serialize, Deserialize)]
struct RawTensor {
    shape: Vec<usize>,
    data: Vec<Element>,
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum Element {
    Finite(f64),
    NonFinite(NonFinite),
}

#[derive(Serialize, Deserialize)]
enum NonFinite {
    #[serde(rename = "nan")]
    Nan,
    #[serde(rename = "inf")]
    Inf,
    #[serde(rename = "-inf")]
    NegInf,
}

impl From<f64> for Element {
    fn from(v: f64) -> Self {
        if v.is_finite() {
            Self::Finite(v)
        } else if v.is_nan() {
            Self::NonFinite(NonFinite::Nan)
        } else if v.is_sign_positive() {
            Self::NonFinite(NonFinite::Inf)
        } else {
            Self::NonFinite(NonFinite::NegInf)
        }
    }
}

impl From<Element> for f64 {
    fn from(e: Element) -> Self {
        match e {
            Element::Finite(v) => v,
            Element::NonFinite(NonFinite::Nan) => Self::NAN,
            Element::NonFinite(NonFinite::Inf) => Self::INFINITY,
            Element::NonFinite(NonFinite::NegInf) => Self::NEG_INFINITY,
        }
    }
}

impl TryFrom<RawTensor> for Tensor {
    type Error = Error;

    fn try_from(raw: RawTensor) -> Result<Self> {
        Self::new(raw.shape, raw.data.into_iter().map(f64::from).collect())
    }
}

impl From<Tensor> for RawTensor {
    fn from(tensor: Tensor) -> Self {
        Self {
            shape: tensor.data.shape().to_vec(),
            // logical order is row-major whatever the memory layout
            data: tensor.data.iter().map(|&v| Element::from(v)).collect(),
        }
    }
}

impl Tensor {
    /// Create a tensor, checking that `data` fills `shape` exactly.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidInput` when the element count disagrees with
    /// the shape or the shape's size overflows `usize`.
    pub fn new(shape: Vec<usize>, data: Vec<f64>) -> Result<Self> {
        let len = data.len();
        let data = ArrayD::from_shape_vec(IxDyn(&shape), data).map_err(|e| {
            Error::InvalidInput(format!("shape {shape:?} cannot hold {len} elements: {e}"))
        })?;
        Ok(Self { data })
    }

    /// One-dimensional tensor.
    #[must_use]
    pub fn from_vec(data: Vec<f64>) -> Self {
        Self {
            data: Array1::from(data).into_dyn(),
        }
    }

    /// Tensor filled by evaluating `f` at every multi-index.
    ///
    /// # Panics
    ///
    /// Panics if the size of `shape` overflows `usize`.
    #[must_use]
    pub fn from_fn(shape: Vec<usize>, mut f: impl FnMut(&[usize]) -> f64) -> Self {
        Self {
            data: ArrayD::from_shape_fn(IxDyn(&shape), |ix| f(ix.slice())),
        }
    }

    /// Get the extent of every axis
    #[must_use]
    pub fn shape(&self) -> &[usize] {
        self.data.shape()
    }

    /// Get the number of axes
    #[must_use]
    pub fn ndim(&self) -> usize {
        self.data.ndim()
    }

    /// Borrow the underlying array.
    #[must_use]
    pub fn view(&self) -> ArrayViewD<'_, f64> {
        self.data.view()
    }

    /// Contents in row-major order.
    #[must_use]
    pub fn to_vec(&self) -> Vec<f64> {
        self.data.iter().copied().collect()
    }

    /// Extent of `axis`, zero if the axis does not exist.
    #[must_use]
    pub fn len_of(&self, axis: usize) -> usize {
        self.data.shape().get(axis).copied().unwrap_or(0)
    }

    /// Element at a full multi-index.
    ///
    /// # Errors
    ///
    /// Returns `Error::IndexOutOfRange` for any index past its axis.
    pub fn get(&self, index: &[usize]) -> Result<f64> {
        if index.len() != self.ndim() {
            return Err(Error::InvalidInput(format!(
                "index of rank {} into tensor of rank {}",
                index.len(),
                self.ndim()
            )));
        }
        self.check_bounds(index.iter().copied().enumerate())?;
        self.data
            .get(index)
            .copied()
            .ok_or_else(|| Error::InvalidInput(format!("index {index:?} outside {:?}", self.shape())))
    }

    /// All values along `axis`, with every other axis fixed by `fixed`
    /// (given in axis order, skipping `axis` itself).
    ///
    /// `lane(0, &[g, d])` on a `rank × grid × data` tensor is the numpy
    /// slice `t[:, g, d]`.
    ///
    /// # Errors
    ///
    /// Returns an error when `fixed` has the wrong length or an index is out of range.
    pub fn lane(&self, axis: usize, fixed: &[usize]) -> Result<Vec<f64>> {
        if axis >= self.ndim() || fixed.len() + 1 != self.ndim() {
            return Err(Error::InvalidInput(format!(
                "lane along axis {axis} with {} fixed indices on shape {:?}",
                fixed.len(),
                self.shape()
            )));
        }
        let fixed_axes: Vec<(usize, usize)> = (0..self.ndim())
            .filter(|&a| a != axis)
            .zip(fixed.iter().copied())
            .collect();
        self.check_bounds(fixed_axes.iter().copied())?;

        // highest axis first so the lower axis numbers stay valid
        let mut view = self.data.view();
        for &(a, i) in fixed_axes.iter().rev() {
            view = view.index_axis_move(Axis(a), i);
        }
        Ok(view.iter().copied().collect())
    }

    fn check_bounds(&self, pairs: impl Iterator<Item = (usize, usize)>) -> Result<()> {
        for (axis, index) in pairs {
            let len = self.len_of(axis);
            if index >= len {
                return Err(Error::IndexOutOfRange { index, len });
            }
        }
        Ok(())
    }
}

/// Resolve an optional index against an axis, `None` meaning the last entry.
///
/// # Errors
///
/// Returns `Error::IndexOutOfRange` for an empty axis or an index past its end.
pub fn resolve_index(index: Option<usize>, len: usize) -> Result<usize> {
    match index {
        Some(i) if i < len => Ok(i),
        Some(i) => Err(Error::IndexOutOfRange { index: i, len }),
        None if len > 0 => Ok(len - 1),
        None => Err(Error::IndexOutOfRange { index: 0, len }),
    }
}
