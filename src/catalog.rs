//! Objective function catalog
//!
//! Test functions the experiments were run on, looked up by model name
//! (`sin5D`, `exp3D`, `atan2D`, ...). Only used to overlay ground truth:
//! true values behind shadow plots and the reference eigenvector for
//! eigenvector error curves.

use crate::error::{Error, Result};

/// An evaluable test function with known domain.
pub trait ObjectiveFunction {
    /// Model name as it appears in result records.
    fn name(&self) -> &str;

    /// Input dimension.
    fn dim(&self) -> usize;

    /// Lower and upper bound per dimension.
    fn domain(&self) -> (Vec<f64>, Vec<f64>);

    /// Evaluate at one point of length `dim()`.
    fn eval(&self, x: &[f64]) -> f64;

    /// Unit-length leading eigenvector of the gradient covariance, if known.
    fn eigenvector(&self) -> Option<Vec<f64>> {
        None
    }

    /// Integral over the domain, if known.
    fn integral(&self) -> Option<f64> {
        None
    }
}

/// Look up a catalog function by model name.
///
/// # Errors
///
/// Returns `Error::UnknownModel` if no catalog family matches the name.
pub fn get_function(model: &str) -> Result<Box<dyn ObjectiveFunction>> {
    let unknown = || Error::UnknownModel(model.to_string());

    if model == "atan2D" {
        return Ok(Box::new(Atan2D));
    }

    let (family, dim) = split_model_name(model).ok_or_else(unknown)?;
    let kind = match family {
        "sin" => RidgeKind::Sin,
        "exp" => RidgeKind::Exp,
        "sumSquares" => {
            return Ok(Box::new(SumOfSquares {
                name: model.to_string(),
                dim,
            }))
        }
        _ => return Err(unknown()),
    };
    Ok(Box::new(Ridge {
        name: model.to_string(),
        dim,
        kind,
    }))
}

/// Split `sin5D` into `("sin", 5)`.
fn split_model_name(model: &str) -> Option<(&str, usize)> {
    let stem = model.strip_suffix('D')?;
    let digits = stem.len() - stem.trim_end_matches(|c: char| c.is_ascii_digit()).len();
    if digits == 0 {
        return None;
    }
    let (family, dim) = stem.split_at(stem.len() - digits);
    let dim: usize = dim.parse().ok()?;
    (dim > 0 && !family.is_empty()).then_some((family, dim))
}

#[derive(Debug, Clone, Copy)]
enum RidgeKind {
    Sin,
    Exp,
}

/// `g(x_1 + ... + x_d)` on the unit cube. The gradient always points along
/// the diagonal, so the active subspace is one-dimensional and known.
#[derive(Debug)]
struct Ridge {
    name: String,
    dim: usize,
    kind: RidgeKind,
}

impl ObjectiveFunction for Ridge {
    fn name(&self) -> &str {
        &self.name
    }

    fn dim(&self) -> usize {
        self.dim
    }

    fn domain(&self) -> (Vec<f64>, Vec<f64>) {
        (vec![0.0; self.dim], vec![1.0; self.dim])
    }

    fn eval(&self, x: &[f64]) -> f64 {
        let s: f64 = x.iter().sum();
        match self.kind {
            RidgeKind::Sin => s.sin(),
            RidgeKind::Exp => s.exp(),
        }
    }

    fn eigenvector(&self) -> Option<Vec<f64>> {
        let w = 1.0 / (self.dim as f64).sqrt();
        Some(vec![w; self.dim])
    }

    fn integral(&self) -> Option<f64> {
        let d = i32::try_from(self.dim).ok()?;
        match self.kind {
            // Im(((e^i - 1) / i)^d), with (e^i - 1) / i = sin 1 + i (1 - cos 1)
            RidgeKind::Sin => {
                let (a, b) = (1f64.sin(), 1.0 - 1f64.cos());
                let (mut re, mut im) = (1.0, 0.0);
                for _ in 0..d {
                    (re, im) = (re * a - im * b, re * b + im * a);
                }
                Some(im)
            }
            RidgeKind::Exp => Some((std::f64::consts::E - 1.0).powi(d)),
        }
    }
}

/// `atan(5 (x_1 + x_2) - 5)` on `[0, 1]^2`.
#[derive(Debug)]
struct Atan2D;

impl ObjectiveFunction for Atan2D {
    fn name(&self) -> &str {
        "atan2D"
    }

    fn dim(&self) -> usize {
        2
    }

    fn domain(&self) -> (Vec<f64>, Vec<f64>) {
        (vec![0.0; 2], vec![1.0; 2])
    }

    fn eval(&self, x: &[f64]) -> f64 {
        (5.0 * (x[0] + x[1]) - 5.0).atan()
    }

    fn eigenvector(&self) -> Option<Vec<f64>> {
        Some(vec![std::f64::consts::FRAC_1_SQRT_2; 2])
    }

    fn integral(&self) -> Option<f64> {
        // symmetric about x_1 + x_2 = 1
        Some(0.0)
    }
}

/// `x_1^2 + ... + x_d^2` on `[-1, 1]^d`. Isotropic, so there is no
/// preferred direction to compare against.
#[derive(Debug)]
struct SumOfSquares {
    name: String,
    dim: usize,
}

impl ObjectiveFunction for SumOfSquares {
    fn name(&self) -> &str {
        &self.name
    }

    fn dim(&self) -> usize {
        self.dim
    }

    fn domain(&self) -> (Vec<f64>, Vec<f64>) {
        (vec![-1.0; self.dim], vec![1.0; self.dim])
    }

    fn eval(&self, x: &[f64]) -> f64 {
        x.iter().map(|v| v * v).sum()
    }

    fn integral(&self) -> Option<f64> {
        // each coordinate contributes 2/3 times the volume 2^(d-1) of the rest
        let d = i32::try_from(self.dim).ok()?;
        Some(f64::from(d) * 2f64.powi(d) / 3.0)
    }
}
