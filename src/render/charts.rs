//! Chart renderers, one per quantity of interest
//!
//! Each call sets the axes for its chart kind and appends the series of one
//! record to the figure; several calls on the same figure overlay records.

use super::figure::{Figure, Layer, Scale};
use super::style::{lighten, MarkerShape, SeriesStyle};
use crate::extract::{Curve, ErrorAxis, ErrorMetric, Shadow1D, Shadow2D};

/// Shadow scatter: lightened series colour, mostly transparent.
const SHADOW_LIGHTEN: f64 = 0.5;
const SHADOW_ALPHA: f64 = 0.3;

/// Eigenvalue decay on a logarithmic y-axis.
pub fn eigenvalues(fig: &mut Figure, values: &[f64], label: &str, style: SeriesStyle) {
    fig.set_axes("index", Scale::Linear, "eigenvalues", Scale::Log);
    fig.push(Layer::Line {
        label: Some(label.to_string()),
        points: values
            .iter()
            .enumerate()
            .map(|(i, &v)| (i as f64, v))
            .collect(),
        style,
        markers: true,
    });
}

/// Leading eigenvector error against number of samples, log-log.
pub fn eigenvector_error(fig: &mut Figure, curve: &Curve, label: &str, style: SeriesStyle) {
    fig.set_axes(
        "number of points",
        Scale::Log,
        "error in first eigenvector",
        Scale::Log,
    );
    push_curve(fig, curve, label, style);
}

/// Stored L2 or integral error against grid or data size, log-log.
pub fn error_curve(
    fig: &mut Figure,
    metric: ErrorMetric,
    axis: ErrorAxis,
    curve: &Curve,
    label: &str,
    style: SeriesStyle,
) {
    let x_label = match (metric, axis) {
        (ErrorMetric::L2, ErrorAxis::GridWise) => "number of grid points",
        (ErrorMetric::L2, ErrorAxis::DataWise) => "number of data points",
        (ErrorMetric::Integral, _) => "number of points",
    };
    let y_label = match metric {
        ErrorMetric::L2 => "l2 error",
        ErrorMetric::Integral => "integral error",
    };
    fig.set_axes(x_label, Scale::Log, y_label, Scale::Log);
    push_curve(fig, curve, label, style);
}

fn push_curve(fig: &mut Figure, curve: &Curve, label: &str, style: SeriesStyle) {
    fig.push(Layer::Line {
        label: Some(label.to_string()),
        points: curve.points(),
        style,
        markers: true,
    });
}

/// 1D shadow: sampled truth as a faint background, the surrogate's response
/// curve on top, and the training points of data-driven surrogates.
pub fn shadow_1d(fig: &mut Figure, shadow: &Shadow1D, label: &str, style: SeriesStyle) {
    fig.set_axes("w1^T x", Scale::Linear, "f(x)", Scale::Linear);
    fig.push(Layer::Scatter {
        label: None,
        points: shadow.background.clone(),
        color: lighten(style.color, SHADOW_LIGHTEN),
        alpha: SHADOW_ALPHA,
        marker: MarkerShape::Circle,
        hollow: true,
    });
    if let Some(response) = &shadow.response {
        fig.push(Layer::Line {
            label: Some(label.to_string()),
            points: response.points(),
            style,
            markers: false,
        });
    }
    if let Some(training) = &shadow.training {
        fig.push(Layer::Scatter {
            label: None,
            points: training.clone(),
            color: plotters::style::BLACK,
            alpha: 1.0,
            marker: MarkerShape::Plus,
            hollow: false,
        });
    }
}

/// 2D shadow over the two leading directions, coloured by `f(x)`.
pub fn shadow_2d(fig: &mut Figure, shadow: &Shadow2D, label: &str) {
    fig.set_title(label);
    fig.set_axes("w1^T x", Scale::Linear, "w2^T x", Scale::Linear);
    fig.push(Layer::ValueScatter {
        points: shadow.points.clone(),
    });
}
