//! Surface plot of a two-dimensional catalog function

use std::path::Path;

use plotters::coord::Shift;
use plotters::prelude::*;

use super::figure::ImageFormat;
use super::style::colormap;
use crate::catalog::ObjectiveFunction;
use crate::error::{Error, Result};
use crate::extract::linspace;

/// Sample `function` on a `resolution × resolution` grid of its domain and
/// save a 3-D surface to `path`.
///
/// # Errors
///
/// Returns `Error::InvalidInput` for functions that are not two-dimensional
/// and `Error::Render` if the backend fails.
pub fn render_surface(
    function: &dyn ObjectiveFunction,
    resolution: usize,
    path: &Path,
    size: (u32, u32),
) -> Result<()> {
    if function.dim() != 2 {
        return Err(Error::InvalidInput(format!(
            "surface plots need a 2D function, `{}` is {}D",
            function.name(),
            function.dim()
        )));
    }
    if resolution < 2 {
        return Err(Error::InvalidInput(format!(
            "surface resolution {resolution} is below 2"
        )));
    }
    match ImageFormat::from_path(path) {
        ImageFormat::Svg => draw_surface(
            function,
            resolution,
            &SVGBackend::new(path, size).into_drawing_area(),
        ),
        ImageFormat::Png => draw_surface(
            function,
            resolution,
            &BitMapBackend::new(path, size).into_drawing_area(),
        ),
    }
}

fn draw_surface<DB: DrawingBackend>(
    function: &dyn ObjectiveFunction,
    resolution: usize,
    root: &DrawingArea<DB, Shift>,
) -> Result<()> {
    let (lower, upper) = function.domain();
    let xs = linspace(lower[0], upper[0], resolution);
    let ys = linspace(lower[1], upper[1], resolution);

    let (z_min, z_max) = xs
        .iter()
        .flat_map(|&x| ys.iter().map(move |&y| (x, y)))
        .map(|(x, y)| function.eval(&[x, y]))
        .filter(|z| z.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), z| {
            (lo.min(z), hi.max(z))
        });
    let (z_min, z_max) = if z_min < z_max {
        (z_min, z_max)
    } else if z_min.is_finite() {
        (z_min - 1.0, z_min + 1.0)
    } else {
        (-1.0, 1.0)
    };
    let span = z_max - z_min;

    root.fill(&WHITE).map_err(Error::render)?;
    let mut chart = ChartBuilder::on(root)
        .caption(function.name(), ("sans-serif", 24))
        .margin(20)
        .build_cartesian_3d(lower[0]..upper[0], z_min..z_max, lower[1]..upper[1])
        .map_err(Error::render)?;
    chart.with_projection(|mut p| {
        p.pitch = 0.5;
        p.yaw = 0.6;
        p.scale = 0.8;
        p.into_matrix()
    });
    chart
        .configure_axes()
        .draw()
        .map_err(Error::render)?;

    let shade = |z: &f64| colormap((z - z_min) / span).mix(0.9).filled();
    chart
        .draw_series(
            SurfaceSeries::xoz(xs.iter().copied(), ys.iter().copied(), |x, y| {
                function.eval(&[x, y])
            })
            .style_func(&shade),
        )
        .map_err(Error::render)?;

    root.present().map_err(Error::render)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::get_function;

    #[test]
    fn test_rejects_non_2d_function() {
        let f = get_function("sin5D").unwrap();
        let err = render_surface(f.as_ref(), 10, Path::new("unused.png"), (100, 100)).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn test_rejects_degenerate_resolution() {
        let f = get_function("atan2D").unwrap();
        assert!(render_surface(f.as_ref(), 1, Path::new("unused.png"), (100, 100)).is_err());
    }
}
