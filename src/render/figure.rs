//! Figure - an explicit drawing handle that collects layers and renders
//! them in one pass when saved

use std::ops::Range;
use std::path::Path;

use plotters::coord::ranged1d::{Ranged, ValueFormatter};
use plotters::coord::Shift;
use plotters::prelude::*;
use serde::{Deserialize, Serialize};

use super::style::{colormap, marker_outline, MarkerShape, SeriesStyle};
use crate::error::{Error, Result};

/// Axis scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Scale {
    /// Linear
    #[default]
    Linear,
    /// Base 10
    Log,
}

/// Image format of saved figures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    /// Bitmap
    #[default]
    Png,
    /// Vector
    Svg,
}

impl ImageFormat {
    /// File extension without the dot.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Svg => "svg",
        }
    }

    /// Format implied by a file extension, PNG for anything unrecognized.
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("svg") => Self::Svg,
            _ => Self::Png,
        }
    }
}

/// One overlay on the axes.
#[derive(Debug, Clone, PartialEq)]
pub enum Layer {
    /// Connected series with a marker at every point
    Line {
        /// Legend entry
        label: Option<String>,
        /// Data coordinates
        points: Vec<(f64, f64)>,
        /// Colour and marker
        style: SeriesStyle,
        /// Draw the marker at each point
        markers: bool,
    },
    /// Unconnected points of one colour
    Scatter {
        /// Legend entry
        label: Option<String>,
        /// Data coordinates
        points: Vec<(f64, f64)>,
        /// Fill or stroke colour
        color: RGBColor,
        /// Opacity in `[0, 1]`
        alpha: f64,
        /// Marker shape
        marker: MarkerShape,
        /// Stroke the outline only
        hollow: bool,
    },
    /// Points coloured by a third value
    ValueScatter {
        /// `(x, y, value)` triples
        points: Vec<(f64, f64, f64)>,
    },
}

impl Layer {
    fn label(&self) -> Option<&str> {
        match self {
            Self::Line { label, .. } | Self::Scatter { label, .. } => label.as_deref(),
            Self::ValueScatter { .. } => None,
        }
    }

    fn xy(&self) -> Box<dyn Iterator<Item = (f64, f64)> + '_> {
        match self {
            Self::Line { points, .. } | Self::Scatter { points, .. } => {
                Box::new(points.iter().copied())
            }
            Self::ValueScatter { points } => Box::new(points.iter().map(|&(x, y, _)| (x, y))),
        }
    }
}

/// Figure state threaded through the chart renderers.
///
/// Renderers only append layers and set axis metadata; nothing is drawn
/// until [`Figure::save`]. One figure per chart.
#[derive(Debug, Clone, Default)]
pub struct Figure {
    title: Option<String>,
    x_label: String,
    y_label: String,
    x_scale: Scale,
    y_scale: Scale,
    legend: bool,
    layers: Vec<Layer>,
}

const MARKER_SIZE: i32 = 4;

impl Figure {
    /// Create an empty figure.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the title drawn above the axes.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = Some(title.into());
    }

    /// Set axis descriptions and scales.
    pub fn set_axes(
        &mut self,
        x_label: impl Into<String>,
        x_scale: Scale,
        y_label: impl Into<String>,
        y_scale: Scale,
    ) {
        self.x_label = x_label.into();
        self.y_label = y_label.into();
        self.x_scale = x_scale;
        self.y_scale = y_scale;
    }

    /// Append a layer on top of the existing ones.
    pub fn push(&mut self, layer: Layer) {
        self.layers.push(layer);
    }

    /// Draw a legend of all labelled layers when the figure is saved.
    pub fn legend(&mut self) {
        self.legend = true;
    }

    /// Get the layers in drawing order
    #[must_use]
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Whether nothing has been drawn
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Labels of the labelled layers, in drawing order.
    #[must_use]
    pub fn labels(&self) -> Vec<&str> {
        self.layers.iter().filter_map(Layer::label).collect()
    }

    /// Get the x and y axis scales
    #[must_use]
    pub fn scales(&self) -> (Scale, Scale) {
        (self.x_scale, self.y_scale)
    }

    /// Get the x and y axis descriptions
    #[must_use]
    pub fn axis_labels(&self) -> (&str, &str) {
        (&self.x_label, &self.y_label)
    }

    /// Render to `path`, SVG for a `.svg` extension and PNG otherwise.
    ///
    /// # Errors
    ///
    /// Returns `Error::Render` if the backend fails.
    pub fn save(&self, path: &Path, size: (u32, u32)) -> Result<()> {
        match ImageFormat::from_path(path) {
            ImageFormat::Svg => self.draw(&SVGBackend::new(path, size).into_drawing_area()),
            ImageFormat::Png => self.draw(&BitMapBackend::new(path, size).into_drawing_area()),
        }
    }

    /// Render onto an existing drawing area.
    ///
    /// # Errors
    ///
    /// Returns `Error::Render` if the backend fails.
    pub fn draw<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>) -> Result<()> {
        root.fill(&WHITE).map_err(Error::render)?;

        let x_range = axis_range(self.xs(), self.x_scale);
        let y_range = axis_range(self.ys(), self.y_scale);

        let mut builder = ChartBuilder::on(root);
        builder
            .margin(20)
            .x_label_area_size(50)
            .y_label_area_size(70);
        if let Some(title) = &self.title {
            builder.caption(title, ("sans-serif", 24));
        }

        match (self.x_scale, self.y_scale) {
            (Scale::Linear, Scale::Linear) => {
                let chart = builder
                    .build_cartesian_2d(x_range, y_range)
                    .map_err(Error::render)?;
                self.draw_layers(chart)?;
            }
            (Scale::Linear, Scale::Log) => {
                let chart = builder
                    .build_cartesian_2d(x_range, y_range.log_scale())
                    .map_err(Error::render)?;
                self.draw_layers(chart)?;
            }
            (Scale::Log, Scale::Linear) => {
                let chart = builder
                    .build_cartesian_2d(x_range.log_scale(), y_range)
                    .map_err(Error::render)?;
                self.draw_layers(chart)?;
            }
            (Scale::Log, Scale::Log) => {
                let chart = builder
                    .build_cartesian_2d(x_range.log_scale(), y_range.log_scale())
                    .map_err(Error::render)?;
                self.draw_layers(chart)?;
            }
        }

        root.present().map_err(Error::render)
    }

    fn xs(&self) -> Vec<f64> {
        self.layers.iter().flat_map(|l| l.xy().map(|p| p.0)).collect()
    }

    fn ys(&self) -> Vec<f64> {
        self.layers.iter().flat_map(|l| l.xy().map(|p| p.1)).collect()
    }

    fn visible(&self, (x, y): (f64, f64)) -> bool {
        let ok = |v: f64, scale: Scale| v.is_finite() && (scale == Scale::Linear || v > 0.0);
        ok(x, self.x_scale) && ok(y, self.y_scale)
    }

    fn draw_layers<'a, DB, X, Y>(
        &self,
        mut chart: ChartContext<'a, DB, Cartesian2d<X, Y>>,
    ) -> Result<()>
    where
        DB: DrawingBackend + 'a,
        X: Ranged<ValueType = f64> + ValueFormatter<f64>,
        Y: Ranged<ValueType = f64> + ValueFormatter<f64>,
    {
        chart
            .configure_mesh()
            .x_desc(self.x_label.as_str())
            .y_desc(self.y_label.as_str())
            .draw()
            .map_err(Error::render)?;

        for layer in &self.layers {
            match layer {
                Layer::Line {
                    label,
                    points,
                    style,
                    markers,
                } => {
                    let visible: Vec<(f64, f64)> =
                        points.iter().copied().filter(|&p| self.visible(p)).collect();
                    let color = style.color;
                    let series = chart
                        .draw_series(LineSeries::new(visible.clone(), color.stroke_width(2)))
                        .map_err(Error::render)?;
                    if let Some(label) = label {
                        series
                            .label(label.as_str())
                            .legend(move |(x, y)| {
                                PathElement::new(vec![(x - 10, y), (x + 10, y)], color.stroke_width(2))
                            });
                    }
                    if *markers {
                        draw_markers(&mut chart, &visible, style.marker, color.into(), false)?;
                    }
                }
                Layer::Scatter {
                    label,
                    points,
                    color,
                    alpha,
                    marker,
                    hollow,
                } => {
                    let visible: Vec<(f64, f64)> =
                        points.iter().copied().filter(|&p| self.visible(p)).collect();
                    let style: ShapeStyle = color.mix(*alpha).stroke_width(1);
                    draw_markers(&mut chart, &visible, *marker, style, *hollow)?;
                    if let Some(label) = label {
                        let c = *color;
                        chart
                            .draw_series(std::iter::empty::<Circle<(f64, f64), i32>>())
                            .map_err(Error::render)?
                            .label(label.as_str())
                            .legend(move |(x, y)| Circle::new((x, y), MARKER_SIZE, c.filled()));
                    }
                }
                Layer::ValueScatter { points } => {
                    let visible: Vec<(f64, f64, f64)> = points
                        .iter()
                        .copied()
                        .filter(|&(x, y, v)| v.is_finite() && self.visible((x, y)))
                        .collect();
                    let (lo, hi) = visible.iter().fold(
                        (f64::INFINITY, f64::NEG_INFINITY),
                        |(lo, hi), &(_, _, v)| (lo.min(v), hi.max(v)),
                    );
                    let span = if hi > lo { hi - lo } else { 1.0 };
                    chart
                        .draw_series(visible.iter().map(|&(x, y, v)| {
                            Circle::new((x, y), MARKER_SIZE - 1, colormap((v - lo) / span).filled())
                        }))
                        .map_err(Error::render)?;
                }
            }
        }

        if self.legend && !self.labels().is_empty() {
            chart
                .configure_series_labels()
                .position(SeriesLabelPosition::UpperRight)
                .background_style(WHITE.mix(0.8))
                .border_style(BLACK)
                .draw()
                .map_err(Error::render)?;
        }
        Ok(())
    }
}

fn draw_markers<DB, X, Y>(
    chart: &mut ChartContext<'_, DB, Cartesian2d<X, Y>>,
    points: &[(f64, f64)],
    marker: MarkerShape,
    style: ShapeStyle,
    hollow: bool,
) -> Result<()>
where
    DB: DrawingBackend,
    X: Ranged<ValueType = f64>,
    Y: Ranged<ValueType = f64>,
{
    if marker == MarkerShape::Circle {
        let style = if hollow { style } else { style.filled() };
        chart
            .draw_series(points.iter().map(|&p| Circle::new(p, MARKER_SIZE, style)))
            .map_err(Error::render)?;
        return Ok(());
    }

    let (strokes, filled) = marker_outline(marker, MARKER_SIZE);
    for stroke in strokes {
        if filled && !hollow {
            chart
                .draw_series(
                    points
                        .iter()
                        .map(|&p| EmptyElement::at(p) + Polygon::new(stroke.clone(), style.filled())),
                )
                .map_err(Error::render)?;
        } else {
            chart
                .draw_series(
                    points
                        .iter()
                        .map(|&p| EmptyElement::at(p) + PathElement::new(stroke.clone(), style)),
                )
                .map_err(Error::render)?;
        }
    }
    Ok(())
}

/// Padded axis range covering `values`; log axes only consider positive values.
fn axis_range(values: Vec<f64>, scale: Scale) -> Range<f64> {
    let usable = values
        .into_iter()
        .filter(|v| v.is_finite() && (scale == Scale::Linear || *v > 0.0));
    let (lo, hi) = usable.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });

    match scale {
        Scale::Linear => {
            if !lo.is_finite() {
                return 0.0..1.0;
            }
            let pad = if hi > lo { 0.05 * (hi - lo) } else { lo.abs().max(1.0) * 0.5 };
            (lo - pad)..(hi + pad)
        }
        Scale::Log => {
            if !lo.is_finite() {
                return 1.0..10.0;
            }
            if hi > lo {
                // 5% of the log span either side
                let f = (hi / lo).powf(0.05);
                (lo / f)..(hi * f)
            } else {
                (lo / 2.0)..(hi * 2.0)
            }
        }
    }
}
