//! Series palettes and marker shapes

use plotters::style::colors::colormaps::{ColorMap, ViridisRGB};
use plotters::style::{Color, HSLColor, RGBColor};

/// Marker drawn at every data point of a series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum MarkerShape {
    Circle,
    Plus,
    Star,
    TriangleUp,
    TriangleLeft,
    TriangleRight,
    Square,
    ThinDiamond,
    TriangleDown,
    TriDown,
    Pentagon,
    Hexagon,
    Cross,
    Diamond,
}

/// Marker table, cycled by series index.
pub const MARKERS: [MarkerShape; 14] = [
    MarkerShape::Circle,
    MarkerShape::Plus,
    MarkerShape::Star,
    MarkerShape::TriangleUp,
    MarkerShape::TriangleLeft,
    MarkerShape::TriangleRight,
    MarkerShape::Square,
    MarkerShape::ThinDiamond,
    MarkerShape::TriangleDown,
    MarkerShape::TriDown,
    MarkerShape::Pentagon,
    MarkerShape::Hexagon,
    MarkerShape::Cross,
    MarkerShape::Diamond,
];

/// Colour table, cycled by series index. The first entry is the group's blue,
/// the rest are the usual single-letter plot colours.
pub const COLORS: [RGBColor; 7] = [
    RGBColor(32, 86, 174),
    RGBColor(255, 0, 0),
    RGBColor(0, 128, 0),
    RGBColor(0, 191, 191),
    RGBColor(191, 0, 191),
    RGBColor(191, 191, 0),
    RGBColor(0, 0, 0),
];

/// Colour and marker of one series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeriesStyle {
    /// Line and marker colour
    pub color: RGBColor,
    /// Marker drawn at each point
    pub marker: MarkerShape,
}

impl SeriesStyle {
    /// Style of the `n`-th folder in a comparison.
    #[must_use]
    pub const fn for_index(n: usize) -> Self {
        Self {
            color: COLORS[n % COLORS.len()],
            marker: MARKERS[n % MARKERS.len()],
        }
    }
}

/// Stroke outlines of a marker in pixel offsets around the data point.
/// Closed outlines repeat their first vertex; `true` marks filled shapes.
#[must_use]
pub fn marker_outline(shape: MarkerShape, size: i32) -> (Vec<Vec<(i32, i32)>>, bool) {
    let s = size;
    let h = size / 2;
    let regular = |n: usize, phase: f64| -> Vec<(i32, i32)> {
        let mut pts: Vec<(i32, i32)> = (0..n)
            .map(|k| {
                let a = phase + std::f64::consts::TAU * k as f64 / n as f64;
                (
                    (f64::from(s) * a.cos()).round() as i32,
                    (-f64::from(s) * a.sin()).round() as i32,
                )
            })
            .collect();
        pts.push(pts[0]);
        pts
    };
    let up = std::f64::consts::FRAC_PI_2;
    match shape {
        MarkerShape::Circle => (vec![regular(16, 0.0)], true),
        MarkerShape::Plus => (vec![vec![(-s, 0), (s, 0)], vec![(0, -s), (0, s)]], false),
        MarkerShape::Cross => (vec![vec![(-s, -s), (s, s)], vec![(-s, s), (s, -s)]], false),
        MarkerShape::Star => (
            vec![
                vec![(-s, 0), (s, 0)],
                vec![(0, -s), (0, s)],
                vec![(-h, -h), (h, h)],
                vec![(-h, h), (h, -h)],
            ],
            false,
        ),
        MarkerShape::TriDown => (
            vec![vec![(0, 0), (0, s)], vec![(0, 0), (-s, -h)], vec![(0, 0), (s, -h)]],
            false,
        ),
        MarkerShape::TriangleUp => (vec![regular(3, up)], true),
        MarkerShape::TriangleDown => (vec![regular(3, -up)], true),
        MarkerShape::TriangleLeft => (vec![regular(3, std::f64::consts::PI)], true),
        MarkerShape::TriangleRight => (vec![regular(3, 0.0)], true),
        MarkerShape::Square => (vec![vec![(-s, -s), (s, -s), (s, s), (-s, s), (-s, -s)]], true),
        MarkerShape::Diamond => (vec![regular(4, 0.0)], true),
        MarkerShape::ThinDiamond => (vec![vec![(0, -s), (h, 0), (0, s), (-h, 0), (0, -s)]], true),
        MarkerShape::Pentagon => (vec![regular(5, up)], true),
        MarkerShape::Hexagon => (vec![regular(6, up)], true),
    }
}

/// Lighten `color` in HLS space: lightness `l` becomes `1 - amount * (1 - l)`.
#[must_use]
pub fn lighten(color: RGBColor, amount: f64) -> RGBColor {
    let (h, l, s) = rgb_to_hls(color);
    let (r, g, b) = HSLColor(h, s, 1.0 - amount * (1.0 - l)).rgb();
    RGBColor(r, g, b)
}

/// Hue, lightness and saturation of `color`, each in `[0, 1]`.
fn rgb_to_hls(RGBColor(r, g, b): RGBColor) -> (f64, f64, f64) {
    let (r, g, b) = (
        f64::from(r) / 255.0,
        f64::from(g) / 255.0,
        f64::from(b) / 255.0,
    );
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (max + min) / 2.0;
    if (max - min).abs() < f64::EPSILON {
        return (0.0, l, 0.0);
    }
    let delta = max - min;
    let s = if l <= 0.5 {
        delta / (max + min)
    } else {
        delta / (2.0 - max - min)
    };
    let h = if (max - r).abs() < f64::EPSILON {
        (g - b) / delta
    } else if (max - g).abs() < f64::EPSILON {
        2.0 + (b - r) / delta
    } else {
        4.0 + (r - g) / delta
    };
    ((h / 6.0).rem_euclid(1.0), l, s)
}

/// Viridis ramp for value-coloured scatters, `t` in `[0, 1]`.
#[must_use]
pub fn colormap(t: f64) -> RGBColor {
    let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
    ViridisRGB.get_color_normalized(t, 0.0, 1.0)
}
