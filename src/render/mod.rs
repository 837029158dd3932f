//! Chart rendering
//!
//! [`Figure`] is the drawing handle: chart functions in [`charts`] append
//! layers to it, the caller adds a legend and saves. Styles for comparing
//! several records live in [`style`].

pub mod charts;
mod figure;
mod style;
mod surface;

pub use figure::{Figure, ImageFormat, Layer, Scale};
pub use style::{lighten, MarkerShape, SeriesStyle, COLORS, MARKERS};
pub use surface::render_surface;
