//! # subspace-plots: comparison charts for active-subspace experiments
//!
//! Reduces persisted experiment output (eigenvalues, eigenvectors, error
//! arrays, shadow evaluations) to overlay charts that compare methods on one
//! test function.
//!
//! ## Pipeline
//!
//! - [`store`]: `<resultsPath>/<model>/<experiment>/data.json`, validated on load
//! - [`catalog`]: test functions by model name, for ground-truth overlays
//! - [`extract`]: index and project the arrays one chart needs
//! - [`render`]: explicit [`render::Figure`] handle, drawn with plotters
//! - [`driver`]: one chart per quantity of interest over a list of folders
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::path::{Path, PathBuf};
//! use subspace_plots::{ComparisonDriver, Qoi};
//!
//! let folders: Vec<PathBuf> = ["SGpp_nakbsplinemodified_3_500_dataR", "AS_3_500"]
//!     .iter()
//!     .map(|name| Path::new("results/sin5D").join(name))
//!     .collect();
//! let driver = ComparisonDriver::default();
//! let (_figure, report) = driver.run(&folders, Qoi::L2ErrorGridWise, Some(Path::new("results/sin5D")))?;
//! println!("{} series, {} skipped", report.series.len(), report.skipped.len());
//! # Ok::<(), subspace_plots::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]

pub mod catalog;
pub mod cli;
pub mod config;
pub mod driver;
pub mod error;
pub mod extract;
pub mod logging;
pub mod qoi;
pub mod record;
pub mod render;
pub mod store;

pub use driver::{ComparisonDriver, ComparisonReport, DriverSettings};
pub use error::{Error, Result};
pub use qoi::Qoi;
pub use record::ExperimentRecord;
