//! Comparison driver - one overlay chart per QOI across experiment folders
//!
//! Folders that cannot be loaded are reported and skipped, so partial result
//! trees still produce partial charts. Errors that concern the chart as a
//! whole (unknown model, missing reference data, drawing failures) abort the
//! chart and are returned to the caller.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::catalog::get_function;
use crate::config::PlotConfig;
use crate::error::{Error, Result};
use crate::extract::{self, ErrorAxis, ErrorMetric, Selection, ShadowPolicies, ShadowSampling};
use crate::qoi::Qoi;
use crate::record::ExperimentRecord;
use crate::render::{charts, Figure, ImageFormat, SeriesStyle};
use crate::store::load_record;

/// Settings shared by every chart of one run.
#[derive(Debug, Clone)]
pub struct DriverSettings {
    /// Response-curve domain per method
    pub policies: ShadowPolicies,
    /// Shadow background sampling
    pub sampling: ShadowSampling,
    /// Grid/data index read from each record
    pub selection: Selection,
    /// Output size in pixels
    pub figure_size: (u32, u32),
    /// Output image format
    pub format: ImageFormat,
}

impl Default for DriverSettings {
    fn default() -> Self {
        Self {
            policies: ShadowPolicies::default(),
            sampling: ShadowSampling::default(),
            selection: Selection::last(),
            figure_size: (1600, 1200),
            format: ImageFormat::Png,
        }
    }
}

/// A folder that contributed nothing, and why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedFolder {
    /// Experiment folder
    pub path: PathBuf,
    /// Diagnostic shown to the user
    pub reason: String,
}

/// Outcome of one [`ComparisonDriver::run`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComparisonReport {
    /// Chart that was built
    pub qoi: Qoi,
    /// Legend labels of the series that were drawn, in folder order
    pub series: Vec<String>,
    /// Folders that could not be loaded or extracted from
    pub skipped: Vec<SkippedFolder>,
    /// Folders whose record does not support the chart
    pub not_applicable: Vec<PathBuf>,
    /// Where the figure was written, if it was
    pub saved_to: Option<PathBuf>,
}

impl ComparisonReport {
    fn new(qoi: Qoi) -> Self {
        Self {
            qoi,
            series: Vec::new(),
            skipped: Vec::new(),
            not_applicable: Vec::new(),
            saved_to: None,
        }
    }

    fn skip(&mut self, path: &Path, err: &Error) {
        warn!(path = %path.display(), error = %err, "skipping result folder");
        self.skipped.push(SkippedFolder {
            path: path.to_path_buf(),
            reason: err.to_string(),
        });
    }
}

/// Builds overlay charts from a list of experiment folders.
#[derive(Debug, Clone, Default)]
pub struct ComparisonDriver {
    settings: DriverSettings,
}

impl ComparisonDriver {
    /// Driver with explicit settings.
    #[must_use]
    pub const fn new(settings: DriverSettings) -> Self {
        Self { settings }
    }

    /// Driver configured from a loaded config file.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if a shadow policy names an unknown method.
    pub fn from_config(config: &PlotConfig) -> Result<Self> {
        Ok(Self::new(DriverSettings {
            policies: config.shadow.policies()?,
            sampling: config.shadow.sampling(),
            selection: Selection::last(),
            figure_size: config.figure.size(),
            format: config.figure.format,
        }))
    }

    /// Settings used for every chart.
    #[must_use]
    pub const fn settings(&self) -> &DriverSettings {
        &self.settings
    }

    /// Overlay every folder's series for `qoi` on one figure, then save it
    /// as `<output_dir>/<tag>.<ext>` if an output directory is given.
    ///
    /// Series styles are assigned by position in `folders`, so a skipped
    /// folder leaves a gap in the palette rather than shifting later series.
    /// The eigenvalue chart only reads the last folder.
    ///
    /// # Errors
    ///
    /// Returns chart-level failures: an unknown model, missing reference
    /// data or a drawing error. Per-folder failures end up in
    /// [`ComparisonReport::skipped`].
    pub fn run(
        &self,
        folders: &[PathBuf],
        qoi: Qoi,
        output_dir: Option<&Path>,
    ) -> Result<(Figure, ComparisonReport)> {
        let mut fig = Figure::new();
        let mut report = ComparisonReport::new(qoi);

        let first = match qoi {
            Qoi::Eigenvalues => folders.len().saturating_sub(1),
            _ => 0,
        };
        for (index, folder) in folders.iter().enumerate().skip(first) {
            // malformed records are skipped like missing ones
            let record = match load_record(folder) {
                Ok(record) => record,
                Err(err) => {
                    report.skip(folder, &err);
                    continue;
                }
            };
            if !qoi.applies_to(&record) {
                debug!(
                    path = %folder.display(),
                    method = %record.method(),
                    response_type = %record.response_type(),
                    %qoi,
                    "chart does not apply to record"
                );
                report.not_applicable.push(folder.clone());
                continue;
            }

            let label = record.label();
            let style = SeriesStyle::for_index(index);
            match self.draw_record(&mut fig, qoi, &record, folder, &label, style) {
                Ok(()) => report.series.push(label),
                Err(err) if err.is_skippable() => report.skip(folder, &err),
                Err(err) => return Err(err),
            }
        }

        fig.legend();
        if let Some(dir) = output_dir {
            fs::create_dir_all(dir)?;
            let path = dir.join(format!("{}.{}", qoi.tag(), self.settings.format.extension()));
            fig.save(&path, self.settings.figure_size)?;
            info!(path = %path.display(), series = report.series.len(), "saved figure");
            report.saved_to = Some(path);
        }
        Ok((fig, report))
    }

    fn draw_record(
        &self,
        fig: &mut Figure,
        qoi: Qoi,
        record: &ExperimentRecord,
        folder: &Path,
        label: &str,
        style: SeriesStyle,
    ) -> Result<()> {
        let selection = self.settings.selection;
        match qoi {
            Qoi::Eigenvalues => {
                let values = extract::eigenvalues(record, selection)?;
                charts::eigenvalues(fig, &values, label, style);
            }
            Qoi::FirstEigenvectorError => {
                let function = get_function(record.model())?;
                let reference = function.eigenvector().ok_or_else(|| Error::MissingReference {
                    model: record.model().to_string(),
                    what: "exact eigenvector",
                })?;
                let curve = extract::first_eigenvector_error(record, &reference, selection)?;
                charts::eigenvector_error(fig, &curve, label, style);
            }
            Qoi::Shadow1D => {
                let function = get_function(record.model())?;
                let shadow = extract::shadow_1d(
                    record,
                    function.as_ref(),
                    &self.settings.policies,
                    self.settings.sampling,
                    folder,
                    selection,
                )?;
                charts::shadow_1d(fig, &shadow, label, style);
            }
            Qoi::Shadow2D => {
                let function = get_function(record.model())?;
                let shadow =
                    extract::shadow_2d(record, function.as_ref(), self.settings.sampling, selection)?;
                charts::shadow_2d(fig, &shadow, label);
            }
            Qoi::L2ErrorGridWise => error_chart(
                fig,
                record,
                ErrorMetric::L2,
                ErrorAxis::GridWise,
                selection,
                label,
                style,
            )?,
            Qoi::L2ErrorDataWise => error_chart(
                fig,
                record,
                ErrorMetric::L2,
                ErrorAxis::DataWise,
                selection,
                label,
                style,
            )?,
            Qoi::IntegralErrorGridWise => error_chart(
                fig,
                record,
                ErrorMetric::Integral,
                ErrorAxis::GridWise,
                selection,
                label,
                style,
            )?,
            Qoi::IntegralErrorDataWise => error_chart(
                fig,
                record,
                ErrorMetric::Integral,
                ErrorAxis::DataWise,
                selection,
                label,
                style,
            )?,
        }
        Ok(())
    }
}

fn error_chart(
    fig: &mut Figure,
    record: &ExperimentRecord,
    metric: ErrorMetric,
    axis: ErrorAxis,
    selection: Selection,
    label: &str,
    style: SeriesStyle,
) -> Result<()> {
    let curve = extract::error_curve(record, metric, axis, selection)?;
    charts::error_curve(fig, metric, axis, &curve, label, style);
    Ok(())
}
