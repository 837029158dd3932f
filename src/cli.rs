//! Command-line arguments

use std::path::PathBuf;

use clap::{ArgAction, Parser};

use crate::error::Result;
use crate::qoi::Qoi;

/// Comparison charts for active-subspace and sparse-grid experiment results
#[derive(Parser, Debug, Clone)]
#[command(author, version, about)]
pub struct Args {
    /// Test case whose results are plotted
    #[arg(long, default_value = "sin5D")]
    pub model: String,

    /// B-spline degree / degree of the response surface
    #[arg(long, default_value_t = 3)]
    pub degree: u32,

    /// Maximum number of points used
    #[arg(long, default_value_t = 500)]
    pub max_points: usize,

    /// Results root (overrides config)
    #[arg(long)]
    pub results_path: Option<PathBuf>,

    /// Path to config TOML
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Plot l2 error grid-wise
    #[arg(
        long,
        action = ArgAction::Set,
        default_value_t = false,
        num_args = 0..=1,
        default_missing_value = "true",
    )]
    pub plot_l2_g: bool,

    /// Plot l2 error data-wise
    #[arg(
        long,
        action = ArgAction::Set,
        default_value_t = false,
        num_args = 0..=1,
        default_missing_value = "true",
    )]
    pub plot_l2_d: bool,

    /// Plot integral error grid-wise
    #[arg(
        long,
        action = ArgAction::Set,
        default_value_t = false,
        num_args = 0..=1,
        default_missing_value = "true",
    )]
    pub plot_integral_g: bool,

    /// Plot integral error data-wise
    #[arg(
        long,
        action = ArgAction::Set,
        default_value_t = false,
        num_args = 0..=1,
        default_missing_value = "true",
    )]
    pub plot_integral_d: bool,

    /// Plot 1D shadow
    #[arg(
        long = "plot-shadow1d",
        action = ArgAction::Set,
        default_value_t = true,
        num_args = 0..=1,
        default_missing_value = "true",
    )]
    pub plot_shadow_1d: bool,

    /// Plot 2D shadow
    #[arg(
        long = "plot-shadow2d",
        action = ArgAction::Set,
        default_value_t = false,
        num_args = 0..=1,
        default_missing_value = "true",
    )]
    pub plot_shadow_2d: bool,

    /// Plot eigenvalues of the last experiment
    #[arg(
        long,
        action = ArgAction::Set,
        default_value_t = false,
        num_args = 0..=1,
        default_missing_value = "true",
    )]
    pub plot_eival: bool,

    /// Plot error in first eigenvector
    #[arg(
        long = "plot-eivec1",
        action = ArgAction::Set,
        default_value_t = false,
        num_args = 0..=1,
        default_missing_value = "true",
    )]
    pub plot_eivec_1: bool,

    /// Plot a surface of a 2D test function
    #[arg(
        long = "surf2d",
        action = ArgAction::Set,
        default_value_t = false,
        num_args = 0..=1,
        default_missing_value = "true",
    )]
    pub surf_2d: bool,

    /// Model drawn by --surf2d
    #[arg(long, default_value = "atan2D")]
    pub surface_model: String,

    /// Additional chart by tag (eival, eivec1, shadow1D, shadow2D, l2errorG, ...)
    #[arg(long = "qoi", value_name = "TAG")]
    pub qois: Vec<String>,

    /// Build charts without writing image files
    #[arg(long, default_value_t = false)]
    pub no_save: bool,

    /// Log level for this crate (RUST_LOG takes precedence)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

impl Args {
    /// Requested charts in flag order, followed by `--qoi` tags.
    ///
    /// Unknown tags are kept as errors so the caller can report them and
    /// carry on; a chart requested twice is built once.
    #[must_use]
    pub fn requested_qois(&self) -> Vec<Result<Qoi>> {
        let flags = [
            (self.plot_l2_g, Qoi::L2ErrorGridWise),
            (self.plot_l2_d, Qoi::L2ErrorDataWise),
            (self.plot_integral_g, Qoi::IntegralErrorGridWise),
            (self.plot_integral_d, Qoi::IntegralErrorDataWise),
            (self.plot_shadow_1d, Qoi::Shadow1D),
            (self.plot_shadow_2d, Qoi::Shadow2D),
            (self.plot_eival, Qoi::Eigenvalues),
            (self.plot_eivec_1, Qoi::FirstEigenvectorError),
        ];
        let mut seen = Vec::new();
        let mut requested = Vec::new();
        let tagged = self.qois.iter().map(|tag| tag.parse::<Qoi>());
        for item in flags
            .into_iter()
            .filter(|(on, _)| *on)
            .map(|(_, qoi)| Ok(qoi))
            .chain(tagged)
        {
            match item {
                Ok(qoi) if seen.contains(&qoi) => {}
                Ok(qoi) => {
                    seen.push(qoi);
                    requested.push(Ok(qoi));
                }
                Err(err) => requested.push(Err(err)),
            }
        }
        requested
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("subspace-plots").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn defaults_plot_shadow_only() {
        let args = parse(&[]);
        assert_eq!(args.model, "sin5D");
        assert_eq!(args.degree, 3);
        assert_eq!(args.max_points, 500);
        let qois: Vec<Qoi> = args.requested_qois().into_iter().map(|q| q.unwrap()).collect();
        assert_eq!(qois, vec![Qoi::Shadow1D]);
    }

    #[test]
    fn flags_accept_bare_and_explicit_values() {
        let args = parse(&["--plot-l2-g", "--plot-shadow1d", "false", "--plot-eival=true"]);
        let qois: Vec<Qoi> = args.requested_qois().into_iter().map(|q| q.unwrap()).collect();
        assert_eq!(qois, vec![Qoi::L2ErrorGridWise, Qoi::Eigenvalues]);
    }

    #[test]
    fn tags_extend_flags_without_duplicates() {
        let args = parse(&["--qoi", "shadow1D", "--qoi", "integralerrorD", "--qoi", "bogus"]);
        let qois = args.requested_qois();
        assert_eq!(qois.len(), 3);
        assert!(matches!(qois[0], Ok(Qoi::Shadow1D)));
        assert!(matches!(qois[1], Ok(Qoi::IntegralErrorDataWise)));
        assert!(matches!(&qois[2], Err(Error::UnknownQoi(tag)) if tag == "bogus"));
    }

    #[test]
    fn model_and_paths() {
        let args = parse(&[
            "--model",
            "atan2D",
            "--max-points",
            "100",
            "--results-path",
            "/tmp/results",
            "--surf2d",
        ]);
        assert_eq!(args.model, "atan2D");
        assert_eq!(args.max_points, 100);
        assert_eq!(args.results_path, Some(PathBuf::from("/tmp/results")));
        assert!(args.surf_2d);
    }
}
