//! TOML configuration
//!
//! Every key is optional; a missing file section falls back to the built-in
//! defaults field by field.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::extract::{ShadowDomainPolicy, ShadowPolicies, ShadowSampling};
use crate::record::Method;
use crate::render::ImageFormat;

/// Output image settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FigureConfig {
    /// Width in pixels
    #[serde(default = "FigureConfig::default_width")]
    pub width: u32,
    /// Height in pixels
    #[serde(default = "FigureConfig::default_height")]
    pub height: u32,
    /// `png` or `svg`
    #[serde(default)]
    pub format: ImageFormat,
    /// Grid points per axis of surface plots
    #[serde(default = "FigureConfig::default_surface_resolution")]
    pub surface_resolution: usize,
}

impl FigureConfig {
    fn default_width() -> u32 {
        1600
    }
    fn default_height() -> u32 {
        1200
    }
    fn default_surface_resolution() -> usize {
        100
    }

    /// `(width, height)`
    #[must_use]
    pub const fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

impl Default for FigureConfig {
    fn default() -> Self {
        Self {
            width: Self::default_width(),
            height: Self::default_height(),
            format: ImageFormat::default(),
            surface_resolution: Self::default_surface_resolution(),
        }
    }
}

/// Shadow plot settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ShadowConfig {
    /// Number of background samples
    #[serde(default = "ShadowConfig::default_samples")]
    pub samples: usize,
    /// Sampling seed
    #[serde(default = "ShadowConfig::default_seed")]
    pub seed: u64,
    /// Response-curve domain per method tag (`asSGpp`, `QPHD`, ...)
    #[serde(default = "ShadowConfig::default_policies")]
    pub policies: BTreeMap<String, ShadowDomainPolicy>,
}

impl ShadowConfig {
    fn default_samples() -> usize {
        ShadowSampling::default().samples
    }
    fn default_seed() -> u64 {
        ShadowSampling::default().seed
    }
    fn default_policies() -> BTreeMap<String, ShadowDomainPolicy> {
        let defaults = ShadowPolicies::default();
        [Method::As, Method::Ols, Method::Qphd, Method::AsSgpp, Method::Sgpp]
            .into_iter()
            .filter_map(|m| defaults.get(m).map(|p| (m.to_string(), *p)))
            .collect()
    }

    /// Sampling settings for the extractor.
    #[must_use]
    pub const fn sampling(&self) -> ShadowSampling {
        ShadowSampling {
            samples: self.samples,
            seed: self.seed,
        }
    }

    /// Policies keyed by method.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` for a key that is not a method tag.
    pub fn policies(&self) -> Result<ShadowPolicies> {
        let mut policies = ShadowPolicies::empty();
        for (tag, policy) in &self.policies {
            let method: Method = tag
                .parse()
                .map_err(|_| Error::Config(format!("unknown method `{tag}` in [shadow.policies]")))?;
            policies.insert(method, *policy);
        }
        Ok(policies)
    }
}

impl Default for ShadowConfig {
    fn default() -> Self {
        Self {
            samples: Self::default_samples(),
            seed: Self::default_seed(),
            policies: Self::default_policies(),
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlotConfig {
    /// Root holding one directory per model
    #[serde(default = "PlotConfig::default_results_path")]
    pub results_path: PathBuf,
    /// Experiment folder names; the first `{}` takes the degree, the second
    /// the point budget
    #[serde(default = "PlotConfig::default_experiments")]
    pub experiments: Vec<String>,
    /// Output image settings
    #[serde(default)]
    pub figure: FigureConfig,
    /// Shadow plot settings
    #[serde(default)]
    pub shadow: ShadowConfig,
}

impl PlotConfig {
    fn default_results_path() -> PathBuf {
        PathBuf::from("results")
    }
    fn default_experiments() -> Vec<String> {
        [
            "SGpp_nakbsplinemodified_{}_{}_dataR",
            "SGpp_nakbsplinemodified_{}_{}_adaptive",
            "asSGpp_nakbsplinemodified_{}_{}_adaptive_adaptive_Spline",
            "asSGpp_nakbsplinemodified_{}_{}_data_data_Spline",
            "asSGpp_nakbsplinemodified_{}_{}_dataR_data_Spline",
            "asSGpp_nakbsplinemodified_{}_{}_datadrivenR_data_Spline",
        ]
        .into_iter()
        .map(String::from)
        .collect()
    }

    /// Read a TOML config file.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if the file cannot be read and `Error::Config` if it
    /// does not parse.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        toml::from_str(&text).map_err(|e| Error::Config(format!("{}: {e}", path.display())))
    }

    /// Read `path` if given, defaults otherwise.
    ///
    /// # Errors
    ///
    /// See [`PlotConfig::load`].
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        path.map_or_else(|| Ok(Self::default()), Self::load)
    }

    /// Experiment folder names for one degree and point budget.
    #[must_use]
    pub fn experiment_names(&self, degree: u32, max_points: usize) -> Vec<String> {
        self.experiments
            .iter()
            .map(|t| fill_template(t, degree, max_points))
            .collect()
    }
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            results_path: Self::default_results_path(),
            experiments: Self::default_experiments(),
            figure: FigureConfig::default(),
            shadow: ShadowConfig::default(),
        }
    }
}

/// Substitute `degree` for the first `{}` and `max_points` for the second.
#[must_use]
pub fn fill_template(template: &str, degree: u32, max_points: usize) -> String {
    template
        .replacen("{}", &degree.to_string(), 1)
        .replacen("{}", &max_points.to_string(), 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::UnitInterval;

    #[test]
    fn fill_template_is_positional() {
        assert_eq!(
            fill_template("asSGpp_nakbsplinemodified_{}_{}_data_data_Spline", 3, 500),
            "asSGpp_nakbsplinemodified_3_500_data_data_Spline"
        );
        assert_eq!(fill_template("AS_{}", 2, 10), "AS_2");
    }

    #[test]
    fn defaults_cover_both_policy_methods() {
        let cfg = PlotConfig::default();
        let policies = cfg.shadow.policies().unwrap();
        assert_eq!(policies, ShadowPolicies::default());
        assert_eq!(cfg.figure.size(), (1600, 1200));
        assert_eq!(cfg.shadow.samples, 2500);
        assert_eq!(cfg.experiment_names(3, 500).len(), 6);
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let cfg: PlotConfig = toml::from_str(
            r#"
results_path = "/data/results"

[figure]
format = "svg"

[shadow]
samples = 100
"#,
        )
        .unwrap();
        assert_eq!(cfg.results_path, PathBuf::from("/data/results"));
        assert_eq!(cfg.figure.format, ImageFormat::Svg);
        assert_eq!(cfg.figure.width, 1600);
        assert_eq!(cfg.shadow.samples, 100);
        assert_eq!(cfg.shadow.policies.len(), 2);
        assert_eq!(cfg.experiments.len(), 6);
    }

    #[test]
    fn policy_overrides_parse() {
        let cfg: PlotConfig = toml::from_str(
            r#"
[shadow.policies]
QPHD = { unit = "symmetric" }
OLS = { unit = "zero-one", lower_bound_override = 0.0 }
"#,
        )
        .unwrap();
        let policies = cfg.shadow.policies().unwrap();
        let qphd = policies.get(Method::Qphd).unwrap();
        assert_eq!(qphd.unit, UnitInterval::Symmetric);
        assert_eq!(qphd.lower_bound_override, None);
        assert_eq!(
            policies.get(Method::Ols).unwrap().lower_bound_override,
            Some(0.0)
        );
        // a policy table replaces the defaults wholesale
        assert!(policies.get(Method::AsSgpp).is_none());
    }

    #[test]
    fn unknown_policy_method_is_rejected() {
        let cfg: PlotConfig = toml::from_str(
            r#"
[shadow.policies]
PCA = { unit = "symmetric" }
"#,
        )
        .unwrap();
        assert!(matches!(cfg.shadow.policies(), Err(Error::Config(_))));
    }

    #[test]
    fn config_survives_toml_round_trip() {
        let cfg = PlotConfig::default();
        let text = toml::to_string_pretty(&cfg).unwrap();
        let back: PlotConfig = toml::from_str(&text).unwrap();
        assert_eq!(back, cfg);
    }
}
