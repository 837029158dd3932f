//! Quantities of interest - the closed set of chart kinds

use std::fmt;
use std::str::FromStr;

use crate::error::Error;
use crate::record::{ExperimentRecord, MethodFamily};

/// Quantity of interest selecting which extractor/renderer pair runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Qoi {
    /// Eigenvalue decay (`eival`)
    Eigenvalues,
    /// Error of the leading eigenvector against the catalog reference (`eivec1`)
    FirstEigenvectorError,
    /// 1D shadow plot with response curve (`shadow1D`)
    Shadow1D,
    /// 2D shadow plot over the two leading directions (`shadow2D`)
    Shadow2D,
    /// L2 error against number of grid points (`l2errorG`)
    L2ErrorGridWise,
    /// L2 error against number of data points (`l2errorD`)
    L2ErrorDataWise,
    /// Integral error against number of grid points (`integralerrorG`)
    IntegralErrorGridWise,
    /// Integral error against number of data points (`integralerrorD`)
    IntegralErrorDataWise,
}

impl Qoi {
    /// Every quantity, in command-line flag order.
    pub const ALL: [Self; 8] = [
        Self::L2ErrorGridWise,
        Self::L2ErrorDataWise,
        Self::IntegralErrorGridWise,
        Self::IntegralErrorDataWise,
        Self::Shadow1D,
        Self::Shadow2D,
        Self::Eigenvalues,
        Self::FirstEigenvectorError,
    ];

    /// Short tag, also the stem of the saved figure.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Eigenvalues => "eival",
            Self::FirstEigenvectorError => "eivec1",
            Self::Shadow1D => "shadow1D",
            Self::Shadow2D => "shadow2D",
            Self::L2ErrorGridWise => "l2errorG",
            Self::L2ErrorDataWise => "l2errorD",
            Self::IntegralErrorGridWise => "integralerrorG",
            Self::IntegralErrorDataWise => "integralerrorD",
        }
    }

    /// Whether a record can contribute a series to this chart.
    ///
    /// Eigen-quantities are undefined without dimension reduction, and
    /// data-wise errors only exist for surrogates fitted to data.
    #[must_use]
    pub fn applies_to(self, record: &ExperimentRecord) -> bool {
        match self {
            Self::Eigenvalues | Self::FirstEigenvectorError | Self::Shadow1D | Self::Shadow2D => {
                record.method().family() == MethodFamily::ActiveSubspace
            }
            Self::L2ErrorDataWise | Self::IntegralErrorDataWise => {
                record.response_type().is_data_driven()
            }
            Self::L2ErrorGridWise | Self::IntegralErrorGridWise => true,
        }
    }
}

impl fmt::Display for Qoi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Qoi {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|q| q.tag() == s)
            .ok_or_else(|| Error::UnknownQoi(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{Method, ResponseType, Tensor};

    fn record(method: Method, response: ResponseType) -> ExperimentRecord {
        let mut builder = ExperimentRecord::builder(method, "sin5D", response);
        if method.family() == MethodFamily::ActiveSubspace {
            builder = builder
                .eigenvalues(Tensor::from_fn(vec![2, 1, 1], |_| 1.0))
                .eigenvectors(Tensor::from_fn(vec![2, 2, 1, 1], |_| 1.0));
        }
        builder.build().unwrap()
    }

    #[test]
    fn test_tags_parse_back() {
        for q in Qoi::ALL {
            assert_eq!(q.tag().parse::<Qoi>().unwrap(), q);
        }
    }

    #[test]
    fn test_unknown_tag() {
        let err = "l2error".parse::<Qoi>().unwrap_err();
        assert!(format!("{err}").contains("l2error"));
    }

    #[test]
    fn test_sgpp_has_no_eigen_quantities() {
        let r = record(Method::Sgpp, ResponseType::Data);
        assert!(!Qoi::Eigenvalues.applies_to(&r));
        assert!(!Qoi::FirstEigenvectorError.applies_to(&r));
        assert!(!Qoi::Shadow1D.applies_to(&r));
        assert!(Qoi::L2ErrorGridWise.applies_to(&r));
        assert!(Qoi::L2ErrorDataWise.applies_to(&r));
    }

    #[test]
    fn test_data_wise_needs_data_driven_response() {
        let r = record(Method::Sgpp, ResponseType::Adaptive);
        assert!(!Qoi::L2ErrorDataWise.applies_to(&r));
        assert!(!Qoi::IntegralErrorDataWise.applies_to(&r));
        assert!(Qoi::IntegralErrorGridWise.applies_to(&r));
    }

    #[test]
    fn test_active_subspace_methods_have_eigen_quantities() {
        let r = record(Method::AsSgpp, ResponseType::Adaptive);
        assert!(Qoi::Eigenvalues.applies_to(&r));
        assert!(Qoi::Shadow2D.applies_to(&r));
    }
}
