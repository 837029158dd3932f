//! Experiment record schema
//!
//! ## Schema Overview
//!
//! ```text
//! ExperimentRecord
//!   ├── metadata: method, model, gridType, degree, integralType, responseType
//!   ├── eigenvalues              rank × grid × data
//!   ├── eigenvectors             dim × rank × grid × data
//!   ├── l2Errors, integralErrors grid × data
//!   ├── numGridPointsArray       grid × data
//!   ├── dataRange                data
//!   ├── sampleRange              grid
//!   ├── shadow1DEvaluationsArray points × grid × data
//!   └── boundsArray              2 × grid × data
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use subspace_plots::record::{ExperimentRecord, Method, ResponseType, Tensor};
//!
//! let record = ExperimentRecord::builder(Method::Sgpp, "sin5D", ResponseType::Adaptive)
//!     .grid_type("nakbsplinemodified")
//!     .degree(3)
//!     .l2_errors(Tensor::new(vec![2, 1], vec![0.1, 0.01])?)
//!     .num_grid_points(Tensor::new(vec![2, 1], vec![10.0, 100.0])?)
//!     .build()?;
//!
//! assert_eq!(record.label(), "SGpp_nakbsplinemodified_3");
//! # Ok::<(), subspace_plots::Error>(())
//! ```

mod experiment_record;
mod tensor;

pub use experiment_record::{
    ExperimentRecord, ExperimentRecordBuilder, Method, MethodFamily, ResponseType,
};
pub use tensor::{resolve_index, Tensor};
