//! Experiment record schema tests
//!
//! Persistence layout, load-time validation and legend labels.

use std::fs;

use subspace_plots::record::{ExperimentRecord, Method, ResponseType, Tensor};
use subspace_plots::store::{load_record, save_record, ResultStore, RECORD_FILE};
use subspace_plots::Error;

fn as_sgpp_record() -> ExperimentRecord {
    ExperimentRecord::builder(Method::AsSgpp, "sin5D", ResponseType::DataR)
        .grid_type("nakbsplinemodified")
        .degree(3)
        .integral_type("Spline")
        .eigenvalues(Tensor::from_fn(vec![5, 2, 3], |ix| {
            1.0 / (ix[0] + 1) as f64
        }))
        .eigenvectors(Tensor::from_fn(vec![5, 5, 2, 3], |ix| {
            if ix[0] == ix[1] {
                1.0
            } else {
                0.0
            }
        }))
        .l2_errors(Tensor::from_fn(vec![2, 3], |ix| {
            0.1 / (ix[0] * 3 + ix[1] + 1) as f64
        }))
        .integral_errors(Tensor::from_fn(vec![2, 3], |_| f64::NAN))
        .num_grid_points(Tensor::from_fn(vec![2, 3], |ix| (ix[0] * 10 + 5) as f64))
        .data_range(Tensor::from_vec(vec![100.0, 200.0, 400.0]))
        .sample_range(Tensor::from_vec(vec![50.0, 500.0]))
        .shadow_1d(Tensor::from_fn(vec![4, 2, 3], |ix| ix[0] as f64 * 0.25))
        .bounds(Tensor::from_fn(vec![2, 2, 3], |ix| if ix[0] == 0 { -2.0 } else { 2.0 }))
        .build()
        .unwrap()
}

// =============================================================================
// Persistence
// =============================================================================

#[test]
fn test_record_json_uses_camel_case_keys() {
    let json = serde_json::to_value(as_sgpp_record()).unwrap();
    for key in [
        "method",
        "model",
        "gridType",
        "degree",
        "integralType",
        "responseType",
        "eigenvalues",
        "eigenvectors",
        "l2Errors",
        "integralErrors",
        "numGridPointsArray",
        "dataRange",
        "sampleRange",
        "shadow1DEvaluationsArray",
        "numShadow1DPoints",
        "boundsArray",
    ] {
        assert!(json.get(key).is_some(), "missing key {key}");
    }
    assert_eq!(json["method"], "asSGpp");
    assert_eq!(json["responseType"], "dataR");
    assert_eq!(json["dataRange"]["shape"], serde_json::json!([3]));
}

#[test]
fn test_non_finite_values_are_marked() {
    let json = serde_json::to_value(as_sgpp_record()).unwrap();
    assert!(json["integralErrors"]["data"]
        .as_array()
        .unwrap()
        .iter()
        .all(|v| v == "nan"));
}

#[test]
fn test_infinite_errors_survive_store_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let record = ExperimentRecord::builder(Method::Sgpp, "sin5D", ResponseType::Adaptive)
        .grid_type("nakbsplinemodified")
        .degree(3)
        .l2_errors(Tensor::new(vec![2, 1], vec![f64::INFINITY, 0.1]).unwrap())
        .integral_errors(Tensor::new(vec![2, 1], vec![f64::NEG_INFINITY, 0.2]).unwrap())
        .num_grid_points(Tensor::new(vec![2, 1], vec![10.0, 20.0]).unwrap())
        .data_range(Tensor::from_vec(vec![100.0]))
        .build()
        .unwrap();
    save_record(dir.path(), &record).unwrap();

    let loaded = load_record(dir.path()).unwrap();
    assert_eq!(loaded.l2_errors().unwrap().to_vec(), vec![f64::INFINITY, 0.1]);
    assert_eq!(
        loaded.integral_errors().unwrap().to_vec(),
        vec![f64::NEG_INFINITY, 0.2]
    );
}

#[test]
fn test_store_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let store = ResultStore::for_model(dir.path(), "sin5D");
    let name = "asSGpp_nakbsplinemodified_3_500_dataR_data_Spline";
    let record = as_sgpp_record();

    let folder = store.save(name, &record).unwrap();
    assert!(folder.join(RECORD_FILE).is_file());
    assert_eq!(folder, dir.path().join("sin5D").join(name));

    let loaded = store.load(name).unwrap();
    assert_eq!(loaded.l2_errors(), record.l2_errors());
    assert_eq!(loaded.eigenvectors(), record.eigenvectors());
    assert_eq!(loaded.label(), record.label());
    assert!(loaded
        .integral_errors()
        .unwrap()
        .to_vec()
        .iter()
        .all(|v| v.is_nan()));
}

#[test]
fn test_missing_folder_is_record_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_record(&dir.path().join("nope")).unwrap_err();
    assert!(matches!(err, Error::RecordNotFound(_)));
    assert!(err.is_skippable());
}

#[test]
fn test_corrupt_record_is_json_error() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join(RECORD_FILE), "{\"method\": \"AS\",").unwrap();
    assert!(matches!(load_record(dir.path()), Err(Error::Json(_))));
}

// =============================================================================
// Validation
// =============================================================================

#[test]
fn test_misaligned_record_fails_at_load() {
    let dir = tempfile::tempdir().unwrap();
    let mut json = serde_json::to_value(as_sgpp_record()).unwrap();
    // drop one grid row from the bounds
    json["boundsArray"] = serde_json::json!({
        "shape": [2, 1, 3],
        "data": [0.0, 0.0, 0.0, 1.0, 1.0, 1.0]
    });
    fs::write(dir.path().join(RECORD_FILE), json.to_string()).unwrap();

    match load_record(dir.path()) {
        Err(Error::ShapeMismatch { array, found, .. }) => {
            assert_eq!(array, "boundsArray");
            assert_eq!(found, vec![2, 1, 3]);
        }
        other => panic!("expected shape mismatch, got {other:?}"),
    }
}

#[test]
fn test_active_subspace_record_requires_eigenvectors() {
    let err = ExperimentRecord::builder(Method::Qphd, "sin2D", ResponseType::Adaptive)
        .eigenvalues(Tensor::from_fn(vec![2, 1, 1], |_| 1.0))
        .build()
        .unwrap_err();
    assert!(matches!(err, Error::MissingArray("eigenvectors")));
}

#[test]
fn test_sparse_grid_record_needs_no_eigen_arrays() {
    let record = ExperimentRecord::builder(Method::Sgpp, "sin2D", ResponseType::Adaptive)
        .l2_errors(Tensor::from_fn(vec![3, 1], |_| 0.1))
        .build()
        .unwrap();
    assert!(record.eigenvalues().is_none());
    assert_eq!(record.extents(), Some((3, 1)));
}

#[test]
fn test_tensor_element_count_is_checked() {
    let raw = r#"{"shape": [2, 2], "data": [1.0, 2.0, 3.0]}"#;
    assert!(serde_json::from_str::<Tensor>(raw).is_err());
}

// =============================================================================
// Labels
// =============================================================================

#[test]
fn test_labels_per_method() {
    let eig = |method| {
        ExperimentRecord::builder(method, "sin2D", ResponseType::Adaptive)
            .grid_type("nakbsplinemodified")
            .degree(3)
            .eigenvalues(Tensor::from_fn(vec![2, 1, 1], |_| 1.0))
            .eigenvectors(Tensor::from_fn(vec![2, 2, 1, 1], |_| 1.0))
            .build()
            .unwrap()
    };
    assert_eq!(eig(Method::As).label(), "exact gradients");
    assert_eq!(eig(Method::Ols).label(), "linear approximation");
    assert_eq!(eig(Method::Qphd).label(), "quadratic approximation");
    assert_eq!(
        eig(Method::AsSgpp).label(),
        "asSGpp_nakbsplinemodified_3_none_adaptive"
    );
    assert_eq!(
        as_sgpp_record().label(),
        "asSGpp_nakbsplinemodified_3_Spline_dataR"
    );

    let sgpp = ExperimentRecord::builder(Method::Sgpp, "sin2D", ResponseType::Adaptive)
        .grid_type("nakbsplinemodified")
        .degree(3)
        .build()
        .unwrap();
    assert_eq!(sgpp.label(), "SGpp_nakbsplinemodified_3");
}
