//! Tests for error types

use std::path::PathBuf;

use subspace_plots::Error;

#[test]
fn test_record_not_found_error() {
    let error = Error::RecordNotFound(PathBuf::from("results/sin5D/AS_3_500"));
    let error_str = format!("{error}");
    assert_eq!(error_str, "path results/sin5D/AS_3_500 does not exist");
}

#[test]
fn test_missing_array_error() {
    let error = Error::MissingArray("integralErrors");
    let error_str = format!("{error}");
    assert!(error_str.contains("integralErrors"));
}

#[test]
fn test_shape_mismatch_error() {
    let error = Error::ShapeMismatch {
        array: "boundsArray",
        expected: "2 × grid × data".to_string(),
        found: vec![1, 4, 2],
    };
    let error_str = format!("{error}");
    assert!(error_str.contains("boundsArray"));
    assert!(error_str.contains("[1, 4, 2]"));
}

#[test]
fn test_index_out_of_range_error() {
    let error = Error::IndexOutOfRange { index: 7, len: 3 };
    let error_str = format!("{error}");
    assert!(error_str.contains('7'));
    assert!(error_str.contains('3'));
}

#[test]
fn test_unknown_qoi_error() {
    let error = Error::UnknownQoi("shadow3D".to_string());
    assert!(format!("{error}").contains("shadow3D"));
}

#[test]
fn test_missing_reference_error() {
    let error = Error::MissingReference {
        model: "sumSquares4D".to_string(),
        what: "exact eigenvector",
    };
    assert_eq!(
        format!("{error}"),
        "exact eigenvector unknown for model `sumSquares4D`"
    );
}

#[test]
fn test_io_error_conversion() {
    let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
    let error: Error = io_error.into();
    let error_str = format!("{error}");
    assert!(error_str.contains("IO error"));
    assert!(error_str.contains("file not found"));
}

#[test]
fn test_json_error_conversion() {
    let json_error = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
    let error: Error = json_error.into();
    assert!(format!("{error}").contains("JSON error"));
}

#[test]
fn test_load_failures_are_skippable() {
    assert!(Error::RecordNotFound(PathBuf::from("x")).is_skippable());
    assert!(Error::Io(std::io::Error::other("boom")).is_skippable());
    assert!(Error::MissingArray("l2Errors").is_skippable());
    assert!(Error::ShapeMismatch {
        array: "l2Errors",
        expected: String::new(),
        found: vec![],
    }
    .is_skippable());
}

#[test]
fn test_bad_record_contents_are_skippable() {
    assert!(Error::IndexOutOfRange { index: 0, len: 0 }.is_skippable());
    assert!(Error::InvalidInput("direction of length 3 for a 2D model".to_string()).is_skippable());
}

#[test]
fn test_chart_failures_are_not_skippable() {
    assert!(!Error::UnknownQoi("x".to_string()).is_skippable());
    assert!(!Error::UnknownModel("x".to_string()).is_skippable());
    assert!(!Error::MissingReference {
        model: "x".to_string(),
        what: "exact eigenvector",
    }
    .is_skippable());
    assert!(!Error::Render("backend".to_string()).is_skippable());
}

#[test]
fn test_error_debug_format() {
    let error = Error::InvalidInput("test".to_string());
    let debug_str = format!("{error:?}");
    assert!(debug_str.contains("InvalidInput"));
}
