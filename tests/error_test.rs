//! Tests for error types

use bench_aggregate::Error;
use std::path::PathBuf;

#[test]
fn test_results_dir_missing_error() {
    let error = Error::ResultsDirMissing {
        path: PathBuf::from("results_quick"),
    };
    assert_eq!(format!("{error}"), "results_quick directory not found!");
}

#[test]
fn test_missing_field_error() {
    let error = Error::MissingField {
        field: "compression_ratio".to_string(),
        source_name: "results_quick/encoding_b5.csv:3".to_string(),
    };
    let error_str = format!("{error}");
    assert!(error_str.contains("Missing field 'compression_ratio'"));
    assert!(error_str.contains("encoding_b5.csv:3"));
}

#[test]
fn test_invalid_number_error() {
    let error = Error::InvalidNumber {
        field: "encode_time_ns".to_string(),
        value: "fast".to_string(),
        source_name: "encoding_b5.csv:2".to_string(),
    };
    let error_str = format!("{error}");
    assert!(error_str.contains("Invalid number 'fast'"));
    assert!(error_str.contains("encode_time_ns"));
}

#[test]
fn test_no_data_error() {
    let error = Error::NoData {
        bucket: "(rle, text)".to_string(),
        series: "ratios".to_string(),
    };
    let error_str = format!("{error}");
    assert!(error_str.contains("No data"));
    assert!(error_str.contains("(rle, text)"));
}

#[test]
fn test_series_length_mismatch_error() {
    let error = Error::SeriesLengthMismatch {
        bucket: "(delta, zstd, temp)".to_string(),
    };
    assert!(format!("{error}").contains("Series length mismatch"));
}

#[test]
fn test_invalid_input_error() {
    let error = Error::InvalidInput("k must be greater than 0".to_string());
    let error_str = format!("{error}");
    assert!(error_str.contains("Invalid input"));
    assert!(error_str.contains("k must be greater than 0"));
}

#[test]
fn test_io_error_conversion() {
    let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
    let error: Error = io_error.into();
    let error_str = format!("{error}");
    assert!(error_str.contains("IO error"));
}

#[test]
fn test_error_debug() {
    let error = Error::InvalidInput("x".to_string());
    let debug_str = format!("{error:?}");
    assert!(debug_str.contains("InvalidInput"));
}

#[test]
fn test_result_type_alias_error() {
    fn returns_error() -> bench_aggregate::Result<i32> {
        Err(Error::InvalidInput("test error".to_string()))
    }

    let result = returns_error();
    assert!(result.is_err());
}

#[test]
fn test_csv_error_conversion() {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(false)
        .from_reader("algorithm,target\nrle\n".as_bytes());
    let csv_err = reader.records().next().unwrap().unwrap_err();
    let error: Error = csv_err.into();
    assert!(matches!(error, Error::Csv(_)));
    assert!(format!("{error}").starts_with("CSV error:"));
}
