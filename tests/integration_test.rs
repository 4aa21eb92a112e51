//! Integration tests for the full pipeline:
//! 1. Load result files from a directory
//! 2. Aggregate the three families
//! 3. Render tables and summary

use bench_aggregate::record::BucketKey;
use bench_aggregate::stats::{series, Variant};
use bench_aggregate::{run, Error, ReportConfig, COMPLETION_LINE};
use std::fs;
use std::path::Path;

const ENCODING_HEADER: &str = "algorithm,target,encode_time_ns,decode_time_ns,compression_ratio";
const COMPRESSION_HEADER: &str = "algorithm,target,compress_time_ns,decompress_time_ns,original_size_bytes,compressed_size_bytes,compression_ratio";
const HYBRID_HEADER: &str = "encoder,compressor,target,encode_time_ns,compress_time_ns,decompress_time_ns,decode_time_ns,original_size_bytes,encoded_size_bytes,final_size_bytes,encoding_ratio,final_ratio";

fn write(dir: &Path, name: &str, contents: &str) {
    fs::write(dir.join(name), contents).unwrap();
}

fn config(dir: &Path) -> ReportConfig {
    ReportConfig::builder().results_dir(dir).build().unwrap()
}

#[test]
fn test_encoding_scenario_b5() {
    let dir = tempfile::tempdir().unwrap();
    write(
        dir.path(),
        "encoding_b5.csv",
        &format!("{ENCODING_HEADER}\nrle,text,1000,500,0.80\nrle,text,3000,1500,0.60\n"),
    );

    let report = run(&config(dir.path())).unwrap();
    let metrics = &report.encoding[&BucketKey::pair("rle", "text")];
    let ratios = metrics.stats(series::RATIOS).unwrap();
    assert!((ratios.mean - 0.7).abs() < 1e-12);

    let text = report.render().unwrap();
    let row = text
        .lines()
        .find(|l| l.starts_with("rle "))
        .expect("rle row");
    assert!(row.contains("0.7000"));
    assert!(row.contains("0.6000 - 0.8000"));
    assert!(row.contains("2.00 (1.0-3.0)"));
    assert!(text.trim_end().ends_with(COMPLETION_LINE));
}

#[test]
fn test_quoted_keys_merge_with_unquoted() {
    let dir = tempfile::tempdir().unwrap();
    write(
        dir.path(),
        "encoding_b5.csv",
        &format!("{ENCODING_HEADER}\n\"rle\",text,1000,500,0.80\nrle,\"text\",3000,1500,0.60\n"),
    );

    let report = run(&config(dir.path())).unwrap();
    assert_eq!(report.encoding.len(), 1);

    let text = report.render().unwrap();
    let rows: Vec<&str> = text.lines().filter(|l| l.starts_with("rle ")).collect();
    assert_eq!(rows.len(), 1);
    assert!(rows[0].contains("0.7000"));
}

#[test]
fn test_all_families_rendered_in_order() {
    let dir = tempfile::tempdir().unwrap();
    write(
        dir.path(),
        "encoding_b5.csv",
        &format!("{ENCODING_HEADER}\ndelta,temp,100,100,0.40\n"),
    );
    write(
        dir.path(),
        "compression_b5.csv",
        &format!("{COMPRESSION_HEADER}\nzstd,temp,2000,1000,800,200,0.25\n"),
    );
    write(
        dir.path(),
        "hybrid_b5.csv",
        &format!(
            "{HYBRID_HEADER}\n\
             delta,zstd,temp,1000,1000,1000,1000,800,400,100,0.5,0.125\n\
             delta,lz4,temp,1000,1000,1000,1000,800,400,200,0.5,0.25\n"
        ),
    );

    let report = run(&config(dir.path())).unwrap();
    assert_eq!(report.aggregation(Variant::Encoding).len(), 1);
    assert_eq!(report.aggregation(Variant::Compression).len(), 1);
    assert_eq!(report.aggregation(Variant::Hybrid).len(), 2);

    let text = report.render().unwrap();
    let enc = text.find("ENCODING RESULTS").unwrap();
    let comp = text.find("COMPRESSION RESULTS").unwrap();
    let hyb = text.find("HYBRID RESULTS").unwrap();
    let summary = text.find("SUMMARY - Impact of Batch Size").unwrap();
    assert!(enc < comp && comp < hyb && hyb < summary);

    let zstd = text.find("delta        zstd").unwrap();
    let lz4 = text.find("delta        lz4").unwrap();
    assert!(zstd < lz4, "best final ratio must come first");
}

#[test]
fn test_records_across_batch_files_accumulate() {
    let dir = tempfile::tempdir().unwrap();
    for (batch, ratio) in [(5, "0.9"), (10, "0.8"), (15, "0.7"), (20, "0.6"), (25, "0.5")] {
        write(
            dir.path(),
            &format!("encoding_b{batch}.csv"),
            &format!("{ENCODING_HEADER}\ngorilla,temp,1000,1000,{ratio}\n"),
        );
    }

    let report = run(&config(dir.path())).unwrap();
    let ratios = report.encoding[&BucketKey::pair("gorilla", "temp")]
        .stats(series::RATIOS)
        .unwrap();
    assert_eq!(ratios.count, 5);
    assert!((ratios.mean - 0.7).abs() < 1e-12);
    assert!((ratios.min - 0.5).abs() < 1e-12);
    assert!((ratios.max - 0.9).abs() < 1e-12);
}

#[test]
fn test_missing_field_fails_whole_run() {
    let dir = tempfile::tempdir().unwrap();
    write(
        dir.path(),
        "encoding_b5.csv",
        "algorithm,target,encode_time_ns,decode_time_ns\nrle,text,1000,500\n",
    );

    let err = run(&config(dir.path())).unwrap_err();
    assert!(matches!(err, Error::MissingField { ref field, .. } if field == "compression_ratio"));
}

#[test]
fn test_missing_directory() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("results_quick");

    let err = run(&config(&missing)).unwrap_err();
    assert!(matches!(err, Error::ResultsDirMissing { .. }));
}

#[test]
fn test_empty_directory_renders_empty_tables() {
    let dir = tempfile::tempdir().unwrap();
    let report = run(&config(dir.path())).unwrap();

    assert!(report.encoding.is_empty());
    assert!(report.summary.most_stable.is_empty());
    let text = report.render().unwrap();
    assert!(text.contains("3. Batch Size Impact:"));
}
