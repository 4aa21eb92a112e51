//! Per-bucket metric series and descriptive statistics
//!
//! Each result family declares which input columns become which named series
//! ([`FieldMapping`]). Series are held as Arrow `Float64Array`s and reduced
//! with Arrow's aggregate kernels.
//!
//! Every record contributes exactly one value to every series of its bucket,
//! so the series of one bucket are index-aligned.

use crate::record::BucketKey;
use crate::storage::Buckets;
use crate::{Error, Result};
use arrow::array::{Array, Float64Array};
use arrow::compute;
use serde::Serialize;
use std::collections::BTreeMap;

/// Unit conversion applied when a value is extracted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scale {
    /// Value is used as-is (ratios)
    Identity,
    /// Nanoseconds to microseconds
    NanosToMicros,
}

impl Scale {
    /// Apply the conversion
    #[must_use]
    pub fn apply(self, value: f64) -> f64 {
        match self {
            Self::Identity => value,
            // Division keeps 5000 ns -> 5.0 us exact; multiplying by 1e-3 would not.
            Self::NanosToMicros => value / 1000.0,
        }
    }
}

/// Input column -> output series
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldMapping {
    /// Column name in the result file
    pub field: &'static str,
    /// Series name in the aggregation
    pub series: &'static str,
    /// Unit conversion
    pub scale: Scale,
}

impl FieldMapping {
    /// Timing column in nanoseconds, reported in microseconds
    #[must_use]
    pub const fn micros(field: &'static str, series: &'static str) -> Self {
        Self {
            field,
            series,
            scale: Scale::NanosToMicros,
        }
    }

    /// Dimensionless column
    #[must_use]
    pub const fn ratio(field: &'static str, series: &'static str) -> Self {
        Self {
            field,
            series,
            scale: Scale::Identity,
        }
    }
}

/// Series names shared by the variants
pub mod series {
    /// Encode times (us)
    pub const ENCODE_TIMES: &str = "encode_times";
    /// Decode times (us)
    pub const DECODE_TIMES: &str = "decode_times";
    /// Compress times (us)
    pub const COMPRESS_TIMES: &str = "compress_times";
    /// Decompress times (us)
    pub const DECOMPRESS_TIMES: &str = "decompress_times";
    /// Compression ratios of single-stage results
    pub const RATIOS: &str = "ratios";
    /// End-to-end ratios of hybrid results
    pub const FINAL_RATIOS: &str = "final_ratios";
}

const ENCODING_MAPPINGS: [FieldMapping; 3] = [
    FieldMapping::micros("encode_time_ns", series::ENCODE_TIMES),
    FieldMapping::micros("decode_time_ns", series::DECODE_TIMES),
    FieldMapping::ratio("compression_ratio", series::RATIOS),
];

const COMPRESSION_MAPPINGS: [FieldMapping; 3] = [
    FieldMapping::micros("compress_time_ns", series::COMPRESS_TIMES),
    FieldMapping::micros("decompress_time_ns", series::DECOMPRESS_TIMES),
    FieldMapping::ratio("compression_ratio", series::RATIOS),
];

const HYBRID_MAPPINGS: [FieldMapping; 5] = [
    FieldMapping::micros("encode_time_ns", series::ENCODE_TIMES),
    FieldMapping::micros("compress_time_ns", series::COMPRESS_TIMES),
    FieldMapping::micros("decompress_time_ns", series::DECOMPRESS_TIMES),
    FieldMapping::micros("decode_time_ns", series::DECODE_TIMES),
    FieldMapping::ratio("final_ratio", series::FINAL_RATIOS),
];

/// Result family produced by the benchmark harness
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    /// Single-stage encoders
    Encoding,
    /// Single-stage general-purpose compressors
    Compression,
    /// Encoder followed by compressor
    Hybrid,
}

impl Variant {
    /// All variants, in report order
    pub const ALL: [Self; 3] = [Self::Encoding, Self::Compression, Self::Hybrid];

    /// File name prefix of this family
    #[must_use]
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::Encoding => "encoding_",
            Self::Compression => "compression_",
            Self::Hybrid => "hybrid_",
        }
    }

    /// Banner title
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Encoding => "ENCODING",
            Self::Compression => "COMPRESSION",
            Self::Hybrid => "HYBRID",
        }
    }

    /// Column -> series mappings
    #[must_use]
    pub const fn mappings(self) -> &'static [FieldMapping] {
        match self {
            Self::Encoding => &ENCODING_MAPPINGS,
            Self::Compression => &COMPRESSION_MAPPINGS,
            Self::Hybrid => &HYBRID_MAPPINGS,
        }
    }
}

/// Descriptive statistics of one series
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Stats {
    /// Number of samples
    pub count: usize,
    /// Arithmetic mean
    pub mean: f64,
    /// Smallest sample
    pub min: f64,
    /// Largest sample
    pub max: f64,
    /// Sample standard deviation, 0 for fewer than two samples
    pub stddev: f64,
}

impl Stats {
    /// Compute statistics over an array
    ///
    /// Returns `None` for an empty (or all-null) array: there is no data to
    /// describe, and callers must check before formatting.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn compute(values: &Float64Array) -> Option<Self> {
        let count = values.len() - values.null_count();
        let sum = compute::sum(values)?;
        let min = compute::min(values)?;
        let max = compute::max(values)?;

        // Float rounding can push sum/n a hair outside the sample range.
        let raw_mean = sum / count as f64;
        let mean = if raw_mean < min {
            min
        } else if raw_mean > max {
            max
        } else {
            raw_mean
        };

        let stddev = if count < 2 {
            0.0
        } else {
            let sq: f64 = values.iter().flatten().map(|v| (v - mean).powi(2)).sum();
            (sq / (count - 1) as f64).sqrt()
        };

        Some(Self {
            count,
            mean,
            min,
            max,
            stddev,
        })
    }

    /// Compute statistics over a slice
    #[must_use]
    pub fn from_slice(values: &[f64]) -> Option<Self> {
        Self::compute(&Float64Array::from(values.to_vec()))
    }

    /// Standard deviation used for stability ranking
    ///
    /// A single sample says nothing about spread, so it ranks as infinitely
    /// unstable rather than perfectly stable.
    #[must_use]
    pub fn ranking_stddev(&self) -> f64 {
        if self.count > 1 {
            self.stddev
        } else {
            f64::INFINITY
        }
    }
}

/// Named numeric sequence of one bucket
#[derive(Debug, Clone, PartialEq)]
pub struct MetricSeries {
    name: &'static str,
    values: Float64Array,
}

impl MetricSeries {
    /// Create a series
    #[must_use]
    pub fn new(name: &'static str, values: Vec<f64>) -> Self {
        Self {
            name,
            values: Float64Array::from(values),
        }
    }

    /// Series name
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Underlying array
    #[must_use]
    pub const fn values(&self) -> &Float64Array {
        &self.values
    }

    /// Number of samples
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the series has no samples
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Statistics, `None` if empty
    #[must_use]
    pub fn stats(&self) -> Option<Stats> {
        Stats::compute(&self.values)
    }
}

/// All series of one bucket
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BucketMetrics {
    series: BTreeMap<&'static str, MetricSeries>,
    record_count: usize,
}

impl BucketMetrics {
    /// Look up a series by name
    #[must_use]
    pub fn series(&self, name: &str) -> Option<&MetricSeries> {
        self.series.get(name)
    }

    /// Statistics of a named series, `None` if absent or empty
    #[must_use]
    pub fn stats(&self, name: &str) -> Option<Stats> {
        self.series(name).and_then(MetricSeries::stats)
    }

    /// Series name -> statistics for every series of the bucket
    #[must_use]
    pub fn summary(&self) -> BTreeMap<&'static str, Option<Stats>> {
        self.series
            .iter()
            .map(|(name, series)| (*name, series.stats()))
            .collect()
    }

    /// Number of records that fed this bucket
    #[must_use]
    pub const fn record_count(&self) -> usize {
        self.record_count
    }

    /// Per-record sum of several index-aligned series
    ///
    /// # Errors
    /// Returns [`Error::NoData`] if a series is absent and
    /// [`Error::SeriesLengthMismatch`] if the series differ in length.
    pub fn total_times(&self, key: &BucketKey, names: &[&str]) -> Result<Vec<f64>> {
        let mut totals: Option<Vec<f64>> = None;
        for name in names {
            let series = self.series(name).ok_or_else(|| Error::NoData {
                bucket: key.to_string(),
                series: (*name).to_string(),
            })?;
            match totals.as_mut() {
                None => totals = Some(series.values().values().to_vec()),
                Some(acc) => {
                    if acc.len() != series.len() {
                        return Err(Error::SeriesLengthMismatch {
                            bucket: key.to_string(),
                        });
                    }
                    for (total, v) in acc.iter_mut().zip(series.values().values().iter()) {
                        *total += v;
                    }
                }
            }
        }
        Ok(totals.unwrap_or_default())
    }
}

/// Aggregation result of one result family
pub type Aggregation = BTreeMap<BucketKey, BucketMetrics>;

/// Build the named series of every bucket
///
/// # Errors
/// Returns error if a record lacks a mapped field or holds a non-numeric value
pub fn aggregate(buckets: &Buckets, mappings: &[FieldMapping]) -> Result<Aggregation> {
    let mut aggregation = Aggregation::new();

    for (key, records) in buckets {
        let mut columns: Vec<Vec<f64>> = vec![Vec::with_capacity(records.len()); mappings.len()];

        for record in records {
            // Extract the whole row before appending so series stay in lockstep.
            let row = mappings
                .iter()
                .map(|m| record.number(m.field).map(|v| m.scale.apply(v)))
                .collect::<Result<Vec<f64>>>()?;
            for (column, value) in columns.iter_mut().zip(row) {
                column.push(value);
            }
        }

        let series = mappings
            .iter()
            .zip(columns)
            .map(|(m, values)| (m.series, MetricSeries::new(m.series, values)))
            .collect();

        aggregation.insert(
            key.clone(),
            BucketMetrics {
                series,
                record_count: records.len(),
            },
        );
    }

    Ok(aggregation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{parse_table, ResultStore};

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn load(text: &str) -> ResultStore {
        let mut store = ResultStore::new();
        store
            .append_records(parse_table(text, "test.csv").unwrap())
            .unwrap();
        store
    }

    #[test]
    fn test_stats_basic() {
        let stats = Stats::from_slice(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
        assert_eq!(stats.count, 8);
        assert!(approx(stats.mean, 5.0));
        assert!(approx(stats.min, 2.0));
        assert!(approx(stats.max, 9.0));
        // sample stddev = sqrt(32 / 7)
        assert!(approx(stats.stddev, (32.0_f64 / 7.0).sqrt()));
    }

    #[test]
    fn test_stats_single_sample() {
        let stats = Stats::from_slice(&[3.5]).unwrap();
        assert!(approx(stats.stddev, 0.0));
        assert!(stats.ranking_stddev().is_infinite());
    }

    #[test]
    fn test_stats_empty_is_none() {
        assert!(Stats::from_slice(&[]).is_none());
    }

    #[test]
    fn test_stats_constant_series_mean_in_range() {
        let stats = Stats::from_slice(&[0.1, 0.1, 0.1]).unwrap();
        assert!(stats.min <= stats.mean && stats.mean <= stats.max);
    }

    #[test]
    fn test_scale_exact() {
        assert_eq!(Scale::NanosToMicros.apply(5000.0), 5.0);
        assert_eq!(Scale::Identity.apply(0.8), 0.8);
    }

    #[test]
    fn test_aggregate_encoding() {
        let store = load(
            "algorithm,target,encode_time_ns,decode_time_ns,compression_ratio\n\
             rle,text,1000,500,0.80\n\
             rle,text,3000,1500,0.60\n",
        );
        let agg = aggregate(store.buckets(), Variant::Encoding.mappings()).unwrap();
        let metrics = &agg[&BucketKey::pair("rle", "text")];

        assert_eq!(metrics.record_count(), 2);
        let ratios = metrics.stats(series::RATIOS).unwrap();
        assert!(approx(ratios.mean, 0.7));
        assert!(approx(ratios.min, 0.6));
        assert!(approx(ratios.max, 0.8));

        let encode = metrics.stats(series::ENCODE_TIMES).unwrap();
        assert!(approx(encode.mean, 2.0));
        assert!(approx(encode.min, 1.0));
        assert!(approx(encode.max, 3.0));

        let summary = metrics.summary();
        assert_eq!(summary.len(), 3);
        assert!(summary[series::DECODE_TIMES].is_some());
    }

    #[test]
    fn test_aggregate_missing_field_is_fatal() {
        let store = load("algorithm,target,encode_time_ns,decode_time_ns\nrle,text,1,1\n");
        let err = aggregate(store.buckets(), Variant::Encoding.mappings()).unwrap_err();
        assert!(err.to_string().contains("compression_ratio"));
    }

    #[test]
    fn test_aggregate_non_numeric_is_fatal() {
        let store = load(
            "algorithm,target,encode_time_ns,decode_time_ns,compression_ratio\nrle,text,n/a,1,0.5\n",
        );
        let result = aggregate(store.buckets(), Variant::Encoding.mappings());
        assert!(matches!(result, Err(Error::InvalidNumber { .. })));
    }

    #[test]
    fn test_total_times_sums_by_index() {
        let store = load(
            "encoder,compressor,target,encode_time_ns,compress_time_ns,decompress_time_ns,decode_time_ns,final_ratio\n\
             delta,zstd,temp,1000,2000,3000,4000,0.2\n\
             delta,zstd,temp,500,500,500,500,0.4\n",
        );
        let agg = aggregate(store.buckets(), Variant::Hybrid.mappings()).unwrap();
        let key = BucketKey::triple("delta", "zstd", "temp");
        let totals = agg[&key]
            .total_times(
                &key,
                &[
                    series::ENCODE_TIMES,
                    series::COMPRESS_TIMES,
                    series::DECOMPRESS_TIMES,
                    series::DECODE_TIMES,
                ],
            )
            .unwrap();
        assert_eq!(totals.len(), 2);
        assert!(approx(totals[0], 10.0));
        assert!(approx(totals[1], 2.0));
    }

    #[test]
    fn test_total_times_missing_series() {
        let key = BucketKey::pair("a", "b");
        let metrics = BucketMetrics::default();
        let result = metrics.total_times(&key, &[series::ENCODE_TIMES]);
        assert!(matches!(result, Err(Error::NoData { .. })));
    }

    #[test]
    fn test_variant_tables() {
        assert_eq!(Variant::Encoding.prefix(), "encoding_");
        assert_eq!(Variant::Hybrid.mappings().len(), 5);
        assert!(Variant::Compression
            .mappings()
            .iter()
            .any(|m| m.field == "compress_time_ns" && m.scale == Scale::NanosToMicros));
    }
}
