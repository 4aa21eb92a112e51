//! Text tables for each result family
//!
//! Rendering is separate from aggregation: every function here takes a
//! finished [`Aggregation`] and returns text, so the computed parts can be
//! tested without capturing stdout.

use crate::record::BucketKey;
use crate::stats::{series, Aggregation, BucketMetrics, Stats, Variant};
use crate::{Error, Result};
use std::fmt::Write as _;

/// Width of the `=` banner rule
pub const BANNER_WIDTH: usize = 80;

const BATCH_SIZES_NOTE: &str = "Statistics Across Batch Sizes (5, 10, 15, 20, 25 samples)";

const HYBRID_TIME_SERIES: [&str; 4] = [
    series::ENCODE_TIMES,
    series::COMPRESS_TIMES,
    series::DECOMPRESS_TIMES,
    series::DECODE_TIMES,
];

/// Where a time column takes its values from
#[derive(Debug, Clone, Copy)]
enum TimeSource {
    /// One series
    Series(&'static str),
    /// Per-record sum of several series
    Total(&'static [&'static str]),
}

#[derive(Debug, Clone, Copy)]
struct TimeColumn {
    header: &'static str,
    width: usize,
    source: TimeSource,
}

/// Row ordering of a table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RowOrder {
    /// Ascending bucket key
    Key,
    /// Ascending mean of the ratio series (best compression first)
    MeanRatio,
}

#[derive(Debug, Clone, Copy)]
struct TableLayout {
    key_columns: &'static [(&'static str, usize)],
    ratio_series: &'static str,
    time_columns: &'static [TimeColumn],
    rule_width: usize,
    order: RowOrder,
}

const PAIR_KEY_COLUMNS: [(&str, usize); 2] = [("Algorithm", 15), ("Target", 12)];
const TRIPLE_KEY_COLUMNS: [(&str, usize); 3] =
    [("Encoder", 12), ("Compressor", 12), ("Target", 12)];

const ENCODING_LAYOUT: TableLayout = TableLayout {
    key_columns: &PAIR_KEY_COLUMNS,
    ratio_series: series::RATIOS,
    time_columns: &[
        TimeColumn {
            header: "Avg Encode (μs)",
            width: 18,
            source: TimeSource::Series(series::ENCODE_TIMES),
        },
        TimeColumn {
            header: "Avg Decode (μs)",
            width: 18,
            source: TimeSource::Series(series::DECODE_TIMES),
        },
    ],
    rule_width: 115,
    order: RowOrder::Key,
};

const COMPRESSION_LAYOUT: TableLayout = TableLayout {
    key_columns: &PAIR_KEY_COLUMNS,
    ratio_series: series::RATIOS,
    time_columns: &[
        TimeColumn {
            header: "Avg Compress (μs)",
            width: 20,
            source: TimeSource::Series(series::COMPRESS_TIMES),
        },
        TimeColumn {
            header: "Avg Decompress (μs)",
            width: 20,
            source: TimeSource::Series(series::DECOMPRESS_TIMES),
        },
    ],
    rule_width: 120,
    order: RowOrder::Key,
};

const HYBRID_LAYOUT: TableLayout = TableLayout {
    key_columns: &TRIPLE_KEY_COLUMNS,
    ratio_series: series::FINAL_RATIOS,
    time_columns: &[TimeColumn {
        header: "Avg Total Time (μs)",
        width: 25,
        source: TimeSource::Total(&HYBRID_TIME_SERIES),
    }],
    rule_width: 110,
    order: RowOrder::MeanRatio,
};

const fn layout(variant: Variant) -> &'static TableLayout {
    match variant {
        Variant::Encoding => &ENCODING_LAYOUT,
        Variant::Compression => &COMPRESSION_LAYOUT,
        Variant::Hybrid => &HYBRID_LAYOUT,
    }
}

/// A bucket with the statistics of its ratio series
#[derive(Debug, Clone, Copy)]
pub struct RankedBucket<'a> {
    /// Bucket key
    pub key: &'a BucketKey,
    /// All series of the bucket
    pub metrics: &'a BucketMetrics,
    /// Statistics of the ranking series
    pub ratio: Stats,
}

/// Stats of a named series, or [`Error::NoData`]
///
/// # Errors
/// Returns [`Error::NoData`] if the series is absent or empty
pub fn require_stats(key: &BucketKey, metrics: &BucketMetrics, name: &str) -> Result<Stats> {
    metrics.stats(name).ok_or_else(|| Error::NoData {
        bucket: key.to_string(),
        series: name.to_string(),
    })
}

/// Buckets ranked by ascending mean of `ratio_series`
///
/// The sort is stable, so buckets with equal means keep key order.
///
/// # Errors
/// Returns [`Error::NoData`] if a bucket has no values for `ratio_series`
pub fn rank_by_mean<'a>(
    aggregation: &'a Aggregation,
    ratio_series: &str,
) -> Result<Vec<RankedBucket<'a>>> {
    let mut ranked = aggregation
        .iter()
        .map(|(key, metrics)| {
            Ok(RankedBucket {
                key,
                metrics,
                ratio: require_stats(key, metrics, ratio_series)?,
            })
        })
        .collect::<Result<Vec<_>>>()?;
    ranked.sort_by(|a, b| a.ratio.mean.total_cmp(&b.ratio.mean));
    Ok(ranked)
}

/// Hybrid buckets, best final ratio first
///
/// # Errors
/// Returns [`Error::NoData`] if a bucket has no final ratios
pub fn hybrid_ranking(aggregation: &Aggregation) -> Result<Vec<RankedBucket<'_>>> {
    rank_by_mean(aggregation, series::FINAL_RATIOS)
}

/// Banner: blank line, `=` rule, title, `=` rule
#[must_use]
pub fn banner(title: &str) -> String {
    let rule = "=".repeat(BANNER_WIDTH);
    format!("\n{rule}\n{title}\n{rule}\n")
}

/// Render the table of one result family
///
/// # Errors
/// Returns error if a bucket's key shape does not fit the table, or a series
/// needed for a column is missing or empty
pub fn render_variant(variant: Variant, aggregation: &Aggregation) -> Result<String> {
    let layout = layout(variant);
    let mut out = banner(&format!("{} RESULTS - {BATCH_SIZES_NOTE}", variant.title()));

    out.push('\n');
    out.push_str(&header_line(layout));
    out.push('\n');
    out.push_str(&"-".repeat(layout.rule_width));
    out.push('\n');

    let rows: Vec<RankedBucket<'_>> = match layout.order {
        RowOrder::Key => aggregation
            .iter()
            .map(|(key, metrics)| {
                Ok(RankedBucket {
                    key,
                    metrics,
                    ratio: require_stats(key, metrics, layout.ratio_series)?,
                })
            })
            .collect::<Result<_>>()?,
        RowOrder::MeanRatio => rank_by_mean(aggregation, layout.ratio_series)?,
    };

    for row in &rows {
        out.push_str(&row_line(layout, row)?);
        out.push('\n');
    }

    Ok(out)
}

fn header_line(layout: &TableLayout) -> String {
    let mut cells: Vec<String> = layout
        .key_columns
        .iter()
        .map(|&(name, width)| format!("{name:<width$}"))
        .collect();
    cells.push(format!("{:<12}", "Avg Ratio"));
    cells.push(format!("{:<20}", "Min-Max Ratio"));
    for column in layout.time_columns {
        cells.push(format!("{:<width$}", column.header, width = column.width));
    }
    cells.join(" ")
}

fn row_line(layout: &TableLayout, row: &RankedBucket<'_>) -> Result<String> {
    let key_values = row.key.columns();
    if key_values.len() != layout.key_columns.len() {
        return Err(Error::InvalidInput(format!(
            "bucket {} does not fit a {}-column key layout",
            row.key,
            layout.key_columns.len()
        )));
    }

    let mut line = String::new();
    for (value, &(_, width)) in key_values.iter().zip(layout.key_columns) {
        let _ = write!(line, "{value:<width$} ");
    }

    let ratio = row.ratio;
    let range = format!("{:.4} - {:.4}", ratio.min, ratio.max);
    let _ = write!(line, "{:>10.4}  {range:<20}", ratio.mean);

    let mut time_cells = Vec::with_capacity(layout.time_columns.len());
    for column in layout.time_columns {
        let stats = match column.source {
            TimeSource::Series(name) => require_stats(row.key, row.metrics, name)?,
            TimeSource::Total(names) => {
                let totals = row.metrics.total_times(row.key, names)?;
                Stats::from_slice(&totals).ok_or_else(|| Error::NoData {
                    bucket: row.key.to_string(),
                    series: "total_times".to_string(),
                })?
            }
        };
        time_cells.push(format_time(&stats));
    }
    let _ = write!(line, " {}", time_cells.join("  "));

    Ok(line)
}

/// `mean (min-max)` with two decimals for the mean and one for the range
#[must_use]
pub fn format_time(stats: &Stats) -> String {
    format!("{:>10.2} ({:.1}-{:.1})", stats.mean, stats.min, stats.max)
}
