//! Cross-family summary
//!
//! Picks the most stable and the best-compressing encoders and pairs them
//! with a fixed set of batch-size observations. The observations are report
//! template text, not computed from the data.

use crate::record::BucketKey;
use crate::report::{banner, require_stats, BANNER_WIDTH};
use crate::stats::{series, Aggregation, Stats};
use crate::topk::TopKSelection;
use crate::Result;
use serde::Serialize;
use std::fmt::Write as _;
use tracing::debug;

/// Default number of entries per ranking
pub const DEFAULT_TOP_N: usize = 5;

/// Static batch-size observations printed under "Batch Size Impact"
pub const BATCH_SIZE_OBSERVATIONS: [&str; 3] = [
    "Larger batches generally give better compression ratios",
    "Encoding/decoding time scales linearly with batch size",
    "Compression overhead is more significant for small batches",
];

/// Bucket ranked by ratio spread
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StableEntry {
    /// Bucket key
    pub key: BucketKey,
    /// Mean ratio
    pub mean: f64,
    /// Ratio sample stddev (0 for a single sample)
    pub stddev: f64,
    /// Number of ratio samples
    pub samples: usize,
}

/// Bucket ranked by mean ratio
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RatioEntry {
    /// Bucket key
    pub key: BucketKey,
    /// Mean ratio
    pub mean: f64,
    /// Size reduction in percent, `(1 - mean) * 100`
    pub reduction_pct: f64,
}

/// Computed part of the summary
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Summary {
    /// Lowest ratio stddev first; single-sample buckets last
    pub most_stable: Vec<StableEntry>,
    /// Lowest mean ratio first
    pub best_ratios: Vec<RatioEntry>,
}

/// Build the summary from the three family aggregations
///
/// Both rankings are drawn from the encoding family. The compression and
/// hybrid aggregations are accepted so every family feeds the summary stage;
/// they currently only contribute to the debug log.
///
/// # Errors
/// Returns error if an encoding bucket has no ratios or `top_n` is zero
pub fn summarize(
    encoding: &Aggregation,
    compression: &Aggregation,
    hybrid: &Aggregation,
    top_n: usize,
) -> Result<Summary> {
    debug!(
        encoding = encoding.len(),
        compression = compression.len(),
        hybrid = hybrid.len(),
        "summarizing buckets"
    );

    let ratios: Vec<(&BucketKey, Stats)> = encoding
        .iter()
        .map(|(key, metrics)| Ok((key, require_stats(key, metrics, series::RATIOS)?)))
        .collect::<Result<_>>()?;

    let most_stable = ratios
        .top_k_by(top_n, |(_, stats)| stats.ranking_stddev())?
        .into_iter()
        .map(|(key, stats)| StableEntry {
            key: (*key).clone(),
            mean: stats.mean,
            stddev: stats.stddev,
            samples: stats.count,
        })
        .collect();

    let best_ratios = ratios
        .top_k_by(top_n, |(_, stats)| stats.mean)?
        .into_iter()
        .map(|(key, stats)| RatioEntry {
            key: (*key).clone(),
            mean: stats.mean,
            reduction_pct: (1.0 - stats.mean) * 100.0,
        })
        .collect();

    Ok(Summary {
        most_stable,
        best_ratios,
    })
}

/// `algorithm on target` (or `encoder+compressor on target`)
fn label(key: &BucketKey) -> String {
    match key {
        BucketKey::Pair { algorithm, target } => format!("{algorithm} on {target}"),
        BucketKey::Triple {
            encoder,
            compressor,
            target,
        } => format!("{encoder}+{compressor} on {target}"),
    }
}

/// Render the summary section
#[must_use]
pub fn render_summary(summary: &Summary) -> String {
    let mut out = banner("SUMMARY - Impact of Batch Size");

    out.push_str("\n🔍 KEY FINDINGS:\n");
    out.push_str(&"-".repeat(BANNER_WIDTH));
    out.push('\n');

    out.push_str("\n1. Most Stable Compression Ratios (lowest variance across batch sizes):\n");
    for entry in &summary.most_stable {
        let _ = writeln!(
            out,
            "   • {}: avg={:.4}, std={:.4}",
            label(&entry.key),
            entry.mean,
            entry.stddev
        );
    }

    out.push_str("\n2. Best Average Compression Ratios:\n");
    for entry in &summary.best_ratios {
        let _ = writeln!(
            out,
            "   • {}: {:.4} ({:.1}% reduction)",
            label(&entry.key),
            entry.mean,
            entry.reduction_pct
        );
    }

    out.push_str("\n3. Batch Size Impact:\n");
    for observation in BATCH_SIZE_OBSERVATIONS {
        let _ = writeln!(out, "   • {observation}");
    }

    out.push('\n');
    out.push_str(&"=".repeat(BANNER_WIDTH));
    out.push('\n');
    out
}
