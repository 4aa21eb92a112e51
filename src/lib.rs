//! # bench-aggregate: batch-size statistics for benchmark results
//!
//! Reads the CSV files written by the encoding, compression and hybrid
//! benchmarks, groups rows by algorithm and target (or encoder, compressor and
//! target), and reports mean/min/max/stddev of timings and compression ratios
//! across batch sizes.
//!
//! ## Pipeline
//!
//! ```text
//! ResultStore::load_dir ──> stats::aggregate ──> report::render_variant (x3)
//!                                   │
//!                                   └──────────> summary::summarize
//! ```
//!
//! Everything is computed before anything is rendered, so a malformed file
//! aborts the run without printing a partial report.
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use bench_aggregate::ReportConfig;
//!
//! let config = ReportConfig::builder().results_dir("results_quick").build()?;
//! let report = bench_aggregate::run(&config)?;
//! print!("{}", report.render()?);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

pub mod error;
pub mod record;
pub mod report;
pub mod stats;
pub mod storage;
pub mod summary;
pub mod topk;

pub use error::{Error, Result};

use stats::{aggregate, Aggregation, Variant};
use std::path::{Path, PathBuf};
use storage::ResultStore;
use summary::Summary;
use tracing::info;

/// Directory the benchmark scripts write to
pub const DEFAULT_RESULTS_DIR: &str = "results_quick";

/// Result file extension
pub const DEFAULT_EXTENSION: &str = "csv";

/// Closing line of a complete report
pub const COMPLETION_LINE: &str = "✅ Analysis complete!";

/// Report configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportConfig {
    results_dir: PathBuf,
    extension: String,
    top_n: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            results_dir: PathBuf::from(DEFAULT_RESULTS_DIR),
            extension: DEFAULT_EXTENSION.to_string(),
            top_n: summary::DEFAULT_TOP_N,
        }
    }
}

impl ReportConfig {
    /// Create a new config builder
    #[must_use]
    pub fn builder() -> ReportConfigBuilder {
        ReportConfigBuilder::default()
    }

    /// Directory holding the result files
    #[must_use]
    pub fn results_dir(&self) -> &Path {
        &self.results_dir
    }

    /// Result file extension, without the dot
    #[must_use]
    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Entries per summary ranking
    #[must_use]
    pub const fn top_n(&self) -> usize {
        self.top_n
    }
}

/// Report config builder
#[derive(Debug, Default)]
pub struct ReportConfigBuilder {
    config: ReportConfig,
}

impl ReportConfigBuilder {
    /// Set the results directory
    #[must_use]
    pub fn results_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.results_dir = dir.into();
        self
    }

    /// Set the result file extension (leading dot optional)
    #[must_use]
    pub fn extension(mut self, extension: impl Into<String>) -> Self {
        let extension = extension.into();
        self.config.extension = extension.trim_start_matches('.').to_string();
        self
    }

    /// Set the number of entries per summary ranking
    #[must_use]
    pub fn top_n(mut self, top_n: usize) -> Self {
        self.config.top_n = top_n;
        self
    }

    /// Build the config
    ///
    /// # Errors
    ///
    /// Returns error if `top_n` is zero or the extension is empty
    pub fn build(self) -> Result<ReportConfig> {
        if self.config.top_n == 0 {
            return Err(Error::InvalidInput("top_n must be greater than 0".to_string()));
        }
        if self.config.extension.is_empty() {
            return Err(Error::InvalidInput("extension must not be empty".to_string()));
        }
        Ok(self.config)
    }
}

/// Aggregated results of one run
#[derive(Debug, Clone)]
pub struct Report {
    /// Encoding family
    pub encoding: Aggregation,
    /// Compression family
    pub compression: Aggregation,
    /// Hybrid family
    pub hybrid: Aggregation,
    /// Cross-family summary
    pub summary: Summary,
}

impl Report {
    /// Aggregation of one family
    #[must_use]
    pub const fn aggregation(&self, variant: Variant) -> &Aggregation {
        match variant {
            Variant::Encoding => &self.encoding,
            Variant::Compression => &self.compression,
            Variant::Hybrid => &self.hybrid,
        }
    }

    /// Render the full text report
    ///
    /// # Errors
    /// Returns error if a bucket lacks a series its table needs
    pub fn render(&self) -> Result<String> {
        let mut out = String::new();
        for variant in Variant::ALL {
            out.push_str(&report::render_variant(variant, self.aggregation(variant))?);
        }
        out.push_str(&summary::render_summary(&self.summary));
        out.push('\n');
        out.push_str(COMPLETION_LINE);
        out.push('\n');
        Ok(out)
    }
}

/// Load and aggregate one result family
///
/// # Errors
/// Returns error if the directory is missing or a file is malformed
pub fn load_variant(config: &ReportConfig, variant: Variant) -> Result<Aggregation> {
    let store = ResultStore::load_dir(config.results_dir(), variant.prefix(), config.extension())?;
    aggregate(store.buckets(), variant.mappings())
}

/// Run the whole pipeline
///
/// # Errors
/// Returns [`Error::ResultsDirMissing`] if the results directory is absent;
/// any malformed file aborts the run with the corresponding error
pub fn run(config: &ReportConfig) -> Result<Report> {
    let dir = config.results_dir();
    if !dir.is_dir() {
        return Err(Error::ResultsDirMissing {
            path: dir.to_path_buf(),
        });
    }

    info!(dir = %dir.display(), "analyzing benchmark results");
    let encoding = load_variant(config, Variant::Encoding)?;
    let compression = load_variant(config, Variant::Compression)?;
    let hybrid = load_variant(config, Variant::Hybrid)?;
    let summary = summary::summarize(&encoding, &compression, &hybrid, config.top_n())?;

    Ok(Report {
        encoding,
        compression,
        hybrid,
        summary,
    })
}
