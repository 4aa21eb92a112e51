//! Result file loader
//!
//! **Read-Only, Single-Pass Design**:
//! - Result files are produced by the external benchmark harness and never written here
//! - Load pattern: list directory, read every matching file once, group rows into buckets
//! - Rows are appended whole, so every bucket's records stay complete (lockstep series)
//!
//! File format: CSV with a header row, read with the `csv` crate.

use crate::record::{BucketKey, Record};
use crate::{Error, Result};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// Records grouped by bucket key, in key order
pub type Buckets = BTreeMap<BucketKey, Vec<Record>>;

/// Parse a header-keyed CSV table
///
/// Fields are unquoted and trimmed of surrounding whitespace, so `"rle"`,
/// ` rle` and `rle` name the same bucket. Blank lines are skipped. Rows may
/// be shorter or longer than the header; a short row fails later, when a
/// missing field is looked up. A file with only a header yields no records.
///
/// # Errors
/// Returns [`Error::Csv`] if the text is not well-formed CSV
pub fn parse_table(text: &str, source: &str) -> Result<Vec<Record>> {
    let source: Arc<str> = Arc::from(source);
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let header: Arc<[String]> = reader.headers()?.iter().map(str::to_string).collect();

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row?;
        let line = row.position().map_or(0, |pos| pos.line());
        records.push(Record::new(
            Arc::clone(&header),
            row.iter().map(str::to_string).collect(),
            Arc::clone(&source),
            usize::try_from(line).unwrap_or(usize::MAX),
        ));
    }
    Ok(records)
}

/// Check whether a file name is `<prefix>*.<extension>`
#[must_use]
pub fn matches_pattern(file_name: &str, prefix: &str, extension: &str) -> bool {
    file_name.starts_with(prefix)
        && Path::new(file_name)
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e == extension)
}

/// Bucketed result records loaded from one file family
#[derive(Debug, Default)]
pub struct ResultStore {
    buckets: Buckets,
    files: Vec<PathBuf>,
    record_count: usize,
}

impl ResultStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load every `<prefix>*.<extension>` file from `dir`
    ///
    /// Files are read in sorted name order so bucket-internal record order is
    /// reproducible across platforms.
    ///
    /// # Errors
    /// Returns error if the directory is missing, a file cannot be read, or a
    /// record lacks its key columns
    pub fn load_dir<P: AsRef<Path>>(dir: P, prefix: &str, extension: &str) -> Result<Self> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            return Err(Error::ResultsDirMissing {
                path: dir.to_path_buf(),
            });
        }

        let mut paths = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            let entry = entry?;
            let name = entry.file_name();
            let Some(name) = name.to_str() else {
                continue;
            };
            let path = entry.path();
            if matches_pattern(name, prefix, extension) && path.is_file() {
                paths.push(path);
            }
        }
        paths.sort();

        let mut store = Self::new();
        for path in paths {
            let text = std::fs::read_to_string(&path)?;
            let records = parse_table(&text, &path.display().to_string())?;
            debug!(file = %path.display(), records = records.len(), "loaded result file");
            store.append_records(records)?;
            store.files.push(path);
        }

        info!(
            prefix,
            files = store.files.len(),
            records = store.record_count,
            buckets = store.buckets.len(),
            "loaded result family"
        );
        Ok(store)
    }

    /// Classify records and append them to their buckets
    ///
    /// No deduplication: repeated rows accumulate.
    ///
    /// # Errors
    /// Returns error if a record lacks its key columns
    pub fn append_records(&mut self, records: Vec<Record>) -> Result<()> {
        for record in records {
            let key = BucketKey::classify(&record)?;
            self.buckets.entry(key).or_default().push(record);
            self.record_count += 1;
        }
        Ok(())
    }

    /// Get all buckets
    #[must_use]
    pub const fn buckets(&self) -> &Buckets {
        &self.buckets
    }

    /// Files read, in read order
    #[must_use]
    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    /// Total number of records across all buckets
    #[must_use]
    pub const fn record_count(&self) -> usize {
        self.record_count
    }
}
