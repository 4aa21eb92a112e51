//! Result records and bucket keys
//!
//! A [`Record`] is one row of a benchmark result file. Its header is shared
//! with every other row of the same file, so a record is a thin view of
//! `field name -> raw text`. Numeric coercion happens on demand through
//! [`Record::number`].

use crate::{Error, Result};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// Column that marks a two-stage (hybrid) result file
pub const ENCODER_FIELD: &str = "encoder";

/// One row of a result file
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    header: Arc<[String]>,
    values: Vec<String>,
    source: Arc<str>,
    line: usize,
}

impl Record {
    /// Create a record from a shared header and the row's values.
    ///
    /// `source` and `line` only feed error messages.
    #[must_use]
    pub fn new(header: Arc<[String]>, values: Vec<String>, source: Arc<str>, line: usize) -> Self {
        Self {
            header,
            values,
            source,
            line,
        }
    }

    /// Check whether the file this record came from has the given column
    #[must_use]
    pub fn has_field(&self, field: &str) -> bool {
        self.header.iter().any(|h| h == field)
    }

    /// Look up a field's raw text
    ///
    /// # Errors
    /// Returns [`Error::MissingField`] if the header has no such column or the
    /// row is too short to hold a value for it.
    pub fn get(&self, field: &str) -> Result<&str> {
        self.header
            .iter()
            .position(|h| h == field)
            .and_then(|idx| self.values.get(idx))
            .map(String::as_str)
            .ok_or_else(|| Error::MissingField {
                field: field.to_string(),
                source_name: self.location(),
            })
    }

    /// Look up a field and parse it as a float
    ///
    /// # Errors
    /// Returns [`Error::MissingField`] if the field is absent and
    /// [`Error::InvalidNumber`] if its text is not a number.
    pub fn number(&self, field: &str) -> Result<f64> {
        let raw = self.get(field)?;
        raw.trim().parse().map_err(|_| Error::InvalidNumber {
            field: field.to_string(),
            value: raw.to_string(),
            source_name: self.location(),
        })
    }

    /// `file:line` of this record
    #[must_use]
    pub fn location(&self) -> String {
        format!("{}:{}", self.source, self.line)
    }
}

/// Grouping key of a bucket
///
/// Single-stage results (encoding, compression) are keyed by algorithm and
/// target; hybrid results by encoder, compressor and target. The derived
/// ordering is lexicographic over the tuple.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(untagged)]
pub enum BucketKey {
    /// `(algorithm, target)`
    Pair {
        /// Algorithm name
        algorithm: String,
        /// Target dataset
        target: String,
    },
    /// `(encoder, compressor, target)`
    Triple {
        /// Encoding stage
        encoder: String,
        /// Compression stage
        compressor: String,
        /// Target dataset
        target: String,
    },
}

impl BucketKey {
    /// Build a pair key
    #[must_use]
    pub fn pair(algorithm: impl Into<String>, target: impl Into<String>) -> Self {
        Self::Pair {
            algorithm: algorithm.into(),
            target: target.into(),
        }
    }

    /// Build a triple key
    #[must_use]
    pub fn triple(
        encoder: impl Into<String>,
        compressor: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        Self::Triple {
            encoder: encoder.into(),
            compressor: compressor.into(),
            target: target.into(),
        }
    }

    /// Derive the key of a record.
    ///
    /// A record whose file has an `encoder` column is a hybrid result and
    /// gets a [`BucketKey::Triple`]; everything else gets a
    /// [`BucketKey::Pair`].
    ///
    /// # Errors
    /// Returns [`Error::MissingField`] if a key column is absent.
    pub fn classify(record: &Record) -> Result<Self> {
        if record.has_field(ENCODER_FIELD) {
            Ok(Self::triple(
                record.get(ENCODER_FIELD)?,
                record.get("compressor")?,
                record.get("target")?,
            ))
        } else {
            Ok(Self::pair(record.get("algorithm")?, record.get("target")?))
        }
    }

    /// Target dataset of either key shape
    #[must_use]
    pub fn target(&self) -> &str {
        match self {
            Self::Pair { target, .. } | Self::Triple { target, .. } => target,
        }
    }

    /// Categorical columns in display order
    #[must_use]
    pub fn columns(&self) -> Vec<&str> {
        match self {
            Self::Pair { algorithm, target } => vec![algorithm.as_str(), target.as_str()],
            Self::Triple {
                encoder,
                compressor,
                target,
            } => vec![encoder.as_str(), compressor.as_str(), target.as_str()],
        }
    }
}

impl fmt::Display for BucketKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({})", self.columns().join(", "))
    }
}
