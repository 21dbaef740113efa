// ReviewScope - core/model.rs
//
// Core data model types. Pure data definitions with no I/O, no UI,
// no platform dependencies.
//
// These types are the shared vocabulary across all layers.

use crate::util::constants;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::PathBuf;

// =============================================================================
// Review record (normalised output of ingestion)
// =============================================================================

/// A single review row with its derived fields.
///
/// Records are created once at load time and never mutated; filtering and
/// aggregation work on indices into the loaded slice.
#[derive(Debug, Clone, Serialize)]
pub struct ReviewRecord {
    /// Zero-based row number within the loaded sample.
    pub id: u64,

    /// Full review text.
    pub review: String,

    /// Length of `review` in characters (Unicode scalar values).
    pub review_length: usize,

    /// Sentiment polarity in [-1, 1].
    pub polarity: f64,

    /// Label derived from `polarity`.
    pub label: SentimentLabel,

    /// Genre, if the row has one.
    pub category: Option<String>,

    /// Movie title ("original title" column).
    pub title: Option<String>,

    /// Reviewer name.
    pub author: Option<String>,
}

impl ReviewRecord {
    /// Build a record, deriving length and label from the inputs.
    pub fn new(
        id: u64,
        review: String,
        polarity: f64,
        category: Option<String>,
        title: Option<String>,
        author: Option<String>,
    ) -> Self {
        let review_length = review.chars().count();
        Self {
            id,
            review,
            review_length,
            polarity,
            label: SentimentLabel::from_polarity(polarity),
            category,
            title,
            author,
        }
    }
}

// =============================================================================
// Sentiment label
// =============================================================================

/// Three-valued sentiment classification of a polarity score.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
pub enum SentimentLabel {
    Positive,
    #[default]
    Neutral,
    Negative,
}

impl SentimentLabel {
    /// Returns all variants in display order.
    pub fn all() -> &'static [SentimentLabel] {
        &[
            SentimentLabel::Positive,
            SentimentLabel::Neutral,
            SentimentLabel::Negative,
        ]
    }

    /// Classify a polarity score. Values exactly on a threshold are Neutral.
    pub fn from_polarity(polarity: f64) -> Self {
        if polarity > constants::POSITIVE_THRESHOLD {
            SentimentLabel::Positive
        } else if polarity < constants::NEGATIVE_THRESHOLD {
            SentimentLabel::Negative
        } else {
            SentimentLabel::Neutral
        }
    }

    /// Human-readable label for display.
    pub fn label(&self) -> &'static str {
        match self {
            SentimentLabel::Positive => "Positive",
            SentimentLabel::Neutral => "Neutral",
            SentimentLabel::Negative => "Negative",
        }
    }

    /// Position in `all()`, used to index per-label arrays.
    pub fn index(&self) -> usize {
        match self {
            SentimentLabel::Positive => 0,
            SentimentLabel::Neutral => 1,
            SentimentLabel::Negative => 2,
        }
    }
}

impl std::fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

// =============================================================================
// Dataset
// =============================================================================

/// Which optional columns were present in the CSV header.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ColumnPresence {
    pub category: bool,
    pub title: bool,
    pub author: bool,
}

impl ColumnPresence {
    /// Names of the optional columns that were not found.
    pub fn missing(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if !self.category {
            missing.push(constants::COLUMN_CATEGORY);
        }
        if !self.title {
            missing.push(constants::COLUMN_TITLE);
        }
        if !self.author {
            missing.push(constants::COLUMN_AUTHOR);
        }
        missing
    }
}

/// The loaded review sample. Immutable after loading.
#[derive(Debug, Clone)]
pub struct Dataset {
    /// File the rows were read from.
    pub source: PathBuf,

    /// Loaded records, in file order.
    pub records: Vec<ReviewRecord>,

    /// Optional columns found in the header.
    pub columns: ColumnPresence,
}

// =============================================================================
// Facets (bounds for the filter controls)
// =============================================================================

/// Distinct values and numeric ranges of a dataset.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DatasetFacets {
    /// Sorted distinct genres.
    pub categories: Vec<String>,

    /// Sorted distinct movie titles.
    pub titles: Vec<String>,

    /// Sorted distinct reviewers.
    pub authors: Vec<String>,

    /// Shortest and longest review, in characters.
    pub length_bounds: (usize, usize),

    /// Lowest and highest polarity.
    pub polarity_bounds: (f64, f64),
}

impl DatasetFacets {
    /// Scan the records once. An empty slice yields zeroed bounds.
    pub fn from_records(records: &[ReviewRecord]) -> Self {
        let mut categories = BTreeSet::new();
        let mut titles = BTreeSet::new();
        let mut authors = BTreeSet::new();
        let mut length_bounds: Option<(usize, usize)> = None;
        let mut polarity_bounds: Option<(f64, f64)> = None;

        for record in records {
            if let Some(ref c) = record.category {
                categories.insert(c.clone());
            }
            if let Some(ref t) = record.title {
                titles.insert(t.clone());
            }
            if let Some(ref a) = record.author {
                authors.insert(a.clone());
            }

            let len = record.review_length;
            length_bounds = Some(match length_bounds {
                Some((lo, hi)) => (lo.min(len), hi.max(len)),
                None => (len, len),
            });

            let p = record.polarity;
            polarity_bounds = Some(match polarity_bounds {
                Some((lo, hi)) => (lo.min(p), hi.max(p)),
                None => (p, p),
            });
        }

        Self {
            categories: categories.into_iter().collect(),
            titles: titles.into_iter().collect(),
            authors: authors.into_iter().collect(),
            length_bounds: length_bounds.unwrap_or((0, 0)),
            polarity_bounds: polarity_bounds.unwrap_or((0.0, 0.0)),
        }
    }
}

// =============================================================================
// Load summary
// =============================================================================

/// Statistics for a completed load.
#[derive(Debug, Clone, Default)]
pub struct LoadSummary {
    /// Dataset file.
    pub source: PathBuf,

    /// Data rows turned into records.
    pub rows_loaded: usize,

    /// Rows skipped because they could not be decoded.
    pub rows_skipped: usize,

    /// Whether the row cap stopped the read before end of file.
    pub truncated: bool,

    /// Row cap in effect.
    pub max_rows: usize,

    /// Records per label, indexed by `SentimentLabel::index`.
    pub label_counts: [usize; 3],

    /// Optional columns absent from the header.
    pub missing_columns: Vec<&'static str>,

    /// Wall-clock load duration.
    pub duration: std::time::Duration,

    /// When loading finished.
    pub loaded_at: DateTime<Utc>,
}

// =============================================================================
// Load progress (for UI updates)
// =============================================================================

/// Progress messages sent from the load thread to the UI thread.
#[derive(Debug)]
pub enum LoadProgress {
    /// Reading started.
    Started { path: PathBuf },

    /// Periodic row count while reading.
    RowsRead { rows: usize },

    /// All rows read; sentiment scoring in progress.
    Scoring { rows: usize },

    /// A non-fatal warning occurred during loading.
    Warning { message: String },

    /// Loading finished.
    Completed {
        dataset: Box<Dataset>,
        summary: LoadSummary,
    },

    /// Loading failed with a fatal error.
    Failed { error: String },

    /// Loading was cancelled by the user before completion.
    Cancelled,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(review: &str, polarity: f64, category: Option<&str>) -> ReviewRecord {
        ReviewRecord::new(
            0,
            review.to_string(),
            polarity,
            category.map(String::from),
            None,
            None,
        )
    }

    #[test]
    fn test_label_thresholds() {
        assert_eq!(SentimentLabel::from_polarity(0.5), SentimentLabel::Positive);
        assert_eq!(SentimentLabel::from_polarity(0.1), SentimentLabel::Neutral);
        assert_eq!(SentimentLabel::from_polarity(0.0), SentimentLabel::Neutral);
        assert_eq!(SentimentLabel::from_polarity(-0.1), SentimentLabel::Neutral);
        assert_eq!(SentimentLabel::from_polarity(-0.1001), SentimentLabel::Negative);
        assert_eq!(SentimentLabel::from_polarity(0.1001), SentimentLabel::Positive);
    }

    #[test]
    fn test_label_monotone() {
        // Walking polarity upwards never moves the label back towards Negative.
        let mut prev = SentimentLabel::Negative;
        for step in 0..=200 {
            let p = -1.0 + step as f64 * 0.01;
            let label = SentimentLabel::from_polarity(p);
            assert!(label.index() <= prev.index(), "label regressed at {p}");
            prev = label;
        }
    }

    #[test]
    fn test_review_length_counts_chars() {
        let r = record("caf\u{e9} \u{1f3ac}", 0.0, None);
        assert_eq!(r.review_length, 6);
    }

    #[test]
    fn test_facets() {
        let records = vec![
            record("short", -0.4, Some("Drama")),
            record("a longer review", 0.7, Some("Comedy")),
            record("mid size", 0.0, None),
            record("x", 0.2, Some("Drama")),
        ];
        let facets = DatasetFacets::from_records(&records);
        assert_eq!(facets.categories, vec!["Comedy", "Drama"]);
        assert_eq!(facets.length_bounds, (1, 15));
        assert_eq!(facets.polarity_bounds, (-0.4, 0.7));
        assert!(facets.titles.is_empty());
    }

    #[test]
    fn test_facets_empty() {
        let facets = DatasetFacets::from_records(&[]);
        assert_eq!(facets.length_bounds, (0, 0));
        assert_eq!(facets.polarity_bounds, (0.0, 0.0));
    }

    #[test]
    fn test_missing_columns() {
        let presence = ColumnPresence {
            category: true,
            title: false,
            author: false,
        };
        assert_eq!(presence.missing(), vec!["original title", "author"]);
    }
}
