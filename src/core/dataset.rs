// ReviewScope - core/dataset.rs
//
// Bounded CSV ingestion of review records.
//
// Reading is split in two phases so the app layer can report progress and
// cancel between them:
//   1. `read_rows`  - stream at most `max_rows` raw rows from any `Read`.
//   2. `score_rows` - derive length, polarity and label (parallel, rayon).
// `load_file` runs both back to back for callers that do not need progress.

use crate::core::model::{ColumnPresence, Dataset, LoadSummary, ReviewRecord};
use crate::core::sentiment::Lexicon;
use crate::util::constants;
use crate::util::error::DatasetError;
use rayon::prelude::*;
use std::io::Read;
use std::ops::ControlFlow;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Ingestion settings.
#[derive(Debug, Clone)]
pub struct LoadConfig {
    /// Maximum number of data rows to read.
    pub max_rows: usize,
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            max_rows: constants::DEFAULT_MAX_ROWS,
        }
    }
}

/// A row as read from the CSV, before scoring.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawReview {
    pub review: String,
    pub category: Option<String>,
    pub title: Option<String>,
    pub author: Option<String>,
}

/// Everything `read_rows` learned besides the rows themselves.
#[derive(Debug, Clone, Default)]
pub struct ReadMeta {
    pub columns: ColumnPresence,
    pub rows_skipped: usize,
    pub truncated: bool,
    pub warnings: Vec<String>,
}

/// Output of `read_rows`.
#[derive(Debug, Clone)]
pub struct ReadOutcome {
    pub rows: Vec<RawReview>,
    pub meta: ReadMeta,
}

/// Output of a complete load.
#[derive(Debug, Clone)]
pub struct LoadOutcome {
    pub dataset: Dataset,
    pub summary: LoadSummary,
    pub warnings: Vec<String>,
}

/// Column positions resolved from the header row.
#[derive(Debug, Clone, Copy)]
struct ColumnIndex {
    review: usize,
    category: Option<usize>,
    title: Option<usize>,
    author: Option<usize>,
}

impl ColumnIndex {
    fn presence(&self) -> ColumnPresence {
        ColumnPresence {
            category: self.category.is_some(),
            title: self.title.is_some(),
            author: self.author.is_some(),
        }
    }
}

/// Normalise a header cell for matching: trims whitespace and a UTF-8 BOM,
/// lower-cases, and treats `_` as a space ("Original_Title" == "original title").
fn normalise_header(cell: &str) -> String {
    cell.trim_start_matches('\u{feff}')
        .trim()
        .to_lowercase()
        .replace('_', " ")
}

fn resolve_columns(headers: &csv::StringRecord, source: &Path) -> Result<ColumnIndex, DatasetError> {
    let names: Vec<String> = headers.iter().map(normalise_header).collect();
    let find = |name: &str| names.iter().position(|h| h == name);

    let review = find(constants::COLUMN_REVIEW).ok_or_else(|| DatasetError::MissingColumn {
        path: source.to_path_buf(),
        column: constants::COLUMN_REVIEW,
    })?;

    Ok(ColumnIndex {
        review,
        category: find(constants::COLUMN_CATEGORY),
        title: find(constants::COLUMN_TITLE),
        author: find(constants::COLUMN_AUTHOR),
    })
}

/// Optional text field: blank or absent cells become `None`.
fn optional_field(record: &csv::StringRecord, idx: Option<usize>) -> Option<String> {
    idx.and_then(|i| record.get(i))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
}

fn push_warning(warnings: &mut Vec<String>, message: String) {
    if warnings.len() < constants::MAX_WARNINGS {
        warnings.push(message);
    }
}

/// Read at most `config.max_rows` rows from CSV data with a header row.
///
/// `on_progress` is called with the running row count every
/// `LOAD_PROGRESS_INTERVAL` rows; returning `ControlFlow::Break` stops the
/// read and yields `Ok(None)`.
///
/// Rows that cannot be decoded are skipped and counted. Rows with fewer
/// fields than the header yield `None` (or an empty review) for the missing
/// fields.
pub fn read_rows<R: Read>(
    reader: R,
    source: &Path,
    config: &LoadConfig,
    mut on_progress: impl FnMut(usize) -> ControlFlow<()>,
) -> Result<Option<ReadOutcome>, DatasetError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(reader);

    let headers = csv_reader
        .headers()
        .map_err(|e| DatasetError::Header {
            path: source.to_path_buf(),
            source: e,
        })?
        .clone();
    if headers.is_empty() {
        return Err(DatasetError::MissingHeader {
            path: source.to_path_buf(),
        });
    }

    let columns = resolve_columns(&headers, source)?;
    let mut meta = ReadMeta {
        columns: columns.presence(),
        ..Default::default()
    };

    for missing in meta.columns.missing() {
        push_warning(
            &mut meta.warnings,
            format!(
                "'{}': no '{missing}' column; its filter will be empty",
                source.display()
            ),
        );
    }

    let mut rows: Vec<RawReview> = Vec::with_capacity(config.max_rows.min(constants::DEFAULT_MAX_ROWS));
    let mut record = csv::StringRecord::new();
    // 1-based data row number, for messages.
    let mut row_number = 0usize;

    loop {
        if rows.len() >= config.max_rows {
            // One more successful read means the cap cut the file short.
            meta.truncated = matches!(csv_reader.read_record(&mut record), Ok(true));
            break;
        }

        row_number += 1;
        match csv_reader.read_record(&mut record) {
            Ok(true) => {}
            Ok(false) => break,
            Err(e) if e.is_io_error() => {
                let io_err = match e.into_kind() {
                    csv::ErrorKind::Io(io_err) => io_err,
                    other => std::io::Error::other(format!("{other:?}")),
                };
                return Err(DatasetError::Io {
                    path: source.to_path_buf(),
                    source: io_err,
                });
            }
            Err(e) => {
                tracing::debug!(row = row_number, error = %e, "Skipping malformed row");
                meta.rows_skipped += 1;
                push_warning(
                    &mut meta.warnings,
                    format!("'{}' row {row_number}: {e}; row skipped", source.display()),
                );
                continue;
            }
        }

        rows.push(RawReview {
            review: record.get(columns.review).unwrap_or_default().to_string(),
            category: optional_field(&record, columns.category),
            title: optional_field(&record, columns.title),
            author: optional_field(&record, columns.author),
        });

        if rows.len() % constants::LOAD_PROGRESS_INTERVAL == 0 && on_progress(rows.len()).is_break()
        {
            return Ok(None);
        }
    }

    tracing::debug!(
        rows = rows.len(),
        skipped = meta.rows_skipped,
        truncated = meta.truncated,
        "CSV read complete"
    );

    Ok(Some(ReadOutcome { rows, meta }))
}

/// Derive length, polarity and label for every row, in parallel.
///
/// Record ids follow row order.
pub fn score_rows(rows: Vec<RawReview>, lexicon: &Lexicon) -> Vec<ReviewRecord> {
    rows.into_par_iter()
        .enumerate()
        .map(|(idx, raw)| {
            let polarity = lexicon.polarity(&raw.review);
            ReviewRecord::new(
                idx as u64,
                raw.review,
                polarity,
                raw.category,
                raw.title,
                raw.author,
            )
        })
        .collect()
}

/// Assemble the dataset and its summary once scoring is done.
pub fn finish_load(
    source: PathBuf,
    meta: ReadMeta,
    records: Vec<ReviewRecord>,
    max_rows: usize,
    duration: Duration,
) -> LoadOutcome {
    let mut label_counts = [0usize; 3];
    for record in &records {
        label_counts[record.label.index()] += 1;
    }

    let summary = LoadSummary {
        source: source.clone(),
        rows_loaded: records.len(),
        rows_skipped: meta.rows_skipped,
        truncated: meta.truncated,
        max_rows,
        label_counts,
        missing_columns: meta.columns.missing(),
        duration,
        loaded_at: chrono::Utc::now(),
    };

    let dataset = Dataset {
        source,
        records,
        columns: meta.columns,
    };

    LoadOutcome {
        dataset,
        summary,
        warnings: meta.warnings,
    }
}

/// Load and score a CSV file in one call, without progress reporting.
pub fn load_file(
    path: &Path,
    config: &LoadConfig,
    lexicon: &Lexicon,
) -> Result<LoadOutcome, DatasetError> {
    let started = Instant::now();

    if !path.exists() {
        return Err(DatasetError::NotFound {
            path: path.to_path_buf(),
        });
    }
    let file = std::fs::File::open(path).map_err(|e| DatasetError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    let outcome = read_rows(file, path, config, |_| ControlFlow::Continue(()))?;
    // The progress callback never breaks, so a read always yields rows.
    let ReadOutcome { rows, meta } = outcome.unwrap_or(ReadOutcome {
        rows: Vec::new(),
        meta: ReadMeta::default(),
    });

    let records = score_rows(rows, lexicon);
    Ok(finish_load(
        path.to_path_buf(),
        meta,
        records,
        config.max_rows,
        started.elapsed(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::SentimentLabel;

    const SAMPLE: &str = "\
review,category,original title,author
A wonderful and moving film.,Drama,Film A,alice
Terrible. Boring and awful.,Horror,Film B,bob
It is a film.,Drama,Film A,carol
";

    fn read(data: &str, max_rows: usize) -> ReadOutcome {
        read_rows(
            data.as_bytes(),
            Path::new("test.csv"),
            &LoadConfig { max_rows },
            |_| ControlFlow::Continue(()),
        )
        .unwrap()
        .unwrap()
    }

    #[test]
    fn test_reads_all_rows() {
        let outcome = read(SAMPLE, 100);
        assert_eq!(outcome.rows.len(), 3);
        assert!(!outcome.meta.truncated);
        assert_eq!(outcome.rows[0].category.as_deref(), Some("Drama"));
        assert_eq!(outcome.rows[1].title.as_deref(), Some("Film B"));
        assert_eq!(outcome.rows[2].author.as_deref(), Some("carol"));
        assert!(outcome.meta.warnings.is_empty());
    }

    #[test]
    fn test_row_cap() {
        let outcome = read(SAMPLE, 2);
        assert_eq!(outcome.rows.len(), 2);
        assert!(outcome.meta.truncated);
    }

    #[test]
    fn test_row_cap_exact_is_not_truncated() {
        let outcome = read(SAMPLE, 3);
        assert_eq!(outcome.rows.len(), 3);
        assert!(!outcome.meta.truncated);
    }

    #[test]
    fn test_missing_review_column() {
        let result = read_rows(
            "text,category\nhello,Drama\n".as_bytes(),
            Path::new("test.csv"),
            &LoadConfig::default(),
            |_| ControlFlow::Continue(()),
        );
        assert!(matches!(
            result,
            Err(DatasetError::MissingColumn { column: "review", .. })
        ));
    }

    #[test]
    fn test_empty_input_has_no_header() {
        let result = read_rows(
            "".as_bytes(),
            Path::new("empty.csv"),
            &LoadConfig::default(),
            |_| ControlFlow::Continue(()),
        );
        assert!(matches!(result, Err(DatasetError::MissingHeader { .. })));
    }

    #[test]
    fn test_optional_columns_missing() {
        let outcome = read("Review\ngood stuff\n", 10);
        assert_eq!(outcome.rows.len(), 1);
        assert_eq!(outcome.rows[0].category, None);
        assert_eq!(outcome.meta.columns.missing().len(), 3);
        assert_eq!(outcome.meta.warnings.len(), 3);
    }

    #[test]
    fn test_header_normalisation() {
        let outcome = read("\u{feff} Review ,CATEGORY,Original_Title,Author\nx,Drama,T,A\n", 10);
        assert!(outcome.meta.columns.title);
        assert_eq!(outcome.rows[0].title.as_deref(), Some("T"));
    }

    #[test]
    fn test_short_row_and_blank_fields() {
        let outcome = read("review,category,original title,author\nonly review\nx,  ,T\n", 10);
        assert_eq!(outcome.rows.len(), 2);
        assert_eq!(outcome.rows[0].category, None);
        assert_eq!(outcome.rows[1].category, None);
        assert_eq!(outcome.rows[1].title.as_deref(), Some("T"));
        assert_eq!(outcome.rows[1].author, None);
    }

    #[test]
    fn test_invalid_utf8_row_is_skipped() {
        let mut data = b"review,category\ngood,Drama\n".to_vec();
        data.extend_from_slice(b"\xff\xfe bad,Drama\n");
        data.extend_from_slice(b"fine,Comedy\n");
        let outcome = read_rows(
            data.as_slice(),
            Path::new("test.csv"),
            &LoadConfig::default(),
            |_| ControlFlow::Continue(()),
        )
        .unwrap()
        .unwrap();
        assert_eq!(outcome.rows.len(), 2);
        assert_eq!(outcome.meta.rows_skipped, 1);
        assert_eq!(outcome.rows[1].review, "fine");
    }

    #[test]
    fn test_progress_break_cancels() {
        let mut data = String::from("review\n");
        for i in 0..(constants::LOAD_PROGRESS_INTERVAL + 5) {
            data.push_str(&format!("row {i}\n"));
        }
        let result = read_rows(
            data.as_bytes(),
            Path::new("big.csv"),
            &LoadConfig::default(),
            |_| ControlFlow::Break(()),
        )
        .unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_score_rows_derives_fields() {
        let outcome = read(SAMPLE, 100);
        let records = score_rows(outcome.rows, &Lexicon::builtin());
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].id, 0);
        assert_eq!(records[2].id, 2);
        assert_eq!(records[0].label, SentimentLabel::Positive);
        assert_eq!(records[1].label, SentimentLabel::Negative);
        assert_eq!(records[2].label, SentimentLabel::Neutral);
        assert_eq!(records[2].review_length, "It is a film.".len());
        for r in &records {
            assert_eq!(r.label, SentimentLabel::from_polarity(r.polarity));
        }
    }

    #[test]
    fn test_finish_load_counts_labels() {
        let before = chrono::Utc::now();
        let outcome = read(SAMPLE, 100);
        let meta = outcome.meta.clone();
        let records = score_rows(outcome.rows, &Lexicon::builtin());
        let loaded = finish_load(
            PathBuf::from("test.csv"),
            meta,
            records,
            100,
            Duration::from_millis(5),
        );
        assert_eq!(loaded.summary.rows_loaded, 3);
        assert_eq!(loaded.summary.label_counts, [1, 1, 1]);
        assert_eq!(loaded.dataset.records.len(), 3);
        assert!(loaded.summary.missing_columns.is_empty());
        assert!(loaded.summary.loaded_at >= before);
        assert!(loaded.summary.loaded_at <= chrono::Utc::now());
    }
}
