// ReviewScope - core/export.rs
//
// CSV and JSON export of the filtered reviews.
// Core layer: writes to any Write trait object.

use crate::core::model::ReviewRecord;
use crate::util::constants;
use crate::util::error::ExportError;
use serde::Serialize;
use std::io::Write;
use std::path::Path;

/// One exported row. CSV and JSON share the same columns.
#[derive(Debug, Serialize)]
struct ExportRow<'a> {
    review: &'a str,
    review_length: usize,
    sentiment_polarity: f64,
    sentiment_label: &'static str,
    category: Option<&'a str>,
    #[serde(rename = "original title")]
    title: Option<&'a str>,
    author: Option<&'a str>,
}

impl<'a> From<&'a ReviewRecord> for ExportRow<'a> {
    fn from(r: &'a ReviewRecord) -> Self {
        Self {
            review: &r.review,
            review_length: r.review_length,
            sentiment_polarity: r.polarity,
            sentiment_label: r.label.label(),
            category: r.category.as_deref(),
            title: r.title.as_deref(),
            author: r.author.as_deref(),
        }
    }
}

fn check_size(count: usize) -> Result<(), ExportError> {
    if count > constants::MAX_EXPORT_ROWS {
        return Err(ExportError::TooManyRows {
            count,
            max: constants::MAX_EXPORT_ROWS,
        });
    }
    Ok(())
}

/// Export reviews to CSV.
///
/// Writes: review, review_length, sentiment_polarity, sentiment_label,
/// category, original title, author
pub fn export_csv<W: Write>(
    records: &[&ReviewRecord],
    writer: W,
    export_path: &Path,
) -> Result<usize, ExportError> {
    check_size(records.len())?;
    let mut csv_writer = csv::Writer::from_writer(writer);

    for record in records {
        csv_writer
            .serialize(ExportRow::from(*record))
            .map_err(|e| ExportError::Csv {
                path: export_path.to_path_buf(),
                source: e,
            })?;
    }

    // The header is only emitted alongside the first row.
    if records.is_empty() {
        csv_writer
            .write_record([
                "review",
                "review_length",
                "sentiment_polarity",
                "sentiment_label",
                constants::COLUMN_CATEGORY,
                constants::COLUMN_TITLE,
                constants::COLUMN_AUTHOR,
            ])
            .map_err(|e| ExportError::Csv {
                path: export_path.to_path_buf(),
                source: e,
            })?;
    }

    csv_writer.flush().map_err(|e| ExportError::Io {
        path: export_path.to_path_buf(),
        source: e,
    })?;

    Ok(records.len())
}

/// Export reviews to pretty JSON (array of objects).
pub fn export_json<W: Write>(
    records: &[&ReviewRecord],
    writer: W,
    export_path: &Path,
) -> Result<usize, ExportError> {
    check_size(records.len())?;
    let rows: Vec<ExportRow<'_>> = records.iter().map(|r| ExportRow::from(*r)).collect();
    serde_json::to_writer_pretty(writer, &rows).map_err(|e| ExportError::Json {
        path: export_path.to_path_buf(),
        source: e,
    })?;
    Ok(rows.len())
}
