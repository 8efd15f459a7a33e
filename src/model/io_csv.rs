//! Tabular (CSV) rendering of per-image annotation lists.
//!
//! # Format
//!
//! A header row `class,x,y,timestamp` followed by one row per annotation, in
//! the same order as the JSON array. The header is written even for an empty
//! list so a cleared image still has a well-formed file.
//!
//! The CSV is derived from the same in-memory list as the JSON file and never
//! carries client shape attributes.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::annotation::Annotation;
use super::cell_class::CellClass;
use crate::error::BeecellError;

/// Fixed column order of the tabular format.
pub const CSV_HEADER: [&str; 4] = ["class", "x", "y", "timestamp"];

/// A single row in the annotation CSV.
#[derive(Debug, Serialize, Deserialize)]
struct CsvRow {
    class: String,
    x: f64,
    y: f64,
    timestamp: String,
}

impl From<&Annotation> for CsvRow {
    fn from(ann: &Annotation) -> Self {
        CsvRow {
            class: ann.class.as_str().to_string(),
            x: ann.x,
            y: ann.y,
            timestamp: ann.timestamp.clone(),
        }
    }
}

/// Renders an annotation list as CSV bytes.
///
/// `path` is only used for error context.
pub(crate) fn render_annotations_csv(
    annotations: &[Annotation],
    path: &Path,
) -> Result<Vec<u8>, BeecellError> {
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());

    csv_writer
        .write_record(CSV_HEADER)
        .map_err(|source| BeecellError::AnnotationCsvWrite {
            path: path.to_path_buf(),
            source,
        })?;

    for ann in annotations {
        csv_writer
            .serialize(CsvRow::from(ann))
            .map_err(|source| BeecellError::AnnotationCsvWrite {
                path: path.to_path_buf(),
                source,
            })?;
    }

    csv_writer
        .into_inner()
        .map_err(|e| BeecellError::Io(e.into_error()))
}

/// Renders an annotation list as a CSV string.
///
/// Useful for testing without file I/O.
pub fn to_annotations_csv_string(annotations: &[Annotation]) -> Result<String, BeecellError> {
    let dummy_path = Path::new("<string>");
    let bytes = render_annotations_csv(annotations, dummy_path)?;

    String::from_utf8(bytes).map_err(|e| {
        BeecellError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    })
}

/// Reads annotations back from CSV bytes.
///
/// Shape attributes are not part of the tabular format, so they come back
/// empty. Unknown class ids read as `other`.
pub fn from_annotations_csv_slice(bytes: &[u8]) -> Result<Vec<Annotation>, BeecellError> {
    let mut csv_reader = csv::Reader::from_reader(bytes);
    let dummy_path = Path::new("<bytes>");
    let mut annotations = Vec::new();

    for result in csv_reader.deserialize() {
        let row: CsvRow = result.map_err(|source| BeecellError::AnnotationsCsvParse {
            path: dummy_path.to_path_buf(),
            source,
        })?;
        annotations.push(
            Annotation::new(CellClass::from_key_or_other(&row.class), row.x, row.y)
                .with_timestamp(row.timestamp),
        );
    }

    Ok(annotations)
}

/// Reads annotations back from a CSV string.
pub fn from_annotations_csv_str(csv_str: &str) -> Result<Vec<Annotation>, BeecellError> {
    from_annotations_csv_slice(csv_str.as_bytes())
}
