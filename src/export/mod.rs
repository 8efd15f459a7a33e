//! Dataset export.
//!
//! An export is one immutable JSON snapshot of every annotation file, with
//! summary statistics and the cell-class table, written as
//! `bee_dataset_export_<YYYYMMDD_HHMMSS>.json`. Exports are never
//! overwritten; a second export within the same second fails instead of
//! replacing the first.

use std::collections::BTreeMap;
use std::io::{BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use serde::Serialize;
use tempfile::NamedTempFile;

use crate::error::BeecellError;
use crate::model::{Annotation, CellClass, CellClassInfo, ImageKey};
use crate::scan::{scan_annotations, ScanReport};
use crate::stats::{tally_classes, zeroed_class_counts};

/// File name prefix of export artifacts.
pub const EXPORT_PREFIX: &str = "bee_dataset_export_";

/// The export document.
#[derive(Clone, Debug, Serialize)]
pub struct ExportDocument {
    pub dataset_info: DatasetInfo,
    pub annotations: BTreeMap<ImageKey, Vec<Annotation>>,
}

/// Summary section of an export.
#[derive(Clone, Debug, Serialize)]
pub struct DatasetInfo {
    pub export_time: String,
    /// Number of annotation files successfully parsed.
    pub total_images: usize,
    pub total_annotations: usize,
    /// Count per class; every class is present.
    pub class_distribution: BTreeMap<CellClass, usize>,
    pub cell_classes: BTreeMap<CellClass, CellClassInfo>,
}

/// What an export call produced.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ExportSummary {
    pub path: PathBuf,
    pub total_images: usize,
    pub total_annotations: usize,
    /// Annotation files left out as unreadable or malformed.
    pub skipped: usize,
}

/// The artifact file name for an export made at `at`.
pub fn export_file_name(at: &DateTime<Local>) -> String {
    format!("{}{}.json", EXPORT_PREFIX, at.format("%Y%m%d_%H%M%S"))
}

/// Builds the export document from a scan.
pub fn build_export(report: &ScanReport, export_time: String) -> ExportDocument {
    let mut annotations = BTreeMap::new();
    let mut class_distribution = zeroed_class_counts();
    let mut total_annotations = 0;

    for (key, list) in report.parsed() {
        total_annotations += list.len();
        tally_classes(&mut class_distribution, list);
        annotations.insert(key.clone(), list.to_vec());
    }

    ExportDocument {
        dataset_info: DatasetInfo {
            export_time,
            total_images: annotations.len(),
            total_annotations,
            class_distribution,
            cell_classes: CellClass::table().into_iter().collect(),
        },
        annotations,
    }
}

/// Exports every annotation file in `annotations_dir` to a new artifact in
/// `exports_dir`.
///
/// Returns `Ok(None)` when there is nothing to export (missing directory or
/// no parseable annotation files).
///
/// # Errors
/// Returns an error if the artifact cannot be written, or if an artifact with
/// the same timestamp already exists.
pub fn export_all(
    annotations_dir: &Path,
    exports_dir: &Path,
) -> Result<Option<ExportSummary>, BeecellError> {
    export_all_at(annotations_dir, exports_dir, Local::now())
}

/// [`export_all`] with an explicit export time.
pub fn export_all_at(
    annotations_dir: &Path,
    exports_dir: &Path,
    at: DateTime<Local>,
) -> Result<Option<ExportSummary>, BeecellError> {
    let report = scan_annotations(annotations_dir);
    if report.parsed_count() == 0 {
        tracing::info!(
            dir = %annotations_dir.display(),
            skipped = report.skipped_count(),
            "no annotations to export"
        );
        return Ok(None);
    }

    let document = build_export(&report, at.format("%Y-%m-%dT%H:%M:%S%.6f").to_string());
    let path = exports_dir.join(export_file_name(&at));
    write_export(&document, exports_dir, &path)?;

    let summary = ExportSummary {
        path,
        total_images: document.dataset_info.total_images,
        total_annotations: document.dataset_info.total_annotations,
        skipped: report.skipped_count(),
    };

    tracing::info!(
        path = %summary.path.display(),
        images = summary.total_images,
        annotations = summary.total_annotations,
        skipped = summary.skipped,
        "dataset exported"
    );
    Ok(Some(summary))
}

fn write_export(
    document: &ExportDocument,
    exports_dir: &Path,
    path: &Path,
) -> Result<(), BeecellError> {
    std::fs::create_dir_all(exports_dir).map_err(BeecellError::Io)?;

    let tmp = NamedTempFile::new_in(exports_dir).map_err(BeecellError::Io)?;
    let mut writer = BufWriter::new(tmp);
    serde_json::to_writer_pretty(&mut writer, document).map_err(|source| {
        BeecellError::ExportWrite {
            path: path.to_path_buf(),
            source,
        }
    })?;
    writer.flush().map_err(BeecellError::Io)?;

    let tmp = writer
        .into_inner()
        .map_err(|e| BeecellError::Io(e.into_error()))?;
    tmp.as_file().sync_all().map_err(BeecellError::Io)?;

    match tmp.persist_noclobber(path) {
        Ok(_) => Ok(()),
        Err(e) if e.error.kind() == ErrorKind::AlreadyExists => Err(BeecellError::ExportExists {
            path: path.to_path_buf(),
        }),
        Err(e) => Err(BeecellError::Io(e.error)),
    }
}
