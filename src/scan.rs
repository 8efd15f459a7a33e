//! Bulk traversal of the annotations directory.
//!
//! The exporter and the statistics both read every `<id>.json` file directly
//! rather than going through per-image store calls. Each file yields an
//! explicit [`ScanOutcome`], so skipped files are counted instead of silently
//! dropped.
//!
//! Every file is read with a single `fs::read`; since the store replaces
//! files by rename, no single file is ever observed half-written. The scan as
//! a whole is not atomic: a save that lands mid-scan may or may not be seen.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::model::{Annotation, ImageKey};
use crate::store::{read_annotation_file, SkipReason};

/// What happened to one annotation file.
#[derive(Clone, Debug, PartialEq)]
pub enum ScanOutcome {
    Parsed(Vec<Annotation>),
    Skipped(SkipReason),
}

/// One `*.json` file found by the scan.
#[derive(Clone, Debug)]
pub struct ScanEntry {
    /// Image id derived from the file name, if valid.
    pub image_id: Option<ImageKey>,
    pub path: PathBuf,
    pub outcome: ScanOutcome,
}

/// All files found by one scan, sorted by file name.
#[derive(Clone, Debug, Default)]
pub struct ScanReport {
    pub entries: Vec<ScanEntry>,
}

impl ScanReport {
    /// Successfully parsed files.
    pub fn parsed(&self) -> impl Iterator<Item = (&ImageKey, &[Annotation])> {
        self.entries.iter().filter_map(|entry| match (&entry.image_id, &entry.outcome) {
            (Some(key), ScanOutcome::Parsed(annotations)) => Some((key, annotations.as_slice())),
            _ => None,
        })
    }

    /// Skipped files with their reasons.
    pub fn skipped(&self) -> impl Iterator<Item = (&Path, &SkipReason)> {
        self.entries.iter().filter_map(|entry| match &entry.outcome {
            ScanOutcome::Skipped(reason) => Some((entry.path.as_path(), reason)),
            ScanOutcome::Parsed(_) => None,
        })
    }

    pub fn parsed_count(&self) -> usize {
        self.parsed().count()
    }

    pub fn skipped_count(&self) -> usize {
        self.skipped().count()
    }
}

/// Scans every `*.json` file directly under `dir`.
///
/// A missing directory is an empty report. Files that vanish between listing
/// and reading are left out.
pub fn scan_annotations(dir: &Path) -> ScanReport {
    let mut report = ScanReport::default();

    if !dir.is_dir() {
        tracing::debug!(dir = %dir.display(), "annotations directory missing; nothing to scan");
        return report;
    }

    let walker = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name();

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                let path = e.path().map(Path::to_path_buf).unwrap_or_else(|| dir.to_path_buf());
                tracing::warn!(path = %path.display(), error = %e, "skipping unreadable entry");
                continue;
            }
        };

        let path = entry.path();
        if !entry.file_type().is_file() || !has_json_extension(path) {
            continue;
        }

        let file_name = entry.file_name().to_string_lossy();
        let image_id = ImageKey::from_file_name(&file_name);

        let outcome = match (&image_id, read_annotation_file(path)) {
            (None, _) => ScanOutcome::Skipped(SkipReason::InvalidName(file_name.into_owned())),
            (Some(_), Ok(Some(annotations))) => ScanOutcome::Parsed(annotations),
            (Some(_), Ok(None)) => continue,
            (Some(_), Err(reason)) => ScanOutcome::Skipped(reason),
        };

        if let ScanOutcome::Skipped(reason) = &outcome {
            tracing::warn!(path = %path.display(), %reason, "skipping annotation file");
        }

        report.entries.push(ScanEntry {
            image_id,
            path: path.to_path_buf(),
            outcome,
        });
    }

    tracing::debug!(
        dir = %dir.display(),
        parsed = report.parsed_count(),
        skipped = report.skipped_count(),
        "annotation scan finished"
    );
    report
}

fn has_json_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext == "json")
}
