//! Per-image annotation persistence.
//!
//! Each image id owns two files in the annotations directory:
//!
//! - `<id>.json`: the authoritative annotation list
//! - `<id>.csv`: the same list as `class,x,y,timestamp` rows
//!
//! Saves are full replacements. Both renderings are produced from one
//! in-memory list, staged as temp files next to their targets, and renamed
//! into place while the image's lock is held, so a reader sees either the old
//! pair or the new pair of whole files. If the CSV rename fails after the JSON
//! one, the previous JSON is put back.
//!
//! Reads never fail: a missing file is an empty list, and an unreadable or
//! malformed file is logged and also treated as empty. Use
//! [`AnnotationStore::load_checked`] to tell these cases apart.

pub mod lock;

use std::fmt;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::PoisonError;

use serde::Serialize;
use tempfile::NamedTempFile;

use crate::error::BeecellError;
use crate::model::io_csv::render_annotations_csv;
use crate::model::io_json::{from_annotations_json_slice, to_annotations_json_string};
use crate::model::{Annotation, ImageKey};
use lock::KeyedLocks;

/// The two on-disk renderings of an image's annotations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AnnotationFormat {
    Json,
    Csv,
}

impl AnnotationFormat {
    /// File extension, without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            AnnotationFormat::Json => "json",
            AnnotationFormat::Csv => "csv",
        }
    }
}

impl FromStr for AnnotationFormat {
    type Err = BeecellError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(AnnotationFormat::Json),
            "csv" => Ok(AnnotationFormat::Csv),
            other => Err(BeecellError::UnsupportedFormat(format!(
                "'{}' (supported: json, csv)",
                other
            ))),
        }
    }
}

/// Why an annotation file could not be used.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SkipReason {
    /// The file exists but could not be read.
    Unreadable(String),
    /// The file was read but is not a valid annotation list.
    Malformed(String),
    /// The file name does not map to a valid image id.
    InvalidName(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Unreadable(msg) => write!(f, "unreadable: {}", msg),
            SkipReason::Malformed(msg) => write!(f, "malformed: {}", msg),
            SkipReason::InvalidName(name) => write!(f, "invalid image id in file name '{}'", name),
        }
    }
}

/// Result of reading one image's annotation file.
#[derive(Clone, Debug, PartialEq)]
pub enum LoadOutcome {
    /// The file was parsed.
    Loaded(Vec<Annotation>),
    /// No file exists for this image.
    Missing,
    /// The file exists but could not be used.
    Corrupt(SkipReason),
}

impl LoadOutcome {
    /// The annotations, with missing and corrupt files read as empty.
    pub fn into_annotations(self) -> Vec<Annotation> {
        match self {
            LoadOutcome::Loaded(annotations) => annotations,
            LoadOutcome::Missing | LoadOutcome::Corrupt(_) => Vec::new(),
        }
    }
}

/// Which files a delete actually removed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct DeleteOutcome {
    pub removed_json: bool,
    pub removed_csv: bool,
}

impl DeleteOutcome {
    /// True when neither file existed.
    pub fn is_noop(&self) -> bool {
        !self.removed_json && !self.removed_csv
    }
}

impl fmt::Display for DeleteOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let removed: Vec<&str> = [(self.removed_json, "JSON"), (self.removed_csv, "CSV")]
            .into_iter()
            .filter_map(|(removed, name)| removed.then_some(name))
            .collect();

        if removed.is_empty() {
            write!(f, "No annotation files found")
        } else {
            write!(f, "Removed annotation files ({})", removed.join(", "))
        }
    }
}

/// Reads and parses one annotation file.
///
/// `Ok(None)` means the file does not exist.
pub(crate) fn read_annotation_file(path: &Path) -> Result<Option<Vec<Annotation>>, SkipReason> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(SkipReason::Unreadable(e.to_string())),
    };

    from_annotations_json_slice(&bytes)
        .map(Some)
        .map_err(|e| SkipReason::Malformed(e.to_string()))
}

/// The current time as an ISO-8601 local timestamp with microseconds.
pub fn now_timestamp() -> String {
    chrono::Local::now()
        .format("%Y-%m-%dT%H:%M:%S%.6f")
        .to_string()
}

/// File-backed annotation store rooted at one directory.
#[derive(Clone, Debug)]
pub struct AnnotationStore {
    dir: PathBuf,
    locks: &'static KeyedLocks,
}

impl AnnotationStore {
    /// Creates a store over `dir`. The directory is created on first save.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            locks: KeyedLocks::global(),
        }
    }

    /// The annotations directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the given rendering for an image. Pure; the file may not exist.
    pub fn path_for(&self, key: &ImageKey, format: AnnotationFormat) -> PathBuf {
        self.dir
            .join(format!("{}.{}", key.as_str(), format.extension()))
    }

    /// Loads the persisted annotations, reading missing or corrupt files as
    /// empty.
    pub fn load(&self, key: &ImageKey) -> Vec<Annotation> {
        self.load_checked(key).into_annotations()
    }

    /// Loads the persisted annotations and reports how the read went.
    pub fn load_checked(&self, key: &ImageKey) -> LoadOutcome {
        let path = self.path_for(key, AnnotationFormat::Json);

        match read_annotation_file(&path) {
            Ok(Some(annotations)) => LoadOutcome::Loaded(annotations),
            Ok(None) => LoadOutcome::Missing,
            Err(reason) => {
                tracing::warn!(
                    image_id = %key,
                    path = %path.display(),
                    %reason,
                    "treating annotation file as empty"
                );
                LoadOutcome::Corrupt(reason)
            }
        }
    }

    /// Replaces the image's annotations with `annotations`.
    ///
    /// Every annotation is stamped with the save time. Returns the number of
    /// annotations written.
    ///
    /// # Errors
    /// Returns an error if an annotation has a non-finite coordinate, or if
    /// either file cannot be serialized or written. A failed save leaves the
    /// previous files in place.
    pub fn save(
        &self,
        key: &ImageKey,
        mut annotations: Vec<Annotation>,
    ) -> Result<usize, BeecellError> {
        if let Some((index, ann)) = annotations
            .iter()
            .enumerate()
            .find(|(_, ann)| !ann.has_finite_coordinates())
        {
            return Err(BeecellError::InvalidCoordinate {
                index,
                x: ann.x,
                y: ann.y,
            });
        }

        let json_path = self.path_for(key, AnnotationFormat::Json);
        let csv_path = self.path_for(key, AnnotationFormat::Csv);

        fs::create_dir_all(&self.dir).map_err(|source| BeecellError::AnnotationWrite {
            path: self.dir.clone(),
            source,
        })?;

        let slot = self.locks.slot(&self.lock_key(key));
        let _guard = slot.lock().unwrap_or_else(PoisonError::into_inner);

        let timestamp = now_timestamp();
        for ann in &mut annotations {
            ann.timestamp.clone_from(&timestamp);
        }

        let json = to_annotations_json_string(&annotations).map_err(|source| {
            BeecellError::AnnotationJsonWrite {
                path: json_path.clone(),
                source,
            }
        })?;
        let csv = render_annotations_csv(&annotations, &csv_path)?;

        let staged_json = self.stage(&json_path, json.as_bytes())?;
        let staged_csv = self.stage(&csv_path, &csv)?;
        let previous_json = self.snapshot(&json_path)?;

        commit(staged_json, &json_path)?;
        if let Err(e) = commit(staged_csv, &csv_path) {
            restore(previous_json, &json_path);
            return Err(e);
        }

        tracing::info!(
            image_id = %key,
            count = annotations.len(),
            path = %json_path.display(),
            "annotations saved"
        );
        Ok(annotations.len())
    }

    /// Removes both files for an image, reporting which ones existed.
    ///
    /// # Errors
    /// Returns an error only if an existing file could not be removed.
    pub fn delete(&self, key: &ImageKey) -> Result<DeleteOutcome, BeecellError> {
        let json_path = self.path_for(key, AnnotationFormat::Json);
        let csv_path = self.path_for(key, AnnotationFormat::Csv);

        let slot = self.locks.slot(&self.lock_key(key));
        let _guard = slot.lock().unwrap_or_else(PoisonError::into_inner);

        let outcome = DeleteOutcome {
            removed_json: remove_if_present(&json_path)?,
            removed_csv: remove_if_present(&csv_path)?,
        };

        if outcome.is_noop() {
            tracing::info!(image_id = %key, "no annotation files to delete");
        } else {
            tracing::info!(
                image_id = %key,
                removed_json = outcome.removed_json,
                removed_csv = outcome.removed_csv,
                "annotations deleted"
            );
        }
        Ok(outcome)
    }

    /// The lock registry key for an image: its JSON path under the resolved
    /// directory, so differently spelled paths to one directory share a lock.
    fn lock_key(&self, key: &ImageKey) -> PathBuf {
        let dir = fs::canonicalize(&self.dir)
            .or_else(|_| std::path::absolute(&self.dir))
            .unwrap_or_else(|_| self.dir.clone());
        dir.join(format!("{}.{}", key.as_str(), AnnotationFormat::Json.extension()))
    }

    /// Copies the current file at `target` aside, if there is one, so a
    /// half-committed save can be undone.
    fn snapshot(&self, target: &Path) -> Result<Option<NamedTempFile>, BeecellError> {
        match fs::read(target) {
            Ok(bytes) => self.stage(target, &bytes).map(Some),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(BeecellError::AnnotationWrite {
                path: target.to_path_buf(),
                source,
            }),
        }
    }

    /// Writes `bytes` to a synced temp file in the annotations directory.
    fn stage(&self, target: &Path, bytes: &[u8]) -> Result<NamedTempFile, BeecellError> {
        let write_err = |source| BeecellError::AnnotationWrite {
            path: target.to_path_buf(),
            source,
        };

        let mut tmp = NamedTempFile::new_in(&self.dir).map_err(write_err)?;
        tmp.write_all(bytes).map_err(write_err)?;
        tmp.as_file().sync_all().map_err(write_err)?;
        Ok(tmp)
    }
}

fn commit(staged: NamedTempFile, target: &Path) -> Result<(), BeecellError> {
    staged
        .persist(target)
        .map(|_| ())
        .map_err(|e| BeecellError::AnnotationWrite {
            path: target.to_path_buf(),
            source: e.error,
        })
}

/// Puts back the file captured by [`AnnotationStore::snapshot`], or removes
/// `target` if there was none.
fn restore(previous: Option<NamedTempFile>, target: &Path) {
    let result = match previous {
        Some(staged) => staged.persist(target).map(|_| ()).map_err(|e| e.error),
        None => fs::remove_file(target),
    };

    if let Err(e) = result {
        tracing::error!(
            path = %target.display(),
            error = %e,
            "could not roll back annotation file after a failed save"
        );
    }
}

fn remove_if_present(path: &Path) -> Result<bool, BeecellError> {
    match fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(source) => Err(BeecellError::AnnotationWrite {
            path: path.to_path_buf(),
            source,
        }),
    }
}
