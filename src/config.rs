//! Runtime configuration.
//!
//! Values come from, in increasing priority: built-in defaults, an optional
//! YAML file, then command-line flags and `BEECELL_*` environment variables
//! (handled by the CLI).

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::BeecellError;

/// Directory paths and listing limits.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory holding the source images.
    pub images_dir: PathBuf,

    /// Older upload directory. Used instead of `images_dir` when it exists
    /// and is not empty.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legacy_uploads_dir: Option<PathBuf>,

    /// Directory holding `<id>.json` / `<id>.csv` annotation files.
    pub annotations_dir: PathBuf,

    /// Directory receiving dataset exports.
    pub exports_dir: PathBuf,

    /// Page size when the caller does not ask for one.
    pub default_per_page: usize,

    /// Upper bound on the page size.
    pub max_per_page: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            images_dir: PathBuf::from("data/images"),
            legacy_uploads_dir: None,
            annotations_dir: PathBuf::from("data/annotations"),
            exports_dir: PathBuf::from("data/exports"),
            default_per_page: 20,
            max_per_page: 100,
        }
    }
}

impl Config {
    /// Reads a configuration file. Missing keys take their defaults.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or is not valid YAML.
    pub fn from_yaml_file(path: &Path) -> Result<Self, BeecellError> {
        let text = fs::read_to_string(path).map_err(BeecellError::Io)?;
        serde_yaml::from_str(&text).map_err(|source| BeecellError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parses configuration from a YAML string.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    /// The directory the catalog lists.
    pub fn source_dir(&self) -> &Path {
        match &self.legacy_uploads_dir {
            Some(legacy) if dir_has_entries(legacy) => legacy.as_path(),
            _ => self.images_dir.as_path(),
        }
    }

    /// Clamps a requested page size to `1..=max_per_page`.
    pub fn clamp_per_page(&self, requested: usize) -> usize {
        requested.clamp(1, self.max_per_page.max(1))
    }

    /// Creates the image, annotation and export directories.
    pub fn ensure_directories(&self) -> Result<(), BeecellError> {
        for dir in [&self.images_dir, &self.annotations_dir, &self.exports_dir] {
            fs::create_dir_all(dir).map_err(BeecellError::Io)?;
        }
        Ok(())
    }
}

fn dir_has_entries(dir: &Path) -> bool {
    fs::read_dir(dir)
        .map(|mut entries| entries.next().is_some())
        .unwrap_or(false)
}
