use std::path::PathBuf;
use thiserror::Error;

/// The main error type for beecell operations.
#[derive(Debug, Error)]
pub enum BeecellError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to write annotation file {path}: {source}")]
    AnnotationWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize annotations JSON for {path}: {source}")]
    AnnotationJsonWrite {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to serialize annotations CSV for {path}: {source}")]
    AnnotationCsvWrite {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Failed to parse annotations JSON from {path}: {source}")]
    AnnotationsJsonParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to parse annotations CSV from {path}: {source}")]
    AnnotationsCsvParse {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Failed to write dataset export to {path}: {source}")]
    ExportWrite {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Export {path} already exists; refusing to overwrite it")]
    ExportExists { path: PathBuf },

    #[error("Annotation {index} has a non-finite coordinate (x={x}, y={y})")]
    InvalidCoordinate { index: usize, x: f64, y: f64 },

    #[error("Invalid image id '{0}'")]
    InvalidImageKey(String),

    #[error("Image '{0}' not found in catalog")]
    ImageNotFound(String),

    #[error("No {format} annotation file for image '{image_id}'")]
    AnnotationFileNotFound { image_id: String, format: String },

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Failed to parse config file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}
