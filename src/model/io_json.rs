//! JSON serialization for per-image annotation lists.
//!
//! The on-disk form is a pretty-printed JSON array of annotation objects with
//! keys `class`, `x`, `y`, `timestamp` (plus any shape attributes the client
//! sent). This is the authoritative format: counts and exports read it.

use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

use super::annotation::Annotation;
use crate::error::BeecellError;

/// Reads an annotation list from a JSON file, or from stdin when `path` is `-`.
///
/// # Errors
/// Returns an error if the input cannot be read or parsed.
pub fn read_annotations_json(path: &Path) -> Result<Vec<Annotation>, BeecellError> {
    let parsed = if path == Path::new("-") {
        let mut buf = Vec::new();
        io::stdin().read_to_end(&mut buf).map_err(BeecellError::Io)?;
        from_annotations_json_slice(&buf)
    } else {
        let file = File::open(path).map_err(BeecellError::Io)?;
        serde_json::from_reader(BufReader::new(file))
    };

    parsed.map_err(|source| BeecellError::AnnotationsJsonParse {
        path: path.to_path_buf(),
        source,
    })
}

/// Parses an annotation list from JSON bytes.
///
/// Useful for fuzzing and for reading whole files in one syscall.
pub fn from_annotations_json_slice(bytes: &[u8]) -> Result<Vec<Annotation>, serde_json::Error> {
    serde_json::from_slice(bytes)
}

/// Parses an annotation list from a JSON string.
pub fn from_annotations_json_str(json: &str) -> Result<Vec<Annotation>, serde_json::Error> {
    serde_json::from_str(json)
}

/// Renders an annotation list as pretty JSON.
pub fn to_annotations_json_string(annotations: &[Annotation]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(annotations)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CellClass;

    #[test]
    fn test_json_roundtrip() {
        let original = vec![
            Annotation::new(CellClass::Eggs, 12.0, 40.5).with_timestamp("t1"),
            Annotation::new(CellClass::Honeycomb, 0.25, 0.75).with_timestamp("t2"),
        ];

        let json = to_annotations_json_string(&original).expect("serialization failed");
        let restored = from_annotations_json_str(&json).expect("deserialization failed");

        assert_eq!(original, restored);
    }

    #[test]
    fn test_json_format() {
        let json = to_annotations_json_string(&[Annotation::new(CellClass::CappedBrood, 1.0, 2.0)])
            .expect("serialization failed");

        assert!(json.starts_with('['));
        assert!(json.contains("\"class\": \"capped_brood\""));
        assert!(json.contains("\"timestamp\": \"\""));
    }

    #[test]
    fn test_empty_list_is_empty_array() {
        let json = to_annotations_json_string(&[]).unwrap();
        assert_eq!(json, "[]");
    }

    #[test]
    fn test_rejects_non_array() {
        assert!(from_annotations_json_str("{\"class\": \"eggs\"}").is_err());
        assert!(from_annotations_json_slice(b"[{\"x\": \"left\"}]").is_err());
    }
}
