//! Image identifiers.
//!
//! An image identifier is the image's filename without its extension. It is
//! also the stem of the annotation files, so it must never be able to name a
//! path outside the annotations directory.

use serde::{Serialize, Serializer};
use std::fmt;
use std::path::Path;

use crate::error::BeecellError;

/// The key joining an image file to its annotation files.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ImageKey(String);

impl ImageKey {
    /// Creates a new ImageKey, rejecting values that are empty or contain
    /// path components.
    pub fn new(id: impl Into<String>) -> Result<Self, BeecellError> {
        let id = id.into();
        if is_valid_key(&id) {
            Ok(Self(id))
        } else {
            Err(BeecellError::InvalidImageKey(id))
        }
    }

    /// Derives the key from a filename by stripping its extension.
    ///
    /// Returns `None` when the stem is not a valid key.
    pub fn from_file_name(file_name: &str) -> Option<Self> {
        let stem = Path::new(file_name).file_stem()?.to_str()?;
        ImageKey::new(stem).ok()
    }

    /// Returns the underlying string.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn is_valid_key(id: &str) -> bool {
    !id.is_empty()
        && id != "."
        && id != ".."
        && !id.contains(['/', '\\', '\0'])
}

/// Fuzz-only entrypoint: an accepted key must join to a single path
/// component.
#[cfg(feature = "fuzzing")]
pub fn fuzz_image_key(input: &str) -> Result<(), BeecellError> {
    let key = ImageKey::new(input)?;
    let joined = Path::new("annotations").join(format!("{}.json", key));
    assert_eq!(joined.components().count(), 2, "key escaped its directory: {:?}", key);
    Ok(())
}

impl fmt::Debug for ImageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ImageKey({:?})", self.0)
    }
}

impl fmt::Display for ImageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for ImageKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl AsRef<str> for ImageKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
