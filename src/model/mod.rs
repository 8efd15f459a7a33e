//! Annotation data model for beecell.
//!
//! This module defines the records that the store persists and the catalog,
//! exporter and statistics read back.
//!
//! # Design Principles
//!
//! 1. **Closed class set**: cell classes are an enum with a side table of
//!    display metadata, so an annotation's class is always a valid variant.
//!
//! 2. **Lenient reading**: files written by older clients may omit fields or
//!    use unknown class ids; these read as defaults rather than failing.
//!
//! 3. **One source for both formats**: the CSV rendering is derived from the
//!    same `Annotation` values that are written as JSON.
//!
//! # Example
//!
//! ```
//! use beecell::model::{Annotation, CellClass, ImageKey};
//!
//! let key = ImageKey::from_file_name("frame_001.jpg").unwrap();
//! let annotations = vec![
//!     Annotation::new(CellClass::Eggs, 120.0, 48.5),
//!     Annotation::new(CellClass::CappedBrood, 300.0, 210.0),
//! ];
//! assert_eq!(key.as_str(), "frame_001");
//! assert_eq!(annotations.len(), 2);
//! ```

mod annotation;
mod cell_class;
pub mod io_csv;
pub mod io_json;
mod key;

// Re-export core types for convenient access
pub use annotation::Annotation;
pub use cell_class::{CellClass, CellClassInfo};
pub use key::ImageKey;

#[cfg(feature = "fuzzing")]
pub use key::fuzz_image_key;
