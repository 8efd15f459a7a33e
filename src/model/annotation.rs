//! The point annotation record.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use super::cell_class::{self, CellClass};

/// One labeled point on one image.
///
/// Coordinates are stored as sent by the annotating client; no bounds
/// checking happens here. The timestamp is owned by the store and replaced on
/// every save.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    /// Cell class of the annotated cell. Missing or unknown values read as
    /// [`CellClass::Other`].
    #[serde(default, deserialize_with = "cell_class::deserialize_lenient")]
    pub class: CellClass,

    /// Horizontal coordinate. Shapes sent without a point (polygons carry
    /// only `points`) read as `0.0` and are written back with an explicit
    /// `"x": 0.0`.
    #[serde(default)]
    pub x: f64,

    /// Vertical coordinate. Defaults to `0.0` like `x`.
    #[serde(default)]
    pub y: f64,

    /// ISO-8601 save time.
    #[serde(default)]
    pub timestamp: String,

    /// Shape attributes sent by the drawing client (e.g. "type", "radius",
    /// "points"). Kept in the JSON record only.
    #[serde(flatten, default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, Value>,
}

impl Annotation {
    /// Creates a new annotation without a timestamp.
    pub fn new(class: CellClass, x: f64, y: f64) -> Self {
        Self {
            class,
            x,
            y,
            timestamp: String::new(),
            extra: BTreeMap::new(),
        }
    }

    /// Sets the timestamp.
    pub fn with_timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.timestamp = timestamp.into();
        self
    }

    /// Adds a client shape attribute.
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// True when both coordinates are finite. JSON has no encoding for NaN
    /// or infinities, so only finite points can be persisted.
    pub fn has_finite_coordinates(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_take_defaults() {
        let ann: Annotation = serde_json::from_str("{}").unwrap();
        assert_eq!(ann.class, CellClass::Other);
        assert_eq!(ann.x, 0.0);
        assert_eq!(ann.y, 0.0);
        assert!(ann.timestamp.is_empty());
    }

    #[test]
    fn test_unknown_and_null_class_read_as_other() {
        let ann: Annotation = serde_json::from_str(r#"{"class": "drone", "x": 1, "y": 2}"#).unwrap();
        assert_eq!(ann.class, CellClass::Other);
        assert_eq!(ann.x, 1.0);

        let ann: Annotation = serde_json::from_str(r#"{"class": null}"#).unwrap();
        assert_eq!(ann.class, CellClass::Other);
    }

    #[test]
    fn test_shape_attributes_survive() {
        let json = r#"{"type": "circle", "x": 10.5, "y": 4, "radius": 12, "class": "pollen", "timestamp": "t"}"#;
        let ann: Annotation = serde_json::from_str(json).unwrap();
        assert_eq!(ann.class, CellClass::Pollen);
        assert_eq!(ann.extra.get("type"), Some(&Value::from("circle")));
        assert_eq!(ann.extra.get("radius"), Some(&Value::from(12)));

        let back = serde_json::to_value(&ann).unwrap();
        assert_eq!(back["radius"], Value::from(12));
        assert_eq!(back["class"], Value::from("pollen"));
    }

    #[test]
    fn test_polygon_without_point_gets_origin() {
        let json = r#"{"type": "polygon", "points": [[1, 2], [3, 4], [5, 1]], "class": "honeycomb"}"#;
        let ann: Annotation = serde_json::from_str(json).unwrap();
        assert_eq!((ann.x, ann.y), (0.0, 0.0));
        assert_eq!(ann.extra["points"].as_array().unwrap().len(), 3);

        let back = serde_json::to_value(&ann).unwrap();
        assert_eq!(back["x"], Value::from(0.0));
        assert_eq!(back["type"], Value::from("polygon"));
    }

    #[test]
    fn test_finite_coordinates() {
        assert!(Annotation::new(CellClass::Eggs, 1.0, -2.5).has_finite_coordinates());
        assert!(!Annotation::new(CellClass::Eggs, f64::NAN, 1.0).has_finite_coordinates());
        assert!(!Annotation::new(CellClass::Eggs, 1.0, f64::INFINITY).has_finite_coordinates());
    }

    #[test]
    fn test_builder_pattern() {
        let ann = Annotation::new(CellClass::Honey, 3.0, 4.0)
            .with_timestamp("2026-01-01T00:00:00.000000")
            .with_attribute("type", "circle");

        assert_eq!(ann.class, CellClass::Honey);
        assert_eq!(ann.timestamp, "2026-01-01T00:00:00.000000");
        assert_eq!(ann.extra.len(), 1);
    }
}
