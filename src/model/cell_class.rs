//! The closed set of honeycomb cell classes and their display metadata.
//!
//! Every annotation carries exactly one [`CellClass`]. Display strings are
//! not stored here: the table only hands out message keys
//! (`cell_class.<id>.name`, `cell_class.<id>.description`) that a text lookup
//! service resolves for the request's language.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::BeecellError;

/// A category of honeycomb cell.
///
/// Variant order is the canonical table order; maps keyed by `CellClass`
/// iterate in this order.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum CellClass {
    Eggs,
    Larvae,
    CappedBrood,
    Pollen,
    Nectar,
    Honey,
    #[default]
    Other,
    Honeycomb,
}

/// Display metadata for one cell class.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct CellClassInfo {
    /// Message key for the localized class name.
    pub name_key: &'static str,
    /// Fill color (hex).
    pub color: &'static str,
    /// Border color (hex).
    pub border: &'static str,
    /// Message key for the localized class description.
    pub description_key: &'static str,
}

impl CellClass {
    /// All classes in table order.
    pub const ALL: [CellClass; 8] = [
        CellClass::Eggs,
        CellClass::Larvae,
        CellClass::CappedBrood,
        CellClass::Pollen,
        CellClass::Nectar,
        CellClass::Honey,
        CellClass::Other,
        CellClass::Honeycomb,
    ];

    /// Stable identifier used in files and exports.
    pub fn as_str(self) -> &'static str {
        match self {
            CellClass::Eggs => "eggs",
            CellClass::Larvae => "larvae",
            CellClass::CappedBrood => "capped_brood",
            CellClass::Pollen => "pollen",
            CellClass::Nectar => "nectar",
            CellClass::Honey => "honey",
            CellClass::Other => "other",
            CellClass::Honeycomb => "honeycomb",
        }
    }

    /// Looks up a class by its identifier.
    pub fn from_key(key: &str) -> Option<CellClass> {
        CellClass::ALL.into_iter().find(|class| class.as_str() == key)
    }

    /// Like [`CellClass::from_key`], but unknown identifiers become `Other`.
    pub fn from_key_or_other(key: &str) -> CellClass {
        CellClass::from_key(key).unwrap_or_default()
    }

    /// Display metadata for this class.
    pub fn info(self) -> CellClassInfo {
        let (name_key, color, border, description_key) = match self {
            CellClass::Eggs => (
                "cell_class.eggs.name",
                "#FFE6E6",
                "#FF4444",
                "cell_class.eggs.description",
            ),
            CellClass::Larvae => (
                "cell_class.larvae.name",
                "#E6F3FF",
                "#4488FF",
                "cell_class.larvae.description",
            ),
            CellClass::CappedBrood => (
                "cell_class.capped_brood.name",
                "#FFF4E6",
                "#FFB344",
                "cell_class.capped_brood.description",
            ),
            CellClass::Pollen => (
                "cell_class.pollen.name",
                "#F0E6FF",
                "#AA44FF",
                "cell_class.pollen.description",
            ),
            CellClass::Nectar => (
                "cell_class.nectar.name",
                "#E6FFE6",
                "#44FF44",
                "cell_class.nectar.description",
            ),
            CellClass::Honey => (
                "cell_class.honey.name",
                "#FFFFE6",
                "#FFFF44",
                "cell_class.honey.description",
            ),
            CellClass::Other => (
                "cell_class.other.name",
                "#F0F0F0",
                "#888888",
                "cell_class.other.description",
            ),
            CellClass::Honeycomb => (
                "cell_class.honeycomb.name",
                "#F4E4BC",
                "#8B4513",
                "cell_class.honeycomb.description",
            ),
        };

        CellClassInfo {
            name_key,
            color,
            border,
            description_key,
        }
    }

    /// The full definition table, in table order.
    pub fn table() -> Vec<(CellClass, CellClassInfo)> {
        CellClass::ALL
            .into_iter()
            .map(|class| (class, class.info()))
            .collect()
    }
}

impl fmt::Display for CellClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CellClass {
    type Err = BeecellError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CellClass::from_key(s).ok_or_else(|| {
            BeecellError::UnsupportedFormat(format!("'{}' is not a known cell class", s))
        })
    }
}

/// Deserializes a class field leniently: missing, `null` or unknown values
/// become [`CellClass::Other`].
pub(crate) fn deserialize_lenient<'de, D>(deserializer: D) -> Result<CellClass, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw
        .as_deref()
        .map(CellClass::from_key_or_other)
        .unwrap_or_default())
}
