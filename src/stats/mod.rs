//! Class distribution statistics.
//!
//! This module counts annotations per cell class across every stored
//! annotation file. It is the read-only sibling of the exporter: same scan,
//! same skip policy, no artifact.

mod report;

pub use report::{ClassDistribution, CurrentStats};

use std::collections::BTreeMap;
use std::path::Path;

use crate::catalog::CatalogStats;
use crate::model::{Annotation, CellClass};
use crate::scan::{scan_annotations, ScanReport};

/// A per-class count map with every class present, starting at zero.
pub fn zeroed_class_counts() -> BTreeMap<CellClass, usize> {
    CellClass::ALL.into_iter().map(|class| (class, 0)).collect()
}

/// Adds the classes of `annotations` to `counts`.
pub fn tally_classes<'a>(
    counts: &mut BTreeMap<CellClass, usize>,
    annotations: impl IntoIterator<Item = &'a Annotation>,
) {
    for ann in annotations {
        *counts.entry(ann.class).or_insert(0) += 1;
    }
}

/// Computes the class distribution of an existing scan.
pub fn distribution_from_scan(report: &ScanReport) -> ClassDistribution {
    let mut counts = zeroed_class_counts();
    let mut total_annotations = 0;
    let mut files_scanned = 0;

    for (_, annotations) in report.parsed() {
        files_scanned += 1;
        total_annotations += annotations.len();
        tally_classes(&mut counts, annotations);
    }

    ClassDistribution {
        counts,
        total_annotations,
        files_scanned,
        skipped: report.skipped_count(),
    }
}

/// Scans `annotations_dir` and counts annotations per class.
///
/// Malformed files are skipped and counted in
/// [`ClassDistribution::skipped`]; an empty or missing directory yields all
/// zeros.
pub fn compute_class_distribution(annotations_dir: &Path) -> ClassDistribution {
    distribution_from_scan(&scan_annotations(annotations_dir))
}

/// Combines catalog totals with the class distribution.
pub fn current_stats(catalog: CatalogStats, annotations_dir: &Path) -> CurrentStats {
    CurrentStats {
        catalog,
        class_distribution: compute_class_distribution(annotations_dir),
    }
}
