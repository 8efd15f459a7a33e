#![allow(dead_code)]

use beecell::catalog::ImageRecord;
use beecell::model::{Annotation, CellClass, ImageKey};
use proptest::prelude::*;
use proptest::strategy::BoxedStrategy;
use proptest::test_runner::{Config as ProptestConfig, FileFailurePersistence};

pub fn proptest_config() -> ProptestConfig {
    let cases = std::env::var("PROPTEST_CASES")
        .ok()
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(64);

    let mut config = ProptestConfig::with_failure_persistence(FileFailurePersistence::WithSource(
        "proptest-regressions",
    ));
    config.cases = cases;
    config.max_shrink_iters = 1024;
    config
}

pub fn arb_class() -> BoxedStrategy<CellClass> {
    prop::sample::select(CellClass::ALL.to_vec()).boxed()
}

/// Coordinates on a quarter-pixel grid, exactly representable in both the
/// JSON and CSV text forms.
pub fn arb_coordinate() -> BoxedStrategy<f64> {
    (0u32..16_000).prop_map(|v| v as f64 / 4.0).boxed()
}

pub fn arb_annotation() -> BoxedStrategy<Annotation> {
    (arb_class(), arb_coordinate(), arb_coordinate())
        .prop_map(|(class, x, y)| Annotation::new(class, x, y))
        .boxed()
}

pub fn arb_annotations(max_len: usize) -> BoxedStrategy<Vec<Annotation>> {
    prop::collection::vec(arb_annotation(), 0..=max_len).boxed()
}

/// Catalog records with unique filenames and arbitrary counts, in no
/// particular order.
pub fn arb_records(max_len: usize) -> BoxedStrategy<Vec<ImageRecord>> {
    prop::collection::btree_map("[a-z0-9]{1,8}", 0usize..6, 0..=max_len)
        .prop_map(|entries| {
            entries
                .into_iter()
                .map(|(stem, count)| {
                    let filename = format!("{}.jpg", stem);
                    ImageRecord::new(
                        ImageKey::new(stem).expect("generated stems are valid ids"),
                        filename.clone(),
                        format!("images/{}", filename),
                        count,
                    )
                })
                .collect()
        })
        .prop_shuffle()
        .boxed()
}

/// Checks that records are ordered by count descending, then filename.
pub fn assert_catalog_order(records: &[ImageRecord]) -> Result<(), String> {
    for pair in records.windows(2) {
        let (a, b) = (&pair[0], &pair[1]);
        let ordered = a.annotation_count > b.annotation_count
            || (a.annotation_count == b.annotation_count && a.filename < b.filename);
        if !ordered {
            return Err(format!(
                "'{}' ({}) listed before '{}' ({})",
                a.filename, a.annotation_count, b.filename, b.annotation_count
            ));
        }
    }
    Ok(())
}
