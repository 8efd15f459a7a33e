//! Image catalog: the sorted, paginated view over all source images.
//!
//! Every query re-reads the source directory and each image's annotation
//! file; nothing is cached between calls. That is one store read per image
//! per query, which is fine for a few hundred images.
//!
//! Images are ordered by annotation count (descending), then filename
//! (ascending), so annotated images come first.

mod report;

pub use report::{CatalogPage, CatalogStats, ImageRecord, Navigation, Pagination};

use std::cmp::Reverse;
use std::path::Path;

use walkdir::WalkDir;

use crate::model::ImageKey;
use crate::store::AnnotationStore;

/// Image extensions the catalog lists (compared case-insensitively).
pub const ALLOWED_EXTENSIONS: [&str; 6] = ["png", "jpg", "jpeg", "bmp", "tif", "tiff"];

/// Returns true if the filename has an allowed image extension.
pub fn is_allowed_image(file_name: &str) -> bool {
    Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            ALLOWED_EXTENSIONS
                .iter()
                .any(|allowed| ext.eq_ignore_ascii_case(allowed))
        })
}

/// Lists one page of the catalog.
///
/// `page` is 1-based; `0` is treated as `1`. `per_page` is expected to be
/// clamped by the caller and is raised to at least 1.
pub fn list(
    page: usize,
    per_page: usize,
    source_dir: &Path,
    store: &AnnotationStore,
) -> CatalogPage {
    paginate(sorted_records(source_dir, store), page, per_page)
}

/// Finds an image and its neighbours in catalog order.
pub fn locate(source_dir: &Path, store: &AnnotationStore, key: &ImageKey) -> Option<Navigation> {
    let records = sorted_records(source_dir, store);
    navigation_for(&records, key)
}

/// All images in `source_dir`, joined with counts and sorted.
pub fn sorted_records(source_dir: &Path, store: &AnnotationStore) -> Vec<ImageRecord> {
    let mut records = collect_records(source_dir, store);
    sort_records(&mut records);
    records
}

/// Enumerates image files directly under `source_dir` and loads each one's
/// annotation count.
///
/// A missing directory is an empty catalog; unreadable entries are logged and
/// left out.
pub fn collect_records(source_dir: &Path, store: &AnnotationStore) -> Vec<ImageRecord> {
    let mut records = Vec::new();

    if !source_dir.is_dir() {
        tracing::debug!(dir = %source_dir.display(), "image directory missing");
        return records;
    }

    let dir_name = source_dir
        .file_name()
        .map(|name| name.to_string_lossy().into_owned());

    for entry in WalkDir::new(source_dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!(dir = %source_dir.display(), error = %e, "skipping unreadable image entry");
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        let filename = entry.file_name().to_string_lossy().into_owned();
        if !is_allowed_image(&filename) {
            continue;
        }
        let Some(id) = ImageKey::from_file_name(&filename) else {
            continue;
        };

        let path = match &dir_name {
            Some(dir) => format!("{}/{}", dir, filename),
            None => filename.clone(),
        };
        let annotation_count = store.load(&id).len();

        records.push(ImageRecord::new(id, filename, path, annotation_count));
    }

    records
}

/// Sorts by annotation count descending, then filename ascending.
pub fn sort_records(records: &mut [ImageRecord]) {
    records.sort_by(|a, b| {
        Reverse(a.annotation_count)
            .cmp(&Reverse(b.annotation_count))
            .then_with(|| a.filename.cmp(&b.filename))
    });
}

/// Totals over all records.
pub fn summarize(records: &[ImageRecord]) -> CatalogStats {
    CatalogStats {
        total_images: records.len(),
        annotated_images: records.iter().filter(|r| r.has_annotation).count(),
        total_annotations: records.iter().map(|r| r.annotation_count).sum(),
    }
}

/// Slices already-sorted records into one page.
///
/// Page `p` of size `s` holds `records[(p-1)*s .. min(p*s, total)]`; pages
/// past the end are empty but carry correct stats and metadata.
pub fn paginate(records: Vec<ImageRecord>, page: usize, per_page: usize) -> CatalogPage {
    let page = page.max(1);
    let per_page = per_page.max(1);

    let stats = summarize(&records);
    let total_items = records.len();
    let total_pages = total_items.div_ceil(per_page);

    let start = (page - 1).saturating_mul(per_page);
    let end = start.saturating_add(per_page);

    let items: Vec<ImageRecord> = records.into_iter().skip(start).take(per_page).collect();

    let pagination = Pagination {
        page,
        per_page,
        total_pages,
        total_items,
        has_prev: page > 1,
        has_next: page < total_pages,
        prev_page: (page > 1).then(|| page - 1),
        next_page: (page < total_pages).then(|| page + 1),
        start_index: start.saturating_add(1),
        end_index: end.min(total_items),
    };

    CatalogPage {
        items,
        stats,
        pagination,
    }
}

/// Builds the navigation view for `key` from sorted records.
pub fn navigation_for(records: &[ImageRecord], key: &ImageKey) -> Option<Navigation> {
    let index = records.iter().position(|r| &r.id == key)?;

    Some(Navigation {
        image: records[index].clone(),
        total_images: records.len(),
        position: index + 1,
        prev: index.checked_sub(1).map(|i| records[i].clone()),
        next: records.get(index + 1).cloned(),
    })
}
