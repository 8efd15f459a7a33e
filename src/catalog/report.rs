//! Catalog result types and terminal formatting.

use serde::Serialize;
use std::fmt;

use crate::model::ImageKey;

/// One image joined with its annotation count.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ImageRecord {
    /// Filename without extension.
    pub id: ImageKey,
    pub filename: String,
    /// `<source dir name>/<filename>`, with forward slashes.
    pub path: String,
    pub annotation_count: usize,
    pub has_annotation: bool,
}

impl ImageRecord {
    pub fn new(id: ImageKey, filename: String, path: String, annotation_count: usize) -> Self {
        Self {
            id,
            filename,
            path,
            annotation_count,
            has_annotation: annotation_count > 0,
        }
    }
}

/// Totals over the whole catalog, not just one page.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CatalogStats {
    pub total_images: usize,
    pub annotated_images: usize,
    pub total_annotations: usize,
}

/// Page metadata for one catalog query.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub page: usize,
    pub per_page: usize,
    pub total_pages: usize,
    pub total_items: usize,
    pub has_prev: bool,
    pub has_next: bool,
    pub prev_page: Option<usize>,
    pub next_page: Option<usize>,
    /// 1-based index of the first item on this page.
    pub start_index: usize,
    /// 1-based index of the last item on this page.
    pub end_index: usize,
}

/// One page of the catalog.
#[derive(Clone, Debug, Serialize)]
pub struct CatalogPage {
    pub items: Vec<ImageRecord>,
    pub stats: CatalogStats,
    pub pagination: Pagination,
}

/// An image's position in the full sorted catalog.
#[derive(Clone, Debug, Serialize)]
pub struct Navigation {
    pub image: ImageRecord,
    pub total_images: usize,
    /// 1-based position.
    pub position: usize,
    pub prev: Option<ImageRecord>,
    pub next: Option<ImageRecord>,
}

impl fmt::Display for CatalogPage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = &self.stats;
        let p = &self.pagination;

        writeln!(
            f,
            "Images: {}  Annotated: {}  Annotations: {}",
            s.total_images, s.annotated_images, s.total_annotations
        )?;

        if s.total_images == 0 {
            return writeln!(f, "No images found.");
        }

        writeln!(
            f,
            "Page {} of {} ({} per page)",
            p.page, p.total_pages, p.per_page
        )?;
        writeln!(f)?;

        if self.items.is_empty() {
            return writeln!(f, "  (no images on this page)");
        }

        for item in &self.items {
            let marker = if item.has_annotation { "●" } else { "○" };
            writeln!(
                f,
                "  {} {:<32} {:>6}",
                marker,
                item.filename,
                item.annotation_count
            )?;
        }

        Ok(())
    }
}

impl fmt::Display for Navigation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} ({} annotation(s)), image {} of {}",
            self.image.filename, self.image.annotation_count, self.position, self.total_images
        )?;
        writeln!(
            f,
            "  prev: {}",
            self.prev.as_ref().map_or("-", |r| r.id.as_str())
        )?;
        writeln!(
            f,
            "  next: {}",
            self.next.as_ref().map_or("-", |r| r.id.as_str())
        )
    }
}
