//! The request/response interface used by the web front end and the CLI.
//!
//! Each call re-reads durable storage; the service holds no cached state
//! besides its configuration. Image ids arrive as plain strings and are
//! validated here before reaching the store.

use std::path::PathBuf;

use crate::catalog::{self, CatalogPage, Navigation};
use crate::config::Config;
use crate::error::BeecellError;
use crate::export::{self, ExportSummary};
use crate::model::{Annotation, CellClass, CellClassInfo, ImageKey};
use crate::stats::{self, ClassDistribution, CurrentStats};
use crate::store::{AnnotationFormat, AnnotationStore, DeleteOutcome};

/// Annotation operations over one configured data layout.
#[derive(Clone, Debug)]
pub struct AnnotationService {
    config: Config,
    store: AnnotationStore,
}

impl AnnotationService {
    pub fn new(config: Config) -> Self {
        let store = AnnotationStore::new(config.annotations_dir.clone());
        Self { config, store }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn store(&self) -> &AnnotationStore {
        &self.store
    }

    /// Creates the data directories.
    pub fn init_directories(&self) -> Result<(), BeecellError> {
        self.config.ensure_directories()
    }

    /// One page of the catalog. `per_page` is clamped to the configured
    /// maximum; `None` uses the configured default.
    pub fn get_catalog(&self, page: usize, per_page: Option<usize>) -> CatalogPage {
        let per_page = self
            .config
            .clamp_per_page(per_page.unwrap_or(self.config.default_per_page));
        catalog::list(page, per_page, self.config.source_dir(), &self.store)
    }

    /// An image's position and neighbours in catalog order.
    pub fn locate_image(&self, image_id: &str) -> Result<Option<Navigation>, BeecellError> {
        let key = ImageKey::new(image_id)?;
        Ok(catalog::locate(self.config.source_dir(), &self.store, &key))
    }

    pub fn get_annotations(&self, image_id: &str) -> Result<Vec<Annotation>, BeecellError> {
        let key = ImageKey::new(image_id)?;
        Ok(self.store.load(&key))
    }

    /// Replaces an image's annotations; returns how many were written.
    pub fn put_annotations(
        &self,
        image_id: &str,
        annotations: Vec<Annotation>,
    ) -> Result<usize, BeecellError> {
        let key = ImageKey::new(image_id)?;
        self.store.save(&key, annotations)
    }

    pub fn delete_annotations(&self, image_id: &str) -> Result<DeleteOutcome, BeecellError> {
        let key = ImageKey::new(image_id)?;
        self.store.delete(&key)
    }

    /// Writes a new dataset export, or `None` if there is nothing to export.
    pub fn export_dataset(&self) -> Result<Option<ExportSummary>, BeecellError> {
        export::export_all(&self.config.annotations_dir, &self.config.exports_dir)
    }

    pub fn get_distribution(&self) -> ClassDistribution {
        stats::compute_class_distribution(&self.config.annotations_dir)
    }

    /// Catalog totals plus the class distribution.
    pub fn get_stats(&self) -> CurrentStats {
        let records = catalog::sorted_records(self.config.source_dir(), &self.store);
        stats::current_stats(catalog::summarize(&records), &self.config.annotations_dir)
    }

    /// Path of an existing annotation file, for download.
    ///
    /// `None` if the id or format is not recognised or the file does not
    /// exist.
    pub fn annotation_file_path(&self, image_id: &str, format: &str) -> Option<PathBuf> {
        let key = ImageKey::new(image_id).ok()?;
        let format: AnnotationFormat = format.parse().ok()?;
        let path = self.store.path_for(&key, format);
        path.is_file().then_some(path)
    }

    pub fn cell_classes(&self) -> Vec<(CellClass, CellClassInfo)> {
        CellClass::table()
    }
}
