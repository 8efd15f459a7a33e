#![allow(dead_code)]

use std::fs;
use std::path::Path;

use beecell::{AnnotationService, Config};

/// Writes an empty image file. The catalog only looks at names.
pub fn write_image(dir: &Path, file_name: &str) {
    fs::create_dir_all(dir).expect("create image dir");
    fs::write(dir.join(file_name), b"").expect("write image file");
}

/// Writes raw content as `<id>.json` in the annotations directory.
pub fn write_annotation_json(dir: &Path, image_id: &str, content: &str) {
    fs::create_dir_all(dir).expect("create annotations dir");
    fs::write(dir.join(format!("{}.json", image_id)), content).expect("write annotation file");
}

/// A config rooted in a temp directory.
pub fn config_in(root: &Path) -> Config {
    Config {
        images_dir: root.join("images"),
        annotations_dir: root.join("annotations"),
        exports_dir: root.join("exports"),
        ..Default::default()
    }
}

pub fn service_in(root: &Path) -> AnnotationService {
    AnnotationService::new(config_in(root))
}
