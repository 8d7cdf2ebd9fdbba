pub mod materialize;

use std::path::{Path, PathBuf};

use crate::error::{DatasetError, Result, ensure_exists};

pub use materialize::{MaterializedSample, materialize_sample};

pub const FILELIST_NAME: &str = "images_filelist.txt";
pub const ANNOTATION_DIR: &str = "train";
pub const ANNOTATION_EXT: &str = "xml";

/// Paths inside a dataset root (or a local mirror of one).
#[derive(Debug, Clone)]
pub struct DatasetLayout {
    root: PathBuf,
}

impl DatasetLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn filelist(&self) -> PathBuf {
        self.root.join(FILELIST_NAME)
    }

    pub fn annotation_dir(&self) -> PathBuf {
        self.root.join(ANNOTATION_DIR)
    }

    pub fn image(&self, relative: &Path) -> PathBuf {
        self.root.join(relative)
    }

    pub fn annotation(&self, relative_image: &Path) -> PathBuf {
        self.root.join(annotation_relative_path(relative_image))
    }
}

/// `train/<stem>.xml` for an image path relative to the dataset root.
pub fn annotation_relative_path(relative_image: &Path) -> PathBuf {
    let mut name = relative_image
        .file_stem()
        .unwrap_or(relative_image.as_os_str())
        .to_os_string();
    name.push(".");
    name.push(ANNOTATION_EXT);
    Path::new(ANNOTATION_DIR).join(name)
}

/// Load the relative image paths listed in `images_filelist.txt`.
///
/// Lines are trimmed and blank lines skipped.
pub fn read_filelist(layout: &DatasetLayout) -> Result<Vec<PathBuf>> {
    ensure_exists(layout.root())?;
    let path = layout.filelist();
    let text = std::fs::read_to_string(&path).map_err(|e| DatasetError::io(&path, e))?;

    Ok(text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(PathBuf::from)
        .collect())
}
