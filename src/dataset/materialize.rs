use std::fs;
use std::path::{Path, PathBuf};

use log::debug;

use super::DatasetLayout;
use crate::config::DatasetConfig;
use crate::error::{DatasetError, Result, ensure_exists};

/// Local copies of one image and its annotation.
#[derive(Debug, Clone)]
pub struct MaterializedSample {
    pub image: PathBuf,
    pub annotation: PathBuf,
    /// Files actually copied by this call (0 when both already existed)
    pub copied: usize,
}

/// Copy an image and its `train/<stem>.xml` annotation from the dataset root
/// into the work dir, keeping their relative paths.
///
/// Existing local files are left alone; the source is only required to exist
/// when a copy is needed.
pub fn materialize_sample(config: &DatasetConfig, relative_image: &Path) -> Result<MaterializedSample> {
    let source = DatasetLayout::new(&config.dataset_root);
    let local = DatasetLayout::new(&config.work_dir);

    let image = local.image(relative_image);
    let annotation = local.annotation(relative_image);

    let mut copied = 0;
    if copy_if_missing(&source.image(relative_image), &image)? {
        copied += 1;
    }
    if copy_if_missing(&source.annotation(relative_image), &annotation)? {
        copied += 1;
    }

    Ok(MaterializedSample {
        image,
        annotation,
        copied,
    })
}

fn copy_if_missing(src: &Path, dst: &Path) -> Result<bool> {
    if dst.exists() {
        debug!("Keeping existing {}", dst.display());
        return Ok(false);
    }
    ensure_exists(src)?;

    if let Some(parent) = dst.parent() {
        fs::create_dir_all(parent).map_err(|e| DatasetError::io(parent, e))?;
    }
    fs::copy(src, dst).map_err(|e| DatasetError::io(src, e))?;
    debug!("Copied {} -> {}", src.display(), dst.display());

    Ok(true)
}
