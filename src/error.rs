use std::path::{Path, PathBuf};

/// Errors raised while reading, copying, or rendering dataset files.
///
/// Every variant carries the path that caused it so a failure in the middle of
/// a long scan can be traced back to a single file.
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("{} doesn't exist", path.display())]
    NotFound { path: PathBuf },

    #[error("malformed annotation {}: {message}", path.display())]
    MalformedAnnotation { path: PathBuf, message: String },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("image error on {}: {source}", path.display())]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("failed to load font {}: {message}", path.display())]
    Font { path: PathBuf, message: String },

    #[error("invalid config {}: {message}", path.display())]
    Config { path: PathBuf, message: String },
}

pub type Result<T> = std::result::Result<T, DatasetError>;

impl DatasetError {
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        Self::NotFound { path: path.into() }
    }

    pub fn malformed(path: &Path, message: impl Into<String>) -> Self {
        Self::MalformedAnnotation {
            path: path.to_path_buf(),
            message: message.into(),
        }
    }

    /// Wrap an I/O error, mapping `ErrorKind::NotFound` onto `NotFound`.
    pub fn io(path: &Path, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::not_found(path)
        } else {
            Self::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    }

    pub fn image(path: &Path, source: image::ImageError) -> Self {
        Self::Image {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Path of the file that caused the error.
    pub fn path(&self) -> &Path {
        match self {
            Self::NotFound { path }
            | Self::MalformedAnnotation { path, .. }
            | Self::Io { path, .. }
            | Self::Image { path, .. }
            | Self::Font { path, .. }
            | Self::Config { path, .. } => path,
        }
    }
}

/// Fail with `NotFound` unless `path` exists.
pub(crate) fn ensure_exists(path: &Path) -> Result<()> {
    if path.exists() {
        Ok(())
    } else {
        Err(DatasetError::not_found(path))
    }
}
