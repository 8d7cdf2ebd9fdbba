use std::path::{Path, PathBuf};

use clap::ValueEnum;
use serde::Deserialize;

use crate::error::{DatasetError, Result};

pub const DEFAULT_WORK_DIR: &str = ".";
pub const DEFAULT_OUTPUT_SUBDIR: &str = "bbox";
pub const DEFAULT_PROGRESS_INTERVAL: usize = 1000;

/// Which annotation vocabulary the dataset uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum DataType {
    #[default]
    Detection,
    Structure,
}

/// How to treat an `object` that carries more than one `bndbox`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum BndboxPolicy {
    /// Keep the coordinates of the last `bndbox` child.
    #[default]
    LastWins,
    /// Reject the file as malformed.
    ExactlyOne,
}

/// What a dataset-wide scan does when one file fails to parse.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum ScanPolicy {
    /// Record the failure and keep going.
    #[default]
    BestEffort,
    /// Abort the scan with the first error.
    FailFast,
}

/// Settings shared by every dataset operation.
#[derive(Debug, Clone, Deserialize)]
pub struct DatasetConfig {
    pub dataset_root: PathBuf,

    #[serde(default)]
    pub data_type: DataType,

    /// Root of the local mirror that samples are copied into
    #[serde(default = "default_work_dir")]
    pub work_dir: PathBuf,

    /// Where rendered images go; `<work_dir>/bbox` when unset
    #[serde(default)]
    pub output_dir: Option<PathBuf>,

    /// TTF/OTF font used for label text
    #[serde(default)]
    pub font_path: Option<PathBuf>,

    #[serde(default)]
    pub bndbox_policy: BndboxPolicy,

    #[serde(default)]
    pub scan_policy: ScanPolicy,
}

fn default_work_dir() -> PathBuf {
    PathBuf::from(DEFAULT_WORK_DIR)
}

impl DatasetConfig {
    pub fn new(dataset_root: impl Into<PathBuf>) -> Self {
        Self {
            dataset_root: dataset_root.into(),
            data_type: DataType::default(),
            work_dir: default_work_dir(),
            output_dir: None,
            font_path: None,
            bndbox_policy: BndboxPolicy::default(),
            scan_policy: ScanPolicy::default(),
        }
    }

    pub fn with_work_dir(mut self, work_dir: impl Into<PathBuf>) -> Self {
        self.work_dir = work_dir.into();
        self
    }

    pub fn with_data_type(mut self, data_type: DataType) -> Self {
        self.data_type = data_type;
        self
    }

    pub fn with_bndbox_policy(mut self, policy: BndboxPolicy) -> Self {
        self.bndbox_policy = policy;
        self
    }

    pub fn with_scan_policy(mut self, policy: ScanPolicy) -> Self {
        self.scan_policy = policy;
        self
    }

    /// Load settings from a YAML file.
    pub fn from_yaml_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| DatasetError::io(path, e))?;
        serde_yaml::from_str(&text).map_err(|e| DatasetError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    pub fn output_dir(&self) -> PathBuf {
        self.output_dir
            .clone()
            .unwrap_or_else(|| self.work_dir.join(DEFAULT_OUTPUT_SUBDIR))
    }
}
