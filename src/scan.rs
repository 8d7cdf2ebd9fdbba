//! Dataset-wide label scan.
//!
//! Reads every annotation under `<dataset_root>/train` once, collecting the
//! distinct object labels. Nothing is cached between calls.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};

use crate::annotation::read_labels;
use crate::config::{DEFAULT_PROGRESS_INTERVAL, DatasetConfig, ScanPolicy};
use crate::dataset::DatasetLayout;
use crate::error::{DatasetError, Result, ensure_exists};

/// Label that gets its files reported while scanning.
pub const SENTINEL_LABEL: &str = "table rotated";

/// A file the scan skipped under [`ScanPolicy::BestEffort`].
#[derive(Debug)]
pub struct ScanFailure {
    pub path: PathBuf,
    pub error: DatasetError,
}

#[derive(Debug, Default)]
pub struct ScanReport {
    pub labels: BTreeSet<String>,
    /// Files with at least one object labelled [`SENTINEL_LABEL`]
    pub sentinel_files: Vec<PathBuf>,
    pub failures: Vec<ScanFailure>,
    pub files_scanned: usize,
}

/// Observer for scan progress. Every method defaults to doing nothing.
pub trait ScanSink {
    fn on_start(&mut self, _total: usize) {}

    /// Called before file `index` (0-based) is parsed.
    fn on_file(&mut self, _index: usize, _total: usize, _path: &Path) {}

    fn on_sentinel(&mut self, _path: &Path) {}

    fn on_failure(&mut self, _failure: &ScanFailure) {}

    fn on_finish(&mut self, _report: &ScanReport) {}
}

pub struct NoopSink;

impl ScanSink for NoopSink {}

/// Reports progress through the `log` facade.
pub struct LogSink {
    interval: usize,
}

impl LogSink {
    pub fn new(interval: usize) -> Self {
        Self {
            interval: interval.max(1),
        }
    }
}

impl Default for LogSink {
    fn default() -> Self {
        Self::new(DEFAULT_PROGRESS_INTERVAL)
    }
}

impl ScanSink for LogSink {
    fn on_start(&mut self, total: usize) {
        info!("Scanning {} annotation files", total);
    }

    fn on_file(&mut self, index: usize, total: usize, path: &Path) {
        debug!("Reading {}", path.display());
        if index > 0 && index % self.interval == 0 {
            info!("Scanned {}/{} files", index, total);
        }
    }

    fn on_sentinel(&mut self, path: &Path) {
        warn!("'{}' in {}", SENTINEL_LABEL, path.display());
    }

    fn on_failure(&mut self, failure: &ScanFailure) {
        warn!("Skipping {}: {}", failure.path.display(), failure.error);
    }

    fn on_finish(&mut self, report: &ScanReport) {
        info!(
            "Scan finished: {} files, {} labels, {} skipped",
            report.files_scanned,
            report.labels.len(),
            report.failures.len()
        );
    }
}

/// List the regular files in the annotation directory, sorted by path.
pub fn annotation_files(layout: &DatasetLayout) -> Result<Vec<PathBuf>> {
    let dir = layout.annotation_dir();
    ensure_exists(&dir)?;

    let mut files = Vec::new();
    for entry in std::fs::read_dir(&dir).map_err(|e| DatasetError::io(&dir, e))? {
        let path = entry.map_err(|e| DatasetError::io(&dir, e))?.path();
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Scan every annotation file and collect the distinct labels.
///
/// With [`ScanPolicy::FailFast`] the first unreadable or malformed file ends
/// the scan with its error. With [`ScanPolicy::BestEffort`] it is recorded in
/// [`ScanReport::failures`] and the scan continues.
pub fn scan_labels(config: &DatasetConfig, sink: &mut dyn ScanSink) -> Result<ScanReport> {
    let layout = DatasetLayout::new(&config.dataset_root);
    let files = annotation_files(&layout)?;
    let total = files.len();
    sink.on_start(total);

    let mut report = ScanReport::default();
    for (index, path) in files.into_iter().enumerate() {
        sink.on_file(index, total, &path);

        match read_labels(&path) {
            Ok(labels) => {
                let mut has_sentinel = false;
                for label in labels {
                    has_sentinel |= label == SENTINEL_LABEL;
                    report.labels.insert(label);
                }
                if has_sentinel {
                    sink.on_sentinel(&path);
                    report.sentinel_files.push(path);
                }
            }
            Err(error) => match config.scan_policy {
                ScanPolicy::FailFast => return Err(error),
                ScanPolicy::BestEffort => {
                    let failure = ScanFailure { path, error };
                    sink.on_failure(&failure);
                    report.failures.push(failure);
                }
            },
        }
        report.files_scanned += 1;
    }

    sink.on_finish(&report);
    Ok(report)
}
