//! Integration tests for the dataset-wide label scan.

mod common;

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use common::*;
use voc_inspect::{NoopSink, ScanFailure, ScanSink, scan_labels};

/// Records every callback for later assertions.
#[derive(Default)]
struct RecordingSink {
    total: Option<usize>,
    visited: Vec<PathBuf>,
    sentinels: Vec<PathBuf>,
    failures: Vec<PathBuf>,
    finished: bool,
}

impl ScanSink for RecordingSink {
    fn on_start(&mut self, total: usize) {
        self.total = Some(total);
    }

    fn on_file(&mut self, _index: usize, _total: usize, path: &Path) {
        self.visited.push(path.to_path_buf());
    }

    fn on_sentinel(&mut self, path: &Path) {
        self.sentinels.push(path.to_path_buf());
    }

    fn on_failure(&mut self, failure: &ScanFailure) {
        self.failures.push(failure.path.clone());
    }

    fn on_finish(&mut self, _report: &voc_inspect::ScanReport) {
        self.finished = true;
    }
}

fn three_file_dataset() -> (TestDataset, PathBuf, PathBuf) {
    let dataset = TestDataset::new();
    dataset.add_annotation("a_table.xml", &voc_xml(&[("table", [1.0, 1.0, 2.0, 2.0])]));
    let rotated = dataset.add_annotation(
        "b_rotated.xml",
        &voc_xml(&[("table rotated", [1.0, 1.0, 2.0, 2.0])]),
    );
    let malformed = dataset.add_annotation("c_broken.xml", "<annotation><object><name>table");
    (dataset, rotated, malformed)
}

#[test]
fn test_best_effort_scan_records_failures() -> anyhow::Result<()> {
    let (dataset, rotated, malformed) = three_file_dataset();
    let config = DatasetConfig::new(dataset.root());
    let mut sink = RecordingSink::default();

    let report = scan_labels(&config, &mut sink)?;

    let expected: BTreeSet<String> = ["table", "table rotated"].iter().map(|s| s.to_string()).collect();
    assert_eq!(report.labels, expected);
    assert_eq!(report.sentinel_files, vec![rotated.clone()]);
    assert_eq!(sink.sentinels, vec![rotated]);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].path, malformed);
    assert!(matches!(report.failures[0].error, DatasetError::MalformedAnnotation { .. }));
    assert_eq!(sink.failures, vec![malformed]);
    assert_eq!(report.files_scanned, 3);
    assert_eq!(sink.total, Some(3));
    assert!(sink.finished);
    Ok(())
}

#[test]
fn test_fail_fast_scan_aborts() {
    let (dataset, _, malformed) = three_file_dataset();
    let config = DatasetConfig::new(dataset.root()).with_scan_policy(ScanPolicy::FailFast);

    let err = scan_labels(&config, &mut NoopSink).unwrap_err();
    assert!(matches!(err, DatasetError::MalformedAnnotation { .. }));
    assert_eq!(err.path(), malformed.as_path());
}

#[test]
fn test_sentinel_reported_once_per_file() -> anyhow::Result<()> {
    let dataset = TestDataset::new();
    let path = dataset.add_annotation(
        "two_rotated.xml",
        &voc_xml(&[
            ("table rotated", [0.0, 0.0, 1.0, 1.0]),
            ("table rotated", [2.0, 2.0, 3.0, 3.0]),
        ]),
    );
    let mut sink = RecordingSink::default();

    let report = scan_labels(&DatasetConfig::new(dataset.root()), &mut sink)?;

    assert_eq!(sink.sentinels, vec![path]);
    assert_eq!(report.labels.len(), 1);
    Ok(())
}

#[test]
fn test_scan_visits_files_in_sorted_order_and_skips_dirs() -> anyhow::Result<()> {
    let dataset = TestDataset::new();
    dataset.add_annotation("b.xml", &voc_xml(&[("table column", [0.0, 0.0, 1.0, 1.0])]));
    dataset.add_annotation("a.xml", &voc_xml(&[("table row", [0.0, 0.0, 1.0, 1.0])]));
    std::fs::create_dir_all(dataset.root().join("train/nested"))?;
    let mut sink = RecordingSink::default();

    let report = scan_labels(&DatasetConfig::new(dataset.root()), &mut sink)?;

    let names: Vec<_> = sink
        .visited
        .iter()
        .filter_map(|p| p.file_name().and_then(|n| n.to_str()).map(str::to_string))
        .collect();
    assert_eq!(names, vec!["a.xml", "b.xml"]);
    assert!(report.failures.is_empty());
    assert!(report.sentinel_files.is_empty());
    Ok(())
}

#[test]
fn test_scan_of_empty_objects() -> anyhow::Result<()> {
    let dataset = TestDataset::new();
    dataset.add_annotation("empty.xml", &voc_xml(&[]));

    let report = scan_labels(&DatasetConfig::new(dataset.root()), &mut NoopSink)?;
    assert!(report.labels.is_empty());
    assert_eq!(report.files_scanned, 1);
    Ok(())
}

#[test]
fn test_scan_missing_annotation_dir() {
    let dir = tempfile::TempDir::new().expect("Failed to create temp directory");

    let result = scan_labels(&DatasetConfig::new(dir.path()), &mut NoopSink);
    assert!(matches!(result, Err(DatasetError::NotFound { .. })));
}
