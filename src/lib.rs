pub mod annotation;
pub mod config;
pub mod dataset;
pub mod error;
pub mod models;
pub mod scan;
pub mod visualize;

pub use annotation::{read_labels, read_pascal_voc};
pub use config::{BndboxPolicy, DataType, DatasetConfig, ScanPolicy};
pub use dataset::{DatasetLayout, MaterializedSample, materialize_sample, read_filelist};
pub use error::{DatasetError, Result};
pub use models::{AnnotatedObject, Annotation, BoundingBox, ClassMap};
pub use scan::{LogSink, NoopSink, ScanFailure, ScanReport, ScanSink, scan_labels};
pub use visualize::{Visualizer, draw_bboxes, render_boxes};
