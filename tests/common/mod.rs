#![allow(dead_code, unused_imports)]

mod fixtures;
pub use fixtures::*;

// Re-export commonly used types from voc_inspect for tests
pub use voc_inspect::{
    BndboxPolicy, BoundingBox, DatasetConfig, DatasetError, DatasetLayout, ScanPolicy,
};
