pub mod reader;
pub mod tree;

use std::path::Path;

use roxmltree::Document;

use crate::error::{DatasetError, Result, ensure_exists};

pub use reader::{parse_labels, parse_pascal_voc, read_labels, read_pascal_voc};
pub use tree::{TreeEntry, TreeWalk, print_tree, read_xml_tree};

/// Read an annotation file into memory.
pub(crate) fn read_xml_text(path: &Path) -> Result<String> {
    ensure_exists(path)?;
    std::fs::read_to_string(path).map_err(|e| DatasetError::io(path, e))
}

pub(crate) fn parse_document<'input>(xml: &'input str, path: &Path) -> Result<Document<'input>> {
    Document::parse(xml).map_err(|e| DatasetError::malformed(path, e.to_string()))
}
