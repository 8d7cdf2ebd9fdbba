//! Depth-first dump of an XML document, for eyeballing unfamiliar annotation
//! files.

use std::io::Write;
use std::path::Path;

use roxmltree::{Document, Node};

use super::{parse_document, read_xml_text};
use crate::error::{DatasetError, Result};

/// One element visited by [`TreeWalk`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeEntry {
    pub depth: usize,
    pub tag: String,
    pub attributes: Vec<(String, String)>,
    /// Text before the first child element, whitespace included
    pub text: Option<String>,
}

/// Pre-order traversal over the elements of a parsed document.
///
/// Each call to [`TreeWalk::new`] starts from the root again.
pub struct TreeWalk<'a, 'input> {
    stack: Vec<(usize, Node<'a, 'input>)>,
}

impl<'a, 'input> TreeWalk<'a, 'input> {
    pub fn new(doc: &'a Document<'input>) -> Self {
        Self {
            stack: vec![(0, doc.root_element())],
        }
    }
}

impl Iterator for TreeWalk<'_, '_> {
    type Item = TreeEntry;

    fn next(&mut self) -> Option<TreeEntry> {
        let (depth, node) = self.stack.pop()?;

        // reversed so the first child is popped next
        let children: Vec<_> = node.children().filter(|n| n.is_element()).collect();
        for child in children.into_iter().rev() {
            self.stack.push((depth + 1, child));
        }

        Some(TreeEntry {
            depth,
            tag: node.tag_name().name().to_string(),
            attributes: node
                .attributes()
                .map(|a| (a.name().to_string(), a.value().to_string()))
                .collect(),
            text: node.text().map(str::to_string),
        })
    }
}

/// Collect every element of an XML file in pre-order.
pub fn read_xml_tree(path: &Path) -> Result<Vec<TreeEntry>> {
    let xml = read_xml_text(path)?;
    let doc = parse_document(&xml, path)?;
    Ok(TreeWalk::new(&doc).collect())
}

/// Write each element as three tab-indented lines: tag, attributes, text.
pub fn print_tree<W: Write>(path: &Path, out: &mut W) -> Result<()> {
    let xml = read_xml_text(path)?;
    let doc = parse_document(&xml, path)?;

    for entry in TreeWalk::new(&doc) {
        let indent = "\t".repeat(entry.depth);
        writeln!(out, "{indent}{}", entry.tag)
            .and_then(|_| writeln!(out, "{indent}attrib={:?}", entry.attributes))
            .and_then(|_| writeln!(out, "{indent}text={:?}", entry.text))
            .map_err(|e| DatasetError::io(path, e))?;
    }

    Ok(())
}
