//! Pascal VOC annotation parsing.
//!
//! Every `object` element anywhere in the document (root included) yields one
//! entry, in depth-first document order. `name` and `bndbox` are looked up
//! among the object's direct children only; the coordinates are direct
//! children of `bndbox`.

use std::path::Path;

use roxmltree::Node;

use super::{parse_document, read_xml_text};
use crate::config::BndboxPolicy;
use crate::error::{DatasetError, Result};
use crate::models::{AnnotatedObject, Annotation, BoundingBox};

pub const OBJECT_TAG: &str = "object";
pub const NAME_TAG: &str = "name";
pub const BNDBOX_TAG: &str = "bndbox";

/// Parse one annotation file into boxes and labels.
pub fn read_pascal_voc(path: &Path, policy: BndboxPolicy) -> Result<Annotation> {
    let xml = read_xml_text(path)?;
    parse_pascal_voc(&xml, path, policy)
}

/// Parse annotation XML already in memory. `path` is only used in errors.
pub fn parse_pascal_voc(xml: &str, path: &Path, policy: BndboxPolicy) -> Result<Annotation> {
    let doc = parse_document(xml, path)?;

    let mut objects = Vec::new();
    for object in objects_in(doc.root_element()) {
        let label = object_label(object, path)?;
        let bbox = object_bbox(object, path, policy)?;
        objects.push(AnnotatedObject { label, bbox });
    }

    Ok(Annotation { objects })
}

/// Read only the object labels of an annotation file, ignoring boxes.
pub fn read_labels(path: &Path) -> Result<Vec<String>> {
    let xml = read_xml_text(path)?;
    parse_labels(&xml, path)
}

pub fn parse_labels(xml: &str, path: &Path) -> Result<Vec<String>> {
    let doc = parse_document(xml, path)?;
    objects_in(doc.root_element())
        .map(|object| object_label(object, path))
        .collect()
}

fn objects_in<'a, 'input: 'a>(
    root: Node<'a, 'input>,
) -> impl Iterator<Item = Node<'a, 'input>> {
    root.descendants().filter(|n| n.has_tag_name(OBJECT_TAG))
}

fn child<'a, 'input>(node: Node<'a, 'input>, tag: &str) -> Option<Node<'a, 'input>> {
    node.children().find(|n| n.has_tag_name(tag))
}

fn object_label(object: Node, path: &Path) -> Result<String> {
    let name = child(object, NAME_TAG)
        .ok_or_else(|| DatasetError::malformed(path, "object without <name>"))?;
    // an empty <name/> has no text node, same as a missing one
    name.text()
        .map(str::to_string)
        .ok_or_else(|| DatasetError::malformed(path, "object with empty <name>"))
}

fn object_bbox(object: Node, path: &Path, policy: BndboxPolicy) -> Result<BoundingBox> {
    let boxes: Vec<Node> = object
        .children()
        .filter(|n| n.has_tag_name(BNDBOX_TAG))
        .collect();

    let bndbox = match (boxes.as_slice(), policy) {
        ([], _) => return Err(DatasetError::malformed(path, "object without <bndbox>")),
        ([only], _) => *only,
        ([.., last], BndboxPolicy::LastWins) => *last,
        (many, BndboxPolicy::ExactlyOne) => {
            return Err(DatasetError::malformed(
                path,
                format!("object has {} <bndbox> elements, expected exactly one", many.len()),
            ));
        }
    };

    Ok(BoundingBox {
        xmin: coordinate(bndbox, "xmin", path)?,
        ymin: coordinate(bndbox, "ymin", path)?,
        xmax: coordinate(bndbox, "xmax", path)?,
        ymax: coordinate(bndbox, "ymax", path)?,
    })
}

fn coordinate(bndbox: Node, tag: &str, path: &Path) -> Result<f64> {
    let text = child(bndbox, tag)
        .and_then(|n| n.text())
        .ok_or_else(|| DatasetError::malformed(path, format!("<bndbox> missing <{tag}>")))?;
    text.trim().parse::<f64>().map_err(|_| {
        DatasetError::malformed(path, format!("<{tag}> is not a number: {text:?}"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(xml: &str) -> Result<Annotation> {
        parse_pascal_voc(xml, Path::new("inline.xml"), BndboxPolicy::LastWins)
    }

    #[test]
    fn coordinates_tolerate_whitespace() {
        let xml = "<annotation><object><name>table</name><bndbox>\
                   <xmin> 1.5 </xmin><ymin>2</ymin><xmax>\n3</xmax><ymax>4.25</ymax>\
                   </bndbox></object></annotation>";
        let annotation = parse(xml).unwrap();
        assert_eq!(annotation.objects[0].bbox.to_array(), [1.5, 2.0, 3.0, 4.25]);
    }

    #[test]
    fn nested_name_is_not_the_object_name() {
        let xml = "<annotation><object><part><name>inner</name></part>\
                   <bndbox><xmin>0</xmin><ymin>0</ymin><xmax>1</xmax><ymax>1</ymax></bndbox>\
                   </object></annotation>";
        assert!(matches!(parse(xml), Err(DatasetError::MalformedAnnotation { .. })));
    }

    #[test]
    fn object_without_bndbox_is_malformed() {
        let xml = "<annotation><object><name>table</name></object></annotation>";
        assert!(matches!(parse(xml), Err(DatasetError::MalformedAnnotation { .. })));
    }

    #[test]
    fn labels_ignore_boxes() {
        let xml = "<annotation><object><name>table</name></object></annotation>";
        let labels = parse_labels(xml, Path::new("inline.xml")).unwrap();
        assert_eq!(labels, vec!["table"]);
    }
}
