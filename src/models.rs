use crate::config::DataType;

/// Axis-aligned box in absolute pixel coordinates.
///
/// `xmin <= xmax` and `ymin <= ymax` are assumed but never checked.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub xmin: f64,
    pub ymin: f64,
    pub xmax: f64,
    pub ymax: f64,
}

impl BoundingBox {
    pub fn new(xmin: f64, ymin: f64, xmax: f64, ymax: f64) -> Self {
        Self { xmin, ymin, xmax, ymax }
    }

    pub fn to_array(&self) -> [f64; 4] {
        [self.xmin, self.ymin, self.xmax, self.ymax]
    }

    pub fn width(&self) -> f64 {
        self.xmax - self.xmin
    }

    pub fn height(&self) -> f64 {
        self.ymax - self.ymin
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnnotatedObject {
    pub label: String,
    pub bbox: BoundingBox,
}

/// Parsed contents of one annotation file, objects in document order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Annotation {
    pub objects: Vec<AnnotatedObject>,
}

impl Annotation {
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn bboxes(&self) -> Vec<BoundingBox> {
        self.objects.iter().map(|o| o.bbox).collect()
    }

    pub fn labels(&self) -> Vec<String> {
        self.objects.iter().map(|o| o.label.clone()).collect()
    }

    /// Split into parallel box and label lists.
    pub fn into_parts(self) -> (Vec<BoundingBox>, Vec<String>) {
        self.objects.into_iter().map(|o| (o.bbox, o.label)).unzip()
    }
}

const DETECTION_CLASSES: [&str; 3] = ["table", "table rotated", "no object"];

const STRUCTURE_CLASSES: [&str; 7] = [
    "table",
    "table column",
    "table row",
    "table column header",
    "table projected row header",
    "table spanning cell",
    "no object",
];

/// Fixed label-to-id vocabulary used by downstream training.
#[derive(Debug, Clone, Copy)]
pub struct ClassMap {
    names: &'static [&'static str],
}

impl ClassMap {
    pub fn for_data_type(data_type: DataType) -> Self {
        let names: &'static [&'static str] = match data_type {
            DataType::Detection => &DETECTION_CLASSES,
            DataType::Structure => &STRUCTURE_CLASSES,
        };
        Self { names }
    }

    pub fn id(&self, label: &str) -> Option<u32> {
        self.names.iter().position(|n| *n == label).map(|i| i as u32)
    }

    pub fn label(&self, id: u32) -> Option<&'static str> {
        self.names.get(id as usize).copied()
    }

    pub fn contains(&self, label: &str) -> bool {
        self.id(label).is_some()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// `(label, id)` pairs in id order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, u32)> + '_ {
        self.names.iter().enumerate().map(|(i, n)| (*n, i as u32))
    }
}
