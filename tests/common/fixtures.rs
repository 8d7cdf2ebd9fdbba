use std::path::{Path, PathBuf};

use image::{ImageBuffer, Rgb};
use voc_inspect::DatasetConfig;

/// Builds a Pascal VOC document with one `object` per `(label, box)` pair.
pub fn voc_xml(objects: &[(&str, [f64; 4])]) -> String {
    let mut xml = String::from("<annotation>\n  <folder>train</folder>\n  <filename>sample.jpg</filename>\n");
    for (label, [xmin, ymin, xmax, ymax]) in objects {
        xml.push_str(&format!(
            "  <object>\n    <name>{label}</name>\n    <pose>Frontal</pose>\n    <bndbox>\n      \
             <xmin>{xmin}</xmin>\n      <ymin>{ymin}</ymin>\n      <xmax>{xmax}</xmax>\n      \
             <ymax>{ymax}</ymax>\n    </bndbox>\n  </object>\n"
        ));
    }
    xml.push_str("</annotation>\n");
    xml
}

/// Writes a solid-colored RGB image, format chosen from the extension.
pub fn create_test_image(path: &Path, width: u32, height: u32, color: [u8; 3]) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("Failed to create image directory");
    }
    let img = ImageBuffer::from_fn(width, height, |_, _| Rgb(color));
    img.save(path).expect("Failed to save test image");
}

/// Scratch dataset root laid out like PubTables-1M-Detection.
pub struct TestDataset {
    pub dir: tempfile::TempDir,
}

impl TestDataset {
    pub fn new() -> Self {
        let dir = tempfile::TempDir::new().expect("Failed to create temp directory");
        std::fs::create_dir_all(dir.path().join("train")).expect("Failed to create train dir");
        Self { dir }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn add_annotation(&self, name: &str, xml: &str) -> PathBuf {
        let path = self.root().join("train").join(name);
        std::fs::write(&path, xml).expect("Failed to write annotation");
        path
    }

    /// Adds `relative` as a 100x100 white image plus its annotation.
    pub fn add_sample(&self, relative: &str, objects: &[(&str, [f64; 4])]) {
        create_test_image(&self.root().join(relative), 100, 100, [255, 255, 255]);
        let stem = Path::new(relative)
            .file_stem()
            .and_then(|s| s.to_str())
            .expect("Sample path needs a file stem");
        self.add_annotation(&format!("{stem}.xml"), &voc_xml(objects));
    }

    pub fn write_filelist(&self, lines: &[&str]) {
        let text = lines.join("\n");
        std::fs::write(self.root().join("images_filelist.txt"), text).expect("Failed to write filelist");
    }

    pub fn config(&self, work_dir: &Path) -> DatasetConfig {
        DatasetConfig::new(self.root()).with_work_dir(work_dir)
    }
}
