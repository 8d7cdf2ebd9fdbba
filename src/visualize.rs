use std::path::{Path, PathBuf};

use ab_glyph::FontVec;
use image::{ImageFormat, ImageReader, Rgb, RgbImage};
use imageproc::drawing::{draw_hollow_rect_mut, draw_text_mut};
use imageproc::rect::Rect;
use log::debug;

use crate::config::DatasetConfig;
use crate::error::{DatasetError, Result, ensure_exists};
use crate::models::BoundingBox;

pub const BOX_COLOR: Rgb<u8> = Rgb([255, 0, 0]);
pub const LABEL_SCALE: f32 = 12.0;
pub const LABEL_OFFSET_Y: i32 = 10;
pub const OUTPUT_EXT: &str = "jpg";

/// DejaVu Sans Mono, used for label text unless `font_path` is set.
const BUNDLED_FONT: &[u8] = include_bytes!("../assets/fonts/DejaVuSansMono.ttf");
const BUNDLED_FONT_NAME: &str = "<bundled DejaVuSansMono.ttf>";

/// Load a TTF/OTF font for label text.
pub fn load_font(path: &Path) -> Result<FontVec> {
    ensure_exists(path)?;
    let data = std::fs::read(path).map_err(|e| DatasetError::io(path, e))?;
    FontVec::try_from_vec(data).map_err(|e| DatasetError::Font {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// The font compiled into the binary.
pub fn bundled_font() -> Result<FontVec> {
    FontVec::try_from_vec(BUNDLED_FONT.to_vec()).map_err(|e| DatasetError::Font {
        path: PathBuf::from(BUNDLED_FONT_NAME),
        message: e.to_string(),
    })
}

/// Draw each box as a red outline with its label just above the top-left
/// corner. Pairs stop at the shorter of `boxes` and `labels`.
///
/// Any finite or infinite coordinate is accepted; whatever falls outside the
/// image is clipped. Without a font only the outlines are drawn. Returns the
/// number of boxes drawn.
pub fn render_boxes<S: AsRef<str>>(
    img: &mut RgbImage,
    boxes: &[BoundingBox],
    labels: &[S],
    font: Option<&FontVec>,
) -> usize {
    let (width, height) = img.dimensions();
    let mut drawn = 0;
    for (bbox, label) in boxes.iter().zip(labels) {
        draw_hollow_rect_mut(img, outline(bbox, width, height), BOX_COLOR);

        if let Some(font) = font {
            let x = text_coordinate(bbox.xmin, width);
            let y = text_coordinate(bbox.ymin, height).saturating_sub(LABEL_OFFSET_Y);
            draw_text_mut(img, BOX_COLOR, x, y, LABEL_SCALE, font, label.as_ref());
        }
        drawn += 1;
    }
    drawn
}

// Edges are pulled in to one pixel outside the image, which keeps them
// invisible while bounding the arithmetic. NaN lands on 0.
fn edge_coordinate(v: f64, limit: u32) -> i32 {
    v.round().clamp(-1.0, limit as f64) as i32
}

fn text_coordinate(v: f64, limit: u32) -> i32 {
    let limit = limit.min(i32::MAX as u32 / 2) as f64;
    v.round().clamp(-limit, limit) as i32
}

// Corners are inclusive; degenerate boxes still get a 1px outline.
fn outline(bbox: &BoundingBox, width: u32, height: u32) -> Rect {
    let left = edge_coordinate(bbox.xmin, width);
    let top = edge_coordinate(bbox.ymin, height);
    let right = edge_coordinate(bbox.xmax, width);
    let bottom = edge_coordinate(bbox.ymax, height);

    let w = (right - left + 1).max(1) as u32;
    let h = (bottom - top + 1).max(1) as u32;
    Rect::at(left, top).of_size(w, h)
}

/// Open an image, draw boxes and labels on it, and save it as
/// `<output_dir>/<stem>.jpg`.
pub fn draw_bboxes<S: AsRef<str>>(
    image_path: &Path,
    boxes: &[BoundingBox],
    labels: &[S],
    output_dir: &Path,
    font: &FontVec,
) -> Result<PathBuf> {
    ensure_exists(image_path)?;
    let stem = image_path.file_stem().ok_or_else(|| DatasetError::Io {
        path: image_path.to_path_buf(),
        source: std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "image path has no file stem",
        ),
    })?;
    let mut name = stem.to_os_string();
    name.push(".");
    name.push(OUTPUT_EXT);
    let output = output_dir.join(name);

    let img = ImageReader::open(image_path)
        .map_err(|e| DatasetError::io(image_path, e))?
        .decode()
        .map_err(|e| DatasetError::image(image_path, e))?;

    let mut canvas = img.to_rgb8();
    let drawn = render_boxes(&mut canvas, boxes, labels, Some(font));

    std::fs::create_dir_all(output_dir).map_err(|e| DatasetError::io(output_dir, e))?;
    canvas
        .save_with_format(&output, ImageFormat::Jpeg)
        .map_err(|e| DatasetError::image(&output, e))?;
    debug!("Drew {} boxes on {} -> {}", drawn, image_path.display(), output.display());

    Ok(output)
}

/// Renders annotated images into one output directory with one font.
pub struct Visualizer {
    output_dir: PathBuf,
    font: FontVec,
}

impl Visualizer {
    /// Uses the bundled font.
    pub fn new(output_dir: impl Into<PathBuf>) -> Result<Self> {
        Ok(Self {
            output_dir: output_dir.into(),
            font: bundled_font()?,
        })
    }

    pub fn with_font(mut self, font: FontVec) -> Self {
        self.font = font;
        self
    }

    /// Build from config; `font_path` replaces the bundled font when set.
    pub fn from_config(config: &DatasetConfig) -> Result<Self> {
        let visualizer = Self::new(config.output_dir())?;
        match &config.font_path {
            Some(path) => Ok(visualizer.with_font(load_font(path)?)),
            None => Ok(visualizer),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn draw<S: AsRef<str>>(
        &self,
        image_path: &Path,
        boxes: &[BoundingBox],
        labels: &[S],
    ) -> Result<PathBuf> {
        draw_bboxes(image_path, boxes, labels, &self.output_dir, &self.font)
    }
}
