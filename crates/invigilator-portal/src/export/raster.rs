use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use image::{DynamicImage, GenericImageView};
use serde::Deserialize;

use super::layout::SectionMeasure;
use super::sections::Section;

/// Device scale the browser renders sections at before upload.
pub const RASTER_SCALE: f64 = 2.0;

/// A rasterized section ready for pagination.
#[derive(Debug, Clone)]
pub struct SectionBitmap {
    pub image: DynamicImage,
}

impl SectionBitmap {
    pub fn measure(&self) -> SectionMeasure {
        let (width_px, height_px) = self.image.dimensions();
        SectionMeasure {
            width_px,
            height_px,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RasterError {
    #[error("section {0} was not rasterized")]
    Missing(usize),
    #[error("section {index} is not valid base64: {source}")]
    Encoding {
        index: usize,
        source: base64::DecodeError,
    },
    #[error("section {index} is not a readable image: {source}")]
    Image {
        index: usize,
        source: image::ImageError,
    },
}

/// Turns a section into a bitmap.
pub trait SectionRasterizer: Send + Sync {
    fn rasterize(&self, index: usize, section: &Section) -> Result<SectionBitmap, RasterError>;
}

/// Section bitmaps rendered by the browser, in packet order.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SectionUpload {
    pub sections: Vec<String>,
}

/// Rasterizer backed by uploaded base64 PNG or JPEG payloads. Data URL prefixes are accepted.
pub struct UploadedSectionRasterizer {
    payloads: Vec<String>,
}

impl UploadedSectionRasterizer {
    pub fn new(upload: SectionUpload) -> Self {
        Self {
            payloads: upload.sections,
        }
    }
}

fn strip_data_url(payload: &str) -> &str {
    let trimmed = payload.trim();
    match trimmed.split_once(";base64,") {
        Some((prefix, data)) if prefix.starts_with("data:") => data,
        _ => trimmed,
    }
}

impl SectionRasterizer for UploadedSectionRasterizer {
    fn rasterize(&self, index: usize, _section: &Section) -> Result<SectionBitmap, RasterError> {
        let payload = self
            .payloads
            .get(index)
            .map(|raw| strip_data_url(raw))
            .filter(|raw| !raw.is_empty())
            .ok_or(RasterError::Missing(index))?;
        let bytes = BASE64
            .decode(payload)
            .map_err(|source| RasterError::Encoding { index, source })?;
        let image =
            image::load_from_memory(&bytes).map_err(|source| RasterError::Image { index, source })?;
        Ok(SectionBitmap { image })
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use image::{ImageFormat, Rgb, RgbImage};
    use std::io::Cursor;

    /// Base64 PNG of a solid block.
    pub(crate) fn png_payload(width: u32, height: u32) -> String {
        let image = RgbImage::from_pixel(width, height, Rgb([240, 240, 240]));
        let mut bytes = Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(image)
            .write_to(&mut bytes, ImageFormat::Png)
            .expect("png encodes");
        BASE64.encode(bytes.into_inner())
    }
}
