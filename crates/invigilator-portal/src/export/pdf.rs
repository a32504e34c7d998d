use std::path::PathBuf;

use genpdf::elements::{Image as PdfImage, PageBreak};
use genpdf::{Document, Element, Margins, PaperSize, SimplePageDecorator};
use image::{DynamicImage, ImageFormat};
use tempfile::NamedTempFile;

use super::layout::{PageGeometry, PagePlan};
use super::raster::SectionBitmap;
use crate::config::ExportConfig;

const MM_PER_INCH: f64 = 25.4;

/// Font lookup and page geometry for packet rendering, plus the cap on uploaded bitmaps.
#[derive(Debug, Clone)]
pub struct PdfSettings {
    pub font_dir: PathBuf,
    pub font_family: String,
    pub geometry: PageGeometry,
    pub upload_limit_bytes: usize,
}

impl PdfSettings {
    pub fn from_config(config: &ExportConfig) -> Self {
        Self {
            font_dir: config.font_dir.clone(),
            font_family: config.font_family.clone(),
            geometry: PageGeometry::A4,
            upload_limit_bytes: config.upload_limit_bytes,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PdfError {
    #[error("failed to load font family '{family}': {source}")]
    Font {
        family: String,
        source: genpdf::error::Error,
    },
    #[error("no bitmap for section {0}")]
    MissingBitmap(usize),
    #[error("failed to stage section image: {0}")]
    Staging(#[from] std::io::Error),
    #[error("failed to encode section image: {0}")]
    Encode(#[from] image::ImageError),
    #[error("failed to render pdf: {0}")]
    Render(genpdf::error::Error),
}

/// Resolution at which a bitmap spans the content width, lowered when needed so that a section
/// taller than one page still fits inside the margins.
fn placement_dpi(geometry: &PageGeometry, bitmap: &SectionBitmap) -> f64 {
    let measure = bitmap.measure();
    let by_width = f64::from(measure.width_px) / (geometry.content_width_mm() / MM_PER_INCH);
    let usable_height = geometry.height_mm - 2.0 * geometry.margin_mm;
    let by_height = f64::from(measure.height_px) / (usable_height / MM_PER_INCH);
    by_width.max(by_height)
}

// genpdf bundles its own `image` release, so bitmaps cross over as PNG files.
fn stage_png(bitmap: &SectionBitmap) -> Result<NamedTempFile, PdfError> {
    let mut file = NamedTempFile::new()?;
    let flattened = DynamicImage::ImageRgb8(bitmap.image.to_rgb8());
    flattened.write_to(file.as_file_mut(), ImageFormat::Png)?;
    Ok(file)
}

/// Write the planned pages as a PDF, one image per section.
pub fn render_pdf(
    settings: &PdfSettings,
    title: &str,
    plan: &PagePlan,
    bitmaps: &[SectionBitmap],
) -> Result<Vec<u8>, PdfError> {
    let family = genpdf::fonts::from_files(&settings.font_dir, &settings.font_family, None)
        .map_err(|source| PdfError::Font {
            family: settings.font_family.clone(),
            source,
        })?;

    let geometry = settings.geometry;
    let mut doc = Document::new(family);
    doc.set_title(title);
    doc.set_paper_size(PaperSize::A4);
    let mut decorator = SimplePageDecorator::new();
    decorator.set_margins(Margins::trbl(
        geometry.margin_mm,
        geometry.margin_mm,
        geometry.margin_mm,
        geometry.margin_mm,
    ));
    doc.set_page_decorator(decorator);

    // Temp files must outlive `render`.
    let mut staged = Vec::with_capacity(plan.placements.len());
    let mut previous_page = None;
    for placement in &plan.placements {
        let bitmap = bitmaps
            .get(placement.section)
            .ok_or(PdfError::MissingBitmap(placement.section))?;

        let first_on_page = previous_page != Some(placement.page);
        if first_on_page && previous_page.is_some() {
            doc.push(PageBreak::new());
        }

        let file = stage_png(bitmap)?;
        let mut element = PdfImage::from_path(file.path()).map_err(PdfError::Render)?;
        element.set_dpi(placement_dpi(&geometry, bitmap));
        let top_gap = if first_on_page { 0.0 } else { geometry.gap_mm };
        doc.push(element.padded(Margins::trbl(top_gap, 0.0, 0.0, 0.0)));

        staged.push(file);
        previous_page = Some(placement.page);
    }

    let mut out = Vec::new();
    doc.render(&mut out).map_err(PdfError::Render)?;
    drop(staged);
    Ok(out)
}


#[cfg(test)]
mod tests {
    use super::fixtures::{page_objects, system_fonts};
    use super::*;
    use crate::export::layout::paginate;
    use image::RgbImage;

    fn bitmap(width: u32, height: u32) -> SectionBitmap {
        SectionBitmap {
            image: DynamicImage::ImageRgb8(RgbImage::new(width, height)),
        }
    }

    #[test]
    fn dpi_spans_content_width() {
        let geometry = PageGeometry::A4;
        let dpi = placement_dpi(&geometry, &bitmap(1980, 1000));
        let rendered_width_mm = 1980.0 / dpi * MM_PER_INCH;
        assert!((rendered_width_mm - geometry.content_width_mm()).abs() < 1e-9);
    }

    #[test]
    fn dpi_shrinks_sections_taller_than_a_page() {
        let geometry = PageGeometry::A4;
        let dpi = placement_dpi(&geometry, &bitmap(198, 600));
        let rendered_height_mm = 600.0 / dpi * MM_PER_INCH;
        assert!(rendered_height_mm <= geometry.height_mm - 2.0 * geometry.margin_mm + 1e-9);
    }

    #[test]
    fn missing_fonts_are_reported() {
        let settings = PdfSettings {
            font_dir: PathBuf::from("/nonexistent/invigilator-fonts"),
            font_family: "NoSuchFamily".to_string(),
            geometry: PageGeometry::A4,
            upload_limit_bytes: 1024,
        };
        let plan = PagePlan {
            page_count: 0,
            placements: Vec::new(),
        };
        let result = render_pdf(&settings, "packet", &plan, &[]);
        assert!(matches!(result, Err(PdfError::Font { .. })));
    }

    fn render_sections(sections: &[(u32, u32)]) -> Option<(PagePlan, Vec<u8>)> {
        let Some(fonts) = system_fonts() else {
            eprintln!("no Liberation Sans or DejaVu Sans fonts installed; skipping render");
            return None;
        };
        let settings = PdfSettings {
            font_dir: fonts.dir.clone(),
            font_family: fonts.family.clone(),
            geometry: PageGeometry::A4,
            upload_limit_bytes: 1024,
        };
        let bitmaps: Vec<SectionBitmap> = sections
            .iter()
            .map(|&(width, height)| bitmap(width, height))
            .collect();
        let measures: Vec<_> = bitmaps.iter().map(SectionBitmap::measure).collect();
        let plan = paginate(&settings.geometry, &measures).expect("plan");
        let bytes =
            render_pdf(&settings, "Asha Verma-form.pdf", &plan, &bitmaps).expect("renders");
        Some((plan, bytes))
    }

    #[test]
    fn renders_one_page_per_planned_page() {
        let Some((plan, bytes)) = render_sections(&[(198, 150); 7]) else {
            return;
        };
        assert_eq!(plan.page_count, 7);
        assert!(bytes.starts_with(b"%PDF"));
        assert_eq!(page_objects(&bytes), plan.page_count);
    }

    #[test]
    fn sections_sharing_a_page_do_not_add_pages() {
        let Some((plan, bytes)) = render_sections(&[(198, 100); 7]) else {
            return;
        };
        assert_eq!(plan.page_count, 4);
        assert_eq!(plan.page(0).count(), 2);
        assert!(bytes.starts_with(b"%PDF"));
        assert_eq!(page_objects(&bytes), plan.page_count);
    }

    #[test]
    fn oversize_section_renders_on_its_own_page() {
        let Some((plan, bytes)) = render_sections(&[(198, 40), (198, 600), (198, 40)]) else {
            return;
        };
        assert_eq!(plan.page_count, 3);
        assert_eq!(page_objects(&bytes), 3);
    }

    #[test]
    fn page_objects_ignore_the_page_tree() {
        let pdf = b"<</Type/Pages/Kids[3 0 R]>> <</Type /Page/Parent 2 0 R>> <</Type/Page>>";
        assert_eq!(page_objects(pdf), 2);
    }
}
