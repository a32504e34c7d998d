use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use super::layout::{paginate, LayoutError, PageGeometry, PagePlan};
use super::pdf::{render_pdf, PdfError, PdfSettings};
use super::raster::{RasterError, SectionRasterizer, RASTER_SCALE};
use super::sections::{build_sections, Section};
use crate::applications::domain::{ApplicationRecord, RecordId};
use crate::applications::repository::{ApplicationRepository, RepositoryError};
use crate::exam::repository::ExamConfigRepository;

const FALLBACK_FILENAME: &str = "candidate-form.pdf";

/// Attachment name for a candidate's packet: `{name}-form.pdf`.
pub fn export_filename(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .filter(|c| !c.is_control() && !matches!(c, '/' | '\\' | '"'))
        .collect();
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        FALLBACK_FILENAME.to_string()
    } else {
        format!("{cleaned}-form.pdf")
    }
}

/// Section content plus what the browser needs to rasterize it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionPacket {
    pub filename: String,
    pub raster_scale: f64,
    pub page: PageGeometry,
    pub sections: Vec<Section>,
}

#[derive(Debug, Clone)]
pub struct ExportedPdf {
    pub filename: String,
    pub plan: PagePlan,
    pub bytes: Vec<u8>,
}

/// Agreement packet export: merge, rasterize, paginate, write.
pub struct ExportService {
    applications: Arc<dyn ApplicationRepository>,
    exams: Arc<dyn ExamConfigRepository>,
    pdf: PdfSettings,
}

impl ExportService {
    pub fn new(
        applications: Arc<dyn ApplicationRepository>,
        exams: Arc<dyn ExamConfigRepository>,
        pdf: PdfSettings,
    ) -> Self {
        Self {
            applications,
            exams,
            pdf,
        }
    }

    /// Largest accepted section upload body, in bytes.
    pub fn upload_limit(&self) -> usize {
        self.pdf.upload_limit_bytes
    }

    fn record(&self, id: &RecordId) -> Result<ApplicationRecord, ExportError> {
        self.applications.fetch(id)?.ok_or(ExportError::NotFound)
    }

    fn sections(&self, record: &ApplicationRecord) -> Result<Vec<Section>, ExportError> {
        let exam = self.exams.current()?;
        Ok(build_sections(&record.profile, exam.as_ref()))
    }

    pub fn section_packet(&self, id: &RecordId) -> Result<SectionPacket, ExportError> {
        let record = self.record(id)?;
        Ok(SectionPacket {
            filename: export_filename(&record.profile.name),
            raster_scale: RASTER_SCALE,
            page: self.pdf.geometry,
            sections: self.sections(&record)?,
        })
    }

    /// Build the packet PDF. Any section that fails to rasterize aborts the whole export.
    pub fn export(
        &self,
        id: &RecordId,
        rasterizer: &dyn SectionRasterizer,
    ) -> Result<ExportedPdf, ExportError> {
        let record = self.record(id)?;
        let sections = self.sections(&record)?;

        let bitmaps = sections
            .iter()
            .enumerate()
            .map(|(index, section)| rasterizer.rasterize(index, section))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|err| {
                warn!(application = %id, error = %err, "section rasterization failed");
                ExportError::Raster(err)
            })?;

        let measures: Vec<_> = bitmaps.iter().map(|bitmap| bitmap.measure()).collect();
        let plan = paginate(&self.pdf.geometry, &measures)?;

        let filename = export_filename(&record.profile.name);
        let bytes = render_pdf(&self.pdf, &filename, &plan, &bitmaps)?;
        info!(
            application = %id,
            pages = plan.page_count,
            size = bytes.len(),
            "agreement packet exported"
        );

        Ok(ExportedPdf {
            filename,
            plan,
            bytes,
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("User not found")]
    NotFound,
    #[error("Failed to generate PDF: {0}")]
    Raster(RasterError),
    #[error("Failed to generate PDF: {0}")]
    Layout(#[from] LayoutError),
    #[error(transparent)]
    Pdf(#[from] PdfError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error("export worker failed: {0}")]
    Worker(String),
}
