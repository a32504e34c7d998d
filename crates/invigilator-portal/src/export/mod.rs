//! Printable agreement packets.
//!
//! Sections are laid out and rasterized by the browser, uploaded as images in packet order,
//! paginated here without splitting any section, and written to an A4 PDF.

pub mod layout;
pub mod pdf;
pub mod raster;
pub mod router;
pub mod sections;
pub mod service;

pub use layout::{paginate, LayoutError, PageGeometry, PagePlan, Placement, SectionMeasure};
pub use pdf::{PdfError, PdfSettings};
pub use raster::{
    RasterError, SectionBitmap, SectionRasterizer, SectionUpload, UploadedSectionRasterizer,
};
pub use router::export_router;
pub use sections::{build_sections, Company, Section, SectionKind, PLACEHOLDER};
pub use service::{export_filename, ExportError, ExportService, ExportedPdf, SectionPacket};
