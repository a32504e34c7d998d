use serde::Serialize;

/// Page dimensions in millimetres.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageGeometry {
    pub width_mm: f64,
    pub height_mm: f64,
    pub margin_mm: f64,
    pub gap_mm: f64,
}

impl PageGeometry {
    pub const A4: Self = Self {
        width_mm: 210.0,
        height_mm: 297.0,
        margin_mm: 6.0,
        gap_mm: 5.0,
    };

    pub fn content_width_mm(&self) -> f64 {
        self.width_mm - 2.0 * self.margin_mm
    }

    /// Lowest y a section may end at.
    pub fn bottom_limit_mm(&self) -> f64 {
        self.height_mm - self.margin_mm
    }

    /// Height of a bitmap scaled to the content width.
    pub fn scaled_height_mm(&self, width_px: u32, height_px: u32) -> f64 {
        f64::from(height_px) * self.content_width_mm() / f64::from(width_px)
    }
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self::A4
    }
}

/// Pixel size of a rasterized section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionMeasure {
    pub width_px: u32,
    pub height_px: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Placement {
    pub section: usize,
    pub page: usize,
    pub y_mm: f64,
    pub height_mm: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PagePlan {
    pub page_count: usize,
    pub placements: Vec<Placement>,
}

impl PagePlan {
    /// Placements of one page, top to bottom.
    pub fn page(&self, page: usize) -> impl Iterator<Item = &Placement> {
        self.placements.iter().filter(move |p| p.page == page)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LayoutError {
    #[error("section {0} has no pixels to place")]
    EmptySection(usize),
}

/// Place sections top to bottom without splitting any of them.
///
/// A section that does not fit below the running offset starts a new page, unless the offset is
/// still at the top margin, in which case it is placed even when taller than the page.
pub fn paginate(
    geometry: &PageGeometry,
    measures: &[SectionMeasure],
) -> Result<PagePlan, LayoutError> {
    let mut placements = Vec::with_capacity(measures.len());
    let mut page = 0;
    let mut y = geometry.margin_mm;
    let mut at_top = true;

    for (index, measure) in measures.iter().enumerate() {
        if measure.width_px == 0 || measure.height_px == 0 {
            return Err(LayoutError::EmptySection(index));
        }
        let height = geometry.scaled_height_mm(measure.width_px, measure.height_px);

        if y + height > geometry.bottom_limit_mm() && !at_top {
            page += 1;
            y = geometry.margin_mm;
        }

        placements.push(Placement {
            section: index,
            page,
            y_mm: y,
            height_mm: height,
        });
        y += height + geometry.gap_mm;
        at_top = false;

        let is_last = index + 1 == measures.len();
        if !is_last && y > geometry.bottom_limit_mm() {
            page += 1;
            y = geometry.margin_mm;
            at_top = true;
        }
    }

    Ok(PagePlan {
        page_count: if placements.is_empty() { 0 } else { page + 1 },
        placements,
    })
}
