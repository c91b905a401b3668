// Preview layout: one drawing surface per page, sized at a fixed scale.
// Pixel rasterization is left to whatever displays the surfaces.

use crate::extraction::PageSize;

pub const PREVIEW_SCALE: f32 = 1.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreviewPage {
    pub page_number: u32,
    pub width: u32,
    pub height: u32,
}

pub fn layout(pages: &[PageSize], scale: f32) -> Vec<PreviewPage> {
    pages
        .iter()
        .map(|page| PreviewPage {
            page_number: page.page_number,
            width: (page.width * scale).round() as u32,
            height: (page.height * scale).round() as u32,
        })
        .collect()
}
