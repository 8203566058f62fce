//! Drawing surfaces for label pages
//!
//! Supports:
//! - PDF output via printpdf
//! - In-memory recording (inspection, dry runs)

mod pdf;
mod recording;

pub use pdf::PdfSurface;
pub use recording::{RecordingSurface, SurfaceOp};

use crate::error::LabelResult;
use crate::fonts::FontFace;
use crate::layout::Frame;
use image::DynamicImage;

/// Trait for page drawing backends
///
/// Calls arrive strictly as `begin_page`, drawing primitives, `end_page`,
/// repeated once per label.
pub trait LabelSurface {
    /// Open a new page; following primitives draw onto it
    fn begin_page(&mut self, width_mm: f32, height_mm: f32) -> LabelResult<()>;

    /// Stroke the outline of `frame`
    fn stroke_rect(&mut self, frame: Frame, line_width_pt: f32) -> LabelResult<()>;

    /// Draw `image` stretched to `frame`
    fn draw_image(&mut self, image: &DynamicImage, frame: Frame) -> LabelResult<()>;

    /// Draw one line of text horizontally centered on `center_x_mm`
    fn draw_centered_text(
        &mut self,
        text: &str,
        face: FontFace,
        size_pt: f32,
        center_x_mm: f32,
        baseline_y_mm: f32,
    ) -> LabelResult<()>;

    /// Commit the current page
    fn end_page(&mut self) -> LabelResult<()>;
}
