//! Surface that records primitives instead of rendering them

use super::LabelSurface;
use crate::error::{LabelError, LabelResult};
use crate::fonts::FontFace;
use crate::layout::Frame;
use image::{DynamicImage, GenericImageView};

/// One recorded drawing call
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceOp {
    BeginPage {
        width_mm: f32,
        height_mm: f32,
    },
    Rect {
        frame: Frame,
        line_width_pt: f32,
    },
    Image {
        frame: Frame,
        width_px: u32,
        height_px: u32,
    },
    Text {
        text: String,
        face: FontFace,
        size_pt: f32,
        center_x_mm: f32,
        baseline_y_mm: f32,
    },
    EndPage,
}

/// Records every primitive in call order
#[derive(Debug, Default)]
pub struct RecordingSurface {
    ops: Vec<SurfaceOp>,
    page_open: bool,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ops(&self) -> &[SurfaceOp] {
        &self.ops
    }

    /// Number of committed pages
    pub fn page_count(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| matches!(op, SurfaceOp::EndPage))
            .count()
    }

    /// Recorded primitives grouped per page
    pub fn pages(&self) -> Vec<&[SurfaceOp]> {
        self.ops
            .split_inclusive(|op| matches!(op, SurfaceOp::EndPage))
            .filter(|page| matches!(page.last(), Some(SurfaceOp::EndPage)))
            .collect()
    }

    fn require_page(&self) -> LabelResult<()> {
        if self.page_open {
            Ok(())
        } else {
            Err(LabelError::Pdf("drawing outside of a page".to_string()))
        }
    }
}

impl LabelSurface for RecordingSurface {
    fn begin_page(&mut self, width_mm: f32, height_mm: f32) -> LabelResult<()> {
        if self.page_open {
            return Err(LabelError::Pdf("previous page not committed".to_string()));
        }
        self.page_open = true;
        self.ops.push(SurfaceOp::BeginPage {
            width_mm,
            height_mm,
        });
        Ok(())
    }

    fn stroke_rect(&mut self, frame: Frame, line_width_pt: f32) -> LabelResult<()> {
        self.require_page()?;
        self.ops.push(SurfaceOp::Rect {
            frame,
            line_width_pt,
        });
        Ok(())
    }

    fn draw_image(&mut self, image: &DynamicImage, frame: Frame) -> LabelResult<()> {
        self.require_page()?;
        let (width_px, height_px) = image.dimensions();
        self.ops.push(SurfaceOp::Image {
            frame,
            width_px,
            height_px,
        });
        Ok(())
    }

    fn draw_centered_text(
        &mut self,
        text: &str,
        face: FontFace,
        size_pt: f32,
        center_x_mm: f32,
        baseline_y_mm: f32,
    ) -> LabelResult<()> {
        self.require_page()?;
        self.ops.push(SurfaceOp::Text {
            text: text.to_string(),
            face,
            size_pt,
            center_x_mm,
            baseline_y_mm,
        });
        Ok(())
    }

    fn end_page(&mut self) -> LabelResult<()> {
        self.require_page()?;
        self.page_open = false;
        self.ops.push(SurfaceOp::EndPage);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_pages() {
        let mut s = RecordingSurface::new();
        s.begin_page(100.0, 150.0).unwrap();
        s.stroke_rect(Frame::new(5.0, 5.0, 90.0, 140.0), 1.0).unwrap();
        s.end_page().unwrap();
        s.begin_page(100.0, 150.0).unwrap();
        s.end_page().unwrap();

        assert_eq!(s.page_count(), 2);
        assert_eq!(s.pages()[0].len(), 3);
        assert_eq!(s.pages()[1].len(), 2);
    }

    #[test]
    fn test_drawing_without_page_fails() {
        let mut s = RecordingSurface::new();
        assert!(s.stroke_rect(Frame::new(0.0, 0.0, 1.0, 1.0), 1.0).is_err());
        assert!(s.end_page().is_err());
    }
}
