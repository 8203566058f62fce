//! Fixed page layout of a single label
//!
//! Coordinates follow PDF conventions: millimetres from the bottom-left page
//! corner, frames anchored at their bottom-left corner.

use crate::config::LabelConfig;
use crate::fonts::FontFace;
use crate::record::LabelRecord;
use serde::{Deserialize, Serialize};

/// Axis-aligned box on the page
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub x_mm: f32,
    pub y_mm: f32,
    pub width_mm: f32,
    pub height_mm: f32,
}

impl Frame {
    pub fn new(x_mm: f32, y_mm: f32, width_mm: f32, height_mm: f32) -> Self {
        Self {
            x_mm,
            y_mm,
            width_mm,
            height_mm,
        }
    }

    pub fn top_mm(&self) -> f32 {
        self.y_mm + self.height_mm
    }

    /// Largest box with the image's aspect ratio, centered inside this one
    pub fn fit_contain(&self, width_px: u32, height_px: u32) -> Frame {
        if width_px == 0 || height_px == 0 {
            return *self;
        }
        let aspect = width_px as f32 / height_px as f32;
        let (w, h) = if self.width_mm / self.height_mm > aspect {
            // Height-constrained
            (self.height_mm * aspect, self.height_mm)
        } else {
            // Width-constrained
            (self.width_mm, self.width_mm / aspect)
        };
        Frame::new(
            self.x_mm + (self.width_mm - w) / 2.0,
            self.y_mm + (self.height_mm - h) / 2.0,
            w,
            h,
        )
    }
}

/// Which image a draw operation refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ImageSlot {
    Logo,
    Barcode,
    Qr,
}

/// How an image fills its frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageFit {
    /// Stretched to the exact frame
    Fill,
    /// Aspect ratio preserved, centered in the frame
    Contain,
}

/// One drawing primitive of a page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DrawOp {
    StrokeRect {
        frame: Frame,
        line_width_pt: f32,
    },
    Image {
        slot: ImageSlot,
        frame: Frame,
        fit: ImageFit,
    },
    CenteredText {
        text: String,
        face: FontFace,
        size_pt: f32,
        center_x_mm: f32,
        baseline_y_mm: f32,
    },
}

/// Complete drawing plan of one label page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageLayout {
    pub width_mm: f32,
    pub height_mm: f32,
    pub ops: Vec<DrawOp>,
}

impl PageLayout {
    /// Frame of the image drawn into `slot`, if the page has one
    pub fn image_frame(&self, slot: ImageSlot) -> Option<Frame> {
        self.ops.iter().find_map(|op| match op {
            DrawOp::Image { slot: s, frame, .. } if *s == slot => Some(*frame),
            _ => None,
        })
    }

    /// All text lines with their baseline position
    pub fn texts(&self) -> impl Iterator<Item = (&str, f32, f32)> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::CenteredText {
                text,
                center_x_mm,
                baseline_y_mm,
                ..
            } => Some((text.as_str(), *center_x_mm, *baseline_y_mm)),
            _ => None,
        })
    }
}

/// Lay out one label
///
/// Blocks stack downwards from the top margin, each followed by the block
/// gap. Without a logo the logo block and its gap are left out entirely.
/// The footer does not depend on the running cursor.
pub fn layout_page(record: &LabelRecord, config: &LabelConfig, with_logo: bool) -> PageLayout {
    let width = config.page_width_mm;
    let height = config.page_height_mm;
    let inset = config.content_inset_mm;
    let content_width = config.content_width_mm();
    let gap = config.block_gap_mm;
    let center_x = width / 2.0;

    let mut ops = Vec::with_capacity(8);

    let border = config.border_inset_mm;
    ops.push(DrawOp::StrokeRect {
        frame: Frame::new(border, border, width - 2.0 * border, height - 2.0 * border),
        line_width_pt: config.border_line_width_pt,
    });

    let mut y = height - config.top_margin_mm;

    if with_logo {
        ops.push(DrawOp::Image {
            slot: ImageSlot::Logo,
            frame: Frame::new(
                inset,
                y - config.logo_height_mm,
                content_width,
                config.logo_height_mm,
            ),
            fit: ImageFit::Contain,
        });
        y -= config.logo_height_mm + gap;
    }

    ops.push(DrawOp::Image {
        slot: ImageSlot::Barcode,
        frame: Frame::new(
            inset,
            y - config.barcode_height_mm,
            content_width,
            config.barcode_height_mm,
        ),
        fit: ImageFit::Fill,
    });
    y -= config.barcode_height_mm + gap;

    ops.push(DrawOp::Image {
        slot: ImageSlot::Qr,
        frame: Frame::new(
            inset + config.qr_offset_mm,
            y - config.qr_size_mm,
            config.qr_size_mm,
            config.qr_size_mm,
        ),
        fit: ImageFit::Fill,
    });
    y -= config.qr_size_mm + gap;

    ops.push(DrawOp::CenteredText {
        text: format!("Part: {}", record.part_name),
        face: FontFace::HelveticaBold,
        size_pt: config.text_font_size_pt,
        center_x_mm: center_x,
        baseline_y_mm: y,
    });
    y -= config.text_line_gap_mm;
    ops.push(DrawOp::CenteredText {
        text: format!("Rack: {}", record.rack),
        face: FontFace::HelveticaBold,
        size_pt: config.text_font_size_pt,
        center_x_mm: center_x,
        baseline_y_mm: y,
    });

    ops.push(DrawOp::CenteredText {
        text: config.footer_text.clone(),
        face: FontFace::HelveticaOblique,
        size_pt: config.footer_font_size_pt,
        center_x_mm: center_x,
        baseline_y_mm: config.footer_offset_mm,
    });

    PageLayout {
        width_mm: width,
        height_mm: height,
        ops,
    }
}
