//! Standard PDF font faces used on the label and their advance widths
//!
//! The built-in Helvetica faces carry no metrics inside the PDF, so centered
//! text needs the AFM widths (1/1000 em) to place the start of the line.

use serde::{Deserialize, Serialize};

const PT_TO_MM: f32 = 25.4 / 72.0;

/// Width used for characters outside the printable ASCII table
const FALLBACK_WIDTH: u16 = 556;

#[rustfmt::skip]
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

#[rustfmt::skip]
const HELVETICA_BOLD_WIDTHS: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

/// Font faces available to label text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FontFace {
    /// Part name and rack lines
    HelveticaBold,
    /// Footer caption
    HelveticaOblique,
}

impl FontFace {
    fn widths(self) -> &'static [u16; 95] {
        match self {
            Self::HelveticaBold => &HELVETICA_BOLD_WIDTHS,
            // Oblique shares the upright face's metrics
            Self::HelveticaOblique => &HELVETICA_WIDTHS,
        }
    }

    /// Advance width of one character in 1/1000 em
    pub fn char_width(self, c: char) -> u16 {
        match c {
            ' '..='~' => self.widths()[c as usize - 32],
            _ => FALLBACK_WIDTH,
        }
    }

    /// Rendered width of `text` at `size_pt`, in millimetres
    pub fn text_width_mm(self, text: &str, size_pt: f32) -> f32 {
        let units: u32 = text.chars().map(|c| u32::from(self.char_width(c))).sum();
        units as f32 / 1000.0 * size_pt * PT_TO_MM
    }
}
