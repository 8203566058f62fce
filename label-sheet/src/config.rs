//! Label sheet configuration
//!
//! All lengths are millimetres, font sizes are points.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// What to do when one record of a batch cannot be encoded
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// First bad record fails the whole batch
    #[default]
    AbortBatch,
    /// Bad records are left out and reported next to the document
    SkipRecord,
}

impl std::str::FromStr for FailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "abort" | "abort_batch" => Ok(Self::AbortBatch),
            "skip" | "skip_record" => Ok(Self::SkipRecord),
            other => Err(format!("unknown failure policy: {other}")),
        }
    }
}

/// Fixed page geometry and assets for one label sheet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelConfig {
    /// Optional logo; a missing file simply drops the logo block
    pub logo_path: Option<PathBuf>,
    pub page_width_mm: f32,
    pub page_height_mm: f32,
    /// Distance of the print-cut border from every page edge
    pub border_inset_mm: f32,
    /// Border stroke width in points
    pub border_line_width_pt: f32,
    /// Left/right inset of the logo and barcode blocks
    pub content_inset_mm: f32,
    /// Distance from the top edge to the first block
    pub top_margin_mm: f32,
    /// Vertical gap after each block
    pub block_gap_mm: f32,
    pub logo_height_mm: f32,
    pub barcode_height_mm: f32,
    pub qr_size_mm: f32,
    /// QR offset from the left content inset
    pub qr_offset_mm: f32,
    pub text_font_size_pt: f32,
    /// Distance between the part name and rack baselines
    pub text_line_gap_mm: f32,
    pub footer_text: String,
    pub footer_font_size_pt: f32,
    /// Footer baseline distance from the bottom edge
    pub footer_offset_mm: f32,
    pub failure_policy: FailurePolicy,
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            logo_path: Some(PathBuf::from("logo.png")),
            page_width_mm: 100.0,
            page_height_mm: 150.0,
            border_inset_mm: 5.0,
            border_line_width_pt: 1.0,
            content_inset_mm: 10.0,
            top_margin_mm: 10.0,
            block_gap_mm: 7.0,
            logo_height_mm: 20.0,
            barcode_height_mm: 25.0,
            qr_size_mm: 30.0,
            qr_offset_mm: 20.0,
            text_font_size_pt: 12.0,
            text_line_gap_mm: 12.0,
            footer_text: "FUJITEC SA - JEDDAH WAREHOUSE".to_string(),
            footer_font_size_pt: 8.0,
            footer_offset_mm: 10.0,
            failure_policy: FailurePolicy::AbortBatch,
        }
    }
}

impl LabelConfig {
    pub fn with_logo(mut self, path: impl Into<PathBuf>) -> Self {
        self.logo_path = Some(path.into());
        self
    }

    pub fn without_logo(mut self) -> Self {
        self.logo_path = None;
        self
    }

    pub fn with_footer(mut self, text: impl Into<String>) -> Self {
        self.footer_text = text.into();
        self
    }

    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    /// Width available to full-width blocks (logo, barcode)
    pub fn content_width_mm(&self) -> f32 {
        self.page_width_mm - 2.0 * self.content_inset_mm
    }
}
