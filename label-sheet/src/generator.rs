//! Label sheet generation
//!
//! One page per record: border, optional logo, Code-128 barcode, QR code,
//! part name, rack and footer. Per-record rasters are owned by the loop body
//! and dropped before the next record starts, whatever the outcome.

use crate::config::{FailurePolicy, LabelConfig};
use crate::error::{LabelError, LabelResult};
use crate::layout::{DrawOp, ImageFit, ImageSlot, PageLayout, layout_page};
use crate::record::{LabelBatch, LabelRecord};
use crate::surface::{LabelSurface, PdfSurface};
use crate::symbol::{render_code128, render_qr};
use image::{DynamicImage, GenericImageView};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

/// Upper bound for generated file names, in bytes
pub const MAX_FILE_NAME_BYTES: usize = 200;

const FILE_NAME_SUFFIX: &str = "_labels.pdf";
const DOCUMENT_TITLE: &str = "Part Labels";

/// A record left out under [`FailurePolicy::SkipRecord`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedRecord {
    pub identifier: String,
    pub reason: String,
}

/// Outcome of drawing a batch onto a surface
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderReport {
    pub pages: usize,
    /// Identifiers that got a page, in page order
    pub rendered: Vec<String>,
    pub skipped: Vec<SkippedRecord>,
}

/// Finished label sheet
#[derive(Debug, Clone)]
pub struct GeneratedDocument {
    /// `<id1>,<id2>,...,<idN>_labels.pdf`
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub pages: usize,
    pub skipped: Vec<SkippedRecord>,
}

/// Transient symbol rasters of one record
struct RecordRasters {
    barcode: DynamicImage,
    qr: DynamicImage,
}

impl RecordRasters {
    fn encode(record: &LabelRecord) -> LabelResult<Self> {
        let barcode = render_code128(&record.identifier)?;
        let qr = render_qr(&record.qr_payload(), &record.identifier)?;
        Ok(Self {
            barcode: DynamicImage::ImageLuma8(barcode),
            qr: DynamicImage::ImageLuma8(qr),
        })
    }

    fn get(&self, slot: ImageSlot) -> Option<&DynamicImage> {
        match slot {
            ImageSlot::Barcode => Some(&self.barcode),
            ImageSlot::Qr => Some(&self.qr),
            ImageSlot::Logo => None,
        }
    }
}

/// Replace characters that cannot appear in a file name
fn sanitize_file_component(identifier: &str) -> String {
    identifier
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect()
}

fn truncate_to_bytes(s: &str, max: usize) -> &str {
    let mut end = max.min(s.len());
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

/// Deterministic file name for a batch
///
/// Identifiers are joined with commas. When that gets longer than
/// [`MAX_FILE_NAME_BYTES`] the list is cut at an identifier boundary and
/// `+N` names the number of identifiers left out.
pub fn document_file_name(batch: &LabelBatch) -> String {
    file_name_for(batch.iter().map(|r| r.identifier.as_str()))
}

fn file_name_for<'a>(identifiers: impl IntoIterator<Item = &'a str>) -> String {
    let ids: Vec<String> = identifiers
        .into_iter()
        .map(sanitize_file_component)
        .collect();

    let full = ids.join(",");
    if full.len() + FILE_NAME_SUFFIX.len() <= MAX_FILE_NAME_BYTES {
        return format!("{full}{FILE_NAME_SUFFIX}");
    }

    let mut name = String::new();
    let mut used = 0;
    for id in &ids {
        let marker_len = format!("+{}", ids.len() - used - 1).len();
        let sep = usize::from(used > 0);
        if name.len() + sep + id.len() + marker_len + FILE_NAME_SUFFIX.len() > MAX_FILE_NAME_BYTES
        {
            break;
        }
        if used > 0 {
            name.push(',');
        }
        name.push_str(id);
        used += 1;
    }

    if used == 0 {
        let marker_len = format!("+{}", ids.len() - 1).len();
        let budget = MAX_FILE_NAME_BYTES - FILE_NAME_SUFFIX.len() - marker_len;
        name = truncate_to_bytes(&ids[0], budget).to_string();
        used = 1;
    }

    let omitted = ids.len() - used;
    if omitted > 0 {
        name.push_str(&format!("+{omitted}"));
    }
    format!("{name}{FILE_NAME_SUFFIX}")
}

/// Turns label batches into printable sheets
#[derive(Debug, Clone, Default)]
pub struct LabelSheetGenerator {
    config: LabelConfig,
}

impl LabelSheetGenerator {
    pub fn new(config: LabelConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LabelConfig {
        &self.config
    }

    /// Load the logo asset
    ///
    /// A missing or unconfigured logo is not an error; an unreadable or
    /// undecodable one is.
    pub fn load_logo(&self) -> LabelResult<Option<DynamicImage>> {
        let Some(path) = self.config.logo_path.as_deref() else {
            return Ok(None);
        };
        if !path.is_file() {
            debug!(path = %path.display(), "logo not found, skipping logo block");
            return Ok(None);
        }

        let bytes = std::fs::read(path)?;
        let logo = image::load_from_memory(&bytes)?;
        debug!(path = %path.display(), dimensions = ?logo.dimensions(), "logo loaded");
        Ok(Some(logo))
    }

    /// Generate the PDF label sheet for `batch`
    #[instrument(skip(self, batch), fields(records = batch.len()))]
    pub fn generate(&self, batch: &LabelBatch) -> LabelResult<GeneratedDocument> {
        if batch.is_empty() {
            return Err(LabelError::EmptyBatch);
        }

        let logo = self.load_logo()?;
        let mut surface = PdfSurface::new(DOCUMENT_TITLE);
        let report = self.render(batch, logo.as_ref(), &mut surface)?;
        let bytes = surface.finish()?;
        // Named after the pages actually in the document
        let file_name = file_name_for(report.rendered.iter().map(String::as_str));

        info!(
            file_name = %file_name,
            pages = report.pages,
            skipped = report.skipped.len(),
            bytes = bytes.len(),
            "label sheet generated"
        );

        Ok(GeneratedDocument {
            file_name,
            bytes,
            pages: report.pages,
            skipped: report.skipped,
        })
    }

    /// Draw every record of `batch` onto `surface`, one page each
    pub fn render<S: LabelSurface>(
        &self,
        batch: &LabelBatch,
        logo: Option<&DynamicImage>,
        surface: &mut S,
    ) -> LabelResult<RenderReport> {
        let mut report = RenderReport::default();

        for record in batch {
            let rasters = match RecordRasters::encode(record) {
                Ok(rasters) => rasters,
                Err(e)
                    if e.is_record_error()
                        && self.config.failure_policy == FailurePolicy::SkipRecord =>
                {
                    warn!(identifier = %record.identifier, error = %e, "skipping record");
                    report.skipped.push(SkippedRecord {
                        identifier: record.identifier.clone(),
                        reason: e.to_string(),
                    });
                    continue;
                }
                Err(e) => return Err(e),
            };

            let layout = layout_page(record, &self.config, logo.is_some());
            draw_page(surface, &layout, &rasters, logo)?;
            report.pages += 1;
            report.rendered.push(record.identifier.clone());
        }

        if report.pages == 0 {
            return Err(LabelError::EmptyBatch);
        }
        Ok(report)
    }
}

/// Replay a page layout onto a surface
fn draw_page<S: LabelSurface>(
    surface: &mut S,
    layout: &PageLayout,
    rasters: &RecordRasters,
    logo: Option<&DynamicImage>,
) -> LabelResult<()> {
    surface.begin_page(layout.width_mm, layout.height_mm)?;

    for op in &layout.ops {
        match op {
            DrawOp::StrokeRect {
                frame,
                line_width_pt,
            } => surface.stroke_rect(*frame, *line_width_pt)?,
            DrawOp::Image { slot, frame, fit } => {
                let image = match slot {
                    ImageSlot::Logo => logo,
                    other => rasters.get(*other),
                };
                let Some(image) = image else {
                    continue;
                };
                let frame = match fit {
                    ImageFit::Fill => *frame,
                    ImageFit::Contain => {
                        let (w, h) = image.dimensions();
                        frame.fit_contain(w, h)
                    }
                };
                surface.draw_image(image, frame)?;
            }
            DrawOp::CenteredText {
                text,
                face,
                size_pt,
                center_x_mm,
                baseline_y_mm,
            } => surface.draw_centered_text(text, *face, *size_pt, *center_x_mm, *baseline_y_mm)?,
        }
    }

    surface.end_page()
}
