//! # label-sheet
//!
//! Printable part-label sheets: one 100 x 150 mm PDF page per record with a
//! logo, a Code-128 barcode, a QR code, the part name and the rack.
//!
//! ## Scope
//!
//! This crate handles WHAT goes on a label and HOW it is drawn:
//! - Input line parsing (`identifier, part name, rack`)
//! - Code-128 / QR rasterizing
//! - Fixed page layout
//! - PDF output (printpdf) behind the `LabelSurface` trait
//!
//! Delivery (chat bot, files) stays in application code:
//! - Telegram webhook → label-bot
//! - Offline rendering → label-cli
//!
//! ## Example
//!
//! ```no_run
//! use label_sheet::{LabelBatch, LabelConfig, LabelSheetGenerator};
//!
//! let batch = LabelBatch::parse("123456789012, Motor Gear, R12")?;
//! let generator = LabelSheetGenerator::new(LabelConfig::default());
//! let document = generator.generate(&batch)?;
//! assert_eq!(document.file_name, "123456789012_labels.pdf");
//! # Ok::<(), label_sheet::LabelError>(())
//! ```

mod config;
mod error;
mod fonts;
mod generator;
mod layout;
mod record;
mod sink;
mod surface;
mod symbol;

// Re-exports
pub use config::{FailurePolicy, LabelConfig};
pub use error::{FormatError, LabelError, LabelResult};
pub use fonts::FontFace;
pub use generator::{
    GeneratedDocument, LabelSheetGenerator, MAX_FILE_NAME_BYTES, RenderReport, SkippedRecord,
    document_file_name,
};
pub use layout::{DrawOp, Frame, ImageFit, ImageSlot, PageLayout, layout_page};
pub use record::{LabelBatch, LabelRecord};
pub use sink::write_document;
pub use surface::{LabelSurface, PdfSurface, RecordingSurface, SurfaceOp};
pub use symbol::{
    BARCODE_MODULE_PX, BARCODE_QUIET_MODULES, CODE128_MAX_LEN, QR_MODULE_PX, QR_QUIET_MODULES,
    code128_modules, render_code128, render_qr,
};
