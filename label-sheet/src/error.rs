//! Error types for the label sheet library

use thiserror::Error;

/// Rejection of a raw input line before any document is produced
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    /// Line did not split into exactly three comma-separated fields
    #[error("line {line}: expected 3 fields (Barcode, Part Name, Rack), found {found}")]
    FieldCount { line: usize, found: usize },

    /// One of the three fields is blank after trimming
    #[error("line {line}: {field} must not be empty")]
    EmptyField { line: usize, field: &'static str },

    /// Message contained no lines at all
    #[error("no label lines found")]
    Empty,
}

/// Label generation error types
#[derive(Debug, Error)]
pub enum LabelError {
    /// Malformed input text
    #[error(transparent)]
    Format(#[from] FormatError),

    /// Identifier cannot be represented as a Code-128 symbol
    #[error("cannot encode '{identifier}' as Code-128: {reason}")]
    Encoding { identifier: String, reason: String },

    /// QR payload cannot be represented (too long for any QR version)
    #[error("cannot encode QR payload for '{identifier}': {reason}")]
    EncodingQr { identifier: String, reason: String },

    /// IO error reading the logo or writing the output
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Logo asset exists but could not be decoded
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// PDF document could not be built or serialized
    #[error("PDF error: {0}")]
    Pdf(String),

    /// Nothing left to print
    #[error("label batch is empty")]
    EmptyBatch,
}

impl LabelError {
    /// Whether this error concerns a single record rather than the whole batch
    pub fn is_record_error(&self) -> bool {
        matches!(self, Self::Encoding { .. } | Self::EncodingQr { .. })
    }
}

/// Result type for label operations
pub type LabelResult<T> = Result<T, LabelError>;
