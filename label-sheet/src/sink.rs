//! Output sink: persists generated sheets on disk

use crate::error::LabelResult;
use crate::generator::GeneratedDocument;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

/// Write `document` into `dir` under its generated file name
///
/// The directory is created when missing. Bytes go to a temporary file in
/// the same directory first and are renamed into place, so readers never
/// observe a half-written sheet.
pub fn write_document(dir: &Path, document: &GeneratedDocument) -> LabelResult<PathBuf> {
    fs::create_dir_all(dir)?;
    let target = dir.join(&document.file_name);

    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(&document.bytes)?;
    tmp.flush()?;
    tmp.persist(&target).map_err(|e| e.error)?;

    info!(path = %target.display(), bytes = document.bytes.len(), "label sheet written");
    Ok(target)
}
