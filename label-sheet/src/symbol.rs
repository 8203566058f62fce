//! Machine-readable symbol rasterizers
//!
//! Both renderers are pure functions from text to an 8-bit greyscale raster.
//! Rasters live only in memory; the caller drops them once they are drawn.

use crate::error::{LabelError, LabelResult};
use barcoders::sym::code128::Code128;
use image::{GrayImage, Luma};
use qrcode::{Color, EcLevel, QrCode};
use tracing::instrument;

/// Longest identifier accepted for the linear barcode
pub const CODE128_MAX_LEN: usize = 80;

/// Pixels per barcode module
pub const BARCODE_MODULE_PX: u32 = 3;
/// Raster height of the barcode; stretched to the block height when drawn
pub const BARCODE_HEIGHT_PX: u32 = 300;
/// Quiet zone on each side of the barcode, in modules
pub const BARCODE_QUIET_MODULES: u32 = 10;

/// Pixels per QR module
pub const QR_MODULE_PX: u32 = 10;
/// Quiet zone around the QR symbol, in modules
pub const QR_QUIET_MODULES: u32 = 4;

const CHARSET_B: char = 'Ɓ';
const CHARSET_C: char = 'Ć';

const BLACK: Luma<u8> = Luma([0]);
const WHITE: Luma<u8> = Luma([255]);

/// Prefix the identifier with the Code-128 character set it should use
///
/// Even-length all-digit identifiers use set C (two digits per symbol),
/// everything else printable uses set B.
fn code128_data(identifier: &str) -> Result<String, String> {
    if identifier.is_empty() {
        return Err("identifier is empty".to_string());
    }
    if let Some(c) = identifier.chars().find(|c| !(' '..='~').contains(c)) {
        return Err(format!("unsupported character {c:?}"));
    }
    let len = identifier.chars().count();
    if len > CODE128_MAX_LEN {
        return Err(format!("identifier is {len} characters, limit is {CODE128_MAX_LEN}"));
    }

    let numeric = identifier.bytes().all(|b| b.is_ascii_digit());
    let charset = if numeric && identifier.len() % 2 == 0 {
        CHARSET_C
    } else {
        CHARSET_B
    };
    Ok(format!("{charset}{identifier}"))
}

/// Encode an identifier into Code-128 modules (1 = bar, 0 = space)
///
/// The result covers start code, data, check symbol and stop pattern,
/// without quiet zones.
pub fn code128_modules(identifier: &str) -> LabelResult<Vec<u8>> {
    let encoding_error = |reason: String| LabelError::Encoding {
        identifier: identifier.to_string(),
        reason,
    };

    let data = code128_data(identifier).map_err(encoding_error)?;
    let symbol = Code128::new(data).map_err(|e| encoding_error(e.to_string()))?;
    Ok(symbol.encode())
}

/// Render an identifier as a Code-128 raster
#[instrument(level = "debug")]
pub fn render_code128(identifier: &str) -> LabelResult<GrayImage> {
    let modules = code128_modules(identifier)?;

    let total_modules = modules.len() as u32 + 2 * BARCODE_QUIET_MODULES;
    let mut raster = GrayImage::from_pixel(
        total_modules * BARCODE_MODULE_PX,
        BARCODE_HEIGHT_PX,
        WHITE,
    );

    for (idx, module) in modules.iter().enumerate() {
        if *module == 0 {
            continue;
        }
        let x0 = (BARCODE_QUIET_MODULES + idx as u32) * BARCODE_MODULE_PX;
        for x in x0..x0 + BARCODE_MODULE_PX {
            for y in 0..BARCODE_HEIGHT_PX {
                raster.put_pixel(x, y, BLACK);
            }
        }
    }

    Ok(raster)
}

/// Render a QR symbol carrying `payload`
///
/// `identifier` names the record in the error when the payload is too long.
#[instrument(level = "debug", skip(payload))]
pub fn render_qr(payload: &str, identifier: &str) -> LabelResult<GrayImage> {
    let code = QrCode::with_error_correction_level(payload.as_bytes(), EcLevel::M).map_err(
        |e| LabelError::EncodingQr {
            identifier: identifier.to_string(),
            reason: e.to_string(),
        },
    )?;

    let width = code.width() as u32;
    let side = (width + 2 * QR_QUIET_MODULES) * QR_MODULE_PX;
    let mut raster = GrayImage::from_pixel(side, side, WHITE);

    for (idx, color) in code.to_colors().iter().enumerate() {
        if !matches!(color, Color::Dark) {
            continue;
        }
        let idx = idx as u32;
        let x0 = (QR_QUIET_MODULES + idx % width) * QR_MODULE_PX;
        let y0 = (QR_QUIET_MODULES + idx / width) * QR_MODULE_PX;
        for y in y0..y0 + QR_MODULE_PX {
            for x in x0..x0 + QR_MODULE_PX {
                raster.put_pixel(x, y, BLACK);
            }
        }
    }

    Ok(raster)
}
