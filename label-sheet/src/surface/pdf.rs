//! printpdf-backed drawing surface

use super::LabelSurface;
use crate::error::{LabelError, LabelResult};
use crate::fonts::FontFace;
use crate::layout::Frame;
use image::{DynamicImage, Rgb, RgbImage, Rgba};
use printpdf::{
    BuiltinFont, ColorBits, ColorSpace, Image, ImageTransform, ImageXObject, IndirectFontRef,
    Line, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference, Point, Px,
};
use std::io::BufWriter;
use tracing::{debug, instrument};

/// Resolution images are embedded at before scaling to their frame
const EMBED_DPI: f32 = 300.0;

const LAYER_NAME: &str = "Label";

struct PdfFonts {
    bold: IndirectFontRef,
    oblique: IndirectFontRef,
}

impl PdfFonts {
    fn get(&self, face: FontFace) -> &IndirectFontRef {
        match face {
            FontFace::HelveticaBold => &self.bold,
            FontFace::HelveticaOblique => &self.oblique,
        }
    }
}

/// Builds a multi-page PDF in memory
///
/// The document is created lazily with the first page, since printpdf
/// always opens a document together with its first page.
pub struct PdfSurface {
    title: String,
    doc: Option<(PdfDocumentReference, PdfFonts)>,
    layer: Option<PdfLayerReference>,
    pages: usize,
}

impl PdfSurface {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            doc: None,
            layer: None,
            pages: 0,
        }
    }

    /// Number of committed pages
    pub fn page_count(&self) -> usize {
        self.pages
    }

    fn layer(&self) -> LabelResult<&PdfLayerReference> {
        self.layer
            .as_ref()
            .ok_or_else(|| LabelError::Pdf("drawing outside of a page".to_string()))
    }

    /// Serialize the finished document
    #[instrument(skip(self), fields(title = %self.title, pages = self.pages))]
    pub fn finish(self) -> LabelResult<Vec<u8>> {
        if self.layer.is_some() {
            return Err(LabelError::Pdf("last page not committed".to_string()));
        }
        let (doc, _) = self.doc.ok_or(LabelError::EmptyBatch)?;

        let mut writer = BufWriter::new(Vec::new());
        doc.save(&mut writer)
            .map_err(|e| LabelError::Pdf(e.to_string()))?;
        let bytes = writer
            .into_inner()
            .map_err(|e| LabelError::Io(e.into_error()))?;

        debug!(bytes = bytes.len(), "PDF serialized");
        Ok(bytes)
    }
}

/// Flatten an image to 8-bit pixels printpdf can embed
///
/// Greyscale rasters stay single-channel; anything else is composited
/// against white so transparent logo areas print blank.
fn to_xobject(image: &DynamicImage) -> ImageXObject {
    let (width, height, color_space, pixels, interpolate) = match image {
        DynamicImage::ImageLuma8(gray) => (
            gray.width(),
            gray.height(),
            ColorSpace::Greyscale,
            gray.as_raw().clone(),
            false,
        ),
        other => {
            let rgba = other.to_rgba8();
            let mut rgb = RgbImage::new(rgba.width(), rgba.height());
            for (x, y, pixel) in rgba.enumerate_pixels() {
                let Rgba([r, g, b, a]) = *pixel;
                let alpha = a as f32 / 255.0;
                let blend = |c: u8| (c as f32 * alpha + 255.0 * (1.0 - alpha)).round() as u8;
                rgb.put_pixel(x, y, Rgb([blend(r), blend(g), blend(b)]));
            }
            (
                rgb.width(),
                rgb.height(),
                ColorSpace::Rgb,
                rgb.into_raw(),
                true,
            )
        }
    };

    ImageXObject {
        width: Px(width as usize),
        height: Px(height as usize),
        color_space,
        bits_per_component: ColorBits::Bit8,
        interpolate,
        image_data: pixels,
        image_filter: None,
        clipping_bbox: None,
        smask: None,
    }
}

impl LabelSurface for PdfSurface {
    fn begin_page(&mut self, width_mm: f32, height_mm: f32) -> LabelResult<()> {
        if self.layer.is_some() {
            return Err(LabelError::Pdf("previous page not committed".to_string()));
        }

        let layer = match &self.doc {
            Some((doc, _)) => {
                let (page, layer) = doc.add_page(Mm(width_mm), Mm(height_mm), LAYER_NAME);
                doc.get_page(page).get_layer(layer)
            }
            None => {
                let (doc, page, layer) = PdfDocument::new(
                    self.title.clone(),
                    Mm(width_mm),
                    Mm(height_mm),
                    LAYER_NAME,
                );
                let fonts = PdfFonts {
                    bold: doc
                        .add_builtin_font(BuiltinFont::HelveticaBold)
                        .map_err(|e| LabelError::Pdf(e.to_string()))?,
                    oblique: doc
                        .add_builtin_font(BuiltinFont::HelveticaOblique)
                        .map_err(|e| LabelError::Pdf(e.to_string()))?,
                };
                let layer = doc.get_page(page).get_layer(layer);
                self.doc = Some((doc, fonts));
                layer
            }
        };

        self.layer = Some(layer);
        Ok(())
    }

    fn stroke_rect(&mut self, frame: Frame, line_width_pt: f32) -> LabelResult<()> {
        let layer = self.layer()?;
        let corners = [
            (frame.x_mm, frame.y_mm),
            (frame.x_mm + frame.width_mm, frame.y_mm),
            (frame.x_mm + frame.width_mm, frame.top_mm()),
            (frame.x_mm, frame.top_mm()),
        ];

        layer.set_outline_thickness(line_width_pt);
        layer.add_line(Line {
            points: corners
                .iter()
                .map(|&(x, y)| (Point::new(Mm(x), Mm(y)), false))
                .collect(),
            is_closed: true,
        });
        Ok(())
    }

    fn draw_image(&mut self, image: &DynamicImage, frame: Frame) -> LabelResult<()> {
        let layer = self.layer()?;
        let xobject = to_xobject(image);

        // Natural size at EMBED_DPI, then scaled to the frame
        let natural_w_mm = xobject.width.0 as f32 / EMBED_DPI * 25.4;
        let natural_h_mm = xobject.height.0 as f32 / EMBED_DPI * 25.4;
        if natural_w_mm <= 0.0 || natural_h_mm <= 0.0 {
            return Err(LabelError::Pdf("cannot draw an empty image".to_string()));
        }

        Image::from(xobject).add_to_layer(
            layer.clone(),
            ImageTransform {
                translate_x: Some(Mm(frame.x_mm)),
                translate_y: Some(Mm(frame.y_mm)),
                scale_x: Some(frame.width_mm / natural_w_mm),
                scale_y: Some(frame.height_mm / natural_h_mm),
                dpi: Some(EMBED_DPI),
                ..Default::default()
            },
        );
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
        let layer = self.layer()?;
        let font = match &self.doc {
            Some((_, fonts)) => fonts.get(face),
            None => return Err(LabelError::Pdf("document not started".to_string())),
        };

        let x = center_x_mm - face.text_width_mm(text, size_pt) / 2.0;
        layer.use_text(text, size_pt, Mm(x), Mm(baseline_y_mm), font);
        Ok(())
    }

    fn end_page(&mut self) -> LabelResult<()> {
        if self.layer.take().is_none() {
            return Err(LabelError::Pdf("no open page to commit".to_string()));
        }
        self.pages += 1;
        Ok(())
    }
}
