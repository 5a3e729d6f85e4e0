//! QR code recovery.
//!
//! AFIP receipts print a QR code linking to the fiscal verification service.
//! Its payload is recovered when present; absence or decode failure is a
//! diagnostic, never an error.

use std::sync::Arc;

use image::{DynamicImage, GrayImage};
use tracing::{debug, info, warn};

use crate::error::QrError;
use crate::pdf::PdfProcessor;
use crate::text::Acquisition;

/// Finds and decodes QR symbols in a grayscale image.
pub trait QrDecoder: Send + Sync {
    /// Payloads of every decoded symbol, in detection order.
    fn decode(&self, image: &GrayImage) -> Result<Vec<String>, QrError>;
}

/// Pure-Rust decoder built on `rqrr`.
#[derive(Debug, Clone, Default)]
pub struct RqrrDecoder;

impl RqrrDecoder {
    pub fn new() -> Self {
        Self
    }
}

impl QrDecoder for RqrrDecoder {
    fn decode(&self, image: &GrayImage) -> Result<Vec<String>, QrError> {
        let (width, height) = image.dimensions();
        let mut prepared = rqrr::PreparedImage::prepare_from_greyscale(
            width as usize,
            height as usize,
            |x, y| image.get_pixel(x as u32, y as u32)[0],
        );

        let grids = prepared.detect_grids();
        debug!("Detected {} QR grids", grids.len());

        let mut payloads = Vec::with_capacity(grids.len());
        let mut last_error = None;
        for grid in grids {
            match grid.decode() {
                Ok((_meta, content)) => payloads.push(content),
                Err(e) => {
                    debug!("QR grid failed to decode: {:?}", e);
                    last_error = Some(format!("{:?}", e));
                }
            }
        }

        match last_error {
            Some(e) if payloads.is_empty() => Err(QrError::Decode(e)),
            _ => Ok(payloads),
        }
    }
}

/// Recovers QR payloads from images and from the first page of PDFs.
#[derive(Clone)]
pub struct QrRecoverer {
    decoder: Arc<dyn QrDecoder>,
    pdf: Arc<dyn PdfProcessor>,
}

impl QrRecoverer {
    pub fn new(decoder: Arc<dyn QrDecoder>, pdf: Arc<dyn PdfProcessor>) -> Self {
        Self { decoder, pdf }
    }

    /// Decode QR symbols from encoded image bytes.
    ///
    /// Non-empty payloads are joined with newlines; no symbol yields an empty
    /// string.
    pub fn decode_image(&self, bytes: &[u8]) -> Acquisition<String> {
        match image::load_from_memory(bytes) {
            Ok(image) => self.decode_dynamic(&image),
            Err(e) => {
                let e = QrError::from(e);
                warn!("QR scan skipped: {}", e);
                Acquisition::degraded(
                    String::new(),
                    vec![format!("Error processing image for QR codes: {}", e)],
                )
            }
        }
    }

    /// Render page 1 and scan it for QR symbols.
    pub fn decode_pdf_first_page(&self, bytes: &[u8]) -> Acquisition<Option<String>> {
        let page = match self.pdf.render_first_page(bytes) {
            Ok(page) => page,
            Err(e) => {
                let e = QrError::from(e);
                warn!("QR scan of PDF skipped: {}", e);
                return Acquisition::degraded(
                    None,
                    vec![format!("Error processing PDF for QR codes: {}", e)],
                );
            }
        };

        let mut diagnostics = vec!["Converted first page to image for QR scan".to_string()];
        let scan = self.decode_dynamic(&page);
        diagnostics.extend(scan.diagnostics);

        if scan.value.is_empty() {
            diagnostics.push("No QR codes found on the first page of the PDF".to_string());
            Acquisition::degraded(None, diagnostics)
        } else {
            diagnostics.push("QR code found on the first page".to_string());
            Acquisition::success(Some(scan.value), diagnostics)
        }
    }

    fn decode_dynamic(&self, image: &DynamicImage) -> Acquisition<String> {
        let gray = image.to_luma8();
        match self.decoder.decode(&gray) {
            Ok(payloads) => {
                let found: Vec<String> = payloads.into_iter().filter(|p| !p.is_empty()).collect();
                if found.is_empty() {
                    Acquisition::degraded(
                        String::new(),
                        vec!["No QR codes found in the image".to_string()],
                    )
                } else {
                    info!("Decoded {} QR code(s)", found.len());
                    Acquisition::success(
                        found.join("\n"),
                        vec![format!("Decoded {} QR code(s)", found.len())],
                    )
                }
            }
            Err(e) => {
                warn!("QR decoding failed: {}", e);
                Acquisition::degraded(String::new(), vec![format!("QR decoding failed: {}", e)])
            }
        }
    }
}
