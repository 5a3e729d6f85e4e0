//! Text acquisition from PDFs and images.
//!
//! PDFs are read from their text layer when page 1 has one; scanned PDFs and
//! photos go through the [`ImageEnhancer`]. Failures never escape: they are
//! recorded as diagnostics on the returned [`Acquisition`].

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::ocr::ImageEnhancer;
use crate::pdf::PdfProcessor;

/// Marker line placed before OCR text recovered from a PDF page.
pub const OCR_PAGE_MARKER: &str = "--- Página 1 ---";

/// Outcome of an acquisition step.
#[derive(Debug, Clone, PartialEq)]
pub struct Acquisition<T> {
    pub value: T,
    /// Human-readable notes, in the order they were produced.
    pub diagnostics: Vec<String>,
    /// Whether the step produced usable content.
    pub succeeded: bool,
}

impl<T> Acquisition<T> {
    pub fn success(value: T, diagnostics: Vec<String>) -> Self {
        Self {
            value,
            diagnostics,
            succeeded: true,
        }
    }

    pub fn degraded(value: T, diagnostics: Vec<String>) -> Self {
        Self {
            value,
            diagnostics,
            succeeded: false,
        }
    }
}

/// Kind of uploaded document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Image,
}

impl DocumentKind {
    /// Classify an upload by declared content type, then by file extension.
    ///
    /// Returns `None` for anything that is neither a PDF nor an image.
    pub fn detect(content_type: &str, filename: &str) -> Option<Self> {
        let content_type = content_type.trim().to_ascii_lowercase();
        let is_pdf_name = Path::new(filename)
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));

        if content_type == "application/pdf" || is_pdf_name {
            Some(Self::Pdf)
        } else if content_type.starts_with("image/") {
            Some(Self::Image)
        } else {
            None
        }
    }
}

/// Obtains raw text from an uploaded document.
#[derive(Clone)]
pub struct TextAcquirer {
    pdf: Arc<dyn PdfProcessor>,
    enhancer: ImageEnhancer,
}

impl TextAcquirer {
    pub fn new(pdf: Arc<dyn PdfProcessor>, enhancer: ImageEnhancer) -> Self {
        Self { pdf, enhancer }
    }

    /// Acquire text according to the document kind.
    pub fn acquire(&self, bytes: &[u8], kind: DocumentKind) -> Acquisition<String> {
        match kind {
            DocumentKind::Pdf => self.acquire_pdf(bytes),
            DocumentKind::Image => self.acquire_image(bytes),
        }
    }

    /// Page-1 text layer, with OCR of the rendered page as fallback.
    pub fn acquire_pdf(&self, bytes: &[u8]) -> Acquisition<String> {
        let mut diagnostics = Vec::new();

        match self.pdf.first_page_text(bytes) {
            Ok(text) if !text.trim().is_empty() => {
                info!("Extracted {} characters from PDF text layer", text.len());
                diagnostics.push("Text extracted from PDF text layer (first page only)".to_string());
                return Acquisition::success(text, diagnostics);
            }
            Ok(_) => {
                debug!("PDF page 1 has no text layer");
            }
            Err(e) => {
                warn!("PDF text extraction failed: {}", e);
                diagnostics.push(format!("PDF text extraction failed: {}", e));
            }
        }

        diagnostics.push("Converted first page to image for OCR".to_string());

        let ocr = self
            .pdf
            .render_first_page(bytes)
            .map_err(|e| e.to_string())
            .and_then(|page| self.enhancer.enhance(&page).map_err(|e| e.to_string()));

        match ocr {
            Ok(text) if !text.is_empty() => {
                diagnostics.push("Text extracted with OCR (first page only)".to_string());
                Acquisition::success(format!("{}\n{}", OCR_PAGE_MARKER, text), diagnostics)
            }
            Ok(_) => {
                diagnostics.push("OCR could not extract text from the first page".to_string());
                Acquisition::degraded(String::new(), diagnostics)
            }
            Err(e) => {
                warn!("OCR fallback failed: {}", e);
                diagnostics.push(format!("OCR fallback failed: {}", e));
                Acquisition::degraded(String::new(), diagnostics)
            }
        }
    }

    /// OCR of an uploaded image.
    pub fn acquire_image(&self, bytes: &[u8]) -> Acquisition<String> {
        match self.enhancer.enhance_bytes(bytes) {
            Ok(text) if !text.is_empty() => {
                info!("OCR extracted {} characters from image", text.len());
                Acquisition::success(
                    text,
                    vec!["Text extracted from image with OCR".to_string()],
                )
            }
            Ok(_) => Acquisition::degraded(
                String::new(),
                vec!["OCR could not extract text from the image".to_string()],
            ),
            Err(e) => {
                warn!("Image OCR failed: {}", e);
                Acquisition::degraded(
                    String::new(),
                    vec![format!("Error processing image with OCR: {}", e)],
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{OcrError, PdfError};
    use crate::ocr::OcrEngine;
    use image::{DynamicImage, GrayImage, Luma};
    use pretty_assertions::assert_eq;
    use std::io::Cursor;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FakePdf {
        text: Option<&'static str>,
        renders: AtomicUsize,
    }

    impl PdfProcessor for FakePdf {
        fn first_page_text(&self, _data: &[u8]) -> crate::pdf::Result<String> {
            self.text
                .map(str::to_string)
                .ok_or_else(|| PdfError::Parse("broken xref".to_string()))
        }

        fn render_first_page(&self, _data: &[u8]) -> crate::pdf::Result<DynamicImage> {
            self.renders.fetch_add(1, Ordering::SeqCst);
            Ok(DynamicImage::ImageLuma8(GrayImage::from_pixel(8, 8, Luma([255]))))
        }
    }

    struct FixedOcr(Result<&'static str, &'static str>);

    impl OcrEngine for FixedOcr {
        fn recognize(&self, _image: &GrayImage) -> Result<String, OcrError> {
            self.0
                .map(str::to_string)
                .map_err(|e| OcrError::Recognition(e.to_string()))
        }
    }

    fn acquirer(
        text: Option<&'static str>,
        ocr: Result<&'static str, &'static str>,
    ) -> (TextAcquirer, Arc<FakePdf>) {
        let pdf = Arc::new(FakePdf {
            text,
            renders: AtomicUsize::new(0),
        });
        let enhancer = ImageEnhancer::new(Arc::new(FixedOcr(ocr)));
        (TextAcquirer::new(pdf.clone(), enhancer), pdf)
    }

    fn png_bytes() -> Vec<u8> {
        let mut bytes = Vec::new();
        DynamicImage::ImageLuma8(GrayImage::from_pixel(8, 8, Luma([255])))
            .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn test_detect_document_kind() {
        assert_eq!(DocumentKind::detect("application/pdf", "x"), Some(DocumentKind::Pdf));
        assert_eq!(
            DocumentKind::detect("application/octet-stream", "FACTURA.PDF"),
            Some(DocumentKind::Pdf)
        );
        assert_eq!(DocumentKind::detect("image/jpeg", "a.jpg"), Some(DocumentKind::Image));
        assert_eq!(DocumentKind::detect("text/plain", "notes.txt"), None);
    }

    #[test]
    fn test_pdf_text_layer_skips_ocr() {
        let (acquirer, pdf) = acquirer(Some("Punto de Venta: 0001"), Ok("ignored"));
        let result = acquirer.acquire_pdf(b"%PDF");

        assert!(result.succeeded);
        assert_eq!(result.value, "Punto de Venta: 0001");
        assert_eq!(result.diagnostics.len(), 1);
        assert_eq!(pdf.renders.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_pdf_without_text_falls_back_to_ocr() {
        let (acquirer, pdf) = acquirer(Some("  \n"), Ok("Importe Total: $ 500,00"));
        let result = acquirer.acquire_pdf(b"%PDF");

        assert!(result.succeeded);
        assert_eq!(result.value, "--- Página 1 ---\nImporte Total: $ 500,00");
        assert_eq!(
            result.diagnostics,
            vec![
                "Converted first page to image for OCR".to_string(),
                "Text extracted with OCR (first page only)".to_string(),
            ]
        );
        assert_eq!(pdf.renders.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_unparseable_pdf_goes_to_ocr_with_extra_note() {
        let (acquirer, _) = acquirer(None, Ok(""));
        let result = acquirer.acquire_pdf(b"junk");

        assert!(!result.succeeded);
        assert_eq!(result.value, "");
        assert_eq!(result.diagnostics.len(), 3);
        assert!(result.diagnostics[0].starts_with("PDF text extraction failed"));
    }

    #[test]
    fn test_ocr_failure_is_a_diagnostic() {
        let (acquirer, _) = acquirer(Some(""), Err("engine crashed"));
        let result = acquirer.acquire_pdf(b"%PDF");

        assert!(!result.succeeded);
        assert!(result.diagnostics.last().unwrap().contains("engine crashed"));
    }

    #[test]
    fn test_image_branch() {
        let (acquirer, _) = acquirer(None, Ok("CAE N°: 123"));
        let result = acquirer.acquire_image(&png_bytes());
        assert!(result.succeeded);
        assert_eq!(result.value, "CAE N°: 123");

        let garbage = acquirer.acquire_image(b"not an image");
        assert!(!garbage.succeeded);
        assert!(garbage.diagnostics[0].starts_with("Error processing image with OCR"));
    }
}
