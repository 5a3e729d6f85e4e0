//! PDF text extraction using lopdf and pdf-extract, rasterization via pdftoppm.

use std::fs;
use std::io::ErrorKind;
use std::panic;
use std::path::PathBuf;
use std::process::Command;

use image::{DynamicImage, GrayImage, RgbImage};
use lopdf::{Dictionary, Document, Object, ObjectId};
use tracing::{debug, trace, warn};

use super::{PdfProcessor, Result};
use crate::error::PdfError;
use crate::models::config::PdfConfig;

/// PDF content extractor.
#[derive(Debug, Clone)]
pub struct PdfExtractor {
    /// pdftoppm executable.
    pdftoppm_cmd: PathBuf,
    /// Render resolution.
    dpi: u32,
}

/// A parsed document plus the bytes pdf-extract should read.
struct LoadedPdf {
    document: Document,
    raw_data: Vec<u8>,
}

impl PdfExtractor {
    /// Create a new PDF extractor.
    pub fn new() -> Self {
        Self::from_config(&PdfConfig::default())
    }

    pub fn from_config(config: &PdfConfig) -> Self {
        Self {
            pdftoppm_cmd: config.pdftoppm_cmd.clone(),
            dpi: config.render_dpi,
        }
    }

    /// Set the rasterizer executable.
    pub fn with_pdftoppm(mut self, command: impl Into<PathBuf>) -> Self {
        self.pdftoppm_cmd = command.into();
        self
    }

    /// Set the render DPI.
    pub fn with_dpi(mut self, dpi: u32) -> Self {
        self.dpi = dpi;
        self
    }

    fn load(&self, data: &[u8]) -> Result<LoadedPdf> {
        let mut document = Document::load_mem(data).map_err(|e| PdfError::Parse(e.to_string()))?;

        // Handle PDFs with empty password encryption
        let raw_data = if document.is_encrypted() {
            if document.decrypt("").is_err() {
                return Err(PdfError::Encrypted);
            }
            debug!("Decrypted PDF with empty password");

            let mut decrypted = Vec::new();
            document
                .save_to(&mut decrypted)
                .map_err(|e| PdfError::Parse(format!("Failed to save decrypted PDF: {}", e)))?;
            decrypted
        } else {
            data.to_vec()
        };

        let page_count = document.get_pages().len();
        if page_count == 0 {
            return Err(PdfError::NoPages);
        }

        debug!("Loaded PDF with {} pages", page_count);
        Ok(LoadedPdf { document, raw_data })
    }

    /// Rasterize page 1 with pdftoppm into a scratch directory.
    fn render_with_pdftoppm(&self, data: &[u8]) -> Result<DynamicImage> {
        let scratch = tempfile::Builder::new()
            .prefix("recibo-pdf-")
            .tempdir()
            .map_err(|e| PdfError::Render(format!("Failed to create temp dir: {}", e)))?;
        let input = scratch.path().join("input.pdf");
        let prefix = scratch.path().join("page");
        fs::write(&input, data)
            .map_err(|e| PdfError::Render(format!("Failed to write temp PDF: {}", e)))?;

        let output = Command::new(&self.pdftoppm_cmd)
            .args(["-f", "1", "-l", "1", "-r"])
            .arg(self.dpi.to_string())
            .arg("-png")
            .arg(&input)
            .arg(&prefix)
            .output()
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => {
                    PdfError::Render(format!("{} not found", self.pdftoppm_cmd.display()))
                }
                _ => PdfError::Render(format!("pdftoppm failed: {}", e)),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(PdfError::Render(format!("pdftoppm error: {}", stderr.trim())));
        }

        // pdftoppm pads the page number in the file name, so search for it.
        let page_image = fs::read_dir(scratch.path())
            .map_err(|e| PdfError::Render(format!("Failed to read temp dir: {}", e)))?
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .find(|p| p.extension().is_some_and(|ext| ext == "png"))
            .ok_or_else(|| PdfError::Render("pdftoppm produced no images".to_string()))?;

        image::open(&page_image).map_err(|e| PdfError::Render(e.to_string()))
    }

    /// Largest image embedded on page 1, for scans when no rasterizer is installed.
    fn embedded_page_image(&self, data: &[u8]) -> Result<DynamicImage> {
        let loaded = self.load(data)?;
        let doc = &loaded.document;
        let page_id = doc
            .get_pages()
            .get(&1)
            .copied()
            .ok_or(PdfError::NoPages)?;

        let mut best: Option<DynamicImage> = None;
        if let Some(resources) = page_resources(doc, page_id) {
            if let Ok(xobjects) = resources.get(b"XObject") {
                if let Ok((_, Object::Dictionary(xobjects))) = doc.dereference(xobjects) {
                    for (_name, obj_ref) in xobjects.iter() {
                        let Ok((_, obj)) = doc.dereference(obj_ref) else {
                            continue;
                        };
                        if let Some(img) = decode_image_object(obj) {
                            let area = img.width() * img.height();
                            if best.as_ref().is_none_or(|b| b.width() * b.height() < area) {
                                best = Some(img);
                            }
                        }
                    }
                }
            }
        }

        best.ok_or_else(|| PdfError::Render("No images found on page 1".to_string()))
    }
}

impl Default for PdfExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfProcessor for PdfExtractor {
    fn first_page_text(&self, data: &[u8]) -> Result<String> {
        let loaded = self.load(data)?;

        // pdf-extract panics on some malformed font tables.
        let extracted = panic::catch_unwind(|| {
            pdf_extract::extract_text_from_mem_by_pages(&loaded.raw_data)
                .map_err(|e| e.to_string())
        })
        .unwrap_or_else(|_| Err("pdf-extract panicked".to_string()));

        match extracted {
            Ok(pages) => Ok(pages.into_iter().next().unwrap_or_default()),
            Err(e) => {
                warn!("pdf-extract failed ({}), falling back to lopdf", e);
                loaded
                    .document
                    .extract_text(&[1])
                    .map_err(|e| PdfError::TextExtraction(e.to_string()))
            }
        }
    }

    fn render_first_page(&self, data: &[u8]) -> Result<DynamicImage> {
        match self.render_with_pdftoppm(data) {
            Ok(image) => {
                debug!(
                    "Rendered page 1 at {} dpi: {}x{}",
                    self.dpi,
                    image.width(),
                    image.height()
                );
                Ok(image)
            }
            Err(render_err) => {
                warn!("{}; trying embedded page image", render_err);
                self.embedded_page_image(data).map_err(|_| render_err)
            }
        }
    }
}

/// Resources dictionary for a page, following `Parent` inheritance.
fn page_resources(doc: &Document, node_id: ObjectId) -> Option<Dictionary> {
    let Ok(Object::Dictionary(dict)) = doc.get_object(node_id) else {
        return None;
    };

    if let Ok(resources) = dict.get(b"Resources") {
        if let Ok((_, Object::Dictionary(res_dict))) = doc.dereference(resources) {
            return Some(res_dict.clone());
        }
    }

    match dict.get(b"Parent") {
        Ok(Object::Reference(parent_id)) => page_resources(doc, *parent_id),
        _ => None,
    }
}

fn decode_image_object(obj: &Object) -> Option<DynamicImage> {
    let Object::Stream(stream) = obj else {
        return None;
    };
    let dict = &stream.dict;

    if dict.get(b"Subtype").ok()?.as_name().ok()? != b"Image" {
        return None;
    }

    let width = dict.get(b"Width").ok()?.as_i64().ok()? as u32;
    let height = dict.get(b"Height").ok()?.as_i64().ok()? as u32;
    trace!("Found image object: {}x{}", width, height);

    let filter = dict.get(b"Filter").ok().and_then(|f| match f {
        Object::Name(name) => Some(name.as_slice()),
        Object::Array(arr) => arr.first().and_then(|o| o.as_name().ok()),
        _ => None,
    });
    if filter == Some(b"DCTDecode".as_slice()) {
        return image::load_from_memory_with_format(&stream.content, image::ImageFormat::Jpeg)
            .ok();
    }

    let bits = dict
        .get(b"BitsPerComponent")
        .ok()
        .and_then(|o| o.as_i64().ok())
        .unwrap_or(8);
    if bits != 8 {
        return None;
    }

    let data = stream.decompressed_content().ok()?;
    let color_space = dict
        .get(b"ColorSpace")
        .ok()
        .and_then(|o| o.as_name().ok())
        .unwrap_or(b"DeviceRGB");
    let pixels = (width * height) as usize;

    match color_space {
        b"DeviceGray" if data.len() >= pixels => {
            GrayImage::from_raw(width, height, data[..pixels].to_vec()).map(DynamicImage::ImageLuma8)
        }
        b"DeviceRGB" if data.len() >= pixels * 3 => {
            RgbImage::from_raw(width, height, data[..pixels * 3].to_vec())
                .map(DynamicImage::ImageRgb8)
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::dictionary;

    fn empty_page_pdf() -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), 200.into(), 200.into()],
        });
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![page_id.into()],
                "Count" => 1,
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).unwrap();
        bytes
    }

    /// One Helvetica text line per page.
    fn text_pdf(lines: &[&str]) -> Vec<u8> {
        use lopdf::content::{Content, Operation};
        use lopdf::Stream;

        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });

        let mut kids: Vec<Object> = Vec::new();
        for line in lines {
            let content = Content {
                operations: vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), 12.into()]),
                    Operation::new("Td", vec![20.into(), 150.into()]),
                    Operation::new("Tj", vec![Object::string_literal(*line)]),
                    Operation::new("ET", vec![]),
                ],
            };
            let content_id =
                doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
                "Resources" => resources_id,
                "MediaBox" => vec![0.into(), 0.into(), 300.into(), 200.into()],
            });
            kids.push(page_id.into());
        }

        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => lines.len() as i64,
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).unwrap();
        bytes
    }

    #[test]
    fn test_first_page_text_reads_only_page_one() {
        let extractor = PdfExtractor::new();
        let pdf = text_pdf(&["Punto de Venta: 0001", "Importe Total: $ 999,99"]);

        let text = extractor.first_page_text(&pdf).unwrap();
        assert!(text.contains("Punto de Venta: 0001"), "got {:?}", text);
        assert!(!text.contains("Importe Total"), "got {:?}", text);
    }

    #[test]
    fn test_rejects_non_pdf() {
        let extractor = PdfExtractor::new();
        let err = extractor.first_page_text(b"definitely not a pdf").unwrap_err();
        assert!(matches!(err, PdfError::Parse(_)));
    }

    #[test]
    fn test_load_counts_pages() {
        let extractor = PdfExtractor::new();
        let loaded = extractor.load(&empty_page_pdf()).unwrap();
        assert_eq!(loaded.document.get_pages().len(), 1);
    }

    #[test]
    fn test_render_without_rasterizer_or_images_fails() {
        let extractor = PdfExtractor::new().with_pdftoppm("/nonexistent/recibo-pdftoppm");
        let err = extractor.render_first_page(&empty_page_pdf()).unwrap_err();
        assert!(matches!(err, PdfError::Render(_)));
    }

    #[test]
    fn test_builder() {
        let extractor = PdfExtractor::new().with_dpi(300);
        assert_eq!(extractor.dpi, 300);
        assert_eq!(extractor.pdftoppm_cmd, PathBuf::from("pdftoppm"));
    }
}
