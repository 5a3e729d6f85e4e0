//! PDF processing: first-page text and rasterization.

mod extractor;

pub use extractor::PdfExtractor;

use crate::error::PdfError;
use image::DynamicImage;

/// Result type for PDF operations.
pub type Result<T> = std::result::Result<T, PdfError>;

/// Trait for PDF processing implementations.
///
/// Receipts carry everything of interest on their first page, so only page 1
/// is ever read or rendered.
pub trait PdfProcessor: Send + Sync {
    /// Extract the text layer of page 1. An image-only page yields an empty
    /// string, not an error.
    fn first_page_text(&self, data: &[u8]) -> Result<String>;

    /// Render page 1 to an image.
    fn render_first_page(&self, data: &[u8]) -> Result<DynamicImage>;
}
