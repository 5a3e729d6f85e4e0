//! Error types for the recibo-core library.
//!
//! Only [`ReciboError`] crosses the pipeline boundary. The per-concern errors
//! ([`PdfError`], [`OcrError`], [`QrError`], [`EnrichmentError`]) are caught by
//! the acquisition layers and recorded as diagnostics on the record.

use thiserror::Error;

/// Error returned by the pipeline coordinator.
#[derive(Error, Debug)]
pub enum ReciboError {
    /// The declared content type is neither a PDF nor an image.
    #[error("unsupported file type: {content_type}")]
    UnsupportedType { content_type: String },

    /// Anything that escaped every degradation path.
    #[error("failed to process file: {0}")]
    Internal(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ReciboError {
    /// Whether the caller is at fault (bad input) rather than the service.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::UnsupportedType { .. })
    }
}

/// Errors related to PDF processing.
#[derive(Error, Debug)]
pub enum PdfError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// Failed to extract text from PDF.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),

    /// Failed to rasterize a page.
    #[error("failed to render page: {0}")]
    Render(String),

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,
}

/// Errors related to OCR processing.
#[derive(Error, Debug)]
pub enum OcrError {
    /// The OCR engine could not be started.
    #[error("failed to launch OCR engine: {0}")]
    Launch(String),

    /// The OCR engine ran but reported a failure.
    #[error("text recognition failed: {0}")]
    Recognition(String),

    /// Invalid image format or dimensions.
    #[error("invalid image: {0}")]
    InvalidImage(String),

    /// Image error while decoding or encoding.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// I/O error while staging the image for the engine.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors related to QR recovery.
#[derive(Error, Debug)]
pub enum QrError {
    /// The input could not be decoded as an image.
    #[error("invalid image: {0}")]
    InvalidImage(#[from] image::ImageError),

    /// The page could not be rendered.
    #[error("render failed: {0}")]
    Render(#[from] PdfError),

    /// The decoder failed on a detected symbol.
    #[error("decode failed: {0}")]
    Decode(String),
}

/// Errors raised while talking to the enrichment service.
///
/// These never leave the enrichment module; they are folded into
/// [`crate::enrich::EnrichmentOutcome::Failed`].
#[derive(Error, Debug)]
pub enum EnrichmentError {
    /// No API key available in the configured environment variable.
    #[error("missing API key (set {0})")]
    MissingApiKey(String),

    /// Transport-level failure.
    #[error("request failed: {0}")]
    Request(String),

    /// The service answered with a non-success status.
    #[error("service returned {status}: {body}")]
    Status { status: u16, body: String },

    /// The response did not contain any completion text.
    #[error("empty completion")]
    EmptyCompletion,
}

/// Result type for the recibo library.
pub type Result<T> = std::result::Result<T, ReciboError>;
