//! Core library for Argentine tax receipt processing.
//!
//! This crate provides:
//! - Text acquisition from PDFs (text layer, OCR fallback) and images
//! - QR code recovery
//! - Duplicate-copy suppression (ORIGINAL/DUPLICADO/TRIPLICADO)
//! - AFIP receipt field extraction and validation
//! - Optional LLM enrichment

pub mod enrich;
pub mod error;
pub mod invoice;
pub mod models;
pub mod ocr;
pub mod pdf;
pub mod pipeline;
pub mod qr;
pub mod text;

pub use enrich::{Enricher, EnrichmentOutcome};
pub use error::{ReciboError, Result};
pub use invoice::{ComprobanteParser, ExtractionResult};
pub use models::{Comprobante, Field, ProcessResponse, ReciboConfig, ResponseStatus};
pub use ocr::{ImageEnhancer, OcrEngine, TesseractEngine};
pub use pdf::{PdfExtractor, PdfProcessor};
pub use pipeline::{DocumentProcessor, DocumentProcessorBuilder, ProcessOptions, Upload};
pub use qr::{QrDecoder, QrRecoverer, RqrrDecoder};
pub use text::{Acquisition, DocumentKind, TextAcquirer};

#[cfg(feature = "http-enrichment")]
pub use enrich::HttpEnricher;
