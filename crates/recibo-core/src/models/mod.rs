//! Data models for receipts, responses and configuration.

pub mod comprobante;
pub mod config;
pub mod response;

pub use comprobante::{Comprobante, Field, ENRICHMENT_KEY};
pub use config::{EnrichmentConfig, OcrConfig, PdfConfig, QrConfig, ReciboConfig};
pub use response::{ProcessResponse, ResponseStatus};
