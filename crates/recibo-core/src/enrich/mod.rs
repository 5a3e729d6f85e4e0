//! Optional LLM enrichment of acquired receipt text.
//!
//! Enrichment is additive. [`Enricher::enrich`] returns an
//! [`EnrichmentOutcome`] rather than a `Result`, so a failing service can only
//! ever produce a note on the record.

#[cfg(feature = "http-enrichment")]
mod http;

#[cfg(feature = "http-enrichment")]
pub use http::HttpEnricher;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Instruction sent ahead of the receipt text.
pub const SYSTEM_PROMPT: &str = "Sos un asistente que analiza comprobantes fiscales argentinos \
(facturas y recibos AFIP). A partir del texto extraído del comprobante, resumí en español: \
tipo de comprobante, emisor, receptor, período facturado, importes y cualquier dato relevante \
que no tenga un campo estructurado. No inventes datos que no estén en el texto.";

/// Result of an enrichment call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "text", rename_all = "snake_case")]
pub enum EnrichmentOutcome {
    /// Free-form text produced by the service.
    Completed(String),
    /// Why no text was produced.
    Failed(String),
}

impl EnrichmentOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed(_))
    }

    /// Value stored under the reserved key of the record.
    pub fn into_entry(self) -> String {
        match self {
            Self::Completed(text) => text,
            Self::Failed(reason) => format!("Error: {}", reason),
        }
    }
}

/// Best-effort text augmentation service.
#[async_trait]
pub trait Enricher: Send + Sync {
    async fn enrich(&self, text: &str) -> EnrichmentOutcome;
}

/// Stand-in used when enrichment is requested but no service is configured.
#[derive(Debug, Clone, Default)]
pub struct UnavailableEnricher;

#[async_trait]
impl Enricher for UnavailableEnricher {
    async fn enrich(&self, _text: &str) -> EnrichmentOutcome {
        EnrichmentOutcome::Failed("no enrichment service configured".to_string())
    }
}
