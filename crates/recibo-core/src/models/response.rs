//! Response envelope handed back to the transport layer.

use serde::{Deserialize, Serialize};

use super::comprobante::Comprobante;

/// Outcome tag of a processing request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseStatus {
    Success,
    Rejected,
    Error,
}

impl ResponseStatus {
    /// HTTP status code a web front-end should answer with.
    pub fn http_status(self) -> u16 {
        match self {
            Self::Success => 200,
            Self::Rejected => 400,
            Self::Error => 500,
        }
    }
}

/// Envelope returned for every upload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessResponse {
    pub status: ResponseStatus,

    /// Human-readable summary.
    pub message: String,

    /// Wall-clock time spent in the pipeline.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processing_time_ms: Option<u64>,

    /// The record, present only on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comprobante: Option<Comprobante>,
}

impl ProcessResponse {
    pub fn success(comprobante: Comprobante, processing_time_ms: u64) -> Self {
        Self {
            status: ResponseStatus::Success,
            message: "File processed successfully".to_string(),
            processing_time_ms: Some(processing_time_ms),
            comprobante: Some(comprobante),
        }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            status: ResponseStatus::Rejected,
            message: message.into(),
            processing_time_ms: None,
            comprobante: None,
        }
    }

    pub fn error(message: impl Into<String>, processing_time_ms: u64) -> Self {
        Self {
            status: ResponseStatus::Error,
            message: message.into(),
            processing_time_ms: Some(processing_time_ms),
            comprobante: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == ResponseStatus::Success
    }
}
