//! Configuration structures for the receipt pipeline.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration for the recibo pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ReciboConfig {
    /// OCR configuration.
    pub ocr: OcrConfig,

    /// PDF processing configuration.
    pub pdf: PdfConfig,

    /// QR recovery configuration.
    pub qr: QrConfig,

    /// LLM enrichment configuration.
    pub enrichment: EnrichmentConfig,
}

/// OCR engine and image enhancement configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// Path or name of the tesseract executable.
    pub tesseract_cmd: PathBuf,

    /// Tesseract language pack.
    pub language: String,

    /// Tesseract OCR engine mode (`--oem`).
    pub engine_mode: u8,

    /// Tesseract page segmentation mode (`--psm`). 6 = single uniform block.
    pub page_seg_mode: u8,

    /// Neighbourhood size for adaptive thresholding (odd).
    pub threshold_block_size: u32,

    /// Constant subtracted from the local weighted mean.
    pub threshold_constant: i32,

    /// Median filter kernel size (odd).
    pub median_kernel_size: u32,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            tesseract_cmd: PathBuf::from("tesseract"),
            language: "spa".to_string(),
            engine_mode: 3,
            page_seg_mode: 6,
            threshold_block_size: 11,
            threshold_constant: 2,
            median_kernel_size: 3,
        }
    }
}

/// PDF processing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfConfig {
    /// Path or name of the pdftoppm executable used for rasterization.
    pub pdftoppm_cmd: PathBuf,

    /// DPI for rendering the first page to an image.
    pub render_dpi: u32,
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self {
            pdftoppm_cmd: PathBuf::from("pdftoppm"),
            render_dpi: 200,
        }
    }
}

/// QR recovery configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QrConfig {
    /// Whether uploads look for QR codes unless told otherwise.
    pub enabled_by_default: bool,
}

impl Default for QrConfig {
    fn default() -> Self {
        Self {
            enabled_by_default: true,
        }
    }
}

/// LLM enrichment configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EnrichmentConfig {
    /// Whether uploads are enriched unless told otherwise.
    pub enabled_by_default: bool,

    /// Base URL of an OpenAI-compatible API (without `/chat/completions`).
    pub base_url: String,

    /// Model name sent with each request.
    pub model: String,

    /// Environment variable holding the API key.
    pub api_key_env: String,

    /// Upper bound on generated tokens.
    pub max_tokens: u32,

    /// Sampling temperature.
    pub temperature: f32,

    /// Nucleus sampling parameter.
    pub top_p: f32,
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self {
            enabled_by_default: false,
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
            api_key_env: "RECIBO_LLM_API_KEY".to_string(),
            max_tokens: 1024,
            temperature: 0.2,
            top_p: 0.9,
        }
    }
}

impl ReciboConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }

    /// Apply `RECIBO_*` environment overrides on top of the loaded values.
    pub fn apply_env_overrides(mut self) -> Self {
        self.apply_overrides(|key| std::env::var(key).ok());
        self
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(cmd) = lookup("RECIBO_TESSERACT_CMD") {
            self.ocr.tesseract_cmd = PathBuf::from(cmd);
        }
        if let Some(cmd) = lookup("RECIBO_PDFTOPPM_CMD") {
            self.pdf.pdftoppm_cmd = PathBuf::from(cmd);
        }
        if let Some(url) = lookup("RECIBO_LLM_BASE_URL") {
            self.enrichment.base_url = url;
        }
        if let Some(model) = lookup("RECIBO_LLM_MODEL") {
            self.enrichment.model = model;
        }
    }
}
