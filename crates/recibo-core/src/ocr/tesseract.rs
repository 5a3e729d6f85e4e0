//! Tesseract command-line engine.

use std::io::ErrorKind;
use std::path::PathBuf;
use std::process::Command;

use image::{GrayImage, ImageFormat};
use tracing::{debug, info};

use crate::error::OcrError;
use crate::models::config::OcrConfig;

use super::OcrEngine;

/// Runs the `tesseract` binary on a staged PNG and reads text from stdout.
#[derive(Debug, Clone)]
pub struct TesseractEngine {
    command: PathBuf,
    language: String,
    engine_mode: u8,
    page_seg_mode: u8,
}

impl TesseractEngine {
    /// Engine with Spanish, LSTM+legacy (`--oem 3`) and a single text block
    /// (`--psm 6`).
    pub fn new() -> Self {
        Self::from_config(&OcrConfig::default())
    }

    pub fn from_config(config: &OcrConfig) -> Self {
        Self {
            command: config.tesseract_cmd.clone(),
            language: config.language.clone(),
            engine_mode: config.engine_mode,
            page_seg_mode: config.page_seg_mode,
        }
    }

    /// Set the executable path.
    pub fn with_command(mut self, command: impl Into<PathBuf>) -> Self {
        self.command = command.into();
        self
    }

    /// Command-line arguments after the input path.
    fn args(&self) -> Vec<String> {
        vec![
            "stdout".to_string(),
            "--oem".to_string(),
            self.engine_mode.to_string(),
            "--psm".to_string(),
            self.page_seg_mode.to_string(),
            "-l".to_string(),
            self.language.clone(),
        ]
    }

    /// Check whether the executable can be started.
    pub fn is_available(&self) -> bool {
        Command::new(&self.command)
            .arg("--version")
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    }
}

impl Default for TesseractEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl OcrEngine for TesseractEngine {
    fn recognize(&self, image: &GrayImage) -> Result<String, OcrError> {
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(OcrError::InvalidImage(format!(
                "empty image {}x{}",
                width, height
            )));
        }

        let staged = tempfile::Builder::new()
            .prefix("recibo-ocr-")
            .suffix(".png")
            .tempfile()?;
        image.save_with_format(staged.path(), ImageFormat::Png)?;
        debug!("Staged {}x{} image at {}", width, height, staged.path().display());

        let output = Command::new(&self.command)
            .arg(staged.path())
            .args(self.args())
            .output()
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => OcrError::Launch(format!(
                    "{} not found",
                    self.command.display()
                )),
                _ => OcrError::Launch(e.to_string()),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(OcrError::Recognition(stderr.trim().to_string()));
        }

        let text = String::from_utf8_lossy(&output.stdout).to_string();
        info!("Tesseract recognized {} characters", text.len());
        Ok(text)
    }
}
