//! OCR: image enhancement and text recognition.
//!
//! Recognition is behind the [`OcrEngine`] trait; [`TesseractEngine`] is the
//! production implementation. [`ImageEnhancer`] owns the full
//! preprocess-then-recognize sequence used for both scanned PDFs and photos.

mod preprocessing;
mod tesseract;

pub use preprocessing::ImagePreprocessor;
pub use tesseract::TesseractEngine;

use std::sync::Arc;

use image::{DynamicImage, GrayImage};
use tracing::debug;

use crate::error::OcrError;

/// Text recognizer for a prepared grayscale image.
pub trait OcrEngine: Send + Sync {
    /// Recognize text. An image with no text yields an empty string.
    fn recognize(&self, image: &GrayImage) -> Result<String, OcrError>;
}

/// Preprocesses an image and runs OCR on the result.
#[derive(Clone)]
pub struct ImageEnhancer {
    preprocessor: ImagePreprocessor,
    engine: Arc<dyn OcrEngine>,
}

impl ImageEnhancer {
    pub fn new(engine: Arc<dyn OcrEngine>) -> Self {
        Self {
            preprocessor: ImagePreprocessor::new(),
            engine,
        }
    }

    pub fn with_preprocessor(mut self, preprocessor: ImagePreprocessor) -> Self {
        self.preprocessor = preprocessor;
        self
    }

    /// Enhance the image and recognize its text, trimmed.
    pub fn enhance(&self, image: &DynamicImage) -> Result<String, OcrError> {
        let prepared = self.preprocessor.prepare(image);
        let text = self.engine.recognize(&prepared)?;
        let text = text.trim().to_string();
        debug!("OCR produced {} characters", text.len());
        Ok(text)
    }

    /// Decode encoded image bytes, then [`enhance`](Self::enhance).
    pub fn enhance_bytes(&self, bytes: &[u8]) -> Result<String, OcrError> {
        let image = image::load_from_memory(bytes)?;
        self.enhance(&image)
    }
}
