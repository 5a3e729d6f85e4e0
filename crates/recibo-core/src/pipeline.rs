//! Pipeline coordinator: upload in, receipt record out.

use std::panic::{self, AssertUnwindSafe};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, error, info};

use crate::enrich::{Enricher, UnavailableEnricher};
use crate::error::{ReciboError, Result};
use crate::invoice::{ComprobanteParser, count_copies, dedupe, validate};
use crate::models::comprobante::{Comprobante, ENRICHMENT_KEY};
use crate::models::config::ReciboConfig;
use crate::models::response::ProcessResponse;
use crate::ocr::{ImageEnhancer, ImagePreprocessor, OcrEngine, TesseractEngine};
use crate::pdf::{PdfExtractor, PdfProcessor};
use crate::qr::{QrDecoder, QrRecoverer, RqrrDecoder};
use crate::text::{DocumentKind, TextAcquirer};

/// An uploaded document.
#[derive(Debug, Clone)]
pub struct Upload {
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl Upload {
    pub fn new(
        filename: impl Into<String>,
        content_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            filename: filename.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    /// Read a file from disk, guessing the content type from its extension
    /// unless one is given.
    pub fn from_path(path: &Path, content_type: Option<&str>) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let content_type = content_type
            .map(str::to_string)
            .unwrap_or_else(|| guess_content_type(path).to_string());
        Ok(Self::new(filename, content_type, bytes))
    }
}

/// Content type for a file extension, `application/octet-stream` if unknown.
pub fn guess_content_type(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "pdf" => "application/pdf",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "tif" | "tiff" => "image/tiff",
        "bmp" => "image/bmp",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "txt" => "text/plain",
        _ => "application/octet-stream",
    }
}

/// Per-request switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessOptions {
    /// Look for QR codes.
    pub extract_qr: bool,
    /// Call the enrichment service.
    pub enrich: bool,
}

impl ProcessOptions {
    /// Defaults taken from configuration.
    pub fn from_config(config: &ReciboConfig) -> Self {
        Self {
            extract_qr: config.qr.enabled_by_default,
            enrich: config.enrichment.enabled_by_default,
        }
    }

    pub fn with_qr(mut self, extract_qr: bool) -> Self {
        self.extract_qr = extract_qr;
        self
    }

    pub fn with_enrichment(mut self, enrich: bool) -> Self {
        self.enrich = enrich;
        self
    }
}

impl Default for ProcessOptions {
    fn default() -> Self {
        Self {
            extract_qr: true,
            enrich: false,
        }
    }
}

/// Builder for [`DocumentProcessor`].
pub struct DocumentProcessorBuilder {
    pdf: Option<Arc<dyn PdfProcessor>>,
    ocr: Option<Arc<dyn OcrEngine>>,
    qr: Option<Arc<dyn QrDecoder>>,
    enricher: Option<Arc<dyn Enricher>>,
    preprocessor: ImagePreprocessor,
    parser: Option<ComprobanteParser>,
}

impl DocumentProcessorBuilder {
    /// Create a new builder with default collaborators.
    pub fn new() -> Self {
        Self {
            pdf: None,
            ocr: None,
            qr: None,
            enricher: None,
            preprocessor: ImagePreprocessor::new(),
            parser: None,
        }
    }

    /// Set the PDF text/render backend.
    pub fn with_pdf_processor(mut self, pdf: Arc<dyn PdfProcessor>) -> Self {
        self.pdf = Some(pdf);
        self
    }

    /// Set the OCR engine.
    pub fn with_ocr_engine(mut self, ocr: Arc<dyn OcrEngine>) -> Self {
        self.ocr = Some(ocr);
        self
    }

    /// Set the QR decoder.
    pub fn with_qr_decoder(mut self, qr: Arc<dyn QrDecoder>) -> Self {
        self.qr = Some(qr);
        self
    }

    /// Set the enrichment service.
    pub fn with_enricher(mut self, enricher: Arc<dyn Enricher>) -> Self {
        self.enricher = Some(enricher);
        self
    }

    pub fn with_preprocessor(mut self, preprocessor: ImagePreprocessor) -> Self {
        self.preprocessor = preprocessor;
        self
    }

    pub fn with_parser(mut self, parser: ComprobanteParser) -> Self {
        self.parser = Some(parser);
        self
    }

    pub fn build(self) -> DocumentProcessor {
        let pdf = self
            .pdf
            .unwrap_or_else(|| Arc::new(PdfExtractor::new()));
        let ocr = self
            .ocr
            .unwrap_or_else(|| Arc::new(TesseractEngine::new()));
        let qr = self.qr.unwrap_or_else(|| Arc::new(RqrrDecoder::new()));

        let enhancer = ImageEnhancer::new(ocr).with_preprocessor(self.preprocessor);

        DocumentProcessor {
            text: TextAcquirer::new(pdf.clone(), enhancer),
            qr: QrRecoverer::new(qr, pdf),
            parser: self.parser.unwrap_or_default(),
            enricher: self.enricher,
        }
    }
}

impl Default for DocumentProcessorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Turns uploaded documents into [`Comprobante`] records.
///
/// Holds no per-request state; share it behind an `Arc`.
pub struct DocumentProcessor {
    text: TextAcquirer,
    qr: QrRecoverer,
    parser: ComprobanteParser,
    enricher: Option<Arc<dyn Enricher>>,
}

impl DocumentProcessor {
    /// Create a new builder.
    pub fn builder() -> DocumentProcessorBuilder {
        DocumentProcessorBuilder::new()
    }

    /// Production collaborators wired from configuration.
    pub fn from_config(config: &ReciboConfig) -> Self {
        let builder = Self::builder()
            .with_pdf_processor(Arc::new(PdfExtractor::from_config(&config.pdf)))
            .with_ocr_engine(Arc::new(TesseractEngine::from_config(&config.ocr)))
            .with_qr_decoder(Arc::new(RqrrDecoder::new()))
            .with_preprocessor(ImagePreprocessor::from_config(&config.ocr));

        #[cfg(feature = "http-enrichment")]
        let builder = builder.with_enricher(Arc::new(crate::enrich::HttpEnricher::from_config(
            &config.enrichment,
        )));

        builder.build()
    }

    /// Process one upload.
    ///
    /// Only an unsupported content type or an unexpected internal failure is
    /// an error; every acquisition problem ends up in the record's diagnostics.
    ///
    /// The acquisition stage blocks on OCR and rasterization subprocesses.
    /// Servers handling concurrent requests should run
    /// [`extract_record`](Self::extract_record) on a blocking thread and then
    /// call [`enrich_record`](Self::enrich_record) instead.
    pub async fn process(&self, upload: &Upload, options: ProcessOptions) -> Result<Comprobante> {
        let mut comprobante = self.extract_record(upload, options)?;
        self.enrich_record(&mut comprobante, options).await;

        info!(
            "Processed {}: valid={}, {} diagnostics",
            upload.filename,
            comprobante.is_valid,
            comprobante.diagnostics.len()
        );
        Ok(comprobante)
    }

    /// Acquisition, deduplication, extraction and validation, without
    /// enrichment. Blocking.
    pub fn extract_record(&self, upload: &Upload, options: ProcessOptions) -> Result<Comprobante> {
        let kind = DocumentKind::detect(&upload.content_type, &upload.filename).ok_or_else(|| {
            ReciboError::UnsupportedType {
                content_type: upload.content_type.clone(),
            }
        })?;

        info!(
            "Processing {} ({}, {} bytes) as {:?}",
            upload.filename,
            upload.content_type,
            upload.bytes.len(),
            kind
        );

        panic::catch_unwind(AssertUnwindSafe(|| self.build_record(upload, kind, options)))
            .map_err(|payload| ReciboError::Internal(panic_message(payload.as_ref())))
    }

    /// Attach the enrichment outcome when requested and there is text to send.
    ///
    /// The enricher sees the deduplicated text; validity is left untouched.
    pub async fn enrich_record(&self, comprobante: &mut Comprobante, options: ProcessOptions) {
        if !options.enrich || comprobante.text_content.trim().is_empty() {
            return;
        }

        let outcome = match &self.enricher {
            Some(enricher) => enricher.enrich(&comprobante.text_content).await,
            None => UnavailableEnricher.enrich(&comprobante.text_content).await,
        };
        debug!("Enrichment completed: {}", outcome.is_completed());
        comprobante
            .unformatted
            .insert(ENRICHMENT_KEY.to_string(), outcome.into_entry());
    }

    /// Process one upload and wrap the outcome in a response envelope.
    pub async fn handle(&self, upload: &Upload, options: ProcessOptions) -> ProcessResponse {
        let start = Instant::now();
        let result = self.process(upload, options).await;
        let elapsed_ms = start.elapsed().as_millis() as u64;

        match result {
            Ok(comprobante) => ProcessResponse::success(comprobante, elapsed_ms),
            Err(e) if e.is_client_error() => ProcessResponse::rejected(e.to_string()),
            Err(e) => {
                error!("Failed to process {}: {}", upload.filename, e);
                ProcessResponse::error(e.to_string(), elapsed_ms)
            }
        }
    }

    fn build_record(
        &self,
        upload: &Upload,
        kind: DocumentKind,
        options: ProcessOptions,
    ) -> Comprobante {
        let bytes = upload.bytes.as_slice();
        let mut diagnostics = Vec::new();
        let mut qr_content = None;

        let raw_text = match kind {
            DocumentKind::Pdf => {
                if options.extract_qr {
                    let qr = self.qr.decode_pdf_first_page(bytes);
                    diagnostics.extend(qr.diagnostics);
                    qr_content = qr.value;
                }
                let text = self.text.acquire_pdf(bytes);
                diagnostics.extend(text.diagnostics);
                text.value
            }
            DocumentKind::Image => {
                if options.extract_qr {
                    let qr = self.qr.decode_image(bytes);
                    diagnostics.extend(qr.diagnostics);
                    if !qr.value.trim().is_empty() {
                        qr_content = Some(qr.value);
                    }
                }

                if qr_content.is_none() {
                    let text = self.text.acquire_image(bytes);
                    diagnostics.extend(text.diagnostics);
                    text.value
                } else {
                    debug!("QR content recovered, skipping OCR");
                    String::new()
                }
            }
        };

        let copy_count = count_copies(&raw_text);
        let deduped_text = dedupe(&raw_text);
        debug!(
            "Deduplicated text: {} -> {} characters, {} copy markers",
            raw_text.len(),
            deduped_text.len(),
            copy_count
        );

        let extraction = self.parser.extract(&deduped_text);
        let mut comprobante = extraction.comprobante;
        diagnostics.extend(extraction.warnings);

        comprobante.is_valid = validate(&comprobante);
        comprobante.filename = upload.filename.clone();
        comprobante.size = upload.bytes.len();
        comprobante.content_type = upload.content_type.clone();
        comprobante.qr_content = qr_content
            .map(|q| q.trim().to_string())
            .filter(|q| !q.is_empty());
        comprobante.text_content = deduped_text;
        comprobante.copy_count = copy_count;
        comprobante.diagnostics = diagnostics;
        comprobante
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unexpected panic".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enrich::EnrichmentOutcome;
    use crate::error::{OcrError, PdfError, QrError};
    use crate::models::response::ResponseStatus;
    use async_trait::async_trait;
    use image::{DynamicImage, GrayImage, Luma};
    use pretty_assertions::assert_eq;
    use std::io::Cursor;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const VALID_TEXT: &str = "Razón Social: ACME SA\n\
        Punto de Venta: 0001 Comp. Nro: 123\n\
        Fecha de Emisión: 01/01/2024\n\
        CUIT: 20123456786\n\
        Importe Total: $ 100,00";

    #[derive(Default)]
    struct Calls {
        ocr: AtomicUsize,
        qr: AtomicUsize,
        pdf_text: AtomicUsize,
        pdf_render: AtomicUsize,
        enrich: AtomicUsize,
    }

    impl Calls {
        fn total(&self) -> usize {
            self.ocr.load(Ordering::SeqCst)
                + self.qr.load(Ordering::SeqCst)
                + self.pdf_text.load(Ordering::SeqCst)
                + self.pdf_render.load(Ordering::SeqCst)
                + self.enrich.load(Ordering::SeqCst)
        }
    }

    struct MockOcr {
        calls: Arc<Calls>,
        text: &'static str,
    }

    impl OcrEngine for MockOcr {
        fn recognize(&self, _image: &GrayImage) -> std::result::Result<String, OcrError> {
            self.calls.ocr.fetch_add(1, Ordering::SeqCst);
            Ok(self.text.to_string())
        }
    }

    struct MockQr {
        calls: Arc<Calls>,
        payloads: Vec<&'static str>,
    }

    impl QrDecoder for MockQr {
        fn decode(&self, _image: &GrayImage) -> std::result::Result<Vec<String>, QrError> {
            self.calls.qr.fetch_add(1, Ordering::SeqCst);
            Ok(self.payloads.iter().map(|p| p.to_string()).collect())
        }
    }

    struct MockPdf {
        calls: Arc<Calls>,
        text: &'static str,
    }

    impl PdfProcessor for MockPdf {
        fn first_page_text(&self, _data: &[u8]) -> crate::pdf::Result<String> {
            self.calls.pdf_text.fetch_add(1, Ordering::SeqCst);
            Ok(self.text.to_string())
        }

        fn render_first_page(&self, _data: &[u8]) -> crate::pdf::Result<DynamicImage> {
            self.calls.pdf_render.fetch_add(1, Ordering::SeqCst);
            if self.text.is_empty() {
                Ok(DynamicImage::ImageLuma8(GrayImage::from_pixel(16, 16, Luma([255]))))
            } else {
                Err(PdfError::Render("not needed".to_string()))
            }
        }
    }

    struct MockEnricher {
        calls: Arc<Calls>,
        outcome: EnrichmentOutcome,
    }

    #[async_trait]
    impl Enricher for MockEnricher {
        async fn enrich(&self, _text: &str) -> EnrichmentOutcome {
            self.calls.enrich.fetch_add(1, Ordering::SeqCst);
            self.outcome.clone()
        }
    }

    struct Fixture {
        pdf_text: &'static str,
        ocr_text: &'static str,
        qr: Vec<&'static str>,
        enrichment: EnrichmentOutcome,
    }

    impl Default for Fixture {
        fn default() -> Self {
            Self {
                pdf_text: "",
                ocr_text: "",
                qr: vec![],
                enrichment: EnrichmentOutcome::Completed("resumen".to_string()),
            }
        }
    }

    impl Fixture {
        fn build(self) -> (DocumentProcessor, Arc<Calls>) {
            let calls = Arc::new(Calls::default());
            let processor = DocumentProcessor::builder()
                .with_pdf_processor(Arc::new(MockPdf {
                    calls: calls.clone(),
                    text: self.pdf_text,
                }))
                .with_ocr_engine(Arc::new(MockOcr {
                    calls: calls.clone(),
                    text: self.ocr_text,
                }))
                .with_qr_decoder(Arc::new(MockQr {
                    calls: calls.clone(),
                    payloads: self.qr,
                }))
                .with_enricher(Arc::new(MockEnricher {
                    calls: calls.clone(),
                    outcome: self.enrichment,
                }))
                .build();
            (processor, calls)
        }
    }

    fn png_upload() -> Upload {
        let mut bytes = Vec::new();
        DynamicImage::ImageLuma8(GrayImage::from_pixel(16, 16, Luma([255])))
            .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        Upload::new("ticket.png", "image/png", bytes)
    }

    fn pdf_upload() -> Upload {
        Upload::new("factura.pdf", "application/pdf", b"%PDF-1.4".to_vec())
    }

    #[tokio::test]
    async fn test_qr_found_skips_ocr() {
        let (processor, calls) = Fixture {
            ocr_text: "Importe Total: $ 1,00",
            qr: vec!["  https://www.afip.gob.ar/fe/qr/?p=abc  "],
            ..Fixture::default()
        }
        .build();

        let record = processor
            .process(&png_upload(), ProcessOptions::default())
            .await
            .unwrap();

        assert_eq!(calls.ocr.load(Ordering::SeqCst), 0);
        assert_eq!(
            record.qr_content.as_deref(),
            Some("https://www.afip.gob.ar/fe/qr/?p=abc")
        );
        assert_eq!(record.text_content, "");
    }

    #[tokio::test]
    async fn test_blocking_stage_runs_off_the_executor() {
        let (processor, calls) = Fixture {
            pdf_text: VALID_TEXT,
            ..Fixture::default()
        }
        .build();
        let processor = Arc::new(processor);
        let options = ProcessOptions::default().with_enrichment(true);

        let worker = processor.clone();
        let mut record =
            tokio::task::spawn_blocking(move || worker.extract_record(&pdf_upload(), options))
                .await
                .unwrap()
                .unwrap();

        assert!(record.is_valid);
        assert!(record.unformatted.is_empty());
        assert_eq!(calls.enrich.load(Ordering::SeqCst), 0);

        processor.enrich_record(&mut record, options).await;
        assert_eq!(calls.enrich.load(Ordering::SeqCst), 1);
        assert_eq!(
            record.unformatted.get(ENRICHMENT_KEY).map(String::as_str),
            Some("resumen")
        );
    }

    #[test]
    fn test_extract_record_rejects_unsupported_type() {
        let (processor, calls) = Fixture::default().build();
        let upload = Upload::new("notes.txt", "text/plain", b"hola".to_vec());

        let err = processor
            .extract_record(&upload, ProcessOptions::default())
            .unwrap_err();
        assert!(err.is_client_error());
        assert_eq!(calls.total(), 0);
    }

    #[tokio::test]
    async fn test_qr_disabled_always_runs_ocr() {
        let (processor, calls) = Fixture {
            ocr_text: "Importe Total: $ 1,00",
            qr: vec!["payload"],
            ..Fixture::default()
        }
        .build();

        let record = processor
            .process(&png_upload(), ProcessOptions::default().with_qr(false))
            .await
            .unwrap();

        assert_eq!(calls.ocr.load(Ordering::SeqCst), 1);
        assert_eq!(calls.qr.load(Ordering::SeqCst), 0);
        assert_eq!(record.qr_content, None);
        assert_eq!(record.total_amount.as_deref(), Some("1,00"));
    }

    #[tokio::test]
    async fn test_image_without_qr_falls_through_to_ocr() {
        let (processor, calls) = Fixture {
            ocr_text: "Punto de Venta: 0001",
            ..Fixture::default()
        }
        .build();

        let record = processor
            .process(&png_upload(), ProcessOptions::default())
            .await
            .unwrap();

        assert_eq!(calls.qr.load(Ordering::SeqCst), 1);
        assert_eq!(calls.ocr.load(Ordering::SeqCst), 1);
        assert_eq!(record.point_of_sale.as_deref(), Some("0001"));
        assert_eq!(record.diagnostics[0], "No QR codes found in the image");
    }

    #[tokio::test]
    async fn test_scanned_pdf_end_to_end() {
        let (processor, calls) = Fixture {
            ocr_text: "Importe Total: $ 500,00",
            ..Fixture::default()
        }
        .build();

        let record = processor
            .process(&pdf_upload(), ProcessOptions::default().with_qr(false))
            .await
            .unwrap();

        assert_eq!(record.total_amount.as_deref(), Some("500,00"));
        assert!(
            record
                .diagnostics
                .contains(&"Converted first page to image for OCR".to_string())
        );
        assert!(!record.is_valid);
        assert_eq!(record.filename, "factura.pdf");
        assert_eq!(record.size, 8);
        assert_eq!(calls.ocr.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_pdf_runs_qr_and_text_independently() {
        let (processor, calls) = Fixture {
            pdf_text: VALID_TEXT,
            qr: vec!["payload"],
            ..Fixture::default()
        }
        .build();

        let record = processor
            .process(&pdf_upload(), ProcessOptions::default())
            .await
            .unwrap();

        // QR scan renders the page; the text layer makes OCR unnecessary.
        assert_eq!(calls.pdf_text.load(Ordering::SeqCst), 1);
        assert_eq!(calls.pdf_render.load(Ordering::SeqCst), 1);
        assert_eq!(calls.ocr.load(Ordering::SeqCst), 0);
        assert!(record.is_valid);
        assert_eq!(record.qr_content, None);
        assert!(record.diagnostics[0].starts_with("Error processing PDF for QR codes"));
    }

    #[tokio::test]
    async fn test_unsupported_type_invokes_nothing() {
        let (processor, calls) = Fixture::default().build();
        let upload = Upload::new("notes.txt", "text/plain", b"hola".to_vec());

        let err = processor
            .process(&upload, ProcessOptions::default().with_enrichment(true))
            .await
            .unwrap_err();

        assert!(matches!(err, ReciboError::UnsupportedType { .. }));
        assert_eq!(calls.total(), 0);
    }

    #[tokio::test]
    async fn test_copies_counted_before_dedup() {
        let (processor, _) = Fixture {
            pdf_text: "ORIGINAL\n\nImporte Total: $ 10,00\n\nDUPLICADO\n\nImporte Total: $ 10,00",
            ..Fixture::default()
        }
        .build();

        let record = processor
            .process(&pdf_upload(), ProcessOptions::default().with_qr(false))
            .await
            .unwrap();

        assert_eq!(record.copy_count, 2);
        assert_eq!(
            record.text_content,
            "ORIGINAL\n\nImporte Total: $ 10,00\n\nDUPLICADO"
        );
    }

    #[tokio::test]
    async fn test_enrichment_failure_does_not_touch_validity() {
        let (processor, calls) = Fixture {
            pdf_text: VALID_TEXT,
            enrichment: EnrichmentOutcome::Failed("service unavailable".to_string()),
            ..Fixture::default()
        }
        .build();

        let plain = processor
            .process(&pdf_upload(), ProcessOptions::default().with_qr(false))
            .await
            .unwrap();
        let enriched = processor
            .process(
                &pdf_upload(),
                ProcessOptions::default().with_qr(false).with_enrichment(true),
            )
            .await
            .unwrap();

        assert!(plain.is_valid);
        assert_eq!(enriched.is_valid, plain.is_valid);
        assert_eq!(calls.enrich.load(Ordering::SeqCst), 1);
        assert_eq!(
            enriched.unformatted.get(ENRICHMENT_KEY).map(String::as_str),
            Some("Error: service unavailable")
        );
        assert!(plain.unformatted.is_empty());
    }

    #[tokio::test]
    async fn test_enrichment_skipped_for_empty_text() {
        let (processor, calls) = Fixture::default().build();

        let record = processor
            .process(
                &pdf_upload(),
                ProcessOptions::default().with_qr(false).with_enrichment(true),
            )
            .await
            .unwrap();

        assert_eq!(calls.enrich.load(Ordering::SeqCst), 0);
        assert!(!record.unformatted.contains_key(ENRICHMENT_KEY));
    }

    #[tokio::test]
    async fn test_handle_builds_envelope() {
        let (processor, _) = Fixture {
            pdf_text: VALID_TEXT,
            ..Fixture::default()
        }
        .build();

        let ok = processor
            .handle(&pdf_upload(), ProcessOptions::default())
            .await;
        assert_eq!(ok.status, ResponseStatus::Success);
        assert_eq!(ok.status.http_status(), 200);
        assert!(ok.processing_time_ms.is_some());

        let rejected = processor
            .handle(
                &Upload::new("a.txt", "text/plain", vec![]),
                ProcessOptions::default(),
            )
            .await;
        assert_eq!(rejected.status, ResponseStatus::Rejected);
        assert_eq!(rejected.status.http_status(), 400);
        assert!(rejected.comprobante.is_none());
    }

    #[test]
    fn test_guess_content_type() {
        assert_eq!(guess_content_type(Path::new("a/FACTURA.PDF")), "application/pdf");
        assert_eq!(guess_content_type(Path::new("scan.jpeg")), "image/jpeg");
        assert_eq!(guess_content_type(Path::new("notes.txt")), "text/plain");
        assert_eq!(guess_content_type(Path::new("blob")), "application/octet-stream");
    }
}
