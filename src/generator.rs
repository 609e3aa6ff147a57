use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::core::config::PdfOptions;
use crate::core::error::{InvoiceError, InvoiceResult};
use crate::models::InvoicePayload;
use crate::numbering::SequenceCounter;
use crate::pdf::HtmlToPdf;
use crate::templates::{logo, LogoUpload, TemplateEngine};

pub const HTML_FILE: &str = "invoice.html";
pub const PDF_FILE: &str = "invoice.pdf";

/// Result of a completed creation request. The PDF bytes are returned
/// directly so callers do not have to re-read the artifact slot.
pub struct GeneratedInvoice {
    pub invoice_number: String,
    pub artifact_path: PathBuf,
    pub pdf: Vec<u8>,
}

/// Drives one invoice creation end to end: payload validation → number
/// assignment → logo resolution → HTML render → PDF conversion.
///
/// Artifacts live at fixed single-slot paths in the work directory, so the
/// whole pipeline runs under a mutex: at most one creation is in flight.
pub struct InvoiceGenerator {
    counter: SequenceCounter,
    engine: TemplateEngine,
    converter: Arc<dyn HtmlToPdf>,
    work_dir: PathBuf,
    options: PdfOptions,
    in_flight: Mutex<()>,
}

impl InvoiceGenerator {
    pub fn new(
        counter: SequenceCounter,
        engine: TemplateEngine,
        converter: Arc<dyn HtmlToPdf>,
        work_dir: impl Into<PathBuf>,
        options: PdfOptions,
    ) -> Self {
        InvoiceGenerator {
            counter,
            engine,
            converter,
            work_dir: work_dir.into(),
            options,
            in_flight: Mutex::new(()),
        }
    }

    /// Parses the raw `invoiceData` form field. An absent, empty, or
    /// non-object payload is rejected before any state is touched.
    pub fn parse_payload(raw: &str) -> InvoiceResult<InvoicePayload> {
        let value: serde_json::Value = serde_json::from_str(raw)
            .map_err(|err| InvoiceError::InvalidPayload(err.to_string()))?;

        match value.as_object() {
            Some(map) if !map.is_empty() => serde_json::from_value(value.clone())
                .map_err(|err| InvoiceError::InvalidPayload(err.to_string())),
            _ => Err(InvoiceError::InvalidPayload(
                "invoice data must be a non-empty object".to_string(),
            )),
        }
    }

    pub async fn create_invoice(
        &self,
        mut payload: InvoicePayload,
        logo_upload: Option<LogoUpload>,
    ) -> InvoiceResult<GeneratedInvoice> {
        let _guard = self.in_flight.lock().await;

        // Validation happens before a number is consumed, so a rejected
        // request never burns a sequence value.
        let logo_ext = match &logo_upload {
            Some(upload) => Some(logo::validate_extension(&upload.file_name)?),
            None => None,
        };

        tokio::fs::create_dir_all(&self.work_dir).await?;

        let invoice_number = self.counter.issue_next().await;
        payload.details.invoice_number = Some(invoice_number.clone());
        if payload.details.invoice_date.is_empty() {
            payload.details.invoice_date = chrono::Local::now().format("%d/%m/%Y").to_string();
        }

        if let (Some(upload), Some(ext)) = (&logo_upload, &logo_ext) {
            let file_name = logo::saved_file_name(ext);
            tokio::fs::write(self.work_dir.join(&file_name), &upload.bytes).await?;
            payload.details.company_logo = Some(file_name);
        }

        let logo_uri =
            logo::resolve_data_uri(&self.work_dir, payload.details.company_logo.as_deref());

        let html = self.engine.render_invoice(&payload, &logo_uri)?;

        let html_path = self.work_dir.join(HTML_FILE);
        tokio::fs::write(&html_path, html.trim()).await?;

        let pdf_path = self.work_dir.join(PDF_FILE);
        self.converter
            .convert(&html_path, &pdf_path, &self.options)
            .await?;

        let pdf = tokio::fs::read(&pdf_path).await?;

        tracing::info!("generated invoice {} ({} bytes)", invoice_number, pdf.len());

        Ok(GeneratedInvoice {
            invoice_number,
            artifact_path: pdf_path,
            pdf,
        })
    }

    /// Latest PDF artifact, if any creation request has completed.
    pub async fn fetch_latest(&self) -> InvoiceResult<Vec<u8>> {
        let pdf_path = self.work_dir.join(PDF_FILE);
        match tokio::fs::read(&pdf_path).await {
            Ok(bytes) => Ok(bytes),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                Err(InvoiceError::ArtifactNotFound)
            }
            Err(err) => Err(err.into()),
        }
    }

    pub async fn reset_sequence(&self) {
        self.counter.reset().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numbering::MemoryCounterStore;
    use async_trait::async_trait;
    use std::path::Path;
    use tempfile::{tempdir, TempDir};

    struct FakeConverter;

    #[async_trait]
    impl HtmlToPdf for FakeConverter {
        async fn convert(
            &self,
            html_path: &Path,
            output_path: &Path,
            _options: &PdfOptions,
        ) -> InvoiceResult<()> {
            let html = tokio::fs::read_to_string(html_path).await?;
            tokio::fs::write(output_path, format!("%PDF-1.4 {} bytes", html.len())).await?;
            Ok(())
        }
    }

    struct FailingConverter;

    #[async_trait]
    impl HtmlToPdf for FailingConverter {
        async fn convert(
            &self,
            _html_path: &Path,
            _output_path: &Path,
            _options: &PdfOptions,
        ) -> InvoiceResult<()> {
            Err(InvoiceError::ConversionFailed("boom".to_string()))
        }
    }

    fn generator_in(dir: &TempDir, converter: Arc<dyn HtmlToPdf>) -> InvoiceGenerator {
        InvoiceGenerator::new(
            SequenceCounter::new(Arc::new(MemoryCounterStore::new())),
            TemplateEngine::new().unwrap(),
            converter,
            dir.path(),
            PdfOptions::default(),
        )
    }

    fn sample_payload() -> InvoicePayload {
        InvoiceGenerator::parse_payload(
            r#"{
                "details": {"currency": "INR", "billingName": "A", "billingPhone": "1", "billingAddress": "X"},
                "lineItems": [{"description": "Soap", "quantity": 2, "price": 25.5}]
            }"#,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn creates_invoice_and_artifact() {
        let dir = tempdir().unwrap();
        let generator = generator_in(&dir, Arc::new(FakeConverter));

        let result = generator
            .create_invoice(sample_payload(), None)
            .await
            .unwrap();

        assert_eq!(result.invoice_number, "INV-1");
        assert!(result.artifact_path.exists());
        assert!(result.pdf.starts_with(b"%PDF"));
        assert_eq!(generator.fetch_latest().await.unwrap(), result.pdf);

        let html = std::fs::read_to_string(dir.path().join(HTML_FILE)).unwrap();
        assert!(html.contains("INV-1"));
        assert!(html.contains("₹51.00"));
    }

    #[tokio::test]
    async fn client_supplied_invoice_number_is_overwritten() {
        let dir = tempdir().unwrap();
        let generator = generator_in(&dir, Arc::new(FakeConverter));

        let mut payload = sample_payload();
        payload.details.invoice_number = Some("INV-999".to_string());

        let result = generator.create_invoice(payload, None).await.unwrap();
        assert_eq!(result.invoice_number, "INV-1");

        let html = std::fs::read_to_string(dir.path().join(HTML_FILE)).unwrap();
        assert!(!html.contains("INV-999"));
    }

    #[tokio::test]
    async fn fetch_before_any_creation_is_not_found() {
        let dir = tempdir().unwrap();
        let generator = generator_in(&dir, Arc::new(FakeConverter));

        match generator.fetch_latest().await {
            Err(InvoiceError::ArtifactNotFound) => {}
            other => panic!("expected ArtifactNotFound, got {:?}", other.map(|b| b.len())),
        }
    }

    #[tokio::test]
    async fn rejected_logo_does_not_burn_a_sequence_number() {
        let dir = tempdir().unwrap();
        let generator = generator_in(&dir, Arc::new(FakeConverter));

        let upload = LogoUpload {
            file_name: "logo.gif".to_string(),
            bytes: vec![0x47, 0x49, 0x46],
        };
        match generator.create_invoice(sample_payload(), Some(upload)).await {
            Err(InvoiceError::UnsupportedLogoFormat(_)) => {}
            other => panic!("expected UnsupportedLogoFormat, got {:?}", other.is_ok()),
        }

        // No document was produced and the next request still gets INV-1
        assert!(matches!(
            generator.fetch_latest().await,
            Err(InvoiceError::ArtifactNotFound)
        ));
        let result = generator
            .create_invoice(sample_payload(), None)
            .await
            .unwrap();
        assert_eq!(result.invoice_number, "INV-1");
    }

    #[tokio::test]
    async fn uploaded_logo_is_saved_and_inlined() {
        let dir = tempdir().unwrap();
        let generator = generator_in(&dir, Arc::new(FakeConverter));

        let upload = LogoUpload {
            file_name: "Shop Logo.PNG".to_string(),
            bytes: vec![0x89, 0x50, 0x4e, 0x47],
        };
        generator
            .create_invoice(sample_payload(), Some(upload))
            .await
            .unwrap();

        assert!(dir.path().join("invoiceLogo.png").exists());
        let html = std::fs::read_to_string(dir.path().join(HTML_FILE)).unwrap();
        assert!(html.contains("data:image/png;base64,"));
    }

    #[tokio::test]
    async fn converter_failure_surfaces_and_leaves_no_artifact() {
        let dir = tempdir().unwrap();
        let generator = generator_in(&dir, Arc::new(FailingConverter));

        match generator.create_invoice(sample_payload(), None).await {
            Err(InvoiceError::ConversionFailed(msg)) => assert!(msg.contains("boom")),
            other => panic!("expected ConversionFailed, got {:?}", other.is_ok()),
        }
        assert!(matches!(
            generator.fetch_latest().await,
            Err(InvoiceError::ArtifactNotFound)
        ));
    }

    #[tokio::test]
    async fn parse_payload_rejects_empty_object() {
        for raw in ["{}", "null", "[]", "not json"] {
            match InvoiceGenerator::parse_payload(raw) {
                Err(InvoiceError::InvalidPayload(_)) => {}
                other => panic!("expected InvalidPayload for {:?}, got {:?}", raw, other.is_ok()),
            }
        }
    }
}
