use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::core::config::PdfOptions;
use crate::generator::InvoiceGenerator;
use crate::numbering::{FileCounterStore, SequenceCounter};
use crate::pdf::WkhtmltopdfConverter;
use crate::templates::TemplateEngine;

#[derive(Clone)]
pub struct ApiState {
    pub generator: Arc<InvoiceGenerator>,
    pub config: Arc<AppConfig>,
}

#[derive(Clone)]
pub struct AppConfig {
    pub work_dir: PathBuf,
    pub counter_file: PathBuf,
    pub pdf_binary: String,
    pub conversion_timeout_ms: u64,
    pub max_payload_size_bytes: usize,
    pub max_logo_size_bytes: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            work_dir: PathBuf::from("public/temp"),
            counter_file: PathBuf::from("invoice-store.json"),
            pdf_binary: "wkhtmltopdf".to_string(),
            conversion_timeout_ms: 30_000,
            max_payload_size_bytes: 1_048_576, // 1MB
            max_logo_size_bytes: 1_048_576,    // 1MB, same cap the upload form enforces
        }
    }
}

impl ApiState {
    pub fn new(config: AppConfig) -> anyhow::Result<Self> {
        let counter =
            SequenceCounter::new(Arc::new(FileCounterStore::new(config.counter_file.clone())));

        let engine = TemplateEngine::new()?;
        let converter = Arc::new(WkhtmltopdfConverter::new(config.pdf_binary.clone()));

        let options = PdfOptions::builder()
            .timeout(Duration::from_millis(config.conversion_timeout_ms))
            .build();

        let generator = Arc::new(InvoiceGenerator::new(
            counter,
            engine,
            converter,
            config.work_dir.clone(),
            options,
        ));

        Ok(ApiState {
            generator,
            config: Arc::new(config),
        })
    }
}
