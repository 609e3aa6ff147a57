use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;

use crate::core::config::PdfOptions;
use crate::core::error::{InvoiceError, InvoiceResult};

/// Boundary to the external HTML→PDF engine.
///
/// Synchronous from the caller's perspective: when `convert` returns, the
/// PDF at `output_path` is complete or the conversion has failed. The
/// converter resolves relative asset URLs against the directory containing
/// the input HTML.
#[async_trait]
pub trait HtmlToPdf: Send + Sync {
    async fn convert(
        &self,
        html_path: &Path,
        output_path: &Path,
        options: &PdfOptions,
    ) -> InvoiceResult<()>;
}

/// Converter backed by the wkhtmltopdf CLI.
pub struct WkhtmltopdfConverter {
    binary: String,
}

impl WkhtmltopdfConverter {
    pub fn new(binary: impl Into<String>) -> Self {
        WkhtmltopdfConverter { binary: binary.into() }
    }
}

impl Default for WkhtmltopdfConverter {
    fn default() -> Self {
        Self::new("wkhtmltopdf")
    }
}

#[async_trait]
impl HtmlToPdf for WkhtmltopdfConverter {
    async fn convert(
        &self,
        html_path: &Path,
        output_path: &Path,
        options: &PdfOptions,
    ) -> InvoiceResult<()> {
        let mut command = Command::new(&self.binary);
        command
            .args(options.to_args())
            .arg(html_path)
            .arg(output_path)
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            // Timing out must not leave a converter running
            .kill_on_drop(true);

        tracing::debug!("running {} {:?} -> {:?}", self.binary, html_path, output_path);

        let child = command.spawn().map_err(|err| {
            InvoiceError::ConversionFailed(format!("failed to spawn {}: {}", self.binary, err))
        })?;

        let output = match tokio::time::timeout(options.timeout, child.wait_with_output()).await {
            Ok(result) => {
                result.map_err(|err| InvoiceError::ConversionFailed(err.to_string()))?
            }
            Err(_) => {
                let _ = tokio::fs::remove_file(output_path).await;
                return Err(InvoiceError::ConversionFailed(format!(
                    "conversion timed out after {:?}",
                    options.timeout
                )));
            }
        };

        if !output.status.success() {
            // A partial PDF is never valid
            let _ = tokio::fs::remove_file(output_path).await;
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(InvoiceError::ConversionFailed(format!(
                "{} exited with {}: {}",
                self.binary,
                output.status,
                stderr.trim()
            )));
        }

        Ok(())
    }
}
