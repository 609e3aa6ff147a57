use thiserror::Error;

/// Failures the invoice pipeline can surface to callers.
///
/// Counter storage failures are intentionally absent: the sequence counter
/// logs and degrades instead of failing the request (see `numbering`).
#[derive(Debug, Error)]
pub enum InvoiceError {
    #[error("invalid or empty invoice payload: {0}")]
    InvalidPayload(String),

    #[error("unsupported logo format: {0}")]
    UnsupportedLogoFormat(String),

    #[error("PDF conversion failed: {0}")]
    ConversionFailed(String),

    #[error("no invoice has been generated yet")]
    ArtifactNotFound,

    #[error("template error: {0}")]
    Template(#[from] minijinja::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type InvoiceResult<T> = Result<T, InvoiceError>;
