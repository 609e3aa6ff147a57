use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use std::path::Path;

use crate::core::error::{InvoiceError, InvoiceResult};

pub const ALLOWED_EXTENSIONS: [&str; 3] = [".png", ".jpg", ".jpeg"];

/// File name the uploaded logo is saved under (extension preserved).
pub const UPLOADED_LOGO_STEM: &str = "invoiceLogo";

/// Operator-provided store logo, used when no logo was uploaded.
pub const FALLBACK_LOGO_FILE: &str = "company_logo.jpg";

/// Uploaded logo as handed over by the HTTP layer: raw bytes plus the
/// original file name (only its extension is trusted).
#[derive(Debug, Clone)]
pub struct LogoUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Returns the normalized extension (".png") or rejects the upload.
pub fn validate_extension(file_name: &str) -> InvoiceResult<String> {
    let ext = Path::new(file_name)
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy().to_lowercase()))
        .unwrap_or_default();

    if ALLOWED_EXTENSIONS.contains(&ext.as_str()) {
        Ok(ext)
    } else {
        Err(InvoiceError::UnsupportedLogoFormat(file_name.to_string()))
    }
}

pub fn saved_file_name(extension: &str) -> String {
    format!("{}{}", UPLOADED_LOGO_STEM, extension)
}

fn mime_type(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("jpg") || ext.eq_ignore_ascii_case("jpeg") => {
            "image/jpeg"
        }
        _ => "image/png",
    }
}

/// Inlines the logo as a data URI. The uploaded file (if any) wins over the
/// store fallback; if neither is readable the image reference is left empty
/// rather than failing the render.
pub fn resolve_data_uri(work_dir: &Path, uploaded_file_name: Option<&str>) -> String {
    let mut candidates = Vec::new();
    if let Some(name) = uploaded_file_name {
        candidates.push(work_dir.join(name));
    }
    candidates.push(work_dir.join(FALLBACK_LOGO_FILE));

    for path in &candidates {
        match std::fs::read(path) {
            Ok(bytes) => {
                return format!("data:{};base64,{}", mime_type(path), BASE64.encode(bytes));
            }
            Err(err) => {
                tracing::debug!("logo candidate {:?} not readable: {}", path, err);
            }
        }
    }

    tracing::warn!("failed to load logo image, rendering without one");
    String::new()
}
