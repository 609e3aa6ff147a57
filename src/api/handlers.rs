use actix_multipart::{Field, Multipart};
use actix_web::{http::StatusCode, web, HttpResponse};
use futures::StreamExt;
use serde_json::json;

use crate::generator::InvoiceGenerator;
use crate::templates::LogoUpload;

use super::error::{ApiError, ApiResult};
use super::state::ApiState;

/// Create an invoice from the browser form.
///
/// Multipart fields: `invoiceData` (JSON text, required) and `companyLogo`
/// (optional image file). Responds with the assigned invoice number and the
/// artifact path.
pub async fn create_invoice(
    mut payload: Multipart,
    state: web::Data<ApiState>,
) -> ApiResult<HttpResponse> {
    let mut invoice_data: Option<String> = None;
    let mut logo: Option<LogoUpload> = None;

    while let Some(field) = payload.next().await {
        let mut field = field?;
        let name = field.name().to_string();

        match name.as_str() {
            "invoiceData" => {
                let bytes = read_field(&mut field, state.config.max_payload_size_bytes).await?;
                let text = String::from_utf8(bytes)
                    .map_err(|_| ApiError::bad_request("invoiceData must be UTF-8 text"))?;
                invoice_data = Some(text);
            }
            "companyLogo" => {
                let file_name = field
                    .content_disposition()
                    .get_filename()
                    .map(|s| s.to_string())
                    .unwrap_or_default();
                let bytes = read_field(&mut field, state.config.max_logo_size_bytes).await?;
                if !bytes.is_empty() {
                    logo = Some(LogoUpload { file_name, bytes });
                }
            }
            _ => {
                // Drain and ignore unknown fields
                while let Some(chunk) = field.next().await {
                    chunk?;
                }
            }
        }
    }

    let raw = invoice_data.ok_or_else(|| ApiError::bad_request("Invalid or empty payload"))?;
    let parsed = InvoiceGenerator::parse_payload(&raw)?;

    let generated = state.generator.create_invoice(parsed, logo).await?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Invoice created successfully",
        "invoiceNumber": generated.invoice_number,
        "artifactPath": generated.artifact_path.display().to_string(),
    })))
}

/// Download the most recently generated invoice PDF.
pub async fn download_latest(state: web::Data<ApiState>) -> ApiResult<HttpResponse> {
    let pdf = state.generator.fetch_latest().await?;

    Ok(HttpResponse::Ok()
        .content_type("application/pdf")
        .body(pdf))
}

/// Administrative reset of the invoice sequence.
pub async fn reset_sequence(state: web::Data<ApiState>) -> ApiResult<HttpResponse> {
    state.generator.reset_sequence().await;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Invoice count has been reset to 0"
    })))
}

/// Reads a multipart field into memory, enforcing the size cap.
async fn read_field(field: &mut Field, max_size: usize) -> ApiResult<Vec<u8>> {
    let mut data = Vec::new();

    while let Some(chunk) = field.next().await {
        let chunk = chunk?;
        if data.len() + chunk.len() > max_size {
            return Err(ApiError::new(
                format!("Field too large, limit is {} bytes", max_size),
                StatusCode::PAYLOAD_TOO_LARGE,
            ));
        }
        data.extend_from_slice(&chunk);
    }

    Ok(data)
}
