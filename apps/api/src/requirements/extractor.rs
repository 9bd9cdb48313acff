//! Requirement extraction: validate input, read documents, delegate to the
//! assistant, and fill defaults the model may have left out.

use bytes::Bytes;
use tracing::{info, warn};

use crate::assistant::ProcurementAssistant;
use crate::errors::AppError;
use crate::requirements::models::ExtractedRequirements;

/// Inputs shorter than this (ignoring whitespace) are not worth a model call.
pub const MIN_CONTENT_CHARS: usize = 10;

/// Extracts requirements from free text. Exactly one assistant call, no retry.
pub async fn extract(
    text: &str,
    assistant: &dyn ProcurementAssistant,
) -> Result<ExtractedRequirements, AppError> {
    let significant = text.chars().filter(|c| !c.is_whitespace()).count();
    if significant < MIN_CONTENT_CHARS {
        return Err(AppError::Validation(format!(
            "RFQ content must contain at least {MIN_CONTENT_CHARS} non-whitespace characters"
        )));
    }

    let mut requirements = assistant.extract_requirements(text).await?;
    normalize(&mut requirements);
    Ok(requirements)
}

/// Reads an uploaded document into text and extracts requirements from it.
pub async fn extract_document(
    file_name: &str,
    bytes: Bytes,
    assistant: &dyn ProcurementAssistant,
) -> Result<(String, ExtractedRequirements), AppError> {
    let text = document_text(file_name, bytes).await?;
    info!("Read {} characters from '{}'", text.len(), file_name);
    let requirements = extract(&text, assistant).await?;
    Ok((text, requirements))
}

pub fn is_pdf(file_name: &str, bytes: &[u8]) -> bool {
    file_name.to_ascii_lowercase().ends_with(".pdf") || bytes.starts_with(b"%PDF")
}

/// PDFs go through `pdf-extract` on the blocking pool; anything else is read
/// as lossy UTF-8.
pub async fn document_text(file_name: &str, bytes: Bytes) -> Result<String, AppError> {
    if !is_pdf(file_name, &bytes) {
        return Ok(String::from_utf8_lossy(&bytes).into_owned());
    }

    let outcome = tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&bytes)).await;
    let unreadable = || AppError::UnprocessableEntity(format!("Could not read text from PDF '{file_name}'"));
    match outcome {
        Ok(Ok(text)) => Ok(text),
        Ok(Err(e)) => {
            warn!("Could not read PDF '{file_name}': {e}");
            Err(unreadable())
        }
        // pdf-extract panics on some malformed inputs
        Err(e) => {
            warn!("PDF reader aborted on '{file_name}': {e}");
            Err(unreadable())
        }
    }
}

/// Fills gaps in model output: a missing title, missing categories (inferred
/// from the blocks present), and zero quantities.
pub fn normalize(requirements: &mut ExtractedRequirements) {
    if requirements.title.trim().is_empty() {
        requirements.title = "Equipment Procurement".to_string();
    }
    if requirements.categories.is_empty() {
        if requirements.laptops.is_some() {
            requirements.categories.push("Laptops".to_string());
        }
        if requirements.monitors.is_some() {
            requirements.categories.push("Monitors".to_string());
        }
        if requirements.ai_hardware.is_some() {
            requirements.categories.push("GPU".to_string());
        }
    }
    if let Some(laptops) = requirements.laptops.as_mut() {
        laptops.quantity = laptops.quantity.max(1);
    }
    if let Some(monitors) = requirements.monitors.as_mut() {
        monitors.quantity = monitors.quantity.max(1);
    }
    if let Some(hardware) = requirements.ai_hardware.as_mut() {
        hardware.quantity = hardware.quantity.max(1);
    }
}
