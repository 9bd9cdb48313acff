use aws_sdk_s3::primitives::ByteStream;
use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::rfq::RfqRow;
use crate::requirements::extractor::{self, is_pdf};
use crate::requirements::models::{ExtractedRequirements, RequirementProfile};
use crate::requirements::store::{self, NewRfq};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateRfqRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    /// Free-text specifications handed to the extractor.
    pub specifications: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateRfqRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub extracted_requirements: Value,
}

#[derive(Debug, Serialize)]
pub struct RfqResponse {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub extracted_requirements: Value,
    /// `None` when the stored requirements no longer parse.
    pub profile: Option<RequirementProfile>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<RfqRow> for RfqResponse {
    fn from(row: RfqRow) -> Self {
        let profile = ExtractedRequirements::from_value(&row.extracted_requirements)
            .ok()
            .map(|r| r.profile());
        RfqResponse {
            id: row.id,
            title: row.title,
            description: row.description,
            extracted_requirements: row.extracted_requirements,
            profile,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// POST /api/v1/rfqs
pub async fn handle_create_rfq(
    State(state): State<AppState>,
    Json(req): Json<CreateRfqRequest>,
) -> Result<(StatusCode, Json<RfqResponse>), AppError> {
    let mut requirements = extractor::extract(&req.specifications, state.assistant.as_ref()).await?;

    if let Some(title) = non_blank(req.title.as_deref()) {
        requirements.title = title.to_string();
    }
    if let Some(description) = non_blank(req.description.as_deref()) {
        requirements.description = Some(description.to_string());
    }

    let row = persist(&state, Uuid::new_v4(), &req.specifications, &requirements).await?;
    info!("Created RFQ {} via {} assistant", row.id, state.assistant.backend());
    Ok((StatusCode::CREATED, Json(row.into())))
}

/// POST /api/v1/rfqs/upload
pub async fn handle_upload_rfq(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<RfqResponse>), AppError> {
    let mut upload: Option<(String, Bytes)> = None;
    let mut title: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        match field.name() {
            Some("file") => {
                let file_name = field
                    .file_name()
                    .map(sanitize_file_name)
                    .unwrap_or_else(|| "rfq.txt".to_string());
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Could not read upload: {e}")))?;
                upload = Some((file_name, bytes));
            }
            Some("title") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("Could not read title: {e}")))?;
                title = Some(text);
            }
            _ => {}
        }
    }

    let (file_name, bytes) =
        upload.ok_or_else(|| AppError::Validation("multipart field 'file' is required".to_string()))?;
    if bytes.is_empty() {
        return Err(AppError::Validation(format!("'{file_name}' is empty")));
    }

    let rfq_id = Uuid::new_v4();
    archive_document(&state, rfq_id, &file_name, bytes.clone()).await?;

    let (text, mut requirements) =
        extractor::extract_document(&file_name, bytes, state.assistant.as_ref()).await?;
    if let Some(title) = non_blank(title.as_deref()) {
        requirements.title = title.to_string();
    }

    let row = persist(&state, rfq_id, &text, &requirements).await?;
    info!("Created RFQ {} from upload '{}'", row.id, file_name);
    Ok((StatusCode::CREATED, Json(row.into())))
}

/// PUT /api/v1/rfqs/:id
pub async fn handle_update_rfq(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateRfqRequest>,
) -> Result<Json<RfqResponse>, AppError> {
    let requirements = ExtractedRequirements::from_value(&req.extracted_requirements)
        .map_err(|e| AppError::Validation(format!("Invalid extracted_requirements: {e}")))?;
    requirements.validate()?;

    let row = store::update_rfq(
        &state.db,
        id,
        non_blank(req.title.as_deref()),
        req.description.as_deref(),
        requirements.to_value()?,
    )
    .await?;
    Ok(Json(row.into()))
}

/// GET /api/v1/rfqs
pub async fn handle_list_rfqs(
    State(state): State<AppState>,
) -> Result<Json<Vec<RfqResponse>>, AppError> {
    let rows = store::list_rfqs(&state.db).await?;
    Ok(Json(rows.into_iter().map(RfqResponse::from).collect()))
}

/// GET /api/v1/rfqs/:id
pub async fn handle_get_rfq(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<RfqResponse>, AppError> {
    let row = store::get_rfq(&state.db, id).await?;
    Ok(Json(row.into()))
}

async fn persist(
    state: &AppState,
    id: Uuid,
    original_content: &str,
    requirements: &ExtractedRequirements,
) -> Result<RfqRow, AppError> {
    let owner = store::default_user(&state.db).await?;
    store::insert_rfq(
        &state.db,
        NewRfq {
            id,
            title: &requirements.title,
            description: requirements.description.as_deref().unwrap_or_default(),
            original_content,
            extracted_requirements: requirements.to_value()?,
            user_id: owner.map(|u| u.id),
        },
    )
    .await
}

async fn archive_document(
    state: &AppState,
    rfq_id: Uuid,
    file_name: &str,
    bytes: Bytes,
) -> Result<(), AppError> {
    let key = format!("rfqs/{rfq_id}/{file_name}");
    let content_type = if is_pdf(file_name, &bytes) {
        "application/pdf"
    } else {
        "text/plain"
    };

    state
        .s3
        .put_object()
        .bucket(&state.config.s3_bucket)
        .key(&key)
        .body(ByteStream::from(bytes))
        .content_type(content_type)
        .send()
        .await
        .map_err(|e| AppError::S3(format!("upload of {key} failed: {e}")))?;

    info!("Archived RFQ document to s3://{}/{}", state.config.s3_bucket, key);
    Ok(())
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Keeps only the final path component and replaces characters that are
/// awkward in object keys.
fn sanitize_file_name(raw: &str) -> String {
    let base = raw.rsplit(['/', '\\']).next().unwrap_or(raw);
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.trim_matches('.').is_empty() {
        "rfq.txt".to_string()
    } else {
        cleaned
    }
}
