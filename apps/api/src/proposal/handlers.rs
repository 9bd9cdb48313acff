use axum::{
    extract::{Path, State},
    http::header,
    response::IntoResponse,
    Json,
};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::catalog::repository;
use crate::errors::AppError;
use crate::proposal::email::{self, EmailTemplate};
use crate::proposal::pdf::render_email_pdf;
use crate::proposal::store;
use crate::requirements::store::get_rfq;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ProposalEmailResponse {
    pub proposal_id: Uuid,
    #[serde(flatten)]
    pub email: EmailTemplate,
}

/// POST /api/v1/proposals/:id/generate-email
pub async fn handle_generate_email(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ProposalEmailResponse>, AppError> {
    let proposal = store::get_proposal(&state.db, id).await?;
    let rfq = get_rfq(&state.db, proposal.rfq_id).await?;
    let product = repository::get_product(&state.db, proposal.product_id).await?;
    let supplier = repository::get_supplier(&state.db, product.supplier_id).await?;

    let context = email::email_context(&rfq, &proposal, &product, &supplier);
    let template = email::generate_email(state.assistant.as_ref(), &context).await?;

    store::update_email(
        &state.db,
        id,
        &template.to,
        template.cc.as_deref(),
        &template.subject,
        &template.body,
    )
    .await?;

    Ok(Json(ProposalEmailResponse {
        proposal_id: id,
        email: template,
    }))
}

/// PUT /api/v1/email-templates/:id
pub async fn handle_update_email(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(template): Json<EmailTemplate>,
) -> Result<Json<ProposalEmailResponse>, AppError> {
    let template = template.normalized();
    template.validate()?;

    store::update_email(
        &state.db,
        id,
        &template.to,
        template.cc.as_deref(),
        &template.subject,
        &template.body,
    )
    .await?;
    info!("Updated email template for proposal {id}");

    Ok(Json(ProposalEmailResponse {
        proposal_id: id,
        email: template,
    }))
}

/// GET /api/v1/proposals/:id/pdf
pub async fn handle_proposal_pdf(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let proposal = store::get_proposal(&state.db, id).await?;
    let template = EmailTemplate::from_proposal(&proposal).ok_or_else(|| {
        AppError::NotFound(format!("No email has been generated for proposal {id}"))
    })?;

    let bytes = render_email_pdf(template).await?;
    info!("Rendered proposal {id} to PDF ({} bytes)", bytes.len());

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"proposal-{id}.pdf\""),
            ),
        ],
        bytes,
    ))
}
