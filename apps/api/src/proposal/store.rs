use serde_json::Value;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::proposal::ProposalRow;

pub struct NewProposal {
    pub rfq_id: Uuid,
    pub product_id: Uuid,
    pub score: f64,
    pub criterion_scores: Value,
    pub total_price: f64,
}

pub async fn insert_proposal(
    tx: &mut Transaction<'_, Postgres>,
    proposal: NewProposal,
) -> Result<ProposalRow, AppError> {
    let row = sqlx::query_as::<_, ProposalRow>(
        r#"INSERT INTO proposals (rfq_id, product_id, score, criterion_scores, total_price)
           VALUES ($1, $2, $3, $4, $5)
           RETURNING *"#,
    )
    .bind(proposal.rfq_id)
    .bind(proposal.product_id)
    .bind(proposal.score)
    .bind(proposal.criterion_scores)
    .bind(proposal.total_price)
    .fetch_one(&mut **tx)
    .await?;
    Ok(row)
}

pub async fn get_proposal(pool: &PgPool, id: Uuid) -> Result<ProposalRow, AppError> {
    sqlx::query_as::<_, ProposalRow>("SELECT * FROM proposals WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Proposal {id} not found")))
}

/// Best first, newest first among equal scores.
pub async fn list_proposals_for_rfq(pool: &PgPool, rfq_id: Uuid) -> Result<Vec<ProposalRow>, AppError> {
    let rows = sqlx::query_as::<_, ProposalRow>(
        "SELECT * FROM proposals WHERE rfq_id = $1 ORDER BY score DESC, created_at DESC",
    )
    .bind(rfq_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn update_email(
    pool: &PgPool,
    id: Uuid,
    to: &str,
    cc: Option<&str>,
    subject: &str,
    body: &str,
) -> Result<ProposalRow, AppError> {
    sqlx::query_as::<_, ProposalRow>(
        r#"UPDATE proposals
           SET email_to = $2, email_cc = $3, email_subject = $4, email_body = $5, updated_at = now()
           WHERE id = $1
           RETURNING *"#,
    )
    .bind(id)
    .bind(to)
    .bind(cc)
    .bind(subject)
    .bind(body)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("Proposal {id} not found")))
}
