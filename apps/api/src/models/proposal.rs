use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

/// A persisted supplier match plus its (optional) generated email.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ProposalRow {
    pub id: Uuid,
    pub rfq_id: Uuid,
    pub product_id: Uuid,
    pub score: f64,
    /// Criterion name → sub-score in [0, 100].
    pub criterion_scores: Value,
    pub total_price: f64,
    pub email_to: Option<String>,
    pub email_cc: Option<String>,
    pub email_subject: Option<String>,
    pub email_body: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
