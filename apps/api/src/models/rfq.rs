use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

/// Stored RFQ. `extracted_requirements` is kept as opaque JSON; read it through
/// `ExtractedRequirements::from_value` when a typed view is needed.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RfqRow {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub original_content: String,
    pub extracted_requirements: Value,
    pub user_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
