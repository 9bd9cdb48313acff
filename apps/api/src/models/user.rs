use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Buyer country assumed when the RFQ owner has none on file.
pub const DEFAULT_BUYER_COUNTRY: &str = "United States";

/// Username of the seeded buyer that owns RFQs created without an account.
pub const DEFAULT_USERNAME: &str = "procurement";

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub full_name: Option<String>,
    pub company: Option<String>,
    pub country: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn buyer_country(&self) -> &str {
        self.country
            .as_deref()
            .filter(|c| !c.trim().is_empty())
            .unwrap_or(DEFAULT_BUYER_COUNTRY)
    }
}
