use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SupplierRow {
    pub id: Uuid,
    pub name: String,
    pub logo_url: Option<String>,
    pub website: Option<String>,
    pub country: Option<String>,
    pub description: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    /// Free text, e.g. "15-30 days".
    pub delivery_time: String,
    pub is_verified: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ProductRow {
    pub id: Uuid,
    pub supplier_id: Uuid,
    pub name: String,
    pub category: String,
    pub description: Option<String>,
    pub price: f64,
    /// Free-form specification blob; keys vary by category.
    pub specifications: Value,
    pub warranty: String,
}

impl ProductRow {
    /// Returns a specification value rendered as a string, if present.
    pub fn spec_str(&self, key: &str) -> Option<String> {
        match self.specifications.get(key)? {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}
