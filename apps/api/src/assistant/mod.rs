//! Procurement assistant — the AI seam behind requirement extraction and
//! proposal emails.
//!
//! `LlmAssistant` talks to the configured chat-completions backend.
//! `DemoAssistant` returns fixed fixtures after a delay so the whole workflow
//! can be exercised without an API key. `main` picks one from `Config` and
//! `AppState` carries it as `Arc<dyn ProcurementAssistant>`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::requirements::models::ExtractedRequirements;

pub mod demo;
pub mod llm;

pub use demo::DemoAssistant;
pub use llm::LlmAssistant;

/// Everything the email writer knows about one supplier match.
#[derive(Debug, Clone, Serialize)]
pub struct EmailContext {
    pub rfq_title: String,
    pub rfq_description: String,
    pub product_name: String,
    pub product_category: String,
    pub unit_price: f64,
    pub quantity: u32,
    pub total_price: f64,
    pub match_score: f64,
    pub supplier_name: String,
    pub supplier_email: Option<String>,
    /// Display rows of the product's specifications.
    pub specifications: Vec<(String, String)>,
}

/// Subject and body as produced by the assistant. Recipients are filled in
/// by the caller from the supplier record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedEmail {
    pub subject: String,
    pub body: String,
}

#[async_trait]
pub trait ProcurementAssistant: Send + Sync {
    /// "llm" or "demo", reported in responses for transparency.
    fn backend(&self) -> &'static str;

    async fn extract_requirements(&self, rfq_text: &str)
        -> Result<ExtractedRequirements, AppError>;

    async fn generate_email(&self, context: &EmailContext) -> Result<GeneratedEmail, AppError>;
}
