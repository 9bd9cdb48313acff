use std::sync::Arc;

use aws_sdk_s3::Client as S3Client;
use sqlx::PgPool;

use crate::assistant::ProcurementAssistant;
use crate::config::Config;
use crate::matching::scorer::ScorerRegistry;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub s3: S3Client,
    pub config: Config,
    /// LLM-backed or demo assistant, chosen once at startup from `DEMO_MODE`.
    pub assistant: Arc<dyn ProcurementAssistant>,
    /// One match scorer per requirement profile.
    pub scorers: ScorerRegistry,
}
