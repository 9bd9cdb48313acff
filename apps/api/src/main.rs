mod assistant;
mod catalog;
mod config;
mod db;
mod errors;
mod llm_client;
mod matching;
mod models;
mod proposal;
mod requirements;
mod routes;
mod state;
mod wizard;

use anyhow::{Context, Result};
use aws_config::Region;
use aws_sdk_s3::config::Credentials;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::assistant::{DemoAssistant, LlmAssistant, ProcurementAssistant};
use crate::catalog::seed::seed_sample_catalog;
use crate::config::Config;
use crate::db::create_pool;
use crate::llm_client::LlmClient;
use crate::matching::scorer::ScorerRegistry;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting MatchPoint API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url).await?;

    if config.seed_sample_data {
        let report = seed_sample_catalog(&db)
            .await
            .context("seeding sample catalog")?;
        info!(
            "Sample catalog: seeded={} ({} suppliers, {} products)",
            report.seeded, report.suppliers, report.products
        );
    }

    // Initialize S3 / MinIO
    let s3 = build_s3_client(&config).await;
    info!("S3 client initialized (bucket: {})", config.s3_bucket);

    let assistant = build_assistant(&config)?;
    info!("Procurement assistant: {}", assistant.backend());

    let state = AppState {
        db,
        s3,
        config: config.clone(),
        assistant,
        scorers: ScorerRegistry::default(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Demo mode never touches the network; otherwise every call goes to the
/// configured chat-completions endpoint.
fn build_assistant(config: &Config) -> Result<Arc<dyn ProcurementAssistant>> {
    if config.demo_mode {
        return Ok(Arc::new(DemoAssistant::new(Duration::from_millis(
            config.demo_delay_ms,
        ))));
    }

    let llm = LlmClient::new(
        config.llm_api_key.clone(),
        config.llm_base_url.clone(),
        config.llm_model.clone(),
    )
    .context("building LLM client")?;
    info!("LLM client initialized (model: {})", llm.model());
    Ok(Arc::new(LlmAssistant::new(llm)))
}

/// Constructs an S3 client configured for MinIO (local) or AWS (production).
async fn build_s3_client(config: &Config) -> aws_sdk_s3::Client {
    let credentials = Credentials::new(
        &config.aws_access_key_id,
        &config.aws_secret_access_key,
        None,
        None,
        "matchpoint-static",
    );

    let s3_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(Region::new("us-east-1"))
        .credentials_provider(credentials)
        .endpoint_url(&config.s3_endpoint)
        .load()
        .await;

    aws_sdk_s3::Client::new(&s3_config)
}
