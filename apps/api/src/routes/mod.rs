pub mod health;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::catalog::handlers as catalog;
use crate::matching::handlers as matching;
use crate::proposal::handlers as proposal;
use crate::requirements::handlers as requirements;
use crate::state::AppState;
use crate::wizard::handlers as wizard;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .nest("/api/v1", api_routes())
        .with_state(state)
}

fn api_routes() -> Router<AppState> {
    Router::new()
        // RFQs and requirement extraction
        .route(
            "/rfqs",
            get(requirements::handle_list_rfqs).post(requirements::handle_create_rfq),
        )
        .route("/rfqs/upload", post(requirements::handle_upload_rfq))
        .route(
            "/rfqs/:id",
            get(requirements::handle_get_rfq).put(requirements::handle_update_rfq),
        )
        // Matching
        .route("/rfqs/:id/match", post(matching::handle_match_suppliers))
        .route("/rfqs/:id/match-suppliers", post(matching::handle_match_suppliers))
        .route("/rfqs/:id/proposals", get(matching::handle_list_proposals))
        .route("/compliance/check", get(matching::handle_compliance_check))
        .route(
            "/ai-hardware/frameworks-compatibility",
            get(matching::handle_frameworks_compatibility),
        )
        .route(
            "/ai-hardware/performance-comparison",
            get(matching::handle_performance_comparison),
        )
        // Catalog
        .route("/suppliers", get(catalog::handle_list_suppliers))
        .route("/suppliers/:id", get(catalog::handle_get_supplier))
        .route("/products", get(catalog::handle_list_products))
        .route("/products/:id", get(catalog::handle_get_product))
        .route("/catalog/seed", post(catalog::handle_seed_catalog))
        // Proposals
        .route(
            "/proposals/:id/generate-email",
            post(proposal::handle_generate_email),
        )
        .route("/proposals/:id/pdf", get(proposal::handle_proposal_pdf))
        .route("/email-templates/:id", put(proposal::handle_update_email))
        // Wizard
        .route("/wizard", get(wizard::handle_wizard_step))
        .route("/wizard/transition", post(wizard::handle_wizard_transition))
}
