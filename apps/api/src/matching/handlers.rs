use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::catalog::repository;
use crate::errors::AppError;
use crate::matching::compliance::{
    check_compliance_match, check_shipping_restrictions, required_actions, risk_level,
    ComplianceMatch, RiskLevel, ShippingAssessment,
};
use crate::matching::hardware::{
    compare_performance, framework_support, FrameworkSupport, PerformanceEntry, PerformanceMetric,
};
use crate::matching::pipeline::run_matching;
use crate::matching::ranking::{
    filter_matches, find_best_match, sort_matches, SortDirection, SortKey,
};
use crate::matching::scorer::SupplierMatch;
use crate::models::proposal::ProposalRow;
use crate::proposal::store::list_proposals_for_rfq;
use crate::requirements::models::RequirementProfile;
use crate::requirements::store::get_rfq;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct MatchQuery {
    pub sort: Option<String>,
    pub order: Option<String>,
    pub category: Option<String>,
    pub min_score: Option<f64>,
}

impl MatchQuery {
    fn ordering(&self) -> Result<(SortKey, SortDirection), AppError> {
        let key = match self.sort.as_deref().filter(|s| !s.trim().is_empty()) {
            Some(s) => s.parse::<SortKey>().map_err(AppError::Validation)?,
            None => SortKey::Aggregate,
        };
        let direction = match self.order.as_deref().filter(|s| !s.trim().is_empty()) {
            Some(s) => s.parse::<SortDirection>().map_err(AppError::Validation)?,
            None => SortDirection::Descending,
        };
        Ok((key, direction))
    }
}

#[derive(Debug, Serialize)]
pub struct MatchResponse {
    pub rfq_id: Uuid,
    pub profile: RequirementProfile,
    pub scorer_backend: &'static str,
    /// Proposal id of the highest-scoring match shown.
    pub best_match_id: Option<Uuid>,
    pub matches: Vec<SupplierMatch>,
}

#[derive(Debug, Deserialize)]
pub struct ComplianceQuery {
    pub buyer_country: String,
    pub product_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct ComplianceReport {
    pub product_id: Uuid,
    pub product_name: String,
    pub buyer_country: String,
    pub supplier_country: Option<String>,
    pub shipping: ShippingAssessment,
    pub risk_level: RiskLevel,
    pub required_actions: Vec<String>,
    pub compliance: ComplianceMatch,
}

#[derive(Debug, Deserialize)]
pub struct FrameworksQuery {
    pub product_id: Uuid,
    /// Comma-separated, e.g. `PyTorch,JAX`.
    #[serde(default)]
    pub frameworks: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct FrameworksReport {
    pub product_id: Uuid,
    pub product: String,
    #[serde(flatten)]
    pub support: FrameworkSupport,
}

#[derive(Debug, Deserialize)]
pub struct PerformanceQuery {
    /// Comma-separated product ids.
    pub product_ids: String,
    #[serde(default)]
    pub metric: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PerformanceReport {
    pub metric: PerformanceMetric,
    pub metric_label: &'static str,
    pub products: Vec<PerformanceEntry>,
}

fn split_list(raw: Option<&str>) -> Vec<String> {
    raw.unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_product_ids(raw: &str) -> Result<Vec<Uuid>, AppError> {
    let ids = split_list(Some(raw))
        .iter()
        .map(|id| {
            id.parse::<Uuid>()
                .map_err(|_| AppError::Validation(format!("invalid product id '{id}'")))
        })
        .collect::<Result<Vec<_>, _>>()?;
    if ids.is_empty() {
        return Err(AppError::Validation("product_ids is required".to_string()));
    }
    Ok(ids)
}

fn parse_metric(raw: Option<&str>) -> Result<PerformanceMetric, AppError> {
    match raw.map(str::trim).filter(|m| !m.is_empty()) {
        Some(m) => m.parse::<PerformanceMetric>().map_err(AppError::Validation),
        None => Ok(PerformanceMetric::Fp32),
    }
}

/// POST /api/v1/rfqs/:id/match
pub async fn handle_match_suppliers(
    State(state): State<AppState>,
    Path(rfq_id): Path<Uuid>,
    Query(query): Query<MatchQuery>,
) -> Result<Json<MatchResponse>, AppError> {
    let (key, direction) = query.ordering()?;
    let category = query.category.as_deref().map(str::trim).filter(|c| !c.is_empty());

    let run = run_matching(&state.db, &state.scorers, rfq_id, Utc::now().date_naive()).await?;

    let mut matches = filter_matches(run.matches, category, query.min_score);
    sort_matches(&mut matches, key, direction);
    let best_match_id = find_best_match(&matches).and_then(|m| m.proposal_id);

    Ok(Json(MatchResponse {
        rfq_id: run.rfq_id,
        profile: run.profile,
        scorer_backend: run.scorer_backend,
        best_match_id,
        matches,
    }))
}

/// GET /api/v1/rfqs/:id/proposals
pub async fn handle_list_proposals(
    State(state): State<AppState>,
    Path(rfq_id): Path<Uuid>,
) -> Result<Json<Vec<ProposalRow>>, AppError> {
    get_rfq(&state.db, rfq_id).await?;
    Ok(Json(list_proposals_for_rfq(&state.db, rfq_id).await?))
}

/// GET /api/v1/compliance/check?buyer_country=&product_id=
pub async fn handle_compliance_check(
    State(state): State<AppState>,
    Query(query): Query<ComplianceQuery>,
) -> Result<Json<ComplianceReport>, AppError> {
    let buyer_country = query.buyer_country.trim();
    if buyer_country.is_empty() {
        return Err(AppError::Validation("buyer_country is required".to_string()));
    }

    let product = repository::get_product(&state.db, query.product_id).await?;
    let supplier = repository::get_supplier(&state.db, product.supplier_id).await?;

    let shipping = check_shipping_restrictions(&product.specifications, buyer_country);
    let compliance = check_compliance_match(
        buyer_country,
        &product.specifications,
        supplier.country.as_deref(),
    );

    Ok(Json(ComplianceReport {
        product_id: product.id,
        product_name: product.name,
        buyer_country: buyer_country.to_string(),
        supplier_country: supplier.country,
        risk_level: risk_level(&shipping),
        required_actions: required_actions(&shipping),
        shipping,
        compliance,
    }))
}

/// GET /api/v1/ai-hardware/frameworks-compatibility?product_id=&frameworks=
pub async fn handle_frameworks_compatibility(
    State(state): State<AppState>,
    Query(query): Query<FrameworksQuery>,
) -> Result<Json<FrameworksReport>, AppError> {
    let product = repository::get_product(&state.db, query.product_id).await?;
    let requested = split_list(query.frameworks.as_deref());

    Ok(Json(FrameworksReport {
        product_id: product.id,
        support: framework_support(&product.specifications, &requested),
        product: product.name,
    }))
}

/// GET /api/v1/ai-hardware/performance-comparison?product_ids=&metric=
pub async fn handle_performance_comparison(
    State(state): State<AppState>,
    Query(query): Query<PerformanceQuery>,
) -> Result<Json<PerformanceReport>, AppError> {
    let metric = parse_metric(query.metric.as_deref())?;
    let ids = parse_product_ids(&query.product_ids)?;

    let products = repository::get_products(&state.db, &ids).await?;
    if products.is_empty() {
        return Err(AppError::NotFound("No valid products found".to_string()));
    }

    Ok(Json(PerformanceReport {
        metric,
        metric_label: metric.label(),
        products: compare_performance(metric, &products),
    }))
}
