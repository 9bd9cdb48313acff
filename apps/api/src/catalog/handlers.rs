use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::catalog::repository;
use crate::catalog::seed::{seed_sample_catalog, SeedReport};
use crate::errors::AppError;
use crate::models::catalog::{ProductRow, SupplierRow};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct ProductQuery {
    pub category: Option<String>,
}

#[derive(Serialize)]
pub struct SupplierDetail {
    #[serde(flatten)]
    pub supplier: SupplierRow,
    pub products: Vec<ProductRow>,
}

/// GET /api/v1/suppliers
pub async fn handle_list_suppliers(
    State(state): State<AppState>,
) -> Result<Json<Vec<SupplierRow>>, AppError> {
    Ok(Json(repository::list_suppliers(&state.db).await?))
}

/// GET /api/v1/suppliers/:id
pub async fn handle_get_supplier(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SupplierDetail>, AppError> {
    let supplier = repository::get_supplier(&state.db, id).await?;
    let products = repository::products_by_supplier(&state.db, id).await?;
    Ok(Json(SupplierDetail { supplier, products }))
}

/// GET /api/v1/products?category=
pub async fn handle_list_products(
    State(state): State<AppState>,
    Query(params): Query<ProductQuery>,
) -> Result<Json<Vec<ProductRow>>, AppError> {
    let category = params
        .category
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty());
    Ok(Json(repository::list_products(&state.db, category).await?))
}

/// GET /api/v1/products/:id
pub async fn handle_get_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ProductRow>, AppError> {
    Ok(Json(repository::get_product(&state.db, id).await?))
}

/// POST /api/v1/catalog/seed
pub async fn handle_seed_catalog(
    State(state): State<AppState>,
) -> Result<Json<SeedReport>, AppError> {
    Ok(Json(seed_sample_catalog(&state.db).await?))
}
