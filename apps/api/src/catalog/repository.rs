use std::collections::HashMap;

use serde::Serialize;
use sqlx::PgPool;
use tracing::warn;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::catalog::{ProductRow, SupplierRow};

/// A product joined with the supplier that sells it.
#[derive(Debug, Clone, Serialize)]
pub struct CatalogEntry {
    pub product: ProductRow,
    pub supplier: SupplierRow,
}

pub async fn list_suppliers(pool: &PgPool) -> Result<Vec<SupplierRow>, AppError> {
    let rows = sqlx::query_as::<_, SupplierRow>("SELECT * FROM suppliers ORDER BY name")
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn get_supplier(pool: &PgPool, id: Uuid) -> Result<SupplierRow, AppError> {
    sqlx::query_as::<_, SupplierRow>("SELECT * FROM suppliers WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Supplier {id} not found")))
}

/// All products, or those of one category (case-insensitive).
pub async fn list_products(
    pool: &PgPool,
    category: Option<&str>,
) -> Result<Vec<ProductRow>, AppError> {
    let rows = sqlx::query_as::<_, ProductRow>(
        r#"SELECT * FROM products
           WHERE $1::text IS NULL OR lower(category) = lower($1)
           ORDER BY category, price"#,
    )
    .bind(category)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn products_by_supplier(
    pool: &PgPool,
    supplier_id: Uuid,
) -> Result<Vec<ProductRow>, AppError> {
    let rows = sqlx::query_as::<_, ProductRow>(
        "SELECT * FROM products WHERE supplier_id = $1 ORDER BY category, price",
    )
    .bind(supplier_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn get_product(pool: &PgPool, id: Uuid) -> Result<ProductRow, AppError> {
    sqlx::query_as::<_, ProductRow>("SELECT * FROM products WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Product {id} not found")))
}

/// Products with the given ids, in request order. Unknown ids are skipped.
pub async fn get_products(pool: &PgPool, ids: &[Uuid]) -> Result<Vec<ProductRow>, AppError> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }
    let rows = sqlx::query_as::<_, ProductRow>("SELECT * FROM products WHERE id = ANY($1)")
        .bind(ids)
        .fetch_all(pool)
        .await?;
    let mut by_id: HashMap<Uuid, ProductRow> = rows.into_iter().map(|p| (p.id, p)).collect();
    Ok(ids.iter().filter_map(|id| by_id.remove(id)).collect())
}

/// Products in any of `categories` (case-insensitive), each paired with its
/// supplier. Products whose supplier row is missing are skipped.
pub async fn products_with_suppliers(
    pool: &PgPool,
    categories: &[String],
) -> Result<Vec<CatalogEntry>, AppError> {
    let lowered: Vec<String> = categories.iter().map(|c| c.trim().to_lowercase()).collect();
    if lowered.is_empty() {
        return Ok(Vec::new());
    }

    let products = sqlx::query_as::<_, ProductRow>(
        "SELECT * FROM products WHERE lower(category) = ANY($1) ORDER BY category, price",
    )
    .bind(&lowered)
    .fetch_all(pool)
    .await?;

    let supplier_ids: Vec<Uuid> = products.iter().map(|p| p.supplier_id).collect();
    let suppliers = sqlx::query_as::<_, SupplierRow>("SELECT * FROM suppliers WHERE id = ANY($1)")
        .bind(&supplier_ids)
        .fetch_all(pool)
        .await?;

    Ok(join_suppliers(products, suppliers))
}

fn join_suppliers(products: Vec<ProductRow>, suppliers: Vec<SupplierRow>) -> Vec<CatalogEntry> {
    let by_id: HashMap<Uuid, SupplierRow> = suppliers.into_iter().map(|s| (s.id, s)).collect();
    products
        .into_iter()
        .filter_map(|product| match by_id.get(&product.supplier_id) {
            Some(supplier) => Some(CatalogEntry {
                supplier: supplier.clone(),
                product,
            }),
            None => {
                warn!("Product {} references missing supplier {}", product.id, product.supplier_id);
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn supplier(name: &str) -> SupplierRow {
        SupplierRow {
            id: Uuid::new_v4(),
            name: name.to_string(),
            logo_url: None,
            website: None,
            country: Some("United States".to_string()),
            description: None,
            contact_email: None,
            contact_phone: None,
            delivery_time: "7-14 days".to_string(),
            is_verified: true,
        }
    }

    fn product(supplier_id: Uuid, name: &str) -> ProductRow {
        ProductRow {
            id: Uuid::new_v4(),
            supplier_id,
            name: name.to_string(),
            category: "Monitors".to_string(),
            description: None,
            price: 199.0,
            specifications: json!({}),
            warranty: String::new(),
        }
    }

    #[test]
    fn test_join_pairs_products_with_their_supplier() {
        let hp = supplier("HP Inc.");
        let lg = supplier("LG Electronics");
        let products = vec![product(hp.id, "HP P24h"), product(lg.id, "LG 24MP400")];
        let joined = join_suppliers(products, vec![lg.clone(), hp.clone()]);
        assert_eq!(joined.len(), 2);
        assert_eq!(joined[0].supplier.name, "HP Inc.");
        assert_eq!(joined[1].supplier.name, "LG Electronics");
    }

    #[test]
    fn test_join_skips_orphaned_products() {
        let hp = supplier("HP Inc.");
        let products = vec![product(hp.id, "HP P24h"), product(Uuid::new_v4(), "Orphan")];
        let joined = join_suppliers(products, vec![hp]);
        assert_eq!(joined.len(), 1);
        assert_eq!(joined[0].product.name, "HP P24h");
    }
}
