use serde_json::Value;
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::rfq::RfqRow;
use crate::models::user::{User, DEFAULT_USERNAME};

/// Fields for a new RFQ row. The id is chosen by the caller so uploaded
/// documents can be archived under it before the row exists.
pub struct NewRfq<'a> {
    pub id: Uuid,
    pub title: &'a str,
    pub description: &'a str,
    pub original_content: &'a str,
    pub extracted_requirements: Value,
    pub user_id: Option<Uuid>,
}

pub async fn insert_rfq(pool: &PgPool, rfq: NewRfq<'_>) -> Result<RfqRow, AppError> {
    let row = sqlx::query_as::<_, RfqRow>(
        r#"INSERT INTO rfqs (id, title, description, original_content, extracted_requirements, user_id)
           VALUES ($1, $2, $3, $4, $5, $6)
           RETURNING *"#,
    )
    .bind(rfq.id)
    .bind(rfq.title)
    .bind(rfq.description)
    .bind(rfq.original_content)
    .bind(rfq.extracted_requirements)
    .bind(rfq.user_id)
    .fetch_one(pool)
    .await?;
    Ok(row)
}

pub async fn get_rfq(pool: &PgPool, id: Uuid) -> Result<RfqRow, AppError> {
    sqlx::query_as::<_, RfqRow>("SELECT * FROM rfqs WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("RFQ {id} not found")))
}

pub async fn list_rfqs(pool: &PgPool) -> Result<Vec<RfqRow>, AppError> {
    let rows = sqlx::query_as::<_, RfqRow>("SELECT * FROM rfqs ORDER BY created_at DESC")
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// Replaces the requirements and, when given, the title/description.
pub async fn update_rfq(
    pool: &PgPool,
    id: Uuid,
    title: Option<&str>,
    description: Option<&str>,
    extracted_requirements: Value,
) -> Result<RfqRow, AppError> {
    sqlx::query_as::<_, RfqRow>(
        r#"UPDATE rfqs
           SET title = COALESCE($2, title),
               description = COALESCE($3, description),
               extracted_requirements = $4,
               updated_at = now()
           WHERE id = $1
           RETURNING *"#,
    )
    .bind(id)
    .bind(title)
    .bind(description)
    .bind(extracted_requirements)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("RFQ {id} not found")))
}

/// The seeded default buyer, if the catalog has been seeded.
pub async fn default_user(pool: &PgPool) -> Result<Option<User>, AppError> {
    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = $1")
        .bind(DEFAULT_USERNAME)
        .fetch_optional(pool)
        .await?;
    Ok(user)
}

pub async fn rfq_owner(pool: &PgPool, rfq: &RfqRow) -> Result<Option<User>, AppError> {
    match rfq.user_id {
        Some(user_id) => {
            let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
                .bind(user_id)
                .fetch_optional(pool)
                .await?;
            Ok(user)
        }
        None => Ok(None),
    }
}
