use chrono::NaiveDate;
use sqlx::PgPool;
use tracing::{info, warn};
use uuid::Uuid;

use crate::catalog::repository::products_with_suppliers;
use crate::errors::AppError;
use crate::matching::scorer::{score_candidates, ScorerRegistry, SupplierMatch};
use crate::models::user::DEFAULT_BUYER_COUNTRY;
use crate::proposal::store::{insert_proposal, NewProposal};
use crate::requirements::models::{ExtractedRequirements, RequirementProfile};
use crate::requirements::store::{default_user, get_rfq, rfq_owner};

/// Outcome of one matching run; `matches` are best-first and persisted.
pub struct MatchRun {
    pub rfq_id: Uuid,
    pub profile: RequirementProfile,
    pub scorer_backend: &'static str,
    pub matches: Vec<SupplierMatch>,
}

/// Scores every catalog product in the RFQ's categories and records each
/// result as a new proposal. Earlier proposals for the RFQ are kept.
pub async fn run_matching(
    pool: &PgPool,
    scorers: &ScorerRegistry,
    rfq_id: Uuid,
    today: NaiveDate,
) -> Result<MatchRun, AppError> {
    let rfq = get_rfq(pool, rfq_id).await?;
    let requirements = ExtractedRequirements::from_value(&rfq.extracted_requirements).map_err(|e| {
        AppError::UnprocessableEntity(format!("RFQ {rfq_id} has unreadable requirements: {e}"))
    })?;

    let owner = match rfq_owner(pool, &rfq).await? {
        Some(user) => Some(user),
        None => default_user(pool).await?,
    };
    let buyer_country = owner
        .as_ref()
        .map(|u| u.buyer_country().to_string())
        .unwrap_or_else(|| DEFAULT_BUYER_COUNTRY.to_string());

    let total_weight = requirements.effective_criteria().total_weight();
    if total_weight != 100 {
        warn!("RFQ {rfq_id} criterion weights sum to {total_weight}, not 100; scores are not rescaled");
    }

    let profile = requirements.profile();
    let scorer = scorers.for_profile(profile);
    let categories = requirements.match_categories();
    let candidates = products_with_suppliers(pool, &categories).await?;

    if candidates.is_empty() {
        warn!("No catalog products for RFQ {rfq_id} in categories {categories:?}");
    }

    let mut matches = score_candidates(
        scorer.as_ref(),
        &requirements,
        candidates,
        &buyer_country,
        today,
    );

    let mut tx = pool.begin().await?;
    for m in matches.iter_mut() {
        let criterion_scores = serde_json::to_value(&m.match_details)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("serialize criterion scores: {e}")))?;
        let row = insert_proposal(
            &mut tx,
            NewProposal {
                rfq_id,
                product_id: m.product.id,
                score: m.match_score,
                criterion_scores,
                total_price: m.total_price,
            },
        )
        .await?;
        m.proposal_id = Some(row.id);
    }
    tx.commit().await?;

    info!(
        "Matched RFQ {rfq_id} with {} scorer: {} candidates, buyer country {buyer_country}",
        scorer.backend(),
        matches.len()
    );

    Ok(MatchRun {
        rfq_id,
        profile,
        scorer_backend: scorer.backend(),
        matches,
    })
}
