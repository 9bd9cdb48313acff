//! Match scoring — pluggable, trait-based scorers that rate a catalog product
//! against an RFQ's requirements, one sub-score per award criterion.
//!
//! `AppState` holds a `ScorerRegistry` with one `Arc<dyn MatchScorer>` per
//! requirement profile.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;
use uuid::Uuid;

use crate::catalog::repository::CatalogEntry;
use crate::matching::compliance::check_compliance_match;
use crate::matching::delivery::{
    availability_score, delivery_score, estimated_delivery, parse_delivery_time,
};
use crate::matching::hardware::{compare_compute, compatibility};
use crate::matching::price::price_score;
use crate::matching::ranking::{calculate_total_price, sort_matches, SortDirection, SortKey};
use crate::matching::specs::{laptop_quality, monitor_quality};
use crate::models::catalog::{ProductRow, SupplierRow};
use crate::requirements::models::{
    AiHardwareRequirements, AwardCriteria, Criterion, ExtractedRequirements, RequirementProfile,
};

/// Quality score when no specification could be compared.
pub const NEUTRAL_QUALITY: f64 = 50.0;

// ────────────────────────────────────────────────────────────────────────────
// Scoring inputs and outputs
// ────────────────────────────────────────────────────────────────────────────

pub struct ScoringContext<'a> {
    pub requirements: &'a ExtractedRequirements,
    pub buyer_country: &'a str,
    /// Prices of every candidate in the scored product's category.
    pub category_prices: &'a [f64],
}

/// Per-criterion sub-scores in [0, 100] plus any notes the scorer produced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScoreBreakdown {
    pub scores: BTreeMap<Criterion, f64>,
    pub notes: Vec<String>,
}

impl ScoreBreakdown {
    fn set(&mut self, criterion: Criterion, score: f64) {
        self.scores.insert(criterion, score.clamp(0.0, 100.0));
    }
}

/// A scored candidate, as returned by the match endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct SupplierMatch {
    /// Set once the match is persisted as a proposal.
    pub proposal_id: Option<Uuid>,
    pub supplier: SupplierRow,
    pub product: ProductRow,
    pub match_score: f64,
    pub match_details: BTreeMap<Criterion, f64>,
    pub total_price: f64,
    pub quantity: u32,
    pub estimated_delivery: NaiveDate,
    pub compliance_notes: Vec<String>,
    pub scorer_backend: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

/// Implement this to add a scoring profile without touching the pipeline or
/// the handlers.
pub trait MatchScorer: Send + Sync {
    /// Reported in match results, e.g. "general_equipment".
    fn backend(&self) -> &'static str;

    fn score(&self, ctx: &ScoringContext<'_>, entry: &CatalogEntry) -> ScoreBreakdown;
}

// ────────────────────────────────────────────────────────────────────────────
// GeneralEquipmentScorer — price / quality / delivery
// ────────────────────────────────────────────────────────────────────────────

pub struct GeneralEquipmentScorer;

impl GeneralEquipmentScorer {
    fn quality(requirements: &ExtractedRequirements, product: &ProductRow) -> f64 {
        let category = product.category.trim().to_ascii_lowercase();
        let quality = match category.as_str() {
            "laptops" | "laptop" => requirements
                .laptops
                .as_ref()
                .and_then(|req| laptop_quality(req, product)),
            "monitors" | "monitor" => requirements
                .monitors
                .as_ref()
                .and_then(|req| monitor_quality(req, product)),
            _ => None,
        };
        quality.map(|q| q * 100.0).unwrap_or(NEUTRAL_QUALITY)
    }
}

impl MatchScorer for GeneralEquipmentScorer {
    fn backend(&self) -> &'static str {
        "general_equipment"
    }

    fn score(&self, ctx: &ScoringContext<'_>, entry: &CatalogEntry) -> ScoreBreakdown {
        let mut breakdown = ScoreBreakdown::default();
        let days = parse_delivery_time(&entry.supplier.delivery_time);

        breakdown.set(Criterion::Price, price_score(entry.product.price, ctx.category_prices));
        breakdown.set(Criterion::Quality, Self::quality(ctx.requirements, &entry.product));
        breakdown.set(Criterion::Delivery, delivery_score(days));
        breakdown
    }
}

// ────────────────────────────────────────────────────────────────────────────
// AiHardwareScorer — price / performance / compatibility / availability / compliance
// ────────────────────────────────────────────────────────────────────────────

pub struct AiHardwareScorer;

impl MatchScorer for AiHardwareScorer {
    fn backend(&self) -> &'static str {
        "ai_hardware"
    }

    fn score(&self, ctx: &ScoringContext<'_>, entry: &CatalogEntry) -> ScoreBreakdown {
        let fallback = AiHardwareRequirements::default();
        let req = ctx.requirements.ai_hardware.as_ref().unwrap_or(&fallback);
        let specs = &entry.product.specifications;
        let days = parse_delivery_time(&entry.supplier.delivery_time);

        let compliance = check_compliance_match(
            ctx.buyer_country,
            specs,
            entry.supplier.country.as_deref(),
        );

        let mut breakdown = ScoreBreakdown::default();
        breakdown.set(Criterion::Price, price_score(entry.product.price, ctx.category_prices));
        breakdown.set(Criterion::Performance, compare_compute(req, specs) * 100.0);
        breakdown.set(Criterion::Compatibility, compatibility(req, specs) * 100.0);
        breakdown.set(Criterion::Availability, availability_score(days));
        breakdown.set(Criterion::Compliance, compliance.score * 100.0);
        breakdown.notes.push(compliance.notes);
        breakdown
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Registry
// ────────────────────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct ScorerRegistry {
    general: Arc<dyn MatchScorer>,
    ai_hardware: Arc<dyn MatchScorer>,
}

impl ScorerRegistry {
    pub fn new(general: Arc<dyn MatchScorer>, ai_hardware: Arc<dyn MatchScorer>) -> Self {
        Self {
            general,
            ai_hardware,
        }
    }

    pub fn for_profile(&self, profile: RequirementProfile) -> Arc<dyn MatchScorer> {
        match profile {
            RequirementProfile::GeneralEquipment => Arc::clone(&self.general),
            RequirementProfile::AiHardware => Arc::clone(&self.ai_hardware),
        }
    }
}

impl Default for ScorerRegistry {
    fn default() -> Self {
        Self::new(Arc::new(GeneralEquipmentScorer), Arc::new(AiHardwareScorer))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Aggregation
// ────────────────────────────────────────────────────────────────────────────

/// Σ weight/100 × sub-score over the configured criteria. A criterion the
/// scorer did not produce contributes 0; weights are taken as given.
pub fn aggregate_score(criteria: &AwardCriteria, scores: &BTreeMap<Criterion, f64>) -> f64 {
    criteria
        .iter()
        .map(|(criterion, weight)| {
            let score = scores.get(&criterion).copied().unwrap_or(0.0);
            weight as f64 / 100.0 * score
        })
        .sum()
}

/// Scores every candidate and returns them best-first.
pub fn score_candidates(
    scorer: &dyn MatchScorer,
    requirements: &ExtractedRequirements,
    entries: Vec<CatalogEntry>,
    buyer_country: &str,
    today: NaiveDate,
) -> Vec<SupplierMatch> {
    let criteria = requirements.effective_criteria();

    let mut prices_by_category: HashMap<String, Vec<f64>> = HashMap::new();
    for entry in &entries {
        prices_by_category
            .entry(entry.product.category.to_ascii_lowercase())
            .or_default()
            .push(entry.product.price);
    }

    let mut matches: Vec<SupplierMatch> = entries
        .into_iter()
        .map(|entry| {
            let category_prices = prices_by_category
                .get(&entry.product.category.to_ascii_lowercase())
                .map(Vec::as_slice)
                .unwrap_or_default();
            let ctx = ScoringContext {
                requirements,
                buyer_country,
                category_prices,
            };
            let breakdown = scorer.score(&ctx, &entry);
            let quantity = requirements.quantity_for_category(&entry.product.category);
            let days = parse_delivery_time(&entry.supplier.delivery_time);

            SupplierMatch {
                proposal_id: None,
                match_score: aggregate_score(&criteria, &breakdown.scores),
                match_details: breakdown.scores,
                total_price: calculate_total_price(entry.product.price, quantity),
                quantity,
                estimated_delivery: estimated_delivery(today, days),
                compliance_notes: breakdown.notes,
                scorer_backend: scorer.backend().to_string(),
                supplier: entry.supplier,
                product: entry.product,
            }
        })
        .collect();

    sort_matches(&mut matches, SortKey::Aggregate, SortDirection::Descending);
    matches
}
