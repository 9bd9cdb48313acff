//! Typed view over an RFQ's extracted requirements.
//!
//! The JSON shape is the one the AI backend is prompted to produce (camelCase
//! keys). Rows store it as opaque JSONB; everything that reads it goes through
//! `ExtractedRequirements::from_value`, which tolerates missing blocks and
//! unknown criteria.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::errors::AppError;

/// Categories that switch an RFQ onto the AI-hardware scoring profile.
pub const AI_HARDWARE_CATEGORIES: &[&str] = &[
    "gpu",
    "ai accelerator",
    "ml accelerator",
    "tpu",
    "vpu",
    "fpga",
    "asic",
];

// ────────────────────────────────────────────────────────────────────────────
// Award criteria
// ────────────────────────────────────────────────────────────────────────────

/// A named scoring criterion. General equipment uses price/quality/delivery;
/// AI hardware uses price/performance/compatibility/availability/compliance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Criterion {
    Price,
    Quality,
    Delivery,
    Performance,
    Compatibility,
    Availability,
    Compliance,
}

impl Criterion {
    pub fn as_str(&self) -> &'static str {
        match self {
            Criterion::Price => "price",
            Criterion::Quality => "quality",
            Criterion::Delivery => "delivery",
            Criterion::Performance => "performance",
            Criterion::Compatibility => "compatibility",
            Criterion::Availability => "availability",
            Criterion::Compliance => "compliance",
        }
    }
}

impl fmt::Display for Criterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Criterion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "price" => Ok(Criterion::Price),
            "quality" => Ok(Criterion::Quality),
            "delivery" => Ok(Criterion::Delivery),
            "performance" => Ok(Criterion::Performance),
            "compatibility" => Ok(Criterion::Compatibility),
            "availability" => Ok(Criterion::Availability),
            "compliance" => Ok(Criterion::Compliance),
            other => Err(format!("unknown criterion '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CriterionWeight {
    pub weight: i32,
}

/// Criterion → integer weight. Weights are expected to sum to 100 but this is
/// never enforced; the aggregate is computed with whatever the buyer set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Option<BTreeMap<String, Value>>")]
pub struct AwardCriteria(BTreeMap<Criterion, CriterionWeight>);

/// The model answers `{"weight": 50}`, a bare `50`, or either with the number
/// quoted. `null` is an empty set.
impl From<Option<BTreeMap<String, Value>>> for AwardCriteria {
    fn from(raw: Option<BTreeMap<String, Value>>) -> Self {
        let mut weights = BTreeMap::new();
        for (name, repr) in raw.unwrap_or_default() {
            let criterion = match name.parse::<Criterion>() {
                Ok(criterion) => criterion,
                Err(e) => {
                    warn!("Ignoring award criterion: {e}");
                    continue;
                }
            };
            let weight = match &repr {
                Value::Object(fields) => fields.get("weight").and_then(loose_number),
                other => loose_number(other),
            };
            match weight {
                Some(weight) => {
                    let weight = weight.round().clamp(i32::MIN as f64, i32::MAX as f64) as i32;
                    weights.insert(criterion, CriterionWeight { weight });
                }
                None => warn!("Ignoring award criterion '{criterion}': unreadable weight {repr}"),
            }
        }
        AwardCriteria(weights)
    }
}

impl AwardCriteria {
    pub fn from_weights(weights: &[(Criterion, i32)]) -> Self {
        AwardCriteria(
            weights
                .iter()
                .map(|&(c, weight)| (c, CriterionWeight { weight }))
                .collect(),
        )
    }

    /// Price 50 / quality 30 / delivery 20.
    pub fn general_default() -> Self {
        Self::from_weights(&[
            (Criterion::Price, 50),
            (Criterion::Quality, 30),
            (Criterion::Delivery, 20),
        ])
    }

    /// Price 30 / performance 40 / availability 15 / compliance 15.
    pub fn ai_hardware_default() -> Self {
        Self::from_weights(&[
            (Criterion::Price, 30),
            (Criterion::Performance, 40),
            (Criterion::Availability, 15),
            (Criterion::Compliance, 15),
        ])
    }

    pub fn weight(&self, criterion: Criterion) -> Option<i32> {
        self.0.get(&criterion).map(|w| w.weight)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Criterion, i32)> + '_ {
        self.0.iter().map(|(c, w)| (*c, w.weight))
    }

    pub fn total_weight(&self) -> i32 {
        self.0.values().map(|w| w.weight).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Category requirement blocks
// ────────────────────────────────────────────────────────────────────────────

fn default_quantity() -> u32 {
    1
}

// ────────────────────────────────────────────────────────────────────────────
// Lenient field readers
//
// Model replies and older rows carry `null`, numeric strings ("25", "80GB")
// and bare numbers where text is expected. None of that rejects the document.
// ────────────────────────────────────────────────────────────────────────────

/// Leading number of a JSON number or string: 80, "80", "80GB", "1,200 W".
fn loose_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s
            .replace(',', "")
            .split(|c: char| !(c.is_ascii_digit() || c == '.'))
            .find(|part| !part.is_empty())
            .and_then(|part| part.parse::<f64>().ok()),
        _ => None,
    };
    number.filter(|n| n.is_finite())
}

fn loose_text(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Whole units; anything unreadable or below one becomes 1.
fn lenient_quantity<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(loose_number(&value)
        .map(f64::round)
        .filter(|n| *n >= 1.0)
        .map(|n| n.min(u32::MAX as f64) as u32)
        .unwrap_or_else(default_quantity))
}

fn lenient_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    Ok(loose_number(&Value::deserialize(deserializer)?))
}

fn lenient_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(loose_text(Value::deserialize(deserializer)?))
}

fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(loose_text(Value::deserialize(deserializer)?).unwrap_or_default())
}

/// A list, a single string, or null.
fn lenient_list<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items.into_iter().filter_map(loose_text).collect(),
        Value::String(s) if !s.trim().is_empty() => vec![s],
        _ => Vec::new(),
    })
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LaptopRequirements {
    #[serde(default = "default_quantity", deserialize_with = "lenient_quantity")]
    pub quantity: u32,
    #[serde(default, deserialize_with = "lenient_text")]
    pub os: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub processor: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub memory: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub storage: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub display: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub battery: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub durability: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub connectivity: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub warranty: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonitorRequirements {
    #[serde(default = "default_quantity", deserialize_with = "lenient_quantity")]
    pub quantity: u32,
    #[serde(default, deserialize_with = "lenient_text")]
    pub screen_size: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub resolution: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub panel_tech: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub brightness: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub contrast_ratio: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub connectivity: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub adjustability: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub warranty: Option<String>,
}

/// GPU / accelerator requirements. Numeric minimums are in the units the
/// catalog uses: TFLOPS, TOPS, GB, GB/s, watts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiHardwareRequirements {
    #[serde(rename = "type", default, deserialize_with = "lenient_text")]
    pub hardware_type: Option<String>,
    #[serde(default = "default_quantity", deserialize_with = "lenient_quantity")]
    pub quantity: u32,
    #[serde(default, deserialize_with = "lenient_number")]
    pub min_memory: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub min_compute_power: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub min_tensor_cores: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub min_cuda_cores: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub min_int8_performance: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub min_fp16_performance: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub min_memory_bandwidth: Option<f64>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub memory_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub power_constraints: Option<f64>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub frameworks: Vec<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Extracted requirements
// ────────────────────────────────────────────────────────────────────────────

/// Which scoring profile an RFQ is evaluated under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequirementProfile {
    GeneralEquipment,
    AiHardware,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedRequirements {
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub categories: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub laptops: Option<LaptopRequirements>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monitors: Option<MonitorRequirements>,
    #[serde(default, alias = "gpuRequirements", skip_serializing_if = "Option::is_none")]
    pub ai_hardware: Option<AiHardwareRequirements>,
    #[serde(default)]
    pub criteria: AwardCriteria,
}

impl ExtractedRequirements {
    pub fn from_value(value: &Value) -> Result<Self, serde_json::Error> {
        Self::deserialize(value)
    }

    pub fn to_value(&self) -> Result<Value, AppError> {
        serde_json::to_value(self)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("serialize requirements: {e}")))
    }

    pub fn profile(&self) -> RequirementProfile {
        let ai_category = self
            .categories
            .iter()
            .any(|c| is_ai_hardware_category(c));
        if ai_category || self.ai_hardware.is_some() {
            RequirementProfile::AiHardware
        } else {
            RequirementProfile::GeneralEquipment
        }
    }

    /// The RFQ's criteria, or the profile default when none were extracted.
    pub fn effective_criteria(&self) -> AwardCriteria {
        if !self.criteria.is_empty() {
            return self.criteria.clone();
        }
        match self.profile() {
            RequirementProfile::GeneralEquipment => AwardCriteria::general_default(),
            RequirementProfile::AiHardware => AwardCriteria::ai_hardware_default(),
        }
    }

    /// Categories to search the catalog for. AI-hardware RFQs only search
    /// accelerator categories, defaulting to GPU.
    pub fn match_categories(&self) -> Vec<String> {
        match self.profile() {
            RequirementProfile::GeneralEquipment => {
                if !self.categories.is_empty() {
                    return self.categories.clone();
                }
                let mut inferred = Vec::new();
                if self.laptops.is_some() {
                    inferred.push("Laptops".to_string());
                }
                if self.monitors.is_some() {
                    inferred.push("Monitors".to_string());
                }
                inferred
            }
            RequirementProfile::AiHardware => {
                let cats: Vec<String> = self
                    .categories
                    .iter()
                    .filter(|c| is_ai_hardware_category(c))
                    .cloned()
                    .collect();
                if cats.is_empty() {
                    vec!["GPU".to_string()]
                } else {
                    cats
                }
            }
        }
    }

    /// Units requested for a catalog category; 1 when the RFQ does not say.
    pub fn quantity_for_category(&self, category: &str) -> u32 {
        let category = category.trim().to_ascii_lowercase();
        let quantity = match category.as_str() {
            "laptops" | "laptop" => self.laptops.as_ref().map(|l| l.quantity),
            "monitors" | "monitor" => self.monitors.as_ref().map(|m| m.quantity),
            c if is_ai_hardware_category(c) => self.ai_hardware.as_ref().map(|a| a.quantity),
            _ => None,
        };
        quantity.unwrap_or(1)
    }

    /// Boundary validation for user-edited requirements.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.title.trim().is_empty() {
            return Err(AppError::Validation("title cannot be empty".to_string()));
        }
        if let Some((criterion, weight)) = self.criteria.iter().find(|(_, w)| *w < 0) {
            return Err(AppError::Validation(format!(
                "weight for '{criterion}' cannot be negative (got {weight})"
            )));
        }
        Ok(())
    }
}

pub fn is_ai_hardware_category(category: &str) -> bool {
    let lower = category.trim().to_ascii_lowercase();
    AI_HARDWARE_CATEGORIES.contains(&lower.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_general_rfq_deserializes_with_camel_case_fields() {
        let value = json!({
            "title": "School laptops",
            "categories": ["Laptops", "Monitors"],
            "laptops": {"quantity": 25, "processor": "Intel Core i5", "memory": "16 GB DDR4"},
            "monitors": {"screenSize": "24 inch", "panelTech": "IPS"},
            "criteria": {"price": {"weight": 50}, "quality": {"weight": 30}, "delivery": {"weight": 20}}
        });
        let req = ExtractedRequirements::from_value(&value).unwrap();
        assert_eq!(req.profile(), RequirementProfile::GeneralEquipment);
        assert_eq!(req.laptops.as_ref().unwrap().quantity, 25);
        assert_eq!(req.monitors.as_ref().unwrap().quantity, 1);
        assert_eq!(
            req.monitors.as_ref().unwrap().screen_size.as_deref(),
            Some("24 inch")
        );
        assert_eq!(req.criteria.weight(Criterion::Price), Some(50));
        assert_eq!(req.criteria.total_weight(), 100);
    }

    #[test]
    fn test_bare_weights_and_unknown_criteria_are_tolerated() {
        let value = json!({
            "title": "GPUs",
            "categories": ["GPU"],
            "criteria": {"price": 30, "performance": {"weight": 40}, "vibes": {"weight": 30}}
        });
        let req = ExtractedRequirements::from_value(&value).unwrap();
        assert_eq!(req.criteria.weight(Criterion::Price), Some(30));
        assert_eq!(req.criteria.weight(Criterion::Performance), Some(40));
        assert_eq!(req.criteria.iter().count(), 2);
    }

    #[test]
    fn test_criteria_serialize_in_weight_object_form() {
        let criteria = AwardCriteria::general_default();
        let value = serde_json::to_value(&criteria).unwrap();
        assert_eq!(value["price"]["weight"], 50);
        assert_eq!(value["delivery"]["weight"], 20);
        let back: AwardCriteria = serde_json::from_value(value).unwrap();
        assert_eq!(back, criteria);
    }

    #[test]
    fn test_gpu_requirements_alias_selects_ai_profile() {
        let value = json!({
            "title": "Training cluster",
            "gpuRequirements": {"quantity": 8, "minMemory": 80, "frameworks": ["PyTorch"]}
        });
        let req = ExtractedRequirements::from_value(&value).unwrap();
        assert_eq!(req.profile(), RequirementProfile::AiHardware);
        assert_eq!(req.match_categories(), vec!["GPU".to_string()]);
        assert_eq!(req.quantity_for_category("GPU"), 8);
        assert_eq!(req.effective_criteria(), AwardCriteria::ai_hardware_default());
    }

    #[test]
    fn test_missing_criteria_falls_back_to_profile_default() {
        let value = json!({"title": "Monitors", "monitors": {"quantity": 3}});
        let req = ExtractedRequirements::from_value(&value).unwrap();
        assert!(req.criteria.is_empty());
        assert_eq!(req.effective_criteria(), AwardCriteria::general_default());
        assert_eq!(req.match_categories(), vec!["Monitors".to_string()]);
    }

    #[test]
    fn test_quantity_defaults_to_one_for_unknown_category() {
        let value = json!({"title": "Misc", "laptops": {"quantity": 4}});
        let req = ExtractedRequirements::from_value(&value).unwrap();
        assert_eq!(req.quantity_for_category("laptops"), 4);
        assert_eq!(req.quantity_for_category("Printers"), 1);
    }

    #[test]
    fn test_validate_rejects_blank_title_and_negative_weight() {
        let mut req = ExtractedRequirements::from_value(&json!({"title": " "})).unwrap();
        assert!(req.validate().is_err());
        req.title = "Laptops".to_string();
        req.criteria = AwardCriteria::from_weights(&[(Criterion::Price, -5)]);
        assert!(req.validate().is_err());
        req.criteria = AwardCriteria::from_weights(&[(Criterion::Price, 70), (Criterion::Quality, 70)]);
        assert!(req.validate().is_ok(), "weights need not sum to 100");
    }

    #[test]
    fn test_null_and_string_numbers_are_coerced() {
        let value = json!({
            "title": null,
            "categories": null,
            "laptops": {"quantity": null, "memory": 16, "processor": null},
            "monitors": {"quantity": "25", "screenSize": 24},
            "criteria": {"price": {"weight": "60"}, "quality": "40", "delivery": {"weight": null}}
        });
        let req = ExtractedRequirements::from_value(&value).unwrap();
        assert_eq!(req.title, "");
        assert!(req.categories.is_empty());
        let laptops = req.laptops.as_ref().unwrap();
        assert_eq!(laptops.quantity, 1);
        assert_eq!(laptops.memory.as_deref(), Some("16"));
        assert_eq!(laptops.processor, None);
        let monitors = req.monitors.as_ref().unwrap();
        assert_eq!(monitors.quantity, 25);
        assert_eq!(monitors.screen_size.as_deref(), Some("24"));
        assert_eq!(req.criteria.weight(Criterion::Price), Some(60));
        assert_eq!(req.criteria.weight(Criterion::Quality), Some(40));
        assert_eq!(req.criteria.weight(Criterion::Delivery), None);
    }

    #[test]
    fn test_ai_hardware_minimums_accept_unit_strings() {
        let value = json!({
            "title": "Inference nodes",
            "criteria": null,
            "aiHardware": {
                "quantity": "8 units",
                "minMemory": "80GB",
                "minMemoryBandwidth": "1,935 GB/s",
                "minComputePower": null,
                "powerConstraints": 700,
                "frameworks": "PyTorch"
            }
        });
        let req = ExtractedRequirements::from_value(&value).unwrap();
        let hw = req.ai_hardware.as_ref().unwrap();
        assert_eq!(hw.quantity, 8);
        assert_eq!(hw.min_memory, Some(80.0));
        assert_eq!(hw.min_memory_bandwidth, Some(1935.0));
        assert_eq!(hw.min_compute_power, None);
        assert_eq!(hw.power_constraints, Some(700.0));
        assert_eq!(hw.frameworks, vec!["PyTorch".to_string()]);
        assert!(req.criteria.is_empty());
        assert_eq!(req.effective_criteria(), AwardCriteria::ai_hardware_default());
    }

    #[test]
    fn test_zero_or_unreadable_quantity_defaults_to_one() {
        let value = json!({"title": "Laptops", "laptops": {"quantity": "several"}, "monitors": {"quantity": 0}});
        let req = ExtractedRequirements::from_value(&value).unwrap();
        assert_eq!(req.quantity_for_category("Laptops"), 1);
        assert_eq!(req.quantity_for_category("Monitors"), 1);
    }
}
