//! Export-compliance checks for AI hardware: manufacturer restrictions,
//! high-performance thresholds and geopolitical supplier/buyer pairs.

use serde::Serialize;
use serde_json::Value;

use crate::matching::hardware::number;

/// Memory capacity (GB) at or above which a part counts as high-performance.
pub const MEMORY_CAPACITY_THRESHOLD: f64 = 32.0;
/// Memory bandwidth threshold (GB/s).
pub const MEMORY_BANDWIDTH_THRESHOLD: f64 = 800.0;
/// FP32 threshold (TFLOPS).
pub const FP32_THRESHOLD: f64 = 50.0;
/// INT8 threshold (TOPS).
pub const INT8_THRESHOLD: f64 = 400.0;

const SENSITIVE_DESTINATIONS: &[&str] = &[
    "China",
    "Russia",
    "Iran",
    "Belarus",
    "North Korea",
    "Syria",
    "Venezuela",
    "Cuba",
    "Myanmar",
    "Afghanistan",
];

/// Destinations that high-performance parts cannot ship to at all.
const EMBARGOED_FOR_HIGH_PERFORMANCE: &[&str] =
    &["China", "Russia", "Iran", "Belarus", "North Korea", "Syria"];

const HIGH_MEMORY_RESTRICTED: &[&str] = &["China", "Russia", "Iran", "North Korea", "Syria"];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShippingAssessment {
    pub can_ship: bool,
    pub restrictions: Vec<String>,
    pub requires_license: bool,
    pub required_documents: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComplianceMatch {
    /// In [0, 1].
    pub score: f64,
    pub notes: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RiskLevel {
    Low,
    Medium,
    Critical,
}

fn string_list(v: &Value, key: &str) -> Vec<String> {
    v.get(key)
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(Value::as_str).map(str::to_string).collect())
        .unwrap_or_default()
}

fn compliance_info(specs: &Value) -> &Value {
    specs.get("complianceInfo").unwrap_or(&Value::Null)
}

fn section<'a>(specs: &'a Value, key: &str) -> &'a Value {
    specs.get(key).unwrap_or(&Value::Null)
}

fn eq_country(a: &str, b: &str) -> bool {
    a.trim().eq_ignore_ascii_case(b.trim())
}

fn listed(list: &[impl AsRef<str>], country: &str) -> bool {
    list.iter().any(|c| eq_country(c.as_ref(), country))
}

/// True when any memory or compute figure crosses an export threshold.
pub fn is_high_performance(specs: &Value) -> bool {
    let memory = section(specs, "memorySpecs");
    let compute = section(specs, "computeSpecs");
    let at_least = |v: &Value, key: &str, threshold: f64| number(v, key).is_some_and(|n| n >= threshold);

    at_least(memory, "capacity", MEMORY_CAPACITY_THRESHOLD)
        || at_least(memory, "bandwidth", MEMORY_BANDWIDTH_THRESHOLD)
        || at_least(compute, "fp32Performance", FP32_THRESHOLD)
        || at_least(compute, "int8Performance", INT8_THRESHOLD)
}

fn require_license(assessment: &mut ShippingAssessment, extra: &[&str]) {
    if !assessment.requires_license {
        assessment.requires_license = true;
        assessment.required_documents.push("Export license from origin country".to_string());
        assessment.required_documents.push("End-user certificate".to_string());
        assessment
            .required_documents
            .extend(extra.iter().map(|d| d.to_string()));
    }
}

/// Whether a product may ship to `destination`, and what paperwork it needs.
pub fn check_shipping_restrictions(specs: &Value, destination: &str) -> ShippingAssessment {
    let mut assessment = ShippingAssessment {
        can_ship: true,
        restrictions: Vec::new(),
        requires_license: false,
        required_documents: Vec::new(),
    };
    let info = compliance_info(specs);

    if listed(string_list(info, "restrictedCountries").as_slice(), destination) {
        assessment.can_ship = false;
        assessment.restrictions.push(format!(
            "Product cannot be shipped to {destination} due to manufacturer restrictions"
        ));
    }

    let export_controlled = !string_list(info, "exportRestrictions").is_empty();
    if export_controlled && listed(SENSITIVE_DESTINATIONS, destination) {
        require_license(&mut assessment, &["Statement of end use"]);
        if assessment.restrictions.is_empty() {
            assessment.restrictions.push(format!(
                "Product requires export license for shipping to {destination}"
            ));
        }
    }

    if is_high_performance(specs) {
        require_license(&mut assessment, &[]);
        if listed(EMBARGOED_FOR_HIGH_PERFORMANCE, destination) {
            assessment.can_ship = false;
            assessment.restrictions.push(format!(
                "High-performance AI hardware cannot be shipped to {destination} under current regulations"
            ));
        }
    }

    assessment
}

fn matched(score: f64, notes: impl Into<String>) -> ComplianceMatch {
    ComplianceMatch {
        score,
        notes: notes.into(),
    }
}

/// Compliance of selling `specs` from `supplier_country` to `buyer_country`.
///
/// Checks run in order and the first hit decides: manufacturer restrictions,
/// sanctioned supplier/buyer pairs, high-memory parts to restricted buyers,
/// then shipping rules. A domestic sale needs no export license.
pub fn check_compliance_match(
    buyer_country: &str,
    specs: &Value,
    supplier_country: Option<&str>,
) -> ComplianceMatch {
    let buyer = buyer_country.trim();
    if buyer.is_empty() {
        return matched(0.5, "Insufficient data for compliance check");
    }
    let supplier = supplier_country.map(str::trim).unwrap_or("Unknown");

    if listed(string_list(compliance_info(specs), "restrictedCountries").as_slice(), buyer) {
        return matched(0.0, format!("Export to {buyer} is restricted for this product"));
    }

    let from_us = eq_country(supplier, "United States");
    if eq_country(buyer, "Russia") && from_us {
        return matched(0.1, "US suppliers are heavily restricted for Russian buyers");
    }
    if eq_country(buyer, "China") && from_us {
        return matched(0.3, "Some US AI hardware exports to China are restricted");
    }
    if eq_country(buyer, "Iran") && (from_us || eq_country(supplier, "European Union")) {
        return matched(0.0, format!("Exports from {supplier} to Iran are prohibited"));
    }

    if let Some(capacity) = number(section(specs, "memorySpecs"), "capacity") {
        if capacity >= MEMORY_CAPACITY_THRESHOLD && listed(HIGH_MEMORY_RESTRICTED, buyer) {
            return matched(
                0.2,
                format!("High-memory GPU ({capacity}GB) exports to {buyer} likely require special licensing"),
            );
        }
    }

    let shipping = check_shipping_restrictions(specs, buyer);
    if !shipping.can_ship {
        return matched(0.0, shipping.restrictions.join("; "));
    }
    if eq_country(supplier, buyer) {
        return matched(1.0, "Local supplier, no export restrictions");
    }
    if shipping.requires_license {
        return matched(0.4, format!("Export license required for shipping to {buyer}"));
    }
    matched(0.8, "Standard international shipping rules apply")
}

pub fn risk_level(shipping: &ShippingAssessment) -> RiskLevel {
    if !shipping.can_ship {
        RiskLevel::Critical
    } else if shipping.requires_license || !shipping.restrictions.is_empty() {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    }
}

pub fn required_actions(shipping: &ShippingAssessment) -> Vec<String> {
    let mut actions = Vec::new();
    if !shipping.can_ship {
        actions.push("Transaction cannot proceed due to compliance restrictions".to_string());
        actions.push("Consider alternative suppliers or products".to_string());
    }
    if shipping.requires_license {
        actions.push("Obtain export license before proceeding".to_string());
        actions.push("Consult with legal counsel specializing in export controls".to_string());
    }
    if actions.is_empty() {
        actions.push("No compliance issues detected, transaction can proceed normally".to_string());
    }
    actions
}
