//! AI-hardware comparators. Product specifications are free-form JSON; the
//! catalog nests them under `computeSpecs`, `memorySpecs`, `powerConsumption`
//! and `supportedFrameworks`, but flat specs are accepted too.
//!
//! Sub-metrics are only averaged over what both sides state. With nothing to
//! compare a comparator returns the neutral 0.5.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use crate::models::catalog::ProductRow;
use crate::requirements::models::AiHardwareRequirements;

pub const NEUTRAL: f64 = 0.5;

const MEMORY_TYPE_RANK: &[&str] = &["gddr5", "gddr5x", "gddr6", "gddr6x", "hbm2", "hbm2e", "hbm3"];

/// The nested section if present, else the whole spec object.
fn section<'a>(specs: &'a Value, key: &str) -> &'a Value {
    match specs.get(key) {
        Some(v) if v.is_object() => v,
        _ => specs,
    }
}

/// Numbers or numeric strings ("80", "80 GB").
pub fn number(v: &Value, key: &str) -> Option<f64> {
    match v.get(key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s
            .split(|c: char| !(c.is_ascii_digit() || c == '.'))
            .find(|part| !part.is_empty())
            .and_then(|part| part.parse().ok()),
        _ => None,
    }
}

fn text<'a>(v: &'a Value, key: &str) -> Option<&'a str> {
    v.get(key)?.as_str()
}

#[derive(Default)]
struct Weighted {
    total: f64,
    weight: f64,
}

impl Weighted {
    fn add(&mut self, score: Option<f64>, weight: f64) {
        if let Some(score) = score {
            self.total += score * weight;
            self.weight += weight;
        }
    }

    fn average_or_neutral(&self) -> f64 {
        if self.weight > 0.0 {
            self.total / self.weight
        } else {
            NEUTRAL
        }
    }
}

/// 1.0 when the product meets the minimum, else proportional with a 0.5 floor.
fn meets_minimum(required: Option<f64>, offered: Option<f64>) -> Option<f64> {
    let (required, offered) = (required?, offered?);
    if offered >= required || required <= 0.0 {
        Some(1.0)
    } else {
        Some((1.0 - (required - offered) / required).max(0.5))
    }
}

/// Tiered score against a minimum: `tiers` is (multiple of requirement, score)
/// from best to worst; below every tier yields `floor`.
fn tiered(required: Option<f64>, offered: Option<f64>, tiers: &[(f64, f64)], floor: f64) -> Option<f64> {
    let (required, offered) = (required?, offered?);
    Some(
        tiers
            .iter()
            .find(|(multiple, _)| offered >= required * multiple)
            .map(|(_, score)| *score)
            .unwrap_or(floor),
    )
}

/// fp32 weighs 0.4; tensor cores, CUDA cores, int8 and fp16 0.15 each.
pub fn compare_compute(req: &AiHardwareRequirements, specs: &Value) -> f64 {
    let compute = section(specs, "computeSpecs");
    let mut w = Weighted::default();
    w.add(
        tiered(
            req.min_compute_power,
            number(compute, "fp32Performance"),
            &[(1.5, 1.0), (1.0, 0.9), (0.8, 0.7), (0.6, 0.5)],
            0.3,
        ),
        0.4,
    );
    w.add(meets_minimum(req.min_tensor_cores, number(compute, "tensorCores")), 0.15);
    w.add(meets_minimum(req.min_cuda_cores, number(compute, "cudaCores")), 0.15);
    w.add(meets_minimum(req.min_int8_performance, number(compute, "int8Performance")), 0.15);
    w.add(meets_minimum(req.min_fp16_performance, number(compute, "fp16Performance")), 0.15);
    w.average_or_neutral()
}

fn memory_type_score(required: Option<&str>, offered: Option<&str>) -> Option<f64> {
    let required = required?.trim().to_lowercase();
    let offered = offered?.trim().to_lowercase();
    if required == offered {
        return Some(1.0);
    }
    let rank = |t: &str| MEMORY_TYPE_RANK.iter().position(|r| *r == t);
    match (rank(&required), rank(&offered)) {
        (Some(r), Some(o)) if o > r => Some(1.0),
        (Some(r), Some(o)) => Some((1.0 - (r - o) as f64 * 0.15).max(0.5)),
        _ => Some(0.6),
    }
}

/// Capacity 0.5, bandwidth 0.3, memory type 0.2.
pub fn compare_memory(req: &AiHardwareRequirements, specs: &Value) -> f64 {
    let memory = section(specs, "memorySpecs");
    let mut w = Weighted::default();
    w.add(
        tiered(
            req.min_memory,
            number(memory, "capacity"),
            &[(1.5, 1.0), (1.0, 0.9), (0.8, 0.7), (0.6, 0.5)],
            0.3,
        ),
        0.5,
    );
    w.add(
        tiered(
            req.min_memory_bandwidth,
            number(memory, "bandwidth"),
            &[(1.3, 1.0), (1.0, 0.9), (0.8, 0.7)],
            0.5,
        ),
        0.3,
    );
    w.add(memory_type_score(req.memory_type.as_deref(), text(memory, "type")), 0.2);
    w.average_or_neutral()
}

/// TDP against the buyer's power ceiling; lower is better.
pub fn compare_power(req: &AiHardwareRequirements, specs: &Value) -> f64 {
    let power = section(specs, "powerConsumption");
    let (Some(limit), Some(tdp)) = (req.power_constraints, number(power, "tdp")) else {
        return NEUTRAL;
    };
    if limit <= 0.0 {
        return NEUTRAL;
    }
    let ratio = tdp / limit;
    if ratio <= 0.8 {
        1.0
    } else if ratio <= 1.0 {
        0.9
    } else if ratio <= 1.1 {
        0.7
    } else if ratio <= 1.2 {
        0.5
    } else {
        0.3
    }
}

pub fn supported_frameworks(specs: &Value) -> Vec<String> {
    specs
        .get("supportedFrameworks")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// Share of required frameworks the product lists (substring match).
pub fn compare_frameworks(req: &AiHardwareRequirements, specs: &Value) -> f64 {
    let offered = supported_frameworks(specs);
    if req.frameworks.is_empty() || offered.is_empty() {
        return NEUTRAL;
    }
    let offered: Vec<String> = offered.iter().map(|f| f.to_lowercase()).collect();
    let supported = req
        .frameworks
        .iter()
        .filter(|wanted| {
            let wanted = wanted.to_lowercase();
            offered.iter().any(|f| f.contains(&wanted))
        })
        .count();
    let ratio = supported as f64 / req.frameworks.len() as f64;

    if ratio >= 1.0 {
        1.0
    } else if ratio >= 0.8 {
        0.9
    } else if ratio >= 0.6 {
        0.8
    } else if ratio >= 0.4 {
        0.7
    } else if ratio > 0.0 {
        0.6
    } else {
        0.4
    }
}

/// 0.4 memory + 0.3 frameworks + 0.3 power, in [0, 1].
pub fn compatibility(req: &AiHardwareRequirements, specs: &Value) -> f64 {
    0.4 * compare_memory(req, specs) + 0.3 * compare_frameworks(req, specs) + 0.3 * compare_power(req, specs)
}

// ────────────────────────────────────────────────────────────────────────────
// Framework support report
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameworkSupport {
    pub supported_frameworks: Vec<String>,
    pub requested_frameworks: Vec<String>,
    /// Share of requested frameworks the product lists; 1.0 when none requested.
    pub compatibility_score: f64,
    pub framework_compatibility: BTreeMap<String, bool>,
}

/// Per-framework support using the same substring rule as scoring.
pub fn framework_support(specs: &Value, requested: &[String]) -> FrameworkSupport {
    let supported_frameworks = supported_frameworks(specs);
    let offered: Vec<String> = supported_frameworks.iter().map(|f| f.to_lowercase()).collect();

    let framework_compatibility: BTreeMap<String, bool> = requested
        .iter()
        .map(|wanted| {
            let lower = wanted.to_lowercase();
            (wanted.clone(), offered.iter().any(|f| f.contains(&lower)))
        })
        .collect();

    let compatibility_score = if requested.is_empty() {
        1.0
    } else {
        let hits = requested
            .iter()
            .filter(|f| framework_compatibility.get(*f).copied().unwrap_or(false))
            .count();
        hits as f64 / requested.len() as f64
    };

    FrameworkSupport {
        supported_frameworks,
        requested_frameworks: requested.to_vec(),
        compatibility_score,
        framework_compatibility,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Performance comparison
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PerformanceMetric {
    Fp32,
    Fp16,
    Int8,
    MemoryBandwidth,
    MemoryCapacity,
    Tdp,
}

impl PerformanceMetric {
    pub const ALL: [PerformanceMetric; 6] = [
        PerformanceMetric::Fp32,
        PerformanceMetric::Fp16,
        PerformanceMetric::Int8,
        PerformanceMetric::MemoryBandwidth,
        PerformanceMetric::MemoryCapacity,
        PerformanceMetric::Tdp,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PerformanceMetric::Fp32 => "fp32",
            PerformanceMetric::Fp16 => "fp16",
            PerformanceMetric::Int8 => "int8",
            PerformanceMetric::MemoryBandwidth => "memory_bandwidth",
            PerformanceMetric::MemoryCapacity => "memory_capacity",
            PerformanceMetric::Tdp => "tdp",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PerformanceMetric::Fp32 => "FP32 Performance (TFLOPS)",
            PerformanceMetric::Fp16 => "FP16 Performance (TFLOPS)",
            PerformanceMetric::Int8 => "INT8 Performance (TOPS)",
            PerformanceMetric::MemoryBandwidth => "Memory Bandwidth (GB/s)",
            PerformanceMetric::MemoryCapacity => "Memory Capacity (GB)",
            PerformanceMetric::Tdp => "Thermal Design Power (W)",
        }
    }

    /// The product's value for this metric; 0 when the spec is absent.
    pub fn value(&self, specs: &Value) -> f64 {
        let (section_key, key) = match self {
            PerformanceMetric::Fp32 => ("computeSpecs", "fp32Performance"),
            PerformanceMetric::Fp16 => ("computeSpecs", "fp16Performance"),
            PerformanceMetric::Int8 => ("computeSpecs", "int8Performance"),
            PerformanceMetric::MemoryBandwidth => ("memorySpecs", "bandwidth"),
            PerformanceMetric::MemoryCapacity => ("memorySpecs", "capacity"),
            PerformanceMetric::Tdp => ("powerConsumption", "tdp"),
        };
        number(section(specs, section_key), key).unwrap_or(0.0)
    }
}

impl fmt::Display for PerformanceMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PerformanceMetric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|m| m.as_str() == wanted)
            .ok_or_else(|| {
                let valid: Vec<&str> = Self::ALL.iter().map(|m| m.as_str()).collect();
                format!("Invalid metric '{s}'. Valid options are: {}", valid.join(", "))
            })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerformanceEntry {
    pub product_id: Uuid,
    pub name: String,
    pub manufacturer: String,
    pub value: f64,
    /// Percentage of the best value; absent when the best value is not positive.
    pub relative_performance: Option<f64>,
}

/// Products ordered best-first on `metric`, each relative to the leader.
pub fn compare_performance(metric: PerformanceMetric, products: &[ProductRow]) -> Vec<PerformanceEntry> {
    let mut entries: Vec<PerformanceEntry> = products
        .iter()
        .map(|p| PerformanceEntry {
            product_id: p.id,
            name: p.name.clone(),
            manufacturer: text(&p.specifications, "manufacturer")
                .unwrap_or("Unknown")
                .to_string(),
            value: metric.value(&p.specifications),
            relative_performance: None,
        })
        .collect();

    entries.sort_by(|a, b| b.value.total_cmp(&a.value));

    if let Some(best) = entries.first().map(|e| e.value).filter(|v| *v > 0.0) {
        for entry in entries.iter_mut() {
            entry.relative_performance = Some(entry.value / best * 100.0);
        }
    }
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn a100() -> Value {
        json!({
            "computeSpecs": {"fp32Performance": 19.5, "tensorCores": 432, "cudaCores": 6912, "int8Performance": 624.0},
            "memorySpecs": {"capacity": 80, "bandwidth": 1935, "type": "HBM2e"},
            "powerConsumption": {"tdp": 300},
            "supportedFrameworks": ["PyTorch", "TensorFlow", "JAX"]
        })
    }

    #[test]
    fn test_compute_neutral_without_overlap() {
        assert_eq!(compare_compute(&AiHardwareRequirements::default(), &a100()), NEUTRAL);
    }

    #[test]
    fn test_compute_weights_fp32_heaviest() {
        let req = AiHardwareRequirements {
            min_compute_power: Some(40.0),
            min_tensor_cores: Some(400.0),
            ..Default::default()
        };
        // fp32 19.5 < 0.6 × 40 → 0.3; tensor cores met → 1.0
        let expected = (0.3 * 0.4 + 1.0 * 0.15) / 0.55;
        assert!((compare_compute(&req, &a100()) - expected).abs() < 1e-9);
    }

    #[test]
    fn test_shortfall_has_half_floor() {
        assert_eq!(meets_minimum(Some(1000.0), Some(100.0)), Some(0.5));
        assert_eq!(meets_minimum(Some(1000.0), Some(900.0)), Some(0.9));
        assert_eq!(meets_minimum(None, Some(900.0)), None);
    }

    #[test]
    fn test_memory_capacity_bandwidth_and_type() {
        let req = AiHardwareRequirements {
            min_memory: Some(40.0),
            min_memory_bandwidth: Some(2000.0),
            memory_type: Some("HBM3".to_string()),
            ..Default::default()
        };
        // capacity 2× → 1.0; bandwidth 0.97× → 0.7; HBM2e one step below HBM3 → 0.85
        let expected = (1.0 * 0.5 + 0.7 * 0.3 + 0.85 * 0.2) / 1.0;
        assert!((compare_memory(&req, &a100()) - expected).abs() < 1e-9);
    }

    #[test]
    fn test_unknown_memory_type_scores_point_six() {
        assert_eq!(memory_type_score(Some("LPDDR5"), Some("HBM3")), Some(0.6));
        assert_eq!(memory_type_score(Some("gddr6"), Some("HBM3")), Some(1.0));
    }

    #[test]
    fn test_power_bands() {
        let mut req = AiHardwareRequirements {
            power_constraints: Some(400.0),
            ..Default::default()
        };
        assert_eq!(compare_power(&req, &a100()), 1.0);
        req.power_constraints = Some(260.0);
        assert_eq!(compare_power(&req, &a100()), 0.5);
        req.power_constraints = None;
        assert_eq!(compare_power(&req, &a100()), NEUTRAL);
    }

    #[test]
    fn test_framework_ratio_bands() {
        let mut req = AiHardwareRequirements {
            frameworks: vec!["pytorch".to_string(), "tensorflow".to_string()],
            ..Default::default()
        };
        assert_eq!(compare_frameworks(&req, &a100()), 1.0);
        req.frameworks.push("MXNet".to_string());
        req.frameworks.push("Caffe".to_string());
        assert_eq!(compare_frameworks(&req, &a100()), 0.7);
        req.frameworks = vec!["Caffe".to_string()];
        assert_eq!(compare_frameworks(&req, &a100()), 0.4);
    }

    #[test]
    fn test_flat_specs_and_string_numbers_are_read() {
        let flat = json!({"capacity": "48 GB", "tdp": 350});
        let req = AiHardwareRequirements {
            min_memory: Some(48.0),
            power_constraints: Some(300.0),
            ..Default::default()
        };
        assert_eq!(compare_memory(&req, &flat), 0.9);
        assert_eq!(compare_power(&req, &flat), 0.5);
    }

    #[test]
    fn test_compatibility_in_unit_range() {
        let req = AiHardwareRequirements {
            min_memory: Some(80.0),
            frameworks: vec!["PyTorch".to_string()],
            power_constraints: Some(700.0),
            ..Default::default()
        };
        let c = compatibility(&req, &a100());
        assert!((c - (0.4 * 0.9 + 0.3 * 1.0 + 0.3 * 1.0)).abs() < 1e-9);
    }

    #[test]
    fn test_framework_support_map_and_score() {
        let requested = vec!["pytorch".to_string(), "MXNet".to_string()];
        let report = framework_support(&a100(), &requested);
        assert_eq!(report.supported_frameworks, vec!["PyTorch", "TensorFlow", "JAX"]);
        assert_eq!(report.framework_compatibility.get("pytorch"), Some(&true));
        assert_eq!(report.framework_compatibility.get("MXNet"), Some(&false));
        assert_eq!(report.compatibility_score, 0.5);
    }

    #[test]
    fn test_framework_support_without_request_is_full() {
        let report = framework_support(&a100(), &[]);
        assert_eq!(report.compatibility_score, 1.0);
        assert!(report.framework_compatibility.is_empty());
        assert_eq!(framework_support(&json!({}), &["JAX".to_string()]).compatibility_score, 0.0);
    }

    #[test]
    fn test_metric_names_are_validated() {
        assert_eq!("memory_bandwidth".parse::<PerformanceMetric>(), Ok(PerformanceMetric::MemoryBandwidth));
        assert_eq!(" FP16 ".parse::<PerformanceMetric>(), Ok(PerformanceMetric::Fp16));
        let err = "flops".parse::<PerformanceMetric>().unwrap_err();
        assert!(err.contains("fp32, fp16, int8, memory_bandwidth, memory_capacity, tdp"));
    }

    fn gpu(name: &str, specs: Value) -> ProductRow {
        ProductRow {
            id: Uuid::new_v4(),
            supplier_id: Uuid::new_v4(),
            name: name.to_string(),
            category: "GPU".to_string(),
            description: None,
            price: 1000.0,
            specifications: specs,
            warranty: "3 years".to_string(),
        }
    }

    #[test]
    fn test_performance_sorted_with_relative_percentage() {
        let products = vec![
            gpu("A100", a100()),
            gpu("H100", json!({"manufacturer": "NVIDIA", "computeSpecs": {"fp32Performance": 78.0}})),
            gpu("Mystery", json!({})),
        ];
        let ranked = compare_performance(PerformanceMetric::Fp32, &products);
        let names: Vec<&str> = ranked.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["H100", "A100", "Mystery"]);
        assert_eq!(ranked[0].manufacturer, "NVIDIA");
        assert_eq!(ranked[1].manufacturer, "Unknown");
        assert_eq!(ranked[0].relative_performance, Some(100.0));
        assert!((ranked[1].relative_performance.unwrap() - 25.0).abs() < 1e-9);
        assert_eq!(ranked[2].relative_performance, Some(0.0));
    }

    #[test]
    fn test_performance_without_positive_leader_has_no_relative_values() {
        let ranked = compare_performance(PerformanceMetric::Tdp, &[gpu("Bare", json!({}))]);
        assert_eq!(ranked[0].value, 0.0);
        assert_eq!(ranked[0].relative_performance, None);
    }
}
