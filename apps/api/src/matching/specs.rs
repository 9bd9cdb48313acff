//! Specification comparators for general equipment (laptops, monitors).
//!
//! Every comparator takes the buyer's requirement text and the product's
//! specification text and returns a score in [0, 1]. Inputs are free text,
//! so each comparator works from whatever numbers and keywords it can find
//! and falls back to a low baseline when nothing lines up.
//!
//! `laptop_quality` / `monitor_quality` combine the comparators into a single
//! weighted average, skipping any field missing on either side.

use std::sync::LazyLock;

use regex::Regex;

use crate::models::catalog::ProductRow;
use crate::requirements::models::{LaptopRequirements, MonitorRequirements};

// static patterns
macro_rules! pattern {
    ($name:ident, $re:expr) => {
        static $name: LazyLock<Regex> = LazyLock::new(|| Regex::new($re).expect("valid regex"));
    };
}

pattern!(CPU_FAMILY, r"i\d|ryzen \d");
pattern!(CPU_MODEL, r"\d{4,5}[a-z]*");
pattern!(MEMORY_GB, r"(\d+)\s*gb");
pattern!(DDR_TYPE, r"ddr\d");
pattern!(STORAGE_SIZE, r"(\d+)\s*(gb|tb)");
pattern!(RES_WXH, r"(\d+)\s*x\s*(\d+)");
pattern!(RES_LINES, r"(\d+)p");
pattern!(NITS, r"(\d+)\s*nits");
pattern!(INCHES, r#"(\d+(?:\.\d+)?)\s*-?\s*(?:inch(?:es)?|")"#);
pattern!(YEARS, r"(\d+)\s*years?");
pattern!(HOURS, r"(\d+)\s*\+?\s*hours?");
pattern!(FIRST_NUMBER, r"\d+");

const PROCESSOR_VENDORS: &[&str] = &["intel", "amd", "core", "ryzen", "snapdragon"];
const STORAGE_TYPES: &[&str] = &["ssd", "hdd", "nvme", "pcie"];
const RESOLUTION_NAMES: &[&str] = &["hd", "fhd", "1080p", "4k", "uhd", "qhd", "1440p", "2160p"];
const PANEL_TECHS: &[&str] = &["ips", "tn", "va", "oled", "amoled", "retina"];
const WARRANTY_TYPES: &[&str] = &[
    "onsite",
    "on-site",
    "next business day",
    "pro support",
    "prosupport",
    "premium",
    "care pack",
    "exchange",
];
const CONNECTORS: &[&str] = &["hdmi", "displayport", "vga", "usb-c", "thunderbolt"];
const STAND_FEATURES: &[&str] = &["height", "tilt", "swivel", "pivot"];

fn capture_f64(re: &Regex, text: &str) -> Option<f64> {
    re.captures(text)?.get(1)?.as_str().parse().ok()
}

fn first_number(text: &str) -> Option<f64> {
    FIRST_NUMBER.find(text)?.as_str().parse().ok()
}

fn both_contain(req: &str, spec: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| req.contains(n) && spec.contains(n))
}

/// Shared shape for "more is better" quantities: 0.7 at parity, rising with
/// the capped surplus, falling proportionally (floor 0.2) below it.
fn surplus_score(required: f64, offered: f64, bonus: impl Fn(f64) -> f64) -> f64 {
    if required <= 0.0 {
        return 1.0;
    }
    if offered >= required {
        0.7 + bonus(offered - required)
    } else {
        (offered / required * 0.7).max(0.2)
    }
}

/// Capacity comparison for memory and storage: exact match 1.0, up to 2×
/// over-provisioning scales 0.7 → 1.0.
fn capacity_score(required: f64, offered: f64) -> f64 {
    if required <= 0.0 || required == offered {
        return 1.0;
    }
    if offered > required {
        let ratio = (offered / required).min(2.0);
        0.7 + 0.3 * (ratio - 1.0)
    } else {
        (offered / required * 0.7).max(0.2)
    }
}

pub fn compare_processor(requirement: &str, spec: &str) -> f64 {
    let req = requirement.to_lowercase();
    let spec = spec.to_lowercase();

    if req == spec {
        return 1.0;
    }
    if let (Some(a), Some(b)) = (CPU_FAMILY.find(&req), CPU_FAMILY.find(&spec)) {
        if a.as_str() == b.as_str() {
            return 0.8;
        }
    }
    if both_contain(&req, &spec, &["i7", "i5", "i3", "ryzen 7", "ryzen 5"]) {
        return 0.7;
    }
    if let (Some(a), Some(b)) = (CPU_MODEL.find(&req), CPU_MODEL.find(&spec)) {
        if a.as_str() == b.as_str() {
            return 0.6;
        }
    }
    if both_contain(&req, &spec, PROCESSOR_VENDORS) {
        return 0.5;
    }
    0.3
}

pub fn compare_memory(requirement: &str, spec: &str) -> f64 {
    let req = requirement.to_lowercase();
    let spec = spec.to_lowercase();

    if let (Some(r), Some(s)) = (capture_f64(&MEMORY_GB, &req), capture_f64(&MEMORY_GB, &spec)) {
        return capacity_score(r, s);
    }
    match (DDR_TYPE.find(&req), DDR_TYPE.find(&spec)) {
        (Some(a), Some(b)) if a.as_str() == b.as_str() => 0.5,
        _ => 0.3,
    }
}

fn storage_gb(text: &str) -> Option<f64> {
    let caps = STORAGE_SIZE.captures(text)?;
    let amount: f64 = caps.get(1)?.as_str().parse().ok()?;
    let unit = caps.get(2)?.as_str();
    Some(if unit == "tb" { amount * 1024.0 } else { amount })
}

pub fn compare_storage(requirement: &str, spec: &str) -> f64 {
    let req = requirement.to_lowercase();
    let spec = spec.to_lowercase();

    if let (Some(r), Some(s)) = (storage_gb(&req), storage_gb(&spec)) {
        return capacity_score(r, s);
    }
    if both_contain(&req, &spec, STORAGE_TYPES) {
        0.5
    } else {
        0.3
    }
}

/// First match wins: resolution name, exact WxH / Np, panel, brightness, size.
pub fn compare_display(requirement: &str, spec: &str) -> f64 {
    let req = requirement.to_lowercase();
    let spec = spec.to_lowercase();

    if both_contain(&req, &spec, RESOLUTION_NAMES) {
        return 0.8;
    }
    for re in [&*RES_WXH, &*RES_LINES] {
        if let (Some(a), Some(b)) = (re.find(&req), re.find(&spec)) {
            if a.as_str() == b.as_str() {
                return 1.0;
            }
        }
    }
    if both_contain(&req, &spec, PANEL_TECHS) {
        return 0.7;
    }
    if let (Some(r), Some(s)) = (capture_f64(&NITS, &req), capture_f64(&NITS, &spec)) {
        if s >= r {
            return 0.9;
        }
        return (s / r * 0.9).max(0.3);
    }
    if let (Some(r), Some(s)) = (capture_f64(&INCHES, &req), capture_f64(&INCHES, &spec)) {
        let diff = (r - s).abs();
        if diff <= 1.0 {
            return 0.8;
        }
        if diff <= 2.0 {
            return 0.6;
        }
    }
    0.4
}

pub fn compare_warranty(requirement: &str, spec: &str) -> f64 {
    let req = requirement.to_lowercase();
    let spec = spec.to_lowercase();

    if let (Some(r), Some(s)) = (capture_f64(&YEARS, &req), capture_f64(&YEARS, &spec)) {
        return if s >= r {
            0.7 + (s - r).min(3.0) * 0.1
        } else if r > 0.0 {
            (s / r * 0.7).max(0.2)
        } else {
            0.7
        };
    }
    if both_contain(&req, &spec, WARRANTY_TYPES) {
        return 0.8;
    }
    if req.contains("warranty") && spec.contains("warranty") {
        return 0.5;
    }
    0.3
}

/// `None` when either side states no hours.
pub fn compare_battery(requirement: &str, spec: &str) -> Option<f64> {
    let r = capture_f64(&HOURS, &requirement.to_lowercase())?;
    let s = capture_f64(&HOURS, &spec.to_lowercase())?;
    Some(surplus_score(r, s, |extra| (extra / 10.0).min(0.3)))
}

pub fn compare_os(requirement: &str, spec: &str) -> f64 {
    if spec.to_lowercase().contains(&requirement.trim().to_lowercase()) {
        1.0
    } else {
        0.3
    }
}

/// `None` when either side states no size.
pub fn compare_screen_size(requirement: &str, spec: &str) -> Option<f64> {
    let r = capture_f64(&INCHES, &requirement.to_lowercase())?;
    let s = capture_f64(&INCHES, &spec.to_lowercase())?;
    if r <= 0.0 {
        return None;
    }
    Some((1.0 - (r - s).abs() / r).max(0.0))
}

/// hd = 1, fhd = 2, qhd = 3, uhd/4k = 4; the highest level mentioned wins.
pub fn resolution_level(text: &str) -> u8 {
    let text = text.to_lowercase();
    let mut level = 0;
    let named: &[(&str, u8)] = &[
        ("hd", 1),
        ("fhd", 2),
        ("full hd", 2),
        ("1080", 2),
        ("qhd", 3),
        ("1440", 3),
        ("uhd", 4),
        ("4k", 4),
        ("2160", 4),
    ];
    for (needle, value) in named {
        if text.contains(needle) {
            level = level.max(*value);
        }
    }
    level
}

pub fn compare_resolution(requirement: &str, spec: &str) -> f64 {
    let req = requirement.trim().to_lowercase();
    if spec.to_lowercase().contains(&req) {
        return 1.0;
    }
    let r = resolution_level(&req) as f64;
    let s = resolution_level(spec) as f64;
    if r == 0.0 || s == 0.0 {
        return 0.0;
    }
    if s >= r {
        0.7 + ((s - r) * 0.1).min(0.3)
    } else {
        (s / r * 0.7).max(0.2)
    }
}

pub fn compare_panel(requirement: &str, spec: &str) -> f64 {
    if spec.to_lowercase().contains(&requirement.trim().to_lowercase()) {
        1.0
    } else {
        0.3
    }
}

/// `None` when either side states no number.
pub fn compare_brightness(requirement: &str, spec: &str) -> Option<f64> {
    let r = first_number(requirement)?;
    let s = first_number(spec)?;
    Some(surplus_score(r, s, |extra| (extra / (r * 2.0)).min(0.3)))
}

/// Fraction of the requested keywords the product also lists; 0.5 when the
/// requirement names none of them.
pub fn keyword_overlap(requirement: &str, spec: &str, vocabulary: &[&str]) -> f64 {
    let req = requirement.to_lowercase();
    let spec = spec.to_lowercase();
    let wanted: Vec<&str> = vocabulary.iter().copied().filter(|k| req.contains(k)).collect();
    if wanted.is_empty() {
        return 0.5;
    }
    let offered = wanted.iter().filter(|k| spec.contains(*k)).count();
    offered as f64 / wanted.len() as f64
}

pub fn compare_connectivity(requirement: &str, spec: &str) -> f64 {
    keyword_overlap(requirement, spec, CONNECTORS)
}

pub fn compare_adjustability(requirement: &str, spec: &str) -> f64 {
    keyword_overlap(requirement, spec, STAND_FEATURES)
}

/// Running weighted average of the comparators that applied.
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

    fn average(&self) -> Option<f64> {
        (self.weight > 0.0).then(|| self.total / self.weight)
    }
}

fn pair<'a>(req: &'a Option<String>, product: &ProductRow, key: &str) -> Option<(&'a str, String)> {
    let req = req.as_deref().filter(|r| !r.trim().is_empty())?;
    let spec = product.spec_str(key).filter(|s| !s.trim().is_empty())?;
    Some((req, spec))
}

fn warranty_pair<'a>(req: &'a Option<String>, product: &'a ProductRow) -> Option<(&'a str, &'a str)> {
    let req = req.as_deref().filter(|r| !r.trim().is_empty())?;
    let offered = Some(product.warranty.as_str()).filter(|w| !w.trim().is_empty())?;
    Some((req, offered))
}

/// Weighted laptop spec match in [0, 1], or `None` when nothing is comparable.
pub fn laptop_quality(req: &LaptopRequirements, product: &ProductRow) -> Option<f64> {
    let mut w = Weighted::default();
    w.add(pair(&req.processor, product, "processor").map(|(r, s)| compare_processor(r, &s)), 15.0);
    w.add(pair(&req.memory, product, "memory").map(|(r, s)| compare_memory(r, &s)), 15.0);
    w.add(pair(&req.storage, product, "storage").map(|(r, s)| compare_storage(r, &s)), 15.0);
    w.add(pair(&req.display, product, "display").map(|(r, s)| compare_display(r, &s)), 10.0);
    w.add(pair(&req.os, product, "os").map(|(r, s)| compare_os(r, &s)), 10.0);
    w.add(pair(&req.battery, product, "battery").and_then(|(r, s)| compare_battery(r, &s)), 10.0);
    w.add(warranty_pair(&req.warranty, product).map(|(r, s)| compare_warranty(r, s)), 10.0);
    w.average()
}

/// Weighted monitor spec match in [0, 1], or `None` when nothing is comparable.
pub fn monitor_quality(req: &MonitorRequirements, product: &ProductRow) -> Option<f64> {
    let mut w = Weighted::default();
    w.add(pair(&req.screen_size, product, "screenSize").and_then(|(r, s)| compare_screen_size(r, &s)), 20.0);
    w.add(pair(&req.resolution, product, "resolution").map(|(r, s)| compare_resolution(r, &s)), 20.0);
    w.add(pair(&req.panel_tech, product, "panelTech").map(|(r, s)| compare_panel(r, &s)), 15.0);
    w.add(pair(&req.brightness, product, "brightness").and_then(|(r, s)| compare_brightness(r, &s)), 10.0);
    w.add(pair(&req.connectivity, product, "connectivity").map(|(r, s)| compare_connectivity(r, &s)), 10.0);
    w.add(pair(&req.adjustability, product, "adjustability").map(|(r, s)| compare_adjustability(r, &s)), 10.0);
    w.add(warranty_pair(&req.warranty, product).map(|(r, s)| compare_warranty(r, s)), 10.0);
    w.average()
}
