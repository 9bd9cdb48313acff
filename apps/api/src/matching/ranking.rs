//! Ordering, filtering and display helpers over scored matches.

use std::cmp::Ordering;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::matching::scorer::SupplierMatch;
use crate::requirements::models::Criterion;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Aggregate,
    TotalPrice,
    Criterion(Criterion),
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "score" | "match_score" | "aggregate" => Ok(SortKey::Aggregate),
            "total_price" | "totalprice" => Ok(SortKey::TotalPrice),
            other => other
                .parse::<Criterion>()
                .map(SortKey::Criterion)
                .map_err(|_| format!("unknown sort key '{s}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Ascending,
    #[default]
    Descending,
}

impl FromStr for SortDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortDirection::Ascending),
            "desc" | "descending" => Ok(SortDirection::Descending),
            _ => Err(format!("unknown sort order '{s}'")),
        }
    }
}

fn sort_value(m: &SupplierMatch, key: SortKey) -> f64 {
    match key {
        SortKey::Aggregate => m.match_score,
        SortKey::TotalPrice => m.total_price,
        SortKey::Criterion(c) => m.match_details.get(&c).copied().unwrap_or(0.0),
    }
}

/// Stable sort; equal keys keep their relative order in either direction.
pub fn sort_matches(matches: &mut [SupplierMatch], key: SortKey, direction: SortDirection) {
    matches.sort_by(|a, b| {
        let ord: Ordering = sort_value(a, key).total_cmp(&sort_value(b, key));
        match direction {
            SortDirection::Ascending => ord,
            SortDirection::Descending => ord.reverse(),
        }
    });
}

/// Highest aggregate score; the first one wins a tie.
pub fn find_best_match(matches: &[SupplierMatch]) -> Option<&SupplierMatch> {
    matches.iter().fold(None, |best, m| match best {
        Some(b) if b.match_score >= m.match_score => Some(b),
        _ => Some(m),
    })
}

pub fn calculate_total_price(unit_price: f64, quantity: u32) -> f64 {
    unit_price * f64::from(quantity)
}

pub fn filter_matches(
    matches: Vec<SupplierMatch>,
    category: Option<&str>,
    min_score: Option<f64>,
) -> Vec<SupplierMatch> {
    matches
        .into_iter()
        .filter(|m| category.map_or(true, |c| m.product.category.eq_ignore_ascii_case(c.trim())))
        .filter(|m| min_score.map_or(true, |min| m.match_score >= min))
        .collect()
}

/// One specification line for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecRow {
    pub key: String,
    pub label: String,
    pub value: String,
}

fn label(key: &str) -> String {
    let mut chars = key.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn display_value(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

pub fn format_specifications(specs: &Value) -> Vec<SpecRow> {
    let Some(map) = specs.as_object() else {
        return Vec::new();
    };
    map.iter()
        .map(|(key, value)| SpecRow {
            key: key.clone(),
            label: label(key),
            value: display_value(value),
        })
        .collect()
}

/// Inverse of `format_specifications`: values that read as JSON (numbers,
/// booleans, arrays, objects) are restored, everything else stays text.
pub fn parse_specification_rows(rows: &[SpecRow]) -> Value {
    let map: Map<String, Value> = rows
        .iter()
        .map(|row| {
            let value = match serde_json::from_str::<Value>(&row.value) {
                Ok(parsed) if !parsed.is_string() => parsed,
                _ => Value::String(row.value.clone()),
            };
            (row.key.clone(), value)
        })
        .collect();
    Value::Object(map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::catalog::{ProductRow, SupplierRow};
    use chrono::NaiveDate;
    use serde_json::json;
    use std::collections::BTreeMap;
    use uuid::Uuid;

    fn make(name: &str, category: &str, score: f64, total: f64, price_score: f64) -> SupplierMatch {
        let supplier_id = Uuid::new_v4();
        SupplierMatch {
            proposal_id: None,
            supplier: SupplierRow {
                id: supplier_id,
                name: "Supplier".to_string(),
                logo_url: None,
                website: None,
                country: None,
                description: None,
                contact_email: None,
                contact_phone: None,
                delivery_time: "10 days".to_string(),
                is_verified: false,
            },
            product: ProductRow {
                id: Uuid::new_v4(),
                supplier_id,
                name: name.to_string(),
                category: category.to_string(),
                description: None,
                price: total,
                specifications: json!({}),
                warranty: String::new(),
            },
            match_score: score,
            match_details: BTreeMap::from([(Criterion::Price, price_score)]),
            total_price: total,
            quantity: 1,
            estimated_delivery: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            compliance_notes: Vec::new(),
            scorer_backend: "general_equipment".to_string(),
        }
    }

    fn names(matches: &[SupplierMatch]) -> Vec<&str> {
        matches.iter().map(|m| m.product.name.as_str()).collect()
    }

    #[test]
    fn test_sort_by_aggregate_and_price_both_directions() {
        let mut matches = vec![
            make("a", "Laptops", 70.0, 300.0, 20.0),
            make("b", "Laptops", 90.0, 100.0, 90.0),
            make("c", "Laptops", 80.0, 200.0, 50.0),
        ];
        sort_matches(&mut matches, SortKey::Aggregate, SortDirection::Descending);
        assert_eq!(names(&matches), ["b", "c", "a"]);

        sort_matches(&mut matches, SortKey::TotalPrice, SortDirection::Ascending);
        assert_eq!(names(&matches), ["b", "c", "a"]);

        sort_matches(&mut matches, SortKey::Criterion(Criterion::Price), SortDirection::Ascending);
        assert_eq!(names(&matches), ["a", "c", "b"]);
    }

    #[test]
    fn test_sort_is_stable_and_idempotent() {
        let mut matches = vec![
            make("first", "Laptops", 80.0, 1.0, 0.0),
            make("top", "Laptops", 95.0, 1.0, 0.0),
            make("second", "Laptops", 80.0, 1.0, 0.0),
        ];
        sort_matches(&mut matches, SortKey::Aggregate, SortDirection::Descending);
        let once = names(&matches).join(",");
        assert_eq!(once, "top,first,second");

        sort_matches(&mut matches, SortKey::Aggregate, SortDirection::Descending);
        assert_eq!(names(&matches).join(","), once);
    }

    #[test]
    fn test_best_match_semantics() {
        assert!(find_best_match(&[]).is_none());

        let single = vec![make("only", "Laptops", 10.0, 1.0, 0.0)];
        assert_eq!(find_best_match(&single).unwrap().product.name, "only");

        let tied = vec![
            make("early", "Laptops", 88.0, 1.0, 0.0),
            make("low", "Laptops", 40.0, 1.0, 0.0),
            make("late", "Laptops", 88.0, 1.0, 0.0),
        ];
        assert_eq!(find_best_match(&tied).unwrap().product.name, "early");
    }

    #[test]
    fn test_total_price_is_exact_product() {
        assert_eq!(calculate_total_price(899.99, 25), 899.99 * 25.0);
        assert_eq!(calculate_total_price(899.99, 0), 0.0);
        assert_eq!(calculate_total_price(0.0, 7), 0.0);
    }

    #[test]
    fn test_filter_by_category_and_min_score() {
        let matches = vec![
            make("lap", "Laptops", 70.0, 1.0, 0.0),
            make("mon", "Monitors", 85.0, 1.0, 0.0),
            make("mon2", "monitors", 50.0, 1.0, 0.0),
        ];
        let filtered = filter_matches(matches.clone(), Some("Monitors"), None);
        assert_eq!(names(&filtered), ["mon", "mon2"]);

        let filtered = filter_matches(matches, Some("monitors"), Some(60.0));
        assert_eq!(names(&filtered), ["mon"]);
    }

    #[test]
    fn test_sort_key_parsing() {
        assert_eq!("score".parse::<SortKey>(), Ok(SortKey::Aggregate));
        assert_eq!("total_price".parse::<SortKey>(), Ok(SortKey::TotalPrice));
        assert_eq!("Delivery".parse::<SortKey>(), Ok(SortKey::Criterion(Criterion::Delivery)));
        assert!("colour".parse::<SortKey>().is_err());
        assert_eq!("asc".parse::<SortDirection>(), Ok(SortDirection::Ascending));
    }

    #[test]
    fn test_spec_rows_round_trip_keys() {
        let specs = json!({
            "processor": "Intel Core i7-1365U",
            "memory": "16GB",
            "screenSize": 15.6,
            "touch": true,
            "ports": ["HDMI", "USB-C"]
        });
        let rows = format_specifications(&specs);
        let screen = rows.iter().find(|r| r.key == "screenSize").unwrap();
        assert_eq!(screen.label, "ScreenSize");
        assert_eq!(screen.value, "15.6");
        let processor = rows.iter().find(|r| r.key == "processor").unwrap();
        assert_eq!(processor.value, "Intel Core i7-1365U");

        let restored = parse_specification_rows(&rows);
        let mut before: Vec<&String> = specs.as_object().unwrap().keys().collect();
        let mut after: Vec<&String> = restored.as_object().unwrap().keys().collect();
        before.sort();
        after.sort();
        assert_eq!(before, after);
        assert_eq!(restored, specs);
    }

    #[test]
    fn test_non_object_specs_format_to_nothing() {
        assert!(format_specifications(&json!("n/a")).is_empty());
    }
}
