use std::sync::LazyLock;

use chrono::{Days, NaiveDate};
use regex::Regex;

/// Lead time assumed when a supplier's delivery text has no numbers.
pub const DEFAULT_DELIVERY_DAYS: f64 = 30.0;

/// Longest lead time an estimated delivery date is projected over. Delivery
/// text can carry unrelated numbers (phone or order numbers).
pub const MAX_LEAD_DAYS: f64 = 3650.0;

// static pattern
static DIGIT_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+").expect("valid regex"));

/// Average lead time in days from free text: "15-30 days" → 22.5,
/// "ships in 5 days" → 5, anything without digits → 30.
pub fn parse_delivery_time(text: &str) -> f64 {
    let numbers: Vec<f64> = DIGIT_RUN
        .find_iter(text)
        .filter_map(|m| m.as_str().parse::<f64>().ok())
        .take(2)
        .collect();

    match numbers.as_slice() {
        [first, second] => (first + second) / 2.0,
        [only] => *only,
        _ => DEFAULT_DELIVERY_DAYS,
    }
}

/// General-equipment delivery score in [10, 100]: linear decay to the floor
/// at 54 days.
pub fn delivery_score(days: f64) -> f64 {
    (1.0 - days / 60.0).max(0.1) * 100.0
}

/// AI-hardware availability score bucketed by lead time.
pub fn availability_score(days: f64) -> f64 {
    if days <= 7.0 {
        100.0
    } else if days <= 14.0 {
        90.0
    } else if days <= 30.0 {
        80.0
    } else if days <= 60.0 {
        60.0
    } else {
        40.0
    }
}

/// `today` plus the lead time, capped at `MAX_LEAD_DAYS`.
pub fn estimated_delivery(today: NaiveDate, days: f64) -> NaiveDate {
    let days = if days.is_finite() {
        days.round().clamp(0.0, MAX_LEAD_DAYS)
    } else {
        MAX_LEAD_DAYS
    };
    today
        .checked_add_days(Days::new(days as u64))
        .unwrap_or(NaiveDate::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_averages_first_two_numbers() {
        assert_eq!(parse_delivery_time("15-30 days"), 22.5);
        assert_eq!(parse_delivery_time("7 to 14 business days, 3 warehouses"), 10.5);
    }

    #[test]
    fn test_single_number_and_no_digits() {
        assert_eq!(parse_delivery_time("Ships in 5 days"), 5.0);
        assert_eq!(parse_delivery_time("no digits"), 30.0);
        assert_eq!(parse_delivery_time(""), 30.0);
    }

    #[test]
    fn test_delivery_score_decays_to_floor() {
        assert_eq!(delivery_score(0.0), 100.0);
        assert!((delivery_score(12.0) - 80.0).abs() < 1e-9);
        assert!((delivery_score(120.0) - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_availability_buckets() {
        assert_eq!(availability_score(7.0), 100.0);
        assert_eq!(availability_score(7.5), 90.0);
        assert_eq!(availability_score(22.5), 80.0);
        assert_eq!(availability_score(45.0), 60.0);
        assert_eq!(availability_score(61.0), 40.0);
    }

    #[test]
    fn test_estimated_delivery_rounds_days() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        assert_eq!(
            estimated_delivery(today, 22.5),
            NaiveDate::from_ymd_opt(2024, 3, 24).unwrap()
        );
    }

    #[test]
    fn test_huge_number_in_delivery_text_is_capped() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let days = parse_delivery_time("Call 18005551234 to confirm lead time");
        assert_eq!(days, 18005551234.0);
        assert_eq!(
            estimated_delivery(today, days),
            today.checked_add_days(Days::new(3650)).unwrap()
        );
        assert!((delivery_score(days) - 10.0).abs() < 1e-9);
        assert_eq!(availability_score(days), 40.0);
    }
}
