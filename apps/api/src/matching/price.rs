/// Min-max price score in [0, 100] against the other candidates of the same
/// category: the cheapest scores 100, the most expensive 0. A pool where every
/// price is equal (including a single candidate) scores 100.
pub fn price_score(price: f64, pool: &[f64]) -> f64 {
    let (min, max) = pool
        .iter()
        .copied()
        .chain(std::iter::once(price))
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| (lo.min(p), hi.max(p)));

    let spread = max - min;
    if spread <= f64::EPSILON {
        return 100.0;
    }
    (100.0 * (max - price) / spread).clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cheapest_and_most_expensive() {
        let pool = [899.0, 1299.0, 1099.0];
        assert_eq!(price_score(899.0, &pool), 100.0);
        assert_eq!(price_score(1299.0, &pool), 0.0);
        assert!((price_score(1099.0, &pool) - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_equal_prices_and_single_candidate() {
        assert_eq!(price_score(500.0, &[500.0, 500.0]), 100.0);
        assert_eq!(price_score(500.0, &[500.0]), 100.0);
        assert_eq!(price_score(500.0, &[]), 100.0);
    }

    #[test]
    fn test_price_outside_pool_is_clamped_into_range() {
        let score = price_score(2000.0, &[100.0, 200.0]);
        assert!((0.0..=100.0).contains(&score));
    }
}
