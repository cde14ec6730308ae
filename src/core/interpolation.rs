/// Total investment over an interval whose annual rate moves linearly from
/// `prev_rate` to `curr_rate`.
///
/// Callers are responsible for passing finite rates and a positive interval.
pub fn interpolate_and_sum(prev_rate: f64, curr_rate: f64, interval_years: u32) -> f64 {
    (prev_rate + curr_rate) * f64::from(interval_years) / 2.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trapezoidal_total() {
        assert_eq!(interpolate_and_sum(100.0, 200.0, 10), 1500.0);
        assert_eq!(interpolate_and_sum(50.0, 150.0, 10), 1000.0);
        assert_eq!(interpolate_and_sum(0.0, 30.0, 5), 75.0);
    }

    #[test]
    fn test_constant_rate_is_exact() {
        for rate in [0.1, 1.0 / 3.0, 42.0, 1234.5678] {
            for years in [1, 5, 7, 15] {
                assert_eq!(interpolate_and_sum(rate, rate, years), rate * f64::from(years));
            }
        }
    }
}
