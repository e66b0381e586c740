//! Depreciation schedules for the four supported methods
//!
//! Every period is rounded to cents as it is produced, so a schedule does
//! not always sum to exactly cost - salvage.

use log::warn;

/// Book value within this distance of salvage counts as fully depreciated
pub const SALVAGE_TOLERANCE: f64 = 0.01;

/// Longest schedule produced; longer lives yield an empty schedule
pub const MAX_PERIODS: usize = 10_000;

/// Round to 2 decimal places on the exact binary value, so 1.115 (stored as
/// 1.11499...) becomes 1.11. Exact halves such as 0.125 go away from zero.
pub fn round_cents(value: f64) -> f64 {
    if !value.is_finite() {
        return value;
    }

    let magnitude = value.abs();
    let scaled = magnitude * 100.0;
    // Only multiples of 1/8 can sit exactly on a half cent
    if (magnitude * 8.0).fract() == 0.0 && scaled.fract() == 0.5 {
        return ((scaled.floor() + 1.0) / 100.0).copysign(value);
    }

    format!("{:.2}", value).parse().unwrap_or(value)
}

/// Whole periods in a useful life; fractional years are dropped. Lives
/// beyond `MAX_PERIODS` give no periods.
pub fn whole_periods(useful_life: f64) -> usize {
    if useful_life.is_finite() && useful_life >= 1.0 && useful_life < (MAX_PERIODS + 1) as f64 {
        useful_life.trunc() as usize
    } else {
        0
    }
}

/// Same amount every period: (cost - salvage) / life
pub fn straight_line(cost: f64, salvage: f64, useful_life: f64) -> Vec<f64> {
    let periods = whole_periods(useful_life);
    if periods == 0 {
        return Vec::new();
    }

    let annual = round_cents((cost - salvage) / useful_life);
    vec![annual; periods]
}

/// Double-declining balance: 2/life of the current book value per period,
/// never taking book value below salvage. Periods after salvage is reached
/// are filled with zero.
pub fn declining_balance(cost: f64, salvage: f64, useful_life: f64) -> Vec<f64> {
    let periods = whole_periods(useful_life);
    let rate = 2.0 / useful_life;

    let mut schedule = Vec::with_capacity(periods);
    let mut book_value = cost;

    for _ in 0..periods {
        let mut depreciation = round_cents(book_value * rate);
        if book_value - depreciation < salvage {
            depreciation = round_cents(book_value - salvage).max(0.0);
        }

        schedule.push(depreciation);
        book_value -= depreciation;

        if book_value <= salvage + SALVAGE_TOLERANCE {
            break;
        }
    }

    schedule.resize(periods, 0.0);
    schedule
}

/// Sum-of-years'-digits: period t gets (life - t + 1) / (life(life+1)/2)
/// of the depreciable base
pub fn sum_of_years_digits(cost: f64, salvage: f64, useful_life: f64) -> Vec<f64> {
    let digit_sum = useful_life * (useful_life + 1.0) / 2.0;
    let base = cost - salvage;

    (1..=whole_periods(useful_life))
        .map(|year| {
            let fraction = (useful_life - year as f64 + 1.0) / digit_sum;
            round_cents(fraction * base)
        })
        .collect()
}

/// Units of production: each period's usage times (cost - salvage) / total.
/// A non-positive total yields an all-zero schedule.
pub fn units_of_production(cost: f64, salvage: f64, usage: &[f64], total_usage: f64) -> Vec<f64> {
    if total_usage <= 0.0 {
        warn!("Total usage {total_usage} is not positive, no depreciation charged");
        return vec![0.0; usage.len()];
    }

    let rate_per_unit = (cost - salvage) / total_usage;
    usage
        .iter()
        .map(|&units| round_cents(units * rate_per_unit))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn total(schedule: &[f64]) -> f64 {
        schedule.iter().sum()
    }

    #[test]
    fn test_straight_line() {
        let schedule = straight_line(1000.0, 100.0, 5.0);
        assert_eq!(schedule, vec![180.0; 5]);
        assert_eq!(total(&schedule), 900.0);
    }

    #[test]
    fn test_straight_line_fractional_life() {
        // 900 / 4.5 = 200 per year, but only 4 whole periods
        let schedule = straight_line(1000.0, 100.0, 4.5);
        assert_eq!(schedule, vec![200.0; 4]);
    }

    #[test]
    fn test_straight_line_rounding_drift() {
        // 1000 / 3 = 333.33 each, three cents short of the base
        let schedule = straight_line(1000.0, 0.0, 3.0);
        assert_eq!(schedule, vec![333.33; 3]);
        assert_abs_diff_eq!(total(&schedule), 999.99, epsilon = 1e-9);
    }

    #[test]
    fn test_declining_balance_reaches_salvage_in_last_period() {
        let schedule = declining_balance(1000.0, 100.0, 5.0);
        // 400, 240, 144, 86.40, then clamped to bring book value to 100
        assert_eq!(schedule.len(), 5);
        assert_abs_diff_eq!(schedule[0], 400.0, epsilon = 1e-9);
        assert_abs_diff_eq!(schedule[1], 240.0, epsilon = 1e-9);
        assert_abs_diff_eq!(schedule[2], 144.0, epsilon = 1e-9);
        assert_abs_diff_eq!(schedule[3], 86.4, epsilon = 1e-9);
        assert_abs_diff_eq!(schedule[4], 29.6, epsilon = 1e-9);
        assert_abs_diff_eq!(total(&schedule), 900.0, epsilon = 1e-6);
    }

    #[test]
    fn test_declining_balance_never_below_salvage() {
        for life in 1..=12 {
            let schedule = declining_balance(1000.0, 100.0, life as f64);
            assert_eq!(schedule.len(), life);

            let mut book_value = 1000.0;
            for amount in &schedule {
                assert!(*amount >= 0.0);
                book_value -= amount;
                assert!(book_value >= 100.0 - 1e-6, "life {}: book value {}", life, book_value);
            }
        }
    }

    #[test]
    fn test_declining_balance_pads_with_zeros() {
        // 200, 160, 128, then 12 brings book value to 500
        let schedule = declining_balance(1000.0, 500.0, 10.0);
        assert_eq!(schedule.len(), 10);
        assert_abs_diff_eq!(schedule[3], 12.0, epsilon = 1e-9);
        assert!(schedule[4..].iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_declining_balance_salvage_above_cost() {
        let schedule = declining_balance(100.0, 500.0, 4.0);
        assert_eq!(schedule, vec![0.0; 4]);
    }

    #[test]
    fn test_sum_of_years_digits() {
        let schedule = sum_of_years_digits(1000.0, 100.0, 4.0);
        assert_eq!(schedule, vec![360.0, 270.0, 180.0, 90.0]);
        assert_abs_diff_eq!(total(&schedule), 900.0, epsilon = 1e-9);
    }

    #[test]
    fn test_sum_of_years_digits_rounds_each_period() {
        // digit sum 6: 500, 333.33, 166.67
        let schedule = sum_of_years_digits(1000.0, 0.0, 3.0);
        assert_eq!(schedule, vec![500.0, 333.33, 166.67]);
    }

    #[test]
    fn test_units_of_production() {
        let schedule = units_of_production(1000.0, 100.0, &[100.0, 200.0, 300.0], 600.0);
        assert_eq!(schedule, vec![150.0, 300.0, 450.0]);
    }

    #[test]
    fn test_units_of_production_zero_total() {
        let schedule = units_of_production(1000.0, 100.0, &[0.0, 0.0, 0.0], 0.0);
        assert_eq!(schedule, vec![0.0, 0.0, 0.0]);

        let schedule = units_of_production(1000.0, 100.0, &[5.0, 5.0], -10.0);
        assert_eq!(schedule, vec![0.0, 0.0]);
    }

    #[test]
    fn test_short_lives_are_empty() {
        assert!(straight_line(1000.0, 100.0, 0.0).is_empty());
        assert!(declining_balance(1000.0, 100.0, 0.5).is_empty());
        assert!(sum_of_years_digits(1000.0, 100.0, -3.0).is_empty());
        assert!(straight_line(1000.0, 100.0, f64::NAN).is_empty());
    }

    #[test]
    fn test_methods_are_idempotent() {
        assert_eq!(
            declining_balance(12345.67, 234.5, 7.0),
            declining_balance(12345.67, 234.5, 7.0)
        );
        assert_eq!(
            sum_of_years_digits(12345.67, 234.5, 7.0),
            sum_of_years_digits(12345.67, 234.5, 7.0)
        );
    }

    #[test]
    fn test_round_cents() {
        assert_eq!(round_cents(333.333), 333.33);
        assert_eq!(round_cents(166.666), 166.67);
        assert_eq!(round_cents(-2.5), -2.5);
    }

    #[test]
    fn test_round_cents_uses_stored_value() {
        // 1.115 and 10.045 are stored just below the half cent
        assert_eq!(round_cents(11.15 / 10.0), 1.11);
        assert_eq!(round_cents(100.45 / 10.0), 10.04);
        assert_eq!(round_cents(1.005), 1.0);
    }

    #[test]
    fn test_round_cents_exact_half_goes_up() {
        assert_eq!(round_cents(0.125), 0.13);
        assert_eq!(round_cents(1.375), 1.38);
        assert_eq!(round_cents(-0.125), -0.13);
        assert_eq!(round_cents(2.5), 2.5);
    }

    #[test]
    fn test_straight_line_rounds_like_to_fixed() {
        assert_eq!(straight_line(11.15, 0.0, 10.0), vec![1.11; 10]);
        assert_eq!(straight_line(100.45, 0.0, 10.0), vec![10.04; 10]);
        assert_eq!(units_of_production(100.45, 0.0, &[1.0], 10.0), vec![10.04]);
    }

    #[test]
    fn test_absurd_life_is_empty() {
        assert!(straight_line(1000.0, 100.0, 1e300).is_empty());
        assert!(declining_balance(1000.0, 100.0, 1e300).is_empty());
        assert!(sum_of_years_digits(1000.0, 100.0, 1e300).is_empty());
        assert_eq!(whole_periods(MAX_PERIODS as f64 + 0.5), MAX_PERIODS);
        assert_eq!(whole_periods(MAX_PERIODS as f64 + 1.0), 0);
    }
}
