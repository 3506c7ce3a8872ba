use talaria_matrix::Distance;

/// Grams of airframe the drone hauls even when flying empty.
pub const EMPTY_OVERHEAD_GRAMS: f64 = 512.0;

/// Calibration divisor relating gram-kilometers to battery fraction.
pub const CONSUMPTION_FACTOR: f64 = 36739.0;

/// Fraction of a full battery consumed by flying `distance` kilometers
/// while carrying `payload_grams` of cargo. Monotonically non-decreasing
/// in both arguments; inputs are assumed non-negative.
#[inline]
pub fn battery_fraction_required(payload_grams: f64, distance: Distance) -> f64 {
    distance * (payload_grams + EMPTY_OVERHEAD_GRAMS) / CONSUMPTION_FACTOR
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_values() {
        assert_eq!(battery_fraction_required(0.0, 0.0), 0.0);
        assert_eq!(
            battery_fraction_required(100.0, 10.0),
            10.0 * 612.0 / 36739.0
        );
        assert_eq!(battery_fraction_required(0.0, 10.0), 5120.0 / 36739.0);
    }

    #[test]
    fn test_monotone_in_both_arguments() {
        let base = battery_fraction_required(100.0, 10.0);
        assert!(battery_fraction_required(200.0, 10.0) > base);
        assert!(battery_fraction_required(100.0, 20.0) > base);
    }
}
