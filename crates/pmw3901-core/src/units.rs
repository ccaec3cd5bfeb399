//! Conversion of raw motion deltas into physical displacement

/// Divisor of the sensor's delta-to-inch scale at one metre of height
pub const COUNTS_PER_INCH_AT_1M: f32 = 11.914;

/// Centimetres per inch
pub const CM_PER_INCH: f32 = 2.54;

/// Convert a raw delta count into centimetres
///
/// `height_m` is the distance between the sensor and the tracked surface in
/// metres. The result is `raw * height_m / 11.914 * 2.54`.
///
/// ```
/// use pmw3901_core::units::delta_raw_to_delta_cm;
///
/// let cm = delta_raw_to_delta_cm(100, 2.0);
/// assert!((cm - 42.6389).abs() < 1e-3);
/// ```
pub fn delta_raw_to_delta_cm(raw: i16, height_m: f32) -> f32 {
    raw as f32 * height_m / COUNTS_PER_INCH_AT_1M * CM_PER_INCH
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_delta() {
        assert_eq!(delta_raw_to_delta_cm(0, 1.5), 0.0);
    }

    #[test]
    fn test_sign_is_kept() {
        let fwd = delta_raw_to_delta_cm(37, 0.8);
        let back = delta_raw_to_delta_cm(-37, 0.8);
        assert!(fwd > 0.0);
        assert!((fwd + back).abs() < 1e-6);
    }

    #[test]
    fn test_known_value() {
        let cm = delta_raw_to_delta_cm(100, 2.0);
        assert!((cm - 42.6389).abs() < 1e-3);
    }
}
