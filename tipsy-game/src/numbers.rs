//! Numeric conversion helpers centralizing safe numeric casts.

use num_traits::cast::cast;

use crate::constants::BAC_DECIMALS_SCALE;

/// Round a BAC value to four decimal places.
#[must_use]
pub fn round_bac(value: f64) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    (value * BAC_DECIMALS_SCALE).round() / BAC_DECIMALS_SCALE
}

/// Round a f64 and clamp it to the i32 range, returning 0 for NaN values.
#[must_use]
pub fn round_f64_to_i32(value: f64) -> i32 {
    if value.is_nan() {
        return 0;
    }
    let min = cast::<i32, f64>(i32::MIN).unwrap_or(f64::MIN);
    let max = cast::<i32, f64>(i32::MAX).unwrap_or(f64::MAX);
    let clamped = value.clamp(min, max).round();
    cast::<f64, i32>(clamped).unwrap_or(0)
}

/// Round a non-negative f64 into a u32, returning 0 for negative or NaN values.
#[must_use]
pub fn round_f64_to_u32(value: f64) -> u32 {
    if value.is_nan() || value <= 0.0 {
        return 0;
    }
    let max = cast::<u32, f64>(u32::MAX).unwrap_or(f64::MAX);
    cast::<f64, u32>(value.min(max).round()).unwrap_or(0)
}

/// Floor a non-negative f64 into a u32, returning 0 for negative or NaN values.
#[must_use]
pub fn floor_f64_to_u32(value: f64) -> u32 {
    if value.is_nan() || value <= 0.0 {
        return 0;
    }
    let max = cast::<u32, f64>(u32::MAX).unwrap_or(f64::MAX);
    cast::<f64, u32>(value.min(max).floor()).unwrap_or(0)
}

/// Convert a count into f64 while allowing precision loss in a single location.
#[must_use]
pub fn usize_to_f64(value: usize) -> f64 {
    cast::<usize, f64>(value).unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bac_rounding_keeps_four_places() {
        assert!((round_bac(0.019_158) - 0.0192).abs() < f64::EPSILON);
        assert!((round_bac(0.123_44) - 0.1234).abs() < f64::EPSILON);
        assert!(round_bac(f64::NAN).abs() < f64::EPSILON);
    }

    #[test]
    fn rounders_cover_ranges() {
        assert_eq!(round_f64_to_i32(1.6), 2);
        assert_eq!(round_f64_to_i32(f64::NAN), 0);
        assert_eq!(round_f64_to_i32(f64::from(i32::MAX) * 2.0), i32::MAX);
        assert_eq!(round_f64_to_u32(-3.0), 0);
        assert_eq!(round_f64_to_u32(59.5), 60);
    }

    #[test]
    fn floor_truncates_towards_zero() {
        assert_eq!(floor_f64_to_u32(2.99), 2);
        assert_eq!(floor_f64_to_u32(-0.5), 0);
        assert_eq!(floor_f64_to_u32(f64::INFINITY), u32::MAX);
    }
}
