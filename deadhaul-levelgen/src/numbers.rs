//! Numeric conversion helpers centralizing lossy casts and tier lookups.

use num_traits::cast::cast;

/// Convert a counter to f32, saturating at the f32 maximum.
#[must_use]
pub fn u32_to_f32(value: u32) -> f32 {
    cast::<u32, f32>(value).unwrap_or(f32::MAX)
}

/// Convert an i64 currency amount to f64 for scaling math.
#[must_use]
pub fn i64_to_f64(value: i64) -> f64 {
    cast::<i64, f64>(value).unwrap_or(0.0)
}

/// Floor a f64 and clamp it to the i64 range, returning 0 for non-finite values.
#[must_use]
pub fn floor_f64_to_i64(value: f64) -> i64 {
    if !value.is_finite() {
        return 0;
    }
    let min = cast::<i64, f64>(i64::MIN).unwrap_or(f64::MIN);
    let max = cast::<i64, f64>(i64::MAX).unwrap_or(f64::MAX);
    let clamped = value.clamp(min, max).floor();
    cast::<f64, i64>(clamped).unwrap_or(0)
}

/// Round a f32 and clamp it to the u32 range, returning 0 for NaN or negatives.
#[must_use]
pub fn round_f32_to_u32(value: f32) -> u32 {
    if value.is_nan() || value <= 0.0 {
        return 0;
    }
    let max = cast::<u32, f32>(u32::MAX).unwrap_or(f32::MAX);
    let clamped = value.clamp(0.0, max).round();
    cast::<f32, u32>(clamped).unwrap_or(0)
}

/// Index into an ordered tier list: `floor(difficulty * len)` clamped to the
/// last entry. Negative or non-finite difficulty selects the first tier.
#[must_use]
pub fn tier_index(difficulty: f32, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    let len_f = cast::<usize, f32>(len).unwrap_or(f32::MAX);
    let raw = (difficulty.max(0.0) * len_f).floor();
    if !raw.is_finite() || raw <= 0.0 {
        return 0;
    }
    let idx = cast::<f32, usize>(raw).unwrap_or(len - 1);
    idx.min(len - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_index_clamps_to_last_entry() {
        assert_eq!(tier_index(0.0, 4), 0);
        assert_eq!(tier_index(0.24, 4), 0);
        assert_eq!(tier_index(0.5, 4), 2);
        assert_eq!(tier_index(1.0, 4), 3);
        assert_eq!(tier_index(3.0, 4), 3);
    }

    #[test]
    fn tier_index_tolerates_bad_inputs() {
        assert_eq!(tier_index(f32::NAN, 4), 0);
        assert_eq!(tier_index(-2.0, 4), 0);
        assert_eq!(tier_index(1.0, 0), 0);
    }

    #[test]
    fn floor_handles_non_finite() {
        assert_eq!(floor_f64_to_i64(f64::NAN), 0);
        assert_eq!(floor_f64_to_i64(f64::INFINITY), 0);
        assert_eq!(floor_f64_to_i64(123.9), 123);
    }

    #[test]
    fn round_rejects_negatives() {
        assert_eq!(round_f32_to_u32(-4.0), 0);
        assert_eq!(round_f32_to_u32(4.6), 5);
    }
}
