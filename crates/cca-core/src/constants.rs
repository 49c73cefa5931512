//! Schedule constants. Emission is measured in mps (supply units per block).

/// Total supply every schedule must emit, in mps units (1e7).
pub const TOTAL_TARGET: u64 = 10_000_000;

/// Number of growing segments sharing the front part of the supply.
pub const NUM_SEGMENTS: usize = 10;

/// Growth ratio between consecutive segment durations.
///
/// Also the exponent of the cumulative allocation curve `(t/T)^g`, so longer
/// late segments coincide with the steeper end of the curve.
pub const GROWTH_EXPONENT: f64 = 1.2;

/// Fraction of [`TOTAL_TARGET`] spread across the segments.
///
/// The remainder phase receives whatever is left, roughly `1 - FRONT_SHARE`.
pub const FRONT_SHARE: f64 = 0.7;

/// Blocks reserved at the end of the auction for the remainder phase.
pub const FINAL_PHASE_BLOCKS: u64 = 1;

/// Minimum duration of a segment.
pub const MIN_SEGMENT_BLOCKS: u64 = 1;

/// Expected range of the remainder phase, as a percentage of the target.
///
/// Informational only: schedules outside the band are still valid.
pub const FINAL_SHARE_BAND_PCT: (f64, f64) = (25.0, 35.0);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn growth_exponent_above_one() {
        assert!(GROWTH_EXPONENT > 1.0);
    }

    #[test]
    fn front_share_is_a_fraction() {
        assert!(FRONT_SHARE > 0.0 && FRONT_SHARE < 1.0);
    }

    #[test]
    fn band_brackets_complementary_share() {
        let complement = (1.0 - FRONT_SHARE) * 100.0;
        assert!(FINAL_SHARE_BAND_PCT.0 <= complement);
        assert!(complement <= FINAL_SHARE_BAND_PCT.1);
    }

    #[test]
    fn target_is_ten_million() {
        assert_eq!(TOTAL_TARGET, 10_000_000);
    }
}
