//! Segment duration planning.
//!
//! Segment `i` lasts `d0 * g^i` blocks, where `d0 = total / S` and
//! `S = (g^n - 1) / (g - 1)` is the geometric series sum. Each term is
//! rounded half-to-even and floored at [`MIN_SEGMENT_BLOCKS`]; the rounding
//! drift is then folded back through [`distribute_residual`] so the
//! durations sum to exactly `total_blocks`. Drift lands on the final segment,
//! the longest one, where it distorts the growth ratio the least.

use crate::constants::MIN_SEGMENT_BLOCKS;
use crate::error::{RequestError, ScheduleError};
use crate::params::ScheduleParams;
use crate::residual::distribute_residual;

/// Split `total_blocks` into `params.num_segments` growing durations.
///
/// Returns durations in segment order. Each is at least one block and
/// consecutive durations never shrink.
///
/// # Examples
///
/// ```
/// use cca_core::ScheduleParams;
/// use cca_core::planner::plan_segment_durations;
///
/// let durations = plan_segment_durations(86_399, &ScheduleParams::default()).unwrap();
/// assert_eq!(durations.len(), 10);
/// assert_eq!(durations.iter().sum::<u64>(), 86_399);
/// ```
pub fn plan_segment_durations(
    total_blocks: u64,
    params: &ScheduleParams,
) -> Result<Vec<u64>, ScheduleError> {
    params.validate()?;

    let required = (params.num_segments as u64).saturating_mul(MIN_SEGMENT_BLOCKS);
    if total_blocks < required {
        return Err(RequestError::TooFewBlocks {
            available: total_blocks,
            required,
        }
        .into());
    }

    let g = params.growth_exponent;
    let d0 = total_blocks as f64 / params.geometric_sum();

    let mut durations: Vec<u64> = (0..params.num_segments)
        .map(|i| {
            let ideal = d0 * g.powf(i as f64);
            (ideal.round_ties_even() as u64).max(MIN_SEGMENT_BLOCKS)
        })
        .collect();

    distribute_residual(&mut durations, total_blocks, MIN_SEGMENT_BLOCKS)?;

    tracing::debug!(total_blocks, d0, ?durations, "planned segment durations");
    Ok(durations)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ParamsError;
    use proptest::prelude::*;

    fn params() -> ScheduleParams {
        ScheduleParams::default()
    }

    #[test]
    fn two_day_base_auction() {
        let d = plan_segment_durations(86_399, &params()).unwrap();
        assert_eq!(
            d,
            vec![3328, 3994, 4793, 5751, 6902, 8282, 9938, 11926, 14311, 17174]
        );
    }

    #[test]
    fn one_day_mainnet_auction() {
        let d = plan_segment_durations(14_399, &params()).unwrap();
        assert_eq!(d, vec![555, 666, 799, 959, 1150, 1380, 1656, 1988, 2385, 2861]);
    }

    #[test]
    fn minimal_budget_is_all_ones() {
        let d = plan_segment_durations(10, &params()).unwrap();
        assert_eq!(d, vec![1; 10]);
    }

    #[test]
    fn tiny_budgets_stay_non_decreasing() {
        for total in 10..=60u64 {
            let d = plan_segment_durations(total, &params()).unwrap();
            assert_eq!(d.iter().sum::<u64>(), total, "sum at {total}");
            assert!(
                d.windows(2).all(|w| w[0] <= w[1]),
                "not monotonic at {total}: {d:?}"
            );
        }
    }

    #[test]
    fn budget_below_segment_count_rejected() {
        let err = plan_segment_durations(9, &params()).unwrap_err();
        assert_eq!(
            err,
            ScheduleError::Request(RequestError::TooFewBlocks {
                available: 9,
                required: 10
            })
        );
    }

    #[test]
    fn degenerate_growth_rejected() {
        let p = ScheduleParams {
            growth_exponent: 1.0,
            ..params()
        };
        let err = plan_segment_durations(1_000, &p).unwrap_err();
        assert_eq!(
            err,
            ScheduleError::Params(ParamsError::DegenerateGrowth { factor: 1.0 })
        );
    }

    #[test]
    fn single_segment_takes_everything() {
        let p = ScheduleParams {
            num_segments: 1,
            ..params()
        };
        assert_eq!(plan_segment_durations(777, &p).unwrap(), vec![777]);
    }

    #[test]
    fn ratio_close_to_growth_factor() {
        let d = plan_segment_durations(604_799, &params()).unwrap();
        for w in d.windows(2) {
            let ratio = w[1] as f64 / w[0] as f64;
            assert!((ratio - 1.2).abs() < 0.01, "ratio {ratio} in {d:?}");
        }
    }

    #[test]
    fn deterministic() {
        assert_eq!(
            plan_segment_durations(123_457, &params()).unwrap(),
            plan_segment_durations(123_457, &params()).unwrap()
        );
    }

    // --- proptest ---

    proptest! {
        #[test]
        fn sums_exactly(total in 10u64..5_000_000) {
            let d = plan_segment_durations(total, &params()).unwrap();
            prop_assert_eq!(d.len(), 10);
            prop_assert_eq!(d.iter().sum::<u64>(), total);
            prop_assert!(d.iter().all(|&x| x >= 1));
        }

        #[test]
        fn never_shrinks(total in 10u64..5_000_000) {
            let d = plan_segment_durations(total, &params()).unwrap();
            prop_assert!(d.windows(2).all(|w| w[0] <= w[1]), "{:?}", d);
        }

        #[test]
        fn alternate_segment_counts(total in 100u64..100_000, n in 1usize..30) {
            let p = ScheduleParams { num_segments: n, ..params() };
            let d = plan_segment_durations(total, &p).unwrap();
            prop_assert_eq!(d.len(), n);
            prop_assert_eq!(d.iter().sum::<u64>(), total);
        }
    }
}
