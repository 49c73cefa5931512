//! Emission rate sampling along the cumulative allocation curve.
//!
//! With `T` the total segment blocks, the supply released by block `t` is
//! `(t/T)^g * front_share * total_target`. A segment's allocation is the
//! difference of that curve between its boundaries, and its rate is the
//! allocation divided by its duration, rounded half-to-even. Rates of
//! segments with a positive allocation are floored at 1 so rounding never
//! silently drops a segment.
//!
//! The rounded rates leave the schedule off target. A single-block remainder
//! phase takes the exact residual, which with the production constants is
//! roughly `1 - front_share` of the target.

use crate::constants::FINAL_PHASE_BLOCKS;
use crate::error::{AllocationError, ScheduleError};
use crate::params::ScheduleParams;
use crate::residual::distribute_residual;
use crate::types::Phase;

/// Derive segment phases for `durations` and append the remainder phase.
///
/// The returned phases emit exactly `params.total_target`.
pub fn sample_curve(durations: &[u64], params: &ScheduleParams) -> Result<Vec<Phase>, ScheduleError> {
    params.validate()?;

    if durations.is_empty() {
        return Err(AllocationError::EmptySequence {
            target: params.total_target,
        }
        .into());
    }
    if let Some(index) = durations.iter().position(|&d| d == 0) {
        return Err(AllocationError::ZeroDuration { index }.into());
    }

    let total_blocks = durations
        .iter()
        .try_fold(0u64, |acc, &d| acc.checked_add(d))
        .ok_or(AllocationError::ArithmeticOverflow)?;

    let mut phases = Vec::with_capacity(durations.len() + 1);
    // Per-phase emissions, with a trailing slot for the remainder.
    let mut emissions = Vec::with_capacity(durations.len() + 1);
    let mut cursor = 0u64;
    let mut allocated = 0u64;

    for (i, &delta) in durations.iter().enumerate() {
        let start = cursor;
        let end = cursor + delta;

        let segment_tokens = curve_tokens(end, total_blocks, params) - curve_tokens(start, total_blocks, params);
        let mut mps = (segment_tokens / delta as f64).round_ties_even() as u64;
        if segment_tokens > 0.0 {
            mps = mps.max(1);
        }

        let emission = mps.checked_mul(delta).ok_or(AllocationError::ArithmeticOverflow)?;
        allocated = allocated
            .checked_add(emission)
            .ok_or(AllocationError::ArithmeticOverflow)?;

        tracing::trace!(segment = i, start, end, segment_tokens, mps, "sampled segment");

        phases.push(Phase::new(mps, delta));
        emissions.push(emission);
        cursor = end;
    }

    // The 1-mps floor can push very long auctions past the target.
    if allocated > params.total_target {
        return Err(AllocationError::Overallocated {
            allocated,
            target: params.total_target,
        }
        .into());
    }

    emissions.push(0);
    distribute_residual(&mut emissions, params.total_target, 0)?;
    let remainder = emissions.last().copied().unwrap_or_default();

    // One block, so the rate is the residual itself.
    phases.push(Phase::new(remainder, FINAL_PHASE_BLOCKS));
    Ok(phases)
}

/// Cumulative front-share supply released by `position` out of `total_blocks`.
fn curve_tokens(position: u64, total_blocks: u64, params: &ScheduleParams) -> f64 {
    let pct = (position as f64 / total_blocks as f64).powf(params.growth_exponent);
    pct * params.front_share * params.total_target as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner::plan_segment_durations;
    use proptest::prelude::*;

    fn params() -> ScheduleParams {
        ScheduleParams::default()
    }

    fn total(phases: &[Phase]) -> u64 {
        phases.iter().map(Phase::emission).sum()
    }

    #[test]
    fn two_day_base_rates() {
        let durations = [3328, 3994, 4793, 5751, 6902, 8282, 9938, 11926, 14311, 17174];
        let phases = sample_curve(&durations, &params()).unwrap();
        let rates: Vec<u64> = phases.iter().map(|p| p.mps).collect();
        assert_eq!(
            rates,
            vec![42, 55, 63, 68, 73, 78, 82, 87, 91, 95, 3_011_376]
        );
        assert_eq!(total(&phases), 10_000_000);
    }

    #[test]
    fn remainder_is_single_block() {
        let phases = sample_curve(&[5, 6, 7], &params()).unwrap();
        assert_eq!(phases.len(), 4);
        assert_eq!(phases[3].block_delta, 1);
    }

    #[test]
    fn durations_are_preserved() {
        let durations = [2, 3, 5, 8];
        let phases = sample_curve(&durations, &params()).unwrap();
        let got: Vec<u64> = phases[..4].iter().map(|p| p.block_delta).collect();
        assert_eq!(got, durations);
    }

    #[test]
    fn rates_rise_along_the_curve() {
        let durations = plan_segment_durations(604_799, &params()).unwrap();
        let phases = sample_curve(&durations, &params()).unwrap();
        let segments = &phases[..phases.len() - 1];
        assert!(segments.windows(2).all(|w| w[0].mps <= w[1].mps));
    }

    #[test]
    fn remainder_near_complementary_share() {
        let durations = plan_segment_durations(86_399, &params()).unwrap();
        let phases = sample_curve(&durations, &params()).unwrap();
        let remainder = phases.last().unwrap().mps as f64 / 10_000_000.0;
        assert!((remainder - 0.3).abs() < 0.01, "remainder share {remainder}");
    }

    #[test]
    fn tiny_allocations_floor_at_one() {
        let p = ScheduleParams {
            total_target: 20,
            ..params()
        };
        let phases = sample_curve(&[1, 1, 1, 1, 1], &p).unwrap();
        assert!(phases[..5].iter().all(|ph| ph.mps >= 1));
        assert_eq!(total(&phases), 20);
    }

    #[test]
    fn overallocation_rejected() {
        // Every block gets at least 1 mps, so 20M blocks exceed a 10M target.
        let durations = plan_segment_durations(20_000_000, &params()).unwrap();
        let err = sample_curve(&durations, &params()).unwrap_err();
        assert!(matches!(
            err,
            ScheduleError::Allocation(AllocationError::Overallocated { target: 10_000_000, .. })
        ));
    }

    #[test]
    fn empty_durations_rejected() {
        assert_eq!(
            sample_curve(&[], &params()),
            Err(ScheduleError::Allocation(AllocationError::EmptySequence {
                target: 10_000_000
            }))
        );
    }

    #[test]
    fn zero_duration_rejected() {
        assert_eq!(
            sample_curve(&[3, 0, 4], &params()),
            Err(ScheduleError::Allocation(AllocationError::ZeroDuration { index: 1 }))
        );
    }

    #[test]
    fn degenerate_params_rejected() {
        let p = ScheduleParams {
            front_share: 1.0,
            ..params()
        };
        assert!(matches!(sample_curve(&[1, 2], &p), Err(ScheduleError::Params(_))));
    }

    // --- proptest ---

    proptest! {
        #[test]
        fn conserves_target(durations in prop::collection::vec(1u64..50_000, 1..15)) {
            let phases = sample_curve(&durations, &params()).unwrap();
            prop_assert_eq!(total(&phases), 10_000_000);
            prop_assert_eq!(phases.len(), durations.len() + 1);
        }

        #[test]
        fn alternate_targets_conserved(
            durations in prop::collection::vec(1u64..100, 1..12),
            target in 10_000u64..1_000_000_000,
        ) {
            let p = ScheduleParams { total_target: target, ..params() };
            let phases = sample_curve(&durations, &p).unwrap();
            prop_assert_eq!(total(&phases), target);
        }
    }
}
