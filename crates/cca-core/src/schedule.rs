//! End-to-end schedule generation.
//!
//! Layout of a generated schedule:
//!
//! | Phase | Rate | Blocks |
//! |---|---|---|
//! | prebid (only if requested) | 0 | `prebid_blocks` |
//! | segment 0 ..= n-1 | sampled from the curve | planned, growing |
//! | remainder | exact residual | 1 |
//!
//! Blocks covered always add up to `auction_blocks`; emission always adds up
//! to the target supply.

use crate::error::ScheduleError;
use crate::params::ScheduleParams;
use crate::planner::plan_segment_durations;
use crate::sampler::sample_curve;
use crate::types::{Phase, Schedule, ScheduleRequest};

/// Build the supply schedule for `request`.
///
/// Parameters are checked before the request, so a degenerate configuration
/// is reported as such regardless of the input. Nothing partial is returned
/// on failure.
///
/// # Examples
///
/// ```
/// use cca_core::{generate_schedule, ScheduleParams, ScheduleRequest};
///
/// let params = ScheduleParams::default();
/// let schedule = generate_schedule(&ScheduleRequest::new(86_400, 0), &params).unwrap();
/// assert_eq!(schedule.len(), 11);
/// assert_eq!(schedule.total_emission(), params.total_target);
/// assert_eq!(schedule.total_blocks(), 86_400);
/// ```
pub fn generate_schedule(
    request: &ScheduleRequest,
    params: &ScheduleParams,
) -> Result<Schedule, ScheduleError> {
    params.validate()?;
    request.validate(params)?;

    let segment_blocks = request.segment_blocks();
    let durations = plan_segment_durations(segment_blocks, params)?;
    let sampled = sample_curve(&durations, params)?;

    let mut phases = Vec::with_capacity(sampled.len() + 1);
    if request.prebid_blocks > 0 {
        phases.push(Phase::new(0, request.prebid_blocks));
    }
    phases.extend(sampled);

    let schedule = Schedule::from_phases(phases);
    tracing::debug!(
        auction_blocks = request.auction_blocks,
        prebid_blocks = request.prebid_blocks,
        segment_blocks,
        phases = schedule.len(),
        final_mps = schedule.final_phase().map_or(0, |p| p.mps),
        "generated supply schedule"
    );
    Ok(schedule)
}
