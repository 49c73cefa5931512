//! Shared helpers for the integration tests.

use cca_core::{generate_schedule, Schedule, ScheduleParams, ScheduleRequest};

/// Generate a schedule with the default parameters.
///
/// Panics on failure; only for requests the caller knows are valid.
pub fn schedule_for(auction_blocks: u64, prebid_blocks: u64) -> Schedule {
    let request = ScheduleRequest::new(auction_blocks, prebid_blocks);
    generate_schedule(&request, &ScheduleParams::default())
        .unwrap_or_else(|e| panic!("schedule({auction_blocks}, {prebid_blocks}) failed: {e}"))
}

/// Check the invariants every generated schedule must hold.
///
/// Conservation, block coverage, prebid shape, a single-block remainder and
/// non-decreasing segment durations.
pub fn assert_schedule_invariants(schedule: &Schedule, request: &ScheduleRequest, params: &ScheduleParams) {
    let phases = schedule.phases();

    assert_eq!(
        schedule.total_emission(),
        params.total_target,
        "emission mismatch for {request:?}"
    );
    assert_eq!(
        schedule.total_blocks(),
        request.auction_blocks,
        "block coverage mismatch for {request:?}"
    );

    let prebid_phases = usize::from(request.prebid_blocks > 0);
    assert_eq!(
        phases.len(),
        prebid_phases + params.num_segments + 1,
        "phase count for {request:?}"
    );
    if request.prebid_blocks > 0 {
        assert_eq!(phases[0].mps, 0);
        assert_eq!(phases[0].block_delta, request.prebid_blocks);
    } else {
        assert!(phases[0].mps > 0, "unexpected zero-rate prefix for {request:?}");
    }

    let last = schedule.final_phase().expect("schedule has a final phase");
    assert_eq!(last.block_delta, 1);

    let segments = schedule.segment_phases();
    assert_eq!(segments.len(), params.num_segments);
    for w in segments.windows(2) {
        assert!(
            w[1].block_delta >= w[0].block_delta,
            "segment durations shrink for {request:?}: {} then {}",
            w[0].block_delta,
            w[1].block_delta
        );
    }
    for seg in segments {
        assert!(seg.block_delta >= 1);
        assert!(seg.mps >= 1, "segment with zero rate for {request:?}");
    }
}

/// The `blockDelta` of every growing segment.
pub fn segment_durations(schedule: &Schedule) -> Vec<u64> {
    schedule.segment_phases().iter().map(|p| p.block_delta).collect()
}
