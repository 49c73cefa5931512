//! Value types for schedule requests and generated schedules.

use serde::{Deserialize, Serialize};

use crate::constants::{FINAL_PHASE_BLOCKS, MIN_SEGMENT_BLOCKS};
use crate::error::RequestError;
use crate::params::ScheduleParams;

/// A request for one auction schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScheduleRequest {
    /// Total auction length in blocks, prebid period included.
    pub auction_blocks: u64,
    /// Leading blocks that emit nothing.
    #[serde(default)]
    pub prebid_blocks: u64,
}

impl ScheduleRequest {
    pub fn new(auction_blocks: u64, prebid_blocks: u64) -> Self {
        Self {
            auction_blocks,
            prebid_blocks,
        }
    }

    /// Smallest auction that fits `num_segments` one-block segments, the
    /// remainder phase and the given prebid period.
    pub fn min_auction_blocks(params: &ScheduleParams, prebid_blocks: u64) -> u64 {
        (params.num_segments as u64)
            .saturating_mul(MIN_SEGMENT_BLOCKS)
            .saturating_add(FINAL_PHASE_BLOCKS)
            .saturating_add(prebid_blocks)
    }

    /// Blocks left for the growing segments once the prebid period and the
    /// remainder phase are carved out. Zero when nothing is left.
    pub fn segment_blocks(&self) -> u64 {
        self.auction_blocks
            .saturating_sub(self.prebid_blocks)
            .saturating_sub(FINAL_PHASE_BLOCKS)
    }

    /// Check that the request leaves room for every segment.
    pub fn validate(&self, params: &ScheduleParams) -> Result<(), RequestError> {
        if self.auction_blocks == 0 {
            return Err(RequestError::EmptyAuction);
        }
        if self.prebid_blocks >= self.auction_blocks {
            return Err(RequestError::PrebidTooLong {
                prebid: self.prebid_blocks,
                auction: self.auction_blocks,
            });
        }
        let required = (params.num_segments as u64).saturating_mul(MIN_SEGMENT_BLOCKS);
        let available = self.segment_blocks();
        if available < required {
            return Err(RequestError::TooFewBlocks {
                available,
                required,
            });
        }
        Ok(())
    }
}

/// One `(rate, duration)` step of a schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Phase {
    /// Emission per block.
    pub mps: u64,
    /// Number of consecutive blocks the rate holds for.
    #[serde(rename = "blockDelta")]
    pub block_delta: u64,
}

impl Phase {
    pub fn new(mps: u64, block_delta: u64) -> Self {
        Self { mps, block_delta }
    }

    /// Supply emitted over the whole phase.
    pub fn emission(&self) -> u64 {
        self.mps.saturating_mul(self.block_delta)
    }
}

/// An ordered list of phases: optional prebid, segments, remainder.
///
/// Schedules built by [`generate_schedule`](crate::generate_schedule) emit
/// exactly the target supply and cover exactly the requested blocks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Schedule {
    phases: Vec<Phase>,
}

impl Schedule {
    pub(crate) fn from_phases(phases: Vec<Phase>) -> Self {
        Self { phases }
    }

    pub fn phases(&self) -> &[Phase] {
        &self.phases
    }

    pub fn len(&self) -> usize {
        self.phases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.phases.is_empty()
    }

    /// Sum of `mps * blockDelta` over all phases.
    pub fn total_emission(&self) -> u64 {
        self.phases
            .iter()
            .fold(0u64, |acc, p| acc.saturating_add(p.emission()))
    }

    /// Sum of `blockDelta` over all phases.
    pub fn total_blocks(&self) -> u64 {
        self.phases
            .iter()
            .fold(0u64, |acc, p| acc.saturating_add(p.block_delta))
    }

    /// The single-block remainder phase.
    pub fn final_phase(&self) -> Option<&Phase> {
        self.phases.last()
    }

    /// The growing segments, without prebid or remainder phases.
    ///
    /// Prebid phases are recognised by their zero rate.
    pub fn segment_phases(&self) -> &[Phase] {
        let Some((_, body)) = self.phases.split_last() else {
            return &[];
        };
        match body.first() {
            Some(first) if first.mps == 0 => &body[1..],
            _ => body,
        }
    }

    /// Remainder rate as a percentage of `target`, rounded to two decimals.
    ///
    /// Display only; nothing feeds this back into a schedule.
    pub fn final_share_percent(&self, target: u64) -> f64 {
        let Some(last) = self.final_phase() else {
            return 0.0;
        };
        if target == 0 {
            return 0.0;
        }
        let pct = last.mps as f64 / target as f64 * 100.0;
        (pct * 100.0).round() / 100.0
    }

    /// Caller-facing totals for a schedule generated with `params`.
    pub fn summary(&self, params: &ScheduleParams) -> ScheduleSummary {
        ScheduleSummary {
            total_mps: self.total_emission(),
            target_mps: params.total_target,
            final_block_mps: self.final_phase().map_or(0, |p| p.mps),
            final_block_percentage: self.final_share_percent(params.total_target),
            num_segments: params.num_segments,
            growth_exponent: params.growth_exponent,
        }
    }
}

/// Totals reported alongside a schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleSummary {
    /// Sum of `mps * blockDelta`; always equals `target_mps`.
    pub total_mps: u64,
    pub target_mps: u64,
    pub final_block_mps: u64,
    /// Remainder rate as a percentage of the target, two decimals.
    pub final_block_percentage: f64,
    pub num_segments: usize,
    pub growth_exponent: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::NUM_SEGMENTS;

    fn params() -> ScheduleParams {
        ScheduleParams::default()
    }

    // ------------------------------------------------------------------
    // ScheduleRequest
    // ------------------------------------------------------------------

    #[test]
    fn segment_blocks_reserves_final_block() {
        assert_eq!(ScheduleRequest::new(86_400, 0).segment_blocks(), 86_399);
    }

    #[test]
    fn segment_blocks_excludes_prebid() {
        assert_eq!(ScheduleRequest::new(86_400, 43_200).segment_blocks(), 43_199);
    }

    #[test]
    fn segment_blocks_saturates() {
        assert_eq!(ScheduleRequest::new(1, 0).segment_blocks(), 0);
        assert_eq!(ScheduleRequest::new(5, 10).segment_blocks(), 0);
    }

    #[test]
    fn zero_auction_rejected() {
        assert_eq!(
            ScheduleRequest::new(0, 0).validate(&params()),
            Err(RequestError::EmptyAuction)
        );
    }

    #[test]
    fn single_block_auction_rejected() {
        assert_eq!(
            ScheduleRequest::new(1, 0).validate(&params()),
            Err(RequestError::TooFewBlocks {
                available: 0,
                required: NUM_SEGMENTS as u64
            })
        );
    }

    #[test]
    fn prebid_covering_auction_rejected() {
        assert_eq!(
            ScheduleRequest::new(100, 100).validate(&params()),
            Err(RequestError::PrebidTooLong {
                prebid: 100,
                auction: 100
            })
        );
    }

    #[test]
    fn minimal_auction_accepted() {
        let min = ScheduleRequest::min_auction_blocks(&params(), 0);
        assert_eq!(min, 11);
        assert!(ScheduleRequest::new(min, 0).validate(&params()).is_ok());
        assert!(ScheduleRequest::new(min - 1, 0).validate(&params()).is_err());
    }

    #[test]
    fn minimal_auction_with_prebid() {
        let min = ScheduleRequest::min_auction_blocks(&params(), 50);
        assert_eq!(min, 61);
        assert!(ScheduleRequest::new(min, 50).validate(&params()).is_ok());
        assert!(ScheduleRequest::new(min - 1, 50).validate(&params()).is_err());
    }

    #[test]
    fn request_prebid_defaults_to_zero() {
        let req: ScheduleRequest = serde_json::from_str(r#"{"auction_blocks": 42}"#).unwrap();
        assert_eq!(req, ScheduleRequest::new(42, 0));
    }

    // ------------------------------------------------------------------
    // Phase / Schedule
    // ------------------------------------------------------------------

    #[test]
    fn phase_serializes_with_block_delta_key() {
        let json = serde_json::to_string(&Phase::new(42, 3328)).unwrap();
        assert_eq!(json, r#"{"mps":42,"blockDelta":3328}"#);
    }

    #[test]
    fn schedule_serializes_as_array() {
        let s = Schedule::from_phases(vec![Phase::new(0, 5), Phase::new(7, 1)]);
        let json = serde_json::to_string(&s).unwrap();
        assert_eq!(json, r#"[{"mps":0,"blockDelta":5},{"mps":7,"blockDelta":1}]"#);
    }

    #[test]
    fn totals() {
        let s = Schedule::from_phases(vec![
            Phase::new(0, 10),
            Phase::new(3, 4),
            Phase::new(5, 2),
            Phase::new(100, 1),
        ]);
        assert_eq!(s.total_emission(), 122);
        assert_eq!(s.total_blocks(), 17);
        assert_eq!(s.len(), 4);
    }

    #[test]
    fn segment_phases_skip_prebid_and_remainder() {
        let s = Schedule::from_phases(vec![
            Phase::new(0, 10),
            Phase::new(3, 4),
            Phase::new(5, 2),
            Phase::new(100, 1),
        ]);
        assert_eq!(s.segment_phases(), &[Phase::new(3, 4), Phase::new(5, 2)]);
    }

    #[test]
    fn segment_phases_without_prebid() {
        let s = Schedule::from_phases(vec![Phase::new(3, 4), Phase::new(100, 1)]);
        assert_eq!(s.segment_phases(), &[Phase::new(3, 4)]);
    }

    #[test]
    fn empty_schedule_accessors() {
        let s = Schedule::from_phases(Vec::new());
        assert!(s.is_empty());
        assert!(s.final_phase().is_none());
        assert!(s.segment_phases().is_empty());
        assert_eq!(s.final_share_percent(10), 0.0);
    }

    #[test]
    fn final_share_rounds_to_two_decimals() {
        let s = Schedule::from_phases(vec![Phase::new(3_011_376, 1)]);
        assert_eq!(s.final_share_percent(10_000_000), 30.11);
    }

    #[test]
    fn summary_reports_params() {
        let s = Schedule::from_phases(vec![Phase::new(700, 10), Phase::new(3_000, 1)]);
        let p = ScheduleParams {
            total_target: 10_000,
            ..params()
        };
        let summary = s.summary(&p);
        assert_eq!(summary.total_mps, 10_000);
        assert_eq!(summary.target_mps, 10_000);
        assert_eq!(summary.final_block_mps, 3_000);
        assert_eq!(summary.final_block_percentage, 30.0);
        assert_eq!(summary.num_segments, NUM_SEGMENTS);
        assert_eq!(summary.growth_exponent, 1.2);
    }
}
