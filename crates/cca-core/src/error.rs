//! Error types for schedule generation.
use thiserror::Error;

/// The request cannot be turned into a schedule.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RequestError {
    #[error("auction must span at least one block")] EmptyAuction,
    #[error("prebid period of {prebid} blocks does not fit in an auction of {auction} blocks")] PrebidTooLong { prebid: u64, auction: u64 },
    #[error("too few blocks: {available} available after prebid, need at least {required}")] TooFewBlocks { available: u64, required: u64 },
}

/// The fixed schedule parameters are unusable.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParamsError {
    #[error("segment count must be positive")] NoSegments,
    #[error("growth factor must be finite and greater than 1, got {factor}")] DegenerateGrowth { factor: f64 },
    #[error("front share must lie strictly between 0 and 1, got {share}")] FrontShareOutOfRange { share: f64 },
    #[error("target supply must be positive")] ZeroTarget,
}

/// Integer reconciliation failed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AllocationError {
    #[error("segments allocate {allocated}, exceeding target {target}")] Overallocated { allocated: u64, target: u64 },
    #[error("target {target} is below the floor total {floor_total}")] UnreachableTarget { target: u64, floor_total: u64 },
    #[error("cannot reach target {target} with an empty sequence")] EmptySequence { target: u64 },
    #[error("segment {index} has zero duration")] ZeroDuration { index: usize },
    #[error("arithmetic overflow")] ArithmeticOverflow,
}

/// Any failure of [`generate_schedule`](crate::generate_schedule).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScheduleError {
    #[error(transparent)] Request(#[from] RequestError),
    #[error(transparent)] Params(#[from] ParamsError),
    #[error(transparent)] Allocation(#[from] AllocationError),
}

impl ScheduleError {
    /// Whether the caller can fix this by changing the request.
    ///
    /// Overflow only arises from block counts near `u64::MAX`, so it counts
    /// as a request problem along with over-allocation.
    pub fn is_invalid_request(&self) -> bool {
        matches!(
            self,
            Self::Request(_)
                | Self::Allocation(AllocationError::Overallocated { .. } | AllocationError::ArithmeticOverflow)
        )
    }
}
