//! Fixed schedule parameters passed explicitly through the pipeline.

use serde::{Deserialize, Serialize};

use crate::constants::{FRONT_SHARE, GROWTH_EXPONENT, NUM_SEGMENTS, TOTAL_TARGET};
use crate::error::ParamsError;

/// Curve and supply parameters shared by the planner and the sampler.
///
/// [`ScheduleParams::default`] is the production configuration. Alternate
/// values exist for tests; nothing exposes them as a runtime setting.
///
/// # Examples
///
/// ```
/// use cca_core::ScheduleParams;
/// let params = ScheduleParams::default();
/// assert_eq!(params.num_segments, 10);
/// assert_eq!(params.total_target, 10_000_000);
/// assert!(params.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScheduleParams {
    /// Number of growing front segments.
    pub num_segments: usize,
    /// Duration growth ratio and curve exponent.
    pub growth_exponent: f64,
    /// Exact supply the schedule must emit.
    pub total_target: u64,
    /// Fraction of the target spread across the segments.
    pub front_share: f64,
}

impl Default for ScheduleParams {
    fn default() -> Self {
        Self {
            num_segments: NUM_SEGMENTS,
            growth_exponent: GROWTH_EXPONENT,
            total_target: TOTAL_TARGET,
            front_share: FRONT_SHARE,
        }
    }
}

impl ScheduleParams {
    /// Reject parameter sets the pipeline cannot evaluate.
    ///
    /// A growth factor of exactly 1 zeroes the geometric-series denominator
    /// used by the planner, so it is refused along with anything below it.
    pub fn validate(&self) -> Result<(), ParamsError> {
        if self.num_segments == 0 {
            return Err(ParamsError::NoSegments);
        }
        if !self.growth_exponent.is_finite() || self.growth_exponent <= 1.0 {
            return Err(ParamsError::DegenerateGrowth {
                factor: self.growth_exponent,
            });
        }
        if !(self.front_share > 0.0 && self.front_share < 1.0) {
            return Err(ParamsError::FrontShareOutOfRange {
                share: self.front_share,
            });
        }
        if self.total_target == 0 {
            return Err(ParamsError::ZeroTarget);
        }
        Ok(())
    }

    /// `sum(g^i for i in 0..n) = (g^n - 1) / (g - 1)`.
    ///
    /// Only meaningful for validated parameters.
    pub fn geometric_sum(&self) -> f64 {
        let g = self.growth_exponent;
        (g.powf(self.num_segments as f64) - 1.0) / (g - 1.0)
    }
}
