//! # cca-core — Supply schedule generation for continuous clearing auctions.
//!
//! Produces the ordered `{mps, blockDelta}` emission phases an auction
//! contract consumes. The pipeline is two pure stages:
//! - [`planner`]: splits the segment block budget into durations that grow
//!   geometrically and sum exactly to the budget.
//! - [`sampler`]: samples the convex curve `(t/T)^g` at every segment
//!   boundary to derive per-segment rates, then appends a single-block
//!   remainder phase so the schedule emits exactly the target supply.
//!
//! Both stages share [`residual::distribute_residual`] for their exact-sum
//! corrections. [`schedule::generate_schedule`] composes them.

pub mod constants;
pub mod error;
pub mod params;
pub mod planner;
pub mod residual;
pub mod sampler;
pub mod schedule;
pub mod types;

pub use error::ScheduleError;
pub use params::ScheduleParams;
pub use schedule::generate_schedule;
pub use types::{Phase, Schedule, ScheduleRequest, ScheduleSummary};
