//! Integration test suite for CCA supply schedules.
//!
//! Exercises the generator end to end: randomized invariants over the whole
//! auction range, pinned scenarios, and both protocol surfaces.

pub mod helpers;
