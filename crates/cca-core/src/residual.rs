//! Exact-sum correction shared by both pipeline stages.
//!
//! Rounding each term of a sequence independently lets its integer sum drift
//! from the intended total. [`distribute_residual`] pushes the sequence back
//! onto the total:
//!
//! - A shortfall is added to the last element in one step.
//! - An excess is removed from the largest elements, leftmost first, so a
//!   non-decreasing sequence stays non-decreasing and an element never drops
//!   below the floor. When the last element is the unique maximum with enough
//!   headroom, the whole excess comes off it.

use crate::error::AllocationError;

/// Adjust `values` in place so they sum to exactly `target`, keeping every
/// element at or above `floor`.
///
/// Fails without modifying `values` when the target cannot be reached.
pub fn distribute_residual(
    values: &mut [u64],
    target: u64,
    floor: u64,
) -> Result<(), AllocationError> {
    let Some(last) = values.len().checked_sub(1) else {
        return if target == 0 {
            Ok(())
        } else {
            Err(AllocationError::EmptySequence { target })
        };
    };

    let sum = values
        .iter()
        .try_fold(0u64, |acc, &v| acc.checked_add(v))
        .ok_or(AllocationError::ArithmeticOverflow)?;

    if sum <= target {
        values[last] = values[last]
            .checked_add(target - sum)
            .ok_or(AllocationError::ArithmeticOverflow)?;
        return Ok(());
    }

    let mut excess = sum - target;
    let headroom: u64 = values.iter().map(|&v| v.saturating_sub(floor)).sum();
    if headroom < excess {
        return Err(AllocationError::UnreachableTarget {
            target,
            floor_total: floor.saturating_mul(values.len() as u64),
        });
    }

    while excess > 0 {
        let peak = values.iter().copied().fold(floor, u64::max);
        let Some(idx) = values.iter().position(|&v| v == peak) else {
            break;
        };
        let ties = values.iter().filter(|&&v| v == peak).count();
        let cut = if ties > 1 {
            1
        } else {
            // Unique peak: drop it straight to the next level down.
            let next = values
                .iter()
                .copied()
                .filter(|&v| v < peak)
                .fold(floor, u64::max);
            excess.min(peak - next)
        };
        values[idx] -= cut;
        excess -= cut;
    }

    Ok(())
}
