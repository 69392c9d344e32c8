//! Round-robin shrink and grow shared by the linear and grid managers.
//!
//! Both operate on a slice of extents (per child for linear, per column or
//! row for grid) and move one cell at a time so the outcome never depends on
//! rounding.

/// Sum of extents, widened so spacing arithmetic cannot overflow.
pub(crate) fn total(extents: &[u16]) -> u32 {
    extents.iter().map(|&e| e as u32).sum()
}

/// Take cells away from the largest extents until the total is at most
/// `target`.
///
/// Every entry tied for largest loses one cell, in declaration order, before
/// the largest value is recomputed. Stops as soon as the total fits, or when
/// everything is already zero. Returns the new total.
pub(crate) fn shrink_to_fit(extents: &mut [u16], target: u32) -> u32 {
    let mut sum = total(extents);
    while sum > target {
        let largest = extents.iter().copied().max().unwrap_or(0);
        if largest == 0 {
            break;
        }
        for extent in extents.iter_mut() {
            if *extent == largest {
                *extent -= 1;
                sum -= 1;
                if sum <= target {
                    break;
                }
            }
        }
    }
    sum
}

/// Hand out spare cells, one at a time in declaration order, to the entries
/// flagged in `growable` until the total reaches `target`. Returns the new
/// total.
pub(crate) fn grow_to_fill(extents: &mut [u16], growable: &[bool], target: u32) -> u32 {
    let mut sum = total(extents);
    if !growable.iter().any(|&g| g) {
        return sum;
    }
    while sum < target {
        for (extent, _) in extents
            .iter_mut()
            .zip(growable)
            .filter(|(_, grow)| **grow)
        {
            *extent = extent.saturating_add(1);
            sum += 1;
            if sum >= target {
                break;
            }
        }
    }
    sum
}
