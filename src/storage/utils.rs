/// The smallest capacity requested by a growing insert.
pub const MIN_NON_ZERO_CAP: usize = 8;

/// Determine the capacity requested when an insert of `needed` total elements
/// does not fit. The request at least doubles the current length, which bounds
/// the total relocation cost of `N` appends to `O(N)`.
#[inline]
pub const fn grow_capacity(length: usize, needed: usize, max_size: usize) -> usize {
    let mut cap = length.saturating_mul(2);
    if cap < MIN_NON_ZERO_CAP {
        cap = MIN_NON_ZERO_CAP;
    }
    if cap > max_size {
        cap = max_size;
    }
    if cap < needed {
        needed
    } else {
        cap
    }
}
