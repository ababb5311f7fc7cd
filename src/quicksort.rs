//! Recursive dual-pivot quicksort.

use crate::pivot;

/// Sorts `v` recursively.
///
/// Each level partitions the range into three parts around two pivots and sorts all three before
/// returning. The largest part continues in the loop instead of recursing, so every recursive
/// call covers at most half of the current range and stack depth is bounded by `O(log(n))` even
/// when the pivot choice degenerates.
pub(crate) fn quicksort<T, F>(mut v: &mut [T], is_less: &mut F)
where
    F: FnMut(&T, &T) -> bool,
{
    loop {
        if v.len() < 2 {
            return;
        }

        pivot::prepare_pivots(v, is_less);

        let (low_pivot, high_pivot) = partition(v, is_less);

        let (left, rest) = v.split_at_mut(low_pivot);
        let (mid_with_pivot, right) = rest.split_at_mut(high_pivot - low_pivot);
        // `mid_with_pivot` is only empty when an inconsistent comparator collapsed the middle
        // partition onto the low pivot slot.
        let mid = mid_with_pivot.get_mut(1..).unwrap_or_default();

        if left.len() >= mid.len() && left.len() >= right.len() {
            quicksort(mid, is_less);
            quicksort(right, is_less);
            v = left;
        } else if mid.len() >= right.len() {
            quicksort(left, is_less);
            quicksort(right, is_less);
            v = mid;
        } else {
            quicksort(left, is_less);
            quicksort(mid, is_less);
            v = right;
        }
    }
}

/// Takes a slice whose boundary slots hold the two ordered pivots and re-arranges the elements
/// in between such that when the call returns all elements left of the returned `low_pivot`
/// position compare less than the low pivot, all elements right of the returned `high_pivot`
/// position are notionally greater or equal to the high pivot, and the rest sit in between. The
/// pivots themselves end up at the returned positions, which are their final sorted slots.
///
/// Returns `(low_pivot, high_pivot)` with `low_pivot <= high_pivot`; the positions are distinct
/// whenever `is_less` implements a total order.
///
/// If `is_less` does not implement a total order the resulting order and return value are
/// unspecified, but every access stays within the slice: the cursors below are bounded by
/// construction, not by comparison results.
fn partition<T, F>(v: &mut [T], is_less: &mut F) -> (usize, usize)
where
    F: FnMut(&T, &T) -> bool,
{
    debug_assert!(v.len() >= 2);

    let high = v.len() - 1;

    // The pivots stay put at the boundary slots for the whole scan. The scan only touches
    // indices in 1..high, so comparing through `&v[0]` and `&v[high]` always sees the pivot
    // values picked above.
    let mut new_low = 1;
    let mut new_high = high - 1;

    let mut cursor = new_low;
    while cursor <= new_high {
        if is_less(&v[cursor], &v[0]) {
            // Grow the partition behind the low pivot, keeping the structure ahead of it.
            v.swap(cursor, new_low);
            new_low += 1;
        } else if !is_less(&v[cursor], &v[high]) {
            // Pull `new_high` backwards past elements already greater than the high pivot.
            while is_less(&v[high], &v[new_high]) && cursor < new_high {
                new_high -= 1;
            }
            v.swap(cursor, new_high);
            new_high -= 1;
            // The element swapped in may belong behind the low pivot.
            if is_less(&v[cursor], &v[0]) {
                v.swap(cursor, new_low);
                new_low += 1;
            }
        }
        cursor += 1;
    }

    new_low -= 1;
    new_high += 1;

    // Move the pivots into their final sorted slots.
    v.swap(0, new_low);
    v.swap(high, new_high);

    (new_low, new_high)
}
