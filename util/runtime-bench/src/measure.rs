//! This module implements functionality for measuring and summarizing the duration of some task.

use std::time::{Duration, Instant};

/// Measures the wall-clock time it takes to execute the function `test_fn`.
#[inline(never)]
pub fn measure_duration(mut test_fn: impl FnMut()) -> Duration {
    let start = Instant::now();

    test_fn();

    start.elapsed()
}

/// Returns the median of the samples. The median is reported instead of the mean so that warm-up
/// and scheduling outliers don't skew the summary.
pub fn median<T: Ord + Copy>(samples: &mut [T]) -> T {
    assert!(!samples.is_empty(), "Needs at least 1 sample");

    samples.sort_unstable();

    samples[samples.len() / 2]
}
