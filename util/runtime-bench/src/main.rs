//! Trial-based runtime comparison of the dual-pivot quicksort against the stdlib sorts.
//!
//! Every trial sorts a freshly generated, unshared array, because the sorts mutate their input
//! in place. Re-sorting the same buffer would mean measuring mostly presorted input from the
//! second trial on.

mod alloc;
mod measure;

use std::cmp::Ordering;
use std::env;
use std::hint::black_box;
use std::time::Duration;

use dpqsort::patterns;

use crate::alloc::CountingAllocator;
use crate::measure::{measure_duration, median};

#[global_allocator]
static ALLOC: CountingAllocator = CountingAllocator::new();

trait Sort {
    fn name() -> String;

    fn sort<T: Ord>(v: &mut [T]);

    fn sort_by<T, F: FnMut(&T, &T) -> Ordering>(v: &mut [T], compare: F);
}

struct DualPivot {}

impl Sort for DualPivot {
    fn name() -> String {
        "dual_pivot_unstable".into()
    }

    fn sort<T: Ord>(v: &mut [T]) {
        dpqsort::sort(v);
    }

    fn sort_by<T, F: FnMut(&T, &T) -> Ordering>(v: &mut [T], compare: F) {
        dpqsort::sort_by(v, compare);
    }
}

struct StdStable {}

impl Sort for StdStable {
    fn name() -> String {
        "rust_std_stable".into()
    }

    fn sort<T: Ord>(v: &mut [T]) {
        v.sort();
    }

    fn sort_by<T, F: FnMut(&T, &T) -> Ordering>(v: &mut [T], compare: F) {
        v.sort_by(compare);
    }
}

struct StdUnstable {}

impl Sort for StdUnstable {
    fn name() -> String {
        "rust_std_unstable".into()
    }

    fn sort<T: Ord>(v: &mut [T]) {
        v.sort_unstable();
    }

    fn sort_by<T, F: FnMut(&T, &T) -> Ordering>(v: &mut [T], compare: F) {
        v.sort_unstable_by(compare);
    }
}

struct TrialSummary {
    median_duration: Duration,
    median_heap_peak: usize,
}

fn run_trials<S: Sort>(
    trial_count: usize,
    test_len: usize,
    pattern_provider: impl Fn(usize) -> Vec<i64>,
) -> TrialSummary {
    let warmup_count = (trial_count / 10).max(1);

    let mut durations = Vec::with_capacity(trial_count);
    let mut heap_peaks = Vec::with_capacity(trial_count);

    for i in 0..(trial_count + warmup_count) {
        let mut test_data = pattern_provider(test_len);

        ALLOC.reset_peak();
        let heap_start = ALLOC.in_use();

        let duration = measure_duration(|| S::sort(black_box(test_data.as_mut_slice())));

        let heap_peak = ALLOC.peak().saturating_sub(heap_start);
        black_box(&test_data); // side-effect

        if i >= warmup_count {
            durations.push(duration);
            heap_peaks.push(heap_peak);
        }
    }

    TrialSummary {
        median_duration: median(&mut durations),
        median_heap_peak: median(&mut heap_peaks),
    }
}

fn measure_comp_count<S: Sort>(
    trial_count: usize,
    test_len: usize,
    pattern_provider: impl Fn(usize) -> Vec<i64>,
) {
    // Measure how many comparisons are performed by a specific implementation and input
    // combination.
    let mut comp_count = 0u64;

    for _ in 0..trial_count {
        let mut test_data = pattern_provider(test_len);
        S::sort_by(black_box(test_data.as_mut_slice()), |a, b| {
            comp_count += 1;
            a.cmp(b)
        });
    }

    let total = comp_count / (trial_count as u64);
    println!("{}: mean comparisons: {total}", S::name());
}

fn report_sort<S: Sort>(
    trial_count: usize,
    test_len: usize,
    pattern_provider: impl Fn(usize) -> Vec<i64>,
) {
    if env::var("MEASURE_COMP").is_ok() {
        measure_comp_count::<S>(trial_count, test_len, pattern_provider);
        return;
    }

    let summary = run_trials::<S>(trial_count, test_len, pattern_provider);

    println!(
        "{:<24} {:>18} {:>22}",
        S::name(),
        summary.median_duration.as_nanos(),
        summary.median_heap_peak
    );
}

fn pin_thread_to_core() {
    use std::cell::Cell;
    let pin_core_id: usize = 2;

    thread_local! {static AFFINITY_ALREADY_SET: Cell<bool> = Cell::new(false); }

    // Set affinity only once per thread.
    AFFINITY_ALREADY_SET.with(|affinity_already_set| {
        if !affinity_already_set.get() {
            if let Some(core_id_2) = core_affinity::get_core_ids()
                .as_ref()
                .and_then(|ids| ids.get(pin_core_id))
            {
                core_affinity::set_for_current(*core_id_2);
            }

            affinity_already_set.set(true);
        }
    });
}

fn main() {
    let args = env::args().collect::<Vec<_>>();
    let trial_count: usize = args
        .get(1)
        .map(|val| val.parse().expect("trial count must be a number"))
        .unwrap_or(1000);
    let test_len: usize = args
        .get(2)
        .map(|val| val.parse().expect("array length must be a number"))
        .unwrap_or(1000);

    patterns::disable_fixed_seed();
    pin_thread_to_core();

    let pattern_providers: Vec<(&'static str, fn(usize) -> Vec<i64>)> = vec![
        ("random", patterns::random),
        ("ascending", patterns::ascending),
        ("descending", patterns::descending),
        ("many_equal", patterns::many_equal),
    ];

    println!("Running {trial_count} trials of length {test_len} per pattern.");

    for (pattern_name, pattern_provider) in pattern_providers {
        println!("\n--- {pattern_name} ---");
        if env::var("MEASURE_COMP").is_err() {
            println!(
                "{:<24} {:>18} {:>22}",
                "sort", "median time (ns)", "median heap peak (B)"
            );
        }

        report_sort::<DualPivot>(trial_count, test_len, pattern_provider);
        report_sort::<StdStable>(trial_count, test_len, pattern_provider);
        report_sort::<StdUnstable>(trial_count, test_len, pattern_provider);
    }
}
