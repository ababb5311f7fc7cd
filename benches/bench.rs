use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};

use dpqsort::patterns;

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

#[inline(never)]
fn bench_sort(
    c: &mut Criterion,
    test_len: usize,
    pattern_name: &str,
    pattern_provider: &fn(usize) -> Vec<i64>,
    bench_name: &str,
    sort_func: impl Fn(&mut [i64]),
) {
    // Pin the benchmark to the same core to improve repeatability. Doing it this way allows
    // criterion to do other stuff with other threads, which greatly impacts overall benchmark
    // throughput.
    pin_thread_to_core();

    let batch_size = if test_len > 30 {
        BatchSize::LargeInput
    } else {
        BatchSize::SmallInput
    };

    c.bench_function(
        &format!("{bench_name}-hot-i64-{pattern_name}-{test_len}"),
        |b| {
            b.iter_batched(
                || pattern_provider(test_len),
                |mut test_data| sort_func(black_box(test_data.as_mut_slice())),
                batch_size,
            )
        },
    );
}

fn bench_patterns(c: &mut Criterion, test_len: usize) {
    let pattern_providers: Vec<(&'static str, fn(usize) -> Vec<i64>)> = vec![
        ("random", patterns::random),
        ("ascending", patterns::ascending),
        ("descending", patterns::descending),
        ("many_equal", patterns::many_equal),
    ];

    for (pattern_name, pattern_provider) in pattern_providers.iter() {
        if test_len < 3 && *pattern_name != "random" {
            continue;
        }

        bench_sort(
            c,
            test_len,
            pattern_name,
            pattern_provider,
            "dual_pivot_unstable",
            |v| dpqsort::sort(v),
        );

        bench_sort(
            c,
            test_len,
            pattern_name,
            pattern_provider,
            "rust_std_stable",
            |v| v.sort(),
        );

        bench_sort(
            c,
            test_len,
            pattern_name,
            pattern_provider,
            "rust_std_unstable",
            |v| v.sort_unstable(),
        );
    }
}

fn ensure_true_random() {
    // Ensure that random vecs are actually different.
    let random_vec_a = patterns::random(5);
    let random_vec_b = patterns::random(5);

    // Fixed seeds are for the test suite. If they leak in here, every iteration sorts the same
    // values and the numbers are meaningless.
    assert_ne!(random_vec_a, random_vec_b);
}

fn criterion_benchmark(c: &mut Criterion) {
    let test_lens = [
        1, 2, 3, 5, 7, 9, 13, 16, 20, 24, 36, 50, 101, 200, 500, 1_000, 2_048, 10_000,
    ];

    patterns::disable_fixed_seed();
    ensure_true_random();

    for test_len in test_lens {
        bench_patterns(c, test_len);
    }
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
