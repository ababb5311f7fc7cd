use std::env;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};

use rand::prelude::*;

use once_cell::sync::OnceCell;

/// Provides a set of patterns useful for testing and benchmarking sorting algorithms.
/// Currently limited to i64 values.

// --- Public ---

pub fn random(len: usize) -> Vec<i64> {
    //     .
    // : . : :
    // :.:::.::

    // Uniform 53-bit values, the integer range a double precision float can represent exactly.
    random_uniform(len, 0..(1i64 << 53))
}

pub fn random_uniform<R>(len: usize, range: R) -> Vec<i64>
where
    R: Into<rand::distributions::Uniform<i64>>,
{
    // :.:.:.::
    let mut rng = new_rng();

    // Abstracting over ranges in Rust :(
    let dist: rand::distributions::Uniform<i64> = range.into();

    (0..len).map(|_| dist.sample(&mut rng)).collect()
}

pub fn many_equal(len: usize) -> Vec<i64> {
    // : :.: :
    // :::::::

    // Bounding the value range by the cube root of the length guarantees by the pigeonhole
    // principle that at least one value repeats roughly len^(2/3) times.
    let bound = ((len as f64).cbrt().round() as i64).max(1);

    random_uniform(len, 0..bound)
}

pub fn all_equal(len: usize) -> Vec<i64> {
    // ......
    // ::::::

    (0..len).map(|_| 66).collect::<Vec<_>>()
}

pub fn ascending(len: usize) -> Vec<i64> {
    //     .:
    //   .:::
    // .:::::

    (0..len as i64).collect::<Vec<_>>()
}

pub fn descending(len: usize) -> Vec<i64> {
    // :.
    // :::.
    // :::::.

    (0..len as i64).rev().collect::<Vec<_>>()
}

pub fn pipe_organ(len: usize) -> Vec<i64> {
    //   .:.
    // .:::::.

    let mut vals = random(len);

    let first_half = &mut vals[0..(len / 2)];
    first_half.sort();

    let second_half = &mut vals[(len / 2)..len];
    second_half.sort_by_key(|&e| std::cmp::Reverse(e));

    vals
}

static USE_FIXED_SEED: AtomicBool = AtomicBool::new(true);

/// By default all patterns derive from one random seed per process, so that a failing test run
/// can be reproduced by setting the `OVERRIDE_SEED` environment variable to the printed seed.
/// Benchmarks call this to get fresh values on every pattern invocation instead.
pub fn disable_fixed_seed() {
    USE_FIXED_SEED.store(false, Ordering::Release);
}

pub fn random_init_seed() -> u64 {
    if USE_FIXED_SEED.load(Ordering::Acquire) {
        static SEED: OnceCell<u64> = OnceCell::new();
        *SEED.get_or_init(|| {
            env::var("OVERRIDE_SEED")
                .ok()
                .map(|seed| u64::from_str(&seed).unwrap())
                .unwrap_or_else(|| thread_rng().gen())
        })
    } else {
        thread_rng().gen()
    }
}

// --- Private ---

fn new_rng() -> StdRng {
    rand::SeedableRng::seed_from_u64(random_init_seed())
}
