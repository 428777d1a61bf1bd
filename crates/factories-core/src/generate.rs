//! Uniform child-value generation.
//!
//! Regeneration is "randomize", not "restore": two draws over the same
//! bounds are expected to differ. Determinism between calls is
//! intentionally not provided.

use rand::Rng;

/// Draw `count` independent values uniformly from `lower..=upper`.
/// A zero count yields an empty vec. Callers validate the bounds first.
pub fn draw_values<R: Rng + ?Sized>(rng: &mut R, count: i32, lower: i64, upper: i64) -> Vec<i64> {
    (0..count).map(|_| rng.gen_range(lower..=upper)).collect()
}

/// Object-safe seam over the random source so the orchestrator can be
/// exercised with a fixed source in tests.
pub trait ValueSource: Send + Sync {
    fn draw(&self, count: i32, lower: i64, upper: i64) -> Vec<i64>;
}

/// Production source backed by `rand::thread_rng`.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRngSource;

impl ValueSource for ThreadRngSource {
    fn draw(&self, count: i32, lower: i64, upper: i64) -> Vec<i64> {
        draw_values(&mut rand::thread_rng(), count, lower, upper)
    }
}
