//! Random subset selection over the ad pool
//!
//! Selection is a Fisher–Yates shuffle over slot indices that stops after
//! `k` swaps. Every ordered `k`-subset of slots is equally likely, so each
//! slot appears with probability `k / n` and, when it appears, is equally
//! likely to land in any output position.
//!
//! The generator is either thread-local entropy (the default) or a seeded
//! ChaCha8 stream for reproducible output.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::sync::Mutex;

use crate::models::{Ad, Selection};
use crate::pool::AdPool;

/// Number of ads returned per feed request
pub const DEFAULT_SELECTION_SIZE: usize = 3;

/// Draw `min(k, n)` distinct slot indices out of `0..n` in random order
pub fn sample_slots<R: Rng + ?Sized>(n: usize, k: usize, rng: &mut R) -> Vec<usize> {
    let k = k.min(n);
    let mut slots: Vec<usize> = (0..n).collect();

    for i in 0..k {
        let j = rng.gen_range(i..n);
        slots.swap(i, j);
    }

    slots.truncate(k);
    slots
}

/// Select `min(k, pool.len())` ads from distinct slots
pub fn select<R: Rng + ?Sized>(pool: &[Ad], k: usize, rng: &mut R) -> Selection {
    sample_slots(pool.len(), k, rng)
        .into_iter()
        .map(|slot| pool[slot].clone())
        .collect()
}

enum RngSource {
    Thread,
    Seeded(Mutex<ChaCha8Rng>),
}

/// Stateless sampler bound to a pool
///
/// Holds no per-request state; the only thing that advances between calls
/// is the generator.
pub struct SelectionService {
    pool: AdPool,
    size: usize,
    rng: RngSource,
}

impl SelectionService {
    /// Create a service drawing [`DEFAULT_SELECTION_SIZE`] ads per call
    pub fn new(pool: AdPool) -> Self {
        Self {
            pool,
            size: DEFAULT_SELECTION_SIZE,
            rng: RngSource::Thread,
        }
    }

    /// Use a deterministic ChaCha8 generator
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = RngSource::Seeded(Mutex::new(ChaCha8Rng::seed_from_u64(seed)));
        self
    }

    /// Change how many ads are drawn per call
    #[must_use]
    pub fn with_size(mut self, size: usize) -> Self {
        self.size = size;
        self
    }

    /// The pool being sampled
    pub fn pool(&self) -> &AdPool {
        &self.pool
    }

    /// Configured selection size (before clamping to the pool)
    pub fn size(&self) -> usize {
        self.size
    }

    /// Produce a fresh selection
    pub fn next_selection(&self) -> Selection {
        match &self.rng {
            RngSource::Thread => select(self.pool.as_slice(), self.size, &mut rand::thread_rng()),
            RngSource::Seeded(rng) => {
                // A poisoned lock still holds a usable generator
                let mut rng = rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
                select(self.pool.as_slice(), self.size, &mut *rng)
            }
        }
    }
}

impl std::fmt::Debug for SelectionService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelectionService")
            .field("pool_size", &self.pool.len())
            .field("size", &self.size)
            .field("seeded", &matches!(self.rng, RngSource::Seeded(_)))
            .finish()
    }
}
