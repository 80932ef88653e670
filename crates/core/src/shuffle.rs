//! Traversal orders over a chapter's question indices.

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

/// Produces a permutation of `0..n` for one chapter activation.
pub trait ShuffleOrder: Send {
    fn shuffle(&mut self, n: usize) -> Vec<usize>;
}

/// Uniform random permutation (Fisher–Yates) backed by a seedable RNG.
#[derive(Debug, Clone)]
pub struct RandomShuffle {
    rng: StdRng,
}

impl RandomShuffle {
    /// Seeds from the operating system.
    #[must_use]
    pub fn from_os_rng() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Deterministic sequence of permutations for a given seed.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl ShuffleOrder for RandomShuffle {
    fn shuffle(&mut self, n: usize) -> Vec<usize> {
        let mut order: Vec<usize> = (0..n).collect();
        order.as_mut_slice().shuffle(&mut self.rng);
        order
    }
}

/// Identity permutation: questions are presented in source order.
#[derive(Debug, Clone, Copy, Default)]
pub struct SourceOrder;

impl ShuffleOrder for SourceOrder {
    fn shuffle(&mut self, n: usize) -> Vec<usize> {
        (0..n).collect()
    }
}

/// Returns true when `order` contains every index in `0..n` exactly once.
#[must_use]
pub fn is_permutation(order: &[usize], n: usize) -> bool {
    if order.len() != n {
        return false;
    }
    let mut seen = vec![false; n];
    for &idx in order {
        match seen.get_mut(idx) {
            Some(slot) if !*slot => *slot = true,
            _ => return false,
        }
    }
    true
}
