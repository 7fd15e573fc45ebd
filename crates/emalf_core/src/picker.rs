//! Uniform random selection over the current idea list.

use rand::rngs::ThreadRng;
use rand::seq::SliceRandom;
use rand::Rng;

/// Stateless selection logic; the only state is the random source.
///
/// Randomness does not need to be cryptographically secure.
#[derive(Debug, Clone)]
pub struct ChallengePicker<R = ThreadRng> {
    rng: R,
}

impl ChallengePicker<ThreadRng> {
    /// Picker backed by the thread-local generator.
    pub fn from_entropy() -> Self {
        Self::new(rand::thread_rng())
    }
}

impl<R: Rng> ChallengePicker<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Returns one element chosen uniformly, or `None` for an empty slice.
    pub fn try_choose<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        items.choose(&mut self.rng)
    }

    /// Returns one element chosen uniformly.
    ///
    /// # Panics
    /// Panics when `items` is empty; callers must check first.
    pub fn choose<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        match self.try_choose(items) {
            Some(item) => item,
            None => panic!("ChallengePicker::choose requires a non-empty list"),
        }
    }
}
