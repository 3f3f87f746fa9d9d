//! Shuffling shared by question building and the quiz sessions.
//!
//! Every function takes its randomness from a caller-supplied [`Rng`] so a
//! seeded generator can be used where a reproducible order is needed.

use rand::rng;
use rand::seq::SliceRandom;
use rand::Rng;

/// Returns a uniformly random permutation of `items`, leaving the input as is.
pub fn shuffle_with<T: Clone, R: Rng + ?Sized>(items: &[T], rng: &mut R) -> Vec<T> {
    let mut shuffled = items.to_vec();
    if shuffled.len() > 1 {
        shuffled.shuffle(rng);
    }
    shuffled
}

/// [`shuffle_with`] using the thread-local generator.
pub fn shuffle<T: Clone>(items: &[T]) -> Vec<T> {
    shuffle_with(items, &mut rng())
}
