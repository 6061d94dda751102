//! 7-bag randomizer for piece generation
//!
//! All 7 shapes are shuffled, then dealt out before reshuffling. This
//! prevents long droughts and repeats within a batch.

use crate::tetromino::Shape;
use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;

/// The 7-bag piece randomizer
#[derive(Debug, Clone)]
pub struct Bag {
    /// Pending shapes, used as a stack (draws pop from the end)
    pending: Vec<Shape>,
    rng: ChaCha8Rng,
}

impl Default for Bag {
    fn default() -> Self {
        Self::new()
    }
}

impl Bag {
    /// Create a bag seeded from OS entropy
    pub fn new() -> Self {
        Self::from_rng(ChaCha8Rng::from_entropy())
    }

    /// Create a deterministic bag (tests, replays)
    pub fn with_seed(seed: u64) -> Self {
        Self::from_rng(ChaCha8Rng::seed_from_u64(seed))
    }

    fn from_rng(rng: ChaCha8Rng) -> Self {
        Self {
            pending: Vec::with_capacity(7),
            rng,
        }
    }

    /// Draw the next shape, refilling first if the bag is empty
    pub fn next(&mut self) -> Shape {
        loop {
            if let Some(shape) = self.pending.pop() {
                return shape;
            }
            self.refill();
        }
    }

    /// The shape the next draw would return
    pub fn peek(&mut self) -> Shape {
        loop {
            if let Some(&shape) = self.pending.last() {
                return shape;
            }
            self.refill();
        }
    }

    /// Number of shapes left before the next refill
    pub fn remaining(&self) -> usize {
        self.pending.len()
    }

    /// Refill with a shuffled permutation (Fisher-Yates)
    fn refill(&mut self) {
        let mut batch = Shape::all();
        batch.shuffle(&mut self.rng);
        self.pending.extend(batch);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_bag_contains_all_pieces() {
        let mut bag = Bag::with_seed(7);
        let pieces: HashSet<_> = (0..7).map(|_| bag.next()).collect();
        assert_eq!(pieces.len(), 7);
    }

    #[test]
    fn test_every_batch_is_a_permutation() {
        let mut bag = Bag::with_seed(42);
        for _ in 0..20 {
            let batch: HashSet<_> = (0..7).map(|_| bag.next()).collect();
            assert_eq!(batch.len(), 7);
            assert_eq!(bag.remaining(), 0);
        }
    }

    #[test]
    fn test_peek_matches_next() {
        let mut bag = Bag::with_seed(3);
        for _ in 0..30 {
            let peeked = bag.peek();
            assert_eq!(bag.next(), peeked);
        }
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let mut a = Bag::with_seed(99);
        let mut b = Bag::with_seed(99);
        for _ in 0..21 {
            assert_eq!(a.next(), b.next());
        }
    }

    #[test]
    fn test_many_pieces() {
        let mut bag = Bag::new();
        for _ in 0..100 {
            let _ = bag.next();
        }
    }
}
