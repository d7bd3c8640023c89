//! Random source used for target selection, red herrings, and shuffling.

/// Source of uniform randomness for puzzle construction.
///
/// Only [`next_u64`](RandomSource::next_u64) is required; the rest are
/// derived from it so any generator can drive a session.
pub trait RandomSource {
    fn next_u64(&mut self) -> u64;

    /// Uniform value in `0..bound`. `bound` must be non-zero.
    fn next_usize(&mut self, bound: usize) -> usize {
        (self.next_u64() as usize) % bound
    }

    /// Uniform value in `lo..=hi`. An empty range yields `lo`.
    fn range_inclusive(&mut self, lo: usize, hi: usize) -> usize {
        if hi <= lo {
            return lo;
        }
        lo + self.next_usize(hi - lo + 1)
    }

    /// Uniform element of a slice, or `None` when it is empty
    fn pick<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            None
        } else {
            items.get(self.next_usize(items.len()))
        }
    }

    /// Shuffle a slice using Fisher-Yates
    fn shuffle<T>(&mut self, slice: &mut [T]) {
        for i in (1..slice.len()).rev() {
            let j = self.next_usize(i + 1);
            slice.swap(i, j);
        }
    }
}

/// Small PRNG that works on every target, including WASM.
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u64,
}

impl Default for SimpleRng {
    fn default() -> Self {
        Self::new()
    }
}

impl SimpleRng {
    /// Seed from the operating system
    pub fn new() -> Self {
        let mut seed_bytes = [0u8; 8];
        getrandom::getrandom(&mut seed_bytes).unwrap_or_else(|_| {
            // Fallback: use a static counter if getrandom fails
            static COUNTER: std::sync::atomic::AtomicU64 = std::sync::atomic::AtomicU64::new(1);
            let counter = COUNTER.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
            seed_bytes = counter.to_le_bytes();
        });
        Self::with_seed(u64::from_le_bytes(seed_bytes))
    }

    /// Create a generator with a specific seed for reproducibility
    pub fn with_seed(seed: u64) -> Self {
        Self {
            state: seed.wrapping_add(1),
        }
    }
}

impl RandomSource for SimpleRng {
    fn next_u64(&mut self) -> u64 {
        // PCG-like PRNG
        self.state = self
            .state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        let xorshifted = (((self.state >> 18) ^ self.state) >> 27) as u32;
        let rot = (self.state >> 59) as u32;
        (xorshifted.rotate_right(rot)) as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_sequences_repeat() {
        let mut a = SimpleRng::with_seed(7);
        let mut b = SimpleRng::with_seed(7);
        for _ in 0..32 {
            assert_eq!(a.next_u64(), b.next_u64());
        }
    }

    #[test]
    fn test_range_inclusive_bounds() {
        let mut rng = SimpleRng::with_seed(42);
        let mut seen = [false; 4];
        for _ in 0..500 {
            let value = rng.range_inclusive(2, 5);
            assert!((2..=5).contains(&value));
            seen[value - 2] = true;
        }
        assert!(seen.iter().all(|&s| s), "every value in range should appear");
        assert_eq!(rng.range_inclusive(5, 5), 5);
        assert_eq!(rng.range_inclusive(3, 1), 3);
    }

    #[test]
    fn test_pick_and_shuffle() {
        let mut rng = SimpleRng::with_seed(3);
        let empty: [u8; 0] = [];
        assert!(rng.pick(&empty).is_none());
        assert_eq!(rng.pick(&[9]), Some(&9));

        let mut values: Vec<u32> = (0..20).collect();
        rng.shuffle(&mut values);
        let mut sorted = values.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..20).collect::<Vec<_>>());
    }
}
