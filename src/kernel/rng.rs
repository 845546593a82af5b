/// Seedable xorshift64* generator driving interrupt timing and kind.
/// Not for anything security related.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SimRng {
    state: u64,
}

impl SimRng {
    /// A zero seed would lock xorshift at zero, so it is remapped.
    pub fn new(seed: u64) -> SimRng {
        let state = if seed == 0 { 0x9E37_79B9_7F4A_7C15 } else { seed };
        SimRng { state }
    }

    pub fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.state = x;
        x.wrapping_mul(0x2545_F491_4F6C_DD1D)
    }

    /// Uniform value in `[lo, hi]`, both ends included.
    pub fn gen_inclusive(&mut self, lo: u64, hi: u64) -> u64 {
        if hi <= lo {
            return lo;
        }
        match (hi - lo).checked_add(1) {
            Some(span) => lo + self.next_u64() % span,
            None => self.next_u64(),
        }
    }

    pub fn gen_index(&mut self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        (self.next_u64() % len as u64) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_rng_same_seed_same_sequence() {
        let mut a = SimRng::new(42);
        let mut b = SimRng::new(42);

        for _ in 0..16 {
            assert_eq!(a.next_u64(), b.next_u64());
        }
    }

    #[test]
    fn test_rng_zero_seed_does_not_lock_up() {
        let mut rng = SimRng::new(0);

        assert_ne!(rng.next_u64(), 0);
        assert_ne!(rng.next_u64(), rng.next_u64());
    }

    #[test]
    fn test_rng_degenerate_range() {
        let mut rng = SimRng::new(7);

        assert_eq!(rng.gen_inclusive(5, 5), 5);
        assert_eq!(rng.gen_inclusive(9, 3), 9);
        assert_eq!(rng.gen_index(0), 0);
    }

    proptest! {
        #[test]
        fn prop_rng_gen_inclusive_stays_in_bounds(seed in any::<u64>(), lo in 0u64..10_000, width in 0u64..10_000) {
            let mut rng = SimRng::new(seed);
            let hi = lo + width;
            for _ in 0..32 {
                let value = rng.gen_inclusive(lo, hi);
                prop_assert!(value >= lo && value <= hi);
            }
        }
    }
}
