//! Random pattern selection with a no-repeat guarantee.

use rand::Rng;

/// Picks catalog indices uniformly at random, excluding indices already
/// used this cycle. Once every index has been handed out the used set
/// resets and a fresh cycle begins, so back-to-back repeats can only
/// happen across a cycle boundary.
#[derive(Debug, Clone)]
pub struct PatternPicker {
    catalog_len: usize,
    used: u32, // bitmask; catalogs are small and fixed
    current: usize,
}

impl PatternPicker {
    /// A picker over a catalog; index 0 starts out as the current pattern
    /// and counts as used, matching a round that begins on the default.
    pub fn new(catalog_len: usize) -> Self {
        assert!(catalog_len > 0 && catalog_len <= 32);
        Self {
            catalog_len,
            used: 1,
            current: 0,
        }
    }

    /// Index of the pattern currently in play.
    pub fn current(&self) -> usize {
        self.current
    }

    /// How many indices the current cycle has consumed.
    pub fn used_count(&self) -> usize {
        self.used.count_ones() as usize
    }

    /// Pick a fresh pattern index.
    pub fn next<R: Rng>(&mut self, rng: &mut R) -> usize {
        if self.used_count() >= self.catalog_len {
            self.used = 0;
        }

        let pick = loop {
            let candidate = rng.gen_range(0..self.catalog_len);
            if self.used & (1 << candidate) == 0 {
                break candidate;
            }
        };

        self.used |= 1 << pick;
        self.current = pick;
        pick
    }
}
