//! The set of note slots hit during one round.

use crate::classify;
use crate::music::Note;

/// A grow-only set over the 12 note slots of the graph. Cleared only at
/// round start, never shrunk mid-round.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HighlightSet {
    bits: u16,
}

impl HighlightSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a slot; returns true if it was newly added.
    pub fn insert(&mut self, slot: usize) -> bool {
        debug_assert!(slot < 12);
        let mask = 1u16 << slot;
        let fresh = self.bits & mask == 0;
        self.bits |= mask;
        fresh
    }

    pub fn contains(&self, slot: usize) -> bool {
        slot < 12 && self.bits & (1 << slot) != 0
    }

    pub fn len(&self) -> usize {
        self.bits.count_ones() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }

    pub fn clear(&mut self) {
        self.bits = 0;
    }

    /// Slots in ascending index order.
    pub fn slots(&self) -> impl Iterator<Item = usize> + '_ {
        (0..12).filter(|&slot| self.contains(slot))
    }

    /// The highlighted notes, lowest slot first.
    pub fn notes(&self) -> impl Iterator<Item = Note> + '_ {
        self.slots().map(classify::note_for_slot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_reports_freshness() {
        let mut set = HighlightSet::new();
        assert!(set.insert(3));
        assert!(!set.insert(3));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn slots_come_back_sorted() {
        let mut set = HighlightSet::new();
        set.insert(11);
        set.insert(0);
        set.insert(5);
        assert_eq!(set.slots().collect::<Vec<_>>(), vec![0, 5, 11]);
        assert_eq!(
            set.notes().map(|n| n.to_string()).collect::<Vec<_>>(),
            vec!["C4", "F4", "B4"]
        );
    }

    #[test]
    fn clear_empties_the_set() {
        let mut set = HighlightSet::new();
        set.insert(2);
        set.clear();
        assert!(set.is_empty());
    }
}
