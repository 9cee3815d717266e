//! Typing targets: words on opponents and symbols on platforms

use std::collections::BTreeSet;

use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

use super::state::SimRng;

/// Unshifted jump symbols
pub const SPECIALS: &str = "1234567890[]\\;',./";
/// Shifted counterparts, position for position
pub const SHIFTED_SPECIALS: &str = "!@#$%^&*(){}|:\"<>?";

/// An immutable string plus how much of it has been typed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Word {
    text: Vec<char>,
    typed: usize,
}

impl Word {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.chars().collect(),
            typed: 0,
        }
    }

    /// Advance the cursor if `c` is the next expected character.
    /// A wrong character leaves the cursor where it was.
    pub fn type_on(&mut self, c: char) -> bool {
        match self.text.get(self.typed) {
            Some(&expected) if expected == c => {
                self.typed += 1;
                true
            }
            _ => false,
        }
    }

    pub fn done(&self) -> bool {
        self.typed == self.text.len()
    }

    pub fn reset(&mut self) {
        self.typed = 0;
    }

    pub fn typed(&self) -> usize {
        self.typed
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn first(&self) -> Option<char> {
        self.text.first().copied()
    }

    pub fn text(&self) -> String {
        self.text.iter().collect()
    }
}

/// Jump symbols split into those held by on-screen platforms and those free
#[derive(Debug, Clone)]
pub struct SpecialCharPool {
    free: BTreeSet<char>,
    in_use: BTreeSet<char>,
}

impl Default for SpecialCharPool {
    fn default() -> Self {
        Self::new()
    }
}

impl SpecialCharPool {
    pub fn new() -> Self {
        Self {
            free: SPECIALS.chars().chain(SHIFTED_SPECIALS.chars()).collect(),
            in_use: BTreeSet::new(),
        }
    }

    /// Take a random free symbol, or `None` if every symbol is in use
    pub fn acquire(&mut self, rng: &mut SimRng) -> Option<char> {
        let candidates: Vec<char> = self.free.iter().copied().collect();
        let symbol = *candidates.choose(rng)?;
        self.free.remove(&symbol);
        self.in_use.insert(symbol);
        Some(symbol)
    }

    /// Return a symbol to the free set. Unknown or already-free symbols are ignored.
    pub fn release(&mut self, symbol: char) {
        if self.in_use.remove(&symbol) {
            self.free.insert(symbol);
        }
    }

    pub fn is_in_use(&self, symbol: char) -> bool {
        self.in_use.contains(&symbol)
    }

    pub fn free_count(&self) -> usize {
        self.free.len()
    }

    pub fn capacity(&self) -> usize {
        self.free.len() + self.in_use.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;

    #[test]
    fn test_word_typing_in_order() {
        let mut word = Word::new("cat");
        assert!(word.type_on('c'));
        assert!(word.type_on('a'));
        assert!(!word.done());
        assert!(word.type_on('t'));
        assert!(word.done());
        assert!(!word.type_on('t'));
    }

    #[test]
    fn test_word_miss_keeps_cursor() {
        let mut word = Word::new("dragon");
        assert!(word.type_on('d'));
        assert!(!word.type_on('a'));
        assert_eq!(word.typed(), 1);
        assert!(!word.type_on('D'));
        assert_eq!(word.typed(), 1);
    }

    #[test]
    fn test_pool_exhaustion_declines() {
        let mut rng = SimRng::seed_from_u64(1);
        let mut pool = SpecialCharPool::new();
        let capacity = pool.capacity();
        assert_eq!(capacity, 36);
        let taken: Vec<char> = (0..capacity).filter_map(|_| pool.acquire(&mut rng)).collect();
        assert_eq!(taken.len(), capacity);
        assert_eq!(pool.acquire(&mut rng), None);

        pool.release(taken[3]);
        assert_eq!(pool.acquire(&mut rng), Some(taken[3]));
    }

    #[test]
    fn test_shift_tables_line_up() {
        assert_eq!(SPECIALS.chars().count(), SHIFTED_SPECIALS.chars().count());
    }

    proptest! {
        #[test]
        fn prop_word_accepts_exact_text(text in "[a-z]{1,12}") {
            let mut word = Word::new(&text);
            let chars: Vec<char> = text.chars().collect();
            for (i, c) in chars.iter().enumerate() {
                prop_assert!(!word.done());
                prop_assert!(word.type_on(*c));
                prop_assert_eq!(word.typed(), i + 1);
            }
            prop_assert!(word.done());
        }

        #[test]
        fn prop_word_miss_is_idempotent(text in "[a-m]{2,8}", wrong in "[n-z]") {
            let mut word = Word::new(&text);
            let first = text.chars().next().unwrap();
            prop_assert!(word.type_on(first));
            let wrong = wrong.chars().next().unwrap();
            for _ in 0..3 {
                prop_assert!(!word.type_on(wrong));
                prop_assert_eq!(word.typed(), 1);
            }
        }

        #[test]
        fn prop_pool_never_hands_out_a_symbol_twice(
            ops in proptest::collection::vec(any::<bool>(), 1..200),
            seed in any::<u64>(),
        ) {
            let mut rng = SimRng::seed_from_u64(seed);
            let mut pool = SpecialCharPool::new();
            let mut held: Vec<char> = Vec::new();
            for acquire in ops {
                if acquire || held.is_empty() {
                    if let Some(symbol) = pool.acquire(&mut rng) {
                        prop_assert!(!held.contains(&symbol));
                        held.push(symbol);
                    } else {
                        prop_assert_eq!(held.len(), pool.capacity());
                    }
                } else {
                    let symbol = held.remove(0);
                    pool.release(symbol);
                    prop_assert!(!pool.is_in_use(symbol));
                }
                for symbol in &held {
                    prop_assert!(pool.is_in_use(*symbol));
                }
            }
        }
    }
}
