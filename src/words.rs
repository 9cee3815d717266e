//! Word sources for opponents
//!
//! The simulation asks for one word at a time and names the first letters
//! it cannot accept. Sources never block: lists are loaded before the game
//! starts and fall back to a built-in list when empty.

use std::collections::BTreeSet;
use std::path::Path;

use rand::seq::IndexedRandom;

use crate::sim::state::SimRng;

/// Words used when no list is supplied or a supplied list filters down to nothing
const BUILTIN_WORDS: &[&str] = &[
    "abandon", "action", "agent", "alarm", "anchor", "archer", "armor", "attack", "banner",
    "barrel", "battle", "beacon", "blast", "blaze", "bolt", "border", "bravo", "bridge", "bullet",
    "cable", "camp", "cannon", "canyon", "captain", "cargo", "castle", "charge", "circuit",
    "combat", "convoy", "copter", "crater", "damage", "danger", "defend", "delta", "desert",
    "dragon", "drill", "eagle", "echo", "engine", "enemy", "escape", "falcon", "fight", "flame",
    "fleet", "fortress", "gadget", "galaxy", "garrison", "ghost", "glider", "gravity", "hammer",
    "harbor", "hazard", "helmet", "hunter", "impact", "island", "jacket", "jungle", "kernel",
    "knight", "ladder", "laser", "launch", "legend", "machine", "marine", "meteor", "mission",
    "monster", "native", "nickel", "night", "nova", "ocean", "orbit", "outpost", "panic",
    "patrol", "phantom", "pilot", "planet", "plasma", "quake", "quest", "quiver", "radar",
    "raider", "ranger", "rescue", "rocket", "saber", "shield", "signal", "soldier", "spark",
    "storm", "strike", "target", "temple", "thunder", "titan", "tower", "turbo", "umbra",
    "unit", "valley", "vapor", "vector", "venom", "warp", "wizard", "wolf", "xenon", "yacht",
    "yonder", "zealot", "zenith", "zero", "zone",
];

/// Minimum length of a usable word
const MIN_WORD_LEN: usize = 4;

/// Error loading a word list
#[derive(thiserror::Error, Debug)]
pub enum WordListError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("word list contains no usable words")]
    Empty,
}

/// Supplies opponent words
pub trait WordSource: std::fmt::Debug {
    /// A word whose first character is not in `excluded`, or `None` if the
    /// source has no such word. Never loops waiting for one.
    fn next_word(&mut self, excluded: &BTreeSet<char>, rng: &mut SimRng) -> Option<String>;
}

/// A fixed list of lowercase words chosen uniformly at random
#[derive(Debug, Clone)]
pub struct WordList {
    words: Vec<String>,
}

impl Default for WordList {
    fn default() -> Self {
        Self::builtin()
    }
}

impl WordList {
    pub fn builtin() -> Self {
        Self {
            words: BUILTIN_WORDS.iter().map(|w| w.to_string()).collect(),
        }
    }

    /// Usable words from free text, deduplicated, in first-seen order
    pub fn from_text(text: &str) -> Result<Self, WordListError> {
        let mut seen = BTreeSet::new();
        let words: Vec<String> = text
            .split_whitespace()
            .filter(|w| is_good_word(w))
            .map(str::to_lowercase)
            .filter(|w| seen.insert(w.clone()))
            .collect();

        if words.is_empty() {
            return Err(WordListError::Empty);
        }
        Ok(Self { words })
    }

    /// Load a whitespace-separated word file
    pub fn load(path: &Path) -> Result<Self, WordListError> {
        let text = std::fs::read_to_string(path)?;
        let list = Self::from_text(&text)?;
        log::info!("Loaded {} words from {}", list.len(), path.display());
        Ok(list)
    }

    /// Load a word file, falling back to the built-in list on any failure
    pub fn load_or_builtin(path: &Path) -> Self {
        match Self::load(path) {
            Ok(list) => list,
            Err(e) => {
                log::warn!("Word list {} unusable ({}), using built-in words", path.display(), e);
                Self::builtin()
            }
        }
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl WordSource for WordList {
    fn next_word(&mut self, excluded: &BTreeSet<char>, rng: &mut SimRng) -> Option<String> {
        let candidates: Vec<&String> = self
            .words
            .iter()
            .filter(|w| w.chars().next().is_some_and(|c| !excluded.contains(&c)))
            .collect();
        candidates.choose(rng).map(|w| (*w).clone())
    }
}

/// At least four letters, ASCII letters only, and no run of two capitals
/// (acronyms read badly once lowercased)
pub fn is_good_word(word: &str) -> bool {
    if word.chars().count() < MIN_WORD_LEN {
        return false;
    }
    if !word.chars().all(|c| c.is_ascii_alphabetic()) {
        return false;
    }
    !word
        .as_bytes()
        .windows(2)
        .any(|pair| pair[0].is_ascii_uppercase() && pair[1].is_ascii_uppercase())
}
