//! Abstract key events delivered by the input collaborator

use serde::{Deserialize, Serialize};

use super::anim::Facing;
use super::word::{SHIFTED_SPECIALS, SPECIALS};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyEvent {
    /// A word character, already lowercased
    Letter(char),
    /// A jump symbol, already translated to its shifted variant if shift was held
    Special(char),
    DirectionDown(Facing),
    DirectionUp(Facing),
    /// Reverse travel, or jump in free-movement mode
    Space,
    /// Drop the current typing target
    Unselect,
    ToggleFreeMovement,
    /// Leave the challenge interstitial
    Confirm,
}

impl KeyEvent {
    /// Classify a typed character. Characters that are neither letters nor
    /// jump symbols yield `None`.
    pub fn from_char(c: char, shift: bool) -> Option<Self> {
        if c.is_ascii_alphabetic() {
            return Some(KeyEvent::Letter(c.to_ascii_lowercase()));
        }
        if shift {
            if let Some(shifted) = shift_special(c) {
                return Some(KeyEvent::Special(shifted));
            }
        }
        if SPECIALS.contains(c) || SHIFTED_SPECIALS.contains(c) {
            return Some(KeyEvent::Special(c));
        }
        None
    }
}

/// Shifted variant of an unshifted jump symbol
pub fn shift_special(c: char) -> Option<char> {
    let index = SPECIALS.chars().position(|s| s == c)?;
    SHIFTED_SPECIALS.chars().nth(index)
}
