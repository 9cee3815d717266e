//! Score, typing misses and health

use serde::{Deserialize, Serialize};

use crate::consts::TICKS_PER_SECOND;

/// Running score in standard words (five characters each)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Score {
    pub score: f32,
    pub misses: u32,
}

impl Score {
    pub fn increase(&mut self, value: f32) {
        self.score += value;
    }

    /// Count one mistyped character
    pub fn miss(&mut self) {
        self.misses += 1;
    }

    /// Words per minute over `elapsed_ticks` of play (at least one second)
    pub fn wpm(&self, elapsed_ticks: u64) -> f32 {
        let secs = (elapsed_ticks / TICKS_PER_SECOND as u64).max(1) as f32;
        self.score * 60.0 / secs
    }

    /// Difficulty level driving the spawn cadence
    pub fn level(&self) -> u32 {
        (self.score / 10.0).floor() as u32 + 5
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Health {
    current: u8,
    max: u8,
}

impl Health {
    pub fn new(max: u8) -> Self {
        Self { current: max, max }
    }

    /// Heal, never above the maximum
    pub fn increase(&mut self) {
        self.current = self.current.saturating_add(1).min(self.max);
    }

    /// Take one point of damage, never below zero
    pub fn decrease(&mut self) {
        self.current = self.current.saturating_sub(1);
    }

    #[inline]
    pub fn value(&self) -> u8 {
        self.current
    }

    #[inline]
    pub fn max(&self) -> u8 {
        self.max
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.current == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wpm_counts_whole_seconds() {
        let score = Score {
            score: 10.0,
            misses: 0,
        };
        // One minute of play
        assert_eq!(score.wpm(3600), 10.0);
        // Under a second counts as one second
        assert_eq!(score.wpm(0), 600.0);
        assert_eq!(score.wpm(59), 600.0);
        // Two and a half seconds count as two
        assert_eq!(score.wpm(150), 300.0);
    }

    #[test]
    fn test_level_grows_every_ten_words() {
        let mut score = Score::default();
        assert_eq!(score.level(), 5);
        score.increase(9.8);
        assert_eq!(score.level(), 5);
        score.increase(0.4);
        assert_eq!(score.level(), 6);
    }

    #[test]
    fn test_health_is_bounded() {
        let mut health = Health::new(3);
        health.increase();
        assert_eq!(health.value(), 3);
        for _ in 0..5 {
            health.decrease();
        }
        assert_eq!(health.value(), 0);
        assert!(health.is_empty());
        health.increase();
        assert_eq!(health.value(), 1);
    }
}
