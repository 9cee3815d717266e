//! Frame-timed animation counters
//!
//! An [`Anim`] only tracks which frame of a strip is showing; the
//! renderer maps `(key, frame, facing)` to an image.

use std::collections::HashMap;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::state::SimRng;
use crate::assets::{AnimKey, AnimSpec, AssetRegistry};

/// Which way a sprite faces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

impl Facing {
    pub fn flipped(self) -> Self {
        match self {
            Facing::Left => Facing::Right,
            Facing::Right => Facing::Left,
        }
    }

    /// -1 for left, +1 for right
    pub fn sign(self) -> f32 {
        match self {
            Facing::Left => -1.0,
            Facing::Right => 1.0,
        }
    }
}

/// Playback state of one animation strip
#[derive(Debug, Clone)]
pub struct Anim {
    pub key: AnimKey,
    spec: AnimSpec,
    /// Ticks to wait before the first frame shows
    delay: u32,
    /// Draw offset relative to the owner (explosion bursts)
    pub offset: Vec2,
    ticks: u32,
    frame: usize,
    finished: bool,
}

impl Anim {
    pub fn new(key: AnimKey, assets: &AssetRegistry) -> Self {
        Self {
            key,
            spec: assets.spec(key),
            delay: 0,
            offset: Vec2::ZERO,
            ticks: 0,
            frame: 0,
            finished: false,
        }
    }

    /// Copy of this strip that starts after `delay` ticks at `offset`
    pub fn delayed(&self, delay: u32, offset: Vec2) -> Self {
        Self {
            delay,
            offset,
            ticks: 0,
            frame: 0,
            finished: false,
            ..self.clone()
        }
    }

    pub fn reset(&mut self) {
        self.ticks = 0;
        self.frame = 0;
        self.finished = false;
    }

    pub fn tick(&mut self) {
        if self.finished {
            return;
        }
        if self.delay > 0 {
            self.delay -= 1;
            return;
        }
        self.ticks += 1;

        let hold = self.spec.frame_ticks.get(self.frame).copied().unwrap_or(1).max(1);
        if self.ticks % hold == 0 {
            let last = self.spec.frame_ticks.len().saturating_sub(1);
            if self.spec.ends && self.frame >= last {
                self.finished = true;
            } else {
                self.frame = (self.frame + 1) % self.spec.frame_ticks.len().max(1);
                self.ticks = 0;
            }
        }
    }

    /// Ticks from now until a one-shot strip has played out, including delay
    pub fn total_time(&self) -> u32 {
        self.spec.duration() + self.delay
    }

    #[inline]
    pub fn frame(&self) -> usize {
        self.frame
    }

    /// True while the strip is still waiting out its start delay
    #[inline]
    pub fn waiting(&self) -> bool {
        self.delay > 0
    }

    #[inline]
    pub fn finished(&self) -> bool {
        self.finished
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        self.spec.size
    }
}

/// What the renderer needs to draw one strip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnimView {
    pub key: AnimKey,
    pub frame: usize,
    pub facing: Facing,
}

/// The strips an entity can show, one of them current.
/// Each strip keeps its own frame counter across switches.
#[derive(Debug, Clone)]
pub struct AnimSet {
    anims: HashMap<AnimKey, Anim>,
    current: AnimKey,
    facing: Facing,
}

impl AnimSet {
    pub fn new(keys: &[AnimKey], initial: AnimKey, assets: &AssetRegistry) -> Self {
        let anims = keys
            .iter()
            .chain(std::iter::once(&initial))
            .map(|&key| (key, Anim::new(key, assets)))
            .collect();
        Self {
            anims,
            current: initial,
            facing: Facing::Right,
        }
    }

    /// Switch strips; unknown keys are ignored
    pub fn set(&mut self, key: AnimKey, facing: Facing) {
        if self.anims.contains_key(&key) {
            self.current = key;
        }
        self.facing = facing;
    }

    pub fn reset(&mut self, key: AnimKey) {
        if let Some(anim) = self.anims.get_mut(&key) {
            anim.reset();
        }
    }

    pub fn tick(&mut self) {
        if let Some(anim) = self.anims.get_mut(&self.current) {
            anim.tick();
        }
    }

    #[inline]
    pub fn current(&self) -> AnimKey {
        self.current
    }

    /// Bounds of the current strip
    pub fn size(&self) -> Vec2 {
        self.anims
            .get(&self.current)
            .map(Anim::size)
            .unwrap_or(Vec2::splat(16.0))
    }

    pub fn view(&self) -> AnimView {
        AnimView {
            key: self.current,
            frame: self.anims.get(&self.current).map(Anim::frame).unwrap_or(0),
            facing: self.facing,
        }
    }
}

/// Several staggered explosion bursts played over a dying opponent
#[derive(Debug, Clone)]
pub struct Explosion {
    pub bursts: Vec<Anim>,
}

/// Ticks between consecutive bursts
const BURST_STAGGER: u32 = 5;
/// Maximum burst offset from the opponent, per axis
const BURST_SPREAD: i32 = 20;

impl Explosion {
    pub fn new(bursts: u32, assets: &AssetRegistry, rng: &mut SimRng) -> Self {
        let base = Anim::new(AnimKey::Explosion, assets);
        let bursts = (0..bursts)
            .map(|i| {
                let offset = Vec2::new(
                    rng.random_range(-BURST_SPREAD..=BURST_SPREAD) as f32,
                    rng.random_range(-BURST_SPREAD..=BURST_SPREAD) as f32,
                );
                base.delayed(i * BURST_STAGGER, offset)
            })
            .collect();
        Self { bursts }
    }

    /// Ticks until the last burst finishes
    pub fn total_time(&self) -> u32 {
        self.bursts.iter().map(Anim::total_time).max().unwrap_or(0)
    }

    pub fn tick(&mut self) {
        for burst in &mut self.bursts {
            burst.tick();
        }
    }
}
