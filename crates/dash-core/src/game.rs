//! Immutable play state and its construction from a level.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::level::{Level, ObjectKind};

/// Physics and layout constants, in pixels and seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Edge length of a grid cell and of the player square.
    pub cell_size: f32,
    /// Y coordinate of the ground surface (y grows downward).
    pub ground_y: f32,
    /// Downward acceleration.
    pub gravity: f32,
    /// Vertical velocity applied on jump (negative is up).
    pub jump_velocity: f32,
    /// Leftward scroll speed of the level.
    pub scroll_speed: f32,
    /// Fixed horizontal position of the player.
    pub player_x: f32,
    /// Screen x of the level's first column before any scrolling.
    pub level_start_x: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            cell_size: 32.0,
            ground_y: 380.0,
            gravity: 2000.0,
            jump_velocity: -700.0,
            scroll_speed: 260.0,
            player_x: 120.0,
            level_start_x: 820.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub x: f32,
    pub y: f32,
    pub vy: f32,
    pub size: f32,
    pub on_ground: bool,
}

impl Player {
    pub fn bottom(&self) -> f32 {
        self.y + self.size
    }
}

/// A hazard in screen space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Spike {
    pub x: f32,
    pub y: f32,
    pub size: f32,
}

/// A solid block in screen space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolidBlock {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

/// Snapshot of a run. Never mutated; [`crate::world::step`] builds a new one.
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub player: Player,
    pub physics: PhysicsConfig,
    pub level: Arc<Level>,
    /// Horizontal distance the level has moved left so far.
    pub level_scrolled: f32,
    pub spikes: Vec<Spike>,
    pub solids: Vec<SolidBlock>,
    pub frame: u64,
}

impl GameState {
    /// Lays out `level` in screen space and places the player at the start.
    #[allow(clippy::cast_precision_loss)]
    pub fn from_level(level: Arc<Level>, physics: &PhysicsConfig) -> Self {
        let cell = physics.cell_size;
        let bottom_row = (level.height_cells - 1) as f32;

        let mut spikes = Vec::new();
        let mut solids = Vec::new();

        for obj in &level.objects {
            let x = physics.level_start_x + obj.x as f32 * cell;
            // Row `height - 1` rests on the ground.
            let y = (physics.ground_y - cell) - (bottom_row - obj.y as f32) * cell;

            match obj.kind {
                ObjectKind::Spike => spikes.push(Spike { x, y, size: cell }),
                ObjectKind::Solid => solids.push(SolidBlock {
                    x,
                    y,
                    w: obj.w as f32 * cell,
                    h: obj.h as f32 * cell,
                }),
                ObjectKind::Other(_) => {}
            }
        }

        Self {
            player: Player {
                x: physics.player_x,
                y: 0.0,
                vy: 0.0,
                size: cell,
                on_ground: false,
            },
            physics: physics.clone(),
            level,
            level_scrolled: 0.0,
            spikes,
            solids,
            frame: 0,
        }
    }

    /// Screen x of the level's end after the current scroll.
    #[allow(clippy::cast_precision_loss)]
    pub fn level_end_x(&self) -> f32 {
        let length_px = self.level.length_cells as f32 * self.physics.cell_size;
        self.physics.level_start_x + length_px - self.level_scrolled
    }

    /// Fraction of the level scrolled past the player, in `0.0..=1.0`.
    pub fn progress(&self) -> f32 {
        let total = self.level_end_x() + self.level_scrolled - self.player.x;
        if total <= 0.0 {
            return 1.0;
        }
        (self.level_scrolled / total).clamp(0.0, 1.0)
    }

    /// Computes a deterministic hash of the dynamic state.
    pub fn compute_hash(&self) -> u64 {
        let mut hasher = DefaultHasher::new();

        self.frame.hash(&mut hasher);
        hash_f32(self.level_scrolled, &mut hasher);

        let p = &self.player;
        hash_f32(p.x, &mut hasher);
        hash_f32(p.y, &mut hasher);
        hash_f32(p.vy, &mut hasher);
        p.on_ground.hash(&mut hasher);

        for s in &self.spikes {
            hash_f32(s.x, &mut hasher);
            hash_f32(s.y, &mut hasher);
        }
        for s in &self.solids {
            hash_f32(s.x, &mut hasher);
            hash_f32(s.y, &mut hasher);
        }

        hasher.finish()
    }
}

/// Hashes a f32 value by converting to bits.
fn hash_f32(value: f32, hasher: &mut impl Hasher) {
    value.to_bits().hash(hasher);
}
