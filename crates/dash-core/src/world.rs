//! The world step: one fixed-time advance of the run.
//!
//! Resolution order within a step:
//! 1. jump (only while grounded)
//! 2. gravity integration
//! 3. level scroll
//! 4. ground clamp
//! 5. solid blocks, in level order
//! 6. level completion
//! 7. spikes

use crate::game::{GameState, Player, SolidBlock, Spike};
use crate::input::InputState;

/// How far above a block top the player's previous bottom may be and still
/// count as landing on it.
pub const LANDING_TOLERANCE: f32 = 1e-3;

/// What killed the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Death {
    Spike,
    /// Ran into the side of a solid block.
    Solid,
}

/// Result of a single world step.
#[derive(Debug, Clone, PartialEq)]
pub enum StepOutcome {
    Running(GameState),
    Died(Death),
    Completed,
}

impl StepOutcome {
    pub fn is_running(&self) -> bool {
        matches!(self, Self::Running(_))
    }
}

/// Strict AABB overlap; touching edges do not count.
fn overlaps(p: &Player, x: f32, y: f32, w: f32, h: f32) -> bool {
    p.x < x + w && p.x + p.size > x && p.y < y + h && p.y + p.size > y
}

/// Advances `state` by `dt` seconds.
pub fn step(state: &GameState, input: InputState, dt: f32) -> StepOutcome {
    let physics = &state.physics;
    let prev = state.player;
    let mut player = state.player;

    if input.jump_pressed && player.on_ground {
        player.vy = physics.jump_velocity;
    }

    player.vy += physics.gravity * dt;
    player.y += player.vy * dt;
    player.on_ground = false;

    let dx = physics.scroll_speed * dt;
    let spikes: Vec<Spike> = state
        .spikes
        .iter()
        .map(|s| Spike { x: s.x - dx, ..*s })
        .collect();
    let solids: Vec<SolidBlock> = state
        .solids
        .iter()
        .map(|b| SolidBlock { x: b.x - dx, ..*b })
        .collect();
    let level_scrolled = state.level_scrolled + dx;

    let ground_top = physics.ground_y - player.size;
    if player.y >= ground_top {
        player.y = ground_top;
        player.vy = 0.0;
        player.on_ground = true;
    }

    for block in &solids {
        if !overlaps(&player, block.x, block.y, block.w, block.h) {
            continue;
        }
        if prev.bottom() <= block.y + LANDING_TOLERANCE && player.vy >= 0.0 {
            player.y = block.y - player.size;
            player.vy = 0.0;
            player.on_ground = true;
        } else if prev.y >= block.y + block.h - LANDING_TOLERANCE && player.vy < 0.0 {
            player.y = block.y + block.h;
            player.vy = 0.0;
        } else {
            tracing::debug!(frame = state.frame, x = block.x, y = block.y, "Player hit a solid block");
            return StepOutcome::Died(Death::Solid);
        }
    }

    let next = GameState {
        player,
        physics: state.physics.clone(),
        level: state.level.clone(),
        level_scrolled,
        spikes,
        solids,
        frame: state.frame + 1,
    };

    if next.level_end_x() <= next.player.x {
        tracing::debug!(frame = next.frame, "Level completed");
        return StepOutcome::Completed;
    }

    if next
        .spikes
        .iter()
        .any(|s| overlaps(&next.player, s.x, s.y, s.size, s.size))
    {
        tracing::debug!(frame = next.frame, "Player hit a spike");
        return StepOutcome::Died(Death::Spike);
    }

    StepOutcome::Running(next)
}
