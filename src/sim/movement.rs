//! Surface-constrained movement
//!
//! Webs are elliptical, so a diagonal step near a web's rim often lands just
//! outside it while one of its axis components stays on. Trying the diagonal,
//! then X alone, then Y alone lets the spider slide along the rim instead of
//! sticking.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Which way a sprite faces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Facing {
    #[default]
    Left,
    Right,
}

impl Facing {
    /// Facing after a horizontal step; a zero step keeps the current facing
    pub fn after_step(self, dx: f32) -> Self {
        if dx > 0.0 {
            Facing::Right
        } else if dx < 0.0 {
            Facing::Left
        } else {
            self
        }
    }
}

/// Axis-aligned world extent (inclusive)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Vec2,
    pub max: Vec2,
}

impl Bounds {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            min: Vec2::ZERO,
            max: Vec2::new(width, height),
        }
    }

    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) / 2.0
    }
}

/// Outcome of a movement request
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveResult {
    pub pos: Vec2,
    /// False when every candidate was rejected (or nothing was requested)
    pub moved: bool,
    pub facing: Facing,
}

/// Resolve a requested step against a walkability predicate.
///
/// Candidates in precedence order: full step, X only, Y only. The first that
/// is walkable and in bounds wins; if none is, the position is unchanged.
pub fn resolve_move(
    pos: Vec2,
    delta: Vec2,
    facing: Facing,
    is_walkable: impl Fn(Vec2) -> bool,
    bounds: &Bounds,
) -> MoveResult {
    let facing = facing.after_step(delta.x);
    if delta == Vec2::ZERO {
        return MoveResult {
            pos,
            moved: false,
            facing,
        };
    }

    let candidates = [
        pos + delta,
        Vec2::new(pos.x + delta.x, pos.y),
        Vec2::new(pos.x, pos.y + delta.y),
    ];
    let accepted = candidates
        .into_iter()
        .filter(|&c| c != pos)
        .find(|&c| bounds.contains(c) && is_walkable(c));

    match accepted {
        Some(new_pos) => MoveResult {
            pos: new_pos,
            moved: true,
            facing,
        },
        None => MoveResult {
            pos,
            moved: false,
            facing,
        },
    }
}
