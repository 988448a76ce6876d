//! Collision detection for the rocket
//!
//! Two kinds of contact: the left/right world walls, and the top edge of a
//! platform crossed while falling.

use glam::Vec2;

use super::state::Platform;
use crate::consts::{WALL_MARGIN, WALL_RESTITUTION};

/// Which wall the rocket hit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wall {
    Left,
    Right,
}

/// Result of a wall check
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WallHit {
    pub wall: Wall,
    /// Position clamped onto the wall bound
    pub pos: Vec2,
    /// Reflected, damped velocity
    pub vel: Vec2,
}

/// Check the rocket against the horizontal world bounds
///
/// Returns `None` when the rocket is inside `[WALL_MARGIN, width - WALL_MARGIN]`.
pub fn wall_collision(pos: Vec2, vel: Vec2, world_width: f32) -> Option<WallHit> {
    let right = world_width - WALL_MARGIN;
    let (wall, x) = if pos.x < WALL_MARGIN {
        (Wall::Left, WALL_MARGIN)
    } else if pos.x > right {
        (Wall::Right, right)
    } else {
        return None;
    };

    Some(WallHit {
        wall,
        pos: Vec2::new(x, pos.y),
        vel: Vec2::new(-vel.x * WALL_RESTITUTION, vel.y),
    })
}

/// Find the platform whose top edge the rocket crossed between `old_y` and
/// `new_y` while over its span.
///
/// Platforms are checked in collection order and the first match wins, even
/// if a later platform has the same top.
pub fn find_landing(platforms: &[Platform], x: f32, old_y: f32, new_y: f32) -> Option<usize> {
    platforms.iter().position(|plat| {
        let top = plat.top();
        old_y <= top && new_y >= top && plat.spans(x)
    })
}
