//! Procedural platform placement
//!
//! Platforms are laid out bottom-up with a gap that widens and a width that
//! shrinks as the score grows. Past `MOVING_PLATFORM_SCORE` some of them
//! start sliding sideways.

use rand::Rng;

use super::state::{GameState, Platform};
use crate::consts::*;

/// Vertical distance between consecutive platforms at `score`
pub fn platform_gap(score: u64) -> f32 {
    BASE_PLATFORM_GAP + score as f32 / 200.0
}

/// Platform width at `score`
pub fn platform_width(score: u64) -> f32 {
    (BASE_PLATFORM_WIDTH - score as f32 / 100.0).max(MIN_PLATFORM_WIDTH)
}

/// Fill the screen above the start platform
pub fn initial_layout(state: &mut GameState) {
    let Some(first) = state.platforms.first() else {
        return;
    };
    let score = state.score();
    let gap = platform_gap(score);
    let mut y = first.top() - gap;

    while y > INITIAL_LAYOUT_CEILING {
        let width = platform_width(score);
        let x = random_x(state, width);
        let id = state.next_platform_id();
        state.platforms.push(Platform::new(id, x, y, width));
        y -= gap;
    }
}

/// Extend the platform sequence up to `GENERATE_AHEAD` above the camera
///
/// Calling it again without moving the camera adds nothing.
pub fn top_up(state: &mut GameState) {
    let camera_y = state.camera_y;
    let score = state.score();

    let mut highest = state
        .platforms
        .iter()
        .map(|p| p.top())
        .filter(|&y| y < camera_y)
        .fold(camera_y, f32::min);

    let mut added = 0usize;
    while highest > camera_y - GENERATE_AHEAD {
        highest -= platform_gap(score);
        let width = platform_width(score);
        let x = random_x(state, width);
        let id = state.next_platform_id();

        let platform = if score >= MOVING_PLATFORM_SCORE && state.rng.random_bool(MOVING_PLATFORM_CHANCE) {
            let dir = if state.rng.random_bool(0.5) { -1.0 } else { 1.0 };
            let speed = state
                .rng
                .random_range(MOVING_PLATFORM_MIN_SPEED..MOVING_PLATFORM_MAX_SPEED);
            Platform::moving(id, x, highest, width, dir * speed)
        } else {
            Platform::new(id, x, highest, width)
        };
        state.platforms.push(platform);
        added += 1;
    }

    if added > 0 {
        log::trace!("Generated {} platforms above y={}", added, highest);
    }
}

/// Drop platforms that scrolled below the viewport
pub fn prune(state: &mut GameState) {
    let limit = state.camera_y + state.viewport.height + PRUNE_MARGIN;
    state.platforms.retain(|p| p.top() < limit);
}

fn random_x(state: &mut GameState, width: f32) -> f32 {
    let span = (state.viewport.width - width).max(0.0);
    state.rng.random::<f32>() * span
}
