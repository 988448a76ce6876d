//! Per-frame simulation tick
//!
//! Core game loop step: physics, camera, terminal check, platform upkeep,
//! score and particles, in that order.

use super::state::{GamePhase, GameState};
use super::{camera, effects, generator, physics};
use crate::consts::MAX_FRAME_DT;

/// What happened during a tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickOutcome {
    /// The tick ran (state was Active and `dt` was usable)
    pub stepped: bool,
    /// This tick moved the game into GameOver
    pub game_over: bool,
}

/// Clamp a raw frame delta into a usable step
///
/// Returns `None` for zero, negative or non-finite deltas.
pub fn sanitize_dt(dt: f32) -> Option<f32> {
    if dt.is_finite() && dt > 0.0 {
        Some(dt.min(MAX_FRAME_DT))
    } else {
        None
    }
}

/// Advance the game state by one frame of `dt` seconds
pub fn tick(state: &mut GameState, dt: f32) -> TickOutcome {
    if state.phase == GamePhase::GameOver {
        return TickOutcome::default();
    }
    let Some(dt) = sanitize_dt(dt) else {
        return TickOutcome::default();
    };

    physics::step(state, dt);
    camera::follow(state);

    let screen_y = state.player_screen_y();
    let game_over = screen_y > state.viewport.height || screen_y < 0.0;
    if game_over {
        state.phase = GamePhase::GameOver;
        log::info!("Game over at score {}", state.score());
    }

    camera::settle(state);

    generator::top_up(state);
    generator::prune(state);

    if state.player.pos.y < state.highest_y {
        state.highest_y = state.player.pos.y;
    }

    effects::age(&mut state.particles, dt);

    TickOutcome {
        stepped: true,
        game_over,
    }
}
