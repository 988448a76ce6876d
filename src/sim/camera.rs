//! Vertical scroll-follow

use super::state::GameState;
use crate::consts::CAMERA_EASE;
use crate::lerp;

/// Keep the rocket at or below the middle of the screen
///
/// Hard snap: easing here would let a fast rocket leave the top of the view.
pub fn follow(state: &mut GameState) {
    let center = state.viewport.center_y();
    if state.player.pos.y - state.camera_y < center {
        state.camera_y = state.player.pos.y - center;
    }
}

/// Ease back down once the rocket rests below its start height on screen
pub fn settle(state: &mut GameState) {
    if !state.player.grounded {
        return;
    }
    if state.player.pos.y - state.camera_y > state.start_y {
        let target = state.player.pos.y - state.start_y;
        state.camera_y = lerp(state.camera_y, target, CAMERA_EASE);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::Viewport;
    use glam::Vec2;

    fn state() -> GameState {
        GameState::new(1, Viewport::new(400.0, 800.0, 1.0))
    }

    #[test]
    fn test_follow_snaps_when_above_center() {
        let mut state = state();
        state.player.pos.y = 100.0;
        follow(&mut state);
        assert_eq!(state.camera_y, 100.0 - 400.0);
        assert_eq!(state.player_screen_y(), 400.0);
    }

    #[test]
    fn test_follow_ignores_rocket_below_center() {
        let mut state = state();
        state.player.pos.y = 700.0;
        follow(&mut state);
        assert_eq!(state.camera_y, 0.0);
    }

    #[test]
    fn test_settle_eases_toward_start_height() {
        let mut state = state();
        state.camera_y = -1000.0;
        state.player.pos = Vec2::new(200.0, -300.0);
        assert!(state.player.grounded);

        // Screen y 700 > start 600, target camera = -300 - 600 = -900
        settle(&mut state);
        assert!((state.camera_y - (-990.0)).abs() < 1e-3);

        for _ in 0..200 {
            settle(&mut state);
        }
        assert!((state.camera_y - (-900.0)).abs() < 0.01);
    }

    #[test]
    fn test_settle_skipped_while_airborne() {
        let mut state = state();
        state.camera_y = -1000.0;
        state.player.pos = Vec2::new(200.0, -300.0);
        state.player.launch(Vec2::new(0.0, 100.0));
        settle(&mut state);
        assert_eq!(state.camera_y, -1000.0);
    }
}
