//! Slingshot launch control
//!
//! The player drags away from the direction they want to fly; releasing
//! turns the drag vector (start - current) into a launch velocity.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::effects;
use super::state::GameState;
use crate::consts::*;

/// A drag in progress, in world coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragGesture {
    pub start: Vec2,
    pub current: Vec2,
}

impl DragGesture {
    pub fn new(at: Vec2) -> Self {
        Self { start: at, current: at }
    }

    /// Launch direction vector: from the current point back to the start
    pub fn pull(&self) -> Vec2 {
        self.start - self.current
    }

    pub fn aim(&self) -> AimPreview {
        AimPreview::from_pull(self.pull())
    }
}

/// Rocket sprite size shown while aiming
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RocketSize {
    Short,
    Medium,
    Large,
}

/// What the rendering layer needs to draw an aim in progress
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AimPreview {
    /// Drag length (pixels)
    pub magnitude: f32,
    pub size: RocketSize,
    /// Sprite rotation (radians, 0 = pointing up)
    pub draw_angle: f32,
}

impl AimPreview {
    pub fn from_pull(pull: Vec2) -> Self {
        let magnitude = pull.length();
        let size = if magnitude < AIM_MEDIUM_DRAG {
            RocketSize::Short
        } else if magnitude < AIM_LARGE_DRAG {
            RocketSize::Medium
        } else {
            RocketSize::Large
        };
        let draw_angle = if magnitude < AIM_MIN_DRAG {
            0.0
        } else {
            pull.y.atan2(pull.x) + std::f32::consts::FRAC_PI_2
        };
        Self {
            magnitude,
            size,
            draw_angle,
        }
    }
}

/// Turn a drag vector into a launch velocity
///
/// Returns `None` inside the dead zone. The result never exceeds
/// `MAX_VELOCITY` and keeps the drag direction.
pub fn launch_velocity(pull: Vec2, power: f32) -> Option<Vec2> {
    if !pull.is_finite() || pull.length() < DRAG_DEAD_ZONE {
        return None;
    }
    Some((pull * power).clamp_length_max(MAX_VELOCITY))
}

/// Release a drag: launch the rocket if the gesture qualifies
///
/// Returns `true` when the rocket took off.
pub fn release(state: &mut GameState, gesture: DragGesture, power: f32) -> bool {
    if state.is_over() || !state.player.grounded {
        return false;
    }
    let Some(vel) = launch_velocity(gesture.pull(), power) else {
        log::trace!("Drag of {:.1}px ignored", gesture.pull().length());
        return false;
    };

    state.player.launch(vel);
    effects::burst(
        &mut state.particles,
        &mut state.fx_rng,
        state.player.pos,
        LAUNCH_PARTICLES,
        state.particle_cap,
    );
    log::debug!("Launch vx={:.0} vy={:.0}", vel.x, vel.y);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::Viewport;

    #[test]
    fn test_straight_down_drag_launches_up() {
        let gesture = DragGesture {
            start: Vec2::new(100.0, 500.0),
            current: Vec2::new(100.0, 550.0),
        };
        let vel = launch_velocity(gesture.pull(), DESKTOP_LAUNCH_POWER).unwrap();
        assert_eq!(vel.x, 0.0);
        assert!(vel.y < 0.0);
        // 50px * 20 = 1000, under the cap
        assert!((vel.y + 1000.0).abs() < 1e-3);

        let vel = launch_velocity(gesture.pull(), TOUCH_LAUNCH_POWER).unwrap();
        assert!((vel.y + 500.0).abs() < 1e-3);
    }

    #[test]
    fn test_dead_zone() {
        assert!(launch_velocity(Vec2::new(6.0, 7.0), DESKTOP_LAUNCH_POWER).is_none());
        assert!(launch_velocity(Vec2::new(0.0, 10.0), DESKTOP_LAUNCH_POWER).is_some());
        assert!(launch_velocity(Vec2::new(f32::NAN, 50.0), DESKTOP_LAUNCH_POWER).is_none());
    }

    #[test]
    fn test_velocity_clamped_preserving_direction() {
        let pull = Vec2::new(300.0, -400.0);
        let vel = launch_velocity(pull, DESKTOP_LAUNCH_POWER).unwrap();
        assert!((vel.length() - MAX_VELOCITY).abs() < 0.01);
        let dir = vel.normalize();
        assert!((dir - pull.normalize()).length() < 1e-5);
    }

    #[test]
    fn test_aim_preview_sizes() {
        assert_eq!(AimPreview::from_pull(Vec2::new(0.0, 20.0)).size, RocketSize::Short);
        assert_eq!(AimPreview::from_pull(Vec2::new(0.0, 50.0)).size, RocketSize::Medium);
        assert_eq!(AimPreview::from_pull(Vec2::new(0.0, 80.0)).size, RocketSize::Large);
        assert_eq!(AimPreview::from_pull(Vec2::new(1.0, 1.0)).draw_angle, 0.0);

        // Pull straight up (negative y) draws the rocket pointing up
        let up = AimPreview::from_pull(Vec2::new(0.0, -50.0));
        assert!(up.draw_angle.abs() < 1e-6);
    }

    #[test]
    fn test_release_launches_grounded_rocket() {
        let mut state = GameState::new(5, Viewport::new(400.0, 800.0, 1.0));
        let gesture = DragGesture {
            start: Vec2::new(100.0, 500.0),
            current: Vec2::new(100.0, 550.0),
        };
        assert!(release(&mut state, gesture, DESKTOP_LAUNCH_POWER));
        assert!(!state.player.grounded);
        assert_eq!(state.player.attached, None);
        assert!(state.player.vel.y < 0.0);
        assert!((state.player.angle + std::f32::consts::FRAC_PI_2).abs() < 1e-6);
        assert_eq!(state.particles.len(), LAUNCH_PARTICLES);

        // Already airborne: a second release does nothing
        let vel = state.player.vel;
        assert!(!release(&mut state, gesture, DESKTOP_LAUNCH_POWER));
        assert_eq!(state.player.vel, vel);
    }

    #[test]
    fn test_release_in_dead_zone_keeps_rocket_grounded() {
        let mut state = GameState::new(5, Viewport::new(400.0, 800.0, 1.0));
        let gesture = DragGesture {
            start: Vec2::new(100.0, 500.0),
            current: Vec2::new(103.0, 505.0),
        };
        assert!(!release(&mut state, gesture, DESKTOP_LAUNCH_POWER));
        assert!(state.player.grounded);
        assert!(state.particles.is_empty());
    }
}
