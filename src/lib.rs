//! Rocket Launch - a drag-to-launch rocket platformer
//!
//! Core modules:
//! - `sim`: Simulation (physics, collisions, platform generation, camera)
//! - `theme`: Score-driven color palettes and their transitions
//! - `session`: The `GameSession` aggregate handed to the shell each frame
//! - `platform`: Clock and frame scheduling abstraction
//! - `settings`: Player preferences
//! - `highscores`: Local leaderboard

pub mod highscores;
pub mod platform;
pub mod session;
pub mod settings;
pub mod sim;
pub mod theme;

pub use highscores::HighScores;
pub use session::{GameSession, ScoreSink, View};
pub use settings::{InputProfile, QualityPreset, Settings};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Downward acceleration applied to the airborne rocket (pixels/s²)
    pub const GRAVITY: f32 = 3000.0;
    /// Largest launch speed (pixels/s)
    pub const MAX_VELOCITY: f32 = 3000.0;
    /// Longest frame step accepted; longer stalls (tab resume) are clamped
    pub const MAX_FRAME_DT: f32 = 1.0 / 15.0;

    /// Distance kept between the rocket and the left/right world edges
    pub const WALL_MARGIN: f32 = 25.0;
    /// Horizontal speed kept after bouncing off a wall
    pub const WALL_RESTITUTION: f32 = 0.8;

    /// Platform defaults
    pub const PLATFORM_HEIGHT: f32 = 10.0;
    pub const START_PLATFORM_WIDTH: f32 = 100.0;
    /// Start height above the bottom of the viewport
    pub const START_HEIGHT: f32 = 200.0;
    pub const BASE_PLATFORM_WIDTH: f32 = 100.0;
    pub const MIN_PLATFORM_WIDTH: f32 = 40.0;
    pub const BASE_PLATFORM_GAP: f32 = 80.0;
    /// Initial layout stops this close to the top of the world
    pub const INITIAL_LAYOUT_CEILING: f32 = 20.0;
    /// How far above the camera top platforms are kept generated
    pub const GENERATE_AHEAD: f32 = 300.0;
    /// Extra room below the viewport before a platform is dropped
    pub const PRUNE_MARGIN: f32 = 40.0;

    /// Moving platforms
    pub const MOVING_PLATFORM_SCORE: u64 = 2500;
    pub const MOVING_PLATFORM_CHANCE: f64 = 0.1;
    pub const MOVING_PLATFORM_MIN_SPEED: f32 = 50.0;
    pub const MOVING_PLATFORM_MAX_SPEED: f32 = 100.0;

    /// Drag gestures shorter than this are ignored (pixels)
    pub const DRAG_DEAD_ZONE: f32 = 10.0;
    /// Launch power (velocity per pixel of drag)
    pub const DESKTOP_LAUNCH_POWER: f32 = 20.0;
    pub const TOUCH_LAUNCH_POWER: f32 = 10.0;
    /// Aim preview thresholds (pixels of drag)
    pub const AIM_MEDIUM_DRAG: f32 = 35.0;
    pub const AIM_LARGE_DRAG: f32 = 70.0;
    pub const AIM_MIN_DRAG: f32 = 5.0;

    /// Camera easing factor per frame when settling back down
    pub const CAMERA_EASE: f32 = 0.1;

    /// Particle bursts
    pub const LAUNCH_PARTICLES: usize = 20;
    pub const LANDING_PARTICLES: usize = 15;
    pub const BOUNCE_PARTICLES: usize = 10;
    pub const PARTICLE_LIFE: f32 = 0.35;
    pub const PARTICLE_MAX_SPEED: f32 = 300.0;

    /// Score span covered by each color theme
    pub const THEME_SCORE_GAP: u64 = 3000;
    /// Theme transition duration (milliseconds)
    pub const THEME_TRANSITION_MS: f64 = 1000.0;
}

/// Linear interpolation between `a` and `b`
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Facing angle of a velocity vector (radians, screen coordinates)
#[inline]
pub fn heading(vel: Vec2) -> f32 {
    vel.y.atan2(vel.x)
}

