//! Simulation module
//!
//! All gameplay logic lives here. This module stays pure:
//! - Seeded RNG only
//! - Stable iteration order (platforms in generation order)
//! - No rendering or platform dependencies

pub mod camera;
pub mod collision;
pub mod effects;
pub mod generator;
pub mod launch;
pub mod physics;
pub mod state;
pub mod tick;

pub use collision::{Wall, WallHit, find_landing, wall_collision};
pub use launch::{AimPreview, DragGesture, RocketSize, launch_velocity};
pub use state::{
    GamePhase, GameState, Particle, Platform, PlatformId, PlatformSkin, Player, Viewport,
};
pub use tick::{TickOutcome, sanitize_dt, tick};
