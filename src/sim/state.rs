//! Game state and core simulation types
//!
//! Everything a session mutates per frame lives here. Platforms are kept in
//! generation order, which landing detection relies on.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::heading;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Rocket in play
    Active,
    /// Rocket left the screen; only a reset leaves this phase
    GameOver,
}

/// Identifier of a platform in the active collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlatformId(pub u32);

/// The rocket
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Facing angle (radians), `atan2(vy, vx)` while airborne
    pub angle: f32,
    /// Resting on a platform
    pub grounded: bool,
    /// Moving platform currently carrying the rocket
    pub attached: Option<PlatformId>,
}

impl Player {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            angle: 0.0,
            grounded: true,
            attached: None,
        }
    }

    /// Leave the ground with the given velocity
    pub fn launch(&mut self, vel: Vec2) {
        self.vel = vel;
        self.angle = heading(vel);
        self.grounded = false;
        self.attached = None;
    }

    /// Come to rest on top of a platform, picking up its motion if it moves
    pub fn land(&mut self, platform: &Platform) {
        self.pos.y = platform.top();
        self.vel = Vec2::new(platform.vx, 0.0);
        self.grounded = true;
        self.attached = platform.moving.then_some(platform.id);
    }
}

/// Cosmetic platform look, picked by the rendering layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlatformSkin {
    Asteroid,
    SpaceStation,
    Crystal,
    Energy,
}

/// A platform (axis-aligned slab, position is its top-left corner)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Platform {
    pub id: PlatformId,
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
    pub moving: bool,
    /// Horizontal velocity (pixels/s), zero for static platforms
    pub vx: f32,
}

impl Platform {
    pub fn new(id: PlatformId, x: f32, y: f32, width: f32) -> Self {
        Self {
            id,
            pos: Vec2::new(x, y),
            width,
            height: PLATFORM_HEIGHT,
            moving: false,
            vx: 0.0,
        }
    }

    pub fn moving(id: PlatformId, x: f32, y: f32, width: f32, vx: f32) -> Self {
        Self {
            moving: true,
            vx,
            ..Self::new(id, x, y, width)
        }
    }

    pub fn top(&self) -> f32 {
        self.pos.y
    }

    pub fn right(&self) -> f32 {
        self.pos.x + self.width
    }

    /// Strictly inside the horizontal span (edges don't count)
    pub fn spans(&self, x: f32) -> bool {
        x > self.pos.x && x < self.right()
    }

    pub fn skin(&self) -> PlatformSkin {
        match self.id.0 % 4 {
            0 => PlatformSkin::Asteroid,
            1 => PlatformSkin::SpaceStation,
            2 => PlatformSkin::Crystal,
            _ => PlatformSkin::Energy,
        }
    }

    /// Slide a moving platform, reversing once it touches a world edge
    pub fn slide(&mut self, dt: f32, world_width: f32) {
        if !self.moving {
            return;
        }
        self.pos.x += self.vx * dt;
        if self.pos.x <= 0.0 || self.right() >= world_width {
            self.vx = -self.vx;
            self.pos.x = self.pos.x.min(world_width - self.width).max(0.0);
        }
    }
}

/// A particle for visual effects
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Seconds left
    pub life: f32,
    pub max_life: f32,
}

impl Particle {
    /// Fade-out opacity in [0, 1]
    pub fn alpha(&self) -> f32 {
        (self.life / self.max_life).clamp(0.0, 1.0)
    }
}

/// Logical screen size in CSS pixels plus the device pixel ratio
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    pub dpr: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32, dpr: f32) -> Self {
        Self { width, height, dpr }
    }

    pub fn center_y(&self) -> f32 {
        self.height / 2.0
    }

    /// Convert a pointer position relative to the canvas into world space
    pub fn screen_to_world(&self, screen: Vec2, camera_y: f32) -> Vec2 {
        Vec2::new(screen.x * self.dpr, screen.y * self.dpr + camera_y)
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(400.0, 800.0, 1.0)
    }
}

/// Seed offset for the cosmetic particle stream
const FX_STREAM: u64 = 0x9E37_79B9_7F4A_7C15;

/// Complete game state for one session
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub viewport: Viewport,
    pub phase: GamePhase,
    /// Vertical world-to-screen offset (decreases as the rocket climbs)
    pub camera_y: f32,
    /// Rocket height at session start
    pub start_y: f32,
    /// Smallest y the rocket has reached
    pub highest_y: f32,
    /// Timestamp (ms) of the previous frame, if any
    pub last_frame_ms: Option<f64>,
    pub player: Player,
    /// Active platforms, in generation order
    pub platforms: Vec<Platform>,
    /// Visual particles (not gameplay-affecting)
    pub particles: Vec<Particle>,
    /// Upper bound on live particles
    pub particle_cap: usize,
    /// Gameplay RNG (platform placement)
    pub rng: Pcg32,
    /// Cosmetic RNG (particles), kept apart so effects never shift the layout
    pub fx_rng: Pcg32,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Create a new game state: rocket resting on the start platform with the
    /// initial platform layout above it.
    pub fn new(seed: u64, viewport: Viewport) -> Self {
        let start = Vec2::new(viewport.width / 2.0, viewport.height - START_HEIGHT);
        let mut state = Self {
            seed,
            viewport,
            phase: GamePhase::Active,
            camera_y: 0.0,
            start_y: start.y,
            highest_y: start.y,
            last_frame_ms: None,
            player: Player::new(start),
            platforms: Vec::new(),
            particles: Vec::new(),
            particle_cap: usize::MAX,
            rng: Pcg32::seed_from_u64(seed),
            fx_rng: Pcg32::seed_from_u64(seed ^ FX_STREAM),
            next_id: 0,
        };

        let id = state.next_platform_id();
        let start_x = (viewport.width - START_PLATFORM_WIDTH) / 2.0;
        state
            .platforms
            .push(Platform::new(id, start_x, start.y, START_PLATFORM_WIDTH));

        super::generator::initial_layout(&mut state);
        super::generator::top_up(&mut state);
        state
    }

    /// Allocate a new platform ID
    pub fn next_platform_id(&mut self) -> PlatformId {
        let id = PlatformId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Score: pixels climbed above the start height, never decreasing
    pub fn score(&self) -> u64 {
        (self.start_y - self.highest_y).floor().max(0.0) as u64
    }

    pub fn is_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    pub fn platform(&self, id: PlatformId) -> Option<&Platform> {
        self.platforms.iter().find(|p| p.id == id)
    }

    /// Rocket position relative to the top of the screen
    pub fn player_screen_y(&self) -> f32 {
        self.player.pos.y - self.camera_y
    }
}
