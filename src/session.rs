//! Game session
//!
//! `GameSession` owns everything a run needs (simulation state, theme,
//! drag gesture, collaborator hooks) and is the only thing the shell talks
//! to: pointer events go to the `drag_*` methods, each display frame goes to
//! `frame_at` (or `advance`), and rendering reads `view()`.

use glam::Vec2;

use crate::settings::Settings;
use crate::sim::launch::{self, AimPreview, DragGesture};
use crate::sim::{GameState, Particle, Platform, Player, Viewport, tick};
use crate::theme::{ColorTheme, ThemeEngine};

/// Final result of a run, handed to a `ScoreSink` once per game over
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreReport {
    pub score: u64,
    /// Palette index the run ended on
    pub theme: usize,
}

/// Receives the final score of each run (leaderboard, submission UI)
///
/// Called synchronously on the game-over frame; implementations that talk to
/// the network must hand the work off instead of blocking.
pub trait ScoreSink {
    fn submit(&mut self, report: &ScoreReport);
}

/// Read-only snapshot for the rendering layer
#[derive(Debug, Clone, Copy)]
pub struct View<'a> {
    pub player: &'a Player,
    pub platforms: &'a [Platform],
    pub particles: &'a [Particle],
    pub camera_y: f32,
    pub score: u64,
    pub theme: &'a ColorTheme,
    /// Present while the player is aiming
    pub aim: Option<AimPreview>,
    /// Rocket sprite rotation (radians, 0 = pointing up)
    pub rocket_angle: f32,
    pub game_over: bool,
}

/// One player's game, from start through any number of resets
pub struct GameSession {
    state: GameState,
    settings: Settings,
    theme: ThemeEngine,
    drag: Option<DragGesture>,
    /// Latest time seen (ms), drives theme animation
    now_ms: f64,
    final_score: Option<u64>,
    haptics: Option<Box<dyn FnMut()>>,
    score_sink: Option<Box<dyn ScoreSink>>,
}

impl GameSession {
    pub fn new(seed: u64, viewport: Viewport, settings: Settings) -> Self {
        let mut theme = ThemeEngine::new();
        theme.set_instant(settings.reduced_motion);

        let mut session = Self {
            state: GameState::new(seed, viewport),
            settings,
            theme,
            drag: None,
            now_ms: 0.0,
            final_score: None,
            haptics: None,
            score_sink: None,
        };
        session.state.particle_cap = session.settings.max_particles();
        log::info!("Session started with seed {}", seed);
        session
    }

    /// Hook fired on every launch (e.g. a host haptic pulse)
    pub fn set_haptics(&mut self, hook: impl FnMut() + 'static) {
        self.haptics = Some(Box::new(hook));
    }

    /// Where final scores go
    pub fn set_score_sink(&mut self, sink: Box<dyn ScoreSink>) {
        self.score_sink = Some(sink);
    }

    /// Called when a theme transition finishes
    pub fn on_theme_complete(&mut self, callback: impl FnMut(usize) + 'static) {
        self.theme.on_complete(callback);
    }

    /// Start a fresh run. The theme is kept and animates back to the first
    /// palette.
    pub fn reset(&mut self, seed: u64) {
        self.state = GameState::new(seed, self.state.viewport);
        self.state.particle_cap = self.settings.max_particles();
        self.drag = None;
        self.final_score = None;
        log::info!("Session reset with seed {}", seed);
    }

    pub fn apply_settings(&mut self, settings: Settings) {
        self.theme.set_instant(settings.reduced_motion);
        self.state.particle_cap = settings.max_particles();
        self.state.particles.truncate(self.state.particle_cap);
        self.settings = settings;
    }

    /// Canvas resized; takes effect for the world width and view bounds
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.state.viewport = viewport;
    }

    /// Step by `dt` seconds. Returns `true` only on the frame the game ends.
    pub fn advance(&mut self, dt: f32) -> bool {
        if dt.is_finite() && dt > 0.0 {
            self.now_ms += dt as f64 * 1000.0;
        }
        self.step(dt, self.now_ms)
    }

    /// Step to the monotonic time `now_ms`, using the gap since the previous
    /// frame. The first frame after start or reset only records the time.
    pub fn frame_at(&mut self, now_ms: f64) -> bool {
        if !now_ms.is_finite() {
            return false;
        }
        let dt = match self.state.last_frame_ms {
            Some(last) => ((now_ms - last) / 1000.0) as f32,
            None => 0.0,
        };
        self.state.last_frame_ms = Some(now_ms);
        self.now_ms = now_ms;
        self.step(dt, now_ms)
    }

    fn step(&mut self, dt: f32, now_ms: f64) -> bool {
        let outcome = tick(&mut self.state, dt);
        if outcome.stepped {
            self.theme.update(self.state.score(), now_ms);
        }
        self.theme.step(now_ms);

        if outcome.game_over {
            self.drag = None;
            self.report_game_over();
        }
        outcome.game_over
    }

    fn report_game_over(&mut self) {
        if self.final_score.is_some() {
            return;
        }
        let report = ScoreReport {
            score: self.state.score(),
            theme: self.theme.index(),
        };
        self.final_score = Some(report.score);
        if let Some(sink) = self.score_sink.as_mut() {
            sink.submit(&report);
        }
    }

    /// Convert a canvas-relative pointer position into world space
    pub fn pointer_to_world(&self, screen: Vec2) -> Vec2 {
        self.state
            .viewport
            .screen_to_world(screen, self.state.camera_y)
    }

    /// Pointer pressed. Starts aiming if the rocket is resting; a second
    /// pointer during a drag only moves the aim point.
    pub fn drag_begin(&mut self, pos: Vec2) {
        if !pos.is_finite() {
            return;
        }
        if let Some(drag) = self.drag.as_mut() {
            drag.current = pos;
            return;
        }
        if self.state.is_over() || !self.state.player.grounded {
            return;
        }
        self.drag = Some(DragGesture::new(pos));
    }

    /// Pointer moved
    pub fn drag_update(&mut self, pos: Vec2) {
        if !pos.is_finite() {
            return;
        }
        if let Some(drag) = self.drag.as_mut() {
            drag.current = pos;
        }
    }

    /// Pointer released. Returns `true` if the rocket launched.
    pub fn drag_end(&mut self, pos: Vec2) -> bool {
        let Some(mut drag) = self.drag.take() else {
            return false;
        };
        if pos.is_finite() {
            drag.current = pos;
        }

        let launched = launch::release(&mut self.state, drag, self.settings.launch_power());
        if launched && self.settings.haptics {
            if let Some(hook) = self.haptics.as_mut() {
                hook();
            }
        }
        launched
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    pub fn view(&self) -> View<'_> {
        let aim = self.drag.map(|d| d.aim());
        let player = &self.state.player;
        let rocket_angle = match aim {
            Some(aim) => aim.draw_angle,
            None if player.grounded => 0.0,
            None => player.angle + std::f32::consts::FRAC_PI_2,
        };

        View {
            player,
            platforms: &self.state.platforms,
            particles: &self.state.particles,
            camera_y: self.state.camera_y,
            score: self.state.score(),
            theme: self.theme.current(),
            aim,
            rocket_angle,
            game_over: self.state.is_over(),
        }
    }

    pub fn score(&self) -> u64 {
        self.state.score()
    }

    /// Score captured on the game-over frame of the current run
    pub fn final_score(&self) -> Option<u64> {
        self.final_score
    }

    pub fn is_over(&self) -> bool {
        self.state.is_over()
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    #[cfg(test)]
    pub(crate) fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn theme(&self) -> &ThemeEngine {
        &self.theme
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }
}
