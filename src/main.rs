//! Rocket Launch entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{
        CanvasRenderingContext2d, Document, HtmlCanvasElement, HtmlElement, MouseEvent, TouchEvent,
    };

    use rocket_launch::platform::clock::PerformanceClock;
    use rocket_launch::platform::{FrameLoop, FrameStatus, LoopHandle};
    use rocket_launch::sim::{PlatformSkin, RocketSize, Viewport};
    use rocket_launch::theme::ColorTheme;
    use rocket_launch::{GameSession, HighScores, InputProfile, Settings, View};

    const ROCKET_RADIUS: f64 = 12.0;

    /// Game instance holding everything the browser callbacks share
    struct Game {
        session: GameSession,
        frames: FrameLoop<PerformanceClock>,
        canvas: HtmlCanvasElement,
        ctx: CanvasRenderingContext2d,
        document: Document,
        /// Palette last written to the CSS variables
        applied_theme: Option<ColorTheme>,
        shown_score: Option<u64>,
        /// A frame callback is queued
        running: bool,
    }

    impl Game {
        /// Pointer position relative to the canvas, in world space
        fn to_world(&self, client_x: f64, client_y: f64) -> Vec2 {
            let rect = self.canvas.get_bounding_client_rect();
            let screen = Vec2::new(
                (client_x - rect.left()) as f32,
                (client_y - rect.top()) as f32,
            );
            self.session.pointer_to_world(screen)
        }

        fn render(&self) {
            let view = self.session.view();
            let vp = self.session.state().viewport;
            draw(&self.ctx, &view, vp);
        }

        fn sync_theme(&mut self) {
            let theme = *self.session.view().theme;
            if self.applied_theme == Some(theme) {
                return;
            }
            let root = self
                .document
                .document_element()
                .and_then(|el| el.dyn_into::<HtmlElement>().ok());
            if let Some(root) = root {
                let style = root.style();
                for (name, value) in theme.css_vars() {
                    let _ = style.set_property(name, &value);
                }
            }
            self.applied_theme = Some(theme);
        }

        fn update_hud(&mut self) {
            let score = self.session.score();
            if self.shown_score != Some(score) {
                if let Some(el) = self.document.get_element_by_id("score") {
                    el.set_text_content(Some(&score.to_string()));
                }
                self.shown_score = Some(score);
            }
        }

        fn show_game_over(&self, score: u64) {
            if let Some(el) = self.document.get_element_by_id("final-score") {
                el.set_text_content(Some(&score.to_string()));
            }
            if let Some(el) = self.document.get_element_by_id("game-over") {
                let _ = el.set_attribute("class", "");
            }
        }

        fn show_settings(&self) {
            let settings = self.session.settings();
            let on_off = |on: bool| if on { "On" } else { "Off" };
            let labels = [
                ("toggle-quality", format!("Quality: {}", settings.quality.as_str())),
                ("toggle-particles", format!("Particles: {}", on_off(settings.particles))),
                ("toggle-haptics", format!("Haptics: {}", on_off(settings.haptics))),
                ("toggle-motion", format!("Reduced motion: {}", on_off(settings.reduced_motion))),
            ];
            for (id, label) in labels {
                if let Some(el) = self.document.get_element_by_id(id) {
                    el.set_text_content(Some(&label));
                }
            }
        }

        fn hide_game_over(&self) {
            if let Some(el) = self.document.get_element_by_id("game-over") {
                let _ = el.set_attribute("class", "hidden");
            }
        }
    }

    fn canvas_viewport(window: &web_sys::Window, canvas: &HtmlCanvasElement) -> Viewport {
        let dpr = window.device_pixel_ratio();
        let css_w = canvas.client_width().max(1);
        let css_h = canvas.client_height().max(1);
        canvas.set_width((css_w as f64 * dpr) as u32);
        canvas.set_height((css_h as f64 * dpr) as u32);
        Viewport::new(css_w as f32, css_h as f32, dpr as f32)
    }

    fn draw(ctx: &CanvasRenderingContext2d, view: &View, vp: Viewport) {
        let dpr = vp.dpr as f64;
        let theme = view.theme;

        let _ = ctx.set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0);
        ctx.set_fill_style_str(&theme.bg_color.to_string());
        ctx.fill_rect(0.0, 0.0, vp.width as f64, vp.height as f64);

        // World space from here on
        let _ = ctx.translate(0.0, -view.camera_y as f64);

        ctx.set_fill_style_str(&theme.platform_color.to_string());
        for plat in view.platforms {
            let (x, y) = (plat.pos.x as f64, plat.pos.y as f64);
            let (w, h) = (plat.width as f64, plat.height as f64);
            match plat.skin() {
                PlatformSkin::Asteroid | PlatformSkin::Crystal => ctx.fill_rect(x, y, w, h),
                PlatformSkin::SpaceStation | PlatformSkin::Energy => {
                    ctx.set_global_alpha(0.85);
                    ctx.fill_rect(x, y, w, h);
                    ctx.set_global_alpha(1.0);
                }
            }
        }

        for p in view.particles {
            ctx.set_fill_style_str(&format!("rgba({}, {:.2})", theme.particle_color, p.alpha()));
            ctx.begin_path();
            let _ = ctx.arc(
                p.pos.x as f64,
                p.pos.y as f64,
                2.0,
                0.0,
                std::f64::consts::TAU,
            );
            ctx.fill();
        }

        let scale = match view.aim.map(|a| a.size) {
            Some(RocketSize::Medium) => 1.25,
            Some(RocketSize::Large) => 1.5,
            _ => 1.0,
        };
        let r = ROCKET_RADIUS * scale;

        ctx.save();
        let _ = ctx.translate(view.player.pos.x as f64, view.player.pos.y as f64);
        let _ = ctx.rotate(view.rocket_angle as f64);
        ctx.begin_path();
        ctx.move_to(0.0, -2.0 * r);
        ctx.line_to(r, 0.0);
        ctx.line_to(-r, 0.0);
        ctx.close_path();
        ctx.set_fill_style_str(&theme.arrow_primary.to_string());
        ctx.fill();
        ctx.set_stroke_style_str(&theme.arrow_secondary.to_string());
        ctx.set_line_width(2.0);
        ctx.stroke();
        ctx.set_fill_style_str(&theme.arrow_accent.to_string());
        ctx.fill_rect(-r / 3.0, -r, 2.0 * r / 3.0, r / 2.0);
        ctx.restore();
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |_time: f64| {
            game_loop(game);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>) {
        let status = {
            let mut g = game.borrow_mut();
            let g = &mut *g;
            let status = g.frames.pump(&mut g.session);
            if status != FrameStatus::Cancelled {
                g.render();
                g.sync_theme();
                g.update_hud();
            }
            if let FrameStatus::GameOver { score } = status {
                g.show_game_over(score);
            }
            g.running = status.wants_next_frame();
            status
        };

        if status.wants_next_frame() {
            request_animation_frame(game);
        }
    }

    fn restart(game: &Rc<RefCell<Game>>) {
        let resume = {
            let mut g = game.borrow_mut();
            if g.frames.handle().is_cancelled() {
                return;
            }
            g.session.reset(js_sys::Date::now() as u64);
            g.hide_game_over();
            let resume = !g.running;
            g.running = true;
            resume
        };
        if resume {
            request_animation_frame(game.clone());
        }
    }

    /// Settings button: change one preference, persist it, apply it live
    fn wire_setting_toggle(
        document: &Document,
        game: &Rc<RefCell<Game>>,
        id: &str,
        change: fn(&mut Settings),
    ) -> Result<(), JsValue> {
        let Some(btn) = document.get_element_by_id(id) else {
            return Ok(());
        };
        let game = game.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
            let mut g = game.borrow_mut();
            let mut settings = g.session.settings().clone();
            change(&mut settings);
            settings.save();
            g.session.apply_settings(settings);
            g.show_settings();
        });
        btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
        Ok(())
    }

    fn vibrate() {
        if let Some(window) = web_sys::window() {
            let _ = window.navigator().vibrate_with_duration(15);
        }
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);

        log::info!("Rocket Launch starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or("no canvas")?
            .dyn_into()?;
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or("no 2d context")?
            .dyn_into()?;

        let mut settings = Settings::load();
        if let Ok(ua) = window.navigator().user_agent() {
            settings.input = InputProfile::from_user_agent(&ua);
        }

        let viewport = canvas_viewport(&window, &canvas);
        let seed = js_sys::Date::now() as u64;
        let mut session = GameSession::new(seed, viewport, settings);
        session.set_haptics(vibrate);
        session.set_score_sink(Box::new(HighScores::load()));

        let game = Rc::new(RefCell::new(Game {
            session,
            frames: FrameLoop::new(PerformanceClock::new()),
            canvas: canvas.clone(),
            ctx,
            document: document.clone(),
            applied_theme: None,
            shown_score: None,
            running: true,
        }));
        let handle: LoopHandle = game.borrow().frames.handle();

        // Mouse
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                if game.borrow().session.is_over() {
                    restart(&game);
                    return;
                }
                let mut g = game.borrow_mut();
                let pos = g.to_world(event.client_x() as f64, event.client_y() as f64);
                g.session.drag_begin(pos);
            });
            canvas.add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut g = game.borrow_mut();
                let pos = g.to_world(event.client_x() as f64, event.client_y() as f64);
                g.session.drag_update(pos);
            });
            window.add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut g = game.borrow_mut();
                let pos = g.to_world(event.client_x() as f64, event.client_y() as f64);
                g.session.drag_end(pos);
            });
            window.add_event_listener_with_callback("mouseup", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Touch
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if game.borrow().session.is_over() {
                    restart(&game);
                    return;
                }
                let mut g = game.borrow_mut();
                if let Some(touch) = event.touches().get(0) {
                    let pos = g.to_world(touch.client_x() as f64, touch.client_y() as f64);
                    g.session.drag_begin(pos);
                }
            });
            canvas.add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                let mut g = game.borrow_mut();
                if let Some(touch) = event.touches().get(0) {
                    let pos = g.to_world(touch.client_x() as f64, touch.client_y() as f64);
                    g.session.drag_update(pos);
                }
            });
            canvas.add_event_listener_with_callback("touchmove", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                let mut g = game.borrow_mut();
                if let Some(touch) = event.changed_touches().get(0) {
                    let pos = g.to_world(touch.client_x() as f64, touch.client_y() as f64);
                    g.session.drag_end(pos);
                }
            });
            canvas.add_event_listener_with_callback("touchend", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Restart button
        if let Some(btn) = document.get_element_by_id("restart") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                restart(&game);
            });
            btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Settings
        wire_setting_toggle(&document, &game, "toggle-quality", |s| s.quality = s.quality.next())?;
        wire_setting_toggle(&document, &game, "toggle-particles", |s| s.particles = !s.particles)?;
        wire_setting_toggle(&document, &game, "toggle-haptics", |s| s.haptics = !s.haptics)?;
        wire_setting_toggle(&document, &game, "toggle-motion", |s| {
            s.reduced_motion = !s.reduced_motion
        })?;
        game.borrow().show_settings();

        // Resize
        {
            let game = game.clone();
            let window_clone = window.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let mut g = game.borrow_mut();
                let viewport = canvas_viewport(&window_clone, &g.canvas);
                g.session.set_viewport(viewport);
            });
            window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Stop the loop for good when the page goes away
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                handle.cancel();
                log::info!("Frame loop cancelled");
            });
            window.add_event_listener_with_callback("pagehide", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        log::info!("Game initialized with seed: {}", seed);
        request_animation_frame(game);
        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run()
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Rocket Launch (native) starting...");
    log::info!("Native mode runs a headless scripted game - serve the wasm build to play");

    let scores = headless_run(0x5EED);
    match scores.top_score() {
        Some(best) => println!("Best score: {}", best),
        None => println!("No score recorded"),
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Play a scripted game: launch straight up whenever the rocket rests,
/// stepping a manual clock at 60 fps until the rocket is lost.
#[cfg(not(target_arch = "wasm32"))]
fn headless_run(seed: u64) -> rocket_launch::HighScores {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use rocket_launch::platform::{FrameLoop, FrameStatus, ManualClock};
    use rocket_launch::session::{ScoreReport, ScoreSink};
    use rocket_launch::sim::Viewport;
    use rocket_launch::{GameSession, HighScores, Settings};

    struct Shared(Rc<RefCell<HighScores>>);

    impl ScoreSink for Shared {
        fn submit(&mut self, report: &ScoreReport) {
            self.0.borrow_mut().submit(report);
        }
    }

    let scores = Rc::new(RefCell::new(HighScores::load()));
    let mut session = GameSession::new(seed, Viewport::default(), Settings::load());
    session.set_score_sink(Box::new(Shared(scores.clone())));
    session.on_theme_complete(|index| log::info!("Theme {} reached", index));

    let clock = ManualClock::new(0.0);
    let mut frames = FrameLoop::new(clock.clone());
    let mut pulls = [70.0f32, 110.0, 90.0, 130.0].into_iter().cycle();

    for _ in 0..60 * 120 {
        if session.state().player.grounded && !session.is_over() {
            let at = session.state().player.pos;
            let pull = pulls.next().unwrap_or(100.0);
            session.drag_begin(at);
            session.drag_end(at + Vec2::new(0.0, pull));
        }

        clock.advance(1000.0 / 60.0);
        match frames.pump(&mut session) {
            FrameStatus::GameOver { score } => log::info!("Lost the rocket at {}", score),
            status if !status.wants_next_frame() => break,
            _ => {}
        }
    }

    scores.take()
}
