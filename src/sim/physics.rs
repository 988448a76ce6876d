//! Per-frame motion of the rocket and the moving platforms

use glam::Vec2;

use super::collision::{find_landing, wall_collision};
use super::effects;
use super::state::GameState;
use crate::consts::*;
use crate::heading;

/// Advance the rocket and platforms by `dt` seconds
///
/// `dt` must already be sanitized (positive, finite, clamped).
pub fn step(state: &mut GameState, dt: f32) {
    let GameState {
        player,
        platforms,
        particles,
        fx_rng,
        viewport,
        particle_cap,
        ..
    } = state;
    let cap = *particle_cap;

    if !player.grounded {
        let old_y = player.pos.y;
        // Semi-implicit Euler: velocity first
        player.vel.y += GRAVITY * dt;
        player.pos += player.vel * dt;

        if let Some(hit) = wall_collision(player.pos, player.vel, viewport.width) {
            player.pos = hit.pos;
            player.vel = hit.vel;
            player.angle = heading(player.vel);
            effects::burst(particles, fx_rng, player.pos, BOUNCE_PARTICLES, cap);
        }

        if player.vel.y > 0.0 {
            if let Some(idx) = find_landing(platforms, player.pos.x, old_y, player.pos.y) {
                let plat = &platforms[idx];
                player.land(plat);
                log::debug!("Landed on platform {:?} at y={}", plat.id, plat.top());
                effects::burst(particles, fx_rng, player.pos, LANDING_PARTICLES, cap);
            }
        }
    }

    // Ride the attached platform (its velocity from before this frame's slide)
    if player.grounded {
        if let Some(id) = player.attached {
            match platforms.iter().find(|p| p.id == id) {
                Some(plat) => {
                    player.pos.x += plat.vx * dt;
                    player.pos.x = player
                        .pos
                        .x
                        .min(viewport.width - WALL_MARGIN)
                        .max(WALL_MARGIN);
                }
                None => {
                    player.attached = None;
                    player.vel = Vec2::ZERO;
                }
            }
        }
    }

    for plat in platforms.iter_mut() {
        plat.slide(dt, viewport.width);
    }

    // A rider moves with its platform, including a reversal this frame
    if let Some(id) = player.attached {
        if let Some(plat) = platforms.iter().find(|p| p.id == id) {
            player.vel = Vec2::new(plat.vx, 0.0);
        }
    }

    if !player.grounded {
        player.angle = heading(player.vel);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{Platform, PlatformId, Viewport};
    use proptest::prelude::*;

    fn airborne_state() -> GameState {
        let mut state = GameState::new(3, Viewport::new(400.0, 800.0, 1.0));
        state.platforms.clear();
        state.player.launch(Vec2::new(0.0, -1000.0));
        state
    }

    #[test]
    fn test_gravity_accumulates() {
        let mut state = airborne_state();
        step(&mut state, 0.01);
        assert!((state.player.vel.y - (-1000.0 + GRAVITY * 0.01)).abs() < 1e-3);
        // Position uses the updated velocity
        assert!((state.player.pos.y - (600.0 + (-970.0) * 0.01)).abs() < 1e-3);
    }

    #[test]
    fn test_grounded_player_does_not_move() {
        let mut state = GameState::new(3, Viewport::new(400.0, 800.0, 1.0));
        let before = state.player.pos;
        step(&mut state, 0.05);
        assert_eq!(state.player.pos, before);
        assert_eq!(state.player.vel, Vec2::ZERO);
    }

    #[test]
    fn test_falling_onto_platform_lands() {
        let mut state = airborne_state();
        state.player.pos = Vec2::new(200.0, 95.0);
        state.player.vel = Vec2::new(0.0, 300.0);
        state.platforms.push(Platform::new(PlatformId(9), 150.0, 100.0, 100.0));

        step(&mut state, 1.0 / 60.0);
        assert!(state.player.grounded);
        assert_eq!(state.player.vel, Vec2::ZERO);
        assert_eq!(state.player.pos.y, 100.0);
        assert_eq!(state.player.attached, None);
        assert_eq!(state.particles.len(), LANDING_PARTICLES);
    }

    #[test]
    fn test_rising_through_platform_does_not_land() {
        let mut state = airborne_state();
        state.player.pos = Vec2::new(200.0, 105.0);
        state.player.vel = Vec2::new(0.0, -900.0);
        state.platforms.push(Platform::new(PlatformId(9), 150.0, 100.0, 100.0));

        step(&mut state, 1.0 / 60.0);
        assert!(!state.player.grounded);
        assert!(state.player.pos.y < 100.0);
    }

    #[test]
    fn test_first_platform_in_order_wins() {
        let mut state = airborne_state();
        state.player.pos = Vec2::new(200.0, 95.0);
        state.player.vel = Vec2::new(0.0, 300.0);
        state.platforms.push(Platform::moving(PlatformId(4), 150.0, 100.0, 100.0, 70.0));
        state.platforms.push(Platform::new(PlatformId(1), 120.0, 100.0, 160.0));

        step(&mut state, 1.0 / 60.0);
        assert!(state.player.grounded);
        assert_eq!(state.player.attached, Some(PlatformId(4)));
    }

    #[test]
    fn test_wall_bounce_reverses_and_damps() {
        let mut state = airborne_state();
        state.player.pos = Vec2::new(380.0, 300.0);
        state.player.vel = Vec2::new(1000.0, -500.0);

        step(&mut state, 0.01);
        assert_eq!(state.player.pos.x, 400.0 - WALL_MARGIN);
        assert!((state.player.vel.x + 800.0).abs() < 1e-3);
        assert_eq!(state.particles.len(), BOUNCE_PARTICLES);
        assert!((state.player.angle - heading(state.player.vel)).abs() < 1e-6);
    }

    #[test]
    fn test_rides_moving_platform() {
        let mut state = airborne_state();
        let plat = Platform::moving(PlatformId(3), 100.0, 300.0, 100.0, 60.0);
        state.player.pos = Vec2::new(150.0, 300.0);
        state.player.land(&plat);
        state.platforms.push(plat);

        step(&mut state, 0.1);
        assert!((state.player.pos.x - 156.0).abs() < 1e-3);
        assert!((state.platforms[0].pos.x - 106.0).abs() < 1e-3);
        assert_eq!(state.player.vel, Vec2::new(60.0, 0.0));
        assert_eq!(state.player.pos.y, 300.0);
    }

    #[test]
    fn test_landing_on_moving_platform_takes_its_velocity() {
        let mut state = airborne_state();
        state.player.pos = Vec2::new(200.0, 95.0);
        state.player.vel = Vec2::new(0.0, 300.0);
        state.platforms.push(Platform::moving(PlatformId(1), 150.0, 100.0, 100.0, 60.0));

        step(&mut state, 1.0 / 60.0);
        assert!(state.player.grounded);
        assert_eq!(state.player.attached, Some(PlatformId(1)));
        assert_eq!(state.player.vel, Vec2::new(60.0, 0.0));

        step(&mut state, 0.05);
        assert_eq!(state.player.vel.x, state.platforms[0].vx);
        assert_eq!(state.player.vel.y, 0.0);
    }

    #[test]
    fn test_rider_velocity_follows_platform_reversal() {
        let mut state = airborne_state();
        let plat = Platform::moving(PlatformId(2), 295.0, 300.0, 100.0, 80.0);
        state.player.pos = Vec2::new(340.0, 300.0);
        state.player.land(&plat);
        state.platforms.push(plat);

        step(&mut state, 0.1);
        assert_eq!(state.platforms[0].vx, -80.0);
        assert_eq!(state.player.vel, Vec2::new(-80.0, 0.0));
    }

    #[test]
    fn test_rider_stops_at_wall_margin() {
        let mut state = airborne_state();
        let plat = Platform::moving(PlatformId(1), 280.0, 300.0, 100.0, 100.0);
        state.player.pos = Vec2::new(370.0, 300.0);
        state.player.land(&plat);
        state.platforms.push(plat);

        for _ in 0..10 {
            step(&mut state, 1.0 / 60.0);
            assert!(state.player.pos.x <= 400.0 - WALL_MARGIN);
        }
        assert_eq!(state.player.pos.x, 400.0 - WALL_MARGIN);

        // Launching straight up from the edge is not a wall hit
        state.player.launch(Vec2::new(0.0, -1500.0));
        step(&mut state, 1.0 / 60.0);
        assert!(state.particles.is_empty());
        assert_eq!(state.player.vel.x, 0.0);
    }

    #[test]
    fn test_attachment_cleared_when_platform_gone() {
        let mut state = airborne_state();
        let plat = Platform::moving(PlatformId(3), 100.0, 300.0, 100.0, 60.0);
        state.player.land(&plat);
        let before = state.player.pos;

        step(&mut state, 0.1);
        assert_eq!(state.player.attached, None);
        assert_eq!(state.player.pos, before);
    }

    proptest! {
        #[test]
        fn prop_airborne_vy_grows_by_gravity(
            vx in -2000.0f32..2000.0,
            vy in -3000.0f32..0.0,
            dt in 0.001f32..MAX_FRAME_DT,
        ) {
            let mut state = airborne_state();
            state.player.vel = Vec2::new(vx, vy);
            step(&mut state, dt);
            prop_assert!(!state.player.grounded);
            prop_assert!((state.player.vel.y - (vy + GRAVITY * dt)).abs() < 1e-2);
        }

        #[test]
        fn prop_x_stays_within_walls(
            x in 0.0f32..400.0,
            vx in -3000.0f32..3000.0,
            dt in 0.001f32..MAX_FRAME_DT,
        ) {
            let mut state = airborne_state();
            state.player.pos.x = x.clamp(WALL_MARGIN, 400.0 - WALL_MARGIN);
            state.player.vel = Vec2::new(vx, -2000.0);
            let before = state.player.vel.x;
            step(&mut state, dt);

            let px = state.player.pos.x;
            prop_assert!(px >= WALL_MARGIN && px <= 400.0 - WALL_MARGIN);
            if state.particles.len() == BOUNCE_PARTICLES {
                prop_assert!((state.player.vel.x + before * WALL_RESTITUTION).abs() < 1e-2);
                prop_assert!(state.player.vel.x.abs() < before.abs());
            }
        }

        #[test]
        fn prop_rider_moves_with_platform(dt in 0.001f32..MAX_FRAME_DT, vx in -100.0f32..100.0) {
            let mut state = airborne_state();
            let plat = Platform::moving(PlatformId(1), 150.0, 300.0, 100.0, vx);
            state.player.pos = Vec2::new(200.0, 300.0);
            state.player.land(&plat);
            state.platforms.push(plat);
            step(&mut state, dt);
            prop_assert!(state.player.grounded);
            prop_assert_eq!(state.player.vel.x, state.platforms[0].vx);
            prop_assert_eq!(state.player.vel.y, 0.0);
            prop_assert_eq!(state.player.pos.y, 300.0);
        }

        #[test]
        fn prop_rider_x_stays_within_walls(
            plat_x in 0.0f32..300.0,
            offset in 1.0f32..99.0,
            vx in -100.0f32..100.0,
            frames in 1usize..120,
        ) {
            let mut state = airborne_state();
            let plat = Platform::moving(PlatformId(1), plat_x, 300.0, 100.0, vx);
            state.player.pos = Vec2::new((plat_x + offset).clamp(WALL_MARGIN, 400.0 - WALL_MARGIN), 300.0);
            state.player.land(&plat);
            state.platforms.push(plat);
            for _ in 0..frames {
                step(&mut state, 1.0 / 60.0);
                let px = state.player.pos.x;
                prop_assert!(px >= WALL_MARGIN && px <= 400.0 - WALL_MARGIN);
            }
        }
    }
}
