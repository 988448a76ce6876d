//! Particle bursts
//!
//! Purely visual: particles never touch the rocket or the platforms.

use glam::Vec2;
use rand::Rng;

use super::state::Particle;
use crate::consts::{PARTICLE_LIFE, PARTICLE_MAX_SPEED};

/// Spawn `count` particles flying out of `pos` in random directions,
/// stopping at `cap` live particles.
pub fn burst<R: Rng>(particles: &mut Vec<Particle>, rng: &mut R, pos: Vec2, count: usize, cap: usize) {
    let room = cap.saturating_sub(particles.len());
    for _ in 0..count.min(room) {
        let angle = rng.random::<f32>() * std::f32::consts::TAU;
        let speed = rng.random::<f32>() * PARTICLE_MAX_SPEED + 1.0;
        particles.push(Particle {
            pos,
            vel: Vec2::from_angle(angle) * speed,
            life: PARTICLE_LIFE,
            max_life: PARTICLE_LIFE,
        });
    }
}

/// Move particles and drop the expired ones
pub fn age(particles: &mut Vec<Particle>, dt: f32) {
    for p in particles.iter_mut() {
        p.pos += p.vel * dt;
        p.life -= dt;
    }
    particles.retain(|p| p.life > 0.0);
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_burst_respects_cap() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut particles = Vec::new();
        burst(&mut particles, &mut rng, Vec2::ZERO, 20, 100);
        assert_eq!(particles.len(), 20);
        burst(&mut particles, &mut rng, Vec2::ZERO, 20, 30);
        assert_eq!(particles.len(), 30);
        burst(&mut particles, &mut rng, Vec2::ZERO, 20, 0);
        assert_eq!(particles.len(), 30);
    }

    #[test]
    fn test_burst_speed_range() {
        let mut rng = Pcg32::seed_from_u64(2);
        let mut particles = Vec::new();
        burst(&mut particles, &mut rng, Vec2::new(5.0, 5.0), 50, usize::MAX);
        for p in &particles {
            let speed = p.vel.length();
            assert!(speed >= 0.99 && speed <= PARTICLE_MAX_SPEED + 1.01);
            assert_eq!(p.pos, Vec2::new(5.0, 5.0));
            assert_eq!(p.alpha(), 1.0);
        }
    }

    #[test]
    fn test_age_expires_particles() {
        let mut particles = vec![Particle {
            pos: Vec2::ZERO,
            vel: Vec2::new(100.0, 0.0),
            life: PARTICLE_LIFE,
            max_life: PARTICLE_LIFE,
        }];
        age(&mut particles, 0.1);
        assert_eq!(particles.len(), 1);
        assert!((particles[0].pos.x - 10.0).abs() < 1e-4);
        assert!(particles[0].alpha() < 1.0);

        age(&mut particles, 0.3);
        assert!(particles.is_empty());
    }
}
