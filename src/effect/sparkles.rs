//! Ambient decorations: sparkles, fireflies, snowflakes and raindrops.
//!
//! [`Sparkles`] has no trigger of its own. The driver calls the spawn methods
//! whenever it wants another decoration; each tick the effect steps its
//! particles, lets snowflakes sway, and culls anything below the floor.

use rand::rngs::StdRng;
use rand::Rng;

use super::{Extent, ParticleId, ParticleSet};
use crate::particle::{Color, Particle, Vec3};

const SPARKLE_FADE: f64 = 1.0;
const SPARKLE_JITTER: u8 = 20;

const FIREFLY_FADE: f64 = 0.6;
const FIREFLY_COLOR: Color = Color::opaque(200.0, 160.0, 0.0);
const FIREFLY_LIFT: f64 = 0.25;

const SNOW_FADE: f64 = 0.2;
const SNOW_COLOR: Color = Color::opaque(220.0, 220.0, 220.0);
const SNOW_DRIFT: f64 = 0.33;
const SNOW_FALL: f64 = 0.2;
/// Chance per tick that a snowflake reverses its sideways drift.
pub const SNOW_SWAY_CHANCE: f64 = 0.1;

const RAIN_FADE: f64 = 0.5;
const RAIN_COLOR: Color = Color::opaque(64.0, 64.0, 128.0);
const RAIN_FALL: f64 = 9.8;

/// Falling decorations start this far above the top edge, at most.
const SPAWN_HEADROOM: f64 = 1.25;

/// Ambient decoration effect covering an [`Extent`].
#[derive(Debug, Clone)]
pub struct Sparkles {
    particles: ParticleSet,
    extent: Extent,
    snowflakes: Vec<ParticleId>,
    rng: StdRng,
}

impl Sparkles {
    pub fn new(extent: Extent, rng: StdRng) -> Self {
        Self { particles: ParticleSet::new(), extent, snowflakes: Vec::new(), rng }
    }

    pub fn extent(&self) -> Extent {
        self.extent
    }

    pub fn particles(&self) -> &ParticleSet {
        &self.particles
    }

    pub(crate) fn particles_mut(&mut self) -> &mut ParticleSet {
        &mut self.particles
    }

    /// Motionless near-white point that fades quickly.
    pub fn add_sparkle(&mut self) -> ParticleId {
        let position = Vec3::new(
            self.uniform(0.0, self.extent.width),
            self.uniform(0.0, self.extent.height),
            0.0,
        );
        let mut channel = || self.rng.gen_range(255 - SPARKLE_JITTER..=255) as f64;
        let color = Color::opaque(channel(), channel(), channel());
        let motion = vec![Vec3::ZERO, Vec3::ZERO];
        self.particles.add(Particle::new(position, motion, color, SPARKLE_FADE))
    }

    /// Warm light drifting sideways and slowly rising.
    pub fn add_firefly(&mut self) -> ParticleId {
        let width = self.extent.width;
        let position = Vec3::new(
            self.uniform(0.25 * width, width),
            self.uniform(0.0, self.extent.height),
            0.0,
        );
        let velocity = Vec3::new(self.uniform(-1.25, 1.25), self.uniform(-0.25, 0.5), 0.0);
        self.particles.add(Particle::new(
            position,
            vec![velocity, Vec3::new(0.0, FIREFLY_LIFT, 0.0)],
            FIREFLY_COLOR,
            FIREFLY_FADE,
        ))
    }

    /// Slow flake falling from above the top edge, swaying as it goes.
    pub fn add_snowflake(&mut self) -> ParticleId {
        let position = self.above_top();
        let velocity = Vec3::new(self.uniform(-SNOW_DRIFT, SNOW_DRIFT), 0.0, 0.0);
        let id = self.particles.add(Particle::new(
            position,
            vec![velocity, Vec3::new(0.0, -SNOW_FALL, 0.0)],
            SNOW_COLOR,
            SNOW_FADE,
        ));
        self.snowflakes.push(id);
        id
    }

    /// Fast cool-colored drop falling from above the top edge.
    pub fn add_raindrop(&mut self) -> ParticleId {
        let position = self.above_top();
        self.particles.add(Particle::new(
            position,
            vec![Vec3::ZERO, Vec3::new(0.0, -RAIN_FALL, 0.0)],
            RAIN_COLOR,
            RAIN_FADE,
        ))
    }

    pub fn step(&mut self, dt: f64) {
        self.particles.step(dt);

        for &id in &self.snowflakes {
            if self.rng.gen::<f64>() < SNOW_SWAY_CHANCE {
                if let Some(flake) = self.particles.get_mut(id) {
                    flake.motion_mut()[0].x *= -1.0;
                }
            }
        }

        let ceiling = self.extent.height * SPAWN_HEADROOM;
        self.particles.retain(|_, p| {
            let y = p.position.y;
            y >= 0.0 && y <= ceiling && !faded_out(p)
        });
        let particles = &self.particles;
        self.snowflakes.retain(|&id| particles.get(id).is_some());
    }

    fn above_top(&mut self) -> Vec3 {
        let height = self.extent.height;
        Vec3::new(
            self.uniform(0.0, self.extent.width),
            self.uniform(height, height * SPAWN_HEADROOM),
            0.0,
        )
    }

    fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.rng.gen::<f64>()
    }
}

/// Every color channel quantizes to zero or below.
fn faded_out(particle: &Particle) -> bool {
    particle.pixelize().color[..3].iter().all(|&c| c <= 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn sparkles() -> Sparkles {
        Sparkles::new(Extent::new(1.6, 2.08), StdRng::seed_from_u64(3))
    }

    #[test]
    fn test_sparkle_is_static_and_bright() {
        let mut fx = sparkles();
        let id = fx.add_sparkle();
        let before = fx.particles().get(id).unwrap().clone();
        assert!(before.color.rgb.iter().all(|&c| (235.0..=255.0).contains(&c)));
        assert!((0.0..1.6).contains(&before.position.x));
        assert!((0.0..2.08).contains(&before.position.y));

        fx.step(0.2);
        let after = fx.particles().get(id).unwrap();
        assert_eq!(after.position, before.position);
        assert!(after.color.rgb[0] < before.color.rgb[0]);
    }

    #[test]
    fn test_firefly_spawns_right_of_quarter() {
        let mut fx = sparkles();
        for _ in 0..50 {
            let id = fx.add_firefly();
            let p = fx.particles().get(id).unwrap();
            assert!(p.position.x >= 0.4 && p.position.x <= 1.6);
            assert_eq!(p.color, FIREFLY_COLOR);
            assert!(p.motion()[1].y > 0.0);
        }
    }

    #[test]
    fn test_falling_spawn_above_top() {
        let mut fx = sparkles();
        for _ in 0..50 {
            let rain = fx.add_raindrop();
            let snow = fx.add_snowflake();
            for id in [rain, snow] {
                let y = fx.particles().get(id).unwrap().position.y;
                assert!(y >= 2.08 && y <= 2.08 * 1.25, "spawned at {}", y);
            }
        }
    }

    #[test]
    fn test_raindrop_falls_and_is_culled() {
        let mut fx = sparkles();
        let id = fx.add_raindrop();
        fx.step(0.2);
        assert!(fx.particles().get(id).unwrap().velocity().y < 0.0);
        for _ in 0..10 {
            fx.step(0.2);
        }
        assert!(fx.particles().get(id).is_none());
    }

    #[test]
    fn test_snowflake_sway_keeps_speed() {
        let mut fx = sparkles();
        let id = fx.add_snowflake();
        let drift = fx.particles().get(id).unwrap().velocity().x.abs();
        let mut flips = 0;
        let mut last = fx.particles().get(id).unwrap().velocity().x;
        for _ in 0..200 {
            fx.step(0.01);
            let Some(flake) = fx.particles().get(id) else { break };
            let vx = flake.velocity().x;
            assert!((vx.abs() - drift).abs() < 1e-12);
            if vx.signum() != last.signum() {
                flips += 1;
            }
            last = vx;
        }
        assert!(flips > 0, "snowflake never changed direction");
    }

    #[test]
    fn test_faded_sparkle_is_culled() {
        let mut fx = sparkles();
        let id = fx.add_sparkle();
        // 0.8 per tick: 255 * 0.8^25 < 1
        for _ in 0..24 {
            fx.step(0.2);
        }
        assert!(fx.particles().get(id).is_some());
        fx.step(0.2);
        assert!(fx.particles().get(id).is_none());
    }

    #[test]
    fn test_firefly_above_headroom_is_culled() {
        let mut fx = sparkles();
        let id = fx.add_firefly();
        fx.particles_mut().get_mut(id).unwrap().position.y = 2.08 * SPAWN_HEADROOM + 0.1;
        fx.step(0.01);
        assert!(fx.particles().get(id).is_none());
        assert!(fx.particles().is_empty());
    }

    #[test]
    fn test_snowflake_list_tracks_culls() {
        let mut fx = sparkles();
        fx.add_snowflake();
        for _ in 0..200 {
            fx.step(0.2);
        }
        assert!(fx.particles().is_empty());
        assert!(fx.snowflakes.is_empty());
    }
}
