//! Firework mortars: a shell launched from the floor that pops at its apex.
//!
//! A [`Mortar`] starts life with a single shell particle on a ballistic
//! trajectory. While the shell climbs it may drop a powder trail. On the first
//! tick its vertical velocity is no longer positive, the shell is removed and
//! the mortar's [`PopPattern`] fills the sky with stars:
//!
//! - [`PopPattern::Rings`] - concentric rings of stars, outer rings faster
//! - [`PopPattern::Shape`] - one star per point of a shape table, so the
//!   burst draws a heart, a rocket or any custom bitmap
//!
//! Every particle that drops below the floor is culled at the end of a tick.

use std::f64::consts::{FRAC_PI_2, TAU};

use rand::rngs::StdRng;
use rand::Rng;

use super::shapes::{self, StarColor, StarPoint};
use super::{Extent, ParticleId, ParticleSet};
use crate::particle::{Color, Particle, Vec3};

/// Downward acceleration of shells, trails and ring stars (m/s²).
pub const GRAVITY: f64 = 0.2;

const SHELL_COLOR: Color = Color::opaque(64.0, 64.0, 64.0);
const DEFAULT_TRAIL_COLOR: Color = Color::opaque(255.0, 200.0, 0.0);
const TRAIL_CHANCE: f64 = 0.25;
const TRAIL_POWER: f64 = 0.05;
const TRAIL_FADE: f64 = 1.0;
const FLASH_FADE: f64 = 2.0;
/// Height used to aim randomly placed shells back toward the centre.
const AIM_HEIGHT: f64 = 1.5;
const LAUNCH_JITTER: f64 = 0.5;

/// Powder trail behind a climbing shell.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum TrailSetting {
    /// One in four shells get the default gold trail
    #[default]
    Random,
    Off,
    Color(Color),
}

/// Launch parameters. Anything left `None` is randomized.
#[derive(Debug, Clone, PartialEq)]
pub struct MortarOptions {
    /// Launch position along the floor (m)
    pub pos_x: Option<f64>,
    /// Launch angle, radians from +X
    pub theta: Option<f64>,
    /// Shell launch speed (m/s)
    pub power: Option<f64>,
    /// Range `power` is drawn from when not given
    pub power_range: [f64; 2],
    pub star_color: Option<Color>,
    pub trail: TrailSetting,
}

impl Default for MortarOptions {
    fn default() -> Self {
        Self {
            pos_x: None,
            theta: None,
            power: None,
            power_range: [0.7, 0.9],
            star_color: None,
            trail: TrailSetting::Random,
        }
    }
}

/// Concentric-ring burst.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RingBurst {
    /// Stars in the outermost ring
    pub stars: u32,
    pub rings: u32,
    /// Launch speed of the outermost ring
    pub power: f64,
    pub fade: f64,
}

impl Default for RingBurst {
    fn default() -> Self {
        Self { stars: 12, rings: 3, power: 0.3, fade: 0.8 }
    }
}

impl RingBurst {
    /// Number of stars in ring `ring` (0 = outermost).
    pub fn ring_size(&self, ring: u32) -> u32 {
        let stars = self.stars as f64;
        let shrink = ring as f64 * (stars / (self.rings as f64 + 1.0));
        (stars - shrink).ceil().max(0.0) as u32
    }

    /// Total stars spawned by one pop.
    pub fn star_count(&self) -> u32 {
        (0..self.rings).map(|ring| self.ring_size(ring)).sum()
    }
}

/// Burst that replays a shape table.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeBurst {
    pub points: Vec<StarPoint>,
    /// Launch speed per unit of offset distance
    pub power: f64,
    pub gravity: f64,
    pub fade: f64,
}

impl ShapeBurst {
    /// Heart outline burst.
    pub fn heart() -> Self {
        Self { points: shapes::heart(), power: 0.035, gravity: 0.2, fade: 0.8 }
    }

    /// Pixel-art rocket burst, slow and floaty.
    pub fn rocket() -> Self {
        Self { points: shapes::rocket(), power: 0.035, gravity: 0.035, fade: 0.6 }
    }

    /// Stars spawned by one pop (blank cells excluded).
    pub fn star_count(&self) -> u32 {
        self.points.iter().filter(|p| p.color != StarColor::Blank).count() as u32
    }
}

/// How a shell turns into stars.
#[derive(Debug, Clone, PartialEq)]
pub enum PopPattern {
    Rings(RingBurst),
    Shape(ShapeBurst),
}

impl PopPattern {
    pub fn star_count(&self) -> u32 {
        match self {
            PopPattern::Rings(rings) => rings.star_count(),
            PopPattern::Shape(shape) => shape.star_count(),
        }
    }
}

/// A single launched firework.
#[derive(Debug, Clone)]
pub struct Mortar {
    particles: ParticleSet,
    shell: Option<ParticleId>,
    launch_angle: f64,
    gravity: f64,
    star_color: Color,
    trail_color: Option<Color>,
    pop: PopPattern,
    pops: u32,
    rng: StdRng,
}

impl Mortar {
    /// Launch a mortar with an explicit pop pattern and palette.
    ///
    /// `palette` is only consulted when `options.star_color` is `None`; an
    /// empty palette falls back to white.
    pub fn new(
        extent: Extent,
        options: &MortarOptions,
        pop: PopPattern,
        palette: &[Color],
        mut rng: StdRng,
    ) -> Self {
        let trail_color = match options.trail {
            TrailSetting::Off => None,
            TrailSetting::Color(color) => Some(color),
            TrailSetting::Random => {
                (rng.gen::<f64>() < TRAIL_CHANCE).then_some(DEFAULT_TRAIL_COLOR)
            }
        };

        let star_color = match options.star_color {
            Some(color) => color,
            None if palette.is_empty() => Color::WHITE,
            None => palette[rng.gen_range(0..palette.len())],
        };

        let power = options.power.unwrap_or_else(|| {
            let [lo, hi] = options.power_range;
            lo + (hi - lo) * rng.gen::<f64>()
        });

        let centre = extent.width / 2.0;
        let pos_x = options
            .pos_x
            .unwrap_or_else(|| centre + LAUNCH_JITTER * (2.0 * rng.gen::<f64>() - 1.0));
        let launch_angle =
            options.theta.unwrap_or_else(|| FRAC_PI_2 + ((pos_x - centre) / AIM_HEIGHT).sin());

        let mut particles = ParticleSet::new();
        let shell = particles.add(Particle::new(
            Vec3::new(pos_x, 0.0, 0.0),
            vec![Vec3::from_polar(power, launch_angle, 0.0), fall(GRAVITY)],
            SHELL_COLOR,
            0.0,
        ));

        Self {
            particles,
            shell: Some(shell),
            launch_angle,
            gravity: GRAVITY,
            star_color,
            trail_color,
            pop,
            pops: 0,
            rng,
        }
    }

    /// Classic ring-burst firework.
    pub fn firework(extent: Extent, options: &MortarOptions, rng: StdRng) -> Self {
        Self::new(
            extent,
            options,
            PopPattern::Rings(RingBurst::default()),
            &shapes::FIREWORK_PALETTE,
            rng,
        )
    }

    /// Heart-shaped burst.
    pub fn lovework(extent: Extent, options: &MortarOptions, rng: StdRng) -> Self {
        Self::new(
            extent,
            options,
            PopPattern::Shape(ShapeBurst::heart()),
            &shapes::HEART_PALETTE,
            rng,
        )
    }

    /// Pixel-art burst. `None` uses the built-in rocket.
    pub fn spritework(
        extent: Extent,
        options: &MortarOptions,
        shape: Option<ShapeBurst>,
        rng: StdRng,
    ) -> Self {
        let shape = shape.unwrap_or_else(ShapeBurst::rocket);
        Self::new(extent, options, PopPattern::Shape(shape), &shapes::SPRITE_PALETTE, rng)
    }

    pub fn particles(&self) -> &ParticleSet {
        &self.particles
    }

    pub(crate) fn particles_mut(&mut self) -> &mut ParticleSet {
        &mut self.particles
    }

    /// The shell, while it is still in flight.
    pub fn shell(&self) -> Option<&Particle> {
        self.shell.and_then(|id| self.particles.get(id))
    }

    pub fn launch_angle(&self) -> f64 {
        self.launch_angle
    }

    pub fn star_color(&self) -> Color {
        self.star_color
    }

    pub fn trail_color(&self) -> Option<Color> {
        self.trail_color
    }

    pub fn pop_pattern(&self) -> &PopPattern {
        &self.pop
    }

    /// Number of times this mortar has popped (0 or 1).
    pub fn pops(&self) -> u32 {
        self.pops
    }

    pub fn step(&mut self, dt: f64) {
        self.particles.step(dt);

        let in_flight = self
            .shell
            .and_then(|id| self.particles.get(id).map(|p| (id, p.position, p.velocity().y)));
        if let Some((id, position, vy)) = in_flight {
            if let Some(trail) = self.trail_color.filter(|_| vy > 0.0) {
                let angle = TAU * self.rng.gen::<f64>();
                self.add_star(position, TRAIL_POWER, angle, trail, TRAIL_FADE, self.gravity);
            }

            if vy <= 0.0 {
                self.particles.remove(id);
                self.shell = None;
                self.pop(position);
            }
        }

        let shell = self.shell;
        self.particles.retain(|id, p| Some(id) == shell || p.position.y >= 0.0);
    }

    fn pop(&mut self, position: Vec3) {
        self.pops += 1;
        let stars = self.pop.star_count();
        tracing::debug!(x = position.x, y = position.y, stars, "shell popped");

        self.particles.add(Particle::new(position, vec![Vec3::ZERO], Color::WHITE, FLASH_FADE));

        match self.pop.clone() {
            PopPattern::Rings(rings) => {
                let spacing = TAU / rings.stars as f64;
                let power_step = rings.power / rings.rings as f64;
                for ring in 0..rings.rings {
                    let power = rings.power - power_step * ring as f64;
                    for i in 0..rings.ring_size(ring) {
                        let angle = i as f64 * spacing;
                        let color = self.star_color;
                        self.add_star(position, power, angle, color, rings.fade, self.gravity);
                    }
                }
            }
            PopPattern::Shape(shape) => {
                let rotation = self.launch_angle - FRAC_PI_2;
                for point in &shape.points {
                    let color = match point.color {
                        StarColor::Blank => continue,
                        StarColor::Palette => self.star_color,
                        StarColor::Fixed(color) => color,
                    };
                    let power = shape.power * point.magnitude();
                    let angle = rotation + point.angle();
                    self.add_star(position, power, angle, color, shape.fade, shape.gravity);
                }
            }
        }
    }

    fn add_star(
        &mut self,
        position: Vec3,
        power: f64,
        angle: f64,
        color: Color,
        fade: f64,
        gravity: f64,
    ) -> ParticleId {
        self.particles.add(Particle::new(
            position,
            vec![Vec3::from_polar(power, angle, 0.0), fall(gravity)],
            color,
            fade,
        ))
    }
}

/// Constant downward acceleration, expressed the same polar way as launches.
fn fall(gravity: f64) -> Vec3 {
    Vec3::from_polar(gravity, -FRAC_PI_2, 0.0)
}
