//! Point particles and the cascaded Euler integrator that moves them.
//!
//! A [`Particle`] carries a position in meters, a chain of motion derivatives
//! (velocity, acceleration, jerk, ...), an RGB color that fades over time and a
//! fixed alpha value. Positions and colors stay in `f64` for the whole
//! simulation; quantization only happens in [`Particle::pixelize`], so sub-pixel
//! motion accumulates without loss between ticks.
//!
//! # Example
//!
//! ```
//! use curtainfx::particle::Particle;
//!
//! let mut spark = Particle::builder()
//!     .position(&[0.5, 1.0, 0.0])
//!     .motion([[0.0, 1.0, 0.0], [0.0, -0.2, 0.0]])
//!     .color(&[255.0, 200.0, 0.0, 255.0])
//!     .fade(1.0)
//!     .build()
//!     .unwrap();
//!
//! spark.step(0.2);
//! assert!((spark.position.y - 1.2).abs() < 1e-9);
//! ```

use std::ops::{Add, AddAssign, Mul};

use image::Rgba;

use crate::error::{CurtainError, Result};

/// A 3-component vector in physical units.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 { x: 0.0, y: 0.0, z: 0.0 };

    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Convert a `(radius, inclination, azimuth)` triple to Cartesian form.
    ///
    /// The inclination `theta` is measured from the +X axis in the X/Y plane,
    /// and the azimuth `rho` rotates that plane around X.
    pub fn from_polar(radius: f64, theta: f64, rho: f64) -> Self {
        Self {
            x: radius * theta.cos(),
            y: radius * theta.sin() * rho.cos(),
            z: radius * theta.sin() * rho.sin(),
        }
    }

    /// Build a vector from a slice, failing unless it has exactly 3 components.
    pub fn from_slice(what: &'static str, values: &[f64]) -> Result<Self> {
        match values {
            [x, y, z] => Ok(Self::new(*x, *y, *z)),
            _ => Err(CurtainError::shape(what, 3, values.len())),
        }
    }

    /// Component-wise floor, truncated to integers.
    pub fn floor(&self) -> [i64; 3] {
        [self.x.floor() as i64, self.y.floor() as i64, self.z.floor() as i64]
    }
}

impl Add for Vec3 {
    type Output = Vec3;

    fn add(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl AddAssign for Vec3 {
    fn add_assign(&mut self, rhs: Vec3) {
        self.x += rhs.x;
        self.y += rhs.y;
        self.z += rhs.z;
    }
}

impl Mul<f64> for Vec3 {
    type Output = Vec3;

    fn mul(self, rhs: f64) -> Vec3 {
        Vec3::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

/// Particle color: three real channels plus a constant alpha.
///
/// Channels are nominally in `[0, 255]` but are allowed to leave that range
/// while fading.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub rgb: [f64; 3],
    pub alpha: u8,
}

impl Color {
    pub const WHITE: Color = Color::opaque(255.0, 255.0, 255.0);

    pub const fn new(r: f64, g: f64, b: f64, alpha: u8) -> Self {
        Self { rgb: [r, g, b], alpha }
    }

    pub const fn opaque(r: f64, g: f64, b: f64) -> Self {
        Self::new(r, g, b, 255)
    }

    pub fn from_rgba(rgba: [u8; 4]) -> Self {
        Self::new(rgba[0] as f64, rgba[1] as f64, rgba[2] as f64, rgba[3])
    }

    /// Build a color from `[r, g, b, a]`; extra components are ignored.
    pub fn from_slice(values: &[f64]) -> Result<Self> {
        if values.len() < 4 {
            return Err(CurtainError::shape("color", 4, values.len()));
        }
        let alpha = values[3].clamp(0.0, 255.0) as u8;
        Ok(Self::new(values[0], values[1], values[2], alpha))
    }
}

/// Integer sample of a particle: floored position and `[r, g, b, a]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelSample {
    pub position: [i64; 3],
    pub color: [i64; 4],
}

impl PixelSample {
    /// Frame pixel for this sample. Out-of-range channels saturate and alpha
    /// is always written opaque.
    pub fn opaque_rgba(&self) -> Rgba<u8> {
        let channel = |c: i64| c.clamp(0, 255) as u8;
        Rgba([channel(self.color[0]), channel(self.color[1]), channel(self.color[2]), 255])
    }
}

/// A single simulated point of light.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    /// Position in meters
    pub position: Vec3,
    /// Derivative chain: `[velocity, acceleration, ...]`, never empty
    motion: Vec<Vec3>,
    pub color: Color,
    /// Fraction of color lost per second
    pub fade_rate: f64,
}

impl Particle {
    /// Create a particle from already-typed parts.
    ///
    /// An empty motion chain is replaced by a single zero velocity.
    pub fn new(position: Vec3, motion: Vec<Vec3>, color: Color, fade_rate: f64) -> Self {
        let motion = if motion.is_empty() { vec![Vec3::ZERO] } else { motion };
        Self { position, motion, color, fade_rate }
    }

    /// Start building a particle from untyped slices.
    pub fn builder() -> ParticleBuilder {
        ParticleBuilder::default()
    }

    /// The motion chain, lowest order first.
    pub fn motion(&self) -> &[Vec3] {
        &self.motion
    }

    pub fn motion_mut(&mut self) -> &mut [Vec3] {
        &mut self.motion
    }

    pub fn velocity(&self) -> Vec3 {
        self.motion[0]
    }

    /// Advance one tick: fade first, then cascaded Euler motion.
    ///
    /// Position moves by the pre-step velocity; each derivative then moves by
    /// the pre-step value of the next one. The last entry is constant.
    pub fn step(&mut self, dt: f64) {
        let keep = 1.0 - self.fade_rate * dt;
        for channel in &mut self.color.rgb {
            *channel *= keep;
        }

        self.position += self.motion[0] * dt;
        for i in 1..self.motion.len() {
            let higher = self.motion[i];
            self.motion[i - 1] += higher * dt;
        }
    }

    /// Quantize position and color to integers.
    pub fn pixelize(&self) -> PixelSample {
        let [r, g, b] = self.color.rgb;
        PixelSample {
            position: self.position.floor(),
            color: [r.floor() as i64, g.floor() as i64, b.floor() as i64, self.color.alpha as i64],
        }
    }
}

/// Validating constructor for particles described by plain slices.
///
/// Exactly one of [`motion`](Self::motion) or [`polar`](Self::polar) may be
/// given. Nothing is checked until [`build`](Self::build), which either returns
/// a complete particle or an error.
#[derive(Debug, Clone, Default)]
pub struct ParticleBuilder {
    position: Option<Vec<f64>>,
    motion: Option<Vec<Vec<f64>>>,
    polar: Option<Vec<Vec<f64>>>,
    color: Option<Vec<f64>>,
    fade: f64,
}

impl ParticleBuilder {
    pub fn position(mut self, position: &[f64]) -> Self {
        self.position = Some(position.to_vec());
        self
    }

    /// Cartesian derivative chain.
    pub fn motion<I, V>(mut self, chain: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: AsRef<[f64]>,
    {
        self.motion = Some(chain.into_iter().map(|v| v.as_ref().to_vec()).collect());
        self
    }

    /// Derivative chain as `(radius, theta, rho)` triples.
    pub fn polar<I, V>(mut self, chain: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: AsRef<[f64]>,
    {
        self.polar = Some(chain.into_iter().map(|v| v.as_ref().to_vec()).collect());
        self
    }

    pub fn color(mut self, color: &[f64]) -> Self {
        self.color = Some(color.to_vec());
        self
    }

    pub fn fade(mut self, fade_rate: f64) -> Self {
        self.fade = fade_rate;
        self
    }

    pub fn build(self) -> Result<Particle> {
        let position = match &self.position {
            Some(p) => Vec3::from_slice("position", p)?,
            None => Vec3::ZERO,
        };

        let motion = match (self.motion, self.polar) {
            (Some(_), Some(_)) => {
                return Err(CurtainError::configuration(
                    "cartesian and polar motion chains are mutually exclusive",
                ))
            }
            (Some(chain), None) => chain
                .iter()
                .map(|v| Vec3::from_slice("motion vector", v))
                .collect::<Result<Vec<_>>>()?,
            (None, Some(chain)) => chain
                .iter()
                .map(|v| {
                    Vec3::from_slice("polar motion vector", v)
                        .map(|p| Vec3::from_polar(p.x, p.y, p.z))
                })
                .collect::<Result<Vec<_>>>()?,
            (None, None) => Vec::new(),
        };

        let color = match &self.color {
            Some(c) => Color::from_slice(c)?,
            None => Color::WHITE,
        };

        Ok(Particle::new(position, motion, color, self.fade))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-12
    }

    #[test]
    fn test_velocity_only_step() {
        let mut p = Particle::builder()
            .position(&[1.0, 2.0, 0.0])
            .motion([[0.5, -1.0, 0.25]])
            .build()
            .unwrap();
        p.step(0.2);
        assert!(approx(p.position.x, 1.1));
        assert!(approx(p.position.y, 1.8));
        assert!(approx(p.position.z, 0.05));
        assert_eq!(p.velocity(), Vec3::new(0.5, -1.0, 0.25));
    }

    #[test]
    fn test_position_uses_pre_step_velocity() {
        let mut p =
            Particle::builder().motion([[0.0, 1.0, 0.0], [0.0, -10.0, 0.0]]).build().unwrap();
        p.step(0.5);
        assert!(approx(p.position.y, 0.5));
        assert!(approx(p.velocity().y, -4.0));
        assert_eq!(p.motion()[1], Vec3::new(0.0, -10.0, 0.0));
    }

    #[test]
    fn test_deep_chain_cascades_one_order_per_step() {
        let mut p = Particle::builder()
            .motion([[0.0, 0.0, 0.0], [0.0, 0.0, 0.0], [1.0, 0.0, 0.0]])
            .build()
            .unwrap();
        p.step(1.0);
        assert_eq!(p.position.x, 0.0);
        assert_eq!(p.motion()[0].x, 0.0);
        assert_eq!(p.motion()[1].x, 1.0);
        p.step(1.0);
        assert_eq!(p.position.x, 0.0);
        assert_eq!(p.motion()[0].x, 1.0);
        assert_eq!(p.motion()[1].x, 2.0);
        p.step(1.0);
        assert_eq!(p.position.x, 1.0);
        assert_eq!(p.motion()[2].x, 1.0);
    }

    #[test]
    fn test_polar_conversion() {
        let p = Particle::builder().polar([[1.0, 0.0, 0.0]]).build().unwrap();
        assert_eq!(p.velocity(), Vec3::new(1.0, 0.0, 0.0));

        let p = Particle::builder().polar([[1.0, FRAC_PI_2, 0.0]]).build().unwrap();
        assert!(approx(p.velocity().x, 0.0));
        assert!(approx(p.velocity().y, 1.0));
        assert!(approx(p.velocity().z, 0.0));

        let v = Vec3::from_polar(2.0, FRAC_PI_2, FRAC_PI_2);
        assert!(approx(v.y, 0.0));
        assert!(approx(v.z, 2.0));
    }

    #[test]
    fn test_fade_is_multiplicative() {
        let mut p =
            Particle::builder().color(&[200.0, 100.0, 50.0, 255.0]).fade(0.5).build().unwrap();
        p.step(0.2);
        assert_eq!(p.color.rgb, [200.0 * 0.9, 100.0 * 0.9, 50.0 * 0.9]);
        assert_eq!(p.color.alpha, 255);
    }

    #[test]
    fn test_fade_past_one_goes_negative() {
        let mut p =
            Particle::builder().color(&[100.0, 0.0, 10.0, 255.0]).fade(2.0).build().unwrap();
        p.step(1.0);
        assert_eq!(p.color.rgb, [-100.0, 0.0, -10.0]);
        p.step(1.0);
        assert_eq!(p.color.rgb, [100.0, 0.0, 10.0]);
    }

    #[test]
    fn test_pixelize_floors() {
        let p = Particle::builder()
            .position(&[1.9, -0.1, 0.0])
            .color(&[254.7, 0.2, -0.5, 128.0])
            .build()
            .unwrap();
        let sample = p.pixelize();
        assert_eq!(sample.position, [1, -1, 0]);
        assert_eq!(sample.color, [254, 0, -1, 128]);
        assert_eq!(sample.opaque_rgba(), Rgba([254, 0, 0, 255]));
    }

    #[test]
    fn test_bad_position_shape() {
        let err = Particle::builder().position(&[1.0, 2.0]).build().unwrap_err();
        assert!(matches!(err, CurtainError::Shape { what: "position", expected: 3, actual: 2 }));
    }

    #[test]
    fn test_bad_motion_shape() {
        let err = Particle::builder()
            .motion(vec![vec![0.0, 0.0, 0.0], vec![0.0, 1.0]])
            .build()
            .unwrap_err();
        assert!(matches!(err, CurtainError::Shape { actual: 2, .. }));

        let err = Particle::builder().polar(vec![vec![1.0, 0.0, 0.0, 0.0]]).build().unwrap_err();
        assert!(matches!(err, CurtainError::Shape { actual: 4, .. }));
    }

    #[test]
    fn test_short_color_rejected() {
        let err = Particle::builder().color(&[255.0, 0.0, 0.0]).build().unwrap_err();
        assert!(matches!(err, CurtainError::Shape { what: "color", .. }));
    }

    #[test]
    fn test_both_chains_rejected() {
        let err = Particle::builder()
            .motion([[0.0, 0.0, 0.0]])
            .polar([[1.0, 0.0, 0.0]])
            .build()
            .unwrap_err();
        assert!(matches!(err, CurtainError::Configuration(_)));
    }

    #[test]
    fn test_empty_chain_defaults_to_still() {
        let mut p = Particle::builder().position(&[0.3, 0.3, 0.0]).build().unwrap();
        assert_eq!(p.motion().len(), 1);
        p.step(1.0);
        assert_eq!(p.position, Vec3::new(0.3, 0.3, 0.0));
    }
}
