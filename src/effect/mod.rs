//! Effects: groups of particles that share one spawn and trigger policy.
//!
//! Every effect owns a [`ParticleSet`] and is stepped once per tick by the
//! scene. The variants differ only in what they do after the shared physics
//! step:
//!
//! - [`Effect::Group`] - a plain particle group with no policy of its own
//! - [`Effect::Mortar`] - a launched shell that pops into stars at its apex
//! - [`Effect::Sparkles`] - ambient sparkles, fireflies, snow and rain

pub mod mortar;
pub mod shapes;
pub mod sparkles;

pub use mortar::{Mortar, MortarOptions, PopPattern, RingBurst, ShapeBurst, TrailSetting};
pub use shapes::{StarColor, StarPoint};
pub use sparkles::Sparkles;

use crate::error::{CurtainError, Result};
use crate::particle::{Particle, ParticleBuilder, PixelSample};

/// Physical width and height of the area an effect populates, in meters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extent {
    pub width: f64,
    pub height: f64,
}

impl Extent {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Build an extent from `[width, height]`.
    pub fn from_slice(values: &[f64]) -> Result<Self> {
        match values {
            [width, height] => Ok(Self::new(*width, *height)),
            _ => Err(CurtainError::shape("extent", 2, values.len())),
        }
    }
}

impl Default for Extent {
    fn default() -> Self {
        Self::new(1.0, 1.0)
    }
}

/// Stable handle to a particle inside one [`ParticleSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ParticleId(u64);

/// Insertion-ordered particle storage with stable ids.
///
/// Ids are never reused, so an effect can hold on to a particle (a mortar
/// shell, a snowflake) and find out later whether it is still alive.
#[derive(Debug, Clone, Default)]
pub struct ParticleSet {
    entries: Vec<(ParticleId, Particle)>,
    next_id: u64,
}

impl ParticleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a particle and return its handle.
    pub fn add(&mut self, particle: Particle) -> ParticleId {
        let id = ParticleId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, particle));
        id
    }

    /// Validate and append a particle described by slices.
    pub fn add_built(&mut self, builder: ParticleBuilder) -> Result<ParticleId> {
        Ok(self.add(builder.build()?))
    }

    pub fn get(&self, id: ParticleId) -> Option<&Particle> {
        self.entries.iter().find(|(pid, _)| *pid == id).map(|(_, p)| p)
    }

    pub fn get_mut(&mut self, id: ParticleId) -> Option<&mut Particle> {
        self.entries.iter_mut().find(|(pid, _)| *pid == id).map(|(_, p)| p)
    }

    pub fn remove(&mut self, id: ParticleId) -> Option<Particle> {
        let index = self.entries.iter().position(|(pid, _)| *pid == id)?;
        Some(self.entries.remove(index).1)
    }

    /// Keep only the particles for which `keep` returns true, preserving order.
    pub fn retain(&mut self, mut keep: impl FnMut(ParticleId, &Particle) -> bool) {
        self.entries.retain(|(id, p)| keep(*id, p));
    }

    /// Step every particle in insertion order.
    pub fn step(&mut self, dt: f64) {
        for (_, particle) in &mut self.entries {
            particle.step(dt);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Particle> {
        self.entries.iter().map(|(_, p)| p)
    }

    pub fn ids(&self) -> impl Iterator<Item = ParticleId> + '_ {
        self.entries.iter().map(|(id, _)| *id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn sample_pixels(&self) -> Vec<PixelSample> {
        self.iter().map(Particle::pixelize).collect()
    }
}

/// One effect in a scene.
#[derive(Debug, Clone)]
pub enum Effect {
    Group(ParticleSet),
    Mortar(Mortar),
    Sparkles(Sparkles),
}

impl Effect {
    /// An empty plain group.
    pub fn group() -> Self {
        Effect::Group(ParticleSet::new())
    }

    /// Advance every particle one tick, then apply the variant's own policy.
    pub fn step(&mut self, dt: f64) {
        match self {
            Effect::Group(set) => set.step(dt),
            Effect::Mortar(mortar) => mortar.step(dt),
            Effect::Sparkles(sparkles) => sparkles.step(dt),
        }
    }

    pub fn particles(&self) -> &ParticleSet {
        match self {
            Effect::Group(set) => set,
            Effect::Mortar(mortar) => mortar.particles(),
            Effect::Sparkles(sparkles) => sparkles.particles(),
        }
    }

    fn particles_mut(&mut self) -> &mut ParticleSet {
        match self {
            Effect::Group(set) => set,
            Effect::Mortar(mortar) => mortar.particles_mut(),
            Effect::Sparkles(sparkles) => sparkles.particles_mut(),
        }
    }

    /// Construct, append and return a particle described by slices.
    pub fn add_particle(&mut self, builder: ParticleBuilder) -> Result<ParticleId> {
        self.particles_mut().add_built(builder)
    }

    /// Pixelized particles, in insertion order.
    pub fn sample_pixels(&self) -> Vec<PixelSample> {
        self.particles().sample_pixels()
    }

    pub fn as_sparkles_mut(&mut self) -> Option<&mut Sparkles> {
        match self {
            Effect::Sparkles(sparkles) => Some(sparkles),
            _ => None,
        }
    }

    pub fn as_mortar(&self) -> Option<&Mortar> {
        match self {
            Effect::Mortar(mortar) => Some(mortar),
            _ => None,
        }
    }
}

impl From<ParticleSet> for Effect {
    fn from(set: ParticleSet) -> Self {
        Effect::Group(set)
    }
}

impl From<Mortar> for Effect {
    fn from(mortar: Mortar) -> Self {
        Effect::Mortar(mortar)
    }
}

impl From<Sparkles> for Effect {
    fn from(sparkles: Sparkles) -> Self {
        Effect::Sparkles(sparkles)
    }
}
