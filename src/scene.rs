//! Scene compositor: steps effects and rasterizes them onto the curtain grid.
//!
//! Effects place particles in meters with Y pointing up. Each tick the scene
//! scales every particle position onto the pixel grid, flips it so row 0 is
//! the top of the curtain, and paints it over an opaque black background. No
//! blending happens: later particles simply overwrite earlier ones.

use std::path::Path;

use image::{Rgba, RgbaImage};

use crate::effect::{Effect, Extent};
use crate::error::{CurtainError, Result};
use crate::export::{export, ExportOptions, ExportOutcome};
use crate::particle::Vec3;

/// Pixel columns per curtain panel.
pub const PANEL_PIXEL_WIDTH: u32 = 20;
/// Pixel rows of every curtain.
pub const CURTAIN_PIXEL_HEIGHT: u32 = 26;
/// Physical spacing between neighbouring lights (m), both axes.
pub const LIGHT_PITCH_M: f64 = 0.08;

const BACKGROUND: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// Pixel and physical size of a curtain made of `panels` side-by-side panels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurtainLayout {
    pub panels: u32,
}

impl CurtainLayout {
    pub const fn new(panels: u32) -> Self {
        Self { panels }
    }

    pub fn pixel_size(&self) -> (u32, u32) {
        (self.panels * PANEL_PIXEL_WIDTH, CURTAIN_PIXEL_HEIGHT)
    }

    pub fn physical_size(&self) -> Extent {
        let (width, height) = self.pixel_size();
        Extent::new(width as f64 * LIGHT_PITCH_M, height as f64 * LIGHT_PITCH_M)
    }
}

/// Owns the effects of one run and the frames rendered so far.
#[derive(Debug, Clone)]
pub struct Scene {
    width: u32,
    height: u32,
    physical: Extent,
    time_step: f64,
    effects: Vec<Effect>,
    frames: Vec<RgbaImage>,
    ticks: u64,
}

impl Scene {
    /// Create an empty scene.
    ///
    /// Fails when the grid is empty, the physical size is not positive, or
    /// the time step is not positive.
    pub fn new(pixel_size: (u32, u32), physical: Extent, time_step: f64) -> Result<Self> {
        let (width, height) = pixel_size;
        if width == 0 || height == 0 {
            return Err(CurtainError::configuration(format!(
                "pixel size must be non-zero (got {}x{})",
                width, height
            )));
        }
        if !positive(physical.width) || !positive(physical.height) {
            return Err(CurtainError::configuration(format!(
                "physical size must be positive (got {}x{} m)",
                physical.width, physical.height
            )));
        }
        if !positive(time_step) {
            return Err(CurtainError::configuration(format!(
                "time step must be positive (got {})",
                time_step
            )));
        }

        Ok(Self {
            width,
            height,
            physical,
            time_step,
            effects: Vec::new(),
            frames: Vec::new(),
            ticks: 0,
        })
    }

    /// Scene sized for a curtain of `panels` panels.
    pub fn for_layout(layout: CurtainLayout, time_step: f64) -> Result<Self> {
        Self::new(layout.pixel_size(), layout.physical_size(), time_step)
    }

    pub fn pixel_size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn physical_size(&self) -> Extent {
        self.physical
    }

    pub fn time_step(&self) -> f64 {
        self.time_step
    }

    /// Simulated seconds so far.
    pub fn elapsed(&self) -> f64 {
        self.ticks as f64 * self.time_step
    }

    /// Add an effect; returns its index for [`effect_mut`](Self::effect_mut).
    pub fn add_effect(&mut self, effect: impl Into<Effect>) -> usize {
        self.effects.push(effect.into());
        self.effects.len() - 1
    }

    pub fn effects(&self) -> &[Effect] {
        &self.effects
    }

    pub fn effect_mut(&mut self, index: usize) -> Option<&mut Effect> {
        self.effects.get_mut(index)
    }

    pub fn frames(&self) -> &[RgbaImage] {
        &self.frames
    }

    pub fn into_frames(self) -> Vec<RgbaImage> {
        self.frames
    }

    /// Run `ceil(seconds / time_step)` ticks; returns how many ran.
    pub fn advance(&mut self, seconds: f64) -> usize {
        let ticks = (seconds / self.time_step).ceil();
        let ticks = if ticks > 0.0 { ticks as usize } else { 0 };
        for _ in 0..ticks {
            self.tick();
        }
        tracing::trace!(ticks, frames = self.frames.len(), "advanced scene");
        ticks
    }

    /// Step every effect once, then append a freshly rendered frame.
    pub fn tick(&mut self) {
        for effect in &mut self.effects {
            effect.step(self.time_step);
        }
        self.ticks += 1;
        let frame = self.render_frame();
        self.frames.push(frame);
    }

    /// Map a physical position to `(column, row)`, or `None` when off-grid.
    pub fn pixel_for(&self, position: Vec3) -> Option<(u32, u32)> {
        let scale_x = self.width as f64 / self.physical.width;
        let scale_y = self.height as f64 / self.physical.height;
        let x = (position.x * scale_x).floor();
        let y = (position.y * scale_y).floor();

        if x.is_nan() || y.is_nan() {
            return None;
        }
        if x < 0.0 || y < 0.0 || x >= self.width as f64 || y >= self.height as f64 {
            return None;
        }
        let (x, y) = (x as u32, y as u32);
        Some((x, self.height - 1 - y))
    }

    /// Rasterize the current particle state without stepping.
    pub fn render_frame(&self) -> RgbaImage {
        let mut frame = RgbaImage::from_pixel(self.width, self.height, BACKGROUND);
        for effect in &self.effects {
            for particle in effect.particles().iter() {
                if let Some((x, y)) = self.pixel_for(particle.position) {
                    frame.put_pixel(x, y, particle.pixelize().opaque_rgba());
                }
            }
        }
        frame
    }

    /// Export the accumulated frames; see [`export`].
    pub fn export(&self, path: &Path, options: &ExportOptions) -> Result<ExportOutcome> {
        export(&self.frames, path, options)
    }
}

fn positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}
