//! Curtainfx - particle animations for LED light curtains
//!
//! This library provides functionality to:
//! - Simulate particles and particle effects (fireworks, shaped bursts, sparkles)
//! - Rasterize effects onto the curtain's pixel grid, one frame per tick
//! - Measure frame-sequence complexity and export animated GIFs behind a
//!   complexity gate

pub mod cli;
pub mod complexity;
pub mod config;
pub mod effect;
pub mod error;
pub mod export;
pub mod gif;
pub mod particle;
pub mod scene;
pub mod show;

pub use error::{CurtainError, Result};
