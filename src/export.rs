//! Writing animations to disk, with an optional complexity acceptance gate.
//!
//! The gate runs after the file is fully written: the GIF is decoded again and
//! measured, because palette quantization in the encoder can make the file's
//! complexity differ from that of the in-memory frames. Rejected files are
//! deleted; accepted files are renamed to carry their score.

use std::path::{Path, PathBuf};

use image::RgbaImage;

use crate::complexity::gif_complexity;
use crate::error::{CurtainError, Result};
use crate::gif::render_gif;

/// Inclusive `[min, max]` range of acceptable complexity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComplexityBounds {
    pub min: u64,
    pub max: u64,
}

impl ComplexityBounds {
    pub const fn new(min: u64, max: u64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, complexity: u64) -> bool {
        self.min <= complexity && complexity <= self.max
    }
}

/// How to write an animation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOptions {
    pub frame_duration_ms: u32,
    /// `0` loops forever
    pub loop_count: u16,
    pub complexity_bounds: Option<ComplexityBounds>,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self { frame_duration_ms: 200, loop_count: 0, complexity_bounds: None }
    }
}

/// Result of an export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    /// File kept at `path`. `complexity` is set when a gate measured it.
    Accepted { path: PathBuf, complexity: Option<u64> },
    /// File failed the gate and was deleted.
    Rejected { complexity: u64 },
}

impl ExportOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, ExportOutcome::Accepted { .. })
    }

    /// Final path of an accepted file.
    pub fn path(&self) -> Option<&Path> {
        match self {
            ExportOutcome::Accepted { path, .. } => Some(path),
            ExportOutcome::Rejected { .. } => None,
        }
    }

    pub fn complexity(&self) -> Option<u64> {
        match self {
            ExportOutcome::Accepted { complexity, .. } => *complexity,
            ExportOutcome::Rejected { complexity } => Some(*complexity),
        }
    }
}

/// `dir/name.gif` -> `dir/name_<complexity>.gif`.
pub fn complexity_path(path: &Path, complexity: u64) -> PathBuf {
    let stem = path.file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or_default();
    path.with_file_name(format!("{}_{}.gif", stem, complexity))
}

/// Write `frames` to `path`, then apply the complexity gate if one is set.
///
/// Gate rejection is a normal outcome, not an error. IO and codec failures
/// are returned unchanged.
pub fn export(frames: &[RgbaImage], path: &Path, options: &ExportOptions) -> Result<ExportOutcome> {
    if frames.is_empty() {
        return Err(CurtainError::configuration("no frames to export"));
    }

    render_gif(frames, options.frame_duration_ms, options.loop_count, path)?;

    let Some(bounds) = options.complexity_bounds else {
        tracing::info!(path = %path.display(), frames = frames.len(), "exported animation");
        return Ok(ExportOutcome::Accepted { path: path.to_path_buf(), complexity: None });
    };

    let complexity = gif_complexity(path)?;
    if !bounds.contains(complexity) {
        std::fs::remove_file(path)?;
        tracing::info!(
            path = %path.display(),
            complexity,
            min = bounds.min,
            max = bounds.max,
            "rejected animation"
        );
        return Ok(ExportOutcome::Rejected { complexity });
    }

    let renamed = complexity_path(path, complexity);
    std::fs::rename(path, &renamed)?;
    tracing::info!(path = %renamed.display(), complexity, "accepted animation");
    Ok(ExportOutcome::Accepted { path: renamed, complexity: Some(complexity) })
}
