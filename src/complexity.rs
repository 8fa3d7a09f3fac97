//! Frame-sequence complexity: how many pixel writes an animation costs.
//!
//! Curtain controllers import animations as a first frame followed by
//! per-pixel changes, and they cap how many changes a file may carry. The
//! complexity of a sequence is therefore the pixel count of the first frame
//! plus the number of pixels that change between each pair of consecutive
//! frames.

use std::path::{Path, PathBuf};

use image::RgbaImage;
use serde::Serialize;

use crate::error::Result;
use crate::gif::decode_gif;

/// Number of pixel positions whose RGBA values differ.
///
/// Pixels that exist in only one of the two frames count as different.
pub fn pairwise_difference(a: &RgbaImage, b: &RgbaImage) -> u64 {
    let width = a.width().min(b.width());
    let height = a.height().min(b.height());
    let changed = (0..height)
        .flat_map(|y| (0..width).map(move |x| (x, y)))
        .filter(|&(x, y)| a.get_pixel(x, y) != b.get_pixel(x, y))
        .count() as u64;
    let overlap = width as u64 * height as u64;
    changed + (pixel_count(a) - overlap) + (pixel_count(b) - overlap)
}

/// First-frame pixel count plus every consecutive pairwise difference.
///
/// An empty sequence has complexity 0.
pub fn sequence_complexity(frames: &[RgbaImage]) -> u64 {
    let Some(first) = frames.first() else {
        return 0;
    };
    let changes: u64 = frames.windows(2).map(|pair| pairwise_difference(&pair[0], &pair[1])).sum();
    pixel_count(first) + changes
}

fn pixel_count(frame: &RgbaImage) -> u64 {
    frame.width() as u64 * frame.height() as u64
}

/// Complexity of an encoded GIF, measured on its decoded frames.
pub fn gif_complexity(path: &Path) -> Result<u64> {
    Ok(sequence_complexity(&decode_gif(path)?))
}

/// Summary of an analyzed animation file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComplexityReport {
    pub path: PathBuf,
    pub frames: usize,
    pub width: u32,
    pub height: u32,
    pub complexity: u64,
}

/// Decode a GIF and report its size and complexity.
pub fn analyze_gif(path: &Path) -> Result<ComplexityReport> {
    let frames = decode_gif(path)?;
    let (width, height) = frames.first().map(RgbaImage::dimensions).unwrap_or((0, 0));
    Ok(ComplexityReport {
        path: path.to_path_buf(),
        frames: frames.len(),
        width,
        height,
        complexity: sequence_complexity(&frames),
    })
}
