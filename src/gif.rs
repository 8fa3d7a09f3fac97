//! Animated GIF encoding and decoding

use crate::error::Result;
use image::codecs::gif::{GifDecoder, GifEncoder, Repeat};
use image::{AnimationDecoder, Frame, RgbaImage};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

/// Render a sequence of frames as an animated GIF.
///
/// # Arguments
///
/// * `frames` - The image frames to include in the animation
/// * `duration_ms` - Duration per frame in milliseconds
/// * `loop_count` - Number of repeats; `0` loops forever
/// * `path` - Output file path
///
/// # Returns
///
/// * `Ok(())` on success
/// * `Err(CurtainError)` on failure
pub fn render_gif(
    frames: &[RgbaImage],
    duration_ms: u32,
    loop_count: u16,
    path: &Path,
) -> Result<()> {
    if frames.is_empty() {
        return Ok(());
    }

    // Create parent directories if they don't exist
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let mut encoder = GifEncoder::new(writer);

    let repeat = if loop_count == 0 { Repeat::Infinite } else { Repeat::Finite(loop_count) };
    encoder.set_repeat(repeat)?;

    // GIF uses centiseconds (1/100th of a second) for delays
    let delay_cs = (duration_ms / 10).max(1);
    let delay = image::Delay::from_numer_denom_ms(delay_cs * 10, 1);

    for rgba_image in frames {
        let frame = Frame::from_parts(rgba_image.clone(), 0, 0, delay);
        encoder.encode_frame(frame)?;
    }

    Ok(())
}

/// Decode every frame of an animated GIF into full-size RGBA buffers.
pub fn decode_gif(path: &Path) -> Result<Vec<RgbaImage>> {
    let reader = BufReader::new(File::open(path)?);
    let decoder = GifDecoder::new(reader)?;
    let frames = decoder.into_frames().collect_frames()?;
    Ok(frames.into_iter().map(Frame::into_buffer).collect())
}
