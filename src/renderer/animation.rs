//! Assemble written PNG frames into an animated GIF

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use image::codecs::gif::{GifEncoder, Repeat};
use image::{Delay, Frame};

use crate::renderer::RenderError;

/// PNG files in `dir`, sorted by file name
pub fn list_frames(dir: &Path) -> Result<Vec<PathBuf>, RenderError> {
    let mut frames: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            path.extension()
                .map(|ext| ext.eq_ignore_ascii_case("png"))
                .unwrap_or(false)
        })
        .collect();
    frames.sort();
    Ok(frames)
}

/// Encode every frame in `frames_dir` into a looping GIF; returns the frame count
pub fn assemble_gif(
    frames_dir: &Path,
    gif_path: &Path,
    delay_ms: u32,
) -> Result<usize, RenderError> {
    let frames = list_frames(frames_dir)?;
    if frames.is_empty() {
        return Err(RenderError::NoFrames(frames_dir.to_path_buf()));
    }

    let file = BufWriter::new(File::create(gif_path)?);
    let mut encoder = GifEncoder::new(file);
    encoder.set_repeat(Repeat::Infinite)?;

    let delay = Delay::from_numer_denom_ms(delay_ms, 1);
    for path in &frames {
        let buffer = image::open(path)?.to_rgba8();
        encoder.encode_frame(Frame::from_parts(buffer, 0, 0, delay))?;
    }

    tracing::info!("Encoded {} frames into {}", frames.len(), gif_path.display());
    Ok(frames.len())
}
