//! Rasterize snapshots into square RGBA frames and write them as PNG

use std::path::{Path, PathBuf};

use image::{Rgba, RgbaImage};

use crate::core::config::Palette;
use crate::core::types::Color;
use crate::renderer::{RenderError, SnapshotSink};
use crate::simulation::output::Snapshot;

fn fill(palette: &Palette, state: Color) -> Rgba<u8> {
    match state {
        Color::Empty => Rgba(palette.empty),
        Color::TypeA => Rgba(palette.type_a),
        Color::TypeB => Rgba(palette.type_b),
    }
}

/// Pixel span `[start, end)` covered by grid coordinate `i`
#[inline]
fn span(i: usize, size: usize, plot_size: u32) -> (u32, u32) {
    let plot = plot_size as usize;
    ((i * plot / size) as u32, ((i + 1) * plot / size) as u32)
}

/// Draw a snapshot; cell `(x, y)` covers pixel column span of `x`, row span of `y`
pub fn rasterize(snapshot: &Snapshot, plot_size: u32, palette: &Palette) -> RgbaImage {
    let mut image = RgbaImage::from_pixel(plot_size, plot_size, Rgba(palette.empty));
    if snapshot.size == 0 {
        return image;
    }

    for cell in snapshot.cells.iter().filter(|c| !c.state.is_empty()) {
        let color = fill(palette, cell.state);
        let (x0, x1) = span(cell.x, snapshot.size, plot_size);
        let (y0, y1) = span(cell.y, snapshot.size, plot_size);
        for px in x0..x1 {
            for py in y0..y1 {
                image.put_pixel(px, py, color);
            }
        }
    }
    image
}

/// Writes `<tick>.png` per snapshot into a directory
pub struct FrameWriter {
    dir: PathBuf,
    plot_size: u32,
    palette: Palette,
    /// Zero padding so lexical file order matches tick order
    digits: usize,
    written: Vec<PathBuf>,
}

impl FrameWriter {
    pub fn new(dir: impl Into<PathBuf>, plot_size: u32, palette: Palette, max_tick: u64) -> Self {
        Self {
            dir: dir.into(),
            plot_size,
            palette,
            digits: max_tick.to_string().len(),
            written: Vec::new(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }

    pub fn frame_path(&self, tick: u64) -> PathBuf {
        self.dir
            .join(format!("{:0width$}.png", tick, width = self.digits))
    }
}

impl SnapshotSink for FrameWriter {
    fn consume(&mut self, snapshot: &Snapshot) -> Result<(), RenderError> {
        let image = rasterize(snapshot, self.plot_size, &self.palette);
        let path = self.frame_path(snapshot.tick);
        image.save(&path)?;
        tracing::debug!("Wrote frame {}", path.display());
        self.written.push(path);
        Ok(())
    }
}
