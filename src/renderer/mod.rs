//! Snapshot consumers: PNG frames, GIF assembly and the text cell log.
//!
//! Consumers only ever see `Snapshot` copies and never touch the live grid.
//! Their I/O errors stay in `RenderError` and never reach the simulation API.

pub mod animation;
pub mod frame;
pub mod text_log;

use thiserror::Error;

use crate::simulation::output::Snapshot;

pub use animation::assemble_gif;
pub use frame::{rasterize, FrameWriter};
pub use text_log::TextLog;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("No frames found in {}", .0.display())]
    NoFrames(std::path::PathBuf),
}

/// Anything that accepts sampled snapshots
pub trait SnapshotSink {
    fn consume(&mut self, snapshot: &Snapshot) -> Result<(), RenderError>;
}

/// Remove and recreate an output directory
pub fn prepare_dir(dir: &std::path::Path) -> Result<(), RenderError> {
    if dir.exists() {
        std::fs::remove_dir_all(dir)?;
    }
    std::fs::create_dir_all(dir)?;
    Ok(())
}
