//! Append-only text dump of cell tuples per sampled iteration

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::renderer::{RenderError, SnapshotSink};
use crate::simulation::output::Snapshot;

pub struct TextLog {
    path: PathBuf,
    writer: BufWriter<File>,
}

impl TextLog {
    /// Open `path` for appending, creating it if needed
    pub fn open(path: impl AsRef<Path>) -> Result<Self, RenderError> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        Ok(Self {
            path,
            writer: BufWriter::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn flush(&mut self) -> Result<(), RenderError> {
        self.writer.flush()?;
        Ok(())
    }
}

impl SnapshotSink for TextLog {
    fn consume(&mut self, snapshot: &Snapshot) -> Result<(), RenderError> {
        self.writer.write_all(snapshot.to_log_entry().as_bytes())?;
        Ok(())
    }
}
