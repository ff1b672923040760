// THEORY:
// The sink turns the pipeline's output into a plain-text time series. Each processed
// frame becomes one line: the frame's timestamp in seconds followed by the cell
// medians, all comma separated:
//
//     12.48,17,17,18,20,...
//
// The writer is generic over `Write` so that tests and other tools can capture the
// series in memory, while `create` gives the common buffered-file setup.

use crate::error::Result;
use crate::pipeline::Fingerprint;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Writes `(timestamp, fingerprint)` pairs as comma-separated lines.
pub struct TimeSeriesWriter<W: Write> {
    writer: W,
    lines_written: u64,
}

impl TimeSeriesWriter<BufWriter<File>> {
    /// Creates (or truncates) the file at `path`.
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::create(path)?;
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write> TimeSeriesWriter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            lines_written: 0,
        }
    }

    pub fn write_line(&mut self, timestamp: f64, fingerprint: &Fingerprint) -> Result<()> {
        write!(self.writer, "{timestamp}")?;
        for value in fingerprint.values() {
            write!(self.writer, ",{value}")?;
        }
        writeln!(self.writer)?;
        self.lines_written += 1;
        Ok(())
    }

    pub fn lines_written(&self) -> u64 {
        self.lines_written
    }

    /// Flushes everything written so far and hands back the underlying writer.
    pub fn finish(mut self) -> Result<W> {
        self.writer.flush()?;
        Ok(self.writer)
    }
}
