//! Per-tick position trace, written as CSV.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::events::WorldEvent;

/// Streams `Moved` events to a CSV sink, one row per body per tick.
pub struct Recorder<W: Write> {
    out: W,
    rows: u64,
}

impl Recorder<BufWriter<File>> {
    pub fn create(path: &Path) -> io::Result<Self> {
        Self::new(BufWriter::new(File::create(path)?))
    }
}

impl<W: Write> Recorder<W> {
    pub fn new(mut out: W) -> io::Result<Self> {
        writeln!(out, "tick,id,x,y")?;
        Ok(Self { out, rows: 0 })
    }

    /// Write a row for every `Moved` event in `events`. Other events are skipped.
    pub fn capture(&mut self, tick: u64, events: &[WorldEvent]) -> io::Result<()> {
        for event in events {
            if let WorldEvent::Moved { id, position } = event {
                writeln!(self.out, "{},{},{},{}", tick, id.0, position.x, position.y)?;
                self.rows += 1;
            }
        }
        Ok(())
    }

    pub fn rows(&self) -> u64 {
        self.rows
    }

    /// Flush and hand back the sink.
    pub fn finish(mut self) -> io::Result<W> {
        self.out.flush()?;
        Ok(self.out)
    }
}
