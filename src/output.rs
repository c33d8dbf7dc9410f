//! Pattern sinks: file mode and memory mode
//!
//! File mode streams each closed pattern as soon as it is found, one per
//! line in the standard format (`1 2 -1 5 -1  #SUP: 4`). Memory mode
//! collects patterns into a [`PatternSet`]. Write failures abort mining and
//! leave any partial file as-is.

use crate::pattern::{PatternSet, SequentialPattern};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

#[derive(Debug)]
enum Sink {
    File(BufWriter<File>),
    Memory(PatternSet),
}

#[derive(Debug)]
pub struct PatternSink {
    sink: Sink,
    saved: usize,
}

impl PatternSink {
    /// Sink that writes one pattern per line to `path`
    pub fn file(path: &Path) -> io::Result<Self> {
        Ok(Self {
            sink: Sink::File(BufWriter::new(File::create(path)?)),
            saved: 0,
        })
    }

    /// Sink that collects patterns in memory
    pub fn memory() -> Self {
        Self {
            sink: Sink::Memory(PatternSet::new()),
            saved: 0,
        }
    }

    /// Persist one closed pattern
    pub fn save(&mut self, pattern: &SequentialPattern) -> io::Result<()> {
        match &mut self.sink {
            Sink::File(writer) => writeln!(writer, "{pattern}")?,
            Sink::Memory(set) => set.add(pattern.clone()),
        }
        self.saved += 1;
        Ok(())
    }

    /// Number of patterns saved so far
    pub fn pattern_count(&self) -> usize {
        self.saved
    }

    /// Flush file sinks; memory sinks hand back the collected patterns
    pub fn finish(self) -> io::Result<Option<PatternSet>> {
        match self.sink {
            Sink::File(mut writer) => {
                writer.flush()?;
                Ok(None)
            }
            Sink::Memory(set) => Ok(Some(set)),
        }
    }
}
