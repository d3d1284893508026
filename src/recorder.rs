// src/recorder.rs
//
// Append-only JSONL observation store.
//
// Each transition is one self-contained JSON line. The writer is guarded by
// a single mutex so concurrent callers can never interleave the bytes of two
// records, and every record is flushed before success is acknowledged.
//
// Two open modes with distinct lifecycles:
// - append: live serving; existing records are never rewritten or reordered
// - create: dataset (re)generation; truncates the store first
// Running both against the same path concurrently is a caller error; the
// driver owns its store exclusively for exactly this reason.

use std::fs::{File, OpenOptions};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::types::Transition;

pub struct ObservationLog {
    path: PathBuf,
    writer: Mutex<BufWriter<File>>,
}

impl ObservationLog {
    /// Open the store in append mode (live recording).
    pub fn append(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            writer: Mutex::new(BufWriter::new(file)),
        })
    }

    /// Open the store in truncate mode (dataset regeneration), replacing any
    /// prior content.
    pub fn create(path: &Path) -> io::Result<Self> {
        let file = File::create(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            writer: Mutex::new(BufWriter::new(file)),
        })
    }

    /// Resolved store path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append exactly one serialized transition, newline-terminated.
    ///
    /// The line is written and flushed under the writer lock; an Ok return
    /// means the record reached the OS.
    pub fn record(&self, transition: &Transition) -> io::Result<()> {
        let line = serde_json::to_string(transition)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        let mut writer = self.writer.lock().expect("observation log writer lock");
        writer.write_all(line.as_bytes())?;
        writer.write_all(b"\n")?;
        writer.flush()
    }
}

/// Read a store back into memory, skipping blank lines.
///
/// Malformed lines are an error: the store contract is that every record is
/// a well-formed transition.
pub fn read_transitions(path: &Path) -> io::Result<Vec<Transition>> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);

    let mut out = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let transition = serde_json::from_str::<Transition>(&line)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        out.push(transition);
    }
    Ok(out)
}
