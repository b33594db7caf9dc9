//! CSV log of every death in a run.

use predprey_world::{LifeEvent, LifeEventSink};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub const HEADER: &str = "Animal,Age,Time of death,Death cause,Total population";

/// Writes one row per life event. A write failure is kept and returned by
/// [`CsvLifeLog::finish`]; later events are dropped.
pub struct CsvLifeLog<W: Write> {
    writer: W,
    rows: u64,
    error: Option<io::Error>,
}

impl CsvLifeLog<BufWriter<File>> {
    pub fn create<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let file = File::create(path.as_ref())?;
        debug!(path = %path.as_ref().display(), "Opened life event log");
        Self::new(BufWriter::new(file))
    }
}

impl<W: Write> CsvLifeLog<W> {
    pub fn new(mut writer: W) -> io::Result<Self> {
        writeln!(writer, "{}", HEADER)?;
        Ok(Self {
            writer,
            rows: 0,
            error: None,
        })
    }

    pub fn rows(&self) -> u64 {
        self.rows
    }

    /// Flush and hand back the writer, or the first error hit while logging
    pub fn finish(mut self) -> io::Result<W> {
        if let Some(err) = self.error.take() {
            return Err(err);
        }
        self.writer.flush()?;
        Ok(self.writer)
    }
}

impl<W: Write> LifeEventSink for CsvLifeLog<W> {
    fn record(&mut self, event: &LifeEvent) {
        if self.error.is_some() {
            return;
        }
        let result = writeln!(
            self.writer,
            "{},{},{},{},{}",
            event.species.as_str(),
            event.age,
            event.death_tick,
            event.death_cause.as_str(),
            event.population_size,
        );
        match result {
            Ok(()) => self.rows += 1,
            Err(err) => {
                warn!(error = %err, "Life event log write failed");
                self.error = Some(err);
            }
        }
    }
}

/// `log-<timestamp>.csv` inside `dir`
pub fn timestamped_path(dir: &Path) -> PathBuf {
    let stamp = chrono::Local::now().format("%Y-%m-%d_%H-%M-%S");
    dir.join(format!("log-{}.csv", stamp))
}
