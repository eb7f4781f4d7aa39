//! Append-only interaction history.
//!
//! Each completed comparison becomes one plain-text block. The block is
//! rendered in full before the file is opened, then written with a single
//! `write_all` while the log's mutex is held, so concurrent comparisons never
//! interleave partial records.

use crate::error::PersistenceError;
use crate::types::{InteractionRecord, ProviderId};
use chrono::NaiveDateTime;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

const HEAVY_RULE_WIDTH: usize = 80;
const LIGHT_RULE_WIDTH: usize = 80;
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const DATE_LABEL: &str = "Date/Time: ";

/// Render one record exactly as it is stored.
pub fn render_record(record: &InteractionRecord) -> String {
    let heavy = "=".repeat(HEAVY_RULE_WIDTH);
    let light = "-".repeat(LIGHT_RULE_WIDTH);

    let mut block = String::new();
    block.push_str(&heavy);
    block.push('\n');
    block.push_str(&format!(
        "{DATE_LABEL}{}\n",
        record.timestamp.format(TIMESTAMP_FORMAT)
    ));
    block.push_str(&format!("Image: {}\n", record.image_name));
    block.push_str(&format!("Question: {}\n", record.prompt));
    for id in ProviderId::ALL {
        block.push_str(&light);
        block.push('\n');
        block.push_str(&format!("{}:\n{}\n", id.heading(), record.result(id).log_text()));
    }
    block.push_str(&heavy);
    block.push_str("\n\n");
    block
}

/// Handle to the shared history file.
///
/// Create one per log path and share it (e.g. behind an `Arc`); all appends
/// through the same handle are serialized.
#[derive(Debug)]
pub struct HistoryLog {
    path: PathBuf,
    lock: Mutex<()>,
}

impl HistoryLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one record. Never truncates and never reads the file.
    pub fn record(&self, record: &InteractionRecord) -> Result<(), PersistenceError> {
        let block = render_record(record);
        let append_err = |source| PersistenceError::Append {
            path: self.path.clone(),
            source,
        };

        let _guard = self
            .lock
            .lock()
            .map_err(|_| PersistenceError::LockPoisoned(self.path.clone()))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(append_err)?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(append_err)?;
        file.write_all(block.as_bytes()).map_err(append_err)?;
        file.flush().map_err(append_err)?;

        tracing::debug!(
            "Appended {} bytes to history log {}",
            block.len(),
            self.path.display()
        );
        Ok(())
    }

    /// Whole log text for display. A log that doesn't exist yet reads as empty.
    pub fn read_all(&self) -> Result<String, PersistenceError> {
        match std::fs::read_to_string(&self.path) {
            Ok(text) => Ok(text),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(String::new()),
            Err(source) => Err(PersistenceError::Read {
                path: self.path.clone(),
                source,
            }),
        }
    }

    /// Number of records currently in the log.
    pub fn count_records(&self) -> Result<usize, PersistenceError> {
        Ok(count_records_in(&self.read_all()?))
    }
}

/// Count record blocks in log text.
///
/// A block starts with a heavy rule at the top of the file or after a blank
/// line, followed by a well-formed timestamp line and an `Image:` line. Rules
/// echoed inside an answer follow the answer's own text, so they don't count.
pub fn count_records_in(text: &str) -> usize {
    let heavy = "=".repeat(HEAVY_RULE_WIDTH);
    let lines: Vec<&str> = text.lines().collect();
    (0..lines.len())
        .filter(|&i| {
            let opens_block = i == 0 || lines[i - 1].is_empty();
            opens_block
                && lines[i] == heavy
                && lines.get(i + 1).is_some_and(|l| is_timestamp_line(l))
                && lines.get(i + 2).is_some_and(|l| l.starts_with("Image: "))
        })
        .count()
}

fn is_timestamp_line(line: &str) -> bool {
    line.strip_prefix(DATE_LABEL)
        .is_some_and(|ts| NaiveDateTime::parse_from_str(ts, TIMESTAMP_FORMAT).is_ok())
}
