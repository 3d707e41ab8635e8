//! Buffered Mod Log
//!
//! File-backed log for mod-facing messages: startup progress, rejection
//! notices, attribution reports. Lines are buffered and appended to the
//! log file in batches, flushed when the buffer fills or when the
//! host-driven tick sees more than a second elapse. A bounded in-memory
//! history is kept for the manager UI; when it reaches twice its capacity
//! the older half is dropped.
//!
//! Every line is also forwarded to the `log` facade so the host's normal
//! logging sees the same stream.

use std::path::PathBuf;

const PREFIX: &str = "[Manager] ";
const PREFIX_ERROR: &str = "[Manager] [Error] ";

const BUFFER_CAPACITY: usize = 100;
const HISTORY_CAPACITY: usize = 200;

/// Buffered, file-backed log with bounded history.
#[derive(Debug)]
pub struct ModLog {
    filepath: PathBuf,
    buffer: Vec<String>,
    history: Vec<String>,
    buffer_capacity: usize,
    history_capacity: usize,
    timer: f32,
}

impl ModLog {
    /// Create a log writing to `filepath` with the default capacities.
    pub fn new(filepath: impl Into<PathBuf>) -> Self {
        Self::with_capacities(filepath, BUFFER_CAPACITY, HISTORY_CAPACITY)
    }

    /// Create a log with explicit buffer and history capacities.
    pub fn with_capacities(
        filepath: impl Into<PathBuf>,
        buffer_capacity: usize,
        history_capacity: usize,
    ) -> Self {
        Self {
            filepath: filepath.into(),
            buffer: Vec::with_capacity(buffer_capacity),
            history: Vec::with_capacity(history_capacity * 2),
            buffer_capacity,
            history_capacity,
            timer: 0.0,
        }
    }

    /// Log an informational line.
    pub fn log(&mut self, message: &str) {
        self.write(format!("{}{}", PREFIX, message));
    }

    /// Log an error line.
    pub fn error(&mut self, message: &str) {
        self.write(format!("{}{}", PREFIX_ERROR, message));
    }

    /// Log a multi-line block (attribution reports), line by line so the
    /// history stays scrollable.
    pub fn block(&mut self, text: &str) {
        for line in text.lines() {
            self.write(format!("{}{}", PREFIX, line));
        }
    }

    fn write(&mut self, line: String) {
        log::info!("{}", line);

        self.buffer.push(line.clone());
        self.history.push(line);

        if self.history.len() >= self.history_capacity * 2 {
            self.history.drain(..self.history_capacity);
        }
    }

    /// Host-driven tick. Flushes when the buffer is full or more than a
    /// second has accumulated since the last flush.
    pub fn tick(&mut self, dt: f32) {
        if self.buffer.len() >= self.buffer_capacity || self.timer > 1.0 {
            self.flush();
        } else {
            self.timer += dt;
        }
    }

    /// Append all buffered lines to the log file. Write failures are
    /// reported through the `log` facade; the buffer is dropped either way.
    pub fn flush(&mut self) {
        if !self.buffer.is_empty() {
            let mut content = self.buffer.join("\n");
            content.push('\n');
            let result = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(&self.filepath)
                .and_then(|mut file| {
                    use std::io::Write;
                    file.write_all(content.as_bytes())
                });
            if let Err(e) = result {
                log::error!("Can't write log file '{}': {}.", self.filepath.display(), e);
            }
        }
        self.buffer.clear();
        self.timer = 0.0;
    }

    /// Recent lines retained for the manager UI.
    pub fn history(&self) -> &[String] {
        &self.history
    }

    /// Drop buffered and retained lines and delete the log file.
    pub fn clear(&mut self) {
        self.buffer.clear();
        self.history.clear();
        if self.filepath.exists() {
            if let Err(e) = std::fs::remove_file(&self.filepath) {
                log::error!("Can't delete log file '{}': {}.", self.filepath.display(), e);
            }
        }
    }
}
