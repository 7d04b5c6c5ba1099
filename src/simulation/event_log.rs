//! Append-only event log and its durable sinks
//!
//! Phase changes and collisions are recorded in insertion order, queryable
//! by direction. Two durable formats exist: the fixed-cycle variant streams
//! a plain-text log as it runs, the adaptive variant saves a text file and
//! a CSV table per run.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Local;

use super::types::Direction;

/// What kind of event an entry records
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogCategory {
    PhaseChange,
    Collision,
}

/// One timestamped log record. Entries are never mutated once recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    /// Wall-clock time of day, `HH:MM:SS`
    pub timestamp: String,
    pub category: LogCategory,
    pub direction: Option<Direction>,
    /// Vehicle count behind an adaptive allocation
    pub vehicle_count: Option<u32>,
    /// Allocated green seconds for an adaptive phase
    pub green_time: Option<u32>,
}

impl LogEntry {
    pub fn phase_change(
        direction: Direction,
        vehicle_count: Option<u32>,
        green_time: Option<u32>,
    ) -> Self {
        Self {
            timestamp: now_stamp(),
            category: LogCategory::PhaseChange,
            direction: Some(direction),
            vehicle_count,
            green_time,
        }
    }

    pub fn collision() -> Self {
        Self {
            timestamp: now_stamp(),
            category: LogCategory::Collision,
            direction: None,
            vehicle_count: None,
            green_time: None,
        }
    }
}

fn now_stamp() -> String {
    Local::now().format("%H:%M:%S").to_string()
}

/// Timestamp used in per-run log file names
pub fn run_stamp() -> String {
    Local::now().format("%Y-%m-%d_%H-%M-%S").to_string()
}

/// In-memory append-only event store
#[derive(Debug, Default)]
pub struct EventLog {
    entries: Vec<LogEntry>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, entry: LogEntry) {
        self.entries.push(entry);
    }

    /// All entries, or only those for one direction, in insertion order.
    /// Filtering never disturbs the underlying store.
    pub fn query(&self, filter: Option<Direction>) -> Vec<LogEntry> {
        self.entries
            .iter()
            .filter(|entry| filter.map_or(true, |d| entry.direction == Some(d)))
            .cloned()
            .collect()
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Streaming text sink for the fixed-cycle variant
///
/// Line format matches the classic log: `HH:MM:SS - Green Light: <Direction>`
/// and `HH:MM:SS - COLLISION DETECTED!`, bracketed by start/end timestamps.
#[derive(Debug)]
pub struct FixedLogFile {
    writer: BufWriter<File>,
}

impl FixedLogFile {
    pub fn create(path: &Path) -> Result<Self> {
        let file = File::create(path)
            .with_context(|| format!("failed to create log file {}", path.display()))?;
        let mut writer = BufWriter::new(file);
        writeln!(writer, "Smart Traffic Light Log")?;
        writeln!(writer, "Started at: {}", Local::now())?;
        writeln!(writer)?;
        Ok(Self { writer })
    }

    pub fn write(&mut self, entry: &LogEntry) -> Result<()> {
        match entry.category {
            LogCategory::PhaseChange => {
                let direction = entry
                    .direction
                    .context("phase-change entry without a direction")?;
                writeln!(self.writer, "{} - Green Light: {}", entry.timestamp, direction)?;
            }
            LogCategory::Collision => {
                writeln!(self.writer, "{} - COLLISION DETECTED!", entry.timestamp)?;
            }
        }
        // Flush per entry so a failing device reports at the offending
        // write instead of at the end of the run
        self.writer.flush()?;
        Ok(())
    }

    pub fn finish(mut self) -> Result<()> {
        writeln!(self.writer)?;
        writeln!(self.writer, "Ended at: {}", Local::now())?;
        self.writer.flush()?;
        Ok(())
    }
}

/// Save an adaptive run's phase-change entries as a text log and a CSV
/// table, both named with the run timestamp. Returns the two paths.
pub fn save_run_logs(
    dir: &Path,
    run_stamp: &str,
    entries: &[LogEntry],
) -> Result<(PathBuf, PathBuf)> {
    let phase_changes: Vec<&LogEntry> = entries
        .iter()
        .filter(|e| e.category == LogCategory::PhaseChange)
        .collect();

    let txt_path = dir.join(format!("log_{}.txt", run_stamp));
    let mut txt = BufWriter::new(
        File::create(&txt_path)
            .with_context(|| format!("failed to create log file {}", txt_path.display()))?,
    );
    writeln!(txt, "Smart Traffic Log - {}", run_stamp)?;
    writeln!(txt)?;
    for entry in &phase_changes {
        let direction = entry
            .direction
            .context("phase-change entry without a direction")?;
        writeln!(
            txt,
            "[{}] {} - Vehicles: {} | Green Time: {}s",
            entry.timestamp,
            direction,
            entry.vehicle_count.unwrap_or(0),
            entry.green_time.unwrap_or(0),
        )?;
    }
    txt.flush()?;

    let csv_path = dir.join(format!("log_{}.csv", run_stamp));
    let mut csv_writer = csv::Writer::from_path(&csv_path)
        .with_context(|| format!("failed to create log file {}", csv_path.display()))?;
    csv_writer.write_record(["Time", "Direction", "Vehicles", "Green_Time"])?;
    for entry in &phase_changes {
        let direction = entry
            .direction
            .context("phase-change entry without a direction")?;
        csv_writer.write_record([
            entry.timestamp.clone(),
            direction.to_string(),
            entry.vehicle_count.unwrap_or(0).to_string(),
            entry.green_time.unwrap_or(0).to_string(),
        ])?;
    }
    csv_writer.flush()?;

    Ok((txt_path, csv_path))
}
