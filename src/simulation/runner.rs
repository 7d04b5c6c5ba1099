//! Worker-thread driver for one adaptive signal cycle
//!
//! The worker is the sole writer of controller and log state for a run;
//! presentation threads read published snapshots and never mutate. A start
//! request while a run is in progress is a no-op, and the runner re-arms
//! once the cycle completes and both durable logs are written.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use log::info;

use super::event_log::{run_stamp, save_run_logs, EventLog, LogEntry};
use super::signal::{PhaseChange, SignalController, VehicleCounts};
use super::types::Direction;

/// Simulated seconds per worker tick
const TICK_SECS: f32 = 0.1;

/// State the worker publishes for concurrent readers
#[derive(Debug, Default)]
struct SharedState {
    active: Option<Direction>,
    countdown_secs: u32,
    pedestrian_walk: bool,
    /// Phase order with allocated green seconds for the current run
    green_times: Option<[(Direction, u32); 4]>,
    log: EventLog,
    /// Entries before this index are hidden from the transient view
    view_start: usize,
}

/// Read-only snapshot of a run in progress
#[derive(Debug, Clone)]
pub struct RunSnapshot {
    pub running: bool,
    pub active: Option<Direction>,
    /// Whole remaining green seconds for the active direction
    pub countdown_secs: u32,
    pub pedestrian_walk: bool,
    pub green_times: Option<[(Direction, u32); 4]>,
    /// Transient log view; cleared by `clear_view`, unlike the store
    pub view: Vec<LogEntry>,
}

/// Runs adaptive cycles on a background worker
pub struct AdaptiveRunner {
    log_dir: PathBuf,
    /// Simulated-to-real time ratio; 1.0 runs in real time, larger values
    /// compress the sleeps (used by tests)
    time_scale: f32,
    running: Arc<AtomicBool>,
    state: Arc<Mutex<SharedState>>,
    handle: Mutex<Option<JoinHandle<Result<(PathBuf, PathBuf)>>>>,
}

impl AdaptiveRunner {
    pub fn new(log_dir: impl Into<PathBuf>) -> Self {
        Self {
            log_dir: log_dir.into(),
            time_scale: 1.0,
            running: Arc::new(AtomicBool::new(false)),
            state: Arc::new(Mutex::new(SharedState::default())),
            handle: Mutex::new(None),
        }
    }

    pub fn with_time_scale(mut self, time_scale: f32) -> Self {
        self.time_scale = time_scale.max(f32::MIN_POSITIVE);
        self
    }

    /// Start one cycle for the given counts. Returns `Ok(false)` without
    /// touching any state when a run is already in progress.
    pub fn start(&self, counts: VehicleCounts) -> Result<bool> {
        if self.running.swap(true, Ordering::SeqCst) {
            return Ok(false);
        }

        let state = Arc::clone(&self.state);
        let running = Arc::clone(&self.running);
        let log_dir = self.log_dir.clone();
        let time_scale = self.time_scale;

        let worker = thread::Builder::new()
            .name("adaptive-cycle".to_string())
            .spawn(move || {
                let result = run_cycle(counts, &state, log_dir, time_scale);
                running.store(false, Ordering::SeqCst);
                result
            })
            .context("failed to spawn adaptive cycle worker")?;

        *lock(&self.handle) = Some(worker);
        Ok(true)
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Block until the current run finishes; returns the durable log paths,
    /// or `None` when no run was started.
    pub fn wait(&self) -> Result<Option<(PathBuf, PathBuf)>> {
        let worker = lock(&self.handle).take();
        match worker {
            Some(worker) => {
                let paths = worker
                    .join()
                    .map_err(|_| anyhow!("adaptive cycle worker panicked"))??;
                Ok(Some(paths))
            }
            None => Ok(None),
        }
    }

    pub fn snapshot(&self) -> RunSnapshot {
        let state = lock(&self.state);
        RunSnapshot {
            running: self.is_running(),
            active: state.active,
            countdown_secs: state.countdown_secs,
            pedestrian_walk: state.pedestrian_walk,
            green_times: state.green_times,
            view: state.log.entries()[state.view_start..].to_vec(),
        }
    }

    /// Query the full log store, optionally filtered by direction. Unlike
    /// the view, the store survives `clear_view`.
    pub fn query_log(&self, filter: Option<Direction>) -> Vec<LogEntry> {
        lock(&self.state).log.query(filter)
    }

    /// Clear the transient log view only; the store and the durable files
    /// are untouched.
    pub fn clear_view(&self) {
        let mut state = lock(&self.state);
        state.view_start = state.log.len();
    }
}

/// Mutex guard helper that shrugs off poisoning; the shared state is plain
/// data and stays usable after a worker panic.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn record_phase_change(state: &mut SharedState, change: PhaseChange) {
    state.log.record(LogEntry::phase_change(
        change.direction,
        change.vehicle_count,
        change.green_time,
    ));
}

fn publish(state: &mut SharedState, controller: &SignalController) {
    state.active = controller.right_of_way();
    state.countdown_secs = controller
        .countdown()
        .map(|(_, remaining)| remaining.ceil() as u32)
        .unwrap_or(0);
    state.pedestrian_walk = controller.pedestrian_active();
}

/// Drive one full cycle, then save both durable logs
fn run_cycle(
    counts: VehicleCounts,
    state: &Mutex<SharedState>,
    log_dir: PathBuf,
    time_scale: f32,
) -> Result<(PathBuf, PathBuf)> {
    let mut controller = SignalController::adaptive(&counts);
    let started = run_stamp();

    // Entries from earlier runs stay in the store but belong to their own
    // files; only this run's slice is saved at the end.
    let run_start;
    {
        let mut state = lock(state);
        run_start = state.log.len();
        state.green_times = Some(
            controller
                .phase_order()
                .map(|d| (d, controller.green_time(d) as u32)),
        );
        if let Some(change) = controller.current_phase_change() {
            record_phase_change(&mut state, change);
        }
        publish(&mut state, &controller);
    }

    while !controller.finished() {
        thread::sleep(Duration::from_secs_f32(TICK_SECS / time_scale));
        let change = controller.advance(TICK_SECS);
        let mut state = lock(state);
        if let Some(change) = change {
            record_phase_change(&mut state, change);
        }
        publish(&mut state, &controller);
    }

    let entries = lock(state).log.entries()[run_start..].to_vec();
    let paths = save_run_logs(&log_dir, &started, &entries)?;
    info!(
        "adaptive cycle complete, logs saved to {} and {}",
        paths.0.display(),
        paths.1.display()
    );
    Ok(paths)
}

/// Open the log directory in the host OS file browser. Pure side-effecting
/// passthrough; no core logic depends on it.
pub fn open_log_location(dir: &Path) -> Result<()> {
    #[cfg(target_os = "windows")]
    let opener = "explorer";
    #[cfg(target_os = "macos")]
    let opener = "open";
    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    let opener = "xdg-open";

    std::process::Command::new(opener)
        .arg(dir)
        .spawn()
        .with_context(|| format!("could not open log folder {}", dir.display()))?;
    Ok(())
}
