//! Main simulation world that ties everything together
//!
//! Owns the signal controller, every live actor, and the event log, and is
//! their sole mutator. All state changes happen synchronously inside
//! `tick`; presentation layers only ever see read-only snapshots.

use std::path::Path;

use anyhow::Result;
use log::error;

use super::collision::{detect_collisions, Collision};
use super::event_log::{EventLog, FixedLogFile, LogEntry};
use super::pedestrian::Pedestrian;
use super::signal::{PhaseChange, SignalController, VehicleCounts};
use super::spawner::Spawner;
use super::types::{Direction, Rect, Side, SignalState};
use super::vehicle::Vehicle;

/// Read-only view of the world for a presentation layer
#[derive(Debug, Clone)]
pub struct WorldSnapshot {
    /// Simulated seconds since the run started
    pub time: f32,
    pub signals: [(Direction, SignalState); 4],
    pub pedestrian_walk: bool,
    /// Remaining green seconds for the active direction, if any
    pub countdown: Option<(Direction, f32)>,
    pub vehicles: Vec<(Direction, Rect)>,
    pub pedestrians: Vec<(Side, Rect)>,
    /// Pairs overlapping this tick, by index into `pedestrians`/`vehicles`,
    /// so a renderer can highlight them
    pub collisions: Vec<Collision>,
}

/// The simulation world
pub struct SimWorld {
    pub controller: SignalController,
    pub vehicles: Vec<Vehicle>,
    pub pedestrians: Vec<Pedestrian>,
    spawner: Spawner,
    pub log: EventLog,
    /// Durable sink for the fixed-cycle variant; dropped on first write
    /// failure so the simulation keeps running
    sink: Option<FixedLogFile>,
    /// Simulated time
    pub time: f32,
    /// Overlapping pairs found on the most recent tick
    current_collisions: Vec<Collision>,
    /// Running total of collision events recorded
    pub collisions_detected: usize,
}

impl SimWorld {
    fn new_internal(controller: SignalController, spawner: Spawner) -> Self {
        let mut world = Self {
            controller,
            vehicles: Vec::new(),
            pedestrians: Vec::new(),
            spawner,
            log: EventLog::new(),
            sink: None,
            time: 0.0,
            current_collisions: Vec::new(),
            collisions_detected: 0,
        };
        // The opening green counts as a phase change
        if let Some(change) = world.controller.current_phase_change() {
            world.record_phase_change(change);
        }
        world
    }

    /// World running the fixed round-robin cycle
    pub fn new_fixed() -> Self {
        Self::new_internal(SignalController::fixed(), Spawner::new())
    }

    /// Fixed-cycle world with a seeded RNG for reproducible runs
    pub fn new_fixed_with_seed(seed: u64) -> Self {
        Self::new_internal(SignalController::fixed(), Spawner::new_with_seed(seed))
    }

    /// World running one adaptive cycle from the given vehicle counts
    pub fn new_adaptive(counts: &VehicleCounts) -> Self {
        Self::new_internal(SignalController::adaptive(counts), Spawner::new())
    }

    /// Attach the durable text log for the fixed-cycle variant.
    ///
    /// Entries recorded before the sink existed (the opening green) are
    /// replayed into the fresh file so the durable log carries every
    /// signal change from the start of the run.
    pub fn attach_log_file(&mut self, path: &Path) -> Result<()> {
        self.sink = Some(FixedLogFile::create(path)?);
        let backlog = self.log.entries().to_vec();
        for entry in &backlog {
            if !self.write_to_sink(entry) {
                break;
            }
        }
        Ok(())
    }

    fn record_phase_change(&mut self, change: PhaseChange) {
        self.record(LogEntry::phase_change(
            change.direction,
            change.vehicle_count,
            change.green_time,
        ));
    }

    /// Mirror one entry to the durable sink, if attached. A write failure
    /// ends that log file but not the simulation; returns whether the sink
    /// is still usable.
    fn write_to_sink(&mut self, entry: &LogEntry) -> bool {
        if let Some(sink) = &mut self.sink {
            if let Err(err) = sink.write(entry) {
                error!("durable log write failed, abandoning log file: {:#}", err);
                self.sink = None;
                return false;
            }
        }
        true
    }

    /// Append to the in-memory log and mirror to the durable sink
    fn record(&mut self, entry: LogEntry) {
        self.write_to_sink(&entry);
        self.log.record(entry);
    }

    /// Main simulation tick: advance the signal clock, spawn, move, cull,
    /// then scan for collisions.
    pub fn tick(&mut self, dt: f32) {
        self.time += dt;

        if let Some(change) = self.controller.advance(dt) {
            self.record_phase_change(change);
        }

        let walk_active = self.controller.pedestrian_active();

        if let Some(vehicle) = self.spawner.maybe_spawn_vehicle(self.time) {
            self.vehicles.push(vehicle);
        }
        if let Some(pedestrian) = self.spawner.maybe_spawn_pedestrian(self.time, walk_active) {
            self.pedestrians.push(pedestrian);
        }

        let right_of_way = self.controller.right_of_way();
        for vehicle in &mut self.vehicles {
            vehicle.step(dt, right_of_way == Some(vehicle.direction));
        }
        for pedestrian in &mut self.pedestrians {
            pedestrian.step(dt, walk_active);
        }

        // Build the next live sets by predicate instead of removing
        // mid-iteration
        self.vehicles.retain(|v| !v.is_off_screen());
        self.pedestrians.retain(|p| !p.is_off_screen());

        let collisions = detect_collisions(&self.pedestrians, &self.vehicles);
        for _collision in &collisions {
            self.record(LogEntry::collision());
        }
        self.collisions_detected += collisions.len();
        self.current_collisions = collisions;
    }

    /// Capture a read-only snapshot for display
    pub fn snapshot(&self) -> WorldSnapshot {
        WorldSnapshot {
            time: self.time,
            signals: Direction::ALL.map(|d| (d, self.controller.signal_state(d))),
            pedestrian_walk: self.controller.pedestrian_active(),
            countdown: self.controller.countdown(),
            vehicles: self.vehicles.iter().map(|v| (v.direction, v.rect())).collect(),
            pedestrians: self.pedestrians.iter().map(|p| (p.side, p.rect())).collect(),
            collisions: self.current_collisions.clone(),
        }
    }

    /// One-line state summary for headless output
    pub fn summary(&self) -> String {
        let signal = match self.controller.right_of_way() {
            Some(direction) => format!("Green: {}", direction),
            None => "All red".to_string(),
        };
        format!(
            "t={:.1}s | {} | Walk: {} | Vehicles: {} | Pedestrians: {} | Collisions: {} | Log entries: {}",
            self.time,
            signal,
            if self.controller.pedestrian_active() { "yes" } else { "no" },
            self.vehicles.len(),
            self.pedestrians.len(),
            self.collisions_detected,
            self.log.len(),
        )
    }

    /// Close out the durable log, writing its trailer
    pub fn finish(mut self) -> Result<()> {
        if let Some(sink) = self.sink.take() {
            sink.finish()?;
        }
        Ok(())
    }
}
