//! Finite-state signal controller for the intersection
//!
//! Cycles right-of-way between the four approaches. Two construction modes:
//! a fixed round-robin timer, and an adaptive allocator that distributes a
//! green-time budget proportionally to supplied vehicle counts. Every green
//! phase is followed by an all-red clearance gap during which the crosswalk
//! shows WALK.

use anyhow::{Context, Result};

use super::types::{
    Direction, SignalState, CLEARANCE_SECS, DEFAULT_GREEN_SECS, FIXED_GREEN_SECS,
    MAX_CYCLE_BUDGET_SECS, MIN_GREEN_SECS,
};

/// Vehicle counts per approach, supplied before an adaptive run starts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VehicleCounts {
    pub north: u32,
    pub east: u32,
    pub south: u32,
    pub west: u32,
}

impl VehicleCounts {
    pub fn new(north: u32, east: u32, south: u32, west: u32) -> Self {
        Self {
            north,
            east,
            south,
            west,
        }
    }

    /// Parse raw text input, one field per approach. Rejects non-numeric or
    /// missing values before any simulation state is touched.
    pub fn parse(north: &str, east: &str, south: &str, west: &str) -> Result<Self> {
        let parse_one = |raw: &str, direction: Direction| -> Result<u32> {
            raw.trim().parse::<u32>().with_context(|| {
                format!(
                    "invalid vehicle count for {}: {:?} (expected a non-negative integer)",
                    direction, raw
                )
            })
        };
        Ok(Self {
            north: parse_one(north, Direction::North)?,
            east: parse_one(east, Direction::East)?,
            south: parse_one(south, Direction::South)?,
            west: parse_one(west, Direction::West)?,
        })
    }

    pub fn get(&self, direction: Direction) -> u32 {
        match direction {
            Direction::North => self.north,
            Direction::East => self.east,
            Direction::South => self.south,
            Direction::West => self.west,
        }
    }

    /// Sum of all four counts; widened so extreme inputs cannot overflow
    pub fn total(&self) -> u64 {
        [self.north, self.east, self.south, self.west]
            .iter()
            .map(|&count| count as u64)
            .sum()
    }
}

/// Compute per-direction green seconds from vehicle counts.
///
/// Each direction gets its proportional share of the cycle budget, floored
/// at the minimum green. A zero total is not an error: every direction
/// falls back to the same default duration.
pub fn allocate_green_times(counts: &VehicleCounts) -> [u32; 4] {
    let total = counts.total();
    Direction::ALL.map(|direction| {
        if total == 0 {
            DEFAULT_GREEN_SECS
        } else {
            let share =
                counts.get(direction) as f64 / total as f64 * MAX_CYCLE_BUDGET_SECS as f64;
            (share.round() as u32).max(MIN_GREEN_SECS)
        }
    })
}

/// Emitted when a direction gains right-of-way
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseChange {
    pub direction: Direction,
    /// Vehicle count behind the allocation (adaptive mode only)
    pub vehicle_count: Option<u32>,
    /// Allocated green seconds (adaptive mode only)
    pub green_time: Option<u32>,
}

/// Whether the controller is in a green phase or the all-red gap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PhaseKind {
    Green,
    Clearance,
}

/// The intersection's signal state machine
///
/// At most one direction holds green at a time; none does during clearance.
/// The fixed variant cycles forever, the adaptive variant completes one full
/// cycle and then reports `finished`.
#[derive(Debug, Clone)]
pub struct SignalController {
    /// Visit order for the current run
    phase_order: [Direction; 4],
    /// Green seconds per direction, indexed by `Direction::index`
    green_times: [f32; 4],
    /// Vehicle counts behind the allocation, indexed by `Direction::index`
    vehicle_counts: Option<[u32; 4]>,
    clearance_secs: f32,
    active_index: usize,
    kind: PhaseKind,
    /// Elapsed seconds in the current phase, reset to 0 on every transition
    phase_clock: f32,
    /// Adaptive runs stop after one full cycle
    single_cycle: bool,
    finished: bool,
}

impl SignalController {
    /// Round-robin controller with a uniform green duration
    pub fn fixed() -> Self {
        Self {
            phase_order: Direction::ALL,
            green_times: [FIXED_GREEN_SECS; 4],
            vehicle_counts: None,
            clearance_secs: CLEARANCE_SECS,
            active_index: 0,
            kind: PhaseKind::Green,
            phase_clock: 0.0,
            single_cycle: false,
            finished: false,
        }
    }

    /// Controller for one adaptive cycle: green times computed from vehicle
    /// counts, directions visited in descending green-time order (ties
    /// resolved by declaration order).
    pub fn adaptive(counts: &VehicleCounts) -> Self {
        let allocated = allocate_green_times(counts);

        let mut phase_order = Direction::ALL;
        // Stable sort keeps declaration order for equal allocations
        phase_order.sort_by_key(|d| std::cmp::Reverse(allocated[d.index()]));

        let mut green_times = [0.0; 4];
        let mut vehicle_counts = [0; 4];
        for direction in Direction::ALL {
            green_times[direction.index()] = allocated[direction.index()] as f32;
            vehicle_counts[direction.index()] = counts.get(direction);
        }

        Self {
            phase_order,
            green_times,
            vehicle_counts: Some(vehicle_counts),
            clearance_secs: CLEARANCE_SECS,
            active_index: 0,
            kind: PhaseKind::Green,
            phase_clock: 0.0,
            single_cycle: true,
            finished: false,
        }
    }

    /// Advance the phase clock by `dt` simulated seconds.
    ///
    /// Returns a `PhaseChange` when a direction gains right-of-way. Green
    /// phases expire into clearance; clearance expires into the next green
    /// (or, for a single-cycle run, into the finished state).
    pub fn advance(&mut self, dt: f32) -> Option<PhaseChange> {
        if self.finished {
            return None;
        }

        self.phase_clock += dt;
        if self.phase_clock < self.current_phase_duration() {
            return None;
        }
        self.phase_clock = 0.0;

        match self.kind {
            PhaseKind::Green => {
                self.kind = PhaseKind::Clearance;
                None
            }
            PhaseKind::Clearance => {
                let next = (self.active_index + 1) % self.phase_order.len();
                if self.single_cycle && next == 0 {
                    self.finished = true;
                    return None;
                }
                self.active_index = next;
                self.kind = PhaseKind::Green;
                Some(self.phase_change_for(self.phase_order[next]))
            }
        }
    }

    /// The direction currently holding green, if any
    pub fn right_of_way(&self) -> Option<Direction> {
        if self.finished || self.kind == PhaseKind::Clearance {
            None
        } else {
            Some(self.phase_order[self.active_index])
        }
    }

    /// Canonical pedestrian-safety rule: WALK iff no approach holds green
    pub fn pedestrian_active(&self) -> bool {
        self.right_of_way().is_none()
    }

    pub fn signal_state(&self, direction: Direction) -> SignalState {
        if self.right_of_way() == Some(direction) {
            SignalState::Green
        } else {
            SignalState::Red
        }
    }

    /// Remaining green seconds for the active direction, if one is active
    pub fn countdown(&self) -> Option<(Direction, f32)> {
        let direction = self.right_of_way()?;
        let remaining = (self.green_times[direction.index()] - self.phase_clock).max(0.0);
        Some((direction, remaining))
    }

    /// The event describing the phase currently in progress, used to report
    /// the very first green of a run (later greens come from `advance`).
    pub fn current_phase_change(&self) -> Option<PhaseChange> {
        self.right_of_way().map(|d| self.phase_change_for(d))
    }

    pub fn phase_order(&self) -> [Direction; 4] {
        self.phase_order
    }

    pub fn green_time(&self, direction: Direction) -> f32 {
        self.green_times[direction.index()]
    }

    /// True once a single-cycle run has visited every direction
    pub fn finished(&self) -> bool {
        self.finished
    }

    fn current_phase_duration(&self) -> f32 {
        match self.kind {
            PhaseKind::Green => self.green_times[self.phase_order[self.active_index].index()],
            PhaseKind::Clearance => self.clearance_secs,
        }
    }

    fn phase_change_for(&self, direction: Direction) -> PhaseChange {
        PhaseChange {
            direction,
            vehicle_count: self.vehicle_counts.map(|c| c[direction.index()]),
            green_time: self
                .vehicle_counts
                .map(|_| self.green_times[direction.index()] as u32),
        }
    }
}
