//! Standalone intersection simulation engine
//!
//! All core scheduling and simulation logic lives here, independent of any
//! rendering or UI layer. Presentation code consumes snapshots and the
//! queryable event log.

mod collision;
mod event_log;
mod pedestrian;
mod runner;
mod signal;
mod spawner;
mod types;
mod vehicle;
mod world;

// Re-export public types for external use
// These may not be used within this crate but are part of the public API
#[allow(unused_imports)]
pub use collision::{detect_collisions, Collision};
#[allow(unused_imports)]
pub use event_log::{run_stamp, save_run_logs, EventLog, FixedLogFile, LogCategory, LogEntry};
#[allow(unused_imports)]
pub use pedestrian::Pedestrian;
#[allow(unused_imports)]
pub use runner::{open_log_location, AdaptiveRunner, RunSnapshot};
#[allow(unused_imports)]
pub use signal::{allocate_green_times, PhaseChange, SignalController, VehicleCounts};
#[allow(unused_imports)]
pub use spawner::Spawner;
#[allow(unused_imports)]
pub use types::{
    Direction, DirectionInfo, Position, Rect, Side, SignalState, CLEARANCE_SECS, CROSSWALK_Y,
    DEFAULT_GREEN_SECS, DOMAIN_HEIGHT, DOMAIN_WIDTH, FIXED_GREEN_SECS, MAX_CYCLE_BUDGET_SECS,
    MIN_GREEN_SECS, PEDESTRIAN_CULL_MARGIN, PEDESTRIAN_SPAWN_INTERVAL, PEDESTRIAN_SPEED,
    VEHICLE_CULL_MARGIN, VEHICLE_LENGTH, VEHICLE_SPAWN_INTERVAL, VEHICLE_SPEED, VEHICLE_WIDTH,
};
#[allow(unused_imports)]
pub use vehicle::Vehicle;
pub use world::{SimWorld, WorldSnapshot};
