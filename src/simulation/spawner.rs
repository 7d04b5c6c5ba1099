//! Actor spawning on fixed inter-arrival cadences
//!
//! Simulated time is an explicit input so spawning stays deterministic
//! under test; no wall-clock sampling happens here.

use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::SeedableRng;

use super::pedestrian::Pedestrian;
use super::types::{Direction, Side, PEDESTRIAN_SPAWN_INTERVAL, VEHICLE_SPAWN_INTERVAL};
use super::vehicle::Vehicle;

/// Spawns vehicles and pedestrians on independent clocks
#[derive(Debug)]
pub struct Spawner {
    last_vehicle_spawn: f32,
    last_pedestrian_spawn: f32,
    /// Optional seeded RNG for reproducible simulations
    rng: Option<StdRng>,
}

impl Default for Spawner {
    fn default() -> Self {
        Self::new()
    }
}

impl Spawner {
    pub fn new() -> Self {
        Self {
            last_vehicle_spawn: 0.0,
            last_pedestrian_spawn: 0.0,
            rng: None,
        }
    }

    pub fn new_with_seed(seed: u64) -> Self {
        Self {
            rng: Some(StdRng::seed_from_u64(seed)),
            ..Self::new()
        }
    }

    /// Choose a random element from a slice, using seeded RNG if available
    fn choose_random<T: Copy>(&mut self, slice: &[T]) -> Option<T> {
        match &mut self.rng {
            Some(rng) => slice.choose(rng).copied(),
            None => slice.choose(&mut rand::rng()).copied(),
        }
    }

    /// A vehicle appears every fixed interval on a uniformly random
    /// approach, regardless of signal state.
    pub fn maybe_spawn_vehicle(&mut self, now: f32) -> Option<Vehicle> {
        if now - self.last_vehicle_spawn < VEHICLE_SPAWN_INTERVAL {
            return None;
        }
        self.last_vehicle_spawn = now;
        let direction = self.choose_random(&Direction::ALL)?;
        Some(Vehicle::new(direction))
    }

    /// Pedestrians only appear while WALK is shown, on their own cadence,
    /// from a uniformly random side.
    pub fn maybe_spawn_pedestrian(&mut self, now: f32, walk_active: bool) -> Option<Pedestrian> {
        if !walk_active || now - self.last_pedestrian_spawn < PEDESTRIAN_SPAWN_INTERVAL {
            return None;
        }
        self.last_pedestrian_spawn = now;
        let side = self.choose_random(&Side::ALL)?;
        Some(Pedestrian::new(side))
    }
}
