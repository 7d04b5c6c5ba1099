//! Pedestrian-vehicle collision detection

use super::pedestrian::Pedestrian;
use super::vehicle::Vehicle;

/// One overlapping pedestrian/vehicle pair, by index into the live sets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Collision {
    pub pedestrian: usize,
    pub vehicle: usize,
}

/// Scan every pedestrian against every vehicle and report each overlapping
/// pair. Runs every tick, so an overlap that persists produces a fresh
/// event each tick until it resolves; there is no de-duplication.
pub fn detect_collisions(pedestrians: &[Pedestrian], vehicles: &[Vehicle]) -> Vec<Collision> {
    let mut collisions = Vec::new();
    for (p_index, pedestrian) in pedestrians.iter().enumerate() {
        let p_rect = pedestrian.rect();
        for (v_index, vehicle) in vehicles.iter().enumerate() {
            if p_rect.intersects(&vehicle.rect()) {
                collisions.push(Collision {
                    pedestrian: p_index,
                    vehicle: v_index,
                });
            }
        }
    }
    collisions
}
