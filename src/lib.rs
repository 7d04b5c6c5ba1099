//! Smart Traffic Light Simulation Library
//!
//! A four-way intersection simulator: signal phase scheduling, actor
//! spawning and movement, collision detection, and event logging.

pub mod simulation;
