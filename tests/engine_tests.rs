//! Engine validation tests: actors, collisions, logging, world loop, and
//! the adaptive runner

use smart_traffic::simulation::{
    detect_collisions, AdaptiveRunner, Direction, EventLog, LogCategory, LogEntry, Pedestrian,
    SignalState, SimWorld, Side, Spawner, Vehicle, VehicleCounts,
};

#[test]
fn test_vehicle_holds_at_stop_line_without_right_of_way() {
    // Northbound stop line sits at y = 220 (leading edge)
    let mut vehicle = Vehicle::new(Direction::North);
    vehicle.y = 220.0;

    vehicle.step(0.1, false);
    assert_eq!(vehicle.y, 220.0, "vehicle at the line must not advance on red");

    vehicle.step(0.1, true);
    assert!(vehicle.y < 220.0, "vehicle must advance within one green tick");
}

#[test]
fn test_vehicle_clamps_exactly_at_stop_line() {
    let mut vehicle = Vehicle::new(Direction::North);
    vehicle.y = 225.0; // 5 units short of the line, one tick covers 12

    vehicle.step(0.1, false);
    assert_eq!(vehicle.y, 220.0, "movement clamps at the line, not past it");
}

#[test]
fn test_vehicle_past_stop_line_is_not_halted() {
    let mut vehicle = Vehicle::new(Direction::North);
    vehicle.y = 200.0; // already through the intersection

    vehicle.step(0.1, false);
    assert!((vehicle.y - 188.0).abs() < 1e-4, "mid-crossing vehicles keep moving");
}

#[test]
fn test_vehicle_culled_only_past_margin() {
    let mut vehicle = Vehicle::new(Direction::North);

    // Rect bottom exactly at the margin: still alive
    vehicle.y = -100.0;
    assert!(!vehicle.is_off_screen());

    vehicle.y = -101.0;
    assert!(vehicle.is_off_screen());
}

#[test]
fn test_pedestrian_crossing_latch_is_irreversible() {
    let mut pedestrian = Pedestrian::new(Side::Left);
    let start_x = pedestrian.x;

    pedestrian.step(0.1, false);
    assert_eq!(pedestrian.x, start_x, "no movement before WALK is shown");
    assert!(!pedestrian.crossing);

    pedestrian.step(0.1, true);
    assert!(pedestrian.crossing);
    let after_walk = pedestrian.x;
    assert!(after_walk > start_x);

    // Signal turns against pedestrians; the latch keeps them moving
    pedestrian.step(0.1, false);
    assert!(pedestrian.crossing);
    assert!(pedestrian.x > after_walk);
}

#[test]
fn test_collision_reemitted_every_tick_without_dedup() {
    let mut pedestrian = Pedestrian::new(Side::Left);
    pedestrian.x = 400.0;

    let mut vehicle = Vehicle::new(Direction::North);
    vehicle.x = 390.0;
    vehicle.y = 280.0;

    let pedestrians = [pedestrian];
    let vehicles = [vehicle];

    let first_tick = detect_collisions(&pedestrians, &vehicles);
    assert_eq!(first_tick.len(), 1, "one event per overlapping pair");

    // Still overlapping on the next tick: a fresh event, no de-duplication
    let second_tick = detect_collisions(&pedestrians, &vehicles);
    assert_eq!(second_tick.len(), 1);
}

#[test]
fn test_disjoint_actors_produce_no_collisions() {
    let pedestrian = Pedestrian::new(Side::Left); // x = 100, far from traffic
    let vehicle = Vehicle::new(Direction::North); // spawn at the bottom edge
    assert!(detect_collisions(&[pedestrian], &[vehicle]).is_empty());
}

#[test]
fn test_log_query_filter_semantics() {
    let mut log = EventLog::new();
    log.record(LogEntry::phase_change(Direction::North, None, None));
    log.record(LogEntry::collision());
    log.record(LogEntry::phase_change(Direction::East, None, None));
    log.record(LogEntry::phase_change(Direction::North, None, None));

    let north_only = log.query(Some(Direction::North));
    assert_eq!(north_only.len(), 2);
    assert!(north_only.iter().all(|e| e.direction == Some(Direction::North)));

    // A prior filtered query leaves the store untouched
    let all = log.query(None);
    assert_eq!(all.len(), 4);
    assert_eq!(all[1].category, LogCategory::Collision);
    assert_eq!(all[2].direction, Some(Direction::East));
}

#[test]
fn test_spawner_cadences_are_decoupled() {
    let mut spawner = Spawner::new_with_seed(1);

    assert!(spawner.maybe_spawn_vehicle(0.5).is_none());
    assert!(spawner.maybe_spawn_vehicle(1.0).is_some());
    assert!(spawner.maybe_spawn_vehicle(1.5).is_none());

    // Pedestrians never spawn without WALK, and run on their own clock
    assert!(spawner.maybe_spawn_pedestrian(3.0, false).is_none());
    assert!(spawner.maybe_spawn_pedestrian(3.0, true).is_some());
    assert!(spawner.maybe_spawn_pedestrian(4.0, true).is_none());
    assert!(spawner.maybe_spawn_pedestrian(5.0, true).is_some());
}

#[test]
fn test_world_tick_spawns_and_logs() {
    let mut world = SimWorld::new_fixed_with_seed(42);

    // The opening green is already on record
    assert_eq!(world.log.len(), 1);
    assert_eq!(world.log.entries()[0].direction, Some(Direction::North));

    for _ in 0..20 {
        world.tick(0.1);
    }

    assert!(!world.vehicles.is_empty(), "vehicles should spawn every second");

    let snapshot = world.snapshot();
    assert_eq!(snapshot.signals.len(), 4);
    let greens = snapshot
        .signals
        .iter()
        .filter(|(_, state)| *state == SignalState::Green)
        .count();
    assert_eq!(greens, 1);
    assert!(!snapshot.pedestrian_walk);
}

#[test]
fn test_world_single_green_invariant_over_time() {
    let mut world = SimWorld::new_fixed_with_seed(7);
    for _ in 0..400 {
        world.tick(0.05);
        let snapshot = world.snapshot();
        let greens = snapshot
            .signals
            .iter()
            .filter(|(_, state)| *state == SignalState::Green)
            .count();
        assert!(greens <= 1);
        assert_eq!(greens == 0, snapshot.pedestrian_walk);
    }
}

#[test]
fn test_fixed_log_file_format() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("traffic_log.txt");

    let mut world = SimWorld::new_fixed_with_seed(3);
    world
        .attach_log_file(&path)
        .expect("log file should be created");

    // Run past the first green so at least one transition is on file
    for _ in 0..100 {
        world.tick(0.1);
    }
    world.finish().expect("log trailer should be written");

    let contents = std::fs::read_to_string(&path).expect("log file readable");
    assert!(contents.starts_with("Smart Traffic Light Log"));
    assert!(contents.contains("Started at:"));
    assert!(contents.contains("Ended at:"));

    // The opening green is on file, ahead of every later phase
    let north_pos = contents
        .find("- Green Light: North")
        .expect("opening green on file");
    let east_pos = contents
        .find("- Green Light: East")
        .expect("second green on file");
    assert!(north_pos < east_pos);
}

#[cfg(target_os = "linux")]
#[test]
fn test_sink_write_failure_does_not_stop_simulation() {
    let mut world = SimWorld::new_fixed_with_seed(11);

    // /dev/full opens fine but fails every flushed write, so the sink dies
    // on its first entry
    world
        .attach_log_file(std::path::Path::new("/dev/full"))
        .expect("opening the sink should succeed");

    for _ in 0..100 {
        world.tick(0.1);
    }

    assert!(world.log.len() >= 2, "in-memory log keeps growing without a sink");
    assert!(!world.vehicles.is_empty(), "simulation keeps running");
    world.finish().expect("no durable trailer left to fail");
}

#[test]
fn test_snapshot_exposes_colliding_pairs() {
    let mut world = SimWorld::new_fixed_with_seed(5);

    let mut pedestrian = Pedestrian::new(Side::Left);
    pedestrian.x = 400.0;
    world.pedestrians.push(pedestrian);

    let mut vehicle = Vehicle::new(Direction::North);
    vehicle.x = 390.0;
    vehicle.y = 280.0;
    world.vehicles.push(vehicle);

    let before = world.log.len();
    world.tick(0.001);

    let snapshot = world.snapshot();
    assert_eq!(snapshot.collisions.len(), 1);
    assert_eq!(snapshot.collisions[0].pedestrian, 0);
    assert_eq!(snapshot.collisions[0].vehicle, 0);
    assert_eq!(world.log.len(), before + 1, "one collision entry recorded");
    assert_eq!(world.collisions_detected, 1);
}

#[test]
fn test_adaptive_runner_cycle_and_durable_files() {
    let dir = tempfile::tempdir().expect("temp dir");
    let runner = AdaptiveRunner::new(dir.path()).with_time_scale(100.0);
    let counts = VehicleCounts::new(10, 5, 0, 5);

    assert!(runner.start(counts).expect("start should succeed"));
    // A second start while the cycle runs is a no-op
    assert!(!runner.start(counts).expect("reentrant start should not error"));
    assert!(runner.is_running());

    let (txt_path, csv_path) = runner
        .wait()
        .expect("worker should not fail")
        .expect("a run was started");

    let txt = std::fs::read_to_string(&txt_path).expect("text log readable");
    assert!(txt.starts_with("Smart Traffic Log - "));
    assert!(txt.contains("North - Vehicles: 10 | Green Time: 15s"));
    assert!(txt.contains("South - Vehicles: 0 | Green Time: 5s"));

    let csv = std::fs::read_to_string(&csv_path).expect("csv log readable");
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines[0], "Time,Direction,Vehicles,Green_Time");
    assert_eq!(lines.len(), 5, "one row per direction per cycle");
    assert!(lines[1].ends_with("North,10,15"));
    assert!(lines[2].ends_with("East,5,8"));
    assert!(lines[3].ends_with("West,5,8"));
    assert!(lines[4].ends_with("South,0,5"));

    // The in-memory store is queryable by direction
    assert_eq!(runner.query_log(Some(Direction::North)).len(), 1);
    assert_eq!(runner.query_log(None).len(), 4);

    // Clearing the view never touches the store
    assert_eq!(runner.snapshot().view.len(), 4);
    runner.clear_view();
    assert!(runner.snapshot().view.is_empty());
    assert_eq!(runner.query_log(None).len(), 4);

    // The runner re-arms for another run
    assert!(runner.start(counts).expect("restart should succeed"));
    runner.wait().expect("second run should not fail");
}

#[test]
fn test_adaptive_world_records_allocation_payload() {
    let counts = VehicleCounts::new(10, 5, 0, 5);
    let world = SimWorld::new_adaptive(&counts);

    let entries = world.log.entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].category, LogCategory::PhaseChange);
    assert_eq!(entries[0].direction, Some(Direction::North));
    assert_eq!(entries[0].vehicle_count, Some(10));
    assert_eq!(entries[0].green_time, Some(15));
}
