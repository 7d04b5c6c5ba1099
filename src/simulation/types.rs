//! Core types for the intersection simulation
//!
//! These are standalone types with no dependency on any presentation layer.

use std::fmt;

/// Width of the simulated domain in world units
pub const DOMAIN_WIDTH: f32 = 800.0;

/// Height of the simulated domain in world units
pub const DOMAIN_HEIGHT: f32 = 600.0;

/// Vehicle bounding box, long side along the travel direction
pub const VEHICLE_LENGTH: f32 = 40.0;
pub const VEHICLE_WIDTH: f32 = 20.0;

/// Vehicle travel speed in world units per simulated second
pub const VEHICLE_SPEED: f32 = 120.0;

/// Vehicles are culled once fully past the domain bounds by this margin
pub const VEHICLE_CULL_MARGIN: f32 = 60.0;

/// Pedestrian walking speed in world units per simulated second
pub const PEDESTRIAN_SPEED: f32 = 90.0;

/// Pedestrians are culled once past the domain bounds by this margin
pub const PEDESTRIAN_CULL_MARGIN: f32 = 20.0;

/// Fixed y-coordinate of the crosswalk
pub const CROSSWALK_Y: f32 = 290.0;

/// Simulated seconds between vehicle spawns
pub const VEHICLE_SPAWN_INTERVAL: f32 = 1.0;

/// Simulated seconds between pedestrian spawns while WALK is shown
pub const PEDESTRIAN_SPAWN_INTERVAL: f32 = 2.0;

/// Uniform green duration per direction in the fixed-cycle variant
pub const FIXED_GREEN_SECS: f32 = 5.0;

/// All-red clearance gap between green phases
pub const CLEARANCE_SECS: f32 = 3.0;

/// Shortest green any direction receives in the adaptive variant
pub const MIN_GREEN_SECS: u32 = 5;

/// Total green-time budget the adaptive variant distributes per cycle
pub const MAX_CYCLE_BUDGET_SECS: u32 = 30;

/// Green given to every direction when all vehicle counts are zero
pub const DEFAULT_GREEN_SECS: u32 = 10;

/// One of the four approaches to the intersection
///
/// Declaration order doubles as the round-robin cycle order and as the
/// deterministic tie-break when adaptive green times are equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    /// Stable index for direction-keyed tables
    pub fn index(self) -> usize {
        self as usize
    }

    /// Static geometry for this approach: where vehicles appear, which way
    /// they travel, and where they must hold without right-of-way.
    pub fn info(self) -> &'static DirectionInfo {
        &DIRECTION_TABLE[self.index()]
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Direction::North => "North",
            Direction::East => "East",
            Direction::South => "South",
            Direction::West => "West",
        };
        write!(f, "{}", name)
    }
}

/// Per-direction geometry, keyed once rather than re-derived per call site
#[derive(Debug, Clone, Copy)]
pub struct DirectionInfo {
    /// Top-left corner of a freshly spawned vehicle's bounding rect
    pub spawn: Position,
    /// Unit travel axis
    pub axis: Position,
    /// Coordinate on the travel axis where approaching vehicles hold
    pub stop_line: f32,
}

/// Geometry of the four approaches. Northbound traffic enters from the
/// bottom edge and travels up (negative y); the rest follow suit.
const DIRECTION_TABLE: [DirectionInfo; 4] = [
    // North
    DirectionInfo {
        spawn: Position {
            x: 380.0,
            y: DOMAIN_HEIGHT,
        },
        axis: Position { x: 0.0, y: -1.0 },
        stop_line: 220.0,
    },
    // East
    DirectionInfo {
        spawn: Position {
            x: -VEHICLE_LENGTH,
            y: 280.0,
        },
        axis: Position { x: 1.0, y: 0.0 },
        stop_line: 360.0,
    },
    // South
    DirectionInfo {
        spawn: Position {
            x: 420.0,
            y: -VEHICLE_LENGTH,
        },
        axis: Position { x: 0.0, y: 1.0 },
        stop_line: 340.0,
    },
    // West
    DirectionInfo {
        spawn: Position {
            x: DOMAIN_WIDTH,
            y: 320.0,
        },
        axis: Position { x: -1.0, y: 0.0 },
        stop_line: 460.0,
    },
];

/// Signal aspect shown to one approach
///
/// Yellow is not modeled; phases go straight from green to the all-red
/// clearance gap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalState {
    Red,
    Green,
}

/// Which side of the crosswalk a pedestrian starts from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub const ALL: [Side; 2] = [Side::Left, Side::Right];
}

/// A 2D position in the simulation
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned bounding rectangle
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// True when the rectangles overlap by any positive area.
    /// Rects that merely touch along an edge do not intersect.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.x + other.width
            && other.x < self.x + self.width
            && self.y < other.y + other.height
            && other.y < self.y + self.height
    }
}
