//! Pedestrian movement across the crosswalk

use super::types::{
    Rect, Side, CROSSWALK_Y, DOMAIN_WIDTH, PEDESTRIAN_CULL_MARGIN, PEDESTRIAN_SPEED,
};

/// Horizontal spawn points on either side of the crosswalk
const SPAWN_X_LEFT: f32 = 100.0;
const SPAWN_X_RIGHT: f32 = 700.0;

/// A pedestrian crossing the intersection
#[derive(Debug, Clone, Copy)]
pub struct Pedestrian {
    pub side: Side,
    pub x: f32,
    pub y: f32,
    /// Latched on the first tick WALK is shown; never cleared afterwards,
    /// so a pedestrian mid-crossing always finishes
    pub crossing: bool,
}

impl Pedestrian {
    pub fn new(side: Side) -> Self {
        let x = match side {
            Side::Left => SPAWN_X_LEFT,
            Side::Right => SPAWN_X_RIGHT,
        };
        Self {
            side,
            x,
            y: CROSSWALK_Y,
            crossing: false,
        }
    }

    fn velocity(&self) -> f32 {
        match self.side {
            Side::Left => PEDESTRIAN_SPEED,
            Side::Right => -PEDESTRIAN_SPEED,
        }
    }

    /// Advance one tick. The crossing latch is set while WALK is active and
    /// keeps the pedestrian moving even after the signal turns.
    pub fn step(&mut self, dt: f32, walk_active: bool) {
        if walk_active {
            self.crossing = true;
        }
        if self.crossing {
            self.x += self.velocity() * dt;
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x - 5.0, self.y - 5.0, 10.0, 20.0)
    }

    pub fn is_off_screen(&self) -> bool {
        self.x < -PEDESTRIAN_CULL_MARGIN || self.x > DOMAIN_WIDTH + PEDESTRIAN_CULL_MARGIN
    }
}
