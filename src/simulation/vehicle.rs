//! Vehicle movement and stop-line resolution

use super::types::{
    Direction, Rect, DOMAIN_HEIGHT, DOMAIN_WIDTH, VEHICLE_CULL_MARGIN, VEHICLE_LENGTH,
    VEHICLE_SPEED, VEHICLE_WIDTH,
};

/// A vehicle approaching or crossing the intersection
#[derive(Debug, Clone, Copy)]
pub struct Vehicle {
    pub direction: Direction,
    /// Top-left corner of the bounding rect
    pub x: f32,
    pub y: f32,
}

impl Vehicle {
    pub fn new(direction: Direction) -> Self {
        let spawn = direction.info().spawn;
        Self {
            direction,
            x: spawn.x,
            y: spawn.y,
        }
    }

    /// Bounding rect, long side along the travel direction
    pub fn rect(&self) -> Rect {
        match self.direction {
            Direction::East | Direction::West => {
                Rect::new(self.x, self.y, VEHICLE_LENGTH, VEHICLE_WIDTH)
            }
            Direction::North | Direction::South => {
                Rect::new(self.x, self.y, VEHICLE_WIDTH, VEHICLE_LENGTH)
            }
        }
    }

    /// Signed distance of the leading edge past the stop line, measured
    /// along the travel axis. Negative while still approaching, zero when
    /// held exactly at the line.
    pub fn progress_past_stop_line(&self) -> f32 {
        let stop_line = self.direction.info().stop_line;
        match self.direction {
            Direction::North => stop_line - self.y,
            Direction::South => (self.y + VEHICLE_LENGTH) - stop_line,
            Direction::East => (self.x + VEHICLE_LENGTH) - stop_line,
            Direction::West => stop_line - self.x,
        }
    }

    /// Advance one tick. Without right-of-way the movement is clamped at
    /// the stop line; a vehicle already past the line keeps moving and is
    /// never retroactively halted.
    pub fn step(&mut self, dt: f32, has_right_of_way: bool) {
        let step = VEHICLE_SPEED * dt;
        let allowed = if has_right_of_way {
            step
        } else {
            let progress = self.progress_past_stop_line();
            if progress > 0.0 {
                step
            } else {
                step.min(-progress)
            }
        };

        let axis = self.direction.info().axis;
        self.x += axis.x * allowed;
        self.y += axis.y * allowed;
    }

    /// True once the rect has fully left the domain, plus margin, in the
    /// direction of travel
    pub fn is_off_screen(&self) -> bool {
        let rect = self.rect();
        match self.direction {
            Direction::North => rect.y + rect.height < -VEHICLE_CULL_MARGIN,
            Direction::South => rect.y > DOMAIN_HEIGHT + VEHICLE_CULL_MARGIN,
            Direction::East => rect.x > DOMAIN_WIDTH + VEHICLE_CULL_MARGIN,
            Direction::West => rect.x + rect.width < -VEHICLE_CULL_MARGIN,
        }
    }
}
