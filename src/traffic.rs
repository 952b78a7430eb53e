//! Per-tick traffic movement.

use crate::lanes::{Lane, Road};

impl Lane {
    /// One simulation tick. Vehicles shift a single cell once every
    /// `speed_ticks` ticks and wrap around the playfield.
    pub fn step(&mut self, width: i32) {
        self.tick_counter += 1;
        if self.tick_counter < self.speed_ticks {
            return;
        }
        self.tick_counter = 0;
        if width <= 0 {
            return;
        }
        let dx = if self.direction_right { 1 } else { -1 };
        for x in &mut self.positions {
            *x = (*x + dx).rem_euclid(width);
        }
    }
}

/// Lanes are independent; a single pass in row order is enough.
pub fn advance(road: &mut Road) {
    let width = road.width;
    for lane in &mut road.lanes {
        lane.step(width);
    }
}
