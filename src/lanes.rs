//! Procedural road layout.
//!
//! The band between the top refuge (row 1) and the bottom refuge (last row) is
//! filled top-down with road segments of 4-6 same-direction lanes, each
//! followed by 1-3 refuge rows. Direction flips between segments.

use rand::Rng;
use std::ops::RangeInclusive;

pub const TOP_REFUGE_ROW: i32 = 1;

const SEGMENT_LANES: RangeInclusive<i32> = 4..=6;
const SEGMENT_LANES_CAP: i32 = 8;
const GAP_ROWS: RangeInclusive<i32> = 1..=3;
const FACTOR_CAP: f32 = 2.0;
const PALETTES: u32 = 9;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VehicleClass {
    Compact,
    Regular,
    Semi,
}

impl VehicleClass {
    pub const ALL: [VehicleClass; 3] = [
        VehicleClass::Compact,
        VehicleClass::Regular,
        VehicleClass::Semi,
    ];

    pub fn length(self) -> i32 {
        match self {
            VehicleClass::Compact => 2,
            VehicleClass::Regular => 3,
            VehicleClass::Semi => 5,
        }
    }

    /// Nominal speed range; bigger vehicles are slower.
    fn speed_budget(self) -> RangeInclusive<i32> {
        match self {
            VehicleClass::Compact => 3..=5,
            VehicleClass::Regular => 2..=4,
            VehicleClass::Semi => 1..=3,
        }
    }

    fn glyphs(self, right: bool) -> Vec<char> {
        let s = match (self, right) {
            (VehicleClass::Compact, true) => "o>",
            (VehicleClass::Compact, false) => "<o",
            (VehicleClass::Regular, true) => "[=>",
            (VehicleClass::Regular, false) => "<=]",
            (VehicleClass::Semi, true) => "[##]>",
            (VehicleClass::Semi, false) => "<[##]",
        };
        s.chars().collect()
    }
}

#[derive(Clone, Debug)]
pub struct Lane {
    pub row: i32,
    pub direction_right: bool,
    /// Ticks between one-cell advances (lower = faster).
    pub speed_ticks: u32,
    pub class: VehicleClass,
    pub vehicle_length: i32,
    pub glyphs: Vec<char>,
    /// Leftmost x of each vehicle, always in `[0, width)`.
    pub positions: Vec<i32>,
    pub tick_counter: u32,
}

impl Lane {
    /// Whether any vehicle covers column `x`, wrapping around the playfield.
    pub fn occupies(&self, x: i32, width: i32) -> bool {
        if width <= 0 {
            return false;
        }
        self.positions
            .iter()
            .any(|&left| (x - left).rem_euclid(width) < self.vehicle_length)
    }
}

/// Lanes plus the refuge map for one level at one playfield size.
#[derive(Clone, Debug, Default)]
pub struct Road {
    pub width: i32,
    pub height: i32,
    pub lanes: Vec<Lane>,
    pub safe_rows: Vec<bool>,
}

impl Road {
    pub fn is_safe_row(&self, y: i32) -> bool {
        usize::try_from(y)
            .ok()
            .and_then(|i| self.safe_rows.get(i).copied())
            .unwrap_or(false)
    }

    /// At most one lane sits on a row, so the first match is the only one.
    pub fn lane_at(&self, row: i32) -> Option<&Lane> {
        self.lanes.iter().find(|l| l.row == row)
    }

    pub fn bottom_refuge_row(&self) -> i32 {
        (self.height - 1).max(0)
    }
}

/// Spacing multiplier. Ramps per level up to 5, then only every 5th level.
pub fn density_factor(level: u32) -> f32 {
    let level = level.max(1);
    let f = if level <= 5 {
        1.0 + (level - 1) as f32 * 0.1
    } else {
        1.4 + ((level - 5) / 5) as f32 * 0.1
    };
    f.min(FACTOR_CAP)
}

/// Velocity multiplier. Keeps climbing every level past 5, at half the rate.
pub fn speed_factor(level: u32) -> f32 {
    let level = level.max(1);
    let f = if level <= 5 {
        1.0 + (level - 1) as f32 * 0.1
    } else {
        1.4 + (level - 5) as f32 * 0.05
    };
    f.min(FACTOR_CAP)
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LevelContext {
    pub number: u32,
    pub density_factor: f32,
    pub speed_factor: f32,
    pub width: i32,
    pub height: i32,
}

impl LevelContext {
    pub fn new(number: u32, width: i32, height: i32) -> Self {
        let number = number.max(1);
        Self {
            number,
            density_factor: density_factor(number),
            speed_factor: speed_factor(number),
            width,
            height,
        }
    }

    pub fn next(&self) -> Self {
        Self::new(self.number + 1, self.width, self.height)
    }

    pub fn resized(&self, width: i32, height: i32) -> Self {
        Self::new(self.number, width, height)
    }

    /// Palettes repeat every nine levels; difficulty does not.
    pub fn palette_index(&self) -> usize {
        (self.number.saturating_sub(1) % PALETTES) as usize
    }
}

pub fn generate(level: &LevelContext, rng: &mut impl Rng) -> Road {
    let (width, height) = (level.width, level.height);
    // the bottom refuge must sit below the goal row or spawning wins the level
    if width <= 0 || height - 1 <= TOP_REFUGE_ROW {
        return Road::default();
    }

    let mut safe_rows = vec![false; height as usize];
    let bottom = height - 1;
    for row in 0..=TOP_REFUGE_ROW.min(bottom) {
        safe_rows[row as usize] = true;
    }
    safe_rows[bottom as usize] = true;

    let mut lanes = Vec::new();
    let mut right = rng.gen_bool(0.5);
    let mut row = TOP_REFUGE_ROW + 1;

    while row < bottom {
        let count = rng.gen_range(SEGMENT_LANES).min(SEGMENT_LANES_CAP);
        for _ in 0..count {
            if row >= bottom {
                break;
            }
            lanes.push(make_lane(level, row, right, rng));
            row += 1;
        }

        let gap = rng.gen_range(GAP_ROWS);
        for _ in 0..gap {
            if row >= bottom {
                break;
            }
            safe_rows[row as usize] = true;
            row += 1;
        }
        right = !right;
    }

    log::info!(
        "level {} generated: {} lanes on {}x{} (density {:.2}, speed {:.2})",
        level.number,
        lanes.len(),
        width,
        height,
        level.density_factor,
        level.speed_factor
    );

    Road {
        width,
        height,
        lanes,
        safe_rows,
    }
}

fn make_lane(level: &LevelContext, row: i32, right: bool, rng: &mut impl Rng) -> Lane {
    let class = VehicleClass::ALL[rng.gen_range(0..VehicleClass::ALL.len())];
    let len = class.length();

    let nominal = rng.gen_range(class.speed_budget());
    let ticks_per_advance = (7 - nominal).max(1) as f32;
    let speed_ticks = ((ticks_per_advance / level.speed_factor).round() as u32).max(1);

    let gap = ((2 * len).max(6) as f32 / level.density_factor) as i32;
    let gap = gap.max(len + 1);
    let count = (level.width / (len + gap)).max(1);

    let mut x = rng.gen_range(0..level.width);
    let mut positions = Vec::with_capacity(count as usize);
    for _ in 0..count {
        positions.push(x.rem_euclid(level.width));
        x += len + gap + rng.gen_range(0..3);
    }

    Lane {
        row,
        direction_right: right,
        speed_ticks,
        class,
        vehicle_length: len,
        glyphs: class.glyphs(right),
        positions,
        tick_counter: 0,
    }
}
