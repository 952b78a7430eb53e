use crate::lanes::Road;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlayerToken {
    pub x: i32,
    pub y: i32,
    /// Smallest row reached since the last spawn.
    pub highest_y: i32,
}

impl PlayerToken {
    /// Centre of the bottom refuge.
    pub fn spawn(road: &Road) -> Self {
        let y = road.bottom_refuge_row();
        Self {
            x: (road.width / 2).max(0),
            y,
            highest_y: y,
        }
    }

    /// Moves by one step, clamped to the playfield. Returns how many rows
    /// past the previous best the move reached (0 if none).
    pub fn step(&mut self, dx: i32, dy: i32, width: i32, height: i32) -> i32 {
        self.x = (self.x + dx).clamp(0, (width - 1).max(0));
        self.y = (self.y + dy).clamp(0, (height - 1).max(0));
        if self.y < self.highest_y {
            let gained = self.highest_y - self.y;
            self.highest_y = self.y;
            gained
        } else {
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamped_to_bounds() {
        let mut p = PlayerToken {
            x: 0,
            y: 9,
            highest_y: 9,
        };
        p.step(-1, 0, 10, 10);
        assert_eq!((p.x, p.y), (0, 9));
        p.step(0, 1, 10, 10);
        assert_eq!(p.y, 9);
        p.x = 9;
        p.step(1, 0, 10, 10);
        assert_eq!(p.x, 9);
    }

    #[test]
    fn test_only_new_rows_count() {
        let mut p = PlayerToken {
            x: 4,
            y: 8,
            highest_y: 8,
        };
        assert_eq!(p.step(0, -1, 10, 10), 1);
        assert_eq!(p.step(0, 1, 10, 10), 0);
        assert_eq!(p.step(0, -1, 10, 10), 0);
        assert_eq!(p.step(0, -1, 10, 10), 1);
        assert_eq!(p.highest_y, 6);
    }
}
