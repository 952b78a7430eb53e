//! Hit / safe / goal classification for the player's current cell.

use crate::lanes::{Road, TOP_REFUGE_ROW};
use crate::player::PlayerToken;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Safe,
    Hit,
    GoalReached,
}

pub fn evaluate(player: &PlayerToken, road: &Road) -> Outcome {
    if road.is_safe_row(player.y) {
        return if player.y == TOP_REFUGE_ROW {
            Outcome::GoalReached
        } else {
            Outcome::Safe
        };
    }
    match road.lane_at(player.y) {
        Some(lane) if lane.occupies(player.x, road.width) => Outcome::Hit,
        _ => Outcome::Safe,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lanes::{Lane, VehicleClass};

    fn road_with_truck(left: i32) -> Road {
        let mut safe_rows = vec![false; 8];
        safe_rows[0] = true;
        safe_rows[1] = true;
        safe_rows[4] = true;
        safe_rows[7] = true;
        Road {
            width: 20,
            height: 8,
            lanes: vec![Lane {
                row: 3,
                direction_right: false,
                speed_ticks: 2,
                class: VehicleClass::Semi,
                vehicle_length: 5,
                glyphs: "<[##]".chars().collect(),
                positions: vec![left],
                tick_counter: 0,
            }],
            safe_rows,
        }
    }

    fn at(x: i32, y: i32) -> PlayerToken {
        PlayerToken { x, y, highest_y: y }
    }

    #[test]
    fn test_vehicle_span_is_half_open() {
        let road = road_with_truck(6);
        assert_eq!(evaluate(&at(5, 3), &road), Outcome::Safe);
        assert_eq!(evaluate(&at(6, 3), &road), Outcome::Hit);
        assert_eq!(evaluate(&at(10, 3), &road), Outcome::Hit);
        assert_eq!(evaluate(&at(11, 3), &road), Outcome::Safe);
    }

    #[test]
    fn test_span_wraps_at_right_edge() {
        let road = road_with_truck(18);
        assert_eq!(evaluate(&at(19, 3), &road), Outcome::Hit);
        assert_eq!(evaluate(&at(2, 3), &road), Outcome::Hit);
        assert_eq!(evaluate(&at(3, 3), &road), Outcome::Safe);
    }

    #[test]
    fn test_refuge_rows_ignore_traffic() {
        let mut road = road_with_truck(0);
        // put the lane on a refuge row on purpose
        road.lanes[0].row = 4;
        assert_eq!(evaluate(&at(1, 4), &road), Outcome::Safe);
        assert_eq!(evaluate(&at(1, 7), &road), Outcome::Safe);
        assert_eq!(evaluate(&at(1, 1), &road), Outcome::GoalReached);
    }

    #[test]
    fn test_repeat_evaluation_is_stable() {
        let road = road_with_truck(6);
        for p in [at(7, 3), at(2, 3), at(3, 1), at(3, 2)] {
            assert_eq!(evaluate(&p, &road), evaluate(&p, &road));
        }
    }
}
