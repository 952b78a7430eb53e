//! Score, lives and the idle score-decay timer.

use std::time::{Duration, Instant};

pub const START_LIVES: u32 = 3;
pub const POINTS_PER_ROW: u32 = 10;
pub const POINTS_PER_LEVEL: u32 = 100;
pub const DECAY_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScoreLedger {
    pub score: u32,
    pub lives: u32,
    pub top_score: u32,
    /// Next instant the score loses a point. `None` until the first move
    /// of the current life/level.
    decay_at: Option<Instant>,
}

impl Default for ScoreLedger {
    fn default() -> Self {
        Self::new(0)
    }
}

impl ScoreLedger {
    pub fn new(top_score: u32) -> Self {
        Self {
            score: 0,
            lives: START_LIVES,
            top_score,
            decay_at: None,
        }
    }

    fn add(&mut self, points: u32) {
        self.score = self.score.saturating_add(points);
        self.top_score = self.top_score.max(self.score);
    }

    pub fn record_progress(&mut self, rows: i32) {
        if rows > 0 {
            self.add(rows as u32 * POINTS_PER_ROW);
        }
    }

    /// Level-clear bonus and extra life. Decay waits for the next move.
    pub fn clear_level(&mut self, level: u32) {
        self.add(POINTS_PER_LEVEL.saturating_mul(level));
        self.lives += 1;
        self.decay_at = None;
    }

    /// Returns true when this was the last life.
    pub fn lose_life(&mut self) -> bool {
        self.lives = self.lives.saturating_sub(1);
        self.decay_at = None;
        self.lives == 0
    }

    pub fn decay_armed(&self) -> bool {
        self.decay_at.is_some()
    }

    /// First move arms the timer; later moves leave it alone.
    pub fn arm_decay(&mut self, now: Instant) {
        if self.decay_at.is_none() {
            self.decay_at = Some(now + DECAY_INTERVAL);
        }
    }

    /// Restart an armed timer with a full interval (used on unpause).
    pub fn rearm_decay(&mut self, now: Instant) {
        if self.decay_at.is_some() {
            self.decay_at = Some(now + DECAY_INTERVAL);
        }
    }

    pub fn tick_decay(&mut self, now: Instant) {
        if let Some(at) = self.decay_at {
            if now >= at {
                self.score = self.score.saturating_sub(1);
                self.decay_at = Some(now + DECAY_INTERVAL);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_and_level_bonus() {
        let mut l = ScoreLedger::new(0);
        l.record_progress(3);
        assert_eq!(l.score, 30);
        l.clear_level(3);
        assert_eq!(l.score, 330);
        assert_eq!(l.lives, START_LIVES + 1);
        assert_eq!(l.top_score, 330);
    }

    #[test]
    fn test_top_score_survives_lower_games() {
        let mut l = ScoreLedger::new(500);
        l.record_progress(2);
        assert_eq!(l.top_score, 500);
    }

    #[test]
    fn test_decay_needs_arming_and_floors_at_zero() {
        let t0 = Instant::now();
        let mut l = ScoreLedger::new(0);
        l.score = 1;
        l.tick_decay(t0 + Duration::from_secs(30));
        assert_eq!(l.score, 1);

        l.arm_decay(t0);
        l.tick_decay(t0 + Duration::from_millis(999));
        assert_eq!(l.score, 1);
        l.tick_decay(t0 + DECAY_INTERVAL);
        assert_eq!(l.score, 0);
        l.tick_decay(t0 + DECAY_INTERVAL * 2);
        assert_eq!(l.score, 0);
    }

    #[test]
    fn test_rearm_gives_fresh_window() {
        let t0 = Instant::now();
        let mut l = ScoreLedger::new(0);
        l.score = 10;
        l.arm_decay(t0);
        let resumed = t0 + Duration::from_secs(5);
        l.rearm_decay(resumed);
        l.tick_decay(resumed + Duration::from_millis(500));
        assert_eq!(l.score, 10);
        l.tick_decay(resumed + DECAY_INTERVAL);
        assert_eq!(l.score, 9);
    }

    #[test]
    fn test_last_life_reports_game_over() {
        let mut l = ScoreLedger::new(0);
        assert!(!l.lose_life());
        assert!(!l.lose_life());
        assert!(l.lose_life());
        assert_eq!(l.lives, 0);
    }
}
