//! Top-level game controller.
//!
//! The host feeds two serialized streams into a [`Session`]: logical input
//! actions via [`Session::on_input`] and fixed-rate ticks via
//! [`Session::on_tick`]. Every timer is a "not before" instant stored inside
//! the phase that owns it, so leaving a phase drops its timers with it.

use crate::collision::{evaluate, Outcome};
use crate::lanes::{generate, LevelContext, Road};
use crate::leaderboard::{Leaderboard, LeaderboardEntry, ScoreStore, NAME_MAX};
use crate::ledger::ScoreLedger;
use crate::player::PlayerToken;
use crate::traffic::advance;
use rand::{rngs::SmallRng, SeedableRng};
use std::time::{Duration, Instant};

pub const DEATH_FLASH: Duration = Duration::from_millis(900);
pub const GAME_OVER_FLASH: Duration = Duration::from_millis(1500);
/// Input ignored after a death flash so a buffered key can't kill again.
pub const RESPAWN_GRACE: Duration = Duration::from_millis(250);
/// Input ignored after a level clear.
pub const LEVEL_SETTLE: Duration = Duration::from_millis(400);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
    TogglePause,
    Confirm,
    Cancel,
    TextChar(char),
    Backspace,
    Quit,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Phase {
    StartScreen,
    Playing { input_after: Option<Instant> },
    /// Keeps the settle/grace window it was paused from.
    Paused { input_after: Option<Instant> },
    DeathFlash { until: Instant },
    GameOverFlash { until: Instant },
    NameEntry { name: String },
    /// Transient: resolved to `StartScreen` before control returns.
    Reset,
}

pub struct Session<S: ScoreStore> {
    phase: Phase,
    level: LevelContext,
    road: Road,
    player: PlayerToken,
    ledger: ScoreLedger,
    leaderboard: Leaderboard,
    store: S,
    rng: SmallRng,
}

impl<S: ScoreStore> Session<S> {
    pub fn new(width: i32, height: i32, seed: u64, store: S) -> Self {
        let leaderboard = Leaderboard::from_entries(store.load());
        let level = LevelContext::new(1, width, height);
        let mut rng = SmallRng::seed_from_u64(seed);
        let road = generate(&level, &mut rng);
        let player = PlayerToken::spawn(&road);
        Self {
            phase: Phase::StartScreen,
            level,
            road,
            player,
            ledger: ScoreLedger::new(0),
            leaderboard,
            store,
            rng,
        }
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn level(&self) -> &LevelContext {
        &self.level
    }

    pub fn road(&self) -> &Road {
        &self.road
    }

    pub fn player(&self) -> &PlayerToken {
        &self.player
    }

    pub fn ledger(&self) -> &ScoreLedger {
        &self.ledger
    }

    pub fn leaderboard(&self) -> &Leaderboard {
        &self.leaderboard
    }

    pub fn on_input(&mut self, action: Action, now: Instant) {
        if action == Action::Quit {
            return;
        }
        match &mut self.phase {
            Phase::StartScreen => self.enter(Phase::Playing { input_after: None }),
            Phase::Playing { input_after } => {
                let gate = *input_after;
                if gate.is_some_and(|t| now < t) {
                    return;
                }
                if action == Action::TogglePause {
                    self.enter(Phase::Paused { input_after: gate });
                    return;
                }
                let (dx, dy) = match action {
                    Action::MoveUp => (0, -1),
                    Action::MoveDown => (0, 1),
                    Action::MoveLeft => (-1, 0),
                    Action::MoveRight => (1, 0),
                    _ => return,
                };
                self.move_player(dx, dy, now);
            }
            Phase::Paused { input_after } => {
                if action == Action::TogglePause {
                    let gate = *input_after;
                    self.ledger.rearm_decay(now);
                    self.enter(Phase::Playing { input_after: gate });
                }
            }
            Phase::DeathFlash { .. } | Phase::GameOverFlash { .. } => {}
            Phase::NameEntry { name } => match action {
                Action::TextChar(ch) => {
                    if (ch.is_ascii_graphic() || ch == ' ') && name.chars().count() < NAME_MAX {
                        name.push(ch);
                    }
                }
                Action::Backspace => {
                    name.pop();
                }
                Action::Confirm => {
                    let entry = LeaderboardEntry::now(name, self.ledger.score);
                    self.commit_score(entry);
                    self.enter(Phase::Reset);
                }
                Action::Cancel => self.enter(Phase::Reset),
                _ => {}
            },
            Phase::Reset => {}
        }
        self.settle();
    }

    pub fn on_tick(&mut self, now: Instant) {
        match self.phase {
            Phase::Playing { .. } => {
                self.ledger.tick_decay(now);
                advance(&mut self.road);
                self.resolve(evaluate(&self.player, &self.road), now);
            }
            Phase::DeathFlash { until } if now >= until => {
                self.enter(Phase::Playing {
                    input_after: Some(now + RESPAWN_GRACE),
                });
            }
            Phase::GameOverFlash { until } if now >= until => {
                if self.leaderboard.qualifies(self.ledger.score) {
                    self.enter(Phase::NameEntry {
                        name: String::new(),
                    });
                } else {
                    self.enter(Phase::Reset);
                }
            }
            _ => {}
        }
        self.settle();
    }

    /// New playfield size: fresh lanes for the current level, player back
    /// at the bottom refuge. Score, lives and phase are kept.
    pub fn resize(&mut self, width: i32, height: i32) {
        self.level = self.level.resized(width, height);
        self.rebuild();
    }

    fn rebuild(&mut self) {
        self.road = generate(&self.level, &mut self.rng);
        self.player = PlayerToken::spawn(&self.road);
    }

    fn enter(&mut self, next: Phase) {
        log::debug!("phase {:?} -> {:?}", self.phase, next);
        self.phase = next;
    }

    fn settle(&mut self) {
        if self.phase == Phase::Reset {
            self.ledger = ScoreLedger::new(self.ledger.top_score);
            self.level = LevelContext::new(1, self.level.width, self.level.height);
            self.rebuild();
            self.enter(Phase::StartScreen);
        }
    }

    fn move_player(&mut self, dx: i32, dy: i32, now: Instant) {
        let gained = self
            .player
            .step(dx, dy, self.road.width, self.road.height);
        self.ledger.record_progress(gained);
        self.ledger.arm_decay(now);
        self.resolve(evaluate(&self.player, &self.road), now);
    }

    fn resolve(&mut self, outcome: Outcome, now: Instant) {
        match outcome {
            Outcome::Safe => {}
            Outcome::GoalReached => self.clear_level(now),
            Outcome::Hit => self.hit(now),
        }
    }

    fn clear_level(&mut self, now: Instant) {
        self.ledger.clear_level(self.level.number);
        log::info!(
            "level {} cleared, score {}, lives {}",
            self.level.number,
            self.ledger.score,
            self.ledger.lives
        );
        self.level = self.level.next();
        self.rebuild();
        self.enter(Phase::Playing {
            input_after: Some(now + LEVEL_SETTLE),
        });
    }

    fn hit(&mut self, now: Instant) {
        let game_over = self.ledger.lose_life();
        self.player = PlayerToken::spawn(&self.road);
        if game_over {
            log::info!(
                "game over at level {} with {} points",
                self.level.number,
                self.ledger.score
            );
            self.enter(Phase::GameOverFlash {
                until: now + GAME_OVER_FLASH,
            });
        } else {
            self.enter(Phase::DeathFlash {
                until: now + DEATH_FLASH,
            });
        }
    }

    fn commit_score(&mut self, entry: LeaderboardEntry) {
        let name = entry.name.clone();
        let rank = self.leaderboard.insert(entry);
        log::info!("{name} entered the leaderboard at rank {rank:?}");
        if let Err(e) = self.store.save(self.leaderboard.entries()) {
            log::warn!("leaderboard not saved: {e:#}");
        }
    }
}
