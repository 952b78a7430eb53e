//! Simulation core for a terminal Frogger: lane generation, traffic,
//! collisions, scoring, the leaderboard and the session state machine.
//!
//! Nothing in here touches the terminal. The binary owns rendering, key
//! translation and the tick loop, and drives a [`session::Session`].

pub mod collision;
pub mod lanes;
pub mod leaderboard;
pub mod ledger;
pub mod player;
pub mod session;
pub mod storage;
pub mod traffic;
