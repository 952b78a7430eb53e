//! Top-10 leaderboard.

use chrono::{DateTime, Local, TimeZone};
use serde::{Deserialize, Serialize};

pub const MAX_ENTRIES: usize = 10;
pub const NAME_MAX: usize = 8;
pub const DEFAULT_NAME: &str = "PLAYER";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub name: String,
    pub score: u32,
    #[serde(rename = "time")]
    pub timestamp_unix: i64,
    /// MMDDYY in local time.
    #[serde(rename = "date")]
    pub date_stamp: String,
}

impl LeaderboardEntry {
    /// Trims and truncates `name`; blank names become `PLAYER`.
    pub fn new<Tz: TimeZone>(name: &str, score: u32, at: DateTime<Tz>) -> Self
    where
        Tz::Offset: std::fmt::Display,
    {
        Self {
            name: normalize_name(name),
            score,
            timestamp_unix: at.timestamp(),
            date_stamp: at.format("%m%d%y").to_string(),
        }
    }

    pub fn now(name: &str, score: u32) -> Self {
        Self::new(name, score, Local::now())
    }
}

pub fn normalize_name(raw: &str) -> String {
    let name: String = raw.trim().chars().take(NAME_MAX).collect();
    let name = name.trim_end();
    if name.is_empty() {
        DEFAULT_NAME.to_string()
    } else {
        name.to_string()
    }
}

/// Descending by score; equal scores keep insertion order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Leaderboard {
    entries: Vec<LeaderboardEntry>,
}

impl Leaderboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sorts and caps whatever was loaded.
    pub fn from_entries(entries: Vec<LeaderboardEntry>) -> Self {
        let mut board = Self { entries };
        board.normalize();
        board
    }

    fn normalize(&mut self) {
        // stable sort keeps earlier entries ahead on ties
        self.entries.sort_by(|a, b| b.score.cmp(&a.score));
        self.entries.truncate(MAX_ENTRIES);
    }

    pub fn entries(&self) -> &[LeaderboardEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn top_score(&self) -> Option<u32> {
        self.entries.first().map(|e| e.score)
    }

    pub fn qualifies(&self, score: u32) -> bool {
        if self.entries.len() < MAX_ENTRIES {
            return true;
        }
        self.entries.last().map(|e| score > e.score).unwrap_or(true)
    }

    /// Returns the 1-based rank of the new entry, or `None` if it fell off.
    pub fn insert(&mut self, entry: LeaderboardEntry) -> Option<usize> {
        self.entries.push(entry);
        let inserted = self.entries.len() - 1;
        // a new entry lands after every equal score
        let score = self.entries[inserted].score;
        let rank = self.entries[..inserted]
            .iter()
            .filter(|e| e.score >= score)
            .count();
        self.normalize();
        (rank < MAX_ENTRIES).then_some(rank + 1)
    }
}

/// Persistence collaborator. Loading never fails from the caller's point of
/// view; saving may fail and the caller decides how loud to be about it.
pub trait ScoreStore {
    fn load(&self) -> Vec<LeaderboardEntry>;
    fn save(&self, entries: &[LeaderboardEntry]) -> anyhow::Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn entry(name: &str, score: u32) -> LeaderboardEntry {
        LeaderboardEntry::new(name, score, Utc.timestamp_opt(1_700_000_000, 0).unwrap())
    }

    fn full_board() -> Leaderboard {
        Leaderboard::from_entries((1..=10).map(|i| entry("CPU", i * 100)).collect())
    }

    #[test]
    fn test_tenth_place_tie_does_not_qualify() {
        let board = full_board();
        assert_eq!(board.entries().last().unwrap().score, 100);
        assert!(!board.qualifies(100));
        assert!(board.qualifies(101));
    }

    #[test]
    fn test_short_board_always_qualifies() {
        let board = Leaderboard::from_entries(vec![entry("A", 50)]);
        assert!(board.qualifies(0));
    }

    #[test]
    fn test_insert_sorts_and_caps() {
        let mut board = full_board();
        assert_eq!(board.insert(entry("NEW", 550)), Some(6));
        assert_eq!(board.len(), MAX_ENTRIES);
        assert_eq!(board.entries()[5].name, "NEW");
        assert!(board.entries().windows(2).all(|w| w[0].score >= w[1].score));
        assert_eq!(board.entries().last().unwrap().score, 200);

        assert_eq!(board.insert(entry("LOW", 1)), None);
        assert!(board.entries().iter().all(|e| e.name != "LOW"));
    }

    #[test]
    fn test_ties_keep_insertion_order() {
        let mut board = Leaderboard::new();
        board.insert(entry("FIRST", 300));
        board.insert(entry("SECOND", 300));
        assert_eq!(board.insert(entry("THIRD", 300)), Some(3));
        let names: Vec<_> = board.entries().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["FIRST", "SECOND", "THIRD"]);
    }

    #[test]
    fn test_name_rules() {
        assert_eq!(normalize_name("   "), "PLAYER");
        assert_eq!(normalize_name(" AB "), "AB");
        assert_eq!(normalize_name("ABCDEFGHIJK"), "ABCDEFGH");
        assert_eq!(normalize_name("ABCDEFG  XYZ"), "ABCDEFG");
    }

    #[test]
    fn test_date_stamp_is_mmddyy() {
        let e = LeaderboardEntry::new("X", 1, Utc.with_ymd_and_hms(2024, 3, 7, 12, 0, 0).unwrap());
        assert_eq!(e.date_stamp, "030724");
    }

    #[test]
    fn test_wire_field_names() {
        let json = serde_json::to_value(entry("AB", 500)).unwrap();
        assert_eq!(json["name"], "AB");
        assert_eq!(json["score"], 500);
        assert_eq!(json["time"], 1_700_000_000);
        assert!(json["date"].is_string());
    }
}
