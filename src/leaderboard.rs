//! Session leaderboard
//!
//! One entry per completed round, in completion order. Lives only as long
//! as the process; nothing is written to disk.

/// A single completed round
#[derive(Debug, Clone, PartialEq)]
pub struct LeaderboardEntry {
    /// Final score (may be negative)
    pub score: i32,
    /// Seconds from round start to round end
    pub completion_secs: f64,
}

/// Append-only record of completed rounds
#[derive(Debug, Clone, Default)]
pub struct Leaderboard {
    entries: Vec<LeaderboardEntry>,
}

impl Leaderboard {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Append a finished round. Returns its 1-indexed game number.
    pub fn record(&mut self, score: i32, completion_secs: f64) -> usize {
        self.entries.push(LeaderboardEntry {
            score,
            completion_secs,
        });
        log::info!(
            "Game {} recorded: {} points in {:.2}s",
            self.entries.len(),
            score,
            completion_secs
        );
        self.entries.len()
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

    /// Highest score so far (if any)
    pub fn best_score(&self) -> Option<i32> {
        self.entries.iter().map(|e| e.score).max()
    }
}
