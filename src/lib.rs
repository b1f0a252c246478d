//! Recycle Rush - a recycling-themed memory matching game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (tiles, pair resolution, countdown, rush)
//! - `leaderboard`: Completed rounds for the session
//! - `tuning`: Data-driven game balance
//! - `ui`: Text presentation of the game state

pub mod leaderboard;
pub mod sim;
pub mod tuning;
pub mod ui;

pub use leaderboard::{Leaderboard, LeaderboardEntry};
pub use sim::{GameState, Intent, Screen};
pub use tuning::{Tuning, TuningError};

/// Driver configuration constants
pub mod consts {
    /// How often the native driver polls for input and advances the clock (ms)
    pub const POLL_MS: u64 = 50;
    /// Maximum clock advance per poll, so a stalled terminal can't skip a round (ms)
    pub const MAX_STEP_MS: u64 = 1000;
}
