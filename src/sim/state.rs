//! Game state and core simulation types
//!
//! Everything a round needs lives here: tiles, the pending pair, score,
//! countdown regime, timer handles and the session-wide material set and
//! leaderboard.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::material::MaterialSet;
use super::timer::{Scheduler, TimerId};
use crate::leaderboard::Leaderboard;
use crate::tuning::Tuning;

/// Which view is active
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Screen {
    /// Title screen, waiting for `start`
    #[default]
    Home,
    /// A round is running
    Playing,
    /// Round over, showing score and leaderboard
    Result,
}

/// A single flippable tile
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tile {
    /// Position index in the dealt grid
    pub id: usize,
    pub material: &'static str,
    pub contaminant: bool,
    /// Face up for the current pair only
    pub flipped: bool,
    /// Permanently revealed
    pub matched: bool,
}

impl Tile {
    pub fn is_revealed(&self) -> bool {
        self.flipped || self.matched
    }

    pub fn is_selectable(&self) -> bool {
        !self.flipped && !self.matched
    }
}

/// Countdown regime
///
/// The normal regime does not clamp at zero while the rush and the regime
/// that follows it do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Regime {
    #[default]
    Normal,
    Rush,
    AfterRush,
}

impl Regime {
    pub fn clamps_at_zero(&self) -> bool {
        !matches!(self, Regime::Normal)
    }

    pub fn is_rush(&self) -> bool {
        matches!(self, Regime::Rush)
    }
}

/// Where the pair machine is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairPhase {
    Idle,
    OneFlipped,
    Resolving,
}

/// Per-round state, rebuilt every time a round starts
#[derive(Debug, Clone, Default)]
pub struct RoundState {
    /// Flipped-but-unresolved tile ids, oldest first (at most 2)
    pub pending: Vec<usize>,
    pub matches: usize,
    pub score: i32,
    /// Remaining seconds
    pub time_left: i32,
    /// Virtual clock time when the round started
    pub started_at_ms: u64,
    pub regime: Regime,
    /// Rush already rolled in for this round
    pub rush_triggered: bool,
    /// Leaderboard entry written
    pub completed: bool,
    /// Set once the round is over
    pub completion_secs: Option<f64>,
    pub countdown_timer: Option<TimerId>,
    pub rush_timer: Option<TimerId>,
    pub resolve_timer: Option<TimerId>,
}

/// Maximum tiles flipped and awaiting resolution
pub const MAX_PENDING: usize = 2;

impl RoundState {
    pub fn pair_phase(&self) -> PairPhase {
        match self.pending.len() {
            0 => PairPhase::Idle,
            1 => PairPhase::OneFlipped,
            _ => PairPhase::Resolving,
        }
    }
}

/// Notable things that happened during an update, for the presentation layer
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    RoundStarted { tiles: usize, escalation: u32 },
    TileFlipped { id: usize },
    PairMatched { first: usize, second: usize },
    ContaminantPenalty { first: usize, second: usize, penalty: i32 },
    PairMissed { first: usize, second: usize },
    PairHidden { first: usize, second: usize },
    RushStarted,
    RushEnded,
    RoundOver { score: i32, completion_secs: f64 },
}

/// Complete game state (deterministic for a given seed and input sequence)
#[derive(Debug, Clone)]
pub struct GameState {
    pub rng: Pcg32,
    pub tuning: Tuning,
    pub screen: Screen,
    /// Active material set, grows on every "play again"
    pub materials: MaterialSet,
    pub tiles: Vec<Tile>,
    pub round: RoundState,
    pub leaderboard: Leaderboard,
    pub scheduler: Scheduler,
    /// Virtual clock (ms)
    pub now_ms: u64,
    /// Events since the last drain
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Create a new game with default tuning and the given seed
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(Tuning::default(), seed)
    }

    pub fn with_tuning(tuning: Tuning, seed: u64) -> Self {
        Self::with_rng(tuning, Pcg32::seed_from_u64(seed))
    }

    /// Create a new game around an existing random source
    pub fn with_rng(tuning: Tuning, rng: Pcg32) -> Self {
        Self {
            rng,
            tuning,
            screen: Screen::Home,
            materials: MaterialSet::base(),
            tiles: Vec::new(),
            round: RoundState::default(),
            leaderboard: Leaderboard::new(),
            scheduler: Scheduler::new(),
            now_ms: 0,
            events: Vec::new(),
        }
    }

    /// Matches needed to finish the current round
    pub fn pairs_to_clear(&self) -> usize {
        self.materials.pairs_to_clear()
    }

    pub fn is_rush(&self) -> bool {
        self.round.regime.is_rush()
    }

    pub fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take all events recorded since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
