//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Virtual clock only (advanced explicitly by the caller)
//! - Seeded RNG only
//! - No rendering or platform dependencies

pub mod material;
pub mod state;
pub mod tick;
pub mod timer;

pub use material::{BASE_MATERIALS, ESCALATION_MATERIALS, MaterialDef, MaterialSet};
pub use state::{GameEvent, GameState, MAX_PENDING, PairPhase, Regime, RoundState, Screen, Tile};
pub use tick::{Intent, advance, apply, reduce};
pub use timer::{Fired, OneShotKind, Scheduler, TimerId};
