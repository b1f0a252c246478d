//! Intent handling and timer-driven simulation
//!
//! `apply` is the reducer for user intents; `advance` moves the virtual
//! clock and fires whatever timers came due. Both leave the state
//! consistent with the round lifecycle: timers are only live while the
//! screen is `Playing`.

use rand::Rng;
use rand::seq::SliceRandom;

use super::state::{GameEvent, GameState, MAX_PENDING, Regime, RoundState, Screen, Tile};
use super::timer::{Fired, OneShotKind};

/// User intents emitted by the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    /// Leave the home screen and start the first round
    Start,
    /// Flip the tile at this position
    Flip(usize),
    /// From the result screen: escalate the material set and play again
    PlayAgain,
}

/// Apply a user intent. Intents that make no sense for the current screen
/// or tile are ignored.
pub fn apply(state: &mut GameState, intent: Intent) {
    match (intent, state.screen) {
        (Intent::Start, Screen::Home) => enter_playing(state),
        (Intent::Flip(id), Screen::Playing) => flip(state, id),
        (Intent::PlayAgain, Screen::Result) => {
            state.materials.escalate();
            enter_playing(state);
        }
        (intent, screen) => log::debug!("Ignored {:?} on {:?} screen", intent, screen),
    }
}

/// Consuming form of [`apply`]: `(state, intent) -> state'`
pub fn reduce(mut state: GameState, intent: Intent) -> GameState {
    apply(&mut state, intent);
    state
}

/// Advance the virtual clock by `dt_ms`, firing due timers in order
pub fn advance(state: &mut GameState, dt_ms: u64) {
    let until = state.now_ms.saturating_add(dt_ms);
    while let Some((at, fired)) = state.scheduler.pop_due(until) {
        state.now_ms = at;
        match fired {
            Fired::Periodic(id) if state.round.countdown_timer == Some(id) => countdown_tick(state),
            Fired::Periodic(id) => log::warn!("Stray periodic timer {:?} fired", id),
            Fired::OneShot(id, OneShotKind::RushExpiry) => {
                if state.round.rush_timer == Some(id) {
                    end_rush(state);
                }
            }
            Fired::OneShot(id, OneShotKind::ResolvePair) => {
                if state.round.resolve_timer == Some(id) {
                    hide_pending(state);
                }
            }
        }
    }
    state.now_ms = until;
}

fn enter_playing(state: &mut GameState) {
    state.screen = Screen::Playing;
    begin_round(state);
    maybe_trigger_rush(state);
}

/// Deal a fresh shuffled grid and reset the round
fn begin_round(state: &mut GameState) {
    state.scheduler.cancel_all();

    let mut defs = state.materials.defs().to_vec();
    defs.shuffle(&mut state.rng);
    state.tiles = defs
        .into_iter()
        .enumerate()
        .map(|(id, def)| Tile {
            id,
            material: def.name,
            contaminant: def.contaminant,
            flipped: false,
            matched: false,
        })
        .collect();

    state.round = RoundState {
        time_left: state.tuning.round_secs,
        started_at_ms: state.now_ms,
        ..Default::default()
    };
    let timer = state
        .scheduler
        .start_periodic(state.now_ms, state.tuning.tick_ms);
    state.round.countdown_timer = Some(timer);

    log::info!(
        "Round started: {} tiles, {} pairs to clear, {}s on the clock",
        state.tiles.len(),
        state.pairs_to_clear(),
        state.round.time_left
    );
    state.emit(GameEvent::RoundStarted {
        tiles: state.tiles.len(),
        escalation: state.materials.escalations(),
    });
}

/// Roll once per round for a rush
fn maybe_trigger_rush(state: &mut GameState) {
    if state.round.rush_triggered {
        return;
    }
    let roll: f64 = state.rng.random();
    if roll >= state.tuning.rush_chance || state.round.regime.is_rush() {
        return;
    }

    state.round.regime = Regime::Rush;
    state.round.rush_triggered = true;
    let timer = state
        .scheduler
        .start_periodic(state.now_ms, state.tuning.rush_tick_ms);
    state.round.countdown_timer = Some(timer);
    let expiry = state.scheduler.schedule_once(
        state.now_ms,
        state.tuning.rush_duration_ms,
        OneShotKind::RushExpiry,
    );
    state.round.rush_timer = Some(expiry);

    log::info!("Recycling rush! ({}ms)", state.tuning.rush_duration_ms);
    state.emit(GameEvent::RushStarted);
}

fn end_rush(state: &mut GameState) {
    state.round.regime = Regime::AfterRush;
    state.round.rush_timer = None;
    let timer = state
        .scheduler
        .start_periodic(state.now_ms, state.tuning.tick_ms);
    state.round.countdown_timer = Some(timer);

    log::info!("Rush over, {}s left", state.round.time_left);
    state.emit(GameEvent::RushEnded);
}

fn countdown_tick(state: &mut GameState) {
    let round = &mut state.round;
    let decrement = if round.regime.is_rush() {
        state.tuning.rush_decrement
    } else {
        state.tuning.tick_decrement
    };
    round.time_left -= decrement;
    if round.regime.clamps_at_zero() {
        round.time_left = round.time_left.max(0);
    }

    if state.round.time_left <= 0 {
        log::debug!("Out of time");
        end_round(state);
    }
}

fn flip(state: &mut GameState, id: usize) {
    if state.round.pending.len() >= MAX_PENDING {
        log::debug!("Flip {} ignored: pair still resolving", id);
        return;
    }
    // Snapshot before the flip is applied; the pair is judged on these.
    let Some(target) = state.tiles.get(id).copied() else {
        log::debug!("Flip {} ignored: no such tile", id);
        return;
    };
    if !target.is_selectable() {
        log::debug!("Flip {} ignored: already face up", id);
        return;
    }
    let previous = state
        .round
        .pending
        .first()
        .and_then(|&first| state.tiles.get(first))
        .copied();

    state.tiles[id].flipped = true;
    state.round.pending.push(id);
    log::debug!("Flipped tile {} ({})", id, target.material);
    state.emit(GameEvent::TileFlipped { id });

    if let Some(first) = previous {
        evaluate_pair(state, first, target);
    }
}

/// Score the pair and schedule it to be hidden
fn evaluate_pair(state: &mut GameState, first: Tile, second: Tile) {
    let (a, b) = (first.id, second.id);

    if first.material == second.material && !first.contaminant && !second.contaminant {
        state.tiles[a].matched = true;
        state.tiles[b].matched = true;
        state.round.matches += 1;
        state.round.score += state.tuning.match_points;
        log::debug!("Matched {} ({} / {})", first.material, state.round.matches, state.pairs_to_clear());
        state.emit(GameEvent::PairMatched { first: a, second: b });
    } else if first.contaminant || second.contaminant {
        let penalty = state.tuning.contaminant_penalty;
        state.round.score -= penalty;
        log::debug!("Contaminant in pair {}/{}: -{}", a, b, penalty);
        state.emit(GameEvent::ContaminantPenalty {
            first: a,
            second: b,
            penalty,
        });
    } else {
        state.emit(GameEvent::PairMissed { first: a, second: b });
    }

    let timer = state.scheduler.schedule_once(
        state.now_ms,
        state.tuning.resolve_delay_ms,
        OneShotKind::ResolvePair,
    );
    state.round.resolve_timer = Some(timer);

    if state.round.matches == state.pairs_to_clear() {
        log::debug!("All pairs cleared");
        end_round(state);
    }
}

/// Turn the pending pair face down (matched tiles stay revealed)
fn hide_pending(state: &mut GameState) {
    state.round.resolve_timer = None;
    let pending = std::mem::take(&mut state.round.pending);
    for &id in &pending {
        if let Some(tile) = state.tiles.get_mut(id) {
            if !tile.matched {
                tile.flipped = false;
            }
        }
    }
    if let [first, second] = pending[..] {
        state.emit(GameEvent::PairHidden { first, second });
    }
}

fn end_round(state: &mut GameState) {
    state.scheduler.cancel_all();
    state.round.countdown_timer = None;
    state.round.rush_timer = None;
    state.round.resolve_timer = None;

    let completion_secs = state.now_ms.saturating_sub(state.round.started_at_ms) as f64 / 1000.0;
    state.round.completion_secs = Some(completion_secs);

    if !state.round.completed {
        state.leaderboard.record(state.round.score, completion_secs);
        state.round.completed = true;
    }

    state.screen = Screen::Result;
    log::info!(
        "Round over: {} points, {} matches in {:.2}s",
        state.round.score,
        state.round.matches,
        completion_secs
    );
    state.emit(GameEvent::RoundOver {
        score: state.round.score,
        completion_secs,
    });
}
