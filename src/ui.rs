//! Text presentation layer
//!
//! Stateless: every function maps game state (or a line of input) to
//! output without touching the simulation.

use crate::sim::{GameEvent, GameState, Intent, Screen, Tile};

/// Tiles per grid row
pub const GRID_COLUMNS: usize = 4;
/// Width of a tile label
const CELL_WIDTH: usize = 16;
const HIDDEN_LABEL: &str = "?";

/// A parsed line of player input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Intent(Intent),
    Help,
    Quit,
}

/// Parse a line of input. Accepts `start`, `flip <n>` or a bare `<n>`,
/// `again`, `help` and `quit`.
pub fn parse_command(line: &str) -> Option<Command> {
    let mut words = line.split_whitespace();
    let head = words.next()?.to_lowercase();
    let command = match head.as_str() {
        "start" | "s" => Command::Intent(Intent::Start),
        "again" | "a" | "more" => Command::Intent(Intent::PlayAgain),
        "flip" | "f" => Command::Intent(Intent::Flip(words.next()?.parse().ok()?)),
        "help" | "h" | "?" => Command::Help,
        "quit" | "q" | "exit" => Command::Quit,
        other => Command::Intent(Intent::Flip(other.parse().ok()?)),
    };
    if words.next().is_some() {
        return None;
    }
    Some(command)
}

pub fn help_text() -> &'static str {
    "Commands: start | flip <n> (or just <n>) | again | help | quit"
}

/// Label shown on a tile
pub fn tile_label(tile: &Tile) -> String {
    if !tile.is_revealed() {
        HIDDEN_LABEL.to_string()
    } else if tile.contaminant {
        format!("{}!", tile.material)
    } else {
        tile.material.to_string()
    }
}

/// One-line notice for an event, if it is worth telling the player about
pub fn event_message(event: &GameEvent) -> Option<String> {
    match event {
        GameEvent::PairMatched { .. } => Some("Matched! Into the recycling bin.".to_string()),
        GameEvent::ContaminantPenalty { penalty, .. } => {
            Some(format!("Contaminated! -{} points.", penalty))
        }
        GameEvent::PairMissed { .. } => Some("No match.".to_string()),
        GameEvent::RushStarted => Some("Recycling rush! The truck is leaving early.".to_string()),
        GameEvent::RushEnded => Some("Rush over.".to_string()),
        GameEvent::RoundOver {
            score,
            completion_secs,
        } => Some(format!(
            "Round over: {} points in {:.2} seconds.",
            score, completion_secs
        )),
        GameEvent::RoundStarted { .. } | GameEvent::TileFlipped { .. } | GameEvent::PairHidden { .. } => None,
    }
}

/// Render the active screen
pub fn render(state: &GameState) -> String {
    match state.screen {
        Screen::Home => render_home(),
        Screen::Playing => render_playing(state),
        Screen::Result => render_result(state),
    }
}

fn render_home() -> String {
    format!(
        "Welcome to the Recycling Challenge\n\nType `start` to start recycling.\n{}\n",
        help_text()
    )
}

fn render_playing(state: &GameState) -> String {
    let mut out = format!("Garbage Truck Time Limit: {}s", state.round.time_left);
    if state.is_rush() {
        out.push_str("  ** RECYCLING RUSH **");
    }
    out.push_str("\n\n");
    out.push_str(&render_grid(&state.tiles));
    out.push_str(&format!(
        "\nPoints: {}   Matches: {}/{}\n",
        state.round.score,
        state.round.matches,
        state.pairs_to_clear()
    ));
    out
}

/// Tiles laid out in rows of [`GRID_COLUMNS`]
pub fn render_grid(tiles: &[Tile]) -> String {
    let mut out = String::new();
    for row in tiles.chunks(GRID_COLUMNS) {
        let cells: Vec<String> = row
            .iter()
            .map(|t| format!("{:>2} [{:<width$}]", t.id, tile_label(t), width = CELL_WIDTH))
            .collect();
        out.push_str(cells.join(" ").trim_end());
        out.push('\n');
    }
    out
}

fn render_result(state: &GameState) -> String {
    let mut out = format!("Recycling Points: {}\n", state.round.score);
    if let Some(best) = state.leaderboard.best_score() {
        out.push_str(&format!("Best so far: {}\n", best));
    }
    out.push_str("\nType `again` to recycle more.\n\nLeaderboard\n");
    out.push_str(&render_leaderboard(state));
    out
}

pub fn render_leaderboard(state: &GameState) -> String {
    state
        .leaderboard
        .entries()
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            format!(
                "Game {}: {} points in {:.2} seconds\n",
                index + 1,
                entry.score,
                entry.completion_secs
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{advance, apply};
    use crate::tuning::Tuning;

    fn calm_state() -> GameState {
        GameState::with_tuning(
            Tuning {
                rush_chance: 0.0,
                ..Default::default()
            },
            5,
        )
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(parse_command("start"), Some(Command::Intent(Intent::Start)));
        assert_eq!(parse_command("  FLIP 3 "), Some(Command::Intent(Intent::Flip(3))));
        assert_eq!(parse_command("7"), Some(Command::Intent(Intent::Flip(7))));
        assert_eq!(parse_command("again"), Some(Command::Intent(Intent::PlayAgain)));
        assert_eq!(parse_command("q"), Some(Command::Quit));
        assert_eq!(parse_command("help"), Some(Command::Help));
        assert_eq!(parse_command(""), None);
        assert_eq!(parse_command("flip"), None);
        assert_eq!(parse_command("flip x"), None);
        assert_eq!(parse_command("flip 1 2"), None);
        assert_eq!(parse_command("dance"), None);
        assert_eq!(parse_command("-1"), None);
    }

    #[test]
    fn test_event_messages() {
        let penalty = GameEvent::ContaminantPenalty {
            first: 0,
            second: 1,
            penalty: 5,
        };
        assert_eq!(event_message(&penalty).as_deref(), Some("Contaminated! -5 points."));
        assert_eq!(event_message(&GameEvent::TileFlipped { id: 2 }), None);
        let over = GameEvent::RoundOver {
            score: 35,
            completion_secs: 4.0,
        };
        assert_eq!(event_message(&over).as_deref(), Some("Round over: 35 points in 4.00 seconds."));
    }

    #[test]
    fn test_home_screen() {
        let state = calm_state();
        assert!(render(&state).starts_with("Welcome to the Recycling Challenge"));
    }

    #[test]
    fn test_playing_screen_hides_unflipped_tiles() {
        let mut state = calm_state();
        apply(&mut state, Intent::Start);
        apply(&mut state, Intent::Flip(0));

        let text = render(&state);
        assert!(text.starts_with("Garbage Truck Time Limit: 60s"));
        assert!(!text.contains("RUSH"));
        assert!(text.contains(&tile_label(&state.tiles[0])));
        assert_eq!(text.matches("[?").count(), 9);
        assert!(text.contains("Points: 0"));
        assert_eq!(render_grid(&state.tiles).lines().count(), 3);
    }

    #[test]
    fn test_contaminant_label() {
        let tile = Tile {
            id: 0,
            material: "Styrofoam",
            contaminant: true,
            flipped: true,
            matched: false,
        };
        assert_eq!(tile_label(&tile), "Styrofoam!");
        let hidden = Tile {
            flipped: false,
            ..tile
        };
        assert_eq!(tile_label(&hidden), "?");
    }

    #[test]
    fn test_result_screen_lists_leaderboard() {
        let mut state = calm_state();
        apply(&mut state, Intent::Start);
        advance(&mut state, 60_000);
        apply(&mut state, Intent::PlayAgain);
        advance(&mut state, 60_000);

        let text = render(&state);
        assert!(text.starts_with("Recycling Points: 0"));
        assert!(text.contains("Game 1: 0 points in 60.00 seconds"));
        assert!(text.contains("Game 2: 0 points in 60.00 seconds"));
        assert!(text.contains("Best so far: 0"));
    }
}
