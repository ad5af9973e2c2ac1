// =============================================================================
// Engine facade
//
// The operations a transport shell calls: start a game, make a move, list the
// legal moves of a square, read the state, pause or resume the clocks. Each
// takes the game state the host restored from its store and leaves it ready
// to be stored again. Times come from the system wall clock.
//
// Coordinate system: row 0 = rank 8, col 0 = file a.
// =============================================================================

use serde::Serialize;
use tracing::info;

use crate::board::Board;
use crate::clock::now_millis;
use crate::config::EngineConfig;
use crate::game::{Captured, GameState, MoveOutcome};
use crate::moves::{Destination, MoveRecord};
use crate::piece::Color;
use crate::validator::Validator;

// =============================================================================
// Views
// =============================================================================

/// What a host shows after fetching the state.
#[derive(Clone, Serialize, Debug, PartialEq, Eq)]
pub struct StateView {
    pub board: Board,
    pub current_turn: Color,
    pub white_time: u64,
    pub black_time: u64,
    pub paused: bool,
    pub move_history: Vec<MoveRecord>,
    pub captured_pieces: Captured,
}

/// Reply to a move request: the outcome plus the state after it.
#[derive(Clone, Serialize, Debug, PartialEq, Eq)]
pub struct MoveReply {
    #[serde(flatten)]
    pub outcome: MoveOutcome,
    #[serde(flatten)]
    pub state: StateView,
}

#[derive(Clone, Copy, Serialize, Debug, PartialEq, Eq)]
pub struct PauseView {
    pub paused: bool,
    pub white_time: u64,
    pub black_time: u64,
}

fn view(game: &GameState) -> StateView {
    StateView {
        board: game.board.clone(),
        current_turn: game.current_turn,
        white_time: game.clock.white_time,
        black_time: game.clock.black_time,
        paused: game.clock.paused,
        move_history: game.move_history.clone(),
        captured_pieces: game.captured.clone(),
    }
}

// =============================================================================
// Engine
// =============================================================================

pub struct Engine {
    config: EngineConfig,
    validator: Validator,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        let validator = config.validator();
        Engine { config, validator }
    }

    /// An engine using a caller-supplied validator, e.g. one with a custom
    /// delegate.
    pub fn with_validator(config: EngineConfig, validator: Validator) -> Self {
        Engine { config, validator }
    }

    pub fn new_game(&self) -> GameState {
        info!(
            budget_secs = self.config.time_budget_secs,
            delegate = self.validator.has_delegate(),
            "new game"
        );
        GameState::new(self.config.time_budget_secs, now_millis())
    }

    pub fn make_move(
        &self,
        game: &mut GameState,
        from_row: usize,
        from_col: usize,
        to_row: usize,
        to_col: usize,
    ) -> MoveReply {
        let outcome = game.execute_move(
            &self.validator,
            (from_row, from_col),
            (to_row, to_col),
            now_millis(),
        );
        MoveReply {
            outcome,
            state: view(game),
        }
    }

    pub fn valid_moves(&self, game: &mut GameState, row: usize, col: usize) -> Vec<Destination> {
        game.legal_moves_from(&self.validator, row, col)
    }

    pub fn state(&self, game: &GameState) -> StateView {
        view(game)
    }

    pub fn set_pause(&self, game: &mut GameState, pause: bool) -> PauseView {
        game.set_paused(pause, now_millis());
        info!(paused = pause, "pause changed");
        PauseView {
            paused: game.clock.paused,
            white_time: game.clock.white_time,
            black_time: game.clock.black_time,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_game_uses_configured_budget() {
        let engine = Engine::new(EngineConfig {
            time_budget_secs: 90,
            ..EngineConfig::new()
        });
        let game = engine.new_game();
        let state = engine.state(&game);
        assert_eq!(state.white_time, 90);
        assert_eq!(state.black_time, 90);
        assert_eq!(state.current_turn, Color::White);
        assert!(!state.paused);
        assert!(state.move_history.is_empty());
    }

    #[test]
    fn make_move_reply_carries_state() {
        let engine = Engine::default();
        let mut game = engine.new_game();
        let reply = engine.make_move(&mut game, 6, 3, 4, 3);
        assert!(reply.outcome.success);
        assert_eq!(reply.outcome.message, "d4");
        assert_eq!(reply.state.current_turn, Color::Black);
        assert_eq!(reply.state.move_history.len(), 1);

        let json = serde_json::to_value(&reply).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["message"], "d4");
        assert_eq!(json["current_turn"], "black");
        assert!(json["captured"].is_null());
    }

    #[test]
    fn valid_moves_for_both_sides() {
        let engine = Engine::default();
        let mut game = engine.new_game();
        assert_eq!(engine.valid_moves(&mut game, 6, 0).len(), 2);
        assert!(engine.valid_moves(&mut game, 1, 0).is_empty());
        engine.make_move(&mut game, 6, 0, 4, 0);
        assert_eq!(engine.valid_moves(&mut game, 1, 0).len(), 2);
    }

    #[test]
    fn pause_round_trip() {
        let engine = Engine::default();
        let mut game = engine.new_game();
        let paused = engine.set_pause(&mut game, true);
        assert!(paused.paused);
        assert!(engine.state(&game).paused);
        let resumed = engine.set_pause(&mut game, false);
        assert!(!resumed.paused);
        assert!(resumed.white_time <= 600);
    }
}
