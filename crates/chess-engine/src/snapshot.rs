//! Immutable view of a game for the presentation layer.

use crate::capture::CaptureLists;
use crate::conflict::ConflictMap;
use crate::rules::{Board, Rules};
use chess_core::{Color, Move};
use serde::{Deserialize, Serialize};

/// End-of-game and check status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameFlags {
    pub in_check: bool,
    pub is_checkmate: bool,
    pub is_draw: bool,
    pub is_stalemate: bool,
    pub is_insufficient_material: bool,
    pub is_threefold_repetition: bool,
    pub is_game_over: bool,
}

impl GameFlags {
    pub fn of(rules: &Rules) -> Self {
        GameFlags {
            in_check: rules.in_check(),
            is_checkmate: rules.is_checkmate(),
            is_draw: rules.is_draw(),
            is_stalemate: rules.is_stalemate(),
            is_insufficient_material: rules.is_insufficient_material(),
            is_threefold_repetition: rules.is_threefold_repetition(),
            is_game_over: rules.is_game_over(),
        }
    }
}

/// Everything needed to render a position, computed in one pass.
///
/// Snapshots are values: later moves never change one already built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSnapshot {
    pub board: Board,
    /// Legal moves of the side to move.
    pub moves: Vec<Move>,
    pub conflict: ConflictMap,
    pub turn: Color,
    pub fen: String,
    pub ascii: String,
    pub history: Vec<Move>,
    pub flags: GameFlags,
    pub captured: CaptureLists,
    pub last_move: Option<Move>,
}

impl GameSnapshot {
    pub fn build(rules: &Rules, captured: &CaptureLists) -> Self {
        let history = rules.history().to_vec();
        GameSnapshot {
            board: rules.board(),
            moves: rules.legal_moves(),
            conflict: ConflictMap::build(rules),
            turn: rules.turn(),
            fen: rules.fen(),
            ascii: rules.ascii(),
            last_move: history.last().cloned(),
            history,
            flags: GameFlags::of(rules),
            captured: captured.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_core::MoveRequest;

    #[test]
    fn starting_snapshot() {
        let rules = Rules::new();
        let snapshot = GameSnapshot::build(&rules, &CaptureLists::new());
        assert_eq!(snapshot.moves.len(), 20);
        assert_eq!(snapshot.turn, Color::White);
        assert_eq!(snapshot.fen, crate::STARTING_FEN);
        assert_eq!(snapshot.flags, GameFlags::default());
        assert_eq!(snapshot.conflict.len(), 64);
        assert!(snapshot.history.is_empty());
        assert!(snapshot.last_move.is_none());
    }

    #[test]
    fn snapshot_is_detached_from_later_moves() {
        let mut rules = Rules::new();
        let before = GameSnapshot::build(&rules, &CaptureLists::new());
        rules.apply(MoveRequest::from_uci("e2e4").unwrap()).unwrap();
        let after = GameSnapshot::build(&rules, &CaptureLists::new());

        assert_eq!(before.turn, Color::White);
        assert_eq!(before.moves.len(), 20);
        assert_eq!(after.turn, Color::Black);
        assert_eq!(after.last_move.as_ref().map(|m| m.san.as_str()), Some("e4"));
        assert_ne!(before.fen, after.fen);
    }

    #[test]
    fn json_shape() {
        let snapshot = GameSnapshot::build(&Rules::new(), &CaptureLists::new());
        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["turn"], "w");
        assert_eq!(json["flags"]["isGameOver"], false);
        assert_eq!(json["board"][0][0]["type"], "r");
        assert_eq!(json["board"][0][0]["square"], "a8");
        assert!(json["board"][4][4].is_null());
        assert_eq!(json["conflict"]["e4"]["white"], false);
        assert!(json["lastMove"].is_null());
        assert!(json["captured"]["capturedByWhite"].as_array().unwrap().is_empty());

        let back: GameSnapshot = serde_json::from_value(json).unwrap();
        assert_eq!(back, snapshot);
    }
}
