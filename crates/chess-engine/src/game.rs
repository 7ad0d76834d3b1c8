//! Move engine: the single owner of live game state.
//!
//! [`Game`] validates and applies moves, keeps the capture lists in step
//! with the played history, and produces [`GameSnapshot`]s on demand.

use crate::capture::{CaptureEvent, CaptureLists};
use crate::conflict::ConflictMap;
use crate::rules::Rules;
use crate::snapshot::GameSnapshot;
use crate::GameError;
use chess_core::{Color, Move, MoveRequest, Piece, Square};
use tracing::debug;

/// A game in progress.
#[derive(Debug, Clone, Default)]
pub struct Game {
    rules: Rules,
    captured: CaptureLists,
}

impl Game {
    /// Creates a new game with the standard starting position.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a game from FEN, inferring captures from missing pieces.
    pub fn from_fen(fen: &str) -> Result<Self, GameError> {
        let mut game = Game::new();
        game.load(fen)?;
        Ok(game)
    }

    /// Loads a position and returns the inferred capture lists.
    ///
    /// On error nothing changes.
    pub fn load(&mut self, fen: &str) -> Result<CaptureLists, GameError> {
        self.rules.load(fen)?;
        self.captured = CaptureLists::infer_from_fen(fen);
        debug!(fen, captured = self.captured.len(), "position loaded");
        Ok(self.captured.clone())
    }

    /// Back to the starting position with empty capture lists.
    pub fn reset(&mut self) {
        self.rules.reset();
        self.captured = CaptureLists::new();
    }

    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    pub fn captured(&self) -> &CaptureLists {
        &self.captured
    }

    pub fn turn(&self) -> Color {
        self.rules.turn()
    }

    pub fn fen(&self) -> String {
        self.rules.fen()
    }

    pub fn history(&self) -> &[Move] {
        self.rules.history()
    }

    pub fn is_game_over(&self) -> bool {
        self.rules.is_game_over()
    }

    pub fn legal_moves(&self) -> Vec<Move> {
        self.rules.legal_moves()
    }

    /// Legal moves of the piece on `square`, for move hints.
    pub fn moves_from(&self, square: Square) -> Vec<Move> {
        self.rules.moves_from(square)
    }

    /// Moves of `color` regardless of whose turn it is.
    pub fn moves_for(&self, color: Color) -> Vec<Move> {
        self.rules.moves_for(color)
    }

    pub fn conflict_map(&self) -> ConflictMap {
        ConflictMap::build(&self.rules)
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot::build(&self.rules, &self.captured)
    }

    /// Validates and plays a move, returning the capture it made.
    ///
    /// A pawn reaching its last rank always promotes to a queen, whatever
    /// piece the request names.
    pub fn make_move(&mut self, request: MoveRequest) -> Result<Option<CaptureEvent>, GameError> {
        self.play(request).map(|(_, capture)| capture)
    }

    /// Like [`make_move`](Self::make_move), also returning the played move.
    pub fn play(&mut self, request: MoveRequest) -> Result<(Move, Option<CaptureEvent>), GameError> {
        let request = self.with_auto_promotion(request);
        let played = self.rules.apply(request)?;

        let capture = CaptureEvent::from_move(&played);
        if let Some(event) = &capture {
            self.captured.record(event);
        }
        debug!(san = %played.san, color = %played.color, capture = ?capture, "move played");
        Ok((played, capture))
    }

    /// Takes back the last move and its capture.
    pub fn undo(&mut self) -> Option<Move> {
        let undone = self.rules.undo()?;
        if let Some(event) = CaptureEvent::from_move(&undone) {
            self.captured.retract(&event);
        }
        Some(undone)
    }

    fn with_auto_promotion(&self, mut request: MoveRequest) -> MoveRequest {
        if let Some((Piece::Pawn, color)) = self.rules.piece_at(request.from) {
            if request.to.rank() == color.promotion_rank() {
                request.promotion = Some(Piece::Queen);
            }
        }
        request
    }
}
