//! Rules adapter over the embedded rules library.
//!
//! [`Rules`] owns the live position and the played history. Everything the
//! rest of the kernel knows about chess legality goes through it.

use crate::convert;
use crate::GameError;
use chess_core::{BoardPiece, Color, Move, MoveRequest, Piece, Square};
use shakmaty::fen::Fen;
use shakmaty::{CastlingMode, Chess, EnPassantMode, Position, PositionError};
use std::fmt::Write;
use tracing::debug;

/// Rank-major board grid. Row 0 is the eighth rank, column 0 is the a-file.
pub type Board = [[Option<BoardPiece>; 8]; 8];

/// FEN of the standard starting position.
pub const STARTING_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Live game state with move history and undo.
#[derive(Debug, Clone, Default)]
pub struct Rules {
    position: Chess,
    /// Positions before each played move, oldest first.
    previous: Vec<Chess>,
    history: Vec<Move>,
}

/// Parses FEN text into a position.
///
/// Castling rights without the matching king and rook, and an en passant
/// square no pawn could have passed, are dropped rather than rejected.
pub fn parse_fen(fen: &str) -> Result<Chess, GameError> {
    let invalid = |reason: String| GameError::InvalidFen {
        fen: fen.to_string(),
        reason,
    };
    let parsed: Fen = fen.trim().parse().map_err(|e| invalid(format!("{e}")))?;
    parsed
        .into_position(CastlingMode::Standard)
        .or_else(PositionError::ignore_invalid_castling_rights)
        .or_else(PositionError::ignore_invalid_ep_square)
        .map_err(|e| invalid(format!("{e}")))
}

/// Formats a position as FEN.
pub fn to_fen(position: &Chess) -> String {
    Fen::from_position(position.clone(), EnPassantMode::Legal).to_string()
}

/// Placement, side to move, castling and en passant fields of a FEN.
///
/// Positions with equal keys count as repetitions.
fn repetition_key(position: &Chess) -> String {
    let fen = to_fen(position);
    fen.split_whitespace().take(4).collect::<Vec<_>>().join(" ")
}

impl Rules {
    /// Creates the standard starting position.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a game from FEN.
    pub fn from_fen(fen: &str) -> Result<Self, GameError> {
        Ok(Rules {
            position: parse_fen(fen)?,
            previous: Vec::new(),
            history: Vec::new(),
        })
    }

    /// Replaces the position with the given FEN and clears the history.
    ///
    /// On error the current state is left untouched.
    pub fn load(&mut self, fen: &str) -> Result<(), GameError> {
        let position = parse_fen(fen).inspect_err(|e| debug!(error = %e, "rejected FEN"))?;
        self.position = position;
        self.previous.clear();
        self.history.clear();
        Ok(())
    }

    /// Resets to the standard starting position.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// The live position.
    pub fn position(&self) -> &Chess {
        &self.position
    }

    pub fn turn(&self) -> Color {
        convert::color(self.position.turn())
    }

    /// All legal moves for the side to move.
    pub fn legal_moves(&self) -> Vec<Move> {
        describe_all(&self.position)
    }

    /// Legal moves of the piece standing on `square`.
    ///
    /// Empty if the square is empty or holds a piece of the side not to move.
    pub fn moves_from(&self, square: Square) -> Vec<Move> {
        self.legal_moves()
            .into_iter()
            .filter(|m| m.from == square)
            .collect()
    }

    /// Moves available to `color`, whether or not it is that side's turn.
    ///
    /// For the side not to move, the position is re-read with the turn
    /// swapped and the en passant square cleared. Positions where the swap
    /// is impossible (the side not to move giving check) yield no moves.
    pub fn moves_for(&self, color: Color) -> Vec<Move> {
        if color == self.turn() {
            return self.legal_moves();
        }
        let fen = to_fen(&self.position);
        let mut fields: Vec<&str> = fen.split_whitespace().collect();
        if fields.len() < 4 {
            return Vec::new();
        }
        let side = color.to_char().to_string();
        fields[1] = &side;
        fields[3] = "-";
        match parse_fen(&fields.join(" ")) {
            Ok(swapped) => describe_all(&swapped),
            Err(e) => {
                debug!(%color, error = %e, "no side-swapped position");
                Vec::new()
            }
        }
    }

    /// Returns true if any piece of `by` attacks `square`.
    pub fn is_attacked(&self, square: Square, by: Color) -> bool {
        let board = self.position.board();
        board
            .attacks_to(convert::lib_square(square), convert::lib_color(by), board.occupied())
            .any()
    }

    pub fn piece_at(&self, square: Square) -> Option<(Piece, Color)> {
        self.position
            .board()
            .piece_at(convert::lib_square(square))
            .map(|p| (convert::piece(p.role), convert::color(p.color)))
    }

    /// The board as a rank-major grid, eighth rank first.
    pub fn board(&self) -> Board {
        let mut grid: Board = [[None; 8]; 8];
        for (i, square) in Square::raster().enumerate() {
            grid[i / 8][i % 8] = self.piece_at(square).map(|(piece, color)| BoardPiece {
                square,
                piece,
                color,
            });
        }
        grid
    }

    pub fn fen(&self) -> String {
        to_fen(&self.position)
    }

    /// Text rendering of the board with rank and file labels.
    pub fn ascii(&self) -> String {
        let board = self.board();
        let mut out = String::from("   +------------------------+\n");
        for (row, cells) in board.iter().enumerate() {
            let _ = write!(out, " {} |", 8 - row);
            for cell in cells {
                let c = cell.map_or('.', |p| p.piece.to_fen_char(p.color));
                let _ = write!(out, " {c} ");
            }
            out.push_str("|\n");
        }
        out.push_str("   +------------------------+\n");
        out.push_str("     a  b  c  d  e  f  g  h");
        out
    }

    /// Moves played since the last load or reset, oldest first.
    pub fn history(&self) -> &[Move] {
        &self.history
    }

    /// Plays a legal move.
    ///
    /// A promotion must name its piece; castling may be given as the king's
    /// two-square step or as king-takes-rook.
    pub fn apply(&mut self, request: MoveRequest) -> Result<Move, GameError> {
        let legal = self.position.legal_moves();
        let Some(m) = legal.iter().find(|m| convert::matches(m, &request)) else {
            debug!(%request, fen = %self.fen(), "illegal move");
            return Err(GameError::IllegalMove(request.to_uci()));
        };
        let played = convert::describe(&self.position, m)
            .ok_or_else(|| GameError::IllegalMove(request.to_uci()))?;

        self.previous.push(self.position.clone());
        self.position.play_unchecked(m);
        self.history.push(played.clone());
        Ok(played)
    }

    /// Takes back the last played move.
    pub fn undo(&mut self) -> Option<Move> {
        let position = self.previous.pop()?;
        self.position = position;
        self.history.pop()
    }

    pub fn in_check(&self) -> bool {
        self.position.is_check()
    }

    pub fn is_checkmate(&self) -> bool {
        self.position.is_checkmate()
    }

    pub fn is_stalemate(&self) -> bool {
        self.position.is_stalemate()
    }

    pub fn is_insufficient_material(&self) -> bool {
        self.position.is_insufficient_material()
    }

    /// Returns true if the current position occurred at least three times.
    pub fn is_threefold_repetition(&self) -> bool {
        let key = repetition_key(&self.position);
        let earlier = self
            .previous
            .iter()
            .filter(|p| repetition_key(p) == key)
            .count();
        earlier + 1 >= 3
    }

    /// Returns true once fifty moves passed without a capture or pawn move.
    pub fn is_fifty_moves(&self) -> bool {
        self.position.halfmoves() >= 100
    }

    pub fn is_draw(&self) -> bool {
        self.is_fifty_moves()
            || self.is_stalemate()
            || self.is_insufficient_material()
            || self.is_threefold_repetition()
    }

    pub fn is_game_over(&self) -> bool {
        self.is_checkmate() || self.is_draw()
    }
}

fn describe_all(position: &Chess) -> Vec<Move> {
    position
        .legal_moves()
        .iter()
        .filter_map(|m| convert::describe(position, m))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_core::MoveFlag;

    fn sq(s: &str) -> Square {
        Square::from_algebraic(s).unwrap()
    }

    fn play(rules: &mut Rules, uci: &str) -> Move {
        rules.apply(MoveRequest::from_uci(uci).unwrap()).unwrap()
    }

    #[test]
    fn starting_position() {
        let rules = Rules::new();
        assert_eq!(rules.fen(), STARTING_FEN);
        assert_eq!(rules.turn(), Color::White);
        assert_eq!(rules.legal_moves().len(), 20);
        assert!(rules.history().is_empty());
    }

    #[test]
    fn load_rejects_garbage_and_keeps_state() {
        let mut rules = Rules::new();
        play(&mut rules, "e2e4");
        let before = rules.fen();

        let err = rules.load("not a fen").unwrap_err();
        assert!(matches!(err, GameError::InvalidFen { .. }));
        assert_eq!(rules.fen(), before);
        assert_eq!(rules.history().len(), 1);
    }

    #[test]
    fn load_drops_stale_castling_rights() {
        let mut rules = Rules::new();
        rules
            .load("rnbqkbn1/pppppppr/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1")
            .unwrap();
        let fen = rules.fen();
        let castling = fen.split(' ').nth(2).unwrap();
        assert!(castling.contains('K') && castling.contains('Q'), "{fen}");
        assert!(!castling.contains('k'), "{fen}");
        assert_eq!(rules.legal_moves().len(), 20);
    }

    #[test]
    fn load_drops_impossible_en_passant_square() {
        let mut rules = Rules::new();
        rules
            .load("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq e3 0 1")
            .unwrap();
        assert_eq!(rules.fen(), STARTING_FEN);
    }

    #[test]
    fn load_clears_history() {
        let mut rules = Rules::new();
        play(&mut rules, "e2e4");
        rules.load(STARTING_FEN).unwrap();
        assert!(rules.history().is_empty());
        assert!(rules.undo().is_none());
    }

    #[test]
    fn moves_from_knight() {
        let rules = Rules::new();
        let mut targets: Vec<String> = rules
            .moves_from(sq("g1"))
            .iter()
            .map(|m| m.to.to_algebraic())
            .collect();
        targets.sort();
        assert_eq!(targets, vec!["f3", "h3"]);
        assert!(rules.moves_from(sq("e4")).is_empty());
        assert!(rules.moves_from(sq("g8")).is_empty());
    }

    #[test]
    fn moves_for_side_not_to_move() {
        let rules = Rules::new();
        let black = rules.moves_for(Color::Black);
        assert_eq!(black.len(), 20);
        assert!(black.iter().all(|m| m.color == Color::Black));
    }

    #[test]
    fn moves_for_impossible_swap_is_empty() {
        // White to move in check from the black rook; swapping the turn would
        // leave White in check with Black to move.
        let rules = Rules::from_fen("4k3/8/8/8/8/8/8/r3K3 w - - 0 1").unwrap();
        assert!(rules.in_check());
        assert!(rules.moves_for(Color::Black).is_empty());
    }

    #[test]
    fn big_pawn_and_san() {
        let mut rules = Rules::new();
        let m = play(&mut rules, "e2e4");
        assert_eq!(m.san, "e4");
        assert_eq!(m.piece, Piece::Pawn);
        assert!(m.flags.contains(MoveFlag::BigPawn));
        assert_eq!(rules.turn(), Color::Black);
    }

    #[test]
    fn en_passant_move() {
        let mut rules = Rules::new();
        for uci in ["e2e4", "a7a6", "e4e5", "d7d5"] {
            play(&mut rules, uci);
        }
        let m = play(&mut rules, "e5d6");
        assert!(m.flags.contains(MoveFlag::EnPassant));
        assert_eq!(m.captured, Some(Piece::Pawn));
        assert_eq!(m.san, "exd6");
        assert!(rules.piece_at(sq("d5")).is_none());
    }

    #[test]
    fn castling_both_notations() {
        let fen = "r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1";
        let mut rules = Rules::from_fen(fen).unwrap();
        let m = play(&mut rules, "e1g1");
        assert!(m.flags.contains(MoveFlag::KingsideCastle));
        assert_eq!(m.to, sq("g1"));
        assert_eq!(m.san, "O-O");

        let mut rules = Rules::from_fen(fen).unwrap();
        let m = play(&mut rules, "e1a1");
        assert!(m.flags.contains(MoveFlag::QueensideCastle));
        assert_eq!(m.to, sq("c1"));
        assert_eq!(rules.piece_at(sq("d1")), Some((Piece::Rook, Color::White)));
    }

    #[test]
    fn promotion_requires_piece() {
        let mut rules = Rules::from_fen("8/P7/8/8/8/8/8/k6K w - - 0 1").unwrap();
        let bare = rules.apply(MoveRequest::new(sq("a7"), sq("a8")));
        assert!(matches!(bare, Err(GameError::IllegalMove(_))));

        let m = play(&mut rules, "a7a8n");
        assert_eq!(m.promotion, Some(Piece::Knight));
        assert!(m.flags.contains(MoveFlag::Promotion));
        assert_eq!(rules.piece_at(sq("a8")), Some((Piece::Knight, Color::White)));
    }

    #[test]
    fn undo_restores_position() {
        let mut rules = Rules::new();
        play(&mut rules, "g1f3");
        let undone = rules.undo().unwrap();
        assert_eq!(undone.to_uci(), "g1f3");
        assert_eq!(rules.fen(), STARTING_FEN);
        assert!(rules.undo().is_none());
    }

    #[test]
    fn attacks() {
        let rules = Rules::new();
        assert!(rules.is_attacked(sq("f3"), Color::White));
        assert!(!rules.is_attacked(sq("f3"), Color::Black));
        assert!(rules.is_attacked(sq("f6"), Color::Black));
        assert!(!rules.is_attacked(sq("e4"), Color::White));
    }

    #[test]
    fn board_grid_orientation() {
        let board = Rules::new().board();
        let a8 = board[0][0].unwrap();
        assert_eq!((a8.piece, a8.color, a8.square), (Piece::Rook, Color::Black, sq("a8")));
        let e1 = board[7][4].unwrap();
        assert_eq!((e1.piece, e1.color), (Piece::King, Color::White));
        assert!(board[4][4].is_none());
    }

    #[test]
    fn ascii_layout() {
        let ascii = Rules::new().ascii();
        let lines: Vec<&str> = ascii.lines().collect();
        assert_eq!(lines.len(), 11);
        assert_eq!(lines[1], " 8 | r  n  b  q  k  b  n  r |");
        assert_eq!(lines[5], " 4 | .  .  .  .  .  .  .  . |");
        assert_eq!(lines[10], "     a  b  c  d  e  f  g  h");
    }

    #[test]
    fn fools_mate() {
        let mut rules = Rules::new();
        for uci in ["f2f3", "e7e5", "g2g4"] {
            play(&mut rules, uci);
        }
        let m = play(&mut rules, "d8h4");
        assert_eq!(m.san, "Qh4#");
        assert!(rules.is_checkmate());
        assert!(rules.in_check());
        assert!(rules.is_game_over());
        assert!(!rules.is_draw());
        assert!(rules.legal_moves().is_empty());
    }

    #[test]
    fn stalemate() {
        let rules = Rules::from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").unwrap();
        assert!(rules.is_stalemate());
        assert!(rules.is_draw());
        assert!(rules.is_game_over());
        assert!(!rules.is_checkmate());
    }

    #[test]
    fn threefold_repetition() {
        let mut rules = Rules::new();
        for _ in 0..2 {
            for uci in ["g1f3", "g8f6", "f3g1", "f6g8"] {
                play(&mut rules, uci);
            }
        }
        assert!(rules.is_threefold_repetition());
        assert!(rules.is_draw());
        // Still playable.
        assert_eq!(rules.legal_moves().len(), 20);
    }

    #[test]
    fn fifty_move_rule() {
        let mut rules = Rules::from_fen("8/8/8/8/8/8/8/R3K2k w - - 99 80").unwrap();
        assert!(!rules.is_fifty_moves());
        play(&mut rules, "a1a2");
        assert!(rules.is_fifty_moves());
        assert!(rules.is_draw());
    }

    #[test]
    fn insufficient_material() {
        let rules = Rules::from_fen("8/8/8/8/8/8/8/K6k w - - 0 1").unwrap();
        assert!(rules.is_insufficient_material());
        assert!(rules.is_game_over());
    }
}
