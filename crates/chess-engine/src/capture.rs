//! Captured-piece bookkeeping for both sides.

use chess_core::{Color, Move, MoveFlag, Piece};
use serde::{Deserialize, Serialize};

/// How a piece was taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CaptureKind {
    Capture,
    EnPassant,
}

/// A piece leaving the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CaptureEvent {
    /// Side that made the capture.
    pub color: Color,
    /// Type of the piece taken.
    pub piece: Piece,
    #[serde(rename = "type")]
    pub kind: CaptureKind,
}

impl CaptureEvent {
    /// Returns the capture performed by `m`, if any.
    pub fn from_move(m: &Move) -> Option<Self> {
        let piece = m.captured?;
        let kind = if m.flags.contains(MoveFlag::EnPassant) {
            CaptureKind::EnPassant
        } else {
            CaptureKind::Capture
        };
        Some(CaptureEvent {
            color: m.color,
            piece,
            kind,
        })
    }
}

/// Pieces each side has taken, in capture order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptureLists {
    /// Black pieces taken by White.
    pub captured_by_white: Vec<Piece>,
    /// White pieces taken by Black.
    pub captured_by_black: Vec<Piece>,
}

/// Full army in the order inferred captures are listed.
const FULL_SET: [(Piece, usize); 6] = [
    (Piece::Rook, 2),
    (Piece::Knight, 2),
    (Piece::Bishop, 2),
    (Piece::Queen, 1),
    (Piece::King, 1),
    (Piece::Pawn, 8),
];

impl CaptureLists {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pieces taken by `color`.
    pub fn by(&self, color: Color) -> &[Piece] {
        match color {
            Color::White => &self.captured_by_white,
            Color::Black => &self.captured_by_black,
        }
    }

    fn by_mut(&mut self, color: Color) -> &mut Vec<Piece> {
        match color {
            Color::White => &mut self.captured_by_white,
            Color::Black => &mut self.captured_by_black,
        }
    }

    /// Appends the taken piece to the capturing side's list.
    pub fn record(&mut self, event: &CaptureEvent) {
        self.by_mut(event.color).push(event.piece);
    }

    /// Removes the most recent matching entry, reverting [`record`](Self::record).
    pub fn retract(&mut self, event: &CaptureEvent) {
        let list = self.by_mut(event.color);
        if let Some(i) = list.iter().rposition(|p| *p == event.piece) {
            list.remove(i);
        }
    }

    pub fn len(&self) -> usize {
        self.captured_by_white.len() + self.captured_by_black.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Guesses what has been captured from the pieces missing in a FEN.
    ///
    /// Every piece absent from a full army counts as taken by the other
    /// side. Promotions make this a lower bound, so it is only a best effort
    /// for positions loaded without history.
    pub fn infer_from_fen(fen: &str) -> Self {
        let placement = fen.split_whitespace().next().unwrap_or_default();
        let mut present = [[0usize; 6]; 2];
        for c in placement.chars() {
            if let Some((piece, color)) = Piece::from_fen_char(c) {
                present[color.index()][piece_slot(piece)] += 1;
            }
        }

        let missing = |color: Color| -> Vec<Piece> {
            FULL_SET
                .iter()
                .flat_map(|&(piece, full)| {
                    let left = present[color.index()][piece_slot(piece)];
                    std::iter::repeat(piece).take(full.saturating_sub(left))
                })
                .collect()
        };

        CaptureLists {
            captured_by_white: missing(Color::Black),
            captured_by_black: missing(Color::White),
        }
    }
}

fn piece_slot(piece: Piece) -> usize {
    match piece {
        Piece::Pawn => 0,
        Piece::Knight => 1,
        Piece::Bishop => 2,
        Piece::Rook => 3,
        Piece::Queen => 4,
        Piece::King => 5,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_core::{MoveFlags, Square};

    fn capture_move(color: Color, captured: Piece, flag: MoveFlag) -> Move {
        Move {
            color,
            from: Square::from_algebraic("e5").unwrap(),
            to: Square::from_algebraic("d6").unwrap(),
            piece: Piece::Pawn,
            captured: Some(captured),
            promotion: None,
            flags: MoveFlags::NONE.with(flag),
            san: "exd6".to_string(),
        }
    }

    #[test]
    fn event_from_move() {
        let m = capture_move(Color::White, Piece::Pawn, MoveFlag::EnPassant);
        let event = CaptureEvent::from_move(&m).unwrap();
        assert_eq!(event.color, Color::White);
        assert_eq!(event.piece, Piece::Pawn);
        assert_eq!(event.kind, CaptureKind::EnPassant);

        let quiet = Move {
            captured: None,
            flags: MoveFlags::NONE,
            ..m
        };
        assert!(CaptureEvent::from_move(&quiet).is_none());
    }

    #[test]
    fn record_and_retract() {
        let mut lists = CaptureLists::new();
        let knight = CaptureEvent {
            color: Color::Black,
            piece: Piece::Knight,
            kind: CaptureKind::Capture,
        };
        let pawn = CaptureEvent {
            piece: Piece::Pawn,
            ..knight
        };
        lists.record(&knight);
        lists.record(&pawn);
        assert_eq!(lists.by(Color::Black), &[Piece::Knight, Piece::Pawn]);
        assert!(lists.by(Color::White).is_empty());

        lists.retract(&pawn);
        assert_eq!(lists.by(Color::Black), &[Piece::Knight]);
        assert_eq!(lists.len(), 1);
    }

    #[test]
    fn infer_from_starting_fen_is_empty() {
        let lists = CaptureLists::infer_from_fen(crate::STARTING_FEN);
        assert!(lists.is_empty());
    }

    #[test]
    fn infer_missing_pieces() {
        // White is missing its queen and a pawn; Black is missing a knight.
        let fen = "r1bqkbnr/pppppppp/8/8/8/8/PPPPPPP1/RNB1KBNR w KQkq - 0 5";
        let lists = CaptureLists::infer_from_fen(fen);
        assert_eq!(lists.captured_by_white, vec![Piece::Knight]);
        assert_eq!(lists.captured_by_black, vec![Piece::Queen, Piece::Pawn]);
    }

    #[test]
    fn serialized_shape() {
        let event = CaptureEvent {
            color: Color::White,
            piece: Piece::Pawn,
            kind: CaptureKind::EnPassant,
        };
        let json = serde_json::to_value(event).unwrap();
        assert_eq!(json, serde_json::json!({"color": "w", "piece": "p", "type": "en-passant"}));

        let lists = CaptureLists::infer_from_fen("4k3/8/8/8/8/8/8/4K3 w - - 0 1");
        let json = serde_json::to_value(&lists).unwrap();
        assert_eq!(json["capturedByWhite"].as_array().unwrap().len(), 15);
    }
}
