//! Static material evaluation.

use crate::convert;
use chess_core::{Color, Piece};
use shakmaty::{Board, Square};

/// Material value of a piece type.
pub const fn piece_value(piece: Piece) -> i32 {
    match piece {
        Piece::Pawn => 10,
        Piece::Knight => 30,
        Piece::Bishop => 30,
        Piece::Rook => 50,
        Piece::Queen => 90,
        Piece::King => 900,
    }
}

/// Material balance, positive when White is ahead.
pub fn evaluate(board: &Board) -> i32 {
    (0..64u32)
        .filter_map(|i| board.piece_at(Square::new(i)))
        .map(|p| {
            let value = piece_value(convert::piece(p.role));
            match convert::color(p.color) {
                Color::White => value,
                Color::Black => -value,
            }
        })
        .sum()
}

/// Material balance from `color`'s point of view.
pub fn evaluate_for(board: &Board, color: Color) -> i32 {
    match color {
        Color::White => evaluate(board),
        Color::Black => -evaluate(board),
    }
}
