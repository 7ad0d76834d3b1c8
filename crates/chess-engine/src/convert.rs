//! Translation between the embedded rules library and the vocabulary types.

use chess_core::{Color, Move, MoveFlag, MoveFlags, MoveRequest, Piece, Square};
use shakmaty::san::SanPlus;
use shakmaty::{Chess, Role};

pub(crate) fn square(sq: shakmaty::Square) -> Square {
    // Both enumerate a1..h8 as 0..63.
    Square::new(u32::from(sq) as u8)
}

pub(crate) fn lib_square(sq: Square) -> shakmaty::Square {
    shakmaty::Square::new(u32::from(sq.index()))
}

pub(crate) fn color(color: shakmaty::Color) -> Color {
    match color {
        shakmaty::Color::White => Color::White,
        shakmaty::Color::Black => Color::Black,
    }
}

pub(crate) fn lib_color(color: Color) -> shakmaty::Color {
    match color {
        Color::White => shakmaty::Color::White,
        Color::Black => shakmaty::Color::Black,
    }
}

pub(crate) fn piece(role: Role) -> Piece {
    match role {
        Role::Pawn => Piece::Pawn,
        Role::Knight => Piece::Knight,
        Role::Bishop => Piece::Bishop,
        Role::Rook => Piece::Rook,
        Role::Queen => Piece::Queen,
        Role::King => Piece::King,
    }
}

/// Returns the square the king lands on when castling with the given rook.
fn castle_target(king: Square, rook: Square) -> Square {
    let file = if rook.file() > king.file() { 6 } else { 2 };
    Square::from_coords(file, king.rank()).unwrap_or(king)
}

/// Returns the (from, to, promotion) triple a library move is addressed by.
///
/// Castling is addressed by the king's origin and destination squares.
pub(crate) fn request(m: &shakmaty::Move) -> Option<MoveRequest> {
    match *m {
        shakmaty::Move::Normal {
            from, to, promotion, ..
        } => Some(MoveRequest {
            from: square(from),
            to: square(to),
            promotion: promotion.map(piece),
        }),
        shakmaty::Move::EnPassant { from, to } => Some(MoveRequest::new(square(from), square(to))),
        shakmaty::Move::Castle { king, rook } => {
            let king = square(king);
            Some(MoveRequest::new(king, castle_target(king, square(rook))))
        }
        shakmaty::Move::Put { .. } => None,
    }
}

/// Returns true if `request` names the library move `m`.
///
/// Castling also matches the king-takes-rook form (e1h1 for e1g1).
pub(crate) fn matches(m: &shakmaty::Move, req: &MoveRequest) -> bool {
    if let shakmaty::Move::Castle { king, rook } = *m {
        let king = square(king);
        let rook = square(rook);
        return req.from == king
            && (req.to == castle_target(king, rook) || req.to == rook)
            && req.promotion.is_none();
    }
    request(m).is_some_and(|own| own == *req)
}

/// Describes a legal move of `position` as a vocabulary [`Move`].
pub(crate) fn describe(position: &Chess, m: &shakmaty::Move) -> Option<Move> {
    let addressed = request(m)?;
    let mut flags = MoveFlags::NONE;
    let (moved, captured) = match *m {
        shakmaty::Move::Normal {
            role,
            from,
            capture,
            to,
            promotion,
        } => {
            if capture.is_some() {
                flags.insert(MoveFlag::Capture);
            }
            if promotion.is_some() {
                flags.insert(MoveFlag::Promotion);
            }
            if role == Role::Pawn && square(from).rank().abs_diff(square(to).rank()) == 2 {
                flags.insert(MoveFlag::BigPawn);
            }
            (piece(role), capture.map(piece))
        }
        shakmaty::Move::EnPassant { .. } => {
            flags.insert(MoveFlag::EnPassant);
            (Piece::Pawn, Some(Piece::Pawn))
        }
        shakmaty::Move::Castle { king, rook } => {
            let flag = if square(rook).file() > square(king).file() {
                MoveFlag::KingsideCastle
            } else {
                MoveFlag::QueensideCastle
            };
            flags.insert(flag);
            (Piece::King, None)
        }
        shakmaty::Move::Put { .. } => return None,
    };

    let mut after = position.clone();
    let san = SanPlus::from_move_and_play_unchecked(&mut after, m).to_string();

    Some(Move {
        color: color(shakmaty::Position::turn(position)),
        from: addressed.from,
        to: addressed.to,
        piece: moved,
        captured,
        promotion: addressed.promotion,
        flags,
        san,
    })
}
