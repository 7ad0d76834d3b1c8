//! Core vocabulary for the chess kernel.
//!
//! This crate provides the value types shared between the engine kernel and
//! whatever hosts it (UI, network layer, bots):
//! - [`Color`] and [`Piece`] for piece representation
//! - [`Square`] for board coordinates
//! - [`Move`], [`MoveFlags`] and [`MoveRequest`] for moves
//! - [`BoardPiece`] for board rendering
//!
//! Every type serializes to the compact notation the front-end expects:
//! colors as `"w"`/`"b"`, pieces as `"p"`..`"k"`, squares as `"e4"`.

mod color;
mod mov;
mod piece;
mod square;

pub use color::Color;
pub use mov::{Move, MoveFlag, MoveFlags, MoveRequest, ParseMoveError};
pub use piece::{BoardPiece, Piece};
pub use square::{ParseSquareError, Square};
