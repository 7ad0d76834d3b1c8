//! Game engine kernel.
//!
//! This crate provides:
//! - [`Rules`] - adapter over the embedded rules library (legality, FEN, SAN,
//!   end-of-game detection, history and undo)
//! - [`ConflictMap`] - which side attacks each square
//! - [`CaptureLists`] - captured pieces per side, tracked or inferred from FEN
//! - [`GameSnapshot`] - everything the presentation layer renders, in one value
//! - [`Game`] - the move engine owning the live state
//! - [`eval`] and [`search`] - material evaluation and move selection
//!
//! # Example
//!
//! ```
//! use chess_core::MoveRequest;
//! use chess_engine::Game;
//!
//! let mut game = Game::new();
//! game.make_move(MoveRequest::from_uci("e2e4").unwrap()).unwrap();
//! game.make_move(MoveRequest::from_uci("d7d5").unwrap()).unwrap();
//! let capture = game.make_move(MoveRequest::from_uci("e4d5").unwrap()).unwrap();
//! assert!(capture.is_some());
//!
//! let snapshot = game.snapshot();
//! println!("{}", snapshot.ascii);
//! ```

mod capture;
mod conflict;
mod convert;
mod error;
pub mod eval;
mod game;
mod rules;
pub mod search;
mod snapshot;

pub use capture::{CaptureEvent, CaptureKind, CaptureLists};
pub use conflict::{surrounding_squares, Conflict, ConflictMap};
pub use error::GameError;
pub use eval::{evaluate, evaluate_for, piece_value};
pub use game::Game;
pub use rules::{parse_fen, to_fen, Board, Rules, STARTING_FEN};
pub use search::Strategy;
pub use snapshot::{GameFlags, GameSnapshot};

pub use shakmaty::Chess;
