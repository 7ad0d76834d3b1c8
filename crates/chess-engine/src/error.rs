use thiserror::Error;

/// Errors raised by the rules adapter and the move engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    /// The FEN text could not be parsed or describes an impossible position.
    #[error("invalid FEN {fen:?}: {reason}")]
    InvalidFen { fen: String, reason: String },

    /// The requested move is not legal in the current position.
    #[error("illegal move: {0}")]
    IllegalMove(String),
}
