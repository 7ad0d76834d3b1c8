//! Opening book lookups.
//!
//! This crate asks a masters-games explorer which continuations strong
//! players chose in a position and picks the one played by the
//! highest-rated players. The book is best effort: it switches itself off
//! after the first failure.

pub mod book;
pub mod opening;

pub use book::{OpeningBook, DEFAULT_ENDPOINT};
pub use opening::{ExplorerMove, ExplorerResponse, Opening};

use thiserror::Error;

/// Errors that can occur when consulting the book.
#[derive(Debug, Error)]
pub enum BookError {
    /// Request failed, timed out, returned an error status or bad JSON.
    #[error("opening book request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The explorer knows no rated continuation for the position.
    #[error("no book move for this position")]
    Empty,

    /// An earlier failure switched the book off.
    #[error("opening book is disabled")]
    Disabled,
}
