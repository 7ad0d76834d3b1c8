//! Explorer response types.

use serde::{Deserialize, Serialize};

/// A named opening, as classified by the explorer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Opening {
    /// The ECO code for this opening (e.g., "B20", "C44").
    pub eco: String,
    pub name: String,
}

/// One continuation played from the queried position in master games.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExplorerMove {
    /// The move in UCI notation (e.g., "e2e4"). Castling may use the
    /// king-takes-rook form ("e1h1").
    pub uci: String,
    pub san: String,
    /// Mean rating of the players who chose this move.
    #[serde(default)]
    pub average_rating: Option<u32>,
    #[serde(default)]
    pub white: u64,
    #[serde(default)]
    pub draws: u64,
    #[serde(default)]
    pub black: u64,
}

impl ExplorerMove {
    /// Number of games in which this move was played.
    pub fn games(&self) -> u64 {
        self.white + self.draws + self.black
    }
}

/// Statistics for a position.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ExplorerResponse {
    #[serde(default)]
    pub white: u64,
    #[serde(default)]
    pub draws: u64,
    #[serde(default)]
    pub black: u64,
    #[serde(default)]
    pub moves: Vec<ExplorerMove>,
    #[serde(default)]
    pub opening: Option<Opening>,
}

impl ExplorerResponse {
    /// The continuation chosen by the highest-rated players.
    ///
    /// Moves without a rating are never chosen. The first of equally rated
    /// moves wins.
    pub fn best_continuation(&self) -> Option<&ExplorerMove> {
        let mut best: Option<(&ExplorerMove, u32)> = None;
        for mv in &self.moves {
            let Some(rating) = mv.average_rating else {
                continue;
            };
            if best.map_or(true, |(_, top)| rating > top) {
                best = Some((mv, rating));
            }
        }
        best.map(|(mv, _)| mv)
    }
}
