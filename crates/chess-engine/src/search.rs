//! Move selection strategies: random, greedy one-ply and minimax.
//!
//! All strategies work on a cloned position and never touch live game
//! state. Scores come from [`evaluate_for`] from the perspective of the side
//! to move at the root.

use crate::convert;
use crate::eval::evaluate_for;
use chess_core::{Color, MoveRequest};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use shakmaty::{Chess, Move, Position};
use tracing::trace;

/// Default minimax depth in plies.
pub const DEFAULT_DEPTH: u32 = 2;

/// Score of a mated side, beyond any material balance.
pub const MATE_SCORE: i32 = 9_999;

/// How a computer player picks its move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "kind")]
pub enum Strategy {
    /// Uniformly random legal move.
    Random,
    /// Best material after one ply; random unless that move captures.
    Greedy,
    /// Fixed-depth alpha-beta search.
    Minimax { depth: u32 },
}

impl Default for Strategy {
    fn default() -> Self {
        Strategy::Minimax {
            depth: DEFAULT_DEPTH,
        }
    }
}

impl Strategy {
    /// Picks a move for the side to move, or `None` if there is none.
    pub fn select<R: Rng + ?Sized>(self, position: &Chess, rng: &mut R) -> Option<MoveRequest> {
        let chosen = match self {
            Strategy::Random => random_move(position, rng),
            Strategy::Greedy => greedy_move(position, rng),
            Strategy::Minimax { depth } => minimax_root(position, depth),
        }?;
        convert::request(&chosen)
    }
}

/// Picks a uniformly random legal move.
pub fn random_move<R: Rng + ?Sized>(position: &Chess, rng: &mut R) -> Option<Move> {
    position.legal_moves().choose(rng).cloned()
}

/// Picks the move with the best material balance one ply ahead.
///
/// The first move with the top score wins ties. If that move is not a
/// capture every move looks alike, so a random move is played instead.
pub fn greedy_move<R: Rng + ?Sized>(position: &Chess, rng: &mut R) -> Option<Move> {
    let perspective = convert::color(position.turn());
    let legal = position.legal_moves();

    let mut best: Option<(i32, &Move)> = None;
    for m in &legal {
        let mut child = position.clone();
        child.play_unchecked(m);
        let value = evaluate_for(child.board(), perspective);
        if best.map_or(true, |(top, _)| value > top) {
            best = Some((value, m));
        }
    }

    match best {
        Some((_, m)) if m.is_capture() => Some(m.clone()),
        _ => random_move(position, rng),
    }
}

/// Alpha-beta minimax returning a score from `perspective`'s point of view.
///
/// `maximizing` is true at nodes where `perspective` is to move. A side
/// without moves scores [`MATE_SCORE`] against itself when in check and zero
/// when stalemated.
pub fn minimax(
    position: &Chess,
    depth: u32,
    alpha: i32,
    beta: i32,
    maximizing: bool,
    perspective: Color,
) -> i32 {
    let mut searcher = Searcher::new(perspective);
    searcher.minimax(position, depth, alpha, beta, maximizing)
}

/// Searches every root move to `depth` plies and returns the best one.
///
/// Depths below one are raised to one. Among equal scores the last root
/// move wins.
pub fn minimax_root(position: &Chess, depth: u32) -> Option<Move> {
    let depth = depth.max(1);
    let mut searcher = Searcher::new(convert::color(position.turn()));
    let legal = position.legal_moves();

    let mut best: Option<(i32, &Move)> = None;
    for m in &legal {
        let mut child = position.clone();
        child.play_unchecked(m);
        let value = searcher.minimax(&child, depth - 1, -MATE_SCORE - 1, MATE_SCORE + 1, false);
        if best.map_or(true, |(top, _)| value >= top) {
            best = Some((value, m));
        }
    }

    if let Some((score, m)) = best {
        trace!(depth, score, nodes = searcher.nodes, best = ?m, "minimax finished");
    }
    best.map(|(_, m)| m.clone())
}

/// Search state.
struct Searcher {
    perspective: Color,
    nodes: u64,
}

impl Searcher {
    fn new(perspective: Color) -> Self {
        Searcher {
            perspective,
            nodes: 0,
        }
    }

    fn minimax(
        &mut self,
        position: &Chess,
        depth: u32,
        mut alpha: i32,
        mut beta: i32,
        maximizing: bool,
    ) -> i32 {
        self.nodes += 1;

        if depth == 0 {
            return evaluate_for(position.board(), self.perspective);
        }

        let legal = position.legal_moves();
        if legal.is_empty() {
            return match (position.is_check(), maximizing) {
                (true, true) => -MATE_SCORE,
                (true, false) => MATE_SCORE,
                (false, _) => 0,
            };
        }

        if maximizing {
            let mut best = i32::MIN;
            for m in &legal {
                let mut child = position.clone();
                child.play_unchecked(m);
                best = best.max(self.minimax(&child, depth - 1, alpha, beta, false));
                alpha = alpha.max(best);
                if beta <= alpha {
                    break;
                }
            }
            best
        } else {
            let mut best = i32::MAX;
            for m in &legal {
                let mut child = position.clone();
                child.play_unchecked(m);
                best = best.min(self.minimax(&child, depth - 1, alpha, beta, true));
                beta = beta.min(best);
                if beta <= alpha {
                    break;
                }
            }
            best
        }
    }
}
