//! Per-square attack coverage for both sides.

use crate::Rules;
use chess_core::{Color, Square};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Which sides attack a square.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Conflict {
    pub white: bool,
    pub black: bool,
}

impl Conflict {
    #[inline]
    pub const fn attacked_by(self, color: Color) -> bool {
        match color {
            Color::White => self.white,
            Color::Black => self.black,
        }
    }

    /// Both sides attack the square.
    #[inline]
    pub const fn is_contested(self) -> bool {
        self.white && self.black
    }
}

/// Attack coverage of all 64 squares.
///
/// Recomputed from scratch after every position change; it holds no state
/// of its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConflictMap(BTreeMap<Square, Conflict>);

impl ConflictMap {
    /// Computes the map for the current position of `rules`.
    pub fn build(rules: &Rules) -> Self {
        ConflictMap(
            Square::raster()
                .map(|square| {
                    let conflict = Conflict {
                        white: rules.is_attacked(square, Color::White),
                        black: rules.is_attacked(square, Color::Black),
                    };
                    (square, conflict)
                })
                .collect(),
        )
    }

    pub fn get(&self, square: Square) -> Conflict {
        self.0.get(&square).copied().unwrap_or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Square, Conflict)> + '_ {
        self.0.iter().map(|(square, conflict)| (*square, *conflict))
    }

    /// Squares attacked by `color`, a1 first.
    pub fn attacked_by(&self, color: Color) -> impl Iterator<Item = Square> + '_ {
        self.iter()
            .filter(move |(_, c)| c.attacked_by(color))
            .map(|(square, _)| square)
    }

    /// Squares attacked by both sides, a1 first.
    pub fn contested(&self) -> impl Iterator<Item = Square> + '_ {
        self.iter()
            .filter(|(_, c)| c.is_contested())
            .map(|(square, _)| square)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// The up to eight squares adjacent to `square`.
///
/// Used to highlight the neighbourhood of a king.
pub fn surrounding_squares(square: Square) -> Vec<Square> {
    const OFFSETS: [(i8, i8); 8] = [
        (-1, -1),
        (0, -1),
        (1, -1),
        (-1, 0),
        (1, 0),
        (-1, 1),
        (0, 1),
        (1, 1),
    ];
    OFFSETS
        .iter()
        .filter_map(|&(df, dr)| square.offset(df, dr))
        .collect()
}
