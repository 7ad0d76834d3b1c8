//! Move representation.

use crate::{Color, Piece, Square};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error returned when a UCI move string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid UCI move: {0:?}")]
pub struct ParseMoveError(pub String);

/// A single property of a played or playable move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum MoveFlag {
    /// A piece was taken on the destination square.
    Capture = 0,
    /// En passant capture.
    EnPassant = 1,
    /// Kingside castling (O-O).
    KingsideCastle = 2,
    /// Queenside castling (O-O-O).
    QueensideCastle = 3,
    /// Pawn promotion.
    Promotion = 4,
    /// Pawn double push from its starting rank.
    BigPawn = 5,
}

impl MoveFlag {
    const ALL: [MoveFlag; 6] = [
        MoveFlag::BigPawn,
        MoveFlag::EnPassant,
        MoveFlag::Capture,
        MoveFlag::Promotion,
        MoveFlag::KingsideCastle,
        MoveFlag::QueensideCastle,
    ];

    /// The single-letter code used in flag strings.
    pub const fn to_char(self) -> char {
        match self {
            MoveFlag::Capture => 'c',
            MoveFlag::EnPassant => 'e',
            MoveFlag::KingsideCastle => 'k',
            MoveFlag::QueensideCastle => 'q',
            MoveFlag::Promotion => 'p',
            MoveFlag::BigPawn => 'b',
        }
    }

    const fn from_char(c: char) -> Option<MoveFlag> {
        match c {
            'c' => Some(MoveFlag::Capture),
            'e' => Some(MoveFlag::EnPassant),
            'k' => Some(MoveFlag::KingsideCastle),
            'q' => Some(MoveFlag::QueensideCastle),
            'p' => Some(MoveFlag::Promotion),
            'b' => Some(MoveFlag::BigPawn),
            _ => None,
        }
    }
}

/// A set of [`MoveFlag`]s.
///
/// Serializes as a flag string such as `"c"`, `"cp"` or `"b"`; a quiet move
/// with no flags is `"n"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct MoveFlags(u8);

impl MoveFlags {
    /// The empty set (a quiet move).
    pub const NONE: MoveFlags = MoveFlags(0);

    /// Returns a copy of the set with `flag` added.
    #[must_use]
    pub const fn with(self, flag: MoveFlag) -> Self {
        MoveFlags(self.0 | (1 << flag as u8))
    }

    /// Adds a flag to the set.
    pub fn insert(&mut self, flag: MoveFlag) {
        self.0 |= 1 << flag as u8;
    }

    /// Returns true if the set contains `flag`.
    #[inline]
    pub const fn contains(self, flag: MoveFlag) -> bool {
        self.0 & (1 << flag as u8) != 0
    }

    /// Returns true if no flag is set.
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Returns true for normal and en passant captures.
    #[inline]
    pub const fn is_capture(self) -> bool {
        self.contains(MoveFlag::Capture) || self.contains(MoveFlag::EnPassant)
    }

    /// Returns true for either castling direction.
    #[inline]
    pub const fn is_castle(self) -> bool {
        self.contains(MoveFlag::KingsideCastle) || self.contains(MoveFlag::QueensideCastle)
    }

    /// Iterates the contained flags in flag-string order.
    pub fn iter(self) -> impl Iterator<Item = MoveFlag> {
        MoveFlag::ALL.into_iter().filter(move |f| self.contains(*f))
    }
}

impl fmt::Display for MoveFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "n");
        }
        for flag in self.iter() {
            write!(f, "{}", flag.to_char())?;
        }
        Ok(())
    }
}

impl FromStr for MoveFlags {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut flags = MoveFlags::NONE;
        for c in s.chars() {
            match (c, MoveFlag::from_char(c)) {
                ('n', _) => {}
                (_, Some(flag)) => flags.insert(flag),
                (other, None) => return Err(format!("unknown move flag {other:?}")),
            }
        }
        Ok(flags)
    }
}

impl Serialize for MoveFlags {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for MoveFlags {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

/// A legal or played move with everything the presentation layer needs.
///
/// Produced by the rules adapter and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Move {
    /// Side making the move.
    pub color: Color,
    pub from: Square,
    /// Destination of the moving piece (the king's square for castling).
    pub to: Square,
    /// Type of the moving piece.
    pub piece: Piece,
    /// Type of the piece taken, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub captured: Option<Piece>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub promotion: Option<Piece>,
    pub flags: MoveFlags,
    /// Standard algebraic notation, including check and mate suffixes.
    pub san: String,
}

impl Move {
    /// Returns the UCI notation for this move (e.g., "e2e4", "e7e8q").
    pub fn to_uci(&self) -> String {
        self.request().to_uci()
    }

    /// Returns the from/to/promotion triple that replays this move.
    pub fn request(&self) -> MoveRequest {
        MoveRequest {
            from: self.from,
            to: self.to,
            promotion: self.promotion,
        }
    }

    /// Returns true for normal and en passant captures.
    #[inline]
    pub fn is_capture(&self) -> bool {
        self.flags.is_capture()
    }
}

/// A proposed move as it arrives from a gesture, an engine or a book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MoveRequest {
    pub from: Square,
    pub to: Square,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub promotion: Option<Piece>,
}

impl MoveRequest {
    /// Creates a request without a promotion piece.
    pub const fn new(from: Square, to: Square) -> Self {
        MoveRequest {
            from,
            to,
            promotion: None,
        }
    }

    /// Parses long algebraic UCI notation: `e2e4`, `e7e8q`.
    pub fn from_uci(s: &str) -> Result<Self, ParseMoveError> {
        let err = || ParseMoveError(s.to_string());
        if !s.is_ascii() || !(4..=5).contains(&s.len()) {
            return Err(err());
        }
        let from = Square::from_algebraic(&s[0..2]).ok_or_else(err)?;
        let to = Square::from_algebraic(&s[2..4]).ok_or_else(err)?;
        let promotion = match s[4..].chars().next() {
            None => None,
            Some(c) => match Piece::from_char(c) {
                Some(p @ (Piece::Knight | Piece::Bishop | Piece::Rook | Piece::Queen)) => Some(p),
                _ => return Err(err()),
            },
        };
        Ok(MoveRequest {
            from,
            to,
            promotion,
        })
    }

    /// Returns the UCI notation for this request.
    pub fn to_uci(&self) -> String {
        let mut s = format!("{}{}", self.from, self.to);
        if let Some(p) = self.promotion {
            s.push(p.to_char());
        }
        s
    }
}

impl fmt::Display for MoveRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_uci())
    }
}

impl FromStr for MoveRequest {
    type Err = ParseMoveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MoveRequest::from_uci(s)
    }
}
