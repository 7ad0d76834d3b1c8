//! UCI (Universal Chess Interface) client for external chess engines.
//!
//! This crate speaks the GUI side of the protocol: it formats commands,
//! parses engine replies, and drives an engine subprocess asynchronously.
//!
//! # Commands used
//!
//! - `uci` / `uciok` - Initialize engine, get id
//! - `isready` / `readyok` - Synchronization
//! - `setoption name <name> value <value>` - Configure, e.g. `Skill Level`
//! - `position fen <fen>` - Set position
//! - `go depth <d>` - Start search, answered by `bestmove`
//! - `quit` - Exit engine

mod client;
mod command;
mod info;

pub use client::{BestMove, UciClient};
pub use command::{GoOptions, GuiCommand};
pub use info::{EngineInfo, Score};

use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum UciError {
    #[error("failed to start engine: {0}")]
    Spawn(#[source] std::io::Error),
    #[error("engine I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("engine closed its output")]
    Closed,
    #[error("engine did not answer within {0:?}")]
    Timeout(Duration),
    #[error("invalid response: {0}")]
    InvalidResponse(String),
    #[error("engine reported no move")]
    NoMove,
}

/// Messages sent from engine to GUI.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineMessage {
    /// Engine identification.
    Id { name: Option<String>, author: Option<String> },
    /// UCI initialization complete.
    UciOk,
    /// Engine is ready.
    ReadyOk,
    /// Search information.
    Info(EngineInfo),
    /// Best move found; `None` when the position has no legal move.
    BestMove { mv: Option<String>, ponder: Option<String> },
}

impl EngineMessage {
    /// Parses one line of engine output.
    ///
    /// Lines the client has no use for (`option`, `copyprotection`, banners)
    /// yield `Ok(None)`.
    pub fn parse(line: &str) -> Result<Option<Self>, UciError> {
        let line = line.trim();
        let mut parts = line.split_whitespace();

        let msg = match parts.next().unwrap_or("") {
            "uciok" => EngineMessage::UciOk,
            "readyok" => EngineMessage::ReadyOk,
            "id" => match parts.next() {
                Some("name") => EngineMessage::Id {
                    name: Some(parts.collect::<Vec<_>>().join(" ")),
                    author: None,
                },
                Some("author") => EngineMessage::Id {
                    name: None,
                    author: Some(parts.collect::<Vec<_>>().join(" ")),
                },
                _ => return Ok(None),
            },
            "info" => match EngineInfo::parse(line) {
                Some(info) => EngineMessage::Info(info),
                None => return Ok(None),
            },
            "bestmove" => {
                let mv = parts
                    .next()
                    .ok_or_else(|| UciError::InvalidResponse(line.to_string()))?;
                let ponder = match (parts.next(), parts.next()) {
                    (Some("ponder"), Some(p)) => Some(p.to_string()),
                    _ => None,
                };
                let mv = match mv {
                    "(none)" | "0000" => None,
                    other => Some(other.to_string()),
                };
                EngineMessage::BestMove { mv, ponder }
            }
            _ => return Ok(None),
        };
        Ok(Some(msg))
    }
}
