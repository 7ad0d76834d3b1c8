//! HTTP client for the masters explorer, with a one-shot circuit breaker.

use crate::opening::{ExplorerMove, ExplorerResponse};
use crate::BookError;
use std::time::Duration;
use tracing::{debug, warn};

/// Public masters database.
pub const DEFAULT_ENDPOINT: &str = "https://explorer.lichess.ovh/masters";

/// Queries the explorer for book moves.
///
/// The first failed or empty lookup disables the book until
/// [`reset`](Self::reset), so a game never pays for repeated failures.
#[derive(Debug, Clone)]
pub struct OpeningBook {
    client: reqwest::Client,
    endpoint: String,
    token: Option<String>,
    enabled: bool,
}

impl OpeningBook {
    /// Creates a book querying `endpoint`, giving up on requests after `timeout`.
    pub fn new(
        endpoint: impl Into<String>,
        timeout: Duration,
        token: Option<String>,
    ) -> Result<Self, BookError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
            token,
            enabled: true,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Stops all further lookups.
    pub fn disable(&mut self) {
        self.enabled = false;
    }

    /// Re-enables the book, e.g. for a new game.
    pub fn reset(&mut self) {
        self.enabled = true;
    }

    /// Fetches the explorer statistics for `fen`.
    pub async fn lookup(&self, fen: &str) -> Result<ExplorerResponse, BookError> {
        let mut request = self.client.get(&self.endpoint).query(&[("fen", fen)]);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        let response = request.send().await?.error_for_status()?;
        Ok(response.json().await?)
    }

    /// Returns the best-rated continuation for `fen`.
    ///
    /// Any failure, or a position with no rated continuation, trips the
    /// breaker and is returned as an error.
    pub async fn best_move(&mut self, fen: &str) -> Result<ExplorerMove, BookError> {
        if !self.enabled {
            return Err(BookError::Disabled);
        }

        let outcome = match self.lookup(fen).await {
            Ok(response) => response.best_continuation().cloned().ok_or(BookError::Empty),
            Err(e) => Err(e),
        };

        match outcome {
            Ok(mv) => {
                debug!(%fen, uci = %mv.uci, rating = ?mv.average_rating, "book move");
                Ok(mv)
            }
            Err(e) => {
                warn!(%fen, error = %e, "opening book disabled");
                self.disable();
                Err(e)
            }
        }
    }
}
