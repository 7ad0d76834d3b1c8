//! Computer player.
//!
//! [`Bot`] decides how the computer side moves and plays the move on a
//! [`Game`]. Below skill level zero it plays random moves. Otherwise the
//! configured [`Opponent`] decides:
//! - `engine` - an external UCI engine, with a random move whenever the
//!   engine cannot be started, errors, times out or answers nonsense
//! - `greedy` - one-ply material grab
//! - `minimax` - the opening book while it has answers, then built-in search
//!
//! Failures of the engine or the opening book are logged and absorbed; the
//! only error a caller sees is one from the game itself.
//!
//! # Example
//!
//! ```no_run
//! use chess_bot::{Bot, BotConfig};
//! use chess_engine::Game;
//!
//! # async fn run() -> Result<(), chess_bot::BotError> {
//! let mut bot = Bot::new(BotConfig::default());
//! bot.set_skill_level(5);
//! let mut game = Game::new();
//! if let Some(reply) = bot.computer_move(&mut game).await? {
//!     println!("{} ({:?})", reply.played.san, reply.source);
//! }
//! bot.shutdown().await;
//! # Ok(())
//! # }
//! ```

pub mod config;

pub use config::{BotConfig, ConfigError, EngineConfig, OpeningBookConfig, Opponent};

use chess_core::{Move, MoveRequest};
use chess_engine::search::Strategy;
use chess_engine::{CaptureEvent, Chess, Game, GameError};
use chess_openings::OpeningBook;
use rand::rngs::StdRng;
use rand::SeedableRng;
use thiserror::Error;
use tracing::{debug, info, warn};
use uci::{UciClient, UciError};

#[derive(Debug, Error)]
pub enum BotError {
    #[error(transparent)]
    Game(#[from] GameError),
}

/// Which strategy produced a computer move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveSource {
    /// Random move at negative skill levels.
    Random,
    /// External engine.
    Engine,
    /// Random move after the engine failed.
    EngineFallback,
    Greedy,
    /// Opening book continuation.
    Book,
    Minimax,
}

/// A move the computer played.
#[derive(Debug, Clone, PartialEq)]
pub struct ComputerMove {
    pub played: Move,
    pub capture: Option<CaptureEvent>,
    pub source: MoveSource,
}

/// The computer player.
///
/// The engine process is started on first use and replaced after any
/// failure. Only one request is ever in flight against it.
pub struct Bot {
    config: BotConfig,
    skill_level: i32,
    engine: Option<UciClient>,
    book: Option<OpeningBook>,
    rng: StdRng,
}

impl Bot {
    pub fn new(config: BotConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Creates a bot whose random choices are reproducible.
    pub fn with_seed(config: BotConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: BotConfig, rng: StdRng) -> Self {
        let book = if config.opening_book.enabled {
            let settings = &config.opening_book;
            match OpeningBook::new(
                settings.endpoint.clone(),
                settings.timeout(),
                settings.token.clone(),
            ) {
                Ok(book) => Some(book),
                Err(e) => {
                    warn!(error = %e, "opening book unavailable");
                    None
                }
            }
        } else {
            None
        };

        Self {
            skill_level: config.skill_level,
            config,
            engine: None,
            book,
            rng,
        }
    }

    pub fn config(&self) -> &BotConfig {
        &self.config
    }

    pub fn skill_level(&self) -> i32 {
        self.skill_level
    }

    /// Changes the playing strength. The engine is reconfigured on its next
    /// move, and only if the level actually changed.
    pub fn set_skill_level(&mut self, level: i32) {
        if level != self.skill_level {
            debug!(from = self.skill_level, to = level, "skill level changed");
            self.skill_level = level;
        }
    }

    pub fn opening_book(&self) -> Option<&OpeningBook> {
        self.book.as_ref()
    }

    /// Prepares for a new game: the opening book gets another chance.
    pub fn new_game(&mut self) {
        if let Some(book) = &mut self.book {
            book.reset();
        }
    }

    /// Picks and plays a move for the side to move.
    ///
    /// Returns `None` if that side has no legal move.
    pub async fn computer_move(&mut self, game: &mut Game) -> Result<Option<ComputerMove>, BotError> {
        if game.legal_moves().is_empty() {
            return Ok(None);
        }
        let position = game.rules().position().clone();

        if self.skill_level < 0 {
            return self.play_random(game, &position, MoveSource::Random);
        }

        let fen = game.fen();
        match self.config.opponent {
            Opponent::Engine => {
                if let Some(request) = self.engine_move(&fen).await {
                    match game.play(request) {
                        Ok(played) => return Ok(Some(reply(played, MoveSource::Engine))),
                        Err(e) => {
                            warn!(error = %e, "engine suggested an illegal move");
                            self.engine = None;
                        }
                    }
                }
                self.play_random(game, &position, MoveSource::EngineFallback)
            }
            Opponent::Greedy => {
                let request = Strategy::Greedy.select(&position, &mut self.rng);
                self.play_request(game, request, MoveSource::Greedy)
            }
            Opponent::Minimax => {
                if let Some(request) = self.book_move(&fen).await {
                    match game.play(request) {
                        Ok(played) => return Ok(Some(reply(played, MoveSource::Book))),
                        Err(e) => {
                            warn!(error = %e, "book suggested an illegal move");
                            if let Some(book) = &mut self.book {
                                book.disable();
                            }
                        }
                    }
                }
                self.play_minimax(game, position).await
            }
        }
    }

    /// Quits the engine process, if one is running.
    pub async fn shutdown(mut self) {
        if let Some(engine) = self.engine.take() {
            if let Err(e) = engine.quit().await {
                debug!(error = %e, "engine did not quit cleanly");
            }
        }
    }

    fn play_random(
        &mut self,
        game: &mut Game,
        position: &Chess,
        source: MoveSource,
    ) -> Result<Option<ComputerMove>, BotError> {
        let request = Strategy::Random.select(position, &mut self.rng);
        self.play_request(game, request, source)
    }

    fn play_request(
        &mut self,
        game: &mut Game,
        request: Option<MoveRequest>,
        source: MoveSource,
    ) -> Result<Option<ComputerMove>, BotError> {
        let Some(request) = request else {
            return Ok(None);
        };
        debug!(%request, ?source, "computer move chosen");
        let played = game.play(request)?;
        Ok(Some(reply(played, source)))
    }

    async fn play_minimax(
        &mut self,
        game: &mut Game,
        position: Chess,
    ) -> Result<Option<ComputerMove>, BotError> {
        let strategy = Strategy::Minimax {
            depth: self.config.minimax_depth,
        };
        let searched = tokio::task::spawn_blocking(move || {
            strategy.select(&position, &mut rand::thread_rng())
        })
        .await;

        match searched {
            Ok(request) => self.play_request(game, request, MoveSource::Minimax),
            Err(e) => {
                warn!(error = %e, "search task failed, playing a random move");
                let position = game.rules().position().clone();
                self.play_random(game, &position, MoveSource::Random)
            }
        }
    }

    /// Asks the engine for a move; on failure the engine is dropped.
    async fn engine_move(&mut self, fen: &str) -> Option<MoveRequest> {
        match self.query_engine(fen).await {
            Ok(request) => Some(request),
            Err(e) => {
                warn!(error = %e, "engine unavailable, playing a random move");
                self.engine = None;
                None
            }
        }
    }

    async fn query_engine(&mut self, fen: &str) -> Result<MoveRequest, UciError> {
        let level = self.skill_level;
        let depth = self.config.engine.depth;
        let engine = self.engine_client().await?;
        engine.set_skill_level(level).await?;
        let best = engine.best_move(fen, depth).await?;
        debug!(uci = %best.mv, info = ?best.info, "engine move");
        MoveRequest::from_uci(&best.mv).map_err(|e| UciError::InvalidResponse(e.to_string()))
    }

    async fn engine_client(&mut self) -> Result<&mut UciClient, UciError> {
        if self.engine.is_none() {
            let settings = &self.config.engine;
            let mut client = UciClient::spawn(&settings.path, &settings.args, settings.timeout())?;
            client.init().await?;
            info!(engine = %client.name, path = %settings.path.display(), "engine started");
            self.engine = Some(client);
        }
        self.engine.as_mut().ok_or(UciError::Closed)
    }

    /// Consults the opening book while it is enabled.
    async fn book_move(&mut self, fen: &str) -> Option<MoveRequest> {
        let book = self.book.as_mut()?;
        let mv = book.best_move(fen).await.ok()?;
        match MoveRequest::from_uci(&mv.uci) {
            Ok(request) => Some(request),
            Err(e) => {
                warn!(error = %e, "unreadable book move");
                book.disable();
                None
            }
        }
    }
}

fn reply((played, capture): (Move, Option<CaptureEvent>), source: MoveSource) -> ComputerMove {
    ComputerMove {
        played,
        capture,
        source,
    }
}
