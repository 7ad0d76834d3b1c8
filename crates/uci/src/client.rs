//! Async client driving a UCI engine subprocess.
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use uci::UciClient;
//!
//! # async fn run() -> Result<(), uci::UciError> {
//! let mut client = UciClient::spawn("stockfish", &[], Duration::from_secs(10))?;
//! client.init().await?;
//! client.set_skill_level(5).await?;
//! let best = client
//!     .best_move("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 1", 5)
//!     .await?;
//! println!("Best move: {}", best.mv);
//! client.quit().await?;
//! # Ok(())
//! # }
//! ```

use crate::{EngineInfo, EngineMessage, GoOptions, GuiCommand, UciError};
use std::ffi::OsStr;
use std::future::Future;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use tracing::{debug, trace};

/// Name of the standard UCI strength option.
pub const SKILL_LEVEL_OPTION: &str = "Skill Level";

/// Outcome of a search.
#[derive(Debug, Clone, PartialEq)]
pub struct BestMove {
    /// Best move in UCI notation.
    pub mv: String,
    pub ponder: Option<String>,
    /// Last search report before the move, if the engine sent any.
    pub info: Option<EngineInfo>,
}

/// A running engine process.
///
/// Every exchange (handshake, option change, search) must complete within
/// the timeout given at spawn. The process is killed when the client drops.
pub struct UciClient {
    process: Child,
    stdin: ChildStdin,
    lines: Lines<BufReader<ChildStdout>>,
    timeout: Duration,
    /// The engine's name as reported during initialization.
    pub name: String,
    skill_level: Option<i32>,
}

impl UciClient {
    /// Spawns an engine process. Call [`init`](Self::init) before use.
    pub fn spawn<S: AsRef<OsStr>>(
        program: S,
        args: &[String],
        timeout: Duration,
    ) -> Result<Self, UciError> {
        let mut process = Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(UciError::Spawn)?;

        let stdin = process.stdin.take().ok_or(UciError::Closed)?;
        let stdout = process.stdout.take().ok_or(UciError::Closed)?;

        Ok(Self {
            process,
            stdin,
            lines: BufReader::new(stdout).lines(),
            timeout,
            name: String::new(),
            skill_level: None,
        })
    }

    /// The skill level last acknowledged by the engine.
    pub fn skill_level(&self) -> Option<i32> {
        self.skill_level
    }

    /// Sends a command line to the engine.
    pub async fn send(&mut self, cmd: &GuiCommand) -> Result<(), UciError> {
        let line = cmd.to_uci();
        trace!(%line, "> engine");
        self.stdin.write_all(line.as_bytes()).await?;
        self.stdin.write_all(b"\n").await?;
        self.stdin.flush().await?;
        Ok(())
    }

    /// Reads engine output until a line the client understands arrives.
    pub async fn read_message(&mut self) -> Result<EngineMessage, UciError> {
        loop {
            let line = self.lines.next_line().await?.ok_or(UciError::Closed)?;
            trace!(%line, "< engine");
            if let Some(msg) = EngineMessage::parse(&line)? {
                return Ok(msg);
            }
        }
    }

    /// Runs the `uci` / `isready` handshake.
    pub async fn init(&mut self) -> Result<(), UciError> {
        let limit = self.timeout;
        within(limit, async {
            self.send(&GuiCommand::Uci).await?;
            loop {
                match self.read_message().await? {
                    EngineMessage::Id { name: Some(name), .. } => self.name = name,
                    EngineMessage::UciOk => break,
                    _ => {}
                }
            }
            self.ready().await
        })
        .await?;
        debug!(engine = %self.name, "engine initialized");
        Ok(())
    }

    /// Sends `isready` and waits for `readyok`.
    pub async fn is_ready(&mut self) -> Result<(), UciError> {
        let limit = self.timeout;
        within(limit, self.ready()).await
    }

    async fn ready(&mut self) -> Result<(), UciError> {
        self.send(&GuiCommand::IsReady).await?;
        while self.read_message().await? != EngineMessage::ReadyOk {}
        Ok(())
    }

    /// Sets the engine's `Skill Level` option.
    ///
    /// Nothing is sent if the engine already runs at `level`.
    pub async fn set_skill_level(&mut self, level: i32) -> Result<(), UciError> {
        if self.skill_level == Some(level) {
            return Ok(());
        }
        self.send(&GuiCommand::set_option(SKILL_LEVEL_OPTION, level))
            .await?;
        self.is_ready().await?;
        self.skill_level = Some(level);
        debug!(level, "engine skill level set");
        Ok(())
    }

    /// Searches `fen` to `depth` plies and returns the engine's choice.
    pub async fn best_move(&mut self, fen: &str, depth: u32) -> Result<BestMove, UciError> {
        let limit = self.timeout;
        within(limit, self.search(fen, depth)).await
    }

    async fn search(&mut self, fen: &str, depth: u32) -> Result<BestMove, UciError> {
        self.send(&GuiCommand::Position {
            fen: Some(fen.to_string()),
            moves: Vec::new(),
        })
        .await?;
        self.send(&GuiCommand::Go(GoOptions::depth(depth))).await?;

        let mut last_info = None;
        loop {
            match self.read_message().await? {
                EngineMessage::Info(info) => last_info = Some(info),
                EngineMessage::BestMove { mv: Some(mv), ponder } => {
                    return Ok(BestMove {
                        mv,
                        ponder,
                        info: last_info,
                    });
                }
                EngineMessage::BestMove { mv: None, .. } => return Err(UciError::NoMove),
                _ => {}
            }
        }
    }

    /// Asks the engine to exit and waits for the process.
    pub async fn quit(mut self) -> Result<(), UciError> {
        self.send(&GuiCommand::Quit).await?;
        let limit = self.timeout;
        match tokio::time::timeout(limit, self.process.wait()).await {
            Ok(status) => {
                status?;
                Ok(())
            }
            Err(_) => Err(UciError::Timeout(limit)),
        }
    }
}

async fn within<T>(
    limit: Duration,
    fut: impl Future<Output = Result<T, UciError>>,
) -> Result<T, UciError> {
    tokio::time::timeout(limit, fut)
        .await
        .map_err(|_| UciError::Timeout(limit))?
}
