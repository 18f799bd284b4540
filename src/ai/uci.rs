//! UCI engine subprocess plumbing.
//!
//! [`UciEngine`] spawns an external UCI engine (Stockfish or compatible),
//! performs the `uci`/`isready` handshake and exposes a single
//! best-move query over a FEN position. [`MoveSearch`] is the seam that
//! lets the opponent layer swap the subprocess for a stub in tests.

use std::io::{BufRead, BufReader, Write};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};
use std::time::Duration;

use tracing::{debug, trace};

/// Errors from the external engine boundary.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("failed to start engine: {0}")]
    Spawn(String),

    #[error("engine i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("unexpected engine response: {0}")]
    Protocol(String),
}

/// Anything that can produce a best move for a position.
///
/// `position` is a FEN string; the reply is a coordinate move like `e2e4`
/// or `e7e8q`, or `None` when the engine has no move to offer.
pub trait MoveSearch {
    fn best_move(&mut self, position: &str) -> Result<Option<String>, EngineError>;
}

/// A UCI engine running as a child process.
pub struct UciEngine {
    process: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
    depth: u8,
}

impl UciEngine {
    /// Spawn the engine at `path` and complete the UCI handshake.
    ///
    /// `depth` bounds each search; `skill` is forwarded as the engine's
    /// `Skill Level` option (ignored by engines that lack it).
    pub fn new(path: &str, depth: u8, skill: u8) -> Result<Self, EngineError> {
        let mut process = Command::new(path)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| EngineError::Spawn(e.to_string()))?;

        let stdin = process
            .stdin
            .take()
            .ok_or_else(|| EngineError::Spawn("no stdin handle".into()))?;
        let stdout = process
            .stdout
            .take()
            .ok_or_else(|| EngineError::Spawn("no stdout handle".into()))?;

        let mut engine = UciEngine {
            process,
            stdin,
            stdout: BufReader::new(stdout),
            depth,
        };

        engine.send("uci")?;
        engine.read_until("uciok")?;
        engine.send(&format!("setoption name Skill Level value {skill}"))?;
        engine.send("isready")?;
        engine.read_until("readyok")?;

        debug!(path, depth, skill, "uci engine ready");
        Ok(engine)
    }

    fn send(&mut self, cmd: &str) -> Result<(), EngineError> {
        trace!(cmd, "-> engine");
        writeln!(self.stdin, "{cmd}")?;
        self.stdin.flush()?;
        Ok(())
    }

    fn read_line(&mut self) -> Result<String, EngineError> {
        let mut line = String::new();
        let n = self.stdout.read_line(&mut line)?;
        if n == 0 {
            return Err(EngineError::Protocol("engine closed its stdout".into()));
        }
        Ok(line.trim().to_string())
    }

    fn read_until(&mut self, expected: &str) -> Result<(), EngineError> {
        loop {
            let line = self.read_line()?;
            if line.starts_with(expected) {
                return Ok(());
            }
        }
    }

    fn quit(&mut self) {
        let _ = self.send("quit");
        std::thread::sleep(Duration::from_millis(100));
        let _ = self.process.kill();
    }
}

impl MoveSearch for UciEngine {
    fn best_move(&mut self, position: &str) -> Result<Option<String>, EngineError> {
        self.send(&format!("position fen {position}"))?;
        self.send(&format!("go depth {}", self.depth))?;

        loop {
            let line = self.read_line()?;
            if let Some(rest) = line.strip_prefix("bestmove") {
                // "bestmove e2e4 ponder e7e5", or "bestmove (none)" when
                // the position has no moves.
                return match rest.split_whitespace().next() {
                    Some("(none)") | None => Ok(None),
                    Some(mv) => Ok(Some(mv.to_string())),
                };
            }
            // Skip the "info" search chatter.
        }
    }
}

impl Drop for UciEngine {
    fn drop(&mut self) {
        self.quit();
    }
}
