//! Client side of the external validation process.
//!
//! [`ProcessTransport`] spawns the delegate program once per request, writes
//! the request line to its stdin and waits a bounded time for one reply line.
//! A delegate still running once it has replied is killed.
//! [`DelegateOracle`] turns protocol replies into verdicts and reports "no
//! answer" on any failure so the validator can fall back to local rules.

use std::io::{BufRead, BufReader, Write};
use std::env;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::thread;
use std::time::Duration;

use tracing::{debug, warn};

use crate::board::Board;
use crate::error::{DelegateError, DelegateResult};
use crate::moves::Destination;
use crate::piece::Color;
use crate::protocol::{Request, Response};
use crate::validator::{MoveOracle, Verdict};

/// Default time to wait for the delegate to answer.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// A request/response text channel to a delegate.
pub trait Transport: Send + Sync {
    fn round_trip(&self, command: &str) -> DelegateResult<String>;
}

/// Runs the delegate as a child process per request.
#[derive(Clone, Debug)]
pub struct ProcessTransport {
    program: PathBuf,
    timeout: Duration,
}

impl ProcessTransport {
    pub fn new(program: impl Into<PathBuf>, timeout: Duration) -> Self {
        ProcessTransport {
            program: program.into(),
            timeout,
        }
    }

    /// The file that would be run. A bare name is looked up on `PATH`; anything
    /// with a directory part is taken as given.
    pub fn resolve(&self) -> DelegateResult<PathBuf> {
        let found = if self.program.components().count() > 1 {
            self.program.is_file().then(|| self.program.clone())
        } else {
            env::var_os("PATH").and_then(|paths| search_path(&self.program, &paths))
        };
        found.ok_or_else(|| DelegateError::Missing(self.program.clone()))
    }
}

fn search_path(name: &Path, paths: &OsStr) -> Option<PathBuf> {
    env::split_paths(paths)
        .map(|dir| dir.join(name))
        .find(|candidate| candidate.is_file())
}

/// Reap a child that already answered. One still running is killed.
fn finish(child: &mut Child) {
    match child.try_wait() {
        Ok(Some(_)) => {}
        _ => {
            let _ = child.kill();
            let _ = child.wait();
        }
    }
}

impl Transport for ProcessTransport {
    fn round_trip(&self, command: &str) -> DelegateResult<String> {
        let program = self.resolve()?;
        let mut child = Command::new(&program)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()?;

        let (mut stdin, stdout) = match (child.stdin.take(), child.stdout.take()) {
            (Some(stdin), Some(stdout)) => (stdin, stdout),
            _ => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(DelegateError::Empty);
            }
        };

        // Closing stdin after the request tells a line-looping delegate to exit.
        let written = writeln!(stdin, "{command}").and_then(|_| stdin.flush());
        drop(stdin);
        if let Err(e) = written {
            let _ = child.kill();
            let _ = child.wait();
            return Err(e.into());
        }

        let (tx, rx) = crossbeam_channel::bounded(1);
        thread::spawn(move || {
            let mut reader = BufReader::new(stdout);
            let mut line = String::new();
            let result = reader.read_line(&mut line).map(|_| line);
            let _ = tx.send(result);
        });

        match rx.recv_timeout(self.timeout) {
            Ok(Ok(line)) => {
                finish(&mut child);
                let line = line.trim();
                if line.is_empty() {
                    Err(DelegateError::Empty)
                } else {
                    Ok(line.to_string())
                }
            }
            Ok(Err(e)) => {
                let _ = child.kill();
                let _ = child.wait();
                Err(e.into())
            }
            Err(_) => {
                let _ = child.kill();
                let _ = child.wait();
                Err(DelegateError::Timeout(self.timeout))
            }
        }
    }
}

/// A [`MoveOracle`] that asks a delegate over some [`Transport`].
pub struct DelegateOracle<T> {
    transport: T,
}

impl<T: Transport> DelegateOracle<T> {
    pub fn new(transport: T) -> Self {
        DelegateOracle { transport }
    }

    fn exchange(&self, request: &Request) -> DelegateResult<Response> {
        let command = request.encode();
        let reply = self.transport.round_trip(&command)?;
        debug!(%reply, "delegate replied");
        Ok(Response::parse(&reply)?)
    }
}

impl DelegateOracle<ProcessTransport> {
    pub fn process(program: impl Into<PathBuf>, timeout: Duration) -> Self {
        DelegateOracle::new(ProcessTransport::new(program, timeout))
    }
}

impl<T: Transport> MoveOracle for DelegateOracle<T> {
    fn validate(
        &self,
        board: &Board,
        turn: Color,
        from: (usize, usize),
        to: (usize, usize),
    ) -> Option<Verdict> {
        let request = Request::Validate {
            board: board.clone(),
            turn,
            from,
            to,
        };
        let outcome = self.exchange(&request).and_then(|reply| match reply {
            Response::Valid => Ok(Verdict::legal()),
            Response::Invalid(reason) => Ok(Verdict::illegal(reason)),
            other => Err(DelegateError::Mismatch(other.encode())),
        });
        match outcome {
            Ok(verdict) => Some(verdict),
            Err(e) => {
                warn!(error = %e, "delegate validation failed, using local rules");
                None
            }
        }
    }

    fn legal_moves(
        &self,
        board: &Board,
        turn: Color,
        from: (usize, usize),
    ) -> Option<Vec<Destination>> {
        let request = Request::Moves {
            board: board.clone(),
            turn,
            from,
        };
        let outcome = self.exchange(&request).and_then(|reply| match reply {
            Response::Moves(moves) => Ok(moves),
            other => Err(DelegateError::Mismatch(other.encode())),
        });
        match outcome {
            Ok(moves) => Some(moves),
            Err(e) => {
                warn!(error = %e, "delegate move listing failed, using local rules");
                None
            }
        }
    }
}
