//! External validation process. Reads one protocol request per line on stdin
//! and writes one reply per line on stdout until stdin closes. Logs go to
//! stderr so stdout carries nothing but replies.

use std::io::{self, BufRead, Write};

use chess_referee::protocol;
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                error!(error = %e, "failed to read request");
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }
        let reply = protocol::answer(&line);
        debug!(%reply, "answering");
        if let Err(e) = writeln!(stdout, "{reply}").and_then(|_| stdout.flush()) {
            error!(error = %e, "failed to write reply");
            break;
        }
    }
}
