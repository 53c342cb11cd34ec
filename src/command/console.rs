//! Console command source
//!
//! Reads one line from stdin per capture, bounded by the configured
//! timeout so a walked-away user yields a "no command" outcome instead of
//! hanging the session.

use std::io::Write;
use std::time::Duration;

use async_trait::async_trait;
use colored::Colorize;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing::debug;

use super::{CommandError, CommandSource};

/// Command source backed by interactive stdin
pub struct ConsoleSource {
    timeout: Duration,
    lines: Lines<BufReader<Stdin>>,
    initial: Option<String>,
}

impl ConsoleSource {
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            lines: BufReader::new(tokio::io::stdin()).lines(),
            initial: None,
        }
    }

    /// Queue an instruction to be returned by the first capture, so a
    /// command-line argument can seed the session without a prompt
    pub fn with_initial(mut self, instruction: Option<String>) -> Self {
        self.initial = instruction;
        self
    }
}

#[async_trait]
impl CommandSource for ConsoleSource {
    async fn capture(&mut self, prompt: &str) -> Result<String, CommandError> {
        if let Some(instruction) = self.initial.take() {
            debug!("capture: consuming seeded instruction");
            println!("{} {}", ">".bright_green(), instruction);
            return Ok(instruction);
        }

        print!("{} {}", ">".bright_green(), prompt);
        let _ = std::io::stdout().flush();

        match tokio::time::timeout(self.timeout, self.lines.next_line()).await {
            Err(_) => {
                debug!(timeout_ms = self.timeout.as_millis() as u64, "capture: timed out");
                println!();
                Err(CommandError::Timeout)
            }
            Ok(Err(e)) => {
                debug!(error = %e, "capture: stdin read failed");
                Err(CommandError::Transport(e.to_string()))
            }
            Ok(Ok(None)) => {
                debug!("capture: stdin closed");
                Err(CommandError::Closed)
            }
            Ok(Ok(Some(line))) => {
                let text = line.trim().to_string();
                if text.is_empty() {
                    debug!("capture: empty line");
                    Err(CommandError::Unrecognized)
                } else {
                    Ok(text)
                }
            }
        }
    }
}
