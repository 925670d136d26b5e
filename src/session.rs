// SPDX-License-Identifier: MIT

//! Interactive session loop
//!
//! Reads user input, forwards it to the dispatcher, and prints replies.
//! Rate-limited calls are retried with linear backoff; any other failure
//! is reported and the loop moves on to the next prompt.

use async_trait::async_trait;
use std::io::Write as _;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::warn;

use crate::config::SessionConfig;
use crate::Result;

/// The conversational boundary: something that accepts a user message
/// and produces a textual reply, possibly invoking tools along the way.
#[async_trait]
pub trait ToolDispatcher: Send {
    async fn send_message(&mut self, text: &str) -> Result<String>;
}

/// Commands that end the session
pub fn is_exit_command(line: &str) -> bool {
    let line = line.trim();
    line.eq_ignore_ascii_case("exit") || line.eq_ignore_ascii_case("quit")
}

/// Interactive read-eval-print loop around a dispatcher
pub struct SessionLoop<D> {
    dispatcher: D,
    max_retries: u32,
    backoff_base: Duration,
}

impl<D: ToolDispatcher> SessionLoop<D> {
    /// Create a new session loop
    pub fn new(dispatcher: D, config: &SessionConfig) -> Self {
        Self {
            dispatcher,
            max_retries: config.max_retries.max(1),
            backoff_base: Duration::from_secs(config.backoff_base_secs),
        }
    }

    /// Send one message, retrying rate-limited calls with linear backoff.
    ///
    /// Attempt N waits N * base before the next try. Non-rate-limit
    /// errors are returned immediately; after the last rate-limited
    /// attempt the error is returned without a further wait.
    pub async fn send_with_retry(&mut self, text: &str) -> Result<String> {
        let mut attempt = 0;
        loop {
            attempt += 1;
            match self.dispatcher.send_message(text).await {
                Ok(reply) => return Ok(reply),
                Err(e) if e.is_rate_limit() && attempt < self.max_retries => {
                    let wait = self.backoff_base * attempt;
                    warn!(
                        "Rate limit hit, waiting {:?} before retry {}/{}",
                        wait,
                        attempt + 1,
                        self.max_retries
                    );
                    tokio::time::sleep(wait).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Run the loop until the user exits or stdin closes
    pub async fn run(&mut self) -> Result<()> {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();

        loop {
            print!("\nYou: ");
            std::io::stdout().flush()?;

            let line = match lines.next_line().await? {
                Some(line) => line,
                None => break,
            };

            let input = line.trim();
            if input.is_empty() {
                continue;
            }
            if is_exit_command(input) {
                println!("Goodbye!");
                break;
            }

            match self.send_with_retry(input).await {
                Ok(reply) => println!("Robot: {}", reply),
                Err(e) if e.is_rate_limit() => {
                    println!(
                        "Error: Could not get a response after multiple retries due to rate limits."
                    );
                }
                Err(e) => println!("An error occurred: {}", e),
            }
        }

        Ok(())
    }
}
