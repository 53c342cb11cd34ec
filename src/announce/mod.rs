//! Announcer - fire-and-forget user notification
//!
//! The reference behavior spoke status lines through a speech synthesizer.
//! That sits behind the [`Announcer`] trait; the shipped implementation
//! prints to the console. Announcement failures are ignored by contract,
//! they never block or fail the pipeline.

use async_trait::async_trait;
use colored::Colorize;
use tracing::debug;

/// Fire-and-forget notification channel toward the user
#[async_trait]
pub trait Announcer: Send + Sync {
    /// Deliver one status line; failures are swallowed
    async fn speak(&self, text: &str);
}

/// Announcer that prints status lines to the console
pub struct ConsoleAnnouncer;

#[async_trait]
impl Announcer for ConsoleAnnouncer {
    async fn speak(&self, text: &str) {
        println!("{}", text.cyan());
    }
}

/// Announcer that drops everything (logs at debug)
pub struct NullAnnouncer;

#[async_trait]
impl Announcer for NullAnnouncer {
    async fn speak(&self, text: &str) {
        debug!(%text, "announcement dropped");
    }
}

#[cfg(test)]
pub mod recording {
    use super::*;
    use std::sync::Mutex;

    /// Announcer that records spoken lines for assertions
    #[derive(Default)]
    pub struct RecordingAnnouncer {
        spoken: Mutex<Vec<String>>,
    }

    impl RecordingAnnouncer {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn spoken(&self) -> Vec<String> {
            self.spoken.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Announcer for RecordingAnnouncer {
        async fn speak(&self, text: &str) {
            self.spoken.lock().unwrap().push(text.to_string());
        }
    }
}
