//! voxweb - spoken-command website generation sessions
//!
//! voxweb turns one free-form instruction into a runnable static website
//! and serves it locally, repeating the cycle across iterations in one
//! session. The instruction capture, the completion call, and the spoken
//! status lines are external collaborators behind traits; the substance
//! is the generation-parse-materialize-host pipeline and the iteration
//! state machine that drives it.
//!
//! # Core Concepts
//!
//! - **Strict section markers**: generator output is scanned with an
//!   unambiguous marker grammar, never free substring search
//! - **Idempotent by replacement**: re-materializing an iteration rebuilds
//!   its directory in full, old and new content never mix
//! - **Supervised hosts**: every site serves from its own tokio task with
//!   an explicit stop signal, so the session keeps going while sites stay
//!   live on distinct ports
//!
//! # Modules
//!
//! - [`artifact`] - section parser and artifact types
//! - [`site`] - artifact materializer
//! - [`host`] - per-site ephemeral HTTP host
//! - [`generator`] - content generator trait and OpenAI implementation
//! - [`command`] - command source trait and console implementation
//! - [`announce`] - fire-and-forget announcer
//! - [`r#loop`] - the iteration controller
//! - [`config`] - configuration types and loading
//! - [`cli`] - command-line interface

pub mod announce;
pub mod artifact;
pub mod cli;
pub mod command;
pub mod config;
pub mod generator;
pub mod host;
pub mod session;
pub mod site;

// Note: 'loop' is a reserved keyword, so we use r#loop
#[path = "loop/mod.rs"]
pub mod r#loop;

// Re-export commonly used types
pub use announce::{Announcer, ConsoleAnnouncer, NullAnnouncer};
pub use artifact::{Artifact, MarkerGrammar, ParseError, ParseMode, SectionKind, parse};
pub use command::{CommandError, CommandSource, ConsoleSource, is_affirmative};
pub use config::{CaptureConfig, Config, GeneratorConfig, HostConfig, ModeConfig, SitesConfig};
pub use generator::{
    GenerationRequest, Generator, GeneratorError, OpenAiGenerator, RawResponse, TokenUsage, create_generator,
};
pub use host::{HostError, HostHandle, host};
pub use session::Session;
pub use r#loop::{FailureReason, IterationOutcome, SessionEngine, SessionSummary};
pub use site::{DOCUMENT_NAME, MaterializeError, Site, materialize, site_dir};
