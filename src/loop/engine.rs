//! SessionEngine - executes generate/serve/continue iterations
//!
//! State machine per iteration:
//! `AwaitingCommand → Generating → Parsing → Materializing → Hosting`,
//! with an error edge from every state into the continue prompt. The
//! iteration counter advances only after a successful iteration, so a
//! retry reuses the same number and the materializer's
//! replace-on-collision semantics apply.

use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;

use colored::Colorize;
use eyre::{Context, Result};
use tracing::{debug, info, warn};

use crate::announce::Announcer;
use crate::artifact::{self, ParseError};
use crate::command::{CommandError, CommandSource};
use crate::config::Config;
use crate::generator::{GenerationRequest, Generator, prompt};
use crate::host::{self, HostError, HostHandle};
use crate::session::Session;
use crate::site;

/// Result of one full iteration attempt
#[derive(Debug)]
pub enum IterationOutcome {
    /// Site materialized and hosted
    Hosted { url: String, port: u16 },
    /// Pipeline stopped early; the reason feeds the continue prompt
    Failed(FailureReason),
}

/// Why an iteration did not reach hosting
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    /// Command source returned nothing usable
    NoCommand(CommandError),
    /// Content generator call failed
    GenerationFailed(String),
    /// Generator output did not parse; carries the diagnostics
    ParseFailed(ParseError),
    /// Filesystem error while materializing
    IoFailed(String),
    /// Listener could not bind
    PortFailed(String),
}

impl std::fmt::Display for FailureReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FailureReason::NoCommand(e) => write!(f, "no command: {e}"),
            FailureReason::GenerationFailed(e) => write!(f, "generation failed: {e}"),
            FailureReason::ParseFailed(e) => write!(f, "could not parse the generated code: {e}"),
            FailureReason::IoFailed(e) => write!(f, "could not write the site: {e}"),
            FailureReason::PortFailed(e) => write!(f, "could not host the site: {e}"),
        }
    }
}

/// What a finished session did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSummary {
    /// Iterations that ended with a hosted site
    pub hosted: u32,
    /// Iterations attempted, including failed ones
    pub attempted: u32,
}

/// Session execution engine - the iteration controller
pub struct SessionEngine {
    config: Config,
    bind: IpAddr,
    generator: Arc<dyn Generator>,
    source: Box<dyn CommandSource>,
    announcer: Arc<dyn Announcer>,
    session: Session,
    hosts: Vec<HostHandle>,
}

impl SessionEngine {
    /// Create a new engine over the external collaborators
    pub fn new(
        config: Config,
        generator: Arc<dyn Generator>,
        source: Box<dyn CommandSource>,
        announcer: Arc<dyn Announcer>,
    ) -> Result<Self> {
        let bind: IpAddr = config
            .host
            .bind
            .parse()
            .context(format!("invalid bind address: {}", config.host.bind))?;
        let session = Session::new(config.host.base_port);

        Ok(Self {
            config,
            bind,
            generator,
            source,
            announcer,
            session,
            hosts: Vec::new(),
        })
    }

    /// Run iterations until the user declines to continue
    ///
    /// Every live host is stopped before this returns; materialized site
    /// directories stay on disk.
    pub async fn run(&mut self) -> Result<SessionSummary> {
        info!(base_port = self.config.host.base_port, "session starting");
        let mut hosted = 0u32;
        let mut attempted = 0u32;

        loop {
            attempted += 1;
            let outcome = self.run_iteration().await;

            let succeeded = match &outcome {
                IterationOutcome::Hosted { url, .. } => {
                    println!("{} Website ready at {}", "✓".green(), url.bold());
                    self.announcer.speak(&format!("Your website is ready at {url}")).await;
                    hosted += 1;
                    true
                }
                IterationOutcome::Failed(reason) => {
                    warn!(%reason, iteration = self.session.iteration(), "iteration failed");
                    println!("{} {}", "✗".red(), reason);
                    self.announcer.speak("Sorry, that one did not work out.").await;
                    false
                }
            };

            // AwaitingContinue: one consistent recovery prompt for every
            // outcome; anything but a clear yes ends the session
            let again = self.source.confirm("Create another website? [y/N] ").await;
            if !again {
                break;
            }
            if succeeded {
                self.session.advance();
            }
        }

        self.announcer.speak("Session finished.").await;
        self.shutdown_hosts().await;
        info!(hosted, attempted, "session ended");

        Ok(SessionSummary { hosted, attempted })
    }

    /// Run one command → generate → parse → materialize → host attempt
    async fn run_iteration(&mut self) -> IterationOutcome {
        let iteration = self.session.iteration();
        info!(iteration, "iteration starting");

        // AwaitingCommand
        self.announcer.speak("Listening for your command.").await;
        let instruction = match self.source.capture("Describe the website to create: ").await {
            Ok(text) => text,
            Err(e) => {
                debug!(error = %e, "run_iteration: no usable command");
                return IterationOutcome::Failed(FailureReason::NoCommand(e));
            }
        };
        info!(%instruction, "command captured");

        // Generating
        self.announcer.speak("Generating your website.").await;
        let request = GenerationRequest {
            system_prompt: prompt::system_prompt(self.config.mode.shape, self.config.mode.markers),
            user_prompt: prompt::user_prompt(&instruction),
            max_tokens: self.config.generator.max_tokens,
        };
        let raw = match self.generator.complete(request).await {
            Ok(response) => response,
            Err(e) => {
                // Rate limits carry a wait hint; other transient errors are
                // flagged as worth retrying on the next attempt
                let message = if e.is_rate_limit() {
                    let wait = e.retry_after().unwrap_or(Duration::from_secs(60));
                    format!("rate limited, try again in about {} seconds", wait.as_secs())
                } else if e.is_retryable() {
                    format!("{e} (transient, the next attempt may succeed)")
                } else {
                    e.to_string()
                };
                return IterationOutcome::Failed(FailureReason::GenerationFailed(message));
            }
        };
        debug!(
            input_tokens = raw.usage.input_tokens,
            output_tokens = raw.usage.output_tokens,
            "generation complete"
        );

        // Parsing
        let artifact = match artifact::parse(&raw.text, self.config.mode.shape, self.config.mode.markers) {
            Ok(artifact) => artifact,
            Err(e) => {
                return IterationOutcome::Failed(FailureReason::ParseFailed(e));
            }
        };

        // Materializing
        let site = match site::materialize(&artifact, iteration, &self.config.sites.root) {
            Ok(site) => site,
            Err(e) => {
                return IterationOutcome::Failed(FailureReason::IoFailed(e.to_string()));
            }
        };

        // Hosting: each host runs on its own supervised task, so the
        // continue prompt stays reachable while the site is live
        let port = match self.session.port_for_iteration() {
            Some(port) => port,
            None => {
                warn!(iteration, "run_iteration: no unclaimed ports left");
                return IterationOutcome::Failed(FailureReason::PortFailed(
                    "no unclaimed ports left in this session".to_string(),
                ));
            }
        };
        match host::host(&site, self.bind, port).await {
            Ok(handle) => {
                self.session.claim(port);
                let url = handle.url().to_string();
                self.hosts.push(handle);
                IterationOutcome::Hosted { url, port }
            }
            Err(e) => {
                if matches!(e, HostError::PortInUse { .. }) {
                    // Burn the conflicted port so a retry moves on
                    self.session.claim(port);
                }
                IterationOutcome::Failed(FailureReason::PortFailed(e.to_string()))
            }
        }
    }

    /// Stop every live host from this session
    async fn shutdown_hosts(&mut self) {
        let count = self.hosts.len();
        debug!(count, "shutdown_hosts: called");
        for handle in self.hosts.drain(..) {
            handle.stop().await;
        }
        if count > 0 {
            info!(count, "all hosts stopped");
        }
    }
}
