//! voxweb - spoken-command website generation sessions
//!
//! CLI entry point: runs interactive sessions, re-serves materialized
//! sites, and prints the effective configuration.

use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use colored::Colorize;
use eyre::{Context, Result};
use tracing::info;

use voxweb::announce::{Announcer, ConsoleAnnouncer};
use voxweb::cli::{Cli, Command};
use voxweb::command::ConsoleSource;
use voxweb::config::Config;
use voxweb::generator::create_generator;
use voxweb::host::host;
use voxweb::r#loop::SessionEngine;
use voxweb::site::{DOCUMENT_NAME, Site, site_dir};

fn setup_logging(verbose: bool) {
    // Logs go to stderr; stdout is the interactive surface
    let level = if verbose { tracing::Level::DEBUG } else { tracing::Level::INFO };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose);

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    info!(
        provider = %config.generator.provider,
        model = %config.generator.model,
        base_port = config.host.base_port,
        "voxweb loaded config"
    );

    match cli.command {
        Some(Command::Run { instruction }) => cmd_run(&config, instruction).await,
        Some(Command::Serve { iteration, port }) => cmd_serve(&config, iteration, port).await,
        Some(Command::Config) => cmd_config(&config),
        None => cmd_run(&config, None).await,
    }
}

/// Run an interactive generation session
async fn cmd_run(config: &Config, instruction: Option<String>) -> Result<()> {
    // A missing credential is fatal before the session ever starts
    config.validate()?;

    let generator = create_generator(&config.generator).context("Failed to create generator client")?;
    let source = ConsoleSource::new(Duration::from_millis(config.capture.timeout_ms)).with_initial(instruction);
    let announcer: Arc<dyn Announcer> = Arc::new(ConsoleAnnouncer);

    let mut engine = SessionEngine::new(config.clone(), generator, Box::new(source), announcer)?;
    let summary = engine.run().await?;

    println!(
        "\nSession finished: {} of {} iteration(s) hosted a website.",
        summary.hosted, summary.attempted
    );
    println!("Site directories remain under {}.", config.sites.root.display());
    Ok(())
}

/// Re-host a previously materialized site
async fn cmd_serve(config: &Config, iteration: u32, port: Option<u16>) -> Result<()> {
    let dir = site_dir(&config.sites.root, iteration);
    let document = dir.join(DOCUMENT_NAME);
    if !document.exists() {
        return Err(eyre::eyre!(
            "No materialized site for iteration {} at {}",
            iteration,
            dir.display()
        ));
    }

    let site = Site {
        iteration,
        dir,
        document,
    };
    let bind: IpAddr = config
        .host
        .bind
        .parse()
        .context(format!("invalid bind address: {}", config.host.bind))?;
    let port = port.unwrap_or_else(|| {
        let preferred = u32::from(config.host.base_port) + (iteration - 1);
        preferred.min(u32::from(u16::MAX)) as u16
    });

    let handle = host(&site, bind, port).await?;
    println!("{} Serving iteration {} at {} (Ctrl+C to stop)", "✓".green(), iteration, handle.url().bold());

    tokio::signal::ctrl_c().await?;
    println!();
    handle.stop().await;
    Ok(())
}

/// Print the effective configuration
fn cmd_config(config: &Config) -> Result<()> {
    print!("{}", serde_yaml::to_string(config)?);
    Ok(())
}
