//! Configuration types and loading

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::artifact::{MarkerGrammar, ParseMode};

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Response shape requested from the generator (split or fused)
    pub mode: ModeConfig,

    /// Content generator configuration
    pub generator: GeneratorConfig,

    /// Command capture configuration
    pub capture: CaptureConfig,

    /// Hosting configuration
    pub host: HostConfig,

    /// Site output configuration
    pub sites: SitesConfig,
}

impl Config {
    /// Validate configuration before use
    ///
    /// A missing API credential is fatal at startup: the session never
    /// begins. Call this early to fail fast with a clear message.
    pub fn validate(&self) -> Result<()> {
        if std::env::var(&self.generator.api_key_env).is_err() {
            return Err(eyre::eyre!(
                "Generator API key not found. Set the {} environment variable.",
                self.generator.api_key_env
            ));
        }
        Ok(())
    }

    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Try project-local config: .voxweb.yml
        let local_config = PathBuf::from(".voxweb.yml");
        if local_config.exists() {
            match Self::load_from_file(&local_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    tracing::warn!("Failed to load config from {}: {}", local_config.display(), e);
                }
            }
        }

        // Try user config: ~/.config/voxweb/voxweb.yml
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("voxweb").join("voxweb.yml");
            if user_config.exists() {
                match Self::load_from_file(&user_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        tracing::warn!("Failed to load config from {}: {}", user_config.display(), e);
                    }
                }
            }
        }

        // No config file found, use defaults
        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;
        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        tracing::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }
}

/// Response shape and marker grammar
///
/// A configuration choice of the prompt template, not a per-response
/// decision: the parser and the system prompt both follow it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModeConfig {
    /// Split (three sections) or fused (one whole page)
    pub shape: ParseMode,

    /// Marker grammar used in split mode
    pub markers: MarkerGrammar,
}

impl Default for ModeConfig {
    fn default() -> Self {
        Self {
            shape: ParseMode::Split,
            markers: MarkerGrammar::Bracketed,
        }
    }
}

/// Content generator configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Provider name (currently only "openai" supported)
    pub provider: String,

    /// Model identifier
    pub model: String,

    /// Environment variable containing the API key
    #[serde(rename = "api-key-env")]
    pub api_key_env: String,

    /// API base URL
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Maximum tokens per response
    #[serde(rename = "max-tokens")]
    pub max_tokens: u32,

    /// Request timeout in milliseconds
    #[serde(rename = "timeout-ms")]
    pub timeout_ms: u64,

    /// Sampling temperature
    pub temperature: f32,
}

impl GeneratorConfig {
    /// Read the API key from the configured environment variable
    pub fn get_api_key(&self) -> Result<String> {
        std::env::var(&self.api_key_env)
            .context(format!("environment variable {} is not set", self.api_key_env))
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            provider: "openai".to_string(),
            model: "gpt-4".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            base_url: "https://api.openai.com".to_string(),
            max_tokens: 4096,
            timeout_ms: 120_000,
            temperature: 0.2,
        }
    }
}

/// Command capture configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    /// Capture timeout in milliseconds; an expired wait yields a
    /// "no command" outcome, never a hang
    #[serde(rename = "timeout-ms")]
    pub timeout_ms: u64,

    /// Recognition language for speech-based command sources
    /// (the console source ignores it)
    pub language: String,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 120_000,
            language: "en-US".to_string(),
        }
    }
}

/// Hosting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    /// Address to bind listeners on
    pub bind: String,

    /// First port of the session; iteration N serves on base + N - 1
    #[serde(rename = "base-port")]
    pub base_port: u16,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1".to_string(),
            base_port: 5000,
        }
    }
}

/// Site output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SitesConfig {
    /// Directory that holds one subdirectory per iteration
    pub root: PathBuf,
}

impl Default for SitesConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("generated_sites"),
        }
    }
}
