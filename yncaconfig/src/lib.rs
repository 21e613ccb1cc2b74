//! # YncaBridge Configuration
//!
//! Loads the bridge configuration from a YAML file, discovered through an
//! ordered cascade:
//!
//! 1. The `YNCABRIDGE_CONFIG` environment variable (explicit file path)
//! 2. `<config dir>/yncabridge/config.yaml` (XDG config directory)
//! 3. `~/.yncabridge.yaml`
//! 4. `/etc/yncabridge.yaml`
//!
//! The file names the receiver and what to select on it, plus where the
//! player daemon lives:
//!
//! ```yaml
//! receiver:
//!   host: amp.local
//!   input: HDMI1
//!   scene: "Scene 2"
//!   default_program: "2ch Stereo"
//! player:
//!   host: localhost
//! ```
//!
//! `receiver.host`, `receiver.input` and `receiver.scene` are mandatory;
//! everything else has a default. Configuration is loaded once at process
//! start and is immutable afterwards.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use dirs::{config_dir, home_dir};
use serde::Deserialize;
use tracing::info;

/// Environment variable naming an explicit configuration file.
pub const ENV_CONFIG_FILE: &str = "YNCABRIDGE_CONFIG";

const DEFAULT_RECEIVER_PORT: u16 = 50000;
const DEFAULT_STARTUP_DELAY_SECS: u64 = 10;
const DEFAULT_PLAYER_HOST: &str = "localhost";
const DEFAULT_PLAYER_PORT: u16 = 6600;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub receiver: ReceiverSection,
    #[serde(default)]
    pub player: PlayerSection,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReceiverSection {
    /// Receiver hostname or address. Mandatory.
    #[serde(default)]
    pub host: String,
    #[serde(default = "default_receiver_port")]
    pub port: u16,
    /// Input the player daemon is wired to. Mandatory.
    #[serde(default)]
    pub input: String,
    /// Scene preset selected when playback starts. Mandatory.
    #[serde(default)]
    pub scene: String,
    /// Default sound program. Leaving it unset disables sound-mode control.
    #[serde(default)]
    pub default_program: Option<String>,
    /// Seconds the receiver needs from power-on until it makes sound.
    #[serde(default = "default_startup_delay")]
    pub startup_delay_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlayerSection {
    #[serde(default = "default_player_host")]
    pub host: String,
    #[serde(default = "default_player_port")]
    pub port: u16,
}

impl Default for ReceiverSection {
    fn default() -> Self {
        ReceiverSection {
            host: String::new(),
            port: default_receiver_port(),
            input: String::new(),
            scene: String::new(),
            default_program: None,
            startup_delay_secs: default_startup_delay(),
        }
    }
}

impl Default for PlayerSection {
    fn default() -> Self {
        PlayerSection {
            host: default_player_host(),
            port: default_player_port(),
        }
    }
}

fn default_receiver_port() -> u16 {
    DEFAULT_RECEIVER_PORT
}

fn default_startup_delay() -> u64 {
    DEFAULT_STARTUP_DELAY_SECS
}

fn default_player_host() -> String {
    DEFAULT_PLAYER_HOST.to_string()
}

fn default_player_port() -> u16 {
    DEFAULT_PLAYER_PORT
}

impl Config {
    /// Finds the configuration file by trying each cascade location in
    /// order. A path given through the environment variable wins even if the
    /// file does not exist, so a typo fails loudly instead of silently
    /// falling through to another file.
    pub fn locate() -> Result<PathBuf> {
        if let Ok(path) = env::var(ENV_CONFIG_FILE) {
            info!(env_var = ENV_CONFIG_FILE, path = %path, "Using config file from env");
            return Ok(PathBuf::from(path));
        }

        let mut candidates = Vec::new();
        if let Some(dir) = config_dir() {
            candidates.push(dir.join("yncabridge").join("config.yaml"));
        }
        if let Some(home) = home_dir() {
            candidates.push(home.join(".yncabridge.yaml"));
        }
        candidates.push(PathBuf::from("/etc/yncabridge.yaml"));

        candidates
            .into_iter()
            .find(|path| path.exists())
            .ok_or_else(|| anyhow!("Could not find a configuration file"))
    }

    /// Loads and validates the configuration from `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Could not open {}", path.display()))?;
        let config: Config = serde_yaml::from_str(&raw)
            .with_context(|| format!("Could not parse {}", path.display()))?;
        config.validate(path)?;

        info!(config_file = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Discovers and loads the configuration in one step.
    pub fn load_default() -> Result<Self> {
        let path = Self::locate()?;
        Self::load(&path)
    }

    fn validate(&self, path: &Path) -> Result<()> {
        let mandatory = [
            ("receiver.host", &self.receiver.host),
            ("receiver.input", &self.receiver.input),
            ("receiver.scene", &self.receiver.scene),
        ];
        for (field, value) in mandatory {
            if value.trim().is_empty() {
                return Err(anyhow!("{} not set in {}", field, path.display()));
            }
        }
        Ok(())
    }

    pub fn startup_delay(&self) -> Duration {
        Duration::from_secs(self.receiver.startup_delay_secs)
    }

    /// Player daemon address in `host:port` form.
    pub fn player_addr(&self) -> String {
        format!("{}:{}", self.player.host, self.player.port)
    }
}
