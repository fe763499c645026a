//! Configuration — YAML config + env var overrides.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::billing::DEFAULT_RATE_PER_KWH;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Flat electricity rate used to price the sample bill
    #[serde(default = "default_rate_per_kwh")]
    pub rate_per_kwh: f64,

    /// Display name of the signed-in user; unset means signed out
    #[serde(default)]
    pub user: Option<String>,

    /// Web server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Web chat sessions with no activity for this long are closed; 0 keeps them forever
    #[serde(default = "default_session_idle_secs")]
    pub session_idle_secs: u64,

    /// Where the TUI writes its log (it owns stdout)
    #[serde(default = "default_log_file")]
    pub log_file: PathBuf,

    /// Resolved project root (set at load time, not serialized from YAML)
    #[serde(skip)]
    pub project_root: PathBuf,
}

fn default_rate_per_kwh() -> f64 {
    DEFAULT_RATE_PER_KWH
}
fn default_port() -> u16 {
    8000
}
fn default_session_idle_secs() -> u64 {
    30 * 60
}
fn default_log_file() -> PathBuf {
    PathBuf::from("watt-tui.log")
}

impl Config {
    /// Load config from a YAML file with env var overrides.
    pub fn load(config_path: &Path) -> Result<Self> {
        Self::load_with_env(config_path, env_var)
    }

    /// Load `config.yaml` from `project_root`, falling back to defaults
    /// (still env-overridden) when the file does not exist.
    pub fn load_from_dir(project_root: &Path) -> Result<Self> {
        Self::load_from_dir_with_env(project_root, env_var)
    }

    fn load_with_env(config_path: &Path, env: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let content = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config: {}", config_path.display()))?;

        let mut config: Config =
            serde_yaml::from_str(&content).context("Failed to parse config.yaml")?;

        config.project_root = config_path
            .parent()
            .unwrap_or(Path::new("."))
            .to_path_buf();

        config.apply_overrides(env)?;
        config.validate()?;
        Ok(config)
    }

    fn load_from_dir_with_env(
        project_root: &Path,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let config_path = project_root.join("config.yaml");
        if config_path.exists() {
            return Self::load_with_env(&config_path, env);
        }
        let mut config = Config {
            project_root: project_root.to_path_buf(),
            ..Config::default()
        };
        config.apply_overrides(env)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `WATT_*` / `PORT` overrides, reading variables through `env`.
    fn apply_overrides(&mut self, env: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(rate) = env("WATT_RATE_PER_KWH") {
            self.rate_per_kwh = rate
                .parse()
                .with_context(|| format!("WATT_RATE_PER_KWH is not a number: {}", rate))?;
        }
        if let Some(user) = env("WATT_USER") {
            self.user = Some(user);
        }
        if let Some(port) = env("PORT") {
            self.port = port
                .parse()
                .with_context(|| format!("PORT is not a valid port: {}", port))?;
        }
        if let Some(path) = env("WATT_LOG_FILE") {
            self.log_file = PathBuf::from(path);
        }
        if let Some(secs) = env("WATT_SESSION_IDLE_SECS") {
            self.session_idle_secs = secs
                .parse()
                .with_context(|| format!("WATT_SESSION_IDLE_SECS is not a number: {}", secs))?;
        }
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if !self.rate_per_kwh.is_finite() || self.rate_per_kwh < 0.0 {
            anyhow::bail!("rate_per_kwh must be a non-negative number");
        }
        Ok(())
    }

    /// Idle limit for web chat sessions, if any.
    pub fn session_idle_timeout(&self) -> Option<Duration> {
        (self.session_idle_secs > 0).then(|| Duration::from_secs(self.session_idle_secs))
    }

    /// Log file path, resolved against the project root when relative.
    pub fn log_path(&self) -> PathBuf {
        if self.log_file.is_absolute() {
            self.log_file.clone()
        } else {
            self.project_root.join(&self.log_file)
        }
    }
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rate_per_kwh: default_rate_per_kwh(),
            user: None,
            port: default_port(),
            session_idle_secs: default_session_idle_secs(),
            log_file: default_log_file(),
            project_root: PathBuf::new(),
        }
    }
}
