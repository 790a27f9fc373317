use anyhow::{Context, Result, anyhow};
use chrono_tz::Tz;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    net::SocketAddr,
    path::{Path, PathBuf},
};

use crate::model::Location;

pub const DEFAULT_LISTEN: &str = "0.0.0.0:3000";
pub const DEFAULT_BASE_URL: &str = "http://api.openweathermap.org/data/2.5";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Connection settings for the OpenWeatherMap API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenWeatherConfig {
    pub base_url: String,
    /// Sent as `appid` when present.
    pub api_key: Option<String>,
    /// Upper bound for a single upstream request, connect to last byte.
    pub timeout_secs: u64,
}

impl Default for OpenWeatherConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// listen = "127.0.0.1:8080"
/// timezone = "Europe/London"
///
/// [openweather]
/// api_key = "..."
///
/// [[locations]]
/// id = "2643743"
/// name = "London, England"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub listen: String,
    pub log_level: Option<String>,
    /// IANA zone name used when rendering timestamps.
    pub timezone: String,
    /// Optional directory served under `/static`.
    pub static_dir: Option<PathBuf>,
    pub openweather: OpenWeatherConfig,
    /// Shown on the overview in this order.
    pub locations: Vec<Location>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen: DEFAULT_LISTEN.to_string(),
            log_level: None,
            timezone: "UTC".to_string(),
            static_dir: None,
            openweather: OpenWeatherConfig::default(),
            locations: default_locations(),
        }
    }
}

fn default_locations() -> Vec<Location> {
    vec![
        Location::new("5128581", "New York City, New York"),
        Location::new("5368361", "Los Angeles, California"),
        Location::new("4684888", "Dallas, Texas"),
        Location::new("2643743", "London, England"),
        Location::new("524901", "Moscow, Russia"),
    ]
}

impl Config {
    /// Load config from disk, or return the defaults if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }

        Self::load_from(&path)
    }

    /// Load config from an explicit path; the file must exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to the platform config directory.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    /// Save config to `path`, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "lirix", "lirix")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Look up a registered location by id.
    pub fn location(&self, id: &str) -> Option<&Location> {
        self.locations.iter().find(|l| l.id == id)
    }

    pub fn time_zone(&self) -> Result<Tz> {
        self.timezone.parse::<Tz>().map_err(|_| {
            anyhow!(
                "Unknown time zone '{}'.\n\
                 Hint: use an IANA name such as `UTC` or `America/New_York`.",
                self.timezone
            )
        })
    }

    pub fn listen_addr(&self) -> Result<SocketAddr> {
        self.listen
            .parse()
            .with_context(|| format!("Invalid listen address '{}'", self.listen))
    }

    /// Set or replace the OpenWeatherMap API key; an empty key clears it.
    pub fn set_api_key(&mut self, api_key: &str) {
        let trimmed = api_key.trim();
        self.openweather.api_key = (!trimmed.is_empty()).then(|| trimmed.to_string());
    }

    pub fn has_api_key(&self) -> bool {
        self.openweather.api_key.is_some()
    }
}
