use crate::application::controller::{DEFAULT_REFRESH_INTERVAL, MAX_REFRESH_INTERVAL};
use crate::domain::query::{DEFAULT_DAYS, DEFAULT_HOURS};
use anyhow::{Context, bail};
use serde::Deserialize;
use std::net::SocketAddr;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct DashboardConfig {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub api: ApiSettings,
    #[serde(default)]
    pub refresh: RefreshSettings,
    #[serde(default)]
    pub panels: PanelSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    #[serde(default = "default_bind")]
    pub bind: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApiSettings {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Serve generated data without contacting the API.
    #[serde(default = "default_mock_mode")]
    pub mock_mode: bool,
    #[serde(default = "default_timeout_secs")]
    pub request_timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RefreshSettings {
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PanelSettings {
    #[serde(default = "default_recent_limit")]
    pub recent_limit: u32,
    #[serde(default = "default_history_days")]
    pub history_days: u32,
    #[serde(default = "default_history_hours")]
    pub history_hours: u32,
}

fn default_bind() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_base_url() -> String {
    "http://localhost:8123/api".to_string()
}

fn default_mock_mode() -> bool {
    true
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_interval_secs() -> u64 {
    DEFAULT_REFRESH_INTERVAL.as_secs()
}

fn default_recent_limit() -> u32 {
    5
}

fn default_history_days() -> u32 {
    DEFAULT_DAYS
}

fn default_history_hours() -> u32 {
    DEFAULT_HOURS
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self { bind: default_bind() }
    }
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            mock_mode: default_mock_mode(),
            request_timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for RefreshSettings {
    fn default() -> Self {
        Self {
            interval_secs: default_interval_secs(),
        }
    }
}

impl Default for PanelSettings {
    fn default() -> Self {
        Self {
            recent_limit: default_recent_limit(),
            history_days: default_history_days(),
            history_hours: default_history_hours(),
        }
    }
}

impl DashboardConfig {
    pub fn validate(&self) -> anyhow::Result<()> {
        self.bind_addr()?;
        if self.api.request_timeout_secs == 0 {
            bail!("api.request_timeout_secs must be greater than zero");
        }
        if !self.api.mock_mode && self.api.base_url.trim().is_empty() {
            bail!("api.base_url is required unless api.mock_mode is enabled");
        }
        if self.refresh.interval_secs == 0 {
            bail!("refresh.interval_secs must be greater than zero");
        }
        if self.refresh.interval_secs > MAX_REFRESH_INTERVAL.as_secs() {
            bail!(
                "refresh.interval_secs must be at most {}",
                MAX_REFRESH_INTERVAL.as_secs()
            );
        }
        if self.panels.recent_limit == 0 {
            bail!("panels.recent_limit must be greater than zero");
        }
        if self.panels.history_days == 0 || self.panels.history_hours == 0 {
            bail!("panels.history_days and panels.history_hours must be greater than zero");
        }
        Ok(())
    }

    pub fn bind_addr(&self) -> anyhow::Result<SocketAddr> {
        self.server
            .bind
            .parse()
            .with_context(|| format!("invalid server.bind address '{}'", self.server.bind))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.api.request_timeout_secs)
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh.interval_secs)
    }
}

/// `config/dashboard.toml` if present, then `DASHBOARD__*` environment
/// variables, over the built-in defaults.
pub fn load_dashboard_config() -> anyhow::Result<DashboardConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/dashboard").required(false))
        .add_source(
            config::Environment::with_prefix("DASHBOARD")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()
        .context("failed to read dashboard configuration")?;

    let config: DashboardConfig = settings
        .try_deserialize()
        .context("failed to parse dashboard configuration")?;
    config.validate()?;
    Ok(config)
}
