use anyhow::{Context, Result};
use config::{Config, File};
use indexmap::IndexMap;
use log::{debug, info, warn, LevelFilter};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::poller::{Device, PollPolicy};

pub const CONFIG_ENV: &str = "DEVMON_CONFIG";

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub url: String,
    /// 0 leaves requests without a timeout.
    #[serde(default)]
    pub timeout_ms: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PollingConfig {
    #[serde(default = "default_halt_on_failure")]
    pub halt_on_failure: bool,
}

fn default_halt_on_failure() -> bool {
    true
}

#[derive(Debug, Deserialize, Clone)]
pub struct DashboardConfig {
    pub file: String,
    pub enabled: bool,
    pub save_to_file: bool,
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
    #[serde(default = "default_interval")]
    pub interval: u64,
    #[serde(default)]
    pub font: Option<String>,
}

fn default_width() -> u32 {
    480
}

fn default_height() -> u32 {
    320
}

fn default_interval() -> u64 {
    1000
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    #[serde(rename = "server", alias = "SERVER")]
    pub server: ServerConfig,
    #[serde(rename = "polling", alias = "POLLING", default)]
    pub polling: PollingConfig,
    #[serde(rename = "dashboard", alias = "DASHBOARD")]
    pub dashboard: DashboardConfig,
    #[serde(rename = "logging", alias = "LOGGING", default)]
    pub logging: LoggingConfig,
    /// Device name to device type, e.g. `clk1 = Clock`.
    #[serde(rename = "devices", alias = "DEVICES", default)]
    pub devices: IndexMap<String, String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:8000".to_string(),
            timeout_ms: 0,
        }
    }
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            halt_on_failure: default_halt_on_failure(),
        }
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            file: "dashboard.png".to_string(),
            enabled: true,
            save_to_file: false,
            width: default_width(),
            height: default_height(),
            interval: default_interval(),
            font: None,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            polling: PollingConfig::default(),
            dashboard: DashboardConfig::default(),
            logging: LoggingConfig::default(),
            devices: IndexMap::new(),
        }
    }
}

impl AppConfig {
    pub fn new() -> Result<Self> {
        let path = std::env::var(CONFIG_ENV).unwrap_or_else(|_| "config.ini".to_string());
        Self::from_file(path)
    }

    pub fn get_log_level(&self) -> LevelFilter {
        match self.logging.level.to_lowercase().as_str() {
            "trace" => LevelFilter::Trace,
            "debug" => LevelFilter::Debug,
            "info" => LevelFilter::Info,
            "warn" => LevelFilter::Warn,
            "error" => LevelFilter::Error,
            "off" => LevelFilter::Off,
            _ => LevelFilter::Info, // Default to Info if invalid
        }
    }

    pub fn timeout(&self) -> Option<Duration> {
        match self.server.timeout_ms {
            0 => None,
            ms => Some(Duration::from_millis(ms)),
        }
    }

    pub fn poll_policy(&self) -> PollPolicy {
        PollPolicy {
            halt_on_failure: self.polling.halt_on_failure,
        }
    }

    /// Instantiates the configured devices. Unknown types are skipped.
    pub fn build_devices(&self) -> Vec<Device> {
        self.devices
            .iter()
            .filter_map(|(name, tag)| {
                let device = Device::new(tag, name);
                if device.is_none() {
                    warn!("Skipping device {}: unknown type {:?}", name, tag);
                }
                device
            })
            .collect()
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config_path = path.as_ref();
        debug!("Loading configuration from {}", config_path.display());

        let config = Config::builder()
            .add_source(File::with_name(config_path.to_str().unwrap_or("")).format(config::FileFormat::Ini))
            .build()
            .context(format!("Failed to load config from {}", config_path.display()))?;

        let app_config: AppConfig = config.try_deserialize()
            .context("Failed to deserialize config")?;

        Ok(app_config)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let config_path = path.as_ref();

        let mut config_str = String::new();

        config_str.push_str(&format!(
            "[server]\nurl = {}\ntimeout_ms = {}\n\n",
            self.server.url, self.server.timeout_ms
        ));

        config_str.push_str(&format!(
            "[polling]\nhalt_on_failure = {}\n\n",
            self.polling.halt_on_failure
        ));

        config_str.push_str(&format!(
            "[dashboard]\nfile = {}\nenabled = {}\nsave_to_file = {}\nwidth = {}\nheight = {}\ninterval = {}\n",
            self.dashboard.file,
            self.dashboard.enabled,
            self.dashboard.save_to_file,
            self.dashboard.width,
            self.dashboard.height,
            self.dashboard.interval
        ));
        if let Some(font) = &self.dashboard.font {
            config_str.push_str(&format!("font = {}\n", font));
        }
        config_str.push('\n');

        config_str.push_str(&format!("[logging]\nlevel = {}\n\n", self.logging.level));

        if !self.devices.is_empty() {
            config_str.push_str("[devices]\n");
            for (name, tag) in &self.devices {
                config_str.push_str(&format!("{} = {}\n", name, tag));
            }
        }

        fs::write(config_path, config_str)
            .context(format!("Failed to save config to {}", config_path.display()))?;

        info!("Configuration saved to {}", config_path.display());
        Ok(())
    }
}
