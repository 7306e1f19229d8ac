use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use crate::{Error, Result};

/// Where weather and news data come from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSourceKind {
    #[default]
    Live,
    Mock,
}

impl FromStr for DataSourceKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "live" => Ok(Self::Live),
            "mock" => Ok(Self::Mock),
            other => Err(Error::Config(format!("unknown data source: {}", other))),
        }
    }
}

impl fmt::Display for DataSourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSourceKind::Live => write!(f, "live"),
            DataSourceKind::Mock => write!(f, "mock"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub data_source: DataSourceKind,
    pub articles_dir: PathBuf,
    pub announcements_dir: PathBuf,
    pub forecast_days: usize,
    pub weather: WeatherConfig,
    pub news: NewsConfig,
    pub refresh: RefreshConfig,
    pub server: ServerConfig,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_source: DataSourceKind::default(),
            articles_dir: PathBuf::from("articles"),
            announcements_dir: PathBuf::from("announcements"),
            forecast_days: 4,
            weather: WeatherConfig::default(),
            news: NewsConfig::default(),
            refresh: RefreshConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

impl DashboardConfig {
    /// Load from a TOML file, or fall back to defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => {
                let raw = std::fs::read_to_string(path).map_err(|e| {
                    Error::Config(format!("cannot read {}: {}", path.display(), e))
                })?;
                Self::from_toml(&raw)
            }
            None => Ok(Self::default()),
        }
    }

    pub fn from_toml(raw: &str) -> Result<Self> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.forecast_days == 0 {
            return Err(Error::Config("forecast_days must be at least 1".to_string()));
        }
        self.refresh.validate()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherConfig {
    pub api_key: Option<String>,
    pub city: String,
    /// `metric`, `imperial` or `standard`
    pub units: String,
    pub base_url: String,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            city: "London".to_string(),
            units: "metric".to_string(),
            base_url: "https://api.openweathermap.org/data/2.5".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewsConfig {
    pub api_key: Option<String>,
    pub country: String,
    pub page_size: u32,
    pub base_url: String,
}

impl Default for NewsConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            country: "us".to_string(),
            page_size: 20,
            base_url: "https://newsapi.org/v2".to_string(),
        }
    }
}

/// Timer periods, in seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RefreshConfig {
    pub articles_secs: u64,
    pub announcements_secs: u64,
    pub forecast_secs: u64,
    pub weather_secs: u64,
    pub news_secs: u64,
    pub scan_timeout_secs: u64,
    pub rotate_articles_secs: u64,
    pub rotate_announcements_secs: u64,
    pub rotate_news_secs: u64,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            articles_secs: 60,
            announcements_secs: 30,
            forecast_secs: 1800,
            weather_secs: 1800,
            news_secs: 86_400,
            scan_timeout_secs: 10,
            rotate_articles_secs: 30,
            rotate_announcements_secs: 10,
            rotate_news_secs: 20,
        }
    }
}

impl RefreshConfig {
    pub fn scan_timeout(&self) -> Duration {
        Duration::from_secs(self.scan_timeout_secs)
    }

    fn validate(&self) -> Result<()> {
        let periods = [
            ("articles_secs", self.articles_secs),
            ("announcements_secs", self.announcements_secs),
            ("forecast_secs", self.forecast_secs),
            ("weather_secs", self.weather_secs),
            ("news_secs", self.news_secs),
            ("scan_timeout_secs", self.scan_timeout_secs),
            ("rotate_articles_secs", self.rotate_articles_secs),
            ("rotate_announcements_secs", self.rotate_announcements_secs),
            ("rotate_news_secs", self.rotate_news_secs),
        ];
        match periods.iter().find(|(_, secs)| *secs == 0) {
            Some((name, _)) => Err(Error::Config(format!("refresh.{} must be non-zero", name))),
            None => Ok(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:3000".to_string(),
        }
    }
}
