pub mod config;
pub mod error;
pub mod providers;
pub mod rotation;
pub mod types;

pub use config::{DashboardConfig, DataSourceKind};
pub use error::{Error, Result};
pub use providers::{NewsProvider, WeatherProvider};
pub use rotation::Rotation;
pub use types::{
    Announcement, Article, CurrentConditions, DayForecast, ForecastSample, NewsHeadline, Stamped,
};
