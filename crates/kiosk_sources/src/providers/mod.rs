use std::sync::Arc;

use kiosk_core::{DashboardConfig, DataSourceKind, NewsProvider, Result, WeatherProvider};

pub mod news;
pub mod weather;

pub use news::{MockNews, NewsApiClient};
pub use weather::{MockWeather, OpenWeatherClient};

const USER_AGENT: &str = concat!("kiosk/", env!("CARGO_PKG_VERSION"));

pub fn create_weather_provider(config: &DashboardConfig) -> Result<Arc<dyn WeatherProvider>> {
    match config.data_source {
        DataSourceKind::Live => Ok(Arc::new(OpenWeatherClient::new(&config.weather)?)),
        DataSourceKind::Mock => Ok(Arc::new(MockWeather::new())),
    }
}

pub fn create_news_provider(config: &DashboardConfig) -> Result<Arc<dyn NewsProvider>> {
    match config.data_source {
        DataSourceKind::Live => Ok(Arc::new(NewsApiClient::new(&config.news)?)),
        DataSourceKind::Mock => Ok(Arc::new(MockNews)),
    }
}

fn http_client() -> Result<reqwest::Client> {
    Ok(reqwest::Client::builder().user_agent(USER_AGENT).build()?)
}
