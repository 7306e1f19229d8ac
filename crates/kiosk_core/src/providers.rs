use async_trait::async_trait;
use std::fmt;

use crate::types::{CurrentConditions, ForecastSample, NewsHeadline};
use crate::Result;

#[async_trait]
pub trait WeatherProvider: Send + Sync + fmt::Debug {
    fn name(&self) -> &str;

    /// Current conditions for the configured location
    async fn current(&self) -> Result<CurrentConditions>;

    /// Flat list of timestamped forecast points, in provider order
    async fn forecast_samples(&self) -> Result<Vec<ForecastSample>>;
}

#[async_trait]
pub trait NewsProvider: Send + Sync + fmt::Debug {
    fn name(&self) -> &str;

    /// Latest world-news headlines
    async fn headlines(&self) -> Result<Vec<NewsHeadline>>;
}
