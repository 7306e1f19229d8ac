use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use reqwest::Client;
use serde::Deserialize;
use std::fmt;
use url::Url;

use kiosk_core::config::WeatherConfig;
use kiosk_core::{CurrentConditions, Error, ForecastSample, Result, WeatherProvider};

const PROVIDER: &str = "OpenWeatherMap";

#[derive(Deserialize)]
struct ForecastResponse {
    list: Vec<ForecastItem>,
}

#[derive(Deserialize)]
struct ForecastItem {
    dt: i64,
    main: MainBlock,
    #[serde(default)]
    weather: Vec<WeatherBlock>,
}

#[derive(Deserialize)]
struct CurrentResponse {
    name: String,
    dt: i64,
    main: MainBlock,
    #[serde(default)]
    weather: Vec<WeatherBlock>,
    #[serde(default)]
    wind: Option<WindBlock>,
}

#[derive(Deserialize)]
struct MainBlock {
    temp: f64,
    #[serde(default)]
    feels_like: Option<f64>,
    #[serde(default)]
    humidity: Option<u8>,
}

#[derive(Deserialize)]
struct WeatherBlock {
    main: String,
    #[serde(default)]
    description: String,
}

#[derive(Deserialize)]
struct WindBlock {
    speed: f64,
}

#[derive(Deserialize)]
struct ErrorResponse {
    message: String,
}

/// Decode a `/forecast` body into samples, keeping provider order.
pub fn decode_forecast(body: &str) -> Result<Vec<ForecastSample>> {
    let response: ForecastResponse = serde_json::from_str(body)?;
    Ok(response
        .list
        .into_iter()
        .map(|item| ForecastSample {
            timestamp_seconds: item.dt,
            temperature: item.main.temp,
            condition_label: item
                .weather
                .into_iter()
                .next()
                .map(|w| w.main)
                .unwrap_or_default(),
        })
        .collect())
}

/// Decode a `/weather` body.
pub fn decode_current(body: &str) -> Result<CurrentConditions> {
    let response: CurrentResponse = serde_json::from_str(body)?;
    let observed_at = DateTime::<Utc>::from_timestamp(response.dt, 0).ok_or_else(|| {
        Error::Upstream {
            provider: PROVIDER.to_string(),
            message: format!("invalid observation time {}", response.dt),
        }
    })?;
    let (condition, description) = response
        .weather
        .into_iter()
        .next()
        .map(|w| (w.main, w.description))
        .unwrap_or_default();
    Ok(CurrentConditions {
        location: response.name,
        temperature: response.main.temp,
        feels_like: response.main.feels_like.unwrap_or(response.main.temp),
        humidity: response.main.humidity.unwrap_or_default(),
        wind_speed: response.wind.map(|w| w.speed).unwrap_or_default(),
        condition,
        description,
        observed_at,
    })
}

pub struct OpenWeatherClient {
    client: Client,
    api_key: String,
    city: String,
    units: String,
    base_url: String,
}

impl fmt::Debug for OpenWeatherClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenWeatherClient")
            .field("client", &"<reqwest::Client>")
            .field("api_key", &"<redacted>")
            .field("city", &self.city)
            .field("units", &self.units)
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl OpenWeatherClient {
    pub fn new(config: &WeatherConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| Error::Config("OpenWeatherMap API key is required".to_string()))?;
        Ok(Self {
            client: super::http_client()?,
            api_key,
            city: config.city.clone(),
            units: config.units.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        Url::parse_with_params(
            &format!("{}/{}", self.base_url, path),
            &[
                ("q", self.city.as_str()),
                ("units", self.units.as_str()),
                ("appid", self.api_key.as_str()),
            ],
        )
        .map_err(|e| Error::Config(format!("invalid weather base_url: {}", e)))
    }

    async fn get(&self, path: &str) -> Result<String> {
        let response = self.client.get(self.endpoint(path)?).send().await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            let message = serde_json::from_str::<ErrorResponse>(&body)
                .map(|e| e.message)
                .unwrap_or_else(|_| status.to_string());
            return Err(Error::Upstream {
                provider: PROVIDER.to_string(),
                message,
            });
        }
        Ok(body)
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherClient {
    fn name(&self) -> &str {
        PROVIDER
    }

    async fn current(&self) -> Result<CurrentConditions> {
        decode_current(&self.get("weather").await?)
    }

    async fn forecast_samples(&self) -> Result<Vec<ForecastSample>> {
        let samples = decode_forecast(&self.get("forecast").await?)?;
        tracing::debug!("{} returned {} forecast samples", PROVIDER, samples.len());
        Ok(samples)
    }
}

/// Synthetic weather for development and demos.
#[derive(Debug, Clone)]
pub struct MockWeather {
    start: NaiveDate,
}

impl Default for MockWeather {
    fn default() -> Self {
        Self::new()
    }
}

impl MockWeather {
    const CONDITIONS: [&'static str; 4] = ["Clear", "Clouds", "Rain", "Clouds"];
    const DAYS: i64 = 5;
    const STEP_HOURS: i64 = 3;

    pub fn new() -> Self {
        Self::starting(Utc::now().date_naive())
    }

    pub fn starting(start: NaiveDate) -> Self {
        Self { start }
    }

    fn samples(&self) -> Vec<ForecastSample> {
        let Some(midnight) = self.start.and_hms_opt(0, 0, 0) else {
            return Vec::new();
        };
        let origin = midnight.and_utc();
        (0..Self::DAYS * 24 / Self::STEP_HOURS)
            .map(|step| {
                let at = origin + Duration::hours(step * Self::STEP_HOURS);
                let day = (step * Self::STEP_HOURS / 24) as usize;
                let hour = step * Self::STEP_HOURS % 24;
                // Warmest mid-afternoon, one degree warmer each day.
                let temperature = 10.0 + day as f64 - ((hour - 15).abs() as f64) / 3.0;
                ForecastSample::new(
                    at.timestamp(),
                    temperature,
                    Self::CONDITIONS[day % Self::CONDITIONS.len()],
                )
            })
            .collect()
    }
}

#[async_trait]
impl WeatherProvider for MockWeather {
    fn name(&self) -> &str {
        "Mock weather"
    }

    async fn current(&self) -> Result<CurrentConditions> {
        Ok(CurrentConditions {
            location: "Mockville".to_string(),
            temperature: 12.5,
            feels_like: 11.0,
            humidity: 64,
            wind_speed: 3.2,
            condition: "Clouds".to_string(),
            description: "scattered clouds".to_string(),
            observed_at: Utc::now(),
        })
    }

    async fn forecast_samples(&self) -> Result<Vec<ForecastSample>> {
        Ok(self.samples())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forecast::ForecastBucketer;

    const FORECAST_BODY: &str = r#"{
        "cod": "200",
        "cnt": 3,
        "list": [
            {"dt": 1714564800, "main": {"temp": 14.2, "humidity": 70}, "weather": [{"id": 500, "main": "Rain", "description": "light rain"}]},
            {"dt": 1714575600, "main": {"temp": 16.8}, "weather": [{"id": 800, "main": "Clear", "description": "clear sky"}]},
            {"dt": 1714586400, "main": {"temp": 12.1}, "weather": []}
        ],
        "city": {"name": "London"}
    }"#;

    const CURRENT_BODY: &str = r#"{
        "name": "London",
        "dt": 1714564800,
        "main": {"temp": 15.0, "feels_like": 14.1, "humidity": 72},
        "weather": [{"main": "Clouds", "description": "broken clouds"}],
        "wind": {"speed": 4.6}
    }"#;

    #[test]
    fn test_decode_forecast() {
        let samples = decode_forecast(FORECAST_BODY).unwrap();
        assert_eq!(samples.len(), 3);
        assert_eq!(samples[0], ForecastSample::new(1714564800, 14.2, "Rain"));
        assert_eq!(samples[1].condition_label, "Clear");
        assert_eq!(samples[2].condition_label, "");
    }

    #[test]
    fn test_decode_current() {
        let current = decode_current(CURRENT_BODY).unwrap();
        assert_eq!(current.location, "London");
        assert_eq!(current.temperature, 15.0);
        assert_eq!(current.feels_like, 14.1);
        assert_eq!(current.humidity, 72);
        assert_eq!(current.wind_speed, 4.6);
        assert_eq!(current.condition, "Clouds");
        assert_eq!(current.description, "broken clouds");
        assert_eq!(current.observed_at.timestamp(), 1714564800);
    }

    #[test]
    fn test_decode_forecast_rejects_garbage() {
        assert!(matches!(
            decode_forecast("{\"cod\": \"401\"}"),
            Err(Error::Serialization(_))
        ));
    }

    #[test]
    fn test_endpoint_carries_query() {
        let config = WeatherConfig {
            api_key: Some("secret".to_string()),
            city: "São Paulo".to_string(),
            base_url: "https://api.example.com/data/2.5/".to_string(),
            ..WeatherConfig::default()
        };
        let client = OpenWeatherClient::new(&config).unwrap();
        let url = client.endpoint("forecast").unwrap();
        assert_eq!(url.path(), "/data/2.5/forecast");
        let query: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert!(query.contains(&("q".to_string(), "São Paulo".to_string())));
        assert!(query.contains(&("units".to_string(), "metric".to_string())));
        assert!(query.contains(&("appid".to_string(), "secret".to_string())));
        assert!(!format!("{:?}", client).contains("secret"));
    }

    #[test]
    fn test_empty_key_is_a_config_error() {
        let config = WeatherConfig {
            api_key: Some(String::new()),
            ..WeatherConfig::default()
        };
        assert!(matches!(OpenWeatherClient::new(&config), Err(Error::Config(_))));
    }

    #[tokio::test]
    async fn test_mock_weather_buckets_into_requested_days() {
        let start = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let weather = MockWeather::starting(start);
        let samples = weather.forecast_samples().await.unwrap();
        assert_eq!(samples.len(), 40);

        let days = ForecastBucketer::new(4).bucket_at(&samples, start);
        assert_eq!(days.len(), 4);
        assert_eq!(days[0].date, "2024-05-01");
        assert_eq!(days[0].condition.as_deref(), Some("Clear"));
        assert_eq!(days[2].condition.as_deref(), Some("Rain"));
        assert!(days.iter().all(|d| d.temp_min <= d.temp_max));
    }
}
