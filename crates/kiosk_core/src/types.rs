use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One internal news item built from a same-stem text/image pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub title: String,
    pub description: String,
    /// Inline `data:` URI of the paired image, if any.
    pub image_path: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Announcement {
    pub content: String,
}

/// A single forecast point as returned by the weather provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastSample {
    pub timestamp_seconds: i64,
    pub temperature: f64,
    pub condition_label: String,
}

impl ForecastSample {
    pub fn new(timestamp_seconds: i64, temperature: f64, condition_label: impl Into<String>) -> Self {
        Self {
            timestamp_seconds,
            temperature,
            condition_label: condition_label.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayForecast {
    /// UTC calendar date, `YYYY-MM-DD`.
    pub date: String,
    pub temp_min: f64,
    pub temp_max: f64,
    pub condition: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub location: String,
    pub temperature: f64,
    pub feels_like: f64,
    pub humidity: u8,
    pub wind_speed: f64,
    pub condition: String,
    pub description: String,
    pub observed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsHeadline {
    pub title: String,
    pub description: Option<String>,
    pub url: String,
    pub image_url: Option<String>,
    pub source: String,
    pub published_at: Option<DateTime<Utc>>,
}

/// A feed snapshot together with the time the refresh that produced it finished.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stamped<T> {
    pub items: T,
    pub refreshed_at: Option<DateTime<Utc>>,
}

impl<T: Default> Default for Stamped<T> {
    fn default() -> Self {
        Self {
            items: T::default(),
            refreshed_at: None,
        }
    }
}

impl<T> Stamped<T> {
    pub fn now(items: T) -> Self {
        Self {
            items,
            refreshed_at: Some(Utc::now()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_article_serializes_image_path_in_camel_case() {
        let article = Article {
            title: "launch".to_string(),
            description: String::new(),
            image_path: None,
        };
        let json = serde_json::to_value(&article).unwrap();
        assert_eq!(json["title"], "launch");
        assert_eq!(json["description"], "");
        assert!(json["imagePath"].is_null());
    }

    #[test]
    fn test_day_forecast_keeps_snake_case_temperatures() {
        let day = DayForecast {
            date: "2024-05-01".to_string(),
            temp_min: 60.0,
            temp_max: 65.0,
            condition: Some("Rain".to_string()),
        };
        let json = serde_json::to_value(&day).unwrap();
        assert_eq!(json["temp_min"], 60.0);
        assert_eq!(json["temp_max"], 65.0);
        assert_eq!(json["condition"], "Rain");
    }
}
