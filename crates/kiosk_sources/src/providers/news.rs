use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use reqwest::Client;
use serde::Deserialize;
use std::fmt;
use url::Url;

use kiosk_core::config::NewsConfig;
use kiosk_core::{Error, NewsHeadline, NewsProvider, Result};

const PROVIDER: &str = "NewsAPI";

#[derive(Deserialize)]
struct HeadlinesResponse {
    status: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    articles: Vec<ApiArticle>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiArticle {
    #[serde(default)]
    source: Option<ApiSource>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    url_to_image: Option<String>,
    #[serde(default)]
    published_at: Option<DateTime<Utc>>,
}

#[derive(Deserialize)]
struct ApiSource {
    #[serde(default)]
    name: Option<String>,
}

/// Decode a `top-headlines` body. Articles without a title are dropped.
pub fn decode_headlines(body: &str) -> Result<Vec<NewsHeadline>> {
    let response: HeadlinesResponse = serde_json::from_str(body)?;
    if response.status != "ok" {
        return Err(Error::Upstream {
            provider: PROVIDER.to_string(),
            message: response
                .message
                .unwrap_or_else(|| format!("status {}", response.status)),
        });
    }
    Ok(response
        .articles
        .into_iter()
        .filter_map(|article| {
            let title = article.title.filter(|t| !t.trim().is_empty())?;
            Some(NewsHeadline {
                title,
                description: article.description,
                url: article.url.unwrap_or_default(),
                image_url: article.url_to_image,
                source: article
                    .source
                    .and_then(|s| s.name)
                    .unwrap_or_else(|| "Unknown".to_string()),
                published_at: article.published_at,
            })
        })
        .collect())
}

pub struct NewsApiClient {
    client: Client,
    api_key: String,
    country: String,
    page_size: u32,
    base_url: String,
}

impl fmt::Debug for NewsApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewsApiClient")
            .field("client", &"<reqwest::Client>")
            .field("api_key", &"<redacted>")
            .field("country", &self.country)
            .field("page_size", &self.page_size)
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl NewsApiClient {
    pub fn new(config: &NewsConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| Error::Config("NewsAPI key is required".to_string()))?;
        Ok(Self {
            client: super::http_client()?,
            api_key,
            country: config.country.clone(),
            page_size: config.page_size,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self) -> Result<Url> {
        let page_size = self.page_size.to_string();
        Url::parse_with_params(
            &format!("{}/top-headlines", self.base_url),
            &[
                ("country", self.country.as_str()),
                ("pageSize", page_size.as_str()),
                ("apiKey", self.api_key.as_str()),
            ],
        )
        .map_err(|e| Error::Config(format!("invalid news base_url: {}", e)))
    }
}

#[async_trait]
impl NewsProvider for NewsApiClient {
    fn name(&self) -> &str {
        PROVIDER
    }

    async fn headlines(&self) -> Result<Vec<NewsHeadline>> {
        // Error bodies share the success envelope, so the status code is not checked here.
        let body = self.client.get(self.endpoint()?).send().await?.text().await?;
        let headlines = decode_headlines(&body)?;
        tracing::debug!("{} returned {} headlines", PROVIDER, headlines.len());
        Ok(headlines)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MockNews;

#[async_trait]
impl NewsProvider for MockNews {
    fn name(&self) -> &str {
        "Mock news"
    }

    async fn headlines(&self) -> Result<Vec<NewsHeadline>> {
        let published_at = Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).single();
        let headline = |title: &str, source: &str, slug: &str| NewsHeadline {
            title: title.to_string(),
            description: Some(format!("{} (sample data)", title)),
            url: format!("https://news.example.com/{}", slug),
            image_url: None,
            source: source.to_string(),
            published_at,
        };
        Ok(vec![
            headline("Markets open higher on tech earnings", "Example Wire", "markets"),
            headline("City council approves new transit line", "Example Times", "transit"),
            headline("Researchers map deep-sea volcano", "Example Science", "volcano"),
        ])
    }
}
