//! Periodic refresh of every dashboard feed.
//!
//! Each feed has its own timer. A refresh is a full re-read of its source and
//! its result replaces the stored snapshot. Directory scans fail to an empty
//! snapshot (including on timeout); provider failures keep the previous one.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use kiosk_core::config::RefreshConfig;
use kiosk_core::{DashboardConfig, NewsProvider, Result, WeatherProvider};
use kiosk_sources::{
    AnnouncementGrouper, DirectoryArticleGrouper, DirectoryScan, ForecastBucketer, Logger,
};
use kiosk_storage::{DashboardStore, Feed, FeedUpdate};

pub struct Refresher {
    store: Arc<dyn DashboardStore>,
    weather: Arc<dyn WeatherProvider>,
    news: Arc<dyn NewsProvider>,
    articles: DirectoryArticleGrouper,
    announcements: AnnouncementGrouper,
    bucketer: ForecastBucketer,
    periods: RefreshConfig,
}

impl Refresher {
    pub fn new(
        config: &DashboardConfig,
        store: Arc<dyn DashboardStore>,
        weather: Arc<dyn WeatherProvider>,
        news: Arc<dyn NewsProvider>,
    ) -> Self {
        Self {
            store,
            weather,
            news,
            articles: DirectoryArticleGrouper::new(&config.articles_dir),
            announcements: AnnouncementGrouper::new(&config.announcements_dir),
            bucketer: ForecastBucketer::new(config.forecast_days),
            periods: config.refresh.clone(),
        }
    }

    pub async fn refresh_articles(&self) -> Result<()> {
        let articles = scan_with_timeout(self.articles.clone(), self.periods.scan_timeout()).await;
        self.store.publish(FeedUpdate::Articles(articles)).await
    }

    pub async fn refresh_announcements(&self) -> Result<()> {
        let announcements =
            scan_with_timeout(self.announcements.clone(), self.periods.scan_timeout()).await;
        self.store
            .publish(FeedUpdate::Announcements(announcements))
            .await
    }

    pub async fn refresh_forecast(&self) -> Result<()> {
        let samples = self.weather.forecast_samples().await?;
        let days = self.bucketer.bucket(&samples);
        self.store.publish(FeedUpdate::Forecast(days)).await
    }

    pub async fn refresh_weather(&self) -> Result<()> {
        let current = self.weather.current().await?;
        self.store.publish(FeedUpdate::Weather(current)).await
    }

    pub async fn refresh_news(&self) -> Result<()> {
        let headlines = self.news.headlines().await?;
        self.store.publish(FeedUpdate::News(headlines)).await
    }

    pub async fn refresh(&self, feed: Feed) {
        let result = match feed {
            Feed::Articles => self.refresh_articles().await,
            Feed::Announcements => self.refresh_announcements().await,
            Feed::Forecast => self.refresh_forecast().await,
            Feed::Weather => self.refresh_weather().await,
            Feed::News => self.refresh_news().await,
        };
        if let Err(e) = result {
            Logger::for_feed(feed.as_str())
                .warn(&format!("refresh failed, keeping previous snapshot: {}", e));
        }
    }

    /// Refresh every feed once.
    pub async fn refresh_all(&self) {
        for feed in Feed::ALL {
            self.refresh(feed).await;
        }
    }

    fn period(&self, feed: Feed) -> Duration {
        Duration::from_secs(match feed {
            Feed::Articles => self.periods.articles_secs,
            Feed::Announcements => self.periods.announcements_secs,
            Feed::Forecast => self.periods.forecast_secs,
            Feed::Weather => self.periods.weather_secs,
            Feed::News => self.periods.news_secs,
        })
    }

    fn rotation_period(&self, feed: Feed) -> Option<Duration> {
        let secs = match feed {
            Feed::Articles => self.periods.rotate_articles_secs,
            Feed::Announcements => self.periods.rotate_announcements_secs,
            Feed::News => self.periods.rotate_news_secs,
            Feed::Forecast | Feed::Weather => return None,
        };
        Some(Duration::from_secs(secs))
    }

    /// Start one refresh timer per feed and one rotation timer per rotating feed.
    pub fn spawn(self: Arc<Self>) -> Vec<JoinHandle<()>> {
        let mut handles = Vec::new();
        for feed in Feed::ALL {
            let refresher = self.clone();
            handles.push(every(self.period(feed), Duration::ZERO, move || {
                let refresher = refresher.clone();
                async move { refresher.refresh(feed).await }
            }));

            if let Some(period) = self.rotation_period(feed) {
                let store = self.store.clone();
                handles.push(every(period, period, move || {
                    let store = store.clone();
                    async move {
                        if let Err(e) = store.advance(feed).await {
                            Logger::for_feed(feed.as_str()).error(&format!("rotation failed: {}", e));
                        }
                    }
                }));
            }
        }
        tracing::info!("started {} dashboard timers", handles.len());
        handles
    }
}

fn every<F, Fut>(period: Duration, first_delay: Duration, mut task: F) -> JoinHandle<()>
where
    F: FnMut() -> Fut + Send + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    tokio::spawn(async move {
        let mut ticker = interval_at(Instant::now() + first_delay, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            task().await;
        }
    })
}

/// Run a blocking directory scan; a timeout counts as a failed scan.
async fn scan_with_timeout<S>(scanner: S, timeout: Duration) -> Vec<S::Item>
where
    S: DirectoryScan + Send + 'static,
    S::Item: Send + 'static,
{
    let logger = Logger::for_feed(scanner.feed());
    match tokio::time::timeout(timeout, tokio::task::spawn_blocking(move || scanner.scan())).await
    {
        Ok(Ok(items)) => items,
        Ok(Err(e)) => {
            logger.error(&format!("scan task failed: {}", e));
            Vec::new()
        }
        Err(_) => {
            logger.error(&format!("scan timed out after {:?}", timeout));
            Vec::new()
        }
    }
}
