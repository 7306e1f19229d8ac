use async_trait::async_trait;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use kiosk_core::{
    Announcement, Article, CurrentConditions, DayForecast, Error, NewsHeadline, Result, Rotation,
    Stamped,
};

use crate::{DashboardStore, Feed, FeedUpdate};

#[derive(Debug, Default)]
struct DashboardState {
    articles: Stamped<Vec<Article>>,
    announcements: Stamped<Vec<Announcement>>,
    forecast: Stamped<Vec<DayForecast>>,
    weather: Stamped<Option<CurrentConditions>>,
    news: Stamped<Vec<NewsHeadline>>,
    rotations: HashMap<Feed, Rotation>,
}

impl DashboardState {
    fn apply(&mut self, update: FeedUpdate) {
        let feed = update.feed();
        let len = update.len();
        match update {
            FeedUpdate::Articles(items) => self.articles = Stamped::now(items),
            FeedUpdate::Announcements(items) => self.announcements = Stamped::now(items),
            FeedUpdate::Forecast(items) => self.forecast = Stamped::now(items),
            FeedUpdate::Weather(current) => self.weather = Stamped::now(Some(current)),
            FeedUpdate::News(items) => self.news = Stamped::now(items),
        }
        if feed.rotates() {
            self.rotations.entry(feed).or_default().resize(len);
        }
    }

    fn rotation(&self, feed: Feed) -> Rotation {
        self.rotations.get(&feed).copied().unwrap_or_default()
    }

    fn current(&self, feed: Feed) -> Result<Option<serde_json::Value>> {
        let Some(index) = self.rotation(feed).current() else {
            return Ok(None);
        };
        match feed {
            Feed::Articles => item_at(&self.articles.items, index),
            Feed::Announcements => item_at(&self.announcements.items, index),
            Feed::News => item_at(&self.news.items, index),
            Feed::Forecast | Feed::Weather => Err(not_rotating(feed)),
        }
    }
}

fn item_at<T: Serialize>(items: &[T], index: usize) -> Result<Option<serde_json::Value>> {
    items
        .get(index)
        .map(serde_json::to_value)
        .transpose()
        .map_err(Error::from)
}

fn not_rotating(feed: Feed) -> Error {
    Error::Unsupported(format!("feed '{}' does not rotate", feed))
}

/// Keeps every feed in process memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<RwLock<DashboardState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DashboardStore for MemoryStore {
    async fn publish(&self, update: FeedUpdate) -> Result<()> {
        tracing::debug!("publishing {} ({} items)", update.feed(), update.len());
        self.state.write().await.apply(update);
        Ok(())
    }

    async fn articles(&self) -> Result<Stamped<Vec<Article>>> {
        Ok(self.state.read().await.articles.clone())
    }

    async fn announcements(&self) -> Result<Stamped<Vec<Announcement>>> {
        Ok(self.state.read().await.announcements.clone())
    }

    async fn forecast(&self) -> Result<Stamped<Vec<DayForecast>>> {
        Ok(self.state.read().await.forecast.clone())
    }

    async fn weather(&self) -> Result<Stamped<Option<CurrentConditions>>> {
        Ok(self.state.read().await.weather.clone())
    }

    async fn news(&self) -> Result<Stamped<Vec<NewsHeadline>>> {
        Ok(self.state.read().await.news.clone())
    }

    async fn advance(&self, feed: Feed) -> Result<Option<usize>> {
        if !feed.rotates() {
            return Err(not_rotating(feed));
        }
        let mut state = self.state.write().await;
        Ok(state.rotations.entry(feed).or_default().advance())
    }

    async fn current(&self, feed: Feed) -> Result<Option<serde_json::Value>> {
        if !feed.rotates() {
            return Err(not_rotating(feed));
        }
        self.state.read().await.current(feed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn article(title: &str) -> Article {
        Article {
            title: title.to_string(),
            description: format!("{} body", title),
            image_path: None,
        }
    }

    #[tokio::test]
    async fn test_empty_store() {
        let store = MemoryStore::new();
        let articles = store.articles().await.unwrap();
        assert!(articles.items.is_empty());
        assert!(articles.refreshed_at.is_none());
        assert!(store.weather().await.unwrap().items.is_none());
        assert_eq!(store.current(Feed::Articles).await.unwrap(), None);
        assert_eq!(store.advance(Feed::Articles).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_last_publish_wins() {
        let store = MemoryStore::new();
        store
            .publish(FeedUpdate::Articles(vec![article("one"), article("two")]))
            .await
            .unwrap();
        store
            .publish(FeedUpdate::Articles(vec![article("three")]))
            .await
            .unwrap();

        let articles = store.articles().await.unwrap();
        assert_eq!(articles.items, vec![article("three")]);
        assert!(articles.refreshed_at.unwrap() <= Utc::now());
    }

    #[tokio::test]
    async fn test_rotation_follows_published_items() {
        let store = MemoryStore::new();
        store
            .publish(FeedUpdate::Articles(vec![
                article("one"),
                article("two"),
                article("three"),
            ]))
            .await
            .unwrap();

        let current = store.current(Feed::Articles).await.unwrap().unwrap();
        assert_eq!(current["title"], "one");

        assert_eq!(store.advance(Feed::Articles).await.unwrap(), Some(1));
        assert_eq!(store.advance(Feed::Articles).await.unwrap(), Some(2));
        let current = store.current(Feed::Articles).await.unwrap().unwrap();
        assert_eq!(current["title"], "three");

        // Shrinking the feed restarts the rotation.
        store
            .publish(FeedUpdate::Articles(vec![article("four")]))
            .await
            .unwrap();
        let current = store.current(Feed::Articles).await.unwrap().unwrap();
        assert_eq!(current["title"], "four");

        store.publish(FeedUpdate::Articles(Vec::new())).await.unwrap();
        assert_eq!(store.current(Feed::Articles).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_rotations_are_per_feed() {
        let store = MemoryStore::new();
        store
            .publish(FeedUpdate::Announcements(vec![
                Announcement {
                    content: "first".to_string(),
                },
                Announcement {
                    content: "second".to_string(),
                },
            ]))
            .await
            .unwrap();
        store
            .publish(FeedUpdate::Articles(vec![article("a"), article("b")]))
            .await
            .unwrap();

        store.advance(Feed::Announcements).await.unwrap();

        let announcement = store.current(Feed::Announcements).await.unwrap().unwrap();
        assert_eq!(announcement["content"], "second");
        let current = store.current(Feed::Articles).await.unwrap().unwrap();
        assert_eq!(current["title"], "a");
    }

    #[tokio::test]
    async fn test_non_rotating_feeds_are_rejected() {
        let store = MemoryStore::new();
        assert!(matches!(
            store.advance(Feed::Forecast).await,
            Err(Error::Unsupported(_))
        ));
        assert!(matches!(
            store.current(Feed::Weather).await,
            Err(Error::Unsupported(_))
        ));
    }

    #[tokio::test]
    async fn test_weather_snapshot() {
        let store = MemoryStore::new();
        let current = CurrentConditions {
            location: "Peoria".to_string(),
            temperature: 21.0,
            feels_like: 20.0,
            humidity: 50,
            wind_speed: 2.0,
            condition: "Clear".to_string(),
            description: "clear sky".to_string(),
            observed_at: Utc::now(),
        };
        store.publish(FeedUpdate::Weather(current.clone())).await.unwrap();
        assert_eq!(store.weather().await.unwrap().items, Some(current));
    }
}
