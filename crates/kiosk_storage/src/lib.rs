use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use kiosk_core::{
    Announcement, Article, CurrentConditions, DayForecast, Error, NewsHeadline, Result, Stamped,
};

pub mod backends;

pub use backends::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Feed {
    Articles,
    Announcements,
    Forecast,
    Weather,
    News,
}

impl Feed {
    pub const ALL: [Feed; 5] = [
        Feed::Articles,
        Feed::Announcements,
        Feed::Forecast,
        Feed::Weather,
        Feed::News,
    ];

    /// Feeds shown one item at a time.
    pub fn rotates(&self) -> bool {
        matches!(self, Feed::Articles | Feed::Announcements | Feed::News)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Feed::Articles => "articles",
            Feed::Announcements => "announcements",
            Feed::Forecast => "forecast",
            Feed::Weather => "weather",
            Feed::News => "news",
        }
    }
}

impl fmt::Display for Feed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Feed {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Feed::ALL
            .into_iter()
            .find(|feed| feed.as_str() == s)
            .ok_or_else(|| Error::Unsupported(format!("unknown feed: {}", s)))
    }
}

/// A completed refresh of one feed.
#[derive(Debug, Clone, PartialEq)]
pub enum FeedUpdate {
    Articles(Vec<Article>),
    Announcements(Vec<Announcement>),
    Forecast(Vec<DayForecast>),
    Weather(CurrentConditions),
    News(Vec<NewsHeadline>),
}

impl FeedUpdate {
    pub fn feed(&self) -> Feed {
        match self {
            FeedUpdate::Articles(_) => Feed::Articles,
            FeedUpdate::Announcements(_) => Feed::Announcements,
            FeedUpdate::Forecast(_) => Feed::Forecast,
            FeedUpdate::Weather(_) => Feed::Weather,
            FeedUpdate::News(_) => Feed::News,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            FeedUpdate::Articles(items) => items.len(),
            FeedUpdate::Announcements(items) => items.len(),
            FeedUpdate::Forecast(items) => items.len(),
            FeedUpdate::Weather(_) => 1,
            FeedUpdate::News(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Latest snapshot of every feed. A publish replaces the whole feed.
#[async_trait]
pub trait DashboardStore: Send + Sync {
    async fn publish(&self, update: FeedUpdate) -> Result<()>;

    async fn articles(&self) -> Result<Stamped<Vec<Article>>>;

    async fn announcements(&self) -> Result<Stamped<Vec<Announcement>>>;

    async fn forecast(&self) -> Result<Stamped<Vec<DayForecast>>>;

    async fn weather(&self) -> Result<Stamped<Option<CurrentConditions>>>;

    async fn news(&self) -> Result<Stamped<Vec<NewsHeadline>>>;

    /// Move a rotating feed to its next item, returning the new index
    async fn advance(&self, feed: Feed) -> Result<Option<usize>>;

    /// The item a rotating feed currently shows
    async fn current(&self, feed: Feed) -> Result<Option<serde_json::Value>>;
}

pub mod prelude {
    pub use super::backends::*;
    pub use super::{DashboardStore, Feed, FeedUpdate};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feed_round_trips_through_str() {
        for feed in Feed::ALL {
            assert_eq!(feed.to_string().parse::<Feed>().unwrap(), feed);
        }
        assert!("sports".parse::<Feed>().is_err());
    }

    #[test]
    fn test_only_list_feeds_rotate() {
        let rotating: Vec<Feed> = Feed::ALL.into_iter().filter(Feed::rotates).collect();
        assert_eq!(rotating, vec![Feed::Articles, Feed::Announcements, Feed::News]);
    }
}
