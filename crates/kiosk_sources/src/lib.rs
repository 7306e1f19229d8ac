pub mod directory;
pub mod forecast;
pub mod logging;
pub mod providers;

pub use directory::{AnnouncementGrouper, DirectoryArticleGrouper, DirectoryScan};
pub use forecast::ForecastBucketer;
pub use logging::{init_logging, Logger};
pub use providers::{create_news_provider, create_weather_provider};

pub mod prelude {
    pub use super::directory::DirectoryScan;
    pub use kiosk_core::{Article, Announcement, DayForecast, Error, Result};
}
