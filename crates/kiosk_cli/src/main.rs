use clap::Parser;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, Level};

use kiosk_core::{DashboardConfig, DataSourceKind, Result};
use kiosk_sources::{
    create_news_provider, create_weather_provider, init_logging, AnnouncementGrouper,
    DirectoryArticleGrouper, DirectoryScan, ForecastBucketer,
};
use kiosk_storage::{DashboardStore, MemoryStore};
use kiosk_web::{create_app, AppState, Refresher};

mod duration;

use duration::HumanDuration;

#[derive(Parser, Debug)]
#[command(author, version, about = "Data service for the lobby kiosk dashboard", long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(long, global = true, env = "KIOSK_CONFIG")]
    config: Option<PathBuf>,
    /// Serve synthetic weather and news instead of calling the live APIs
    #[arg(long, global = true)]
    mock: bool,
    #[arg(long, global = true, env = "KIOSK_WEATHER_API_KEY", hide_env_values = true)]
    weather_api_key: Option<String>,
    #[arg(long, global = true, env = "KIOSK_NEWS_API_KEY", hide_env_values = true)]
    news_api_key: Option<String>,
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Run the refresh timers and the HTTP API
    Serve {
        /// Address to listen on (e.g. 0.0.0.0:3000)
        #[arg(long)]
        bind: Option<String>,
    },
    /// Scan the articles directory and print the records
    Articles {
        #[arg(env = "KIOSK_ARTICLES_DIR")]
        dir: Option<PathBuf>,
        /// Re-scan periodically (e.g. 30s, 1m30s)
        #[arg(long)]
        interval: Option<HumanDuration>,
    },
    /// Scan the announcements directory and print the records
    Announcements {
        #[arg(env = "KIOSK_ANNOUNCEMENTS_DIR")]
        dir: Option<PathBuf>,
        #[arg(long)]
        interval: Option<HumanDuration>,
    },
    /// Fetch the forecast and print the next days
    Forecast {
        #[arg(long)]
        days: Option<usize>,
    },
    /// Print current conditions
    Weather,
    /// Print world-news headlines
    News,
}

fn load_config(cli: &Cli) -> Result<DashboardConfig> {
    let mut config = DashboardConfig::load(cli.config.as_deref())?;
    if cli.mock {
        config.data_source = DataSourceKind::Mock;
    }
    if let Some(key) = &cli.weather_api_key {
        config.weather.api_key = Some(key.clone());
    }
    if let Some(key) = &cli.news_api_key {
        config.news.api_key = Some(key.clone());
    }
    match &cli.command {
        Commands::Serve { bind: Some(bind) } => config.server.bind = bind.clone(),
        Commands::Articles { dir: Some(dir), .. } => config.articles_dir = dir.clone(),
        Commands::Announcements { dir: Some(dir), .. } => config.announcements_dir = dir.clone(),
        Commands::Forecast { days: Some(days) } => config.forecast_days = *days,
        _ => {}
    }
    config.validate()?;
    Ok(config)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn run_scan<S>(scanner: S, interval: Option<HumanDuration>) -> Result<()>
where
    S: DirectoryScan,
    S::Item: Serialize,
{
    match interval {
        Some(interval) => {
            info!("Scanning {} every {}s", scanner.root().display(), interval.0.as_secs());
            loop {
                print_json(&scanner.scan())?;
                tokio::time::sleep(interval.0).await;
            }
        }
        None => print_json(&scanner.scan()),
    }
}

async fn serve(config: DashboardConfig) -> Result<()> {
    let store: Arc<dyn DashboardStore> = Arc::new(MemoryStore::new());
    let weather = create_weather_provider(&config)?;
    let news = create_news_provider(&config)?;
    info!(
        "📡 Data sources: {} weather, {} news ({})",
        weather.name(),
        news.name(),
        config.data_source
    );

    let refresher = Arc::new(Refresher::new(&config, store.clone(), weather, news));
    let timers = refresher.spawn();

    let app = create_app(AppState { store });
    let listener = tokio::net::TcpListener::bind(&config.server.bind).await?;
    info!("🖥️ Dashboard API listening on {}", config.server.bind);
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("failed to listen for shutdown signal: {}", e);
            }
        })
        .await?;

    for timer in timers {
        timer.abort();
    }
    info!("Dashboard API stopped");
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(if cli.verbose { Level::DEBUG } else { Level::INFO });
    let config = load_config(&cli)?;

    match cli.command {
        Commands::Serve { .. } => serve(config).await,
        Commands::Articles { interval, .. } => {
            run_scan(DirectoryArticleGrouper::new(&config.articles_dir), interval).await
        }
        Commands::Announcements { interval, .. } => {
            run_scan(AnnouncementGrouper::new(&config.announcements_dir), interval).await
        }
        Commands::Forecast { .. } => {
            let weather = create_weather_provider(&config)?;
            let samples = weather.forecast_samples().await?;
            print_json(&ForecastBucketer::new(config.forecast_days).bucket(&samples))
        }
        Commands::Weather => {
            let weather = create_weather_provider(&config)?;
            print_json(&weather.current().await?)
        }
        Commands::News => {
            let news = create_news_provider(&config)?;
            print_json(&news.headlines().await?)
        }
    }
}
