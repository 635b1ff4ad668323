use std::path::PathBuf;

use gymgroup_client::catalog::load_catalog;
use gymgroup_client::config::Config;
use gymgroup_client::http_client::GymClient;
use gymgroup_trends::runner::sweep_catalog;
use gymgroup_trends::store::append_readings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Configure logging from `GYMGROUP_LOG_LEVEL` (or fallback to `RUST_LOG`, default `info`).
    let log_env = std::env::var("GYMGROUP_LOG_LEVEL")
        .or_else(|_| std::env::var("RUST_LOG"))
        .unwrap_or_else(|_| "info".to_string());
    let env_filter = tracing_subscriber::EnvFilter::try_new(&log_env)
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .compact()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(false)
        .with_env_filter(env_filter)
        .init();

    let config = Config::from_env()?;
    let catalog_path = PathBuf::from(
        std::env::var("GYMGROUP_CATALOG").unwrap_or_else(|_| "data/gyms.json".into()),
    );
    let data_path = PathBuf::from(
        std::env::var("GYMGROUP_DATA").unwrap_or_else(|_| "data/occupancy.csv".into()),
    );

    let catalog = load_catalog(&catalog_path)?;
    tracing::info!("loaded {} gyms from {}", catalog.len(), catalog_path.display());

    let session = GymClient::new(&config.base_url)?.login(&config).await?;
    let readings = sweep_catalog(&session, &catalog).await?;
    tracing::info!("collected {} of {} readings", readings.len(), catalog.len());

    append_readings(&data_path, &readings)?;
    tracing::info!("appended to {}", data_path.display());
    Ok(())
}
