//! Render a 24h occupancy trend from the stored CSV.
//!
//! Env-configured like the scrape runner:
//! `GYMGROUP_DATA` (input CSV), `GYMGROUP_PLOT_OUT` (output SVG),
//! `GYMGROUP_PLOT_MODE` (`interval`/`spaghetti`), `GYMGROUP_PLOT_DAY`
//! (weekday, Monday = 0), `GYMGROUP_PLOT_AFTER`/`GYMGROUP_PLOT_BEFORE`
//! (exclusive bounds, date or datetime), `GYMGROUP_PLOT_YLIM`,
//! `GYMGROUP_PLOT_CONF`, `GYMGROUP_PLOT_COLOR`.

use std::path::PathBuf;

use anyhow::Context;
use gymgroup_trends::plot::{PlotParams, parse_color, plot_24h};
use gymgroup_trends::store::{DEFAULT_TIME_COLUMN, load_frame};
use gymgroup_trends::transform::{filter_date, filter_dayofweek, parse_bound, round_minutes};

fn env_bound(key: &str) -> anyhow::Result<Option<chrono::NaiveDateTime>> {
    match std::env::var(key) {
        Ok(s) => {
            let bound = parse_bound(&s).with_context(|| format!("invalid {key}: '{s}'"))?;
            Ok(Some(bound))
        }
        Err(_) => Ok(None),
    }
}

fn main() -> anyhow::Result<()> {
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

    let data_path = PathBuf::from(
        std::env::var("GYMGROUP_DATA").unwrap_or_else(|_| "data/occupancy.csv".into()),
    );
    let out_path = PathBuf::from(
        std::env::var("GYMGROUP_PLOT_OUT").unwrap_or_else(|_| "occupancy-24h.svg".into()),
    );

    let mut params = PlotParams::default();
    if let Ok(mode) = std::env::var("GYMGROUP_PLOT_MODE") {
        params.mode = mode.parse()?;
    }
    if let Ok(v) = std::env::var("GYMGROUP_PLOT_YLIM") {
        params.ylim = Some(v.parse().with_context(|| format!("invalid GYMGROUP_PLOT_YLIM: '{v}'"))?);
    }
    if let Ok(v) = std::env::var("GYMGROUP_PLOT_CONF") {
        params.conf_interval = v
            .parse()
            .with_context(|| format!("invalid GYMGROUP_PLOT_CONF: '{v}'"))?;
    }
    if let Ok(v) = std::env::var("GYMGROUP_PLOT_COLOR") {
        params.color =
            parse_color(&v).with_context(|| format!("unknown GYMGROUP_PLOT_COLOR: '{v}'"))?;
    }

    let frame = load_frame(&data_path, DEFAULT_TIME_COLUMN)?;
    tracing::info!("loaded {} readings from {}", frame.len(), data_path.display());

    let mut frame = round_minutes(&frame, DEFAULT_TIME_COLUMN)?;
    if let Ok(v) = std::env::var("GYMGROUP_PLOT_DAY") {
        let day: u32 = v
            .parse()
            .with_context(|| format!("invalid GYMGROUP_PLOT_DAY: '{v}'"))?;
        frame = filter_dayofweek(&frame, day, DEFAULT_TIME_COLUMN)?;
    }
    let after = env_bound("GYMGROUP_PLOT_AFTER")?;
    let before = env_bound("GYMGROUP_PLOT_BEFORE")?;
    if after.is_some() || before.is_some() {
        frame = filter_date(&frame, after, before, DEFAULT_TIME_COLUMN)?;
    }

    plot_24h(&frame, &params, DEFAULT_TIME_COLUMN, &out_path)?;
    tracing::info!("wrote {}", out_path.display());
    Ok(())
}
