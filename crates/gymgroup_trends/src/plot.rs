//! 24-hour occupancy trend charts.
//!
//! Two renderings over a prepared frame: an `interval` plot of the mean
//! capacity per time-of-day with a shaded confidence band, and a `spaghetti`
//! plot of one translucent line per date. Filtering (day of week, date range)
//! is expected to have been applied beforehand.

use crate::error::{TrendError, TrendResult};
use crate::frame::Frame;
use chrono::{NaiveTime, Timelike};
use plotters::prelude::*;
use plotters::series::DashedLineSeries;
use statrs::distribution::{ContinuousCDF, Normal};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::str::FromStr;

pub const CAPACITY_COLUMN: &str = "capacity";

const CHART_SIZE: (u32, u32) = (1200, 600);

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TrendMode {
    /// Mean capacity per time-of-day with a confidence band.
    #[default]
    Interval,
    /// One translucent line per date.
    Spaghetti,
}

impl FromStr for TrendMode {
    type Err = TrendError;

    fn from_str(s: &str) -> Result<Self, TrendError> {
        match s.trim().to_ascii_lowercase().as_str() {
            "interval" => Ok(Self::Interval),
            "spaghetti" => Ok(Self::Spaghetti),
            other => Err(TrendError::UnknownMode(other.to_string())),
        }
    }
}

#[derive(Clone, Debug)]
pub struct PlotParams {
    pub color: RGBColor,
    /// Upper y-axis limit as a percentage; auto-fitted to the data when
    /// absent, clamped to 100 either way.
    pub ylim: Option<f64>,
    pub mode: TrendMode,
    /// Confidence level for interval mode, strictly inside (0, 1).
    pub conf_interval: f64,
    /// Opacity of the band and of spaghetti lines.
    pub alpha: f64,
}

impl Default for PlotParams {
    fn default() -> Self {
        Self {
            color: RED,
            ylim: None,
            mode: TrendMode::Interval,
            conf_interval: 0.95,
            alpha: 0.1,
        }
    }
}

/// Map the handful of colour names the plot binary accepts.
pub fn parse_color(name: &str) -> Option<RGBColor> {
    match name.trim().to_ascii_lowercase().as_str() {
        "red" => Some(RED),
        "blue" => Some(BLUE),
        "green" => Some(GREEN),
        "black" => Some(BLACK),
        "magenta" => Some(MAGENTA),
        "cyan" => Some(CYAN),
        _ => None,
    }
}

/// One time-of-day bucket of the interval statistics.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrendBucket {
    /// Time of day as a fractional hour (08:15 → 8.25).
    pub hour: f64,
    pub mean: f64,
    /// Sample standard deviation; 0 when the bucket has a single reading.
    pub std: f64,
    pub sem: f64,
    pub lower: f64,
    pub upper: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct IntervalSummary {
    pub conf_interval: f64,
    pub buckets: Vec<TrendBucket>,
}

/// Group capacity by time-of-day (dates ignored) and band the mean with
/// `mean ± z·std`, where `z` is the normal quantile at
/// `(1 - conf_interval)/2 + conf_interval`.
pub fn interval_summary(
    frame: &Frame,
    time_col: &str,
    conf_interval: f64,
) -> TrendResult<IntervalSummary> {
    let times = frame.datetime_column(time_col)?;
    if conf_interval <= 0.0 || conf_interval >= 1.0 {
        return Err(TrendError::ConfidenceInterval(conf_interval));
    }
    let capacities = frame.float_column(CAPACITY_COLUMN)?;

    let mut groups: BTreeMap<NaiveTime, Vec<f64>> = BTreeMap::new();
    for (dt, cap) in times.iter().zip(capacities) {
        groups.entry(dt.time()).or_default().push(*cap);
    }

    let z = Normal::new(0.0, 1.0)
        .map_err(|e| TrendError::Internal(e.to_string()))?
        .inverse_cdf((1.0 - conf_interval) / 2.0 + conf_interval);

    let buckets = groups
        .iter()
        .map(|(time, values)| {
            let n = values.len() as f64;
            let mean = values.iter().sum::<f64>() / n;
            let std = if values.len() < 2 {
                0.0
            } else {
                let ss = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>();
                (ss / (n - 1.0)).sqrt()
            };
            TrendBucket {
                hour: fractional_hour(*time),
                mean,
                std,
                sem: std / n.sqrt(),
                lower: mean - z * std,
                upper: mean + z * std,
            }
        })
        .collect();

    Ok(IntervalSummary {
        conf_interval,
        buckets,
    })
}

fn fractional_hour(t: NaiveTime) -> f64 {
    f64::from(t.hour()) + f64::from(t.minute()) / 60.0
}

/// Per-date capacity trajectories for a spaghetti plot, dates in first-seen
/// order.
fn spaghetti_lines(frame: &Frame, time_col: &str) -> TrendResult<Vec<Vec<(f64, f64)>>> {
    let times = frame.datetime_column(time_col)?;
    let capacities = frame.float_column(CAPACITY_COLUMN)?;

    let mut order = Vec::new();
    let mut by_date: HashMap<chrono::NaiveDate, Vec<(f64, f64)>> = HashMap::new();
    for (dt, cap) in times.iter().zip(capacities) {
        let date = dt.date();
        if !by_date.contains_key(&date) {
            order.push(date);
        }
        by_date
            .entry(date)
            .or_default()
            .push((fractional_hour(dt.time()), *cap));
    }
    Ok(order.into_iter().filter_map(|d| by_date.remove(&d)).collect())
}

enum TrendSeries {
    Interval(IntervalSummary),
    Spaghetti(Vec<Vec<(f64, f64)>>),
}

impl TrendSeries {
    fn data_top(&self) -> Option<f64> {
        let max = match self {
            TrendSeries::Interval(s) => s
                .buckets
                .iter()
                .map(|b| b.upper)
                .fold(f64::NEG_INFINITY, f64::max),
            TrendSeries::Spaghetti(lines) => lines
                .iter()
                .flatten()
                .map(|(_, cap)| *cap)
                .fold(f64::NEG_INFINITY, f64::max),
        };
        max.is_finite().then_some(max)
    }
}

/// Render the 24h trend for `frame` to an SVG at `out_path`.
///
/// Validation happens up front: the time column must exist and be datetime,
/// `ylim` must lie in [0, 100] when supplied, and `conf_interval` strictly in
/// (0, 1). No file is created when validation fails.
pub fn plot_24h(
    frame: &Frame,
    params: &PlotParams,
    time_col: &str,
    out_path: &Path,
) -> TrendResult<()> {
    frame.datetime_column(time_col)?;
    if let Some(ylim) = params.ylim {
        if !(0.0..=100.0).contains(&ylim) {
            return Err(TrendError::Limit(ylim));
        }
    }
    if params.conf_interval <= 0.0 || params.conf_interval >= 1.0 {
        return Err(TrendError::ConfidenceInterval(params.conf_interval));
    }

    let series = match params.mode {
        TrendMode::Interval => {
            TrendSeries::Interval(interval_summary(frame, time_col, params.conf_interval)?)
        }
        TrendMode::Spaghetti => TrendSeries::Spaghetti(spaghetti_lines(frame, time_col)?),
    };

    // Auto-fit gets a little headroom; either way the axis never exceeds 100%.
    let upper = params
        .ylim
        .unwrap_or_else(|| series.data_top().map_or(100.0, |top| top * 1.05))
        .min(100.0)
        .max(1.0);

    let root = SVGBackend::new(out_path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(draw_err)?;

    let mut chart = ChartBuilder::on(&root)
        .margin(16)
        .x_label_area_size(44)
        .y_label_area_size(56)
        .build_cartesian_2d(0f64..24f64, 0f64..upper)
        .map_err(draw_err)?;

    chart
        .configure_mesh()
        .x_labels(13)
        .x_label_formatter(&|h| format!("{:02}:00", *h as u32))
        .y_label_formatter(&|v| format!("{v:.0}%"))
        .x_desc("Time of Day")
        .draw()
        .map_err(draw_err)?;

    match &series {
        TrendSeries::Interval(summary) => {
            let band: Vec<(f64, f64)> = summary
                .buckets
                .iter()
                .map(|b| (b.hour, b.upper))
                .chain(summary.buckets.iter().rev().map(|b| (b.hour, b.lower)))
                .collect();
            let fill = params.color.mix(params.alpha);
            chart
                .draw_series(std::iter::once(Polygon::new(band, fill)))
                .map_err(draw_err)?
                .label(format!(
                    "{:.0}% confidence interval",
                    summary.conf_interval * 100.0
                ))
                .legend(move |(x, y)| {
                    Rectangle::new([(x, y - 4), (x + 10, y + 4)], fill.filled())
                });

            let line_color = params.color;
            chart
                .draw_series(DashedLineSeries::new(
                    summary.buckets.iter().map(|b| (b.hour, b.mean)),
                    6,
                    4,
                    line_color.stroke_width(2),
                ))
                .map_err(draw_err)?
                .label("Mean capacity")
                .legend(move |(x, y)| {
                    PathElement::new(vec![(x, y), (x + 10, y)], line_color.stroke_width(2))
                });

            chart
                .configure_series_labels()
                .border_style(BLACK)
                .background_style(WHITE.mix(0.8))
                .draw()
                .map_err(draw_err)?;
        }
        TrendSeries::Spaghetti(lines) => {
            let style = params.color.mix(params.alpha);
            for line in lines {
                chart
                    .draw_series(LineSeries::new(line.iter().copied(), style))
                    .map_err(draw_err)?;
            }
        }
    }

    root.present().map_err(draw_err)?;
    Ok(())
}

fn draw_err<E: std::fmt::Display>(e: E) -> TrendError {
    TrendError::Internal(e.to_string())
}
