//! Occupancy tables and 24h trend plots for the gym scraper.
//!
//! The pipeline is a handful of pure functions over a small named-column
//! [`frame::Frame`]: load stored readings from CSV, round timestamps onto a
//! quarter-hour grid, filter by weekday or date range, then render an
//! interval or spaghetti trend chart.

pub mod error;
pub mod frame;
pub mod plot;
pub mod runner;
pub mod store;
pub mod transform;

pub use error::{TrendError, TrendResult};
