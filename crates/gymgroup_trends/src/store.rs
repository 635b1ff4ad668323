//! Flat-CSV persistence for occupancy readings.
//!
//! The store is append-only: the scrape runner adds one row per gym per
//! sweep, and analysis loads the whole file back into a [`Frame`]. Times are
//! written day-first.

use crate::error::TrendResult;
use crate::frame::{Column, Frame};
use chrono::NaiveDateTime;
use std::fs::{File, OpenOptions};
use std::path::Path;

pub const DEFAULT_TIME_COLUMN: &str = "time";

const DAYFIRST_FORMATS: &[&str] = &["%d/%m/%Y %H:%M:%S", "%d/%m/%Y %H:%M"];

/// One stored occupancy reading.
#[derive(Clone, Debug, PartialEq)]
pub struct Reading {
    pub gym: String,
    pub time: NaiveDateTime,
    pub capacity: f64,
}

/// Parse a day-first timestamp as written by [`append_readings`].
pub fn parse_dayfirst(s: &str) -> Option<NaiveDateTime> {
    DAYFIRST_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
}

/// Append readings to the CSV at `path`, writing the header only when the
/// file is new or empty.
pub fn append_readings(path: &Path, readings: &[Reading]) -> TrendResult<()> {
    let write_header = std::fs::metadata(path).map(|m| m.len() == 0).unwrap_or(true);
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(file);

    if write_header {
        writer.write_record([DEFAULT_TIME_COLUMN, "gym", "capacity"])?;
    }
    for r in readings {
        writer.write_record([
            r.time.format("%d/%m/%Y %H:%M:%S").to_string(),
            r.gym.clone(),
            r.capacity.to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

/// Load a stored CSV into a frame.
///
/// The named time column is parsed day-first; if any cell fails to parse the
/// column is left as strings, so the pipeline's datetime validation reports
/// it. Other columns become floats when every cell parses, strings otherwise.
pub fn load_frame(path: &Path, time_col: &str) -> TrendResult<Frame> {
    let file = File::open(path)?;
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(file);
    let headers = reader.headers()?.clone();

    let mut cells: Vec<Vec<String>> = vec![Vec::new(); headers.len()];
    for record in reader.records() {
        let record = record?;
        for (i, cell) in record.iter().enumerate() {
            if i < cells.len() {
                cells[i].push(cell.to_string());
            }
        }
    }

    let mut frame = Frame::new();
    for (name, raw) in headers.iter().zip(cells) {
        frame.push_column(name, infer_column(name == time_col, raw));
    }
    Ok(frame)
}

fn infer_column(as_datetime: bool, raw: Vec<String>) -> Column {
    if as_datetime {
        let parsed: Option<Vec<NaiveDateTime>> =
            raw.iter().map(|s| parse_dayfirst(s)).collect();
        return match parsed {
            Some(v) => Column::Datetime(v),
            None => Column::Str(raw),
        };
    }
    let parsed: Option<Vec<f64>> = raw.iter().map(|s| s.parse().ok()).collect();
    match parsed {
        Some(v) => Column::Float(v),
        None => Column::Str(raw),
    }
}
