//! Pure transformations over occupancy frames.
//!
//! Every function validates the named time column first (present, datetime)
//! and returns a new frame; the input is never touched.

use crate::error::TrendResult;
use crate::frame::{Column, Frame};
use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};

/// Truncate every timestamp to the start of its quarter-hour bucket.
///
/// `08:07:45` becomes `08:00:00`, `08:17:00` becomes `08:15:00`. Seconds and
/// below are dropped, so re-rounding a rounded frame is a no-op.
pub fn round_minutes(frame: &Frame, col: &str) -> TrendResult<Frame> {
    let times = frame.datetime_column(col)?;
    let rounded = times.iter().map(|dt| quarter_floor(*dt)).collect();
    Ok(frame.with_replaced(col, Column::Datetime(rounded)))
}

fn quarter_floor(dt: NaiveDateTime) -> NaiveDateTime {
    let bucket = dt.minute() - dt.minute() % 15;
    // bucket < 60, so the chain cannot fail
    dt.with_minute(bucket)
        .and_then(|d| d.with_second(0))
        .and_then(|d| d.with_nanosecond(0))
        .unwrap_or(dt)
}

/// Keep rows falling on the given weekday, Monday = 0 through Sunday = 6.
pub fn filter_dayofweek(frame: &Frame, day: u32, col: &str) -> TrendResult<Frame> {
    let times = frame.datetime_column(col)?;
    let rows: Vec<usize> = times
        .iter()
        .enumerate()
        .filter(|(_, dt)| dt.weekday().num_days_from_monday() == day)
        .map(|(i, _)| i)
        .collect();
    Ok(frame.take_rows(&rows))
}

/// Keep rows strictly inside the open interval `(after, before)`.
///
/// Either bound may be omitted; each is applied independently and both ends
/// are exclusive.
pub fn filter_date(
    frame: &Frame,
    after: Option<NaiveDateTime>,
    before: Option<NaiveDateTime>,
    col: &str,
) -> TrendResult<Frame> {
    let times = frame.datetime_column(col)?;
    let rows: Vec<usize> = times
        .iter()
        .enumerate()
        .filter(|(_, dt)| {
            after.is_none_or(|a| **dt > a) && before.is_none_or(|b| **dt < b)
        })
        .map(|(i, _)| i)
        .collect();
    Ok(frame.take_rows(&rows))
}

/// Parse a filter bound: a bare date means midnight.
pub fn parse_bound(s: &str) -> Option<NaiveDateTime> {
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return d.and_hms_opt(0, 0, 0);
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
        .ok()
        .or_else(|| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TrendError;

    fn dt(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").expect("datetime literal")
    }

    fn frame_with_times(times: Vec<NaiveDateTime>) -> Frame {
        let n = times.len();
        let mut f = Frame::new();
        f.push_column("time", Column::Datetime(times));
        f.push_column("capacity", Column::Float(vec![50.0; n]));
        f
    }

    #[test]
    fn round_minutes_truncates_to_quarter_hours() {
        let f = frame_with_times(vec![dt("2023-06-02 08:07:45"), dt("2023-06-02 08:17:00")]);
        let rounded = round_minutes(&f, "time").expect("round");
        let times = rounded.datetime_column("time").unwrap();
        assert_eq!(times[0], dt("2023-06-02 08:00:00"));
        assert_eq!(times[1], dt("2023-06-02 08:15:00"));
    }

    #[test]
    fn round_minutes_is_idempotent() {
        let f = frame_with_times(vec![
            dt("2023-06-02 08:07:45"),
            dt("2023-06-02 23:59:59"),
            dt("2023-06-02 00:00:00"),
        ]);
        let once = round_minutes(&f, "time").expect("round");
        let twice = round_minutes(&once, "time").expect("round again");
        assert_eq!(once, twice);
    }

    #[test]
    fn round_minutes_is_monotonic() {
        let times = vec![
            dt("2023-06-02 08:00:00"),
            dt("2023-06-02 08:07:45"),
            dt("2023-06-02 08:14:59"),
            dt("2023-06-02 08:15:00"),
            dt("2023-06-02 09:44:01"),
            dt("2023-06-03 00:00:30"),
        ];
        let f = frame_with_times(times);
        let rounded = round_minutes(&f, "time").expect("round");
        let out = rounded.datetime_column("time").unwrap();
        assert!(out.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn round_minutes_missing_column_fails_fast() {
        let f = frame_with_times(vec![dt("2023-06-02 08:00:00")]);
        let res = round_minutes(&f, "timestamp");
        assert!(matches!(res, Err(TrendError::ColumnNotFound(c)) if c == "timestamp"));
    }

    #[test]
    fn round_minutes_non_datetime_column_fails_fast() {
        let f = frame_with_times(vec![dt("2023-06-02 08:00:00")]);
        let res = round_minutes(&f, "capacity");
        assert!(matches!(res, Err(TrendError::ColumnNotDatetime(c)) if c == "capacity"));
    }

    #[test]
    fn filter_dayofweek_keeps_only_fridays_for_day_four() {
        // 2023-06-02 is a Friday, 2023-06-03 a Saturday, 2023-06-05 a Monday
        let f = frame_with_times(vec![
            dt("2023-06-02 08:00:00"),
            dt("2023-06-03 08:00:00"),
            dt("2023-06-05 08:00:00"),
            dt("2023-06-09 20:30:00"),
        ]);
        let fridays = filter_dayofweek(&f, 4, "time").expect("filter");
        let times = fridays.datetime_column("time").unwrap();
        assert_eq!(times.len(), 2);
        assert!(times.iter().all(|t| t.weekday() == chrono::Weekday::Fri));
        // no helper column leaks into the output
        assert_eq!(
            fridays.column_names().collect::<Vec<_>>(),
            vec!["time", "capacity"]
        );
    }

    #[test]
    fn filter_dayofweek_monday_is_zero() {
        let f = frame_with_times(vec![dt("2023-06-05 08:00:00")]);
        assert_eq!(filter_dayofweek(&f, 0, "time").unwrap().len(), 1);
        assert_eq!(filter_dayofweek(&f, 6, "time").unwrap().len(), 0);
    }

    #[test]
    fn filter_date_bounds_are_exclusive() {
        let f = frame_with_times(vec![
            dt("2023-01-01 00:00:00"),
            dt("2023-01-01 12:00:00"),
            dt("2023-01-02 12:00:00"),
            dt("2023-01-03 00:00:00"),
        ]);
        let after = parse_bound("2023-01-01");
        let before = parse_bound("2023-01-03");
        let out = filter_date(&f, after, before, "time").expect("filter");
        let times = out.datetime_column("time").unwrap();
        assert_eq!(
            times,
            &[dt("2023-01-01 12:00:00"), dt("2023-01-02 12:00:00")]
        );
    }

    #[test]
    fn filter_date_bounds_apply_independently() {
        let f = frame_with_times(vec![dt("2023-01-01 12:00:00"), dt("2023-02-01 12:00:00")]);
        let after = parse_bound("2023-01-15");
        assert_eq!(filter_date(&f, after, None, "time").unwrap().len(), 1);
        let before = parse_bound("2023-01-15");
        assert_eq!(filter_date(&f, None, before, "time").unwrap().len(), 1);
        assert_eq!(filter_date(&f, None, None, "time").unwrap().len(), 2);
    }

    #[test]
    fn parse_bound_accepts_date_and_datetime() {
        assert_eq!(parse_bound("2023-01-01"), Some(dt("2023-01-01 00:00:00")));
        assert_eq!(
            parse_bound("2023-01-01T08:30:00"),
            Some(dt("2023-01-01 08:30:00"))
        );
        assert_eq!(
            parse_bound("2023-01-01 08:30:00"),
            Some(dt("2023-01-01 08:30:00"))
        );
        assert_eq!(parse_bound("last tuesday"), None);
    }
}
