//! Calendar helpers: month keys, inclusive date ranges, `--range` parsing.

use crate::errors::{AppError, AppResult};
use chrono::{Datelike, Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()
}

pub fn iso(d: NaiveDate) -> String {
    d.format("%Y-%m-%d").to_string()
}

/// Inclusive date interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        if start <= end {
            Self { start, end }
        } else {
            Self {
                start: end,
                end: start,
            }
        }
    }

    pub fn contains(&self, d: NaiveDate) -> bool {
        d >= self.start && d <= self.end
    }

    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    /// Same interval moved back `n` days.
    pub fn shifted_back(&self, n: u64) -> Self {
        let start = self.start.checked_sub_days(Days::new(n)).unwrap_or(self.start);
        let end = self.end.checked_sub_days(Days::new(n)).unwrap_or(self.end);
        Self { start, end }
    }

    /// Month keys touched by the interval, in order.
    pub fn months(&self) -> Vec<MonthKey> {
        let mut out = Vec::new();
        let mut m = MonthKey::of(self.start);
        let last = MonthKey::of(self.end);
        while m <= last {
            out.push(m);
            m = m.next();
        }
        out
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} → {}", iso(self.start), iso(self.end))
    }
}

/// Calendar month, displayed as `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey {
    pub year: i32,
    pub month: u32,
}

impl MonthKey {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self { year, month })
    }

    pub fn of(d: NaiveDate) -> Self {
        Self {
            year: d.year(),
            month: d.month(),
        }
    }

    pub fn parse(s: &str) -> AppResult<Self> {
        let s = s.trim();
        let (y, m) = s
            .split_once('-')
            .ok_or_else(|| AppError::InvalidMonth(s.to_string()))?;
        let year: i32 = y.parse().map_err(|_| AppError::InvalidMonth(s.to_string()))?;
        let month: u32 = m.parse().map_err(|_| AppError::InvalidMonth(s.to_string()))?;
        Self::new(year, month).ok_or_else(|| AppError::InvalidMonth(s.to_string()))
    }

    pub fn first_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    pub fn last_day(&self) -> NaiveDate {
        self.first_day()
            .checked_add_months(Months::new(1))
            .and_then(|d| d.pred_opt())
            .unwrap_or(NaiveDate::MAX)
    }

    pub fn days_in_month(&self) -> u32 {
        self.last_day().day()
    }

    pub fn range(&self) -> DateRange {
        DateRange::new(self.first_day(), self.last_day())
    }

    pub fn next(&self) -> Self {
        Self::of(self.last_day().succ_opt().unwrap_or(NaiveDate::MAX))
    }

    pub fn prev(&self) -> Self {
        Self::of(self.first_day().pred_opt().unwrap_or(NaiveDate::MIN))
    }

    /// Day `day` of this month, clamped to the month length.
    pub fn clamped_day(&self, day: u32) -> NaiveDate {
        let d = day.clamp(1, self.days_in_month());
        NaiveDate::from_ymd_opt(self.year, self.month, d).unwrap_or(self.first_day())
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// Parse a `--range`/`--period` value.
///
/// Supports:
/// - YYYY
/// - YYYY-MM
/// - YYYY-MM-DD
/// - any of the above as `start:end` (both sides in the same format)
pub fn parse_range(r: &str) -> AppResult<DateRange> {
    if let Some((start_raw, end_raw)) = r.split_once(':') {
        let start = start_raw.trim();
        let end = end_raw.trim();

        if start.len() != end.len() {
            return Err(AppError::InvalidDate(format!(
                "start and end must have same format: {r}"
            )));
        }

        let first = parse_single(start)?;
        let second = parse_single(end)?;
        return Ok(DateRange::new(first.start, second.end));
    }

    parse_single(r.trim())
}

fn parse_single(r: &str) -> AppResult<DateRange> {
    match r.len() {
        // YYYY
        4 => {
            let y: i32 = r
                .parse()
                .map_err(|_| AppError::InvalidDate(format!("invalid year: {r}")))?;
            let first = MonthKey::new(y, 1).ok_or_else(|| AppError::InvalidDate(r.into()))?;
            let last = MonthKey::new(y, 12).ok_or_else(|| AppError::InvalidDate(r.into()))?;
            Ok(DateRange::new(first.first_day(), last.last_day()))
        }
        // YYYY-MM
        7 => Ok(MonthKey::parse(r)?.range()),
        // YYYY-MM-DD
        10 => {
            let d = parse_date(r).ok_or_else(|| AppError::InvalidDate(r.to_string()))?;
            Ok(DateRange::new(d, d))
        }
        _ => Err(AppError::InvalidDate(format!("unsupported range format: {r}"))),
    }
}
