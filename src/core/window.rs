//! Overtime accounting window.
//!
//! Overtime and the related daily concepts may be closed on a schedule that
//! does not follow the calendar month. When a window is configured its
//! totals replace the monthly ones for those concepts.

use crate::core::aggregate::{KeyPolicy, collect};
use crate::models::mode::{ProjectMode, WindowRule};
use crate::models::plan::WorkWeek;
use crate::models::price::CatalogParams;
use crate::models::report::{ConceptTotals, ReportBook};
use crate::utils::date::{DateRange, MonthKey};
use std::collections::BTreeMap;

/// Highest close day accepted; later days clamp to the month end.
const MAX_CLOSE_DAY: u32 = 31;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OvertimeWindow {
    pub range: DateRange,
}

impl OvertimeWindow {
    /// Window that settles `month`, if the catalog configures one.
    pub fn for_month(mode: ProjectMode, params: &CatalogParams, month: MonthKey) -> Option<Self> {
        match mode.rules().window {
            WindowRule::CloseDay => {
                let close = params.overtime_close_day.filter(|c| (1..=MAX_CLOSE_DAY).contains(c))?;
                let prev = month.prev();
                let start = if close >= prev.days_in_month() {
                    month.first_day()
                } else {
                    prev.clamped_day(close + 1)
                };
                let end = month.clamped_day(close);
                Some(Self {
                    range: DateRange::new(start, end),
                })
            }
            WindowRule::DayCount => {
                let n = params.overtime_window_days.filter(|n| *n > 0)?;
                Some(Self {
                    range: month.range().shifted_back(u64::from(n)),
                })
            }
        }
    }
}

/// Concept totals inside the window keyed by bucket key
/// (`visibleRole__foldedName`).
pub fn aggregate_windowed_report(
    weeks: &[WorkWeek],
    book: &ReportBook,
    window: &DateRange,
) -> BTreeMap<String, ConceptTotals> {
    let mut out: BTreeMap<String, ConceptTotals> = BTreeMap::new();
    for row in collect(weeks, book, Some(window), KeyPolicy::Windowed) {
        out.insert(row.bucket_key(), row.totals);
    }
    out
}
