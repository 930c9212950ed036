use crate::core::aggregate::aggregate_reports;
use crate::core::enrich::{EnrichInput, enrich_rows};
use crate::core::plan_reader::{active_people, ordered_weeks};
use crate::core::prices::PriceResolver;
use crate::core::window::{OvertimeWindow, aggregate_windowed_report};
use crate::models::mode::ProjectMode;
use crate::models::payroll::EnrichedPayrollRow;
use crate::models::project::ProjectData;
use crate::utils::date::{DateRange, MonthKey};
use std::collections::{BTreeMap, BTreeSet};

/// Payroll rows of one month.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthPayroll {
    pub month: MonthKey,
    pub mode: ProjectMode,
    pub window: Option<DateRange>,
    pub rows: Vec<EnrichedPayrollRow>,
}

impl MonthPayroll {
    pub fn total_gross(&self) -> f64 {
        self.rows.iter().map(|r| r.total_gross).sum()
    }
}

pub struct Core;

impl Core {
    /// Months in which anyone is listed on a working day.
    pub fn active_months(data: &ProjectData) -> Vec<MonthKey> {
        let mut months = BTreeSet::new();
        for week in ordered_weeks(&data.plan) {
            for (date, day) in week.dated_days() {
                if !day.category.is_rest() && day.all_members().next().is_some() {
                    months.insert(MonthKey::of(date));
                }
            }
        }
        months.into_iter().collect()
    }

    /// Compute the payroll of `month`, optionally narrowed to `period`.
    pub fn compute_month(
        data: &ProjectData,
        month: MonthKey,
        period: Option<&DateRange>,
        mode: ProjectMode,
    ) -> MonthPayroll {
        let weeks = ordered_weeks(&data.plan);
        let month_range = month.range();
        let filter = match period {
            Some(p) => DateRange::new(p.start.max(month_range.start), p.end.min(month_range.end)),
            None => month_range,
        };

        let resolver = PriceResolver::new(&data.catalog, mode);
        let window = OvertimeWindow::for_month(mode, resolver.params(), month);
        let window_totals =
            window.map(|w| aggregate_windowed_report(&weeks, &data.reports, &w.range));

        let rows = aggregate_reports(&weeks, &data.reports, Some(&filter));
        let input = EnrichInput {
            weeks: &weeks,
            month,
            filter: Some(&filter),
            resolver: &resolver,
            window: window_totals.as_ref(),
            overrides: data.overrides.get(&month),
            mode,
        };

        MonthPayroll {
            month,
            mode,
            window: window.map(|w| w.range),
            rows: enrich_rows(&rows, &input),
        }
    }

    /// Payroll of every active month, grouped by `YYYY-MM`.
    ///
    /// A project without weeks or team yields an empty map.
    pub fn compute_project(
        data: &ProjectData,
        period: Option<&DateRange>,
        mode: ProjectMode,
    ) -> BTreeMap<MonthKey, MonthPayroll> {
        let months: Vec<MonthKey> = match period {
            Some(p) => {
                let active: BTreeSet<MonthKey> = Self::active_months(data).into_iter().collect();
                p.months().into_iter().filter(|m| active.contains(m)).collect()
            }
            None => Self::active_months(data),
        };

        months
            .into_iter()
            .map(|m| (m, Self::compute_month(data, m, period, mode)))
            .filter(|(_, payroll)| !payroll.rows.is_empty())
            .collect()
    }

    /// Distinct people scheduled anywhere in the plan.
    pub fn team_size(data: &ProjectData) -> usize {
        ordered_weeks(&data.plan)
            .iter()
            .flat_map(|w| active_people(w, None))
            .map(|p| p.identity())
            .collect::<BTreeSet<_>>()
            .len()
    }
}
