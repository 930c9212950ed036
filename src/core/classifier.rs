//! Worked-day classification of a person over plan weeks.

use crate::models::mode::ProjectMode;
use crate::models::payroll::{PersonTotals, WorkedBreakdown};
use crate::models::person::{Bucket, Person};
use crate::models::plan::{DayBlock, DayCategory, DayRecord, WorkWeek};
use crate::utils::date::{DateRange, MonthKey};
use crate::utils::normalize::{REINFORCEMENT_PREFIX, fold, is_reinforcement_code, normalize_role};
use chrono::NaiveDate;

/// True when `member` is the person `target` refers to.
fn matches_member(target: &PersonTotals, block: DayBlock, member: &Person) -> bool {
    if fold(&member.name) != fold(&target.name) {
        return false;
    }
    match target.bucket {
        Bucket::Reinforcement => member.is_reinforcement(),
        bucket => {
            let wanted_block = match bucket {
                Bucket::Prelight => DayBlock::Prelight,
                Bucket::Pickup => DayBlock::Pickup,
                _ => DayBlock::Base,
            };
            block == wanted_block
                && !member.is_reinforcement()
                && (member.role.trim().is_empty()
                    || normalize_role(&member.base_role()) == normalize_role(&target.base_role))
        }
    }
}

/// Block the person was found in on a day, if any.
fn find_in_day(target: &PersonTotals, day: &DayRecord) -> Option<DayBlock> {
    DayBlock::ALL
        .into_iter()
        .find(|block| day.members(*block).iter().any(|m| matches_member(target, *block, m)))
}

/// Count the days a person worked, by category.
///
/// Rest days never count. Travel days have their own counter, holiday
/// shooting is exclusive of regular work, and advertising projects split out
/// load, unload, location, office and camera-test days.
pub fn calc_worked_breakdown(
    weeks: &[WorkWeek],
    filter: Option<&DateRange>,
    target: &PersonTotals,
    mode: ProjectMode,
) -> WorkedBreakdown {
    let extended = mode.rules().extended_categories;
    let mut out = WorkedBreakdown::default();

    for week in weeks {
        for (date, day) in week.dated_days() {
            if day.category.is_rest() || filter.is_some_and(|r| !r.contains(date)) {
                continue;
            }
            let Some(block) = find_in_day(target, day) else {
                continue;
            };

            match block {
                DayBlock::Base => out.base_block_days += 1,
                DayBlock::Prelight => out.prelight_block_days += 1,
                DayBlock::Pickup => out.pickup_block_days += 1,
            }
            out.dates.push(date);

            match (&day.category, extended) {
                (DayCategory::TravelDay, _) => out.travel_days += 1,
                (DayCategory::RodajeFestivo, _) => out.holiday_days += 1,
                (DayCategory::Carga, true) => out.carga_days += 1,
                (DayCategory::Descarga, true) => out.descarga_days += 1,
                (DayCategory::Localizar, true) => out.localizacion_days += 1,
                (DayCategory::Oficina, true) => out.oficina_days += 1,
                (DayCategory::PruebasCamara, true) => out.pruebas_camara_days += 1,
                _ => out.worked_days += 1,
            }
        }
    }

    out
}

/// Role shown on the payroll row.
///
/// Prelight-only work shows as `<base>P`, pickup-only as `<base>R`, anything
/// else as the base role. Reinforcement keeps its `REF` compound when listed
/// with one.
pub fn display_role(target: &PersonTotals, worked: &WorkedBreakdown) -> String {
    if target.bucket == Bucket::Reinforcement {
        let listed = target.listed_role.trim();
        return if is_reinforcement_code(listed) {
            listed.to_uppercase()
        } else {
            REINFORCEMENT_PREFIX.to_string()
        };
    }

    let base = target.base_role.as_str();
    match (
        worked.base_block_days,
        worked.prelight_block_days,
        worked.pickup_block_days,
    ) {
        (0, p, 0) if p > 0 => format!("{base}{}", Bucket::Prelight.role_suffix()),
        (0, 0, r) if r > 0 => format!("{base}{}", Bucket::Pickup.role_suffix()),
        _ => base.to_string(),
    }
}

/// Engagement span of a person inside a month (monthly mode).
///
/// From the first day worked in the month to the earliest of: the last day
/// worked anywhere in the plan, the day before the first wrap marker on or
/// after that first day, the end of the month. Rest days inside the span
/// count.
pub fn monthly_working_days(
    weeks: &[WorkWeek],
    target: &PersonTotals,
    month: MonthKey,
    mode: ProjectMode,
) -> u32 {
    let all = calc_worked_breakdown(weeks, None, target, mode);
    let month_range = month.range();

    let Some(first) = all.dates.iter().copied().filter(|d| month_range.contains(*d)).min() else {
        return 0;
    };
    let Some(last_worked) = all.dates.iter().copied().max() else {
        return 0;
    };

    let wrap_eve = first_wrap_on_or_after(weeks, first).and_then(|d| d.pred_opt());

    let mut end = last_worked.min(month_range.end);
    if let Some(eve) = wrap_eve {
        end = end.min(eve);
    }

    if end < first {
        return 0;
    }
    ((end - first).num_days() + 1) as u32
}

fn first_wrap_on_or_after(weeks: &[WorkWeek], from: NaiveDate) -> Option<NaiveDate> {
    weeks
        .iter()
        .flat_map(|w| w.dated_days())
        .filter(|(d, day)| *d >= from && day.category.is_wrap())
        .map(|(d, _)| d)
        .min()
}
