//! Per-person report aggregation.

use crate::core::plan_reader::{ActivePerson, active_people, days_in_range, reinforcement_index};
use crate::models::payroll::PersonTotals;
use crate::models::person::{Bucket, base_role_of};
use crate::models::plan::WorkWeek;
use crate::models::report::{Concept, ReportBook};
use crate::utils::date::{DateRange, iso};
use crate::utils::normalize::{fold, role_rank};
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Which report keys a person is read under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum KeyPolicy {
    /// Every historical key shape.
    Full,
    /// Reinforcement restricted to the unsuffixed key.
    Windowed,
}

/// Sum every concept for every active person of the given weeks.
///
/// People are de-duplicated across weeks by bucket, canonical role and
/// folded name. Rows come back unordered.
pub(crate) fn collect(
    weeks: &[WorkWeek],
    book: &ReportBook,
    filter: Option<&DateRange>,
    policy: KeyPolicy,
) -> Vec<PersonTotals> {
    let mut index: BTreeMap<(Bucket, String, String), usize> = BTreeMap::new();
    let mut rows: Vec<PersonTotals> = Vec::new();

    for week in weeks {
        if filter.is_some_and(|r| !week.overlaps(r)) {
            continue;
        }
        let people = active_people(week, filter);
        if people.is_empty() {
            continue;
        }
        let ref_roles = reinforcement_index(week);
        let sheet = book.sheet_for(week.start_date);
        let dates: Vec<String> = days_in_range(week, filter)
            .into_iter()
            .map(|(d, _)| iso(d))
            .collect();

        for person in &people {
            let slot = *index.entry(person.identity()).or_insert_with(|| {
                rows.push(new_row(person));
                rows.len() - 1
            });
            let row = &mut rows[slot];
            if row.gender.is_none() {
                row.gender = person.gender;
            }
            if row.bucket == Bucket::Reinforcement
                && let Some(listed) = ref_roles.get(&fold(&row.name))
                && listed.len() > row.listed_role.len()
            {
                row.listed_role = listed.clone();
                row.base_role = base_role_of(listed);
            }

            let Some(sheet) = sheet else {
                continue;
            };
            let variants = match policy {
                KeyPolicy::Full => person.key_variants(),
                KeyPolicy::Windowed => person.window_key_variants(),
            };
            for concept in Concept::ALL {
                for date in &dates {
                    if let Some(raw) = sheet.cell(&variants, concept, date) {
                        row.totals.absorb(concept, raw, week.start_date);
                    }
                }
            }
        }
    }

    rows
}

fn new_row(person: &ActivePerson) -> PersonTotals {
    let mut row = PersonTotals::new(
        person.bucket,
        &person.base_role,
        &person.listed_role,
        &person.name,
    );
    row.gender = person.gender;
    row
}

/// Payroll row order: base roles by role priority, then reinforcement, then
/// prelight, then pickup; names compared accent- and case-insensitively.
pub fn compare_rows(a: &PersonTotals, b: &PersonTotals) -> Ordering {
    a.bucket
        .rank()
        .cmp(&b.bucket.rank())
        .then_with(|| role_rank(&a.base_role).cmp(&role_rank(&b.base_role)))
        .then_with(|| fold(&a.base_role).cmp(&fold(&b.base_role)))
        .then_with(|| fold(&a.name).cmp(&fold(&b.name)))
        .then_with(|| a.name.cmp(&b.name))
}

/// Per-person concept totals over the weeks, optionally limited to a date
/// range, in payroll row order.
pub fn aggregate_reports(
    weeks: &[WorkWeek],
    book: &ReportBook,
    filter: Option<&DateRange>,
) -> Vec<PersonTotals> {
    let mut rows = collect(weeks, book, filter, KeyPolicy::Full);
    rows.sort_by(compare_rows);
    rows
}
