//! Plan weeks as ordered, dated day sequences plus the people active in them.

use crate::models::person::{Bucket, Gender, Person};
use crate::models::plan::{DayBlock, DayRecord, Plan, WorkWeek};
use crate::utils::date::DateRange;
use crate::utils::normalize::{
    REINFORCEMENT_PREFIX, block_specific_variants, fold, normalize_role, storage_key,
};
use chrono::NaiveDate;
use std::collections::{BTreeMap, BTreeSet};

/// A person working at least one in-range day of a week, in one bucket.
#[derive(Debug, Clone, PartialEq)]
pub struct ActivePerson {
    pub bucket: Bucket,
    pub base_role: String,
    pub listed_role: String,
    pub name: String,
    pub gender: Option<Gender>,
    /// Same role and name also listed in the base block that week.
    pub also_in_base: bool,
}

impl ActivePerson {
    /// Dedupe key: bucket, canonical role and folded name. Reinforcement is
    /// unified by name alone.
    pub fn identity(&self) -> (Bucket, String, String) {
        let role = match self.bucket {
            Bucket::Reinforcement => String::new(),
            _ => normalize_role(&self.base_role),
        };
        (self.bucket, role, fold(&self.name))
    }

    pub fn storage_key(&self) -> String {
        storage_key(&self.base_role, &self.name, self.bucket)
    }

    /// Report keys to try, block-specific shapes first.
    ///
    /// Prelight/pickup people fall back to the plain key only when they are
    /// not also in the base block that week, otherwise they would read the
    /// base row's cells.
    pub fn key_variants(&self) -> Vec<String> {
        let name = self.name.trim();
        let mut out = block_specific_variants(self.bucket, &self.base_role, name);
        if matches!(self.bucket, Bucket::Prelight | Bucket::Pickup) && !self.also_in_base {
            out.push(format!("{}__{}", self.base_role, name));
        }
        out
    }

    /// Windowed lookups read reinforcement staff under `REF__<name>` only.
    pub fn window_key_variants(&self) -> Vec<String> {
        match self.bucket {
            Bucket::Reinforcement => {
                vec![format!("{REINFORCEMENT_PREFIX}__{}", self.name.trim())]
            }
            _ => self.key_variants(),
        }
    }
}

/// Bucket a member is accounted under given the block it is listed in.
pub fn bucket_for(block: DayBlock, person: &Person) -> Bucket {
    if person.is_reinforcement() {
        return Bucket::Reinforcement;
    }
    match block {
        DayBlock::Base => Bucket::Base,
        DayBlock::Prelight => Bucket::Prelight,
        DayBlock::Pickup => Bucket::Pickup,
    }
}

/// All weeks of the plan, ordered by start date.
pub fn ordered_weeks(plan: &Plan) -> Vec<WorkWeek> {
    plan.ordered_weeks()
}

/// Dated days of a week, restricted to `filter` when given.
pub fn days_in_range<'a>(
    week: &'a WorkWeek,
    filter: Option<&DateRange>,
) -> Vec<(NaiveDate, &'a DayRecord)> {
    week.dated_days()
        .into_iter()
        .filter(|(d, _)| filter.is_none_or(|r| r.contains(*d)))
        .collect()
}

/// De-duplicated people working the in-range, non-rest days of a week.
///
/// Order is first appearance (day order, then base/prelight/pickup).
pub fn active_people(week: &WorkWeek, filter: Option<&DateRange>) -> Vec<ActivePerson> {
    let mut seen: BTreeSet<(Bucket, String, String)> = BTreeSet::new();
    let mut out: Vec<ActivePerson> = Vec::new();

    for (_, day) in days_in_range(week, filter) {
        if day.category.is_rest() {
            continue;
        }
        for (block, person) in day.all_members() {
            let candidate = ActivePerson {
                bucket: bucket_for(block, person),
                base_role: person.base_role(),
                listed_role: person.role.trim().to_string(),
                name: person.name.trim().to_string(),
                gender: person.gender,
                also_in_base: false,
            };
            if seen.insert(candidate.identity()) {
                out.push(candidate);
            } else if let Some(existing) = out
                .iter_mut()
                .find(|p| p.identity() == candidate.identity())
                && existing.gender.is_none()
            {
                existing.gender = candidate.gender;
            }
        }
    }

    let base_ids: BTreeSet<(String, String)> = out
        .iter()
        .filter(|p| p.bucket == Bucket::Base)
        .map(|p| (normalize_role(&p.base_role), fold(&p.name)))
        .collect();
    for p in out
        .iter_mut()
        .filter(|p| matches!(p.bucket, Bucket::Prelight | Bucket::Pickup))
    {
        p.also_in_base = base_ids.contains(&(normalize_role(&p.base_role), fold(&p.name)));
    }

    out
}

/// Reinforcement staff of a week: folded name → role as listed.
///
/// The first listing wins; a compound `REF` code beats a plain one.
pub fn reinforcement_index(week: &WorkWeek) -> BTreeMap<String, String> {
    let mut index: BTreeMap<String, String> = BTreeMap::new();
    for (_, day) in week.dated_days() {
        if day.category.is_rest() {
            continue;
        }
        for (_, person) in day.all_members().filter(|(_, p)| p.is_reinforcement()) {
            let role = person.role.trim().to_string();
            index
                .entry(fold(&person.name))
                .and_modify(|r| {
                    if r.len() <= REINFORCEMENT_PREFIX.len() && role.len() > r.len() {
                        *r = role.clone();
                    }
                })
                .or_insert(role);
        }
    }
    index
}
