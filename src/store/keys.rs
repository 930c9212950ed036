//! Store key layout.

use crate::models::mode::ProjectMode;
use crate::models::plan::WorkWeek;
use crate::utils::date::{MonthKey, iso};

pub const PLAN_PREFIX: &str = "plan_";
pub const PROJECT_PREFIX: &str = "project_";
pub const CATALOG_PREFIX: &str = "cond_";
pub const REPORT_PREFIX: &str = "reportes_";
pub const OVERRIDES_PREFIX: &str = "nomina_overrides_";

pub fn plan_key(project_id: &str) -> String {
    format!("{PLAN_PREFIX}{project_id}")
}

pub fn project_key(project_id: &str) -> String {
    format!("{PROJECT_PREFIX}{project_id}")
}

pub fn catalog_key(project_id: &str, mode: ProjectMode) -> String {
    format!("{CATALOG_PREFIX}{project_id}_{}", mode.key())
}

/// `reportes_<id>_<d1>_..._<d7>`
pub fn report_key(project_id: &str, week: &WorkWeek) -> String {
    let dates: Vec<String> = week.dates().into_iter().map(iso).collect();
    format!("{REPORT_PREFIX}{project_id}_{}", dates.join("_"))
}

pub fn overrides_key(project_id: &str, month: MonthKey) -> String {
    format!("{OVERRIDES_PREFIX}{project_id}_{month}")
}

/// Project ids referenced by plan keys.
pub fn project_id_from_plan_key(key: &str) -> Option<&str> {
    key.strip_prefix(PLAN_PREFIX).filter(|id| !id.is_empty())
}
