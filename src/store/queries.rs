//! Loading a project snapshot from the store.
//!
//! Every document is read up front. A document that cannot be read or parsed
//! only empties its own scope (one week, the catalog, the overrides of one
//! month) and is reported as a warning.

use crate::errors::{AppError, AppResult};
use crate::models::mode::ProjectMode;
use crate::models::payroll::{ManualOverride, OverrideMap};
use crate::models::plan::Plan;
use crate::models::price::PriceCatalog;
use crate::models::project::{Project, ProjectData};
use crate::models::report::ReportSheet;
use crate::store::keys;
use crate::store::kv::KvStore;
use crate::utils::date::MonthKey;
use serde_json::Value;

/// Result of [`load_project_data`].
#[derive(Debug, Clone)]
pub struct LoadedProject {
    pub data: ProjectData,
    /// Mode the payroll must be computed in.
    pub mode: ProjectMode,
    /// Mode whose catalog was found, if any.
    pub catalog_mode: Option<ProjectMode>,
    pub warnings: Vec<String>,
}

fn read_or_warn<S: KvStore>(store: &S, key: &str, warnings: &mut Vec<String>) -> Option<Value> {
    match store.get_json(key) {
        Ok(v) => v,
        Err(e) => {
            warnings.push(format!("Ignoring unreadable entry '{key}': {e}"));
            None
        }
    }
}

/// Price catalog for `mode`, falling back to the other modes in a fixed
/// order. An empty catalog when nothing usable is stored.
pub fn load_catalog<S: KvStore>(
    store: &S,
    project_id: &str,
    mode: ProjectMode,
    warnings: &mut Vec<String>,
) -> (PriceCatalog, Option<ProjectMode>) {
    let order = std::iter::once(mode).chain(
        ProjectMode::CATALOG_FALLBACK
            .into_iter()
            .filter(move |m| *m != mode),
    );

    for candidate in order {
        let key = keys::catalog_key(project_id, candidate);
        if let Some(value) = read_or_warn(store, &key, warnings) {
            return (PriceCatalog::from_json(&value), Some(candidate));
        }
    }
    (PriceCatalog::default(), None)
}

/// Manual overrides of every month stored for the project. A failed key
/// listing yields no overrides.
pub fn load_overrides<S: KvStore>(
    store: &S,
    project_id: &str,
    warnings: &mut Vec<String>,
) -> Vec<(MonthKey, OverrideMap)> {
    let prefix = format!("{}{}_", keys::OVERRIDES_PREFIX, project_id);
    let mut out = Vec::new();

    let month_keys = match store.keys_with_prefix(&prefix) {
        Ok(k) => k,
        Err(e) => {
            warnings.push(format!("Ignoring manual overrides of '{project_id}': {e}"));
            return out;
        }
    };

    for key in month_keys {
        let Some(month) = key
            .strip_prefix(&prefix)
            .and_then(|m| MonthKey::parse(m).ok())
        else {
            continue;
        };
        let Some(Value::Object(entries)) = read_or_warn(store, &key, warnings) else {
            continue;
        };
        let map: OverrideMap = entries
            .iter()
            .map(|(bucket, raw)| (bucket.clone(), ManualOverride::from_json(raw)))
            .filter(|(_, o)| !o.is_empty())
            .collect();
        out.push((month, map));
    }
    out
}

/// Read plan, project, catalog, week sheets and overrides of a project.
///
/// `mode` forces the computation mode; otherwise the project's own mode is
/// used, then `default_mode`. Fails only when neither a plan nor a project
/// document exists.
pub fn load_project_data<S: KvStore>(
    store: &S,
    project_id: &str,
    mode: Option<ProjectMode>,
    default_mode: ProjectMode,
) -> AppResult<LoadedProject> {
    let mut warnings = Vec::new();

    let project_raw = read_or_warn(store, &keys::project_key(project_id), &mut warnings);
    let plan_raw = read_or_warn(store, &keys::plan_key(project_id), &mut warnings);

    if project_raw.is_none() && plan_raw.is_none() {
        return Err(AppError::ProjectNotFound(project_id.to_string()));
    }

    let mut project = project_raw
        .and_then(|v| match serde_json::from_value::<Project>(v) {
            Ok(p) => Some(p),
            Err(e) => {
                warnings.push(format!("Project '{project_id}' metadata ignored: {e}"));
                None
            }
        })
        .unwrap_or_else(|| Project::new(project_id));
    if project.id.trim().is_empty() {
        project.id = project_id.to_string();
    }

    let plan = match plan_raw {
        Some(v) => {
            let (plan, skipped) = Plan::from_json(&v);
            if skipped > 0 {
                warnings.push(format!(
                    "Plan of '{project_id}': {skipped} malformed week(s) skipped"
                ));
            }
            plan
        }
        None => Plan::default(),
    };
    if plan.is_empty() {
        warnings.push(format!("Project '{project_id}' has no planned weeks"));
    }

    let effective_mode = mode.or(project.mode).unwrap_or(default_mode);
    let (catalog, catalog_mode) = load_catalog(store, project_id, effective_mode, &mut warnings);

    let mut data = ProjectData::new(project, plan, catalog);

    for week in data.plan.ordered_weeks() {
        let key = keys::report_key(project_id, &week);
        if let Some(value) = read_or_warn(store, &key, &mut warnings) {
            data.reports
                .insert(week.start_date, ReportSheet::from_json(&value));
        }
    }

    for (month, map) in load_overrides(store, project_id, &mut warnings) {
        data.overrides.insert(month, map);
    }

    Ok(LoadedProject {
        data,
        mode: effective_mode,
        catalog_mode,
        warnings,
    })
}

/// Ids of every project with a stored plan.
pub fn list_projects<S: KvStore>(store: &S) -> AppResult<Vec<String>> {
    Ok(store
        .keys_with_prefix(keys::PLAN_PREFIX)?
        .iter()
        .filter_map(|k| keys::project_id_from_plan_key(k))
        .map(str::to_string)
        .collect())
}
