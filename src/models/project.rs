use crate::models::mode::ProjectMode;
use crate::models::payroll::OverrideMap;
use crate::models::plan::Plan;
use crate::models::price::PriceCatalog;
use crate::models::report::ReportBook;
use crate::utils::date::MonthKey;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// `project_<id>`. Only the mode matters to the engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    #[serde(default)]
    pub id: String,

    #[serde(default, alias = "nombre", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, alias = "modo", skip_serializing_if = "Option::is_none")]
    pub mode: Option<ProjectMode>,
}

impl Project {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            ..Default::default()
        }
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }
}

/// Everything a payroll computation reads, loaded up front.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectData {
    pub project: Project,
    pub plan: Plan,
    pub catalog: PriceCatalog,
    pub reports: ReportBook,
    pub overrides: BTreeMap<MonthKey, OverrideMap>,
}

impl ProjectData {
    pub fn new(project: Project, plan: Plan, catalog: PriceCatalog) -> Self {
        Self {
            project,
            plan,
            catalog,
            ..Default::default()
        }
    }
}
