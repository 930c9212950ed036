#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use chrono::NaiveDate;
use crewpay::models::mode::ProjectMode;
use crewpay::models::plan::Plan;
use crewpay::models::price::PriceCatalog;
use crewpay::models::project::{Project, ProjectData};
use crewpay::models::report::ReportSheet;
use serde_json::{Value, json};
use std::env;
use std::fs;
use std::path::PathBuf;

pub fn crewpay() -> Command {
    cargo_bin_cmd!("crewpay")
}

/// Create a unique test DB path inside the system temp dir and remove any existing file
pub fn setup_test_db(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_crewpay.sqlite", name));
    let db_path = path.to_string_lossy().to_string();
    fs::remove_file(&db_path).ok();
    db_path
}

/// Create a temporary output file path inside tempdir and ensure it's removed
pub fn temp_out(name: &str, ext: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_out.{}", name, ext));
    let p = path.to_string_lossy().to_string();
    fs::remove_file(&p).ok();
    p
}

pub fn d(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").expect("valid test date")
}

/// Plan day: category plus base team as (role, name) pairs.
pub fn day(category: &str, team: &[(&str, &str)]) -> Value {
    let base: Vec<Value> = team
        .iter()
        .map(|(role, name)| json!({ "role": role, "name": name }))
        .collect();
    json!({ "category": category, "base": base })
}

/// Week of seven identical days.
pub fn uniform_week(start: &str, category: &str, team: &[(&str, &str)]) -> Value {
    let days: Vec<Value> = (0..7).map(|_| day(category, team)).collect();
    json!({ "startDate": start, "days": days })
}

pub fn week(start: &str, days: Vec<Value>) -> Value {
    json!({ "startDate": start, "days": days })
}

pub fn plan(weeks: Vec<Value>) -> Plan {
    let (plan, skipped) = Plan::from_json(&json!({ "pro": weeks }));
    assert_eq!(skipped, 0, "test plan has malformed weeks");
    plan
}

/// Catalog with one `prices` table and optional params.
pub fn catalog(prices: Value, params: Value) -> PriceCatalog {
    PriceCatalog::from_json(&json!({ "prices": prices, "params": params }))
}

pub fn project_data(plan: Plan, catalog: PriceCatalog, mode: ProjectMode) -> ProjectData {
    let mut project = Project::new("demo");
    project.mode = Some(mode);
    ProjectData::new(project, plan, catalog)
}

/// Attach a report sheet to the week starting at `start`.
pub fn with_sheet(data: &mut ProjectData, start: &str, sheet: Value) {
    data.reports.insert(d(start), ReportSheet::from_json(&sheet));
}

/// Write a JSON bundle for `crewpay import` and return its path.
pub fn write_bundle(name: &str, bundle: &Value) -> String {
    let path = temp_out(name, "json");
    fs::write(&path, serde_json::to_string_pretty(bundle).expect("serializable bundle"))
        .expect("write bundle");
    path
}
