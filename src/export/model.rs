// src/export/model.rs

use crate::core::logic::MonthPayroll;
use crate::models::payroll::EnrichedPayrollRow;
use crate::utils::formatting::round_cents;
use serde::Serialize;

/// Flat payroll record shared by the CSV and JSON exports.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct PayrollExport {
    pub month: String,
    pub project: String,
    pub mode: String,
    pub role: String,
    pub base_role: String,
    pub name: String,
    pub block: String,
    pub reinforcement: bool,
    pub worked_days: u32,
    pub holiday_days: u32,
    pub travel_days: u32,
    pub load_unload_days: u32,
    pub location_days: u32,
    pub working_days_in_month: Option<u32>,
    pub overtime_hours: f64,
    pub turnaround_hours: f64,
    pub night_shifts: f64,
    pub penalty_lunch: f64,
    pub per_diems: String,
    pub ticket: f64,
    pub otros: f64,
    pub transport_days: f64,
    pub km: f64,
    pub own_equipment: f64,
    pub total_dias: f64,
    pub total_travel: f64,
    pub total_holidays: f64,
    pub total_extras: f64,
    pub total_dietas: f64,
    pub total_transporte: f64,
    pub total_km: f64,
    pub total_material_propio: f64,
    pub total_localizacion: f64,
    pub total_carga_descarga: f64,
    pub total_gross: f64,
    pub missing_prices: String,
    pub window_applied: bool,
    pub override_applied: bool,
}

impl PayrollExport {
    pub fn from_row(project: &str, payroll: &MonthPayroll, row: &EnrichedPayrollRow) -> Self {
        let q = &row.quantities;
        let s = &row.subtotals;
        let per_diems: Vec<String> = q
            .dietas
            .iter()
            .filter(|(_, n)| **n > 0)
            .map(|(label, n)| format!("{label}:{n}"))
            .collect();
        let missing: Vec<&str> = row.missing_prices.iter().map(|f| f.label()).collect();

        Self {
            month: row.month.clone(),
            project: project.to_string(),
            mode: payroll.mode.key().to_string(),
            role: row.role.clone(),
            base_role: row.base_role.clone(),
            name: row.name.clone(),
            block: row.bucket.as_str().to_string(),
            reinforcement: row.reinforcement,
            worked_days: row.worked.worked_days,
            holiday_days: row.worked.holiday_days,
            travel_days: row.worked.travel_days,
            load_unload_days: row.worked.load_unload_days(),
            location_days: row.worked.localizacion_days,
            working_days_in_month: row.working_days_in_month,
            overtime_hours: q.horas_extra,
            turnaround_hours: q.turnaround,
            night_shifts: q.nocturnidad,
            penalty_lunch: q.penalty_lunch,
            per_diems: per_diems.join("; "),
            ticket: round_cents(q.ticket),
            otros: round_cents(q.otros),
            transport_days: q.transporte,
            km: q.kilometraje,
            own_equipment: q.material_propio,
            total_dias: s.total_dias,
            total_travel: s.total_travel,
            total_holidays: s.total_holidays,
            total_extras: s.total_extras,
            total_dietas: s.total_dietas,
            total_transporte: s.total_transporte,
            total_km: s.total_km,
            total_material_propio: s.total_material_propio,
            total_localizacion: s.total_localizacion,
            total_carga_descarga: s.total_carga_descarga,
            total_gross: row.total_gross,
            missing_prices: missing.join("; "),
            window_applied: row.window_applied,
            override_applied: row.override_applied,
        }
    }
}

/// Flatten every month into export records, months in order.
pub(crate) fn flatten<'a, I>(project: &str, months: I) -> Vec<PayrollExport>
where
    I: IntoIterator<Item = &'a MonthPayroll>,
{
    months
        .into_iter()
        .flat_map(|m| m.rows.iter().map(move |r| PayrollExport::from_row(project, m, r)))
        .collect()
}
