//! Row enrichment: worked days, prices, effective quantities and money.

use crate::core::classifier::{calc_worked_breakdown, display_role, monthly_working_days};
use crate::core::prices::PriceResolver;
use crate::models::mode::{DayFormula, ProjectMode};
use crate::models::payroll::{
    EnrichedPayrollRow, OverrideMap, PersonTotals, Subtotals, WorkedBreakdown,
};
use crate::models::person::Bucket;
use crate::models::plan::WorkWeek;
use crate::models::price::{MaterialPropioType, PriceField, PriceRow};
use crate::models::report::{Concept, ConceptTotals};
use crate::utils::date::{DateRange, MonthKey};
use crate::utils::formatting::round_cents;
use crate::utils::normalize::resolve_storage_key;
use std::collections::{BTreeMap, BTreeSet};

/// Everything besides the rows that enrichment depends on.
pub struct EnrichInput<'a> {
    pub weeks: &'a [WorkWeek],
    pub month: MonthKey,
    /// Date filter the rows were aggregated with.
    pub filter: Option<&'a DateRange>,
    pub resolver: &'a PriceResolver<'a>,
    /// Overtime window totals by bucket key.
    pub window: Option<&'a BTreeMap<String, ConceptTotals>>,
    pub overrides: Option<&'a OverrideMap>,
    pub mode: ProjectMode,
}

/// Price every aggregated row.
pub fn enrich_rows(rows: &[PersonTotals], input: &EnrichInput<'_>) -> Vec<EnrichedPayrollRow> {
    rows.iter().map(|row| enrich_row(row, input)).collect()
}

fn enrich_row(row: &PersonTotals, input: &EnrichInput<'_>) -> EnrichedPayrollRow {
    let worked = calc_worked_breakdown(input.weeks, input.filter, row, input.mode);
    let role = display_role(row, &worked);
    let prices = input.resolver.get_for_bucket(row.bucket, &row.base_role);

    let (quantities, window_applied, override_applied) = effective_quantities(row, input);

    let rules = input.mode.rules();
    let working_days_in_month = (rules.day_formula == DayFormula::MonthlySpan)
        .then(|| monthly_working_days(input.weeks, row, input.month, input.mode));

    let subtotals = compute_subtotals(
        input.mode,
        &worked,
        working_days_in_month.unwrap_or(0),
        &quantities,
        &prices,
        input.resolver.params().monthly_price_days,
    );
    let missing_prices = missing_prices(
        input.mode,
        &worked,
        working_days_in_month.unwrap_or(0),
        &quantities,
        &prices,
    );

    EnrichedPayrollRow {
        month: input.month.to_string(),
        role,
        base_role: row.base_role.clone(),
        name: row.name.clone(),
        bucket: row.bucket,
        reinforcement: row.bucket == Bucket::Reinforcement,
        gender: row.gender,
        worked,
        working_days_in_month,
        quantities,
        prices,
        total_gross: round_cents(subtotals.gross()),
        subtotals,
        missing_prices,
        window_applied,
        override_applied,
    }
}

/// Manual override → window totals → aggregated totals, per concept.
///
/// A non-zero window value replaces the aggregated one. A zero window value
/// only applies when the month also sums to zero, so "No"/"0" cells inside
/// the window never wipe out data recorded elsewhere in the month.
fn effective_quantities(row: &PersonTotals, input: &EnrichInput<'_>) -> (ConceptTotals, bool, bool) {
    let mut totals = row.totals.clone();
    let bucket_key = row.bucket_key();

    let mut window_applied = false;
    if let Some(window) = input.window
        && let Some(w) = window.get(&bucket_key)
    {
        for concept in Concept::WINDOWED {
            let value = w.get(concept);
            let applies = value != 0.0
                || (w.recorded.contains(&concept) && totals.get(concept) == 0.0);
            if applies {
                totals.take(concept, w);
                window_applied = true;
            }
        }
    }

    let mut override_applied = false;
    if let Some(overrides) = input.overrides
        && let Some(manual) = resolve_storage_key(overrides, &[bucket_key, row.storage_key()])
        && !manual.is_empty()
    {
        manual.apply(&mut totals);
        override_applied = true;
    }

    (totals, window_applied, override_applied)
}

fn day_rate(mode: ProjectMode, prices: &PriceRow, monthly_price_days: f64) -> f64 {
    match mode.rules().day_formula {
        DayFormula::MonthlySpan => match prices.precio_mensual {
            Some(m) if m > 0.0 && monthly_price_days > 0.0 => m / monthly_price_days,
            _ => prices.jornada,
        },
        _ => prices.jornada,
    }
}

fn billable_days(mode: ProjectMode, worked: &WorkedBreakdown, span: u32) -> f64 {
    match mode.rules().day_formula {
        DayFormula::PerWorkedDay => f64::from(worked.worked_days),
        DayFormula::MonthlySpan => f64::from(span),
        DayFormula::PerBilledDay => f64::from(worked.billed_days()),
    }
}

fn dietas_total(q: &ConceptTotals, prices: &PriceRow) -> f64 {
    q.dietas
        .iter()
        .map(|(label, n)| f64::from(*n) * prices.diet_rate(label))
        .sum::<f64>()
        + q.ticket
        + q.otros
}

fn material_propio_total(q: &ConceptTotals, prices: &PriceRow) -> f64 {
    let Some(value) = prices.material_propio_value else {
        return 0.0;
    };
    match prices.material_propio_type.unwrap_or(MaterialPropioType::Diario) {
        MaterialPropioType::Diario => q.material_propio * value,
        MaterialPropioType::Semanal => q.material_propio_weeks.len() as f64 * value,
    }
}

/// Money per concept for one row.
pub fn compute_subtotals(
    mode: ProjectMode,
    worked: &WorkedBreakdown,
    span: u32,
    q: &ConceptTotals,
    prices: &PriceRow,
    monthly_price_days: f64,
) -> Subtotals {
    let rules = mode.rules();

    let total_extras = if rules.festive_night {
        let factor = prices.factor_hora_extra_festiva.unwrap_or(1.0);
        (q.horas_extra + q.turnaround + q.penalty_lunch) * prices.hora_extra
            + q.nocturnidad * prices.hora_extra * factor
    } else {
        q.overtime_units() * prices.hora_extra
    };

    let (total_localizacion, total_carga_descarga) = if rules.extended_categories {
        (
            f64::from(worked.localizacion_days) * prices.localizacion_tecnica.unwrap_or(0.0),
            f64::from(worked.load_unload_days()) * prices.carga_descarga.unwrap_or(0.0),
        )
    } else {
        (0.0, 0.0)
    };

    Subtotals {
        total_dias: round_cents(
            billable_days(mode, worked, span) * day_rate(mode, prices, monthly_price_days),
        ),
        total_travel: round_cents(f64::from(worked.travel_days) * prices.travel_day),
        total_holidays: round_cents(f64::from(worked.holiday_days) * prices.holiday_day),
        total_extras: round_cents(total_extras),
        total_dietas: round_cents(dietas_total(q, prices)),
        total_transporte: round_cents(q.transporte * prices.transporte),
        total_km: round_cents(q.kilometraje * prices.km),
        total_material_propio: round_cents(material_propio_total(q, prices)),
        total_localizacion: round_cents(total_localizacion),
        total_carga_descarga: round_cents(total_carga_descarga),
    }
}

/// Concepts used on the row whose price is zero.
pub fn missing_prices(
    mode: ProjectMode,
    worked: &WorkedBreakdown,
    span: u32,
    q: &ConceptTotals,
    prices: &PriceRow,
) -> BTreeSet<PriceField> {
    let rules = mode.rules();
    let unpriced = |usage: f64, rate: f64| usage > 0.0 && rate <= 0.0;
    let mut out = BTreeSet::new();

    let day_rate = match rules.day_formula {
        DayFormula::MonthlySpan => prices.precio_mensual.filter(|m| *m > 0.0).unwrap_or(prices.jornada),
        _ => prices.jornada,
    };
    if unpriced(billable_days(mode, worked, span), day_rate) {
        out.insert(PriceField::Jornada);
    }
    if unpriced(f64::from(worked.travel_days), prices.travel_day) {
        out.insert(PriceField::TravelDay);
    }
    if unpriced(f64::from(worked.holiday_days), prices.holiday_day) {
        out.insert(PriceField::HolidayDay);
    }
    if unpriced(q.overtime_units(), prices.hora_extra) {
        out.insert(PriceField::HoraExtra);
    }
    if q
        .dietas
        .iter()
        .any(|(label, n)| unpriced(f64::from(*n), prices.diet_rate(label)))
    {
        out.insert(PriceField::Dietas);
    }
    if unpriced(q.transporte, prices.transporte) {
        out.insert(PriceField::Transporte);
    }
    if unpriced(q.kilometraje, prices.km) {
        out.insert(PriceField::Km);
    }
    if unpriced(q.material_propio, prices.material_propio_value.unwrap_or(0.0)) {
        out.insert(PriceField::MaterialPropio);
    }
    if rules.extended_categories {
        if unpriced(
            f64::from(worked.load_unload_days()),
            prices.carga_descarga.unwrap_or(0.0),
        ) {
            out.insert(PriceField::CargaDescarga);
        }
        if unpriced(
            f64::from(worked.localizacion_days),
            prices.localizacion_tecnica.unwrap_or(0.0),
        ) {
            out.insert(PriceField::LocalizacionTecnica);
        }
    }
    out
}
