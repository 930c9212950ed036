//! Aggregated and enriched payroll rows.

use crate::models::person::{Bucket, Gender};
use crate::models::price::{PriceField, PriceRow};
use crate::models::report::{Concept, ConceptTotals};
use crate::utils::normalize::{REINFORCEMENT_PREFIX, fold, storage_key};
use crate::utils::parse::{DietLabel, parse_number};
use chrono::NaiveDate;
use serde::Serialize;
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};

/// Report totals of one person in one bucket over a date range.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonTotals {
    pub bucket: Bucket,
    /// Role without block suffix or `REF` prefix.
    pub base_role: String,
    /// Role exactly as listed in the plan (keeps `REFBB`-style compounds).
    pub listed_role: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
    pub totals: ConceptTotals,
}

impl PersonTotals {
    pub fn new(bucket: Bucket, base_role: &str, listed_role: &str, name: &str) -> Self {
        Self {
            bucket,
            base_role: base_role.to_string(),
            listed_role: listed_role.to_string(),
            name: name.trim().to_string(),
            gender: None,
            totals: ConceptTotals::default(),
        }
    }

    /// Role as shown for the bucket: `G`, `GP`, `GR` or `REF`.
    pub fn visible_role(&self) -> String {
        match self.bucket {
            Bucket::Reinforcement => REINFORCEMENT_PREFIX.to_string(),
            b => format!("{}{}", self.base_role, b.role_suffix()),
        }
    }

    /// Key shared by window buckets and manual overrides.
    pub fn bucket_key(&self) -> String {
        format!("{}__{}", fold(&self.visible_role()), fold(&self.name))
    }

    pub fn storage_key(&self) -> String {
        storage_key(&self.base_role, &self.name, self.bucket)
    }
}

/// Day counts of a person by category.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkedBreakdown {
    /// Regular worked days (shooting and every other working category).
    pub worked_days: u32,
    pub holiday_days: u32,
    pub travel_days: u32,
    pub carga_days: u32,
    pub descarga_days: u32,
    pub localizacion_days: u32,
    pub oficina_days: u32,
    pub pruebas_camara_days: u32,
    /// Days found in each day block.
    pub base_block_days: u32,
    pub prelight_block_days: u32,
    pub pickup_block_days: u32,
    #[serde(skip)]
    pub dates: Vec<NaiveDate>,
}

impl WorkedBreakdown {
    /// Days billed at the day rate in advertising mode.
    pub fn billed_days(&self) -> u32 {
        self.carga_days
            + self.descarga_days
            + self.worked_days
            + self.pruebas_camara_days
            + self.oficina_days
    }

    pub fn load_unload_days(&self) -> u32 {
        self.carga_days + self.descarga_days
    }
}

/// Monetary subtotals of one row, rounded to cents.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Subtotals {
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
}

impl Subtotals {
    pub fn gross(&self) -> f64 {
        self.total_dias
            + self.total_travel
            + self.total_holidays
            + self.total_extras
            + self.total_dietas
            + self.total_transporte
            + self.total_km
            + self.total_material_propio
            + self.total_localizacion
            + self.total_carga_descarga
    }
}

/// Per-person manual corrections for a month (`nomina_overrides_<id>_<YYYY-MM>`).
///
/// Only concepts with a defined value override anything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ManualOverride {
    pub values: BTreeMap<Concept, f64>,
    pub dietas: Option<BTreeMap<DietLabel, u32>>,
    pub ticket: Option<f64>,
    pub otros: Option<f64>,
}

impl ManualOverride {
    pub fn from_json(value: &Value) -> Self {
        let mut out = Self::default();
        let Some(obj) = value.as_object() else {
            return out;
        };

        for (key, raw) in obj {
            if raw.is_null() {
                continue;
            }
            match DietLabel::from_label(key) {
                DietLabel::Ticket => {
                    out.ticket = Some(parse_number(raw));
                    continue;
                }
                DietLabel::Otros => {
                    out.otros = Some(parse_number(raw));
                    continue;
                }
                _ => {}
            }
            match Concept::from_label(key) {
                Some(Concept::Dietas) => {
                    if let Some(map) = raw.as_object() {
                        out.dietas = Some(
                            map.iter()
                                .map(|(label, n)| {
                                    (
                                        DietLabel::from_label(label),
                                        parse_number(n).max(0.0).round() as u32,
                                    )
                                })
                                .collect(),
                        );
                    }
                }
                Some(concept) => {
                    out.values.insert(concept, parse_number(raw));
                }
                None => {}
            }
        }
        out
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty() && self.dietas.is_none() && self.ticket.is_none() && self.otros.is_none()
    }

    /// Apply every defined value onto `totals`.
    pub fn apply(&self, totals: &mut ConceptTotals) {
        for (concept, value) in &self.values {
            totals.set(*concept, *value);
        }
        if let Some(dietas) = &self.dietas {
            totals.dietas = dietas.clone();
        }
        if let Some(t) = self.ticket {
            totals.ticket = t;
        }
        if let Some(o) = self.otros {
            totals.otros = o;
        }
    }
}

/// Manual overrides of one month keyed by bucket or storage key.
pub type OverrideMap = BTreeMap<String, ManualOverride>;

/// One priced payroll row: a person, in a bucket, for a month.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedPayrollRow {
    pub month: String,
    pub role: String,
    pub base_role: String,
    pub name: String,
    pub bucket: Bucket,
    pub reinforcement: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
    pub worked: WorkedBreakdown,
    /// Engagement span inside the month (monthly mode).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub working_days_in_month: Option<u32>,
    pub quantities: ConceptTotals,
    pub prices: PriceRow,
    #[serde(flatten)]
    pub subtotals: Subtotals,
    pub total_gross: f64,
    pub missing_prices: BTreeSet<PriceField>,
    pub window_applied: bool,
    pub override_applied: bool,
}

impl EnrichedPayrollRow {
    pub fn has_missing_prices(&self) -> bool {
        !self.missing_prices.is_empty()
    }
}
