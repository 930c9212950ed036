//! Role → price row resolution.
//!
//! A row is looked up in the catalog of the role's block (prelight, pickup or
//! base), then in the base catalog, then under "Eléctrico". Reinforcement
//! staff are priced from the base catalog only, with their own chain.

use crate::models::mode::{ModeRules, ProjectMode};
use crate::models::person::Bucket;
use crate::models::price::{
    CatalogParams, MaterialPropioType, PriceCatalog, PriceRow, PriceTable, RawPriceRow, RowField,
    row_is_empty, row_raw, row_value,
};
use crate::utils::normalize::{
    FALLBACK_ROLE_LABEL, bucket_from_suffix, is_reinforcement_code, normalize_role, resolve_key,
    role_label, strip_block_suffix,
};
use crate::utils::parse::parse_number;

pub struct PriceResolver<'a> {
    catalog: &'a PriceCatalog,
    params: CatalogParams,
    rules: ModeRules,
}

impl<'a> PriceResolver<'a> {
    pub fn new(catalog: &'a PriceCatalog, mode: ProjectMode) -> Self {
        Self {
            catalog,
            params: CatalogParams::from_raw(&catalog.params),
            rules: mode.rules(),
        }
    }

    pub fn params(&self) -> &CatalogParams {
        &self.params
    }

    /// Travel-day divisor: catalog parameter, else the mode default.
    pub fn travel_divisor(&self) -> f64 {
        self.params
            .travel_divisor
            .unwrap_or(self.rules.travel_divisor)
    }

    /// Price row for a role code as written (`G`, `GP`, `BBR`, `REF`, `REFE`).
    ///
    /// `base_role` is the role a reinforcement member stands in for.
    pub fn get_for_role(&self, role: &str, base_role: Option<&str>) -> PriceRow {
        if is_reinforcement_code(role) {
            return self.get_for_bucket(Bucket::Reinforcement, base_role.unwrap_or(""));
        }
        self.get_for_bucket(bucket_from_suffix(role), &strip_block_suffix(role))
    }

    /// Price row for a base role accounted in `bucket`.
    pub fn get_for_bucket(&self, bucket: Bucket, base_role: &str) -> PriceRow {
        if self.rules.zero_unknown_roles && !self.has_configured_row(bucket, base_role) {
            return PriceRow::default();
        }
        match bucket {
            Bucket::Reinforcement => self.reinforcement_row(base_role),
            _ => self.standard_row(bucket, base_role),
        }
    }

    /// Whether the catalog holds a row that prices this role at all.
    ///
    /// Reinforcement counts as configured when either the role it stands in
    /// for or the fallback role has a row.
    pub fn has_configured_row(&self, bucket: Bucket, base_role: &str) -> bool {
        match bucket {
            Bucket::Reinforcement => {
                (!base_role.trim().is_empty() && find_row(&self.catalog.prices, base_role).is_some())
                    || self.fallback_row().is_some()
            }
            _ => self
                .block_table(bucket)
                .and_then(|t| find_row(t, base_role))
                .or_else(|| find_row(&self.catalog.prices, base_role))
                .is_some(),
        }
    }

    fn block_table(&self, bucket: Bucket) -> Option<&'a PriceTable> {
        match bucket {
            Bucket::Prelight => Some(&self.catalog.prices_prelight),
            Bucket::Pickup => Some(&self.catalog.prices_pickup),
            _ => None,
        }
    }

    fn fallback_row(&self) -> Option<&'a RawPriceRow> {
        find_row(&self.catalog.prices, FALLBACK_ROLE_LABEL)
    }

    fn standard_row(&self, bucket: Bucket, base_role: &str) -> PriceRow {
        let block_row = self
            .block_table(bucket)
            .and_then(|t| find_row(t, base_role))
            .filter(|r| !row_is_empty(r));

        let raw = block_row
            .or_else(|| find_row(&self.catalog.prices, base_role).filter(|r| !row_is_empty(r)))
            .or_else(|| self.fallback_row());

        match raw {
            Some(row) => self.build_row(row),
            None => self.with_globals(PriceRow::default()),
        }
    }

    fn reinforcement_row(&self, base_role: &str) -> PriceRow {
        let target = Some(base_role.trim())
            .filter(|r| !r.is_empty())
            .and_then(|r| find_row(&self.catalog.prices, r))
            .filter(|r| !row_is_empty(r));
        let fallback = self.fallback_row();

        let positive = |row: Option<&RawPriceRow>, field: RowField| {
            row.map(|r| row_value(r, field)).filter(|v| *v > 0.0)
        };

        let jornada = positive(target, RowField::Refuerzo)
            .or_else(|| positive(target, RowField::Jornada))
            .or_else(|| positive(fallback, RowField::Refuerzo))
            .or_else(|| positive(fallback, RowField::Jornada))
            .unwrap_or(0.0);

        let travel_day = positive(target, RowField::TravelRefuerzo)
            .or_else(|| positive(fallback, RowField::TravelRefuerzo))
            .unwrap_or_else(|| jornada / self.travel_divisor());

        // Overtime and holiday rates come from the fallback role first.
        let hora_extra = positive(fallback, RowField::HoraExtra)
            .or_else(|| positive(target, RowField::HoraExtra))
            .unwrap_or(0.0);
        let holiday_day = positive(fallback, RowField::HolidayDay)
            .or_else(|| positive(target, RowField::HolidayDay))
            .unwrap_or(0.0);

        let extras = target.or(fallback).map(|r| self.build_row(r)).unwrap_or_default();

        self.with_globals(PriceRow {
            jornada,
            travel_day,
            hora_extra,
            holiday_day,
            ..extras
        })
    }

    fn build_row(&self, raw: &RawPriceRow) -> PriceRow {
        let jornada = row_value(raw, RowField::Jornada);
        let explicit_travel = row_value(raw, RowField::TravelDay);
        let optional = |field: RowField| row_raw(raw, field).map(parse_number);

        let material_propio_value = optional(RowField::MaterialPropio).filter(|v| *v > 0.0);
        let material_propio_type = material_propio_value.map(|_| {
            row_raw(raw, RowField::MaterialPropioTipo)
                .and_then(MaterialPropioType::from_value)
                .unwrap_or(MaterialPropioType::Diario)
        });

        self.with_globals(PriceRow {
            jornada,
            travel_day: if explicit_travel > 0.0 {
                explicit_travel
            } else {
                jornada / self.travel_divisor()
            },
            hora_extra: row_value(raw, RowField::HoraExtra),
            holiday_day: row_value(raw, RowField::HolidayDay),
            material_propio_value,
            material_propio_type,
            carga_descarga: optional(RowField::CargaDescarga),
            localizacion_tecnica: optional(RowField::LocalizacionTecnica),
            factor_hora_extra_festiva: optional(RowField::FactorHoraExtraFestiva)
                .filter(|v| *v > 0.0)
                .or(self.params.festive_factor),
            precio_mensual: optional(RowField::PrecioMensual),
            ..Default::default()
        })
    }

    /// Per-diem, transport and mileage rates are catalog-wide.
    fn with_globals(&self, row: PriceRow) -> PriceRow {
        PriceRow {
            transporte: self.params.transporte,
            km: self.params.km,
            dietas: self.params.dietas.clone(),
            ..row
        }
    }
}

/// Find a role's row: exact, folded, squashed over code and label, then the
/// suffix-stripped forms, then any key with the same canonical role.
pub fn find_row<'t>(table: &'t PriceTable, role: &str) -> Option<&'t RawPriceRow> {
    let role = role.trim();
    if role.is_empty() || table.is_empty() {
        return None;
    }

    let mut direct = vec![role.to_string()];
    if let Some(label) = role_label(role) {
        direct.push(label.to_string());
    }
    if let Some(row) = resolve_key(table, &direct) {
        return Some(row);
    }

    let stripped = strip_block_suffix(role);
    if stripped != role {
        let mut candidates = vec![stripped.clone()];
        if let Some(label) = role_label(&stripped) {
            candidates.push(label.to_string());
        }
        if let Some(row) = resolve_key(table, &candidates) {
            return Some(row);
        }
    }

    let canonical: Vec<String> = direct.iter().map(|c| normalize_role(c)).collect();
    table
        .iter()
        .find(|(k, _)| {
            let key = normalize_role(k);
            canonical.contains(&key)
                || role_label(k).is_some_and(|l| canonical.contains(&normalize_role(l)))
        })
        .map(|(_, row)| row)
}
