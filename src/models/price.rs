//! Price catalog as stored (`cond_<projectId>_<mode>`) and the resolved,
//! fully-populated price row the engine works with.

use crate::utils::normalize::{fold, resolve_key};
use crate::utils::parse::{DietLabel, parse_number};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Free-form catalog row: column label → raw value ("310,00 €", 45, ...).
pub type RawPriceRow = BTreeMap<String, Value>;

/// One catalog table: role label → row.
pub type PriceTable = BTreeMap<String, RawPriceRow>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceCatalog {
    #[serde(default)]
    pub prices: PriceTable,
    #[serde(default)]
    pub prices_prelight: PriceTable,
    #[serde(default)]
    pub prices_pickup: PriceTable,
    #[serde(default)]
    pub params: BTreeMap<String, Value>,
}

impl PriceCatalog {
    /// Build a catalog from stored JSON, skipping malformed rows instead of
    /// rejecting the whole document.
    pub fn from_json(value: &Value) -> Self {
        let Some(obj) = value.as_object() else {
            return Self::default();
        };

        let table = |names: &[&str]| -> PriceTable {
            names
                .iter()
                .find_map(|n| obj.get(*n))
                .and_then(Value::as_object)
                .map(|rows| {
                    rows.iter()
                        .filter_map(|(role, row)| {
                            row.as_object().map(|cols| {
                                (
                                    role.clone(),
                                    cols.iter().map(|(k, v)| (k.clone(), v.clone())).collect(),
                                )
                            })
                        })
                        .collect()
                })
                .unwrap_or_default()
        };

        Self {
            prices: table(&["prices", "precios"]),
            prices_prelight: table(&["pricesPrelight", "preciosPrelight"]),
            prices_pickup: table(&["pricesPickup", "preciosPickup"]),
            params: obj
                .get("params")
                .and_then(Value::as_object)
                .map(|p| p.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
                .unwrap_or_default(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
            && self.prices_prelight.is_empty()
            && self.prices_pickup.is_empty()
            && self.params.is_empty()
    }
}

/// Catalog columns the engine knows how to read, with their historical labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowField {
    Jornada,
    TravelDay,
    HoraExtra,
    HolidayDay,
    Refuerzo,
    TravelRefuerzo,
    PrecioMensual,
    CargaDescarga,
    LocalizacionTecnica,
    MaterialPropio,
    MaterialPropioTipo,
    FactorHoraExtraFestiva,
}

impl RowField {
    pub fn synonyms(&self) -> &'static [&'static str] {
        match self {
            RowField::Jornada => &["Precio jornada", "Jornada", "Precio dia", "jornada"],
            RowField::TravelDay => &["Travel day", "Precio travel day", "travelDay"],
            RowField::HoraExtra => &["Horas extras", "Hora extra", "Precio hora extra", "horaExtra"],
            RowField::HolidayDay => &[
                "Precio Día festivo",
                "Día festivo",
                "Festivo",
                "Precio festivo",
                "holidayDay",
            ],
            RowField::Refuerzo => &["Precio refuerzo", "Refuerzo", "Jornada refuerzo"],
            RowField::TravelRefuerzo => &["Travel day refuerzo", "Precio travel day refuerzo"],
            RowField::PrecioMensual => &["Precio mensual", "Mensual", "precioMensual"],
            RowField::CargaDescarga => &["Carga/descarga", "Carga descarga", "cargaDescarga"],
            RowField::LocalizacionTecnica => &[
                "Localización técnica",
                "Localizacion",
                "localizacionTecnica",
            ],
            RowField::MaterialPropio => &["Material propio", "Equipo propio", "materialPropioValue"],
            RowField::MaterialPropioTipo => &["Material propio tipo", "materialPropioType"],
            RowField::FactorHoraExtraFestiva => &[
                "Factor hora extra festiva",
                "Factor festivo",
                "factorHoraExtraFestiva",
            ],
        }
    }
}

/// Raw value of a column, if the row has it.
pub fn row_raw<'a>(row: &'a RawPriceRow, field: RowField) -> Option<&'a Value> {
    resolve_key(row, field.synonyms())
}

/// Parsed numeric column; absent or unparsable → 0.
pub fn row_value(row: &RawPriceRow, field: RowField) -> f64 {
    row_raw(row, field).map(parse_number).unwrap_or(0.0)
}

/// A row with no positive price at all counts as not configured.
pub fn row_is_empty(row: &RawPriceRow) -> bool {
    row.values().all(|v| parse_number(v) <= 0.0)
}

/// How own equipment is billed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaterialPropioType {
    Diario,
    Semanal,
}

impl MaterialPropioType {
    pub fn from_value(v: &Value) -> Option<Self> {
        match fold(v.as_str()?).as_str() {
            "diario" | "dia" | "daily" | "por dia" => Some(MaterialPropioType::Diario),
            "semanal" | "semana" | "weekly" | "por semana" => Some(MaterialPropioType::Semanal),
            _ => None,
        }
    }
}

/// Global catalog parameters (not per role).
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogParams {
    pub dietas: BTreeMap<String, f64>,
    pub transporte: f64,
    pub km: f64,
    pub travel_divisor: Option<f64>,
    pub monthly_price_days: f64,
    pub festive_factor: Option<f64>,
    pub overtime_close_day: Option<u32>,
    pub overtime_window_days: Option<u32>,
}

impl Default for CatalogParams {
    fn default() -> Self {
        Self {
            dietas: BTreeMap::new(),
            transporte: 0.0,
            km: 0.0,
            travel_divisor: None,
            monthly_price_days: DEFAULT_MONTHLY_PRICE_DAYS,
            festive_factor: None,
            overtime_close_day: None,
            overtime_window_days: None,
        }
    }
}

pub const DEFAULT_MONTHLY_PRICE_DAYS: f64 = 30.0;

const DIET_PARAMS: &[(DietLabel, &[&str])] = &[
    (DietLabel::Comida, &["dietaComida", "Comida", "Dieta comida"]),
    (DietLabel::Cena, &["dietaCena", "Cena", "Dieta cena"]),
    (
        DietLabel::SinPernoctar,
        &["dietaSinPernoctar", "Dieta sin pernoctar"],
    ),
    (
        DietLabel::Completa,
        &["dietaCompleta", "dietaAlojDes", "Dieta completa"],
    ),
    (
        DietLabel::GastosBolsillo,
        &["gastosBolsillo", "Gastos de bolsillo"],
    ),
];

impl CatalogParams {
    pub fn from_raw(params: &BTreeMap<String, Value>) -> Self {
        let num = |names: &[&str]| resolve_key(params, names).map(parse_number);
        let positive = |names: &[&str]| num(names).filter(|v| *v > 0.0);

        let mut dietas = BTreeMap::new();
        for (label, names) in DIET_PARAMS {
            if let Some(rate) = num(names) {
                dietas.insert(label.as_str().to_string(), rate);
            }
        }
        // Nested table for labels without a dedicated parameter.
        if let Some(Value::Object(extra)) = params.get("dietas") {
            for (label, rate) in extra {
                dietas.insert(
                    DietLabel::from_label(label).as_str().to_string(),
                    parse_number(rate),
                );
            }
        }

        Self {
            dietas,
            transporte: num(&["transporteDia", "Transporte", "Precio transporte"]).unwrap_or(0.0),
            km: num(&["kilometrajeKm", "Kilometraje", "Precio km", "km"]).unwrap_or(0.0),
            travel_divisor: positive(&["divTravel", "divisorTravel", "Divisor travel day"]),
            monthly_price_days: positive(&["diasPrecioMensual", "diasMes", "Días precio mensual"])
                .unwrap_or(DEFAULT_MONTHLY_PRICE_DAYS),
            festive_factor: positive(&["factorHoraExtraFestiva", "factorFestivo"]),
            overtime_close_day: positive(&["cierreHorasExtra", "heCierreDia"])
                .map(|v| v.round() as u32),
            overtime_window_days: positive(&["ventanaHorasExtra", "heVentanaDias"])
                .map(|v| v.round() as u32),
        }
    }
}

/// Price row actually used for one payroll row.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceRow {
    pub jornada: f64,
    pub travel_day: f64,
    pub hora_extra: f64,
    pub holiday_day: f64,
    pub transporte: f64,
    pub km: f64,
    pub dietas: BTreeMap<String, f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub material_propio_value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub material_propio_type: Option<MaterialPropioType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub carga_descarga: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub localizacion_tecnica: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub factor_hora_extra_festiva: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub precio_mensual: Option<f64>,
}

impl PriceRow {
    /// Rate for a per-diem label; unknown labels cost nothing.
    pub fn diet_rate(&self, label: &DietLabel) -> f64 {
        resolve_key(&self.dietas, &[label.as_str()])
            .copied()
            .unwrap_or(0.0)
    }
}

/// Price concepts that can be flagged as missing on a payroll row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PriceField {
    Jornada,
    TravelDay,
    HolidayDay,
    HoraExtra,
    Dietas,
    Transporte,
    Km,
    MaterialPropio,
    CargaDescarga,
    LocalizacionTecnica,
}

impl PriceField {
    pub fn label(&self) -> &'static str {
        match self {
            PriceField::Jornada => "jornada",
            PriceField::TravelDay => "travel day",
            PriceField::HolidayDay => "día festivo",
            PriceField::HoraExtra => "hora extra",
            PriceField::Dietas => "dietas",
            PriceField::Transporte => "transporte",
            PriceField::Km => "kilometraje",
            PriceField::MaterialPropio => "material propio",
            PriceField::CargaDescarga => "carga/descarga",
            PriceField::LocalizacionTecnica => "localización técnica",
        }
    }
}
