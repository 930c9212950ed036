//! Project modes and the formula coefficients each one carries.

use crate::errors::{AppError, AppResult};
use crate::utils::normalize::fold;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectMode {
    #[default]
    Semanal,
    Mensual,
    Publicidad,
}

/// How the day subtotal is computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayFormula {
    /// worked days × day rate
    PerWorkedDay,
    /// engagement span inside the month × daily equivalent of the monthly rate
    MonthlySpan,
    /// (load + unload + shoot + camera test + office) days × day rate
    PerBilledDay,
}

/// How the overtime accounting window is derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowRule {
    /// Closes on a fixed day of the month (`cierreHorasExtra`).
    CloseDay,
    /// Lags the month by a fixed number of days (`ventanaHorasExtra`).
    DayCount,
}

/// Mode-specific coefficients consumed by the engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModeRules {
    pub travel_divisor: f64,
    pub day_formula: DayFormula,
    /// Load/unload/location/office/camera-test get their own counters.
    pub extended_categories: bool,
    /// Night work is paid with the festive overtime multiplier.
    pub festive_night: bool,
    /// Roles missing from the catalog get an all-zero price row.
    pub zero_unknown_roles: bool,
    pub window: WindowRule,
}

impl ProjectMode {
    pub const ALL: [ProjectMode; 3] = [
        ProjectMode::Semanal,
        ProjectMode::Mensual,
        ProjectMode::Publicidad,
    ];

    /// Order in which catalogs of other modes are tried when the project's own
    /// mode has none stored.
    pub const CATALOG_FALLBACK: [ProjectMode; 3] = [
        ProjectMode::Mensual,
        ProjectMode::Semanal,
        ProjectMode::Publicidad,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            ProjectMode::Semanal => "semanal",
            ProjectMode::Mensual => "mensual",
            ProjectMode::Publicidad => "publicidad",
        }
    }

    pub fn from_label(s: &str) -> Option<Self> {
        match fold(s).as_str() {
            "semanal" | "weekly" | "week" => Some(ProjectMode::Semanal),
            "mensual" | "monthly" | "month" => Some(ProjectMode::Mensual),
            "publicidad" | "advertising" | "diario" | "daily" | "publi" => {
                Some(ProjectMode::Publicidad)
            }
            _ => None,
        }
    }

    pub fn rules(&self) -> ModeRules {
        match self {
            ProjectMode::Semanal => ModeRules {
                travel_divisor: 2.0,
                day_formula: DayFormula::PerWorkedDay,
                extended_categories: false,
                festive_night: false,
                zero_unknown_roles: false,
                window: WindowRule::CloseDay,
            },
            ProjectMode::Mensual => ModeRules {
                travel_divisor: 3.0,
                day_formula: DayFormula::MonthlySpan,
                extended_categories: false,
                festive_night: false,
                zero_unknown_roles: false,
                window: WindowRule::CloseDay,
            },
            ProjectMode::Publicidad => ModeRules {
                travel_divisor: 2.5,
                day_formula: DayFormula::PerBilledDay,
                extended_categories: true,
                festive_night: true,
                zero_unknown_roles: true,
                window: WindowRule::DayCount,
            },
        }
    }
}

impl fmt::Display for ProjectMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for ProjectMode {
    type Err = AppError;

    fn from_str(s: &str) -> AppResult<Self> {
        ProjectMode::from_label(s).ok_or_else(|| AppError::InvalidMode(s.to_string()))
    }
}

impl<'de> Deserialize<'de> for ProjectMode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        ProjectMode::from_label(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown project mode: {raw}")))
    }
}
