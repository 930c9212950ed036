//! Lenient parsing of the raw tokens stored in report cells and catalogs.
//!
//! Nothing in here fails: unparsable input yields `0.0`, `false` or an empty
//! token set.

use crate::utils::normalize::fold;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::LazyLock;

static LEADING_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[+-]?[0-9]*[.,]?[0-9][0-9.,]*").expect("valid regex"));

static CLOCK_DURATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(\d{1,3}):(\d{1,2})\s*$").expect("valid regex"));

static MONEY_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(ticket|otros)\s*(?:\(\s*([^)]*?)\s*\)|:\s*(.*))?$").expect("valid regex")
});

/// Parse a locale-ambiguous decimal ("1.234,56 €", "12.5", "35%", "1 200").
///
/// Currency/percent symbols and (non-breaking) spaces are dropped, then the
/// leading numeric token is read. When both `,` and `.` appear the right-most
/// one is the decimal separator; a lone separator repeated more than once is a
/// thousands separator.
pub fn parse_decimal(raw: &str) -> f64 {
    let cleaned: String = raw
        .chars()
        .filter(|c| !c.is_whitespace() && !matches!(c, '€' | '$' | '£' | '%'))
        .collect();

    let Some(m) = LEADING_NUMBER.find(&cleaned) else {
        return 0.0;
    };
    let token = m.as_str();

    let last_comma = token.rfind(',');
    let last_dot = token.rfind('.');
    let normalized = match (last_comma, last_dot) {
        (Some(c), Some(d)) if c > d => token.replace('.', "").replace(',', "."),
        (Some(_), Some(_)) => token.replace(',', ""),
        (Some(_), None) if token.matches(',').count() > 1 => token.replace(',', ""),
        (Some(_), None) => token.replace(',', "."),
        (None, Some(_)) if token.matches('.').count() > 1 => token.replace('.', ""),
        _ => token.to_string(),
    };

    normalized
        .trim_end_matches('.')
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

/// Numeric value of a JSON cell.
pub fn parse_number(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().filter(|v| v.is_finite()).unwrap_or(0.0),
        Value::String(s) => parse_decimal(s),
        Value::Bool(true) => 1.0,
        _ => 0.0,
    }
}

/// Hours from an overtime cell: `"0.58 (35')"` → 0.58, `"1:30"` → 1.5.
pub fn parse_hours(value: &Value) -> f64 {
    if let Value::String(s) = value
        && let Some(caps) = CLOCK_DURATION.captures(s)
    {
        let h: f64 = caps[1].parse().unwrap_or(0.0);
        let m: f64 = caps[2].parse().unwrap_or(0.0);
        return h + m / 60.0;
    }
    parse_number(value)
}

/// "yes"-style flags in any of the languages the reports were filled in.
pub fn is_yes(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|v| v != 0.0),
        Value::String(s) => matches!(
            fold(s).as_str(),
            "si" | "s" | "yes" | "y" | "true" | "x" | "1" | "ok" | "bai" | "✓" | "✔"
        ),
        _ => false,
    }
}

/// True for cells that carry no information (null, "", whitespace).
pub fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Array(a) => a.is_empty(),
        _ => false,
    }
}

/// Canonical per-diem labels.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DietLabel {
    Comida,
    Cena,
    SinPernoctar,
    Completa,
    GastosBolsillo,
    Ticket,
    Otros,
    Other(String),
}

impl DietLabel {
    pub fn as_str(&self) -> &str {
        match self {
            DietLabel::Comida => "Comida",
            DietLabel::Cena => "Cena",
            DietLabel::SinPernoctar => "Dieta sin pernoctar",
            DietLabel::Completa => "Dieta completa",
            DietLabel::GastosBolsillo => "Gastos de bolsillo",
            DietLabel::Ticket => "Ticket",
            DietLabel::Otros => "Otros",
            DietLabel::Other(s) => s,
        }
    }

    /// Map a free-form label (any language, any casing) to its canonical form.
    pub fn from_label(raw: &str) -> Self {
        let f = fold(raw);
        match f.as_str() {
            "comida" | "almuerzo" | "lunch" | "dinar" | "bazkaria" => DietLabel::Comida,
            "cena" | "dinner" | "sopar" | "afaria" => DietLabel::Cena,
            "dieta sin pernoctar" | "sin pernoctar" | "sin pernocta" | "dieta sin pernocta"
            | "no overnight" | "no-overnight diet" | "dieta sense pernoctar"
            | "sense pernoctar" => DietLabel::SinPernoctar,
            "dieta completa" | "full diet" | "dieta con pernocta" | "dieta amb pernoctacio"
            | "dieta completa con desayuno" | "alojamiento y desayuno" => DietLabel::Completa,
            "gastos de bolsillo" | "bolsillo" | "pocket money" | "pocket expenses"
            | "despeses de butxaca" => DietLabel::GastosBolsillo,
            "ticket" => DietLabel::Ticket,
            "otros" => DietLabel::Otros,
            _ => DietLabel::Other(raw.trim().to_string()),
        }
    }

    /// Ticket and "otros" carry an amount instead of a count.
    pub fn is_monetary(&self) -> bool {
        matches!(self, DietLabel::Ticket | DietLabel::Otros)
    }
}

impl fmt::Display for DietLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for DietLabel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for DietLabel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(DietLabel::from_label(&raw))
    }
}

/// Parsed content of one per-diem cell.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DietTokens {
    pub labels: BTreeSet<DietLabel>,
    pub counts: BTreeMap<DietLabel, u32>,
    pub ticket: f64,
    pub otros: f64,
}

/// Split a per-diem cell (`"Comida + Ticket(12.5)"`, `["Cena","Comida"]`,
/// `"[\"Cena\"]"`) into labels, per-label counts and monetary addenda.
pub fn parse_dietas(value: &Value) -> DietTokens {
    let tokens: Vec<String> = match value {
        Value::Array(items) => items.iter().filter_map(token_text).collect(),
        Value::String(s) => {
            let trimmed = s.trim();
            match serde_json::from_str::<Value>(trimmed) {
                Ok(Value::Array(items)) if trimmed.starts_with('[') => {
                    items.iter().filter_map(token_text).collect()
                }
                _ => trimmed
                    .split(['+', '\n', ';'])
                    .map(str::to_string)
                    .collect(),
            }
        }
        _ => Vec::new(),
    };

    let mut out = DietTokens::default();
    for token in tokens {
        let token = token.trim();
        if token.is_empty() {
            continue;
        }

        if let Some(caps) = MONEY_TOKEN.captures(token) {
            let label = DietLabel::from_label(&caps[1]);
            let amount = caps
                .get(2)
                .or_else(|| caps.get(3))
                .map(|m| parse_decimal(m.as_str()))
                .unwrap_or(0.0);
            match label {
                DietLabel::Ticket => out.ticket += amount,
                _ => out.otros += amount,
            }
            out.labels.insert(label);
            continue;
        }

        let label = DietLabel::from_label(token);
        if !label.is_monetary() {
            *out.counts.entry(label.clone()).or_insert(0) += 1;
        }
        out.labels.insert(label);
    }
    out
}

fn token_text(item: &Value) -> Option<String> {
    match item {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Object(map) => map
            .get("label")
            .or_else(|| map.get("name"))
            .and_then(Value::as_str)
            .map(str::to_string),
        _ => None,
    }
}
