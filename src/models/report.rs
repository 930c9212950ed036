//! Daily report sheets (`reportes_<projectId>_<dates>`) and per-person
//! concept totals.

use crate::utils::normalize::{fold, resolve_all, resolve_key};
use crate::utils::parse::{DietLabel, is_blank, is_yes, parse_dietas, parse_hours, parse_number};
use chrono::NaiveDate;
use serde::Serialize;
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};

/// Report concepts read from the sheets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Concept {
    HorasExtra,
    Turnaround,
    Nocturnidad,
    PenaltyLunch,
    Transporte,
    Kilometraje,
    MaterialPropio,
    Dietas,
}

/// How a concept cell accumulates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConceptKind {
    /// Hours, possibly written as "0.58 (35')" or "1:30".
    Hours,
    /// +1 for each "yes".
    Flag,
    /// Raw number.
    Amount,
    /// Per-diem tokens.
    Diet,
}

impl Concept {
    pub const ALL: [Concept; 8] = [
        Concept::HorasExtra,
        Concept::Turnaround,
        Concept::Nocturnidad,
        Concept::PenaltyLunch,
        Concept::Transporte,
        Concept::Kilometraje,
        Concept::MaterialPropio,
        Concept::Dietas,
    ];

    /// Concepts an overtime window replaces.
    pub const WINDOWED: [Concept; 7] = [
        Concept::HorasExtra,
        Concept::Turnaround,
        Concept::Nocturnidad,
        Concept::PenaltyLunch,
        Concept::Dietas,
        Concept::Transporte,
        Concept::Kilometraje,
    ];

    pub fn synonyms(&self) -> &'static [&'static str] {
        match self {
            Concept::HorasExtra => &["Horas extra", "Horas extras", "HE", "horasExtra"],
            Concept::Turnaround => &["Turn Around", "Turnaround", "TA"],
            Concept::Nocturnidad => &["Nocturnidad", "Noct", "Nocturno"],
            Concept::PenaltyLunch => &["Penalty lunch", "PL", "penaltyLunch"],
            Concept::Transporte => &["Transporte", "Transport"],
            Concept::Kilometraje => &["Kilometraje", "Km", "Kms"],
            Concept::MaterialPropio => &["Material propio", "Equipo propio", "materialPropio"],
            Concept::Dietas => &["Dietas", "Dieta"],
        }
    }

    pub fn kind(&self) -> ConceptKind {
        match self {
            Concept::HorasExtra | Concept::Turnaround => ConceptKind::Hours,
            Concept::Nocturnidad
            | Concept::PenaltyLunch
            | Concept::Transporte
            | Concept::MaterialPropio => ConceptKind::Flag,
            Concept::Kilometraje => ConceptKind::Amount,
            Concept::Dietas => ConceptKind::Diet,
        }
    }

    /// Paid at the overtime hour rate.
    pub fn is_overtime_class(&self) -> bool {
        matches!(
            self,
            Concept::HorasExtra | Concept::Turnaround | Concept::Nocturnidad | Concept::PenaltyLunch
        )
    }

    pub fn from_label(raw: &str) -> Option<Self> {
        let wanted = fold(raw);
        Concept::ALL
            .into_iter()
            .find(|c| c.synonyms().iter().any(|s| fold(s) == wanted))
    }
}

/// `concept → isoDate → raw value` for one person.
pub type ConceptCells = BTreeMap<String, BTreeMap<String, Value>>;

/// One week of report cells: `storageKey → concept → isoDate → raw`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportSheet {
    entries: BTreeMap<String, ConceptCells>,
}

impl ReportSheet {
    /// Parse a stored sheet. Anything that is not an object at the expected
    /// depth is skipped.
    pub fn from_json(value: &Value) -> Self {
        let mut entries = BTreeMap::new();
        let Some(people) = value.as_object() else {
            return Self { entries };
        };

        for (key, concepts) in people {
            let Some(concepts) = concepts.as_object() else {
                continue;
            };
            let mut cells = ConceptCells::new();
            for (concept, days) in concepts {
                let Some(days) = days.as_object() else {
                    continue;
                };
                cells.insert(
                    concept.clone(),
                    days.iter().map(|(d, v)| (d.clone(), v.clone())).collect(),
                );
            }
            entries.insert(key.clone(), cells);
        }
        Self { entries }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Cell for a concept on a date, trying each key variant in order.
    ///
    /// The first variant that holds a non-blank value for that day wins, so a
    /// block-specific key shadows the generic one only where it has data.
    pub fn cell<S: AsRef<str>>(
        &self,
        variants: &[S],
        concept: Concept,
        date: &str,
    ) -> Option<&Value> {
        resolve_all(&self.entries, variants)
            .into_iter()
            .filter_map(|cells| resolve_key(cells, concept.synonyms()))
            .filter_map(|days| days.get(date))
            .find(|v| !is_blank(v))
    }
}

/// Sheets of a project indexed by week start date.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportBook {
    pub sheets: BTreeMap<NaiveDate, ReportSheet>,
}

impl ReportBook {
    pub fn sheet_for(&self, week_start: NaiveDate) -> Option<&ReportSheet> {
        self.sheets.get(&week_start)
    }

    pub fn insert(&mut self, week_start: NaiveDate, sheet: ReportSheet) {
        self.sheets.insert(week_start, sheet);
    }
}

/// Summed report concepts for one person (or window bucket).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConceptTotals {
    pub horas_extra: f64,
    pub turnaround: f64,
    pub nocturnidad: f64,
    pub penalty_lunch: f64,
    pub transporte: f64,
    pub kilometraje: f64,
    pub material_propio: f64,
    pub dietas: BTreeMap<DietLabel, u32>,
    pub ticket: f64,
    pub otros: f64,
    /// Weeks (by start date) with own equipment in use.
    #[serde(skip)]
    pub material_propio_weeks: BTreeSet<NaiveDate>,
    /// Concepts with at least one non-blank cell.
    #[serde(skip)]
    pub recorded: BTreeSet<Concept>,
}

impl ConceptTotals {
    /// Scalar value of a concept; per-diem reads as token count plus addenda.
    pub fn get(&self, concept: Concept) -> f64 {
        match concept {
            Concept::HorasExtra => self.horas_extra,
            Concept::Turnaround => self.turnaround,
            Concept::Nocturnidad => self.nocturnidad,
            Concept::PenaltyLunch => self.penalty_lunch,
            Concept::Transporte => self.transporte,
            Concept::Kilometraje => self.kilometraje,
            Concept::MaterialPropio => self.material_propio,
            Concept::Dietas => {
                self.dietas.values().map(|n| f64::from(*n)).sum::<f64>() + self.ticket + self.otros
            }
        }
    }

    /// Overwrite a scalar concept. Per-diem is replaced through [`Self::take_dietas`].
    pub fn set(&mut self, concept: Concept, value: f64) {
        match concept {
            Concept::HorasExtra => self.horas_extra = value,
            Concept::Turnaround => self.turnaround = value,
            Concept::Nocturnidad => self.nocturnidad = value,
            Concept::PenaltyLunch => self.penalty_lunch = value,
            Concept::Transporte => self.transporte = value,
            Concept::Kilometraje => self.kilometraje = value,
            Concept::MaterialPropio => self.material_propio = value,
            Concept::Dietas => {}
        }
    }

    /// Replace the per-diem counts and addenda with another bucket's.
    pub fn take_dietas(&mut self, other: &ConceptTotals) {
        self.dietas = other.dietas.clone();
        self.ticket = other.ticket;
        self.otros = other.otros;
    }

    /// Replace `concept` with the value in `other`.
    pub fn take(&mut self, concept: Concept, other: &ConceptTotals) {
        match concept {
            Concept::Dietas => self.take_dietas(other),
            Concept::MaterialPropio => {
                self.material_propio = other.material_propio;
                self.material_propio_weeks = other.material_propio_weeks.clone();
            }
            c => self.set(c, other.get(c)),
        }
    }

    /// Add one raw cell.
    pub fn absorb(&mut self, concept: Concept, raw: &Value, week_start: NaiveDate) {
        if is_blank(raw) {
            return;
        }
        self.recorded.insert(concept);

        match concept.kind() {
            ConceptKind::Hours => {
                let h = parse_hours(raw);
                match concept {
                    Concept::Turnaround => self.turnaround += h,
                    _ => self.horas_extra += h,
                }
            }
            ConceptKind::Flag => {
                if !is_yes(raw) {
                    return;
                }
                match concept {
                    Concept::Nocturnidad => self.nocturnidad += 1.0,
                    Concept::PenaltyLunch => self.penalty_lunch += 1.0,
                    Concept::Transporte => self.transporte += 1.0,
                    _ => {
                        self.material_propio += 1.0;
                        self.material_propio_weeks.insert(week_start);
                    }
                }
            }
            ConceptKind::Amount => self.kilometraje += parse_number(raw),
            ConceptKind::Diet => {
                let tokens = parse_dietas(raw);
                for (label, n) in tokens.counts {
                    *self.dietas.entry(label).or_insert(0) += n;
                }
                self.ticket += tokens.ticket;
                self.otros += tokens.otros;
            }
        }
    }

    /// Hours billed at the overtime rate, before any festive multiplier.
    pub fn overtime_units(&self) -> f64 {
        self.horas_extra + self.turnaround + self.nocturnidad + self.penalty_lunch
    }
}
