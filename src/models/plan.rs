use crate::models::person::Person;
use crate::utils::date::DateRange;
use crate::utils::normalize::fold;
use chrono::{Days, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

pub const DAYS_PER_WEEK: usize = 7;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DayCategory {
    Rodaje,
    RodajeFestivo,
    TravelDay,
    #[default]
    Descanso,
    Fin,
    Localizar,
    Carga,
    Descarga,
    Oficina,
    PruebasCamara,
    Other(String),
}

impl DayCategory {
    pub fn from_label(raw: &str) -> Self {
        match fold(raw).as_str() {
            "rodaje" | "shooting" | "shoot" => DayCategory::Rodaje,
            "rodaje festivo" | "festivo" | "rodaje en festivo" | "holiday" => {
                DayCategory::RodajeFestivo
            }
            "travel day" | "travel" | "viaje" | "dia de viaje" => DayCategory::TravelDay,
            "" | "descanso" | "rest" | "libre" => DayCategory::Descanso,
            "fin" | "fin de rodaje" | "wrap" => DayCategory::Fin,
            "localizar" | "localizacion" | "localizacion tecnica" | "scouting" => {
                DayCategory::Localizar
            }
            "carga" | "load" => DayCategory::Carga,
            "descarga" | "unload" => DayCategory::Descarga,
            "oficina" | "office" => DayCategory::Oficina,
            "pruebas camara" | "pruebas de camara" | "camera test" => DayCategory::PruebasCamara,
            _ => DayCategory::Other(raw.trim().to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            DayCategory::Rodaje => "Rodaje",
            DayCategory::RodajeFestivo => "Rodaje Festivo",
            DayCategory::TravelDay => "Travel Day",
            DayCategory::Descanso => "Descanso",
            DayCategory::Fin => "Fin",
            DayCategory::Localizar => "Localizar",
            DayCategory::Carga => "Carga",
            DayCategory::Descarga => "Descarga",
            DayCategory::Oficina => "Oficina",
            DayCategory::PruebasCamara => "Pruebas cámara",
            DayCategory::Other(s) => s,
        }
    }

    /// Rest and wrap days never count as worked, whoever is listed.
    pub fn is_rest(&self) -> bool {
        matches!(self, DayCategory::Descanso | DayCategory::Fin)
    }

    pub fn is_wrap(&self) -> bool {
        matches!(self, DayCategory::Fin)
    }
}

impl Serialize for DayCategory {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for DayCategory {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<Value>::deserialize(deserializer)?;
        Ok(raw
            .as_ref()
            .and_then(Value::as_str)
            .map(DayCategory::from_label)
            .unwrap_or_default())
    }
}

/// The three team lists of a plan day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DayBlock {
    Base,
    Prelight,
    Pickup,
}

impl DayBlock {
    pub const ALL: [DayBlock; 3] = [DayBlock::Base, DayBlock::Prelight, DayBlock::Pickup];
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayRecord {
    #[serde(default, alias = "tipo")]
    pub category: DayCategory,

    #[serde(default, alias = "team", deserialize_with = "de_people")]
    pub base: Vec<Person>,

    #[serde(default, deserialize_with = "de_people")]
    pub prelight: Vec<Person>,

    #[serde(default, deserialize_with = "de_people")]
    pub pickup: Vec<Person>,
}

impl DayRecord {
    pub fn new(category: DayCategory) -> Self {
        Self {
            category,
            ..Default::default()
        }
    }

    pub fn members(&self, block: DayBlock) -> &[Person] {
        match block {
            DayBlock::Base => &self.base,
            DayBlock::Prelight => &self.prelight,
            DayBlock::Pickup => &self.pickup,
        }
    }

    /// Every named member with the block they are listed in.
    pub fn all_members(&self) -> impl Iterator<Item = (DayBlock, &Person)> {
        DayBlock::ALL.into_iter().flat_map(move |block| {
            self.members(block)
                .iter()
                .filter(|p| p.has_name())
                .map(move |p| (block, p))
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkWeek {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(alias = "start", alias = "inicio")]
    pub start_date: NaiveDate,

    #[serde(default, alias = "dias")]
    pub days: Vec<DayRecord>,
}

impl WorkWeek {
    pub fn new(start_date: NaiveDate, days: Vec<DayRecord>) -> Self {
        Self {
            id: None,
            start_date,
            days,
        }
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        (0..DAYS_PER_WEEK as u64)
            .filter_map(|i| self.start_date.checked_add_days(Days::new(i)))
            .collect()
    }

    pub fn end_date(&self) -> NaiveDate {
        self.dates().last().copied().unwrap_or(self.start_date)
    }

    /// The seven days with their calendar date. Missing days read as rest.
    pub fn dated_days(&self) -> Vec<(NaiveDate, &DayRecord)> {
        static REST: std::sync::LazyLock<DayRecord> = std::sync::LazyLock::new(DayRecord::default);
        self.dates()
            .into_iter()
            .enumerate()
            .map(|(i, d)| (d, self.days.get(i).unwrap_or(&REST)))
            .collect()
    }

    pub fn overlaps(&self, range: &DateRange) -> bool {
        self.start_date <= range.end && self.end_date() >= range.start
    }
}

/// `plan_<projectId>`: preproduction and production weeks.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    #[serde(default)]
    pub pre: Vec<WorkWeek>,
    #[serde(default)]
    pub pro: Vec<WorkWeek>,
}

impl Plan {
    /// Both phases merged and ordered by start date.
    pub fn ordered_weeks(&self) -> Vec<WorkWeek> {
        let mut weeks: Vec<WorkWeek> = self.pre.iter().chain(self.pro.iter()).cloned().collect();
        weeks.sort_by_key(|w| w.start_date);
        weeks
    }

    pub fn is_empty(&self) -> bool {
        self.pre.is_empty() && self.pro.is_empty()
    }

    /// Lenient parse: weeks that do not deserialize are skipped and counted.
    pub fn from_json(value: &Value) -> (Self, usize) {
        let mut skipped = 0;
        let mut phase = |name: &str| -> Vec<WorkWeek> {
            let Some(Value::Array(items)) = value.get(name) else {
                return Vec::new();
            };
            items
                .iter()
                .filter_map(|w| {
                    let parsed = serde_json::from_value::<WorkWeek>(w.clone()).ok();
                    if parsed.is_none() {
                        skipped += 1;
                    }
                    parsed
                })
                .collect()
        };
        let pre = phase("pre");
        let pro = phase("pro");
        (Self { pre, pro }, skipped)
    }
}

fn de_people<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Person>, D::Error> {
    let raw = Option::<Value>::deserialize(deserializer)?;
    let Some(Value::Array(items)) = raw else {
        return Ok(Vec::new());
    };
    Ok(items
        .into_iter()
        .filter_map(|item| serde_json::from_value::<Person>(item).ok())
        .collect())
}
