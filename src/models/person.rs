use crate::utils::normalize::{REINFORCEMENT_PREFIX, fold, is_reinforcement_code, strip_block_suffix};
use crate::utils::parse::is_yes;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::sync::LazyLock;

static REINFORCEMENT_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(ref|refuerzo)\b").expect("valid regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Neutral,
}

impl Gender {
    pub fn from_label(s: &str) -> Option<Self> {
        match fold(s).as_str() {
            "male" | "m" | "hombre" | "h" => Some(Gender::Male),
            "female" | "f" | "mujer" => Some(Gender::Female),
            "neutral" | "n" | "x" => Some(Gender::Neutral),
            _ => None,
        }
    }
}

/// Payroll bucket a person is accounted under.
///
/// Reinforcement staff are unified into one bucket whatever day block they
/// were listed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Bucket {
    Base,
    Reinforcement,
    Prelight,
    Pickup,
}

impl Bucket {
    /// Suffix appended to the base role for display ("G" → "GP").
    pub fn role_suffix(&self) -> &'static str {
        match self {
            Bucket::Prelight => "P",
            Bucket::Pickup => "R",
            Bucket::Base | Bucket::Reinforcement => "",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Bucket::Base => "base",
            Bucket::Reinforcement => "reinforcement",
            Bucket::Prelight => "prelight",
            Bucket::Pickup => "pickup",
        }
    }

    /// Fixed ordering of payroll rows: base, reinforcement, prelight, pickup.
    pub fn rank(&self) -> u8 {
        match self {
            Bucket::Base => 0,
            Bucket::Reinforcement => 1,
            Bucket::Prelight => 2,
            Bucket::Pickup => 3,
        }
    }
}

/// A crew member as listed on one plan day.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    #[serde(default, alias = "roleCode", alias = "rol")]
    pub role: String,

    #[serde(default, alias = "nombre")]
    pub name: String,

    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "de_gender"
    )]
    pub gender: Option<Gender>,

    #[serde(
        default,
        alias = "refuerzo",
        alias = "isRef",
        deserialize_with = "de_flag"
    )]
    pub reinforcement: bool,
}

impl Person {
    pub fn new(role: &str, name: &str) -> Self {
        Self {
            role: role.to_string(),
            name: name.to_string(),
            ..Default::default()
        }
    }

    pub fn new_reinforcement(role: &str, name: &str) -> Self {
        Self {
            reinforcement: true,
            ..Self::new(role, name)
        }
    }

    /// Explicit flag, `REF*` role code, or "(ref)"/"refuerzo" in the name.
    pub fn is_reinforcement(&self) -> bool {
        self.reinforcement
            || is_reinforcement_code(&self.role)
            || REINFORCEMENT_NAME.is_match(&self.name)
    }

    /// Role without block suffix nor `REF` prefix ("REFBB" → "BB", "GP" → "G").
    pub fn base_role(&self) -> String {
        base_role_of(&self.role)
    }

    pub fn has_name(&self) -> bool {
        !self.name.trim().is_empty()
    }
}

/// [`Person::base_role`] for a bare role code.
pub fn base_role_of(role: &str) -> String {
    let role = role.trim();
    if is_reinforcement_code(role) {
        let rest: String = role.chars().skip(REINFORCEMENT_PREFIX.len()).collect();
        return strip_block_suffix(rest.trim_start_matches(['_', '-', ' ', '.']));
    }
    strip_block_suffix(role)
}

fn de_gender<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Gender>, D::Error> {
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(raw
        .as_ref()
        .and_then(Value::as_str)
        .and_then(Gender::from_label))
}

pub(crate) fn de_flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(raw.as_ref().is_some_and(is_yes))
}
