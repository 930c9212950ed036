//! Role codes, role labels and report storage keys.
//!
//! Report data and price catalogs were written over time under several
//! naming schemes (accented or not, role code or role label, `.pre`/`_pre`/`P`
//! block markers). Everything here folds those shapes onto one canonical form.
//! [`resolve_key`] finds columns under one of several synonyms;
//! [`resolve_storage_key`] and [`resolve_all`] find people under one of
//! several storage keys.

use crate::models::person::Bucket;
use std::collections::{BTreeMap, HashSet};
use std::sync::LazyLock;
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Known crew roles: code → catalog label. Order is the payroll display order.
pub const ROLES: &[(&str, &str)] = &[
    ("G", "Gaffer"),
    ("BB", "Best boy"),
    ("E", "Eléctrico"),
    ("AUX", "Auxiliar"),
    ("M", "Meritorio"),
    ("TG", "Técnico de generador"),
    ("EPO", "Eléctrico de potencia"),
    ("TP", "Técnico de prácticos"),
    ("FB", "Finger boy"),
    ("RIG", "Rigger"),
    ("RBB", "Best boy rigging"),
    ("RE", "Eléctrico rigging"),
    ("CHR", "Chófer"),
    ("OPR", "Operador de grúa"),
    ("REF", "Refuerzo"),
];

/// Label of the role every missing price falls back to.
pub const FALLBACK_ROLE_LABEL: &str = "Eléctrico";

/// Role prefix shared by every reinforcement code (`REF`, `REFE`, `REFBB`...).
pub const REINFORCEMENT_PREFIX: &str = "REF";

/// Longest string still treated as a role *code* (and therefore eligible for
/// P/R suffix stripping). Anything longer is a label.
const MAX_CODE_LEN: usize = 4;

/// Codes and labels that must never lose a trailing `p`/`r`.
pub struct SuffixExceptions {
    codes: HashSet<String>,
    labels: HashSet<String>,
}

impl SuffixExceptions {
    fn build() -> Self {
        let mut codes: HashSet<String> = ROLES
            .iter()
            .map(|(code, _)| fold(code))
            .filter(|c| c.ends_with('p') || c.ends_with('r'))
            .collect();
        codes.insert("ref".to_string());

        let mut labels: HashSet<String> = ROLES.iter().map(|(_, label)| fold(label)).collect();
        for extra in ["operador", "conductor", "chofer", "gaffer", "rigger", "best boy"] {
            labels.insert(extra.to_string());
        }

        Self { codes, labels }
    }

    /// True when `folded` must be kept verbatim.
    pub fn protects(&self, folded: &str) -> bool {
        self.codes.contains(folded)
            || self.labels.contains(folded)
            || folded.starts_with("ref")
    }

    pub fn reserved_codes(&self) -> impl Iterator<Item = &str> {
        self.codes.iter().map(String::as_str)
    }
}

pub static SUFFIX_EXCEPTIONS: LazyLock<SuffixExceptions> = LazyLock::new(SuffixExceptions::build);

/// Lower-case, strip diacritics, collapse whitespace.
pub fn fold(s: &str) -> String {
    let stripped: String = s.nfd().filter(|c| !is_combining_mark(*c)).collect();
    stripped
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// [`fold`] and keep only alphanumerics ("Carga/descarga" → "cargadescarga").
pub fn squash(s: &str) -> String {
    fold(s).chars().filter(|c| c.is_alphanumeric()).collect()
}

fn is_code_shaped(folded: &str) -> bool {
    !folded.is_empty()
        && folded.chars().count() <= MAX_CODE_LEN
        && folded.chars().all(|c| c.is_alphanumeric())
}

fn is_strippable(folded: &str) -> bool {
    folded.chars().count() > 1
        && is_code_shaped(folded)
        && !SUFFIX_EXCEPTIONS.protects(folded)
        && (folded.ends_with('p') || folded.ends_with('r'))
}

/// Canonical comparison form of a role code or label. Idempotent.
pub fn normalize_role(code: &str) -> String {
    let mut out = fold(code);
    while is_strippable(&out) {
        out.pop();
    }
    out
}

/// Strip the prelight (`P`) / pickup (`R`) marker, keeping the original case.
pub fn strip_block_suffix(code: &str) -> String {
    let mut out = code.trim().to_string();
    while is_strippable(&fold(&out)) {
        out.pop();
    }
    out
}

/// Which bucket a role code's trailing marker points at, if any.
pub fn bucket_from_suffix(code: &str) -> Bucket {
    let folded = fold(code);
    if folded.starts_with("ref") {
        return Bucket::Reinforcement;
    }
    if !is_strippable(&folded) {
        return Bucket::Base;
    }
    match folded.chars().last() {
        Some('p') => Bucket::Prelight,
        Some('r') => Bucket::Pickup,
        _ => Bucket::Base,
    }
}

/// True for `REF` and every `REF`-prefixed compound code.
pub fn is_reinforcement_code(code: &str) -> bool {
    fold(code).starts_with("ref")
}

/// Catalog label for a role code ("G" → "Gaffer"). Labels map to themselves.
pub fn role_label(code: &str) -> Option<&'static str> {
    let folded = fold(code);
    ROLES
        .iter()
        .find(|(c, l)| fold(c) == folded || fold(l) == folded)
        .map(|(_, label)| *label)
}

/// Position of a role in the display order; unknown roles sort last.
pub fn role_rank(code: &str) -> usize {
    let canonical = normalize_role(code);
    ROLES
        .iter()
        .position(|(c, l)| normalize_role(c) == canonical || normalize_role(l) == canonical)
        .unwrap_or(ROLES.len())
}

/// Primary storage key for a person in a bucket.
pub fn storage_key(base_role: &str, name: &str, bucket: Bucket) -> String {
    let base = strip_block_suffix(base_role);
    let name = name.trim();
    match bucket {
        Bucket::Base => format!("{base}__{name}"),
        Bucket::Prelight => format!("{base}.pre__{name}"),
        Bucket::Pickup => format!("{base}.pick__{name}"),
        Bucket::Reinforcement => format!("{REINFORCEMENT_PREFIX}__{name}"),
    }
}

/// Split a storage key into (bucket, base role, name).
pub fn parse_storage_key(key: &str) -> (Bucket, String, String) {
    let (role_part, name) = key.split_once("__").unwrap_or((key, ""));
    let name = name.to_string();

    for (marker, bucket) in [
        (".pre", Bucket::Prelight),
        ("_pre", Bucket::Prelight),
        (".pick", Bucket::Pickup),
        ("_pick", Bucket::Pickup),
    ] {
        if let Some(base) = role_part.strip_suffix(marker) {
            if is_reinforcement_code(base) {
                return (Bucket::Reinforcement, REINFORCEMENT_PREFIX.to_string(), name);
            }
            return (bucket, base.to_string(), name);
        }
    }

    if is_reinforcement_code(role_part) {
        return (Bucket::Reinforcement, REINFORCEMENT_PREFIX.to_string(), name);
    }

    let bucket = bucket_from_suffix(role_part);
    (bucket, strip_block_suffix(role_part), name)
}

/// Every historical key shape for `key`, block-specific shapes first and the
/// generic (plain) key last.
pub fn storage_key_variants(key: &str) -> Vec<String> {
    let (bucket, base, name) = parse_storage_key(key);
    let mut out = block_specific_variants(bucket, &base, &name);
    if matches!(bucket, Bucket::Prelight | Bucket::Pickup) {
        out.push(format!("{base}__{name}"));
    }
    out
}

/// Key shapes that unambiguously belong to the bucket (no generic fallback).
pub fn block_specific_variants(bucket: Bucket, base: &str, name: &str) -> Vec<String> {
    match bucket {
        Bucket::Base => vec![format!("{base}__{name}")],
        Bucket::Prelight => vec![
            format!("{base}.pre__{name}"),
            format!("{base}_pre__{name}"),
            format!("{base}P__{name}"),
        ],
        Bucket::Pickup => vec![
            format!("{base}.pick__{name}"),
            format!("{base}_pick__{name}"),
            format!("{base}R__{name}"),
        ],
        Bucket::Reinforcement => vec![
            format!("{REINFORCEMENT_PREFIX}__{name}"),
            format!("{REINFORCEMENT_PREFIX}.pre__{name}"),
            format!("{REINFORCEMENT_PREFIX}.pick__{name}"),
            format!("{REINFORCEMENT_PREFIX}_pre__{name}"),
            format!("{REINFORCEMENT_PREFIX}_pick__{name}"),
        ],
    }
}

/// Find the entry stored under the first matching candidate.
///
/// Tiers, each tried over all candidates in order before the next one:
/// exact key, folded key (case/accents/whitespace), squashed key
/// (punctuation-insensitive). Meant for column names and their synonyms;
/// person keys go through [`resolve_storage_key`].
pub fn resolve_key<'a, V, S: AsRef<str>>(
    map: &'a BTreeMap<String, V>,
    candidates: &[S],
) -> Option<&'a V> {
    if let Some(v) = resolve_storage_key(map, candidates) {
        return Some(v);
    }

    for cand in candidates {
        let wanted = squash(cand.as_ref());
        if wanted.is_empty() {
            continue;
        }
        if let Some((_, v)) = map.iter().find(|(k, _)| squash(k) == wanted) {
            return Some(v);
        }
    }

    None
}

/// Exact then folded lookup of a storage or bucket key.
///
/// No squashed tier: `E__Pana` and `EP__Ana` only differ by punctuation.
pub fn resolve_storage_key<'a, V, S: AsRef<str>>(
    map: &'a BTreeMap<String, V>,
    candidates: &[S],
) -> Option<&'a V> {
    for cand in candidates {
        if let Some(v) = map.get(cand.as_ref()) {
            return Some(v);
        }
    }

    for cand in candidates {
        let wanted = fold(cand.as_ref());
        if let Some((_, v)) = map.iter().find(|(k, _)| fold(k) == wanted) {
            return Some(v);
        }
    }

    None
}

/// Every distinct entry stored under one of the candidate storage keys,
/// exact matches first, then folded ones.
pub fn resolve_all<'a, V, S: AsRef<str>>(
    map: &'a BTreeMap<String, V>,
    candidates: &[S],
) -> Vec<&'a V> {
    let mut hits: Vec<&'a String> = Vec::new();
    let mut push = |k: &'a String| {
        if !hits.contains(&k) {
            hits.push(k);
        }
    };

    for cand in candidates {
        if let Some((k, _)) = map.get_key_value(cand.as_ref()) {
            push(k);
        }
    }

    for cand in candidates {
        let wanted = fold(cand.as_ref());
        for k in map.keys().filter(|k| fold(k) == wanted) {
            push(k);
        }
    }

    hits.into_iter().filter_map(|k| map.get(k)).collect()
}
