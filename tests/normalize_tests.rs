use crewpay::models::person::Bucket;
use crewpay::utils::normalize::{
    bucket_from_suffix, fold, normalize_role, resolve_key, resolve_storage_key, storage_key,
    storage_key_variants, strip_block_suffix,
};
use crewpay::utils::parse::{DietLabel, is_yes, parse_decimal, parse_dietas, parse_hours};
use serde_json::json;
use std::collections::BTreeMap;

#[test]
fn fold_strips_accents_case_and_spaces() {
    assert_eq!(fold("  Eléctrico   Rigging "), "electrico rigging");
    assert_eq!(fold("PRUEBAS CÁMARA"), "pruebas camara");
}

#[test]
fn normalize_role_is_idempotent() {
    for code in [
        "G", "GP", "GR", "BBR", "TP", "TPP", "CHR", "OPR", "REF", "REFE", "Gaffer", "Rigger",
        "Eléctrico", "ER", "auxp",
    ] {
        let once = normalize_role(code);
        assert_eq!(normalize_role(&once), once, "not idempotent for {code}");
    }
}

#[test]
fn normalize_role_keeps_reserved_codes() {
    assert_eq!(normalize_role("GP"), "g");
    assert_eq!(normalize_role("BBR"), "bb");
    assert_eq!(normalize_role("TP"), "tp");
    assert_eq!(normalize_role("CHR"), "chr");
    assert_eq!(normalize_role("OPR"), "opr");
    assert_eq!(normalize_role("REF"), "ref");
    assert_eq!(normalize_role("Rigger"), "rigger");
}

#[test]
fn block_suffix_maps_to_bucket() {
    assert_eq!(strip_block_suffix("BBR"), "BB");
    assert_eq!(strip_block_suffix("TP"), "TP");
    assert_eq!(bucket_from_suffix("GP"), Bucket::Prelight);
    assert_eq!(bucket_from_suffix("BBR"), Bucket::Pickup);
    assert_eq!(bucket_from_suffix("TP"), Bucket::Base);
    assert_eq!(bucket_from_suffix("REFE"), Bucket::Reinforcement);
}

#[test]
fn storage_keys_list_block_shapes_before_generic() {
    assert_eq!(storage_key("GP", "Ana", Bucket::Prelight), "G.pre__Ana");
    assert_eq!(storage_key("BB", "Luis", Bucket::Reinforcement), "REF__Luis");
    assert_eq!(
        storage_key_variants("G.pre__Ana"),
        vec!["G.pre__Ana", "G_pre__Ana", "GP__Ana", "G__Ana"]
    );
    assert_eq!(
        storage_key_variants("REF__Luis"),
        vec![
            "REF__Luis",
            "REF.pre__Luis",
            "REF.pick__Luis",
            "REF_pre__Luis",
            "REF_pick__Luis"
        ]
    );
}

#[test]
fn resolve_key_tries_exact_then_folded_then_squashed() {
    let mut map = BTreeMap::new();
    map.insert("Precio Jornada".to_string(), 1);
    map.insert("carga/descarga".to_string(), 2);
    map.insert("jornada".to_string(), 3);

    assert_eq!(resolve_key(&map, &["jornada", "Precio Jornada"]), Some(&3));
    assert_eq!(resolve_key(&map, &["precio jornada"]), Some(&1));
    assert_eq!(resolve_key(&map, &["Carga Descarga"]), Some(&2));
    assert_eq!(resolve_key(&map, &["nothing"]), None);
}

#[test]
fn storage_keys_never_match_by_punctuation() {
    let mut map = BTreeMap::new();
    map.insert("EP__Ana".to_string(), 1);
    map.insert("g__ÁLEX".to_string(), 2);

    assert_eq!(resolve_storage_key(&map, &["E__Pana"]), None);
    assert_eq!(resolve_storage_key(&map, &["G__Alex"]), Some(&2));
    assert_eq!(resolve_key(&map, &["E__Pana"]), Some(&1));
}

#[test]
fn overtime_cells_read_leading_decimal() {
    assert_eq!(parse_hours(&json!("0.58 (35')")), 0.58);
    assert_eq!(parse_hours(&json!("1:30")), 1.5);
    assert_eq!(parse_hours(&json!(2)), 2.0);
    assert_eq!(parse_hours(&json!("n/a")), 0.0);
}

#[test]
fn decimals_accept_both_separators() {
    assert_eq!(parse_decimal("1.234,56 €"), 1234.56);
    assert_eq!(parse_decimal("1,234.56"), 1234.56);
    assert_eq!(parse_decimal("12,5"), 12.5);
    assert_eq!(parse_decimal("310 €"), 310.0);
    assert_eq!(parse_decimal(""), 0.0);
}

#[test]
fn per_diem_cells_split_into_counts_and_amounts() {
    let t = parse_dietas(&json!("Comida + Cena + Ticket(12,5)"));
    assert_eq!(t.counts.get(&DietLabel::Comida), Some(&1));
    assert_eq!(t.counts.get(&DietLabel::Cena), Some(&1));
    assert_eq!(t.ticket, 12.5);

    let t = parse_dietas(&json!(["Cena", "Almuerzo", "Comida"]));
    assert_eq!(t.counts.get(&DietLabel::Comida), Some(&2));

    let t = parse_dietas(&json!("[\"Dieta completa\"]"));
    assert_eq!(t.counts.get(&DietLabel::Completa), Some(&1));

    let t = parse_dietas(&json!("Otros: 3"));
    assert_eq!(t.otros, 3.0);
    assert!(t.counts.is_empty());
}

#[test]
fn yes_flags_in_several_languages() {
    assert!(is_yes(&json!("Sí")));
    assert!(is_yes(&json!("x")));
    assert!(is_yes(&json!(true)));
    assert!(!is_yes(&json!("no")));
    assert!(!is_yes(&json!("")));
}
