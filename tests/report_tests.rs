use chrono::NaiveDate;
use crewpay::models::report::{Concept, ConceptTotals, ReportSheet};
use crewpay::utils::parse::DietLabel;
use serde_json::json;

fn d(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

#[test]
fn block_key_shadows_generic_only_where_it_has_data() {
    let sheet = ReportSheet::from_json(&json!({
        "G.pre__Ana": { "Horas extra": { "2025-03-03": "2" } },
        "G__Ana": { "Horas extra": { "2025-03-03": "5", "2025-03-04": "1" } }
    }));
    let variants = ["G.pre__Ana", "G__Ana"];

    assert_eq!(
        sheet.cell(&variants, Concept::HorasExtra, "2025-03-03"),
        Some(&json!("2"))
    );
    assert_eq!(
        sheet.cell(&variants, Concept::HorasExtra, "2025-03-04"),
        Some(&json!("1"))
    );
}

#[test]
fn concept_columns_match_accent_and_case_insensitively() {
    let sheet = ReportSheet::from_json(&json!({
        "E__Luis": { "TURN AROUND": { "2025-03-03": 1.5 } }
    }));
    assert_eq!(
        sheet.cell(&["E__Luis"], Concept::Turnaround, "2025-03-03"),
        Some(&json!(1.5))
    );
}

#[test]
fn person_lookup_ignores_keys_differing_only_by_punctuation() {
    let sheet = ReportSheet::from_json(&json!({
        "EP__Ana": { "Horas extra": { "2025-03-03": "4" } },
        "E__Pana": { "Horas extra": { "2025-03-04": "1" } }
    }));

    assert_eq!(sheet.cell(&["E__Pana"], Concept::HorasExtra, "2025-03-03"), None);
    assert_eq!(
        sheet.cell(&["E__Pana"], Concept::HorasExtra, "2025-03-04"),
        Some(&json!("1"))
    );
}

#[test]
fn absorb_counts_flags_and_diets() {
    let mut t = ConceptTotals::default();
    let week = d("2025-03-03");
    t.absorb(Concept::Nocturnidad, &json!("Sí"), week);
    t.absorb(Concept::Nocturnidad, &json!("no"), week);
    t.absorb(Concept::Dietas, &json!("Comida + Comida"), week);
    t.absorb(Concept::Dietas, &json!("Cena + Ticket(12,5)"), week);

    assert_eq!(t.nocturnidad, 1.0);
    assert_eq!(t.dietas.get(&DietLabel::Comida), Some(&2));
    assert_eq!(t.dietas.get(&DietLabel::Cena), Some(&1));
    assert_eq!(t.ticket, 12.5);
    assert!(t.recorded.contains(&Concept::Nocturnidad));
}

#[test]
fn own_equipment_remembers_weeks_in_use() {
    let mut t = ConceptTotals::default();
    t.absorb(Concept::MaterialPropio, &json!("sí"), d("2025-03-03"));
    t.absorb(Concept::MaterialPropio, &json!("sí"), d("2025-03-03"));
    t.absorb(Concept::MaterialPropio, &json!("sí"), d("2025-03-10"));

    assert_eq!(t.material_propio, 3.0);
    assert_eq!(t.material_propio_weeks.len(), 2);
}

#[test]
fn malformed_sheet_reads_as_empty() {
    assert!(ReportSheet::from_json(&json!("garbage")).is_empty());
    assert!(ReportSheet::from_json(&json!({ "G__Ana": 3 })).is_empty());
}
