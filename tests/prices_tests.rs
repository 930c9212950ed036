use crewpay::core::prices::PriceResolver;
use crewpay::models::mode::ProjectMode;
use crewpay::models::person::Bucket;
use crewpay::models::price::{MaterialPropioType, PriceCatalog};
use serde_json::json;

fn sample_catalog() -> PriceCatalog {
    PriceCatalog::from_json(&json!({
        "prices": {
            "Gaffer": {
                "Precio jornada": "300,00 €",
                "Horas extras": 30,
                "Precio refuerzo": 250,
                "Precio Día festivo": 450
            },
            "Eléctrico": {
                "Precio jornada": 200,
                "Horas extras": 20,
                "Precio Día festivo": 320,
                "Material propio": 15,
                "Material propio tipo": "semanal"
            },
            "Best boy": { "Precio jornada": 0 }
        },
        "pricesPrelight": {
            "Gaffer": { "Precio jornada": 280, "Travel day": 140 }
        },
        "params": {
            "dietaComida": 12,
            "transporteDia": "8,50",
            "kilometrajeKm": 0.26
        }
    }))
}

#[test]
fn base_role_row_with_globals() {
    let catalog = sample_catalog();
    let r = PriceResolver::new(&catalog, ProjectMode::Semanal);
    let row = r.get_for_role("G", None);

    assert_eq!(row.jornada, 300.0);
    assert_eq!(row.hora_extra, 30.0);
    assert_eq!(row.holiday_day, 450.0);
    // weekly travel day is half a day
    assert_eq!(row.travel_day, 150.0);
    assert_eq!(row.transporte, 8.5);
    assert_eq!(row.km, 0.26);
    assert_eq!(row.dietas.get("Comida"), Some(&12.0));
}

#[test]
fn prelight_row_comes_from_its_own_table() {
    let catalog = sample_catalog();
    let r = PriceResolver::new(&catalog, ProjectMode::Semanal);
    let row = r.get_for_role("GP", None);

    assert_eq!(row.jornada, 280.0);
    assert_eq!(row.travel_day, 140.0);
    assert_eq!(r.get_for_bucket(Bucket::Prelight, "G").jornada, 280.0);
}

#[test]
fn pickup_without_own_table_uses_base_row() {
    let catalog = sample_catalog();
    let r = PriceResolver::new(&catalog, ProjectMode::Semanal);
    assert_eq!(r.get_for_role("GR", None).jornada, 300.0);
}

#[test]
fn empty_row_falls_back_to_electrician() {
    let catalog = sample_catalog();
    let r = PriceResolver::new(&catalog, ProjectMode::Semanal);
    let row = r.get_for_role("BB", None);

    assert_eq!(row.jornada, 200.0);
    assert_eq!(row.material_propio_value, Some(15.0));
    assert_eq!(row.material_propio_type, Some(MaterialPropioType::Semanal));
}

#[test]
fn reinforcement_day_rate_from_target_overtime_from_electrician() {
    let catalog = sample_catalog();
    let r = PriceResolver::new(&catalog, ProjectMode::Semanal);
    let row = r.get_for_role("REF", Some("G"));

    assert_eq!(row.jornada, 250.0);
    assert_eq!(row.hora_extra, 20.0);
    assert_eq!(row.holiday_day, 320.0);
    assert_eq!(row.travel_day, 125.0);
}

#[test]
fn reinforcement_without_target_uses_electrician_day() {
    let catalog = sample_catalog();
    let r = PriceResolver::new(&catalog, ProjectMode::Semanal);
    let row = r.get_for_role("REF", None);

    assert_eq!(row.jornada, 200.0);
    assert_eq!(row.hora_extra, 20.0);
}

#[test]
fn reinforcement_overtime_from_electrician_when_target_has_no_row() {
    let catalog = PriceCatalog::from_json(&json!({
        "prices": {
            "Eléctrico": { "Precio jornada": 200, "Horas extras": 25 }
        }
    }));
    let r = PriceResolver::new(&catalog, ProjectMode::Semanal);
    let row = r.get_for_role("REF", Some("Gaffer"));

    assert_eq!(row.hora_extra, 25.0);
    assert_eq!(row.jornada, 200.0);
}

#[test]
fn travel_divisor_follows_mode_and_param() {
    let catalog = sample_catalog();
    assert_eq!(
        PriceResolver::new(&catalog, ProjectMode::Mensual)
            .get_for_role("G", None)
            .travel_day,
        100.0
    );
    assert_eq!(
        PriceResolver::new(&catalog, ProjectMode::Publicidad)
            .get_for_role("G", None)
            .travel_day,
        120.0
    );

    let custom = PriceCatalog::from_json(&json!({
        "prices": { "Gaffer": { "Precio jornada": 300 } },
        "params": { "divTravel": 4 }
    }));
    assert_eq!(
        PriceResolver::new(&custom, ProjectMode::Semanal)
            .get_for_role("G", None)
            .travel_day,
        75.0
    );
}

#[test]
fn advertising_zeroes_unconfigured_roles() {
    let catalog = PriceCatalog::from_json(&json!({
        "prices": { "Gaffer": { "Precio jornada": 500 } },
        "params": { "transporteDia": 10 }
    }));
    let r = PriceResolver::new(&catalog, ProjectMode::Publicidad);

    assert_eq!(r.get_for_role("G", None).jornada, 500.0);

    let tg = r.get_for_role("TG", None);
    assert_eq!(tg.jornada, 0.0);
    assert_eq!(tg.transporte, 0.0);
    assert!(!r.has_configured_row(Bucket::Base, "TG"));
    assert!(r.has_configured_row(Bucket::Reinforcement, "G"));
}

#[test]
fn empty_catalog_prices_nothing() {
    let catalog = PriceCatalog::default();
    let r = PriceResolver::new(&catalog, ProjectMode::Semanal);
    let row = r.get_for_role("G", None);
    assert_eq!(row.jornada, 0.0);
    assert_eq!(row.hora_extra, 0.0);
}
