mod common;
use common::{catalog, d, day, plan, project_data, uniform_week, week, with_sheet};
use crewpay::core::logic::Core;
use crewpay::core::window::OvertimeWindow;
use crewpay::models::mode::ProjectMode;
use crewpay::models::payroll::ManualOverride;
use crewpay::models::person::Bucket;
use crewpay::models::price::{CatalogParams, PriceField};
use crewpay::utils::date::{DateRange, MonthKey};
use crewpay::utils::parse::DietLabel;
use serde_json::json;

fn month(s: &str) -> MonthKey {
    MonthKey::parse(s).unwrap()
}

#[test]
fn weekly_days_and_holidays() {
    let ana = [("G", "Ana")];
    let p = plan(vec![week(
        "2025-03-03",
        vec![
            day("Rodaje", &ana),
            day("Rodaje", &ana),
            day("Rodaje", &ana),
            day("Rodaje", &ana),
            day("Rodaje Festivo", &ana),
            day("Descanso", &ana),
            day("Descanso", &ana),
        ],
    )]);
    let cat = catalog(
        json!({ "Gaffer": { "Precio jornada": 100, "Precio Día festivo": 150 } }),
        json!({}),
    );
    let data = project_data(p, cat, ProjectMode::Semanal);

    let payroll = Core::compute_month(&data, month("2025-03"), None, ProjectMode::Semanal);
    assert_eq!(payroll.rows.len(), 1);

    let row = &payroll.rows[0];
    assert_eq!(row.role, "G");
    assert_eq!(row.worked.worked_days, 4);
    assert_eq!(row.worked.holiday_days, 1);
    assert_eq!(row.subtotals.total_dias, 400.0);
    assert_eq!(row.subtotals.total_holidays, 150.0);
    assert_eq!(row.total_gross, 550.0);
    assert!(row.missing_prices.is_empty());
    assert_eq!(row.working_days_in_month, None);
}

#[test]
fn rest_days_never_count_as_worked() {
    let p = plan(vec![uniform_week("2025-03-03", "Descanso", &[("G", "Ana")])]);
    let data = project_data(p, catalog(json!({}), json!({})), ProjectMode::Semanal);

    assert!(Core::active_months(&data).is_empty());
    assert!(Core::compute_project(&data, None, ProjectMode::Semanal).is_empty());
}

#[test]
fn unknown_category_counts_as_worked() {
    let p = plan(vec![week(
        "2025-03-03",
        vec![day("Ensayo", &[("G", "Ana")]), day("Fin", &[("G", "Ana")])],
    )]);
    let data = project_data(p, catalog(json!({}), json!({})), ProjectMode::Semanal);

    let payroll = Core::compute_month(&data, month("2025-03"), None, ProjectMode::Semanal);
    assert_eq!(payroll.rows[0].worked.worked_days, 1);
    assert!(payroll.rows[0].missing_prices.contains(&PriceField::Jornada));
}

#[test]
fn report_concepts_are_priced() {
    let ana = [("E", "Ana")];
    let p = plan(vec![uniform_week("2025-03-03", "Rodaje", &ana)]);
    let cat = catalog(
        json!({ "Eléctrico": { "Precio jornada": 200, "Horas extras": 25 } }),
        json!({ "dietaComida": 11, "dietaCena": 14, "transporteDia": 5, "kilometrajeKm": 0.5 }),
    );
    let mut data = project_data(p, cat, ProjectMode::Semanal);
    with_sheet(
        &mut data,
        "2025-03-03",
        json!({
            "E__Ana": {
                "Horas extra": { "2025-03-03": "1.5", "2025-03-04": "0.58 (35')" },
                "Turn Around": { "2025-03-05": 1 },
                "Nocturnidad": { "2025-03-06": "Sí" },
                "Dietas": { "2025-03-03": "Comida + Cena", "2025-03-04": "Comida + Ticket(7,5)" },
                "Transporte": { "2025-03-03": "sí", "2025-03-04": "no" },
                "Kilometraje": { "2025-03-03": "120" }
            }
        }),
    );

    let row = &Core::compute_month(&data, month("2025-03"), None, ProjectMode::Semanal).rows[0];
    let q = &row.quantities;

    assert!((q.horas_extra - 2.08).abs() < 1e-9);
    assert_eq!(q.turnaround, 1.0);
    assert_eq!(q.nocturnidad, 1.0);
    assert_eq!(q.dietas.get(&DietLabel::Comida), Some(&2));
    assert_eq!(q.ticket, 7.5);

    assert_eq!(row.subtotals.total_dias, 1400.0);
    // (2.08 + 1 + 1) h × 25
    assert_eq!(row.subtotals.total_extras, 102.0);
    // 2 × 11 + 14 + 7.5
    assert_eq!(row.subtotals.total_dietas, 43.5);
    assert_eq!(row.subtotals.total_transporte, 5.0);
    assert_eq!(row.subtotals.total_km, 60.0);
}

#[test]
fn blocks_and_reinforcement_get_their_own_rows() {
    let mut first = day("Rodaje", &[("G", "Ana"), ("REF", "Luis")]);
    first["prelight"] = json!([{ "role": "GP", "name": "Ana" }, { "role": "EP", "name": "Marta" }]);
    let p = plan(vec![week("2025-03-03", vec![first])]);
    let cat = catalog(
        json!({
            "Gaffer": { "Precio jornada": 300 },
            "Eléctrico": { "Precio jornada": 200, "Precio refuerzo": 180 }
        }),
        json!({}),
    );
    let mut data = project_data(p, cat, ProjectMode::Semanal);
    with_sheet(
        &mut data,
        "2025-03-03",
        json!({
            "G__Ana": { "Horas extra": { "2025-03-03": 2 } },
            "G.pre__Ana": { "Horas extra": { "2025-03-03": 1 } },
            "E__Marta": { "Horas extra": { "2025-03-03": 4 } },
            "REF__Luis": { "Horas extra": { "2025-03-03": 3 } }
        }),
    );

    let rows = Core::compute_month(&data, month("2025-03"), None, ProjectMode::Semanal).rows;
    let summary: Vec<(Bucket, &str, &str, f64)> = rows
        .iter()
        .map(|r| (r.bucket, r.role.as_str(), r.name.as_str(), r.quantities.horas_extra))
        .collect();

    assert_eq!(
        summary,
        vec![
            (Bucket::Base, "G", "Ana", 2.0),
            (Bucket::Reinforcement, "REF", "Luis", 3.0),
            (Bucket::Prelight, "GP", "Ana", 1.0),
            (Bucket::Prelight, "EP", "Marta", 4.0),
        ]
    );
    let luis = &rows[1];
    assert!(luis.reinforcement);
    assert_eq!(luis.prices.jornada, 180.0);
}

#[test]
fn monthly_span_counts_embedded_rest_days() {
    let ana = [("G", "Ana")];
    let mut first_days: Vec<_> = (0..6).map(|_| day("Rodaje", &ana)).collect();
    first_days.push(day("Descanso", &ana));
    let p = plan(vec![
        week("2025-01-20", first_days),
        uniform_week("2025-01-27", "Rodaje", &ana),
        uniform_week("2025-02-03", "Rodaje", &ana),
    ]);
    let cat = catalog(
        json!({ "Gaffer": { "Precio jornada": 150, "Precio mensual": 3000 } }),
        json!({ "diasPrecioMensual": 30 }),
    );
    let data = project_data(p, cat, ProjectMode::Mensual);

    let row = &Core::compute_month(&data, month("2025-01"), None, ProjectMode::Mensual).rows[0];
    assert_eq!(row.worked.worked_days, 11);
    assert_eq!(row.working_days_in_month, Some(12));
    assert_eq!(row.subtotals.total_dias, 1200.0);
}

#[test]
fn monthly_span_stops_the_day_before_wrap() {
    let ana = [("G", "Ana")];
    let mut first_days: Vec<_> = (0..5).map(|_| day("Rodaje", &ana)).collect();
    first_days.push(day("Fin", &ana));
    first_days.push(day("Descanso", &ana));
    let p = plan(vec![
        week("2025-01-20", first_days),
        uniform_week("2025-01-27", "Rodaje", &ana),
    ]);
    let cat = catalog(json!({ "Gaffer": { "Precio jornada": 100 } }), json!({}));
    let data = project_data(p, cat, ProjectMode::Mensual);

    let row = &Core::compute_month(&data, month("2025-01"), None, ProjectMode::Mensual).rows[0];
    assert_eq!(row.working_days_in_month, Some(5));
    // no monthly price: day rate is the jornada
    assert_eq!(row.subtotals.total_dias, 500.0);
}

#[test]
fn advertising_role_without_prices_is_flagged() {
    let pau = [("TG", "Pau")];
    let p = plan(vec![week(
        "2025-05-05",
        vec![day("Carga", &pau), day("Rodaje", &pau), day("Descarga", &pau)],
    )]);
    let cat = catalog(
        json!({ "Gaffer": { "Precio jornada": 500, "Carga/descarga": 80 } }),
        json!({}),
    );
    let data = project_data(p, cat, ProjectMode::Publicidad);

    let row = &Core::compute_month(&data, month("2025-05"), None, ProjectMode::Publicidad).rows[0];
    assert_eq!(row.worked.carga_days, 1);
    assert_eq!(row.worked.descarga_days, 1);
    assert_eq!(row.worked.worked_days, 1);
    assert_eq!(row.subtotals.total_carga_descarga, 0.0);
    assert_eq!(row.total_gross, 0.0);
    assert!(row.missing_prices.contains(&PriceField::CargaDescarga));
    assert!(row.missing_prices.contains(&PriceField::Jornada));
}

#[test]
fn advertising_bills_load_days_and_festive_nights() {
    let g = [("G", "Ana")];
    let p = plan(vec![week(
        "2025-05-05",
        vec![day("Carga", &g), day("Rodaje", &g), day("Localizar", &g)],
    )]);
    let cat = catalog(
        json!({ "Gaffer": {
            "Precio jornada": 500,
            "Horas extras": 40,
            "Carga/descarga": 80,
            "Localización técnica": 120,
            "Factor hora extra festiva": 1.5
        } }),
        json!({}),
    );
    let mut data = project_data(p, cat, ProjectMode::Publicidad);
    with_sheet(
        &mut data,
        "2025-05-05",
        json!({ "G__Ana": {
            "Horas extra": { "2025-05-06": 2 },
            "Nocturnidad": { "2025-05-06": "sí" }
        } }),
    );

    let row = &Core::compute_month(&data, month("2025-05"), None, ProjectMode::Publicidad).rows[0];
    // carga + rodaje at the day rate
    assert_eq!(row.subtotals.total_dias, 1000.0);
    assert_eq!(row.subtotals.total_carga_descarga, 80.0);
    assert_eq!(row.subtotals.total_localizacion, 120.0);
    // 2 h × 40 + 1 night × 40 × 1.5
    assert_eq!(row.subtotals.total_extras, 140.0);
}

#[test]
fn window_replaces_recorded_concepts_only() {
    let ana = [("G", "Ana")];
    let p = plan(vec![
        uniform_week("2025-01-20", "Rodaje", &ana),
        uniform_week("2025-01-27", "Rodaje", &ana),
        uniform_week("2025-02-03", "Rodaje", &ana),
        uniform_week("2025-02-10", "Rodaje", &ana),
        uniform_week("2025-02-17", "Rodaje", &ana),
    ]);
    let cat = catalog(
        json!({ "Gaffer": { "Precio jornada": 100, "Horas extras": 10 } }),
        json!({ "cierreHorasExtra": 20, "kilometrajeKm": 1 }),
    );
    let mut data = project_data(p, cat, ProjectMode::Semanal);
    with_sheet(
        &mut data,
        "2025-01-20",
        json!({ "G__Ana": { "Horas extra": { "2025-01-22": "2" } } }),
    );
    with_sheet(
        &mut data,
        "2025-02-17",
        json!({ "G__Ana": {
            "Horas extra": { "2025-02-21": "3" },
            "Kilometraje": { "2025-02-22": 40 }
        } }),
    );

    let feb = Core::compute_month(&data, month("2025-02"), None, ProjectMode::Semanal);
    assert_eq!(feb.window, Some(DateRange::new(d("2025-01-21"), d("2025-02-20"))));
    let row = &feb.rows[0];
    assert!(row.window_applied);
    assert_eq!(row.quantities.horas_extra, 2.0);
    assert_eq!(row.quantities.kilometraje, 40.0);
    assert_eq!(row.subtotals.total_extras, 20.0);
    assert_eq!(row.subtotals.total_km, 40.0);

    let jan = Core::compute_month(&data, month("2025-01"), None, ProjectMode::Semanal);
    assert!(!jan.rows[0].window_applied);
    assert_eq!(jan.rows[0].quantities.horas_extra, 2.0);

    // manual values beat the window
    let mut overrides = std::collections::BTreeMap::new();
    overrides.insert(
        "g__ana".to_string(),
        ManualOverride::from_json(&json!({ "horasExtra": 7 })),
    );
    data.overrides.insert(month("2025-02"), overrides);

    let row = &Core::compute_month(&data, month("2025-02"), None, ProjectMode::Semanal).rows[0];
    assert!(row.override_applied);
    assert_eq!(row.quantities.horas_extra, 7.0);
    assert_eq!(row.subtotals.total_extras, 70.0);
}

#[test]
fn project_is_grouped_by_active_month() {
    let ana = [("G", "Ana")];
    let p = plan(vec![
        uniform_week("2025-01-27", "Rodaje", &ana),
        uniform_week("2025-03-03", "Rodaje", &ana),
    ]);
    let cat = catalog(json!({ "Gaffer": { "Precio jornada": 100 } }), json!({}));
    let data = project_data(p, cat, ProjectMode::Semanal);

    let all = Core::compute_project(&data, None, ProjectMode::Semanal);
    let keys: Vec<String> = all.keys().map(|m| m.to_string()).collect();
    assert_eq!(keys, vec!["2025-01", "2025-02", "2025-03"]);
    assert_eq!(all[&month("2025-01")].rows[0].worked.worked_days, 5);
    assert_eq!(all[&month("2025-02")].rows[0].worked.worked_days, 2);

    let narrowed = Core::compute_project(
        &data,
        Some(&DateRange::new(d("2025-03-01"), d("2025-03-04"))),
        ProjectMode::Semanal,
    );
    assert_eq!(narrowed.len(), 1);
    assert_eq!(narrowed[&month("2025-03")].rows[0].worked.worked_days, 2);
    assert_eq!(Core::team_size(&data), 1);
}

#[test]
fn enrichment_is_deterministic() {
    let ana = [("G", "Ana"), ("E", "Íñigo")];
    let p = plan(vec![uniform_week("2025-03-03", "Rodaje", &ana)]);
    let cat = catalog(
        json!({ "Gaffer": { "Precio jornada": "333,33" }, "Eléctrico": { "Precio jornada": 211.11 } }),
        json!({}),
    );
    let data = project_data(p, cat, ProjectMode::Semanal);

    let a = Core::compute_month(&data, month("2025-03"), None, ProjectMode::Semanal);
    let b = Core::compute_month(&data, month("2025-03"), None, ProjectMode::Semanal);
    assert_eq!(a, b);
    assert_eq!(a.rows[0].subtotals.total_dias, 2333.31);
}

fn window_for(mode: ProjectMode, params: serde_json::Value, m: &str) -> Option<DateRange> {
    let raw = serde_json::from_value(params).unwrap();
    OvertimeWindow::for_month(mode, &CatalogParams::from_raw(&raw), month(m)).map(|w| w.range)
}

#[test]
fn close_day_window_ranges() {
    let close = |day: u32, m: &str| window_for(ProjectMode::Semanal, json!({ "cierreHorasExtra": day }), m);

    assert_eq!(close(20, "2025-01"), Some(DateRange::new(d("2024-12-21"), d("2025-01-20"))));
    // close day past the previous month's end: calendar month
    assert_eq!(close(31, "2025-03"), Some(DateRange::new(d("2025-03-01"), d("2025-03-31"))));
    assert_eq!(close(30, "2025-02"), Some(DateRange::new(d("2025-01-31"), d("2025-02-28"))));
    assert_eq!(window_for(ProjectMode::Mensual, json!({}), "2025-02"), None);
}

#[test]
fn advertising_window_shifts_the_month_back() {
    let w = window_for(ProjectMode::Publicidad, json!({ "ventanaHorasExtra": 5 }), "2025-03");
    assert_eq!(w, Some(DateRange::new(d("2025-02-24"), d("2025-03-26"))));

    // close day is ignored in advertising mode
    let w = window_for(ProjectMode::Publicidad, json!({ "cierreHorasExtra": 20 }), "2025-03");
    assert_eq!(w, None);
}

#[test]
fn reinforcement_keeps_its_compound_code() {
    let p = plan(vec![week(
        "2025-03-03",
        vec![
            day("Rodaje", &[("G", "Ana"), ("REF", "Luis")]),
            day("Rodaje", &[("G", "Ana"), ("REFE", "Luis")]),
        ],
    )]);
    let cat = catalog(json!({ "Eléctrico": { "Precio jornada": 200 } }), json!({}));
    let data = project_data(p, cat, ProjectMode::Semanal);

    let rows = Core::compute_month(&data, month("2025-03"), None, ProjectMode::Semanal).rows;
    assert_eq!(rows.len(), 2);
    let luis = &rows[1];
    assert_eq!(luis.role, "REFE");
    assert_eq!(luis.worked.worked_days, 2);
    assert_eq!(luis.subtotals.total_dias, 400.0);
}

#[test]
fn zero_window_cells_keep_month_values() {
    let ana = [("G", "Ana")];
    let p = plan(vec![uniform_week("2025-02-17", "Rodaje", &ana)]);
    let cat = catalog(
        json!({ "Gaffer": { "Precio jornada": 100, "Horas extras": 10 } }),
        json!({ "cierreHorasExtra": 20 }),
    );
    let mut data = project_data(p, cat, ProjectMode::Semanal);
    with_sheet(
        &mut data,
        "2025-02-17",
        json!({ "G__Ana": {
            "Nocturnidad": { "2025-02-18": "No", "2025-02-22": "Sí" },
            "Horas extra": { "2025-02-18": "0", "2025-02-22": "3" }
        } }),
    );

    let feb = Core::compute_month(&data, month("2025-02"), None, ProjectMode::Semanal);
    assert_eq!(feb.window, Some(DateRange::new(d("2025-01-21"), d("2025-02-20"))));
    let row = &feb.rows[0];
    assert!(!row.window_applied);
    assert_eq!(row.quantities.nocturnidad, 1.0);
    assert_eq!(row.quantities.horas_extra, 3.0);
    // (3 h + 1 night) × 10
    assert_eq!(row.subtotals.total_extras, 40.0);
}

#[test]
fn windowed_reinforcement_reads_plain_key_only() {
    let p = plan(vec![uniform_week(
        "2025-02-17",
        "Rodaje",
        &[("G", "Ana"), ("REF", "Luis")],
    )]);
    let cat = catalog(
        json!({ "Eléctrico": { "Precio jornada": 200, "Horas extras": 10 } }),
        json!({ "cierreHorasExtra": 20 }),
    );
    let mut data = project_data(p, cat, ProjectMode::Semanal);
    with_sheet(
        &mut data,
        "2025-02-17",
        json!({
            "REF__Luis": { "Horas extra": { "2025-02-18": "2" } },
            "REF.pre__Luis": { "Horas extra": { "2025-02-19": "5" } }
        }),
    );

    let feb = Core::compute_month(&data, month("2025-02"), None, ProjectMode::Semanal);
    let luis = feb
        .rows
        .iter()
        .find(|r| r.bucket == Bucket::Reinforcement)
        .unwrap();
    assert!(luis.window_applied);
    assert_eq!(luis.quantities.horas_extra, 2.0);
    assert_eq!(luis.subtotals.total_extras, 20.0);

    // without a close day the month reads every reinforcement key shape
    let mut no_close = data.clone();
    no_close.catalog = catalog(
        json!({ "Eléctrico": { "Precio jornada": 200, "Horas extras": 10 } }),
        json!({}),
    );
    let whole = Core::compute_month(&no_close, month("2025-02"), None, ProjectMode::Semanal);
    assert_eq!(whole.window, None);
    let luis = whole
        .rows
        .iter()
        .find(|r| r.bucket == Bucket::Reinforcement)
        .unwrap();
    assert_eq!(luis.quantities.horas_extra, 7.0);
}

#[test]
fn mixed_reinforcement_codes_price_the_listed_role() {
    let p = plan(vec![week(
        "2025-03-03",
        vec![
            day("Rodaje", &[("REF", "Luis")]),
            day("Rodaje", &[("REFBB", "Luis")]),
        ],
    )]);
    let cat = catalog(
        json!({
            "Best boy": { "Precio jornada": 300 },
            "Eléctrico": { "Precio jornada": 200 }
        }),
        json!({}),
    );
    let data = project_data(p, cat, ProjectMode::Semanal);

    let rows = Core::compute_month(&data, month("2025-03"), None, ProjectMode::Semanal).rows;
    assert_eq!(rows.len(), 1);
    let luis = &rows[0];
    assert_eq!(luis.role, "REFBB");
    assert_eq!(luis.base_role, "BB");
    assert_eq!(luis.prices.jornada, 300.0);
    assert_eq!(luis.subtotals.total_dias, 600.0);
}
