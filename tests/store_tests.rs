mod common;
use common::{d, uniform_week, write_bundle};
use crewpay::core::import::ImportLogic;
use crewpay::errors::{AppError, AppResult};
use crewpay::models::mode::ProjectMode;
use crewpay::models::plan::WorkWeek;
use crewpay::store::initialize::init_db;
use crewpay::store::keys::{catalog_key, overrides_key, plan_key, project_key, report_key};
use crewpay::store::kv::{KvStore, MemoryStore, SqliteStore};
use crewpay::store::pool::DbPool;
use crewpay::store::queries::{list_projects, load_project_data};
use crewpay::utils::date::MonthKey;
use serde_json::json;
use std::path::Path;

fn plan_json() -> serde_json::Value {
    json!({ "pro": [uniform_week("2025-03-03", "Rodaje", &[("G", "Ana")])] })
}

fn march_week() -> WorkWeek {
    WorkWeek::new(d("2025-03-03"), vec![])
}

#[test]
fn key_layout() {
    assert_eq!(plan_key("p1"), "plan_p1");
    assert_eq!(catalog_key("p1", ProjectMode::Publicidad), "cond_p1_publicidad");
    assert_eq!(
        report_key("p1", &march_week()),
        "reportes_p1_2025-03-03_2025-03-04_2025-03-05_2025-03-06_2025-03-07_2025-03-08_2025-03-09"
    );
    assert_eq!(
        overrides_key("p1", MonthKey::new(2025, 3).unwrap()),
        "nomina_overrides_p1_2025-03"
    );
}

#[test]
fn unknown_project_is_an_error() {
    let store = MemoryStore::new();
    let err = load_project_data(&store, "ghost", None, ProjectMode::Semanal).unwrap_err();
    assert!(matches!(err, AppError::ProjectNotFound(id) if id == "ghost"));
}

#[test]
fn loads_every_document_of_a_project() {
    let store = MemoryStore::new()
        .with_json(&plan_key("p1"), plan_json())
        .with_json(&project_key("p1"), json!({ "id": "p1", "nombre": "Rodaje Norte", "modo": "mensual" }))
        .with_json(
            &catalog_key("p1", ProjectMode::Mensual),
            json!({ "prices": { "Gaffer": { "Precio jornada": 100 } } }),
        )
        .with_json(
            &report_key("p1", &march_week()),
            json!({ "G__Ana": { "Horas extra": { "2025-03-04": 1 } } }),
        )
        .with_json(
            &overrides_key("p1", MonthKey::new(2025, 3).unwrap()),
            json!({ "g__ana": { "horasExtra": 3 }, "e__luis": {} }),
        );

    let loaded = load_project_data(&store, "p1", None, ProjectMode::Semanal).unwrap();

    assert!(loaded.warnings.is_empty());
    assert_eq!(loaded.mode, ProjectMode::Mensual);
    assert_eq!(loaded.catalog_mode, Some(ProjectMode::Mensual));
    assert_eq!(loaded.data.project.display_name(), "Rodaje Norte");
    assert_eq!(loaded.data.plan.pro.len(), 1);
    assert!(loaded.data.reports.sheet_for(d("2025-03-03")).is_some());

    let march = &loaded.data.overrides[&MonthKey::new(2025, 3).unwrap()];
    assert!(march.contains_key("g__ana"));
    // empty overrides are dropped
    assert!(!march.contains_key("e__luis"));
}

#[test]
fn forced_mode_beats_project_and_default() {
    let store = MemoryStore::new()
        .with_json(&plan_key("p1"), plan_json())
        .with_json(&project_key("p1"), json!({ "mode": "mensual" }));

    let loaded =
        load_project_data(&store, "p1", Some(ProjectMode::Publicidad), ProjectMode::Semanal)
            .unwrap();
    assert_eq!(loaded.mode, ProjectMode::Publicidad);
    assert_eq!(loaded.data.project.id, "p1");

    let store = MemoryStore::new().with_json(&plan_key("p2"), plan_json());
    let loaded = load_project_data(&store, "p2", None, ProjectMode::Mensual).unwrap();
    assert_eq!(loaded.mode, ProjectMode::Mensual);
}

#[test]
fn catalog_falls_back_to_other_modes_in_order() {
    let store = MemoryStore::new()
        .with_json(&plan_key("p1"), plan_json())
        .with_json(
            &catalog_key("p1", ProjectMode::Publicidad),
            json!({ "prices": { "Gaffer": { "Precio jornada": 900 } } }),
        )
        .with_json(
            &catalog_key("p1", ProjectMode::Semanal),
            json!({ "prices": { "Gaffer": { "Precio jornada": 300 } } }),
        );

    let loaded = load_project_data(&store, "p1", Some(ProjectMode::Mensual), ProjectMode::Semanal)
        .unwrap();
    assert_eq!(loaded.mode, ProjectMode::Mensual);
    assert_eq!(loaded.catalog_mode, Some(ProjectMode::Semanal));

    let bare = MemoryStore::new().with_json(&plan_key("p1"), plan_json());
    let loaded = load_project_data(&bare, "p1", None, ProjectMode::Semanal).unwrap();
    assert_eq!(loaded.catalog_mode, None);
    assert!(loaded.data.catalog.is_empty());
}

#[test]
fn unreadable_documents_only_empty_their_scope() {
    let store = MemoryStore::new()
        .with_json(&plan_key("p1"), plan_json())
        .with_raw(&catalog_key("p1", ProjectMode::Semanal), "{ not json")
        .with_raw(&report_key("p1", &march_week()), "[[[");

    let loaded = load_project_data(&store, "p1", None, ProjectMode::Semanal).unwrap();

    assert_eq!(loaded.warnings.len(), 2);
    assert!(loaded.data.catalog.is_empty());
    assert!(loaded.data.reports.sheet_for(d("2025-03-03")).is_none());
    assert_eq!(loaded.data.plan.pro.len(), 1);
}

/// Store whose key listing always fails.
struct NoListing(MemoryStore);

impl KvStore for NoListing {
    fn get_raw(&self, key: &str) -> AppResult<Option<String>> {
        self.0.get_raw(key)
    }

    fn set_raw(&mut self, key: &str, value: &str) -> AppResult<()> {
        self.0.set_raw(key, value)
    }

    fn keys_with_prefix(&self, _prefix: &str) -> AppResult<Vec<String>> {
        Err(AppError::Store("listing unavailable".into()))
    }
}

#[test]
fn failed_override_listing_keeps_the_project() {
    let store = NoListing(
        MemoryStore::new()
            .with_json(&plan_key("p1"), plan_json())
            .with_json(
                &catalog_key("p1", ProjectMode::Semanal),
                json!({ "prices": { "Gaffer": { "Precio jornada": 100 } } }),
            ),
    );

    let loaded = load_project_data(&store, "p1", None, ProjectMode::Semanal).unwrap();

    assert_eq!(loaded.warnings.len(), 1);
    assert!(loaded.warnings[0].contains("listing unavailable"));
    assert!(loaded.data.overrides.is_empty());
    assert!(!loaded.data.catalog.is_empty());
    assert_eq!(loaded.data.plan.pro.len(), 1);
}

#[test]
fn malformed_weeks_are_skipped_with_a_warning() {
    let store = MemoryStore::new().with_json(
        &plan_key("p1"),
        json!({ "pro": [
            uniform_week("2025-03-03", "Rodaje", &[("G", "Ana")]),
            { "startDate": "not a date", "days": [] }
        ] }),
    );

    let loaded = load_project_data(&store, "p1", None, ProjectMode::Semanal).unwrap();
    assert_eq!(loaded.data.plan.pro.len(), 1);
    assert_eq!(loaded.warnings.len(), 1);
    assert!(loaded.warnings[0].contains("1 malformed week"));
}

#[test]
fn projects_are_listed_from_plan_keys() {
    let store = MemoryStore::new()
        .with_json(&plan_key("beta"), plan_json())
        .with_json(&plan_key("alpha"), plan_json())
        .with_json(&project_key("gamma"), json!({}));

    assert_eq!(list_projects(&store).unwrap(), vec!["alpha", "beta"]);
}

#[test]
fn sqlite_store_round_trips_documents() {
    let pool = DbPool::in_memory().unwrap();
    init_db(&pool.conn).unwrap();

    let mut store = SqliteStore::new(&pool.conn);
    store.set_json("plan_p1", &plan_json()).unwrap();
    store.set_raw("plan_p1", &plan_json().to_string()).unwrap();
    store.set_json("cond_p1_semanal", &json!({})).unwrap();

    assert_eq!(store.count().unwrap(), 2);
    assert_eq!(store.get_json("plan_p1").unwrap(), Some(plan_json()));
    assert_eq!(store.get_raw("missing").unwrap(), None);
    assert_eq!(store.keys_with_prefix("plan_").unwrap(), vec!["plan_p1"]);
}

#[test]
fn import_writes_a_bundle() {
    let mut pool = DbPool::in_memory().unwrap();
    init_db(&pool.conn).unwrap();

    let path = write_bundle(
        "store_import",
        &json!({
            plan_key("p1"): plan_json(),
            project_key("p1"): { "id": "p1" }
        }),
    );

    let n = ImportLogic::import(&mut pool, Path::new(&path)).unwrap();
    assert_eq!(n, 2);

    let store = SqliteStore::new(&pool.conn);
    assert_eq!(list_projects(&store).unwrap(), vec!["p1"]);

    let logged: i64 = pool
        .conn
        .query_row("SELECT COUNT(*) FROM log WHERE operation = 'import'", [], |r| r.get(0))
        .unwrap();
    assert_eq!(logged, 1);
}

#[test]
fn import_rejects_non_object_bundles() {
    let mut pool = DbPool::in_memory().unwrap();
    init_db(&pool.conn).unwrap();

    let path = write_bundle("store_import_array", &json!([1, 2, 3]));
    assert!(ImportLogic::import(&mut pool, Path::new(&path)).is_err());

    let store = SqliteStore::new(&pool.conn);
    assert_eq!(store.count().unwrap(), 0);
}
