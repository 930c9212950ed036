mod common;
use common::temp_out;
use crewpay::config::Config;
use crewpay::config::migrate::{fill_missing_keys, missing_keys};
use crewpay::models::mode::ProjectMode;
use std::fs;
use std::path::Path;

#[test]
fn partial_file_loads_with_defaults() {
    let path = temp_out("config_partial", "conf");
    fs::write(&path, "database: /tmp/x.sqlite\ndefault_mode: publicidad\n").unwrap();

    let cfg = Config::load_from(Path::new(&path)).unwrap();
    assert_eq!(cfg.database, "/tmp/x.sqlite");
    assert_eq!(cfg.default_mode, ProjectMode::Publicidad);
    assert_eq!(cfg.currency, "€");
    assert!(cfg.show_missing_prices);
}

#[test]
fn missing_keys_are_reported_and_filled() {
    let path = temp_out("config_fill", "conf");
    fs::write(&path, "database: /tmp/y.sqlite\ncurrency: USD\n").unwrap();
    let p = Path::new(&path);

    assert_eq!(
        missing_keys(p).unwrap(),
        vec!["default_mode", "separator_char", "show_missing_prices"]
    );

    let added = fill_missing_keys(p).unwrap();
    assert_eq!(added.len(), 3);
    assert!(missing_keys(p).unwrap().is_empty());

    // values already present survive
    let cfg = Config::load_from(p).unwrap();
    assert_eq!(cfg.currency, "USD");
    assert_eq!(cfg.database, "/tmp/y.sqlite");
    assert!(fill_missing_keys(p).unwrap().is_empty());
}

#[test]
fn non_mapping_file_is_a_config_error() {
    let path = temp_out("config_list", "conf");
    fs::write(&path, "- a\n- b\n").unwrap();
    assert!(missing_keys(Path::new(&path)).is_err());
}
