use super::{CONFIG_KEYS, Config};
use crate::errors::{AppError, AppResult};
use crate::store::migrate::{is_applied, mark_applied};
use crate::ui::messages::success;
use rusqlite::Connection;
use serde_yaml::{Mapping, Value};
use std::fs;
use std::path::Path;

const VERSION: &str = "20251001_0003_config_fill_missing_keys";

fn read_mapping(path: &Path) -> AppResult<Mapping> {
    let content = fs::read_to_string(path).map_err(|_| AppError::ConfigLoad)?;
    match serde_yaml::from_str::<Value>(&content) {
        Ok(Value::Mapping(map)) => Ok(map),
        Ok(Value::Null) => Ok(Mapping::new()),
        Ok(_) => Err(AppError::Config(format!(
            "{} is not a YAML mapping",
            path.display()
        ))),
        Err(e) => Err(AppError::Config(e.to_string())),
    }
}

/// Keys absent from the configuration file at `path`.
pub fn missing_keys(path: &Path) -> AppResult<Vec<&'static str>> {
    let map = read_mapping(path)?;
    Ok(CONFIG_KEYS
        .into_iter()
        .filter(|k| !map.contains_key(Value::String((*k).to_string())))
        .collect())
}

/// Add every missing key with its default value, keeping the values already
/// present. Returns the keys that were added.
pub fn fill_missing_keys(path: &Path) -> AppResult<Vec<&'static str>> {
    let missing = missing_keys(path)?;
    if missing.is_empty() {
        return Ok(missing);
    }

    let mut map = read_mapping(path)?;
    let defaults = match serde_yaml::to_value(Config::default()) {
        Ok(Value::Mapping(m)) => m,
        _ => return Err(AppError::ConfigSave),
    };

    for key in &missing {
        let k = Value::String((*key).to_string());
        if let Some(v) = defaults.get(&k) {
            map.insert(k, v.clone());
        }
    }

    let serialized = serde_yaml::to_string(&Value::Mapping(map)).map_err(|_| AppError::ConfigSave)?;
    fs::write(path, serialized)?;
    Ok(missing)
}

/// Versioned migration that completes the user's configuration file, marked
/// as applied in the `log` table.
pub fn run_config_migration(conn: &Connection) -> AppResult<()> {
    if is_applied(conn, VERSION)? {
        return Ok(());
    }

    let conf_file = Config::config_file();
    let added = if conf_file.exists() {
        fill_missing_keys(&conf_file)?
    } else {
        Vec::new()
    };

    mark_applied(conn, VERSION, "Filled missing configuration keys")?;

    if !added.is_empty() {
        success(format!(
            "Migration applied: {} → added {} to config.",
            VERSION,
            added.join(", ")
        ));
    }

    Ok(())
}
