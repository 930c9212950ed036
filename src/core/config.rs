use crate::config::Config;
use crate::config::migrate::{fill_missing_keys, missing_keys};
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{info, success, warning};
use std::fs;
use std::path::Path;
use std::process::Command;

pub struct ConfigLogic;

impl ConfigLogic {
    pub fn print(path: &Path) -> AppResult<()> {
        let content = fs::read_to_string(path).map_err(|_| AppError::ConfigLoad)?;
        println!("{}", content);
        Ok(())
    }

    /// Report the keys missing from the configuration file.
    pub fn check(path: &Path) -> AppResult<Vec<&'static str>> {
        let missing = missing_keys(path)?;
        if missing.is_empty() {
            success(format!("Configuration {} is complete.", path.display()));
        } else {
            warning(format!(
                "Configuration {} lacks: {}",
                path.display(),
                missing.join(", ")
            ));
            info("Run `crewpay config --migrate` to add them with default values.");
        }
        // parses with defaults even when keys are missing
        Config::load_from(path)?;
        Ok(missing)
    }

    pub fn migrate(path: &Path) -> AppResult<()> {
        let added = fill_missing_keys(path)?;
        if added.is_empty() {
            info("Nothing to migrate.");
        } else {
            success(format!("Added to configuration: {}", added.join(", ")));
        }
        Ok(())
    }

    pub fn edit(path: &Path, editor: &Option<String>) -> AppResult<()> {
        let ed = editor
            .clone()
            .or_else(|| std::env::var("EDITOR").ok())
            .unwrap_or_else(|| {
                if cfg!(target_os = "windows") {
                    "notepad".into()
                } else {
                    "nano".into()
                }
            });

        Command::new(ed)
            .arg(path)
            .status()
            .map_err(|e| AppError::Config(e.to_string()))?;

        Ok(())
    }
}
