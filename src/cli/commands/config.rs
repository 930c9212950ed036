use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::config::ConfigLogic;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::warning;

/// Handle the `config` subcommand
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Config {
        print_config,
        check,
        migrate,
        edit_config,
        editor,
    } = cmd
    {
        let path = Config::config_file();

        if *print_config {
            if path.exists() {
                println!("📄 Current configuration ({}):\n", path.display());
                ConfigLogic::print(&path)?;
            } else {
                warning("No configuration file found, showing effective settings.");
                let yaml = serde_yaml::to_string(cfg).map_err(|e| AppError::Config(e.to_string()))?;
                println!("{}", yaml);
            }
        }

        if (*check || *migrate || *edit_config) && !path.exists() {
            return Err(AppError::Config(format!(
                "configuration file not found: {} (run `crewpay init`)",
                path.display()
            )));
        }

        if *check {
            ConfigLogic::check(&path)?;
        }

        if *migrate {
            ConfigLogic::migrate(&path)?;
        }

        if *edit_config {
            ConfigLogic::edit(&path, editor)?;
        }
    }

    Ok(())
}
