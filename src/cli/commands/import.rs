use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::import::ImportLogic;
use crate::errors::AppResult;
use crate::store::initialize::init_db;
use crate::store::pool::DbPool;
use crate::utils::path::expand_tilde;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Import { file } = cmd {
        let mut pool = DbPool::new(&cfg.database)?;
        init_db(&pool.conn)?;
        ImportLogic::import(&mut pool, &expand_tilde(file))?;
    }
    Ok(())
}
