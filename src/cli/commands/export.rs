use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::AppResult;
use crate::export::ExportLogic;
use crate::store::initialize::init_db;
use crate::store::pool::DbPool;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Export {
        project,
        format,
        file,
        range,
        mode,
        force,
    } = cmd
    {
        let pool = DbPool::new(&cfg.database)?;
        init_db(&pool.conn)?;
        ExportLogic::export(
            &pool,
            cfg,
            project,
            *format,
            file,
            range.as_deref(),
            *mode,
            *force,
        )?;
    }
    Ok(())
}
