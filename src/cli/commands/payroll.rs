use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::payroll::{PayrollLogic, Selection};
use crate::errors::AppResult;
use crate::store::initialize::init_db;
use crate::store::pool::DbPool;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Payroll {
        project,
        month,
        period,
        mode,
        details,
    } = cmd
    {
        let selection = Selection::from_args(month.as_deref(), period.as_deref())?;
        let pool = DbPool::new(&cfg.database)?;
        init_db(&pool.conn)?;
        PayrollLogic::print(&pool, cfg, project, selection, *mode, *details)?;
    }
    Ok(())
}
