use crate::errors::AppResult;
use crate::store::migrate::run_pending_migrations;
use rusqlite::Connection;

/// Initialize the database.
/// All schema creation and upgrades go through the migration engine.
pub fn init_db(conn: &Connection) -> AppResult<()> {
    run_pending_migrations(conn)?;
    Ok(())
}
