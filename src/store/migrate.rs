use crate::store::log::Op;
use crate::ui::messages::success;
use rusqlite::{Connection, OptionalExtension, Result};

/// Ensure that the `log` table exists.
fn ensure_log_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

/// True when `version` is marked as applied in the `log` table.
pub fn is_applied(conn: &Connection, version: &str) -> Result<bool> {
    let mut chk =
        conn.prepare("SELECT 1 FROM log WHERE operation = ?1 AND target = ?2 LIMIT 1")?;
    Ok(chk
        .query_row([Op::MigrationApplied.as_str(), version], |_| Ok(()))
        .optional()?
        .is_some())
}

pub fn mark_applied(conn: &Connection, version: &str, message: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO log (date, operation, target, message)
         VALUES (datetime('now'), ?1, ?2, ?3)",
        [Op::MigrationApplied.as_str(), version, message],
    )?;
    Ok(())
}

/// Check if a table exists.
fn table_exists(conn: &Connection, name: &str) -> Result<bool> {
    let mut stmt = conn.prepare("SELECT name FROM sqlite_master WHERE type='table' AND name=?1")?;
    let exists: Option<String> = stmt.query_row([name], |row| row.get(0)).optional()?;
    Ok(exists.is_some())
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> Result<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info('{table}')"))?;
    let cols = stmt.query_map([], |row| row.get::<_, String>(1))?;

    for c in cols {
        if c? == column {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Key-value documents (plans, catalogs, report sheets, overrides).
fn migrate_create_kv_table(conn: &Connection) -> Result<()> {
    let version = "20250901_0001_create_kv";
    if is_applied(conn, version)? {
        return Ok(());
    }

    if !table_exists(conn, "kv")? {
        conn.execute_batch(
            r#"
            CREATE TABLE kv (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );
            "#,
        )?;
    }

    mark_applied(conn, version, "Created kv table")?;
    success(format!("Migration applied: {} → created 'kv' table", version));
    Ok(())
}

/// Track when each document was last written.
fn migrate_add_updated_at(conn: &Connection) -> Result<()> {
    let version = "20250915_0002_kv_updated_at";
    if is_applied(conn, version)? {
        return Ok(());
    }

    if !table_has_column(conn, "kv", "updated_at")? {
        conn.execute(
            "ALTER TABLE kv ADD COLUMN updated_at TEXT NOT NULL DEFAULT ''",
            [],
        )?;
    }
    conn.execute_batch("CREATE INDEX IF NOT EXISTS idx_kv_updated_at ON kv(updated_at);")?;

    mark_applied(conn, version, "Added updated_at to kv")?;
    success(format!(
        "Migration applied: {} → added 'updated_at' to kv table",
        version
    ));
    Ok(())
}

/// Run all pending migrations. Safe to call on every start.
pub fn run_pending_migrations(conn: &Connection) -> Result<()> {
    ensure_log_table(conn)?;
    migrate_create_kv_table(conn)?;
    migrate_add_updated_at(conn)?;
    Ok(())
}
