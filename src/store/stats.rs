use crate::store::keys;
use crate::store::pool::DbPool;
use crate::utils::colors::{CYAN, GREEN, GREY, RESET, YELLOW};
use rusqlite::OptionalExtension;
use std::fs;

fn count_prefix(pool: &DbPool, prefix: &str) -> rusqlite::Result<i64> {
    pool.conn.query_row(
        "SELECT COUNT(*) FROM kv WHERE substr(key, 1, length(?1)) = ?1",
        [prefix],
        |row| row.get(0),
    )
}

pub fn print_db_info(pool: &DbPool, db_path: &str) -> rusqlite::Result<()> {
    println!();

    //
    // 1) FILE SIZE
    //
    let file_size = fs::metadata(db_path).map(|m| m.len()).unwrap_or(0);
    let file_mb = (file_size as f64) / (1024.0 * 1024.0);

    println!("{}• File:{} {}{}{}", CYAN, RESET, YELLOW, db_path, RESET);
    println!("{}• Size:{} {:.2} MB", CYAN, RESET, file_mb);

    //
    // 2) DOCUMENTS
    //
    let total: i64 = pool
        .conn
        .query_row("SELECT COUNT(*) FROM kv", [], |row| row.get(0))?;
    println!("{}• Documents:{} {}{}{}", CYAN, RESET, GREEN, total, RESET);

    for (label, prefix) in [
        ("projects", keys::PLAN_PREFIX),
        ("catalogs", keys::CATALOG_PREFIX),
        ("report weeks", keys::REPORT_PREFIX),
        ("override months", keys::OVERRIDES_PREFIX),
    ] {
        println!("    {:<16} {}", label, count_prefix(pool, prefix)?);
    }

    //
    // 3) LAST WRITE
    //
    let last: Option<String> = pool
        .conn
        .query_row(
            "SELECT updated_at FROM kv WHERE updated_at <> '' ORDER BY updated_at DESC LIMIT 1",
            [],
            |row| row.get(0),
        )
        .optional()?;

    println!(
        "{}• Last update:{} {}",
        CYAN,
        RESET,
        last.unwrap_or_else(|| format!("{GREY}--{RESET}"))
    );

    println!();
    Ok(())
}
