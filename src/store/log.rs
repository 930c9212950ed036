//! Operation log (`log` table).

use crate::errors::AppResult;
use chrono::Local;
use rusqlite::{Connection, params};

/// Operations recorded in the `log` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Init,
    Import,
    Payroll,
    Export,
    Vacuum,
    /// Written by the migration engine itself.
    MigrationApplied,
}

impl Op {
    pub fn as_str(&self) -> &'static str {
        match self {
            Op::Init => "init",
            Op::Import => "import",
            Op::Payroll => "payroll",
            Op::Export => "export",
            Op::Vacuum => "vacuum",
            Op::MigrationApplied => "migration_applied",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        [
            Op::Init,
            Op::Import,
            Op::Payroll,
            Op::Export,
            Op::Vacuum,
            Op::MigrationApplied,
        ]
        .into_iter()
        .find(|op| op.as_str() == s)
    }
}

/// Append one line to the operation log.
pub fn oplog(conn: &Connection, op: Op, target: &str, message: &str) -> AppResult<()> {
    conn.prepare_cached(
        "INSERT INTO log (date, operation, target, message) VALUES (?1, ?2, ?3, ?4)",
    )?
    .execute(params![Local::now().to_rfc3339(), op.as_str(), target, message])?;
    Ok(())
}
