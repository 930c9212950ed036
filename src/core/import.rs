use crate::errors::{AppError, AppResult};
use crate::store::kv::{KvStore, SqliteStore};
use crate::store::log::{Op, oplog};
use crate::store::pool::DbPool;
use crate::ui::messages::{info, success, warning};
use serde_json::Value;
use std::fs;
use std::path::Path;

pub struct ImportLogic;

impl ImportLogic {
    /// Store every `key → document` pair of a JSON bundle verbatim.
    ///
    /// The whole bundle is written in one transaction. Returns the number of
    /// documents stored.
    pub fn import(pool: &mut DbPool, path: &Path) -> AppResult<usize> {
        let text = fs::read_to_string(path)?;
        let bundle: Value = serde_json::from_str(&text)?;

        let Value::Object(entries) = bundle else {
            return Err(AppError::Store(format!(
                "{} must contain a JSON object of key → document",
                path.display()
            )));
        };

        if entries.is_empty() {
            warning(format!("{} contains no documents.", path.display()));
            return Ok(0);
        }

        info(format!("Importing {} document(s)…", entries.len()));

        let tx = pool.conn.transaction()?;
        {
            let mut store = SqliteStore::new(&tx);
            for (key, value) in &entries {
                let key = key.trim();
                if key.is_empty() {
                    return Err(AppError::Store("empty key in bundle".into()));
                }
                store.set_json(key, value)?;
            }
        }
        oplog(
            &tx,
            Op::Import,
            &path.display().to_string(),
            &format!("Imported {} document(s)", entries.len()),
        )?;
        tx.commit()?;

        success(format!(
            "Imported {} document(s) from {}",
            entries.len(),
            path.display()
        ));
        Ok(entries.len())
    }
}
