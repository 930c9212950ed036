// src/export/logic.rs

use crate::config::Config;
use crate::core::payroll::{Selection, compute_run};
use crate::errors::{AppError, AppResult};
use crate::export::ExportFormat;
use crate::export::fs_utils::ensure_writable;
use crate::export::json_csv::{export_csv, export_json};
use crate::export::model::flatten;
use crate::models::mode::ProjectMode;
use crate::store::log::{Op, oplog};
use crate::store::pool::DbPool;
use crate::ui::messages::warning;
use crate::utils::path::expand_tilde;

/// High level payroll export.
pub struct ExportLogic;

impl ExportLogic {
    /// Export the payroll rows of a project.
    ///
    /// - `file`: absolute output path (`~/` is expanded)
    /// - `range`: `None`, `"all"` or one of:
    ///   - `YYYY`
    ///   - `YYYY-MM`
    ///   - `YYYY-MM-DD`
    ///   - `YYYY:YYYY`
    ///   - `YYYY-MM:YYYY-MM`
    ///   - `YYYY-MM-DD:YYYY-MM-DD`
    ///
    /// Returns the number of records written.
    #[allow(clippy::too_many_arguments)]
    pub fn export(
        pool: &DbPool,
        cfg: &Config,
        project: &str,
        format: ExportFormat,
        file: &str,
        range: Option<&str>,
        mode: Option<ProjectMode>,
        force: bool,
    ) -> AppResult<usize> {
        let path = expand_tilde(file);

        if !path.is_absolute() {
            return Err(AppError::Export(format!(
                "output file path must be absolute: {file}"
            )));
        }

        let selection = Selection::from_args(None, range)?;
        let run = compute_run(pool, cfg, project, selection, mode)?;
        let records = flatten(project, run.months.values());

        if records.is_empty() {
            warning("No payroll rows found for selected range.");
            return Ok(0);
        }

        ensure_writable(&path, force)?;

        match format {
            ExportFormat::Csv => export_csv(&records, &path)?,
            ExportFormat::Json => export_json(&records, &path)?,
        }

        oplog(
            &pool.conn,
            Op::Export,
            project,
            &format!(
                "{} row(s) as {} to {}",
                records.len(),
                format.as_str(),
                path.display()
            ),
        )?;

        Ok(records.len())
    }
}
