use crate::config::Config;
use crate::core::logic::{Core, MonthPayroll};
use crate::errors::AppResult;
use crate::models::mode::ProjectMode;
use crate::models::payroll::EnrichedPayrollRow;
use crate::store::kv::SqliteStore;
use crate::store::log::{Op, oplog};
use crate::store::pool::DbPool;
use crate::store::queries::{LoadedProject, load_project_data};
use crate::ui::messages::{header, info, warning};
use crate::utils::colors::{GREY, RED, RESET, YELLOW, colorize_optional};
use crate::utils::date::{DateRange, MonthKey, parse_range};
use crate::utils::formatting::{bold, money, quantity};
use crate::utils::table::{Column, Table};
use std::collections::BTreeMap;

/// Months a payroll run covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    All,
    Month(MonthKey),
    Period(DateRange),
}

impl Selection {
    pub fn from_args(month: Option<&str>, period: Option<&str>) -> AppResult<Self> {
        if let Some(m) = month {
            return Ok(Selection::Month(MonthKey::parse(m)?));
        }
        match period {
            None => Ok(Selection::All),
            Some(p) if p.trim().eq_ignore_ascii_case("all") => Ok(Selection::All),
            Some(p) => Ok(Selection::Period(parse_range(p)?)),
        }
    }
}

/// Project snapshot plus the payroll of every selected month.
pub struct PayrollRun {
    pub loaded: LoadedProject,
    pub months: BTreeMap<MonthKey, MonthPayroll>,
}

impl PayrollRun {
    pub fn row_count(&self) -> usize {
        self.months.values().map(|m| m.rows.len()).sum()
    }

    pub fn total_gross(&self) -> f64 {
        self.months.values().map(MonthPayroll::total_gross).sum()
    }
}

/// Load a project from the database and price the selected months.
pub fn compute_run(
    pool: &DbPool,
    cfg: &Config,
    project: &str,
    selection: Selection,
    mode: Option<ProjectMode>,
) -> AppResult<PayrollRun> {
    let store = SqliteStore::new(&pool.conn);
    let loaded = load_project_data(&store, project, mode, cfg.default_mode)?;

    for w in &loaded.warnings {
        warning(w);
    }

    let data = &loaded.data;
    let months = match selection {
        Selection::All => Core::compute_project(data, None, loaded.mode),
        Selection::Period(range) => Core::compute_project(data, Some(&range), loaded.mode),
        Selection::Month(month) => {
            let payroll = Core::compute_month(data, month, None, loaded.mode);
            let mut out = BTreeMap::new();
            if !payroll.rows.is_empty() {
                out.insert(month, payroll);
            }
            out
        }
    };

    Ok(PayrollRun { loaded, months })
}

fn dietas_summary(row: &EnrichedPayrollRow) -> String {
    let mut parts: Vec<String> = row
        .quantities
        .dietas
        .iter()
        .filter(|(_, n)| **n > 0)
        .map(|(label, n)| format!("{label}×{n}"))
        .collect();
    if row.quantities.ticket > 0.0 {
        parts.push(format!("Ticket {}", quantity(row.quantities.ticket)));
    }
    if row.quantities.otros > 0.0 {
        parts.push(format!("Otros {}", quantity(row.quantities.otros)));
    }
    if parts.is_empty() {
        "--".to_string()
    } else {
        parts.join(", ")
    }
}

fn details_line(row: &EnrichedPayrollRow, cfg: &Config) -> String {
    let w = &row.worked;
    let q = &row.quantities;
    let mut line = format!(
        "{GREY}    days {} · holidays {} · travel {} · load/unload {} · location {}",
        w.worked_days,
        w.holiday_days,
        w.travel_days,
        w.load_unload_days(),
        w.localizacion_days,
    );
    if let Some(span) = row.working_days_in_month {
        line.push_str(&format!(" · span {span}"));
    }
    line.push_str(&format!(
        " | OT {}h · turnaround {}h · night {} · lunch {} · dietas {}",
        quantity(q.horas_extra),
        quantity(q.turnaround),
        quantity(q.nocturnidad),
        quantity(q.penalty_lunch),
        dietas_summary(row),
    ));
    if row.window_applied {
        line.push_str(" · window");
    }
    if row.override_applied {
        line.push_str(" · manual");
    }
    line.push_str(RESET);

    if cfg.show_missing_prices && row.has_missing_prices() {
        let missing: Vec<&str> = row.missing_prices.iter().map(|f| f.label()).collect();
        line.push_str(&format!("\n{RED}    missing prices: {}{RESET}", missing.join(", ")));
    }
    line
}

/// Text table of one month.
pub fn render_month(payroll: &MonthPayroll, cfg: &Config, details: bool) -> String {
    let amount = |v: f64| colorize_optional(&money(v, ""));

    let mut table = Table::new(vec![
        Column::left("Role"),
        Column::left("Name"),
        Column::right("Days"),
        Column::right("Holid."),
        Column::right("Travel"),
        Column::right("Extras"),
        Column::right("Dietas"),
        Column::right("Transp."),
        Column::right("Km"),
        Column::right("Other"),
        Column::right("Gross"),
    ])
    .with_separator(&cfg.separator_char);

    for row in &payroll.rows {
        let s = &row.subtotals;
        let flag = if cfg.show_missing_prices && row.has_missing_prices() {
            format!(" {YELLOW}⚠{RESET}")
        } else {
            String::new()
        };
        table.add_row(vec![
            row.role.clone(),
            format!("{}{}", row.name, flag),
            amount(s.total_dias),
            amount(s.total_holidays),
            amount(s.total_travel),
            amount(s.total_extras),
            amount(s.total_dietas),
            amount(s.total_transporte),
            amount(s.total_km),
            amount(s.total_material_propio + s.total_localizacion + s.total_carga_descarga),
            bold(&money(row.total_gross, &cfg.currency)),
        ]);
    }

    let rendered = table.render();
    let mut out = String::new();
    let mut lines = rendered.lines();

    // header and rule
    for _ in 0..2 {
        if let Some(l) = lines.next() {
            out.push_str(l);
            out.push('\n');
        }
    }
    for (line, row) in lines.zip(&payroll.rows) {
        out.push_str(line);
        out.push('\n');
        if details {
            out.push_str(&details_line(row, cfg));
            out.push('\n');
        }
    }

    out.push_str(&format!(
        "\n{}\n",
        bold(&format!(
            "Total {}: {}",
            payroll.month,
            money(payroll.total_gross(), &cfg.currency)
        ))
    ));
    out
}

pub struct PayrollLogic;

impl PayrollLogic {
    pub fn print(
        pool: &DbPool,
        cfg: &Config,
        project: &str,
        selection: Selection,
        mode: Option<ProjectMode>,
        details: bool,
    ) -> AppResult<()> {
        let run = compute_run(pool, cfg, project, selection, mode)?;
        let name = run.loaded.data.project.display_name().to_string();

        if run.months.is_empty() {
            info(format!("No payroll rows for project '{name}' in the selected period."));
            return Ok(());
        }

        if run.loaded.catalog_mode.is_none() {
            warning(format!("Project '{name}' has no price catalog: every amount is zero."));
        } else if run.loaded.catalog_mode != Some(run.loaded.mode) {
            warning(format!(
                "No {} catalog for '{name}', using the {} one.",
                run.loaded.mode,
                run.loaded
                    .catalog_mode
                    .map(|m| m.key())
                    .unwrap_or_default()
            ));
        }

        info(format!(
            "{} crew member(s) scheduled, mode {}",
            Core::team_size(&run.loaded.data),
            run.loaded.mode
        ));

        for payroll in run.months.values() {
            header(format!("{name} · {} · {}", payroll.month, payroll.mode));
            if let Some(w) = &payroll.window {
                info(format!("Overtime window: {w}"));
            }
            print!("{}", render_month(payroll, cfg, details));
            println!();
        }

        if run.months.len() > 1 {
            println!(
                "{}",
                bold(&format!(
                    "Project total: {}",
                    money(run.total_gross(), &cfg.currency)
                ))
            );
        }

        oplog(
            &pool.conn,
            Op::Payroll,
            project,
            &format!(
                "{} row(s) over {} month(s), mode {}",
                run.row_count(),
                run.months.len(),
                run.loaded.mode
            ),
        )?;

        Ok(())
    }
}
