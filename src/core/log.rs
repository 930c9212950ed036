use crate::errors::AppResult;
use crate::store::log::Op;
use crate::store::pool::DbPool;
use crate::utils::table::display_width;
use ansi_term::Colour;

const OP_MAX: usize = 60;

/// ANSI colour of each logged operation.
fn color_for_operation(op: &str) -> Colour {
    match Op::parse(op) {
        Some(Op::Import) => Colour::Green,
        Some(Op::Payroll) => Colour::Cyan,
        Some(Op::Export) => Colour::Blue,
        Some(Op::Vacuum) => Colour::Yellow,
        Some(Op::MigrationApplied) => Colour::Purple,
        Some(Op::Init) => Colour::RGB(255, 153, 51), // orange
        None => Colour::White,
    }
}

struct LogEntry {
    id: i64,
    date: String,
    operation: String,
    target: String,
    message: String,
}

impl LogEntry {
    /// `operation (target)` truncated to [`OP_MAX`] visible characters, with
    /// only the operation word coloured.
    fn op_target(&self) -> String {
        let plain = if self.target.is_empty() {
            self.operation.clone()
        } else {
            format!("{} ({})", self.operation, self.target)
        };

        let visible = if plain.chars().count() > OP_MAX {
            let mut s: String = plain.chars().take(OP_MAX - 3).collect();
            s.push_str("...");
            s
        } else {
            plain
        };

        let color = color_for_operation(&self.operation);
        match visible.split_once(' ') {
            Some((op, rest)) => format!("{} {}", color.paint(op), rest),
            None => color.paint(visible.as_str()).to_string(),
        }
    }
}

pub struct LogLogic;

impl LogLogic {
    pub fn print_log(pool: &DbPool) -> AppResult<()> {
        let mut stmt = pool.conn.prepare_cached(
            "SELECT id, date, operation, target, message FROM log ORDER BY id ASC",
        )?;

        let rows = stmt.query_map([], |row| {
            let raw_date: String = row.get(1)?;
            let date = chrono::DateTime::parse_from_rfc3339(&raw_date)
                .map(|dt| dt.format("%FT%T%:z").to_string())
                .unwrap_or(raw_date);

            Ok(LogEntry {
                id: row.get(0)?,
                date,
                operation: row.get(2)?,
                target: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
                message: row.get(4)?,
            })
        })?;

        let mut entries = Vec::new();
        for r in rows {
            entries.push(r?);
        }

        if entries.is_empty() {
            println!("📜 Internal log is empty.");
            return Ok(());
        }

        let id_w = entries
            .iter()
            .map(|e| e.id.to_string().len())
            .max()
            .unwrap_or(1);
        let date_w = entries.iter().map(|e| e.date.len()).max().unwrap_or(10);

        let labels: Vec<String> = entries.iter().map(LogEntry::op_target).collect();
        let op_w = labels
            .iter()
            .map(|l| display_width(l))
            .max()
            .unwrap_or(10)
            .min(OP_MAX);

        println!("📜 Internal log:\n");

        for (e, label) in entries.iter().zip(labels) {
            let padding = " ".repeat(op_w.saturating_sub(display_width(&label)));
            println!(
                "{:>id_w$}: {:<date_w$} | {}{} => {}",
                e.id,
                e.date,
                label,
                padding,
                e.message,
                id_w = id_w,
                date_w = date_w
            );
        }

        Ok(())
    }
}
