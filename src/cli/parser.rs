use crate::export::ExportFormat;
use crate::models::mode::ProjectMode;
use clap::{Parser, Subcommand};

fn parse_mode(s: &str) -> Result<ProjectMode, String> {
    ProjectMode::from_label(s)
        .ok_or_else(|| format!("unknown mode '{s}' (expected semanal, mensual or publicidad)"))
}

/// Command-line interface definition for crewpay
/// Payroll aggregation and pricing for film crews, backed by SQLite
#[derive(Parser)]
#[command(
    name = "crewpay",
    version = env!("CARGO_PKG_VERSION"),
    about = "Crew payroll CLI: price worked days, overtime and per-diems from production plans",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and configuration
    Init,

    /// Manage the configuration file (view or edit)
    Config {
        #[arg(long = "print", help = "Print the current configuration file")]
        print_config: bool,

        #[arg(long = "check", help = "Check configuration file for missing fields")]
        check: bool,

        #[arg(long = "migrate", help = "Add missing fields with default values")]
        migrate: bool,

        #[arg(
            long = "edit",
            help = "Edit the configuration file (default editor: $EDITOR, or nano/notepad)"
        )]
        edit_config: bool,

        #[arg(
            long = "editor",
            help = "Specify the editor to use (vim, nano, or custom path)"
        )]
        editor: Option<String>,
    },

    /// Manage the database (migrations, integrity checks, etc.)
    Db {
        #[arg(long = "migrate", help = "Run pending database migrations")]
        migrate: bool,

        #[arg(long = "check", help = "Check database integrity")]
        check: bool,

        #[arg(long = "vacuum", help = "Optimize the database using VACUUM")]
        vacuum: bool,

        #[arg(long = "info", help = "Show database information")]
        info: bool,
    },

    /// Print the internal log table
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,
    },

    /// Load plans, catalogs, report sheets and overrides from a JSON bundle
    Import {
        /// JSON object mapping store keys to documents
        #[arg(long, value_name = "FILE")]
        file: String,
    },

    /// Compute and print the payroll of a project
    Payroll {
        #[arg(long, short = 'p', value_name = "ID")]
        project: String,

        /// Single month (YYYY-MM)
        #[arg(long, value_name = "YYYY-MM", conflicts_with = "period")]
        month: Option<String>,

        /// Restrict to a period (YYYY, YYYY-MM, YYYY-MM-DD or start:end ranges)
        #[arg(long, value_name = "RANGE")]
        period: Option<String>,

        /// Force the project mode (semanal, mensual, publicidad)
        #[arg(long, value_parser = parse_mode)]
        mode: Option<ProjectMode>,

        /// Show the day breakdown and quantities of every row
        #[arg(long)]
        details: bool,
    },

    /// Export payroll rows
    Export {
        #[arg(long, short = 'p', value_name = "ID")]
        project: String,

        #[arg(long, value_enum, default_value = "csv")]
        format: ExportFormat,

        /// Output file path (absolute path required)
        #[arg(long, value_name = "FILE")]
        file: String,

        /// Date range to export.
        ///
        /// Supported formats:
        /// - YYYY                  → entire year (e.g. "2025")
        /// - YYYY-MM              → entire month (e.g. "2025-06")
        /// - YYYY-MM-DD           → specific day  (e.g. "2025-06-18")
        ///
        /// Ranges (start:end) in the same format, e.g. "2025-06:2025-08".
        ///
        /// Special value `all` (or omitting it) exports every active month.
        #[arg(
            long,
            value_name = "RANGE",
            help = "Filter export by year/month/day or a custom range"
        )]
        range: Option<String>,

        /// Force the project mode (semanal, mensual, publicidad)
        #[arg(long, value_parser = parse_mode)]
        mode: Option<ProjectMode>,

        /// Overwrite output file without confirmation
        #[arg(long, short = 'f')]
        force: bool,
    },
}
