//! One handler per subcommand.

pub mod config;
pub mod db;
pub mod export;
pub mod import;
pub mod init;
pub mod log;
pub mod payroll;
