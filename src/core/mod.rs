//! Payroll engine and the command logic built on it.
//!
//! `plan_reader`, `prices`, `classifier`, `aggregate`, `window` and `enrich`
//! are pure: they read an in-memory [`crate::models::project::ProjectData`]
//! snapshot and never fail.

pub mod aggregate;
pub mod classifier;
pub mod config;
pub mod enrich;
pub mod import;
pub mod log;
pub mod logic;
pub mod payroll;
pub mod plan_reader;
pub mod prices;
pub mod window;
