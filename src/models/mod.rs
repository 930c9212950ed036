pub mod mode;
pub mod payroll;
pub mod person;
pub mod plan;
pub mod price;
pub mod project;
pub mod report;
