pub mod runner;

pub use runner::{MigrationOutcome, exit_code_for, run};
