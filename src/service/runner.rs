use crate::db::schema::{BOOKINGS_TABLE, STATUS_CONSTRAINT_FIX};
use crate::error::FixerError;
use crate::supabase::SqlExecutor;
use std::io::{self, Write};
use tracing::{info, warn};

const RULE_WIDTH: usize = 60;

pub const MANUAL_STEPS: [&str; 4] = [
    "Go to your Supabase Dashboard",
    "Navigate to SQL Editor",
    "Copy and paste the SQL above",
    "Click 'Run' to execute",
];

/// Result of one migration attempt.
#[derive(Debug)]
pub enum MigrationOutcome {
    /// The remote accepted the script.
    Applied,
    /// The remote call failed; the operator was handed the SQL.
    ManualFallback(FixerError),
}

impl MigrationOutcome {
    pub fn exit_code(&self) -> u8 {
        match self {
            MigrationOutcome::Applied => 0,
            MigrationOutcome::ManualFallback(e) => e.kind().exit_code(),
        }
    }
}

/// Exit code for a finished run. A report that could not be written (for
/// example a closed stdout) does not turn the run into a config failure.
pub fn exit_code_for(result: &io::Result<MigrationOutcome>) -> u8 {
    match result {
        Ok(outcome) => outcome.exit_code(),
        Err(_) => 0,
    }
}

/// Submit the status constraint fix once and report to `out`.
///
/// Remote failures never propagate: they are logged, followed by a single
/// reachability probe of the bookings table, and the operator receives the
/// script plus manual steps. Only write errors on `out` are returned.
pub async fn run<E, W>(executor: &E, out: &mut W) -> io::Result<MigrationOutcome>
where
    E: SqlExecutor,
    W: Write,
{
    writeln!(out, "Fixing status constraint on bookings table...")?;

    match executor.exec_sql(STATUS_CONSTRAINT_FIX).await {
        Ok(()) => {
            info!("status constraint migration applied");
            write_success(out)?;
            Ok(MigrationOutcome::Applied)
        }
        Err(e) => {
            warn!(error = %e, kind = ?e.kind(), "exec_sql failed; falling back to manual instructions");
            probe_bookings(executor).await;
            write_manual_fallback(out, &e)?;
            Ok(MigrationOutcome::ManualFallback(e))
        }
    }
}

async fn probe_bookings<E: SqlExecutor>(executor: &E) {
    match executor.probe_table(BOOKINGS_TABLE).await {
        Ok(()) => info!(
            table = BOOKINGS_TABLE,
            "table reachable; the exec_sql function is likely missing or not permitted"
        ),
        Err(e) => warn!(table = BOOKINGS_TABLE, error = %e, "table probe failed as well"),
    }
}

pub fn write_success<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(out, "✓ Successfully updated status constraint!")?;
    writeln!(out, "✓ The bookings table now accepts all 11 status values")
}

pub fn write_manual_fallback<W: Write>(out: &mut W, error: &FixerError) -> io::Result<()> {
    let rule = "=".repeat(RULE_WIDTH);

    writeln!(out, "Note: {error}")?;
    writeln!(out)?;
    writeln!(
        out,
        "Please run the following SQL directly in your Supabase SQL Editor:"
    )?;
    writeln!(out)?;
    writeln!(out, "{rule}")?;
    writeln!(out, "{STATUS_CONSTRAINT_FIX}")?;
    writeln!(out, "{rule}")?;
    writeln!(out)?;
    writeln!(out, "Steps:")?;
    for (i, step) in MANUAL_STEPS.iter().enumerate() {
        writeln!(out, "{}. {step}", i + 1)?;
    }
    Ok(())
}
