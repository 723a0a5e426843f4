//! Read-only employee report: connect, fetch everything, print, disconnect.

use std::io::{self, Write};

use db::repository::employees as employee_repo;
use db::{DbConfig, DbError, DbPool};
use tracing::{error, info, instrument};

use crate::error::ReportError;
use crate::view;

/// Print the employee table for an already open pool.
pub async fn print_report(pool: &DbPool, out: &mut impl Write) -> Result<usize, ReportError> {
    let employees = employee_repo::list_employees(pool).await?;
    view::employee_table(out, &employees)?;
    Ok(employees.len())
}

/// Full report run: banner, connect, query, print, close.
///
/// Store failures are printed rather than returned; the record count is
/// returned when the report completed.
#[instrument(skip_all)]
pub async fn run(config: &DbConfig, out: &mut impl Write) -> io::Result<Option<usize>> {
    writeln!(out, "{}", "=".repeat(view::EMPLOYEE_RULE_WIDTH))?;
    writeln!(out, "Employee Report")?;
    writeln!(out, "{}", "=".repeat(view::EMPLOYEE_RULE_WIDTH))?;
    writeln!(out)?;

    writeln!(out, "[INFO] Connecting to database...")?;
    let pool = match db::pool::connect(config).await {
        Ok(pool) => pool,
        Err(e) => {
            error!("employee report could not connect: {e}");
            print_db_error(&mut *out, &e)?;
            return Ok(None);
        }
    };
    writeln!(out, "[SUCCESS] Connected successfully!")?;
    writeln!(out)?;

    let outcome = match print_report(&pool, &mut *out).await {
        Ok(count) => {
            info!("employee report printed {count} records");
            Some(count)
        }
        Err(ReportError::Db(e)) => {
            print_db_error(&mut *out, &e)?;
            None
        }
        Err(ReportError::Io(e)) => {
            pool.close().await;
            return Err(e);
        }
    };

    pool.close().await;
    writeln!(out)?;
    writeln!(out, "[INFO] Database connection closed successfully.")?;
    Ok(outcome)
}

fn print_db_error(out: &mut impl Write, err: &DbError) -> io::Result<()> {
    writeln!(out, "[ERROR] Database error occurred!")?;
    writeln!(out, "Error Kind: {:?}", err.kind())?;
    writeln!(out, "Error Message: {err}")
}
