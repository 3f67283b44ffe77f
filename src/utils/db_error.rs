//! Helpers for classifying database errors.

/// Returns the constraint name when the error is a unique constraint
/// violation, `None` for any other error.
pub fn unique_violation_constraint(e: &sqlx::Error) -> Option<String> {
    let db_err = e.as_database_error()?;

    if !db_err.is_unique_violation() {
        return None;
    }

    db_err.constraint().map(str::to_string)
}
