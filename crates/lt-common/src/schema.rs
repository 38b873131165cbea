//! Column naming for loss tables.

/// Calendar date of a row.
pub const DATE_COLUMN: &str = "date";

/// Days since tracking started.
pub const DAY_COLUMN: &str = "day";

/// Free-text annotation column; not a count.
pub const DIRECTION_COLUMN: &str = "greatest losses direction";

/// Check if a column name is reserved (i.e. not a loss category).
pub fn is_reserved(name: &str) -> bool {
    matches!(name, DATE_COLUMN | DAY_COLUMN | DIRECTION_COLUMN)
}
