//! `SQLite` schema definitions for donortrack.
//!
//! Amounts are stored as integer cents so that yearly sums are exact.

/// Pragmas applied to every connection before the schema is touched.
///
/// `foreign_keys` is off by default in `SQLite`; the donation cascade and the
/// donor reference check depend on it.
pub const CONNECTION_PRAGMAS: &str = "PRAGMA foreign_keys = ON;";

/// SQL statement to create the donors table.
pub const CREATE_DONORS_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS donors (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    first_name TEXT NOT NULL,
    last_name TEXT NOT NULL,
    street TEXT NOT NULL,
    city TEXT NOT NULL,
    state TEXT NOT NULL,
    zip TEXT NOT NULL,
    country TEXT NOT NULL,
    phone TEXT NOT NULL,
    email TEXT NOT NULL
)
";

/// SQL statement to create the donations table.
pub const CREATE_DONATIONS_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS donations (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    donor_id INTEGER NOT NULL,
    amount_cents INTEGER NOT NULL,
    date TEXT NOT NULL,
    payment_method TEXT NOT NULL,
    FOREIGN KEY (donor_id) REFERENCES donors(id) ON DELETE CASCADE
)
";

/// Index backing the per-donor donation listing.
pub const CREATE_DONATIONS_DONOR_INDEX: &str = r"
CREATE INDEX IF NOT EXISTS idx_donations_donor ON donations(donor_id, date DESC)
";

/// SQL statement to create the singleton organization table.
pub const CREATE_ORGANIZATION_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS organization (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    address TEXT NOT NULL
)
";

/// SQL statement to create the metadata table for storing key-value pairs.
pub const CREATE_METADATA_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS metadata (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
)
";

/// Fixed row id of the organization record.
pub const ORGANIZATION_ID: i64 = 1;

/// All schema creation statements in order.
pub const SCHEMA_STATEMENTS: &[&str] = &[
    CREATE_DONORS_TABLE,
    CREATE_DONATIONS_TABLE,
    CREATE_DONATIONS_DONOR_INDEX,
    CREATE_ORGANIZATION_TABLE,
    CREATE_METADATA_TABLE,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_statements_not_empty() {
        assert!(!SCHEMA_STATEMENTS.is_empty());
        for stmt in SCHEMA_STATEMENTS {
            assert!(!stmt.trim().is_empty());
        }
    }

    #[test]
    fn test_donations_cascade_on_donor_delete() {
        assert!(CREATE_DONATIONS_TABLE.contains("REFERENCES donors(id) ON DELETE CASCADE"));
    }

    #[test]
    fn test_donations_store_cents() {
        assert!(CREATE_DONATIONS_TABLE.contains("amount_cents INTEGER NOT NULL"));
        assert!(CREATE_DONATIONS_TABLE.contains("date TEXT NOT NULL"));
    }

    #[test]
    fn test_pragmas_enable_foreign_keys() {
        assert!(CONNECTION_PRAGMAS.contains("foreign_keys = ON"));
    }
}
