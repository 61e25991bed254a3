//! Storage layer for donortrack.
//!
//! This module provides `SQLite`-based persistent storage for donors, their
//! donations and the organization record, plus the yearly aggregation used
//! by letter generation.

pub mod migrations;
pub mod schema;

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::model::{
    amount_to_cents, cents_to_amount, AnnualTotal, Donation, DonationFields, Donor, DonorFields,
    Organization, DATE_FORMAT,
};

use schema::{CONNECTION_PRAGMAS, ORGANIZATION_ID};

/// Column list shared by every donor query; `row_to_donor` depends on the order.
const DONOR_COLUMNS: &str =
    "id, first_name, last_name, street, city, state, zip, country, phone, email";

/// Column list shared by every donation query; `row_to_donation` depends on the order.
const DONATION_COLUMNS: &str = "id, donor_id, amount_cents, date, payment_method";

/// Storage engine for donor records.
///
/// Owns the single database connection. All statements bind their
/// parameters, so names and addresses may contain any characters.
#[derive(Debug)]
pub struct Storage {
    /// Path to the database file.
    path: PathBuf,
    /// Database connection.
    conn: Connection,
}

impl Storage {
    /// Open or create a storage database at the given path.
    ///
    /// Creates the parent directories and database file if they don't exist,
    /// and initializes the schema if this is a new database.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or schema initialization fails.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        debug!("Opening database at {}", path.display());
        let conn = Connection::open(&path).map_err(|source| Error::DatabaseOpen {
            path: path.clone(),
            source,
        })?;

        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")?;
        conn.execute_batch(CONNECTION_PRAGMAS)?;
        migrations::initialize_schema(&conn)?;

        info!("Database opened at {}", path.display());
        Ok(Self { path, conn })
    }

    /// Create an in-memory storage instance for testing.
    ///
    /// # Errors
    ///
    /// Returns an error if the in-memory database cannot be created.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|source| Error::DatabaseOpen {
            path: PathBuf::from(":memory:"),
            source,
        })?;

        conn.execute_batch(CONNECTION_PRAGMAS)?;
        migrations::initialize_schema(&conn)?;

        Ok(Self {
            path: PathBuf::from(":memory:"),
            conn,
        })
    }

    /// Get the path to the database file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    // === Donors ===

    /// Insert a donor and return the assigned id.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn add_donor(&self, donor: &DonorFields) -> Result<i64> {
        self.conn.execute(
            r"
            INSERT INTO donors (first_name, last_name, street, city, state, zip, country, phone, email)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            ",
            params![
                donor.first_name,
                donor.last_name,
                donor.street,
                donor.city,
                donor.state,
                donor.zip,
                donor.country,
                donor.phone,
                donor.email,
            ],
        )?;

        let id = self.conn.last_insert_rowid();
        info!(donor_id = id, "Added donor");
        Ok(id)
    }

    /// Replace every field of an existing donor.
    ///
    /// Returns `false` if no donor has that id.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn update_donor(&self, id: i64, donor: &DonorFields) -> Result<bool> {
        let affected = self.conn.execute(
            r"
            UPDATE donors
            SET first_name = ?1, last_name = ?2, street = ?3, city = ?4, state = ?5,
                zip = ?6, country = ?7, phone = ?8, email = ?9
            WHERE id = ?10
            ",
            params![
                donor.first_name,
                donor.last_name,
                donor.street,
                donor.city,
                donor.state,
                donor.zip,
                donor.country,
                donor.phone,
                donor.email,
                id,
            ],
        )?;

        if affected > 0 {
            info!(donor_id = id, "Updated donor");
        }
        Ok(affected > 0)
    }

    /// Delete a donor together with all of its donations.
    ///
    /// Returns `false` if no donor has that id.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn delete_donor(&self, id: i64) -> Result<bool> {
        let affected = self.conn.execute("DELETE FROM donors WHERE id = ?1", [id])?;
        if affected > 0 {
            info!(donor_id = id, "Deleted donor and its donations");
        }
        Ok(affected > 0)
    }

    /// Get a donor by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn get_donor(&self, id: i64) -> Result<Option<Donor>> {
        let donor = self
            .conn
            .query_row(
                &format!("SELECT {DONOR_COLUMNS} FROM donors WHERE id = ?1"),
                [id],
                Self::row_to_donor,
            )
            .optional()?;
        Ok(donor)
    }

    /// All donor ids in ascending order.
    ///
    /// This is the navigation order and is independent of display ordering.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn all_donor_ids(&self) -> Result<Vec<i64>> {
        let mut stmt = self.conn.prepare("SELECT id FROM donors ORDER BY id")?;
        let ids = stmt
            .query_map([], |row| row.get(0))?
            .collect::<std::result::Result<Vec<i64>, _>>()?;
        Ok(ids)
    }

    /// Search donors.
    ///
    /// With `include_all` set, or a blank `term`, every donor is returned
    /// ordered by first then last name. Otherwise returns the donors whose
    /// first name, last name, email, phone, city, state, zip or country
    /// contains `term`, ignoring case.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn search_donors(&self, term: &str, include_all: bool) -> Result<Vec<Donor>> {
        let term = term.trim();
        if include_all || term.is_empty() {
            let mut stmt = self.conn.prepare(&format!(
                "SELECT {DONOR_COLUMNS} FROM donors ORDER BY first_name, last_name, id"
            ))?;
            let donors = stmt
                .query_map([], Self::row_to_donor)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            return Ok(donors);
        }

        let needle = term.to_lowercase();
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {DONOR_COLUMNS} FROM donors ORDER BY id"))?;
        let mut donors = Vec::new();
        for donor in stmt.query_map([], Self::row_to_donor)? {
            let donor = donor?;
            if donor_matches(&donor.fields, &needle) {
                donors.push(donor);
            }
        }

        debug!(term, matches = donors.len(), "Searched donors");
        Ok(donors)
    }

    // === Donations ===

    /// Insert a donation and return the assigned id.
    ///
    /// # Errors
    ///
    /// Returns an error if the amount cannot be stored, if the donor does
    /// not exist, or if the database operation fails.
    pub fn add_donation(&self, donation: &DonationFields) -> Result<i64> {
        let cents = amount_to_cents(donation.amount)?;
        self.conn.execute(
            r"
            INSERT INTO donations (donor_id, amount_cents, date, payment_method)
            VALUES (?1, ?2, ?3, ?4)
            ",
            params![
                donation.donor_id,
                cents,
                donation.date.format(DATE_FORMAT).to_string(),
                donation.payment_method,
            ],
        )?;

        let id = self.conn.last_insert_rowid();
        info!(donation_id = id, donor_id = donation.donor_id, "Added donation");
        Ok(id)
    }

    /// Replace every field of an existing donation.
    ///
    /// Returns `false` if no donation has that id.
    ///
    /// # Errors
    ///
    /// Returns an error if the amount cannot be stored, if the new donor
    /// does not exist, or if the database operation fails.
    pub fn update_donation(&self, id: i64, donation: &DonationFields) -> Result<bool> {
        let cents = amount_to_cents(donation.amount)?;
        let affected = self.conn.execute(
            r"
            UPDATE donations
            SET donor_id = ?1, amount_cents = ?2, date = ?3, payment_method = ?4
            WHERE id = ?5
            ",
            params![
                donation.donor_id,
                cents,
                donation.date.format(DATE_FORMAT).to_string(),
                donation.payment_method,
                id,
            ],
        )?;

        if affected > 0 {
            info!(donation_id = id, "Updated donation");
        }
        Ok(affected > 0)
    }

    /// Delete a donation.
    ///
    /// Returns `false` if no donation has that id.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn delete_donation(&self, id: i64) -> Result<bool> {
        let affected = self
            .conn
            .execute("DELETE FROM donations WHERE id = ?1", [id])?;
        if affected > 0 {
            info!(donation_id = id, "Deleted donation");
        }
        Ok(affected > 0)
    }

    /// Get a donation by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn get_donation(&self, id: i64) -> Result<Option<Donation>> {
        let donation = self
            .conn
            .query_row(
                &format!("SELECT {DONATION_COLUMNS} FROM donations WHERE id = ?1"),
                [id],
                Self::row_to_donation,
            )
            .optional()?;
        Ok(donation)
    }

    /// All donations of a donor, newest first.
    ///
    /// Dates are compared as `YYYY-MM-DD` strings, which sort chronologically
    /// because the format is fixed-width.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn donations_for_donor(&self, donor_id: i64) -> Result<Vec<Donation>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {DONATION_COLUMNS} FROM donations WHERE donor_id = ?1 ORDER BY date DESC, id DESC"
        ))?;
        let donations = stmt
            .query_map([donor_id], Self::row_to_donation)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(donations)
    }

    /// Per-donor donation totals for a calendar year.
    ///
    /// Only donors with at least one donation dated in `year` appear.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn annual_totals(&self, year: i32) -> Result<Vec<AnnualTotal>> {
        let mut stmt = self.conn.prepare(
            r"
            SELECT d.id, d.first_name, d.last_name, d.street, d.city, d.state, d.zip,
                   d.country, d.phone, d.email, SUM(n.amount_cents)
            FROM donors d
            JOIN donations n ON d.id = n.donor_id
            WHERE SUBSTR(n.date, 1, 4) = ?1
            GROUP BY d.id
            ORDER BY d.id
            ",
        )?;

        let totals = stmt
            .query_map([format!("{year:04}")], |row| {
                let donor = Self::row_to_donor(row)?;
                let cents: i64 = row.get(10)?;
                Ok(AnnualTotal {
                    donor,
                    total: cents_to_amount(cents),
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        debug!(year, donors = totals.len(), "Computed annual totals");
        Ok(totals)
    }

    // === Organization ===

    /// The organization record, if it has been set.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn organization(&self) -> Result<Option<Organization>> {
        let org = self
            .conn
            .query_row(
                "SELECT name, address FROM organization WHERE id = ?1",
                [ORGANIZATION_ID],
                |row| {
                    Ok(Organization {
                        name: row.get(0)?,
                        address: row.get(1)?,
                    })
                },
            )
            .optional()?;
        Ok(org)
    }

    /// Insert or replace the organization record.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn set_organization(&self, org: &Organization) -> Result<()> {
        self.conn.execute(
            r"
            INSERT INTO organization (id, name, address) VALUES (?1, ?2, ?3)
            ON CONFLICT(id) DO UPDATE SET name = excluded.name, address = excluded.address
            ",
            params![ORGANIZATION_ID, org.name, org.address],
        )?;
        info!("Saved organization details");
        Ok(())
    }

    // === Statistics ===

    /// Get database statistics.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn stats(&self) -> Result<StorageStats> {
        let donors: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM donors", [], |row| row.get(0))?;
        let donations: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM donations", [], |row| row.get(0))?;
        let organization_set = self.organization()?.is_some();

        let db_size_bytes = if self.path.to_string_lossy() == ":memory:" {
            0
        } else {
            std::fs::metadata(&self.path).map(|m| m.len()).unwrap_or(0)
        };

        Ok(StorageStats {
            donors,
            donations,
            organization_set,
            db_size_bytes,
        })
    }

    fn row_to_donor(row: &Row) -> rusqlite::Result<Donor> {
        Ok(Donor {
            id: row.get(0)?,
            fields: DonorFields {
                first_name: row.get(1)?,
                last_name: row.get(2)?,
                street: row.get(3)?,
                city: row.get(4)?,
                state: row.get(5)?,
                zip: row.get(6)?,
                country: row.get(7)?,
                phone: row.get(8)?,
                email: row.get(9)?,
            },
        })
    }

    fn row_to_donation(row: &Row) -> rusqlite::Result<Donation> {
        let date_str: String = row.get(3)?;
        let date = NaiveDate::parse_from_str(&date_str, DATE_FORMAT)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(3, Type::Text, Box::new(e)))?;
        let cents: i64 = row.get(2)?;

        Ok(Donation {
            id: row.get(0)?,
            fields: DonationFields {
                donor_id: row.get(1)?,
                amount: cents_to_amount(cents),
                date,
                payment_method: row.get(4)?,
            },
        })
    }
}

/// Whether any searchable field contains `needle`, which must already be
/// lowercased. SQLite's `LOWER()` folds ASCII only, so folding stays in Rust.
fn donor_matches(fields: &DonorFields, needle: &str) -> bool {
    [
        &fields.first_name,
        &fields.last_name,
        &fields.email,
        &fields.phone,
        &fields.city,
        &fields.state,
        &fields.zip,
        &fields.country,
    ]
    .iter()
    .any(|value| value.to_lowercase().contains(needle))
}

/// Statistics about the storage.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct StorageStats {
    /// Number of donors.
    pub donors: i64,
    /// Number of donations.
    pub donations: i64,
    /// Whether the organization record exists.
    pub organization_set: bool,
    /// Size of the database file in bytes.
    pub db_size_bytes: u64,
}
