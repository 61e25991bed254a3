//! Year-end thank-you letters.
//!
//! One plain-text letter is written per donor who gave at least once in the
//! requested year, stating the exact total of that year's donations.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::model::{DonorFields, Organization};
use crate::storage::Storage;

/// Format of the date line at the top of each letter.
const LETTER_DATE_FORMAT: &str = "%B %-d, %Y";

/// Writes letters into one output directory.
#[derive(Debug, Clone)]
pub struct LetterGenerator {
    output_dir: PathBuf,
}

/// A letter that could not be written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LetterFailure {
    /// Donor the letter was for.
    pub donor_id: i64,
    /// Where the letter should have gone.
    pub path: PathBuf,
    /// The I/O error text.
    pub message: String,
}

/// Outcome of a generation run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LetterReport {
    /// The year letters were generated for.
    pub year: i32,
    /// Letters written, in donor id order.
    pub written: Vec<PathBuf>,
    /// Letters that failed; the rest of the run carried on.
    pub failures: Vec<LetterFailure>,
}

impl LetterReport {
    /// True when every qualifying donor got a letter.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

impl LetterGenerator {
    /// Create a generator writing into `output_dir`.
    #[must_use]
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// The directory letters are written to.
    #[must_use]
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Write a letter for every donor with donations dated in `year`.
    ///
    /// A failed write is recorded in the report and does not stop the
    /// remaining letters. `today` is printed as the letter date.
    ///
    /// # Errors
    ///
    /// Returns an error if the output directory cannot be created or the
    /// donation totals cannot be read.
    pub fn generate(&self, storage: &Storage, year: i32, today: NaiveDate) -> Result<LetterReport> {
        std::fs::create_dir_all(&self.output_dir).map_err(|source| Error::DirectoryCreate {
            path: self.output_dir.clone(),
            source,
        })?;

        let org = storage.organization()?.unwrap_or_else(|| {
            warn!("Organization details are not set; letters will have a blank letterhead");
            Organization::default()
        });

        let mut report = LetterReport {
            year,
            ..LetterReport::default()
        };

        for total in storage.annual_totals(year)? {
            let donor = &total.donor;
            let path = self
                .output_dir
                .join(letter_file_name(&donor.fields.first_name, &donor.fields.last_name, year));
            let letter = render_letter(&org, &donor.fields, total.total, year, today);

            match std::fs::write(&path, letter) {
                Ok(()) => report.written.push(path),
                Err(e) => {
                    warn!(donor_id = donor.id, path = %path.display(), "Could not write letter: {e}");
                    report.failures.push(LetterFailure {
                        donor_id: donor.id,
                        path,
                        message: e.to_string(),
                    });
                }
            }
        }

        info!(
            year,
            written = report.written.len(),
            failed = report.failures.len(),
            "Generated donation letters in {}",
            self.output_dir.display()
        );
        Ok(report)
    }
}

/// `<first>_<last>_<year>_donation_letter.txt`, with path separators replaced.
#[must_use]
pub fn letter_file_name(first_name: &str, last_name: &str, year: i32) -> String {
    let clean = |s: &str| s.replace(['/', '\\'], "_");
    format!(
        "{}_{}_{year}_donation_letter.txt",
        clean(first_name),
        clean(last_name)
    )
}

/// Render the text of one letter.
#[must_use]
pub fn render_letter(
    org: &Organization,
    donor: &DonorFields,
    total: Decimal,
    year: i32,
    today: NaiveDate,
) -> String {
    let [name, street, city_line, country] = donor.mailing_lines();
    let lines = [
        org.name.clone(),
        org.address.clone(),
        String::new(),
        today.format(LETTER_DATE_FORMAT).to_string(),
        String::new(),
        name,
        street,
        city_line,
        country,
        String::new(),
        format!("Dear {},", donor.first_name),
        String::new(),
        format!(
            "Thank you for your generous total donation of ${total:.2} to {} in {year}.",
            org.name
        ),
        "Your support makes a significant difference to our mission.".to_string(),
        String::new(),
        "Sincerely,".to_string(),
        org.name.clone(),
    ];

    let mut letter = lines.join("\n");
    letter.push('\n');
    letter
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DonationFields;
    use std::str::FromStr;

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "donortrack_letters_{}_{name}",
            std::process::id()
        ));
        let _ = std::fs::remove_dir_all(&dir);
        dir
    }

    fn donor(first: &str, last: &str) -> DonorFields {
        DonorFields {
            first_name: first.to_string(),
            last_name: last.to_string(),
            street: "1 Main St".to_string(),
            city: "Springfield".to_string(),
            state: "IL".to_string(),
            zip: "62701".to_string(),
            country: "USA".to_string(),
            phone: "555-0100".to_string(),
            email: "donor@example.com".to_string(),
        }
    }

    fn give(storage: &Storage, donor_id: i64, amount: &str, date: &str) {
        storage
            .add_donation(&DonationFields {
                donor_id,
                amount: Decimal::from_str(amount).unwrap(),
                date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
                payment_method: "check".to_string(),
            })
            .unwrap();
    }

    fn org() -> Organization {
        Organization {
            name: "Helping Hands".to_string(),
            address: "9 Charity Rd, Town, ST 00001, USA".to_string(),
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 5).unwrap()
    }

    #[test]
    fn test_letter_file_name() {
        assert_eq!(
            letter_file_name("Jane", "Doe", 2024),
            "Jane_Doe_2024_donation_letter.txt"
        );
        assert_eq!(
            letter_file_name("A/B", "..\\C", 2024),
            "A_B_.._C_2024_donation_letter.txt"
        );
    }

    #[test]
    fn test_render_letter() {
        let letter = render_letter(
            &org(),
            &donor("Jane", "Doe"),
            Decimal::from_str("150.5").unwrap(),
            2024,
            today(),
        );

        let expected = "Helping Hands\n\
            9 Charity Rd, Town, ST 00001, USA\n\
            \n\
            January 5, 2025\n\
            \n\
            Jane Doe\n\
            1 Main St\n\
            Springfield, IL 62701\n\
            USA\n\
            \n\
            Dear Jane,\n\
            \n\
            Thank you for your generous total donation of $150.50 to Helping Hands in 2024.\n\
            Your support makes a significant difference to our mission.\n\
            \n\
            Sincerely,\n\
            Helping Hands\n";
        assert_eq!(letter, expected);
    }

    #[test]
    fn test_generate_one_letter_per_giving_donor() {
        let storage = Storage::open_in_memory().unwrap();
        storage.set_organization(&org()).unwrap();
        let jane = storage.add_donor(&donor("Jane", "Doe")).unwrap();
        let john = storage.add_donor(&donor("John", "Roe")).unwrap();
        storage.add_donor(&donor("Idle", "Person")).unwrap();

        give(&storage, jane, "100.00", "2024-03-01");
        give(&storage, jane, "50.50", "2024-11-20");
        give(&storage, jane, "75.00", "2023-12-31");
        give(&storage, john, "75.00", "2023-12-31");

        let dir = temp_dir("one_per_donor");
        let report = LetterGenerator::new(&dir)
            .generate(&storage, 2024, today())
            .unwrap();

        assert!(report.is_complete());
        assert_eq!(report.year, 2024);
        assert_eq!(report.written, vec![dir.join("Jane_Doe_2024_donation_letter.txt")]);

        let text = std::fs::read_to_string(&report.written[0]).unwrap();
        assert!(text.contains("total donation of $150.50 to Helping Hands in 2024."));
        assert!(!dir.join("John_Roe_2024_donation_letter.txt").exists());
        assert!(!dir.join("Idle_Person_2024_donation_letter.txt").exists());

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_generate_no_donations_in_year() {
        let storage = Storage::open_in_memory().unwrap();
        let jane = storage.add_donor(&donor("Jane", "Doe")).unwrap();
        give(&storage, jane, "10", "2022-06-01");

        let dir = temp_dir("empty_year");
        let report = LetterGenerator::new(&dir)
            .generate(&storage, 2024, today())
            .unwrap();

        assert!(report.is_complete());
        assert!(report.written.is_empty());
        assert!(dir.is_dir());

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_generate_without_organization() {
        let storage = Storage::open_in_memory().unwrap();
        let jane = storage.add_donor(&donor("Jane", "Doe")).unwrap();
        give(&storage, jane, "10", "2024-06-01");

        let dir = temp_dir("no_org");
        let report = LetterGenerator::new(&dir)
            .generate(&storage, 2024, today())
            .unwrap();

        let text = std::fs::read_to_string(&report.written[0]).unwrap();
        assert!(text.starts_with("\n\n\nJanuary 5, 2025"));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_same_name_donors_share_a_file() {
        let storage = Storage::open_in_memory().unwrap();
        let first = storage.add_donor(&donor("Jane", "Doe")).unwrap();
        let second = storage.add_donor(&donor("Jane", "Doe")).unwrap();
        give(&storage, first, "10", "2024-01-01");
        give(&storage, second, "20", "2024-01-01");

        let dir = temp_dir("same_name");
        let report = LetterGenerator::new(&dir)
            .generate(&storage, 2024, today())
            .unwrap();

        assert_eq!(report.written.len(), 2);
        assert_eq!(report.written[0], report.written[1]);
        let text = std::fs::read_to_string(&report.written[0]).unwrap();
        assert!(text.contains("$20.00"));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_write_failure_is_reported_and_run_continues() {
        let storage = Storage::open_in_memory().unwrap();
        let jane = storage.add_donor(&donor("Jane", "Doe")).unwrap();
        let john = storage.add_donor(&donor("John", "Roe")).unwrap();
        give(&storage, jane, "10", "2024-01-01");
        give(&storage, john, "20", "2024-01-01");

        let dir = temp_dir("failure");
        // A directory where Jane's letter should go makes that write fail.
        std::fs::create_dir_all(dir.join("Jane_Doe_2024_donation_letter.txt")).unwrap();

        let report = LetterGenerator::new(&dir)
            .generate(&storage, 2024, today())
            .unwrap();

        assert!(!report.is_complete());
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].donor_id, jane);
        assert_eq!(
            report.failures[0].path,
            dir.join("Jane_Doe_2024_donation_letter.txt")
        );
        assert!(!report.failures[0].message.is_empty());
        assert_eq!(report.written, vec![dir.join("John_Roe_2024_donation_letter.txt")]);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_output_dir_creation_failure() {
        let storage = Storage::open_in_memory().unwrap();
        let blocker = temp_dir("blocker");
        std::fs::write(&blocker, "not a directory").unwrap();

        let result = LetterGenerator::new(blocker.join("letters")).generate(&storage, 2024, today());
        assert!(matches!(result, Err(Error::DirectoryCreate { .. })));

        let _ = std::fs::remove_file(&blocker);
    }
}
