//! Record editors.
//!
//! A form holds raw user input for one record. [`Form::validate`] checks it
//! and produces the typed field bundle the store accepts; nothing reaches the
//! store without passing through here.

use std::str::FromStr;
use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::{Donation, DonationFields, Donor, DonorFields, Organization, DATE_FORMAT};

/// Largest amount a single donation may record.
pub const MAX_DONATION_AMOUNT: Decimal = Decimal::from_parts(1_000_000_000, 0, 0, false, 2);

/// A validatable form producing a typed field bundle.
pub trait Form {
    /// The validated bundle.
    type Output;

    /// Check every field and build the bundle.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] naming the first offending field.
    fn validate(&self) -> Result<Self::Output>;
}

/// Trimmed value of a field that must not be blank.
fn required(field: &'static str, value: &str) -> Result<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(Error::validation(field, "is required"));
    }
    Ok(value.to_string())
}

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| {
        Regex::new(r"(?i)\b[A-Z0-9._%+-]+@[A-Z0-9.-]+\.[A-Z]{2,4}\b").expect("valid email regex")
    })
}

/// Input for adding or editing a donor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DonorForm {
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Street address line.
    pub street: String,
    /// City.
    pub city: String,
    /// State or province.
    pub state: String,
    /// Postal code.
    pub zip: String,
    /// Country.
    pub country: String,
    /// Phone number.
    pub phone: String,
    /// Email address.
    pub email: String,
}

impl From<&Donor> for DonorForm {
    fn from(donor: &Donor) -> Self {
        let f = &donor.fields;
        Self {
            first_name: f.first_name.clone(),
            last_name: f.last_name.clone(),
            street: f.street.clone(),
            city: f.city.clone(),
            state: f.state.clone(),
            zip: f.zip.clone(),
            country: f.country.clone(),
            phone: f.phone.clone(),
            email: f.email.clone(),
        }
    }
}

impl Form for DonorForm {
    type Output = DonorFields;

    fn validate(&self) -> Result<DonorFields> {
        let fields = DonorFields {
            first_name: required("first name", &self.first_name)?,
            last_name: required("last name", &self.last_name)?,
            street: required("street", &self.street)?,
            city: required("city", &self.city)?,
            state: required("state", &self.state)?,
            zip: required("zip", &self.zip)?,
            country: required("country", &self.country)?,
            phone: required("phone", &self.phone)?,
            email: required("email", &self.email)?,
        };

        if !email_regex().is_match(&fields.email) {
            return Err(Error::validation("email", "not a valid email address"));
        }
        Ok(fields)
    }
}

/// Input for adding or editing a donation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DonationForm {
    /// Owning donor id, as typed.
    pub donor_id: String,
    /// Amount, e.g. `123.45`.
    pub amount: String,
    /// Date as `YYYY-MM-DD`.
    pub date: String,
    /// Payment method.
    pub payment_method: String,
}

impl DonationForm {
    /// An empty form pre-filled with the owning donor.
    #[must_use]
    pub fn for_donor(donor_id: i64) -> Self {
        Self {
            donor_id: donor_id.to_string(),
            ..Self::default()
        }
    }
}

impl From<&Donation> for DonationForm {
    fn from(donation: &Donation) -> Self {
        let f = &donation.fields;
        Self {
            donor_id: f.donor_id.to_string(),
            amount: format!("{:.2}", f.amount),
            date: f.date.format(DATE_FORMAT).to_string(),
            payment_method: f.payment_method.clone(),
        }
    }
}

impl Form for DonationForm {
    type Output = DonationFields;

    fn validate(&self) -> Result<DonationFields> {
        let donor_id = required("donor id", &self.donor_id)?;
        let amount = required("amount", &self.amount)?;
        let date = required("date", &self.date)?;
        let payment_method = required("payment method", &self.payment_method)?;

        let donor_id = donor_id
            .parse::<i64>()
            .map_err(|_| Error::validation("donor id", format!("'{donor_id}' is not a number")))?;

        Ok(DonationFields {
            donor_id,
            amount: parse_amount(&amount)?,
            date: NaiveDate::parse_from_str(&date, DATE_FORMAT).map_err(|_| {
                Error::validation("date", format!("'{date}' is not a YYYY-MM-DD date"))
            })?,
            payment_method,
        })
    }
}

/// Parse an amount such as `123.45` or `$10`.
///
/// Accepts at most two decimal places, within `(0, MAX_DONATION_AMOUNT]`.
fn parse_amount(raw: &str) -> Result<Decimal> {
    let digits = raw.strip_prefix('$').unwrap_or(raw).trim();
    let invalid = || {
        Error::validation(
            "amount",
            format!("'{raw}' is not a valid amount (e.g., 123.45)"),
        )
    };

    let amount = Decimal::from_str(digits).map_err(|_| invalid())?;
    if amount.scale() > 2 {
        return Err(invalid());
    }
    if amount <= Decimal::ZERO || amount > MAX_DONATION_AMOUNT {
        return Err(Error::validation(
            "amount",
            format!("must be between 0.01 and {MAX_DONATION_AMOUNT}"),
        ));
    }
    Ok(amount)
}

/// Input for the organization record.
///
/// The address is entered in parts and stored as one line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizationForm {
    /// Organization name.
    pub name: String,
    /// Street address line.
    pub street: String,
    /// City.
    pub city: String,
    /// State or province.
    pub state: String,
    /// Postal code.
    pub zip: String,
    /// Country.
    pub country: String,
}

impl OrganizationForm {
    /// Pre-fill a form from a stored record.
    ///
    /// A `"street, city, state zip, country"` address is split back into its
    /// parts; anything else lands whole in `street`.
    #[must_use]
    pub fn from_organization(org: &Organization) -> Self {
        let mut form = Self {
            name: org.name.clone(),
            ..Self::default()
        };

        let parts: Vec<&str> = org
            .address
            .split(", ")
            .filter(|p| !p.is_empty())
            .collect();
        if parts.len() >= 4 {
            form.street = parts[0].to_string();
            form.city = parts[1].to_string();
            let state_zip: Vec<&str> = parts[2].split_whitespace().collect();
            if let [state, zip] = state_zip.as_slice() {
                form.state = (*state).to_string();
                form.zip = (*zip).to_string();
            } else {
                form.state = parts[2].to_string();
            }
            form.country = parts[3].to_string();
        } else {
            form.street = org.address.clone();
        }
        form
    }
}

impl Form for OrganizationForm {
    type Output = Organization;

    fn validate(&self) -> Result<Organization> {
        let name = required("name", &self.name)?;
        let street = required("street", &self.street)?;
        let city = required("city", &self.city)?;
        let state = required("state", &self.state)?;
        let zip = required("zip", &self.zip)?;
        let country = required("country", &self.country)?;

        Ok(Organization {
            name,
            address: format!("{street}, {city}, {state} {zip}, {country}"),
        })
    }
}

/// Check a letter year against the accepted input range.
///
/// # Errors
///
/// Returns [`Error::Validation`] when `year` is outside `[earliest, latest]`.
pub fn validate_letter_year(year: i32, earliest: i32, latest: i32) -> Result<i32> {
    if (earliest..=latest).contains(&year) {
        Ok(year)
    } else {
        Err(Error::validation(
            "year",
            format!("{year} is outside {earliest}..={latest}"),
        ))
    }
}
