//! Core record types for donortrack.
//!
//! Each stored record is split into an id and a field bundle: the bundle is
//! what forms produce and what add/update operations consume, the id is
//! assigned by the store.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Date format used for donation dates at rest and on input.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Contact details for a donor, without the id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DonorFields {
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

impl DonorFields {
    /// "First Last".
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// The mailing block printed on letters, one line per entry.
    #[must_use]
    pub fn mailing_lines(&self) -> [String; 4] {
        [
            self.full_name(),
            self.street.clone(),
            format!("{}, {} {}", self.city, self.state, self.zip),
            self.country.clone(),
        ]
    }
}

/// A stored donor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Donor {
    /// Identifier assigned by the store.
    pub id: i64,
    /// Contact details.
    #[serde(flatten)]
    pub fields: DonorFields,
}

/// The editable part of a donation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DonationFields {
    /// Owning donor.
    pub donor_id: i64,
    /// Amount in the organization's currency.
    pub amount: Decimal,
    /// Calendar date of the gift.
    pub date: NaiveDate,
    /// Free-text payment method ("check", "cash", ...).
    pub payment_method: String,
}

/// A stored donation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Donation {
    /// Identifier assigned by the store.
    pub id: i64,
    /// Donation details.
    #[serde(flatten)]
    pub fields: DonationFields,
}

/// The nonprofit itself, as printed on letters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organization {
    /// Organization name.
    pub name: String,
    /// Single-line postal address.
    pub address: String,
}

/// One donor's summed giving for a year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnnualTotal {
    /// The donor the total belongs to.
    pub donor: Donor,
    /// Sum of the donor's donations dated in the year.
    pub total: Decimal,
}

/// Convert an amount to whole cents for storage.
///
/// Amounts with more than two decimals are rounded to the cent.
///
/// # Errors
///
/// Returns [`Error::InvalidAmount`] if the value does not fit in an `i64`
/// number of cents.
pub fn amount_to_cents(amount: Decimal) -> Result<i64> {
    let mut rounded = amount.round_dp(2);
    rounded.rescale(2);
    i64::try_from(rounded.mantissa()).map_err(|_| Error::InvalidAmount {
        amount: amount.to_string(),
    })
}

/// Convert stored cents back to an amount with two decimals.
#[must_use]
pub fn cents_to_amount(cents: i64) -> Decimal {
    Decimal::new(cents, 2)
}
