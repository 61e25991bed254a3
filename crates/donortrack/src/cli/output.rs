//! Plain-text rendering of records for the terminal.

use crate::controller::LoadedDonor;
use crate::model::{Donation, Donor, Organization, DATE_FORMAT};
use crate::navigation::NavigationState;

/// One line per donor: id, name and email.
#[must_use]
pub fn donor_summary(donor: &Donor) -> String {
    format!(
        "{:>5}  {:<30}  {}",
        donor.id,
        donor.fields.full_name(),
        donor.fields.email
    )
}

/// One line per donation: id, date, amount and payment method.
#[must_use]
pub fn donation_line(donation: &Donation) -> String {
    let amount = format!("${:.2}", donation.fields.amount);
    format!(
        "{:>5}  {}  {:>14}  {}",
        donation.id,
        donation.fields.date.format(DATE_FORMAT),
        amount,
        donation.fields.payment_method
    )
}

/// The full record of a donor followed by its donations.
#[must_use]
pub fn donor_details(loaded: &LoadedDonor) -> String {
    let donor = &loaded.donor;
    let mut lines = vec![format!("Donor #{}", donor.id)];
    lines.extend(donor.fields.mailing_lines().map(|line| format!("  {line}")));
    lines.push(format!("  Phone: {}", donor.fields.phone));
    lines.push(format!("  Email: {}", donor.fields.email));
    lines.push(String::new());

    if loaded.donations.is_empty() {
        lines.push("No donations recorded.".to_string());
    } else {
        lines.push(format!("Donations ({}):", loaded.donations.len()));
        lines.extend(loaded.donations.iter().map(donation_line));
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

/// The organization block, or a hint that it is unset.
#[must_use]
pub fn organization_details(org: Option<&Organization>) -> String {
    match org {
        Some(org) => format!("Name:    {}\nAddress: {}\n", org.name, org.address),
        None => "Organization details are not set. Use `donortrack org set`.\n".to_string(),
    }
}

/// The browse key legend with unavailable moves shown as `-`.
#[must_use]
pub fn navigation_line(state: NavigationState) -> String {
    let key = |enabled: bool, label: &str| {
        if enabled {
            label.to_string()
        } else {
            "-".repeat(label.len())
        }
    };
    format!(
        "{} {} {} {}  g <id>  q",
        key(state.first, "[f]irst"),
        key(state.previous, "[p]rev"),
        key(state.next, "[n]ext"),
        key(state.last, "[l]ast"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DonationFields, DonorFields};
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    fn donor() -> Donor {
        Donor {
            id: 4,
            fields: DonorFields {
                first_name: "Jane".to_string(),
                last_name: "Doe".to_string(),
                street: "1 Main St".to_string(),
                city: "Springfield".to_string(),
                state: "IL".to_string(),
                zip: "62701".to_string(),
                country: "USA".to_string(),
                phone: "555-0100".to_string(),
                email: "jane@example.com".to_string(),
            },
        }
    }

    fn donation() -> Donation {
        Donation {
            id: 9,
            fields: DonationFields {
                donor_id: 4,
                amount: Decimal::new(15050, 2),
                date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
                payment_method: "check".to_string(),
            },
        }
    }

    #[test]
    fn test_donor_summary() {
        let line = donor_summary(&donor());
        assert!(line.starts_with("    4  Jane Doe"));
        assert!(line.ends_with("jane@example.com"));
    }

    #[test]
    fn test_donation_line() {
        let line = donation_line(&donation());
        assert!(line.contains("2024-03-01"));
        assert!(line.contains("$150.50"));
        assert!(line.ends_with("check"));
    }

    #[test]
    fn test_donor_details() {
        let mut loaded = LoadedDonor {
            donor: donor(),
            donations: Vec::new(),
        };
        let text = donor_details(&loaded);
        assert!(text.contains("Springfield, IL 62701"));
        assert!(text.contains("No donations recorded."));

        loaded.donations.push(donation());
        let text = donor_details(&loaded);
        assert!(text.contains("Donations (1):"));
        assert!(text.contains("$150.50"));
    }

    #[test]
    fn test_donor_details_layout() {
        let loaded = LoadedDonor {
            donor: donor(),
            donations: vec![donation()],
        };
        let expected = concat!(
            "Donor #4\n",
            "  Jane Doe\n",
            "  1 Main St\n",
            "  Springfield, IL 62701\n",
            "  USA\n",
            "  Phone: 555-0100\n",
            "  Email: jane@example.com\n",
            "\n",
            "Donations (1):\n",
            "    9  2024-03-01         $150.50  check\n",
        );
        assert_eq!(donor_details(&loaded), expected);
    }

    #[test]
    fn test_organization_details() {
        assert!(organization_details(None).contains("not set"));

        let org = Organization {
            name: "Helping Hands".to_string(),
            address: "9 Charity Rd".to_string(),
        };
        assert!(organization_details(Some(&org)).contains("Helping Hands"));
    }

    #[test]
    fn test_navigation_line() {
        let state = NavigationState {
            first: false,
            previous: false,
            next: true,
            last: true,
        };
        assert_eq!(
            navigation_line(state),
            "------- ------ [n]ext [l]ast  g <id>  q"
        );
    }
}
