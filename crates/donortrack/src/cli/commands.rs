//! CLI command definitions.
//!
//! Record commands take each field as an optional flag. On `add` the flags
//! fill an empty form; on `edit` they override the stored values, so only
//! the fields being changed need to be given.

use std::path::PathBuf;

use clap::{Args, Subcommand};

use crate::forms::{DonationForm, DonorForm, OrganizationForm};

/// Donor commands.
#[derive(Debug, Subcommand)]
pub enum DonorCommand {
    /// Add a donor (every field is required)
    Add(DonorFieldArgs),

    /// Change fields of an existing donor
    Edit {
        /// Donor id
        id: i64,

        #[command(flatten)]
        fields: DonorFieldArgs,
    },

    /// Delete a donor and all of its donations
    Delete {
        /// Donor id
        id: i64,

        /// Confirm the deletion
        #[arg(short, long)]
        yes: bool,
    },

    /// Show a donor and its donations
    Show {
        /// Donor id
        id: i64,

        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },
}

/// Donor fields as command-line flags.
#[derive(Debug, Clone, Default, Args)]
pub struct DonorFieldArgs {
    /// Given name
    #[arg(long)]
    pub first_name: Option<String>,
    /// Family name
    #[arg(long)]
    pub last_name: Option<String>,
    /// Street address
    #[arg(long)]
    pub street: Option<String>,
    /// City
    #[arg(long)]
    pub city: Option<String>,
    /// State or province
    #[arg(long)]
    pub state: Option<String>,
    /// Postal code
    #[arg(long)]
    pub zip: Option<String>,
    /// Country
    #[arg(long)]
    pub country: Option<String>,
    /// Phone number
    #[arg(long)]
    pub phone: Option<String>,
    /// Email address
    #[arg(long)]
    pub email: Option<String>,
}

impl DonorFieldArgs {
    /// Overwrite the form fields that were given on the command line.
    pub fn apply_to(&self, form: &mut DonorForm) {
        let targets = [
            (&self.first_name, &mut form.first_name),
            (&self.last_name, &mut form.last_name),
            (&self.street, &mut form.street),
            (&self.city, &mut form.city),
            (&self.state, &mut form.state),
            (&self.zip, &mut form.zip),
            (&self.country, &mut form.country),
            (&self.phone, &mut form.phone),
            (&self.email, &mut form.email),
        ];
        for (arg, field) in targets {
            if let Some(value) = arg {
                field.clone_from(value);
            }
        }
    }
}

/// Donation commands.
#[derive(Debug, Subcommand)]
pub enum DonationCommand {
    /// Record a donation for a donor
    Add {
        /// Donor id
        donor_id: i64,

        #[command(flatten)]
        fields: DonationFieldArgs,
    },

    /// Change fields of an existing donation
    Edit {
        /// Donation id
        id: i64,

        /// Move the donation to another donor
        #[arg(long)]
        donor_id: Option<i64>,

        #[command(flatten)]
        fields: DonationFieldArgs,
    },

    /// Delete a donation
    Delete {
        /// Donation id
        id: i64,

        /// Confirm the deletion
        #[arg(short, long)]
        yes: bool,
    },

    /// List a donor's donations, most recent first
    List {
        /// Donor id
        donor_id: i64,

        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },
}

/// Donation fields as command-line flags.
#[derive(Debug, Clone, Default, Args)]
pub struct DonationFieldArgs {
    /// Amount, e.g. 123.45
    #[arg(short, long)]
    pub amount: Option<String>,
    /// Date as YYYY-MM-DD (defaults to today when adding)
    #[arg(short, long)]
    pub date: Option<String>,
    /// Payment method, e.g. check or cash
    #[arg(short, long = "method")]
    pub payment_method: Option<String>,
}

impl DonationFieldArgs {
    /// Overwrite the form fields that were given on the command line.
    pub fn apply_to(&self, form: &mut DonationForm) {
        if let Some(amount) = &self.amount {
            form.amount.clone_from(amount);
        }
        if let Some(date) = &self.date {
            form.date.clone_from(date);
        }
        if let Some(method) = &self.payment_method {
            form.payment_method.clone_from(method);
        }
    }
}

/// Search command arguments.
#[derive(Debug, Args)]
pub struct SearchCommand {
    /// Text to look for in names, email, phone and address fields
    pub term: Option<String>,

    /// List every donor instead of searching
    #[arg(short, long)]
    pub all: bool,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Organization commands.
#[derive(Debug, Subcommand)]
pub enum OrgCommand {
    /// Show the organization details used on letters
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Set or change the organization details
    Set(OrgFieldArgs),
}

/// Organization fields as command-line flags.
#[derive(Debug, Clone, Default, Args)]
pub struct OrgFieldArgs {
    /// Organization name
    #[arg(long)]
    pub name: Option<String>,
    /// Street address
    #[arg(long)]
    pub street: Option<String>,
    /// City
    #[arg(long)]
    pub city: Option<String>,
    /// State or province
    #[arg(long)]
    pub state: Option<String>,
    /// Postal code
    #[arg(long)]
    pub zip: Option<String>,
    /// Country
    #[arg(long)]
    pub country: Option<String>,
}

impl OrgFieldArgs {
    /// Overwrite the form fields that were given on the command line.
    pub fn apply_to(&self, form: &mut OrganizationForm) {
        let targets = [
            (&self.name, &mut form.name),
            (&self.street, &mut form.street),
            (&self.city, &mut form.city),
            (&self.state, &mut form.state),
            (&self.zip, &mut form.zip),
            (&self.country, &mut form.country),
        ];
        for (arg, field) in targets {
            if let Some(value) = arg {
                field.clone_from(value);
            }
        }
    }
}

/// Letters command arguments.
#[derive(Debug, Args)]
pub struct LettersCommand {
    /// Year to thank donors for (defaults to the current year)
    pub year: Option<i32>,

    /// Write letters here instead of the configured directory
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,
}

/// Status command arguments.
#[derive(Debug, Args)]
pub struct StatusCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}
