//! `donortrack` - Donor records and year-end thank-you letters
//!
//! This library keeps donors, their donations and the organization's own
//! details in a single SQLite file, lets a user browse and edit them, and
//! writes one plain-text thank-you letter per donor for a chosen year.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod cli;
pub mod config;
pub mod controller;
pub mod error;
pub mod forms;
pub mod letters;
pub mod logging;
pub mod model;
pub mod navigation;
pub mod storage;

pub use config::Config;
pub use controller::{Controller, LoadedDonor};
pub use error::{Error, Result};
pub use forms::{DonationForm, DonorForm, Form, OrganizationForm};
pub use letters::{LetterGenerator, LetterReport};
pub use logging::init_logging;
pub use model::{Donation, DonationFields, Donor, DonorFields, Organization};
pub use navigation::{DonorCursor, NavigationState};
pub use storage::{Storage, StorageStats};
