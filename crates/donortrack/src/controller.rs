//! Session state for browsing and editing donors.
//!
//! The [`Controller`] borrows the store, owns the navigation cursor and the
//! currently loaded donor, and keeps both in step after every mutation.

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::forms::{DonationForm, DonorForm, Form, OrganizationForm};
use crate::letters::{LetterGenerator, LetterReport};
use crate::model::{Donation, Donor, Organization};
use crate::navigation::{DonorCursor, NavigationState};
use crate::storage::Storage;

/// A donor together with its donations, most recent first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadedDonor {
    /// The donor record.
    pub donor: Donor,
    /// The donor's donations.
    pub donations: Vec<Donation>,
}

/// Orchestrates store calls for one interactive session.
#[derive(Debug)]
pub struct Controller<'s> {
    storage: &'s Storage,
    cursor: DonorCursor,
    loaded: Option<LoadedDonor>,
}

impl<'s> Controller<'s> {
    /// Create a controller with nothing loaded.
    #[must_use]
    pub fn new(storage: &'s Storage) -> Self {
        Self {
            storage,
            cursor: DonorCursor::new(),
            loaded: None,
        }
    }

    /// The backing store.
    #[must_use]
    pub fn storage(&self) -> &'s Storage {
        self.storage
    }

    /// The currently loaded donor, if any.
    #[must_use]
    pub fn loaded(&self) -> Option<&LoadedDonor> {
        self.loaded.as_ref()
    }

    /// The navigation cursor.
    #[must_use]
    pub fn cursor(&self) -> &DonorCursor {
        &self.cursor
    }

    /// Which navigation moves are available.
    #[must_use]
    pub fn navigation(&self) -> NavigationState {
        self.cursor.state()
    }

    /// Reload the id list from the store, keeping the current donor when it
    /// still exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn refresh_ids(&mut self) -> Result<()> {
        self.cursor.refresh(self.storage.all_donor_ids()?);
        if self.cursor.current().is_none() {
            self.loaded = None;
        }
        Ok(())
    }

    // === Navigation ===

    /// Load the first donor. Returns `false` when there are no donors.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn load_first(&mut self) -> Result<bool> {
        self.refresh_ids()?;
        let target = self.cursor.first();
        self.load_target(target)
    }

    /// Load the last donor. Returns `false` when there are no donors.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn load_last(&mut self) -> Result<bool> {
        self.refresh_ids()?;
        let target = self.cursor.last();
        self.load_target(target)
    }

    /// Step back one donor. Returns `false` when already at the start.
    ///
    /// # Errors
    ///
    /// Returns an error if the donor cannot be loaded.
    pub fn load_previous(&mut self) -> Result<bool> {
        match self.cursor.previous() {
            Some(id) => self.load_donor(id).map(|()| true),
            None => Ok(false),
        }
    }

    /// Step forward one donor. Returns `false` when already at the end.
    ///
    /// # Errors
    ///
    /// Returns an error if the donor cannot be loaded.
    pub fn load_next(&mut self) -> Result<bool> {
        match self.cursor.next() {
            Some(id) => self.load_donor(id).map(|()| true),
            None => Ok(false),
        }
    }

    /// Load a donor and its donations, moving the cursor onto it.
    ///
    /// On failure nothing stays loaded; the id list is left as it was.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DonorNotFound`] for an unknown id, or a store error.
    pub fn load_donor(&mut self, id: i64) -> Result<()> {
        match self.fetch(id) {
            Ok(loaded) => {
                if !self.cursor.select(id) {
                    self.cursor.refresh(self.storage.all_donor_ids()?);
                    self.cursor.select(id);
                }
                debug!(donor_id = id, donations = loaded.donations.len(), "Loaded donor");
                self.loaded = Some(loaded);
                Ok(())
            }
            Err(e) => {
                self.loaded = None;
                self.cursor.clear();
                Err(e)
            }
        }
    }

    fn load_target(&mut self, target: Option<i64>) -> Result<bool> {
        match target {
            Some(id) => self.load_donor(id).map(|()| true),
            None => {
                self.loaded = None;
                Ok(false)
            }
        }
    }

    fn fetch(&self, id: i64) -> Result<LoadedDonor> {
        let donor = self
            .storage
            .get_donor(id)?
            .ok_or(Error::DonorNotFound(id))?;
        let donations = self.storage.donations_for_donor(id)?;
        Ok(LoadedDonor { donor, donations })
    }

    // === Donors ===

    /// Validate and add a donor, then load it.
    ///
    /// # Errors
    ///
    /// Returns a validation error or a store error.
    pub fn add_donor(&mut self, form: &DonorForm) -> Result<i64> {
        let fields = form.validate()?;
        let id = self.storage.add_donor(&fields)?;
        self.refresh_ids()?;
        self.load_donor(id)?;
        Ok(id)
    }

    /// Validate and save changes to a donor.
    ///
    /// # Errors
    ///
    /// Returns a validation error, [`Error::DonorNotFound`], or a store error.
    pub fn update_donor(&mut self, id: i64, form: &DonorForm) -> Result<()> {
        let fields = form.validate()?;
        if !self.storage.update_donor(id, &fields)? {
            return Err(Error::DonorNotFound(id));
        }
        self.refresh_ids()?;
        if self.loaded_id() == Some(id) {
            self.load_donor(id)?;
        }
        Ok(())
    }

    /// Delete a donor and its donations, then load the first remaining donor.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DonorNotFound`] or a store error.
    pub fn delete_donor(&mut self, id: i64) -> Result<()> {
        if !self.storage.delete_donor(id)? {
            return Err(Error::DonorNotFound(id));
        }
        self.load_first()?;
        Ok(())
    }

    /// Donors matching `term`, or every donor when `include_all` is set.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn search(&self, term: &str, include_all: bool) -> Result<Vec<Donor>> {
        self.storage.search_donors(term, include_all)
    }

    // === Donations ===

    /// Validate and add a donation for the loaded donor.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoDonorLoaded`], a validation error, or a store error.
    pub fn add_donation(&mut self, form: &DonationForm) -> Result<i64> {
        let donor_id = self.loaded_id().ok_or(Error::NoDonorLoaded)?;
        let fields = form.validate()?;
        if fields.donor_id != donor_id {
            return Err(Error::validation(
                "donor id",
                format!("donation is for donor {}, but donor {donor_id} is loaded", fields.donor_id),
            ));
        }
        let id = self.storage.add_donation(&fields)?;
        self.refresh_donations()?;
        Ok(id)
    }

    /// Validate and save changes to a donation.
    ///
    /// # Errors
    ///
    /// Returns a validation error, [`Error::DonationNotFound`], or a store
    /// error.
    pub fn update_donation(&mut self, id: i64, form: &DonationForm) -> Result<()> {
        let fields = form.validate()?;
        if !self.storage.update_donation(id, &fields)? {
            return Err(Error::DonationNotFound(id));
        }
        self.refresh_donations()
    }

    /// Delete a donation.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DonationNotFound`] or a store error.
    pub fn delete_donation(&mut self, id: i64) -> Result<()> {
        if !self.storage.delete_donation(id)? {
            return Err(Error::DonationNotFound(id));
        }
        self.refresh_donations()
    }

    fn refresh_donations(&mut self) -> Result<()> {
        if let Some(loaded) = self.loaded.as_mut() {
            loaded.donations = self.storage.donations_for_donor(loaded.donor.id)?;
        }
        Ok(())
    }

    fn loaded_id(&self) -> Option<i64> {
        self.loaded.as_ref().map(|l| l.donor.id)
    }

    // === Organization and letters ===

    /// The stored organization, if set.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn organization(&self) -> Result<Option<Organization>> {
        self.storage.organization()
    }

    /// Validate and store the organization.
    ///
    /// # Errors
    ///
    /// Returns a validation error or a store error.
    pub fn set_organization(&self, form: &OrganizationForm) -> Result<Organization> {
        let org = form.validate()?;
        self.storage.set_organization(&org)?;
        Ok(org)
    }

    /// Write thank-you letters for `year`.
    ///
    /// # Errors
    ///
    /// Returns an error if the run cannot start; per-letter failures are in
    /// the report.
    pub fn generate_letters(
        &self,
        generator: &LetterGenerator,
        year: i32,
        today: NaiveDate,
    ) -> Result<LetterReport> {
        let report = generator.generate(self.storage, year, today)?;
        info!(year, complete = report.is_complete(), "Letter run finished");
        Ok(report)
    }
}
