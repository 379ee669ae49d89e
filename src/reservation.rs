//! Local reservation form state.
//!
//! Submission only flips the form into its confirmed state; nothing is sent
//! anywhere.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Smallest party size the form offers.
pub const MIN_GUESTS: u8 = 1;
/// Largest party size the form offers.
pub const MAX_GUESTS: u8 = 8;

/// Errors raised by the reservation form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReservationError {
    #[error("party size {0} is outside 1-8")]
    GuestsOutOfRange(u8),
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("unknown experience {0:?}")]
    UnknownExperience(String),
    #[error("reservation already submitted")]
    AlreadySubmitted,
}

/// Dining experience offered on the form.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Experience {
    #[default]
    DiningRoom,
    ChefsTable,
    SalonPrive,
    CaveParticuliere,
}

impl Experience {
    /// All options in display order.
    pub const ALL: [Experience; 4] = [
        Experience::DiningRoom,
        Experience::ChefsTable,
        Experience::SalonPrive,
        Experience::CaveParticuliere,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Experience::DiningRoom       => "Dining Room",
            Experience::ChefsTable       => "Chef's Table",
            Experience::SalonPrive       => "Salon Privé",
            Experience::CaveParticuliere => "Cave Particulière",
        }
    }
}

impl fmt::Display for Experience {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Experience {
    type Err = ReservationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Experience::ALL
            .into_iter()
            .find(|e| e.label() == s.trim())
            .ok_or_else(|| ReservationError::UnknownExperience(s.to_string()))
    }
}

/// Confirmation shown after submitting.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Confirmation {
    pub email: String,
}

impl Confirmation {
    pub fn message(&self) -> String {
        format!("A confirmation has been sent to {}.", self.email)
    }
}

/// The reservation form's field values.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReservationForm {
    pub name: String,
    pub email: String,
    /// Preferred date and time as entered (`YYYY-MM-DDTHH:MM`)
    pub date: String,
    pub note: String,
    pub experience: Experience,
    guests: u8,
    submitted: bool,
}

impl Default for ReservationForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            email: String::new(),
            date: String::new(),
            note: String::new(),
            experience: Experience::default(),
            guests: 2,
            submitted: false,
        }
    }
}

impl ReservationForm {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn guests(&self) -> u8 {
        self.guests
    }

    pub fn set_guests(&mut self, guests: u8) -> Result<(), ReservationError> {
        if !(MIN_GUESTS..=MAX_GUESTS).contains(&guests) {
            return Err(ReservationError::GuestsOutOfRange(guests));
        }
        self.guests = guests;
        Ok(())
    }

    /// "1 Guest", "2 Guests", ...
    pub fn guests_label(&self) -> String {
        let plural = if self.guests > 1 { "s" } else { "" };
        format!("{} Guest{}", self.guests, plural)
    }

    #[inline]
    pub fn is_submitted(&self) -> bool {
        self.submitted
    }

    /// Mark the form submitted and return the confirmation.
    ///
    /// Name, email and date are required. A submitted form stays submitted.
    pub fn submit(&mut self) -> Result<Confirmation, ReservationError> {
        if self.submitted {
            return Err(ReservationError::AlreadySubmitted);
        }
        for (field, value) in [("name", &self.name), ("email", &self.email), ("date", &self.date)] {
            if value.trim().is_empty() {
                return Err(ReservationError::MissingField(field));
            }
        }
        self.submitted = true;
        log::debug!("reservation submitted for {} guests ({})", self.guests, self.experience);
        Ok(Confirmation {
            email: self.email.clone(),
        })
    }
}
