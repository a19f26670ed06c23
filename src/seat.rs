//! Seat status, booking records, drafts, and availability answers.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::{BookingRef, MealPreference, SeatKey};

/// Current status of a single seat in the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SeatStatus {
    /// Open for booking.
    Free,
    /// Cargo/equipment bay; never bookable.
    Storage,
    /// Held by the booking with this reference.
    Booked(BookingRef),
}

impl SeatStatus {
    /// One-letter code used by the seat chart.
    pub fn code(&self) -> char {
        match self {
            SeatStatus::Free => 'F',
            SeatStatus::Storage => 'S',
            SeatStatus::Booked(_) => 'R',
        }
    }
}

/// Passenger display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassengerName {
    /// Given name, case preserved.
    pub first: String,
    /// Family name, case preserved.
    pub last: String,
}

impl fmt::Display for PassengerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.first, self.last)
    }
}

/// Fully materialized, persisted booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    /// Seat held by this booking.
    pub seat: SeatKey,
    /// Unique booking reference.
    pub reference: BookingRef,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Passport number.
    pub passport: String,
    /// Optional meal choice.
    pub meal: Option<MealPreference>,
}

impl Booking {
    /// Builds a booking from a draft and a freshly issued reference.
    pub fn from_draft(draft: BookingDraft, reference: BookingRef) -> Self {
        Self {
            seat: draft.seat,
            reference,
            first_name: draft.first_name,
            last_name: draft.last_name,
            passport: draft.passport,
            meal: draft.meal,
        }
    }

    /// Passenger display name.
    pub fn passenger(&self) -> PassengerName {
        PassengerName {
            first: self.first_name.clone(),
            last: self.last_name.clone(),
        }
    }
}

/// Booking request before a reference has been issued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingDraft {
    /// Requested seat.
    pub seat: SeatKey,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Passport number.
    pub passport: String,
    /// Optional meal choice.
    pub meal: Option<MealPreference>,
}

/// Answer to an availability query.
///
/// The booking reference is deliberately absent from [`Availability::Booked`];
/// it is the credential for self-service changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Availability {
    /// The seat can be booked.
    Available,
    /// The seat is held; passenger details when the store could supply them.
    Booked {
        /// Passenger holding the seat, if the lookup succeeded.
        passenger: Option<PassengerName>,
    },
    /// The seat is a storage bay.
    Storage,
    /// The token is not a seat key.
    InvalidFormat,
    /// Well-formed key with no seat behind it.
    InvalidSeat,
}

impl Availability {
    /// True only for [`Availability::Available`].
    pub fn is_available(&self) -> bool {
        matches!(self, Availability::Available)
    }
}

impl fmt::Display for Availability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Availability::Available => f.write_str("Available"),
            Availability::Booked {
                passenger: Some(name),
            } => write!(f, "Booked (Passenger: {name})"),
            Availability::Booked { passenger: None } => f.write_str("Booked"),
            Availability::Storage => f.write_str("Storage area"),
            Availability::InvalidFormat => f.write_str("Invalid seat format"),
            Availability::InvalidSeat => f.write_str("Invalid seat"),
        }
    }
}
