//! In-memory seat registry: a derived projection of the booking store.
//!
//! The registry is rebuilt at startup by replaying every persisted booking
//! over the static layout. Afterwards it follows the write-through rule:
//! the store is written first and the registry mirrors the change only once
//! the write has committed.

use hashbrown::HashMap;
use thiserror::Error;

use crate::{
    persist::{BookingStore, PersistResult},
    seat::{Availability, SeatStatus},
    types::{BookingRef, SeatKey},
};

use super::layout::{self, BOOKABLE_SEATS, validate_seat_format};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("seat {0} is not part of the layout")]
    UnknownSeat(SeatKey),
    #[error("seat {0} is a storage bay")]
    Storage(SeatKey),
    #[error("seat {0} is already booked")]
    AlreadyBooked(SeatKey),
    #[error("seat {0} is not booked")]
    NotBooked(SeatKey),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SeatCounts {
    pub free: usize,
    pub booked: usize,
    pub storage: usize,
}

/// Outcome of replaying the store into the registry.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LoadReport {
    pub booked: usize,
    /// Seat texts of rows that could not be placed on the layout.
    pub skipped: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct SeatRegistry {
    seats: HashMap<SeatKey, SeatStatus>,
}

impl Default for SeatRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl SeatRegistry {
    /// Fresh layout with no bookings.
    pub fn new() -> Self {
        Self {
            seats: layout::build_layout(),
        }
    }

    pub fn from_store<S: BookingStore + ?Sized>(store: &S) -> PersistResult<Self> {
        let mut registry = Self::new();
        registry.load(store)?;
        Ok(registry)
    }

    /// Resets to the static layout and replays every persisted booking.
    ///
    /// Rows that name a malformed, unknown, storage, or already-booked seat
    /// are skipped and reported rather than aborting the load.
    pub fn load<S: BookingStore + ?Sized>(&mut self, store: &S) -> PersistResult<LoadReport> {
        self.seats = layout::build_layout();
        let mut report = LoadReport::default();

        for (seat_text, reference) in store.seat_references()? {
            let placed = validate_seat_format(&seat_text)
                .ok()
                .is_some_and(|seat| self.mark_booked(seat, BookingRef::normalized(&reference)).is_ok());
            if placed {
                report.booked += 1;
            } else {
                log::warn!("skipping persisted booking for unplaceable seat {seat_text:?}");
                report.skipped.push(seat_text);
            }
        }

        let counts = self.counts();
        if counts.free + counts.booked != BOOKABLE_SEATS {
            log::warn!(
                "seat layout diverged after load: {} free + {} booked, expected {BOOKABLE_SEATS}",
                counts.free,
                counts.booked
            );
        }
        log::info!("seat registry loaded: {} booked, {} free", counts.booked, counts.free);
        Ok(report)
    }

    pub fn status(&self, seat: SeatKey) -> Option<&SeatStatus> {
        self.seats.get(&seat)
    }

    /// Answers an availability query for a raw seat token.
    ///
    /// Only a booked seat reaches the store, to fetch the passenger name. A
    /// failed lookup still reports the seat as booked.
    pub fn check_availability<S: BookingStore + ?Sized>(&self, token: &str, store: &S) -> Availability {
        let Ok(seat) = validate_seat_format(token) else {
            return Availability::InvalidFormat;
        };
        match self.seats.get(&seat) {
            None => Availability::InvalidSeat,
            Some(SeatStatus::Free) => Availability::Available,
            Some(SeatStatus::Storage) => Availability::Storage,
            Some(SeatStatus::Booked(_)) => {
                let passenger = store.passenger_name(seat).unwrap_or_else(|err| {
                    log::warn!("passenger lookup for {seat} failed: {err}");
                    None
                });
                Availability::Booked { passenger }
            }
        }
    }

    /// Free -> Booked. Call only after the store insert has committed.
    pub fn mark_booked(&mut self, seat: SeatKey, reference: BookingRef) -> Result<(), RegistryError> {
        let status = self
            .seats
            .get_mut(&seat)
            .ok_or(RegistryError::UnknownSeat(seat))?;
        match status {
            SeatStatus::Free => {
                *status = SeatStatus::Booked(reference);
                Ok(())
            }
            SeatStatus::Storage => Err(RegistryError::Storage(seat)),
            SeatStatus::Booked(_) => Err(RegistryError::AlreadyBooked(seat)),
        }
    }

    /// Booked -> Free, returning the released reference. Call only after the store delete.
    pub fn mark_free(&mut self, seat: SeatKey) -> Result<BookingRef, RegistryError> {
        let status = self
            .seats
            .get_mut(&seat)
            .ok_or(RegistryError::UnknownSeat(seat))?;
        match status {
            SeatStatus::Booked(reference) => {
                let reference = reference.clone();
                *status = SeatStatus::Free;
                Ok(reference)
            }
            SeatStatus::Storage => Err(RegistryError::Storage(seat)),
            SeatStatus::Free => Err(RegistryError::NotBooked(seat)),
        }
    }

    pub fn counts(&self) -> SeatCounts {
        let mut counts = SeatCounts::default();
        for status in self.seats.values() {
            match status {
                SeatStatus::Free => counts.free += 1,
                SeatStatus::Booked(_) => counts.booked += 1,
                SeatStatus::Storage => counts.storage += 1,
            }
        }
        counts
    }

    pub fn len(&self) -> usize {
        self.seats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seats.is_empty()
    }

    /// Booked seats and their references, in cabin order.
    pub fn booked(&self) -> Vec<(SeatKey, &BookingRef)> {
        let mut out: Vec<_> = self
            .seats
            .iter()
            .filter_map(|(seat, status)| match status {
                SeatStatus::Booked(reference) => Some((*seat, reference)),
                _ => None,
            })
            .collect();
        out.sort_by_key(|(seat, _)| *seat);
        out
    }
}
