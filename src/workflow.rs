//! Booking orchestration over a [`BookingStore`] and its [`SeatRegistry`] mirror.
//!
//! Every mutation writes the store first and mirrors into the registry only
//! after the write succeeded. If mirroring fails the store write is undone.

use thiserror::Error;

use crate::{
    config::ReferencePolicy,
    core::{
        layout::{SeatFormatError, validate_seat_format},
        registry::{RegistryError, SeatRegistry},
    },
    persist::{BookingStore, PersistError},
    render::render_seat_map,
    seat::{Availability, Booking, BookingDraft, SeatStatus},
    types::{BookingRef, MealPreference, SeatKey},
};

#[derive(Debug, Error)]
pub enum BookingError {
    #[error("invalid seat: {0}")]
    InvalidFormat(#[from] SeatFormatError),
    #[error("seat {seat} is not available: {reason}")]
    SeatUnavailable { seat: SeatKey, reason: Availability },
    #[error("the supplied name and booking reference do not match this seat")]
    AuthenticationFailure,
    #[error("storage error: {0}")]
    Storage(#[from] PersistError),
    #[error("no booking found for seat {0}")]
    NotFound(SeatKey),
    #[error("{0} must not be empty")]
    InvalidPassenger(&'static str),
    #[error("seat registry out of sync: {0}")]
    Registry(#[from] RegistryError),
}

/// Stateful booking desk: the store plus its in-memory seat projection.
pub struct BookingService<S: BookingStore> {
    store: S,
    registry: SeatRegistry,
    policy: ReferencePolicy,
}

impl<S: BookingStore> BookingService<S> {
    /// Migrates the store and rebuilds the registry from it.
    pub fn open(store: S, policy: ReferencePolicy) -> Result<Self, BookingError> {
        store.ensure_schema()?;
        let registry = SeatRegistry::from_store(&store)?;
        Ok(Self {
            store,
            registry,
            policy,
        })
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn registry(&self) -> &SeatRegistry {
        &self.registry
    }

    pub fn check_availability(&self, seat: &str) -> Availability {
        self.registry.check_availability(seat, &self.store)
    }

    pub fn render_seat_map(&self) -> String {
        render_seat_map(&self.registry)
    }

    /// Books a free seat and returns the stored booking with its new reference.
    ///
    /// A storage failure leaves the seat free in the registry.
    pub fn book_seat(
        &mut self,
        seat: &str,
        first_name: &str,
        last_name: &str,
        passport: &str,
        meal: Option<MealPreference>,
    ) -> Result<Booking, BookingError> {
        let key = validate_seat_format(seat)?;
        let availability = self.check_availability(seat);
        if !availability.is_available() {
            return Err(BookingError::SeatUnavailable {
                seat: key,
                reason: availability,
            });
        }

        let draft = BookingDraft {
            seat: key,
            first_name: required(first_name, "first name")?,
            last_name: required(last_name, "last name")?,
            passport: required(passport, "passport number")?,
            meal,
        };

        let reference = self.store.generate_unique_reference(&self.policy)?;
        let booking = Booking::from_draft(draft, reference);
        self.store.insert_booking(&booking)?;

        if let Err(err) = self.registry.mark_booked(key, booking.reference.clone()) {
            self.store.delete_booking(key)?;
            return Err(err.into());
        }

        log::info!("seat {key} booked");
        Ok(booking)
    }

    /// Releases a booked seat once the passenger's first name and reference check out.
    pub fn free_seat_authenticated(
        &mut self,
        seat: &str,
        first_name: &str,
        reference: &str,
    ) -> Result<(), BookingError> {
        let (seat, _) = self.authenticate(seat, first_name, reference)?;

        let Some(booking) = self.store.find_booking(seat)? else {
            return Err(BookingError::NotFound(seat));
        };
        if !self.store.delete_booking(seat)? {
            log::warn!("booking for {seat} vanished between authentication and delete");
            return Err(BookingError::NotFound(seat));
        }

        if let Err(err) = self.registry.mark_free(seat) {
            self.store.insert_booking(&booking)?;
            return Err(err.into());
        }

        log::info!("seat {seat} freed");
        Ok(())
    }

    /// Replaces (or with `None`, clears) the meal preference of an authenticated booking.
    pub fn change_meal_authenticated(
        &mut self,
        seat: &str,
        first_name: &str,
        reference: &str,
        meal: Option<MealPreference>,
    ) -> Result<(), BookingError> {
        let (seat, reference) = self.authenticate(seat, first_name, reference)?;

        if !self.store.update_meal_preference(seat, &reference, meal)? {
            return Err(BookingError::NotFound(seat));
        }

        match meal {
            Some(meal) => log::info!("seat {seat} meal set to {meal}"),
            None => log::info!("seat {seat} meal cleared"),
        }
        Ok(())
    }

    /// Shared gate for self-service changes.
    ///
    /// A credential mismatch yields [`BookingError::AuthenticationFailure`]
    /// regardless of which field was wrong.
    fn authenticate(
        &self,
        seat: &str,
        first_name: &str,
        reference: &str,
    ) -> Result<(SeatKey, BookingRef), BookingError> {
        let seat = validate_seat_format(seat)?;
        match self.registry.status(seat) {
            Some(SeatStatus::Booked(_)) => {}
            Some(SeatStatus::Storage) => {
                return Err(BookingError::SeatUnavailable {
                    seat,
                    reason: Availability::Storage,
                });
            }
            Some(SeatStatus::Free) | None => return Err(BookingError::NotFound(seat)),
        }

        let reference = BookingRef::normalized(reference);
        if !self
            .store
            .verify_credentials(seat, first_name.trim(), &reference)?
        {
            log::debug!("credential mismatch for seat {seat}");
            return Err(BookingError::AuthenticationFailure);
        }
        Ok((seat, reference))
    }
}

fn required(value: &str, field: &'static str) -> Result<String, BookingError> {
    let value = value.trim();
    if value.is_empty() {
        Err(BookingError::InvalidPassenger(field))
    } else {
        Ok(value.to_string())
    }
}
