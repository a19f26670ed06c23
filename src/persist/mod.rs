pub mod migrate;
pub mod reference;
pub mod sqlite;

use thiserror::Error;

use crate::{
    config::ReferencePolicy,
    seat::{Booking, PassengerName},
    types::{BookingRef, MealPreference, SeatKey},
};

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("sqlite: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("constraint violated: {0}")]
    Conflict(String),
    #[error("database schema version {found} is newer than supported version {supported}")]
    UnsupportedSchema { found: u32, supported: u32 },
    #[error("no unused booking reference after {attempts} attempts")]
    ReferenceExhausted { attempts: usize },
    #[error("corrupt row: {0}")]
    Corrupt(String),
}

pub type PersistResult<T> = Result<T, PersistError>;

/// Durable table of bookings; the single source of truth for seat ownership.
///
/// Implementations enforce one booking per seat and globally unique references.
pub trait BookingStore {
    /// Brings the backing schema to the current version. Idempotent.
    fn ensure_schema(&self) -> PersistResult<()>;

    /// Every persisted `(seat, reference)` pair, as raw text.
    ///
    /// Raw so that the registry can report rows it cannot place.
    fn seat_references(&self) -> PersistResult<Vec<(String, String)>>;

    fn find_booking(&self, seat: SeatKey) -> PersistResult<Option<Booking>>;

    /// Bookings ordered by row then column.
    fn list_bookings(&self) -> PersistResult<Vec<Booking>>;

    fn passenger_name(&self, seat: SeatKey) -> PersistResult<Option<PassengerName>>;

    fn reference_exists(&self, reference: &BookingRef) -> PersistResult<bool>;

    /// Fails with [`PersistError::Conflict`] when the seat or reference is taken.
    fn insert_booking(&self, booking: &Booking) -> PersistResult<()>;

    /// Returns whether a row was removed.
    fn delete_booking(&self, seat: SeatKey) -> PersistResult<bool>;

    /// Exact match on seat, case-sensitive first name, and reference.
    fn verify_credentials(
        &self,
        seat: SeatKey,
        first_name: &str,
        reference: &BookingRef,
    ) -> PersistResult<bool>;

    /// Returns whether the `(seat, reference)` pair matched a row.
    fn update_meal_preference(
        &self,
        seat: SeatKey,
        reference: &BookingRef,
        meal: Option<MealPreference>,
    ) -> PersistResult<bool>;

    fn generate_unique_reference(&self, policy: &ReferencePolicy) -> PersistResult<BookingRef> {
        reference::generate_unique_reference(self, &mut rand::thread_rng(), policy)
    }
}
