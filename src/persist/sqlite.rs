//! SQLite-backed booking store.

use std::path::{Path, PathBuf};

use rusqlite::{Connection, ErrorCode, OptionalExtension, Row, params};

use crate::{
    core::layout::validate_seat_format,
    seat::{Booking, PassengerName},
    types::{BookingRef, MealPreference, SeatKey},
};

use super::{BookingStore, PersistError, PersistResult, migrate};

const BOOKING_COLUMNS: &str = "seat, reference, first_name, last_name, passport, meal_preference";

/// SQLite implementation of [`crate::persist::BookingStore`].
///
/// Holds only the file path: every operation opens its own connection and
/// drops it before returning. References are compared case-insensitively;
/// callers pass them in uppercase.
#[derive(Debug, Clone)]
pub struct SqliteBookingStore {
    path: PathBuf,
}

impl SqliteBookingStore {
    /// Opens or creates the database at `path` and migrates it to the current schema.
    pub fn open(path: impl AsRef<Path>) -> PersistResult<Self> {
        let store = Self {
            path: path.as_ref().to_path_buf(),
        };
        store.ensure_schema()?;
        Ok(store)
    }

    /// Location of the database file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn connect(&self) -> PersistResult<Connection> {
        log::debug!("opening {}", self.path.display());
        Ok(Connection::open(&self.path)?)
    }
}

impl BookingStore for SqliteBookingStore {
    fn ensure_schema(&self) -> PersistResult<()> {
        let mut conn = self.connect()?;
        migrate::migrate(&mut conn)
    }

    fn seat_references(&self) -> PersistResult<Vec<(String, String)>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare("SELECT seat, reference FROM bookings")?;
        let rows = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?;

        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }

    fn find_booking(&self, seat: SeatKey) -> PersistResult<Option<Booking>> {
        let conn = self.connect()?;
        let booking = conn
            .query_row(
                &format!("SELECT {BOOKING_COLUMNS} FROM bookings WHERE seat = ?1"),
                [seat.to_string()],
                booking_from_row,
            )
            .optional()?;
        Ok(booking)
    }

    fn list_bookings(&self) -> PersistResult<Vec<Booking>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(&format!("SELECT {BOOKING_COLUMNS} FROM bookings"))?;
        let rows = stmt.query_map([], booking_from_row)?;

        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        out.sort_by_key(|b| b.seat);
        Ok(out)
    }

    fn passenger_name(&self, seat: SeatKey) -> PersistResult<Option<PassengerName>> {
        let conn = self.connect()?;
        let name = conn
            .query_row(
                "SELECT first_name, last_name FROM bookings WHERE seat = ?1",
                [seat.to_string()],
                |row| {
                    Ok(PassengerName {
                        first: row.get(0)?,
                        last: row.get(1)?,
                    })
                },
            )
            .optional()?;
        Ok(name)
    }

    fn reference_exists(&self, reference: &BookingRef) -> PersistResult<bool> {
        let conn = self.connect()?;
        let hit: Option<i64> = conn
            .query_row(
                "SELECT 1 FROM bookings WHERE upper(reference) = ?1",
                [reference.as_str()],
                |row| row.get(0),
            )
            .optional()?;
        Ok(hit.is_some())
    }

    fn insert_booking(&self, booking: &Booking) -> PersistResult<()> {
        let conn = self.connect()?;
        conn.execute(
            &format!("INSERT INTO bookings({BOOKING_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6)"),
            params![
                booking.seat.to_string(),
                booking.reference.as_str(),
                booking.first_name,
                booking.last_name,
                booking.passport,
                booking.meal.map(MealPreference::label),
            ],
        )
        .map_err(|err| {
            conflict_or(
                err,
                format!("seat {} or reference {} already booked", booking.seat, booking.reference),
            )
        })?;
        Ok(())
    }

    fn delete_booking(&self, seat: SeatKey) -> PersistResult<bool> {
        let conn = self.connect()?;
        let removed = conn.execute("DELETE FROM bookings WHERE seat = ?1", [seat.to_string()])?;
        Ok(removed > 0)
    }

    fn verify_credentials(
        &self,
        seat: SeatKey,
        first_name: &str,
        reference: &BookingRef,
    ) -> PersistResult<bool> {
        let conn = self.connect()?;
        let hit: Option<i64> = conn
            .query_row(
                "SELECT 1 FROM bookings WHERE seat = ?1 AND first_name = ?2 AND upper(reference) = ?3",
                params![seat.to_string(), first_name, reference.as_str()],
                |row| row.get(0),
            )
            .optional()?;
        Ok(hit.is_some())
    }

    fn update_meal_preference(
        &self,
        seat: SeatKey,
        reference: &BookingRef,
        meal: Option<MealPreference>,
    ) -> PersistResult<bool> {
        let conn = self.connect()?;
        let updated = conn.execute(
            "UPDATE bookings SET meal_preference = ?1 WHERE seat = ?2 AND upper(reference) = ?3",
            params![meal.map(MealPreference::label), seat.to_string(), reference.as_str()],
        )?;
        Ok(updated > 0)
    }
}

fn booking_from_row(row: &Row<'_>) -> rusqlite::Result<Booking> {
    let seat_text: String = row.get(0)?;
    let seat = validate_seat_format(&seat_text).map_err(|err| corrupt(0, err.to_string()))?;

    let meal_text: Option<String> = row.get(5)?;
    let meal = match meal_text {
        None => None,
        Some(label) => Some(
            MealPreference::from_label(&label)
                .ok_or_else(|| corrupt(5, format!("unknown meal preference {label:?}")))?,
        ),
    };

    let reference: String = row.get(1)?;
    Ok(Booking {
        seat,
        reference: BookingRef::normalized(&reference),
        first_name: row.get(2)?,
        last_name: row.get(3)?,
        passport: row.get(4)?,
        meal,
    })
}

fn corrupt(idx: usize, msg: String) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(
        idx,
        rusqlite::types::Type::Text,
        Box::new(PersistError::Corrupt(msg)),
    )
}

fn conflict_or(err: rusqlite::Error, what: String) -> PersistError {
    match &err {
        rusqlite::Error::SqliteFailure(code, _) if code.code == ErrorCode::ConstraintViolation => {
            PersistError::Conflict(what)
        }
        _ => PersistError::Sqlite(err),
    }
}
