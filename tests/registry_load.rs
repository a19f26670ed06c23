use rusqlite::Connection;
use tempfile::TempDir;

use seatbook::{
    core::registry::{RegistryError, SeatRegistry},
    persist::sqlite::SqliteBookingStore,
    seat::SeatStatus,
    types::{BookingRef, SeatKey},
};

fn seat(token: &str) -> SeatKey {
    token.parse().expect("seat")
}

#[test]
fn load_replays_rows_and_skips_unplaceable_ones() {
    let tmp = TempDir::new().expect("tmp");
    let db_path = tmp.path().join("load.db");
    let store = SqliteBookingStore::open(&db_path).expect("open");
    {
        let conn = Connection::open(&db_path).expect("conn");
        conn.execute_batch(
            "INSERT INTO bookings VALUES ('12A', 'abcd1234', 'Ana', 'Gomez', 'P1', NULL);
             INSERT INTO bookings VALUES ('77D', 'STOR0001', 'Bo', 'Lind', 'P2', NULL);
             INSERT INTO bookings VALUES ('99Z', 'JUNK0001', 'Cy', 'Moss', 'P3', NULL);",
        )
        .expect("seed");
    }

    let mut registry = SeatRegistry::new();
    let report = registry.load(&store).expect("load");

    assert_eq!(report.booked, 1);
    let mut skipped = report.skipped.clone();
    skipped.sort();
    assert_eq!(skipped, ["77D", "99Z"]);

    assert_eq!(
        registry.status(seat("12A")),
        Some(&SeatStatus::Booked(BookingRef::normalized("ABCD1234")))
    );
    assert_eq!(registry.status(seat("77D")), Some(&SeatStatus::Storage));
    let counts = registry.counts();
    assert_eq!((counts.free, counts.booked, counts.storage), (473, 1, 6));
}

#[test]
fn load_discards_previous_in_memory_state() {
    let tmp = TempDir::new().expect("tmp");
    let store = SqliteBookingStore::open(tmp.path().join("reset.db")).expect("open");

    let mut registry = SeatRegistry::new();
    registry
        .mark_booked(seat("3B"), BookingRef::normalized("GHOST001"))
        .expect("mark");
    registry.load(&store).expect("load");

    assert_eq!(registry.status(seat("3B")), Some(&SeatStatus::Free));
    assert_eq!(registry.len(), 480);
}

#[test]
fn transitions_only_between_free_and_booked() {
    let mut registry = SeatRegistry::new();
    let r = BookingRef::normalized("ABCD1234");

    assert_eq!(
        registry.mark_booked(seat("78F"), r.clone()),
        Err(RegistryError::Storage(seat("78F")))
    );
    assert_eq!(registry.mark_free(seat("78F")), Err(RegistryError::Storage(seat("78F"))));
    assert_eq!(registry.mark_free(seat("1A")), Err(RegistryError::NotBooked(seat("1A"))));

    registry.mark_booked(seat("1A"), r.clone()).expect("book");
    assert_eq!(
        registry.mark_booked(seat("1A"), r.clone()),
        Err(RegistryError::AlreadyBooked(seat("1A")))
    );
    assert_eq!(registry.mark_free(seat("1A")), Ok(r));
    assert_eq!(registry.status(seat("1A")), Some(&SeatStatus::Free));
}
