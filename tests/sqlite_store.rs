use rusqlite::Connection;
use tempfile::TempDir;

use seatbook::{
    config::ReferencePolicy,
    persist::{
        BookingStore, PersistError,
        migrate::{SCHEMA_VERSION, schema_version, table_columns},
        sqlite::SqliteBookingStore,
    },
    seat::{Booking, PassengerName},
    types::{BookingRef, MealPreference, SeatKey},
};

fn seat(token: &str) -> SeatKey {
    token.parse().expect("seat")
}

fn booking(token: &str, reference: &str, first: &str) -> Booking {
    Booking {
        seat: seat(token),
        reference: BookingRef::normalized(reference),
        first_name: first.to_string(),
        last_name: "Gomez".to_string(),
        passport: "P123".to_string(),
        meal: Some(MealPreference::Standard),
    }
}

#[test]
fn fresh_database_gets_current_schema() {
    let tmp = TempDir::new().expect("tmp");
    let db_path = tmp.path().join("fresh.db");
    SqliteBookingStore::open(&db_path).expect("open");

    let conn = Connection::open(&db_path).expect("conn");
    assert_eq!(schema_version(&conn).expect("version"), SCHEMA_VERSION);
    assert_eq!(
        table_columns(&conn, "bookings").expect("columns"),
        ["seat", "reference", "first_name", "last_name", "passport", "meal_preference"]
    );
}

#[test]
fn ensure_schema_is_idempotent_and_keeps_rows() {
    let tmp = TempDir::new().expect("tmp");
    let store = SqliteBookingStore::open(tmp.path().join("idem.db")).expect("open");
    store.insert_booking(&booking("12A", "ABCD1234", "Ana")).expect("insert");

    store.ensure_schema().expect("again");
    store.ensure_schema().expect("and again");

    assert_eq!(store.list_bookings().expect("list").len(), 1);
}

#[test]
fn unversioned_table_with_expected_shape_is_adopted() {
    let tmp = TempDir::new().expect("tmp");
    let db_path = tmp.path().join("legacy.db");
    {
        let conn = Connection::open(&db_path).expect("conn");
        conn.execute_batch(
            "CREATE TABLE bookings (seat TEXT PRIMARY KEY, reference TEXT, first_name TEXT,
                 last_name TEXT, passport TEXT, meal_preference TEXT);
             INSERT INTO bookings VALUES ('3C', 'OLDREF01', 'Li', 'Wei', 'X9', 'Vegetarian');",
        )
        .expect("legacy schema");
    }

    let store = SqliteBookingStore::open(&db_path).expect("open");
    let found = store.find_booking(seat("3C")).expect("find").expect("kept");
    assert_eq!(found.reference.as_str(), "OLDREF01");
    assert_eq!(found.meal, Some(MealPreference::Vegetarian));
}

#[test]
fn mismatched_table_is_preserved_not_dropped() {
    let tmp = TempDir::new().expect("tmp");
    let db_path = tmp.path().join("odd.db");
    {
        let conn = Connection::open(&db_path).expect("conn");
        conn.execute_batch(
            "CREATE TABLE bookings (seat TEXT PRIMARY KEY, reference TEXT);
             INSERT INTO bookings VALUES ('1A', 'ZZZZ9999');",
        )
        .expect("odd schema");
    }

    let store = SqliteBookingStore::open(&db_path).expect("open");
    assert!(store.list_bookings().expect("list").is_empty());

    let conn = Connection::open(&db_path).expect("conn");
    let kept: String = conn
        .query_row("SELECT reference FROM bookings_legacy WHERE seat = '1A'", [], |row| row.get(0))
        .expect("legacy row");
    assert_eq!(kept, "ZZZZ9999");
}

#[test]
fn unversioned_table_with_shared_references_still_opens() {
    let tmp = TempDir::new().expect("tmp");
    let db_path = tmp.path().join("dupes.db");
    {
        let conn = Connection::open(&db_path).expect("conn");
        conn.execute_batch(
            "CREATE TABLE bookings (seat TEXT PRIMARY KEY, reference TEXT, first_name TEXT,
                 last_name TEXT, passport TEXT, meal_preference TEXT);
             INSERT INTO bookings VALUES ('3C', 'DUPREF01', 'Li', 'Wei', 'X9', NULL);
             INSERT INTO bookings VALUES ('4C', 'DUPREF01', 'Mo', 'Chen', 'X8', NULL);
             INSERT INTO bookings VALUES ('5C', 'dupref01', 'Al', 'Ng', 'X7', NULL);
             INSERT INTO bookings VALUES ('6C', 'KEEPME01', 'Jo', 'Park', 'X6', NULL);",
        )
        .expect("legacy schema");
    }

    let store = SqliteBookingStore::open(&db_path).expect("open despite shared references");
    let seats: Vec<String> = store
        .list_bookings()
        .expect("list")
        .iter()
        .map(|b| b.seat.to_string())
        .collect();
    assert_eq!(seats, ["3C", "6C"]);

    let conn = Connection::open(&db_path).expect("conn");
    let mut moved: Vec<String> = conn
        .prepare("SELECT seat FROM bookings_duplicate_refs")
        .expect("side table")
        .query_map([], |row| row.get(0))
        .expect("query")
        .collect::<Result<_, _>>()
        .expect("rows");
    moved.sort();
    assert_eq!(moved, ["4C", "5C"]);

    let clash = store.insert_booking(&booking("7C", "DUPREF01", "Ed")).unwrap_err();
    assert!(matches!(clash, PersistError::Conflict(_)));
}

#[test]
fn adopted_lowercase_references_are_uppercased() {
    let tmp = TempDir::new().expect("tmp");
    let db_path = tmp.path().join("lower.db");
    {
        let conn = Connection::open(&db_path).expect("conn");
        conn.execute_batch(
            "CREATE TABLE bookings (seat TEXT PRIMARY KEY, reference TEXT, first_name TEXT,
                 last_name TEXT, passport TEXT, meal_preference TEXT);
             INSERT INTO bookings VALUES ('3C', 'abcd1234', 'Li', 'Wei', 'X9', NULL);",
        )
        .expect("legacy schema");
    }

    let store = SqliteBookingStore::open(&db_path).expect("open");
    let conn = Connection::open(&db_path).expect("conn");
    let raw: String = conn
        .query_row("SELECT reference FROM bookings WHERE seat = '3C'", [], |row| row.get(0))
        .expect("row");
    assert_eq!(raw, "ABCD1234");
    assert!(store
        .verify_credentials(seat("3C"), "Li", &BookingRef::normalized("abcd1234"))
        .expect("verify"));
}

#[test]
fn reference_checks_ignore_stored_case() {
    let tmp = TempDir::new().expect("tmp");
    let db_path = tmp.path().join("case.db");
    let store = SqliteBookingStore::open(&db_path).expect("open");
    {
        let conn = Connection::open(&db_path).expect("conn");
        conn.execute_batch(
            "INSERT INTO bookings VALUES ('8A', 'mixed0Ab', 'Ana', 'Gomez', 'P1', NULL);",
        )
        .expect("seed");
    }

    let reference = BookingRef::normalized("MIXED0AB");
    assert!(store.reference_exists(&reference).expect("exists"));
    assert!(store.verify_credentials(seat("8A"), "Ana", &reference).expect("verify"));
    assert!(store
        .update_meal_preference(seat("8A"), &reference, Some(MealPreference::Vegetarian))
        .expect("update"));
}

#[test]
fn newer_schema_is_rejected() {
    let tmp = TempDir::new().expect("tmp");
    let db_path = tmp.path().join("future.db");
    {
        let conn = Connection::open(&db_path).expect("conn");
        conn.pragma_update(None, "user_version", i64::from(SCHEMA_VERSION) + 1)
            .expect("bump");
    }

    let err = SqliteBookingStore::open(&db_path).unwrap_err();
    assert!(matches!(err, PersistError::UnsupportedSchema { .. }));
}

#[test]
fn duplicate_seat_or_reference_conflicts() {
    let tmp = TempDir::new().expect("tmp");
    let store = SqliteBookingStore::open(tmp.path().join("dup.db")).expect("open");
    store.insert_booking(&booking("12A", "ABCD1234", "Ana")).expect("first");

    let same_seat = store.insert_booking(&booking("12A", "WXYZ0000", "Bo")).unwrap_err();
    assert!(matches!(same_seat, PersistError::Conflict(_)));

    let same_ref = store.insert_booking(&booking("12B", "ABCD1234", "Bo")).unwrap_err();
    assert!(matches!(same_ref, PersistError::Conflict(_)));

    assert_eq!(store.list_bookings().expect("list").len(), 1);
}

#[test]
fn credentials_require_exact_name_and_normalized_reference() {
    let tmp = TempDir::new().expect("tmp");
    let store = SqliteBookingStore::open(tmp.path().join("auth.db")).expect("open");
    store.insert_booking(&booking("12A", "ABCD1234", "Ana")).expect("insert");

    let s = seat("12A");
    assert!(store.verify_credentials(s, "Ana", &BookingRef::normalized("abcd1234")).expect("q"));
    assert!(!store.verify_credentials(s, "ana", &BookingRef::normalized("ABCD1234")).expect("q"));
    assert!(!store.verify_credentials(s, "Ana", &BookingRef::normalized("ABCD1235")).expect("q"));
    assert!(!store.verify_credentials(seat("12B"), "Ana", &BookingRef::normalized("ABCD1234")).expect("q"));
}

#[test]
fn meal_update_requires_matching_reference() {
    let tmp = TempDir::new().expect("tmp");
    let store = SqliteBookingStore::open(tmp.path().join("meal.db")).expect("open");
    store.insert_booking(&booking("12A", "ABCD1234", "Ana")).expect("insert");
    let s = seat("12A");

    let wrong = BookingRef::normalized("NOPE0000");
    assert!(!store.update_meal_preference(s, &wrong, None).expect("update"));

    let right = BookingRef::normalized("ABCD1234");
    assert!(store.update_meal_preference(s, &right, Some(MealPreference::NoMeal)).expect("update"));
    assert_eq!(store.find_booking(s).expect("find").expect("row").meal, Some(MealPreference::NoMeal));

    assert!(store.update_meal_preference(s, &right, None).expect("clear"));
    assert_eq!(store.find_booking(s).expect("find").expect("row").meal, None);
}

#[test]
fn delete_reports_whether_a_row_was_removed() {
    let tmp = TempDir::new().expect("tmp");
    let store = SqliteBookingStore::open(tmp.path().join("del.db")).expect("open");
    store.insert_booking(&booking("12A", "ABCD1234", "Ana")).expect("insert");

    assert!(store.delete_booking(seat("12A")).expect("delete"));
    assert!(!store.delete_booking(seat("12A")).expect("delete again"));
    assert!(store.find_booking(seat("12A")).expect("find").is_none());
}

#[test]
fn passenger_name_and_listing_order() {
    let tmp = TempDir::new().expect("tmp");
    let store = SqliteBookingStore::open(tmp.path().join("list.db")).expect("open");
    store.insert_booking(&booking("20B", "REF00002", "Bo")).expect("insert");
    store.insert_booking(&booking("3F", "REF00001", "Ana")).expect("insert");
    store.insert_booking(&booking("20A", "REF00003", "Cy")).expect("insert");

    let seats: Vec<String> = store
        .list_bookings()
        .expect("list")
        .iter()
        .map(|b| b.seat.to_string())
        .collect();
    assert_eq!(seats, ["3F", "20A", "20B"]);

    assert_eq!(
        store.passenger_name(seat("20B")).expect("name"),
        Some(PassengerName { first: "Bo".to_string(), last: "Gomez".to_string() })
    );
    assert_eq!(store.passenger_name(seat("1A")).expect("name"), None);
}

#[test]
fn generated_references_never_repeat_stored_ones() {
    let tmp = TempDir::new().expect("tmp");
    let store = SqliteBookingStore::open(tmp.path().join("refs.db")).expect("open");
    let policy = ReferencePolicy::default();

    let mut issued = std::collections::HashSet::new();
    for (i, s) in seatbook::core::layout::all_seats().take(60).enumerate() {
        let reference = store.generate_unique_reference(&policy).expect("reference");
        assert_eq!(reference.as_str().len(), 8, "booking {i}");
        assert!(!store.reference_exists(&reference).expect("exists"));
        assert!(issued.insert(reference.clone()));

        let mut b = booking("1A", reference.as_str(), "Ana");
        b.seat = s;
        store.insert_booking(&b).expect("insert");
    }
}
