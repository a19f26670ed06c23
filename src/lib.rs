//! Seat booking for a fixed-layout aircraft cabin, persisted in SQLite.
//!
//! The [`persist::BookingStore`] is the source of truth; the
//! [`core::registry::SeatRegistry`] is an in-memory projection rebuilt from it
//! at startup and updated only after each store write commits.
//!
//! # Examples
//!
//! Layout and seat-token parsing:
//! ```
//! use seatbook::core::layout::{build_layout, validate_seat_format, BOOKABLE_SEATS};
//!
//! let layout = build_layout();
//! assert_eq!(layout.len(), 480);
//! assert_eq!(BOOKABLE_SEATS, 474);
//! assert_eq!(validate_seat_format("12a").unwrap().to_string(), "12A");
//! assert!(validate_seat_format("81A").is_err());
//! ```
//!
//! Booking against a SQLite file:
//! ```no_run
//! use seatbook::{
//!     config::ReferencePolicy,
//!     persist::sqlite::SqliteBookingStore,
//!     types::MealPreference,
//!     workflow::BookingService,
//! };
//!
//! let store = SqliteBookingStore::open("bookings.db").expect("open sqlite");
//! let mut desk = BookingService::open(store, ReferencePolicy::default()).expect("load");
//! let booking = desk
//!     .book_seat("12A", "Ana", "Gomez", "P123", Some(MealPreference::Standard))
//!     .expect("book");
//! println!("{}", desk.check_availability("12A"));
//! desk.free_seat_authenticated("12A", "Ana", booking.reference.as_str())
//!     .expect("free");
//! ```

/// Service configuration and reference policy.
pub mod config;
/// Static layout and the in-memory seat registry.
pub mod core;
/// Booking store abstraction, SQLite implementation, migrations.
pub mod persist;
/// Seating chart rendering.
pub mod render;
/// Seat status and booking records.
pub mod seat;
/// Shared primitive identifiers.
pub mod types;
/// Book, free, and meal-change orchestration.
pub mod workflow;
