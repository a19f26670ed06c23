//! In-memory seat model: static layout and the registry projection.

/// Cabin layout constants, layout builder, and seat-token parsing.
pub mod layout;
/// Seat registry rebuilt from the booking store.
pub mod registry;
