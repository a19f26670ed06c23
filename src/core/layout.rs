//! Static cabin layout and seat-token parsing.

use hashbrown::HashMap;
use thiserror::Error;

use crate::{
    seat::SeatStatus,
    types::{Column, SeatKey},
};

/// Number of seat rows.
pub const ROWS: u8 = 80;
/// Rows whose right-hand block is a storage bay.
pub const STORAGE_ROWS: [u8; 2] = [77, 78];
/// Columns occupied by the storage bay.
pub const STORAGE_COLUMNS: [Column; 3] = [Column::D, Column::E, Column::F];
/// Total seat positions in the layout.
pub const TOTAL_SEATS: usize = ROWS as usize * Column::ALL.len();
/// Seats that can ever be free or booked.
pub const BOOKABLE_SEATS: usize = TOTAL_SEATS - STORAGE_ROWS.len() * STORAGE_COLUMNS.len();

/// Why a token is not a seat key.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SeatFormatError {
    /// Nothing to parse.
    #[error("empty seat token")]
    Empty,
    /// The trailing character is not a column in A..F.
    #[error("seat {0:?} must end with a column letter A-F")]
    Column(String),
    /// The leading part is not a row number in 1..=80.
    #[error("seat {0:?} must start with a row number 1-80")]
    Row(String),
}

/// True for the fixed storage positions.
pub fn is_storage(seat: SeatKey) -> bool {
    STORAGE_ROWS.contains(&seat.row()) && STORAGE_COLUMNS.contains(&seat.column())
}

/// Iterates every seat key in row-major cabin order.
pub fn all_seats() -> impl Iterator<Item = SeatKey> {
    (1..=ROWS).flat_map(|row| {
        Column::ALL
            .into_iter()
            .filter_map(move |column| SeatKey::new(row, column))
    })
}

/// Produces the initial status of every seat: storage bays fixed, all else free.
pub fn build_layout() -> HashMap<SeatKey, SeatStatus> {
    all_seats()
        .map(|seat| {
            let status = if is_storage(seat) {
                SeatStatus::Storage
            } else {
                SeatStatus::Free
            };
            (seat, status)
        })
        .collect()
}

/// Parses `<row><column>` such as `12A` or `80f`.
///
/// Purely syntactic: the current status of the seat is not consulted.
pub fn validate_seat_format(token: &str) -> Result<SeatKey, SeatFormatError> {
    let token = token.trim();
    let Some(last) = token.chars().last() else {
        return Err(SeatFormatError::Empty);
    };
    let column = Column::from_char(last).ok_or_else(|| SeatFormatError::Column(token.to_string()))?;

    let digits = &token[..token.len() - last.len_utf8()];
    let well_formed = !digits.is_empty()
        && digits.len() <= 2
        && !digits.starts_with('0')
        && digits.bytes().all(|b| b.is_ascii_digit());
    if !well_formed {
        return Err(SeatFormatError::Row(token.to_string()));
    }

    digits
        .parse::<u8>()
        .ok()
        .and_then(|row| SeatKey::new(row, column))
        .ok_or_else(|| SeatFormatError::Row(token.to_string()))
}
