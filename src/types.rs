//! Shared primitive identifiers: seat keys, booking references, meal options.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

/// Seat column letter, left to right across the cabin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Column {
    /// Window, left side.
    A,
    /// Middle, left side.
    B,
    /// Aisle, left side.
    C,
    /// Aisle, right side.
    D,
    /// Middle, right side.
    E,
    /// Window, right side.
    F,
}

impl Column {
    /// All columns in cabin order.
    pub const ALL: [Column; 6] = [Column::A, Column::B, Column::C, Column::D, Column::E, Column::F];

    /// Parses a single column letter, case-insensitively.
    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'A' => Some(Column::A),
            'B' => Some(Column::B),
            'C' => Some(Column::C),
            'D' => Some(Column::D),
            'E' => Some(Column::E),
            'F' => Some(Column::F),
            _ => None,
        }
    }

    /// Uppercase letter for this column.
    pub fn as_char(self) -> char {
        match self {
            Column::A => 'A',
            Column::B => 'B',
            Column::C => 'C',
            Column::D => 'D',
            Column::E => 'E',
            Column::F => 'F',
        }
    }
}

/// Row/column pair identifying one seat, e.g. `12A`.
///
/// Construct through [`crate::core::layout::validate_seat_format`] or
/// [`SeatKey::new`]; both reject rows outside the cabin. Serialized as the
/// seat string, and deserialization runs the same validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SeatKey {
    row: u8,
    column: Column,
}

impl SeatKey {
    /// Returns `None` when `row` is outside `1..=ROWS`.
    pub fn new(row: u8, column: Column) -> Option<Self> {
        if (1..=crate::core::layout::ROWS).contains(&row) {
            Some(Self { row, column })
        } else {
            None
        }
    }

    /// Row number, 1-based.
    pub fn row(self) -> u8 {
        self.row
    }

    /// Column letter.
    pub fn column(self) -> Column {
        self.column
    }
}

impl fmt::Display for SeatKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.row, self.column.as_char())
    }
}

impl std::str::FromStr for SeatKey {
    type Err = crate::core::layout::SeatFormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        crate::core::layout::validate_seat_format(s)
    }
}

impl Serialize for SeatKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SeatKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        crate::core::layout::validate_seat_format(&text).map_err(de::Error::custom)
    }
}

/// Uppercase alphanumeric booking reference, the passenger's self-service credential.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookingRef(String);

impl BookingRef {
    /// Normalizes caller input: surrounding whitespace trimmed, letters uppercased.
    ///
    /// No charset check is done here; a malformed reference simply never
    /// matches a stored one.
    pub fn normalized(input: &str) -> Self {
        Self(input.trim().to_ascii_uppercase())
    }

    /// Wraps a freshly generated token.
    pub(crate) fn from_generated(token: String) -> Self {
        Self(token)
    }

    /// Reference text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BookingRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// In-flight meal options offered at booking time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MealPreference {
    /// Default catering.
    Standard,
    /// Vegetarian catering.
    Vegetarian,
    /// Passenger declined a meal.
    NoMeal,
}

impl MealPreference {
    /// Options in menu order (choice 1 is index 0).
    pub const ALL: [MealPreference; 3] = [
        MealPreference::Standard,
        MealPreference::Vegetarian,
        MealPreference::NoMeal,
    ];

    /// Maps a 1-based menu choice to an option.
    pub fn from_choice(choice: usize) -> Option<Self> {
        choice.checked_sub(1).and_then(|idx| Self::ALL.get(idx).copied())
    }

    /// Label shown to passengers and persisted in the store.
    pub fn label(self) -> &'static str {
        match self {
            MealPreference::Standard => "Standard Meal",
            MealPreference::Vegetarian => "Vegetarian",
            MealPreference::NoMeal => "No Meal Preferred",
        }
    }

    /// Inverse of [`MealPreference::label`].
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.label() == label)
    }
}

impl fmt::Display for MealPreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
