//! Text rendering of the cabin seating chart.

use std::fmt;

use crate::{
    core::{
        layout::{ROWS, STORAGE_ROWS},
        registry::SeatRegistry,
    },
    seat::SeatStatus,
    types::{Column, SeatKey},
};

const LEFT: [Column; 3] = [Column::A, Column::B, Column::C];
const RIGHT: [Column; 3] = [Column::D, Column::E, Column::F];

/// Renders every row as `F-12A` style cells either side of the aisle.
pub fn render_seat_map(registry: &SeatRegistry) -> String {
    SeatChart(registry).to_string()
}

/// Seating chart for a registry, formatted through [`fmt::Display`].
pub struct SeatChart<'a>(pub &'a SeatRegistry);

impl fmt::Display for SeatChart<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let registry = self.0;
        let counts = registry.counts();

        writeln!(f, "Seating plan")?;
        writeln!(f, "F = Free, R = Booked, S = Storage, X = Aisle")?;
        writeln!(
            f,
            "{} free, {} booked, {} storage\n",
            counts.free, counts.booked, counts.storage
        )?;
        writeln!(f, "Row    {:^20}│{:^20}", "Left Side", "Right Side")?;
        writeln!(f, "       {}┼{}", "─".repeat(20), "─".repeat(20))?;

        for row in 1..=ROWS {
            let aisle = if row < STORAGE_ROWS[0] { "X" } else { " " };
            writeln!(
                f,
                "{row:3}   {}    {aisle}    {}",
                block(registry, row, &LEFT),
                block(registry, row, &RIGHT)
            )?;
        }
        Ok(())
    }
}

fn block(registry: &SeatRegistry, row: u8, columns: &[Column]) -> String {
    columns
        .iter()
        .map(|&column| cell(registry, row, column))
        .collect::<Vec<_>>()
        .join(" ")
}

fn cell(registry: &SeatRegistry, row: u8, column: Column) -> String {
    let Some(seat) = SeatKey::new(row, column) else {
        return " ".repeat(5);
    };
    match registry.status(seat) {
        Some(SeatStatus::Storage) => format!("{:^5}", "S"),
        Some(status) => format!("{}-{:<3}", status.code(), seat.to_string()),
        None => format!("{:^5}", "?"),
    }
}
