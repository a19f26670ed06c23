//! Interactive text menu driving the booking desk.

use std::io::{BufRead, Write};

use anyhow::Result;

use seatbook::persist::BookingStore;
use seatbook::types::MealPreference;
use seatbook::workflow::BookingService;

const MENU: &str = "\
Booking Menu
1. Check seat availability
2. Book a seat
3. Free a seat
4. Show seating plan
5. Change meal preference
6. Exit program";

/// Runs until the user picks exit or input ends.
pub fn run<S, R, W>(desk: &mut BookingService<S>, mut input: R, mut out: W) -> Result<()>
where
    S: BookingStore,
    R: BufRead,
    W: Write,
{
    loop {
        writeln!(out, "\n{MENU}")?;
        let Some(choice) = prompt(&mut input, &mut out, "Enter your choice (1-6): ")? else {
            break;
        };

        match choice.as_str() {
            "1" => {
                let Some(seat) = prompt(&mut input, &mut out, "Enter seat number (e.g., 12A): ")? else {
                    break;
                };
                writeln!(out, "{}", desk.check_availability(&seat))?;
            }
            "2" => {
                if !book(desk, &mut input, &mut out)? {
                    break;
                }
            }
            "3" => {
                let Some((seat, first, reference)) = credentials(&mut input, &mut out, "free")? else {
                    break;
                };
                match desk.free_seat_authenticated(&seat, &first, &reference) {
                    Ok(()) => writeln!(out, "Seat {} has been freed.", seat.to_ascii_uppercase())?,
                    Err(err) => writeln!(out, "Cannot free seat: {err}")?,
                }
            }
            "4" => write!(out, "{}", desk.render_seat_map())?,
            "5" => {
                let Some((seat, first, reference)) = credentials(&mut input, &mut out, "update")? else {
                    break;
                };
                let Some(meal) = meal_choice(&mut input, &mut out)? else {
                    break;
                };
                let Some(meal) = meal else {
                    writeln!(out, "Meal selection cancelled.")?;
                    continue;
                };
                match desk.change_meal_authenticated(&seat, &first, &reference, Some(meal)) {
                    Ok(()) => writeln!(out, "Meal preference set to: {meal}")?,
                    Err(err) => writeln!(out, "Cannot change meal: {err}")?,
                }
            }
            "6" => {
                writeln!(out, "Thank you for using the booking menu.")?;
                break;
            }
            _ => writeln!(out, "Invalid choice. Please enter 1-6.")?,
        }
    }
    Ok(())
}

/// Returns `Ok(false)` when input ran out mid-booking.
fn book<S: BookingStore>(
    desk: &mut BookingService<S>,
    input: &mut impl BufRead,
    out: &mut impl Write,
) -> Result<bool> {
    let Some(seat) = prompt(input, out, "Enter seat number to book (e.g., 12A): ")? else {
        return Ok(false);
    };
    let availability = desk.check_availability(&seat);
    if !availability.is_available() {
        writeln!(out, "Cannot book seat {seat}: {availability}")?;
        return Ok(true);
    }

    let Some(first) = prompt(input, out, "Enter first name: ")? else {
        return Ok(false);
    };
    let Some(last) = prompt(input, out, "Enter last name: ")? else {
        return Ok(false);
    };
    let Some(passport) = prompt(input, out, "Enter passport number: ")? else {
        return Ok(false);
    };
    let Some(meal) = meal_choice(input, out)? else {
        return Ok(false);
    };

    match desk.book_seat(&seat, &first, &last, &passport, meal) {
        Ok(booking) => {
            writeln!(
                out,
                "\nSeat {} booked successfully. Reference: {}",
                booking.seat, booking.reference
            )?;
            if let Some(meal) = booking.meal {
                writeln!(out, "Meal preference: {meal}")?;
            }
            writeln!(out, "Keep your reference: it is required to change or free this booking.")?;
        }
        Err(err) => writeln!(out, "Cannot book seat {seat}: {err}")?,
    }
    Ok(true)
}

fn credentials(
    input: &mut impl BufRead,
    out: &mut impl Write,
    action: &str,
) -> Result<Option<(String, String, String)>> {
    let Some(seat) = prompt(input, out, &format!("Enter seat number to {action} (e.g., 12A): "))? else {
        return Ok(None);
    };
    let Some(first) = prompt(input, out, "Enter first name on the booking: ")? else {
        return Ok(None);
    };
    let Some(reference) = prompt(input, out, "Enter booking reference: ")? else {
        return Ok(None);
    };
    Ok(Some((seat, first, reference)))
}

/// Outer `None` is end of input; inner `None` means the user skipped.
fn meal_choice(
    input: &mut impl BufRead,
    out: &mut impl Write,
) -> Result<Option<Option<MealPreference>>> {
    writeln!(out, "\nAvailable Meal Options:")?;
    for (i, meal) in MealPreference::ALL.iter().enumerate() {
        writeln!(out, "{}. {meal}", i + 1)?;
    }

    loop {
        let Some(choice) = prompt(
            input,
            out,
            "Enter meal choice number (1-3) or press enter to skip: ",
        )?
        else {
            return Ok(None);
        };
        if choice.is_empty() {
            return Ok(Some(None));
        }
        match choice.parse::<usize>().ok().and_then(MealPreference::from_choice) {
            Some(meal) => return Ok(Some(Some(meal))),
            None => writeln!(out, "Please enter a number between 1 and 3.")?,
        }
    }
}

fn prompt(input: &mut impl BufRead, out: &mut impl Write, label: &str) -> Result<Option<String>> {
    write!(out, "{label}")?;
    out.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}
