use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use seatbook::config::BookingConfig;
use seatbook::persist::{BookingStore, sqlite::SqliteBookingStore};
use seatbook::workflow::BookingService;

mod menu;

#[derive(Parser)]
#[command(name = "seatbook")]
#[command(about = "Aircraft seat booking desk", long_about = None)]
struct Cli {
    /// SQLite database file (overrides the config file)
    #[arg(long)]
    db: Option<PathBuf>,

    /// JSON configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log more (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive booking menu (default)
    Menu,

    /// Show the status of one seat
    Check {
        /// Seat such as 12A
        seat: String,
    },

    /// Print the seating chart
    Map,

    /// List all bookings
    List {
        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let mut config = match &cli.config {
        Some(path) => BookingConfig::from_json_file(path)?,
        None => BookingConfig::default(),
    };
    if let Some(db) = cli.db {
        config.db_path = db;
    }

    let store = SqliteBookingStore::open(&config.db_path)
        .with_context(|| format!("Failed to open booking database {}", config.db_path.display()))?;
    let mut desk = BookingService::open(store, config.reference.clone())
        .context("Failed to load bookings")?;

    match cli.command.unwrap_or(Commands::Menu) {
        Commands::Menu => {
            let stdin = io::stdin();
            menu::run(&mut desk, stdin.lock(), io::stdout())
        }
        Commands::Check { seat } => {
            println!("{}", desk.check_availability(&seat));
            Ok(())
        }
        Commands::Map => {
            print!("{}", desk.render_seat_map());
            Ok(())
        }
        Commands::List { json } => cmd_list(&desk, json),
    }
}

fn cmd_list(desk: &BookingService<SqliteBookingStore>, json: bool) -> Result<()> {
    let bookings = desk.store().list_bookings()?;
    if json {
        println!("{}", serde_json::to_string_pretty(&bookings)?);
        return Ok(());
    }

    if bookings.is_empty() {
        println!("No bookings.");
        return Ok(());
    }
    for booking in &bookings {
        println!(
            "{:<4} {:<12} {:<24} {:<12} {}",
            booking.seat.to_string(),
            booking.reference,
            booking.passenger().to_string(),
            booking.passport,
            booking.meal.map_or("-", |m| m.label()),
        );
    }
    println!("\n{} booking(s)", bookings.len());
    Ok(())
}
