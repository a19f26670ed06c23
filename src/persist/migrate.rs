//! Versioned schema migration for the bookings table.
//!
//! The schema version lives in `PRAGMA user_version`. Version 0 is either an
//! empty file or a database written by an older, unversioned release; an
//! unversioned `bookings` table with the expected columns is adopted, any
//! other shape is renamed aside instead of dropped.

use rusqlite::{Connection, OptionalExtension};

use super::{PersistError, PersistResult};

pub const SCHEMA_VERSION: u32 = 2;

pub const EXPECTED_COLUMNS: [&str; 6] = [
    "seat",
    "reference",
    "first_name",
    "last_name",
    "passport",
    "meal_preference",
];

const CREATE_BOOKINGS: &str = "CREATE TABLE bookings (
    seat TEXT PRIMARY KEY,
    reference TEXT NOT NULL,
    first_name TEXT NOT NULL,
    last_name TEXT NOT NULL,
    passport TEXT NOT NULL,
    meal_preference TEXT
)";

const CREATE_REFERENCE_INDEX: &str =
    "CREATE UNIQUE INDEX IF NOT EXISTS bookings_reference ON bookings(reference)";

pub fn schema_version(conn: &Connection) -> PersistResult<u32> {
    let version: i64 = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;
    Ok(version as u32)
}

/// Runs every pending step inside one transaction.
pub fn migrate(conn: &mut Connection) -> PersistResult<()> {
    let found = schema_version(conn)?;
    if found > SCHEMA_VERSION {
        return Err(PersistError::UnsupportedSchema {
            found,
            supported: SCHEMA_VERSION,
        });
    }
    if found == SCHEMA_VERSION {
        return Ok(());
    }

    let tx = conn.transaction()?;
    if found < 1 {
        create_or_adopt_bookings(&tx)?;
    }
    if found < 2 {
        quarantine_duplicate_references(&tx)?;
        tx.execute_batch(CREATE_REFERENCE_INDEX)?;
    }
    tx.pragma_update(None, "user_version", SCHEMA_VERSION as i64)?;
    tx.commit()?;

    log::info!("bookings schema migrated from version {found} to {SCHEMA_VERSION}");
    Ok(())
}

fn create_or_adopt_bookings(conn: &Connection) -> PersistResult<()> {
    let columns = table_columns(conn, "bookings")?;
    if columns.is_empty() {
        conn.execute_batch(CREATE_BOOKINGS)?;
        return Ok(());
    }

    if columns.iter().map(String::as_str).eq(EXPECTED_COLUMNS) {
        log::info!("adopting unversioned bookings table");
        conn.execute_batch(
            "UPDATE bookings SET reference = upper(trim(reference)) WHERE reference IS NOT NULL",
        )?;
        return Ok(());
    }

    let legacy = free_table_name(conn, "bookings_legacy")?;
    log::warn!(
        "bookings table has unexpected columns {columns:?}; preserving it as {legacy} and creating a fresh table"
    );
    conn.execute_batch(&format!("ALTER TABLE bookings RENAME TO {legacy}"))?;
    conn.execute_batch(CREATE_BOOKINGS)?;
    Ok(())
}

pub fn table_columns(conn: &Connection, table: &str) -> PersistResult<Vec<String>> {
    let mut stmt = conn.prepare("SELECT name FROM pragma_table_info(?1) ORDER BY cid")?;
    let rows = stmt.query_map([table], |row| row.get::<_, String>(0))?;

    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}

/// Moves rows whose reference is missing or already held by an earlier row
/// into a side table, so the unique index can be built.
fn quarantine_duplicate_references(conn: &Connection) -> PersistResult<()> {
    const CLASHING: &str = "reference IS NULL OR rowid NOT IN (
        SELECT MIN(rowid) FROM bookings WHERE reference IS NOT NULL GROUP BY reference
    )";

    let clashing: i64 = conn.query_row(
        &format!("SELECT COUNT(*) FROM bookings WHERE {CLASHING}"),
        [],
        |row| row.get(0),
    )?;
    if clashing == 0 {
        return Ok(());
    }

    let side = free_table_name(conn, "bookings_duplicate_refs")?;
    log::warn!("{clashing} booking(s) share or lack a reference; moving them to {side}");
    conn.execute_batch(&format!(
        "CREATE TABLE {side} AS SELECT * FROM bookings WHERE {CLASHING};
         DELETE FROM bookings WHERE {CLASHING};"
    ))?;
    Ok(())
}

fn free_table_name(conn: &Connection, base: &str) -> PersistResult<String> {
    let mut suffix = 0usize;
    loop {
        let name = if suffix == 0 {
            base.to_string()
        } else {
            format!("{base}_{suffix}")
        };
        let taken: Option<i64> = conn
            .query_row(
                "SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1",
                [&name],
                |row| row.get(0),
            )
            .optional()?;
        if taken.is_none() {
            return Ok(name);
        }
        suffix += 1;
    }
}
