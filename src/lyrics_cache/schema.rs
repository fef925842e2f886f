//! SQLite schema for the lyrics cache database.

use anyhow::{bail, Result};
use rusqlite::Connection;

pub const SCHEMA_VERSION: i64 = 1;

/// Columns of the `lyrics_cache` table, in declaration order. Kept as data
/// so validation can diff the live table against expectations on open.
const LYRICS_CACHE_COLUMNS: &[(&str, &str, bool)] = &[
    // (name, type, non_null)
    ("track_id", "TEXT", true),
    ("title", "TEXT", true),
    ("artist", "TEXT", true),
    ("lyrics", "TEXT", true),
    ("source", "TEXT", true),
    ("created_at", "TEXT", true),
    ("last_used_at", "TEXT", true),
    ("use_count", "INTEGER", true),
];

pub fn create(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE lyrics_cache (
            track_id TEXT PRIMARY KEY NOT NULL,
            title TEXT NOT NULL,
            artist TEXT NOT NULL,
            lyrics TEXT NOT NULL,
            source TEXT NOT NULL,
            created_at TEXT NOT NULL,
            last_used_at TEXT NOT NULL,
            use_count INTEGER NOT NULL DEFAULT 0
        )",
        [],
    )?;
    conn.execute(
        "CREATE INDEX idx_lyrics_cache_last_used ON lyrics_cache(last_used_at DESC)",
        [],
    )?;
    conn.execute(&format!("PRAGMA user_version = {}", SCHEMA_VERSION), [])?;
    Ok(())
}

/// Validates that an existing database carries the expected version and
/// table shape; a mismatch is a hard error rather than a silent rebuild.
pub fn validate(conn: &Connection) -> Result<()> {
    let version: i64 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if version != SCHEMA_VERSION {
        bail!(
            "lyrics cache database has schema version {}, expected {}",
            version,
            SCHEMA_VERSION
        );
    }

    let mut stmt = conn.prepare("PRAGMA table_info(lyrics_cache);")?;
    let actual: Vec<(String, String, bool)> = stmt
        .query_map([], |row| {
            Ok((
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, i32>(3)? == 1,
            ))
        })?
        .collect::<rusqlite::Result<_>>()?;

    if actual.len() != LYRICS_CACHE_COLUMNS.len() {
        bail!(
            "lyrics_cache has {} columns, expected {}",
            actual.len(),
            LYRICS_CACHE_COLUMNS.len()
        );
    }
    for ((name, sql_type, non_null), (exp_name, exp_type, exp_non_null)) in
        actual.iter().zip(LYRICS_CACHE_COLUMNS)
    {
        if name != exp_name || sql_type != exp_type {
            bail!(
                "lyrics_cache column mismatch: found {} {}, expected {} {}",
                name,
                sql_type,
                exp_name,
                exp_type
            );
        }
        // The primary key column reports non_null = 0 in older SQLite,
        // so only enforce nullability on the rest.
        if *exp_non_null != *non_null && *exp_name != "track_id" {
            bail!("lyrics_cache column {} nullability mismatch", name);
        }
    }
    Ok(())
}
