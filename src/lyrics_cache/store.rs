use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::info;

use super::models::CacheEntry;
use super::schema;
use super::LyricsCache;
use crate::lyrics::SourceTag;

pub struct SqliteLyricsCache {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteLyricsCache {
    pub fn new<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let path = db_path.as_ref();
        let is_new_db = !path.exists();

        let conn = Connection::open(path).context("Failed to open lyrics cache database")?;
        if is_new_db {
            info!("Creating new lyrics cache database at {:?}", path);
            schema::create(&conn)?;
        } else {
            schema::validate(&conn)
                .with_context(|| format!("Lyrics cache schema validation failed for {:?}", path))?;
        }

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        schema::create(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn format_datetime(dt: &DateTime<Utc>) -> String {
        dt.to_rfc3339()
    }

    fn parse_datetime(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s)
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|_| Utc::now())
    }

    fn row_to_entry(row: &rusqlite::Row) -> rusqlite::Result<CacheEntry> {
        let source_str: String = row.get("source")?;
        let created_at_str: String = row.get("created_at")?;
        let last_used_at_str: String = row.get("last_used_at")?;

        Ok(CacheEntry {
            track_id: row.get("track_id")?,
            title: row.get("title")?,
            artist: row.get("artist")?,
            lyrics: row.get("lyrics")?,
            // A tag this build doesn't know (written by a newer build) is
            // folded into the letras bucket rather than failing the lookup.
            source: SourceTag::parse(&source_str).unwrap_or(SourceTag::Letras),
            created_at: Self::parse_datetime(&created_at_str),
            last_used_at: Self::parse_datetime(&last_used_at_str),
            use_count: row.get("use_count")?,
        })
    }
}

impl LyricsCache for SqliteLyricsCache {
    fn lookup(&self, track_id: &str) -> Result<Option<CacheEntry>> {
        let conn = self.conn.lock().unwrap();
        let now = Self::format_datetime(&Utc::now());

        let updated = conn.execute(
            "UPDATE lyrics_cache SET use_count = use_count + 1, last_used_at = ?1
             WHERE track_id = ?2",
            params![now, track_id],
        )?;
        if updated == 0 {
            return Ok(None);
        }

        let mut stmt = conn.prepare(
            "SELECT track_id, title, artist, lyrics, source, created_at, last_used_at, use_count
             FROM lyrics_cache WHERE track_id = ?1",
        )?;
        let entry = stmt
            .query_row(params![track_id], Self::row_to_entry)
            .optional()?;
        Ok(entry)
    }

    fn upsert(&self, entry: &CacheEntry) -> Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO lyrics_cache
                 (track_id, title, artist, lyrics, source, created_at, last_used_at, use_count)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
             ON CONFLICT(track_id) DO UPDATE SET
                 title = ?2, artist = ?3, lyrics = ?4, source = ?5,
                 created_at = ?6, last_used_at = ?7, use_count = ?8",
            params![
                entry.track_id,
                entry.title,
                entry.artist,
                entry.lyrics,
                entry.source.as_str(),
                Self::format_datetime(&entry.created_at),
                Self::format_datetime(&entry.last_used_at),
                entry.use_count,
            ],
        )?;
        Ok(())
    }

    fn len(&self) -> Result<usize> {
        let conn = self.conn.lock().unwrap();
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM lyrics_cache", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    fn clear(&self) -> Result<usize> {
        let conn = self.conn.lock().unwrap();
        let deleted = conn.execute("DELETE FROM lyrics_cache", [])?;
        Ok(deleted)
    }
}
