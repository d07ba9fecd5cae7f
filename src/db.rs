use crate::birth::UserBirthDetails;
use crate::profile::{AstrologyProfile, FullData};
use crate::store::{Event, ProfileStore, UpsertOutcome, UserDirectory};
use crate::zodiac::{Element, Modality, Sign};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

/// Open (or create) the database file and apply the schema
pub fn open_database(path: &Path) -> Result<Connection> {
    let conn = Connection::open(path)
        .with_context(|| format!("Failed to open database: {:?}", path))?;
    setup_database(&conn)?;
    Ok(conn)
}

pub fn setup_database(conn: &Connection) -> Result<()> {
    // Enable WAL mode for crash recovery
    conn.pragma_update(None, "journal_mode", "WAL")?;

    // Per-connection: profiles go away with their user
    conn.pragma_update(None, "foreign_keys", "ON")?;

    // ==========================================================================
    // Users Table (birth details owned by the user-account side)
    // ==========================================================================
    conn.execute(
        "CREATE TABLE IF NOT EXISTS users (
            id TEXT PRIMARY KEY,
            name TEXT,
            birth_date TEXT,
            birth_time TEXT,
            created_at DATETIME DEFAULT CURRENT_TIMESTAMP
        )",
        [],
    )?;

    // ==========================================================================
    // Astrology Profiles Table (one row per user, replaced on recompute)
    // ==========================================================================
    conn.execute(
        "CREATE TABLE IF NOT EXISTS astrology_profiles (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            profile_uuid TEXT UNIQUE NOT NULL,
            user_id TEXT UNIQUE NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            sun_sign TEXT NOT NULL,
            element TEXT NOT NULL,
            modality TEXT NOT NULL,
            ruling_planet TEXT NOT NULL,
            life_path INTEGER NOT NULL,
            birthday_number INTEGER NOT NULL,
            personal_year INTEGER NOT NULL,
            destiny INTEGER,
            soul_urge INTEGER,
            personality INTEGER,
            lucky_numbers TEXT NOT NULL,
            lucky_colors TEXT NOT NULL,
            fingerprint TEXT NOT NULL,
            full_data TEXT NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )",
        [],
    )?;

    // ==========================================================================
    // Events Table (audit trail)
    // ==========================================================================
    conn.execute(
        "CREATE TABLE IF NOT EXISTS events (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            event_id TEXT UNIQUE NOT NULL,
            timestamp TEXT NOT NULL,
            event_type TEXT NOT NULL,
            entity_type TEXT NOT NULL,
            entity_id TEXT NOT NULL,
            data TEXT NOT NULL,
            actor TEXT NOT NULL,
            created_at DATETIME DEFAULT CURRENT_TIMESTAMP
        )",
        [],
    )?;

    // ==========================================================================
    // Indexes
    // ==========================================================================
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_profiles_sun_sign ON astrology_profiles(sun_sign)",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_events_entity ON events(entity_type, entity_id)",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_events_timestamp ON events(timestamp)",
        [],
    )?;

    Ok(())
}

// ============================================================================
// USERS
// ============================================================================

/// Create or update a user's birth details
pub fn upsert_user(conn: &Connection, user: &UserBirthDetails) -> Result<()> {
    conn.execute(
        "INSERT INTO users (id, name, birth_date, birth_time)
         VALUES (?1, ?2, ?3, ?4)
         ON CONFLICT(id) DO UPDATE SET
            name = excluded.name,
            birth_date = excluded.birth_date,
            birth_time = excluded.birth_time",
        params![user.user_id, user.name, user.birth_date, user.birth_time],
    )
    .with_context(|| format!("Failed to store user {}", user.user_id))?;

    Ok(())
}

/// Delete a user; the profile row cascades with it. Returns true if a row was deleted.
pub fn delete_user(conn: &Connection, user_id: &str) -> Result<bool> {
    let deleted = conn.execute("DELETE FROM users WHERE id = ?1", [user_id])?;
    Ok(deleted > 0)
}

pub fn count_users(conn: &Connection) -> Result<i64> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?;
    Ok(count)
}

/// CSV row: user_id,name,birth_date,birth_time
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct UserCsvRow {
    pub user_id: String,
    pub name: Option<String>,
    pub birth_date: Option<String>,
    pub birth_time: Option<String>,
}

impl From<UserCsvRow> for UserBirthDetails {
    fn from(row: UserCsvRow) -> Self {
        UserBirthDetails {
            user_id: row.user_id,
            name: row.name,
            birth_date: row.birth_date,
            birth_time: row.birth_time,
        }
    }
}

pub fn load_users_csv(csv_path: &Path) -> Result<Vec<UserBirthDetails>> {
    let mut rdr = csv::Reader::from_path(csv_path).context("Failed to open CSV file")?;

    let mut users = Vec::new();

    for result in rdr.deserialize() {
        let row: UserCsvRow = result.context("Failed to deserialize user row")?;
        users.push(row.into());
    }

    Ok(users)
}

/// Store every user in one transaction. Returns the number written.
pub fn import_users(conn: &Connection, users: &[UserBirthDetails]) -> Result<usize> {
    let tx = conn.unchecked_transaction()?;

    for user in users {
        upsert_user(&tx, user)?;
    }

    tx.commit()?;
    info!(count = users.len(), "imported users");

    Ok(users.len())
}

impl UserDirectory for Connection {
    fn find_birth_details(&self, user_id: &str) -> Result<Option<UserBirthDetails>> {
        let details = self
            .query_row(
                "SELECT id, name, birth_date, birth_time FROM users WHERE id = ?1",
                [user_id],
                |row| {
                    Ok(UserBirthDetails {
                        user_id: row.get(0)?,
                        name: row.get(1)?,
                        birth_date: row.get(2)?,
                        birth_time: row.get(3)?,
                    })
                },
            )
            .optional()?;

        Ok(details)
    }
}

// ============================================================================
// PROFILES
// ============================================================================

const PROFILE_COLUMNS: &str = "profile_uuid, user_id, sun_sign, element, modality, ruling_planet,
    life_path, birthday_number, personal_year, destiny, soul_urge, personality,
    lucky_numbers, lucky_colors, fingerprint, full_data, created_at, updated_at";

fn conversion_error<E>(idx: usize, err: E) -> rusqlite::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(err))
}

fn unknown_value(idx: usize, what: &str, value: &str) -> rusqlite::Error {
    conversion_error(
        idx,
        std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!("unknown {}: {}", what, value),
        ),
    )
}

fn parse_time(idx: usize, value: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| conversion_error(idx, e))
}

fn parse_json<T: serde::de::DeserializeOwned>(idx: usize, value: &str) -> rusqlite::Result<T> {
    serde_json::from_str(value).map_err(|e| conversion_error(idx, e))
}

fn profile_from_row(row: &Row<'_>) -> rusqlite::Result<AstrologyProfile> {
    let sun_sign: String = row.get(2)?;
    let element: String = row.get(3)?;
    let modality: String = row.get(4)?;
    let lucky_numbers: String = row.get(12)?;
    let lucky_colors: String = row.get(13)?;
    let full_data: String = row.get(15)?;
    let created_at: String = row.get(16)?;
    let updated_at: String = row.get(17)?;

    Ok(AstrologyProfile {
        id: row.get(0)?,
        user_id: row.get(1)?,
        sun_sign: Sign::from_name(&sun_sign)
            .ok_or_else(|| unknown_value(2, "sun sign", &sun_sign))?,
        element: Element::from_name(&element)
            .ok_or_else(|| unknown_value(3, "element", &element))?,
        modality: Modality::from_name(&modality)
            .ok_or_else(|| unknown_value(4, "modality", &modality))?,
        ruling_planet: row.get(5)?,
        life_path: row.get(6)?,
        birthday: row.get(7)?,
        personal_year: row.get(8)?,
        destiny: row.get(9)?,
        soul_urge: row.get(10)?,
        personality: row.get(11)?,
        lucky_numbers: parse_json(12, &lucky_numbers)?,
        lucky_colors: parse_json(13, &lucky_colors)?,
        fingerprint: row.get(14)?,
        full_data: parse_json::<FullData>(15, &full_data)?,
        created_at: parse_time(16, &created_at)?,
        updated_at: parse_time(17, &updated_at)?,
    })
}

pub fn get_profile(conn: &Connection, user_id: &str) -> Result<Option<AstrologyProfile>> {
    let sql = format!(
        "SELECT {} FROM astrology_profiles WHERE user_id = ?1",
        PROFILE_COLUMNS
    );

    let profile = conn
        .query_row(&sql, [user_id], profile_from_row)
        .optional()
        .with_context(|| format!("Failed to load profile for user {}", user_id))?;

    Ok(profile)
}

pub fn count_profiles(conn: &Connection) -> Result<i64> {
    let count: i64 =
        conn.query_row("SELECT COUNT(*) FROM astrology_profiles", [], |row| row.get(0))?;
    Ok(count)
}

/// Create the profile, or overwrite every derived column of the existing one.
///
/// The stored profile_uuid and created_at survive a replace.
pub fn upsert_profile(conn: &Connection, profile: &AstrologyProfile) -> Result<UpsertOutcome> {
    let tx = conn.unchecked_transaction()?;

    let previous_fingerprint: Option<String> = tx
        .query_row(
            "SELECT fingerprint FROM astrology_profiles WHERE user_id = ?1",
            [&profile.user_id],
            |row| row.get(0),
        )
        .optional()?;

    let lucky_numbers = serde_json::to_string(&profile.lucky_numbers)?;
    let lucky_colors = serde_json::to_string(&profile.lucky_colors)?;
    let full_data = serde_json::to_string(&profile.full_data)?;

    tx.execute(
        &format!(
            "INSERT INTO astrology_profiles ({})
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18)
             ON CONFLICT(user_id) DO UPDATE SET
                sun_sign = excluded.sun_sign,
                element = excluded.element,
                modality = excluded.modality,
                ruling_planet = excluded.ruling_planet,
                life_path = excluded.life_path,
                birthday_number = excluded.birthday_number,
                personal_year = excluded.personal_year,
                destiny = excluded.destiny,
                soul_urge = excluded.soul_urge,
                personality = excluded.personality,
                lucky_numbers = excluded.lucky_numbers,
                lucky_colors = excluded.lucky_colors,
                fingerprint = excluded.fingerprint,
                full_data = excluded.full_data,
                updated_at = excluded.updated_at",
            PROFILE_COLUMNS
        ),
        params![
            profile.id,
            profile.user_id,
            profile.sun_sign.name(),
            profile.element.as_str(),
            profile.modality.as_str(),
            profile.ruling_planet,
            profile.life_path,
            profile.birthday,
            profile.personal_year,
            profile.destiny,
            profile.soul_urge,
            profile.personality,
            lucky_numbers,
            lucky_colors,
            profile.fingerprint,
            full_data,
            profile.created_at.to_rfc3339(),
            profile.updated_at.to_rfc3339(),
        ],
    )
    .with_context(|| format!("Failed to upsert profile for user {}", profile.user_id))?;

    let stored = get_profile(&tx, &profile.user_id)?
        .with_context(|| format!("Profile for user {} missing after upsert", profile.user_id))?;

    tx.commit()?;
    debug!(
        user_id = %profile.user_id,
        created = previous_fingerprint.is_none(),
        "profile row written"
    );

    Ok(UpsertOutcome {
        profile: stored,
        previous_fingerprint,
    })
}

// ============================================================================
// EVENTS
// ============================================================================

/// Insert event into audit trail
pub fn insert_event(conn: &Connection, event: &Event) -> Result<()> {
    let data_json = serde_json::to_string(&event.data)?;

    conn.execute(
        "INSERT INTO events (
            event_id, timestamp, event_type, entity_type, entity_id, data, actor
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            event.event_id,
            event.timestamp.to_rfc3339(),
            event.event_type,
            event.entity_type,
            event.entity_id,
            data_json,
            event.actor,
        ],
    )?;

    Ok(())
}

/// Get events for a specific entity, newest first
pub fn get_events_for_entity(
    conn: &Connection,
    entity_type: &str,
    entity_id: &str,
) -> Result<Vec<Event>> {
    let mut stmt = conn.prepare(
        "SELECT event_id, timestamp, event_type, entity_type, entity_id, data, actor
         FROM events
         WHERE entity_type = ?1 AND entity_id = ?2
         ORDER BY timestamp DESC, id DESC",
    )?;

    let events = stmt
        .query_map(params![entity_type, entity_id], |row| {
            let timestamp_str: String = row.get(1)?;
            let data_json: String = row.get(5)?;

            Ok(Event {
                event_id: row.get(0)?,
                timestamp: parse_time(1, &timestamp_str)?,
                event_type: row.get(2)?,
                entity_type: row.get(3)?,
                entity_id: row.get(4)?,
                data: parse_json(5, &data_json)?,
                actor: row.get(6)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(events)
}

impl ProfileStore for Connection {
    fn upsert_profile(&self, profile: &AstrologyProfile) -> Result<UpsertOutcome> {
        upsert_profile(self, profile)
    }

    fn find_profile(&self, user_id: &str) -> Result<Option<AstrologyProfile>> {
        get_profile(self, user_id)
    }

    fn record_event(&self, event: &Event) -> Result<()> {
        insert_event(self, event)
    }
}
