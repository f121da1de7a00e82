use rusqlite::{params, Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::models::AppSettings;

const PROFILE_KEY: &str = "profile";
const BUSINESS_KEY: &str = "business";
const NOTIFICATIONS_KEY: &str = "notifications";

fn read_section<T: DeserializeOwned + Default>(conn: &Connection, key: &str) -> AppResult<T> {
    let stored: Option<String> = conn
        .query_row("SELECT value FROM settings WHERE key = ?1", [key], |row| row.get(0))
        .optional()?;

    match stored {
        Some(json) => Ok(serde_json::from_str(&json)?),
        None => Ok(T::default()),
    }
}

fn write_section<T: Serialize>(conn: &Connection, key: &str, value: &T) -> AppResult<()> {
    conn.execute(
        "INSERT INTO settings (key, value) VALUES (?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        params![key, serde_json::to_string(value)?],
    )?;
    Ok(())
}

pub fn get_settings(conn: &Connection) -> AppResult<AppSettings> {
    Ok(AppSettings {
        profile: read_section(conn, PROFILE_KEY)?,
        business: read_section(conn, BUSINESS_KEY)?,
        notifications: read_section(conn, NOTIFICATIONS_KEY)?,
    })
}

pub fn update_settings(conn: &Connection, settings: AppSettings) -> AppResult<AppSettings> {
    if settings.business.business_name.trim().is_empty() {
        return Err(AppError::Validation("Business name is required".to_string()));
    }
    if !settings.profile.email.contains('@') {
        return Err(AppError::Validation("Enter a valid email address".to_string()));
    }

    let tx = conn.unchecked_transaction()?;
    write_section(&tx, PROFILE_KEY, &settings.profile)?;
    write_section(&tx, BUSINESS_KEY, &settings.business)?;
    write_section(&tx, NOTIFICATIONS_KEY, &settings.notifications)?;
    tx.commit()?;
    tracing::info!("saved settings");

    Ok(settings)
}
