use rusqlite::{params, Connection, OptionalExtension};

use crate::error::{AppError, AppResult};
use crate::models::{Session, User};

const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// Checks the password and opens a session. The token is what the UI keeps
/// between launches.
pub fn login(conn: &Connection, email: &str, password: &str) -> AppResult<Session> {
    let email = email.trim().to_lowercase();

    let found: Option<(User, String)> = conn
        .query_row(
            "SELECT id, name, email, password_hash FROM users WHERE email = ?1",
            [&email],
            |row| {
                Ok((
                    User {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        email: row.get(2)?,
                    },
                    row.get(3)?,
                ))
            },
        )
        .optional()?;

    // an unreadable stored hash counts as a failed login
    let verified = |hash: &str| {
        bcrypt::verify(password, hash).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "stored password hash is invalid");
            false
        })
    };

    let user = match found {
        Some((user, hash)) if verified(&hash) => user,
        _ => {
            tracing::warn!(email = %email, "failed login");
            return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        }
    };

    let token = uuid::Uuid::new_v4().to_string();
    conn.execute(
        "INSERT INTO sessions (token, user_id) VALUES (?1, ?2)",
        params![token, user.id],
    )?;
    tracing::info!(user_id = %user.id, "user logged in");

    Ok(Session { token, user })
}

pub fn current_user(conn: &Connection, token: &str) -> AppResult<Option<User>> {
    let user = conn
        .query_row(
            "SELECT u.id, u.name, u.email
             FROM sessions s
             JOIN users u ON u.id = s.user_id
             WHERE s.token = ?1",
            [token],
            |row| {
                Ok(User {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    email: row.get(2)?,
                })
            },
        )
        .optional()?;
    Ok(user)
}

pub fn logout(conn: &Connection, token: &str) -> AppResult<()> {
    let removed = conn.execute("DELETE FROM sessions WHERE token = ?1", [token])?;
    tracing::info!(removed, "logged out");
    Ok(())
}
