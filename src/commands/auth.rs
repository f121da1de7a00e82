use crate::db::DatabaseExt;
use crate::models::{Session, User};
use crate::store::auth;
use tauri::AppHandle;

#[tauri::command]
pub fn login(app: AppHandle, email: String, password: String) -> Result<Session, String> {
    let db = app.db();
    let conn = db.conn.lock().map_err(|e| e.to_string())?;

    auth::login(&conn, &email, &password).map_err(String::from)
}

#[tauri::command]
pub fn current_user(app: AppHandle, token: String) -> Result<Option<User>, String> {
    let db = app.db();
    let conn = db.conn.lock().map_err(|e| e.to_string())?;

    auth::current_user(&conn, &token).map_err(String::from)
}

#[tauri::command]
pub fn logout(app: AppHandle, token: String) -> Result<(), String> {
    let db = app.db();
    let conn = db.conn.lock().map_err(|e| e.to_string())?;

    auth::logout(&conn, &token).map_err(String::from)
}
