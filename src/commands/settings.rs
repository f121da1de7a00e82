use crate::db::DatabaseExt;
use crate::models::AppSettings;
use crate::store::settings;
use tauri::AppHandle;

#[tauri::command]
pub fn get_settings(app: AppHandle) -> Result<AppSettings, String> {
    let db = app.db();
    let conn = db.conn.lock().map_err(|e| e.to_string())?;

    settings::get_settings(&conn).map_err(String::from)
}

#[tauri::command]
pub fn update_settings(app: AppHandle, settings: AppSettings) -> Result<AppSettings, String> {
    let db = app.db();
    let conn = db.conn.lock().map_err(|e| e.to_string())?;

    settings::update_settings(&conn, settings).map_err(String::from)
}
