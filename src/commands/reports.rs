use crate::db::DatabaseExt;
use crate::models::{DashboardMetrics, MonthlySales, Report, ReportKind, ReportPeriod};
use crate::store::reports;
use chrono::Datelike;
use tauri::AppHandle;

#[tauri::command]
pub fn get_dashboard_metrics(app: AppHandle) -> Result<DashboardMetrics, String> {
    let db = app.db();
    let conn = db.conn.lock().map_err(|e| e.to_string())?;

    reports::dashboard_metrics(&conn).map_err(String::from)
}

/// Defaults to the current year.
#[tauri::command]
pub fn get_monthly_sales(app: AppHandle, year: Option<i32>) -> Result<Vec<MonthlySales>, String> {
    let year = year.unwrap_or_else(|| chrono::Local::now().year());
    let db = app.db();
    let conn = db.conn.lock().map_err(|e| e.to_string())?;

    reports::monthly_sales(&conn, year).map_err(String::from)
}

#[tauri::command]
pub fn generate_report(
    app: AppHandle,
    kind: ReportKind,
    period: ReportPeriod,
) -> Result<Report, String> {
    let today = chrono::Local::now().date_naive();
    let db = app.db();
    let conn = db.conn.lock().map_err(|e| e.to_string())?;

    reports::generate_report(&conn, kind, period, today).map_err(String::from)
}
