use crate::config::AppConfig;
use crate::db::DatabaseExt;
use crate::filters::InvoiceFilter;
use crate::models::{Invoice, InvoiceStatus, NewInvoice, UpdateInvoice};
use crate::store::invoices;
use tauri::{AppHandle, Manager};

#[tauri::command]
pub fn get_invoices(app: AppHandle) -> Result<Vec<Invoice>, String> {
    let db = app.db();
    let conn = db.conn.lock().map_err(|e| e.to_string())?;

    invoices::list_invoices(&conn).map_err(String::from)
}

/// Dashboard list; the size comes from `recent_invoice_limit`.
#[tauri::command]
pub fn get_recent_invoices(app: AppHandle) -> Result<Vec<Invoice>, String> {
    let limit = app.state::<AppConfig>().recent_invoice_limit;
    let db = app.db();
    let conn = db.conn.lock().map_err(|e| e.to_string())?;

    invoices::recent_invoices(&conn, limit).map_err(String::from)
}

#[tauri::command]
pub fn get_invoice(app: AppHandle, id: String) -> Result<Invoice, String> {
    let db = app.db();
    let conn = db.conn.lock().map_err(|e| e.to_string())?;

    invoices::get_invoice(&conn, &id).map_err(String::from)
}

#[tauri::command]
pub fn create_invoice(app: AppHandle, invoice: NewInvoice) -> Result<Invoice, String> {
    let db = app.db();
    let conn = db.conn.lock().map_err(|e| e.to_string())?;

    invoices::create_invoice(&conn, invoice).map_err(String::from)
}

#[tauri::command]
pub fn update_invoice(app: AppHandle, invoice: UpdateInvoice) -> Result<Invoice, String> {
    let db = app.db();
    let conn = db.conn.lock().map_err(|e| e.to_string())?;

    invoices::update_invoice(&conn, invoice).map_err(String::from)
}

#[tauri::command]
pub fn set_invoice_status(app: AppHandle, id: String, status: InvoiceStatus) -> Result<Invoice, String> {
    let db = app.db();
    let conn = db.conn.lock().map_err(|e| e.to_string())?;

    invoices::set_invoice_status(&conn, &id, status).map_err(String::from)
}

#[tauri::command]
pub fn search_invoices(app: AppHandle, filter: InvoiceFilter) -> Result<Vec<Invoice>, String> {
    let db = app.db();
    let conn = db.conn.lock().map_err(|e| e.to_string())?;

    invoices::search_invoices(&conn, &filter).map_err(String::from)
}
