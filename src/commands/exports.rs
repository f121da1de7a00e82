use std::path::PathBuf;

use crate::db::DatabaseExt;
use crate::error::AppError;
use crate::export::{self, ExportDocument, ExportFormat, ExportScope};
use crate::filters::{CustomerFilter, InvoiceFilter, ProductFilter};
use crate::store::{customers, inventory, invoices};
use tauri::{AppHandle, Manager};

/// `Filtered` without a filter exports everything.
fn scoped<F: Default>(scope: ExportScope, filter: Option<F>) -> F {
    match scope {
        ExportScope::All => F::default(),
        ExportScope::Filtered => filter.unwrap_or_default(),
    }
}

#[tauri::command]
pub fn export_inventory(
    app: AppHandle,
    format: ExportFormat,
    scope: ExportScope,
    filter: Option<ProductFilter>,
    include_details: bool,
) -> Result<ExportDocument, String> {
    let db = app.db();
    let conn = db.conn.lock().map_err(|e| e.to_string())?;

    let products = inventory::search_products(&conn, &scoped(scope, filter))?;
    let today = chrono::Local::now().date_naive();
    export::export_inventory(&products, format, include_details, today).map_err(String::from)
}

#[tauri::command]
pub fn export_invoices(
    app: AppHandle,
    format: ExportFormat,
    scope: ExportScope,
    filter: Option<InvoiceFilter>,
) -> Result<ExportDocument, String> {
    let db = app.db();
    let conn = db.conn.lock().map_err(|e| e.to_string())?;

    let invoices = invoices::search_invoices(&conn, &scoped(scope, filter))?;
    let today = chrono::Local::now().date_naive();
    export::export_invoices(&invoices, format, today).map_err(String::from)
}

#[tauri::command]
pub fn export_customers(
    app: AppHandle,
    format: ExportFormat,
    scope: ExportScope,
    filter: Option<CustomerFilter>,
) -> Result<ExportDocument, String> {
    let db = app.db();
    let conn = db.conn.lock().map_err(|e| e.to_string())?;

    let customers = customers::search_customers(&conn, &scoped(scope, filter))?;
    let today = chrono::Local::now().date_naive();
    export::export_customers(&customers, format, today).map_err(String::from)
}

/// Saves to the Desktop, or the app's local data dir when there is no Desktop.
#[tauri::command]
pub fn save_export(app: AppHandle, document: ExportDocument) -> Result<String, String> {
    let dir: PathBuf = match app.path().desktop_dir() {
        Ok(dir) => dir,
        Err(e) => {
            tracing::debug!(error = %e, "no desktop dir, using app data dir");
            app.path()
                .app_local_data_dir()
                .map_err(|e| AppError::Config(format!("failed to resolve app data dir: {e}")))?
        }
    };

    let target = export::save_document(&dir, &document)?;
    Ok(target.to_string_lossy().into_owned())
}
